use rand::Rng;
use tracing::Level;

use roguebot_rewards::env::{RewardShapingEnv, ScriptedSimulator};
use roguebot_rewards::error::EnvError;
use roguebot_rewards::observation::Snapshot;
use roguebot_rewards::policy::{build_policy, TrainingProgressState};
use roguebot_rewards::Settings;

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

/// A canned dungeon walk: the turn counter advances, the map uncovers, and
/// score trickles in. Stands in for a live game so the reward layer can be
/// watched end to end.
fn demo_script(steps: usize) -> Vec<Snapshot> {
    let mut rng = rand::rng();
    let mut score = 0i64;
    let mut revealed = 0usize;
    (0..steps)
        .map(|i| {
            score += rng.random_range(0..3i64);
            revealed = (revealed + rng.random_range(0..4usize)).min(21 * 79);
            let depth = 1 + (i / 60) as i64;
            let mut builder = Snapshot::builder()
                .turn(i as i64)
                .score(score)
                .location(0, depth)
                .position(rng.random_range(0..79i64), rng.random_range(0..21i64));
            for cell in 0..revealed {
                builder = builder.glyph(cell / 79, cell % 79, 42);
            }
            builder.build()
        })
        .collect()
}

fn main() -> Result<(), EnvError> {
    init_logging();

    let settings = Settings::load(std::env::args().nth(1).as_deref())?;
    tracing::info!(task = ?settings.task, "starting demo episode");

    let progress = TrainingProgressState::shared(settings.progress_alpha);
    let policy = build_policy(settings.task, &settings, Some(progress))?;
    let simulator = ScriptedSimulator::new(demo_script(200));
    let mut env = RewardShapingEnv::new(simulator, policy);

    let mut rng = rand::rng();
    env.reset()?;
    let mut episode_return = 0.0;
    loop {
        let action: u8 = rng.random_range(0..8);
        let transition = env.step(&action)?;
        episode_return += transition.reward;
        if transition.done {
            break;
        }
    }
    tracing::info!(episode_return, "demo episode complete");
    Ok(())
}
