//! Math Dash entry point
//!
//! Headless demo driver: runs a few scripted rounds through the full
//! submit → reveal → transition → advance cycle and prints the stream.
//! A real front end would feed key input into the session and draw the
//! state snapshot each frame.

use math_dash::config::DifficultyPreset;
use math_dash::game::{CelebrationPhase, GameSession, Orchestrator};
use math_dash::persistence::MemoryStorage;
use math_dash::settings::DrillSettings;

fn main() {
    env_logger::init();
    log::info!("Math Dash (demo driver) starting...");

    let mut storage = MemoryStorage::new();

    // Preferences overlay the preset the way a settings panel would
    let mut settings = DrillSettings::load(&storage);
    settings.max_result = 20;
    settings.save(&mut storage);

    let mut config = DifficultyPreset::Medium.config();
    settings.apply(&mut config);

    let mut session = match GameSession::new(config, Box::new(storage), 0xD1CE) {
        Ok(session) => session,
        Err(err) => {
            log::error!("failed to start session: {}", err);
            return;
        }
    };
    let mut orchestrator = Orchestrator::new();

    for round in 1..=8 {
        let problem = session.state().problem.clone();
        // Miss every fourth round to exercise the streak reset
        let typed = if round % 4 == 0 {
            problem.answer + 1
        } else {
            problem.answer
        };

        for digit in typed.to_string().chars() {
            session.update_answer(digit);
        }
        session.submit();

        // Run the timed reveal/transition chain to completion
        while session.state().phase != CelebrationPhase::Idle {
            if let Err(err) = orchestrator.tick(&mut session) {
                log::error!("generation failed: {}", err);
                return;
            }
        }

        println!(
            "{:<16} typed {:>3}  streak {}  best {}",
            problem.display,
            typed,
            session.state().streak,
            session.state().high_score
        );
    }

    let stats = session.stats();
    println!(
        "session: {}/{} correct, best streak {}",
        stats.correct, stats.attempted, stats.best_streak
    );
}
