//! Recursive Runner - headless entry point
//!
//! Plays one session on autopilot (tapping at a steady rhythm), submits it to
//! the score file and prints the board.
//!
//! Usage: `recursive-runner [config.json] [scores.json]`

use std::path::PathBuf;

use recursive_runner::app::FrameInput;
use recursive_runner::consts::SIM_DT;
use recursive_runner::scene::{EnglishLocalizer, Phase, SceneId, UiCommand};
use recursive_runner::sim::SimEvent;
use recursive_runner::{App, GameConfig, JsonScoreStore};

/// Frames between autopilot taps, and how long each tap is held
const TAP_PERIOD: u64 = 45;
const TAP_HOLD: u64 = 5;
/// Give up after this many frames (ten minutes of game time)
const FRAME_LIMIT: u64 = 60 * 60 * 10;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| "recursive-runner.json".into()));
    let scores_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "recursive-runner-scores.json".into()),
    );

    let config = GameConfig::load(&config_path);
    let scores = JsonScoreStore::open(&scores_path, config.max_plausible_currency());
    log::info!("Scores kept in {}", scores.path().display());
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut app = App::new(
        config,
        Box::new(scores),
        Box::new(EnglishLocalizer::default()),
        seed,
    );
    app.start();

    let mut played = false;
    let mut coins = 0u32;
    let mut eliminated = 0u32;
    for frame in 0..FRAME_LIMIT {
        let active = app.scene_phase() == Some(Phase::Active);
        let input = match app.current_scene() {
            Some(SceneId::Menu) if active && !played => {
                played = true;
                FrameInput {
                    command: Some(UiCommand::Play),
                    ..Default::default()
                }
            }
            Some(SceneId::Menu) if active => break,
            Some(SceneId::Game) => FrameInput {
                pressed: frame % TAP_PERIOD < TAP_HOLD,
                ..Default::default()
            },
            _ => FrameInput::default(),
        };
        app.frame(SIM_DT, input);

        for event in app.drain_events() {
            match event {
                SimEvent::CoinCollected { live: true, .. } => coins += 1,
                SimEvent::RunEliminated { .. } => eliminated += 1,
                _ => {}
            }
        }
    }

    let ctx = app.context();
    println!("Session over: {coins} coins banked, {eliminated} runs eliminated");
    match ctx.last_rank {
        Some(rank) => println!("New high score, rank {rank}!"),
        None => println!("No new high score"),
    }
    if let Some(game) = &ctx.last_game {
        println!("\nRun  points  coins  jumps  kills  age  combo  seconds");
        for (i, run) in game.stats.runs.iter().enumerate() {
            println!(
                "{:>3}  {:>6}  {:>5}  {:>5}  {:>5}  {:>3}  {:>5}  {:>7.1}",
                i + 1,
                run.points_scored,
                run.coins_collected,
                run.jumps,
                run.kills,
                run.max_age,
                run.max_combo,
                run.lifetime
            );
        }
    }
    println!("\nTop scores:");
    for (i, entry) in ctx.top_scores.iter().enumerate() {
        println!(
            "{:>2}. {:>8}  {:>3} coins  {}",
            i + 1,
            entry.points,
            entry.currency,
            entry.name
        );
    }
}
