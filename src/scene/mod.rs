//! Screens of the game, sequenced by a phased state machine
//!
//! Logo -> Menu -> Game <-> Pause, with RestartGame as a bounce back into a
//! fresh Game, Tutorial as a scripted Game and Stats charting past sessions.

pub mod context;
mod game;
mod logo;
pub mod machine;
mod menu;
mod pause;
mod restart;
mod stats;
pub mod tutorial;

pub use context::{
    Arrow, EnglishLocalizer, GameContext, InputSnapshot, Localizer, Overlay, StatsBoard,
    UiCommand,
};
pub use machine::{Phase, SceneHandler, StateMachine};

/// Identifies a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneId {
    Logo,
    Menu,
    Game,
    Pause,
    RestartGame,
    Tutorial,
    Stats,
}

impl SceneId {
    /// Where the platform back button leads, with no pre-exit animation
    pub fn back_target(self) -> Option<SceneId> {
        match self {
            SceneId::Game => Some(SceneId::Pause),
            SceneId::Menu => None,
            SceneId::Logo
            | SceneId::Pause
            | SceneId::RestartGame
            | SceneId::Tutorial
            | SceneId::Stats => Some(SceneId::Menu),
        }
    }
}

/// Machine with every screen registered
pub fn build_scenes() -> StateMachine<SceneId, GameContext> {
    let mut machine = StateMachine::new();
    machine.register(SceneId::Logo, Box::new(logo::LogoScene::default()));
    machine.register(SceneId::Menu, Box::new(menu::MenuScene));
    machine.register(SceneId::Game, Box::new(game::GameScene));
    machine.register(SceneId::Pause, Box::new(pause::PauseScene));
    machine.register(SceneId::RestartGame, Box::new(restart::RestartGameScene));
    machine.register(SceneId::Tutorial, Box::new(tutorial::TutorialScene::default()));
    machine.register(SceneId::Stats, Box::new(stats::StatsScene));
    machine
}
