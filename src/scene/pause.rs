//! Pause screen over a frozen corridor

use super::machine::SceneHandler;
use super::{GameContext, SceneId, UiCommand};

pub struct PauseScene;

impl SceneHandler<SceneId, GameContext> for PauseScene {
    fn update(&mut self, ctx: &mut GameContext, _dt: f32) -> SceneId {
        match ctx.input.command.take() {
            Some(UiCommand::Resume) => SceneId::Game,
            Some(UiCommand::Restart) => SceneId::RestartGame,
            Some(UiCommand::Quit) => SceneId::Menu,
            _ => SceneId::Pause,
        }
    }

    fn on_exit(&mut self, ctx: &mut GameContext, to: SceneId) {
        match to {
            SceneId::Game => {}
            // A finished session counts even if the player restarts from here
            SceneId::RestartGame if ctx.session_complete() => {
                ctx.end_session();
                ctx.submit_pending();
            }
            // Abandoned sessions don't reach the score board
            SceneId::RestartGame => ctx.discard_session(),
            _ => ctx.end_session(),
        }
    }
}
