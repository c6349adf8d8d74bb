//! The corridor itself

use super::machine::SceneHandler;
use super::{GameContext, SceneId, UiCommand};

pub struct GameScene;

impl SceneHandler<SceneId, GameContext> for GameScene {
    fn on_pre_enter(&mut self, ctx: &mut GameContext, from: SceneId) {
        ctx.ensure_session();
        // Coming back from pause the corridor is already on screen
        ctx.fade = if from == SceneId::Pause { 1.0 } else { 0.0 };
    }

    fn update_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId, dt: f32) -> bool {
        ctx.fade_towards(1.0, dt)
    }

    fn on_enter(&mut self, ctx: &mut GameContext, _from: SceneId) {
        ctx.overlay.clear();
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32) -> SceneId {
        if ctx.input.command.take() == Some(UiCommand::Pause) {
            return SceneId::Pause;
        }
        ctx.step_session(dt);
        if ctx.session_complete() {
            SceneId::Menu
        } else {
            SceneId::Game
        }
    }

    fn update_pre_exit(&mut self, ctx: &mut GameContext, to: SceneId, dt: f32) -> bool {
        to == SceneId::Pause || ctx.fade_towards(0.0, dt)
    }

    fn on_exit(&mut self, ctx: &mut GameContext, to: SceneId) {
        if to != SceneId::Pause {
            ctx.end_session();
        }
    }
}
