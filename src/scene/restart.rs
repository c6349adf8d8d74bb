//! Pass-through screen that tears the old session down before a new Game

use super::machine::SceneHandler;
use super::{GameContext, SceneId};

/// Bounces straight into a new Game, which starts a fresh session
pub struct RestartGameScene;

impl SceneHandler<SceneId, GameContext> for RestartGameScene {
    fn on_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId) {
        ctx.discard_session();
    }

    fn update(&mut self, _ctx: &mut GameContext, _dt: f32) -> SceneId {
        SceneId::Game
    }
}
