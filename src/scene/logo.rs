//! Splash shown once at startup

use super::machine::SceneHandler;
use super::{GameContext, SceneId};

/// How long the logo stays fully visible
const LOGO_HOLD: f32 = 1.15;

#[derive(Debug, Default)]
pub struct LogoScene {
    shown: f32,
}

impl SceneHandler<SceneId, GameContext> for LogoScene {
    fn on_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId) {
        self.shown = 0.0;
        ctx.fade = 0.0;
    }

    fn update_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId, dt: f32) -> bool {
        ctx.fade_towards(1.0, dt)
    }

    fn update(&mut self, _ctx: &mut GameContext, dt: f32) -> SceneId {
        self.shown += dt;
        if self.shown >= LOGO_HOLD {
            SceneId::Menu
        } else {
            SceneId::Logo
        }
    }

    fn update_pre_exit(&mut self, ctx: &mut GameContext, _to: SceneId, dt: f32) -> bool {
        ctx.fade_towards(0.0, dt)
    }
}
