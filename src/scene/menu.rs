//! Title screen: the score board and the way into a game or the tutorial

use super::machine::SceneHandler;
use super::{GameContext, SceneId, UiCommand};

/// Title screen with the score board
pub struct MenuScene;

impl SceneHandler<SceneId, GameContext> for MenuScene {
    fn on_pre_enter(&mut self, ctx: &mut GameContext, from: SceneId) {
        if ctx.pending_summary.is_some() {
            log::info!("Back from {from:?}, submitting session");
        }
        ctx.submit_pending();
        ctx.overlay.clear();
    }

    fn update_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId, dt: f32) -> bool {
        ctx.fade_towards(1.0, dt)
    }

    fn update(&mut self, ctx: &mut GameContext, _dt: f32) -> SceneId {
        match ctx.input.command.take() {
            Some(UiCommand::Play) => SceneId::Game,
            Some(UiCommand::Tutorial) => SceneId::Tutorial,
            Some(UiCommand::Stats) if ctx.has_stats() => SceneId::Stats,
            Some(UiCommand::Stats) => {
                log::debug!("No session played yet, nothing to chart");
                SceneId::Menu
            }
            _ => SceneId::Menu,
        }
    }

    fn update_pre_exit(&mut self, ctx: &mut GameContext, _to: SceneId, dt: f32) -> bool {
        ctx.fade_towards(0.0, dt)
    }
}
