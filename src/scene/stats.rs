//! Per-run charts for the last session or the best one

use super::machine::SceneHandler;
use super::{GameContext, SceneId, StatsBoard, UiCommand};

pub struct StatsScene;

impl SceneHandler<SceneId, GameContext> for StatsScene {
    fn on_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId) {
        let last_scored = ctx.last_game.as_ref().is_some_and(|g| g.score > 0);
        ctx.stats_board = Some(if last_scored || ctx.best_game.is_none() {
            StatsBoard::LastGame
        } else {
            StatsBoard::BestGame
        });
        ctx.overlay.clear();
    }

    fn update_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId, dt: f32) -> bool {
        ctx.fade_towards(1.0, dt)
    }

    fn update(&mut self, ctx: &mut GameContext, _dt: f32) -> SceneId {
        match ctx.input.command.take() {
            Some(UiCommand::ShowLastGame) => ctx.stats_board = Some(StatsBoard::LastGame),
            Some(UiCommand::ShowBestGame) => ctx.stats_board = Some(StatsBoard::BestGame),
            Some(UiCommand::Back) => return SceneId::Menu,
            _ => {}
        }
        SceneId::Stats
    }

    fn update_pre_exit(&mut self, ctx: &mut GameContext, _to: SceneId, dt: f32) -> bool {
        ctx.fade_towards(0.0, dt)
    }

    fn on_exit(&mut self, ctx: &mut GameContext, _to: SceneId) {
        ctx.stats_board = None;
    }
}
