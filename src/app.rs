//! Fixed-timestep driver
//!
//! The platform calls [`App::frame`] once per rendered frame with the real
//! elapsed time; the scenes only ever see `SIM_DT` steps.

use crate::consts::*;
use crate::highscores::ScoreStore;
use crate::scene::{
    GameContext, InputSnapshot, Localizer, Phase, SceneId, StateMachine, UiCommand, build_scenes,
};
use crate::settings::GameConfig;
use crate::sim::SimEvent;

/// What the platform saw this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub pressed: bool,
    pub command: Option<UiCommand>,
}

pub struct App {
    scenes: StateMachine<SceneId, GameContext>,
    ctx: GameContext,
    accumulator: f32,
    was_pressed: bool,
    /// Command waiting for the next tick (frames can run zero ticks)
    pending_command: Option<UiCommand>,
}

impl App {
    pub fn new(
        config: GameConfig,
        scores: Box<dyn ScoreStore>,
        localizer: Box<dyn Localizer>,
        seed: u64,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Using default config: {e}");
                GameConfig::default()
            }
        };
        Self {
            scenes: build_scenes(),
            ctx: GameContext::new(config, scores, localizer, seed),
            accumulator: 0.0,
            was_pressed: false,
            pending_command: None,
        }
    }

    /// Show the logo
    pub fn start(&mut self) {
        log::info!("Recursive Runner starting");
        self.scenes.start(&mut self.ctx, SceneId::Logo);
    }

    /// Run simulation ticks for `real_dt` seconds of wall time.
    /// Returns how many ticks ran.
    pub fn frame(&mut self, real_dt: f32, input: FrameInput) -> u32 {
        let dt = real_dt.min(0.1);
        self.accumulator += dt;
        if input.command.is_some() {
            self.pending_command = input.command;
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.ctx.input = InputSnapshot {
                pressed: input.pressed,
                was_pressed: self.was_pressed,
                command: self.pending_command.take(),
            };
            self.scenes.update(&mut self.ctx, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Edges only count on the first tick of a frame
            self.was_pressed = input.pressed;
        }
        substeps
    }

    /// Platform back button
    pub fn back_pressed(&mut self) {
        let Some(target) = self.scenes.current().and_then(SceneId::back_target) else {
            return;
        };
        self.scenes.force_new_state(&mut self.ctx, target);
    }

    pub fn current_scene(&self) -> Option<SceneId> {
        self.scenes.current()
    }

    pub fn scene_phase(&self) -> Option<Phase<SceneId>> {
        self.scenes.phase()
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    /// Simulation events since the last call (render/audio sink)
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.ctx.drain_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::scene::EnglishLocalizer;

    fn app(config: GameConfig) -> App {
        let mut app = App::new(
            config,
            Box::new(HighScores::new()),
            Box::new(EnglishLocalizer::default()),
            7,
        );
        app.start();
        app
    }

    /// Step frames until `scene` is active (commands are only read then)
    fn run_until(app: &mut App, scene: SceneId, input: FrameInput) {
        for _ in 0..10_000 {
            if app.current_scene() == Some(scene) && app.scene_phase() == Some(Phase::Active) {
                return;
            }
            app.frame(SIM_DT, input);
        }
        panic!("never reached {scene:?}");
    }

    fn command(command: UiCommand) -> FrameInput {
        FrameInput {
            command: Some(command),
            ..Default::default()
        }
    }

    #[test]
    fn test_logo_then_menu() {
        let mut app = app(GameConfig::default());
        assert_eq!(app.current_scene(), Some(SceneId::Logo));
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        assert!(app.context().top_scores.is_empty());
    }

    #[test]
    fn test_substeps_capped() {
        let mut app = app(GameConfig::default());
        assert_eq!(app.frame(SIM_DT * 0.5, FrameInput::default()), 0);
        assert_eq!(app.frame(SIM_DT * 0.6, FrameInput::default()), 1);
        let burst = app.frame(5.0, FrameInput::default());
        assert!(burst > 1 && burst <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_full_session_lands_on_board() {
        let config = GameConfig {
            speed_const: 120.0,
            ..Default::default()
        };
        let mut app = app(config);
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        app.frame(SIM_DT, command(UiCommand::Play));
        run_until(&mut app, SceneId::Game, FrameInput::default());
        assert!(app.context().session.is_some());

        run_until(&mut app, SceneId::Menu, FrameInput::default());
        assert!(app.context().session.is_none());
        assert!(app.context().pending_summary.is_none());
        let events = app.drain_events();
        let spawned = events
            .iter()
            .filter(|e| matches!(e, SimEvent::RunSpawned { .. }))
            .count();
        assert_eq!(spawned, 10);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, SimEvent::SessionComplete { .. }))
        );
    }

    #[test]
    fn test_zero_quota_config_plays_with_defaults() {
        let mut app = app(GameConfig {
            runs_per_session: 0,
            ..Default::default()
        });
        assert_eq!(app.context().config, GameConfig::default());
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        app.frame(SIM_DT, command(UiCommand::Play));
        run_until(&mut app, SceneId::Game, FrameInput::default());
        assert_eq!(app.context().session.as_ref().unwrap().quota, RUNS_PER_SESSION);
    }

    #[test]
    fn test_stats_screen_charts_finished_session() {
        let config = GameConfig {
            speed_const: 120.0,
            ..Default::default()
        };
        let mut app = app(config);
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        // Nothing to chart yet
        app.frame(SIM_DT, command(UiCommand::Stats));
        app.frame(SIM_DT, FrameInput::default());
        assert_eq!(app.current_scene(), Some(SceneId::Menu));

        app.frame(SIM_DT, command(UiCommand::Play));
        run_until(&mut app, SceneId::Game, FrameInput::default());
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        app.frame(SIM_DT, command(UiCommand::Stats));
        run_until(&mut app, SceneId::Stats, FrameInput::default());

        let shown = app.context().shown_stats().unwrap();
        assert_eq!(shown.stats.runs.len(), 10);
        assert_eq!(shown.stats.total_points(), shown.score);
        assert!(shown.stats.runs.iter().all(|r| r.lifetime > 0.0));

        app.frame(SIM_DT, command(UiCommand::Back));
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        assert!(app.context().shown_stats().is_none());
    }

    #[test]
    fn test_pause_resume_keeps_session() {
        let mut app = app(GameConfig::default());
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        app.frame(SIM_DT, command(UiCommand::Play));
        run_until(&mut app, SceneId::Game, FrameInput::default());
        for _ in 0..60 {
            app.frame(SIM_DT, FrameInput::default());
        }
        let ticks = app.context().session.as_ref().unwrap().time_ticks;
        assert!(ticks > 0);

        app.frame(SIM_DT, command(UiCommand::Pause));
        run_until(&mut app, SceneId::Pause, FrameInput::default());
        for _ in 0..30 {
            app.frame(SIM_DT, FrameInput::default());
        }
        let paused = app.context().session.as_ref().unwrap().time_ticks;

        app.frame(SIM_DT, command(UiCommand::Resume));
        run_until(&mut app, SceneId::Game, FrameInput::default());
        assert_eq!(app.context().session.as_ref().unwrap().time_ticks, paused);
        // Back from pause there is no fade in
        assert_eq!(app.context().fade, 1.0);
    }

    #[test]
    fn test_back_navigation() {
        let mut app = app(GameConfig::default());
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        app.back_pressed();
        assert_eq!(app.current_scene(), Some(SceneId::Menu));

        app.frame(SIM_DT, command(UiCommand::Play));
        run_until(&mut app, SceneId::Game, FrameInput::default());
        app.frame(SIM_DT, FrameInput::default());
        app.back_pressed();
        assert_eq!(app.current_scene(), Some(SceneId::Pause));
        assert!(app.context().session.is_some());

        // Leaving pause for the menu ends the session and submits it
        app.back_pressed();
        assert_eq!(app.current_scene(), Some(SceneId::Menu));
        assert!(app.context().session.is_none());
        assert!(app.context().pending_summary.is_none());
    }

    #[test]
    fn test_restart_after_finish_keeps_score() {
        let config = GameConfig {
            speed_const: 120.0,
            ..Default::default()
        };
        let mut app = app(config);
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        app.frame(SIM_DT, command(UiCommand::Play));
        run_until(&mut app, SceneId::Game, FrameInput::default());

        let leaving = Some(Phase::PreExit { to: SceneId::Menu });
        for _ in 0..100_000 {
            if app.scene_phase() == leaving {
                break;
            }
            app.frame(SIM_DT, FrameInput::default());
        }
        assert_eq!(app.scene_phase(), leaving);
        assert!(app.context().session_complete());
        app.ctx.session.as_mut().unwrap().score = 1640;

        // Back during the fade out, then restart from the pause screen
        app.back_pressed();
        assert_eq!(app.current_scene(), Some(SceneId::Pause));
        run_until(&mut app, SceneId::Pause, FrameInput::default());
        app.frame(SIM_DT, command(UiCommand::Restart));
        run_until(&mut app, SceneId::Game, FrameInput::default());

        assert!(!app.context().session_complete());
        assert_eq!(app.context().last_rank, Some(1));
        assert_eq!(app.context().top_scores[0].points, 1640);
        assert!(app.context().pending_summary.is_none());
    }

    #[test]
    fn test_restart_starts_fresh_session() {
        let mut app = app(GameConfig::default());
        run_until(&mut app, SceneId::Menu, FrameInput::default());
        app.frame(SIM_DT, command(UiCommand::Play));
        run_until(&mut app, SceneId::Game, FrameInput::default());
        for _ in 0..60 {
            app.frame(SIM_DT, FrameInput::default());
        }
        app.frame(SIM_DT, command(UiCommand::Pause));
        run_until(&mut app, SceneId::Pause, FrameInput::default());
        app.frame(SIM_DT, command(UiCommand::Restart));
        run_until(&mut app, SceneId::Game, FrameInput::default());
        let session = app.context().session.as_ref().unwrap();
        assert!(session.time_ticks < 60);
        assert!(app.context().pending_summary.is_none());
    }
}
