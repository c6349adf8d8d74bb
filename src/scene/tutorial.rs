//! Scripted first session
//!
//! A second [`StateMachine`] runs over tutorial steps. Each step lets the
//! corridor play (player input off) until its enter condition holds, shows
//! its text, then waits for a tap. Leaving a step may fire a scripted jump.

use glam::Vec2;

use super::context::Arrow;
use super::machine::{SceneHandler, StateMachine};
use super::{GameContext, SceneId};
use crate::consts::MAX_JUMP_DURATION;
use crate::settings::{EliminationPolicy, GameConfig};
use crate::sim::{Session, record_jump};

/// Fixed course so the script always plays out the same
const TUTORIAL_SEED: u64 = 0x7u64;

/// Shown while a step's exit action plays out
const WAIT_TEXT: &str = ". . .";

/// The script's x positions assume this corridor, whatever the player's
/// config says; only the name carries over
fn tutorial_config(user: &GameConfig) -> GameConfig {
    GameConfig {
        echo_restart_delay: 0.0,
        elimination_policy: EliminationPolicy::AnyOpposing,
        player_name: user.player_name.clone(),
        ..GameConfig::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TutorialStepId {
    Title,
    IntroduceHero,
    SmallJump,
    ScorePoints,
    BigJump,
    RunTilTheEdge,
    NewHero,
    MeetYourself,
    AvoidYourself,
    BestScore,
    TheEnd,
    Finished,
}

impl TutorialStepId {
    pub const ALL: [TutorialStepId; 12] = [
        TutorialStepId::Title,
        TutorialStepId::IntroduceHero,
        TutorialStepId::SmallJump,
        TutorialStepId::ScorePoints,
        TutorialStepId::BigJump,
        TutorialStepId::RunTilTheEdge,
        TutorialStepId::NewHero,
        TutorialStepId::MeetYourself,
        TutorialStepId::AvoidYourself,
        TutorialStepId::BestScore,
        TutorialStepId::TheEnd,
        TutorialStepId::Finished,
    ];

    /// Step after this one; `Finished` is terminal
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&s| s == self).unwrap_or(Self::ALL.len() - 1);
        Self::ALL[(i + 1).min(Self::ALL.len() - 1)]
    }
}

/// What must be true on the corridor before a step shows up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnterCondition {
    Always,
    /// Live run at or right of x
    LiveAtLeast(f32),
    /// Live run left of x
    LiveBelow(f32),
    LiveFalling,
    /// Exactly two runs and the second one at or left of x
    SecondRunAtMost(f32),
    /// First two runs closer than this
    RunsCloserThan(f32),
}

impl EnterCondition {
    pub fn holds(&self, session: &Session) -> bool {
        let live = session.live_run();
        match *self {
            EnterCondition::Always => true,
            EnterCondition::LiveAtLeast(x) => live.is_some_and(|r| r.pos.x >= x),
            EnterCondition::LiveBelow(x) => live.is_some_and(|r| r.pos.x < x),
            EnterCondition::LiveFalling => live.is_some_and(|r| r.vel_y < 0.0),
            EnterCondition::SecondRunAtMost(x) => {
                session.runs.len() == 2 && session.runs[1].pos.x <= x
            }
            EnterCondition::RunsCloserThan(d) => {
                session.runs.len() >= 2 && session.runs[0].pos.distance(session.runs[1].pos) < d
            }
        }
    }
}

/// Done on the way out of a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitAction {
    None,
    /// Live run jumps, held for this long
    Jump(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TutorialStep {
    pub id: TutorialStepId,
    pub enter: EnterCondition,
    pub text_id: &'static str,
    pub exit: ExitAction,
    pub arrow: Option<Arrow>,
}

impl TutorialStep {
    fn new(id: TutorialStepId, enter: EnterCondition, text_id: &'static str) -> Self {
        Self {
            id,
            enter,
            text_id,
            exit: ExitAction::None,
            arrow: None,
        }
    }

    fn exit(mut self, action: ExitAction) -> Self {
        self.exit = action;
        self
    }

    fn arrow(mut self, run: usize, offset: Vec2) -> Self {
        self.arrow = Some(Arrow { run, offset });
        self
    }
}

/// The whole script, in order
pub fn tutorial_steps() -> Vec<TutorialStep> {
    use EnterCondition::*;
    use TutorialStepId::*;

    vec![
        TutorialStep::new(Title, Always, "tutorial.title"),
        TutorialStep::new(IntroduceHero, LiveAtLeast(-23.0), "tutorial.hero")
            .arrow(0, Vec2::new(0.5, 1.0)),
        TutorialStep::new(SmallJump, LiveAtLeast(-15.0), "tutorial.small_jump")
            .exit(ExitAction::Jump(0.06)),
        TutorialStep::new(ScorePoints, LiveFalling, "tutorial.score"),
        TutorialStep::new(BigJump, LiveAtLeast(0.0), "tutorial.big_jump")
            .exit(ExitAction::Jump(MAX_JUMP_DURATION)),
        TutorialStep::new(RunTilTheEdge, LiveAtLeast(29.0), "tutorial.edge"),
        TutorialStep::new(NewHero, SecondRunAtMost(29.0), "tutorial.new_hero")
            .arrow(1, Vec2::new(-0.5, 1.0)),
        TutorialStep::new(MeetYourself, RunsCloserThan(14.0), "tutorial.meet")
            .arrow(0, Vec2::new(0.5, 1.0)),
        TutorialStep::new(AvoidYourself, RunsCloserThan(4.0), "tutorial.avoid")
            .exit(ExitAction::Jump(0.8 * MAX_JUMP_DURATION)),
        TutorialStep::new(BestScore, LiveBelow(-15.0), "tutorial.best_score"),
        TutorialStep::new(TheEnd, LiveBelow(-29.0), "tutorial.end"),
        TutorialStep::new(Finished, Always, ""),
    ]
}

impl SceneHandler<TutorialStepId, GameContext> for TutorialStep {
    /// Let the corridor run until the step's moment comes
    fn update_pre_enter(
        &mut self,
        ctx: &mut GameContext,
        _from: TutorialStepId,
        dt: f32,
    ) -> bool {
        let Some(session) = ctx.session.as_ref() else {
            return true;
        };
        if self.enter.holds(session) {
            return true;
        }
        ctx.step_session(dt);
        ctx.session.as_ref().is_none_or(|s| self.enter.holds(s))
    }

    fn on_enter(&mut self, ctx: &mut GameContext, _from: TutorialStepId) {
        ctx.overlay.text = if self.text_id.is_empty() {
            String::new()
        } else {
            ctx.localizer.text(self.text_id)
        };
        ctx.overlay.arrow = self.arrow;
        log::debug!("Tutorial step {:?}", self.id);
    }

    fn update(&mut self, ctx: &mut GameContext, _dt: f32) -> TutorialStepId {
        if self.id != TutorialStepId::Finished && ctx.input.clicked() {
            self.id.next()
        } else {
            self.id
        }
    }

    fn on_pre_exit(&mut self, ctx: &mut GameContext, _to: TutorialStepId) {
        ctx.overlay.text = WAIT_TEXT.to_string();
        ctx.overlay.arrow = None;
        if let ExitAction::Jump(duration) = self.exit
            && let Some(live) = ctx.session.as_mut().and_then(Session::live_run_mut)
            && !record_jump(live, duration)
        {
            log::debug!("Tutorial jump skipped, run {} is airborne", live.index);
        }
    }
}

/// Game scene on rails
#[derive(Default)]
pub struct TutorialScene {
    steps: StateMachine<TutorialStepId, GameContext>,
}

impl TutorialScene {
    fn build_steps() -> StateMachine<TutorialStepId, GameContext> {
        let mut steps = StateMachine::new();
        for step in tutorial_steps() {
            steps.register(step.id, Box::new(step));
        }
        steps
    }

    pub fn current_step(&self) -> Option<TutorialStepId> {
        self.steps.current()
    }
}

impl SceneHandler<SceneId, GameContext> for TutorialScene {
    fn on_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId) {
        let config = tutorial_config(&ctx.config);
        ctx.start_session_with(&config, TUTORIAL_SEED).input_enabled = false;
        ctx.fade = 0.0;
        ctx.overlay.clear();
        self.steps = Self::build_steps();
        self.steps.start(ctx, TutorialStepId::Title);
    }

    fn update_pre_enter(&mut self, ctx: &mut GameContext, _from: SceneId, dt: f32) -> bool {
        ctx.fade_towards(1.0, dt)
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32) -> SceneId {
        self.steps.update(ctx, dt);
        if self.steps.current() == Some(TutorialStepId::Finished) {
            SceneId::Menu
        } else {
            SceneId::Tutorial
        }
    }

    fn update_pre_exit(&mut self, ctx: &mut GameContext, _to: SceneId, dt: f32) -> bool {
        ctx.fade_towards(0.0, dt)
    }

    fn on_exit(&mut self, ctx: &mut GameContext, _to: SceneId) {
        ctx.discard_session();
        ctx.overlay.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::scene::InputSnapshot;

    #[test]
    fn test_step_order() {
        let ids: Vec<_> = tutorial_steps().iter().map(|s| s.id).collect();
        assert_eq!(ids, TutorialStepId::ALL.to_vec());
        assert_eq!(TutorialStepId::Title.next(), TutorialStepId::IntroduceHero);
        assert_eq!(TutorialStepId::Finished.next(), TutorialStepId::Finished);
    }

    #[test]
    fn test_conditions() {
        let config = GameConfig::default();
        let mut session = Session::start(&config, 1);
        assert!(EnterCondition::Always.holds(&session));
        assert!(!EnterCondition::LiveAtLeast(-23.0).holds(&session));
        session.runs[0].pos.x = -20.0;
        assert!(EnterCondition::LiveAtLeast(-23.0).holds(&session));
        assert!(!EnterCondition::LiveFalling.holds(&session));
        assert!(!EnterCondition::RunsCloserThan(14.0).holds(&session));
        assert!(!EnterCondition::SecondRunAtMost(29.0).holds(&session));

        session.on_run_finished(0);
        session.runs[1].pos.x = 28.0;
        assert!(EnterCondition::SecondRunAtMost(29.0).holds(&session));
        session.runs[0].pos.x = 20.0;
        assert!(EnterCondition::RunsCloserThan(14.0).holds(&session));
        assert!(!EnterCondition::RunsCloserThan(4.0).holds(&session));
    }

    /// Tap every other tick until the tutorial leaves; returns where it went
    /// and every step text shown
    fn play_through(ctx: &mut GameContext, scene: &mut TutorialScene) -> (SceneId, Vec<String>) {
        scene.on_pre_enter(ctx, SceneId::Menu);
        while !scene.update_pre_enter(ctx, SceneId::Menu, SIM_DT) {}
        scene.on_enter(ctx, SceneId::Menu);

        let mut texts: Vec<String> = Vec::new();
        let mut next = SceneId::Tutorial;
        for t in 0..200_000u32 {
            ctx.input = InputSnapshot {
                pressed: t % 2 == 0,
                was_pressed: t % 2 == 1,
                ..Default::default()
            };
            next = scene.update(ctx, SIM_DT);
            let text = &ctx.overlay.text;
            if !text.is_empty() && text != WAIT_TEXT && texts.last() != Some(text) {
                texts.push(text.clone());
            }
            if next != SceneId::Tutorial {
                break;
            }
        }
        (next, texts)
    }

    #[test]
    fn test_tutorial_ignores_player_tuning() {
        let mut ctx = GameContext::for_tests();
        ctx.config = GameConfig {
            runs_per_session: 1,
            speed_coeff: 3.0,
            coins_per_course: 2,
            elimination_policy: EliminationPolicy::LiveKillable,
            player_name: "zed".into(),
            ..Default::default()
        };
        let mut scene = TutorialScene::default();
        let (next, texts) = play_through(&mut ctx, &mut scene);
        assert_eq!(next, SceneId::Menu);
        assert_eq!(texts.len(), 11);
    }

    #[test]
    fn test_tutorial_config_keeps_only_the_name() {
        let user = GameConfig {
            runs_per_session: 1,
            player_name: "zed".into(),
            ..Default::default()
        };
        let config = tutorial_config(&user);
        assert_eq!(config.runs_per_session, GameConfig::default().runs_per_session);
        assert_eq!(config.player_name, "zed");
        assert_eq!(config.echo_restart_delay, 0.0);
        assert_eq!(config.elimination_policy, EliminationPolicy::AnyOpposing);
    }

    #[test]
    fn test_tutorial_plays_through_to_menu() {
        let mut ctx = GameContext::for_tests();
        let mut scene = TutorialScene::default();
        let (next, texts) = play_through(&mut ctx, &mut scene);
        assert_eq!(next, SceneId::Menu);
        assert_eq!(texts.len(), 11);
        assert_eq!(texts[0], "How to play? (tap to continue)");
        assert_eq!(texts[10], "Good luck!");

        scene.on_exit(&mut ctx, SceneId::Menu);
        assert!(ctx.session.is_none());
        assert!(ctx.pending_summary.is_none());
    }

    #[test]
    fn test_no_tap_holds_the_step() {
        let mut ctx = GameContext::for_tests();
        let mut scene = TutorialScene::default();
        scene.on_pre_enter(&mut ctx, SceneId::Menu);
        for _ in 0..600 {
            scene.update(&mut ctx, SIM_DT);
        }
        assert_eq!(scene.current_step(), Some(TutorialStepId::Title));
        assert_eq!(ctx.overlay.text, "How to play? (tap to continue)");
        assert_eq!(ctx.session.as_ref().unwrap().time_ticks, 0);
        assert!(!ctx.session.as_ref().unwrap().input_enabled);
    }
}
