//! Phased state machine
//!
//! Each state goes through pre-enter (an animation that runs until it says
//! it's done), active, and pre-exit. A change requested by `update` starts
//! the pre-exit on the following tick. The machine only sequences calls; all
//! game data lives in the context `C` handed to every hook.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Lifecycle hooks of one state. Everything but `update` defaults to a no-op
/// that finishes immediately.
pub trait SceneHandler<S, C> {
    fn on_pre_enter(&mut self, _ctx: &mut C, _from: S) {}

    /// Called every tick while entering; return true once done
    fn update_pre_enter(&mut self, _ctx: &mut C, _from: S, _dt: f32) -> bool {
        true
    }

    fn on_enter(&mut self, _ctx: &mut C, _from: S) {}

    /// Returns the state to go to; returning the current id means stay
    fn update(&mut self, ctx: &mut C, dt: f32) -> S;

    fn on_pre_exit(&mut self, _ctx: &mut C, _to: S) {}

    /// Called every tick while leaving; return true once done
    fn update_pre_exit(&mut self, _ctx: &mut C, _to: S, _dt: f32) -> bool {
        true
    }

    fn on_exit(&mut self, _ctx: &mut C, _to: S) {}
}

/// Where the current state is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase<S> {
    PreEnter { from: S },
    Active,
    PreExit { to: S },
}

pub struct StateMachine<S, C> {
    handlers: HashMap<S, Box<dyn SceneHandler<S, C>>>,
    current: Option<S>,
    phase: Option<Phase<S>>,
}

impl<S, C> Default for StateMachine<S, C>
where
    S: Copy + Eq + Hash + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C> StateMachine<S, C>
where
    S: Copy + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            current: None,
            phase: None,
        }
    }

    /// Register the handler for `id`. Panics if `id` is already registered.
    pub fn register(&mut self, id: S, handler: Box<dyn SceneHandler<S, C>>) {
        assert!(
            !self.handlers.contains_key(&id),
            "state {id:?} registered twice"
        );
        self.handlers.insert(id, handler);
    }

    pub fn is_registered(&self, id: S) -> bool {
        self.handlers.contains_key(&id)
    }

    pub fn current(&self) -> Option<S> {
        self.current
    }

    pub fn phase(&self) -> Option<Phase<S>> {
        self.phase
    }

    /// Enter `initial`; it sees itself as the previous state
    pub fn start(&mut self, ctx: &mut C, initial: S) {
        self.begin_enter(ctx, initial, initial);
    }

    /// Advance the current state by one tick. Panics if [`start`](Self::start)
    /// was never called.
    pub fn update(&mut self, ctx: &mut C, dt: f32) {
        let (Some(current), Some(phase)) = (self.current, self.phase) else {
            panic!("state machine updated before start");
        };

        match phase {
            Phase::PreEnter { from } => {
                let handler = handler_mut(&mut self.handlers, current);
                if handler.update_pre_enter(ctx, from, dt) {
                    handler.on_enter(ctx, from);
                    self.phase = Some(Phase::Active);
                }
            }
            Phase::Active => {
                let next = handler_mut(&mut self.handlers, current).update(ctx, dt);
                if next != current {
                    assert!(self.is_registered(next), "unknown state {next:?}");
                    log::debug!("{current:?} -> {next:?}");
                    handler_mut(&mut self.handlers, current).on_pre_exit(ctx, next);
                    self.phase = Some(Phase::PreExit { to: next });
                }
            }
            Phase::PreExit { to } => {
                let handler = handler_mut(&mut self.handlers, current);
                if handler.update_pre_exit(ctx, to, dt) {
                    handler.on_exit(ctx, to);
                    self.begin_enter(ctx, to, current);
                }
            }
        }
    }

    /// Jump to `id` right away: no pre-exit, but the current state still
    /// gets its `on_exit`.
    pub fn force_new_state(&mut self, ctx: &mut C, id: S) {
        let Some(current) = self.current else {
            panic!("state machine forced to {id:?} before start");
        };
        assert!(self.is_registered(id), "unknown state {id:?}");
        log::debug!("{current:?} -> {id:?} (forced)");
        handler_mut(&mut self.handlers, current).on_exit(ctx, id);
        self.begin_enter(ctx, id, current);
    }

    fn begin_enter(&mut self, ctx: &mut C, id: S, from: S) {
        let handler = handler_mut(&mut self.handlers, id);
        self.current = Some(id);
        self.phase = Some(Phase::PreEnter { from });
        handler.on_pre_enter(ctx, from);
    }
}

fn handler_mut<S, C>(
    handlers: &mut HashMap<S, Box<dyn SceneHandler<S, C>>>,
    id: S,
) -> &mut Box<dyn SceneHandler<S, C>>
where
    S: Eq + Hash + Debug,
{
    match handlers.get_mut(&id) {
        Some(handler) => handler,
        None => panic!("unknown state {id:?}"),
    }
}
