use serde_json::Value;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

/// A callback supplied by the retained tree, e.g. `onChange`.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&[Value]) -> HandlerResult>);

impl Handler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&[Value]) -> HandlerResult + 'static,
    {
        Self(Rc::new(handler))
    }

    pub fn call(&self, args: &[Value]) -> HandlerResult {
        (self.0)(args)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Handlers(HashMap<String, Handler>);

impl Handlers {
    pub fn insert(&mut self, name: impl Into<String>, handler: Handler) {
        self.0.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("host has no deferred render primitive")]
    NoDeferral,
    #[error("render failed: {0}")]
    Render(String),
}

/// The host's update batching and re-render hooks.
///
/// Every method has a direct default, so a host only overrides what it has.
pub trait Scheduler {
    /// Runs `update` and flushes its effects before returning.
    fn flush_sync(&self, update: &mut dyn FnMut()) {
        update();
    }

    /// Runs `update` as a discrete user event.
    fn discrete_update(&self, update: &mut dyn FnMut()) {
        update();
    }

    /// Whether anything can re-render the retained tree after a callback.
    fn has_render_target(&self) -> bool {
        false
    }

    fn schedule_render(&self) -> Result<(), SchedulerError> {
        Err(SchedulerError::NoDeferral)
    }

    fn render_now(&self) -> Result<(), SchedulerError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl Scheduler for NoopScheduler {}

/// Counts deferred render requests for a host loop that polls between frames.
#[derive(Debug, Default)]
pub struct QueuedRenders {
    pending: Cell<u32>,
}

impl QueuedRenders {
    pub fn pending(&self) -> u32 {
        self.pending.get()
    }

    /// Returns and clears the number of requested renders.
    pub fn take(&self) -> u32 {
        self.pending.replace(0)
    }
}

impl Scheduler for QueuedRenders {
    fn has_render_target(&self) -> bool {
        true
    }

    fn schedule_render(&self) -> Result<(), SchedulerError> {
        self.pending.set(self.pending.get().saturating_add(1));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Direct user input: clicks, edits, selections.
    Discrete,
    /// Lifecycle notifications: window state, close, toggle.
    Sync,
}

/// Invokes tree callbacks during a frame without letting their errors escape.
#[derive(Clone, Copy)]
pub struct Callbacks<'a> {
    scheduler: &'a dyn Scheduler,
}

impl<'a> Callbacks<'a> {
    pub fn new(scheduler: &'a dyn Scheduler) -> Self {
        Self { scheduler }
    }

    /// Fires a user-input callback. Returns whether a handler ran successfully.
    pub fn fire(&self, handlers: &Handlers, name: &str, args: &[Value]) -> bool {
        self.dispatch(handlers, name, args, Priority::Discrete)
    }

    /// Fires a lifecycle callback.
    pub fn notify(&self, handlers: &Handlers, name: &str, args: &[Value]) -> bool {
        self.dispatch(handlers, name, args, Priority::Sync)
    }

    pub fn dispatch(
        &self,
        handlers: &Handlers,
        name: &str,
        args: &[Value],
        priority: Priority,
    ) -> bool {
        let Some(handler) = handlers.get(name) else {
            return false;
        };

        let mut outcome = None;
        let mut run = || outcome = Some(handler.call(args));
        match priority {
            Priority::Discrete => self.scheduler.discrete_update(&mut run),
            Priority::Sync => self.scheduler.flush_sync(&mut run),
        }

        match outcome {
            Some(Ok(())) => {}
            Some(Err(err)) => {
                tracing::error!(callback = name, "error in callback: {err}");
                return false;
            }
            None => return false,
        }

        if self.scheduler.has_render_target() {
            self.request_render();
        }

        true
    }

    fn request_render(&self) {
        match self.scheduler.schedule_render() {
            Ok(()) => {}
            Err(SchedulerError::NoDeferral) => {
                if let Err(err) = self.scheduler.render_now() {
                    tracing::error!("error re-rendering after callback: {err}");
                }
            }
            Err(err) => tracing::error!("failed to schedule re-render: {err}"),
        }
    }
}

impl fmt::Debug for Callbacks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}
