//! Renders a retained, reconciler-built widget tree through an immediate-mode GUI
//! surface, re-issuing every begin/end pair each frame.
//!
//! The host owns a [`Renderer`] and a [`RetainedTree`] and calls
//! [`Renderer::render_frame`] once per frame with its [`NativeUi`] implementation.

mod callback;
mod cleanup;
mod color;
mod config;
mod error;
mod native;
mod props;
mod scratch;
mod shadow;
mod tree;
mod utf8;
mod widgets;

#[cfg(test)]
mod testing;

use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::widgets::{Frame, Parent, render_child};

pub use crate::callback::{
    Callbacks, Handler, HandlerResult, Handlers, NoopScheduler, Priority, QueuedRenders,
    Scheduler, SchedulerError,
};
pub use crate::cleanup::{CleanupStack, Teardown};
pub use crate::color::Rgba;
pub use crate::config::RendererConfig;
pub use crate::error::RenderError;
pub use crate::native::{
    Cond, NativeUi, StyleColor, StyleVar, SurfaceError, SurfaceResult, TextureId, Vec2, Vec4,
    Viewport, window_flags,
};
pub use crate::props::{Props, PropsExt};
pub use crate::scratch::{Scalar, ScalarKind, ScratchArena};
pub use crate::shadow::{CloseLatch, Mode, Resolved, Shadow, ValueShadow};
pub use crate::tree::{Child, NodeId, NodeKind, RetainedTree, SiblingState, TextNode, TreeNode};
pub use serde_json;

/// Receives the duration of every rendered frame.
pub trait MetricsSink {
    fn record_frame(&self, duration: Duration);
}

/// What one `render_frame` call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub duration: Duration,
    /// Top-level `root` nodes seen; more than one is rendered but logged.
    pub roots: usize,
    /// Bytes handed out by the scratch arena during the frame.
    pub scratch_bytes: usize,
}

impl FrameReport {
    pub fn millis(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Per-frame machinery: the cleanup stack, the scratch arena, limits and the host's
/// scheduler. Node state lives in the tree, so one renderer can draw several trees.
pub struct Renderer {
    cleanup: CleanupStack,
    scratch: ScratchArena,
    config: RendererConfig,
    scheduler: Rc<dyn Scheduler>,
    metrics: Option<Box<dyn MetricsSink>>,
    last_frame_ms: Option<f64>,
    docking_warned: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("cleanup", &self.cleanup)
            .field("config", &self.config)
            .field("last_frame_ms", &self.last_frame_ms)
            .field("docking_warned", &self.docking_warned)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_config(RendererConfig::default())
    }

    pub fn with_config(config: RendererConfig) -> Self {
        Self {
            cleanup: CleanupStack::default(),
            scratch: ScratchArena::with_capacity(config.scratch_capacity),
            config,
            scheduler: Rc::new(NoopScheduler),
            metrics: None,
            last_frame_ms: None,
            docking_warned: false,
        }
    }

    pub fn with_scheduler(mut self, scheduler: Rc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_metrics(mut self, metrics: Box<dyn MetricsSink>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Duration of the last frame, successful or not.
    pub fn last_frame_ms(&self) -> Option<f64> {
        self.last_frame_ms
    }

    /// Whether a `dockspace` has been skipped for lack of docking support.
    pub fn docking_warned(&self) -> bool {
        self.docking_warned
    }

    pub fn peak_scratch_bytes(&self) -> usize {
        self.scratch.peak_frame_bytes()
    }

    /// Renders every top-level child of `tree`. On a native failure, every pending
    /// teardown has run by the time the error is returned.
    pub fn render_frame<U: NativeUi + ?Sized>(
        &mut self,
        ui: &mut U,
        tree: &mut RetainedTree,
    ) -> Result<FrameReport, RenderError> {
        let started = Instant::now();
        self.cleanup.ensure_reset(ui);

        let roots = tree
            .root_children
            .iter()
            .filter(|child| matches!(child, Child::Node(node) if node.kind == NodeKind::Root))
            .count();
        if roots > 1 {
            tracing::warn!(roots, "multiple <root> nodes; rendering all of them");
        }

        let outcome = self.traverse(ui, tree);
        let report = FrameReport {
            duration: started.elapsed(),
            roots,
            scratch_bytes: self.scratch.frame_bytes(),
        };
        self.scratch.reset();
        self.last_frame_ms = Some(report.millis());
        if let Some(metrics) = &self.metrics {
            metrics.record_frame(report.duration);
        }

        match outcome {
            Ok(()) => {
                tracing::debug!(
                    ms = report.millis(),
                    scratch_bytes = report.scratch_bytes,
                    "frame rendered"
                );
                Ok(report)
            }
            Err(err) => {
                tracing::error!(node = ?err.node(), "frame aborted: {err}");
                Err(err)
            }
        }
    }

    fn traverse<U: NativeUi + ?Sized>(
        &mut self,
        ui: &mut U,
        tree: &mut RetainedTree,
    ) -> Result<(), RenderError> {
        let Self {
            cleanup,
            scratch,
            config,
            scheduler,
            docking_warned,
            ..
        } = self;
        let mut frame = Frame {
            ui,
            cleanup,
            scratch,
            config,
            callbacks: Callbacks::new(scheduler.as_ref()),
            docking_warned,
        };

        let RetainedTree {
            root_children,
            scope,
        } = tree;
        let mut parent = Parent {
            id: None,
            siblings: scope,
        };

        let mut outcome = Ok(());
        for child in root_children.iter_mut() {
            if let Err(err) = render_child(&mut frame, child, &mut parent) {
                outcome = Err(err);
                break;
            }
        }
        frame.unwind_to(0);
        outcome
    }
}
