//! Timed tween spans
//!
//! A [`Tween`] binds an easing curve and lifecycle callbacks to an absolute
//! time window. The host sweeps a clock through the window by calling
//! [`Tween::update`]: start callbacks fire once per forward pass entering the
//! window, run callbacks fire with eased progress on every changed
//! evaluation, and end callbacks fire when raw progress reaches exactly 1.
//!
//! Time does not have to move forward. A clock value that maps to a lower
//! progress than the previous evaluation re-arms the start boundary, so
//! scrubbing backward and forward replays start semantics deterministically.

use smallvec::SmallVec;

/// Callback invoked with eased progress on every changed evaluation
pub type TickCallback = Box<dyn FnMut(f64)>;

/// Callback invoked at a start or end boundary
pub type EdgeCallback = Box<dyn FnMut()>;

/// What a single evaluation did to a lifecycle.
#[derive(Clone, Copy)]
pub(crate) struct Edge {
    pub(crate) starting: bool,
    pub(crate) ending: bool,
}

/// Start/end bookkeeping shared by tweens and timeline sequences.
///
/// Three states: unarmed (no evaluation yet, or last evaluation rewound),
/// running (started fired, progress below 1), completed (progress hit 1).
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Lifecycle {
    last_t: Option<f64>,
    has_started: bool,
}

impl Lifecycle {
    /// Advance to a new progress value.
    ///
    /// Returns `None` when the evaluation is silent: either `t` is unchanged
    /// (a paused clock), or `t` moved strictly backward. A backward move
    /// still records `t` and re-arms the start boundary, so the next forward
    /// evaluation reports `starting` again.
    pub(crate) fn advance(&mut self, t: f64) -> Option<Edge> {
        if self.last_t == Some(t) {
            return None;
        }
        if self.last_t.is_some_and(|last| last > t) {
            self.last_t = Some(t);
            self.has_started = false;
            return None;
        }
        self.last_t = Some(t);
        let starting = !self.has_started;
        self.has_started = true;
        Some(Edge {
            starting,
            ending: t == 1.0,
        })
    }

    /// True iff the last recorded progress is exactly 1.
    pub(crate) fn has_ended(&self) -> bool {
        self.last_t == Some(1.0)
    }

    pub(crate) fn last_progress(&self) -> Option<f64> {
        self.last_t
    }
}

/// A single timed animation span bound to an absolute time window.
pub struct Tween {
    start_time: f64,
    end_time: f64,
    easing: Box<dyn Fn(f64) -> f64>,
    lifecycle: Lifecycle,
    start_callbacks: SmallVec<[EdgeCallback; 2]>,
    run_callbacks: SmallVec<[TickCallback; 2]>,
    end_callbacks: SmallVec<[EdgeCallback; 2]>,
}

impl Tween {
    /// Create a tween spanning `[start_time, start_time + duration]`.
    ///
    /// `duration` must be positive. A zero or negative duration is not
    /// rejected; progress then degenerates through IEEE division (infinite
    /// or NaN) rather than producing anything meaningful.
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            start_time,
            end_time: start_time + duration,
            easing: Box::new(|t| t),
            lifecycle: Lifecycle::default(),
            start_callbacks: SmallVec::new(),
            run_callbacks: SmallVec::new(),
            end_callbacks: SmallVec::new(),
        }
    }

    /// Replace the easing curve (identity by default).
    ///
    /// Any `Fn(f64) -> f64` qualifies; the output may leave `[0, 1]` for
    /// overshooting curves.
    pub fn easing(&mut self, func: impl Fn(f64) -> f64 + 'static) -> &mut Self {
        self.easing = Box::new(func);
        self
    }

    /// Register a callback fired once per forward pass entering the window.
    ///
    /// Registrations accumulate and fire in registration order.
    pub fn on_start(&mut self, func: impl FnMut() + 'static) -> &mut Self {
        self.start_callbacks.push(Box::new(func));
        self
    }

    /// Register a callback fired with eased progress on every changed
    /// evaluation.
    pub fn run(&mut self, func: impl FnMut(f64) + 'static) -> &mut Self {
        self.run_callbacks.push(Box::new(func));
        self
    }

    /// Register a callback fired when raw progress reaches exactly 1.
    pub fn on_end(&mut self, func: impl FnMut() + 'static) -> &mut Self {
        self.end_callbacks.push(Box::new(func));
        self
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// True iff the last evaluation reached raw progress 1.
    pub fn has_ended(&self) -> bool {
        self.lifecycle.has_ended()
    }

    /// Last evaluated raw progress, if the tween has been evaluated at all.
    pub fn progress(&self) -> Option<f64> {
        self.lifecycle.last_progress()
    }

    /// Evaluate the tween at an absolute clock value.
    ///
    /// Progress is `(time - start) / (end - start)` clamped to `[0, 1]`;
    /// an unchanged progress makes the call a no-op. Within one call the
    /// order is start callbacks, run callbacks, end callbacks.
    pub fn update(&mut self, time: f64) {
        let t = ((time - self.start_time) / (self.end_time - self.start_time)).clamp(0.0, 1.0);
        let Some(edge) = self.lifecycle.advance(t) else {
            return;
        };

        if edge.starting {
            for func in &mut self.start_callbacks {
                func();
            }
        }

        let eased = (self.easing)(t);
        for func in &mut self.run_callbacks {
            func(eased);
        }

        if edge.ending {
            for func in &mut self.end_callbacks {
                func();
            }
        }
    }
}
