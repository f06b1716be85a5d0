//! Tween timeline orchestration
//!
//! A [`Timeline`] owns a set of [`Tween`]s and maps one absolute clock onto
//! all of them. It is populated declaratively through [`Timeline::build`],
//! which hands the builder closure a [`Sequence`] scope:
//!
//! ```
//! use pulse_animation::{easing, Timeline};
//!
//! let mut timeline = Timeline::build(|seq| {
//!     let intro = seq.on(0.0, 10.0).easing(easing::cubic_out).run(|_t| {}).id();
//!     seq.then(0.0, 5.0).run(|_t| {});
//!     let mut outro = seq.chain(&[intro]);
//!     outro.then(2.0, 4.0).run(|_t| {});
//! });
//!
//! timeline.update(7.5);
//! ```
//!
//! Every appended tween lands in its own sequence's dispatch list and in
//! every ancestor's, so one `update` call on the root reaches every leaf
//! without recursing through sequence objects.

use crate::tween::{Edge, EdgeCallback, Lifecycle, Tween};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a tween owned by a [`Timeline`]
    pub struct TweenId;
}

/// Bookkeeping for one (sub)sequence: span cursor, dispatch list, lifecycle.
struct SequenceContext {
    /// Running "current end of timeline" cursor; doubles as the sequence
    /// duration once building is done.
    offset: f64,
    /// Every tween reachable from this sequence, in append order.
    tweens: Vec<TweenId>,
    /// Parent context, for propagating appends up the chain.
    parent: Option<usize>,
    lifecycle: Lifecycle,
    start_callbacks: SmallVec<[EdgeCallback; 2]>,
    end_callbacks: SmallVec<[EdgeCallback; 2]>,
}

impl SequenceContext {
    fn new(offset: f64, parent: Option<usize>) -> Self {
        Self {
            offset,
            tweens: Vec::new(),
            parent,
            lifecycle: Lifecycle::default(),
            start_callbacks: SmallVec::new(),
            end_callbacks: SmallVec::new(),
        }
    }

    /// Aggregate progress at an absolute clock value.
    ///
    /// Sequences are anchored at the timeline origin: progress is
    /// `time / offset`, not relative to the first tween's start. An empty
    /// sequence has no span and counts as instantly complete.
    fn progress_at(&self, time: f64) -> f64 {
        if self.offset > 0.0 {
            (time / self.offset).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// A composable timeline of tweens and nested sequences.
///
/// The timeline is the sole owner of every tween appended through any of its
/// sequences; nested sequences hold only id lists into the shared arena.
pub struct Timeline {
    tweens: SlotMap<TweenId, Tween>,
    contexts: Vec<SequenceContext>,
}

impl Timeline {
    /// Construct a timeline by running a builder closure over the root
    /// sequence.
    ///
    /// The closure runs exactly once, synchronously; the populated timeline
    /// is then driven by repeated [`Timeline::update`] calls.
    pub fn build(dsl: impl FnOnce(&mut Sequence)) -> Self {
        let mut timeline = Self {
            tweens: SlotMap::with_key(),
            contexts: vec![SequenceContext::new(0.0, None)],
        };
        let mut root = Sequence {
            timeline: &mut timeline,
            ctx: 0,
        };
        dsl(&mut root);
        timeline
    }

    /// Register a start callback on the root sequence.
    pub fn on_start(&mut self, func: impl FnMut() + 'static) -> &mut Self {
        self.contexts[0].start_callbacks.push(Box::new(func));
        self
    }

    /// Register an end callback on the root sequence.
    pub fn on_end(&mut self, func: impl FnMut() + 'static) -> &mut Self {
        self.contexts[0].end_callbacks.push(Box::new(func));
        self
    }

    /// Total span of the timeline: the root sequence's offset cursor.
    pub fn duration(&self) -> f64 {
        self.contexts[0].offset
    }

    /// True iff the root sequence's last evaluation reached progress 1.
    pub fn has_ended(&self) -> bool {
        self.contexts[0].lifecycle.has_ended()
    }

    /// Root sequence progress from the last evaluation, if any.
    pub fn progress(&self) -> Option<f64> {
        self.contexts[0].lifecycle.last_progress()
    }

    pub fn tween(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(id)
    }

    pub fn tween_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.get_mut(id)
    }

    /// Number of tweens owned by this timeline.
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// Evaluate the whole timeline at an absolute clock value.
    ///
    /// Order within one call: the root's start edge, every tween in append
    /// order (each runs its own start/run/end callbacks), the root's end
    /// edge, then each nested sequence's own start/end edges in creation
    /// order. Tweens derive their own window progress from the same
    /// absolute `time`; nothing is re-normalized for nesting.
    pub fn update(&mut self, time: f64) {
        let root_edge = self.advance_lifecycle(0, time);

        if let Some(edge) = root_edge {
            if edge.starting {
                tracing::trace!("timeline started (duration {})", self.contexts[0].offset);
                for func in &mut self.contexts[0].start_callbacks {
                    func();
                }
            }
        }

        for i in 0..self.contexts[0].tweens.len() {
            let id = self.contexts[0].tweens[i];
            if let Some(tween) = self.tweens.get_mut(id) {
                tween.update(time);
            }
        }

        if let Some(edge) = root_edge {
            if edge.ending {
                tracing::trace!("timeline ended");
                for func in &mut self.contexts[0].end_callbacks {
                    func();
                }
            }
        }

        // Nested sequences only evaluate their own lifecycle here; their
        // tweens are already in the root's dispatch list.
        for i in 1..self.contexts.len() {
            let Some(edge) = self.advance_lifecycle(i, time) else {
                continue;
            };
            if edge.starting {
                for func in &mut self.contexts[i].start_callbacks {
                    func();
                }
            }
            if edge.ending {
                for func in &mut self.contexts[i].end_callbacks {
                    func();
                }
            }
        }
    }

    fn advance_lifecycle(&mut self, ctx: usize, time: f64) -> Option<Edge> {
        let context = &mut self.contexts[ctx];
        let t = context.progress_at(time);
        context.lifecycle.advance(t)
    }
}

/// Builder scope over one (sub)sequence of a [`Timeline`].
///
/// The root scope is handed to the [`Timeline::build`] closure; nested
/// scopes come from [`Sequence::chain`].
pub struct Sequence<'a> {
    timeline: &'a mut Timeline,
    ctx: usize,
}

impl Sequence<'_> {
    /// Append a tween at an absolute `offset` within the timeline, spanning
    /// `[offset, offset + duration]`.
    pub fn on(&mut self, offset: f64, duration: f64) -> TweenRef<'_> {
        self.append(Tween::new(offset, duration))
    }

    /// Append a tween starting `offset` after everything placed so far in
    /// this sequence.
    pub fn then(&mut self, offset: f64, duration: f64) -> TweenRef<'_> {
        let start = self.timeline.contexts[self.ctx].offset + offset;
        self.append(Tween::new(start, duration))
    }

    /// Open a nested sequence whose local offset cursor starts at the
    /// latest end time among `after`.
    ///
    /// Tweens appended to the nested scope still extend this sequence (and
    /// every ancestor up to the root), so a single root `update` keeps
    /// reaching every leaf.
    pub fn chain(&mut self, after: &[TweenId]) -> Sequence<'_> {
        let start = after
            .iter()
            .filter_map(|id| self.timeline.tweens.get(*id))
            .map(Tween::end_time)
            .fold(0.0_f64, f64::max);
        let ctx = self.timeline.contexts.len();
        self.timeline
            .contexts
            .push(SequenceContext::new(start, Some(self.ctx)));
        Sequence {
            timeline: &mut *self.timeline,
            ctx,
        }
    }

    /// Register a start callback for this sequence's own lifecycle.
    pub fn on_start(&mut self, func: impl FnMut() + 'static) -> &mut Self {
        self.timeline.contexts[self.ctx]
            .start_callbacks
            .push(Box::new(func));
        self
    }

    /// Register an end callback for this sequence's own lifecycle.
    pub fn on_end(&mut self, func: impl FnMut() + 'static) -> &mut Self {
        self.timeline.contexts[self.ctx]
            .end_callbacks
            .push(Box::new(func));
        self
    }

    /// This sequence's current offset cursor.
    pub fn offset(&self) -> f64 {
        self.timeline.contexts[self.ctx].offset
    }

    fn append(&mut self, tween: Tween) -> TweenRef<'_> {
        let end = tween.end_time();
        let id = self.timeline.tweens.insert(tween);

        // Extend the offset cursor and dispatch list of this sequence and
        // every ancestor, so the root sees the whole transitive span.
        let mut next = Some(self.ctx);
        while let Some(i) = next {
            let context = &mut self.timeline.contexts[i];
            context.offset = context.offset.max(end);
            context.tweens.push(id);
            next = context.parent;
        }

        TweenRef {
            id,
            tween: &mut self.timeline.tweens[id],
        }
    }
}

/// Borrowed handle to a tween just appended to a sequence.
///
/// Forwards the tween's builder methods and exposes the [`TweenId`] needed
/// for later [`Sequence::chain`] calls.
pub struct TweenRef<'a> {
    id: TweenId,
    tween: &'a mut Tween,
}

impl TweenRef<'_> {
    pub fn id(&self) -> TweenId {
        self.id
    }

    /// Replace the tween's easing curve.
    pub fn easing(self, func: impl Fn(f64) -> f64 + 'static) -> Self {
        self.tween.easing(func);
        self
    }

    /// Register a start callback on the tween.
    pub fn on_start(self, func: impl FnMut() + 'static) -> Self {
        self.tween.on_start(func);
        self
    }

    /// Register a per-tick callback on the tween.
    pub fn run(self, func: impl FnMut(f64) + 'static) -> Self {
        self.tween.run(func);
        self
    }

    /// Register an end callback on the tween.
    pub fn on_end(self, func: impl FnMut() + 'static) -> Self {
        self.tween.on_end(func);
        self
    }
}
