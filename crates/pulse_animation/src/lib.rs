//! Pulse Animation System
//!
//! Time-driven value animation primitives: spring physics over named fields
//! and declaratively composed tween timelines, both advanced by a clock the
//! host owns.
//!
//! # Features
//!
//! - **Spring Physics**: fixed-timestep springs with stiffness, damping, precision
//! - **Tweens**: absolute time windows with easing and lifecycle callbacks
//! - **Timelines**: orchestrate tweens with absolute, relative, and chained offsets
//! - **Interruptible**: retargeted spring fields inherit their velocity
//! - **Scrubbing**: non-monotonic clocks re-arm start semantics deterministically
//!
//! The host drives everything synchronously from its own control loop: each
//! frame it calls [`Spring::step`] and [`Timeline::update`] with the current
//! clock value. Tween callbacks typically write into a spring's targets or
//! directly into render state.

pub mod easing;
pub mod interpolate;
pub mod spring;
pub mod timeline;
pub mod tween;

pub use spring::{Spring, SpringConfig};
pub use timeline::{Sequence, Timeline, TweenId, TweenRef};
pub use tween::{EdgeCallback, TickCallback, Tween};
