//! Spring physics animation
//!
//! A fixed-timestep spring integrator that drives a set of named numeric
//! fields toward changing targets. Each call to [`Spring::step`] advances
//! simulated time by exactly `1 / fps` seconds regardless of wall-clock
//! time; the host decides when to step, so driving it faster or slower than
//! the configured rate warps playback speed accordingly.

use rustc_hash::FxHashMap;

/// Configuration shared by every field of one [`Spring`].
///
/// Immutable after construction.
#[derive(Clone, Copy, Debug)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    /// Convergence threshold applied to both velocity and distance to the
    /// terminal value.
    pub precision: f64,
    /// Simulated frame rate; one [`Spring::step`] advances `1 / fps` seconds.
    pub fps: f64,
}

impl SpringConfig {
    /// Create a configuration with the given stiffness and damping, keeping
    /// the default precision and frame rate.
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            ..Self::default()
        }
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0)
    }

    /// A very stiff spring with minimal oscillation (good for quick responses)
    pub fn snappy() -> Self {
        Self::new(600.0, 40.0)
    }

    /// Calculate critical damping for this spring's stiffness
    pub fn critical_damping(&self) -> f64 {
        2.0 * self.stiffness.sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 200.0,
            damping: 10.0,
            precision: 1e-6,
            fps: 60.0,
        }
    }
}

/// In-flight transition of a single field.
///
/// Present only while the field is moving; a field without one is at rest
/// and its actual value equals its target.
#[derive(Clone, Copy, Debug)]
struct Transition {
    terminal: f64,
    velocity: f64,
}

/// A spring engine animating named numeric fields.
///
/// Fields integrate independently: no field's convergence depends on any
/// other field's state, so they may settle in any order.
pub struct Spring {
    values: FxHashMap<String, f64>,
    transitions: FxHashMap<String, Transition>,
    config: SpringConfig,
}

impl Spring {
    /// Create an engine over the given fields with the default configuration.
    pub fn new<K: Into<String>>(values: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self::with_config(values, SpringConfig::default())
    }

    /// Create an engine over the given fields with an explicit configuration.
    pub fn with_config<K: Into<String>>(
        values: impl IntoIterator<Item = (K, f64)>,
        config: SpringConfig,
    ) -> Self {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            transitions: FxHashMap::default(),
            config,
        }
    }

    /// The value the field is headed toward: the pending terminal value if a
    /// transition is active, else the current actual value.
    ///
    /// Returns `None` for a field this engine does not own.
    pub fn target(&self, key: &str) -> Option<f64> {
        match self.transitions.get(key) {
            Some(tr) => Some(tr.terminal),
            None => self.values.get(key).copied(),
        }
    }

    /// The live, possibly in-flight value of a field.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// The field's current velocity (0 while at rest).
    pub fn velocity(&self, key: &str) -> Option<f64> {
        self.values.get(key)?;
        Some(self.transitions.get(key).map_or(0.0, |tr| tr.velocity))
    }

    /// True iff the field has an active transition.
    pub fn is_transitioning(&self, key: &str) -> bool {
        self.transitions.contains_key(key)
    }

    /// True iff any field has an active transition.
    pub fn has_active_transitions(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Start (or retarget) a transition toward `value`.
    ///
    /// A no-op when `value` already equals the field's actual value or its
    /// pending terminal. Retargeting a moving field preserves its velocity,
    /// so redirecting mid-flight stays continuous.
    pub fn set(&mut self, key: &str, value: f64) {
        let Some(&current) = self.values.get(key) else {
            tracing::warn!("spring has no field {:?}; set ignored", key);
            return;
        };
        if value == current {
            return;
        }
        if let Some(tr) = self.transitions.get(key) {
            if value == tr.terminal {
                return;
            }
        }
        let velocity = self.transitions.get(key).map_or(0.0, |tr| tr.velocity);
        self.transitions
            .insert(key.to_owned(), Transition { terminal: value, velocity });
    }

    /// Write `value` directly, clearing any transition (discontinuous jump).
    ///
    /// Unlike [`Spring::set`], this also introduces fields the engine did not
    /// own before.
    pub fn set_immediate(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), value);
        self.transitions.remove(key);
    }

    /// Apply [`Spring::set`] to each entry. Fields are wholly independent;
    /// there is no cross-field atomicity to speak of.
    pub fn assign<'a>(&mut self, entries: impl IntoIterator<Item = (&'a str, f64)>) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Apply [`Spring::set_immediate`] to each entry.
    pub fn assign_immediate<'a>(&mut self, entries: impl IntoIterator<Item = (&'a str, f64)>) {
        for (key, value) in entries {
            self.set_immediate(key, value);
        }
    }

    /// Clear the field's transition, freezing it at its current actual value
    /// (not the terminal it was headed toward).
    pub fn stop(&mut self, key: &str) {
        self.transitions.remove(key);
    }

    /// Clear every transition.
    pub fn stop_all(&mut self) {
        self.transitions.clear();
    }

    /// Advance every transitioning field by one physics step using
    /// semi-implicit Euler integration at the configured frame rate.
    ///
    /// A field whose new velocity and distance to the terminal both fall
    /// under `precision` is snapped exactly onto the terminal and its
    /// transition is removed.
    ///
    /// Returns true if any field is still transitioning afterwards.
    pub fn step(&mut self) -> bool {
        let SpringConfig {
            stiffness,
            damping,
            precision,
            fps,
        } = self.config;
        let values = &mut self.values;

        self.transitions.retain(|key, tr| {
            let Some(value) = values.get_mut(key) else {
                return false;
            };

            let distance = tr.terminal - *value;
            let acceleration = stiffness * distance - damping * tr.velocity;
            let velocity = tr.velocity + acceleration / fps;
            let next = *value + velocity / fps;

            let settled = velocity.abs().max((next - tr.terminal).abs()) < precision;
            if settled {
                tracing::trace!("spring field {:?} settled at {}", key, tr.terminal);
                *value = tr.terminal;
            } else {
                *value = next;
                tr.velocity = velocity;
            }
            !settled
        });

        !self.transitions.is_empty()
    }

    /// Iterate over all fields and their actual values.
    pub fn fields(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The engine's configuration.
    pub fn config(&self) -> SpringConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_settles_to_target_exactly() {
        let mut spring = Spring::new([("x", 0.0)]);
        spring.set("x", 1.0);
        assert!(spring.is_transitioning("x"));
        assert_eq!(spring.target("x"), Some(1.0));
        assert_eq!(spring.value("x"), Some(0.0));

        let mut steps = 0;
        while spring.has_active_transitions() && steps < 400 {
            spring.step();
            steps += 1;
        }

        // Convergence snaps onto the terminal, not merely close to it.
        assert!(!spring.is_transitioning("x"));
        assert_eq!(spring.value("x"), Some(1.0));
        assert_eq!(spring.target("x"), Some(1.0));
        // The default config needs a meaningful number of steps to decay
        // under the 1e-6 precision threshold.
        assert!(steps >= 60, "settled suspiciously fast: {steps} steps");
        assert!(steps < 400, "did not settle within 400 steps");
    }

    #[test]
    fn test_set_to_current_value_is_noop() {
        let mut spring = Spring::new([("x", 3.0)]);
        spring.set("x", 3.0);
        assert!(!spring.is_transitioning("x"));
    }

    #[test]
    fn test_set_to_pending_terminal_is_noop() {
        let mut spring = Spring::new([("x", 0.0)]);
        spring.set("x", 1.0);
        for _ in 0..10 {
            spring.step();
        }
        let velocity = spring.velocity("x").unwrap();
        assert!(velocity > 0.0);

        // Re-setting the same terminal must not reset the velocity.
        spring.set("x", 1.0);
        assert_eq!(spring.velocity("x"), Some(velocity));
        assert!(spring.is_transitioning("x"));
    }

    #[test]
    fn test_retarget_inherits_velocity() {
        let mut spring = Spring::new([("x", 0.0)]);
        spring.set("x", 100.0);
        for _ in 0..10 {
            spring.step();
        }
        let velocity = spring.velocity("x").unwrap();
        assert!(velocity > 0.0);

        // Change target mid-flight - velocity should carry over.
        spring.set("x", 50.0);
        assert_eq!(spring.velocity("x"), Some(velocity));
        assert_eq!(spring.target("x"), Some(50.0));
    }

    #[test]
    fn test_set_immediate_jumps_without_stepping() {
        let mut spring = Spring::new([("x", 0.0)]);
        spring.set("x", 1.0);
        for _ in 0..5 {
            spring.step();
        }

        spring.set_immediate("x", 7.0);
        assert_eq!(spring.value("x"), Some(7.0));
        assert_eq!(spring.target("x"), Some(7.0));
        assert!(!spring.is_transitioning("x"));
    }

    #[test]
    fn test_stop_freezes_at_actual_value() {
        let mut spring = Spring::new([("x", 0.0)]);
        spring.set("x", 1.0);
        for _ in 0..5 {
            spring.step();
        }
        let in_flight = spring.value("x").unwrap();
        assert!(in_flight > 0.0 && in_flight < 1.0);

        spring.stop("x");
        assert!(!spring.is_transitioning("x"));
        assert_eq!(spring.value("x"), Some(in_flight));
        assert_eq!(spring.target("x"), Some(in_flight));
    }

    #[test]
    fn test_stop_all_clears_every_transition() {
        let mut spring = Spring::new([("x", 0.0), ("y", 0.0)]);
        spring.assign([("x", 1.0), ("y", 2.0)]);
        assert!(spring.has_active_transitions());

        spring.stop_all();
        assert!(!spring.has_active_transitions());
        assert!(!spring.is_transitioning("x"));
        assert!(!spring.is_transitioning("y"));
    }

    #[test]
    fn test_fields_integrate_independently() {
        let mut spring = Spring::new([("x", 0.0), ("y", 0.0)]);
        spring.set("x", 1.0);
        spring.set("y", -4.0);

        while spring.step() {}

        assert_eq!(spring.value("x"), Some(1.0));
        assert_eq!(spring.value("y"), Some(-4.0));
    }

    #[test]
    fn test_unknown_field_reads_and_writes() {
        let mut spring = Spring::new([("x", 0.0)]);
        assert_eq!(spring.target("nope"), None);
        assert_eq!(spring.value("nope"), None);
        assert_eq!(spring.velocity("nope"), None);

        // Plain set on an unknown field is ignored...
        spring.set("nope", 1.0);
        assert!(!spring.is_transitioning("nope"));
        assert_eq!(spring.value("nope"), None);

        // ...but an immediate write introduces it.
        spring.set_immediate("nope", 2.0);
        assert_eq!(spring.value("nope"), Some(2.0));
        assert!(!spring.is_transitioning("nope"));
    }

    #[test]
    fn test_velocity_is_zero_at_rest() {
        let spring = Spring::new([("x", 5.0)]);
        assert_eq!(spring.velocity("x"), Some(0.0));
    }

    #[test]
    fn test_presets_are_underdamped() {
        assert!(SpringConfig::gentle().is_underdamped());
        assert!(SpringConfig::wobbly().is_underdamped());
        // The default oscillates too: damping 10 vs critical ~28.
        assert!(SpringConfig::default().is_underdamped());
    }

    #[test]
    fn test_custom_config_settles() {
        let mut spring = Spring::with_config([("x", 0.0)], SpringConfig::stiff());
        spring.set("x", 100.0);

        let mut steps = 0;
        while spring.step() && steps < 1000 {
            steps += 1;
        }

        assert!(!spring.is_transitioning("x"));
        assert_eq!(spring.value("x"), Some(100.0));
    }
}
