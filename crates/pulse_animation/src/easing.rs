//! Easing functions for animations
//!
//! Every curve here is a plain `fn(f64) -> f64` mapping raw progress in
//! `[0, 1]` to eased progress, so any of them (or any closure of the same
//! shape) plugs directly into [`Tween::easing`](crate::tween::Tween::easing).
//! Eased output is not necessarily bounded to `[0, 1]`: the `back_*` and
//! `elastic_*` families overshoot.
//!
//! Each family comes as an In/Out/InOut triple. The `Out` curve is the
//! point reflection of `In` and `InOut` splices the two halves; the
//! [`reversed`] and [`mirrored`] combinators build the same shapes from any
//! custom curve.

use std::f64::consts::PI;

/// Overshoot strength of the `back_*` family.
const BACK_STRENGTH: f64 = 1.525;

// Bounce segment boundaries and parabola coefficients.
const BOUNCE_T1: f64 = 4.0 / 11.0;
const BOUNCE_T2: f64 = 8.0 / 11.0;
const BOUNCE_T3: f64 = 9.0 / 10.0;
const BOUNCE_A: f64 = 4356.0 / 361.0;
const BOUNCE_B: f64 = 35442.0 / 1805.0;
const BOUNCE_C: f64 = 16061.0 / 1805.0;

/// Identity easing.
pub fn linear(t: f64) -> f64 {
    t
}

pub fn quad_in(t: f64) -> f64 {
    t * t
}

pub fn quad_out(t: f64) -> f64 {
    1.0 - quad_in(1.0 - t)
}

pub fn quad_in_out(t: f64) -> f64 {
    mirror(quad_in, t)
}

pub fn cubic_in(t: f64) -> f64 {
    t * t * t
}

pub fn cubic_out(t: f64) -> f64 {
    1.0 - cubic_in(1.0 - t)
}

pub fn cubic_in_out(t: f64) -> f64 {
    mirror(cubic_in, t)
}

pub fn quart_in(t: f64) -> f64 {
    t * t * t * t
}

pub fn quart_out(t: f64) -> f64 {
    1.0 - quart_in(1.0 - t)
}

pub fn quart_in_out(t: f64) -> f64 {
    mirror(quart_in, t)
}

pub fn quint_in(t: f64) -> f64 {
    t * t * t * t * t
}

pub fn quint_out(t: f64) -> f64 {
    1.0 - quint_in(1.0 - t)
}

pub fn quint_in_out(t: f64) -> f64 {
    mirror(quint_in, t)
}

pub fn sine_in(t: f64) -> f64 {
    1.0 - (t * PI / 2.0).cos()
}

pub fn sine_out(t: f64) -> f64 {
    1.0 - sine_in(1.0 - t)
}

pub fn sine_in_out(t: f64) -> f64 {
    mirror(sine_in, t)
}

pub fn expo_in(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else {
        1024f64.powf(t - 1.0)
    }
}

pub fn expo_out(t: f64) -> f64 {
    1.0 - expo_in(1.0 - t)
}

pub fn expo_in_out(t: f64) -> f64 {
    mirror(expo_in, t)
}

pub fn circ_in(t: f64) -> f64 {
    1.0 - (1.0 - t * t).sqrt()
}

pub fn circ_out(t: f64) -> f64 {
    1.0 - circ_in(1.0 - t)
}

pub fn circ_in_out(t: f64) -> f64 {
    mirror(circ_in, t)
}

pub fn elastic_in(t: f64) -> f64 {
    if t == 0.0 {
        0.0
    } else {
        -(1024f64.powf(t - 1.0)) * ((t - 1.1) * 5.0 * PI).sin()
    }
}

pub fn elastic_out(t: f64) -> f64 {
    1.0 - elastic_in(1.0 - t)
}

pub fn elastic_in_out(t: f64) -> f64 {
    mirror(elastic_in, t)
}

pub fn back_in(t: f64) -> f64 {
    t * t * ((BACK_STRENGTH + 1.0) * t - BACK_STRENGTH)
}

pub fn back_out(t: f64) -> f64 {
    1.0 - back_in(1.0 - t)
}

pub fn back_in_out(t: f64) -> f64 {
    mirror(back_in, t)
}

/// The bounce family's base shape is the decaying-rebound `out` curve; `in`
/// is its reflection.
pub fn bounce_out(t: f64) -> f64 {
    if t == 0.0 || t == 1.0 {
        return t;
    }
    if t < BOUNCE_T1 {
        7.5625 * t * t
    } else if t < BOUNCE_T2 {
        9.075 * t * t - 9.9 * t + 3.4
    } else if t < BOUNCE_T3 {
        BOUNCE_A * t * t - BOUNCE_B * t + BOUNCE_C
    } else {
        10.8 * t * t - 20.52 * t + 10.72
    }
}

pub fn bounce_in(t: f64) -> f64 {
    1.0 - bounce_out(1.0 - t)
}

pub fn bounce_in_out(t: f64) -> f64 {
    mirror(bounce_in, t)
}

/// Point-reflect an easing curve: ease-in becomes ease-out and vice versa.
pub fn reversed(func: impl Fn(f64) -> f64) -> impl Fn(f64) -> f64 {
    move |t| 1.0 - func(1.0 - t)
}

/// Splice a curve and its reflection into an ease-in-out shape.
pub fn mirrored(func: impl Fn(f64) -> f64) -> impl Fn(f64) -> f64 {
    move |t| {
        if t < 0.5 {
            func(2.0 * t) * 0.5
        } else {
            1.0 - func(2.0 * (1.0 - t)) * 0.5
        }
    }
}

fn mirror(func: fn(f64) -> f64, t: f64) -> f64 {
    if t < 0.5 {
        func(2.0 * t) * 0.5
    } else {
        1.0 - func(2.0 * (1.0 - t)) * 0.5
    }
}

/// Build a cubic Bézier easing curve from its two control points, matching
/// the CSS `cubic-bezier()` timing function.
///
/// Solves for the curve parameter with Newton-Raphson, falling back to
/// bisection when the local slope is too flat to iterate on.
pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> impl Fn(f64) -> f64 {
    move |t| {
        // Control points on the diagonal make the curve the identity.
        if x1 == y1 && x2 == y2 {
            return t;
        }
        // Endpoints are always exact.
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        sample(solve_curve_x(t, x1, x2), y1, y2)
    }
}

/// Find the curve parameter whose bezier x-coordinate equals `x`.
fn solve_curve_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut p = x;
    for _ in 0..8 {
        let err = sample(p, x1, x2) - x;
        if err.abs() < 1e-7 {
            return p;
        }
        let slope = slope(p, x1, x2);
        if slope.abs() < 1e-7 {
            break;
        }
        p -= err / slope;
    }

    // Bisection always converges on the monotone x-curve.
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = x;
    for _ in 0..20 {
        let val = sample(p, x1, x2);
        if (val - x).abs() < 1e-7 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }
    p
}

/// Evaluate one bezier axis at parameter `t` (Horner form).
#[inline]
fn sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

/// Derivative of one bezier axis at parameter `t`.
#[inline]
fn slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: &[(&str, fn(f64) -> f64)] = &[
        ("linear", linear),
        ("quad_in", quad_in),
        ("quad_out", quad_out),
        ("quad_in_out", quad_in_out),
        ("cubic_in", cubic_in),
        ("cubic_out", cubic_out),
        ("cubic_in_out", cubic_in_out),
        ("quart_in", quart_in),
        ("quart_out", quart_out),
        ("quart_in_out", quart_in_out),
        ("quint_in", quint_in),
        ("quint_out", quint_out),
        ("quint_in_out", quint_in_out),
        ("sine_in", sine_in),
        ("sine_out", sine_out),
        ("sine_in_out", sine_in_out),
        ("expo_in", expo_in),
        ("expo_out", expo_out),
        ("expo_in_out", expo_in_out),
        ("circ_in", circ_in),
        ("circ_out", circ_out),
        ("circ_in_out", circ_in_out),
        ("elastic_in", elastic_in),
        ("elastic_out", elastic_out),
        ("elastic_in_out", elastic_in_out),
        ("back_in", back_in),
        ("back_out", back_out),
        ("back_in_out", back_in_out),
        ("bounce_in", bounce_in),
        ("bounce_out", bounce_out),
        ("bounce_in_out", bounce_in_out),
    ];

    #[test]
    fn test_every_curve_hits_both_endpoints() {
        for (name, func) in CURVES {
            assert!(func(0.0).abs() < 1e-9, "{name}(0) = {}", func(0.0));
            assert!((func(1.0) - 1.0).abs() < 1e-9, "{name}(1) = {}", func(1.0));
        }
    }

    #[test]
    fn test_linear_is_identity() {
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            assert_eq!(linear(t), t);
        }
    }

    #[test]
    fn test_in_out_passes_through_midpoint() {
        for func in [quad_in_out, cubic_in_out, sine_in_out, bounce_in_out] {
            assert!((func(0.5) - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_back_overshoots_below_zero() {
        // The back family dips below 0 early on; that is its entire point.
        assert!(back_in(0.3) < 0.0);
        assert!(back_out(0.7) > 1.0);
    }

    #[test]
    fn test_reversed_reflects_a_curve() {
        let reflected = reversed(|t| t * 0.5);
        assert_eq!(reflected(0.0), 0.5);
        assert_eq!(reflected(1.0), 1.0);
        assert_eq!(reflected(0.5), 0.75);
    }

    #[test]
    fn test_mirrored_splices_both_halves() {
        let spliced = mirrored(|t| t * 0.5);
        assert!((spliced(0.1) - 0.05).abs() < 1e-9);
        assert!((spliced(0.4) - 0.2).abs() < 1e-9);
        assert!((spliced(0.6) - 0.8).abs() < 1e-9);
        assert!((spliced(0.9) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_cubic_bezier_diagonal_is_identity() {
        let curve = cubic_bezier(0.3, 0.3, 0.7, 0.7);
        assert_eq!(curve(0.437), 0.437);
    }

    #[test]
    fn test_cubic_bezier_endpoints_are_exact() {
        let curve = cubic_bezier(0.25, 0.1, 0.25, 1.0);
        assert_eq!(curve(0.0), 0.0);
        assert_eq!(curve(1.0), 1.0);
    }

    #[test]
    fn test_cubic_bezier_matches_css_ease() {
        // CSS `ease` is cubic-bezier(0.25, 0.1, 0.25, 1.0); its value at
        // t = 0.5 is a well-known reference point.
        let curve = cubic_bezier(0.25, 0.1, 0.25, 1.0);
        assert!((curve(0.5) - 0.8024).abs() < 1e-3);
    }

    #[test]
    fn test_cubic_bezier_is_monotone_for_monotone_controls() {
        let curve = cubic_bezier(0.42, 0.0, 0.58, 1.0);
        let mut last = 0.0;
        for i in 1..=100 {
            let value = curve(f64::from(i) / 100.0);
            assert!(value >= last);
            last = value;
        }
    }
}
