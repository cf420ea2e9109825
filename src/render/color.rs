//! Sequential grey ramp for the cover rectangles.

use std::fmt;

use crate::numeric::js_round;

/// Channel values of the nine-step grey scheme, light to dark.
const GREYS: [f64; 9] = [255.0, 240.0, 217.0, 189.0, 150.0, 115.0, 82.0, 37.0, 0.0];

/// RGB colour written as CSS `rgb(r, g, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Rgb {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Rounds and clamps a channel; NaN becomes 0.
fn channel(value: f64) -> u8 {
    let rounded = js_round(value);
    if rounded.is_nan() {
        0
    } else {
        rounded.clamp(0.0, 255.0) as u8
    }
}

/// Uniform cubic B-spline weight for the segment `v1..v2`.
fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

/// B-spline through `values` at `t` in [0, 1]; `t` outside is clamped, the
/// end segments are extended by reflection. NaN yields NaN.
fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let (i, t) = if t <= 0.0 {
        (0, 0.0)
    } else if t >= 1.0 {
        (n - 1, 1.0)
    } else if t.is_nan() {
        return f64::NAN;
    } else {
        ((t * n as f64).floor() as usize, t)
    };
    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
    basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3)
}

/// Grey at `t`: 0 is white, 1 is black. NaN is black.
pub fn interpolate_greys(t: f64) -> Rgb {
    let v = basis_spline(&GREYS, t);
    Rgb::from_channels(v, v, v)
}

/// Fill for a quantized cover value. Undefined values are black.
pub fn cover_fill(quantized: Option<i64>) -> Rgb {
    match quantized {
        Some(q) => interpolate_greys(js_round(q as f64) / 100.0),
        None => interpolate_greys(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(interpolate_greys(0.0).to_string(), "rgb(255, 255, 255)");
        assert_eq!(interpolate_greys(1.0).to_string(), "rgb(0, 0, 0)");
    }

    #[test]
    fn test_ramp_midpoint() {
        assert_eq!(interpolate_greys(0.5).to_string(), "rgb(151, 151, 151)");
    }

    #[test]
    fn test_ramp_clamps() {
        assert_eq!(interpolate_greys(-2.0), interpolate_greys(0.0));
        assert_eq!(interpolate_greys(1.5), interpolate_greys(1.0));
    }

    #[test]
    fn test_ramp_is_monotonic() {
        let mut previous = 256u16;
        for step in 0..=100 {
            let grey = interpolate_greys(step as f64 / 100.0).r as u16;
            assert!(grey <= previous, "ramp got lighter at t={}", step);
            previous = grey;
        }
    }

    #[test]
    fn test_nan_is_black() {
        assert_eq!(interpolate_greys(f64::NAN).to_string(), "rgb(0, 0, 0)");
        assert_eq!(cover_fill(None).to_string(), "rgb(0, 0, 0)");
    }

    #[test]
    fn test_cover_fill_buckets() {
        assert_eq!(cover_fill(Some(0)).to_string(), "rgb(255, 255, 255)");
        assert_eq!(cover_fill(Some(50)).to_string(), "rgb(151, 151, 151)");
        assert_eq!(cover_fill(Some(100)).to_string(), "rgb(0, 0, 0)");
        assert_eq!(cover_fill(Some(150)).to_string(), "rgb(0, 0, 0)");
    }
}
