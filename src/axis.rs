use std::str::FromStr;

use average::{concatenate, Estimate, Max, Min};

use crate::error::{Error, Result};

// https://github.com/vks/average/issues/19
// can't define pub struct for now.
concatenate!(MinMaxInner, [Min, min], [Max, max]);

/// Smallest and largest of `values`, or `None` if there are none.
pub fn data_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<(f64, f64)> {
    let mut n = 0usize;
    let mut stat = MinMaxInner::new();
    for &v in values {
        stat.add(v);
        n += 1;
    }
    (n > 0).then(|| (stat.min(), stat.max()))
}

/// A number written as `d1.d2 × 10^exp`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TwoDigits {
    d1: u8,
    d2: u8,
    exp: i32,
}

impl TwoDigits {
    /// Round a positive finite `x` to two significant digits.
    fn round(x: f64) -> Option<Self> {
        let s = format!("{x:.1e}");
        let (mantissa, exp) = s.split_once('e')?;
        let (d1, d2) = mantissa.split_once('.')?;
        Some(Self {
            d1: d1.parse().ok()?,
            d2: d2.parse().ok()?,
            exp: exp.parse().ok()?,
        })
    }

    fn to_f64(self) -> Option<f64> {
        format!("{}.{}e{}", self.d1, self.d2, self.exp).parse().ok()
    }

    fn carry(&mut self) {
        if self.d2 >= 10 {
            self.d2 -= 10;
            self.d1 += 1;
        }
        if self.d1 >= 10 {
            self.d1 = 1;
            self.exp += 1;
        }
    }

    fn increment(&mut self) {
        self.d2 += 1;
        self.carry();
    }

    fn decrement(&mut self) {
        if self.d2 > 0 {
            self.d2 -= 1;
        } else if self.d1 > 1 {
            self.d1 -= 1;
            self.d2 = 9;
        } else {
            // 1.0 rounded up from at least 9.95e-1
            self.d1 = 9;
            self.d2 = 9;
            self.exp -= 1;
        }
    }

    fn snap_up(&mut self) {
        if matches!(self.d2, 1 | 3 | 7 | 9) {
            self.d2 += 1;
            self.carry();
        }
    }

    fn snap_down(&mut self) {
        if matches!(self.d2, 1 | 3 | 7 | 9) {
            self.d2 -= 1;
        }
    }
}

fn ceil_positive(x: f64) -> Option<f64> {
    let mut digits = TwoDigits::round(x)?;
    if digits.to_f64()? < x {
        digits.increment();
    }
    digits.snap_up();
    digits.to_f64()
}

fn floor_positive(x: f64) -> Option<f64> {
    let mut digits = TwoDigits::round(x)?;
    if digits.to_f64()? > x {
        digits.decrement();
    }
    digits.snap_down();
    digits.to_f64()
}

/// Round `x` up to a readable axis bound whose second significant digit is
/// one of 0, 2, 4, 5, 6 or 8, e.g. 0.21 -> 0.22, 0.29 -> 0.3, 9.9 -> 10.
pub fn ceil_to_nice_bound(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        x
    } else if x < 0.0 {
        -floor_to_nice_bound(-x)
    } else {
        ceil_positive(x).unwrap_or(x)
    }
}

/// Counterpart of [`ceil_to_nice_bound`] rounding towards negative infinity.
pub fn floor_to_nice_bound(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        x
    } else if x < 0.0 {
        -ceil_to_nice_bound(-x)
    } else {
        floor_positive(x).unwrap_or(x)
    }
}

/// One end of the axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AxisBound {
    /// Derived from the data and rounded outward to a nice bound.
    Auto,
    Value(f64),
}

impl FromStr for AxisBound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(AxisBound::Auto);
        }
        s.parse::<f64>()
            .map(AxisBound::Value)
            .map_err(|err| format!("axis bound must be `auto` or a number, but got {s}: {err}"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSpec {
    pub min: AxisBound,
    pub max: AxisBound,
    /// Keep explicit bounds even when data falls outside of them.
    pub fixed: bool,
}

impl AxisSpec {
    pub fn resolve(&self, data_min: f64, data_max: f64) -> Result<(f64, f64)> {
        let min = match self.min {
            AxisBound::Auto => floor_to_nice_bound(data_min),
            AxisBound::Value(v) if self.fixed => v,
            AxisBound::Value(v) => v.min(data_min),
        };
        let max = match self.max {
            AxisBound::Auto => ceil_to_nice_bound(data_max),
            AxisBound::Value(v) if self.fixed => v,
            AxisBound::Value(v) => v.max(data_max),
        };

        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(Error::EmptyAxis { min, max });
        }
        Ok((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ceil_to_nice_bound() {
        let cases = [
            (0.0, 0.0),
            (1.0, 1.0),
            (1.41, 1.5),
            (1.449, 1.5),
            (1.45, 1.5),
            (1.5, 1.5),
            (0.155, 0.16),
            (1.55, 1.6),
            (15.5, 16.0),
            (0.21, 0.22),
            (0.22, 0.22),
            (0.23, 0.24),
            (0.25, 0.25),
            (0.26, 0.26),
            (0.27, 0.28),
            (0.28, 0.28),
            (0.29, 0.30),
            (0.30, 0.30),
            (0.235, 0.24),
            (0.281, 0.30),
            (0.2800001, 0.30),
            (0.289, 0.30),
            (0.99, 1.0),
            (9.9, 10.0),
            (99.5, 100.0),
            (1234.0, 1400.0),
        ];
        for (input, want) in cases {
            assert_eq!(ceil_to_nice_bound(input), want, "input={input}");
        }
    }

    #[test]
    fn test_floor_to_nice_bound() {
        let cases = [
            (0.0, 0.0),
            (1.0, 1.0),
            (0.21, 0.20),
            (0.235, 0.22),
            (0.25, 0.25),
            (0.27, 0.26),
            (0.99, 0.98),
            (0.996, 0.98),
            (9.96, 9.8),
            (1.79, 1.6),
            (15.5, 15.0),
            (1234.0, 1200.0),
        ];
        for (input, want) in cases {
            assert_eq!(floor_to_nice_bound(input), want, "input={input}");
        }
    }

    #[test]
    fn test_negative_bounds_mirror() {
        assert_eq!(ceil_to_nice_bound(-0.21), -0.20);
        assert_eq!(floor_to_nice_bound(-0.21), -0.22);
        assert_eq!(floor_to_nice_bound(-9.9), -10.0);
        assert_eq!(ceil_to_nice_bound(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_data_range() {
        assert_eq!(data_range(&[3.0, -1.0, 2.5]), Some((-1.0, 3.0)));
        assert_eq!(data_range(&[4.0]), Some((4.0, 4.0)));
        assert_eq!(data_range(&Vec::<f64>::new()), None);
    }

    #[test]
    fn test_axis_bound_from_str() {
        assert_eq!("auto".parse::<AxisBound>(), Ok(AxisBound::Auto));
        assert_eq!("AUTO".parse::<AxisBound>(), Ok(AxisBound::Auto));
        assert_eq!("-2.5".parse::<AxisBound>(), Ok(AxisBound::Value(-2.5)));
        assert!("ten".parse::<AxisBound>().is_err());
    }

    #[test]
    fn test_resolve() {
        let auto = AxisSpec {
            min: AxisBound::Auto,
            max: AxisBound::Auto,
            fixed: false,
        };
        assert_eq!(auto.resolve(0.013, 0.281).unwrap(), (0.012, 0.30));

        let widened = AxisSpec {
            min: AxisBound::Value(0.0),
            max: AxisBound::Value(10.0),
            fixed: false,
        };
        assert_eq!(widened.resolve(2.0, 8.0).unwrap(), (0.0, 10.0));
        assert_eq!(widened.resolve(-3.0, 12.0).unwrap(), (-3.0, 12.0));

        let fixed = AxisSpec { fixed: true, ..widened };
        assert_eq!(fixed.resolve(-3.0, 12.0).unwrap(), (0.0, 10.0));
    }

    #[test]
    fn test_resolve_empty_axis() {
        let auto = AxisSpec {
            min: AxisBound::Auto,
            max: AxisBound::Auto,
            fixed: false,
        };
        assert!(matches!(
            auto.resolve(5.0, 5.0),
            Err(Error::EmptyAxis { min, max }) if min == 5.0 && max == 5.0
        ));

        let inverted = AxisSpec {
            min: AxisBound::Value(3.0),
            max: AxisBound::Value(1.0),
            fixed: true,
        };
        assert!(inverted.resolve(0.0, 10.0).is_err());
    }

    fn second_digit(x: f64) -> u8 {
        TwoDigits::round(x).unwrap().d2
    }

    proptest! {
        #[test]
        fn ceil_is_not_smaller(x in 0.0f64..1.0) {
            let bound = ceil_to_nice_bound(x);
            prop_assert!(bound >= x, "x={} bound={}", x, bound);
            if x > 0.0 {
                prop_assert!(matches!(second_digit(bound), 0 | 2 | 4 | 5 | 6 | 8));
            }
        }

        #[test]
        fn floor_is_monotonic(x in 1e-3f64..1e3, y in 1e-3f64..1e3) {
            let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
            prop_assert!(
                floor_to_nice_bound(lo) <= floor_to_nice_bound(hi),
                "lo={} hi={}", lo, hi
            );
        }

        #[test]
        fn floor_is_not_larger(x in 0.0f64..1e9) {
            let bound = floor_to_nice_bound(x);
            prop_assert!(bound <= x, "x={} bound={}", x, bound);
            if x > 0.0 {
                prop_assert!(matches!(second_digit(bound), 0 | 2 | 4 | 5 | 6 | 8));
            }
        }
    }
}
