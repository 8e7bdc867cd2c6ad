use std::str::FromStr;

use crate::error::{Error, Result};

/// How range points are written in row labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelFormat {
    /// `{:.precision$}`
    Fixed { precision: usize },
    /// `d.ddde+XX` keeping between `min_significant_digits` and
    /// `max_significant_digits` digits of mantissa.
    Scientific {
        min_significant_digits: usize,
        max_significant_digits: usize,
    },
}

impl Default for LabelFormat {
    fn default() -> Self {
        LabelFormat::Fixed { precision: 2 }
    }
}

impl LabelFormat {
    pub fn scientific(min_significant_digits: usize, max_significant_digits: usize) -> Result<Self> {
        if min_significant_digits == 0 || min_significant_digits > max_significant_digits {
            return Err(Error::InvalidSignificantDigits {
                min: min_significant_digits,
                max: max_significant_digits,
            });
        }
        Ok(LabelFormat::Scientific {
            min_significant_digits,
            max_significant_digits,
        })
    }

    pub fn format(&self, v: f64) -> String {
        match *self {
            LabelFormat::Fixed { precision } => format!("{v:.precision$}"),
            LabelFormat::Scientific {
                min_significant_digits,
                max_significant_digits,
            } => format_scientific(v, min_significant_digits, max_significant_digits),
        }
    }
}

fn format_scientific(v: f64, min_digits: usize, max_digits: usize) -> String {
    let s = format!("{:.*e}", max_digits.saturating_sub(1), v);
    // inf and NaN have no exponent
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return s;
    };

    let mut mantissa = mantissa.to_string();
    if mantissa.contains('.') {
        let mut digits = mantissa.chars().filter(char::is_ascii_digit).count();
        while digits > min_digits && mantissa.ends_with('0') {
            mantissa.pop();
            digits -= 1;
        }
        if mantissa.ends_with('.') {
            mantissa.pop();
        }
    }

    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

/// `MIN[:MAX]` significant digits for scientific labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignificantDigits {
    pub min: usize,
    pub max: usize,
}

impl FromStr for SignificantDigits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expected_syntax = "syntax for --significant-digits is MIN[:MAX]";
        let parse = |n: &str| {
            n.trim()
                .parse::<usize>()
                .map_err(|err| format!("{expected_syntax}, but got {s}: {err}"))
        };
        let (min, max) = match s.split_once(':') {
            Some((min, max)) => (parse(min)?, parse(max)?),
            None => {
                let n = parse(s)?;
                (n, n)
            }
        };
        Ok(SignificantDigits { min, max })
    }
}
