use std::sync::Arc;

use crate::error::{Error, Result};

/// What happens to a value that doesn't fall in any bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutOfRangePolicy {
    /// Count it in a separate tally.
    #[default]
    Tally,
    /// Ignore it.
    Drop,
}

/// Build `count + 1` evenly spaced boundaries from `min` to `max`.
///
/// Both endpoints are stored as given so that accumulated rounding never
/// moves the first or last boundary.
pub fn build_range_points(count: usize, min: f64, max: f64) -> Vec<f64> {
    let mut range_points: Vec<f64> = (0..=count)
        .map(|i| min + (max - min) * i as f64 / count as f64)
        .collect();
    if let Some(first) = range_points.first_mut() {
        *first = min;
    }
    if let Some(last) = range_points.last_mut() {
        *last = max;
    }
    range_points
}

/// Counts of values per half-open bucket `[range_points[i], range_points[i + 1])`.
#[derive(Clone, Debug)]
pub struct Histogram {
    range_points: Arc<[f64]>,
    counts: Vec<usize>,
    out_of_range: Option<usize>,
}

impl Histogram {
    pub fn new(range_points: impl Into<Arc<[f64]>>, policy: OutOfRangePolicy) -> Result<Self> {
        let range_points = range_points.into();
        if range_points.len() < 2 {
            return Err(Error::TooFewRangePoints(range_points.len()));
        }
        if range_points.iter().any(|p| !p.is_finite())
            || range_points.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(Error::InvalidRangePoints(range_points.to_vec()));
        }

        let counts = vec![0; range_points.len() - 1];
        let out_of_range = match policy {
            OutOfRangePolicy::Tally => Some(0),
            OutOfRangePolicy::Drop => None,
        };
        Ok(Self {
            range_points,
            counts,
            out_of_range,
        })
    }

    #[inline]
    pub fn add_value(&mut self, v: f64) {
        // smallest i such that range_points[i] > v
        let i = self.range_points.partition_point(|&p| p <= v);
        match i.checked_sub(1).filter(|&bucket| bucket < self.counts.len()) {
            Some(bucket) => self.counts[bucket] += 1,
            None => {
                if let Some(tally) = &mut self.out_of_range {
                    *tally += 1;
                }
            }
        }
    }

    pub fn add_values(&mut self, values: &[f64]) {
        for &v in values {
            self.add_value(v);
        }
    }

    /// Largest bucket count. The out of range tally is not a bucket.
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn range_points(&self) -> &[f64] {
        &self.range_points
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// `None` when out of range values are dropped.
    pub fn out_of_range(&self) -> Option<usize> {
        self.out_of_range
    }

    pub fn policy(&self) -> OutOfRangePolicy {
        if self.out_of_range.is_some() {
            OutOfRangePolicy::Tally
        } else {
            OutOfRangePolicy::Drop
        }
    }
}

impl PartialEq for Histogram {
    fn eq(&self, other: &Self) -> bool {
        self.range_points == other.range_points && self.counts == other.counts
    }
}
