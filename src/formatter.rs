use std::fmt;

use crate::error::{Error, Result};
use crate::histogram::Histogram;
use crate::label::LabelFormat;

/// Bars at or below this width are unreadable.
pub const BAR_MIN_WIDTH: usize = 10;
pub const OUT_OF_RANGE_LABEL: &str = "out of range";

pub(crate) const LABEL_SEPARATOR: &str = "  ";
pub(crate) const BAR_SEPARATOR: &str = " |";
pub(crate) const CELL_SEPARATOR: &str = " ";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Bucket,
    OutOfRange,
}

/// Count and bar of one series in one row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub count: String,
    pub bar: String,
    /// Spaces after the bar to fill the column.
    pub padding: usize,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{BAR_SEPARATOR}{}{:padding$}",
            self.count,
            self.bar,
            "",
            padding = self.padding
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    pub label: String,
    pub cells: Vec<Cell>,
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{LABEL_SEPARATOR}", self.label)?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(CELL_SEPARATOR)?;
            }
            write!(f, "{cell}")?;
        }
        Ok(())
    }
}

/// Rendered histogram text, one line per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    /// Series names above the columns. Only side by side reports have one.
    pub header: Option<String>,
    pub rows: Vec<Row>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(header) = &self.header {
            writeln!(f, "{header}")?;
        }
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

fn pad_start(strings: Vec<String>) -> Vec<String> {
    let width = strings.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    strings
        .into_iter()
        .map(|s| format!("{s:>width$}"))
        .collect()
}

/// `"{low} ~ {high}"` for every bucket, plus the out of range label when
/// `out_of_range` is set, all right aligned to the same width.
pub(crate) fn row_labels(
    range_points: &[f64],
    label_format: LabelFormat,
    out_of_range: bool,
) -> Vec<String> {
    let ticks: Vec<String> = range_points
        .iter()
        .map(|&p| label_format.format(p))
        .collect();
    let tick_width = ticks.iter().map(|t| t.chars().count()).max().unwrap_or(0);

    let mut labels: Vec<String> = ticks
        .windows(2)
        .map(|w| format!("{:>tick_width$} ~ {:>tick_width$}", w[0], w[1]))
        .collect();
    if out_of_range {
        labels.push(OUT_OF_RANGE_LABEL.to_string());
    }
    pad_start(labels)
}

/// Bucket counts followed by the out of range tally if there is one.
pub(crate) fn count_strings(histogram: &Histogram) -> Vec<String> {
    pad_start(
        histogram
            .counts()
            .iter()
            .copied()
            .chain(histogram.out_of_range())
            .map(|c| c.to_string())
            .collect(),
    )
}

/// `graph_width - fixed_width`, negative when labels and counts do not fit.
pub(crate) fn free_width(graph_width: usize, fixed_width: usize) -> Result<i64> {
    let graph = i64::try_from(graph_width).map_err(|_| Error::GraphWidthTooLarge(graph_width))?;
    let fixed = i64::try_from(fixed_width).map_err(|_| Error::GraphWidthTooLarge(graph_width))?;
    Ok(graph - fixed)
}

pub(crate) fn check_bar_max_width(bar_max_width: i64, graph_width: usize) -> Result<usize> {
    if bar_max_width <= BAR_MIN_WIDTH as i64 {
        return Err(Error::LayoutTooNarrow {
            bar_max_width,
            graph_width,
        });
    }
    Ok(bar_max_width as usize)
}

/// Characters of bar per counted value.
pub(crate) fn bar_width_ratio(bar_max_width: usize, max_count: usize, bar_char_len: usize) -> f64 {
    if max_count == 0 {
        0.0
    } else {
        bar_max_width as f64 / (max_count as f64 * bar_char_len as f64)
    }
}

/// Repeats a bar string in proportion to a count.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BarScale<'a> {
    pub bar_char: &'a str,
    pub bar_max_width: usize,
    pub ratio: f64,
}

impl BarScale<'_> {
    pub fn cell(&self, count: String, value: usize, pad_end: bool) -> Cell {
        let repeat = (value as f64 * self.ratio) as usize;
        let width = repeat * self.bar_char.chars().count();
        Cell {
            count,
            bar: self.bar_char.repeat(repeat),
            padding: if pad_end {
                self.bar_max_width.saturating_sub(width)
            } else {
                0
            },
        }
    }
}

pub(crate) fn validate_style(bar_char: &str, graph_width: usize) -> Result<()> {
    if bar_char.is_empty() {
        return Err(Error::EmptyBarChar);
    }
    if graph_width == 0 {
        return Err(Error::ZeroGraphWidth);
    }
    free_width(graph_width, 0)?;
    Ok(())
}

/// Lays out one histogram as `label  count |bar` rows within `graph_width`
/// characters.
#[derive(Clone, Debug)]
pub struct HistogramFormatter<'a> {
    histogram: &'a Histogram,
    bar_char: String,
    graph_width: usize,
    label_format: LabelFormat,
}

impl<'a> HistogramFormatter<'a> {
    pub fn new(
        histogram: &'a Histogram,
        bar_char: impl Into<String>,
        graph_width: usize,
        label_format: LabelFormat,
    ) -> Result<Self> {
        let bar_char = bar_char.into();
        validate_style(&bar_char, graph_width)?;
        Ok(Self {
            histogram,
            bar_char,
            graph_width,
            label_format,
        })
    }

    pub fn range_strings(&self) -> Vec<String> {
        row_labels(
            self.histogram.range_points(),
            self.label_format,
            self.histogram.out_of_range().is_some(),
        )
    }

    pub fn count_strings(&self) -> Vec<String> {
        count_strings(self.histogram)
    }

    /// With `pad_end`, every bar is followed by spaces up to the full bar
    /// width so that something can be appended in a further column.
    pub fn report(&self, pad_end: bool) -> Result<Report> {
        let labels = self.range_strings();
        let counts = self.count_strings();

        let label_width = labels.first().map_or(0, |s| s.chars().count());
        let count_width = counts.first().map_or(0, String::len);
        let fixed_width = label_width + LABEL_SEPARATOR.len() + count_width + BAR_SEPARATOR.len();
        let bar_max_width =
            check_bar_max_width(free_width(self.graph_width, fixed_width)?, self.graph_width)?;

        let scale = BarScale {
            bar_char: &self.bar_char,
            bar_max_width,
            ratio: bar_width_ratio(
                bar_max_width,
                self.histogram.max_count(),
                self.bar_char.chars().count(),
            ),
        };

        let rows = labels
            .into_iter()
            .zip(counts)
            .enumerate()
            .map(|(i, (label, count))| {
                let (kind, value) = match self.histogram.counts().get(i) {
                    Some(&value) => (RowKind::Bucket, value),
                    // the tally is not on the same scale as buckets
                    _ => (RowKind::OutOfRange, 0),
                };
                Row {
                    kind,
                    label,
                    cells: vec![scale.cell(count, value, pad_end)],
                }
            })
            .collect();

        Ok(Report { header: None, rows })
    }

    pub fn render(&self) -> Result<String> {
        Ok(self.report(false)?.to_string())
    }
}
