use crate::error::{Error, Result};
use crate::formatter::{
    bar_width_ratio, check_bar_max_width, count_strings, free_width, row_labels, validate_style,
    BarScale, HistogramFormatter, Report, Row, RowKind, BAR_SEPARATOR, CELL_SEPARATOR,
    LABEL_SEPARATOR,
};
use crate::histogram::Histogram;
use crate::label::LabelFormat;

/// A histogram and the name of the input it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name: String,
    pub histogram: Histogram,
}

/// Lays out several histograms over the same range points side by side,
/// sharing one bar scale so that columns can be compared.
#[derive(Clone, Debug)]
pub struct MultipleHistogramFormatter<'a> {
    series: &'a [Series],
    bar_char: String,
    graph_width: usize,
    label_format: LabelFormat,
}

impl<'a> MultipleHistogramFormatter<'a> {
    pub fn new(
        series: &'a [Series],
        bar_char: impl Into<String>,
        graph_width: usize,
        label_format: LabelFormat,
    ) -> Result<Self> {
        let bar_char = bar_char.into();
        let first = series.first().ok_or(Error::NoSeries)?;
        validate_style(&bar_char, graph_width)?;

        for other in &series[1..] {
            if other.histogram.range_points() != first.histogram.range_points() {
                return Err(Error::RangePointsMismatch {
                    first: first.name.clone(),
                    other: other.name.clone(),
                });
            }
            if other.histogram.policy() != first.histogram.policy() {
                return Err(Error::PolicyMismatch {
                    first: first.name.clone(),
                    other: other.name.clone(),
                });
            }
        }

        Ok(Self {
            series,
            bar_char,
            graph_width,
            label_format,
        })
    }

    pub fn series(&self) -> &'a [Series] {
        self.series
    }

    pub fn report(&self, pad_end: bool) -> Result<Report> {
        let n = self.series.len();
        if n == 1 {
            return HistogramFormatter::new(
                &self.series[0].histogram,
                self.bar_char.as_str(),
                self.graph_width,
                self.label_format,
            )?
            .report(pad_end);
        }

        let first = &self.series[0].histogram;
        let labels = row_labels(
            first.range_points(),
            self.label_format,
            first.out_of_range().is_some(),
        );
        let counts: Vec<Vec<String>> = self
            .series
            .iter()
            .map(|s| count_strings(&s.histogram))
            .collect();

        let label_width = labels.first().map_or(0, |s| s.chars().count());
        let count_widths: Vec<usize> = counts
            .iter()
            .map(|c| c.first().map_or(0, String::len))
            .collect();
        let fixed_width = label_width
            + LABEL_SEPARATOR.len()
            + count_widths
                .iter()
                .map(|w| w + BAR_SEPARATOR.len())
                .sum::<usize>()
            + CELL_SEPARATOR.len() * (n - 1);
        let bar_max_width = check_bar_max_width(
            free_width(self.graph_width, fixed_width)? / n as i64,
            self.graph_width,
        )?;

        let max_count = self
            .series
            .iter()
            .map(|s| s.histogram.max_count())
            .max()
            .unwrap_or(0);
        let scale = BarScale {
            bar_char: &self.bar_char,
            bar_max_width,
            ratio: bar_width_ratio(bar_max_width, max_count, self.bar_char.chars().count()),
        };

        let mut columns: Vec<_> = counts.into_iter().map(Vec::into_iter).collect();
        let rows = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let kind = if i < first.counts().len() {
                    RowKind::Bucket
                } else {
                    RowKind::OutOfRange
                };
                let cells = self
                    .series
                    .iter()
                    .zip(columns.iter_mut())
                    .enumerate()
                    .map(|(j, (series, column))| {
                        let value = series.histogram.counts().get(i).copied().unwrap_or(0);
                        let count = column.next().unwrap_or_default();
                        scale.cell(count, value, pad_end || j + 1 < n)
                    })
                    .collect();
                Row { kind, label, cells }
            })
            .collect();

        let header = self.header(label_width, &count_widths, bar_max_width);
        Ok(Report {
            header: Some(header),
            rows,
        })
    }

    /// Series names aligned to the start of their columns.
    fn header(&self, label_width: usize, count_widths: &[usize], bar_max_width: usize) -> String {
        let names: Vec<String> = self
            .series
            .iter()
            .zip(count_widths)
            .map(|(series, count_width)| {
                let width = count_width + BAR_SEPARATOR.len() + bar_max_width;
                let name: String = series.name.chars().take(width).collect();
                format!("{name:<width$}")
            })
            .collect();
        let header = format!(
            "{:label_width$}{LABEL_SEPARATOR}{}",
            "",
            names.join(CELL_SEPARATOR)
        );
        header.trim_end().to_string()
    }

    pub fn render(&self) -> Result<String> {
        Ok(self.report(false)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{build_range_points, OutOfRangePolicy};

    fn series(name: &str, count: usize, max: f64, values: &[f64]) -> Series {
        let mut histogram =
            Histogram::new(build_range_points(count, 0.0, max), OutOfRangePolicy::Drop).unwrap();
        histogram.add_values(values);
        Series {
            name: name.to_string(),
            histogram,
        }
    }

    fn pair() -> Vec<Series> {
        vec![
            series("a.txt", 2, 2.0, &[0.5, 0.5, 1.5]),
            series("b.txt", 2, 2.0, &[1.5]),
        ]
    }

    #[test]
    fn test_render_side_by_side() {
        let series = pair();
        let formatter =
            MultipleHistogramFormatter::new(&series, "*", 50, LabelFormat::default()).unwrap();
        // (50 - (11 + 2 + 3 + 3 + 1)) / 2 = 15 columns per bar, 7.5 per value
        let want = format!(
            "{}a.txt{}b.txt\n\
             0.00 ~ 1.00  2 |{} 0 |\n\
             1.00 ~ 2.00  1 |{}{} 1 |{}\n",
            " ".repeat(13),
            " ".repeat(14),
            "*".repeat(15),
            "*".repeat(7),
            " ".repeat(8),
            "*".repeat(7),
        );
        assert_eq!(formatter.render().unwrap(), want);
    }

    #[test]
    fn test_pad_end_fills_every_column() {
        let series = pair();
        let formatter =
            MultipleHistogramFormatter::new(&series, "*", 50, LabelFormat::default()).unwrap();
        let report = formatter.report(true).unwrap();
        for row in &report.rows {
            assert_eq!(row.to_string().len(), 50);
        }
    }

    #[test]
    fn test_shared_scale() {
        let series = vec![
            series("many", 2, 2.0, &[0.5; 10]),
            series("few", 2, 2.0, &[0.5; 5]),
        ];
        let formatter =
            MultipleHistogramFormatter::new(&series, "#", 61, LabelFormat::default()).unwrap();
        let report = formatter.report(false).unwrap();
        let many = report.rows[0].cells[0].bar.len();
        let few = report.rows[0].cells[1].bar.len();
        assert_eq!(few * 2, many);
    }

    #[test]
    fn test_out_of_range_rows() {
        let mut a = Histogram::new(build_range_points(2, 0.0, 2.0), OutOfRangePolicy::Tally).unwrap();
        a.add_values(&[0.5, 3.0, 4.0]);
        let mut b = a.clone();
        b.add_value(-1.0);
        let series = vec![
            Series {
                name: "a".to_string(),
                histogram: a,
            },
            Series {
                name: "b".to_string(),
                histogram: b,
            },
        ];
        let formatter =
            MultipleHistogramFormatter::new(&series, "*", 60, LabelFormat::default()).unwrap();
        let report = formatter.report(false).unwrap();
        assert_eq!(report.rows.len(), 3);
        let last = &report.rows[2];
        assert_eq!(last.kind, RowKind::OutOfRange);
        assert_eq!(last.label, "out of range");
        assert_eq!(last.cells[0].count, "2");
        assert_eq!(last.cells[1].count, "3");
        assert!(last.cells.iter().all(|c| c.bar.is_empty()));
    }

    #[test]
    fn test_single_series_delegates() {
        let series = vec![series("only", 10, 10.0, &[1.0, 2.0, 2.5])];
        let multi =
            MultipleHistogramFormatter::new(&series, "*", 40, LabelFormat::default()).unwrap();
        let single =
            HistogramFormatter::new(&series[0].histogram, "*", 40, LabelFormat::default()).unwrap();
        let report = multi.report(false).unwrap();
        assert_eq!(report.header, None);
        assert_eq!(report, single.report(false).unwrap());
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            MultipleHistogramFormatter::new(&[], "*", 40, LabelFormat::default()),
            Err(Error::NoSeries)
        ));

        let valid = pair();
        assert!(matches!(
            MultipleHistogramFormatter::new(&valid, "", 40, LabelFormat::default()),
            Err(Error::EmptyBarChar)
        ));
        assert!(matches!(
            MultipleHistogramFormatter::new(&valid, "*", 0, LabelFormat::default()),
            Err(Error::ZeroGraphWidth)
        ));
        assert!(matches!(
            MultipleHistogramFormatter::new(&valid, "*", usize::MAX, LabelFormat::default()),
            Err(Error::GraphWidthTooLarge(_))
        ));

        let mismatched = vec![
            series("a", 2, 2.0, &[]),
            series("b", 2, 2.0, &[]),
            series("c", 2, 3.0, &[]),
        ];
        match MultipleHistogramFormatter::new(&mismatched, "*", 40, LabelFormat::default()) {
            Err(Error::RangePointsMismatch { first, other }) => {
                assert_eq!(first, "a");
                assert_eq!(other, "c");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let mut tally = series("t", 2, 2.0, &[]);
        tally.histogram =
            Histogram::new(build_range_points(2, 0.0, 2.0), OutOfRangePolicy::Tally).unwrap();
        let mixed = vec![series("d", 2, 2.0, &[]), tally];
        assert!(matches!(
            MultipleHistogramFormatter::new(&mixed, "*", 40, LabelFormat::default()),
            Err(Error::PolicyMismatch { .. })
        ));
    }

    #[test]
    fn test_too_narrow() {
        let series = pair();
        let formatter =
            MultipleHistogramFormatter::new(&series, "*", 40, LabelFormat::default()).unwrap();
        assert!(matches!(
            formatter.render(),
            Err(Error::LayoutTooNarrow {
                bar_max_width: 10,
                graph_width: 40
            })
        ));
    }
}
