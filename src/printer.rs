use crate::formatter::{Report, Row, RowKind, BAR_SEPARATOR, CELL_SEPARATOR, LABEL_SEPARATOR};
use crate::multi::{MultipleHistogramFormatter, Series};
use crossterm::style::{StyledContent, Stylize};
use std::io::Write;

#[derive(Clone, Copy)]
struct StyleScheme {
    color_enabled: bool,
}
impl StyleScheme {
    fn heading(self, text: &str) -> StyledContent<&str> {
        text.bold().underlined()
    }
    fn bar(self, text: &str) -> StyledContent<&str> {
        if self.color_enabled {
            text.green()
        } else {
            text.stylize()
        }
    }
    fn out_of_range(self, text: &str) -> StyledContent<&str> {
        if self.color_enabled {
            text.yellow()
        } else {
            text.stylize()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PrintMode {
    #[default]
    Text,
    Json,
}

pub struct PrintConfig {
    pub output: Box<dyn Write>,
    pub mode: PrintMode,
    pub disable_style: bool,
}

pub fn print_result(
    config: &mut PrintConfig,
    formatter: &MultipleHistogramFormatter,
) -> anyhow::Result<()> {
    match config.mode {
        PrintMode::Text => {
            let report = formatter.report(false)?;
            log::debug!("rendered {} rows", report.rows.len());
            if config.disable_style {
                write!(config.output, "{report}")?;
            } else {
                print_styled(
                    &mut config.output,
                    &report,
                    StyleScheme {
                        color_enabled: true,
                    },
                )?;
            }
        }
        PrintMode::Json => {
            print_json(&mut config.output, formatter.series())?;
            writeln!(config.output)?;
        }
    }
    config.output.flush()?;
    Ok(())
}

/// Print every histogram as JSON
fn print_json<W: Write>(w: &mut W, series: &[Series]) -> serde_json::Result<()> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Histogram<'a> {
        name: &'a str,
        #[serde(rename = "rangePoints")]
        range_points: &'a [f64],
        counts: &'a [usize],
        #[serde(rename = "outOfRange", skip_serializing_if = "Option::is_none")]
        out_of_range: Option<usize>,
    }

    let histograms: Vec<Histogram> = series
        .iter()
        .map(|s| Histogram {
            name: &s.name,
            range_points: s.histogram.range_points(),
            counts: s.histogram.counts(),
            out_of_range: s.histogram.out_of_range(),
        })
        .collect();

    serde_json::to_writer_pretty(w, &histograms)
}

/// Print the report as Text. Only the bars and the out of range rows are
/// colored, the layout is the same as the plain text.
fn print_styled<W: Write>(w: &mut W, report: &Report, style: StyleScheme) -> std::io::Result<()> {
    if let Some(header) = &report.header {
        writeln!(w, "{}", style.heading(header))?;
    }
    for row in &report.rows {
        print_row(w, row, style)?;
    }
    Ok(())
}

fn print_row<W: Write>(w: &mut W, row: &Row, style: StyleScheme) -> std::io::Result<()> {
    if row.kind == RowKind::OutOfRange {
        return writeln!(w, "{}", style.out_of_range(&row.to_string()));
    }
    write!(w, "{}{LABEL_SEPARATOR}", row.label)?;
    for (i, cell) in row.cells.iter().enumerate() {
        if i > 0 {
            write!(w, "{CELL_SEPARATOR}")?;
        }
        write!(
            w,
            "{}{BAR_SEPARATOR}{}{:padding$}",
            cell.count,
            style.bar(&cell.bar),
            "",
            padding = cell.padding
        )?;
    }
    writeln!(w)
}
