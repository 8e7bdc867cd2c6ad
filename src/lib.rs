use anyhow::Context;
use clap::Parser;
use crossterm::tty::IsTty;
use printer::{PrintConfig, PrintMode};
use std::{fs::File, io::BufWriter, path::PathBuf, sync::Arc};

pub mod axis;
pub mod error;
pub mod formatter;
pub mod histogram;
pub mod label;
pub mod multi;
pub mod printer;
pub mod source;

pub use axis::{ceil_to_nice_bound, floor_to_nice_bound, AxisBound, AxisSpec};
pub use error::Error;
pub use formatter::{HistogramFormatter, Report};
pub use histogram::{build_range_points, Histogram, OutOfRangePolicy};
pub use label::{LabelFormat, SignificantDigits};
pub use multi::{MultipleHistogramFormatter, Series};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Opts {
    #[arg(
        help = "Files with one number per line. `-` reads standard input.",
        default_value = source::STDIN
    )]
    files: Vec<String>,
    #[arg(
        help = "Number of buckets.",
        short = 'b',
        long,
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    bucket_count: u32,
    #[arg(
        help = "Lower end of the axis, a number or `auto` to round the smallest value down to a readable bound.",
        long,
        default_value = "auto",
        allow_hyphen_values = true
    )]
    axis_min: AxisBound,
    #[arg(
        help = "Upper end of the axis, a number or `auto` to round the largest value up to a readable bound.",
        long,
        default_value = "auto",
        allow_hyphen_values = true
    )]
    axis_max: AxisBound,
    #[arg(
        help = "Keep numeric --axis-min and --axis-max even if some values are out of range. Otherwise the axis is widened to cover all values.",
        long
    )]
    fixed_axis: bool,
    #[arg(
        help = "Width of a row including labels and counts.",
        short = 'w',
        long,
        default_value = "60"
    )]
    graph_width: usize,
    #[arg(help = "String a bar is made of.", long, default_value = "*")]
    bar_char: String,
    #[arg(
        help = "Decimal places of bucket labels.",
        short = 'p',
        long,
        default_value = "2",
        conflicts_with = "significant_digits"
    )]
    precision: usize,
    #[arg(
        help = "Write bucket labels in scientific notation with MIN[:MAX] significant digits. Examples: -s 2 -s 1:3",
        short = 's',
        long
    )]
    significant_digits: Option<SignificantDigits>,
    #[arg(
        help = "Silently drop values outside of the axis instead of counting them in an `out of range` row.",
        long
    )]
    drop_out_of_range: bool,
    #[arg(help = "Output format", long, default_value = "text")]
    output_format: PrintMode,
    #[arg(
        help = "Output file to write the results to. If not specified, results are written to stdout.",
        long,
        short
    )]
    output: Option<PathBuf>,
    #[arg(help = "Disable the color scheme.", long = "disable-color")]
    disable_color: bool,
}

impl Opts {
    fn label_format(&self) -> Result<LabelFormat, Error> {
        match self.significant_digits {
            Some(SignificantDigits { min, max }) => LabelFormat::scientific(min, max),
            None => Ok(LabelFormat::Fixed {
                precision: self.precision,
            }),
        }
    }

    fn policy(&self) -> OutOfRangePolicy {
        if self.drop_out_of_range {
            OutOfRangePolicy::Drop
        } else {
            OutOfRangePolicy::Tally
        }
    }
}

pub fn run(opts: Opts) -> anyhow::Result<()> {
    let label_format = opts.label_format()?;
    let policy = opts.policy();

    let mut sources = Vec::with_capacity(opts.files.len());
    for name in &opts.files {
        let values = source::read_source(name)?;
        log::debug!("read {} values from {name}", values.len());
        sources.push((name.clone(), values));
    }

    let (data_min, data_max) = axis::data_range(sources.iter().flat_map(|(_, v)| v))
        .context("no input values")?;
    let axis = AxisSpec {
        min: opts.axis_min,
        max: opts.axis_max,
        fixed: opts.fixed_axis,
    };
    let (axis_min, axis_max) = axis.resolve(data_min, data_max)?;
    log::debug!("data range [{data_min}, {data_max}], axis [{axis_min}, {axis_max}]");

    let range_points: Arc<[f64]> =
        build_range_points(opts.bucket_count as usize, axis_min, axis_max).into();
    let series = sources
        .into_iter()
        .map(|(name, values)| {
            let mut histogram = Histogram::new(range_points.clone(), policy)?;
            histogram.add_values(&values);
            let in_range = histogram.counts().iter().sum::<usize>();
            if policy == OutOfRangePolicy::Drop && in_range < values.len() {
                log::warn!(
                    "dropped {} out of range values from {name}",
                    values.len() - in_range
                );
            }
            Ok(Series { name, histogram })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    log::debug!(
        "formatting {} series with {:?}, graph width {}",
        series.len(),
        label_format,
        opts.graph_width
    );

    let formatter = MultipleHistogramFormatter::new(
        &series,
        opts.bar_char.as_str(),
        opts.graph_width,
        label_format,
    )?;
    if opts.output_format == PrintMode::Text {
        // fail before --output is truncated
        formatter.report(false)?;
    }

    let mut print_config = {
        let disable_style =
            opts.disable_color || !std::io::stdout().is_tty() || opts.output.is_some();

        let output: Box<dyn std::io::Write> = if let Some(output) = &opts.output {
            Box::new(BufWriter::new(File::create(output).with_context(|| {
                format!("failed to create {}", output.display())
            })?))
        } else {
            Box::new(std::io::stdout().lock())
        };

        PrintConfig {
            output,
            mode: opts.output_format,
            disable_style,
        }
    };

    printer::print_result(&mut print_config, &formatter)
}
