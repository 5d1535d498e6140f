use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, trace};

use tabstat::domain::{DEFAULT_DELIMITER, DropHow, LoadOptions, TableError};
use tabstat::loader::TableLoader;
use tabstat::read_table;
use tabstat::view::TableView;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter used when RUST_LOG is not set (e.g. "debug", "tabstat=trace")
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show entry count, non-empty counts and guessed types per column
    Info(InputArgs),
    /// Print the first rows
    Head {
        #[command(flatten)]
        input: InputArgs,
        /// Number of rows to print
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,
    },
    /// Summary statistics of the numeric columns
    Describe {
        #[command(flatten)]
        input: InputArgs,
        /// Percentiles to report, between 0 and 1
        #[arg(short, long, value_delimiter = ',', default_values_t = [0.25, 0.5, 0.75])]
        percentiles: Vec<f64>,
        /// Extra rows appended to the summary
        #[arg(long, value_delimiter = ',')]
        extra: Vec<ExtraStat>,
        /// Drop rows with empty cells in the selected columns first
        #[arg(long)]
        dropna: bool,
        /// "any" or "all", used with --dropna
        #[arg(long, default_value = "any", value_parser = parse_drop_how)]
        how: DropHow,
    },
    /// Write the (projected) table with another delimiter
    Convert {
        #[command(flatten)]
        input: InputArgs,
        /// Output file
        output: PathBuf,
        #[arg(long, default_value_t = DEFAULT_DELIMITER)]
        out_delimiter: char,
    },
    /// Measure how long loading a file takes
    Bench(InputArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExtraStat {
    Var,
    Mode,
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Input file; `~` and environment variables are expanded
    pub file: String,
    /// The first line holds data, not column names
    #[arg(long)]
    pub no_header: bool,
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,
    /// Only use these columns, in this order
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Vec<String>,
}

fn parse_drop_how(s: &str) -> Result<DropHow, String> {
    s.parse().map_err(|e: TableError| e.to_string())
}

impl InputArgs {
    fn options(&self) -> LoadOptions {
        LoadOptions::default()
            .has_header(!self.no_header)
            .delimiter(self.delimiter)
    }

    fn path(&self) -> Result<PathBuf, TableError> {
        let expanded = shellexpand::full(&self.file)
            .map_err(|e| TableError::InvalidArgument(e.to_string()))?;
        trace!("Expanded {} => {}", self.file, expanded);
        Ok(PathBuf::from(expanded.into_owned()))
    }

    fn open(&self) -> Result<TableView, TableError> {
        let view = read_table(self.path()?, &self.options())?;
        if self.columns.is_empty() {
            Ok(view)
        } else {
            view.project(&self.columns)
        }
    }
}

pub struct Controller<W: Write> {
    out: W,
}

impl<W: Write> Controller<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn run(&mut self, command: &Command) -> Result<(), TableError> {
        debug!("Running {command:?}");
        match command {
            Command::Info(input) => {
                let view = input.open()?;
                write!(self.out, "{}", view.info()?)?;
            }
            Command::Head { input, rows } => {
                let view = input.open()?;
                write!(self.out, "{}", view.head(*rows)?)?;
            }
            Command::Describe {
                input,
                percentiles,
                extra,
                dropna,
                how,
            } => {
                let mut view = input.open()?;
                if *dropna {
                    view = view.dropna::<&str>(&[], *how)?;
                }
                let mut summary = view.describe(percentiles)?;
                let columns = summary.columns().to_vec();
                for stat in extra {
                    let values = columns
                        .iter()
                        .map(|c| match stat {
                            ExtraStat::Var => view.var(c),
                            ExtraStat::Mode => view.mode(c),
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    let label = match stat {
                        ExtraStat::Var => "var",
                        ExtraStat::Mode => "mode",
                    };
                    summary.set_row(label, &values)?;
                }
                write!(self.out, "{summary}")?;
            }
            Command::Convert {
                input,
                output,
                out_delimiter,
            } => {
                let view = input.open()?;
                view.save(output, *out_delimiter)?;
                writeln!(
                    self.out,
                    "Saved {} rows to {}",
                    view.row_count(),
                    output.display()
                )?;
            }
            Command::Bench(input) => {
                let path = input.path()?;
                let start_time = Instant::now();
                let table = TableLoader::load(&path, &input.options())?;
                let elapsed = start_time.elapsed();
                info!("Benchmark load finished");
                writeln!(self.out, "File: {}", path.display())?;
                writeln!(self.out, "Load time: {}", format_duration(elapsed))?;
                writeln!(self.out, "Rows: {}", table.row_count())?;
                writeln!(self.out, "Columns: {}", table.column_count())?;
            }
        }
        Ok(())
    }
}

/// Formats a duration in the largest unit that keeps the value above one.
pub fn format_duration(duration: Duration) -> String {
    let ns = duration.as_nanos() as f64;
    if ns < 1_000.0 {
        format!("{ns:.0} ns")
    } else if ns < 1_000_000.0 {
        format!("{:.3} µs", ns / 1_000.0)
    } else if ns < 1_000_000_000.0 {
        format!("{:.3} ms", ns / 1_000_000.0)
    } else {
        format!("{:.3} s", ns / 1_000_000_000.0)
    }
}
