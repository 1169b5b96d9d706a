use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use welltest_editor::data::CalamineReader;
use welltest_editor::import_preview::ImportPreview;
use welltest_editor::types::{
    DelimiterSelector, DerivedColumnReport, EncodingSelector, ImportSettings, TimeConversionConfig,
    TimeMode, TimeUnit,
};
use welltest_editor::{DataEditor, EditorSettings};

/// Import and derive well-test data tables
#[derive(Parser, Debug)]
#[command(name = "welltest", version, about)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a file, optionally add derived columns, and write a project
    Import {
        #[command(flatten)]
        source: SourceArgs,

        /// 1-based time-of-day column for a time-only conversion
        #[arg(long, conflicts_with_all = ["date_column", "clock_column"])]
        time_column: Option<usize>,

        /// 1-based date column for a date + time conversion
        #[arg(long, requires = "clock_column")]
        date_column: Option<usize>,

        /// 1-based time-of-day column paired with --date-column
        #[arg(long, requires = "date_column")]
        clock_column: Option<usize>,

        /// Output unit of the elapsed-time column (h, min, s); defaults to
        /// the saved setting
        #[arg(long)]
        unit: Option<TimeUnit>,

        /// Base name of the elapsed-time column
        #[arg(long)]
        time_name: Option<String>,

        /// Append a pressure-drop column
        #[arg(long)]
        pressure_drop: bool,

        /// Project file to write; prints JSON to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show how a file parses under the given settings
    Preview {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Delimited text, spreadsheet or .json project file
    file: PathBuf,

    /// auto, utf-8, gbk, system or latin1
    #[arg(long)]
    encoding: Option<EncodingSelector>,

    /// auto, comma, tab, space or semicolon
    #[arg(long)]
    delimiter: Option<DelimiterSelector>,

    /// 1-based first data row
    #[arg(long)]
    start_row: Option<usize>,

    /// 1-based header row
    #[arg(long)]
    header_row: Option<usize>,

    /// Treat every consulted row as data
    #[arg(long)]
    no_header: bool,
}

impl SourceArgs {
    fn import_settings(&self, defaults: &EditorSettings) -> ImportSettings {
        let mut settings = defaults.import_settings(&self.file);
        if let Some(encoding) = self.encoding {
            settings.encoding = encoding;
        }
        if let Some(delimiter) = self.delimiter {
            settings.delimiter = delimiter;
        }
        if let Some(start_row) = self.start_row {
            settings.start_row = start_row.max(1);
        }
        if let Some(header_row) = self.header_row {
            settings.header_row = header_row.max(1);
        }
        if self.no_header {
            settings.use_header = false;
        }
        settings
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = EditorSettings::load_default();

    match cli.command {
        Command::Import {
            source,
            time_column,
            date_column,
            clock_column,
            unit,
            time_name,
            pressure_drop,
            output,
        } => {
            let mode = match (time_column, date_column, clock_column) {
                (Some(column), _, _) => Some(TimeMode::TimeOnly {
                    source_column: zero_based(column, "--time-column")?,
                }),
                (None, Some(date), Some(clock)) => Some(TimeMode::DateAndTime {
                    date_column: zero_based(date, "--date-column")?,
                    time_column: zero_based(clock, "--clock-column")?,
                }),
                _ => None,
            };

            let mut editor = DataEditor::with_reader(Box::new(CalamineReader::new()), settings.clone());
            load(&mut editor, &source, &settings)?;

            if let Some(mode) = mode {
                let unit = unit.unwrap_or(settings.time_unit);
                let mut config = TimeConversionConfig::new(mode, unit);
                if let Some(name) = time_name {
                    config = config.with_column_name(name);
                }
                let result = editor.convert_time(&config);
                report("time conversion", &DerivedColumnReport::from(&result))?;
            }

            if pressure_drop {
                let result = editor.compute_pressure_drop();
                report("pressure drop", &DerivedColumnReport::from(&result))?;
            }

            match output {
                Some(path) => {
                    editor
                        .save_project(&path)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!(
                        "Wrote {} rows x {} columns to {}",
                        editor.table().row_count(),
                        editor.table().column_count(),
                        path.display()
                    );
                }
                None => {
                    let json = serde_json::to_string_pretty(&editor.project_value())?;
                    println!("{}", json);
                }
            }
        }
        Command::Preview { source } => {
            let mut preview =
                ImportPreview::from_settings(&settings, source.import_settings(&settings));
            preview.refresh(&CalamineReader::new());

            if let Some(error) = preview.error() {
                bail!("Preview failed: {}", error);
            }

            let import = preview.settings();
            if preview.text_options_enabled() {
                eprintln!(
                    "Encoding {}, delimiter {:?}, start row {}, header row {}",
                    import.encoding.label(),
                    import.delimiter,
                    import.start_row,
                    import.header_row
                );
            }

            let table = preview.table();
            println!("{}", table.header.join("\t"));
            for row in &table.rows {
                println!("{}", row.join("\t"));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(editor: &mut DataEditor, source: &SourceArgs, settings: &EditorSettings) -> Result<()> {
    let import = source.import_settings(settings);
    let result = if welltest_editor::types::is_project_file(&source.file) {
        editor.load_project(&source.file)
    } else {
        editor.load_with_settings(&import)
    };
    result.with_context(|| format!("Failed to load {}", source.file.display()))
}

fn zero_based(column: usize, flag: &str) -> Result<usize> {
    match column.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("{} is 1-based; 0 is not a column", flag),
    }
}

fn report(operation: &str, outcome: &DerivedColumnReport) -> Result<()> {
    if !outcome.success {
        bail!("{} failed: {}", operation, outcome.error_message);
    }
    eprintln!(
        "Added column '{}' ({} rows processed)",
        outcome.column_name, outcome.processed_rows
    );
    Ok(())
}
