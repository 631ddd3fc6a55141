use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use mincom_analysis::consistency::Verdict;
use mincom_analysis::labels::GroupLabels;
use mincom_analysis::pipeline::{AnalysisConfig, analyze_all, load_categories, write_reports};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mincom_analysis")]
#[command(about = "Analyse enumerations of minimal communities")]
struct Args {
    /// Directory with one solver output (`<category>.json`) per target category
    #[arg(value_name = "DIR")]
    enumerations: PathBuf,

    /// Directory with one powergraph (`<category>.bbl` or `<category>.json`) per category
    #[arg(long, value_name = "DIR", require_equals = true)]
    powergraphs: Option<PathBuf>,

    /// Tab-separated organism label table (with a header row)
    #[arg(long, value_name = "FILE", require_equals = true)]
    labels: Option<PathBuf>,

    /// Name of the label column (default: the second column)
    #[arg(long, value_name = "NAME", require_equals = true, requires = "labels")]
    label_column: Option<String>,

    /// Directory where reports are written
    #[arg(
        long,
        short = 'o',
        value_name = "DIR",
        default_value = "mincom_analysis_output",
        require_equals = true
    )]
    output: PathBuf,

    /// Fail categories whose powergraph implies more combinations (0 = no limit)
    #[arg(long, default_value_t = 0, require_equals = true)]
    max_combinations: usize,

    /// Time limit per category in seconds (0 = no limit)
    #[arg(long, default_value_t = 0, require_equals = true)]
    timeout: u64,

    /// Logging verbosity (use -v for info, or -v=LEVEL for a specific level)
    #[arg(
        long,
        short = 'v',
        value_name = "LEVEL",
        num_args = 0..=1,
        default_missing_value = "info",
        require_equals = true
    )]
    verbose: Option<Option<LogLevel>>,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
        }
    }
}

fn main() {
    let args = Args::parse();

    let log_level = match args.verbose {
        None => LevelFilter::Off,
        Some(None) => LevelFilter::Info,
        Some(Some(level)) => level.into(),
    };
    Builder::from_default_env().filter_level(log_level).init();

    let mut config = AnalysisConfig::default();
    if let Some(path) = &args.labels {
        let labels = GroupLabels::from_tsv_file(path, args.label_column.as_deref())
            .unwrap_or_else(|e| {
                eprintln!("Failed to load labels: {}", e);
                std::process::exit(1);
            });
        println!("Loaded labels of {} organisms.", labels.len());
        config = config.with_labels(labels);
    }
    if args.max_combinations > 0 {
        config = config.with_max_combinations(args.max_combinations);
    }
    if args.timeout > 0 {
        config = config.with_timeout(Some(Duration::from_secs(args.timeout)));
    }

    let inputs = load_categories(&args.enumerations, args.powergraphs.as_deref())
        .unwrap_or_else(|e| {
            eprintln!("Failed to load inputs: {}", e);
            std::process::exit(1);
        });
    println!("Loaded {} categories.", inputs.len());

    let results = analyze_all(inputs, &config);

    let mut failed = 0;
    for (category, result) in &results {
        match result {
            Ok(analysis) => {
                let equation = analysis
                    .equation
                    .equation
                    .as_ref()
                    .map(|it| it.formula.as_str())
                    .unwrap_or("-");
                let powergraph = match analysis.consistency.as_ref().map(|it| it.verdict) {
                    None => "no powergraph",
                    Some(Verdict::Faithful) => "faithful powergraph",
                    Some(Verdict::Approximate) => "approximate powergraph",
                };
                println!(
                    "{}: {} solutions, {}; equation: {}",
                    category, analysis.equation.enumerated_count, powergraph, equation
                );
            }
            Err(e) => {
                eprintln!("{}: {}", category, e);
                failed += 1;
            }
        }
    }

    write_reports(&args.output, &results).unwrap_or_else(|e| {
        eprintln!("Failed to write reports: {}", e);
        std::process::exit(1);
    });
    println!("Reports written to {}.", args.output.display());

    if failed > 0 {
        eprintln!("{} categories failed.", failed);
        std::process::exit(1);
    }
}
