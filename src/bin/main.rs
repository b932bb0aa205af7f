use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use crossterm::style::Stylize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use stranger_core::core::alphabet::{threshold_for, LOWERCASE_MODEL_TYPE, MAX_NG_THRESHOLD};
use stranger_core::learning::TrigramLearner;
use stranger_core::persistence::{save_compiled, save_model_file};
use stranger_core::report::{dedup_by_original, render, sort_results, OutputFormat, SortOrder};
use stranger_core::scan::DEFAULT_MIN_LENGTH;
use stranger_core::{AnalysisResult, ModelSource, StringAnalyzer};
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_MODEL_PATH: &str = "./StringModel.sng";

/// Extract and analyze meaningful strings from binary files using trigram scoring
#[derive(Parser, Debug)]
#[command(name = "stranger_strings", version)]
struct Cli {
    /// Input file to analyze, or "-" to read whitespace-separated words from stdin
    input: Option<String>,

    /// Path to the .sng model file
    #[arg(short, long, env = "STRANGER_STRINGS_MODEL", default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Treat --model as a compiled snapshot instead of model text
    #[arg(long)]
    compiled: bool,

    /// Show rejected strings, detailed scores and a summary
    #[arg(short, long)]
    verbose: bool,

    /// Minimum string length for binary extraction
    #[arg(short = 'l', long, default_value_t = DEFAULT_MIN_LENGTH)]
    min_length: usize,

    /// Show each unique string only once, keeping its best score
    #[arg(short, long)]
    unique: bool,

    /// Sort results by: score, alpha, offset
    #[arg(short, long, default_value = "score", value_parser = ["score", "alpha", "offset"])]
    sort: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: text, json, csv
    #[arg(short, long, default_value = "text", value_parser = ["text", "json", "csv"])]
    format: String,

    /// Show model information and exit
    #[arg(long)]
    info: bool,

    /// Run the built-in sample strings through the model
    #[arg(long)]
    test: bool,

    /// Learn a model from a corpus (one sample per line) and write it to --output
    #[arg(long, value_name = "CORPUS")]
    train: Option<PathBuf>,

    /// Model type label written by --train
    #[arg(long, default_value = LOWERCASE_MODEL_TYPE)]
    model_type: String,

    /// Write a compiled snapshot of the loaded model to this path
    #[arg(long, value_name = "PATH")]
    compile: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries results.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    if let Some(corpus) = &cli.train {
        return train_command(corpus, &cli);
    }
    if cli.info {
        return info_command(&cli);
    }
    if cli.test {
        return test_command(&cli);
    }
    if let Some(target) = &cli.compile {
        return compile_command(target, &cli);
    }

    match &cli.input {
        Some(input) => analyze_command(input, &cli),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn load_analyzer(cli: &Cli) -> Result<StringAnalyzer> {
    if !cli.model.exists() {
        bail!("Model file not found: {}", cli.model.display());
    }

    let source = if cli.compiled {
        ModelSource::Compiled(cli.model.clone())
    } else {
        ModelSource::Path(cli.model.clone())
    };

    let mut analyzer = StringAnalyzer::new();
    analyzer
        .load_model(source)
        .with_context(|| format!("failed to load model {}", cli.model.display()))?;

    let info = analyzer.model_info()?;
    debug!(model_type = %info.model_type, lowercase = info.is_lowercase, "model ready");
    Ok(analyzer)
}

fn analyze_command(input: &str, cli: &Cli) -> Result<()> {
    let analyzer = load_analyzer(cli)?;

    let (results, from_binary) = if input == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).context("failed to read stdin")?;
        let words: Vec<&str> = text.split_whitespace().collect();
        (analyzer.analyze_strings(&words[..])?, false)
    } else {
        let path = Path::new(input);
        if !path.exists() {
            bail!("File not found: {}", input);
        }
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", input))?;
        (analyzer.analyze_binary(&bytes, cli.min_length)?, true)
    };

    let mut shown: Vec<AnalysisResult> = if cli.verbose {
        results.clone()
    } else {
        results.iter().filter(|r| r.is_valid).cloned().collect()
    };

    if cli.unique {
        shown = dedup_by_original(shown);
    }

    let mut order: SortOrder = cli.sort.parse().map_err(anyhow::Error::msg)?;
    if order == SortOrder::Offset && !from_binary {
        warn!("offset sorting only applies to binary input, sorting by score instead");
        order = SortOrder::Score;
    }
    sort_results(&mut shown, order);

    let format: OutputFormat = cli.format.parse().map_err(anyhow::Error::msg)?;
    let rendered = render(&shown, format, cli.verbose)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if cli.verbose {
                eprintln!("Results written to: {}", path.display());
            }
        }
        None => println!("{}", rendered),
    }

    if cli.verbose {
        print_summary(&results, cli.unique.then_some(shown.len()));
    }
    Ok(())
}

fn print_summary(results: &[AnalysisResult], unique_shown: Option<usize>) {
    let valid = results.iter().filter(|r| r.is_valid).count();
    let total = results.len();
    let rate = if total > 0 { valid as f64 / total as f64 * 100.0 } else { 0.0 };
    let unique_note = unique_shown
        .map(|n| format!(" ({} unique shown)", n))
        .unwrap_or_default();

    eprintln!("\nSummary:");
    eprintln!("  Accepted: {} strings", valid);
    eprintln!("  Rejected: {} strings", total - valid);
    eprintln!("  Total: {} strings", total);
    eprintln!("  Acceptance rate: {:.1}%{}", rate, unique_note);
}

fn test_command(cli: &Cli) -> Result<()> {
    let analyzer = load_analyzer(cli)?;

    let cases: [(&str, &[&str]); 4] = [
        ("Valid English", &["hello", "world", "function", "initialize", "process"]),
        ("Valid Technical", &["file_inherit", "total %qu", "Error: %s", "main()", "sizeof"]),
        ("Invalid Random", &[".CRT$XIC", "Ta&@", "xZ#@$%", "!@#$%^&*", "}{][++"]),
        ("Edge Cases", &["ab", "a", "", "123", "XML"]),
    ];

    let info = analyzer.model_info()?;
    println!("=== StrangerStrings Test Results ===\n");
    println!("Model: {} (lowercase: {})\n", info.model_type, info.is_lowercase);

    for (category, strings) in cases {
        println!("{}:", category);
        println!("{}", "-".repeat(category.len() + 1));

        for candidate in strings.iter() {
            let result = analyzer.analyze_string(candidate, None)?;
            let status = if result.is_valid {
                "\u{2713}".green()
            } else {
                "\u{2717}".red()
            };

            if cli.verbose {
                println!(
                    "  {} \"{}\" \u{2192} score: {:.3}, threshold: {:.3}",
                    status, candidate, result.score, result.threshold
                );
            } else {
                println!("  {} \"{}\"", status, candidate);
            }
        }
        println!();
    }
    Ok(())
}

fn info_command(cli: &Cli) -> Result<()> {
    let analyzer = load_analyzer(cli)?;
    let info = analyzer.model_info()?;
    let meta = fs::metadata(&cli.model)?;

    println!("=== Model Information ===");
    println!("File: {}", cli.model.display());
    println!("Size: {:.1} KB", meta.len() as f64 / 1024.0);
    println!("Type: {}", info.model_type);
    println!("Lowercase: {}", info.is_lowercase);
    if let Ok(modified) = meta.modified() {
        let modified: chrono::DateTime<chrono::Utc> = modified.into();
        println!("Modified: {}", modified.to_rfc3339());
    }

    println!("\n=== Threshold Information ===");
    println!("Length-based thresholds:");
    for len in 4..=20 {
        println!("  Length {:>2}: {:.3}", len, threshold_for(len));
    }
    println!("  Length 50+: {}", threshold_for(50));
    println!("  Length 100+: {}", MAX_NG_THRESHOLD);
    Ok(())
}

fn train_command(corpus: &Path, cli: &Cli) -> Result<()> {
    let text = fs::read_to_string(corpus)
        .with_context(|| format!("failed to read corpus {}", corpus.display()))?;

    let mut learner = TrigramLearner::new(cli.model_type.to_lowercase() == LOWERCASE_MODEL_TYPE);
    let learned = learner.learn_corpus(&text)?;
    if learned == 0 {
        bail!("corpus {} has no samples of 3 or more characters", corpus.display());
    }
    debug!(samples = learned, "learned corpus");

    let counts = learner.into_counts();
    match &cli.output {
        Some(path) => {
            save_model_file(&counts, &cli.model_type, path)?;
            eprintln!("Learned {} samples into {}", learned, path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            stranger_core::parser::write_model(&counts, &cli.model_type, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn compile_command(target: &Path, cli: &Cli) -> Result<()> {
    let analyzer = load_analyzer(cli)?;
    let model = analyzer
        .model()
        .context("model missing after load")?;
    save_compiled(model, target)?;
    eprintln!("Compiled model written to {}", target.display());
    Ok(())
}
