// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use transeval::evaluation::scoring_criteria;
use transeval::providers::openai::OpenAICompatible;
use transeval::{
    Config, EvaluationInput, EvaluationResult, Evaluator, InMemoryGlossary, LogLevel,
    TermExtractionRequest, TerminologyMode,
};

/// CLI Wrapper for TerminologyMode to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTerminologyMode {
    #[value(name = "database", alias = "glossary")]
    Database,
    #[value(name = "reference")]
    Reference,
    #[value(name = "ai_extraction", alias = "external")]
    AiExtraction,
}

impl From<CliTerminologyMode> for TerminologyMode {
    fn from(cli_mode: CliTerminologyMode) -> Self {
        match cli_mode {
            CliTerminologyMode::Database => TerminologyMode::Glossary,
            CliTerminologyMode::Reference => TerminologyMode::ReferenceAlignment,
            CliTerminologyMode::AiExtraction => TerminologyMode::ExternalModel,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one translation
    Evaluate(EvaluateArgs),

    /// Evaluate a JSON array of inputs
    Batch(BatchArgs),

    /// Extract term pairs without scoring
    #[command(name = "extract-terms")]
    ExtractTerms(ExtractArgs),

    /// Print the scoring criteria as JSON
    Criteria,

    /// Generate shell completions for transeval
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Texts of one evaluation, inline or from files
#[derive(Args, Debug)]
struct TextArgs {
    /// Source text
    #[arg(long, conflicts_with = "source_file")]
    source: Option<String>,

    /// File containing the source text
    #[arg(long)]
    source_file: Option<PathBuf>,

    /// Translation to evaluate
    #[arg(long, conflicts_with = "translation_file")]
    translation: Option<String>,

    /// File containing the translation
    #[arg(long)]
    translation_file: Option<PathBuf>,

    /// Reference translation (repeatable)
    #[arg(short, long)]
    reference: Vec<String>,

    /// File containing a reference translation (repeatable)
    #[arg(long)]
    reference_file: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    #[command(flatten)]
    texts: TextArgs,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON file holding an array of evaluation inputs
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Write the results to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of concurrent evaluations
    #[arg(long, default_value_t = 4)]
    concurrency: usize,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    #[command(flatten)]
    texts: TextArgs,
}

/// transeval - translation quality evaluation
///
/// Scores machine translations of materials science text against reference
/// translations, a domain glossary and structural heuristics.
#[derive(Parser, Debug)]
#[command(name = "transeval")]
#[command(version = "0.1.0")]
#[command(about = "Translation quality evaluation for materials science text")]
#[command(long_about = "transeval scores a machine translation with BLEU, terminology accuracy, \
sentence structure and discourse coherence, and suggests improvements.

EXAMPLES:
    transeval evaluate --source-file src.txt --translation-file mt.txt -r \"Reference text.\"
    transeval batch inputs.json -o results.json --concurrency 8
    transeval extract-terms --source \"...\" --translation \"...\" -m reference -r \"...\"
    transeval criteria
    transeval completions bash > transeval.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

TERMINOLOGY MODES:
    database      - Curated glossary (--glossary or glossary_path in the config)
    reference     - Terms aligned between the source and the first reference
    ai_extraction - Terms extracted by an OpenAI-compatible model (needs an API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Source language code (e.g., 'zh')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Domain tag for glossary lookup
    #[arg(short, long, global = true)]
    domain: Option<String>,

    /// Glossary JSON file
    #[arg(short, long, global = true)]
    glossary: Option<PathBuf>,

    /// Term acquisition mode
    #[arg(short = 'm', long, global = true, value_enum, env = "TERMINOLOGY_EVALUATION_MODE")]
    terminology_mode: Option<CliTerminologyMode>,

    /// API key of the text-completion provider
    #[arg(long, global = true, env = "CUSTOM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the text-completion provider
    #[arg(long, global = true, env = "CUSTOM_API_BASE_URL")]
    api_base_url: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Prefix and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (prefix, color) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                prefix,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at trace so the configured level can only narrow it
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "transeval", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Criteria => {
            let config = load_config(&cli)?;
            let criteria = scoring_criteria(&config.evaluation.weights);
            println!("{}", serde_json::to_string_pretty(&criteria)?);
            return Ok(());
        }
        _ => {}
    }

    let config = load_config(&cli)?;
    let evaluator = build_evaluator(&config)?;

    match cli.command {
        Commands::Evaluate(args) => run_evaluate(&evaluator, &config, args).await,
        Commands::Batch(args) => run_batch(&evaluator, args).await,
        Commands::ExtractTerms(args) => run_extract(&evaluator, &config, args).await,
        Commands::Criteria | Commands::Completions { .. } => Ok(()),
    }
}

/// Load or create the configuration, apply CLI overrides and validate
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    if let Some(level) = cli.log_level {
        log::set_max_level(LogLevel::from(level).into());
    }

    let (mut config, created) = Config::load_or_create(&cli.config_path)?;
    if created {
        warn!(
            "Config file not found at '{}', created default config.",
            cli.config_path.display()
        );
    }

    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if let Some(source_language) = &cli.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &cli.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(domain) = &cli.domain {
        config.domain = domain.clone();
    }
    if let Some(glossary) = &cli.glossary {
        config.glossary_path = Some(glossary.clone());
    }
    if let Some(mode) = cli.terminology_mode {
        config.evaluation.terminology_mode = mode.into();
    }
    if let Some(api_key) = &cli.api_key {
        config.provider.api_key = api_key.clone();
    }
    if let Some(base_url) = &cli.api_base_url {
        config.provider.base_url = base_url.clone();
    }

    config.validate().context("Configuration validation failed")?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.into());
    }

    Ok(config)
}

/// Create an evaluator with the configured glossary and provider
fn build_evaluator(config: &Config) -> Result<Evaluator> {
    let mut evaluator = Evaluator::new(config.evaluation.clone());

    if let Some(path) = &config.glossary_path {
        let glossary = InMemoryGlossary::from_json_file(
            path,
            &config.domain,
            &config.source_language,
            &config.target_language,
        )?;
        info!("Loaded {} glossary entries from {}", glossary.len(), path.display());
        evaluator = evaluator.with_glossary(Arc::new(glossary));
    }

    if config.provider.is_usable() {
        let client = OpenAICompatible::from_config(&config.provider);
        debug!("Using text-completion endpoint {}", client.endpoint());
        evaluator = evaluator.with_completion(Arc::new(client));
    }

    Ok(evaluator)
}

fn read_text(inline: &Option<String>, file: &Option<PathBuf>, what: &str) -> Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {} file: {}", what, path.display())),
        (None, None) => Err(anyhow!("Missing {}: pass --{} or --{}-file", what, what, what)),
    }
}

fn read_references(texts: &TextArgs) -> Result<Vec<String>> {
    let mut references = texts.reference.clone();
    for path in &texts.reference_file {
        let reference = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference file: {}", path.display()))?;
        references.push(reference);
    }
    Ok(references)
}

fn build_input(texts: &TextArgs, config: &Config) -> Result<EvaluationInput> {
    Ok(EvaluationInput::new(
        read_text(&texts.source, &texts.source_file, "source")?,
        read_text(&texts.translation, &texts.translation_file, "translation")?,
        read_references(texts)?,
        config.source_language.clone(),
        config.target_language.clone(),
    )
    .with_domain(config.domain.clone()))
}

fn write_json<T: serde::Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result to JSON")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            info!("Success: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run_evaluate(evaluator: &Evaluator, config: &Config, args: EvaluateArgs) -> Result<()> {
    let input = build_input(&args.texts, config)?;
    let result = evaluator.evaluate(&input).await;
    info!(
        "Overall score {:.2} (terminology mode: {})",
        result.overall.score,
        evaluator.config().terminology_mode
    );
    write_json(&result, args.output.as_deref())
}

async fn run_batch(evaluator: &Evaluator, args: BatchArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.input_file)
        .with_context(|| format!("Failed to read batch file: {}", args.input_file.display()))?;
    let inputs: Vec<EvaluationInput> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse batch file: {}", args.input_file.display()))?;

    info!("Evaluating {} translations, please wait…", inputs.len());

    let progress_bar = ProgressBar::new(inputs.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar.set_message("Evaluating");

    let mut results: Vec<(usize, EvaluationResult)> = stream::iter(inputs.iter().enumerate())
        .map(|(index, input)| {
            let progress_bar = &progress_bar;
            async move {
                let result = evaluator.evaluate(input).await;
                progress_bar.inc(1);
                (index, result)
            }
        })
        .buffer_unordered(args.concurrency.max(1))
        .collect()
        .await;
    progress_bar.finish_with_message("Done");

    // Restore input order
    results.sort_by_key(|(index, _)| *index);
    let results: Vec<EvaluationResult> = results.into_iter().map(|(_, result)| result).collect();

    write_json(&results, args.output.as_deref())
}

async fn run_extract(evaluator: &Evaluator, config: &Config, args: ExtractArgs) -> Result<()> {
    let input = build_input(&args.texts, config)?;
    let request = TermExtractionRequest::from_input(&input);
    let terms = evaluator
        .extract_terms(&request, config.evaluation.terminology_mode)
        .await;
    write_json(&terms, None)
}
