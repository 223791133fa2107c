use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use stillrisk_cli::config::{self, StillriskConfig};
use stillrisk_cli::pipeline::{load_artifacts, Assessor};
use stillrisk_core::i18n::Language;
use stillrisk_core::models::history::Session;
use stillrisk_core::models::input::ClinicalInput;
use stillrisk_explain::openrouter::OpenRouterExplainer;
use stillrisk_export::csv::{export_history, history_file_name, import_history};
use stillrisk_export::layout::{build_report, report_file_name, ReportContent};
use stillrisk_export::pdf::{render_pdf, ReportFont};
use stillrisk_export::render::{render_statistics, render_summary};
use stillrisk_export::styles::ReportStyles;

#[derive(Parser)]
#[command(name = "stillrisk")]
#[command(about = "Stillbirth risk assessment from clinical inputs")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/stillrisk/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assess one record or an array of records
    Assess(AssessArgs),
    /// Inspect or export a saved assessment history
    History(HistoryArgs),
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct AssessArgs {
    /// JSON input file; reads stdin when omitted
    input: Option<PathBuf>,

    /// Report language (en or ar)
    #[arg(long)]
    lang: Option<Language>,

    /// Write a PDF report per assessment
    #[arg(long)]
    pdf: bool,

    /// Directory for PDF reports
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// CSV history file to append to
    #[arg(long)]
    history: Option<PathBuf>,

    /// Use rule-based explanations only
    #[arg(long)]
    no_remote: bool,

    /// Reject unknown manifest features and flag spellings
    #[arg(long)]
    strict: bool,
}

#[derive(clap::Args)]
struct HistoryArgs {
    /// CSV history file
    #[arg(long)]
    file: PathBuf,

    /// Filter by patient id or name
    #[arg(long)]
    search: Option<String>,

    /// Print case statistics
    #[arg(long)]
    stats: bool,

    /// Re-export the history to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Language for labels and exported headers
    #[arg(long)]
    lang: Option<Language>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config with secrets redacted
    Show,
    /// Print the config file location
    Path,
    /// Write a default config file if none exists
    Init,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config_path = config::config_path(cli.config.as_deref())?;
    let mut cfg = config::load_config(&config_path)?;
    cfg.apply_overrides(env_lookup);

    match cli.command {
        Command::Assess(args) => run_assess(&cfg, args),
        Command::History(args) => run_history(&cfg, args),
        Command::Config { action } => run_config(&cfg, &config_path, action),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

// ── assess ──────────────────────────────────────────────────────────

fn run_assess(cfg: &StillriskConfig, args: AssessArgs) -> Result<()> {
    let language = args.lang.unwrap_or(cfg.language);
    let output_dir = args.output_dir.unwrap_or_else(|| cfg.output_dir.clone());
    let current_year = i64::from(jiff::Zoned::now().year());

    let inputs = read_inputs(args.input.as_deref())?;

    let artifacts = load_artifacts(&cfg.model_path, &cfg.manifest_path)
        .wrap_err("failed to load model artifacts")?;
    let mut assessor = Assessor::new(&artifacts, cfg.align_policy(args.strict), current_year)?;

    if !args.no_remote {
        if let Some(remote) = cfg.remote_explainer(env_lookup) {
            assessor = assessor.with_remote(Box::new(OpenRouterExplainer::new(remote)?));
        }
    }

    let mut session = match &args.history {
        Some(path) if path.exists() => {
            let bytes = std::fs::read(path)
                .wrap_err_with(|| format!("failed to read history {}", path.display()))?;
            import_history(&bytes)?
        }
        _ => Session::new(),
    };

    let font_bytes = match &cfg.font_path {
        Some(path) if args.pdf => Some(
            std::fs::read(path)
                .wrap_err_with(|| format!("failed to read font {}", path.display()))?,
        ),
        _ => None,
    };
    let styles = ReportStyles::default();

    let mut failures = 0usize;
    for (index, input) in inputs.iter().enumerate() {
        let timestamp = jiff::Zoned::now().datetime();
        let record = match assessor.assess_into(&mut session, input, language, timestamp) {
            Ok(record) => record,
            Err(e) => {
                failures += 1;
                eprintln!("record {}: {e}", index + 1);
                continue;
            }
        };

        let content = ReportContent::from(&record);
        println!("{}", render_summary(&content)?);

        if args.pdf {
            let font = match &font_bytes {
                Some(bytes) => ReportFont::Embedded(bytes),
                None => ReportFont::Helvetica,
            };
            let bytes = render_pdf(&build_report(&content, &styles), font)?;
            std::fs::create_dir_all(&output_dir)?;
            let path = output_dir.join(report_file_name(&record.patient_id));
            std::fs::write(&path, bytes)
                .wrap_err_with(|| format!("failed to write report {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
    }

    if let Some(path) = &args.history {
        std::fs::write(path, export_history(&session, language)?)
            .wrap_err_with(|| format!("failed to write history {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = session.len(), "history saved");
    }

    if inputs.len() > 1 || args.history.is_some() {
        println!("{}", render_statistics(&session.statistics(), language)?);
    }

    if failures > 0 {
        tracing::warn!(failures, total = inputs.len(), "some records were not assessed");
    }
    Ok(())
}

/// One JSON object or an array of objects, from a file or stdin.
fn read_inputs(path: Option<&Path>) -> Result<Vec<ClinicalInput>> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read input {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let value: serde_json::Value = serde_json::from_str(&text).wrap_err("input is not JSON")?;
    let inputs = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<ClinicalInput>, _>>()?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(inputs)
}

// ── history ─────────────────────────────────────────────────────────

fn run_history(cfg: &StillriskConfig, args: HistoryArgs) -> Result<()> {
    let language = args.lang.unwrap_or(cfg.language);
    let bytes = std::fs::read(&args.file)
        .wrap_err_with(|| format!("failed to read history {}", args.file.display()))?;
    let session = import_history(&bytes)?;

    let query = args.search.as_deref().unwrap_or("");
    for entry in session.search(query) {
        println!(
            "{}  {}  {}  {} ({}%)",
            stillrisk_core::models::history::format_timestamp(&entry.timestamp),
            entry.patient_id,
            entry.patient_name,
            entry.band.label(language),
            entry.score_pct
        );
    }

    if args.stats {
        println!("{}", render_statistics(&session.statistics(), language)?);
    }

    if let Some(target) = &args.export {
        let path = if target.is_dir() {
            target.join(history_file_name(language))
        } else {
            target.clone()
        };
        std::fs::write(&path, export_history(&session, language)?)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "history exported");
    }
    Ok(())
}

// ── config ──────────────────────────────────────────────────────────

fn run_config(cfg: &StillriskConfig, path: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let info = config::config_info(cfg, env_lookup);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Init => {
            if path.exists() {
                eyre::bail!("config already exists at {}", path.display());
            }
            config::save_config(&StillriskConfig::default(), path)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
