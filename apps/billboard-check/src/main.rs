//! billboard-check - run the compliance engine from the command line
//!
//! Results go to stdout as JSON; logs go to stderr so output can be piped.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use compliance_engine::{
    ComplianceChecker, ComplianceConfig, ConfigError, ReportRecord, RetentionPolicy,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{BillboardSnapshot, ReportContext, RuleCategory};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "billboard-check")]
#[command(version, about = "Evaluate billboards against a municipal compliance rule set")]
struct Cli {
    /// Rule set JSON file (built-in default rules when omitted)
    #[arg(long, global = true, env = "BILLBOARD_RULES_PATH")]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a billboard snapshot; exits with 2 when it is not compliant
    Check {
        /// Billboard snapshot JSON file
        #[arg(long)]
        billboard: PathBuf,

        /// Report context JSON file (location / content analysis)
        #[arg(long)]
        context: Option<PathBuf>,
    },

    /// List the rules that apply to a zone and billboard type
    Rules {
        #[arg(long)]
        zone: String,

        #[arg(long)]
        billboard_type: String,
    },

    /// Check a rule set file for configuration defects
    ValidateConfig { path: PathBuf },

    /// Plan anonymization and deletion for a list of report records
    Retention {
        /// JSON array of report records
        #[arg(long)]
        reports: PathBuf,

        /// Evaluation instant (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
}

/// How a command finished, mapped onto the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    /// The billboard has at least one violation
    NonCompliant,
    /// The rule set file has configuration defects
    InvalidConfig,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::NonCompliant => ExitCode::from(2),
            Outcome::InvalidConfig => ExitCode::FAILURE,
        }
    }
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    run(cli).map(Outcome::exit_code)
}

fn run(cli: Cli) -> Result<Outcome> {
    match cli.command {
        Command::Check { billboard, context } => {
            let config = load_config(cli.config.as_deref())?;
            check(config, &billboard, context.as_deref(), cli.pretty)
        }
        Command::Rules {
            zone,
            billboard_type,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let rules = config.applicable_rules(&zone, &billboard_type)?;

            let listing: serde_json::Map<String, serde_json::Value> = RuleCategory::ALL
                .into_iter()
                .map(|category| {
                    let ids: Vec<&str> = rules
                        .iter()
                        .filter(|r| r.category() == category)
                        .map(|r| r.rule_id())
                        .collect();
                    (category.as_str().to_string(), serde_json::json!(ids))
                })
                .collect();

            print_json(&listing, cli.pretty)?;
            Ok(Outcome::Success)
        }
        Command::ValidateConfig { path } => {
            let defects = config_defects(&path)?;
            if defects.is_empty() {
                return Ok(Outcome::Success);
            }

            for defect in &defects {
                tracing::error!("{}", defect);
            }
            Ok(Outcome::InvalidConfig)
        }
        Command::Retention { reports, now } => {
            let reports: Vec<ReportRecord> = read_json(&reports)?;
            let now = now.unwrap_or_else(Utc::now);
            let policy = RetentionPolicy::default();
            let plan = policy.plan(now, &reports)?;

            tracing::info!(
                anonymize = plan.anonymize.len(),
                delete = plan.delete.len(),
                images = plan.delete_original_images.len(),
                "Retention plan computed"
            );
            print_json(&plan, cli.pretty)?;
            Ok(Outcome::Success)
        }
    }
}

/// Evaluate one billboard file and print the result
fn check(
    config: ComplianceConfig,
    billboard: &Path,
    context: Option<&Path>,
    pretty: bool,
) -> Result<Outcome> {
    let billboard: BillboardSnapshot = read_json(billboard)?;
    let context: ReportContext = match context {
        Some(path) => read_json(path)?,
        None => ReportContext::empty(),
    };

    let checker = ComplianceChecker::new(Arc::new(config));
    let result = checker.evaluate(&billboard, &context)?;
    print_json(&result, pretty)?;

    Ok(if result.is_compliant {
        Outcome::Success
    } else {
        Outcome::NonCompliant
    })
}

/// Parse a rule set file without rejecting it, so every defect can be reported
fn config_defects(path: &Path) -> Result<Vec<ConfigError>> {
    let config: ComplianceConfig = read_json(path)?;
    let defects = config.defects();
    if defects.is_empty() {
        tracing::info!(
            jurisdiction = %config.jurisdiction,
            rules = config.rule_count(),
            "Rule set is valid"
        );
    }
    Ok(defects)
}

fn load_config(path: Option<&Path>) -> Result<ComplianceConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading rule set from {}", path.display());
            ComplianceConfig::from_path(path)
                .with_context(|| format!("Failed to load rule set {}", path.display()))
        }
        None => Ok(ComplianceConfig::default_config()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}
