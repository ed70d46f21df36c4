//! CLI argument definitions for the case tracker.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pqr_lifecycle::EditField;
use pqr_model::{CaseStatus, Gate, Priority};

#[derive(Parser)]
#[command(
    name = "pqr",
    version,
    about = "PQR case tracker - import, manage and export complaint cases",
    long_about = "Track PQR (peticiones, quejas y reclamos) cases through their lifecycle.\n\n\
                  Cases are addressed by SN. Settings are read from the platform config\n\
                  directory unless --config is given."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Settings file (default: platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow customer names and ids in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a CSV case file. Known SNs are updated, new ones created.
    Import(ImportArgs),

    /// Export cases to a quoted CSV file.
    Export(ExportArgs),

    /// List cases.
    List(FilterArgs),

    /// Show every field and log of one case.
    Show(ShowArgs),

    /// Create a case by hand.
    Create(CreateArgs),

    /// Change the status of a case.
    Status(StatusArgs),

    /// Reopen a resolved case.
    Reopen(CaseArg),

    /// Decree a case, creating its linked successor.
    Decree(ConfirmArgs),

    /// Turn a checkbox gate on or off.
    Flag(FlagArgs),

    /// Edit a single field.
    Edit(EditArgs),

    /// Append a note to the observation log.
    Observe(ObserveArgs),

    /// Save an escalation and move the case to Escalado.
    Escalate(EscalateArgs),

    /// Snapshot the assurance fields into the assurance log.
    Assure(AssureArgs),

    /// Link further SNs to a case; they are resolved together with it.
    Link(LinkArgs),

    /// Delete a case.
    Delete(CaseArg),

    /// Move several cases to one status; all or nothing.
    MassStatus(MassStatusArgs),

    /// Reopen several resolved cases.
    MassReopen(MassArgs),

    /// Delete several cases.
    MassDelete(MassArgs),

    /// Poll for cases stuck in Iniciado.
    Watch(WatchArgs),

    /// Counts by status, priority and category.
    Summary,

    /// Run an AI-backed operation on a case.
    Analyze(AnalyzeArgs),

    /// Show the allowed values.
    Catalog,
}

#[derive(Args)]
pub struct CaseArg {
    /// Case SN.
    #[arg(value_name = "SN")]
    pub sn: String,
}

#[derive(Args)]
pub struct ImportArgs {
    /// CSV file (comma or semicolon delimited).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Skip AI analysis and priority for new cases.
    #[arg(long = "no-enrich")]
    pub no_enrich: bool,
}

#[derive(Args, Default)]
pub struct FilterArgs {
    /// Only cases with this status.
    #[arg(long = "status")]
    pub status: Option<CaseStatus>,

    /// Only cases with this priority.
    #[arg(long = "priority")]
    pub priority: Option<Priority>,

    /// Text to look for in SN, CUN, name, national id and category.
    #[arg(long = "search")]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args)]
pub struct ShowArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    /// Print the stored record as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    #[arg(long = "cun", default_value = "")]
    pub cun: String,

    /// Customer name.
    #[arg(long = "name", default_value = "")]
    pub name: String,

    /// Customer national id.
    #[arg(long = "customer-id", default_value = "")]
    pub customer_id: String,

    #[arg(long = "obs", default_value = "")]
    pub observations: String,

    /// Filing date (YYYY-MM-DD); today when omitted.
    #[arg(long = "filed")]
    pub filing_date: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    /// Target status, e.g. "Iniciado" or "Resuelto".
    #[arg(value_name = "STATUS")]
    pub status: CaseStatus,

    /// Answer yes to the confirmation prompt.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

#[derive(Args)]
pub struct ConfirmArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    /// Answer yes to the confirmation prompt.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

#[derive(Args)]
pub struct FlagArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    /// Gate: dispatch, assurance, cancellation, adjustment or refund.
    #[arg(value_name = "GATE")]
    pub gate: Gate,

    /// on or off.
    #[arg(
        value_name = "VALUE",
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub value: bool,
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    /// Persisted field key, e.g. numeroTT or Prioridad.
    #[arg(value_name = "FIELD")]
    pub field: EditField,

    #[arg(value_name = "VALUE")]
    pub value: String,
}

#[derive(Args)]
pub struct ObserveArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[derive(Args)]
pub struct EscalateArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    #[arg(long = "area")]
    pub area: String,

    #[arg(long = "reason")]
    pub reason: String,

    /// Ticket id assigned by the receiving area.
    #[arg(long = "ticket-id", default_value = "")]
    pub ticket_id: String,

    /// Generated requirement number.
    #[arg(long = "requirement", default_value = "")]
    pub requirement: String,

    #[arg(long = "description", default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct AssureArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    #[arg(long = "note", default_value = "")]
    pub note: String,
}

#[derive(Args)]
pub struct LinkArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    /// Linked cases as SN or SN:CUN.
    #[arg(value_name = "LINKED", required = true)]
    pub linked: Vec<String>,

    #[arg(long = "note", default_value = "")]
    pub note: String,
}

#[derive(Args)]
pub struct MassStatusArgs {
    /// Target status for every case.
    #[arg(value_name = "STATUS")]
    pub status: CaseStatus,

    #[arg(value_name = "SN", required = true)]
    pub sns: Vec<String>,
}

#[derive(Args)]
pub struct MassArgs {
    #[arg(value_name = "SN", required = true)]
    pub sns: Vec<String>,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Evaluate once and exit.
    #[arg(long = "once")]
    pub once: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[arg(value_name = "SN")]
    pub sn: String,

    #[arg(long = "kind", value_enum, default_value = "analysis")]
    pub kind: AnalyzeKind,

    /// Document to transcribe (image or PDF); required for `transcribe`.
    #[arg(long = "document", value_name = "PATH", required_if_eq("kind", "transcribe"))]
    pub document: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AnalyzeKind {
    /// Analysis and complaint category.
    Analysis,
    /// Short summary.
    Summary,
    /// Projected response to the customer.
    Projection,
    /// Suggested escalation area and reason.
    Escalation,
    /// Transcribe an attached document.
    Transcribe,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
