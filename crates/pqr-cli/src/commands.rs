//! Subcommand handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use pqr_assist::HttpBackend;
use pqr_ingest::read_case_file;
use pqr_lifecycle::{
    CancellationToken, CaseContext, CaseFilter, Controller, EscalationInput, ImportOptions,
    StuckCaseMonitor, TransitionOutcome,
};
use pqr_model::{CaseRecord, Clock};
use pqr_output::{CaseSummary, export_to_path};
use pqr_store::{CollectionPath, DocumentId, FileStore};
use tokio::runtime::Runtime;
use tracing::{info, info_span, warn};

use crate::cli::{
    AnalyzeArgs, AnalyzeKind, AssureArgs, Command, ConfirmArgs, CreateArgs, EditArgs,
    EscalateArgs, ExportArgs, FilterArgs, FlagArgs, ImportArgs, LinkArgs, MassArgs,
    MassStatusArgs, ObserveArgs, ShowArgs, StatusArgs, WatchArgs,
};
use crate::logging::redact_value;
use crate::settings::Settings;
use crate::tables;

/// Opens the user's collection and wires the controller.
pub fn open_controller(settings: &Settings) -> Result<Controller> {
    let catalog = Arc::new(settings.catalog()?);
    let root = settings.store_root();
    let collection = CollectionPath::new(&settings.store.app_id, &settings.store.user_id);
    let store = FileStore::open(&root, &collection)
        .with_context(|| format!("open case store under {}", root.display()))?;
    info!(path = %store.path().display(), "opened case store");

    let ctx = CaseContext::with_system_clock(Arc::new(store), settings.store.user_id.clone());
    let mut controller = Controller::new(catalog, ctx);
    if let Some(url) = &settings.assistant.url {
        let backend = HttpBackend::new(url.clone()).context("create AI backend client")?;
        controller = controller.with_assistant(Arc::new(backend));
    }
    Ok(controller)
}

pub fn run(command: &Command, settings: &Settings) -> Result<()> {
    let controller = open_controller(settings)?;
    match command {
        Command::Import(args) => run_import(&controller, args, settings),
        Command::Export(args) => run_export(&controller, args),
        Command::List(args) => run_list(&controller, args),
        Command::Show(args) => run_show(&controller, args),
        Command::Create(args) => run_create(&controller, args),
        Command::Status(args) => run_status(&controller, args),
        Command::Reopen(args) => {
            let id = resolve(&controller, &args.sn)?;
            controller.reopen(&id)?;
            println!("Caso {} reabierto.", args.sn);
            Ok(())
        }
        Command::Decree(args) => run_decree(&controller, args),
        Command::Flag(args) => run_flag(&controller, args),
        Command::Edit(args) => run_edit(&controller, args),
        Command::Observe(args) => run_observe(&controller, args),
        Command::Escalate(args) => run_escalate(&controller, args),
        Command::Assure(args) => run_assure(&controller, args),
        Command::Link(args) => run_link(&controller, args),
        Command::Delete(args) => {
            let id = resolve(&controller, &args.sn)?;
            controller.delete_case(&id)?;
            println!("Caso {} eliminado.", args.sn);
            Ok(())
        }
        Command::MassStatus(args) => run_mass_status(&controller, args),
        Command::MassReopen(args) => {
            let ids = resolve_all(&controller, &args.sns)?;
            let report = controller.mass_reopen(&ids)?;
            println!(
                "{} casos reabiertos, {} omitidos (no estaban en Resuelto).",
                report.reopened, report.skipped
            );
            Ok(())
        }
        Command::MassDelete(args) => run_mass_delete(&controller, args),
        Command::Watch(args) => run_watch(&controller, args, settings),
        Command::Summary => run_summary(&controller),
        Command::Analyze(args) => run_analyze(&controller, args),
        Command::Catalog => {
            println!("{}", tables::catalog(controller.catalog()));
            Ok(())
        }
    }
}

fn resolve(controller: &Controller, sn: &str) -> Result<DocumentId> {
    Ok(controller.find_by_sn(sn.trim())?.id)
}

/// Resolves every SN before anything is written.
fn resolve_all(controller: &Controller, sns: &[String]) -> Result<Vec<DocumentId>> {
    sns.iter().map(|sn| resolve(controller, sn)).collect()
}

fn filter_from(args: &FilterArgs) -> CaseFilter {
    CaseFilter {
        status: args.status,
        priority: args.priority,
        search: args.search.clone(),
    }
}

fn today(controller: &Controller) -> chrono::NaiveDate {
    controller.context().clock.today()
}

fn run_import(controller: &Controller, args: &ImportArgs, settings: &Settings) -> Result<()> {
    let span = info_span!("import", file = %args.file.display());
    let _guard = span.enter();

    let parsed = read_case_file(&args.file)
        .with_context(|| format!("read case file {}", args.file.display()))?;
    if parsed.is_empty() {
        println!("El archivo no tiene filas de datos.");
        return Ok(());
    }

    let progress = ProgressBar::new(parsed.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} filas ({eta})")?
            .progress_chars("=> "),
    );
    let options = ImportOptions {
        enrich: settings.assistant.enrich_on_import && !args.no_enrich,
    };
    let cancel = CancellationToken::new();
    let interrupts = cancel_on(&cancel, tokio::signal::ctrl_c())?;
    let report = controller.import(&parsed, options, &cancel, |done| {
        progress.set_position(done as u64);
    });
    interrupts.shutdown_background();
    let report = report?;
    progress.finish_and_clear();

    println!(
        "{} agregados, {} actualizados, {} sin SN.",
        report.added, report.updated, report.skipped
    );
    if report.enrichment_failures > 0 {
        println!(
            "{} casos sin análisis IA (prioridad Media por defecto).",
            report.enrichment_failures
        );
    }
    for failure in &report.failures {
        println!("Fila {} (SN {}): {}", failure.row, failure.sn, failure.message);
    }
    if report.cancelled {
        println!("Importación cancelada tras {} filas.", report.processed());
    }
    Ok(())
}

/// Cancels `token` once `signal` resolves, for as long as the returned
/// runtime lives. The import loop stops at the next row.
fn cancel_on<F>(token: &CancellationToken, signal: F) -> Result<Runtime>
where
    F: Future<Output = std::io::Result<()>> + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("start interrupt handler")?;
    let token = token.clone();
    runtime.spawn(async move {
        match signal.await {
            Ok(()) => {
                warn!("interrupt received, stopping import after the current row");
                token.cancel();
            }
            Err(error) => warn!(%error, "could not listen for Ctrl-C"),
        }
    });
    Ok(runtime)
}

fn run_export(controller: &Controller, args: &ExportArgs) -> Result<()> {
    let cases = controller.list(&filter_from(&args.filter))?;
    let records: Vec<CaseRecord> = cases.into_iter().map(|c| c.record).collect();
    let count = export_to_path(&records, &args.file)?;
    println!("{count} casos exportados a {}.", args.file.display());
    Ok(())
}

fn run_list(controller: &Controller, args: &FilterArgs) -> Result<()> {
    let cases = controller.list(&filter_from(args))?;
    if cases.is_empty() {
        println!("No hay casos.");
        return Ok(());
    }
    println!("{}", tables::case_list(&cases, today(controller)));
    println!("{} casos.", cases.len());
    Ok(())
}

fn run_show(controller: &Controller, args: &ShowArgs) -> Result<()> {
    let case = controller.find_by_sn(args.sn.trim())?;
    tracing::debug!(sn = %case.record.sn, customer = redact_value(&case.record.customer_name), "showing case");
    if args.json {
        println!("{}", serde_json::to_string_pretty(&case.record)?);
        return Ok(());
    }
    println!("{}", tables::case_detail(&case, today(controller)));
    let duplicates = controller.duplicates_of(&case.id)?;
    if !duplicates.is_empty() {
        let sns: Vec<&str> = duplicates.iter().map(|d| d.record.sn.as_str()).collect();
        println!("Posibles duplicados: {}", sns.join(", "));
    }
    Ok(())
}

fn run_create(controller: &Controller, args: &CreateArgs) -> Result<()> {
    let mut record = CaseRecord::new(args.sn.clone());
    record.cun.clone_from(&args.cun);
    record.customer_name.clone_from(&args.name);
    record.customer_id.clone_from(&args.customer_id);
    record.observations.clone_from(&args.observations);
    if let Some(date) = &args.filing_date {
        record.filing_date.clone_from(date);
    }
    let id = controller.create_manual(record)?;
    info!(%id, sn = %args.sn, customer = redact_value(&args.name), "created case");
    println!("Caso {} creado.", args.sn);
    Ok(())
}

fn report_outcome(sn: &str, outcome: TransitionOutcome) -> Result<()> {
    match outcome {
        TransitionOutcome::Applied(status) => println!("Caso {sn}: {status}."),
        TransitionOutcome::Unchanged => println!("Caso {sn}: sin cambios."),
        TransitionOutcome::ConfirmationRequired(prompt) => {
            bail!("{prompt}\nRepita el comando con --yes para confirmar.")
        }
        TransitionOutcome::Decreed { successor_sn, .. } => {
            println!("Caso {sn} decretado. Nuevo caso {successor_sn} en Decretado.");
        }
    }
    Ok(())
}

fn run_status(controller: &Controller, args: &StatusArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    let outcome = controller.change_status(&id, args.status, args.yes)?;
    report_outcome(&args.sn, outcome)
}

fn run_decree(controller: &Controller, args: &ConfirmArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    let outcome = controller.decree(&id, args.yes)?;
    report_outcome(&args.sn, outcome)
}

fn run_flag(controller: &Controller, args: &FlagArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    let record = controller.set_flag(&id, args.gate, args.value)?;
    let state = if args.value { "activado" } else { "desactivado" };
    println!("Caso {}: {} {state}. Estado: {}.", args.sn, args.gate, record.status);
    Ok(())
}

fn run_edit(controller: &Controller, args: &EditArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    let record = controller.edit_field(&id, args.field, &args.value)?;
    println!("Caso {} actualizado. Estado: {}.", args.sn, record.status);
    Ok(())
}

fn run_observe(controller: &Controller, args: &ObserveArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    controller.add_observation(&id, &args.text)?;
    println!("Observación agregada al caso {}.", args.sn);
    Ok(())
}

fn run_escalate(controller: &Controller, args: &EscalateArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    let input = EscalationInput {
        area: args.area.clone(),
        reason: args.reason.clone(),
        ticket_id: args.ticket_id.clone(),
        requirement: args.requirement.clone(),
        description: args.description.clone(),
    };
    controller.save_escalation(&id, &input)?;
    println!("Caso {} escalado a {} ({}).", args.sn, args.area, args.reason);
    Ok(())
}

fn run_assure(controller: &Controller, args: &AssureArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    controller.save_assurance(&id, &args.note)?;
    println!("Aseguramiento registrado en el caso {}.", args.sn);
    Ok(())
}

/// Splits `SN` or `SN:CUN`.
fn parse_link(value: &str) -> (String, String) {
    match value.split_once(':') {
        Some((sn, cun)) => (sn.trim().to_string(), cun.trim().to_string()),
        None => (value.trim().to_string(), String::new()),
    }
}

fn run_link(controller: &Controller, args: &LinkArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    let links: Vec<(String, String)> = args.linked.iter().map(|l| parse_link(l)).collect();
    let count = controller.add_accumulated_sns(&id, &links, &args.note)?;
    println!("{count} SN vinculados al caso {}.", args.sn);
    Ok(())
}

fn run_mass_status(controller: &Controller, args: &MassStatusArgs) -> Result<()> {
    let ids = resolve_all(controller, &args.sns)?;
    let count = controller.mass_change_status(&ids, args.status)?;
    println!("{count} casos movidos a {}.", args.status);
    Ok(())
}

fn run_mass_delete(controller: &Controller, args: &MassArgs) -> Result<()> {
    let ids = resolve_all(controller, &args.sns)?;
    let count = controller.mass_delete(&ids)?;
    println!("{count} casos eliminados.");
    Ok(())
}

fn run_watch(controller: &Controller, args: &WatchArgs, settings: &Settings) -> Result<()> {
    let mut monitor = StuckCaseMonitor::new(settings.monitor.stuck_threshold_minutes);
    let interval = settings.monitor.poll_interval();
    info!(
        threshold = settings.monitor.stuck_threshold_minutes,
        interval_secs = interval.as_secs(),
        "watching for stuck cases"
    );
    loop {
        let cases = controller.observe()?;
        let alerts = monitor.evaluate(&cases, controller.context().clock.now());
        if !alerts.is_empty() {
            println!("{}", tables::stuck_alerts(&alerts));
        }
        if args.once {
            return Ok(());
        }
        std::thread::sleep(interval);
    }
}

fn run_summary(controller: &Controller) -> Result<()> {
    let cases = controller.observe()?;
    let summary = CaseSummary::from_cases(cases.iter().map(|c| &c.record));
    println!("{}", tables::summary(&summary));
    Ok(())
}

/// MIME type from the file extension.
fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

fn run_analyze(controller: &Controller, args: &AnalyzeArgs) -> Result<()> {
    let id = resolve(controller, &args.sn)?;
    match args.kind {
        AnalyzeKind::Analysis => {
            let record = controller.generate_analysis(&id)?;
            println!("Categoría: {}\n\n{}", record.category, record.ai_analysis);
        }
        AnalyzeKind::Summary => {
            let record = controller.generate_summary(&id)?;
            println!("{}", record.ai_summary);
        }
        AnalyzeKind::Projection => {
            let record = controller.project_response(&id)?;
            println!("{}", record.ai_response_projection);
        }
        AnalyzeKind::Escalation => {
            let suggestion = controller.suggest_escalation(&id)?;
            println!("Área: {}\nMotivo: {}", suggestion.area, suggestion.reason);
        }
        AnalyzeKind::Transcribe => {
            let path = args
                .document
                .as_deref()
                .ok_or_else(|| anyhow!("--document is required for transcribe"))?;
            let bytes = std::fs::read(path)
                .with_context(|| format!("read document {}", path.display()))?;
            let record = controller.transcribe_document(&id, mime_type_for(path), &bytes)?;
            println!("{}", record.attached_document);
        }
    }
    Ok(())
}
