//! Argument parsing and end-to-end commands against a temporary store.

use std::fs;

use clap::Parser;
use pqr_cli::cli::{AnalyzeKind, Cli, Command};
use pqr_cli::commands::{open_controller, run};
use pqr_cli::settings::Settings;
use pqr_lifecycle::EditField;
use pqr_model::{CaseStatus, DependentField, Gate};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("pqr").chain(args.iter().copied())).unwrap()
}

fn settings_in(dir: &std::path::Path) -> Settings {
    let mut settings = Settings::default();
    settings.store.root = Some(dir.to_path_buf());
    settings.store.user_id = "ana".to_string();
    settings.assistant.enrich_on_import = false;
    settings
}

#[test]
fn test_parse_status_with_spaces() {
    let cli = parse(&["status", "123", "Traslado SIC", "--yes"]);
    let Command::Status(args) = cli.command else {
        panic!("expected status command");
    };
    assert_eq!(args.status, CaseStatus::TrasladoSic);
    assert!(args.yes);
}

#[test]
fn test_parse_flag_and_edit() {
    let Command::Flag(flag) = parse(&["flag", "123", "adjustment", "on"]).command else {
        panic!("expected flag command");
    };
    assert_eq!(flag.gate, Gate::Adjustment);
    assert!(flag.value);

    let Command::Edit(edit) = parse(&["edit", "123", "numeroTT", "TT-9"]).command else {
        panic!("expected edit command");
    };
    assert_eq!(edit.field, EditField::Dependent(DependentField::TicketNumber));
}

#[test]
fn test_unknown_edit_field_is_rejected() {
    assert!(Cli::try_parse_from(["pqr", "edit", "123", "SN", "x"]).is_err());
}

#[test]
fn test_transcribe_requires_document() {
    assert!(Cli::try_parse_from(["pqr", "analyze", "123", "--kind", "transcribe"]).is_err());
    let Command::Analyze(args) =
        parse(&["analyze", "123", "--kind", "transcribe", "--document", "carta.pdf"]).command
    else {
        panic!("expected analyze command");
    };
    assert_eq!(args.kind, AnalyzeKind::Transcribe);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["list", "--status", "Pendiente", "--log-data", "--config", "x.toml"]);
    assert!(cli.log_data);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
}

#[test]
fn test_import_status_and_export_round() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let input = dir.path().join("casos.csv");
    fs::write(
        &input,
        "SN;CUN;Nombre_Cliente;obs\n100;C-1;ana gomez;cobro doble\n101;C-2;luis;sin señal\n",
    )
    .unwrap();

    run(&parse(&["import", input.to_str().unwrap()]).command, &settings).unwrap();
    run(&parse(&["status", "100", "Iniciado"]).command, &settings).unwrap();
    run(&parse(&["observe", "101", "cliente llamó"]).command, &settings).unwrap();

    let output = dir.path().join("salida.csv");
    run(
        &parse(&["export", output.to_str().unwrap(), "--status", "Iniciado"]).command,
        &settings,
    )
    .unwrap();
    let parsed = pqr_ingest::read_case_file(&output).unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.data[0]["SN"], "100");
    assert_eq!(parsed.data[0]["Nombre_Cliente"], "ANA GOMEZ");

    let controller = open_controller(&settings).unwrap();
    let case = controller.find_by_sn("101").unwrap().record;
    assert_eq!(case.observation_log.len(), 1);
    assert_eq!(case.assigned_user, "ana");
}

#[test]
fn test_resolve_without_confirmation_fails_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    run(&parse(&["create", "200", "--name", "pedro"]).command, &settings).unwrap();

    let result = run(&parse(&["status", "200", "Resuelto"]).command, &settings);
    assert!(result.is_err());
    let controller = open_controller(&settings).unwrap();
    assert_eq!(controller.find_by_sn("200").unwrap().record.status, CaseStatus::Pendiente);

    run(&parse(&["status", "200", "Resuelto", "--yes"]).command, &settings).unwrap();
    let controller = open_controller(&settings).unwrap();
    let case = controller.find_by_sn("200").unwrap().record;
    assert_eq!(case.status, CaseStatus::Resuelto);
    assert!(case.dispatch_confirmed);
}

#[test]
fn test_mass_status_with_unknown_sn_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    run(&parse(&["create", "300"]).command, &settings).unwrap();

    let result = run(&parse(&["mass-status", "Lectura", "300", "999"]).command, &settings);
    assert!(result.is_err());
    let controller = open_controller(&settings).unwrap();
    assert_eq!(controller.find_by_sn("300").unwrap().record.status, CaseStatus::Pendiente);
}

#[test]
fn test_analyze_without_backend_reports_missing_assistant() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    run(&parse(&["create", "400"]).command, &settings).unwrap();
    let error = run(&parse(&["analyze", "400"]).command, &settings).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<pqr_lifecycle::LifecycleError>(),
        Some(pqr_lifecycle::LifecycleError::NoAssistant)
    ));
}
