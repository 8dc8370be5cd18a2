use anyhow::Result;
use erp_helpers::config::toml_config::{AuditSettings, HelperConfig, ReportFormat};
use erp_helpers::core::audit::AuditKind;
use erp_helpers::domain::model::{AuditReport, AuditStatus};
use erp_helpers::{AuditEngine, CsvAuditPipeline, HelperError, LocalStorage};
use tempfile::TempDir;

const EMPRESAS_CSV: &str = "\
id,razao_social,cnpj,telefone
1,Comercial Alfa Ltda,11.222.333/0001-81,(11) 3333-4444
2,Beta Distribuidora,11222333000182,
3,Gama Serviços,,(21) 98765-4321
4,Alfa Filial,11222333000181,
5,Delta Indústria,11.444.777/0001-61,
";

fn storage(dir: &TempDir) -> LocalStorage {
    LocalStorage::new(dir.path().to_str().unwrap().to_string())
}

#[test]
fn test_end_to_end_audit_writes_both_reports() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("empresas.csv"), EMPRESAS_CSV)?;

    let settings = AuditSettings {
        input_path: Some("empresas.csv".to_string()),
        column: Some("cnpj".to_string()),
        label_column: Some("razao_social".to_string()),
        kind: AuditKind::Cnpj,
        output_path: "reports".to_string(),
        output_formats: vec![ReportFormat::Csv, ReportFormat::Json],
    };
    settings.validate_for_run()?;

    let output = LocalStorage::new(
        temp_dir.path().join("reports").to_str().unwrap().to_string(),
    );
    let pipeline = CsvAuditPipeline::new(storage(&temp_dir), output, settings);
    assert!(pipeline.existing_reports().is_empty());

    let (report, written) = AuditEngine::new(pipeline).run()?;

    let statuses: Vec<AuditStatus> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            AuditStatus::Valid,
            AuditStatus::Invalid,
            AuditStatus::Missing,
            AuditStatus::Duplicate,
            AuditStatus::Valid,
        ]
    );
    assert_eq!(report.outcomes[0].label.as_deref(), Some("Comercial Alfa Ltda"));
    assert_eq!(report.outcomes[4].formatted.as_deref(), Some("11.444.777/0001-61"));
    assert_eq!(report.summary.valid, 2);
    assert_eq!(written.len(), 2);

    let csv_report = std::fs::read_to_string(temp_dir.path().join("reports/audit_report.csv"))?;
    let mut lines = csv_report.lines();
    assert_eq!(
        lines.next(),
        Some("row,label,value,kind,status,detail,formatted")
    );
    assert!(csv_report.contains("CNPJ already used on row 1"));
    assert!(csv_report.contains("check digit at position 14 does not match"));

    let json_report = std::fs::read(temp_dir.path().join("reports/audit_report.json"))?;
    let parsed: AuditReport = serde_json::from_slice(&json_report)?;
    assert_eq!(parsed, report);

    Ok(())
}

#[test]
fn test_auto_kind_on_mixed_column() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("cadastro.csv"),
        "nome,documento\nMaria,111.444.777-35\nEmpresa X,11222333000181\nJoão,123\n",
    )?;

    let config = HelperConfig::from_toml_str(
        r#"
[audit]
input_path = "cadastro.csv"
column = "DOCUMENTO"
output_formats = ["json"]
"#,
    )?;
    assert_eq!(config.audit.kind, AuditKind::Auto);

    let pipeline = CsvAuditPipeline::new(storage(&temp_dir), storage(&temp_dir), config.audit);
    let (report, written) = AuditEngine::new(pipeline).run()?;

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.valid, 2);
    assert_eq!(report.summary.invalid, 1);
    assert_eq!(written.len(), 1);
    assert!(temp_dir.path().join("audit_report.json").exists());

    Ok(())
}

#[test]
fn test_latin1_labels_do_not_abort_the_audit() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("empresas.csv"),
        b"id,raz\xe3o_social,cnpj\n1,Ind\xfastria Alfa,11222333000181\n2,Beta,11222333000182\n",
    )?;

    let settings = AuditSettings {
        input_path: Some("empresas.csv".to_string()),
        column: Some("CNPJ".to_string()),
        label_column: Some("id".to_string()),
        output_formats: vec![ReportFormat::Json],
        ..AuditSettings::default()
    };
    let pipeline = CsvAuditPipeline::new(storage(&temp_dir), storage(&temp_dir), settings);
    let (report, _) = AuditEngine::new(pipeline).run()?;

    let statuses: Vec<AuditStatus> = report.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(statuses, vec![AuditStatus::Valid, AuditStatus::Invalid]);
    assert_eq!(report.outcomes[0].label.as_deref(), Some("1"));
    Ok(())
}

#[test]
fn test_latin1_label_column_is_read_lossily() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("empresas.csv"),
        b"nome,cnpj\nInd\xfastria Alfa,11.222.333/0001-81\n",
    )?;

    let settings = AuditSettings {
        input_path: Some("empresas.csv".to_string()),
        column: Some("cnpj".to_string()),
        label_column: Some("nome".to_string()),
        kind: AuditKind::Cnpj,
        output_formats: vec![ReportFormat::Csv],
        ..AuditSettings::default()
    };
    let pipeline = CsvAuditPipeline::new(storage(&temp_dir), storage(&temp_dir), settings);
    let (report, written) = AuditEngine::new(pipeline).run()?;

    assert_eq!(report.summary.valid, 1);
    assert_eq!(report.outcomes[0].label.as_deref(), Some("Ind\u{fffd}stria Alfa"));
    assert_eq!(written.len(), 1);
    Ok(())
}

#[test]
fn test_existing_reports_are_detected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("audit_report.csv"), "old")?;

    let settings = AuditSettings {
        input_path: Some("pessoas.csv".to_string()),
        column: Some("cpf".to_string()),
        output_formats: vec![ReportFormat::Csv, ReportFormat::Json],
        ..AuditSettings::default()
    };
    let pipeline = CsvAuditPipeline::new(storage(&temp_dir), storage(&temp_dir), settings);

    let existing = pipeline.existing_reports();
    assert_eq!(existing.len(), 1);
    assert!(existing[0].ends_with("audit_report.csv"));

    Ok(())
}

#[test]
fn test_missing_column_is_a_config_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("pessoas.csv"), "nome,cpf\nAna,11144477735\n")?;

    let settings = AuditSettings {
        input_path: Some("pessoas.csv".to_string()),
        column: Some("cnpj".to_string()),
        ..AuditSettings::default()
    };
    let pipeline = CsvAuditPipeline::new(storage(&temp_dir), storage(&temp_dir), settings);

    match AuditEngine::new(pipeline).run() {
        Err(HelperError::ConfigValidationError { field, message }) => {
            assert_eq!(field, "audit.column");
            assert!(message.contains("nome, cpf"));
        }
        other => panic!("expected a config error, got {:?}", other.map(|(r, _)| r.summary)),
    }
    assert!(!temp_dir.path().join("audit_report.csv").exists());

    Ok(())
}

#[test]
fn test_missing_input_file_is_an_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let settings = AuditSettings {
        input_path: Some("nao_existe.csv".to_string()),
        column: Some("cpf".to_string()),
        ..AuditSettings::default()
    };
    let pipeline = CsvAuditPipeline::new(storage(&temp_dir), storage(&temp_dir), settings);

    let err = AuditEngine::new(pipeline).run().unwrap_err();
    assert!(matches!(err, HelperError::IoError(_)));
}
