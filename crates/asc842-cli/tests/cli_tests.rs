use assert_cmd::cargo_bin;
use predicates::prelude::*;
use assert_cmd::Command;

fn asc842() -> Command {
    Command::new(cargo_bin!("asc842"))
}

const EQUIPMENT_LEASE: &[&str] = &[
    "--monthly-payment",
    "1000",
    "--lease-term-months",
    "60",
    "--discount-rate",
    "0.05",
    "--fair-value",
    "50000",
    "--asset-life-months",
    "60",
];

#[test]
fn test_version() -> Result<(), Box<dyn std::error::Error>> {
    asc842()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("asc842 "));
    Ok(())
}

#[test]
fn test_classify_from_flags() -> Result<(), Box<dyn std::error::Error>> {
    asc842()
        .arg("classify")
        .args(EQUIPMENT_LEASE)
        .args(["--output", "minimal"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::diff("Finance\n"));
    Ok(())
}

#[test]
fn test_missing_flag_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    asc842()
        .args(["classify", "--lease-term-months", "12"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--monthly-payment is required"));
    Ok(())
}

#[test]
fn test_validation_errors_exit_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    asc842()
        .args([
            "initial-recognition",
            "--monthly-payment",
            "0",
            "--lease-term-months",
            "12",
            "--discount-rate",
            "0.06",
        ])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Monthly payment must be positive"));
    Ok(())
}

#[test]
fn test_unified_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let request = r#"{
        "monthly_payment": "1000",
        "lease_term_months": 60,
        "discount_rate": "0.05",
        "fair_value": "50000",
        "asset_life_months": 60,
        "lease_commencement_date": "2024-01-01"
    }"#;
    asc842()
        .args(["unified", "--output", "minimal"])
        .write_stdin(request)
        .assert()
        .success()
        .stdout(predicate::str::diff("Finance\n"));
    Ok(())
}

#[test]
fn test_amortization_csv_has_one_row_per_month() -> Result<(), Box<dyn std::error::Error>> {
    let output = asc842()
        .args([
            "amortization",
            "--monthly-payment",
            "500",
            "--lease-term-months",
            "12",
            "--discount-rate",
            "0.04",
            "--output",
            "csv",
        ])
        .write_stdin("")
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let header = stdout.lines().next().unwrap_or_default();
    assert!(header.contains("begin_liability"));
    assert!(header.contains("interest_expense"));
    // header + 12 months
    assert_eq!(stdout.lines().count(), 13);
    Ok(())
}

#[test]
fn test_treasury_rate_lookup() -> Result<(), Box<dyn std::error::Error>> {
    asc842()
        .args(["treasury-rates", "--term-months", "60", "--output", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0.0435\n"));
    Ok(())
}

#[test]
fn test_treasury_rate_by_years() -> Result<(), Box<dyn std::error::Error>> {
    asc842()
        .args(["treasury-rates", "--term-years", "4", "--output", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::diff("0.0435\n"));
    asc842()
        .args(["treasury-rates", "--term-years", "4", "--term-months", "48"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_remeasure_from_flags() -> Result<(), Box<dyn std::error::Error>> {
    asc842()
        .args([
            "remeasure",
            "--current-liability",
            "50000",
            "--current-rou",
            "48000",
            "--new-payment",
            "2000",
            "--remaining-term",
            "24",
            "--new-rate",
            "0",
            "--output",
            "minimal",
        ])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::diff("48000\n"));
    Ok(())
}

#[test]
fn test_export_schedule_writes_workbook() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!("asc842_schedule_{}.xlsx", std::process::id()));
    asc842()
        .arg("export-schedule")
        .args(EQUIPMENT_LEASE)
        .args(["--lease-type", "finance", "--out"])
        .arg(&path)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Amortization Schedule"));

    let bytes = std::fs::read(&path)?;
    assert_eq!(&bytes[..2], b"PK");
    std::fs::remove_file(&path)?;
    Ok(())
}
