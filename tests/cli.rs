use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const BIN_NAME: &str = "forecast";
const AS_OF: &str = "2024-01-15";

fn forecast(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("BUDGET_FORECAST_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .args(["--as-of", AS_OF]);
    cmd
}

fn add_bank(dir: &Path, name: &str, balance: &str, rate: &str) {
    forecast(dir)
        .args(["bank", "add", name, "--balance", balance, "--rate", rate])
        .assert()
        .success();
}

#[test]
fn bank_add_then_list_shows_account_and_interest_item() {
    let dir = TempDir::new().unwrap();

    forecast(dir.path())
        .args(["bank", "add", "Savings", "--balance", "12000", "--rate", "4.5"])
        .assert()
        .success()
        .stdout(contains("Created bank account: Savings"));

    forecast(dir.path())
        .args(["bank", "list"])
        .assert()
        .success()
        .stdout(contains("Savings").and(contains("1 account(s)")));

    forecast(dir.path())
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(contains("Savings Interest"));
}

#[test]
fn invalid_bank_reports_every_problem() {
    let dir = TempDir::new().unwrap();

    forecast(dir.path())
        .args(["bank", "add", "X", "--balance", "-5"])
        .assert()
        .code(2)
        .stderr(
            contains("Bank name must be at least 2 characters long")
                .and(contains("Balance must be a positive number")),
        );

    forecast(dir.path())
        .args(["bank", "list"])
        .assert()
        .success()
        .stdout(contains("No bank accounts found."));
}

#[test]
fn unknown_bank_is_not_found() {
    let dir = TempDir::new().unwrap();

    forecast(dir.path())
        .args(["bank", "show", "Nowhere"])
        .assert()
        .code(2)
        .stderr(contains("Bank account not found: Nowhere"));
}

#[test]
fn budget_item_links_to_bank_by_name() {
    let dir = TempDir::new().unwrap();
    add_bank(dir.path(), "Checking", "2500", "0");

    forecast(dir.path())
        .args(["budget", "add", "Rent", "1200", "--bank", "checking"])
        .assert()
        .success()
        .stdout(contains("Created budget item: Rent"));

    forecast(dir.path())
        .args(["budget", "show", "Rent"])
        .assert()
        .success()
        .stdout(contains("Checking"));
}

#[test]
fn deleting_bank_removes_its_interest_item() {
    let dir = TempDir::new().unwrap();
    add_bank(dir.path(), "Savings", "10000", "5");

    forecast(dir.path())
        .args(["bank", "delete", "Savings"])
        .assert()
        .success()
        .stdout(contains("Deleted bank account: Savings"));

    forecast(dir.path())
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(contains("Savings Interest").not());
}

#[test]
fn project_writes_csv_with_bank_columns() {
    let dir = TempDir::new().unwrap();
    add_bank(dir.path(), "Checking", "1000", "0");
    forecast(dir.path())
        .args(["budget", "add", "Salary", "3000", "--type", "income"])
        .assert()
        .success();

    let csv_path = dir.path().join("forecast.csv");
    forecast(dir.path())
        .args(["project", "--months", "3", "--csv"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Jan 2024").and(contains("Forecast exported to")));

    let contents = fs::read_to_string(&csv_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("Month,Projected Balance,Monthly Change,Interest Earnings,Checking")
    );
    assert_eq!(lines.count(), 4);
}

#[test]
fn project_rejects_oversized_horizon() {
    let dir = TempDir::new().unwrap();

    forecast(dir.path())
        .args(["project", "--months", "5000"])
        .assert()
        .code(2)
        .stderr(contains("5000"));
}

#[test]
fn analyze_json_includes_every_section() {
    let dir = TempDir::new().unwrap();
    add_bank(dir.path(), "Checking", "500", "0");
    forecast(dir.path())
        .args(["budget", "add", "Rent", "1500"])
        .assert()
        .success();

    let output = forecast(dir.path())
        .args(["analyze", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for key in ["budget", "cashFlow", "performance", "spending", "insights"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(json["budget"]["totalExpenses"], serde_json::json!(1500.0));
}

#[test]
fn export_then_import_replaces_data() {
    let source = TempDir::new().unwrap();
    add_bank(source.path(), "Savings", "8000", "3");
    let export_path = source.path().join("export.json");

    forecast(source.path())
        .arg("export")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(contains("Exported"));

    let target = TempDir::new().unwrap();
    add_bank(target.path(), "Old Account", "10", "0");

    forecast(target.path())
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stderr(contains("Imported"));

    forecast(target.path())
        .args(["bank", "list"])
        .assert()
        .success()
        .stdout(contains("Savings").and(contains("Old Account").not()));
}

#[test]
fn import_rejects_malformed_document() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"{"budget": []}"#).unwrap();

    forecast(dir.path())
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(contains("Invalid budget data format"));
}

#[test]
fn backup_create_list_and_restore() {
    let dir = TempDir::new().unwrap();
    add_bank(dir.path(), "Savings", "5000", "2");

    forecast(dir.path())
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(contains("Backed up 1 bank accounts"));

    forecast(dir.path())
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(contains("bank-backup-").and(contains("Total: 1 backup(s)")));

    forecast(dir.path())
        .args(["bank", "delete", "Savings"])
        .assert()
        .success();

    forecast(dir.path())
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(contains("1 bank account(s)"));

    forecast(dir.path())
        .args(["bank", "list"])
        .assert()
        .success()
        .stdout(contains("Savings"));
}

#[test]
fn config_prints_data_directory() {
    let dir = TempDir::new().unwrap();

    forecast(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(contains("financial_data.json"));
}
