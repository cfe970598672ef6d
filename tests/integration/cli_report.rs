use predicates::prelude::*;

const BIN: &str = "payflow-conversion-report";

fn fixture_cmd() -> assert_cmd::Command {
  let mut cmd = test_support::cmd_bin(BIN);
  cmd
    .env("DD_API_KEY", "test-api-key")
    .env("DD_APP_KEY", "test-app-key")
    .env("PAYFLOW_TEST_SUCCESS_JSON", test_support::read_fixture_text("success_response.json"))
    .env("PAYFLOW_TEST_FAILURE_JSON", test_support::read_fixture_text("failure_response.json"))
    .args(["--now-override", "2025-08-15T12:00:00Z"]);
  cmd
}

#[test]
fn filtered_offer_reports_conversion() {
  let out = fixture_cmd().args(["--days", "7", "42"]).output().unwrap();
  assert!(out.status.success(), "run failed: {}", String::from_utf8_lossy(&out.stdout));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(
    v,
    serde_json::json!({
      "42": { "success": 80, "failure": 20, "sum": 100, "payflowConversion": 80.0, "productType": "annual" }
    })
  );
}

#[test]
fn no_filter_reports_every_offer() {
  let out = fixture_cmd().output().unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let obj = v.as_object().unwrap();
  assert_eq!(obj.len(), 2);
  assert_eq!(v["1337"]["success"], 4);
  assert_eq!(v["1337"]["failure"], 0);
  assert_eq!(v["1337"]["payflowConversion"], 100.0);
  assert_eq!(v["1337"]["productType"], "monthly");
}

#[test]
fn unknown_offer_filter_yields_empty_report() {
  fixture_cmd()
    .arg("does-not-exist")
    .assert()
    .success()
    .stdout(predicate::str::diff("{}\n"));
}

#[test]
fn text_format_prints_table() {
  fixture_cmd()
    .args(["--format", "text", "42"])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("OFFER  PRODUCT"))
    .stdout(predicate::str::contains("80.00%"))
    .stdout(predicate::str::contains("1337").not());
}

#[test]
fn out_flag_writes_file_instead_of_stdout() {
  let td = tempfile::TempDir::new().unwrap();
  let target = td.path().join("reports/conversion.json");

  fixture_cmd()
    .args(["--out", target.to_str().unwrap(), "42"])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());

  let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
  assert_eq!(v["42"]["sum"], 100);
}

#[test]
fn credentials_can_come_from_flags() {
  let mut cmd = test_support::cmd_bin(BIN);
  cmd
    .env("PAYFLOW_TEST_SUCCESS_JSON", test_support::read_fixture_text("success_response.json"))
    .args(["--api-key", "k", "--app-key", "a", "42"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"payflowConversion\": 100.0"));
}
