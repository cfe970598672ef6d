#[test]
fn full_report_snapshot() {
  test_support::init_insta();

  let out = test_support::cmd_bin("payflow-conversion-report")
    .env("DD_API_KEY", "k")
    .env("DD_APP_KEY", "a")
    .env("PAYFLOW_TEST_SUCCESS_JSON", test_support::read_fixture_text("success_response.json"))
    .env("PAYFLOW_TEST_FAILURE_JSON", test_support::read_fixture_text("failure_response.json"))
    .args(["--days", "7", "--now-override", "1755259200"])
    .output()
    .unwrap();
  assert!(out.status.success());

  let stdout = String::from_utf8(out.stdout).unwrap();

  insta::assert_snapshot!(stdout.trim_end(), @r#"
  {
    "1337": {
      "success": 4,
      "failure": 0,
      "sum": 4,
      "payflowConversion": 100.0,
      "productType": "monthly"
    },
    "42": {
      "success": 80,
      "failure": 20,
      "sum": 100,
      "payflowConversion": 80.0,
      "productType": "annual"
    }
  }
  "#);
}

#[test]
fn text_report_snapshot() {
  test_support::init_insta();

  let out = test_support::cmd_bin("payflow-conversion-report")
    .env("DD_API_KEY", "k")
    .env("DD_APP_KEY", "a")
    .env("PAYFLOW_TEST_SUCCESS_JSON", test_support::read_fixture_text("success_response.json"))
    .env("PAYFLOW_TEST_FAILURE_JSON", test_support::read_fixture_text("failure_response.json"))
    .args(["--format", "text", "--now-override", "1755259200"])
    .output()
    .unwrap();
  assert!(out.status.success());

  let stdout = String::from_utf8(out.stdout).unwrap();

  insta::assert_snapshot!(stdout.trim_end(), @r"
  OFFER  PRODUCT    SUCCESS    FAILURE        SUM  CONVERSION
  1337   monthly          4          0          4     100.00%
  42     annual          80         20        100      80.00%
  ");
}
