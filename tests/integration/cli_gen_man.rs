#[test]
fn cli_generates_man_page() {
  let mut cmd = test_support::cmd_bin("payflow-conversion-report");
  let out = cmd.args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH and mentions the binary name
  assert!(s.contains(".TH") || s.contains(".Nm"));
  assert!(s.contains("payflow-conversion-report"));
}

#[test]
fn gen_man_needs_no_credentials() {
  let out = test_support::cmd_bin("payflow-conversion-report")
    .args(["--gen-man", "--days", "3"])
    .output()
    .unwrap();
  assert!(out.status.success());
  assert!(!String::from_utf8_lossy(&out.stdout).contains("missing credentials"));
}
