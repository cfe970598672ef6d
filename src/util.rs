// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for the "now" instant, output writing, and man page rendering
// role: utilities/helpers
// inputs: Optional now override; output target; clap CommandFactory
// outputs: Effective now, parsed overrides, written files, man page text
// side_effects: write_output creates parent directories and writes files
// invariants: "-" always means stdout
// errors: IO errors bubble with the target path as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::CommandFactory;

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current UTC time is used.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Parse a `--now-override` value: RFC3339, or whole Unix seconds.
pub fn parse_now(s: &str) -> Result<DateTime<Utc>> {
  let s = s.trim();

  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }

  let secs: i64 = s
    .parse()
    .with_context(|| format!("invalid --now-override {:?}: expected RFC3339 or Unix seconds", s))?;

  DateTime::from_timestamp(secs, 0).with_context(|| format!("--now-override {} is out of range", secs))
}

/// Write `content` to stdout when `out` is "-", else to the file (creating parents).
pub fn write_output(out: &str, content: &str) -> Result<()> {
  if out == "-" {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
      stdout.write_all(b"\n")?;
    }
    return Ok(());
  }

  let path = Path::new(out);

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;

  Ok(())
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
