//! CLI end-to-end tests that invoke the compiled `blockdoc` binary.
//!
//! These tests use `env!("CARGO_BIN_EXE_blockdoc")` to locate the binary and
//! `std::process::Command` to run it against temporary directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Returns the path to the compiled `blockdoc` binary.
fn blockdoc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_blockdoc"))
}

/// Run `blockdoc` with the given args in the given directory, stdin closed.
fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(blockdoc_bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute blockdoc binary")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

const CONTACTS: &str = "\
# Contacts

```yaml
type: contact
name: Ada
email: ada@example.com
```

```yaml
type: contact
name: Bob
phone: 555-0100
legacy: old
```
";

const TEMPLATE: &str = r#"
target_type = "contact"
fields = ["type", "name", "email", "phone"]
version = "1.2"
"#;

/// Temp dir holding `contacts.md` and `contact.toml`
fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("contacts.md"), CONTACTS).unwrap();
    fs::write(dir.path().join("contact.toml"), TEMPLATE).unwrap();
    dir
}

fn read(dir: &TempDir, name: &str) -> String {
    fs::read_to_string(dir.path().join(name)).unwrap()
}

// ============================================================================
// sync
// ============================================================================

#[test]
fn test_sync_dry_run_reports_without_writing() {
    let dir = workspace();
    let out = run(
        dir.path(),
        &["sync", "contacts.md", "--template", "contact.toml", "--dry-run"],
    );

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("template v1.2"));
    assert!(text.contains("2 block(s) will change"));
    assert!(text.contains("b3 drops legacy"));
    assert!(text.contains("Dry run"));
    assert_eq!(read(&dir, "contacts.md"), CONTACTS);
}

#[test]
fn test_sync_with_yes_rewrites_file() {
    let dir = workspace();
    let out = run(
        dir.path(),
        &["sync", "contacts.md", "-t", "contact.toml", "--yes"],
    );

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Updated 2 block(s)"));
    assert_eq!(
        read(&dir, "contacts.md"),
        "\
# Contacts

```yaml
type: contact
name: Ada
email: ada@example.com
phone: ''
```

```yaml
type: contact
name: Bob
email: ''
phone: 555-0100
```
"
    );

    // A second run has nothing left to do
    let again = run(
        dir.path(),
        &["sync", "contacts.md", "-t", "contact.toml", "--yes"],
    );
    assert!(stdout(&again).contains("already conform"));
}

#[test]
fn test_sync_without_terminal_or_yes_does_not_write() {
    let dir = workspace();
    let out = run(dir.path(), &["sync", "contacts.md", "-t", "contact.toml"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("error"));
    assert_eq!(read(&dir, "contacts.md"), CONTACTS);
}

#[test]
fn test_sync_json_report() {
    let dir = workspace();
    let out = run(
        dir.path(),
        &["sync", "contacts.md", "-t", "contact.toml", "--dry-run", "--json"],
    );

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["target_type"], "contact");
    assert_eq!(report["template_version"], "1.2");
    assert_eq!(report["matched"], 2);
    assert_eq!(report["modified"], 2);
    assert_eq!(report["changed"], serde_json::json!(["b2", "b3"]));
    assert_eq!(report["dropped"]["b3"], serde_json::json!(["legacy"]));
    assert_eq!(report["written"], false);
}

#[test]
fn test_sync_rejects_bad_template_version() {
    let dir = workspace();
    fs::write(
        dir.path().join("bad.yaml"),
        "target_type: contact\nfields: [type]\nversion: '1.x'\n",
    )
    .unwrap();
    let out = run(dir.path(), &["sync", "contacts.md", "-t", "bad.yaml", "--yes"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("Invalid version"));
    assert_eq!(read(&dir, "contacts.md"), CONTACTS);
}

#[test]
fn test_sync_rejects_unknown_template_format() {
    let dir = workspace();
    fs::write(dir.path().join("t.ini"), "x").unwrap();
    let out = run(dir.path(), &["sync", "contacts.md", "-t", "t.ini", "--yes"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("Unsupported template format"));
}

#[test]
fn test_sync_metadata_persists_between_runs() {
    let dir = workspace();
    fs::write(
        dir.path().join("bound.toml"),
        r#"
target_type = "contact"
fields = ["type", "name", "email", "phone"]

[bindings]
email = "col-email"
"#,
    )
    .unwrap();

    let first = run(dir.path(), &["sync", "contacts.md", "-t", "bound.toml", "--yes"]);
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    assert!(stdout(&first).contains("Updated 2 block(s)"));
    let text = read(&dir, "contacts.md");
    let metadata = read(&dir, "contacts.md.blocks.json");
    assert!(metadata.contains("col-email"));

    let second = run(dir.path(), &["sync", "contacts.md", "-t", "bound.toml", "--yes"]);
    assert!(second.status.success(), "stderr: {}", stderr(&second));
    assert!(stdout(&second).contains("All 2 matching block(s) already conform"));
    assert_eq!(read(&dir, "contacts.md"), text);

    // A record added above shifts positions; stored metadata follows the blocks
    let add = run(dir.path(), &["add", "contacts.md", "-t", "bound.toml", "--after", "b1"]);
    assert!(add.status.success(), "stderr: {}", stderr(&add));
    let preview = run(
        dir.path(),
        &["sync", "contacts.md", "-t", "bound.toml", "--dry-run", "--json"],
    );
    let report: serde_json::Value = serde_json::from_slice(&preview.stdout).unwrap();
    assert_eq!(report["matched"], 3);
    assert_eq!(report["changed"], serde_json::json!(["b2"]));
}

// ============================================================================
// add / set
// ============================================================================

#[test]
fn test_add_record_with_generated_id() {
    let dir = workspace();
    fs::write(
        dir.path().join("task.json"),
        r#"{"target_type": "task", "fields": ["type", "id", "title"], "id": {"prefix": "T", "digits": 3}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("tasks.md"),
        "# Tasks\n\n```yaml\ntype: task\nid: T-004\ntitle: First\n```\n",
    )
    .unwrap();

    let out = run(dir.path(), &["add", "tasks.md", "-t", "task.json"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("T-005"));
    assert!(read(&dir, "tasks.md").ends_with("```yaml\ntype: task\nid: T-005\ntitle: ''\n```\n"));
}

#[test]
fn test_set_field_coerces_value() {
    let dir = workspace();
    let out = run(dir.path(), &["set", "contacts.md", "b2", "vip", "true"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(read(&dir, "contacts.md").contains("email: ada@example.com\nvip: true\n```"));
}

#[test]
fn test_set_refuses_nested_data() {
    let dir = workspace();
    let nested = "```yaml\ntype: contact\naddress:\n  city: Paris\n```\n";
    fs::write(dir.path().join("nested.md"), nested).unwrap();

    let out = run(dir.path(), &["set", "nested.md", "b1", "name", "Ada"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("does not hold flat key/value data"));
    assert_eq!(read(&dir, "nested.md"), nested);
}

#[test]
fn test_set_on_non_data_block_fails() {
    let dir = workspace();
    let out = run(dir.path(), &["set", "contacts.md", "b1", "k", "v"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("Block b1 is not a data block"));
    assert_eq!(read(&dir, "contacts.md"), CONTACTS);
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = workspace();
    let out = run(dir.path(), &["-v", "parse", "contacts.md"]);

    assert!(out.status.success());
    assert!(stderr(&out).contains("Parsed document"));
    assert!(!stdout(&out).contains("Parsed document"));
}
