//! Process-level tests for the erfilter binary
//!
//! Runs the built binary against diagram files in a temp directory and
//! checks stdout, stderr and exit status.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const ENTITIES: &str = "erDiagram
    CUSTOMER {
        string name
    }
    ORDER {
        int id
    }
    AUDIT {
        string event
    }
";

const RELATIONS: &str = "    CUSTOMER ||--o{ ORDER : places
";

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("entities.mmd"), ENTITIES).unwrap();
    fs::write(dir.join("relations.mmd"), RELATIONS).unwrap();
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_erfilter"))
        .arg("--log-level")
        .arg("off")
        .args(args)
        .arg("--root")
        .arg(dir)
        .output()
        .expect("failed to run erfilter")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_render_without_exclusions_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let output = run(dir.path(), &["render", "-f", "entities.mmd,relations.mmd"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), format!("{}\n{}\n", ENTITIES, RELATIONS));
}

#[test]
fn test_render_prunes_orphans_by_default() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let output = run(
        dir.path(),
        &["render", "-f", "entities.mmd", "-f", "relations.mmd", "-x", "ORDER"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "erDiagram\n");
}

#[test]
fn test_render_exclusion_only() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let output = run(
        dir.path(),
        &[
            "render",
            "-f",
            "entities.mmd,relations.mmd",
            "-x",
            "AUDIT",
            "--no-prune-orphans",
        ],
    );
    assert!(output.status.success());
    let expected = "erDiagram
    CUSTOMER {
        string name
    }
    ORDER {
        int id
    }
    CUSTOMER ||--o{ ORDER : places
";
    assert_eq!(stdout(&output), expected);
}

#[test]
fn test_render_html_to_file() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let out_path = dir.path().join("diagram.html");

    let output = run(
        dir.path(),
        &[
            "render",
            "-f",
            "entities.mmd,relations.mmd",
            "-x",
            "AUDIT",
            "--format",
            "html",
            "--padding",
            "4",
            "-o",
            out_path.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());

    let page = fs::read_to_string(&out_path).unwrap();
    assert!(page.contains(r#""er":{"diagramPadding":4}"#));
    assert!(!page.contains("AUDIT"));
}

#[test]
fn test_missing_file_reports_file_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let output = run(dir.path(), &["render", "-f", "entities.mmd,missing.mmd"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Error loading missing.mmd"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_entities_json() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let output = run(
        dir.path(),
        &["entities", "--json", "-f", "entities.mmd,relations.mmd"],
    );
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json["entities"],
        serde_json::json!(["CUSTOMER", "ORDER", "AUDIT"])
    );
    assert_eq!(json["relationships"][0]["first"], "CUSTOMER");
    assert_eq!(json["relationships"][0]["second"], "ORDER");
}

#[test]
fn test_entities_lists_orphans() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());

    let output = run(dir.path(), &["entities", "-f", "entities.mmd,relations.mmd"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Without relationships: AUDIT"));
}

#[test]
fn test_detect() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    fs::write(dir.path().join("flow.mmd"), "graph TD; A-->B").unwrap();

    let output = run(dir.path(), &["detect", "-f", "entities.mmd"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "er\n");

    let output = run(dir.path(), &["detect", "-f", "flow.mmd"]);
    assert!(!output.status.success());
}
