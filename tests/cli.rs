use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// a.cs has 3 lines (one blank), b.txt is not selected, c.cs is empty.
fn create_project() -> TempDir {
    let project = TempDir::new().expect("Creating temp project failed");
    fs::write(project.path().join("a.cs"), "using System;\n\nclass A {}\n").unwrap();
    fs::write(project.path().join("b.txt"), "notes\n").unwrap();
    fs::write(project.path().join("c.cs"), "").unwrap();
    project
}

/// Runs from an empty working directory so no stray codelisting.toml is picked up.
fn codelisting(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("codelisting").expect("Binary exists");
    cmd.current_dir(cwd).env_remove("RUST_LOG");
    cmd
}

#[test]
fn generates_text_and_document() {
    let project = create_project();
    let out = TempDir::new().unwrap();
    let base = out.path().join("listing");

    codelisting(out.path())
        .arg(project.path())
        .args(["--ext", "cs", "-q", "-o"])
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));

    let text = fs::read_to_string(out.path().join("listing.txt")).unwrap();
    assert_eq!(text, "using System;\nclass A {}");
    assert!(out.path().join("listing.docx").is_file());
}

#[test]
fn human_summary_reports_line_count() {
    let project = create_project();
    let out = TempDir::new().unwrap();

    codelisting(out.path())
        .arg(project.path())
        .args(["-e", ".cs", "-o"])
        .arg(out.path().join("listing"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Effective lines:").and(predicate::str::contains("2")));
}

#[test]
fn empty_filter_exits_with_code_5() {
    let project = create_project();
    let out = TempDir::new().unwrap();

    codelisting(out.path())
        .arg(project.path())
        .arg("-o")
        .arg(out.path().join("listing"))
        .assert()
        .code(5)
        .stderr(predicate::str::contains("No source file extensions"));

    assert!(!out.path().join("listing.txt").exists());
}

#[test]
fn missing_directory_exits_with_code_3() {
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .args(["/definitely/not/a/project", "--ext", "cs"])
        .assert()
        .code(3);
}

#[test]
fn duplicate_extension_exits_with_code_4() {
    let project = create_project();
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .arg(project.path())
        .args(["--ext", "cs,.cs"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains(".cs"));
}

#[test]
fn empty_extension_is_a_usage_error() {
    let project = create_project();
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .arg(project.path())
        .args(["--ext", " "])
        .assert()
        .code(2);
}

#[test]
fn no_directory_is_a_usage_error() {
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .args(["--ext", "cs"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No project directory"));
}

#[test]
fn list_marks_qualifying_files() {
    let project = create_project();
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .arg(project.path())
        .args(["--ext", "cs", "--list", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("* a.cs")
                .and(predicate::str::contains("  b.txt"))
                .and(predicate::str::contains("* c.cs")),
        );
}

#[test]
fn dry_run_writes_nothing() {
    let project = create_project();
    let out = TempDir::new().unwrap();

    codelisting(out.path())
        .arg(project.path())
        .args(["--ext", "cs", "--dry-run", "-o"])
        .arg(out.path().join("listing"))
        .assert()
        .success()
        .stdout(predicate::str::contains("a.cs"));

    assert!(!out.path().join("listing.txt").exists());
    assert!(!out.path().join("listing.docx").exists());
}

#[test]
fn select_picks_an_earlier_directory() {
    let first = create_project();
    let second = TempDir::new().unwrap();
    fs::write(second.path().join("only.cs"), "x\ny\nz\n").unwrap();
    let out = TempDir::new().unwrap();

    codelisting(out.path())
        .arg(first.path())
        .arg(second.path())
        .args(["--ext", "cs", "--select", "1", "-q", "-o"])
        .arg(out.path().join("listing"))
        .assert()
        .success();

    let text = fs::read_to_string(out.path().join("listing.txt")).unwrap();
    assert_eq!(text, "using System;\nclass A {}");
}

#[test]
fn config_file_supplies_extensions_and_output() {
    let project = create_project();
    let out = TempDir::new().unwrap();
    let base = out.path().join("from-config");
    let config_path = out.path().join("custom.toml");
    fs::write(
        &config_path,
        format!(
            "[filters]\nextensions = [\".cs\"]\n\n[output]\nbase_path = {:?}\nfont_size = 8.0\n",
            base.display().to_string()
        ),
    )
    .unwrap();

    codelisting(out.path())
        .arg(project.path())
        .arg("--config")
        .arg(&config_path)
        .arg("-q")
        .assert()
        .success();

    assert!(out.path().join("from-config.txt").is_file());
}

#[test]
fn unreadable_source_exits_with_code_7() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("bad.cs"), [0xffu8, 0xfe, 0x80]).unwrap();
    let out = TempDir::new().unwrap();

    codelisting(out.path())
        .arg(project.path())
        .args(["--ext", "cs", "-o"])
        .arg(out.path().join("listing"))
        .assert()
        .code(7)
        .stderr(predicate::str::contains("bad.cs"));

    assert!(!out.path().join("listing.txt").exists());
}

#[test]
fn preview_prints_text_files() {
    let project = create_project();
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .arg("--preview")
        .arg(project.path().join("a.cs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("class A {}"));
}

#[test]
fn preview_rejects_unknown_types() {
    let project = create_project();
    let binary = project.path().join("tool.exe");
    fs::write(&binary, [0u8, 1, 2]).unwrap();
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .arg("--preview")
        .arg(&binary)
        .assert()
        .code(9)
        .stderr(predicate::str::contains("cannot be opened"));
}

#[test]
fn generate_config_prints_sample() {
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[filters]")
                .and(predicate::str::contains("[output]"))
                .and(predicate::str::contains("[preview]")),
        );
}

#[test]
fn invalid_font_size_is_rejected_by_parser() {
    let project = create_project();
    let cwd = TempDir::new().unwrap();

    codelisting(cwd.path())
        .arg(project.path())
        .args(["--ext", "cs", "--font-size", "0"])
        .assert()
        .code(2);
}
