//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FIXTURE: &str = "../../fixtures/sample-quiz.csv";

fn fixture() -> PathBuf {
    std::fs::canonicalize(FIXTURE).unwrap()
}

/// A `quizlens` command isolated from any user config or environment overrides.
fn quizlens(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizlens").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("QUIZLENS_DATA_DIR")
        .env_remove("QUIZLENS_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn only_file_in(dir: &Path, ext: &str) -> PathBuf {
    let files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == ext))
        .collect();
    assert_eq!(files.len(), 1, "expected one .{ext} file in {}", dir.display());
    files.into_iter().next().unwrap()
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    quizlens(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Per-question statistics for quiz and exam spreadsheets",
        ));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    quizlens(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizlens"));
}

#[test]
fn files_lists_matching_spreadsheets() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("期中.xlsx"), b"").unwrap();
    std::fs::write(dir.path().join("notes.csv"), b"").unwrap();

    quizlens(dir.path())
        .arg("files")
        .assert()
        .success()
        .stdout(predicate::str::contains("期中.xlsx"))
        .stdout(predicate::str::contains("notes.csv").not());
}

#[test]
fn files_in_empty_directory_fails() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("files")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no spreadsheet files found"));
}

#[test]
fn filters_lists_teachers_and_classes() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("filters")
        .arg("--file")
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("教师: 全部, 王老师, 刘老师"))
        .stdout(predicate::str::contains("班级: 全部, 一班, 二班, 三班"));
}

#[test]
fn filters_restricts_classes_to_teacher() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("filters")
        .arg("--file")
        .arg(fixture())
        .arg("--teacher")
        .arg("刘老师")
        .assert()
        .success()
        .stdout(predicate::str::contains("班级 (刘老师): 全部, 三班"));
}

#[test]
fn report_text_for_whole_file() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("40.00%"))
        .stdout(predicate::str::contains("66.67%"))
        .stdout(predicate::str::contains("75.00%"))
        .stdout(predicate::str::contains("第2题 错误答案统计"))
        .stdout(predicate::str::contains("上海 x2: 李四, 钱七"))
        .stdout(predicate::str::contains("南京 x1: 孙八"))
        .stdout(predicate::str::contains("统计完成！"));
}

#[test]
fn report_text_filtered_by_teacher() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg(fixture())
        .arg("--teacher")
        .arg("王老师")
        .arg("--class")
        .arg("全部")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 人"))
        .stdout(predicate::str::contains("50.00%"))
        .stdout(predicate::str::contains("钱七").not());
}

#[test]
fn report_with_no_matching_rows_succeeds() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg(fixture())
        .arg("--teacher")
        .arg("王老师")
        .arg("--class")
        .arg("三班")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 人"))
        .stdout(predicate::str::contains("0.00%"))
        .stdout(predicate::str::contains("错误答案统计").not());
}

#[test]
fn report_json_is_ranked_by_accuracy() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg(fixture())
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Results saved to"));

    let json = std::fs::read_to_string(only_file_in(&out, "json")).unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    let questions = report["questions"].as_array().unwrap();

    let order: Vec<u64> = questions
        .iter()
        .map(|q| q["index"].as_u64().unwrap())
        .collect();
    assert_eq!(order, vec![2, 3, 1]);
    assert_eq!(questions[0]["respondent_count"], 5);
    assert_eq!(questions[0]["correct_count"], 2);
    assert_eq!(questions[2]["respondent_count"], 4);
    assert_eq!(report["source"]["file"], "sample-quiz.csv");
    assert_eq!(report["source"]["row_count"], 5);
}

#[test]
fn report_all_formats_writes_every_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg(fixture())
        .arg("--format")
        .arg("all")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("统计完成！"));

    let html = std::fs::read_to_string(only_file_in(&out, "html")).unwrap();
    assert!(html.contains("题目导航"));
    assert!(html.contains("href=\"#q2\""));

    let md = std::fs::read_to_string(only_file_in(&out, "md")).unwrap();
    assert!(md.contains("- [第2题 (正确率: 40.00%)](#q2)"));
}

#[test]
fn report_all_inside_a_format_list() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg(fixture())
        .arg("--format")
        .arg("md,all")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("统计完成！"));

    only_file_in(&out, "json");
    only_file_in(&out, "html");
    only_file_in(&out, "md");
}

#[test]
fn report_help_lists_md_alias() {
    let dir = TempDir::new().unwrap();
    quizlens(dir.path())
        .args(["report", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown (or md)"));
}

#[test]
fn report_discovers_first_spreadsheet_from_config() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir(&data).unwrap();
    std::fs::copy(fixture(), data.join("b-quiz.csv")).unwrap();
    std::fs::write(data.join("a-empty.csv"), "教师,班级\n").unwrap();
    std::fs::write(
        dir.path().join("quizlens.toml"),
        "data_dir = \"data\"\nextensions = [\"csv\"]\n",
    )
    .unwrap();

    // a-empty.csv sorts first and has no questions
    quizlens(dir.path())
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("a-empty.csv"))
        .stdout(predicate::str::contains("错误答案统计").not());
}

#[test]
fn report_unknown_format_fails() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg(fixture())
        .arg("--format")
        .arg("pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format 'pdf'"));
}

#[test]
fn report_asymmetric_columns_fail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    std::fs::write(&path, "教师,班级,姓氏,名,试题1,回答1\n王,一班,张,三,q,A\n").unwrap();

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing column '标准答案1' for question 1"));
}

#[test]
fn report_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("report")
        .arg("--file")
        .arg("no_such_file.xlsx")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizlens.toml"));

    assert!(dir.path().join("quizlens.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizlens(dir.path()).arg("init").assert().success();

    quizlens(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
