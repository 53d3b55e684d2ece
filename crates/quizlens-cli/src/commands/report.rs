//! The `quizlens report` command.

use std::path::PathBuf;

use anyhow::Result;

use quizlens_core::config::load_config_from;
use quizlens_core::model::Selection;
use quizlens_core::parser::{discover_spreadsheets, load_table};
use quizlens_core::report::StatsReport;
use quizlens_core::statistics::QuestionStatsBuilder;
use quizlens_report::html::write_html_report;

const FORMATS: &[&str] = &["text", "json", "html", "markdown", "md", "all"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Html,
    Markdown,
}

const ALL_FORMATS: &[OutputFormat] = &[
    OutputFormat::Text,
    OutputFormat::Json,
    OutputFormat::Html,
    OutputFormat::Markdown,
];

/// Parse a comma-separated `--format` value.
///
/// `all` expands in place, `md` is an alias for `markdown`, and repeats are dropped.
fn parse_formats(format: &str) -> Result<Vec<OutputFormat>> {
    let mut formats = Vec::new();
    for f in format.split(',').map(str::trim) {
        let expanded: &[OutputFormat] = match f {
            "all" => ALL_FORMATS,
            "text" => &[OutputFormat::Text],
            "json" => &[OutputFormat::Json],
            "html" => &[OutputFormat::Html],
            "markdown" | "md" => &[OutputFormat::Markdown],
            bad => anyhow::bail!("unknown format '{bad}' (expected one of: {})", FORMATS.join(", ")),
        };
        for fmt in expanded {
            if !formats.contains(fmt) {
                formats.push(*fmt);
            }
        }
    }
    Ok(formats)
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    dir: Option<PathBuf>,
    file: Option<PathBuf>,
    teacher: Option<String>,
    class: Option<String>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let formats = parse_formats(&format)?;

    let config = load_config_from(config_path.as_deref())?;

    let file = match file {
        Some(f) => f,
        None => {
            let dir = dir.unwrap_or_else(|| config.data_dir.clone());
            let files = discover_spreadsheets(&dir, &config.extensions)?;
            let first = files[0].clone();
            if files.len() > 1 {
                tracing::info!(
                    "{} spreadsheets found, using {} (pass --file to choose)",
                    files.len(),
                    first.display()
                );
            }
            first
        }
    };

    let table = load_table(&file)?;
    let selection = Selection::new(teacher, class);
    let filtered = table.filter(&selection, &config.columns)?;
    if filtered.is_empty() {
        tracing::warn!("no rows match {selection}");
    }

    let builder = QuestionStatsBuilder::new(config.columns.clone());
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let report = StatsReport::build(file_name, selection, &filtered, &builder)?;

    let output = output.unwrap_or(config.output_dir);
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match fmt {
            OutputFormat::Text => print_summary(&report),
            OutputFormat::Json => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            OutputFormat::Html => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            OutputFormat::Markdown => {
                let path = output.join(format!("report-{timestamp}.md"));
                report.save_markdown(&path)?;
                eprintln!("Markdown report: {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_summary(report: &StatsReport) {
    use comfy_table::{Cell, Table};

    println!(
        "文件: {} | {} | {} 人",
        report.source.file, report.source.selection, report.source.row_count
    );

    let mut table = Table::new();
    table.set_header(vec!["题号", "正确率", "答题人数", "标准答案", "题目"]);

    for q in &report.questions {
        table.add_row(vec![
            Cell::new(format!("第{}题", q.index)),
            Cell::new(format!("{:.2}%", q.accuracy_percent)),
            Cell::new(q.respondent_count),
            Cell::new(q.standard_answer.as_deref().unwrap_or("")),
            Cell::new(shorten(q.question_text.as_deref().unwrap_or(""), 30)),
        ]);
    }

    println!("{table}");

    for q in report.questions.iter().filter(|q| !q.incorrect_breakdown.is_empty()) {
        println!("\n第{}题 错误答案统计:", q.index);
        for g in &q.incorrect_breakdown {
            println!("  {} x{}: {}", g.answer, g.count, g.names());
        }
    }

    println!("\n统计完成！");
}

fn shorten(s: &str, max_chars: usize) -> String {
    let line = s.lines().next().unwrap_or("");
    if line.chars().count() <= max_chars && line.len() == s.len() {
        line.to_string()
    } else {
        let mut out: String = line.chars().take(max_chars).collect();
        out.push('…');
        out
    }
}
