//! HTML dashboard generator.
//!
//! Produces a self-contained HTML file with all CSS inlined: a sidebar that
//! ranks questions by ascending accuracy, and one section per question with
//! an SVG bar chart of the incorrect answers.

use anyhow::{Context, Result};
use std::path::Path;

use quizlens_core::model::{AnswerGroup, QuestionStat, ALL};
use quizlens_core::report::StatsReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML dashboard from a statistics report.
pub fn generate_html(report: &StatsReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>题目分析 — {}</title>\n",
        html_escape(&report.source.file)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Sidebar navigation, already in ascending accuracy order
    html.push_str("<nav class=\"sidebar\">\n<h2>题目导航</h2>\n<ul>\n");
    for q in &report.questions {
        html.push_str(&format!(
            "<li><a href=\"#q{}\" class=\"{}\">第{}题 (正确率: {:.2}%)</a></li>\n",
            q.index,
            accuracy_class(q.accuracy_percent),
            q.index,
            q.accuracy_percent
        ));
    }
    html.push_str("</ul>\n</nav>\n");

    html.push_str("<main>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>题目分析</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">文件: <strong>{}</strong> | 教师: {} | 班级: {} | {} 人 | {}</p>\n",
        html_escape(&report.source.file),
        html_escape(report.source.selection.teacher.as_deref().unwrap_or(ALL)),
        html_escape(report.source.selection.class.as_deref().unwrap_or(ALL)),
        report.source.row_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!(
        "<p class=\"meta\">{} 道题 | 平均正确率 {:.2}% | {} 道题无人作答</p>\n",
        report.summary.question_count,
        report.summary.mean_accuracy_percent,
        report.summary.unanswered_questions
    ));
    html.push_str("</header>\n");

    for q in &report.questions {
        html.push_str(&question_section(q));
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>原始数据 (JSON)</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<p class=\"done\">统计完成！</p>\n");
    html.push_str("</main>\n</body>\n</html>");
    html
}

/// Write an HTML dashboard to a file.
pub fn write_html_report(report: &StatsReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn accuracy_class(accuracy: f64) -> &'static str {
    if accuracy >= 80.0 {
        "good"
    } else if accuracy >= 50.0 {
        "fair"
    } else {
        "poor"
    }
}

fn question_section(q: &QuestionStat) -> String {
    let mut html = String::new();

    html.push_str(&format!(
        "<section class=\"question\" id=\"q{}\">\n",
        q.index
    ));
    html.push_str(&format!("<h2>第{}题</h2>\n", q.index));
    html.push_str("<dl>\n");
    html.push_str(&format!(
        "<dt>题目</dt><dd>{}</dd>\n",
        html_escape(q.question_text.as_deref().unwrap_or(""))
    ));
    html.push_str(&format!(
        "<dt>标准答案</dt><dd class=\"correct\">{}</dd>\n",
        html_escape(q.standard_answer.as_deref().unwrap_or(""))
    ));
    html.push_str(&format!("<dt>答题人数</dt><dd>{}</dd>\n", q.respondent_count));
    html.push_str(&format!(
        "<dt>正确率</dt><dd class=\"{}\">{:.2}%</dd>\n",
        accuracy_class(q.accuracy_percent),
        q.accuracy_percent
    ));
    html.push_str("</dl>\n");

    if !q.incorrect_breakdown.is_empty() {
        html.push_str("<h3>错误答案统计</h3>\n");
        html.push_str(&generate_bar_chart(&q.incorrect_breakdown));

        html.push_str("<ul class=\"answers\">\n");
        for g in &q.incorrect_breakdown {
            html.push_str(&format!(
                "<li><div>答案: <span class=\"wrong\">{}</span></div><div>出现次数: {}</div><div>学生: {}</div></li>\n",
                html_escape(&g.answer),
                g.count,
                html_escape(&g.names())
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</section>\n");
    html
}

/// Horizontal bar chart, one red bar per answer, longest first.
///
/// Each bar carries a `<title>` tooltip with the answer, its count, and the
/// respondents who gave it.
fn generate_bar_chart(groups: &[AnswerGroup]) -> String {
    let bar_height = 26;
    let padding = 8;
    let label_width = 160;
    let max_width = 420;

    let mut sorted: Vec<&AnswerGroup> = groups.iter().collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    let max_count = sorted.first().map_or(1, |g| g.count.max(1));

    let total_height = sorted.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg class=\"chart\" width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, g) in sorted.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (g.count * max_width / max_count).max(2);
        let tooltip = format!("答案: {}\n出现次数: {}\n学生: {}", g.answer, g.count, g.names());

        svg.push_str("  <g>\n");
        svg.push_str(&format!("    <title>{}</title>\n", html_escape(&tooltip)));
        svg.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&truncate_label(&g.answer, 16))
        ));
        svg.push_str(&format!(
            "    <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#ef4444\" rx=\"4\"/>\n",
            label_width, y, width, bar_height
        ));
        svg.push_str(&format!(
            "    <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            g.count
        ));
        svg.push_str("  </g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars - 1).collect();
        out.push('…');
        out
    }
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --muted: #6b7280; --good: #16a34a; --fair: #ca8a04; --poor: #dc2626; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'PingFang SC', 'Microsoft YaHei', sans-serif; margin: 0; background: var(--bg); color: var(--fg); display: flex; }
.sidebar { position: sticky; top: 0; height: 100vh; overflow-y: auto; width: 16rem; flex-shrink: 0; padding: 1rem; border-right: 1px solid var(--border); box-sizing: border-box; }
.sidebar ul { list-style: none; padding: 0; margin: 0; }
.sidebar li { margin: 0.25rem 0; }
.sidebar a { text-decoration: none; }
main { flex: 1; padding: 2rem; min-width: 0; }
h1, h2 { margin-top: 2rem; }
.meta { color: var(--muted); }
.question { border-top: 1px solid var(--border); padding-bottom: 1rem; }
dl { display: grid; grid-template-columns: max-content 1fr; gap: 0.25rem 1rem; }
dt { font-weight: bold; }
dd { margin: 0; white-space: pre-wrap; }
.good, .correct { color: var(--good); }
.fair { color: var(--fair); }
.poor, .wrong { color: var(--poor); }
.answers { list-style: none; padding: 0; }
.answers li { margin: 0.75rem 0; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; max-width: 100%; }
.done { color: var(--good); font-weight: bold; }
"#;
