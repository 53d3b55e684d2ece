//! Statistics report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{QuestionStat, ResponseTable, Selection, ALL};
use crate::statistics::{summarize, QuestionStatsBuilder, StatsSummary};

/// A complete statistics report for one file and selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Where the responses came from.
    pub source: SourceSummary,
    /// Headline numbers.
    pub summary: StatsSummary,
    /// Per-question statistics, lowest accuracy first.
    pub questions: Vec<QuestionStat>,
}

/// The spreadsheet and filter a report was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub file: String,
    pub selection: Selection,
    /// Rows left after filtering.
    pub row_count: usize,
}

impl StatsReport {
    /// Run the statistics pass over an already-filtered table.
    pub fn build(
        file: impl Into<String>,
        selection: Selection,
        table: &ResponseTable,
        builder: &QuestionStatsBuilder,
    ) -> Result<Self> {
        let questions = builder.build(table)?;
        let summary = summarize(&questions, table.len());
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source: SourceSummary {
                file: file.into(),
                selection,
                row_count: table.len(),
            },
            summary,
            questions,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Write the markdown rendering of the report, creating parent directories.
    pub fn save_markdown(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_markdown())
            .with_context(|| format!("failed to write markdown report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: StatsReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown: a navigation list, then one section per question.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# 题目分析\n\n");
        md.push_str(&format!(
            "**文件:** {} | **教师:** {} | **班级:** {} | **人数:** {}\n\n",
            self.source.file,
            self.source.selection.teacher.as_deref().unwrap_or(ALL),
            self.source.selection.class.as_deref().unwrap_or(ALL),
            self.source.row_count
        ));

        md.push_str("## 题目导航\n\n");
        for q in &self.questions {
            md.push_str(&format!(
                "- [第{}题 (正确率: {:.2}%)](#q{})\n",
                q.index, q.accuracy_percent, q.index
            ));
        }
        md.push('\n');

        for q in &self.questions {
            md.push_str(&format!("<a id=\"q{}\"></a>\n\n", q.index));
            md.push_str(&format!("### 第{}题\n\n", q.index));
            md.push_str(&format!(
                "- 题目: {}\n",
                q.question_text.as_deref().unwrap_or("")
            ));
            md.push_str(&format!(
                "- 标准答案: {}\n",
                q.standard_answer.as_deref().unwrap_or("")
            ));
            md.push_str(&format!("- 答题人数: {}\n", q.respondent_count));
            md.push_str(&format!("- 正确率: {:.2}%\n\n", q.accuracy_percent));

            if !q.incorrect_breakdown.is_empty() {
                md.push_str("#### 错误答案统计\n\n");
                md.push_str("| 答案 | 出现次数 | 学生 |\n");
                md.push_str("|------|----------|------|\n");
                for g in &q.incorrect_breakdown {
                    md.push_str(&format!(
                        "| {} | {} | {} |\n",
                        escape_cell(&g.answer),
                        g.count,
                        escape_cell(&g.names())
                    ));
                }
                md.push('\n');
            }
        }

        md
    }
}

/// Keep user text from breaking a markdown table row.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
