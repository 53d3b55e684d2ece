//! Per-question answer statistics.
//!
//! One pass per question: count the non-placeholder responses, group them by
//! answer text, and measure how many match the standard answer exactly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ColumnConfig;
use crate::error::StatsError;
use crate::model::{AnswerGroup, QuestionStat, ResponseTable};

/// Builds [`QuestionStat`] records from a (pre-filtered) response table.
#[derive(Debug, Clone, Default)]
pub struct QuestionStatsBuilder {
    columns: ColumnConfig,
}

/// Column positions of one question.
struct QuestionColumns {
    question: usize,
    response: usize,
    standard_answer: usize,
}

impl QuestionStatsBuilder {
    pub fn new(columns: ColumnConfig) -> Self {
        Self { columns }
    }

    /// Compute statistics for every question in the table, lowest accuracy first.
    ///
    /// Questions are probed as `试题1`, `试题2`, ... and probing stops at the
    /// first absent question column. Equal accuracies keep question order.
    pub fn build(&self, table: &ResponseTable) -> Result<Vec<QuestionStat>, StatsError> {
        let mut stats = Vec::new();
        let mut index = 1;
        while let Some(cols) = self.probe(table, index)? {
            stats.push(self.question_stat(table, index, &cols));
            index += 1;
        }
        tracing::debug!("probed {} question(s)", stats.len());

        stats.sort_by(|a, b| a.accuracy_percent.total_cmp(&b.accuracy_percent));
        Ok(stats)
    }

    /// Resolve the columns of question `index`, or `None` when probing should stop.
    fn probe(
        &self,
        table: &ResponseTable,
        index: usize,
    ) -> Result<Option<QuestionColumns>, StatsError> {
        let question_name = self.columns.question_column(index);
        let response_name = self.columns.response_column(index);
        let standard_name = self.columns.standard_answer_column(index);

        let Some(question) = table.column(&question_name) else {
            if table.has_column(&response_name) {
                return Err(StatsError::missing_question_column(question_name, index));
            }
            return Ok(None);
        };
        let response = table
            .column(&response_name)
            .ok_or_else(|| StatsError::missing_question_column(response_name, index))?;
        let standard_answer = table
            .column(&standard_name)
            .ok_or_else(|| StatsError::missing_question_column(standard_name, index))?;

        Ok(Some(QuestionColumns {
            question,
            response,
            standard_answer,
        }))
    }

    fn question_stat(
        &self,
        table: &ResponseTable,
        index: usize,
        cols: &QuestionColumns,
    ) -> QuestionStat {
        let standard_answer = table.cell(0, cols.standard_answer).map(str::to_string);
        let question_text = table.cell(0, cols.question).map(str::to_string);

        let answer_breakdown = self.answer_breakdown(table, cols.response);
        let respondent_count: usize = answer_breakdown.iter().map(|g| g.count).sum();
        let correct_count = standard_answer
            .as_deref()
            .and_then(|expected| answer_breakdown.iter().find(|g| g.answer == expected))
            .map_or(0, |g| g.count);

        let accuracy_percent = if respondent_count > 0 {
            correct_count as f64 / respondent_count as f64 * 100.0
        } else {
            0.0
        };

        let incorrect_breakdown: Vec<AnswerGroup> = answer_breakdown
            .iter()
            .filter(|g| Some(g.answer.as_str()) != standard_answer.as_deref())
            .cloned()
            .collect();

        let conflicts = standard_answer_conflicts(table, cols.standard_answer);
        if conflicts > 0 {
            tracing::warn!(
                "question {index}: {conflicts} row(s) disagree with the first row's standard answer"
            );
        }

        QuestionStat {
            index,
            question_text,
            standard_answer,
            respondent_count,
            correct_count,
            accuracy_percent,
            answer_breakdown,
            incorrect_breakdown,
            standard_answer_conflicts: conflicts,
        }
    }

    /// Group valid responses by answer text, descending by count.
    ///
    /// Answers with equal counts keep first-appearance order.
    fn answer_breakdown(&self, table: &ResponseTable, response_col: usize) -> Vec<AnswerGroup> {
        let mut groups: Vec<AnswerGroup> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for (row, value) in table.column_values(response_col).enumerate() {
            let Some(answer) = value else { continue };
            if self.columns.is_placeholder(answer) {
                continue;
            }
            let name = table.display_name(row, &self.columns);
            match positions.get(answer) {
                Some(&pos) => {
                    let group = &mut groups[pos];
                    group.count += 1;
                    group.respondents.push(name);
                }
                None => {
                    positions.insert(answer, groups.len());
                    groups.push(AnswerGroup {
                        answer: answer.to_string(),
                        count: 1,
                        respondents: vec![name],
                    });
                }
            }
        }

        groups.sort_by(|a, b| b.count.cmp(&a.count));
        groups
    }
}

/// Number of rows whose standard answer is present and differs from the first row's.
pub fn standard_answer_conflicts(table: &ResponseTable, standard_col: usize) -> usize {
    let Some(first) = table.cell(0, standard_col) else {
        return 0;
    };
    table
        .column_values(standard_col)
        .filter(|v| v.is_some_and(|v| v != first))
        .count()
}

/// Headline numbers across all questions of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub question_count: usize,
    /// Rows in the filtered table.
    pub respondent_rows: usize,
    /// Mean accuracy over questions that had at least one respondent.
    pub mean_accuracy_percent: f64,
    /// Questions nobody answered.
    pub unanswered_questions: usize,
}

/// Summarize a set of question statistics.
pub fn summarize(stats: &[QuestionStat], respondent_rows: usize) -> StatsSummary {
    let answered: Vec<f64> = stats
        .iter()
        .filter(|s| s.respondent_count > 0)
        .map(|s| s.accuracy_percent)
        .collect();
    let mean_accuracy_percent = if answered.is_empty() {
        0.0
    } else {
        answered.iter().sum::<f64>() / answered.len() as f64
    };

    StatsSummary {
        question_count: stats.len(),
        respondent_rows,
        mean_accuracy_percent,
        unanswered_questions: stats.len() - answered.len(),
    }
}
