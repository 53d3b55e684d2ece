//! Core data model types for quizlens.
//!
//! A [`ResponseTable`] is the in-memory spreadsheet of one quiz or exam:
//! one row per respondent, columns for teacher/class/name metadata and the
//! per-question `试题{i}` / `回答{i}` / `标准答案{i}` triples.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ColumnConfig;
use crate::error::StatsError;

/// Caller-facing label meaning "no filter".
pub const ALL: &str = "全部";

/// An immutable table of quiz responses.
#[derive(Debug, Clone, Default)]
pub struct ResponseTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl ResponseTable {
    /// Build a table from headers and rows.
    ///
    /// Headers of the form `试题 3` are normalized to `试题3`. Rows are padded
    /// with missing cells (or truncated) to the header width. When a header
    /// repeats, lookups resolve to its first occurrence.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|h| h.replace("试题 ", "试题"))
            .collect();

        let mut index = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.clone()).or_insert(i);
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();

        Self {
            headers,
            index,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of respondent rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of a column by name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Like [`column`](Self::column), but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<usize, StatsError> {
        self.column(name)
            .ok_or_else(|| StatsError::missing_column(name))
    }

    /// Cell value, `None` when missing.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.as_deref())
    }

    /// Iterate over the values of one column, row by row.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(col).and_then(|c| c.as_deref()))
    }

    /// Respondent display name: last name followed by first name, no separator.
    pub fn display_name(&self, row: usize, columns: &ColumnConfig) -> String {
        let part = |name: &str| {
            self.column(name)
                .and_then(|col| self.cell(row, col))
                .unwrap_or_default()
        };
        format!("{}{}", part(&columns.last_name), part(&columns.first_name))
    }

    /// Distinct teachers in first-appearance order.
    pub fn teachers(&self, columns: &ColumnConfig) -> Result<Vec<String>, StatsError> {
        let col = self.require_column(&columns.teacher)?;
        Ok(distinct(self.column_values(col)))
    }

    /// Distinct classes in first-appearance order, optionally restricted to
    /// one teacher's rows.
    pub fn classes(
        &self,
        teacher: Option<&str>,
        columns: &ColumnConfig,
    ) -> Result<Vec<String>, StatsError> {
        let class_col = self.require_column(&columns.class)?;
        match teacher {
            Some(t) => {
                let teacher_col = self.require_column(&columns.teacher)?;
                Ok(distinct(self.rows.iter().filter_map(|r| {
                    (r[teacher_col].as_deref() == Some(t)).then(|| r[class_col].as_deref())
                })))
            }
            None => Ok(distinct(self.column_values(class_col))),
        }
    }

    /// Keep only the rows matching `selection`.
    ///
    /// An empty result is valid; statistics over it are all zero.
    pub fn filter(
        &self,
        selection: &Selection,
        columns: &ColumnConfig,
    ) -> Result<ResponseTable, StatsError> {
        let teacher_col = selection
            .teacher
            .as_ref()
            .map(|_| self.require_column(&columns.teacher))
            .transpose()?;
        let class_col = selection
            .class
            .as_ref()
            .map(|_| self.require_column(&columns.class))
            .transpose()?;

        let rows = self
            .rows
            .iter()
            .filter(|r| {
                cell_matches(r, teacher_col, selection.teacher.as_deref())
                    && cell_matches(r, class_col, selection.class.as_deref())
            })
            .cloned()
            .collect();

        Ok(ResponseTable {
            headers: self.headers.clone(),
            index: self.index.clone(),
            rows,
        })
    }
}

fn cell_matches(row: &[Option<String>], col: Option<usize>, want: Option<&str>) -> bool {
    match (col, want) {
        (Some(c), Some(w)) => row[c].as_deref() == Some(w),
        _ => true,
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .flatten()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Which teacher and class to restrict a table to. `None` means all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub teacher: Option<String>,
    pub class: Option<String>,
}

impl Selection {
    /// Build a selection from raw user input; the [`ALL`] label means no filter.
    pub fn new(teacher: Option<String>, class: Option<String>) -> Self {
        let normalize = |v: Option<String>| v.filter(|s| s != ALL);
        Self {
            teacher: normalize(teacher),
            class: normalize(class),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "教师: {} / 班级: {}",
            self.teacher.as_deref().unwrap_or(ALL),
            self.class.as_deref().unwrap_or(ALL)
        )
    }
}

/// One distinct answer to a question and who gave it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerGroup {
    pub answer: String,
    pub count: usize,
    /// Display names of the respondents, in row order.
    pub respondents: Vec<String>,
}

impl AnswerGroup {
    /// Respondent names joined by `", "`.
    pub fn names(&self) -> String {
        self.respondents.join(", ")
    }
}

/// Derived statistics for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStat {
    /// 1-based question number.
    pub index: usize,
    /// Question text from the first row; `None` for an empty table.
    pub question_text: Option<String>,
    /// Standard answer from the first row; `None` for an empty table.
    pub standard_answer: Option<String>,
    /// Responses that are present and not placeholders.
    pub respondent_count: usize,
    pub correct_count: usize,
    /// In `[0, 100]`; exactly 0 when nobody answered.
    pub accuracy_percent: f64,
    /// All answers, descending by count.
    pub answer_breakdown: Vec<AnswerGroup>,
    /// `answer_breakdown` without the standard answer, descending by count.
    pub incorrect_breakdown: Vec<AnswerGroup>,
    /// Rows whose standard answer differs from the first row's.
    #[serde(default)]
    pub standard_answer_conflicts: usize,
}
