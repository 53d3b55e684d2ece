//! quizlens-report — Dashboard rendering for quizlens statistics reports.

pub mod html;
