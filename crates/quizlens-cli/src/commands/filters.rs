//! The `quizlens filters` command.

use std::path::PathBuf;

use anyhow::Result;

use quizlens_core::config::load_config_from;
use quizlens_core::model::{Selection, ALL};
use quizlens_core::parser::load_table;

pub fn execute(file: PathBuf, teacher: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let table = load_table(&file)?;

    let teachers = table.teachers(&config.columns)?;
    println!("教师: {}", with_all(&teachers));

    // Normalizes "全部" to no teacher restriction.
    let selection = Selection::new(teacher, None);
    let classes = table.classes(selection.teacher.as_deref(), &config.columns)?;
    match &selection.teacher {
        Some(t) => println!("班级 ({t}): {}", with_all(&classes)),
        None => println!("班级: {}", with_all(&classes)),
    }

    Ok(())
}

fn with_all(values: &[String]) -> String {
    std::iter::once(ALL)
        .chain(values.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}
