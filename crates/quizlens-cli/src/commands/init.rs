//! The `quizlens init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizlens.toml").exists() {
        println!("quizlens.toml already exists, skipping.");
    } else {
        std::fs::write("quizlens.toml", SAMPLE_CONFIG)?;
        println!("Created quizlens.toml");
    }

    println!("\nNext steps:");
    println!("  1. Put exported .xlsx files next to quizlens.toml (or set data_dir)");
    println!("  2. Run: quizlens files");
    println!("  3. Run: quizlens report --format html");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizlens configuration

# Directory scanned for spreadsheets
data_dir = "."
# Where report files are written
output_dir = "./quizlens-reports"
# Extensions treated as spreadsheets (xlsx, xls, ods, csv, ...)
extensions = ["xlsx"]

[columns]
teacher = "教师"
class = "班级"
last_name = "姓氏"
first_name = "名"
question_prefix = "试题"
response_prefix = "回答"
standard_answer_prefix = "标准答案"
# Responses meaning "did not answer"
placeholders = ["-", "- -"]
"#;
