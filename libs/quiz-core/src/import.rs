//! Parsers for bulk question import files.
//!
//! Two upload formats are accepted:
//!
//! JSON — an object with a `questions` array, each entry shaped like
//! [`RawQuestion`]:
//! ```json
//! {"questions": [{"questionText": "2+2?", "questionType": "mcq",
//!                 "options": [{"optionText": "4", "isCorrect": true}]}]}
//! ```
//!
//! CSV — a header row followed by one question per record, using the fixed
//! column convention `questionType`, `questionText`, `option1..4` with
//! `isCorrect1..4`, `correctAnswer`, `blank1..5`, `leftItem1..5`,
//! `rightItem1..5`, and `correctMappings` as `"left:right,left:right"`.

use std::collections::HashMap;

use crate::error::{ImportError, Result};
use crate::types::{Mapping, McqOption, QuestionType, RawQuestion};

/// Parse a JSON import file into raw questions, preserving input order.
pub fn parse_json(bytes: &[u8]) -> Result<Vec<RawQuestion>> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let entries = value
        .get("questions")
        .and_then(|q| q.as_array())
        .ok_or(ImportError::MissingQuestionsArray)?;

    let mut questions = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let raw: RawQuestion = serde_json::from_value(entry.clone())?;
        if raw.question_text.trim().is_empty() {
            return Err(ImportError::MissingQuestionText { row: idx + 1 });
        }
        questions.push(raw);
    }
    Ok(questions)
}

/// Parse a CSV import file into raw questions, preserving input order.
pub fn parse_csv(content: &str) -> Result<Vec<RawQuestion>> {
    let mut records = read_records(content)?;
    if records.is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let header = records.remove(0);
    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_string(), i))
        .collect();

    let mut questions = Vec::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let row = idx + 1;
        let field = |name: &str| -> Option<&str> {
            columns
                .get(name)
                .and_then(|&i| record.get(i))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
        };

        let question_text = field("questionText")
            .ok_or(ImportError::MissingQuestionText { row })?
            .to_string();
        let question_type =
            QuestionType::from_str_lossy(field("questionType").unwrap_or("mcq"));

        let mut raw = RawQuestion {
            question_text,
            question_type: Some(question_type.as_str().to_string()),
            ..RawQuestion::default()
        };

        match question_type {
            QuestionType::Mcq => {
                for i in 1..=4 {
                    if let Some(text) = field(&format!("option{i}")) {
                        raw.options.push(McqOption {
                            option_text: text.to_string(),
                            is_correct: field(&format!("isCorrect{i}"))
                                .map(|v| v.eq_ignore_ascii_case("true"))
                                .unwrap_or(false),
                        });
                    }
                }
            }
            QuestionType::TrueFalse => {
                raw.correct_answer = Some(
                    field("correctAnswer")
                        .map(|v| v.eq_ignore_ascii_case("true"))
                        .unwrap_or(false),
                );
            }
            QuestionType::FillBlanks => {
                for i in 1..=5 {
                    if let Some(blank) = field(&format!("blank{i}")) {
                        raw.blanks.push(blank.to_string());
                    }
                }
            }
            QuestionType::MatchFollowing => {
                for i in 1..=5 {
                    if let Some(item) = field(&format!("leftItem{i}")) {
                        raw.left_items.push(item.to_string());
                    }
                    if let Some(item) = field(&format!("rightItem{i}")) {
                        raw.right_items.push(item.to_string());
                    }
                }
                if let Some(mappings) = field("correctMappings") {
                    raw.correct_mappings = parse_mappings(mappings, row)?;
                }
            }
        }

        questions.push(raw);
    }
    Ok(questions)
}

/// Parse a `"left:right,left:right"` mapping list.
fn parse_mappings(value: &str, row: usize) -> Result<Vec<Mapping>> {
    value
        .split(',')
        .map(|pair| {
            let invalid = || ImportError::InvalidMapping {
                row,
                value: pair.trim().to_string(),
            };
            let (left, right) = pair.trim().split_once(':').ok_or_else(invalid)?;
            Ok(Mapping {
                left_index: left.trim().parse().map_err(|_| invalid())?,
                right_index: right.trim().parse().map_err(|_| invalid())?,
            })
        })
        .collect()
}

/// Split CSV content into records, honoring quoted fields (embedded commas,
/// doubled quotes, and newlines inside quotes).
fn read_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    let flush_field = |record: &mut Vec<String>, field: &mut String| {
        record.push(std::mem::take(field));
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => flush_field(&mut record, &mut field),
            '\r' => {}
            '\n' => {
                flush_field(&mut record, &mut field);
                // Skip blank lines between records
                if record.iter().any(|f| !f.is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote {
            row: records.len() + 1,
        });
    }
    if !field.is_empty() || !record.is_empty() {
        flush_field(&mut record, &mut field);
        if record.iter().any(|f| !f.is_empty()) {
            records.push(record);
        }
    }

    Ok(records)
}
