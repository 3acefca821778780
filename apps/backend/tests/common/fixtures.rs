//! Test data builders.

use serde_json::{json, Value};
use uuid::Uuid;

/// Unique name so concurrent tests sharing a database don't collide.
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Body for POST /api/admin/questions (mcq), without the submodule id.
pub fn mcq_body(text: &str) -> Value {
    json!({
        "question_text": text,
        "question_type": "mcq",
        "options": [
            { "optionText": "Right", "isCorrect": true },
            { "optionText": "Wrong", "isCorrect": false }
        ]
    })
}

/// JSON import file with `count` mcq questions.
pub fn questions_json(count: usize) -> String {
    let questions: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "questionText": format!("Imported question {i}"),
                "questionType": "mcq",
                "options": [
                    { "optionText": "Yes", "isCorrect": true },
                    { "optionText": "No", "isCorrect": false }
                ]
            })
        })
        .collect();
    json!({ "questions": questions }).to_string()
}

/// CSV import file with one question of each type.
pub fn questions_csv() -> String {
    [
        "questionType,questionText,option1,isCorrect1,option2,isCorrect2,correctAnswer,blank1,leftItem1,rightItem1,correctMappings",
        "mcq,What is 2+2?,4,true,5,false,,,,,",
        "truefalse,Water is wet,,,,,true,,,,",
        "fillblanks,The capital of France is ___,,,,,,Paris,,,",
        "matchfollowing,Match the pairs,,,,,,,Left,Right,0:0",
    ]
    .join("\n")
}

/// Body for POST /api/users/submit-analytics.
pub fn analytics_request(
    google_id: &str,
    subject_id: Uuid,
    submodule_id: Uuid,
    question_ids: &[i64],
    correct: i32,
    incorrect: i32,
) -> Value {
    let answers: Vec<Value> = question_ids
        .iter()
        .map(|id| json!({ "question_id": id, "user_answer": "A" }))
        .collect();

    json!({
        "google_id": google_id,
        "subject_id": subject_id,
        "submodule_id": submodule_id,
        "question_answers": answers,
        "total_time_spent": 120,
        "correct_answers": correct,
        "incorrect_answers": incorrect,
        "progress": 100.0
    })
}
