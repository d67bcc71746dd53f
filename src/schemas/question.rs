use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Question;
use crate::db::types::{AnswerOption, Difficulty};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionCreate {
    #[serde(alias = "subjectId")]
    #[validate(length(min = 1, message = "subject_id must not be empty"))]
    pub(crate) subject_id: String,
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub(crate) text: String,
    #[serde(alias = "optionA")]
    #[validate(length(min = 1, message = "option_a must not be empty"))]
    pub(crate) option_a: String,
    #[serde(alias = "optionB")]
    #[validate(length(min = 1, message = "option_b must not be empty"))]
    pub(crate) option_b: String,
    #[serde(alias = "optionC")]
    #[validate(length(min = 1, message = "option_c must not be empty"))]
    pub(crate) option_c: String,
    #[serde(alias = "optionD")]
    #[validate(length(min = 1, message = "option_d must not be empty"))]
    pub(crate) option_d: String,
    #[serde(alias = "correctOption")]
    pub(crate) correct_option: AnswerOption,
    #[serde(default = "default_marks")]
    #[validate(range(min = 1, message = "marks must be positive"))]
    pub(crate) marks: i32,
    #[serde(default = "default_difficulty")]
    pub(crate) difficulty: Difficulty,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub(crate) text: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionA")]
    pub(crate) option_a: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionB")]
    pub(crate) option_b: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionC")]
    pub(crate) option_c: Option<String>,
    #[serde(default)]
    #[serde(alias = "optionD")]
    pub(crate) option_d: Option<String>,
    #[serde(default)]
    #[serde(alias = "correctOption")]
    pub(crate) correct_option: Option<AnswerOption>,
    #[serde(default)]
    #[validate(range(min = 1, message = "marks must be positive"))]
    pub(crate) marks: Option<i32>,
    #[serde(default)]
    pub(crate) difficulty: Option<Difficulty>,
}

/// Admin view of a question, answer key included.
#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: String,
    pub(crate) subject_id: String,
    pub(crate) text: String,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) correct_option: AnswerOption,
    pub(crate) marks: i32,
    pub(crate) difficulty: Difficulty,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question) -> Self {
        Self {
            id: question.id,
            subject_id: question.subject_id,
            text: question.text,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            correct_option: question.correct_option,
            marks: question.marks,
            difficulty: question.difficulty,
            created_at: format_primitive(question.created_at),
            updated_at: format_primitive(question.updated_at),
        }
    }
}

/// Student view during a running attempt. The answer key never leaves the
/// server through this shape.
#[derive(Debug, Serialize)]
pub(crate) struct ExamQuestionResponse {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) marks: i32,
}

impl ExamQuestionResponse {
    pub(crate) fn from_db(question: Question) -> Self {
        Self {
            id: question.id,
            text: question.text,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            marks: question.marks,
        }
    }
}

fn default_marks() -> i32 {
    1
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}
