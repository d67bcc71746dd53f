use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime,
    PrimitiveDateTime,
};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Exam;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamCreate {
    #[serde(alias = "subjectId")]
    #[validate(length(min = 1, message = "subject_id must not be empty"))]
    pub(crate) subject_id: String,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[serde(alias = "durationMinutes")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: i32,
    #[serde(alias = "questionsPerExam")]
    #[validate(range(min = 1, message = "questions_per_exam must be positive"))]
    pub(crate) questions_per_exam: i32,
    #[serde(alias = "totalMarks")]
    #[validate(range(min = 1, message = "total_marks must be positive"))]
    pub(crate) total_marks: i32,
    #[serde(default)]
    #[serde(alias = "startsAt", deserialize_with = "deserialize_option_datetime_flexible")]
    pub(crate) starts_at: Option<OffsetDateTime>,
    #[serde(default)]
    #[serde(alias = "endsAt", deserialize_with = "deserialize_option_datetime_flexible")]
    pub(crate) ends_at: Option<OffsetDateTime>,
    #[serde(default = "default_true")]
    #[serde(alias = "isActive")]
    pub(crate) is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamUpdate {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[serde(alias = "durationMinutes")]
    #[validate(range(min = 1, message = "duration_minutes must be positive"))]
    pub(crate) duration_minutes: Option<i32>,
    #[serde(default)]
    #[serde(alias = "questionsPerExam")]
    #[validate(range(min = 1, message = "questions_per_exam must be positive"))]
    pub(crate) questions_per_exam: Option<i32>,
    #[serde(default)]
    #[serde(alias = "totalMarks")]
    #[validate(range(min = 1, message = "total_marks must be positive"))]
    pub(crate) total_marks: Option<i32>,
    #[serde(default)]
    #[serde(alias = "startsAt", deserialize_with = "deserialize_option_datetime_flexible")]
    pub(crate) starts_at: Option<OffsetDateTime>,
    #[serde(default)]
    #[serde(alias = "endsAt", deserialize_with = "deserialize_option_datetime_flexible")]
    pub(crate) ends_at: Option<OffsetDateTime>,
    #[serde(default)]
    #[serde(alias = "isActive")]
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) id: String,
    pub(crate) subject_id: String,
    pub(crate) title: String,
    pub(crate) duration_minutes: i32,
    pub(crate) questions_per_exam: i32,
    pub(crate) total_marks: i32,
    pub(crate) starts_at: Option<String>,
    pub(crate) ends_at: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ExamResponse {
    pub(crate) fn from_db(exam: Exam) -> Self {
        Self {
            id: exam.id,
            subject_id: exam.subject_id,
            title: exam.title,
            duration_minutes: exam.duration_minutes,
            questions_per_exam: exam.questions_per_exam,
            total_marks: exam.total_marks,
            starts_at: exam.starts_at.map(format_primitive),
            ends_at: exam.ends_at.map(format_primitive),
            is_active: exam.is_active,
            created_at: format_primitive(exam.created_at),
            updated_at: format_primitive(exam.updated_at),
        }
    }
}

fn parse_datetime_flexible(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    // datetime-local inputs often arrive without timezone or seconds.
    if let Ok(value) =
        PrimitiveDateTime::parse(raw, &format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    {
        return Some(value.assume_utc());
    }
    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(value.assume_utc());
    }

    None
}

fn deserialize_option_datetime_flexible<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => parse_datetime_flexible(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}")))
            .map(Some),
        None => Ok(None),
    }
}

fn default_true() -> bool {
    true
}
