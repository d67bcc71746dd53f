use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::ExamResult;
use crate::db::types::{AnswerOption, AttemptStatus};
use crate::repositories::results::{ExamAggregateRow, ExamResultRow, StudentResultRow};
use crate::schemas::question::ExamQuestionResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct ExamSubmit {
    pub(crate) answers: HashMap<String, AnswerOption>,
}

/// Returned from the start endpoint. `time_remaining_seconds` is computed
/// against the server clock so clients never derive it themselves.
#[derive(Debug, Serialize)]
pub(crate) struct AttemptStartedResponse {
    pub(crate) result_id: String,
    pub(crate) exam_id: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: String,
    pub(crate) expires_at: String,
    pub(crate) time_remaining_seconds: i64,
    pub(crate) question_count: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamPaperResponse {
    pub(crate) exam_id: String,
    pub(crate) result_id: String,
    pub(crate) time_remaining_seconds: i64,
    pub(crate) questions: Vec<ExamQuestionResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultResponse {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) student_id: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: String,
    pub(crate) expires_at: String,
    pub(crate) submitted_at: Option<String>,
    pub(crate) score: i32,
    pub(crate) total_marks: i32,
    pub(crate) percentage: i32,
}

impl ResultResponse {
    pub(crate) fn from_db(result: ExamResult) -> Self {
        Self {
            id: result.id,
            exam_id: result.exam_id,
            student_id: result.student_id,
            status: result.status,
            started_at: format_primitive(result.started_at),
            expires_at: format_primitive(result.expires_at),
            submitted_at: result.submitted_at.map(format_primitive),
            score: result.score,
            total_marks: result.total_marks,
            percentage: result.percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResultResponse {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) exam_title: String,
    pub(crate) subject_name: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: String,
    pub(crate) submitted_at: Option<String>,
    pub(crate) score: i32,
    pub(crate) total_marks: i32,
    pub(crate) percentage: i32,
}

impl StudentResultResponse {
    pub(crate) fn from_row(row: StudentResultRow) -> Self {
        Self {
            id: row.id,
            exam_id: row.exam_id,
            exam_title: row.exam_title,
            subject_name: row.subject_name,
            status: row.status,
            started_at: format_primitive(row.started_at),
            submitted_at: row.submitted_at.map(format_primitive),
            score: row.score,
            total_marks: row.total_marks,
            percentage: row.percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResultEntryResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) student_no: String,
    pub(crate) student_name: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: String,
    pub(crate) submitted_at: Option<String>,
    pub(crate) score: i32,
    pub(crate) total_marks: i32,
    pub(crate) percentage: i32,
}

impl ExamResultEntryResponse {
    pub(crate) fn from_row(row: ExamResultRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            student_no: row.student_no,
            student_name: row.student_name,
            status: row.status,
            started_at: format_primitive(row.started_at),
            submitted_at: row.submitted_at.map(format_primitive),
            score: row.score,
            total_marks: row.total_marks,
            percentage: row.percentage,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResultsSummaryResponse {
    pub(crate) exam_id: String,
    pub(crate) exam_title: String,
    pub(crate) attempts: i64,
    pub(crate) submitted: i64,
    pub(crate) average_percentage: Option<f64>,
    pub(crate) highest_score: Option<i32>,
    pub(crate) lowest_score: Option<i32>,
    pub(crate) results: Vec<ExamResultEntryResponse>,
}

impl ExamResultsSummaryResponse {
    pub(crate) fn from_rows(
        exam_id: String,
        exam_title: String,
        aggregate: ExamAggregateRow,
        rows: Vec<ExamResultRow>,
    ) -> Self {
        Self {
            exam_id,
            exam_title,
            attempts: aggregate.attempts,
            submitted: aggregate.submitted,
            average_percentage: aggregate.average_percentage,
            highest_score: aggregate.highest_score,
            lowest_score: aggregate.lowest_score,
            results: rows.into_iter().map(ExamResultEntryResponse::from_row).collect(),
        }
    }
}
