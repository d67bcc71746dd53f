use std::collections::HashMap;

use time::{Duration, PrimitiveDateTime};

use crate::db::models::Exam;
use crate::db::types::AnswerOption;

/// Outcome of checking whether an exam accepts a new attempt right now.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ExamAvailability {
    Open,
    Inactive,
    NotYetOpen,
    Closed,
}

pub(crate) fn exam_availability(exam: &Exam, now: PrimitiveDateTime) -> ExamAvailability {
    if !exam.is_active {
        return ExamAvailability::Inactive;
    }
    if let Some(starts_at) = exam.starts_at {
        if now < starts_at {
            return ExamAvailability::NotYetOpen;
        }
    }
    if let Some(ends_at) = exam.ends_at {
        if now >= ends_at {
            return ExamAvailability::Closed;
        }
    }
    ExamAvailability::Open
}

/// Expiry is the duration deadline, clamped to the exam window's end so a
/// late starter never gets more time than the window allows.
pub(crate) fn compute_expiry(
    started_at: PrimitiveDateTime,
    duration_minutes: i32,
    ends_at: Option<PrimitiveDateTime>,
) -> PrimitiveDateTime {
    let duration_deadline = started_at + Duration::minutes(i64::from(duration_minutes));
    match ends_at {
        Some(ends_at) if ends_at < duration_deadline => ends_at,
        _ => duration_deadline,
    }
}

pub(crate) fn remaining_seconds(
    expires_at: PrimitiveDateTime,
    now: PrimitiveDateTime,
) -> i64 {
    (expires_at - now).whole_seconds().max(0)
}

pub(crate) fn is_expired(
    expires_at: PrimitiveDateTime,
    now: PrimitiveDateTime,
    grace_seconds: i64,
) -> bool {
    now > expires_at + Duration::seconds(grace_seconds)
}

/// Sums marks of correctly answered questions against the pinned answer keys.
/// Answers for questions outside the pinned set are ignored; unanswered
/// questions simply score nothing.
pub(crate) fn score_answers(
    keys: &[(String, AnswerOption, i32)],
    answers: &HashMap<String, AnswerOption>,
) -> i32 {
    keys.iter()
        .filter(|(id, correct, _)| answers.get(id) == Some(correct))
        .map(|(_, _, marks)| marks)
        .sum()
}

/// Integer percentage, rounded half-up. A zero-mark exam grades to 0.
pub(crate) fn percentage(score: i32, total_marks: i32) -> i32 {
    if total_marks <= 0 {
        return 0;
    }
    ((i64::from(score) * 100 + i64::from(total_marks) / 2) / i64::from(total_marks)) as i32
}
