pub(crate) mod exam_session;
