pub(crate) mod admins;
pub(crate) mod exams;
pub(crate) mod questions;
pub(crate) mod results;
pub(crate) mod students;
pub(crate) mod subjects;
