use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Admin;
use crate::schemas::student::StudentResponse;

#[derive(Debug, Deserialize)]
pub(crate) struct StudentLogin {
    #[serde(alias = "studentNo")]
    pub(crate) student_no: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminLogin {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AdminResponse {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) created_at: String,
}

impl AdminResponse {
    pub(crate) fn from_db(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            full_name: admin.full_name,
            created_at: format_primitive(admin.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub(crate) enum ProfileResponse {
    Student(StudentResponse),
    Admin(AdminResponse),
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) profile: ProfileResponse,
}
