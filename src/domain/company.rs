use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Each user owns at most one company.
pub const COMPANY_EXISTS: &str = "A company is already registered for this user";

#[derive(Debug, Clone)]
pub struct CompanyInput {
    pub name: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Company {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
