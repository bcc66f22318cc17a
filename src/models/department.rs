use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Department {
    pub department_id: i64,
    pub name: String,
    pub faculty_name: String,
    pub budget_code: String,
    pub head_of_department: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    pub faculty_name: String,
    pub budget_code: String,
    pub head_of_department: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub budget_code: Option<String>,
    pub head_of_department: Option<String>,
}
