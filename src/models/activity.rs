use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    #[serde(alias = "مالي")]
    Financial,
    #[serde(alias = "إداري")]
    Administrative,
    #[serde(alias = "نظام")]
    System,
    #[serde(alias = "سلة المهملات")]
    Trash,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActivityLog {
    pub id: String,
    pub timestamp: String,
    pub user: String,
    pub action: String,
    pub category: ActivityCategory,
    pub details: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ActivityQuery {
    pub category: Option<ActivityCategory>,
}
