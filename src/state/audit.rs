use chrono::Local;
use uuid::Uuid;

use crate::models::activity::{ActivityCategory, ActivityLog};

/// Append-only activity trail, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<ActivityLog>,
}

impl AuditLog {
    pub fn from_vec(entries: Vec<ActivityLog>) -> Self {
        Self { entries }
    }

    pub fn record(
        &mut self,
        user: &str,
        action: &str,
        category: ActivityCategory,
        details: impl Into<String>,
    ) {
        let entry = ActivityLog {
            id: Uuid::new_v4().to_string(),
            timestamp: wall_clock(),
            user: user.to_string(),
            action: action.to_string(),
            category,
            details: details.into(),
        };
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[ActivityLog] {
        &self.entries
    }

    pub fn by_category(&self, category: Option<ActivityCategory>) -> Vec<&ActivityLog> {
        self.entries
            .iter()
            .filter(|entry| category.map_or(true, |c| entry.category == c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Only used when a backup replaces the whole trail.
    pub fn replace_all(&mut self, entries: Vec<ActivityLog>) {
        self.entries = entries;
    }
}

/// Local wall-clock time as shown to users, e.g. `19/10/2026, 14:03:11`.
pub fn wall_clock() -> String {
    Local::now().format("%d/%m/%Y, %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_is_first() {
        let mut log = AuditLog::default();
        log.record("Ali", "Add employee", ActivityCategory::Administrative, "first");
        log.record("Ali", "Add transaction", ActivityCategory::Financial, "second");

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].details, "second");
        assert_ne!(log.entries()[0].id, log.entries()[1].id);
        assert_eq!(log.entries()[1].user, "Ali");
    }

    #[test]
    fn filters_by_category() {
        let mut log = AuditLog::default();
        log.record("Ali", "Delete employees", ActivityCategory::Trash, "1 moved");
        log.record("Ali", "Toggle language", ActivityCategory::System, "ar -> en");

        assert_eq!(log.by_category(Some(ActivityCategory::Trash)).len(), 1);
        assert_eq!(log.by_category(None).len(), 2);
        assert!(log.by_category(Some(ActivityCategory::Financial)).is_empty());
    }
}
