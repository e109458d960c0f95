use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::errors::AppError;
use crate::models::activity::ActivityLog;
use crate::models::employee::Employee;
use crate::models::profile::Language;
use crate::models::transaction::Transaction;
use crate::state::repository::Entity;

/// Canonical backup document, also the input of an import.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseExport {
    pub employees: Vec<Employee>,
    pub transactions: Vec<Transaction>,
    pub activity_log: Vec<ActivityLog>,
    pub exported_at: DateTime<Utc>,
}

/// Any subset of the backup keys. Legacy backups used `users` and
/// `activityLogs`.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload {
    #[serde(alias = "users")]
    pub employees: Option<Vec<Employee>>,
    pub transactions: Option<Vec<Transaction>>,
    #[serde(alias = "activityLogs")]
    pub activity_log: Option<Vec<ActivityLog>>,
}

impl ImportPayload {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|err| AppError::MalformedImport(format!("not valid JSON: {}", err)))?;
        if !value.is_object() {
            return Err(AppError::MalformedImport(
                "backup must be a JSON object".to_string(),
            ));
        }
        let payload: ImportPayload = serde_json::from_value(value)
            .map_err(|err| AppError::MalformedImport(err.to_string()))?;

        if let Some(employees) = &payload.employees {
            check_records("employees", employees)?;
        }
        if let Some(transactions) = &payload.transactions {
            check_records("transactions", transactions)?;
        }
        Ok(payload)
    }

    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.employees.is_some() {
            keys.push("employees");
        }
        if self.transactions.is_some() {
            keys.push("transactions");
        }
        if self.activity_log.is_some() {
            keys.push("activityLog");
        }
        keys
    }
}

/// Backup records must satisfy the same rules as records created through
/// the API, and ids must be unique within their collection.
fn check_records<T: Entity + Validate>(key: &str, records: &[T]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for record in records {
        if record.id().is_empty() {
            return Err(AppError::MalformedImport(format!("{} contains an empty id", key)));
        }
        record.validate().map_err(|err| {
            AppError::MalformedImport(format!("{} record {} is invalid: {}", key, record.id(), err))
        })?;
        if !seen.insert(record.id()) {
            return Err(AppError::MalformedImport(format!(
                "{} contains duplicate id {}",
                key,
                record.id()
            )));
        }
    }
    Ok(())
}

const CSV_BOM: char = '\u{feff}';

const CSV_HEADERS_EN: [&str; 11] = [
    "ID",
    "Full name",
    "Mother's name",
    "Gender",
    "Birth date",
    "Education",
    "Job title",
    "Department",
    "Salary",
    "Phone",
    "Status",
];

const CSV_HEADERS_AR: [&str; 11] = [
    "المعرف",
    "الاسم الكامل",
    "اسم الأم",
    "الجنس",
    "تاريخ الميلاد",
    "التحصيل الدراسي",
    "العنوان الوظيفي",
    "القسم",
    "الراتب",
    "رقم الهاتف",
    "الحالة",
];

/// Spreadsheet export: BOM, a header row, then one fully quoted row per
/// employee in the fixed column order.
pub fn employees_csv(employees: &[&Employee], language: Language) -> String {
    let arabic = language == Language::Ar;
    let headers = if arabic { CSV_HEADERS_AR } else { CSV_HEADERS_EN };

    let mut lines = vec![headers.join(",")];
    for employee in employees {
        let cells = [
            employee.id.clone(),
            employee.full_name_quad.clone(),
            employee.mother_name_triple.clone(),
            employee.gender.label(arabic).to_string(),
            employee.birth_date.clone(),
            employee.education.clone(),
            employee.role.clone(),
            employee.department.clone(),
            employee.salary.to_string(),
            employee.phone.clone(),
            employee.status.label(arabic).to_string(),
        ];
        let row: Vec<String> = cells.iter().map(|cell| quote(cell)).collect();
        lines.push(row.join(","));
    }

    let mut csv = String::new();
    csv.push(CSV_BOM);
    csv.push_str(&lines.join("\n"));
    csv
}

fn quote(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::sample;

    #[test]
    fn rejects_non_object_and_bad_shapes() {
        assert!(matches!(ImportPayload::parse("not json"), Err(AppError::MalformedImport(_))));
        assert!(matches!(ImportPayload::parse("[]"), Err(AppError::MalformedImport(_))));
        assert!(matches!(
            ImportPayload::parse(r#"{"employees": {"id": "E1"}}"#),
            Err(AppError::MalformedImport(_))
        ));
    }

    #[test]
    fn accepts_legacy_keys_and_partial_payloads() {
        let payload = ImportPayload::parse(r#"{"users": [], "activityLogs": []}"#).expect("parses");
        assert_eq!(payload.keys(), vec!["employees", "activityLog"]);
        assert!(payload.transactions.is_none());

        let empty = ImportPayload::parse("{}").expect("parses");
        assert!(empty.keys().is_empty());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let raw = r#"{"transactions": [
            {"id": "t1", "date": "2023-10-01", "description": "a", "amount": 1, "type": "INCOME"},
            {"id": "t1", "date": "2023-10-02", "description": "b", "amount": 2, "type": "EXPENSE"}
        ]}"#;
        assert!(matches!(ImportPayload::parse(raw), Err(AppError::MalformedImport(_))));
    }

    #[test]
    fn rejects_records_that_fail_field_rules() {
        let negative_amount = r#"{"transactions": [
            {"id": "t1", "date": "2023-10-01", "description": "Refund", "amount": -500, "type": "INCOME"}
        ]}"#;
        assert!(matches!(
            ImportPayload::parse(negative_amount),
            Err(AppError::MalformedImport(_))
        ));

        let negative_salary = r#"{"employees": [
            {"id": "E1", "fullNameQuad": "Someone", "gender": "male", "salary": -10}
        ]}"#;
        assert!(matches!(
            ImportPayload::parse(negative_salary),
            Err(AppError::MalformedImport(_))
        ));

        let bad_date = r#"{"transactions": [
            {"id": "t1", "date": "01/10/2023", "description": "Rent", "amount": 5, "type": "EXPENSE"}
        ]}"#;
        assert!(matches!(ImportPayload::parse(bad_date), Err(AppError::MalformedImport(_))));

        let bad_type = r#"{"transactions": [
            {"id": "t1", "date": "2023-10-01", "description": "Rent", "amount": 5, "type": "LOAN"}
        ]}"#;
        assert!(matches!(ImportPayload::parse(bad_type), Err(AppError::MalformedImport(_))));

        let valid = r#"{"transactions": [
            {"id": "t1", "date": "2023-10-01", "description": "Rent", "amount": 5, "type": "EXPENSE"}
        ]}"#;
        assert!(ImportPayload::parse(valid).is_ok());
    }

    #[test]
    fn csv_has_bom_header_and_escaped_cells() {
        let mut employee = sample("E7", "Omar \"The Clerk\" Nasser").into_employee("2024-01-01".to_string());
        employee.phone = "+966 55".to_string();
        let csv = employees_csv(&[&employee], Language::En);

        assert!(csv.starts_with('\u{feff}'));
        let mut lines = csv.trim_start_matches('\u{feff}').lines();
        assert_eq!(
            lines.next(),
            Some("ID,Full name,Mother's name,Gender,Birth date,Education,Job title,Department,Salary,Phone,Status")
        );
        assert_eq!(
            lines.next(),
            Some(r#""E7","Omar ""The Clerk"" Nasser","","Male","","","Accountant","Finance","5000","+966 55","Active""#)
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn csv_header_follows_language() {
        let csv = employees_csv(&[], Language::Ar);
        assert!(csv.contains("المعرف"));
    }
}
