use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::lenient_timestamp;
use crate::state::repository::{Entity, SoftDelete};
use crate::utils::validation::validate_iso_date;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

/// A cash movement. `amount` is always a magnitude; direction lives in `kind`.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(custom = "validate_iso_date")]
    pub date: String,
    #[validate(length(min = 1, max = 256))]
    pub description: String,
    #[validate(length(max = 64))]
    #[serde(default)]
    pub category: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Entity for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SoftDelete for Transaction {
    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }

    fn clear_deleted(&mut self) {
        self.deleted_at = None;
    }
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[validate(custom = "validate_iso_date")]
    pub date: String,
    #[validate(length(min = 1, max = 256))]
    pub description: String,
    #[validate(length(max = 64))]
    #[serde(default)]
    pub category: String,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

impl NewTransaction {
    pub fn into_transaction(self, id: String) -> Transaction {
        Transaction {
            id,
            date: self.date,
            description: self.description,
            category: self.category,
            amount: self.amount,
            kind: self.kind,
            deleted_at: None,
        }
    }
}

/// Corrections applied to a trashed transaction before it is restored.
#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransactionUpdate {
    #[validate(custom = "validate_iso_date")]
    pub date: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
}

impl TransactionUpdate {
    pub fn apply(self, transaction: &mut Transaction) {
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(description) = self.description {
            transaction.description = description;
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_uses_stable_uppercase_tag() {
        let tx = NewTransaction {
            date: "2023-10-05".to_string(),
            description: "Sales deposit".to_string(),
            category: "Income".to_string(),
            amount: 25000.0,
            kind: TransactionType::Income,
        }
        .into_transaction("abc".to_string());
        let json = serde_json::to_value(&tx).expect("transaction serializes");
        assert_eq!(json["type"], "INCOME");
        assert!(json.get("deletedAt").is_none());
    }

    #[test]
    fn rejects_negative_amount_and_bad_date() {
        let tx = NewTransaction {
            date: "05/10/2023".to_string(),
            description: "Rent".to_string(),
            category: String::new(),
            amount: -3000.0,
            kind: TransactionType::Expense,
        };
        let errors = tx.validate().expect_err("payload must be rejected");
        let fields = errors.field_errors();
        assert!(fields.contains_key("amount"));
        assert!(fields.contains_key("date"));
    }
}
