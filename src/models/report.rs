use serde::{Deserialize, Serialize};

use crate::models::transaction::Transaction;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub transactions_count: usize,
}

/// An archived print of a report. `summary_snapshot` is a copy taken at save
/// time and is never recomputed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub id: String,
    pub timestamp: String,
    pub generated_by: String,
    pub summary_snapshot: FinancialSummary,
    pub report_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    All,
    Yearly { year: i32 },
    Monthly { year: i32, month: u32 },
}

impl ReportPeriod {
    /// Transactions are matched on the `YYYY-MM` prefix of their date.
    pub fn includes(&self, transaction: &Transaction) -> bool {
        let mut parts = transaction.date.split('-');
        let year = parts.next().and_then(|y| y.parse::<i32>().ok());
        let month = parts.next().and_then(|m| m.parse::<u32>().ok());
        match *self {
            ReportPeriod::All => true,
            ReportPeriod::Yearly { year: wanted } => year == Some(wanted),
            ReportPeriod::Monthly { year: wanted_year, month: wanted_month } => {
                year == Some(wanted_year) && month == Some(wanted_month)
            }
        }
    }

    pub fn label(&self) -> String {
        match *self {
            ReportPeriod::All => "Comprehensive report".to_string(),
            ReportPeriod::Yearly { year } => format!("Yearly report - {}", year),
            ReportPeriod::Monthly { year, month } => format!("Monthly report - {:02}/{}", month, year),
        }
    }
}

/// Query-string form of a period: `?period=monthly&year=2023&month=10`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ReportPeriodParams {
    pub period: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl ReportPeriodParams {
    pub fn resolve(&self) -> Result<ReportPeriod, String> {
        match self.period.as_deref().unwrap_or("all") {
            "all" => Ok(ReportPeriod::All),
            "yearly" => self
                .year
                .map(|year| ReportPeriod::Yearly { year })
                .ok_or_else(|| "yearly reports need a year".to_string()),
            "monthly" => match (self.year, self.month) {
                (Some(year), Some(month)) if (1..=12).contains(&month) => {
                    Ok(ReportPeriod::Monthly { year, month })
                }
                _ => Err("monthly reports need a year and a month between 1 and 12".to_string()),
            },
            other => Err(format!("unknown report period '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::TransactionType;

    fn dated(date: &str) -> Transaction {
        Transaction {
            id: date.to_string(),
            date: date.to_string(),
            description: "x".to_string(),
            category: String::new(),
            amount: 1.0,
            kind: TransactionType::Income,
            deleted_at: None,
        }
    }

    #[test]
    fn periods_filter_on_date_prefix() {
        let october = dated("2023-10-05");
        let november = dated("2023-11-01");
        let monthly = ReportPeriod::Monthly { year: 2023, month: 10 };
        assert!(monthly.includes(&october));
        assert!(!monthly.includes(&november));
        assert!(ReportPeriod::Yearly { year: 2023 }.includes(&november));
        assert!(!ReportPeriod::Yearly { year: 2024 }.includes(&november));
        assert!(ReportPeriod::All.includes(&dated("not a date")));
    }

    #[test]
    fn params_resolve_and_label() {
        let params = ReportPeriodParams {
            period: Some("monthly".to_string()),
            year: Some(2023),
            month: Some(3),
        };
        let period = params.resolve().expect("valid period");
        assert_eq!(period.label(), "Monthly report - 03/2023");

        let missing = ReportPeriodParams {
            period: Some("yearly".to_string()),
            ..Default::default()
        };
        assert!(missing.resolve().is_err());
        assert_eq!(ReportPeriodParams::default().resolve(), Ok(ReportPeriod::All));
    }
}
