//! Demo records written on first start, when the store has nothing yet.

use crate::models::employee::{Employee, EmployeeStatus, Gender};
use crate::models::transaction::{Transaction, TransactionType};

pub fn transactions() -> Vec<Transaction> {
    let tx = |id: &str, date: &str, description: &str, category: &str, amount: f64, kind: TransactionType| Transaction {
        id: id.to_string(),
        date: date.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        amount,
        kind,
        deleted_at: None,
    };
    vec![
        tx("1", "2023-10-01", "October salary - Ali Khadr", "Salaries", 15000.0, TransactionType::Expense),
        tx("2", "2023-10-02", "Office rent", "Housing", 3000.0, TransactionType::Expense),
        tx("3", "2023-10-05", "Sales deposit", "Income", 25000.0, TransactionType::Income),
    ]
}

pub fn employees() -> Vec<Employee> {
    vec![Employee {
        id: "u1".to_string(),
        name: "Ali Khadr".to_string(),
        full_name_quad: "Ali Khadr bin Hassan Al Ali".to_string(),
        mother_name_triple: "Sara bint Mohammed Hassan".to_string(),
        gender: Gender::Male,
        birth_date: "1985-05-15".to_string(),
        education: "MBA".to_string(),
        precise_specialization: "Strategic management".to_string(),
        appointment_date_contract: "2022-12-01".to_string(),
        appointment_date_permanent: "2023-01-01".to_string(),
        email: "ali.khadr@example.com".to_string(),
        role: "Manager".to_string(),
        status: EmployeeStatus::Active,
        join_date: "2023-01-01".to_string(),
        phone: "+966 50 123 4567".to_string(),
        department: "Executive management".to_string(),
        salary: 15000.0,
        address: "Riyadh, Al Olaya".to_string(),
        biography: Some(
            "Finance and administration lead with over 15 years of digital transformation work."
                .to_string(),
        ),
        notes: Some("Executive owner of the system.".to_string()),
        deleted_at: None,
        avatar: None,
    }]
}
