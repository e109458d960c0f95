use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::lenient_timestamp;
use crate::state::repository::{Entity, SoftDelete};
use crate::utils::validation::{validate_iso_date, validate_optional_iso_date};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "male", alias = "ذكر")]
    Male,
    #[serde(rename = "female", alias = "أنثى")]
    Female,
}

impl Gender {
    pub fn label(&self, arabic: bool) -> &'static str {
        match (self, arabic) {
            (Gender::Male, true) => "ذكر",
            (Gender::Female, true) => "أنثى",
            (Gender::Male, false) => "Male",
            (Gender::Female, false) => "Female",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeStatus {
    #[default]
    #[serde(rename = "active", alias = "نشط")]
    Active,
    #[serde(rename = "disabled", alias = "معطل")]
    Disabled,
}

impl EmployeeStatus {
    pub fn toggled(self) -> Self {
        match self {
            EmployeeStatus::Active => EmployeeStatus::Disabled,
            EmployeeStatus::Disabled => EmployeeStatus::Active,
        }
    }

    pub fn label(&self, arabic: bool) -> &'static str {
        match (self, arabic) {
            (EmployeeStatus::Active, true) => "نشط",
            (EmployeeStatus::Disabled, true) => "معطل",
            (EmployeeStatus::Active, false) => "Active",
            (EmployeeStatus::Disabled, false) => "Disabled",
        }
    }
}

/// Stored employee record. Field names are the on-disk schema; renaming one
/// breaks every existing snapshot and backup file.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 1, max = 256))]
    pub full_name_quad: String,
    #[serde(default)]
    pub mother_name_triple: String,
    pub gender: Gender,
    #[validate(custom = "validate_optional_iso_date")]
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub precise_specialization: String,
    #[serde(default)]
    pub appointment_date_contract: String,
    #[serde(default)]
    pub appointment_date_permanent: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: EmployeeStatus,
    #[validate(custom = "validate_optional_iso_date")]
    #[serde(default)]
    pub join_date: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    #[validate(range(min = 0.0))]
    pub salary: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Entity for Employee {
    fn id(&self) -> &str {
        &self.id
    }
}

impl SoftDelete for Employee {
    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }

    fn clear_deleted(&mut self) {
        self.deleted_at = None;
        // Restored employees always come back active.
        self.status = EmployeeStatus::Active;
    }
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(length(max = 128))]
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 1, max = 256))]
    pub full_name_quad: String,
    #[serde(default)]
    pub mother_name_triple: String,
    pub gender: Gender,
    #[validate(custom = "validate_iso_date")]
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub precise_specialization: String,
    #[serde(default)]
    pub appointment_date_contract: String,
    #[serde(default)]
    pub appointment_date_permanent: String,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub address: String,
    pub biography: Option<String>,
    pub notes: Option<String>,
    #[validate(url)]
    pub avatar: Option<String>,
}

impl NewEmployee {
    /// Builds the stored record; join date and status are assigned here,
    /// never taken from the caller.
    pub fn into_employee(self, join_date: String) -> Employee {
        Employee {
            id: self.id,
            name: self.name,
            full_name_quad: self.full_name_quad,
            mother_name_triple: self.mother_name_triple,
            gender: self.gender,
            birth_date: self.birth_date.unwrap_or_default(),
            education: self.education,
            precise_specialization: self.precise_specialization,
            appointment_date_contract: self.appointment_date_contract,
            appointment_date_permanent: self.appointment_date_permanent,
            email: self.email.unwrap_or_default(),
            role: self.role,
            status: EmployeeStatus::Active,
            join_date,
            phone: self.phone,
            department: self.department,
            salary: self.salary,
            address: self.address,
            biography: self.biography,
            notes: self.notes,
            deleted_at: None,
            avatar: self.avatar,
        }
    }
}

/// Partial update. Absent fields leave the record untouched; `id` and
/// `joinDate` are not part of it.
#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EmployeeUpdate {
    #[validate(length(max = 128))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub full_name_quad: Option<String>,
    pub mother_name_triple: Option<String>,
    pub gender: Option<Gender>,
    #[validate(custom = "validate_iso_date")]
    pub birth_date: Option<String>,
    pub education: Option<String>,
    pub precise_specialization: Option<String>,
    pub appointment_date_contract: Option<String>,
    pub appointment_date_permanent: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub phone: Option<String>,
    pub department: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    pub address: Option<String>,
    pub biography: Option<String>,
    pub notes: Option<String>,
    #[validate(url)]
    pub avatar: Option<String>,
}

impl EmployeeUpdate {
    pub fn apply(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(full_name_quad) = self.full_name_quad {
            employee.full_name_quad = full_name_quad;
        }
        if let Some(mother_name_triple) = self.mother_name_triple {
            employee.mother_name_triple = mother_name_triple;
        }
        if let Some(gender) = self.gender {
            employee.gender = gender;
        }
        if let Some(birth_date) = self.birth_date {
            employee.birth_date = birth_date;
        }
        if let Some(education) = self.education {
            employee.education = education;
        }
        if let Some(precise_specialization) = self.precise_specialization {
            employee.precise_specialization = precise_specialization;
        }
        if let Some(date) = self.appointment_date_contract {
            employee.appointment_date_contract = date;
        }
        if let Some(date) = self.appointment_date_permanent {
            employee.appointment_date_permanent = date;
        }
        if let Some(email) = self.email {
            employee.email = email;
        }
        if let Some(role) = self.role {
            employee.role = role;
        }
        if let Some(status) = self.status {
            employee.status = status;
        }
        if let Some(phone) = self.phone {
            employee.phone = phone;
        }
        if let Some(department) = self.department {
            employee.department = department;
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(address) = self.address {
            employee.address = address;
        }
        if self.biography.is_some() {
            employee.biography = self.biography;
        }
        if self.notes.is_some() {
            employee.notes = self.notes;
        }
        if self.avatar.is_some() {
            employee.avatar = self.avatar;
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum EmployeeSortKey {
    #[default]
    FullNameQuad,
    Name,
    Id,
    Department,
    Role,
    Salary,
    JoinDate,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: EmployeeSortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl EmployeeQuery {
    pub fn matches(&self, employee: &Employee) -> bool {
        let term = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };
        [
            &employee.full_name_quad,
            &employee.id,
            &employee.role,
            &employee.department,
            &employee.phone,
            &employee.name,
            &employee.email,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }

    /// Filters and sorts a slice of employees into a new listing.
    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        let mut listed: Vec<&Employee> = employees.iter().filter(|e| self.matches(e)).collect();
        listed.sort_by(|a, b| {
            let ordering = match self.sort_by {
                EmployeeSortKey::Salary => a.salary.total_cmp(&b.salary),
                key => sort_text(a, key).cmp(&sort_text(b, key)),
            };
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        listed
    }
}

fn sort_text(employee: &Employee, key: EmployeeSortKey) -> String {
    let value = match key {
        EmployeeSortKey::FullNameQuad => &employee.full_name_quad,
        EmployeeSortKey::Name => &employee.name,
        EmployeeSortKey::Id => &employee.id,
        EmployeeSortKey::Department => &employee.department,
        EmployeeSortKey::Role => &employee.role,
        EmployeeSortKey::JoinDate => &employee.join_date,
        EmployeeSortKey::Salary => return String::new(),
    };
    value.to_lowercase()
}

#[cfg(test)]
pub(crate) fn sample(id: &str, full_name: &str) -> NewEmployee {
    NewEmployee {
        id: id.to_string(),
        name: full_name.split_whitespace().next().unwrap_or_default().to_string(),
        full_name_quad: full_name.to_string(),
        mother_name_triple: String::new(),
        gender: Gender::Male,
        birth_date: None,
        education: String::new(),
        precise_specialization: String::new(),
        appointment_date_contract: String::new(),
        appointment_date_permanent: String::new(),
        email: None,
        role: "Accountant".to_string(),
        phone: String::new(),
        department: "Finance".to_string(),
        salary: 5000.0,
        address: String::new(),
        biography: None,
        notes: None,
        avatar: None,
    }
}
