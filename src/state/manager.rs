use chrono::{Local, Utc};
use log::{debug, error, info, warn};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::{StoreAdapter, StoreKey};
use crate::errors::AppError;
use crate::models::activity::{ActivityCategory, ActivityLog};
use crate::models::employee::{Employee, EmployeeQuery, EmployeeUpdate, NewEmployee};
use crate::models::profile::{CurrentUserProfile, Identity, Language, ProfileUpdate, ThemeUpdate};
use crate::models::report::{FinancialSummary, GeneratedReport, ReportPeriod};
use crate::models::transaction::{NewTransaction, Transaction, TransactionType, TransactionUpdate};
use crate::state::audit::{wall_clock, AuditLog};
use crate::state::backup::{employees_csv, DatabaseExport, ImportPayload};
use crate::state::repository::TrashableRepository;
use crate::state::seed;
use crate::state::summary::summarize_period;
use crate::utils::validation::validate_payload;

const TRANSACTION_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const REPORT_ID_PREFIX: &str = "ZD-";

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceStatus {
    pub memory_only: bool,
    pub last_error: Option<String>,
}

/// Owns every collection and is the only place they are mutated.
///
/// Owner-only operations return `PermissionDenied` without touching any
/// collection or the activity log. Every successful mutation records exactly
/// one activity entry and then writes the touched keys to the store. A failed
/// write never undoes the in-memory change; it is kept as the last
/// persistence error until a later write succeeds.
pub struct DomainState {
    store: Box<dyn StoreAdapter>,
    owner_email: String,
    employees: TrashableRepository<Employee>,
    transactions: TrashableRepository<Transaction>,
    reports: Vec<GeneratedReport>,
    activity: AuditLog,
    profile: CurrentUserProfile,
    authenticated: bool,
    persistence_error: Option<String>,
}

impl DomainState {
    pub fn load(store: Box<dyn StoreAdapter>, owner_email: impl Into<String>) -> Self {
        let mut seeded = Vec::new();
        let mut read = |key: StoreKey| -> Option<String> {
            match store.read(key) {
                Ok(Some(raw)) => Some(raw),
                Ok(None) => {
                    seeded.push(key);
                    None
                }
                Err(err) => {
                    error!("Failed to read {}: {}", key.as_str(), err);
                    None
                }
            }
        };

        let employees = read(StoreKey::Employees);
        let transactions = read(StoreKey::Transactions);
        let employee_trash = read(StoreKey::EmployeeTrash);
        let transaction_trash = read(StoreKey::TransactionTrash);
        let reports = read(StoreKey::Reports);
        let activity = read(StoreKey::ActivityLog);
        let profile = read(StoreKey::CurrentProfile);
        let authenticated = read(StoreKey::AuthenticatedFlag);

        let mut state = Self {
            owner_email: owner_email.into(),
            employees: TrashableRepository::new(
                decode(StoreKey::Employees, employees, seed::employees),
                decode(StoreKey::EmployeeTrash, employee_trash, Vec::new),
            ),
            transactions: TrashableRepository::new(
                decode(StoreKey::Transactions, transactions, seed::transactions),
                decode(StoreKey::TransactionTrash, transaction_trash, Vec::new),
            ),
            reports: decode(StoreKey::Reports, reports, Vec::new),
            activity: AuditLog::from_vec(decode(StoreKey::ActivityLog, activity, Vec::new)),
            profile: decode(StoreKey::CurrentProfile, profile, CurrentUserProfile::default),
            authenticated: decode(StoreKey::AuthenticatedFlag, authenticated, || false),
            persistence_error: None,
            store,
        };

        info!(
            "Loaded {} employees, {} transactions, {} log entries",
            state.employees.live().len(),
            state.transactions.live().len(),
            state.activity.len()
        );
        if !seeded.is_empty() {
            state.persist(&seeded);
        }
        state
    }

    // ----- reads -----

    pub fn profile(&self) -> &CurrentUserProfile {
        &self.profile
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_owner(&self) -> bool {
        self.authenticated && self.profile.is_owner()
    }

    pub fn employees(&self) -> &[Employee] {
        self.employees.live().list()
    }

    pub fn employee(&self, id: &str) -> Option<&Employee> {
        self.employees.live().get(id)
    }

    pub fn search_employees(&self, query: &EmployeeQuery) -> Vec<&Employee> {
        query.apply(self.employees.live().list())
    }

    pub fn trashed_employees(&self) -> &[Employee] {
        self.employees.trash().list()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.live().list()
    }

    pub fn trashed_transactions(&self) -> &[Transaction] {
        self.transactions.trash().list()
    }

    pub fn reports(&self) -> &[GeneratedReport] {
        &self.reports
    }

    pub fn activity_log(&self, category: Option<ActivityCategory>) -> Vec<&ActivityLog> {
        self.activity.by_category(category)
    }

    /// Recomputed from the live transactions on every call.
    pub fn summary(&self, period: ReportPeriod) -> FinancialSummary {
        summarize_period(self.transactions.live().list(), period)
    }

    pub fn persistence_status(&self) -> PersistenceStatus {
        PersistenceStatus {
            memory_only: self.persistence_error.is_some(),
            last_error: self.persistence_error.clone(),
        }
    }

    pub fn export_database(&self) -> DatabaseExport {
        DatabaseExport {
            employees: self.employees.live().list().to_vec(),
            transactions: self.transactions.live().list().to_vec(),
            activity_log: self.activity.entries().to_vec(),
            exported_at: Utc::now(),
        }
    }

    pub fn export_employees_csv(&self, query: &EmployeeQuery) -> String {
        employees_csv(&self.search_employees(query), self.profile.language)
    }

    /// Rejects requests whose identity is not the signed-in session.
    pub fn ensure_session(&self, identity: &Identity) -> Result<(), AppError> {
        if self.authenticated && self.profile.email.eq_ignore_ascii_case(&identity.email) {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "No active session for {}",
                identity.email
            )))
        }
    }

    // ----- session -----

    pub fn sign_in(&mut self, identity: &Identity) -> &CurrentUserProfile {
        self.profile.name = identity.display_name();
        self.profile.email = identity.email.clone();
        self.profile.avatar = identity.avatar_url.clone();
        self.profile.role = identity.role_for(&self.owner_email).to_string();
        self.authenticated = true;

        let details = format!(
            "{} signed in with role {}",
            self.profile.name, self.profile.role
        );
        self.log("Sign in", ActivityCategory::System, details);
        info!("Session started for {} ({})", self.profile.email, self.profile.role);
        self.persist(&[
            StoreKey::CurrentProfile,
            StoreKey::AuthenticatedFlag,
            StoreKey::ActivityLog,
        ]);
        &self.profile
    }

    pub fn sign_out(&mut self) {
        if !self.authenticated {
            debug!("Sign out without an active session ignored");
            return;
        }
        self.log(
            "Sign out",
            ActivityCategory::System,
            "The current session was ended manually.",
        );
        info!("Session ended for {}", self.profile.email);
        self.profile = CurrentUserProfile::default();
        self.authenticated = false;
        self.persist(&[
            StoreKey::CurrentProfile,
            StoreKey::AuthenticatedFlag,
            StoreKey::ActivityLog,
        ]);
    }

    // ----- employees -----

    pub fn add_employee(&mut self, new_employee: NewEmployee) -> Result<Employee, AppError> {
        self.require_owner("add employees")?;
        validate_payload(&new_employee)?;
        if self.employees.id_in_use(&new_employee.id) {
            return Err(AppError::Conflict(format!(
                "Employee id {} is already in use",
                new_employee.id
            )));
        }

        let employee = new_employee.into_employee(Local::now().format("%Y-%m-%d").to_string());
        self.employees.live_mut().upsert(employee.clone());
        self.log(
            "Add employee",
            ActivityCategory::Administrative,
            format!("Registered employee {}", employee.full_name_quad),
        );
        info!("Employee {} added", employee.id);
        self.persist(&[StoreKey::Employees, StoreKey::ActivityLog]);
        Ok(employee)
    }

    pub fn update_employee(
        &mut self,
        id: &str,
        update: EmployeeUpdate,
    ) -> Result<Option<Employee>, AppError> {
        self.require_owner("update employees")?;
        validate_payload(&update)?;
        let Some(employee) = self.employees.live_mut().get_mut(id) else {
            debug!("Update of unknown employee {} ignored", id);
            return Ok(None);
        };
        update.apply(employee);
        let updated = employee.clone();

        self.log(
            "Update employee",
            ActivityCategory::Administrative,
            format!("Edited the employee file for id {}", id),
        );
        info!("Employee {} updated", id);
        self.persist(&[StoreKey::Employees, StoreKey::ActivityLog]);
        Ok(Some(updated))
    }

    pub fn toggle_employee_status(&mut self, id: &str) -> Result<Option<Employee>, AppError> {
        self.require_owner("change employee status")?;
        let Some(employee) = self.employees.live_mut().get_mut(id) else {
            debug!("Status toggle of unknown employee {} ignored", id);
            return Ok(None);
        };
        employee.status = employee.status.toggled();
        let updated = employee.clone();

        self.log(
            "Toggle employee status",
            ActivityCategory::Administrative,
            format!("Employee {} is now {:?}", id, updated.status),
        );
        self.persist(&[StoreKey::Employees, StoreKey::ActivityLog]);
        Ok(Some(updated))
    }

    /// Returns how many employees were moved to the trash.
    pub fn soft_delete_employees(&mut self, ids: &[String]) -> Result<usize, AppError> {
        self.require_owner("delete employees")?;
        let moved = self.employees.move_to_trash(ids, Utc::now())?;
        if moved.is_empty() {
            debug!("No employees matched {:?}", ids);
            return Ok(0);
        }

        self.log(
            "Delete employees",
            ActivityCategory::Trash,
            format!("Moved {} employee(s) to the trash", moved.len()),
        );
        info!("{} employee(s) moved to trash", moved.len());
        self.persist(&[
            StoreKey::Employees,
            StoreKey::EmployeeTrash,
            StoreKey::ActivityLog,
        ]);
        Ok(moved.len())
    }

    pub fn restore_employee(
        &mut self,
        id: &str,
        edits: Option<EmployeeUpdate>,
    ) -> Result<Option<Employee>, AppError> {
        self.require_owner("restore employees")?;
        if let Some(edits) = &edits {
            validate_payload(edits)?;
        }
        let restored = self.employees.restore(id, |employee| {
            if let Some(edits) = edits {
                edits.apply(employee);
            }
        })?;
        let Some(employee) = restored else {
            debug!("Restore of employee {} not in trash ignored", id);
            return Ok(None);
        };

        self.log(
            "Restore employee",
            ActivityCategory::Trash,
            format!("Restored employee {} from the trash", employee.full_name_quad),
        );
        info!("Employee {} restored", id);
        self.persist(&[
            StoreKey::Employees,
            StoreKey::EmployeeTrash,
            StoreKey::ActivityLog,
        ]);
        Ok(Some(employee))
    }

    pub fn permanently_delete_employee(&mut self, id: &str) -> Result<bool, AppError> {
        self.require_owner("purge employees")?;
        if !self.employees.purge(id) {
            return Ok(false);
        }
        self.log(
            "Purge employee",
            ActivityCategory::Trash,
            format!("Employee {} permanently deleted", id),
        );
        info!("Employee {} purged", id);
        self.persist(&[StoreKey::EmployeeTrash, StoreKey::ActivityLog]);
        Ok(true)
    }

    // ----- transactions -----

    pub fn add_transaction(&mut self, new_transaction: NewTransaction) -> Result<Transaction, AppError> {
        self.require_owner("add transactions")?;
        validate_payload(&new_transaction)?;

        let transaction = new_transaction.into_transaction(self.fresh_transaction_id());
        self.transactions.live_mut().upsert(transaction.clone());
        let direction = match transaction.kind {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        };
        self.log(
            "Add transaction",
            ActivityCategory::Financial,
            format!(
                "{} ({} of {})",
                transaction.description, direction, transaction.amount
            ),
        );
        info!("Transaction {} added", transaction.id);
        self.persist(&[StoreKey::Transactions, StoreKey::ActivityLog]);
        Ok(transaction)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<bool, AppError> {
        self.soft_delete_transactions(&[id.to_string()]).map(|moved| moved > 0)
    }

    pub fn soft_delete_transactions(&mut self, ids: &[String]) -> Result<usize, AppError> {
        self.require_owner("delete transactions")?;
        let moved = self.transactions.move_to_trash(ids, Utc::now())?;
        if moved.is_empty() {
            debug!("No transactions matched {:?}", ids);
            return Ok(0);
        }

        self.log(
            "Delete transactions",
            ActivityCategory::Trash,
            format!("Moved {} transaction(s) to the trash", moved.len()),
        );
        self.persist(&[
            StoreKey::Transactions,
            StoreKey::TransactionTrash,
            StoreKey::ActivityLog,
        ]);
        Ok(moved.len())
    }

    pub fn restore_transaction(
        &mut self,
        id: &str,
        edits: Option<TransactionUpdate>,
    ) -> Result<Option<Transaction>, AppError> {
        self.require_owner("restore transactions")?;
        if let Some(edits) = &edits {
            validate_payload(edits)?;
        }
        let restored = self.transactions.restore(id, |transaction| {
            if let Some(edits) = edits {
                edits.apply(transaction);
            }
        })?;
        let Some(transaction) = restored else {
            return Ok(None);
        };

        self.log(
            "Restore transaction",
            ActivityCategory::Trash,
            format!("Restored transaction {} from the trash", id),
        );
        self.persist(&[
            StoreKey::Transactions,
            StoreKey::TransactionTrash,
            StoreKey::ActivityLog,
        ]);
        Ok(Some(transaction))
    }

    pub fn permanently_delete_transaction(&mut self, id: &str) -> Result<bool, AppError> {
        self.require_owner("purge transactions")?;
        if !self.transactions.purge(id) {
            return Ok(false);
        }
        self.log(
            "Purge transaction",
            ActivityCategory::Trash,
            format!("Transaction {} permanently deleted", id),
        );
        self.persist(&[StoreKey::TransactionTrash, StoreKey::ActivityLog]);
        Ok(true)
    }

    // ----- reports -----

    /// Archives the summary of the selected period as printed. Any signed-in
    /// session may do this.
    pub fn save_report(&mut self, period: ReportPeriod) -> Result<GeneratedReport, AppError> {
        self.require_session()?;
        let report = GeneratedReport {
            id: self.next_report_id(),
            timestamp: wall_clock(),
            generated_by: self.profile.name.clone(),
            summary_snapshot: self.summary(period),
            report_type: period.label(),
        };
        self.reports.insert(0, report.clone());

        self.log(
            "Save report",
            ActivityCategory::Financial,
            format!("{} archived as {}", report.report_type, report.id),
        );
        self.persist(&[StoreKey::Reports, StoreKey::ActivityLog]);
        Ok(report)
    }

    // ----- backup -----

    /// Replaces each collection present in the backup. Nothing changes when
    /// the document does not parse, or when a backup record reuses the id of
    /// a trashed record.
    pub fn import_database(&mut self, raw: &str) -> Result<Vec<&'static str>, AppError> {
        self.require_owner("import backups")?;
        let payload = ImportPayload::parse(raw)?;
        let keys = payload.keys();

        let trashed_employee = payload.employees.as_ref().and_then(|employees| {
            self.employees
                .first_trashed(employees.iter().map(|employee| employee.id.as_str()))
        });
        let trashed_transaction = payload.transactions.as_ref().and_then(|transactions| {
            self.transactions
                .first_trashed(transactions.iter().map(|transaction| transaction.id.as_str()))
        });
        if let Some(id) = trashed_employee.or(trashed_transaction) {
            return Err(AppError::Conflict(format!(
                "Backup record {} is still in the trash; restore or purge it first",
                id
            )));
        }

        let mut touched = vec![StoreKey::ActivityLog];
        if let Some(employees) = payload.employees {
            self.employees.live_mut().replace_all(employees);
            touched.push(StoreKey::Employees);
        }
        if let Some(transactions) = payload.transactions {
            self.transactions.live_mut().replace_all(transactions);
            touched.push(StoreKey::Transactions);
        }
        if let Some(entries) = payload.activity_log {
            self.activity.replace_all(entries);
        }

        let replaced = if keys.is_empty() {
            "nothing".to_string()
        } else {
            keys.join(", ")
        };
        self.log(
            "Import database",
            ActivityCategory::System,
            format!("Backup imported, replaced {}", replaced),
        );
        info!("Backup imported ({})", replaced);
        self.persist(&touched);
        Ok(keys)
    }

    // ----- profile and preferences -----

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<CurrentUserProfile, AppError> {
        self.require_session()?;
        validate_payload(&update)?;
        if update.is_empty() {
            return Ok(self.profile.clone());
        }
        update.apply(&mut self.profile);
        self.log(
            "Update profile",
            ActivityCategory::System,
            "Personal profile details were edited.",
        );
        self.persist(&[StoreKey::CurrentProfile, StoreKey::ActivityLog]);
        Ok(self.profile.clone())
    }

    pub fn update_theme(&mut self, theme: ThemeUpdate) -> Result<CurrentUserProfile, AppError> {
        self.require_session()?;
        validate_payload(&theme)?;
        self.profile.theme_color = theme.theme_color;
        let details = format!("Brand color set to {}", self.profile.theme_color);
        self.log("Change theme", ActivityCategory::System, details);
        self.persist(&[StoreKey::CurrentProfile, StoreKey::ActivityLog]);
        Ok(self.profile.clone())
    }

    pub fn toggle_language(&mut self) -> Result<CurrentUserProfile, AppError> {
        self.require_session()?;
        self.profile.language = self.profile.language.toggled();
        let details = match self.profile.language {
            Language::Ar => "Interface language switched to Arabic",
            Language::En => "Interface language switched to English",
        };
        self.log("Change language", ActivityCategory::System, details);
        self.persist(&[StoreKey::CurrentProfile, StoreKey::ActivityLog]);
        Ok(self.profile.clone())
    }

    pub fn toggle_dark_mode(&mut self) -> Result<CurrentUserProfile, AppError> {
        self.require_session()?;
        self.profile.is_dark_mode = !self.profile.is_dark_mode;
        let details = if self.profile.is_dark_mode {
            "Switched to dark mode"
        } else {
            "Switched to light mode"
        };
        self.log("Change appearance", ActivityCategory::System, details);
        self.persist(&[StoreKey::CurrentProfile, StoreKey::ActivityLog]);
        Ok(self.profile.clone())
    }

    // ----- internals -----

    fn require_session(&self) -> Result<(), AppError> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AppError::Unauthorized("Sign in first".to_string()))
        }
    }

    fn require_owner(&self, action: &str) -> Result<(), AppError> {
        if self.is_owner() {
            return Ok(());
        }
        debug!("{} ({}) may not {}", self.profile.name, self.profile.role, action);
        Err(AppError::PermissionDenied(format!("Only the owner may {}", action)))
    }

    fn log(&mut self, action: &str, category: ActivityCategory, details: impl Into<String>) {
        self.activity.record(&self.profile.name, action, category, details);
    }

    fn fresh_transaction_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (0..9)
                .map(|_| {
                    TRANSACTION_ID_ALPHABET[rng.gen_range(0..TRANSACTION_ID_ALPHABET.len())] as char
                })
                .collect();
            if !self.transactions.id_in_use(&id) {
                return id;
            }
        }
    }

    fn next_report_id(&self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        let newest = self
            .reports
            .first()
            .and_then(|report| report.id.strip_prefix(REPORT_ID_PREFIX))
            .and_then(|n| n.parse::<i64>().ok());
        if let Some(newest) = newest {
            if millis <= newest {
                millis = newest + 1;
            }
        }
        format!("{}{}", REPORT_ID_PREFIX, millis)
    }

    fn snapshot(&self, key: StoreKey) -> Result<String, serde_json::Error> {
        match key {
            StoreKey::Employees => serde_json::to_string(self.employees.live().list()),
            StoreKey::Transactions => serde_json::to_string(self.transactions.live().list()),
            StoreKey::EmployeeTrash => serde_json::to_string(self.employees.trash().list()),
            StoreKey::TransactionTrash => serde_json::to_string(self.transactions.trash().list()),
            StoreKey::Reports => serde_json::to_string(&self.reports),
            StoreKey::ActivityLog => serde_json::to_string(self.activity.entries()),
            StoreKey::CurrentProfile => serde_json::to_string(&self.profile),
            StoreKey::AuthenticatedFlag => serde_json::to_string(&self.authenticated),
        }
    }

    fn persist(&mut self, keys: &[StoreKey]) {
        let mut failure = None;
        for &key in keys {
            let result = self
                .snapshot(key)
                .map_err(|err| AppError::PersistenceFailure(err.to_string()))
                .and_then(|snapshot| self.store.write(key, &snapshot));
            if let Err(err) = result {
                error!("Failed to persist {}: {}", key.as_str(), err);
                failure = Some(err.to_string());
            }
        }
        match failure {
            Some(message) => {
                if self.persistence_error.is_none() {
                    warn!("Continuing in memory-only mode until the next successful write");
                }
                self.persistence_error = Some(message);
            }
            None => {
                if self.persistence_error.take().is_some() {
                    info!("Storage writes recovered");
                }
            }
        }
    }
}

fn decode<T, F>(key: StoreKey, raw: Option<String>, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match raw {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("Discarding unreadable {} snapshot: {}", key.as_str(), err);
            fallback()
        }),
        None => fallback(),
    }
}
