use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::validate_theme_color;

pub const OWNER_ROLE: &str = "Owner";
pub const EMPLOYEE_ROLE: &str = "Employee";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub fn toggled(self) -> Self {
        match self {
            Language::Ar => Language::En,
            Language::En => Language::Ar,
        }
    }
}

/// Display identity of the active session. Not an employee record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserProfile {
    pub name: String,
    pub role: String,
    pub email: String,
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub is_dark_mode: bool,
}

fn default_theme_color() -> String {
    "79 70 229".to_string()
}

impl Default for CurrentUserProfile {
    fn default() -> Self {
        Self {
            name: "Ali Khadr".to_string(),
            role: "System Manager".to_string(),
            email: "ali.khadr@example.com".to_string(),
            avatar: None,
            phone: "+966 50 123 4567".to_string(),
            bio: "Finance and administration manager responsible for the workforce and cash flows."
                .to_string(),
            theme_color: default_theme_color(),
            language: Language::Ar,
            is_dark_mode: false,
        }
    }
}

impl CurrentUserProfile {
    pub fn is_owner(&self) -> bool {
        self.role == OWNER_ROLE || self.role == "المالك"
    }
}

/// Self-service profile edit. Role and email come from the identity
/// provider and cannot be changed here.
#[derive(Deserialize, Validate, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(url)]
    pub avatar: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.avatar.is_none() && self.phone.is_none() && self.bio.is_none()
    }

    pub fn apply(self, profile: &mut CurrentUserProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if self.avatar.is_some() {
            profile.avatar = self.avatar;
        }
        if let Some(phone) = self.phone {
            profile.phone = phone;
        }
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
    }
}

#[derive(Deserialize, Validate, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ThemeUpdate {
    #[validate(custom = "validate_theme_color")]
    pub theme_color: String,
}

/// Claims of an authenticated session as delivered by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl Identity {
    pub fn display_name(&self) -> String {
        if let Some(name) = self.full_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "User".to_string(),
        }
    }

    pub fn role_for(&self, owner_email: &str) -> &'static str {
        if self.email.eq_ignore_ascii_case(owner_email) {
            OWNER_ROLE
        } else {
            EMPLOYEE_ROLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        let identity = Identity {
            email: "sara.k@example.com".to_string(),
            full_name: Some("  ".to_string()),
            avatar_url: None,
        };
        assert_eq!(identity.display_name(), "sara.k");

        let anonymous = Identity {
            email: String::new(),
            full_name: None,
            avatar_url: None,
        };
        assert_eq!(anonymous.display_name(), "User");
    }

    #[test]
    fn owner_role_requires_allow_listed_email() {
        let identity = Identity {
            email: "Ali.Khadr@Example.com".to_string(),
            full_name: Some("Ali Khadr".to_string()),
            avatar_url: None,
        };
        assert_eq!(identity.role_for("ali.khadr@example.com"), OWNER_ROLE);
        assert_eq!(identity.role_for("someone@example.com"), EMPLOYEE_ROLE);
    }

    #[test]
    fn default_profile_is_not_owner() {
        assert!(!CurrentUserProfile::default().is_owner());
    }
}
