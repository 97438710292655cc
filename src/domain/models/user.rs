use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::InvalidChoice;

/// Canonical lab roles.
///
/// Older data spelled the lab expert `assistant` and the administrator `other`;
/// both spellings are still accepted on input and map onto the canonical
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    #[serde(alias = "assistant")]
    LabExpert,
    Teacher,
    #[serde(alias = "other")]
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::LabExpert, Role::Teacher, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::LabExpert => "lab_expert",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }

    /// Teachers and lab experts maintain the inventory.
    pub fn is_lab_staff(&self) -> bool {
        matches!(self, Role::Teacher | Role::LabExpert)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "lab_expert" | "assistant" => Ok(Role::LabExpert),
            "teacher" => Ok(Role::Teacher),
            "admin" | "other" => Ok(Role::Admin),
            other => Err(InvalidChoice { kind: "role", value: other.to_string() }),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = InvalidChoice;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email: email.to_lowercase(),
            password_hash,
            role,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Public view of a user returned by the auth endpoints.
#[derive(Debug, Serialize, Clone)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_role_spellings_map_to_canonical_roles() {
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::LabExpert);
        assert_eq!("other".parse::<Role>().unwrap(), Role::Admin);

        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::LabExpert);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"lab_expert\"");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "janitor".parse::<Role>().unwrap_err();
        assert_eq!(err.value, "janitor");
        assert!(serde_json::from_str::<Role>("\"janitor\"").is_err());
    }

    #[test]
    fn test_canonical_names_round_trip_through_storage_text() {
        for role in Role::ALL {
            assert_eq!(Role::try_from(role.as_str().to_string()).unwrap(), role);
        }
    }

    #[test]
    fn test_only_teachers_and_lab_experts_are_lab_staff() {
        assert!(Role::Teacher.is_lab_staff());
        assert!(Role::LabExpert.is_lab_staff());
        assert!(!Role::Student.is_lab_staff());
        assert!(!Role::Admin.is_lab_staff());
    }

    #[test]
    fn test_new_user_is_active_with_normalized_email() {
        let user = User::new("amy".into(), "Amy@School.EDU".into(), "hash".into(), Role::Student);
        assert!(user.is_active);
        assert_eq!(user.email, "amy@school.edu");
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
