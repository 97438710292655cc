use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::string_choices;

string_choices! {
    AuditAction, "audit action" {
        Create => "create",
        Update => "update",
        Delete => "delete",
    }
}

/// Append-only record of one inventory mutation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct AuditLog {
    pub id: String,
    pub user_id: Option<String>,
    #[sqlx(try_from = "String")]
    pub action: AuditAction,
    pub model_name: String,
    pub object_id: String,
    pub changes: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditLog {
    pub fn new(user_id: &str, action: AuditAction, model_name: &str, object_id: &str, changes: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: Some(user_id.to_string()),
            action,
            model_name: model_name.to_string(),
            object_id: object_id.to_string(),
            changes,
            timestamp: Utc::now(),
        }
    }
}
