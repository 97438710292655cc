//! Builds audit entries for inventory mutations.
//!
//! Entries are handed to the repository together with the mutation so both
//! land in the same transaction; nothing here touches storage.

use crate::domain::models::{
    audit::{AuditAction, AuditLog},
    chemical::Chemical,
    equipment::Equipment,
    user::User,
};

/// An inventory record that can be described in the audit trail.
pub trait Audited {
    const MODEL_NAME: &'static str;

    fn object_id(&self) -> &str;
    fn label(&self) -> &str;
    /// Editable fields rendered for change descriptions.
    fn fields(&self) -> Vec<(&'static str, String)>;
}

pub fn created<T: Audited>(actor: &User, record: &T) -> AuditLog {
    AuditLog::new(
        &actor.id,
        AuditAction::Create,
        T::MODEL_NAME,
        record.object_id(),
        format!("Created {} \"{}\"", T::MODEL_NAME, record.label()),
    )
}

pub fn updated<T: Audited>(actor: &User, before: &T, after: &T) -> AuditLog {
    let changes: Vec<String> = before
        .fields()
        .into_iter()
        .zip(after.fields())
        .filter(|((_, old), (_, new))| old != new)
        .map(|((field, old), (_, new))| format!("{} {} -> {}", field, old, new))
        .collect();

    let summary = if changes.is_empty() {
        "no field changes".to_string()
    } else {
        changes.join(", ")
    };

    AuditLog::new(
        &actor.id,
        AuditAction::Update,
        T::MODEL_NAME,
        after.object_id(),
        format!("Updated {} \"{}\": {}", T::MODEL_NAME, after.label(), summary),
    )
}

pub fn deleted<T: Audited>(actor: &User, record: &T) -> AuditLog {
    AuditLog::new(
        &actor.id,
        AuditAction::Delete,
        T::MODEL_NAME,
        record.object_id(),
        format!("Deleted {} \"{}\"", T::MODEL_NAME, record.label()),
    )
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_else(|| "-".to_string())
}

impl Audited for Chemical {
    const MODEL_NAME: &'static str = "Chemical";

    fn object_id(&self) -> &str { &self.id }
    fn label(&self) -> &str { &self.name }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("form", self.form.to_string()),
            ("concentration", optional(&self.concentration)),
            ("volume", optional(&self.volume)),
            ("quantity", self.quantity.to_string()),
            ("storage_location", self.storage_location.clone()),
            ("expiry_date", self.expiry_date.to_string()),
            ("msds_file", optional(&self.msds_file)),
            ("danger_classification", self.danger_classification.to_string()),
        ]
    }
}

impl Audited for Equipment {
    const MODEL_NAME: &'static str = "Equipment";

    fn object_id(&self) -> &str { &self.id }
    fn label(&self) -> &str { &self.name }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("condition", self.condition.to_string()),
            ("quantity", self.quantity.to_string()),
            ("last_maintenance_date", optional(&self.last_maintenance_date)),
            ("notes", optional(&self.notes)),
        ]
    }
}
