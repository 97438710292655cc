use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use super::{check_text, string_choices, NAME_MAX_LEN};
use crate::error::AppError;

string_choices! {
    EquipmentCondition, "condition" {
        Working => "working",
        NeedsMaintenance => "needs_maintenance",
        Broken => "broken",
    }
}

impl EquipmentCondition {
    pub fn needs_attention(&self) -> bool {
        !matches!(self, EquipmentCondition::Working)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Equipment {
    pub id: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub condition: EquipmentCondition,
    pub quantity: i32,
    pub last_maintenance_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub added_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EquipmentInput {
    pub name: String,
    pub condition: EquipmentCondition,
    pub quantity: i32,
    pub last_maintenance_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    pub condition: Option<EquipmentCondition>,
    pub quantity: Option<i32>,
    pub last_maintenance_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Equipment {
    pub fn new(input: EquipmentInput, added_by: &str) -> Result<Self, AppError> {
        let equipment = Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            condition: input.condition,
            quantity: input.quantity,
            last_maintenance_date: input.last_maintenance_date,
            notes: input.notes,
            added_by: Some(added_by.to_string()),
            created_at: Utc::now(),
        };
        equipment.validate()?;
        Ok(equipment)
    }

    pub fn replace(&mut self, input: EquipmentInput) -> Result<(), AppError> {
        self.name = input.name;
        self.condition = input.condition;
        self.quantity = input.quantity;
        self.last_maintenance_date = input.last_maintenance_date;
        self.notes = input.notes;
        self.validate()
    }

    pub fn apply_patch(&mut self, patch: EquipmentPatch) -> Result<(), AppError> {
        if let Some(name) = patch.name { self.name = name; }
        if let Some(condition) = patch.condition { self.condition = condition; }
        if let Some(quantity) = patch.quantity { self.quantity = quantity; }
        if let Some(date) = patch.last_maintenance_date { self.last_maintenance_date = Some(date); }
        if let Some(notes) = patch.notes { self.notes = Some(notes); }
        self.validate()
    }

    fn validate(&self) -> Result<(), AppError> {
        check_text("name", &self.name, NAME_MAX_LEN)?;
        if self.quantity < 0 {
            return Err(AppError::Validation("quantity: must be a non-negative integer".into()));
        }
        Ok(())
    }
}
