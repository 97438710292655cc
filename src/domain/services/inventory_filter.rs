use std::collections::HashMap;
use chrono::NaiveDate;

use crate::domain::models::{
    chemical::{Chemical, Hazard},
    equipment::{Equipment, EquipmentCondition},
};
use crate::error::AppError;

/// Quantity at or below which a chemical counts as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Alert flags for chemical listings. Every set flag must hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChemicalFilter {
    pub expired: bool,
    pub low_stock: bool,
    pub danger: Option<Hazard>,
}

impl ChemicalFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let danger = params
            .get("danger")
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<Hazard>())
            .transpose()
            .map_err(|e| AppError::Validation(format!("danger: {}", e)))?;

        Ok(Self {
            expired: parse_flag(params, "expired")?,
            low_stock: parse_flag(params, "low_stock")?,
            danger,
        })
    }

    /// `today` is the server's date at filter time; expiry is strict, so a
    /// chemical expiring today is not yet expired.
    pub fn matches(&self, chemical: &Chemical, today: NaiveDate, low_stock_threshold: i32) -> bool {
        (!self.expired || chemical.expiry_date < today)
            && (!self.low_stock || chemical.quantity <= low_stock_threshold)
            && self.danger.is_none_or(|level| chemical.danger_classification == level)
    }

    pub fn apply(&self, chemicals: Vec<Chemical>, today: NaiveDate, low_stock_threshold: i32) -> Vec<Chemical> {
        chemicals
            .into_iter()
            .filter(|c| self.matches(c, today, low_stock_threshold))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EquipmentFilter {
    pub condition: Option<EquipmentCondition>,
    pub needs_attention: bool,
}

impl EquipmentFilter {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let condition = params
            .get("condition")
            .filter(|v| !v.is_empty())
            .map(|v| v.parse::<EquipmentCondition>())
            .transpose()
            .map_err(|e| AppError::Validation(format!("condition: {}", e)))?;

        Ok(Self {
            condition,
            needs_attention: parse_flag(params, "needs_attention")?,
        })
    }

    pub fn matches(&self, equipment: &Equipment) -> bool {
        self.condition.is_none_or(|c| equipment.condition == c)
            && (!self.needs_attention || equipment.condition.needs_attention())
    }

    pub fn apply(&self, equipment: Vec<Equipment>) -> Vec<Equipment> {
        equipment.into_iter().filter(|e| self.matches(e)).collect()
    }
}

fn parse_flag(params: &HashMap<String, String>, name: &str) -> Result<bool, AppError> {
    match params.get(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            _ => Err(AppError::Validation(format!("{}: expected a boolean, got '{}'", name, v))),
        },
    }
}
