use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use super::{check_text, string_choices, user::Role, LOCATION_MAX_LEN, NAME_MAX_LEN};
use crate::error::AppError;

string_choices! {
    /// Physical form of a stored chemical.
    ChemicalForm, "form" {
        Powder => "powder",
        Aqueous => "aqueous",
        Crystalline => "crystalline",
    }
}

string_choices! {
    /// Hazard tier of a chemical.
    Hazard, "danger classification" {
        Green => "green",
        Yellow => "yellow",
        Red => "red",
    }
}

impl Hazard {
    /// Roles the tier is meant for. Listing and retrieval do not enforce this.
    pub fn intended_viewers(&self) -> &'static [Role] {
        match self {
            Hazard::Green => &Role::ALL,
            Hazard::Yellow => &[Role::Teacher, Role::LabExpert],
            Hazard::Red => &[Role::Teacher],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Chemical {
    pub id: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub form: ChemicalForm,
    pub concentration: Option<String>,
    pub volume: Option<f64>,
    pub quantity: i32,
    pub storage_location: String,
    pub expiry_date: NaiveDate,
    pub msds_file: Option<String>,
    #[sqlx(try_from = "String")]
    pub danger_classification: Hazard,
    pub added_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full representation accepted by create (POST) and replace (PUT).
#[derive(Debug, Deserialize, Clone)]
pub struct ChemicalInput {
    pub name: String,
    pub form: ChemicalForm,
    pub concentration: Option<String>,
    pub volume: Option<f64>,
    pub quantity: i32,
    pub storage_location: String,
    pub expiry_date: NaiveDate,
    pub msds_file: Option<String>,
    pub danger_classification: Hazard,
}

/// Partial update (PATCH); absent fields are left untouched.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChemicalPatch {
    pub name: Option<String>,
    pub form: Option<ChemicalForm>,
    pub concentration: Option<String>,
    pub volume: Option<f64>,
    pub quantity: Option<i32>,
    pub storage_location: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub msds_file: Option<String>,
    pub danger_classification: Option<Hazard>,
}

impl Chemical {
    pub fn new(input: ChemicalInput, added_by: &str) -> Result<Self, AppError> {
        let chemical = Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            form: input.form,
            concentration: input.concentration,
            volume: input.volume,
            quantity: input.quantity,
            storage_location: input.storage_location,
            expiry_date: input.expiry_date,
            msds_file: input.msds_file,
            danger_classification: input.danger_classification,
            added_by: Some(added_by.to_string()),
            created_at: Utc::now(),
        };
        chemical.validate()?;
        Ok(chemical)
    }

    /// Replaces every editable field. `id`, `added_by` and `created_at` are kept.
    pub fn replace(&mut self, input: ChemicalInput) -> Result<(), AppError> {
        self.name = input.name;
        self.form = input.form;
        self.concentration = input.concentration;
        self.volume = input.volume;
        self.quantity = input.quantity;
        self.storage_location = input.storage_location;
        self.expiry_date = input.expiry_date;
        self.msds_file = input.msds_file;
        self.danger_classification = input.danger_classification;
        self.validate()
    }

    pub fn apply_patch(&mut self, patch: ChemicalPatch) -> Result<(), AppError> {
        if let Some(name) = patch.name { self.name = name; }
        if let Some(form) = patch.form { self.form = form; }
        if let Some(concentration) = patch.concentration { self.concentration = Some(concentration); }
        if let Some(volume) = patch.volume { self.volume = Some(volume); }
        if let Some(quantity) = patch.quantity { self.quantity = quantity; }
        if let Some(location) = patch.storage_location { self.storage_location = location; }
        if let Some(expiry) = patch.expiry_date { self.expiry_date = expiry; }
        if let Some(msds) = patch.msds_file { self.msds_file = Some(msds); }
        if let Some(danger) = patch.danger_classification { self.danger_classification = danger; }
        self.validate()
    }

    fn validate(&self) -> Result<(), AppError> {
        check_text("name", &self.name, NAME_MAX_LEN)?;
        check_text("storage_location", &self.storage_location, LOCATION_MAX_LEN)?;
        if self.quantity < 0 {
            return Err(AppError::Validation("quantity: must be a non-negative integer".into()));
        }
        if let Some(volume) = self.volume && volume < 0.0 {
            return Err(AppError::Validation("volume: must not be negative".into()));
        }
        Ok(())
    }
}
