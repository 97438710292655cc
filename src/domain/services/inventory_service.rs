use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::domain::{
    models::{
        chemical::{Chemical, ChemicalInput, ChemicalPatch},
        equipment::{Equipment, EquipmentInput, EquipmentPatch},
        user::User,
    },
    ports::{ChemicalRepository, EquipmentRepository},
    services::{
        audit_recorder,
        inventory_filter::{ChemicalFilter, EquipmentFilter},
        permissions::{authorize, Access},
    },
};
use crate::error::AppError;

/// Permission-checked, audited CRUD over chemicals and equipment.
///
/// Every call takes the caller identity explicitly. The order is always:
/// authenticate, authorize, validate, execute. Mutations persist their audit
/// entry in the same transaction; reads are never audited.
pub struct InventoryService {
    chemicals: Arc<dyn ChemicalRepository>,
    equipment: Arc<dyn EquipmentRepository>,
    low_stock_threshold: i32,
}

impl InventoryService {
    pub fn new(
        chemicals: Arc<dyn ChemicalRepository>,
        equipment: Arc<dyn EquipmentRepository>,
        low_stock_threshold: i32,
    ) -> Self {
        Self { chemicals, equipment, low_stock_threshold }
    }

    pub async fn list_chemicals(&self, identity: Option<&User>, filter: &ChemicalFilter) -> Result<Vec<Chemical>, AppError> {
        authorize(identity, Access::Read)?;
        let all = self.chemicals.list().await?;
        Ok(filter.apply(all, today(), self.low_stock_threshold))
    }

    pub async fn get_chemical(&self, identity: Option<&User>, id: &str) -> Result<Chemical, AppError> {
        authorize(identity, Access::Read)?;
        self.find_chemical(id).await
    }

    pub async fn create_chemical(&self, identity: Option<&User>, input: ChemicalInput) -> Result<Chemical, AppError> {
        let actor = authorize(identity, Access::Write)?;
        let chemical = Chemical::new(input, &actor.id)?;
        let audit = audit_recorder::created(actor, &chemical);

        let created = self.chemicals.create(&chemical, &audit).await?;
        info!(chemical_id = %created.id, user_id = %actor.id, "Chemical created");
        Ok(created)
    }

    pub async fn replace_chemical(&self, identity: Option<&User>, id: &str, input: ChemicalInput) -> Result<Chemical, AppError> {
        let actor = authorize(identity, Access::Write)?;
        let before = self.find_chemical(id).await?;
        let mut after = before.clone();
        after.replace(input)?;
        self.save_chemical(actor, &before, &after).await
    }

    pub async fn patch_chemical(&self, identity: Option<&User>, id: &str, patch: ChemicalPatch) -> Result<Chemical, AppError> {
        let actor = authorize(identity, Access::Write)?;
        let before = self.find_chemical(id).await?;
        let mut after = before.clone();
        after.apply_patch(patch)?;
        self.save_chemical(actor, &before, &after).await
    }

    pub async fn delete_chemical(&self, identity: Option<&User>, id: &str) -> Result<(), AppError> {
        let actor = authorize(identity, Access::Write)?;
        let chemical = self.find_chemical(id).await?;
        let audit = audit_recorder::deleted(actor, &chemical);

        self.chemicals.delete(&chemical.id, &audit).await?;
        info!(chemical_id = %chemical.id, user_id = %actor.id, "Chemical deleted");
        Ok(())
    }

    pub async fn list_equipment(&self, identity: Option<&User>, filter: &EquipmentFilter) -> Result<Vec<Equipment>, AppError> {
        authorize(identity, Access::Read)?;
        let all = self.equipment.list().await?;
        Ok(filter.apply(all))
    }

    pub async fn get_equipment(&self, identity: Option<&User>, id: &str) -> Result<Equipment, AppError> {
        authorize(identity, Access::Read)?;
        self.find_equipment(id).await
    }

    pub async fn create_equipment(&self, identity: Option<&User>, input: EquipmentInput) -> Result<Equipment, AppError> {
        let actor = authorize(identity, Access::Write)?;
        let equipment = Equipment::new(input, &actor.id)?;
        let audit = audit_recorder::created(actor, &equipment);

        let created = self.equipment.create(&equipment, &audit).await?;
        info!(equipment_id = %created.id, user_id = %actor.id, "Equipment created");
        Ok(created)
    }

    pub async fn replace_equipment(&self, identity: Option<&User>, id: &str, input: EquipmentInput) -> Result<Equipment, AppError> {
        let actor = authorize(identity, Access::Write)?;
        let before = self.find_equipment(id).await?;
        let mut after = before.clone();
        after.replace(input)?;
        self.save_equipment(actor, &before, &after).await
    }

    pub async fn patch_equipment(&self, identity: Option<&User>, id: &str, patch: EquipmentPatch) -> Result<Equipment, AppError> {
        let actor = authorize(identity, Access::Write)?;
        let before = self.find_equipment(id).await?;
        let mut after = before.clone();
        after.apply_patch(patch)?;
        self.save_equipment(actor, &before, &after).await
    }

    pub async fn delete_equipment(&self, identity: Option<&User>, id: &str) -> Result<(), AppError> {
        let actor = authorize(identity, Access::Write)?;
        let equipment = self.find_equipment(id).await?;
        let audit = audit_recorder::deleted(actor, &equipment);

        self.equipment.delete(&equipment.id, &audit).await?;
        info!(equipment_id = %equipment.id, user_id = %actor.id, "Equipment deleted");
        Ok(())
    }

    async fn find_chemical(&self, id: &str) -> Result<Chemical, AppError> {
        self.chemicals.find_by_id(id).await?
            .ok_or(AppError::NotFound("Chemical not found".into()))
    }

    async fn save_chemical(&self, actor: &User, before: &Chemical, after: &Chemical) -> Result<Chemical, AppError> {
        let audit = audit_recorder::updated(actor, before, after);
        let updated = self.chemicals.update(after, &audit).await?;
        info!(chemical_id = %updated.id, user_id = %actor.id, "Chemical updated");
        Ok(updated)
    }

    async fn find_equipment(&self, id: &str) -> Result<Equipment, AppError> {
        self.equipment.find_by_id(id).await?
            .ok_or(AppError::NotFound("Equipment not found".into()))
    }

    async fn save_equipment(&self, actor: &User, before: &Equipment, after: &Equipment) -> Result<Equipment, AppError> {
        let audit = audit_recorder::updated(actor, before, after);
        let updated = self.equipment.update(after, &audit).await?;
        info!(equipment_id = %updated.id, user_id = %actor.id, "Equipment updated");
        Ok(updated)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
