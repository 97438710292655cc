pub mod sqlite_user_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_audit_repo;
pub mod sqlite_chemical_repo;
pub mod sqlite_equipment_repo;
pub mod sqlite_verification_repo;

pub mod postgres_user_repo;
pub mod postgres_auth_repo;
pub mod postgres_audit_repo;
pub mod postgres_chemical_repo;
pub mod postgres_equipment_repo;
pub mod postgres_verification_repo;
