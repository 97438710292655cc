pub mod audit_recorder;
pub mod auth_service;
pub mod inventory_filter;
pub mod inventory_service;
pub mod permissions;
pub mod verification_service;
