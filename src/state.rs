use std::sync::Arc;
use crate::domain::ports::{
    AuditRepository, CaptchaVerifier, LlmService, UserRepository,
};
use crate::domain::services::{
    auth_service::AuthService, inventory_service::InventoryService,
    verification_service::VerificationService,
};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub audit_repo: Arc<dyn AuditRepository>,
    pub auth_service: Arc<AuthService>,
    pub inventory: Arc<InventoryService>,
    pub verification: Arc<VerificationService>,
    pub llm_service: Arc<dyn LlmService>,
    pub captcha: Arc<dyn CaptchaVerifier>,
}
