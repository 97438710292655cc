pub mod ai;
pub mod captcha;
pub mod email;
pub mod factory;
pub mod repositories;
