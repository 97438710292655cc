pub mod auth;
pub mod chatbot;
pub mod chemical;
pub mod equipment;
pub mod health;
pub mod user;
pub mod verification;
