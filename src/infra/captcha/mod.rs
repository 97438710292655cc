pub mod recaptcha_service;
