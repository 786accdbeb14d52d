pub mod config_service;
pub mod mail_service;
