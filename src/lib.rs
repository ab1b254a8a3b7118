pub mod cli;
pub mod operator_i18n;
pub mod operator_log;
pub mod providers;
pub mod router;
pub mod settings;
pub mod wizard;
