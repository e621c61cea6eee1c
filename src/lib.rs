pub mod alert;
pub mod config;
pub mod notify;
pub mod routines;
pub mod scraping;
pub mod script;
