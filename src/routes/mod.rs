pub mod auth;
pub mod docs;
pub mod health;
pub mod quiz;
pub mod roadmap;
pub mod settings;
