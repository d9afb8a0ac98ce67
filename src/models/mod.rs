pub mod module;
pub mod progress;
pub mod question;
pub mod quiz_attempt;
pub mod roadmap_document;
pub mod user;
