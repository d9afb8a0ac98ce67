pub mod ai_service;
pub mod grading_service;
pub mod ingestion_service;
pub mod quiz_service;
pub mod roadmap_service;
pub mod user_service;
