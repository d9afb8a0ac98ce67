pub mod quiz_dto;
pub mod roadmap_dto;
pub mod user_dto;
