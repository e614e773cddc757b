pub mod company_dto;
pub mod like_dto;
pub mod match_dto;
