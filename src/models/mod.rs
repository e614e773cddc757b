pub mod candidate;
pub mod chat;
pub mod company;
pub mod company_like;
pub mod job_post;
pub mod like;
pub mod matches;
pub mod user;
