pub mod day;
pub mod diary;
pub mod event;
pub mod mood;
pub mod user;
