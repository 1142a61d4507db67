pub mod calendar;
pub mod dashboard;
pub mod days;
pub mod diary;
pub mod events;
pub mod health;
pub mod moods;
