pub mod api;
pub mod bootcamp;
pub mod course;
pub mod review;
pub mod user;
