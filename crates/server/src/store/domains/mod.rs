pub mod bootcamp_store;
pub mod course_store;
pub mod review_store;
pub mod session_store;
pub mod user_store;
