use crate::error::ServerError;
use crate::store::core::RedisStore;
use crate::store::domains::bootcamp_store::BootcampStore;
use crate::store::domains::course_store::CourseStore;
use crate::store::domains::review_store::ReviewStore;
use crate::store::domains::session_store::SessionStore;
use crate::store::domains::user_store::UserStore;
use std::sync::Arc;

pub struct StoreContext {
    pub bootcamp_store: Arc<BootcampStore>,
    pub course_store: Arc<CourseStore>,
    pub review_store: Arc<ReviewStore>,
    pub session_store: Arc<SessionStore>,
    pub user_store: Arc<UserStore>,
}

impl StoreContext {
    pub fn new(store: Arc<RedisStore>) -> Self {
        Self {
            bootcamp_store: Arc::new(BootcampStore::new(store.clone())),
            course_store: Arc::new(CourseStore::new(store.clone())),
            review_store: Arc::new(ReviewStore::new(store.clone())),
            session_store: Arc::new(SessionStore::new(store.clone())),
            user_store: Arc::new(UserStore::new(store.clone())),
        }
    }

    /// Recomputes the average course tuition and writes it back onto the
    /// bootcamp document. `None` once the last course is gone.
    pub fn refresh_average_cost(&self, bootcamp_id: &str) -> Result<(), ServerError> {
        let courses = self.course_store.get_courses_by_bootcamp(bootcamp_id)?;
        let average = if courses.is_empty() {
            None
        } else {
            let total: u64 = courses.iter().map(|c| u64::from(c.tuition)).sum();
            Some((total / courses.len() as u64) as u32)
        };
        self.bootcamp_store.set_average_cost(bootcamp_id, average)
    }

    /// Recomputes the average review rating (one decimal) and writes it back
    /// onto the bootcamp document.
    pub fn refresh_average_rating(&self, bootcamp_id: &str) -> Result<(), ServerError> {
        let reviews = self.review_store.get_reviews_by_bootcamp(bootcamp_id)?;
        let average = if reviews.is_empty() {
            None
        } else {
            let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
            Some((f64::from(total) / reviews.len() as f64 * 10.0).round() / 10.0)
        };
        self.bootcamp_store.set_average_rating(bootcamp_id, average)
    }
}
