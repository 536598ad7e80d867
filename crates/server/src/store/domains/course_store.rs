use crate::error::ServerError;
use crate::store::core::RedisStore;
use redis::Commands;
use shared::models::course::Course;
use std::sync::Arc;

const COURSE_KEY_PREFIX: &str = "course:";

pub struct CourseStore {
    redis: Arc<RedisStore>,
}

impl CourseStore {
    pub fn new(redis: Arc<RedisStore>) -> Self {
        Self { redis }
    }

    fn key(id: &str) -> String {
        format!("{COURSE_KEY_PREFIX}{id}")
    }

    pub fn add_course(&self, course: &Course) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let json = serde_json::to_string(course)?;
        let _: () = con.set(Self::key(&course.id), json)?;
        Ok(())
    }

    pub fn get_course(&self, id: &str) -> Result<Option<Course>, ServerError> {
        let mut con = self.redis.connection()?;
        let raw: Option<String> = con.get(Self::key(id))?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn get_courses(&self) -> Result<Vec<Course>, ServerError> {
        let mut con = self.redis.connection()?;
        let keys: Vec<String> = con.keys(format!("{COURSE_KEY_PREFIX}*"))?;
        let mut courses: Vec<Course> = Vec::with_capacity(keys.len());
        for key in keys {
            let raw: Option<String> = con.get(&key)?;
            if let Some(raw) = raw {
                courses.push(serde_json::from_str(&raw)?);
            }
        }
        courses.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(courses)
    }

    pub fn get_courses_by_bootcamp(&self, bootcamp_id: &str) -> Result<Vec<Course>, ServerError> {
        Ok(self
            .get_courses()?
            .into_iter()
            .filter(|c| c.bootcamp_id == bootcamp_id)
            .collect())
    }

    pub fn update_course(&self, course: &Course) -> Result<(), ServerError> {
        self.add_course(course)
    }

    pub fn delete_course(&self, id: &str) -> Result<(), ServerError> {
        let mut con = self.redis.connection()?;
        let _: () = con.del(Self::key(id))?;
        Ok(())
    }

    pub fn delete_courses_by_bootcamp(&self, bootcamp_id: &str) -> Result<usize, ServerError> {
        let courses = self.get_courses_by_bootcamp(bootcamp_id)?;
        for course in &courses {
            self.delete_course(&course.id)?;
        }
        Ok(courses.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::helper::create_test_app_state;
    use shared::models::course::{Course, CourseRequest, MinimumSkill};

    fn course(bootcamp_id: &str, title: &str) -> Course {
        Course::new(
            CourseRequest {
                bootcamp_id: bootcamp_id.to_string(),
                title: title.to_string(),
                description: "desc".to_string(),
                weeks: 8,
                tuition: 8000,
                minimum_skill: MinimumSkill::Beginner,
                scholarship_available: false,
            },
            "owner-1",
        )
    }

    #[tokio::test]
    async fn test_courses_filtered_by_bootcamp() {
        let app_state = create_test_app_state().await;
        let store = &app_state.store_context.course_store;

        store.add_course(&course("b-1", "Front End")).unwrap();
        store.add_course(&course("b-1", "Back End")).unwrap();
        store.add_course(&course("b-2", "Data Science")).unwrap();

        assert_eq!(store.get_courses().unwrap().len(), 3);
        assert_eq!(store.get_courses_by_bootcamp("b-1").unwrap().len(), 2);
        assert_eq!(store.get_courses_by_bootcamp("b-3").unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_delete_courses_by_bootcamp() {
        let app_state = create_test_app_state().await;
        let store = &app_state.store_context.course_store;

        store.add_course(&course("b-1", "Front End")).unwrap();
        store.add_course(&course("b-1", "Back End")).unwrap();
        store.add_course(&course("b-2", "Data Science")).unwrap();

        let removed = store.delete_courses_by_bootcamp("b-1").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.get_courses().unwrap().len(), 1);
    }
}
