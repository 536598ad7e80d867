use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bootcamp {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Vec<String>,
    pub housing: bool,
    pub photo: Option<String>,
    pub average_cost: Option<u32>,
    pub average_rating: Option<f64>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootcampRequest {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootcampUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
}

impl Bootcamp {
    pub fn new(request: BootcampRequest, user_id: &str) -> Self {
        let slug = slugify(&request.name);
        Self {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            slug,
            description: request.description,
            website: request.website,
            email: request.email,
            address: request.address,
            careers: request.careers,
            housing: request.housing,
            photo: None,
            average_cost: None,
            average_rating: None,
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: BootcampUpdate) {
        if let Some(name) = update.name {
            self.slug = slugify(&name);
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if update.website.is_some() {
            self.website = update.website;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.address.is_some() {
            self.address = update.address;
        }
        if let Some(careers) = update.careers {
            self.careers = careers;
        }
        if let Some(housing) = update.housing {
            self.housing = housing;
        }
    }
}

/// URL-safe identifier derived from the bootcamp name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
