use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Response envelope for a single document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> From<ApiResponse<T>> for HttpResponse {
    fn from(response: ApiResponse<T>) -> Self {
        HttpResponse::Ok().json(response)
    }
}

/// Response envelope for listings, carrying the item count alongside the
/// data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> ApiListResponse<T> {
    pub fn ok(data: Vec<T>) -> Self {
        ApiListResponse {
            success: true,
            count: data.len(),
            data,
        }
    }
}

impl<T: Serialize> From<ApiListResponse<T>> for HttpResponse {
    fn from(response: ApiListResponse<T>) -> Self {
        HttpResponse::Ok().json(response)
    }
}
