// src/web/types.rs
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::platform::Platform;
use crate::profile::Profile;
use crate::query::PlatformQuery;
use crate::results::DisplayRecord;

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message: message.into(),
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

impl From<&AppError> for StandardErrorResponse {
    fn from(err: &AppError) -> Self {
        Self::new(
            err.to_string(),
            err.error_code().to_string(),
            err.suggestions(),
        )
    }
}

/// Error body with the matching HTTP status.
pub type ApiError = status::Custom<Json<StandardErrorResponse>>;
pub type ApiResult<T> = Result<Json<DataResponse<T>>, ApiError>;

pub fn api_error(err: AppError) -> ApiError {
    let code = Status::from_code(err.http_status()).unwrap_or(Status::InternalServerError);
    status::Custom(code, Json(StandardErrorResponse::from(&err)))
}

pub fn parse_platform(raw: &str) -> Result<Platform, ApiError> {
    raw.parse::<Platform>().map_err(|e| api_error(AppError::input(e)))
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub user_profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct AggregatedSearchBody {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub user_profile: Option<Profile>,
    #[serde(default)]
    pub sources: Option<Vec<Platform>>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct JobSearchData {
    pub results: Vec<DisplayRecord>,
    pub total_results: usize,
    pub search_query: PlatformQuery,
    pub attempts: usize,
    pub removed_fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct LinkedInProfileRequest {
    #[serde(default)]
    pub linkedin_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct MergeProfilesRequest {
    pub primary: Profile,
    pub secondary: Profile,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SummaryRequest {
    pub profile: Profile,
}

#[derive(FromForm)]
pub struct CvUploadForm<'f> {
    pub file: TempFile<'f>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthData {
    pub status: &'static str,
    pub version: &'static str,
}
