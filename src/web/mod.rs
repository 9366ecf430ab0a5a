// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

pub use crate::core::AppState;

use crate::core::ConfigManager;
use crate::orchestrator::{AggregatedResults, ResultBoard};
use crate::profile::{Profile, ProfileSummary};
use crate::query::PlatformQuery;
use crate::sources::SourceSelection;
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/create-search-query/<platform>", data = "<request>")]
pub async fn create_search_query(
    platform: &str,
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> ApiResult<PlatformQuery> {
    handlers::create_search_query_handler(platform, request, state).await
}

#[post("/job-search/<platform>", data = "<request>")]
pub async fn job_search(
    platform: &str,
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> ApiResult<JobSearchData> {
    handlers::job_search_handler(platform, request, state).await
}

#[post("/select-sources", data = "<request>")]
pub async fn select_sources(
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> ApiResult<SourceSelection> {
    handlers::select_sources_handler(request, state).await
}

#[post("/search", data = "<request>")]
pub async fn search(
    request: Json<AggregatedSearchBody>,
    state: &State<AppState>,
) -> ApiResult<AggregatedResults> {
    handlers::aggregated_search_handler(request, state).await
}

#[get("/results")]
pub async fn results(state: &State<AppState>) -> Json<DataResponse<ResultBoard>> {
    handlers::results_handler(state).await
}

#[post("/linkedin-profile", data = "<request>")]
pub async fn linkedin_profile(
    request: Json<LinkedInProfileRequest>,
    state: &State<AppState>,
) -> ApiResult<Profile> {
    handlers::linkedin_profile_handler(request, state).await
}

#[post("/parse-cv", data = "<upload>")]
pub async fn parse_cv(upload: Form<CvUploadForm<'_>>, state: &State<AppState>) -> ApiResult<Profile> {
    handlers::parse_cv_handler(upload, state).await
}

#[post("/profile/merge", data = "<request>")]
pub async fn merge_profiles(request: Json<MergeProfilesRequest>) -> ApiResult<Profile> {
    handlers::merge_profiles_handler(request).await
}

#[post("/profile/summary", data = "<request>")]
pub async fn profile_summary(request: Json<SummaryRequest>) -> ApiResult<ProfileSummary> {
    handlers::profile_summary_handler(request).await
}

#[get("/health")]
pub async fn health() -> Json<DataResponse<HealthData>> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Endpoint not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "INVALID_INPUT".to_string(),
        vec!["Verify field names and types".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Rocket instance with every route mounted under `/api`.
pub fn build_rocket(state: AppState, port: u16) -> Rocket<Build> {
    let limits = Limits::default()
        .limit("json", 2.mebibytes())
        .limit("file", 11.mebibytes())
        .limit("data-form", 11.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                create_search_query,
                job_search,
                select_sources,
                search,
                results,
                linkedin_profile,
                parse_cv,
                merge_profiles,
                profile_summary,
                health,
                options,
            ],
        )
}

pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    let state = AppState::from_config(&config)?;

    info!("Starting jobscout API server");
    info!("Environment: {}", config.environment);
    info!("Server: http://0.0.0.0:{}", config.server.port);

    let _rocket = build_rocket(state, config.server.port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;
    Ok(())
}
