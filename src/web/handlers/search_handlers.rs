// src/web/handlers/search_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::orchestrator::{AggregatedResults, AggregatedSearchRequest, ResultBoard};
use crate::query::PlatformQuery;
use crate::sources::SourceSelection;
use crate::web::types::*;
use crate::web::AppState;

pub async fn create_search_query_handler(
    platform: &str,
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> ApiResult<PlatformQuery> {
    let platform = parse_platform(platform)?;
    let request = request.into_inner();

    match state
        .search
        .generate_query(platform, &request.query, request.user_profile.as_ref())
        .await
    {
        Ok(generated) => Ok(Json(DataResponse::success(
            format!("Generated {} search query", platform.display_name()),
            generated,
        ))),
        Err(e) => {
            error!("[{}] query generation failed: {}", platform, e);
            Err(api_error(e))
        }
    }
}

pub async fn job_search_handler(
    platform: &str,
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> ApiResult<JobSearchData> {
    let platform = parse_platform(platform)?;
    let request = request.into_inner();

    let found = state
        .search
        .search_platform(platform, &request.query, request.user_profile.as_ref())
        .await
        .map_err(|e| {
            error!("[{}] job search failed: {}", platform, e);
            api_error(e)
        })?;

    info!(
        "[{}] returning {} jobs for \"{}\"",
        platform, found.total_results, request.query
    );

    Ok(Json(DataResponse::success(
        format!("Found {} {} jobs", found.total_results, platform.display_name()),
        JobSearchData {
            results: found.results,
            total_results: found.total_results,
            search_query: found.search_query,
            attempts: found.attempts,
            removed_fields: found.removed_fields,
            degraded: found.degraded,
        },
    )))
}

pub async fn select_sources_handler(
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> ApiResult<SourceSelection> {
    let request = request.into_inner();
    let selection = state
        .search
        .select_sources(&request.query, request.user_profile.as_ref())
        .await
        .map_err(|e| {
            error!("Source selection failed: {}", e);
            api_error(e)
        })?;

    Ok(Json(DataResponse::success(selection.reasoning.clone(), selection)))
}

pub async fn aggregated_search_handler(
    request: Json<AggregatedSearchBody>,
    state: &State<AppState>,
) -> ApiResult<AggregatedResults> {
    let body = request.into_inner();
    let aggregated = state
        .search
        .search(AggregatedSearchRequest {
            query: body.query,
            profile: body.user_profile,
            sources: body.sources,
        })
        .await
        .map_err(api_error)?;

    Ok(Json(DataResponse::success(
        format!("Found {} jobs", aggregated.total_results),
        aggregated,
    )))
}

pub async fn results_handler(state: &State<AppState>) -> Json<DataResponse<ResultBoard>> {
    let board = state.search.board().await;
    Json(DataResponse::success(
        format!("Search #{} with {} results", board.generation, board.results.len()),
        board,
    ))
}
