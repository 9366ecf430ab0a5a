// src/web/handlers/profile_handlers.rs
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use crate::error::AppError;
use crate::profile::{
    fetch_linkedin_profile, merge_profiles, parse_cv_document, summarize_profile, Profile,
    ProfileSummary, UploadedDocument,
};
use crate::web::types::*;
use crate::web::AppState;

pub async fn linkedin_profile_handler(
    request: Json<LinkedInProfileRequest>,
    state: &State<AppState>,
) -> ApiResult<Profile> {
    if request.linkedin_url.trim().is_empty() {
        return Err(api_error(AppError::input("LinkedIn URL is required")));
    }

    let profile = fetch_linkedin_profile(state.profile_source.as_ref(), &request.linkedin_url)
        .await
        .map_err(|e| {
            error!("LinkedIn profile fetch failed: {}", e);
            api_error(e.into())
        })?;

    info!(
        "Imported LinkedIn profile for {}",
        profile.personal_info.full_name
    );
    Ok(Json(DataResponse::success("LinkedIn profile imported", profile)))
}

async fn read_upload(form: &CvUploadForm<'_>) -> Result<UploadedDocument, AppError> {
    let file_name = form
        .file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .unwrap_or_else(|| "upload".to_string());
    let content_type = form.file.content_type().map(|ct| ct.to_string());

    let mut bytes = Vec::with_capacity(form.file.len() as usize);
    let reader = form
        .file
        .open()
        .await
        .map_err(|e| AppError::input(format!("Could not read uploaded file: {}", e)))?;
    tokio::pin!(reader);
    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| AppError::input(format!("Could not read uploaded file: {}", e)))?;

    Ok(UploadedDocument {
        file_name,
        content_type,
        bytes,
    })
}

pub async fn parse_cv_handler(
    upload: Form<CvUploadForm<'_>>,
    state: &State<AppState>,
) -> ApiResult<Profile> {
    let document = read_upload(&upload).await.map_err(api_error)?;

    let profile = parse_cv_document(
        state.search.llm(),
        state.extractor.as_deref(),
        &document,
    )
    .await
    .map_err(|e| {
        error!("CV parsing failed for {}: {}", document.file_name, e);
        api_error(e)
    })?;

    Ok(Json(DataResponse::success("CV parsed", profile)))
}

pub async fn merge_profiles_handler(request: Json<MergeProfilesRequest>) -> ApiResult<Profile> {
    let MergeProfilesRequest { primary, secondary } = request.into_inner();
    Ok(Json(DataResponse::success(
        "Profiles merged",
        merge_profiles(primary, secondary),
    )))
}

pub async fn profile_summary_handler(request: Json<SummaryRequest>) -> ApiResult<ProfileSummary> {
    Ok(Json(DataResponse::success(
        "Profile summarized",
        summarize_profile(&request.profile),
    )))
}
