// src/profile/cv_parser.rs
//! Language-model CV parsing: extracted document text in, canonical profile out.

use tracing::{error, info};

use super::cv::CvRecord;
use super::document::{extract_document_text, TextExtractor, UploadedDocument};
use super::types::Profile;
use crate::error::AppResult;
use crate::llm::LanguageModel;
use crate::query::{complete_json, GenerationError};
use crate::utils::truncate_chars;

const CV_TEXT_CHARS: usize = 15_000;
const CV_TEMPERATURE: f32 = 0.1;

const CV_SYSTEM_PROMPT: &str = "You are a precise CV parsing assistant. Output valid JSON only.";

const CV_SCHEMA: &str = r#"{
  "personalInfo": {
    "name": "string",
    "surname": "string",
    "headline": "string | null",
    "gender": "string | null",
    "currentLocation": "string | null",
    "birthDate": "string | null"
  },
  "careerSummary": "string | null",
  "contacts": {
    "email": "string | null",
    "phone": "string | null",
    "linkedin": "string | null",
    "website": "string | null",
    "other": ["string"]
  },
  "skills": ["string"],
  "licensesAndCertifications": [{
    "name": "string",
    "issuer": "string | null",
    "issueDate": "string | null",
    "expirationDate": "string | null",
    "credentialId": "string | null",
    "credentialUrl": "string | null"
  }],
  "workExperience": [{
    "title": "string",
    "company": "string",
    "location": "string | null",
    "startDate": "string | null",
    "endDate": "string | null",
    "description": "string | null",
    "skillsUsed": ["string"]
  }],
  "education": [{
    "institution": "string",
    "degree": "string | null",
    "fieldOfStudy": "string | null",
    "startDate": "string | null",
    "endDate": "string | null",
    "grade": "string | null",
    "description": "string | null"
  }],
  "languages": [{
    "language": "string",
    "proficiency": "string | null"
  }]
}"#;

fn build_prompt(text: &str) -> String {
    format!(
        "Extract the following information from the CV text below and return it as a JSON \
         object with this structure:\n{schema}\n\n\
         Instructions:\n\
         1. Take name and surname from the top of the resume.\n\
         2. Extract contact details carefully.\n\
         3. Write dates as \"YYYY-MM\" when possible, otherwise \"YYYY\".\n\
         4. Use null for anything that is not present.\n\
         5. Only extract information that appears in the text.\n\n\
         CV Text:\n{text}",
        schema = CV_SCHEMA,
        text = truncate_chars(text, CV_TEXT_CHARS),
    )
}

/// Turn CV text into a structured record.
pub async fn parse_cv_text(
    llm: &dyn LanguageModel,
    text: &str,
) -> Result<CvRecord, GenerationError> {
    let output = complete_json(llm, CV_SYSTEM_PROMPT, &build_prompt(text), CV_TEMPERATURE).await?;

    serde_json::from_value(serde_json::Value::Object(output)).map_err(|e| {
        error!("CV record did not match the expected shape: {}", e);
        GenerationError::InvalidShape(e.to_string())
    })
}

/// Full upload path: validate, extract text, parse, convert.
pub async fn parse_cv_document(
    llm: &dyn LanguageModel,
    extractor: Option<&dyn TextExtractor>,
    document: &UploadedDocument,
) -> AppResult<Profile> {
    info!(
        "Processing CV upload: {} ({} bytes)",
        document.file_name,
        document.bytes.len()
    );
    let text = extract_document_text(document, extractor).await?;
    let record = parse_cv_text(llm, &text).await?;
    info!(
        "Parsed CV with {} skills and {} roles",
        record.skills.len(),
        record.work_experience.len()
    );
    Ok(record.into_profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::testing::ScriptedModel;
    use serde_json::json;

    fn text_upload(body: &str) -> UploadedDocument {
        UploadedDocument {
            file_name: "cv.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: body.as_bytes().to_vec(),
        }
    }

    #[tokio::test]
    async fn test_parse_cv_document() {
        let model = ScriptedModel::json(json!({
            "personalInfo": { "name": "Ada", "surname": "Lovelace", "headline": null },
            "skills": ["Mathematics", "Analysis"],
            "workExperience": [{ "title": "Analyst", "company": "Engine Co" }]
        }));

        let profile = parse_cv_document(&model, None, &text_upload("Ada Lovelace\nAnalyst"))
            .await
            .unwrap();
        assert!(profile.sources.cv);
        assert_eq!(profile.personal_info.full_name, "Ada Lovelace");
        assert_eq!(profile.skills, vec!["Mathematics", "Analysis"]);

        let request = model.last_request().unwrap();
        assert_eq!(request.temperature, CV_TEMPERATURE);
        assert!(request.user.contains("Ada Lovelace\nAnalyst"));
    }

    #[tokio::test]
    async fn test_long_text_truncated() {
        let model = ScriptedModel::json(json!({}));
        let long = "x".repeat(CV_TEXT_CHARS + 500);
        parse_cv_text(&model, &long).await.unwrap();

        let user = model.last_request().unwrap().user;
        assert!(user.ends_with(&"x".repeat(CV_TEXT_CHARS)));
        assert!(!user.contains(&"x".repeat(CV_TEXT_CHARS + 1)));
    }

    #[tokio::test]
    async fn test_blank_upload_is_input_error() {
        let model = ScriptedModel::json(json!({}));
        let err = parse_cv_document(&model, None, &text_upload("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Input(_)));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_model_output_error() {
        let model = ScriptedModel::json(json!({ "skills": "not a list" }));
        let err = parse_cv_text(&model, "text").await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidShape(_)));
    }
}
