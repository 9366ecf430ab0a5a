// src/profile/mod.rs
//! Canonical profile model, its sources (CV upload, LinkedIn) and the
//! reductions used as language-model context.

pub mod cv;
pub mod cv_parser;
pub mod document;
pub mod linkedin;
pub mod merge;
pub mod source;
pub mod summary;
pub mod types;

pub use cv::CvRecord;
pub use cv_parser::{parse_cv_document, parse_cv_text};
pub use document::{TextExtractor, UploadedDocument};
pub use linkedin::LinkedInRecord;
pub use merge::merge_profiles;
pub use source::{fetch_linkedin_profile, EnrichLayerClient, ProfileSource};
pub use summary::{summarize_profile, ProfileSummary};
pub use types::Profile;
