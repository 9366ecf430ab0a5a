// src/profile/summary.rs
use serde::{Deserialize, Serialize};

use super::types::Profile;
use crate::utils::{non_blank, truncate_chars};

const MAX_SKILLS: usize = 20;
const MAX_WORK: usize = 5;
const MAX_EDUCATION: usize = 3;
const MAX_CERTIFICATIONS: usize = 5;
const WORK_DESCRIPTION_CHARS: usize = 300;
const SUMMARY_CHARS: usize = 500;

/// Token-bounded view of a profile, built fresh for every search request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSummary {
    pub skills: Vec<String>,
    pub work_experience: Vec<WorkSummary>,
    pub education: Vec<EducationSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkSummary {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationSummary {
    pub institution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
}

pub fn summarize_profile(profile: &Profile) -> ProfileSummary {
    ProfileSummary {
        skills: profile.skills.iter().take(MAX_SKILLS).cloned().collect(),
        work_experience: profile
            .work_experience
            .iter()
            .take(MAX_WORK)
            .map(|exp| WorkSummary {
                title: exp.title.clone(),
                company: exp.company.clone(),
                description: exp
                    .description
                    .as_deref()
                    .map(|d| truncate_chars(d, WORK_DESCRIPTION_CHARS)),
            })
            .collect(),
        education: profile
            .education
            .iter()
            .take(MAX_EDUCATION)
            .map(|edu| EducationSummary {
                institution: edu.institution.clone(),
                degree: edu.degree.clone(),
                field_of_study: edu.field_of_study.clone(),
            })
            .collect(),
        headline: non_blank(profile.personal_info.headline.clone()),
        summary: non_blank(profile.personal_info.summary.clone())
            .map(|s| truncate_chars(&s, SUMMARY_CHARS)),
        location: profile.location.as_ref().and_then(|l| l.display()),
        languages: profile
            .languages
            .iter()
            .map(|l| l.language.clone())
            .collect(),
        certifications: profile
            .certifications
            .iter()
            .take(MAX_CERTIFICATIONS)
            .map(|c| c.name.clone())
            .collect(),
        industry: profile
            .linkedin_data
            .as_ref()
            .and_then(|d| non_blank(d.industry.clone())),
    }
}

impl ProfileSummary {
    pub fn is_empty(&self) -> bool {
        self == &ProfileSummary::default()
    }

    /// Labelled lines used as language-model context.
    pub fn render_text(&self) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(headline) = &self.headline {
            parts.push(format!("Current Role: {}", headline));
        }
        if let Some(summary) = &self.summary {
            parts.push(format!("Summary: {}", truncate_chars(summary, SUMMARY_CHARS)));
        }
        if !self.skills.is_empty() {
            let skills: Vec<&str> = self.skills.iter().take(15).map(String::as_str).collect();
            parts.push(format!("Skills: {}", skills.join(", ")));
        }
        if !self.work_experience.is_empty() {
            let jobs = self
                .work_experience
                .iter()
                .take(3)
                .map(|j| format!("{} at {}", j.title, j.company))
                .collect::<Vec<_>>()
                .join("; ");
            parts.push(format!("Recent Experience: {}", jobs));
        }
        if let Some(edu) = self.education.first() {
            let line = format!(
                "Education: {} {} from {}",
                edu.degree.as_deref().unwrap_or_default(),
                edu.field_of_study.as_deref().unwrap_or_default(),
                edu.institution
            );
            parts.push(line.split_whitespace().collect::<Vec<_>>().join(" "));
        }
        if let Some(location) = &self.location {
            parts.push(format!("Location: {}", location));
        }
        if let Some(industry) = &self.industry {
            parts.push(format!("Industry: {}", industry));
        }
        if !self.certifications.is_empty() {
            parts.push(format!("Certifications: {}", self.certifications.join(", ")));
        }
        if !self.languages.is_empty() {
            parts.push(format!("Languages: {}", self.languages.join(", ")));
        }

        (!parts.is_empty()).then(|| parts.join("\n"))
    }

    /// Free-text terms drawn from the profile for keyword augmentation:
    /// titles, companies, certifications, degrees, fields, industry.
    pub fn keyword_sources(&self) -> Vec<String> {
        let mut sources = Vec::new();
        sources.extend(self.work_experience.iter().map(|w| w.title.clone()));
        sources.extend(self.work_experience.iter().map(|w| w.company.clone()));
        sources.extend(self.certifications.iter().cloned());
        for edu in &self.education {
            sources.extend(edu.degree.iter().cloned());
            sources.extend(edu.field_of_study.iter().cloned());
        }
        sources.extend(self.industry.iter().cloned());
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::{
        Certification, Education, LinkedInExtension, Location, PersonalInfo, WorkExperience,
    };

    fn big_profile() -> Profile {
        Profile {
            personal_info: PersonalInfo {
                headline: Some("Data Engineer".into()),
                summary: Some("s".repeat(900)),
                ..PersonalInfo::default()
            },
            location: Some(Location {
                city: Some("Lyon".into()),
                country: Some("France".into()),
                ..Location::default()
            }),
            skills: (0..30).map(|i| format!("skill{}", i)).collect(),
            work_experience: (0..8)
                .map(|i| WorkExperience {
                    title: format!("Role {}", i),
                    company: format!("Company {}", i),
                    description: Some("d".repeat(400)),
                    ..WorkExperience::default()
                })
                .collect(),
            education: (0..4)
                .map(|i| Education {
                    institution: format!("School {}", i),
                    degree: Some("BSc".into()),
                    field_of_study: Some("Physics".into()),
                    ..Education::default()
                })
                .collect(),
            certifications: (0..7)
                .map(|i| Certification { name: format!("Cert {}", i), ..Certification::default() })
                .collect(),
            linkedin_data: Some(LinkedInExtension {
                industry: Some("Energy".into()),
                ..LinkedInExtension::default()
            }),
            ..Profile::default()
        }
    }

    #[test]
    fn test_summary_bounds() {
        let summary = summarize_profile(&big_profile());
        assert_eq!(summary.skills.len(), 20);
        assert_eq!(summary.work_experience.len(), 5);
        assert_eq!(summary.education.len(), 3);
        assert_eq!(summary.certifications.len(), 5);
        assert_eq!(summary.summary.as_ref().map(|s| s.chars().count()), Some(500));
        assert_eq!(
            summary.work_experience[0].description.as_ref().map(|d| d.len()),
            Some(300)
        );
        assert_eq!(summary.location.as_deref(), Some("Lyon, France"));
        assert_eq!(summary.industry.as_deref(), Some("Energy"));
    }

    #[test]
    fn test_render_text() {
        let text = summarize_profile(&big_profile()).render_text().unwrap();
        assert!(text.starts_with("Current Role: Data Engineer"));
        assert!(text.contains("Recent Experience: Role 0 at Company 0; Role 1 at Company 1; Role 2 at Company 2\n"));
        assert!(text.contains("Education: BSc Physics from School 0"));
        assert!(text.contains("Skills: skill0,"));
        assert!(!text.contains("skill15"));
    }

    #[test]
    fn test_empty_profile_renders_nothing() {
        let summary = summarize_profile(&Profile::default());
        assert!(summary.is_empty());
        assert_eq!(summary.render_text(), None);
    }

    #[test]
    fn test_keyword_sources_order() {
        let sources = summarize_profile(&big_profile()).keyword_sources();
        assert_eq!(sources[0], "Role 0");
        assert_eq!(sources[5], "Company 0");
        assert_eq!(sources.last().map(String::as_str), Some("Energy"));
    }
}
