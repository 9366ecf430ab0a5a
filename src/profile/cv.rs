// src/profile/cv.rs
//! Structured CV record as produced by the CV parser, and its conversion
//! into the canonical profile.

use serde::{Deserialize, Serialize};

use super::types::{
    Certification, Contacts, Education, Language, Location, PersonalInfo, Profile, SourceFlags,
    WorkExperience,
};
use crate::utils::non_blank;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvRecord {
    pub personal_info: CvPersonalInfo,
    pub career_summary: Option<String>,
    pub contacts: CvContacts,
    pub skills: Vec<String>,
    pub licenses_and_certifications: Vec<CvCertification>,
    pub work_experience: Vec<CvWorkExperience>,
    pub education: Vec<CvEducation>,
    pub languages: Vec<CvLanguage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvPersonalInfo {
    pub name: String,
    pub surname: String,
    pub headline: Option<String>,
    pub gender: Option<String>,
    pub current_location: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvContacts {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub other: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvCertification {
    pub name: String,
    pub issuer: Option<String>,
    pub issue_date: Option<String>,
    pub expiration_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvWorkExperience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub skills_used: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvEducation {
    pub institution: String,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub grade: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvLanguage {
    pub language: String,
    pub proficiency: Option<String>,
}

impl CvRecord {
    pub fn into_profile(self) -> Profile {
        let info = self.personal_info;
        let full_name = format!("{} {}", info.name, info.surname).trim().to_string();

        let location = non_blank(info.current_location).map(|loc| Location {
            full_location: Some(loc),
            ..Location::default()
        });

        Profile {
            sources: SourceFlags {
                cv: true,
                linkedin: false,
            },
            personal_info: PersonalInfo {
                first_name: info.name,
                last_name: info.surname,
                full_name,
                headline: non_blank(info.headline),
                summary: non_blank(self.career_summary),
                gender: non_blank(info.gender),
                birth_date: non_blank(info.birth_date),
                profile_picture_url: None,
                background_image_url: None,
            },
            location,
            contacts: Contacts {
                email: non_blank(self.contacts.email),
                phone: non_blank(self.contacts.phone),
                linkedin: non_blank(self.contacts.linkedin),
                website: non_blank(self.contacts.website),
                other: self.contacts.other,
                ..Contacts::default()
            },
            skills: self.skills,
            work_experience: self
                .work_experience
                .into_iter()
                .map(|exp| WorkExperience {
                    title: exp.title,
                    company: exp.company,
                    company_linkedin: None,
                    location: non_blank(exp.location),
                    start_date: non_blank(exp.start_date),
                    end_date: non_blank(exp.end_date),
                    description: non_blank(exp.description),
                    logo_url: None,
                })
                .collect(),
            education: self
                .education
                .into_iter()
                .map(|edu| Education {
                    institution: edu.institution,
                    institution_linkedin: None,
                    degree: non_blank(edu.degree),
                    field_of_study: non_blank(edu.field_of_study),
                    start_date: non_blank(edu.start_date),
                    end_date: non_blank(edu.end_date),
                    grade: non_blank(edu.grade),
                    description: non_blank(edu.description),
                    logo_url: None,
                })
                .collect(),
            certifications: self
                .licenses_and_certifications
                .into_iter()
                .map(|cert| Certification {
                    name: cert.name,
                    authority: non_blank(cert.issuer),
                    license_number: non_blank(cert.credential_id),
                    start_date: non_blank(cert.issue_date),
                    end_date: non_blank(cert.expiration_date),
                    url: non_blank(cert.credential_url),
                })
                .collect(),
            languages: self
                .languages
                .into_iter()
                .map(|lang| Language {
                    language: lang.language,
                    proficiency: non_blank(lang.proficiency),
                })
                .collect(),
            linkedin_data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cv() -> CvRecord {
        serde_json::from_value(serde_json::json!({
            "personalInfo": {
                "name": "Ada",
                "surname": "Lovelace",
                "headline": "Analyst",
                "currentLocation": "London, UK",
                "gender": ""
            },
            "careerSummary": "Writes programs for engines.",
            "contacts": { "email": "ada@example.com", "other": ["@ada"] },
            "skills": ["Mathematics", "Python"],
            "licensesAndCertifications": [
                { "name": "AWS SA", "issuer": "Amazon", "issueDate": "2020", "credentialUrl": "https://aws" }
            ],
            "workExperience": [
                { "title": "Analyst", "company": "Engines Ltd", "endDate": "Present" }
            ],
            "education": [{ "institution": "Home", "degree": "None" }],
            "languages": [{ "language": "English", "proficiency": "Native" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_cv_to_profile_copies_fields() {
        let profile = sample_cv().into_profile();

        assert!(profile.sources.cv);
        assert!(!profile.sources.linkedin);
        assert_eq!(profile.personal_info.first_name, "Ada");
        assert_eq!(profile.personal_info.full_name, "Ada Lovelace");
        assert_eq!(
            profile.personal_info.summary.as_deref(),
            Some("Writes programs for engines.")
        );
        assert_eq!(
            profile.location.and_then(|l| l.full_location).as_deref(),
            Some("London, UK")
        );
        assert_eq!(profile.work_experience[0].end_date.as_deref(), Some("Present"));
        assert_eq!(profile.certifications[0].authority.as_deref(), Some("Amazon"));
        assert_eq!(profile.certifications[0].start_date.as_deref(), Some("2020"));
        assert_eq!(profile.certifications[0].url.as_deref(), Some("https://aws"));
    }

    #[test]
    fn test_missing_optionals_become_absent() {
        let profile = sample_cv().into_profile();
        assert_eq!(profile.personal_info.gender, None);
        assert_eq!(profile.contacts.phone, None);
        assert_eq!(profile.education[0].field_of_study, None);
    }

    #[test]
    fn test_no_location_when_missing() {
        let mut cv = sample_cv();
        cv.personal_info.current_location = None;
        assert!(cv.into_profile().location.is_none());
    }
}
