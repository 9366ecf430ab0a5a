// src/profile/linkedin.rs
//! Raw LinkedIn profile record returned by the profile enrichment service.

use serde::{Deserialize, Serialize};

use super::types::{
    Certification, Contacts, Education, Language, LinkedInExtension, Location, PersonalInfo,
    Profile, Project, SourceFlags, VolunteerWork, WorkExperience,
};
use crate::utils::non_blank;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialDate {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PartialDate {
    /// "MM/YYYY" when the month is known, "YYYY" otherwise, nothing without a year.
    pub fn format(&self) -> Option<String> {
        let year = self.year.filter(|y| *y != 0)?;
        match self.month.filter(|m| *m != 0) {
            Some(month) => Some(format!("{:02}/{}", month, year)),
            None => Some(year.to_string()),
        }
    }
}

fn format_date(date: Option<PartialDate>) -> Option<String> {
    date.and_then(|d| d.format())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInRecord {
    pub public_identifier: Option<String>,
    pub profile_pic_url: Option<String>,
    pub background_cover_image_url: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub follower_count: Option<u64>,
    pub occupation: Option<String>,
    pub headline: Option<String>,
    pub summary: Option<String>,
    pub country: Option<String>,
    pub country_full_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub experiences: Vec<LinkedInExperience>,
    pub education: Vec<LinkedInEducation>,
    pub languages_and_proficiencies: Vec<LinkedInLanguage>,
    pub accomplishment_projects: Vec<LinkedInProject>,
    pub volunteer_work: Vec<LinkedInVolunteering>,
    pub certifications: Vec<LinkedInCertification>,
    pub connections: Option<u64>,
    pub recommendations: Vec<String>,
    pub skills: Vec<String>,
    pub gender: Option<String>,
    pub birth_date: Option<PartialDate>,
    pub industry: Option<String>,
    pub extra: Option<LinkedInExtra>,
    pub personal_emails: Vec<String>,
    pub personal_numbers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInExperience {
    pub starts_at: Option<PartialDate>,
    pub ends_at: Option<PartialDate>,
    pub company: Option<String>,
    pub company_linkedin_profile_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInEducation {
    pub starts_at: Option<PartialDate>,
    pub ends_at: Option<PartialDate>,
    pub field_of_study: Option<String>,
    pub degree_name: Option<String>,
    pub school: Option<String>,
    pub school_linkedin_profile_url: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInLanguage {
    pub name: Option<String>,
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInProject {
    pub starts_at: Option<PartialDate>,
    pub ends_at: Option<PartialDate>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInVolunteering {
    pub starts_at: Option<PartialDate>,
    pub ends_at: Option<PartialDate>,
    pub title: Option<String>,
    pub cause: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInCertification {
    pub starts_at: Option<PartialDate>,
    pub ends_at: Option<PartialDate>,
    pub name: Option<String>,
    pub license_number: Option<String>,
    pub authority: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInExtra {
    pub github_profile_id: Option<String>,
    pub facebook_profile_id: Option<String>,
    pub twitter_profile_id: Option<String>,
    pub website: Option<String>,
}

impl LinkedInRecord {
    /// A record without any name is what the provider returns for private profiles.
    pub fn has_identity(&self) -> bool {
        [&self.first_name, &self.last_name, &self.full_name]
            .iter()
            .any(|name| name.as_deref().map_or(false, |n| !n.trim().is_empty()))
    }

    pub fn into_profile(self) -> Profile {
        let first_name = self.first_name.clone().unwrap_or_default();
        let last_name = self.last_name.clone().unwrap_or_default();
        let full_name = non_blank(self.full_name.clone())
            .unwrap_or_else(|| format!("{} {}", first_name, last_name).trim().to_string());

        let full_location = [&self.city, &self.state, &self.country_full_name]
            .iter()
            .filter_map(|part| crate::utils::non_blank_str(part.as_deref()))
            .collect::<Vec<_>>()
            .join(", ");

        let extra = self.extra.unwrap_or_default();
        let handle_url = |base: &str, handle: Option<String>| {
            non_blank(handle).map(|h| format!("{}/{}", base, h))
        };

        let location = Location {
            city: non_blank(self.city),
            state: non_blank(self.state),
            country: non_blank(self.country_full_name),
            country_code: non_blank(self.country),
            full_location: non_blank(Some(full_location)),
        };

        Profile {
            sources: SourceFlags {
                cv: false,
                linkedin: true,
            },
            personal_info: PersonalInfo {
                first_name,
                last_name,
                full_name,
                headline: non_blank(self.headline),
                summary: non_blank(self.summary),
                gender: non_blank(self.gender),
                birth_date: format_date(self.birth_date),
                profile_picture_url: non_blank(self.profile_pic_url),
                background_image_url: non_blank(self.background_cover_image_url),
            },
            location: (!location.is_empty()).then_some(location),
            contacts: Contacts {
                email: non_blank(self.personal_emails.into_iter().next()),
                phone: non_blank(self.personal_numbers.into_iter().next()),
                linkedin: handle_url("https://linkedin.com/in", self.public_identifier.clone()),
                twitter: handle_url("https://twitter.com", extra.twitter_profile_id),
                facebook: handle_url("https://facebook.com", extra.facebook_profile_id),
                github: handle_url("https://github.com", extra.github_profile_id),
                website: non_blank(extra.website),
                other: Vec::new(),
            },
            skills: self.skills,
            work_experience: self
                .experiences
                .into_iter()
                .map(|exp| WorkExperience {
                    title: exp.title.unwrap_or_default(),
                    company: exp.company.unwrap_or_default(),
                    company_linkedin: non_blank(exp.company_linkedin_profile_url),
                    location: non_blank(exp.location),
                    start_date: format_date(exp.starts_at),
                    end_date: match exp.ends_at {
                        Some(end) => end.format(),
                        None => Some("Present".to_string()),
                    },
                    description: non_blank(exp.description),
                    logo_url: non_blank(exp.logo_url),
                })
                .collect(),
            education: self
                .education
                .into_iter()
                .map(|edu| Education {
                    institution: edu.school.unwrap_or_default(),
                    institution_linkedin: non_blank(edu.school_linkedin_profile_url),
                    degree: non_blank(edu.degree_name),
                    field_of_study: non_blank(edu.field_of_study),
                    start_date: format_date(edu.starts_at),
                    end_date: format_date(edu.ends_at),
                    grade: non_blank(edu.grade),
                    description: non_blank(edu.description),
                    logo_url: non_blank(edu.logo_url),
                })
                .collect(),
            certifications: self
                .certifications
                .into_iter()
                .map(|cert| Certification {
                    name: cert.name.unwrap_or_default(),
                    authority: non_blank(cert.authority),
                    license_number: non_blank(cert.license_number),
                    start_date: format_date(cert.starts_at),
                    end_date: format_date(cert.ends_at),
                    url: non_blank(cert.url),
                })
                .collect(),
            languages: self
                .languages_and_proficiencies
                .into_iter()
                .filter_map(|lang| {
                    non_blank(lang.name).map(|language| Language {
                        language,
                        proficiency: non_blank(lang.proficiency),
                    })
                })
                .collect(),
            linkedin_data: Some(LinkedInExtension {
                public_identifier: non_blank(self.public_identifier),
                connections: self.connections.filter(|c| *c > 0),
                follower_count: self.follower_count.filter(|c| *c > 0),
                occupation: non_blank(self.occupation),
                industry: non_blank(self.industry),
                recommendations: self.recommendations,
                volunteer_work: self
                    .volunteer_work
                    .into_iter()
                    .map(|vol| VolunteerWork {
                        title: vol.title.unwrap_or_default(),
                        company: non_blank(vol.company),
                        cause: non_blank(vol.cause),
                        start_date: format_date(vol.starts_at),
                        end_date: format_date(vol.ends_at),
                        description: non_blank(vol.description),
                    })
                    .collect(),
                projects: self
                    .accomplishment_projects
                    .into_iter()
                    .map(|proj| Project {
                        title: proj.title.unwrap_or_default(),
                        description: non_blank(proj.description),
                        url: non_blank(proj.url),
                        start_date: format_date(proj.starts_at),
                        end_date: format_date(proj.ends_at),
                    })
                    .collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> LinkedInRecord {
        serde_json::from_value(json!({
            "public_identifier": "janedoe",
            "first_name": "Jane",
            "last_name": "Doe",
            "full_name": null,
            "city": "Berlin",
            "state": null,
            "country": "DE",
            "country_full_name": "Germany",
            "experiences": [
                {
                    "title": "Engineer",
                    "company": "Acme",
                    "starts_at": { "day": 1, "month": 3, "year": 2021 },
                    "ends_at": null
                },
                {
                    "title": "Intern",
                    "company": "Initech",
                    "starts_at": { "day": null, "month": null, "year": 2019 },
                    "ends_at": { "day": null, "month": 9, "year": 2020 }
                }
            ],
            "education": [
                { "school": "TU Berlin", "ends_at": null, "degree_name": "MSc" }
            ],
            "languages_and_proficiencies": [{ "name": "German", "proficiency": "NATIVE_OR_BILINGUAL" }],
            "extra": { "github_profile_id": "jdoe", "twitter_profile_id": null, "website": "https://jane.dev" },
            "personal_emails": ["jane@example.com"],
            "personal_numbers": [],
            "skills": ["Rust", "Go"],
            "industry": "Software",
            "connections": 500
        }))
        .unwrap()
    }

    #[test]
    fn test_partial_date_format() {
        let full = PartialDate { day: Some(4), month: Some(3), year: Some(2021) };
        assert_eq!(full.format().as_deref(), Some("03/2021"));

        let year_only = PartialDate { day: None, month: None, year: Some(2019) };
        assert_eq!(year_only.format().as_deref(), Some("2019"));

        let no_year = PartialDate { day: Some(1), month: Some(1), year: None };
        assert_eq!(no_year.format(), None);
    }

    #[test]
    fn test_linkedin_to_profile() {
        let profile = record().into_profile();

        assert!(profile.sources.linkedin);
        assert_eq!(profile.personal_info.full_name, "Jane Doe");
        assert_eq!(
            profile.contacts.linkedin.as_deref(),
            Some("https://linkedin.com/in/janedoe")
        );
        assert_eq!(profile.contacts.github.as_deref(), Some("https://github.com/jdoe"));
        assert_eq!(profile.contacts.twitter, None);
        assert_eq!(profile.contacts.email.as_deref(), Some("jane@example.com"));
        assert_eq!(profile.contacts.phone, None);
        assert_eq!(
            profile.location.as_ref().and_then(|l| l.full_location.as_deref()),
            Some("Berlin, Germany")
        );
        assert_eq!(profile.location.as_ref().and_then(|l| l.country_code.as_deref()), Some("DE"));
    }

    #[test]
    fn test_open_ended_experience_is_present() {
        let profile = record().into_profile();
        assert_eq!(profile.work_experience[0].start_date.as_deref(), Some("03/2021"));
        assert_eq!(profile.work_experience[0].end_date.as_deref(), Some("Present"));
        assert_eq!(profile.work_experience[1].end_date.as_deref(), Some("09/2020"));
        // education keeps an open end date absent
        assert_eq!(profile.education[0].end_date, None);
    }

    #[test]
    fn test_linkedin_extension() {
        let data = record().into_profile().linkedin_data.unwrap();
        assert_eq!(data.public_identifier.as_deref(), Some("janedoe"));
        assert_eq!(data.industry.as_deref(), Some("Software"));
        assert_eq!(data.connections, Some(500));
    }

    #[test]
    fn test_has_identity() {
        assert!(record().has_identity());
        assert!(!LinkedInRecord::default().has_identity());
    }
}
