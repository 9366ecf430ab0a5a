// src/profile/merge.rs
//! Reconciles two canonical profiles into one.
//!
//! Scalars fall back from primary to secondary, with blank strings counting as
//! absent. Skills and languages are sets keyed by their lower-cased value.
//! Work experience and education are never merged element-wise: the primary
//! list wins wholesale when it has any entries. Certifications and the
//! overflow contact list are concatenated.

use std::collections::HashSet;

use super::types::{Contacts, Language, Location, PersonalInfo, Profile};
use crate::utils::{dedup_case_insensitive, non_blank};

fn pick(primary: Option<String>, secondary: Option<String>) -> Option<String> {
    non_blank(primary).or_else(|| non_blank(secondary))
}

fn pick_name(primary: String, secondary: String) -> String {
    if primary.trim().is_empty() {
        secondary
    } else {
        primary
    }
}

fn normalize_location(location: Option<Location>) -> Option<Location> {
    let location = location?;
    let normalized = Location {
        city: non_blank(location.city),
        state: non_blank(location.state),
        country: non_blank(location.country),
        country_code: non_blank(location.country_code),
        full_location: non_blank(location.full_location),
    };
    (!normalized.is_empty()).then_some(normalized)
}

fn merge_languages(primary: Vec<Language>, secondary: Vec<Language>) -> Vec<Language> {
    let mut seen = HashSet::new();
    primary
        .into_iter()
        .chain(secondary)
        .filter(|lang| !lang.language.trim().is_empty())
        .filter(|lang| seen.insert(lang.language.trim().to_lowercase()))
        .collect()
}

fn merge_personal_info(primary: PersonalInfo, secondary: PersonalInfo) -> PersonalInfo {
    PersonalInfo {
        first_name: pick_name(primary.first_name, secondary.first_name),
        last_name: pick_name(primary.last_name, secondary.last_name),
        full_name: pick_name(primary.full_name, secondary.full_name),
        headline: pick(primary.headline, secondary.headline),
        summary: pick(primary.summary, secondary.summary),
        gender: pick(primary.gender, secondary.gender),
        birth_date: pick(primary.birth_date, secondary.birth_date),
        profile_picture_url: pick(primary.profile_picture_url, secondary.profile_picture_url),
        background_image_url: pick(primary.background_image_url, secondary.background_image_url),
    }
}

fn merge_contacts(primary: Contacts, secondary: Contacts) -> Contacts {
    let mut other = primary.other;
    other.extend(secondary.other);

    Contacts {
        email: pick(primary.email, secondary.email),
        phone: pick(primary.phone, secondary.phone),
        linkedin: pick(primary.linkedin, secondary.linkedin),
        twitter: pick(primary.twitter, secondary.twitter),
        facebook: pick(primary.facebook, secondary.facebook),
        github: pick(primary.github, secondary.github),
        website: pick(primary.website, secondary.website),
        other,
    }
}

/// Merge `secondary` into `primary`, preferring primary values.
pub fn merge_profiles(primary: Profile, secondary: Profile) -> Profile {
    let location =
        normalize_location(primary.location).or_else(|| normalize_location(secondary.location));

    let work_experience = if primary.work_experience.is_empty() {
        secondary.work_experience
    } else {
        primary.work_experience
    };

    let education = if primary.education.is_empty() {
        secondary.education
    } else {
        primary.education
    };

    let mut certifications = primary.certifications;
    certifications.extend(secondary.certifications);

    Profile {
        sources: primary.sources.union(secondary.sources),
        personal_info: merge_personal_info(primary.personal_info, secondary.personal_info),
        location,
        contacts: merge_contacts(primary.contacts, secondary.contacts),
        skills: dedup_case_insensitive(primary.skills.into_iter().chain(secondary.skills)),
        work_experience,
        education,
        certifications,
        languages: merge_languages(primary.languages, secondary.languages),
        linkedin_data: primary.linkedin_data.or(secondary.linkedin_data),
    }
}

impl Profile {
    /// The same profile with blank scalars removed and set-like lists deduplicated.
    pub fn normalized(self) -> Profile {
        merge_profiles(self, Profile::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::{Certification, SourceFlags, WorkExperience};

    fn cv_profile() -> Profile {
        Profile {
            sources: SourceFlags { cv: true, linkedin: false },
            personal_info: PersonalInfo {
                first_name: "Sam".into(),
                last_name: "Lee".into(),
                full_name: "Sam Lee".into(),
                headline: Some("Backend Engineer".into()),
                summary: Some("   ".into()),
                ..PersonalInfo::default()
            },
            contacts: Contacts {
                email: Some("sam@cv.example".into()),
                other: vec!["@sam".into()],
                ..Contacts::default()
            },
            skills: vec!["Python".into(), "Go".into()],
            work_experience: vec![WorkExperience {
                title: "Engineer".into(),
                company: "CV Corp".into(),
                ..WorkExperience::default()
            }],
            certifications: vec![Certification { name: "CKA".into(), ..Certification::default() }],
            languages: vec![Language { language: "English".into(), proficiency: Some("C2".into()) }],
            ..Profile::default()
        }
    }

    fn linkedin_profile() -> Profile {
        Profile {
            sources: SourceFlags { cv: false, linkedin: true },
            personal_info: PersonalInfo {
                first_name: "Samuel".into(),
                summary: Some("Builds APIs".into()),
                ..PersonalInfo::default()
            },
            location: Some(Location {
                full_location: Some("Austin, Texas".into()),
                ..Location::default()
            }),
            contacts: Contacts {
                email: Some("sam@li.example".into()),
                github: Some("https://github.com/sam".into()),
                other: vec!["sam.dev".into()],
                ..Contacts::default()
            },
            skills: vec!["python".into(), "Kubernetes".into()],
            work_experience: vec![WorkExperience {
                title: "Staff Engineer".into(),
                company: "LI Corp".into(),
                ..WorkExperience::default()
            }],
            certifications: vec![Certification { name: "CKA".into(), ..Certification::default() }],
            languages: vec![
                Language { language: "english".into(), proficiency: None },
                Language { language: "Spanish".into(), proficiency: None },
            ],
            ..Profile::default()
        }
    }

    #[test]
    fn test_scalar_fallback_treats_blank_as_absent() {
        let merged = merge_profiles(cv_profile(), linkedin_profile());
        assert_eq!(merged.personal_info.first_name, "Sam");
        assert_eq!(merged.personal_info.summary.as_deref(), Some("Builds APIs"));
        assert_eq!(merged.contacts.email.as_deref(), Some("sam@cv.example"));
        assert_eq!(merged.contacts.github.as_deref(), Some("https://github.com/sam"));
        assert_eq!(merged.contacts.other, vec!["@sam", "sam.dev"]);
        assert_eq!(
            merged.location.and_then(|l| l.full_location).as_deref(),
            Some("Austin, Texas")
        );
    }

    #[test]
    fn test_skills_dedup_case_insensitive() {
        let merged = merge_profiles(cv_profile(), linkedin_profile());
        assert_eq!(merged.skills, vec!["Python", "Go", "Kubernetes"]);
    }

    #[test]
    fn test_languages_primary_wins() {
        let merged = merge_profiles(cv_profile(), linkedin_profile());
        assert_eq!(merged.languages.len(), 2);
        assert_eq!(merged.languages[0].proficiency.as_deref(), Some("C2"));
        assert_eq!(merged.languages[1].language, "Spanish");
    }

    #[test]
    fn test_work_experience_whole_list_fallback() {
        let a = cv_profile();
        let b = linkedin_profile();
        let merged = merge_profiles(a.clone(), b.clone());
        assert_eq!(merged.work_experience, a.work_experience);

        let mut empty_work = a;
        empty_work.work_experience.clear();
        let merged = merge_profiles(empty_work, b.clone());
        assert_eq!(merged.work_experience, b.work_experience);
    }

    #[test]
    fn test_certifications_concatenate_without_dedup() {
        let merged = merge_profiles(cv_profile(), linkedin_profile());
        assert_eq!(merged.certifications.len(), 2);
    }

    #[test]
    fn test_sources_are_symmetric() {
        let ab = merge_profiles(cv_profile(), linkedin_profile());
        let ba = merge_profiles(linkedin_profile(), cv_profile());
        assert_eq!(ab.sources, ba.sources);
        assert_eq!(ab.sources, SourceFlags { cv: true, linkedin: true });
    }

    #[test]
    fn test_merge_with_empty_is_normalization() {
        let p = cv_profile();
        let normalized = p.clone().normalized();
        assert_eq!(normalized.personal_info.summary, None);
        assert_eq!(normalized.skills, p.skills);
        assert_eq!(normalized.work_experience, p.work_experience);
        assert_eq!(merge_profiles(Profile::default(), p), normalized);
    }

    #[test]
    fn test_python_and_python_collapse() {
        let mut a = Profile::default();
        a.skills = vec!["Python".into()];
        let mut b = Profile::default();
        b.skills = vec!["python".into()];
        assert_eq!(merge_profiles(a, b).skills, vec!["Python"]);
    }
}
