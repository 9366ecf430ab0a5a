// src/search/relax.rs
//! Progressive broadening of a search that came back empty.
//!
//! A plan starts in `Initial` with the full parameters. Each call to
//! [`RelaxationPlan::relax`] removes the next relaxation field that is still
//! set and moves to `Relaxing`; once no set field remains the plan is
//! `Exhausted`. Fixed fields are never part of a relaxation order.

use serde::Serialize;
use std::convert::Infallible;
use std::fmt;

use crate::query::{BehanceParams, FreelanceParams, IndeedParams, LinkedInParams, UpworkParams};

pub trait Relaxable: Clone + Serialize + Send + Sync {
    type Field: 'static + Copy + fmt::Debug + fmt::Display + PartialEq + Send + Sync;

    /// Fields to remove, most restrictive first.
    const RELAXATION_ORDER: &'static [Self::Field];

    fn is_set(&self, field: Self::Field) -> bool;

    fn clear(&mut self, field: Self::Field);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxState {
    Initial,
    /// Index into the relaxation order where the next removal search starts.
    Relaxing(usize),
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct RelaxationPlan<P: Relaxable> {
    params: P,
    state: RelaxState,
    removed: Vec<P::Field>,
}

impl<P: Relaxable> RelaxationPlan<P> {
    pub fn new(params: P) -> Self {
        Self {
            params,
            state: RelaxState::Initial,
            removed: Vec::new(),
        }
    }

    /// Parameters for the next attempt.
    pub fn params(&self) -> &P {
        &self.params
    }

    pub fn state(&self) -> RelaxState {
        self.state
    }

    pub fn removed(&self) -> &[P::Field] {
        &self.removed
    }

    /// Remove the next set field after an empty result. `None` once exhausted.
    pub fn relax(&mut self) -> Option<P::Field> {
        let start = match self.state {
            RelaxState::Initial => 0,
            RelaxState::Relaxing(next) => next,
            RelaxState::Exhausted => return None,
        };

        for (index, field) in P::RELAXATION_ORDER.iter().enumerate().skip(start) {
            if self.params.is_set(*field) {
                self.params.clear(*field);
                self.removed.push(*field);
                self.state = RelaxState::Relaxing(index + 1);
                return Some(*field);
            }
        }

        self.state = RelaxState::Exhausted;
        None
    }

    /// Upper bound on attempts for this parameter type.
    pub fn max_attempts() -> usize {
        P::RELAXATION_ORDER.len() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedInField {
    DescriptionSearch,
    OrganizationSearch,
    OrganizationDescriptionSearch,
    OrganizationDescriptionExclusionSearch,
    SeniorityFilter,
    IndustryFilter,
    OrganizationEmployeesLte,
    OrganizationEmployeesGte,
    EmploymentTypeFilter,
    AiVisaSponsorshipFilter,
}

impl fmt::Display for LinkedInField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkedInField::DescriptionSearch => "descriptionSearch",
            LinkedInField::OrganizationSearch => "organizationSearch",
            LinkedInField::OrganizationDescriptionSearch => "organizationDescriptionSearch",
            LinkedInField::OrganizationDescriptionExclusionSearch => {
                "organizationDescriptionExclusionSearch"
            }
            LinkedInField::SeniorityFilter => "seniorityFilter",
            LinkedInField::IndustryFilter => "industryFilter",
            LinkedInField::OrganizationEmployeesLte => "organizationEmployeesLte",
            LinkedInField::OrganizationEmployeesGte => "organizationEmployeesGte",
            LinkedInField::EmploymentTypeFilter => "EmploymentTypeFilter",
            LinkedInField::AiVisaSponsorshipFilter => "aiVisaSponsorshipFilter",
        };
        f.write_str(name)
    }
}

fn has_items(values: &Option<Vec<String>>) -> bool {
    values.as_ref().is_some_and(|v| !v.is_empty())
}

impl Relaxable for LinkedInParams {
    type Field = LinkedInField;

    const RELAXATION_ORDER: &'static [LinkedInField] = &[
        LinkedInField::DescriptionSearch,
        LinkedInField::OrganizationSearch,
        LinkedInField::OrganizationDescriptionSearch,
        LinkedInField::OrganizationDescriptionExclusionSearch,
        LinkedInField::SeniorityFilter,
        LinkedInField::IndustryFilter,
        LinkedInField::OrganizationEmployeesLte,
        LinkedInField::OrganizationEmployeesGte,
        LinkedInField::EmploymentTypeFilter,
        LinkedInField::AiVisaSponsorshipFilter,
    ];

    fn is_set(&self, field: LinkedInField) -> bool {
        match field {
            LinkedInField::DescriptionSearch => has_items(&self.description_search),
            LinkedInField::OrganizationSearch => has_items(&self.organization_search),
            LinkedInField::OrganizationDescriptionSearch => {
                has_items(&self.organization_description_search)
            }
            LinkedInField::OrganizationDescriptionExclusionSearch => {
                has_items(&self.organization_description_exclusion_search)
            }
            LinkedInField::SeniorityFilter => has_items(&self.seniority_filter),
            LinkedInField::IndustryFilter => has_items(&self.industry_filter),
            LinkedInField::OrganizationEmployeesLte => self.organization_employees_lte.is_some(),
            LinkedInField::OrganizationEmployeesGte => self.organization_employees_gte.is_some(),
            LinkedInField::EmploymentTypeFilter => has_items(&self.employment_type_filter),
            LinkedInField::AiVisaSponsorshipFilter => self.ai_visa_sponsorship_filter.is_some(),
        }
    }

    fn clear(&mut self, field: LinkedInField) {
        match field {
            LinkedInField::DescriptionSearch => self.description_search = None,
            LinkedInField::OrganizationSearch => self.organization_search = None,
            LinkedInField::OrganizationDescriptionSearch => {
                self.organization_description_search = None
            }
            LinkedInField::OrganizationDescriptionExclusionSearch => {
                self.organization_description_exclusion_search = None
            }
            LinkedInField::SeniorityFilter => self.seniority_filter = None,
            LinkedInField::IndustryFilter => self.industry_filter = None,
            LinkedInField::OrganizationEmployeesLte => self.organization_employees_lte = None,
            LinkedInField::OrganizationEmployeesGte => self.organization_employees_gte = None,
            LinkedInField::EmploymentTypeFilter => self.employment_type_filter = None,
            LinkedInField::AiVisaSponsorshipFilter => self.ai_visa_sponsorship_filter = None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpworkField {
    NumbersOfProposals,
    ProjectLength,
    HoursPerWeek,
    ContractToHireRole,
    ExperienceLevel,
    Budget,
}

impl fmt::Display for UpworkField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpworkField::NumbersOfProposals => "numbers_of_proposals",
            UpworkField::ProjectLength => "project_length",
            UpworkField::HoursPerWeek => "hours_per_week",
            UpworkField::ContractToHireRole => "contract_to_hire_role",
            UpworkField::ExperienceLevel => "experience_level",
            UpworkField::Budget => "budget",
        })
    }
}

impl Relaxable for UpworkParams {
    type Field = UpworkField;

    const RELAXATION_ORDER: &'static [UpworkField] = &[
        UpworkField::NumbersOfProposals,
        UpworkField::ProjectLength,
        UpworkField::HoursPerWeek,
        UpworkField::ContractToHireRole,
        UpworkField::ExperienceLevel,
        UpworkField::Budget,
    ];

    fn is_set(&self, field: UpworkField) -> bool {
        match field {
            UpworkField::NumbersOfProposals => has_items(&self.numbers_of_proposals),
            UpworkField::ProjectLength => has_items(&self.project_length),
            UpworkField::HoursPerWeek => has_items(&self.hours_per_week),
            UpworkField::ContractToHireRole => self.contract_to_hire_role.is_some(),
            UpworkField::ExperienceLevel => has_items(&self.experience_level),
            UpworkField::Budget => self.budget.is_some(),
        }
    }

    fn clear(&mut self, field: UpworkField) {
        match field {
            UpworkField::NumbersOfProposals => self.numbers_of_proposals = None,
            UpworkField::ProjectLength => self.project_length = None,
            UpworkField::HoursPerWeek => self.hours_per_week = None,
            UpworkField::ContractToHireRole => self.contract_to_hire_role = None,
            UpworkField::ExperienceLevel => self.experience_level = None,
            UpworkField::Budget => self.budget = None,
        }
    }
}

/// Platforms searched exactly once.
macro_rules! single_attempt {
    ($($params:ty),+) => {
        $(
            impl Relaxable for $params {
                type Field = Infallible;

                const RELAXATION_ORDER: &'static [Infallible] = &[];

                fn is_set(&self, field: Infallible) -> bool {
                    match field {}
                }

                fn clear(&mut self, field: Infallible) {
                    match field {}
                }
            }
        )+
    };
}

single_attempt!(IndeedParams, BehanceParams, FreelanceParams);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::upwork::UpworkBudget;

    fn restrictive_linkedin() -> LinkedInParams {
        LinkedInParams {
            title_search: Some(vec!["Engineer".into()]),
            description_search: Some(vec!["rust".into()]),
            seniority_filter: Some(vec!["Director".into()]),
            organization_employees_gte: Some(1000),
            ..LinkedInParams::default()
        }
    }

    #[test]
    fn test_skips_unset_fields_in_order() {
        let mut plan = RelaxationPlan::new(restrictive_linkedin());
        assert_eq!(plan.state(), RelaxState::Initial);

        assert_eq!(plan.relax(), Some(LinkedInField::DescriptionSearch));
        assert_eq!(plan.state(), RelaxState::Relaxing(1));
        assert_eq!(plan.relax(), Some(LinkedInField::SeniorityFilter));
        assert_eq!(plan.relax(), Some(LinkedInField::OrganizationEmployeesGte));
        assert_eq!(plan.relax(), None);
        assert_eq!(plan.state(), RelaxState::Exhausted);
        assert_eq!(plan.relax(), None);

        assert_eq!(plan.removed().len(), 3);
        assert_eq!(plan.params().title_search, Some(vec!["Engineer".to_string()]));
    }

    #[test]
    fn test_never_touches_fixed_fields() {
        let params = LinkedInParams {
            description_search: Some(vec!["x".into()]),
            organization_employees_lte: Some(5),
            organization_employees_gte: Some(1),
            ai_visa_sponsorship_filter: Some(true),
            remote: Some(true),
            ..LinkedInParams::default()
        };

        let mut plan = RelaxationPlan::new(params);
        let mut attempts = 1;
        while plan.relax().is_some() {
            attempts += 1;
        }
        assert_eq!(attempts, 5);

        let final_params = plan.params();
        assert!(!final_params.include_ai);
        assert_eq!(final_params.description_type, "text");
        assert!(!final_params.remove_agency);
        assert_eq!(final_params.limit, 50);
        assert_eq!(final_params.remote, Some(true));

        let upwork = UpworkParams {
            budget: Some(UpworkBudget {
                hourly: Some(true),
                ..UpworkBudget::default()
            }),
            experience_level: Some(vec!["expert".into()]),
            ..UpworkParams::default()
        };
        let mut plan = RelaxationPlan::new(upwork);
        assert_eq!(plan.relax(), Some(UpworkField::ExperienceLevel));
        assert_eq!(plan.relax(), Some(UpworkField::Budget));
        assert_eq!(plan.relax(), None);
        assert_eq!(plan.params().limit, 50);
        assert_eq!(plan.params().sortby, "relevance");
        assert!(plan.params().client_payment_verified);
        assert_eq!(plan.params().client_history.len(), 2);
    }

    fn order_names<P: Relaxable>() -> Vec<String> {
        P::RELAXATION_ORDER.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_relaxation_order_through_generic_bound() {
        let linkedin = order_names::<LinkedInParams>();
        assert_eq!(linkedin.len(), 10);
        assert_eq!(linkedin[0], "descriptionSearch");
        assert_eq!(linkedin[9], "aiVisaSponsorshipFilter");
        assert!(order_names::<FreelanceParams>().is_empty());
    }

    #[test]
    fn test_relaxation_bounds() {
        assert_eq!(RelaxationPlan::<LinkedInParams>::max_attempts(), 11);
        assert_eq!(RelaxationPlan::<UpworkParams>::max_attempts(), 7);
        assert_eq!(RelaxationPlan::<IndeedParams>::max_attempts(), 1);
    }

    #[test]
    fn test_single_attempt_platforms_exhaust_immediately() {
        let mut plan = RelaxationPlan::new(BehanceParams {
            keyword: "illustrator".into(),
            maxitems: 30,
        });
        assert_eq!(plan.relax(), None);
        assert_eq!(plan.state(), RelaxState::Exhausted);
    }
}
