//! CV form model and the normalization pipeline around it.
//!
//! Data flows one way: loose input goes through [`lenient`] into a draft,
//! a draft goes through [`promotion`] and [`strict`] to become a completed
//! CV, and a completed CV goes through [`external`] to the document service.

pub mod external;
pub mod form;
pub mod form_session;
pub mod lenient;
pub mod lifecycle;
pub mod promotion;
pub mod report;
pub mod strict;

pub use external::{to_external_payload, ExternalCvPayload};
pub use form::CvForm;
pub use form_session::{FormSession, FormStep, StepUpdate};
pub use lenient::normalize_lenient;
pub use lifecycle::{CvStatus, SaveAction};
pub use promotion::{promote, Promotion, SubstitutedDate};
pub use report::{FieldError, ValidationReport};
pub use strict::validate_strict;

#[cfg(test)]
pub(crate) mod test_support {
    use super::form::{
        CvForm, Education, PersonalInfo, Skills, SkillsMatrixEntry, WorkExperience,
    };

    /// A form that passes strict validation.
    pub fn complete_form() -> CvForm {
        CvForm {
            job_title: "Backend Engineer".into(),
            executive_summary:
                "Engineer with eight years of experience building payment and logistics platforms."
                    .into(),
            personal_info: PersonalInfo {
                first_name: "Thandi".into(),
                last_name: "Mokoena".into(),
                email: "thandi@example.com".into(),
                phone: "+27 82 555 0101".into(),
                profession: "Software Engineer".into(),
                location: "Cape Town".into(),
                gender: "female".into(),
                availability: "1 month notice".into(),
                nationality: "South African".into(),
                current_salary: 0.0,
                expected_salary: 65000.0,
                drivers_license: true,
                id_number: "9001015009087".into(),
            },
            work_experience: vec![WorkExperience {
                company: "Acme Logistics".into(),
                position: "Senior Developer".into(),
                start_date: "2019-02-01".into(),
                end_date: "".into(),
                current: true,
                duties: vec!["Managed a team".into()],
                reason_for_leaving: "".into(),
            }],
            education: vec![Education {
                institution: "University of Cape Town".into(),
                qualification: "BSc Computer Science".into(),
                completion_date: 2012,
                completed: true,
            }],
            skills: Skills {
                computer_skills: vec!["Rust".into(), "PostgreSQL".into()],
                other_skills: vec!["Mentoring".into()],
                skills_matrix: vec![SkillsMatrixEntry {
                    skill: "Rust".into(),
                    years_experience: 4.0,
                    proficiency: "advanced".into(),
                    last_used: 2024,
                }],
            },
        }
    }
}
