//! Payload for the external document-generation service.
//!
//! The service rejects empty strings on every required field, and expects
//! `null` for an end date that does not exist. The transform is pure and
//! total: any form maps to a payload that satisfies both rules.

use serde::{Deserialize, Serialize};

use super::form::{is_placeholder, CvForm, Education, PersonalInfo, Skills, WorkExperience};

pub const NOT_SPECIFIED: &str = "Not specified";

pub const DEFAULT_EXECUTIVE_SUMMARY: &str = "Dedicated and results-driven professional with a \
strong track record of delivering quality work in fast-paced environments. Brings solid \
communication, problem-solving and organisational skills, and works well both independently \
and as part of a team.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalCvPayload {
    pub job_title: String,
    pub executive_summary: String,
    pub personal_info: ExternalPersonalInfo,
    pub work_experience: Vec<ExternalWorkExperience>,
    pub education: Vec<ExternalEducation>,
    pub skills: ExternalSkills,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalPersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub profession: String,
    pub location: String,
    pub gender: String,
    pub availability: String,
    pub nationality: String,
    pub current_salary: f64,
    pub expected_salary: f64,
    pub drivers_license: bool,
    pub id_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalWorkExperience {
    pub company: String,
    pub position: String,
    pub start_date: String,
    /// Always serialized, as `null` when the position has no end.
    pub end_date: Option<String>,
    pub current: bool,
    pub duties: Vec<String>,
    pub reason_for_leaving: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalEducation {
    pub institution: String,
    pub qualification: String,
    pub completion_date: i32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSkills {
    pub computer_skills: Vec<String>,
    pub other_skills: Vec<String>,
    pub skills_matrix: Vec<ExternalSkillsMatrixEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalSkillsMatrixEntry {
    pub skill: String,
    pub years_experience: f64,
    pub proficiency: String,
    pub last_used: i32,
}

pub fn to_external_payload(form: &CvForm) -> ExternalCvPayload {
    ExternalCvPayload {
        job_title: or_default(&form.job_title, NOT_SPECIFIED),
        executive_summary: or_default(&form.executive_summary, DEFAULT_EXECUTIVE_SUMMARY),
        personal_info: personal_info(&form.personal_info),
        work_experience: form.work_experience.iter().map(work_experience).collect(),
        education: form.education.iter().map(education).collect(),
        skills: skills(&form.skills),
    }
}

fn personal_info(info: &PersonalInfo) -> ExternalPersonalInfo {
    ExternalPersonalInfo {
        first_name: not_specified(&info.first_name),
        last_name: not_specified(&info.last_name),
        email: not_specified(&info.email),
        phone: not_specified(&info.phone),
        profession: not_specified(&info.profession),
        location: not_specified(&info.location),
        gender: not_specified(&info.gender),
        availability: not_specified(&info.availability),
        nationality: not_specified(&info.nationality),
        current_salary: info.current_salary,
        expected_salary: info.expected_salary,
        drivers_license: info.drivers_license,
        id_number: not_specified(&info.id_number),
    }
}

fn work_experience(entry: &WorkExperience) -> ExternalWorkExperience {
    let end_date = if entry.current || is_placeholder(&entry.end_date) {
        None
    } else {
        Some(entry.end_date.clone())
    };

    ExternalWorkExperience {
        company: not_specified(&entry.company),
        position: not_specified(&entry.position),
        start_date: not_specified(&entry.start_date),
        end_date,
        current: entry.current,
        duties: non_blank(&entry.duties),
        reason_for_leaving: not_specified(&entry.reason_for_leaving),
    }
}

fn education(entry: &Education) -> ExternalEducation {
    ExternalEducation {
        institution: not_specified(&entry.institution),
        qualification: not_specified(&entry.qualification),
        completion_date: entry.completion_date,
        completed: entry.completed,
    }
}

fn skills(skills: &Skills) -> ExternalSkills {
    ExternalSkills {
        computer_skills: non_blank(&skills.computer_skills),
        other_skills: non_blank(&skills.other_skills),
        skills_matrix: skills
            .skills_matrix
            .iter()
            .map(|entry| ExternalSkillsMatrixEntry {
                skill: not_specified(&entry.skill),
                years_experience: entry.years_experience,
                proficiency: not_specified(&entry.proficiency),
                last_used: entry.last_used,
            })
            .collect(),
    }
}

fn not_specified(value: &str) -> String {
    or_default(value, NOT_SPECIFIED)
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn non_blank(items: &[String]) -> Vec<String> {
    items
        .iter()
        .filter(|item| !item.trim().is_empty())
        .cloned()
        .collect()
}
