//! The internal CV form schema.
//!
//! `CvForm` is the shape shared by drafts, the step wizard and completed CVs.
//! Every field is always present; drafts simply carry empty values where the
//! strict rules in [`crate::cv::strict`] would reject them.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Canonical value for an availability nobody filled in.
pub const AVAILABILITY_NOT_SPECIFIED: &str = "Not specified";

pub const JOB_TITLE_MAX_CHARS: usize = 21;
pub const EXECUTIVE_SUMMARY_MIN_CHARS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CvForm {
    #[validate(custom(function = "validate_job_title"))]
    pub job_title: String,
    #[validate(custom(function = "validate_executive_summary"))]
    pub executive_summary: String,
    #[validate(nested)]
    pub personal_info: PersonalInfo,
    #[validate(nested)]
    pub work_experience: Vec<WorkExperience>,
    #[validate(nested)]
    pub education: Vec<Education>,
    #[validate(nested)]
    pub skills: Skills,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    #[validate(custom(function = "required_text"))]
    pub first_name: String,
    #[validate(custom(function = "required_text"))]
    pub last_name: String,
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(custom(function = "required_text"))]
    pub phone: String,
    #[validate(custom(function = "required_text"))]
    pub profession: String,
    #[validate(custom(function = "required_text"))]
    pub location: String,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(custom(function = "required_text"))]
    pub availability: String,
    #[validate(custom(function = "required_text"))]
    pub nationality: String,
    #[validate(range(min = 0.0, message = "Salary must not be negative"))]
    pub current_salary: f64,
    #[validate(range(min = 0.0, message = "Salary must not be negative"))]
    pub expected_salary: f64,
    pub drivers_license: bool,
    #[validate(custom(function = "required_text"))]
    pub id_number: String,
}

impl Default for PersonalInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            profession: String::new(),
            location: String::new(),
            gender: String::new(),
            availability: AVAILABILITY_NOT_SPECIFIED.to_string(),
            nationality: String::new(),
            current_salary: 0.0,
            expected_salary: 0.0,
            drivers_license: false,
            id_number: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    #[validate(custom(function = "required_text"))]
    pub company: String,
    #[validate(custom(function = "required_text"))]
    pub position: String,
    #[validate(custom(function = "validate_iso_date"))]
    pub start_date: String,
    /// Checked against `current` by the strict validator; the pair cannot be
    /// expressed as a single-field rule.
    pub end_date: String,
    pub current: bool,
    #[validate(custom(function = "validate_duties"))]
    pub duties: Vec<String>,
    pub reason_for_leaving: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[validate(custom(function = "required_text"))]
    pub institution: String,
    #[validate(custom(function = "required_text"))]
    pub qualification: String,
    #[validate(range(min = 1000, max = 9999, message = "Completion date must be a 4-digit year"))]
    pub completion_date: i32,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Skills {
    #[validate(custom(function = "validate_skill_entries"))]
    pub computer_skills: Vec<String>,
    #[validate(custom(function = "validate_skill_entries"))]
    pub other_skills: Vec<String>,
    #[validate(nested)]
    pub skills_matrix: Vec<SkillsMatrixEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsMatrixEntry {
    #[validate(custom(function = "required_text"))]
    pub skill: String,
    #[validate(range(min = 0.0, message = "Years of experience must not be negative"))]
    pub years_experience: f64,
    #[validate(custom(function = "validate_proficiency"))]
    pub proficiency: String,
    #[validate(range(min = 1000, max = 9999, message = "Last used must be a 4-digit year"))]
    pub last_used: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Case-insensitive, also accepts the one-letter forms extraction tends to produce.
    /// Stored values are always the canonical lowercase word.
    pub fn parse(raw: &str) -> Option<Gender> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Proficiency::Beginner => "beginner",
            Proficiency::Intermediate => "intermediate",
            Proficiency::Advanced => "advanced",
            Proficiency::Expert => "expert",
        }
    }

    pub fn parse(raw: &str) -> Option<Proficiency> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Proficiency::Beginner),
            "intermediate" => Some(Proficiency::Intermediate),
            "advanced" => Some(Proficiency::Advanced),
            "expert" => Some(Proficiency::Expert),
            _ => None,
        }
    }
}

/// The fixed availability vocabulary. Anything else non-empty is kept as free text.
pub const AVAILABILITY_OPTIONS: [&str; 7] = [
    "Immediately",
    "1 week notice",
    "2 weeks notice",
    "1 month notice",
    "2 months notice",
    "3 months notice",
    "Negotiable",
];

/// Maps a known availability label onto its canonical spelling.
pub fn canonical_availability(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    AVAILABILITY_OPTIONS
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(trimmed))
}

/// `""` and `"n/a"` (any case) stand for "no value" wherever a form carries text.
pub fn is_placeholder(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a")
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM` (first of the month) and RFC 3339 timestamps.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "This field is required"));
    }
    Ok(())
}

fn validate_job_title(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("required", "Job title is required"));
    }
    // Measured as stored; padding counts.
    if value.chars().count() > JOB_TITLE_MAX_CHARS {
        return Err(error("length", "Job title must be at most 21 characters"));
    }
    Ok(())
}

fn validate_executive_summary(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < EXECUTIVE_SUMMARY_MIN_CHARS {
        return Err(error(
            "length",
            "Executive summary must be at least 50 characters",
        ));
    }
    Ok(())
}

fn validate_email_address(value: &str) -> Result<(), ValidationError> {
    use validator::ValidateEmail;

    if value.trim().is_empty() {
        return Err(error("required", "Email is required"));
    }
    if !value.validate_email() {
        return Err(error("email", "Email address is not valid"));
    }
    Ok(())
}

fn validate_gender(value: &str) -> Result<(), ValidationError> {
    if Gender::parse(value).map(|g| g.as_str()) != Some(value) {
        return Err(error("enum", "Gender must be one of: male, female, other"));
    }
    Ok(())
}

fn validate_proficiency(value: &str) -> Result<(), ValidationError> {
    if Proficiency::parse(value).map(|p| p.as_str()) != Some(value) {
        return Err(error(
            "enum",
            "Proficiency must be one of: beginner, intermediate, advanced, expert",
        ));
    }
    Ok(())
}

fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    if parse_iso_date(value).is_none() {
        return Err(error("date", "Date must be in YYYY-MM-DD format"));
    }
    Ok(())
}

/// A lone blank row is the editing placeholder; any other blank duty is an error.
fn validate_duties(duties: &[String]) -> Result<(), ValidationError> {
    if duties.len() == 1 && duties[0].trim().is_empty() {
        return Ok(());
    }
    if duties.iter().any(|duty| duty.trim().is_empty()) {
        return Err(error("required", "Duties must not contain empty entries"));
    }
    Ok(())
}

fn validate_skill_entries(skills: &[String]) -> Result<(), ValidationError> {
    if skills.iter().any(|skill| skill.trim().is_empty()) {
        return Err(error("required", "Skills must not contain empty entries"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_date_shapes() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        assert_eq!(parse_iso_date("2021-03-01"), Some(expected));
        assert_eq!(parse_iso_date("2021-03"), Some(expected));
        assert_eq!(parse_iso_date("2021-03-01T09:30:00Z"), Some(expected));
        assert_eq!(parse_iso_date("March 2021"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn placeholder_detection_ignores_case_and_padding() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("  "));
        assert!(is_placeholder("N/A"));
        assert!(is_placeholder(" n/a "));
        assert!(!is_placeholder("2020-01-01"));
    }

    #[test]
    fn availability_labels_are_canonicalised() {
        assert_eq!(canonical_availability("negotiable"), Some("Negotiable"));
        assert_eq!(canonical_availability(" 1 MONTH NOTICE "), Some("1 month notice"));
        assert_eq!(canonical_availability("after the summer"), None);
    }

    #[test]
    fn default_personal_info_uses_canonical_availability() {
        assert_eq!(
            PersonalInfo::default().availability,
            AVAILABILITY_NOT_SPECIFIED
        );
    }

    #[test]
    fn enum_fields_only_accept_canonical_spellings() {
        assert!(validate_gender("female").is_ok());
        assert!(validate_gender("M").is_err());
        assert!(validate_gender(" male").is_err());
        assert!(validate_proficiency("expert").is_ok());
        assert!(validate_proficiency("EXPERT").is_err());
    }

    #[test]
    fn job_title_length_counts_padding() {
        assert!(validate_job_title("Senior Data Scientist").is_ok());
        assert!(validate_job_title("  Senior Data Scientist  ").is_err());
    }

    #[test]
    fn single_blank_duty_row_is_accepted_but_mixed_blanks_are_not() {
        assert!(validate_duties(&["".to_string()]).is_ok());
        assert!(validate_duties(&[]).is_ok());
        assert!(validate_duties(&["Led a team".to_string(), " ".to_string()]).is_err());
    }
}
