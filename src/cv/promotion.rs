//! Draft completion: the single boundary where placeholder values are turned
//! into canonical ones before the strict rules run.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::HashSet;

use super::form::{
    format_iso_date, parse_iso_date, CvForm, Education, Gender, Proficiency, WorkExperience,
};
use super::report::ValidationReport;
use super::strict::validate_strict;

/// Days added to today for an end date the user never supplied.
pub const END_DATE_FALLBACK_DAYS: u64 = 365;

/// A date filled in on the user's behalf. These are UI-forgiving defaults,
/// not business dates, so each one is reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutedDate {
    pub path: String,
    pub original: String,
    pub substituted: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Promotion {
    pub form: CvForm,
    pub substituted_dates: Vec<SubstitutedDate>,
}

/// Normalizes a staged form and re-validates it against the strict schema.
pub fn promote(form: CvForm, today: NaiveDate) -> Result<Promotion, ValidationReport> {
    let promotion = prepare(form, today);
    validate_strict(&promotion.form)?;
    Ok(promotion)
}

/// Applies the completion-time normalization rules without validating.
pub fn prepare(mut form: CvForm, today: NaiveDate) -> Promotion {
    tidy_text(&mut form);
    let mut substituted_dates = Vec::new();
    let fallback_end = today
        .checked_add_days(Days::new(END_DATE_FALLBACK_DAYS))
        .unwrap_or(today);

    for (index, entry) in form.work_experience.iter_mut().enumerate() {
        match parse_iso_date(&entry.start_date) {
            Some(date) => entry.start_date = format_iso_date(date),
            None => {
                let substituted = format_iso_date(today);
                substituted_dates.push(SubstitutedDate {
                    path: format!("workExperience[{}].startDate", index),
                    original: entry.start_date.clone(),
                    substituted: substituted.clone(),
                });
                entry.start_date = substituted;
            }
        }

        match parse_iso_date(&entry.end_date) {
            Some(date) => entry.end_date = format_iso_date(date),
            // A current position has no end; keep the canonical absent value.
            None if entry.current => entry.end_date = String::new(),
            None => {
                let substituted = format_iso_date(fallback_end);
                substituted_dates.push(SubstitutedDate {
                    path: format!("workExperience[{}].endDate", index),
                    original: entry.end_date.clone(),
                    substituted: substituted.clone(),
                });
                entry.end_date = substituted;
            }
        }

        ensure_duty_row(&mut entry.duties);
    }

    Promotion {
        form,
        substituted_dates,
    }
}

/// Trims every free-text field and rewrites recognised enum spellings
/// (`"M"`, `"EXPERT"`) to their canonical form. Unrecognised values are left
/// for the strict rules to reject.
fn tidy_text(form: &mut CvForm) {
    trim(&mut form.job_title);
    trim(&mut form.executive_summary);

    let info = &mut form.personal_info;
    for field in [
        &mut info.first_name,
        &mut info.last_name,
        &mut info.email,
        &mut info.phone,
        &mut info.profession,
        &mut info.location,
        &mut info.gender,
        &mut info.availability,
        &mut info.nationality,
        &mut info.id_number,
    ] {
        trim(field);
    }
    if let Some(gender) = Gender::parse(&info.gender) {
        info.gender = gender.as_str().to_string();
    }

    for entry in &mut form.work_experience {
        trim(&mut entry.company);
        trim(&mut entry.position);
        trim(&mut entry.reason_for_leaving);
        entry.duties.iter_mut().for_each(trim);
    }
    for entry in &mut form.education {
        trim(&mut entry.institution);
        trim(&mut entry.qualification);
    }

    let skills = &mut form.skills;
    skills.computer_skills.iter_mut().for_each(trim);
    skills.other_skills.iter_mut().for_each(trim);
    for entry in &mut skills.skills_matrix {
        trim(&mut entry.skill);
        trim(&mut entry.proficiency);
        if let Some(level) = Proficiency::parse(&entry.proficiency) {
            entry.proficiency = level.as_str().to_string();
        }
    }
}

fn trim(value: &mut String) {
    if value.trim().len() != value.len() {
        *value = value.trim().to_string();
    }
}

/// List editors always need a row to type into.
pub fn ensure_duty_row(duties: &mut Vec<String>) {
    if duties.is_empty() {
        duties.push(String::new());
    }
}

/// Keeps the first entry for each (company, position, start date).
pub fn dedup_work_experience(entries: Vec<WorkExperience>) -> Vec<WorkExperience> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert((key(&e.company), key(&e.position), key(&e.start_date))))
        .collect()
}

/// Keeps the first entry for each (institution, qualification, completion year).
pub fn dedup_education(entries: Vec<Education>) -> Vec<Education> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| {
            seen.insert((
                key(&e.institution),
                key(&e.qualification),
                e.completion_date,
            ))
        })
        .collect()
}

fn key(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::test_support::complete_form;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn job(company: &str, position: &str, start: &str) -> WorkExperience {
        WorkExperience {
            company: company.into(),
            position: position.into(),
            start_date: start.into(),
            ..WorkExperience::default()
        }
    }

    #[test]
    fn placeholder_start_dates_default_to_today() {
        let mut form = complete_form();
        form.work_experience[0].start_date = "N/A".into();
        let promotion = prepare(form, today());
        assert_eq!(promotion.form.work_experience[0].start_date, "2026-10-18");
        assert_eq!(
            promotion.substituted_dates,
            vec![SubstitutedDate {
                path: "workExperience[0].startDate".into(),
                original: "N/A".into(),
                substituted: "2026-10-18".into(),
            }]
        );
    }

    #[test]
    fn placeholder_end_dates_default_to_a_year_ahead_for_past_positions() {
        let mut form = complete_form();
        form.work_experience[0].current = false;
        form.work_experience[0].end_date = "".into();
        let promotion = prepare(form, today());
        assert_eq!(promotion.form.work_experience[0].end_date, "2027-10-18");
        assert_eq!(promotion.substituted_dates.len(), 1);
    }

    #[test]
    fn current_positions_keep_an_absent_end_date() {
        let mut form = complete_form();
        form.work_experience[0].end_date = "n/a".into();
        let promotion = prepare(form, today());
        assert_eq!(promotion.form.work_experience[0].end_date, "");
        assert!(promotion.substituted_dates.is_empty());
    }

    #[test]
    fn real_dates_are_kept_and_canonicalised() {
        let mut form = complete_form();
        form.work_experience[0].start_date = "2019-02".into();
        let promotion = prepare(form, today());
        assert_eq!(promotion.form.work_experience[0].start_date, "2019-02-01");
        assert!(promotion.substituted_dates.is_empty());
    }

    #[test]
    fn empty_duties_get_a_single_placeholder_row() {
        let mut form = complete_form();
        form.work_experience[0].duties.clear();
        let promotion = promote(form, today()).expect("placeholder row is valid");
        assert_eq!(promotion.form.work_experience[0].duties, vec![String::new()]);
    }

    #[test]
    fn promotion_rejects_forms_with_missing_required_fields() {
        let mut form = complete_form();
        form.personal_info.id_number = "".into();
        let report = promote(form, today()).unwrap_err();
        assert_eq!(report.first().map(|e| e.path.as_str()), Some("personalInfo.idNumber"));
    }

    #[test]
    fn enum_spellings_are_canonicalised_before_validation() {
        let mut form = complete_form();
        form.personal_info.gender = "M".into();
        form.skills.skills_matrix[0].proficiency = " EXPERT ".into();

        let promotion = promote(form, today()).expect("canonical spellings are valid");
        assert_eq!(promotion.form.personal_info.gender, "male");
        assert_eq!(promotion.form.skills.skills_matrix[0].proficiency, "expert");
    }

    #[test]
    fn unknown_enum_values_are_still_rejected() {
        let mut form = complete_form();
        form.personal_info.gender = "unspecified".into();
        let report = promote(form, today()).unwrap_err();
        assert!(report.has_path("personalInfo.gender"));
    }

    #[test]
    fn text_is_trimmed_before_length_rules_run() {
        let mut form = complete_form();
        form.job_title = "  Senior Data Scientist  ".into();
        form.personal_info.email = " thandi@example.com ".into();

        let promotion = promote(form, today()).expect("trimmed title fits");
        assert_eq!(promotion.form.job_title, "Senior Data Scientist");
        assert_eq!(promotion.form.personal_info.email, "thandi@example.com");
    }

    #[test]
    fn work_experience_dedup_keeps_first_occurrence() {
        let mut first = job("Acme", "Developer", "2020-01-01");
        first.reason_for_leaving = "first".into();
        let mut duplicate = job("Acme", "Developer", "2020-01-01");
        duplicate.reason_for_leaving = "second".into();
        let other = job("Acme", "Developer", "2021-01-01");

        let result = dedup_work_experience(vec![first, duplicate, other]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].reason_for_leaving, "first");
        assert_eq!(result[1].start_date, "2021-01-01");
    }

    #[test]
    fn education_dedup_uses_institution_qualification_and_year() {
        let entry = |institution: &str, year: i32| Education {
            institution: institution.into(),
            qualification: "BCom".into(),
            completion_date: year,
            completed: true,
        };
        let result = dedup_education(vec![
            entry("UNISA", 2010),
            entry("unisa ", 2010),
            entry("UNISA", 2012),
        ]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].institution, "UNISA");
    }
}
