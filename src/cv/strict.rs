//! Submission-ready CV validation.
//!
//! Validation is exhaustive: every violated rule is reported in one pass.

use serde_json::Value as JsonValue;
use validator::Validate;

use super::form::{is_placeholder, parse_iso_date, CvForm};
use super::report::ValidationReport;

/// Checks a typed form against every strict rule.
pub fn validate_strict(form: &CvForm) -> Result<(), ValidationReport> {
    let mut report = match form.validate() {
        Ok(()) => ValidationReport::new(),
        Err(errors) => ValidationReport::from(&errors),
    };
    check_work_dates(form, &mut report);
    report.into_result()
}

/// Parses an arbitrary JSON object as form data and validates it.
///
/// Missing keys take their empty defaults and are then reported by the
/// strict rules. A value of the wrong JSON type cannot be checked further and
/// is reported as a single `data` error.
pub fn validate_value(value: &JsonValue) -> Result<CvForm, ValidationReport> {
    let form = parse_form(value)?;
    validate_strict(&form)?;
    Ok(form)
}

pub fn parse_form(value: &JsonValue) -> Result<CvForm, ValidationReport> {
    if !value.is_object() {
        return Err(ValidationReport::single("data", "CV data must be a JSON object"));
    }
    serde_json::from_value::<CvForm>(value.clone())
        .map_err(|e| ValidationReport::single("data", format!("Malformed CV data: {}", e)))
}

fn check_work_dates(form: &CvForm, report: &mut ValidationReport) {
    for (index, entry) in form.work_experience.iter().enumerate() {
        let path = format!("workExperience[{}].endDate", index);
        if entry.current {
            if !is_placeholder(&entry.end_date) && parse_iso_date(&entry.end_date).is_none() {
                report.push(path, "Date must be in YYYY-MM-DD format");
            }
            continue;
        }

        match parse_iso_date(&entry.end_date) {
            None => report.push(path, "End date is required unless this is the current position"),
            Some(end) => {
                if let Some(start) = parse_iso_date(&entry.start_date) {
                    if end < start {
                        report.push(path, "End date must not be before start date");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::form::WorkExperience;
    use crate::cv::test_support::complete_form;
    use serde_json::json;

    #[test]
    fn complete_form_passes() {
        assert!(validate_strict(&complete_form()).is_ok());
    }

    #[test]
    fn reports_every_violation_in_one_pass() {
        let mut form = complete_form();
        form.job_title = "".into();
        form.executive_summary = "Too short".into();
        form.personal_info.email = "not-an-email".into();
        form.personal_info.nationality = "  ".into();
        form.personal_info.expected_salary = -1.0;

        let report = validate_strict(&form).unwrap_err();
        for path in [
            "jobTitle",
            "executiveSummary",
            "personalInfo.email",
            "personalInfo.nationality",
            "personalInfo.expectedSalary",
        ] {
            assert!(report.has_path(path), "missing {path} in {report:?}");
        }
        assert_eq!(report.len(), 5);
    }

    #[test]
    fn job_title_is_limited_to_21_characters() {
        let mut form = complete_form();
        form.job_title = "Principal Platform Engineer".into();
        let report = validate_strict(&form).unwrap_err();
        assert!(report.has_path("jobTitle"));

        form.job_title = "Senior Data Scientist".into();
        assert_eq!(form.job_title.chars().count(), 21);
        assert!(validate_strict(&form).is_ok());
    }

    #[test]
    fn enum_fields_are_restricted() {
        let mut form = complete_form();
        form.personal_info.gender = "unknown".into();
        form.skills.skills_matrix[0].proficiency = "guru".into();
        let report = validate_strict(&form).unwrap_err();
        assert!(report.has_path("personalInfo.gender"));
        assert!(report.has_path("skills.skillsMatrix[0].proficiency"));
    }

    #[test]
    fn nested_list_errors_carry_their_index() {
        let mut form = complete_form();
        form.work_experience.push(WorkExperience {
            company: "".into(),
            position: "Intern".into(),
            start_date: "n/a".into(),
            end_date: "2018-01-01".into(),
            current: false,
            duties: vec!["Fixed bugs".into(), "".into()],
            reason_for_leaving: "Contract ended".into(),
        });
        let report = validate_strict(&form).unwrap_err();
        assert!(report.has_path("workExperience[1].company"));
        assert!(report.has_path("workExperience[1].startDate"));
        assert!(report.has_path("workExperience[1].duties"));
    }

    #[test]
    fn past_positions_need_an_end_date_after_the_start() {
        let mut form = complete_form();
        form.work_experience[0].current = false;
        let report = validate_strict(&form).unwrap_err();
        assert!(report.has_path("workExperience[0].endDate"));

        form.work_experience[0].end_date = "2018-12-31".into();
        let report = validate_strict(&form).unwrap_err();
        assert_eq!(
            report.first().map(|e| e.message.as_str()),
            Some("End date must not be before start date")
        );

        form.work_experience[0].end_date = "2023-06-30".into();
        assert!(validate_strict(&form).is_ok());
    }

    #[test]
    fn education_year_must_have_four_digits() {
        let mut form = complete_form();
        form.education[0].completion_date = 0;
        let report = validate_strict(&form).unwrap_err();
        assert!(report.has_path("education[0].completionDate"));
    }

    #[test]
    fn validate_value_reports_missing_sections_as_required_fields() {
        let report = validate_value(&json!({ "jobTitle": "Chef" })).unwrap_err();
        assert!(report.has_path("executiveSummary"));
        assert!(report.has_path("personalInfo.firstName"));
        assert!(report.has_path("personalInfo.email"));
    }

    #[test]
    fn validate_value_rejects_wrongly_typed_values() {
        let report = validate_value(&json!({ "personalInfo": { "currentSalary": "lots" } }))
            .unwrap_err();
        assert_eq!(report.len(), 1);
        assert!(report.errors()[0].message.starts_with("Malformed CV data"));
    }

    #[test]
    fn validate_value_rejects_non_objects() {
        assert!(validate_value(&json!(["not", "a", "cv"])).is_err());
    }
}
