use chrono::NaiveDate;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use cv_portal_backend::cv::external::NOT_SPECIFIED;
use cv_portal_backend::cv::form::{Education, SkillsMatrixEntry, AVAILABILITY_NOT_SPECIFIED};
use cv_portal_backend::cv::lifecycle::ensure_owner;
use cv_portal_backend::cv::{
    normalize_lenient, promote, to_external_payload, validate_strict, CvForm, FormSession,
    StepUpdate,
};
use cv_portal_backend::error::Error;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

fn complete_json() -> JsonValue {
    json!({
        "jobTitle": "Project Manager",
        "executiveSummary": "Project manager with a decade of experience delivering construction programmes on time.",
        "personalInfo": {
            "firstName": "Naledi",
            "lastName": "Khumalo",
            "email": "naledi@example.com",
            "phone": "+27 11 555 0199",
            "profession": "Project Manager",
            "location": "Johannesburg",
            "gender": "female",
            "availability": "Immediately",
            "nationality": "South African",
            "currentSalary": 0,
            "expectedSalary": 48000,
            "driversLicense": true,
            "idNumber": "8805050123081"
        },
        "workExperience": [{
            "company": "BuildRight",
            "position": "Project Manager",
            "startDate": "2016-03-01",
            "endDate": "",
            "current": true,
            "duties": ["Ran site programmes"],
            "reasonForLeaving": ""
        }],
        "education": [{
            "institution": "Wits",
            "qualification": "BSc Construction Management",
            "completionDate": 2012,
            "completed": true
        }],
        "skills": {
            "computerSkills": ["MS Project"],
            "otherSkills": ["Negotiation"],
            "skillsMatrix": [{
                "skill": "Scheduling",
                "yearsExperience": 10,
                "proficiency": "expert",
                "lastUsed": 2026
            }]
        }
    })
}

fn complete_form() -> CvForm {
    serde_json::from_value(complete_json()).expect("fixture matches the form schema")
}

#[test]
fn transforming_twice_gives_the_same_payload() {
    let form = complete_form();
    assert_eq!(to_external_payload(&form), to_external_payload(&form));
}

#[test]
fn lenient_normalization_is_total() {
    let inputs = [
        JsonValue::Null,
        json!([]),
        json!("just text"),
        json!({ "personalInfo": 42 }),
        json!({ "workExperience": [null, 7, { "company": 12, "duties": "Managed" }] }),
        json!({ "skills": { "skillsMatrix": [{ "yearsExperience": "-3" }] } }),
    ];
    for input in inputs {
        let form = normalize_lenient(&input);
        let value = serde_json::to_value(&form).expect("form serializes");
        for key in ["jobTitle", "executiveSummary", "personalInfo", "workExperience", "education", "skills"] {
            assert!(value.get(key).is_some(), "{key} missing for {input}");
        }
        assert!(value["personalInfo"]["availability"].is_string());
    }
}

#[test]
fn required_external_fields_are_never_empty() {
    let mut form = complete_form();
    form.personal_info.nationality = String::new();
    form.work_experience[0].reason_for_leaving = String::new();

    let payload = to_external_payload(&form);
    assert_eq!(payload.personal_info.nationality, NOT_SPECIFIED);
    assert_eq!(payload.work_experience[0].reason_for_leaving, NOT_SPECIFIED);

    let value = serde_json::to_value(&payload).expect("payload serializes");
    let info = value["personal_info"].as_object().expect("object");
    for (key, field) in info {
        if let Some(text) = field.as_str() {
            assert!(!text.is_empty(), "{key} is empty");
        }
    }
}

#[test]
fn current_positions_send_a_null_end_date() {
    let mut form = complete_form();
    form.work_experience[0].current = true;
    form.work_experience[0].end_date = "2024-01-01".into();

    let value = serde_json::to_value(to_external_payload(&form)).expect("payload serializes");
    assert!(value["work_experience"][0]["end_date"].is_null());
}

#[test]
fn bulk_set_keeps_the_first_duplicate() {
    let mut form = complete_form();
    let mut duplicate = form.work_experience[0].clone();
    duplicate.reason_for_leaving = "second copy".into();
    form.work_experience.push(duplicate);

    let session = FormSession::new().apply(StepUpdate::SetAll(form));
    assert_eq!(session.data.work_experience.len(), 1);
    assert_eq!(session.data.work_experience[0].reason_for_leaving, "");
}

#[test]
fn a_partial_draft_completes_once_the_gaps_are_filled() {
    let draft = normalize_lenient(&json!({
        "jobTitle": "Project Manager",
        "personalInfo": { "firstName": "Naledi", "email": "naledi@example.com" },
        "workExperience": [{ "company": "BuildRight", "position": "Project Manager", "startDate": "N/A" }]
    }));
    assert!(validate_strict(&draft).is_err());

    let mut completed = draft;
    let full = complete_form();
    completed.executive_summary = full.executive_summary.clone();
    completed.personal_info = full.personal_info.clone();
    completed.education = full.education.clone();
    completed.skills = full.skills.clone();
    completed.work_experience[0].duties = vec!["Ran site programmes".into()];

    let promotion = promote(completed, today()).expect("completion succeeds");
    assert_eq!(promotion.form.work_experience[0].start_date, "2026-10-18");
    assert_eq!(promotion.substituted_dates.len(), 2);
}

#[test]
fn completion_names_the_missing_field() {
    let mut form = complete_form();
    form.personal_info.phone = String::new();
    let report = promote(form, today()).expect_err("phone is required");
    assert!(report.has_path("personalInfo.phone"), "{report}");
}

#[test]
fn only_the_owner_may_mutate() {
    let owner = Uuid::new_v4();
    for _ in 0..16 {
        let actor = Uuid::new_v4();
        assert!(matches!(ensure_owner(owner, actor), Err(Error::Forbidden(_))));
    }
    assert!(ensure_owner(owner, owner).is_ok());
}

#[test]
fn blank_duties_are_dropped_from_the_payload() {
    let mut form = complete_form();
    form.work_experience[0].duties = vec!["".into(), "Managed a team".into(), "".into()];
    let payload = to_external_payload(&form);
    assert_eq!(payload.work_experience[0].duties, vec!["Managed a team".to_string()]);
}

#[test]
fn availability_defaults_to_not_specified() {
    let form = normalize_lenient(&json!({ "personalInfo": { "firstName": "Naledi" } }));
    assert_eq!(form.personal_info.availability, AVAILABILITY_NOT_SPECIFIED);

    let mut strict = complete_form();
    strict.personal_info.availability = String::new();
    assert_eq!(to_external_payload(&strict).personal_info.availability, NOT_SPECIFIED);
}

#[test]
fn zero_salary_passes_through() {
    let form = complete_form();
    assert_eq!(form.personal_info.current_salary, 0.0);
    assert_eq!(to_external_payload(&form).personal_info.current_salary, 0.0);
}

#[test]
fn numeric_fields_are_not_string_defaulted() {
    let mut form = complete_form();
    form.education = vec![Education {
        institution: "Wits".into(),
        qualification: "MSc".into(),
        completion_date: 2015,
        completed: false,
    }];
    form.skills.skills_matrix = vec![SkillsMatrixEntry {
        skill: "Budgeting".into(),
        years_experience: 0.0,
        proficiency: "beginner".into(),
        last_used: 2020,
    }];
    let value = serde_json::to_value(to_external_payload(&form)).expect("payload serializes");
    assert_eq!(value["education"][0]["completion_date"], json!(2015));
    assert_eq!(value["skills"]["skills_matrix"][0]["years_experience"], json!(0.0));
}
