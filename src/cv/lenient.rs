//! Best-effort normalization of drafts and AI extraction output.
//!
//! Nothing in here fails. Whatever the input looks like, the result is a
//! `CvForm` with every field populated: missing or placeholder text becomes
//! `""`, numbers `0`, flags `false`, lists `[]`, and availability falls back
//! to [`AVAILABILITY_NOT_SPECIFIED`].

use serde_json::{json, Map, Value as JsonValue};

use super::form::{
    canonical_availability, CvForm, Education, Gender, PersonalInfo, Proficiency, Skills,
    SkillsMatrixEntry, WorkExperience, AVAILABILITY_NOT_SPECIFIED,
};

const PLACEHOLDERS: [&str; 3] = ["n/a", "null", "undefined"];

pub fn normalize_lenient(raw: &JsonValue) -> CvForm {
    let empty = Map::new();
    let root = raw.as_object().unwrap_or(&empty);

    CvForm {
        job_title: text(field(root, "jobTitle")),
        executive_summary: text(field(root, "executiveSummary")),
        personal_info: personal_info(field(root, "personalInfo")),
        work_experience: objects(field(root, "workExperience"))
            .map(work_experience)
            .collect(),
        education: objects(field(root, "education")).map(education).collect(),
        skills: skills(field(root, "skills")),
    }
}

fn personal_info(raw: Option<&JsonValue>) -> PersonalInfo {
    let empty = Map::new();
    let obj = raw.and_then(|v| v.as_object()).unwrap_or(&empty);

    PersonalInfo {
        first_name: text(field(obj, "firstName")),
        last_name: text(field(obj, "lastName")),
        email: text(field(obj, "email")),
        phone: text(field(obj, "phone")),
        profession: text(field(obj, "profession")),
        location: text(field(obj, "location")),
        gender: Gender::parse(&text(field(obj, "gender")))
            .map(|g| g.as_str().to_string())
            .unwrap_or_default(),
        availability: availability(field(obj, "availability")),
        nationality: text(field(obj, "nationality")),
        current_salary: number(field(obj, "currentSalary")),
        expected_salary: number(field(obj, "expectedSalary")),
        drivers_license: flag(field(obj, "driversLicense")),
        id_number: text(field(obj, "idNumber")),
    }
}

fn work_experience(obj: &Map<String, JsonValue>) -> WorkExperience {
    WorkExperience {
        company: text(field(obj, "company")),
        position: text(field(obj, "position")),
        start_date: text(field(obj, "startDate")),
        end_date: text(field(obj, "endDate")),
        current: flag(field(obj, "current")),
        duties: text_list(field(obj, "duties")),
        reason_for_leaving: text(field(obj, "reasonForLeaving")),
    }
}

fn education(obj: &Map<String, JsonValue>) -> Education {
    Education {
        institution: text(field(obj, "institution")),
        qualification: text(field(obj, "qualification")),
        completion_date: year(field(obj, "completionDate")),
        completed: flag(field(obj, "completed")),
    }
}

fn skills(raw: Option<&JsonValue>) -> Skills {
    let empty = Map::new();
    let obj = raw.and_then(|v| v.as_object()).unwrap_or(&empty);

    Skills {
        computer_skills: text_list(field(obj, "computerSkills")),
        other_skills: text_list(field(obj, "otherSkills")),
        skills_matrix: objects(field(obj, "skillsMatrix"))
            .map(|entry| SkillsMatrixEntry {
                skill: text(field(entry, "skill")),
                years_experience: number(field(entry, "yearsExperience")),
                proficiency: Proficiency::parse(&text(field(entry, "proficiency")))
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default(),
                last_used: year(field(entry, "lastUsed")),
            })
            .collect(),
    }
}

/// Looks a key up by its camelCase name, falling back to snake_case.
fn field<'a>(obj: &'a Map<String, JsonValue>, camel: &str) -> Option<&'a JsonValue> {
    obj.get(camel).or_else(|| obj.get(&snake_case(camel)))
}

fn snake_case(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for ch in camel.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn objects(raw: Option<&JsonValue>) -> impl Iterator<Item = &Map<String, JsonValue>> {
    raw.and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|item| item.as_object())
}

fn text(raw: Option<&JsonValue>) -> String {
    let value = match raw {
        Some(JsonValue::String(s)) => s.trim().to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    };
    if PLACEHOLDERS.iter().any(|p| value.eq_ignore_ascii_case(p)) {
        String::new()
    } else {
        value
    }
}

/// Blank entries are dropped; a bare string is treated as a one-item list.
fn text_list(raw: Option<&JsonValue>) -> Vec<String> {
    match raw {
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|item| text(Some(item)))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(single @ JsonValue::String(_)) => {
            let value = text(Some(single));
            if value.is_empty() {
                vec![]
            } else {
                vec![value]
            }
        }
        _ => vec![],
    }
}

/// Negative amounts are clamped to zero.
fn number(raw: Option<&JsonValue>) -> f64 {
    let value = match raw {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    };
    value.max(0.0)
}

/// Takes the leading four digits of a string such as `"2019-06"`.
fn year(raw: Option<&JsonValue>) -> i32 {
    match raw {
        Some(JsonValue::Number(n)) => n
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .unwrap_or(0),
        Some(JsonValue::String(s)) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.len() == 4 {
                digits.parse().unwrap_or(0)
            } else {
                0
            }
        }
        _ => 0,
    }
}

fn flag(raw: Option<&JsonValue>) -> bool {
    match raw {
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        Some(JsonValue::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        _ => false,
    }
}

fn availability(raw: Option<&JsonValue>) -> String {
    let value = text(raw);
    if value.is_empty() {
        return AVAILABILITY_NOT_SPECIFIED.to_string();
    }
    canonical_availability(&value)
        .map(str::to_string)
        .unwrap_or(value)
}

/// Output contract handed to the extraction model alongside its instructions.
pub fn extraction_schema() -> JsonValue {
    json!({
        "type": "object",
        "description": "Structured CV. Omit any field that is not present in the document; never invent values.",
        "properties": {
            "jobTitle": { "type": "string", "maxLength": 21 },
            "executiveSummary": { "type": "string" },
            "personalInfo": {
                "type": "object",
                "properties": {
                    "firstName": { "type": "string" },
                    "lastName": { "type": "string" },
                    "email": { "type": "string" },
                    "phone": { "type": "string" },
                    "profession": { "type": "string" },
                    "location": { "type": "string" },
                    "gender": { "type": "string", "enum": ["male", "female", "other"] },
                    "availability": { "type": "string" },
                    "nationality": { "type": "string" },
                    "currentSalary": { "type": "number", "minimum": 0 },
                    "expectedSalary": { "type": "number", "minimum": 0 },
                    "driversLicense": { "type": "boolean" },
                    "idNumber": { "type": "string" }
                }
            },
            "workExperience": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "company": { "type": "string" },
                        "position": { "type": "string" },
                        "startDate": { "type": "string", "format": "date" },
                        "endDate": { "type": "string", "format": "date" },
                        "current": { "type": "boolean" },
                        "duties": { "type": "array", "items": { "type": "string" } },
                        "reasonForLeaving": { "type": "string" }
                    }
                }
            },
            "education": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "institution": { "type": "string" },
                        "qualification": { "type": "string" },
                        "completionDate": { "type": "integer", "description": "4-digit year" },
                        "completed": { "type": "boolean" }
                    }
                }
            },
            "skills": {
                "type": "object",
                "properties": {
                    "computerSkills": { "type": "array", "items": { "type": "string" } },
                    "otherSkills": { "type": "array", "items": { "type": "string" } },
                    "skillsMatrix": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "skill": { "type": "string" },
                                "yearsExperience": { "type": "number", "minimum": 0 },
                                "proficiency": {
                                    "type": "string",
                                    "enum": ["beginner", "intermediate", "advanced", "expert"]
                                },
                                "lastUsed": { "type": "integer", "description": "4-digit year" }
                            }
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_object_input_yields_a_fully_defaulted_form() {
        for raw in [JsonValue::Null, json!(42), json!("cv"), json!([1, 2])] {
            let form = normalize_lenient(&raw);
            assert_eq!(form, CvForm::default());
        }
    }

    #[test]
    fn missing_availability_becomes_not_specified() {
        let form = normalize_lenient(&json!({ "personalInfo": { "firstName": "Ana" } }));
        assert_eq!(form.personal_info.availability, "Not specified");

        let form = normalize_lenient(&json!({ "personalInfo": { "availability": null } }));
        assert_eq!(form.personal_info.availability, "Not specified");

        let form = normalize_lenient(&json!({ "personalInfo": { "availability": "" } }));
        assert_eq!(form.personal_info.availability, "Not specified");
    }

    #[test]
    fn placeholders_and_nulls_become_empty_values() {
        let form = normalize_lenient(&json!({
            "jobTitle": "N/A",
            "personalInfo": {
                "nationality": "n/a",
                "email": null,
                "currentSalary": "N/A",
                "driversLicense": null,
                "gender": "unknown"
            },
            "workExperience": [{ "company": "Acme", "endDate": "N/A", "duties": null }]
        }));

        assert_eq!(form.job_title, "");
        assert_eq!(form.personal_info.nationality, "");
        assert_eq!(form.personal_info.email, "");
        assert_eq!(form.personal_info.current_salary, 0.0);
        assert!(!form.personal_info.drivers_license);
        assert_eq!(form.personal_info.gender, "");
        assert_eq!(form.work_experience[0].end_date, "");
        assert!(form.work_experience[0].duties.is_empty());
    }

    #[test]
    fn loosely_typed_values_are_coerced() {
        let form = normalize_lenient(&json!({
            "personal_info": {
                "first_name": "Sipho",
                "expected_salary": "R 45,000",
                "drivers_license": "yes",
                "gender": "M",
                "availability": "negotiable"
            },
            "education": [{ "institution": "Wits", "completion_date": "2015-11" }],
            "skills": { "computerSkills": "Excel", "skillsMatrix": [{ "skill": "SQL", "proficiency": "Expert", "lastUsed": 2023 }] }
        }));

        assert_eq!(form.personal_info.first_name, "Sipho");
        assert_eq!(form.personal_info.expected_salary, 45000.0);
        assert!(form.personal_info.drivers_license);
        assert_eq!(form.personal_info.gender, "male");
        assert_eq!(form.personal_info.availability, "Negotiable");
        assert_eq!(form.education[0].completion_date, 2015);
        assert_eq!(form.skills.computer_skills, vec!["Excel".to_string()]);
        assert_eq!(form.skills.skills_matrix[0].proficiency, "expert");
    }

    #[test]
    fn out_of_range_years_become_zero() {
        let form = normalize_lenient(&json!({
            "education": [{ "institution": "UCT", "completionDate": 4_294_969_306_i64 }],
            "skills": { "skillsMatrix": [{ "skill": "SQL", "lastUsed": -9_999_999_999_i64 }] }
        }));
        assert_eq!(form.education[0].completion_date, 0);
        assert_eq!(form.skills.skills_matrix[0].last_used, 0);
    }

    #[test]
    fn free_text_availability_is_kept() {
        let form = normalize_lenient(&json!({ "personalInfo": { "availability": "After June" } }));
        assert_eq!(form.personal_info.availability, "After June");
    }

    #[test]
    fn non_object_list_items_are_skipped_and_blank_strings_dropped() {
        let form = normalize_lenient(&json!({
            "workExperience": ["junk", { "company": "Acme", "duties": ["", "Ran payroll", "n/a"] }],
            "skills": { "otherSkills": ["", "Leadership"] }
        }));
        assert_eq!(form.work_experience.len(), 1);
        assert_eq!(form.work_experience[0].duties, vec!["Ran payroll".to_string()]);
        assert_eq!(form.skills.other_skills, vec!["Leadership".to_string()]);
    }

    #[test]
    fn normalized_output_serializes_every_declared_field() {
        let value = serde_json::to_value(normalize_lenient(&json!({}))).unwrap();
        let personal = value["personalInfo"].as_object().unwrap();
        for key in [
            "firstName",
            "lastName",
            "email",
            "phone",
            "profession",
            "location",
            "gender",
            "availability",
            "nationality",
            "currentSalary",
            "expectedSalary",
            "driversLicense",
            "idNumber",
        ] {
            assert!(personal.contains_key(key), "{key} missing");
            assert!(!personal[key].is_null(), "{key} is null");
        }
        assert!(value["workExperience"].is_array());
        assert!(value["skills"]["skillsMatrix"].is_array());
    }
}
