//! The multi-step CV builder as an explicit value.
//!
//! A session is plain data. Each wizard step produces a `StepUpdate`, and
//! `FormSession::apply` returns the next session; saving and resuming are
//! explicit JSON round-trips at the boundary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::form::{CvForm, Education, PersonalInfo, Skills, WorkExperience};
use super::promotion::{dedup_education, dedup_work_experience, ensure_duty_row};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    ExecutiveSummary,
    PersonalInfo,
    WorkHistory,
    Education,
    Skills,
    Review,
}

impl FormStep {
    pub fn next(self) -> FormStep {
        match self {
            FormStep::ExecutiveSummary => FormStep::PersonalInfo,
            FormStep::PersonalInfo => FormStep::WorkHistory,
            FormStep::WorkHistory => FormStep::Education,
            FormStep::Education => FormStep::Skills,
            FormStep::Skills | FormStep::Review => FormStep::Review,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSession {
    pub step: FormStep,
    pub data: CvForm,
    pub ai_assisted: bool,
    #[serde(default)]
    pub cv_id: Option<Uuid>,
    #[serde(default)]
    pub source_job_seeker_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StepUpdate {
    ExecutiveSummary {
        #[serde(rename = "jobTitle")]
        job_title: String,
        #[serde(rename = "executiveSummary")]
        executive_summary: String,
    },
    PersonalInfo(PersonalInfo),
    WorkHistory(Vec<WorkExperience>),
    Education(Vec<Education>),
    Skills(Skills),
    /// Replaces all data at once, e.g. with extraction output.
    SetAll(CvForm),
    GoTo(FormStep),
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    pub fn new() -> Self {
        Self {
            step: FormStep::ExecutiveSummary,
            data: CvForm::default(),
            ai_assisted: false,
            cv_id: None,
            source_job_seeker_id: None,
        }
    }

    /// A session pre-filled from AI extraction, flagged as AI-assisted.
    pub fn from_extracted(form: CvForm) -> Self {
        let mut session = Self::new().apply(StepUpdate::SetAll(form));
        session.ai_assisted = true;
        session.step = FormStep::ExecutiveSummary;
        session
    }

    pub fn apply(mut self, update: StepUpdate) -> Self {
        match update {
            StepUpdate::ExecutiveSummary {
                job_title,
                executive_summary,
            } => {
                self.data.job_title = job_title;
                self.data.executive_summary = executive_summary;
                self.step = FormStep::ExecutiveSummary.next();
            }
            StepUpdate::PersonalInfo(info) => {
                self.data.personal_info = info;
                self.step = FormStep::PersonalInfo.next();
            }
            StepUpdate::WorkHistory(entries) => {
                self.data.work_experience = prepare_work_history(entries);
                self.step = FormStep::WorkHistory.next();
            }
            StepUpdate::Education(entries) => {
                self.data.education = dedup_education(entries);
                self.step = FormStep::Education.next();
            }
            StepUpdate::Skills(skills) => {
                self.data.skills = skills;
                self.step = FormStep::Skills.next();
            }
            StepUpdate::SetAll(mut form) => {
                form.work_experience = prepare_work_history(form.work_experience);
                form.education = dedup_education(form.education);
                self.data = form;
            }
            StepUpdate::GoTo(step) => self.step = step,
        }
        self
    }

    pub fn save(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn load(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

fn prepare_work_history(entries: Vec<WorkExperience>) -> Vec<WorkExperience> {
    let mut entries = dedup_work_experience(entries);
    for entry in &mut entries {
        ensure_duty_row(&mut entry.duties);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cv::form::AVAILABILITY_NOT_SPECIFIED;
    use serde_json::json;

    fn job(company: &str) -> WorkExperience {
        WorkExperience {
            company: company.into(),
            position: "Analyst".into(),
            start_date: "2020-01-01".into(),
            ..WorkExperience::default()
        }
    }

    #[test]
    fn new_session_starts_at_the_first_step_with_canonical_defaults() {
        let session = FormSession::new();
        assert_eq!(session.step, FormStep::ExecutiveSummary);
        assert_eq!(session.data.personal_info.availability, AVAILABILITY_NOT_SPECIFIED);
        assert!(!session.ai_assisted);
    }

    #[test]
    fn steps_advance_through_the_wizard() {
        let session = FormSession::new()
            .apply(StepUpdate::ExecutiveSummary {
                job_title: "Analyst".into(),
                executive_summary: "Summary".into(),
            })
            .apply(StepUpdate::PersonalInfo(PersonalInfo::default()));
        assert_eq!(session.step, FormStep::WorkHistory);
        assert_eq!(session.data.job_title, "Analyst");

        let session = session
            .apply(StepUpdate::WorkHistory(vec![]))
            .apply(StepUpdate::Education(vec![]))
            .apply(StepUpdate::Skills(Skills::default()));
        assert_eq!(session.step, FormStep::Review);
    }

    #[test]
    fn work_history_is_deduplicated_and_gets_duty_rows() {
        let session =
            FormSession::new().apply(StepUpdate::WorkHistory(vec![job("Acme"), job("Acme"), job("Globex")]));
        assert_eq!(session.data.work_experience.len(), 2);
        assert!(session
            .data
            .work_experience
            .iter()
            .all(|e| e.duties == vec![String::new()]));
    }

    #[test]
    fn extracted_sessions_are_flagged_and_deduplicated() {
        let mut form = CvForm::default();
        form.work_experience = vec![job("Acme"), job("Acme")];
        let session = FormSession::from_extracted(form);
        assert!(session.ai_assisted);
        assert_eq!(session.data.work_experience.len(), 1);
    }

    #[test]
    fn sessions_survive_a_save_and_load() {
        let session = FormSession::new()
            .apply(StepUpdate::GoTo(FormStep::Skills))
            .apply(StepUpdate::WorkHistory(vec![job("Acme")]));
        let restored = FormSession::load(&session.save().unwrap()).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn step_updates_use_a_tagged_wire_format() {
        let update: StepUpdate = serde_json::from_value(json!({
            "kind": "executive_summary",
            "value": { "jobTitle": "Chef", "executiveSummary": "Cooks" }
        }))
        .unwrap();
        assert_eq!(
            update,
            StepUpdate::ExecutiveSummary {
                job_title: "Chef".into(),
                executive_summary: "Cooks".into()
            }
        );

        let update: StepUpdate =
            serde_json::from_value(json!({ "kind": "go_to", "value": "education" })).unwrap();
        assert_eq!(update, StepUpdate::GoTo(FormStep::Education));
    }
}
