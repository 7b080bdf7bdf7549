use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CvStatus {
    Draft,
    Completed,
}

impl CvStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CvStatus::Draft => "draft",
            CvStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for CvStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CvStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(CvStatus::Draft),
            "completed" => Ok(CvStatus::Completed),
            other => Err(Error::BadRequest(format!("Unknown CV status: {}", other))),
        }
    }
}

/// What a save request has to do with the submitted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    /// Store as-is after lenient normalization.
    StoreDraft,
    /// Normalize placeholders and pass strict validation first.
    Complete,
}

/// Resolves a save against the CV's current status (`None` for a new CV).
///
/// A completed CV stays completed: editing it is a re-submission.
pub fn plan_save(current: Option<CvStatus>, requested: CvStatus) -> Result<SaveAction> {
    match (current, requested) {
        (Some(CvStatus::Completed), CvStatus::Draft) => Err(Error::Conflict(
            "A completed CV cannot be moved back to draft".to_string(),
        )),
        (_, CvStatus::Draft) => Ok(SaveAction::StoreDraft),
        (_, CvStatus::Completed) => Ok(SaveAction::Complete),
    }
}

pub fn ensure_owner(owner_id: Uuid, actor_id: Uuid) -> Result<()> {
    if owner_id != actor_id {
        return Err(Error::Forbidden(
            "Only the owner of this CV can change it".to_string(),
        ));
    }
    Ok(())
}
