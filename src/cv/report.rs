use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Every violation found in one validation pass, addressed by field path
/// (`personalInfo.email`, `workExperience[1].startDate`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.push(path, message);
        report
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// Orders errors by path so repeated runs report identically.
    pub fn sorted(mut self) -> Self {
        self.errors
            .sort_by(|a, b| path_sort_key(&a.path).cmp(&path_sort_key(&b.path)));
        self
    }

    pub fn into_result(self) -> Result<(), ValidationReport> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.sorted())
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.split_first() {
            None => write!(f, "no validation errors"),
            Some((first, [])) => write!(f, "{}: {}", first.path, first.message),
            Some((first, rest)) => write!(
                f,
                "{}: {} (and {} more)",
                first.path,
                first.message,
                rest.len()
            ),
        }
    }
}

impl From<&ValidationErrors> for ValidationReport {
    fn from(errors: &ValidationErrors) -> Self {
        let mut report = ValidationReport::new();
        flatten(errors, "", &mut report);
        report.sorted()
    }
}

fn flatten(errors: &ValidationErrors, prefix: &str, report: &mut ValidationReport) {
    for (field, kind) in errors.errors() {
        let path = join_path(prefix, &camel_case(&field.to_string()));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    report.push(path.clone(), message);
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten(inner, &path, report),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten(inner, &format!("{}[{}]", path, index), report);
                }
            }
        }
    }
}

fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// `personal_info` -> `personalInfo`; already camel-cased names pass through.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Numeric list indices sort numerically, so `[2]` precedes `[10]`.
fn path_sort_key(path: &str) -> Vec<(String, usize)> {
    path.split('.')
        .map(|segment| match segment.split_once('[') {
            Some((name, rest)) => {
                let index = rest.trim_end_matches(']').parse().unwrap_or(usize::MAX);
                (name.to_string(), index)
            }
            None => (segment.to_string(), 0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_cases_rust_field_names() {
        assert_eq!(camel_case("personal_info"), "personalInfo");
        assert_eq!(camel_case("id_number"), "idNumber");
        assert_eq!(camel_case("email"), "email");
        assert_eq!(camel_case("skillsMatrix"), "skillsMatrix");
    }

    #[test]
    fn display_names_the_first_error() {
        let mut report = ValidationReport::new();
        report.push("jobTitle", "Job title is required");
        report.push("personalInfo.email", "Email is required");
        assert_eq!(
            report.to_string(),
            "jobTitle: Job title is required (and 1 more)"
        );
    }

    #[test]
    fn sorting_orders_list_indices_numerically() {
        let mut report = ValidationReport::new();
        report.push("workExperience[10].company", "x");
        report.push("workExperience[2].company", "x");
        let sorted = report.sorted();
        assert_eq!(sorted.errors()[0].path, "workExperience[2].company");
    }
}
