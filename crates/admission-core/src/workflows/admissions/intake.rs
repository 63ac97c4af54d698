use super::domain::{AdmissionDraft, NewAdmission, DEFAULT_ADMISSION_STATUS, DEFAULT_VISA_STATUS};

/// Validation errors raised before anything reaches the record store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email")]
    InvalidEmail,
}

/// Required fields paired with their labels, in the order they are reported.
fn required_fields(draft: &AdmissionDraft) -> [(&'static str, &str); 6] {
    [
        ("Student Name", draft.student_name.as_str()),
        ("Program of Interest", draft.program_of_interest.as_str()),
        ("Email Address", draft.email_address.as_str()),
        ("Home Address", draft.home_address.as_str()),
        ("School Name", draft.school_name.as_str()),
        ("Consultant Name", draft.consultant_name.as_str()),
    ]
}

/// Check a draft and return the trimmed, lower-cased-email form handed to the store.
pub fn validate(draft: &AdmissionDraft) -> Result<NewAdmission, ValidationError> {
    for (label, value) in required_fields(draft) {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(label));
        }
    }

    let email = draft.email_address.trim();
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(NewAdmission {
        student_name: draft.student_name.trim().to_string(),
        program_of_interest: draft.program_of_interest.trim().to_string(),
        email_address: email.to_lowercase(),
        home_address: draft.home_address.trim().to_string(),
        school_name: draft.school_name.trim().to_string(),
        consultant_name: draft.consultant_name.trim().to_string(),
        admission_status: status_or_default(&draft.admission_status, DEFAULT_ADMISSION_STATUS),
        visa_status: status_or_default(&draft.visa_status, DEFAULT_VISA_STATUS),
    })
}

/// `local@domain.tld` with no whitespace: one `@`, and a dot inside the domain with text
/// on both sides of it.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .any(|(idx, _)| idx > 0 && idx + 1 < domain.len())
}

fn status_or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}
