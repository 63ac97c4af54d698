use serde::{Deserialize, Serialize};

use super::domain::AdmissionRecord;

/// Recognized admission outcomes, matched case-insensitively against the stored text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionBucket {
    Accepted,
    Pending,
    Rejected,
    UnderReview,
    Waitlisted,
}

impl AdmissionBucket {
    pub fn recognize(status: &str) -> Option<Self> {
        match status.to_lowercase().as_str() {
            "accepted" => Some(Self::Accepted),
            "pending" => Some(Self::Pending),
            "rejected" => Some(Self::Rejected),
            "under review" => Some(Self::UnderReview),
            "waitlisted" => Some(Self::Waitlisted),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Pending => "Pending",
            Self::Rejected => "Rejected",
            Self::UnderReview => "Under Review",
            Self::Waitlisted => "Waitlisted",
        }
    }
}

/// How a tally treats admission statuses outside the recognized set.
///
/// The management view and the generated reports count unknown values separately, while
/// the consultant rollup folds them into pending. Both behaviors are kept side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStatusPolicy {
    StrictOtherBucket,
    DefaultToPendingBucket,
}

/// Bucket counts over a set of records. Every record lands in exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    pub total: usize,
    pub accepted: usize,
    pub pending: usize,
    pub rejected: usize,
    pub under_review: usize,
    pub waitlisted: usize,
    pub other: usize,
}

impl StatusTally {
    pub fn from_records<'a, I>(records: I, policy: UnknownStatusPolicy) -> Self
    where
        I: IntoIterator<Item = &'a AdmissionRecord>,
    {
        let mut tally = Self::default();
        for record in records {
            tally.record(&record.admission_status, policy);
        }
        tally
    }

    pub fn record(&mut self, status: &str, policy: UnknownStatusPolicy) {
        self.total += 1;
        match AdmissionBucket::recognize(status) {
            Some(AdmissionBucket::Accepted) => self.accepted += 1,
            Some(AdmissionBucket::Pending) => self.pending += 1,
            Some(AdmissionBucket::Rejected) => self.rejected += 1,
            Some(AdmissionBucket::UnderReview) => self.under_review += 1,
            Some(AdmissionBucket::Waitlisted) => self.waitlisted += 1,
            None => match policy {
                UnknownStatusPolicy::StrictOtherBucket => self.other += 1,
                UnknownStatusPolicy::DefaultToPendingBucket => self.pending += 1,
            },
        }
    }

    pub fn bucket_sum(&self) -> usize {
        self.accepted + self.pending + self.rejected + self.under_review + self.waitlisted + self.other
    }

    /// Accepted share of the total as a percentage, `0.0` for an empty tally.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.accepted as f64 / self.total as f64 * 100.0
        }
    }

    /// One decimal place rounded half-up, or a bare `0` when there is nothing to rate.
    pub fn acceptance_rate_label(&self) -> String {
        if self.total == 0 {
            return "0".to_string();
        }
        let tenths = (self.accepted * 2000 + self.total) / (2 * self.total);
        format!("{}.{}", tenths / 10, tenths % 10)
    }
}

/// Presentational class attached to status cells in tables and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Accepted,
    Pending,
    Rejected,
    Other,
}

impl StatusTone {
    /// Exact case-insensitive match on accepted, pending, and rejected.
    pub fn for_admission(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "accepted" => Self::Accepted,
            "pending" => Self::Pending,
            "rejected" => Self::Rejected,
            _ => Self::Other,
        }
    }

    /// Substring match, checked in order: approved, submitted, rejected.
    pub fn for_visa(status: &str) -> Self {
        let lowered = status.to_lowercase();
        if lowered.contains("approved") {
            Self::Accepted
        } else if lowered.contains("submitted") {
            Self::Pending
        } else if lowered.contains("rejected") {
            Self::Rejected
        } else {
            Self::Other
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Accepted => "status-accepted",
            Self::Pending => "status-pending",
            Self::Rejected => "status-rejected",
            Self::Other => "status-other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(statuses: &[&str], policy: UnknownStatusPolicy) -> StatusTally {
        let mut tally = StatusTally::default();
        for status in statuses {
            tally.record(status, policy);
        }
        tally
    }

    #[test]
    fn counts_case_insensitively() {
        let tally = tally(
            &["Accepted", "accepted", "Pending", "Rejected"],
            UnknownStatusPolicy::StrictOtherBucket,
        );
        assert_eq!(tally.accepted, 2);
        assert_eq!(tally.pending, 1);
        assert_eq!(tally.rejected, 1);
        assert_eq!(tally.acceptance_rate_label(), "50.0");
    }

    #[test]
    fn policies_disagree_only_on_unknown_values() {
        let statuses = ["Deferred", "UNDER REVIEW", "waitlisted", ""];
        let strict = tally(&statuses, UnknownStatusPolicy::StrictOtherBucket);
        let lenient = tally(&statuses, UnknownStatusPolicy::DefaultToPendingBucket);

        assert_eq!(strict.other, 2);
        assert_eq!(strict.pending, 0);
        assert_eq!(lenient.other, 0);
        assert_eq!(lenient.pending, 2);
        assert_eq!(strict.under_review, lenient.under_review);
        assert_eq!(strict.bucket_sum(), strict.total);
        assert_eq!(lenient.bucket_sum(), lenient.total);
    }

    #[test]
    fn acceptance_label_rounds_halves_up() {
        let label = |accepted: usize, total: usize| {
            StatusTally {
                total,
                accepted,
                pending: total - accepted,
                ..StatusTally::default()
            }
            .acceptance_rate_label()
        };
        assert_eq!(label(1, 16), "6.3");
        assert_eq!(label(1, 80), "1.3");
        assert_eq!(label(1, 400), "0.3");
        assert_eq!(label(1, 3), "33.3");
        assert_eq!(label(2, 3), "66.7");
        assert_eq!(label(1, 2), "50.0");
        assert_eq!(label(4, 4), "100.0");
        assert_eq!(label(0, 7), "0.0");
    }

    #[test]
    fn empty_tally_rates_zero() {
        let tally = StatusTally::default();
        assert_eq!(tally.acceptance_rate(), 0.0);
        assert_eq!(tally.acceptance_rate_label(), "0");
    }

    #[test]
    fn visa_tone_uses_substring_precedence() {
        assert_eq!(StatusTone::for_visa("Approved"), StatusTone::Accepted);
        assert_eq!(
            StatusTone::for_visa("Application submitted"),
            StatusTone::Pending
        );
        assert_eq!(StatusTone::for_visa("Visa REJECTED"), StatusTone::Rejected);
        assert_eq!(
            StatusTone::for_visa("Interview scheduled"),
            StatusTone::Other
        );
        assert_eq!(StatusTone::for_admission("Under Review"), StatusTone::Other);
        assert_eq!(StatusTone::for_admission("ACCEPTED").css_class(), "status-accepted");
    }
}
