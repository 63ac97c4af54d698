use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::AdmissionRecord;
use super::status::{StatusTally, UnknownStatusPolicy};

pub const UNKNOWN_CONSULTANT: &str = "Unknown Consultant";

/// Per-consultant rollup over a filtered set of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultantSummary {
    pub name: String,
    pub students: usize,
    pub accepted: usize,
    pub pending: usize,
    pub rejected: usize,
    pub under_review: usize,
    pub waitlisted: usize,
    pub success_rate: u8,
}

impl ConsultantSummary {
    fn from_tally(name: String, tally: StatusTally) -> Self {
        Self {
            name,
            students: tally.total,
            accepted: tally.accepted,
            pending: tally.pending,
            rejected: tally.rejected,
            under_review: tally.under_review,
            waitlisted: tally.waitlisted,
            success_rate: success_rate(tally.accepted, tally.total),
        }
    }
}

/// `round(accepted / students * 100)`, or 0 when there are no students.
pub fn success_rate(accepted: usize, students: usize) -> u8 {
    if students == 0 {
        return 0;
    }
    let rate = (accepted as f64 / students as f64 * 100.0).round();
    rate.clamp(0.0, 100.0) as u8
}

/// Top-three marker shown next to consultants with at least one student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Podium {
    Gold,
    Silver,
    Bronze,
}

impl Podium {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gold => "trophy",
            Self::Silver => "medal",
            Self::Bronze => "award",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedConsultant {
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub podium: Option<Podium>,
    #[serde(flatten)]
    pub summary: ConsultantSummary,
}

/// Totals across every consultant in the rollup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsultantOverview {
    pub consultants: usize,
    pub students: usize,
    pub accepted: usize,
    pub pending: usize,
    pub rejected: usize,
    pub success_rate: u8,
}

/// Group records by trimmed consultant name. Unknown statuses count as pending.
///
/// Groups come back in name order; [`rank`] applies the performance ordering.
pub fn rollup<'a, I>(records: I) -> Vec<ConsultantSummary>
where
    I: IntoIterator<Item = &'a AdmissionRecord>,
{
    let mut groups: BTreeMap<String, StatusTally> = BTreeMap::new();
    for record in records {
        let name = match record.consultant_name.trim() {
            "" => UNKNOWN_CONSULTANT.to_string(),
            trimmed => trimmed.to_string(),
        };
        groups.entry(name).or_default().record(
            &record.admission_status,
            UnknownStatusPolicy::DefaultToPendingBucket,
        );
    }

    groups
        .into_iter()
        .map(|(name, tally)| ConsultantSummary::from_tally(name, tally))
        .collect()
}

/// Order by success rate, then student count, both descending. Rank is 1-based.
///
/// The sort is stable over the name-ordered rollup, so equal keys keep name order.
pub fn rank(mut summaries: Vec<ConsultantSummary>) -> Vec<RankedConsultant> {
    summaries.sort_by(|a, b| {
        b.success_rate
            .cmp(&a.success_rate)
            .then_with(|| b.students.cmp(&a.students))
    });

    summaries
        .into_iter()
        .enumerate()
        .map(|(idx, summary)| {
            let podium = match idx {
                _ if summary.students == 0 => None,
                0 => Some(Podium::Gold),
                1 => Some(Podium::Silver),
                2 => Some(Podium::Bronze),
                _ => None,
            };
            RankedConsultant {
                rank: idx + 1,
                podium,
                summary,
            }
        })
        .collect()
}

pub fn overview(summaries: &[ConsultantSummary]) -> ConsultantOverview {
    let mut overview = summaries
        .iter()
        .fold(ConsultantOverview::default(), |mut acc, summary| {
            acc.consultants += 1;
            acc.students += summary.students;
            acc.accepted += summary.accepted;
            acc.pending += summary.pending;
            acc.rejected += summary.rejected;
            acc
        });
    overview.success_rate = success_rate(overview.accepted, overview.students);
    overview
}

/// Ranked rollup plus totals for one filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultantPerformance {
    pub period: String,
    pub overview: ConsultantOverview,
    pub rankings: Vec<RankedConsultant>,
}

impl ConsultantPerformance {
    pub fn compute<'a, I>(period: String, records: I) -> Self
    where
        I: IntoIterator<Item = &'a AdmissionRecord>,
    {
        let summaries = rollup(records);
        let overview = overview(&summaries);
        Self {
            period,
            overview,
            rankings: rank(summaries),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}
