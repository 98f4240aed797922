//! Dashboard Models

use serde::{Deserialize, Serialize};

use super::Sentiment;

/// Fallback group name for timeline entries without a manager
pub const UNKNOWN_MANAGER: &str = "Unknown manager";

/// One row of `GET /users/dashboard/manager/{id}` (per employee)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerDashboardRow {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub feedback_count: u64,
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub neutral: u64,
    #[serde(default)]
    pub negative: u64,
}

/// Totals shown on the manager dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerDashboardSummary {
    pub total_employees: usize,
    pub total_feedbacks: u64,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl ManagerDashboardSummary {
    pub fn from_rows(rows: &[ManagerDashboardRow]) -> Self {
        rows.iter().fold(
            Self {
                total_employees: rows.len(),
                ..Self::default()
            },
            |mut acc, row| {
                acc.total_feedbacks += row.feedback_count;
                acc.positive += row.positive;
                acc.neutral += row.neutral;
                acc.negative += row.negative;
                acc
            },
        )
    }
}

/// One entry of `GET /users/dashboard/employee/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    #[serde(alias = "id")]
    pub feedback_id: i64,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub improvement: Option<String>,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Timeline entries of one manager, in backend order
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerGroup<'a> {
    pub manager_name: &'a str,
    pub entries: Vec<&'a TimelineEntry>,
}

/// Group timeline entries by manager name, groups in first-seen order.
pub fn group_by_manager(entries: &[TimelineEntry]) -> Vec<ManagerGroup<'_>> {
    let mut groups: Vec<ManagerGroup<'_>> = Vec::new();
    for entry in entries {
        let name = entry
            .manager_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(UNKNOWN_MANAGER);
        match groups.iter_mut().find(|g| g.manager_name == name) {
            Some(group) => group.entries.push(entry),
            None => groups.push(ManagerGroup {
                manager_name: name,
                entries: vec![entry],
            }),
        }
    }
    groups
}
