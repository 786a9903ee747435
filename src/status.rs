use serde::{Deserialize, Serialize};

/// Where a league is in its season. Everything user-facing about progress is
/// derived from [`LeagueStatus::from_week`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeagueStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl LeagueStatus {
    pub fn from_week(current_week: u32, total_weeks: u32) -> Self {
        if current_week == 0 {
            LeagueStatus::NotStarted
        } else if current_week >= total_weeks {
            LeagueStatus::Completed
        } else {
            LeagueStatus::InProgress
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LeagueStatus::NotStarted => "not_started",
            LeagueStatus::InProgress => "in_progress",
            LeagueStatus::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeagueStatus::NotStarted => "Not Started",
            LeagueStatus::InProgress => "In Progress",
            LeagueStatus::Completed => "Completed",
        }
    }

    pub fn can_simulate(self) -> bool {
        self != LeagueStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueProgress {
    pub status: LeagueStatus,
    pub status_label: String,
    pub progress_percentage: u32,
    pub can_simulate: bool,
    pub remaining_weeks: u32,
    pub total_weeks: u32,
}

impl LeagueProgress {
    pub fn new(current_week: u32, total_weeks: u32) -> Self {
        let status = LeagueStatus::from_week(current_week, total_weeks);
        let progress_percentage = if total_weeks == 0 {
            100
        } else {
            ((current_week.min(total_weeks) as f64 / total_weeks as f64) * 100.0).round() as u32
        };
        Self {
            status,
            status_label: status.label().to_string(),
            progress_percentage,
            can_simulate: status.can_simulate(),
            remaining_weeks: total_weeks.saturating_sub(current_week),
            total_weeks,
        }
    }
}
