use serde::{Deserialize, Serialize};

/// Idea document as stored and as pushed over the tally feed. The `votes`
/// counter is written only by the vote coordinator's atomic increment.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Idea {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub region: Option<String>,
    #[serde(rename = "team")]
    pub team_name: Option<String>,
    pub votes: i64,
    pub status: String,
    pub submitted_by: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaKind {
    Individual,
    Team,
}

impl IdeaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaKind::Individual => "individual",
            IdeaKind::Team => "team",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(IdeaKind::Individual),
            "team" => Some(IdeaKind::Team),
            _ => None,
        }
    }
}

/// Curation status, set by administrators; never mutated by voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaStatus {
    Pending,
    Approved,
    Rejected,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Pending => "pending",
            IdeaStatus::Approved => "approved",
            IdeaStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(IdeaStatus::Pending),
            "approved" => Some(IdeaStatus::Approved),
            "rejected" => Some(IdeaStatus::Rejected),
            _ => None,
        }
    }
}

/// Submission body. Field names mirror the stored document (`type`, `team`).
#[derive(Debug, Clone, Deserialize)]
pub struct NewIdea {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(rename = "team", default)]
    pub team_name: Option<String>,
}

/// Per-region rollup for the regional dashboard.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RegionSummary {
    pub region: String,
    pub idea_count: i64,
    pub total_votes: i64,
}
