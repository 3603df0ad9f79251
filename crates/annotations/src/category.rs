use serde::Serialize;

/// Issue types that drive styling and the summary chart.
///
/// `issueType` itself is free text; anything that does not classify is kept
/// on the feature but never counted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Flood,
    DarkSpot,
}

impl IssueCategory {
    /// Chart order.
    pub const ALL: [IssueCategory; 2] = [IssueCategory::Flood, IssueCategory::DarkSpot];

    /// Case-insensitive match of a user-entered issue type.
    pub fn classify(issue_type: &str) -> Option<Self> {
        match issue_type.to_lowercase().as_str() {
            "flood" => Some(IssueCategory::Flood),
            "dark spot" => Some(IssueCategory::DarkSpot),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            IssueCategory::Flood => "flood",
            IssueCategory::DarkSpot => "dark spot",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IssueCategory::Flood => "Flood",
            IssueCategory::DarkSpot => "Dark Spot",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            IssueCategory::Flood => "blue",
            IssueCategory::DarkSpot => "red",
        }
    }
}

/// Stroke override for a drawn feature. `None` keeps the drawing tool's default.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FeatureStyle {
    pub color: Option<&'static str>,
}

impl FeatureStyle {
    pub fn for_issue_type(issue_type: &str) -> Self {
        Self {
            color: IssueCategory::classify(issue_type).map(IssueCategory::color),
        }
    }
}
