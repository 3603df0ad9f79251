use serde::Serialize;

use crate::category::IssueCategory;
use crate::store::AnnotatedFeature;

/// Per-category annotation counts.
///
/// Always derived from the store; nothing mutates it in place.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub flood: u32,
    pub dark_spot: u32,
}

impl SummaryCounts {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, category: IssueCategory) -> u32 {
        match category {
            IssueCategory::Flood => self.flood,
            IssueCategory::DarkSpot => self.dark_spot,
        }
    }

    pub fn total(&self) -> u32 {
        self.flood + self.dark_spot
    }

    /// Bar values in `IssueCategory::ALL` order.
    pub fn series(&self) -> [u32; 2] {
        IssueCategory::ALL.map(|c| self.get(c))
    }

    pub fn labels() -> [&'static str; 2] {
        IssueCategory::ALL.map(IssueCategory::label)
    }
}

/// Counts recognised issue types. Unrecognised types are skipped.
pub fn recompute<'a>(features: impl IntoIterator<Item = &'a AnnotatedFeature>) -> SummaryCounts {
    count_issue_types(features.into_iter().map(|f| f.issue_type.as_str()))
}

/// Same as [`recompute`], for issue types read back from an exported file.
pub fn count_issue_types<'a>(issue_types: impl IntoIterator<Item = &'a str>) -> SummaryCounts {
    let mut counts = SummaryCounts::zero();
    for issue_type in issue_types {
        match IssueCategory::classify(issue_type) {
            Some(IssueCategory::Flood) => counts.flood += 1,
            Some(IssueCategory::DarkSpot) => counts.dark_spot += 1,
            None => {}
        }
    }
    counts
}

/// Counts shown after the "reset chart" action. Independent of the store.
pub fn reset() -> SummaryCounts {
    SummaryCounts::zero()
}
