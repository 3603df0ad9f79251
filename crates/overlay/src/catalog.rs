use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::time_range::TimeRange;

/// Date keys offered by the date picker and the imagery window each one shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateCatalog {
    entries: BTreeMap<String, TimeRange>,
}

impl DateCatalog {
    pub fn new(entries: BTreeMap<String, TimeRange>) -> Self {
        Self { entries }
    }

    pub fn resolve(&self, date_key: &str) -> Option<&TimeRange> {
        self.entries.get(date_key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimeRange)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DateCatalog {
    /// March 2020 and March 2025 monthly composites.
    fn default() -> Self {
        let entries = [
            ("2020-03-01", (2020, 3, 1), (2020, 3, 31)),
            ("2025-03-01", (2025, 3, 1), (2025, 3, 31)),
        ]
        .into_iter()
        .filter_map(|(key, (sy, sm, sd), (ey, em, ed))| {
            let start = chrono::NaiveDate::from_ymd_opt(sy, sm, sd)?;
            let end = chrono::NaiveDate::from_ymd_opt(ey, em, ed)?;
            let range = TimeRange::new(start, end).ok()?;
            Some((key.to_string(), range))
        })
        .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::DateCatalog;

    #[test]
    fn default_catalog_has_two_months() {
        let catalog = DateCatalog::default();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.resolve("2020-03-01").map(ToString::to_string),
            Some("2020-03-01/2020-03-31".to_string())
        );
        assert_eq!(
            catalog.resolve("2025-03-01").map(ToString::to_string),
            Some("2025-03-01/2025-03-31".to_string())
        );
        assert!(catalog.resolve("1999-01-01").is_none());
        assert_eq!(
            catalog.keys().collect::<Vec<_>>(),
            vec!["2020-03-01", "2025-03-01"]
        );
    }

    #[test]
    fn deserializes_from_plain_map() {
        let catalog: DateCatalog =
            serde_json::from_str(r#"{"2023-06-01": "2023-06-01/2023-06-15"}"#).expect("catalog");
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.resolve("2023-06-01").map(|r| r.days()),
            Some(15)
        );

        let bad = serde_json::from_str::<DateCatalog>(r#"{"x": "2023-06-15/2023-06-01"}"#);
        assert!(bad.is_err());
    }
}
