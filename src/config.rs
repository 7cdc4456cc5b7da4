use std::env;

use clap::ValueEnum;
use serde::Serialize;

use crate::columns;
use crate::discrepancy::DEFAULT_TOLERANCE;
use crate::models::Component;
use crate::ranking::DEFAULT_TOP_N;

/// Where a record's grouping key comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Branch code embedded in the campus id.
    #[default]
    Branch,
    /// The "Class No." column.
    Class,
    /// No grouping; grouped averages stay empty.
    #[value(name = "none")]
    #[serde(rename = "none")]
    Ungrouped,
}

impl GroupBy {
    /// Header labels this report variant looks up.
    pub fn required_columns(self) -> Vec<&'static str> {
        let mut required = vec![columns::EMPLID];
        match self {
            GroupBy::Branch => required.push(columns::CAMPUS_ID),
            GroupBy::Class => required.push(columns::CLASS_NO),
            GroupBy::Ungrouped => {}
        }
        required.extend(Component::SUMMED.iter().map(|component| component.label()));
        required.push(Component::Total.label());
        required
    }

    pub fn averages_heading(self) -> &'static str {
        match self {
            GroupBy::Branch => "Branch-wise Averages",
            GroupBy::Class => "Class-wise Averages",
            GroupBy::Ungrouped => "Grouped Averages",
        }
    }
}

/// Score used to order each component's top-N list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RankingKey {
    /// Each list is ordered by its own component.
    #[default]
    Component,
    /// Every list is ordered by the stated total, as older reports did.
    Total,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("tolerance must be a finite, non-negative number (found {0})")]
    InvalidTolerance(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub group_by: GroupBy,
    /// Only records whose grouping key equals this value are aggregated and ranked.
    pub group_filter: Option<String>,
    pub top_n: usize,
    pub tolerance: f64,
    pub ranking: RankingKey,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            group_by: GroupBy::default(),
            group_filter: None,
            top_n: DEFAULT_TOP_N,
            tolerance: DEFAULT_TOLERANCE,
            ranking: RankingKey::default(),
        }
    }
}

impl ReportOptions {
    /// Defaults overlaid with `GRADEBOOK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(value) = lookup("GRADEBOOK_TOP_N") {
            options.top_n = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "GRADEBOOK_TOP_N",
                    value: value.clone(),
                })?;
        }

        if let Some(value) = lookup("GRADEBOOK_TOLERANCE") {
            options.tolerance = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "GRADEBOOK_TOLERANCE",
                    value: value.clone(),
                })?;
        }

        if let Some(value) = lookup("GRADEBOOK_GROUP_BY") {
            options.group_by = GroupBy::from_str(value.trim(), true).map_err(|_| {
                ConfigError::InvalidValue {
                    key: "GRADEBOOK_GROUP_BY",
                    value: value.clone(),
                }
            })?;
        }

        if let Some(value) = lookup("GRADEBOOK_RANK_BY") {
            options.ranking = RankingKey::from_str(value.trim(), true).map_err(|_| {
                ConfigError::InvalidValue {
                    key: "GRADEBOOK_RANK_BY",
                    value: value.clone(),
                }
            })?;
        }

        options.validate()?;
        Ok(options)
    }

    pub fn with_group_filter(mut self, filter: Option<String>) -> Self {
        self.group_filter = filter.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    pub fn required_columns(&self) -> Vec<&'static str> {
        self.group_by.required_columns()
    }

    pub fn qualifies(&self, group: Option<&str>) -> bool {
        match &self.group_filter {
            None => true,
            Some(filter) => group == Some(filter.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_legacy_report() {
        let options = ReportOptions::default();
        assert_eq!(options.top_n, 3);
        assert_eq!(options.tolerance, 0.01);
        assert_eq!(options.group_by, GroupBy::Branch);
        assert_eq!(options.ranking, RankingKey::Component);
        assert!(options.group_filter.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let options = ReportOptions::from_lookup(lookup(&[
            ("GRADEBOOK_TOP_N", "5"),
            ("GRADEBOOK_TOLERANCE", "0.5"),
            ("GRADEBOOK_GROUP_BY", "Class"),
            ("GRADEBOOK_RANK_BY", "total"),
        ]))
        .unwrap();
        assert_eq!(options.top_n, 5);
        assert_eq!(options.tolerance, 0.5);
        assert_eq!(options.group_by, GroupBy::Class);
        assert_eq!(options.ranking, RankingKey::Total);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ReportOptions::from_lookup(lookup(&[("GRADEBOOK_TOP_N", "three")])).unwrap_err();
        assert!(err.to_string().contains("GRADEBOOK_TOP_N"));

        let err = ReportOptions::from_lookup(lookup(&[("GRADEBOOK_TOLERANCE", "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTolerance(_)));
    }

    #[test]
    fn blank_filter_means_no_filter() {
        let options = ReportOptions::default().with_group_filter(Some("  ".to_string()));
        assert!(options.group_filter.is_none());
        assert!(options.qualifies(None));
    }

    #[test]
    fn filter_requires_exact_group_match() {
        let options = ReportOptions::default().with_group_filter(Some("A7".to_string()));
        assert!(options.qualifies(Some("A7")));
        assert!(!options.qualifies(Some("a7")));
        assert!(!options.qualifies(None));
    }

    #[test]
    fn required_columns_follow_grouping() {
        let branch = GroupBy::Branch.required_columns();
        assert!(branch.contains(&"Campus ID"));
        assert!(!branch.contains(&"Class No."));
        assert!(branch.contains(&"Total (300)"));
        assert!(!branch.contains(&"Pre-Compre (195)"));

        let class = GroupBy::Class.required_columns();
        assert!(class.contains(&"Class No."));

        let none = GroupBy::Ungrouped.required_columns();
        assert_eq!(none.len(), 7);
    }

    #[test]
    fn grouping_names_its_averages() {
        assert_eq!(GroupBy::Branch.averages_heading(), "Branch-wise Averages");
        assert_eq!(GroupBy::Class.averages_heading(), "Class-wise Averages");
        assert_eq!(serde_json::to_string(&GroupBy::Ungrouped).unwrap(), r#""none""#);
    }
}
