use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How a source derives its display name: a single column, or several
/// columns joined with single spaces (the door-access export splits
/// names into first/last columns).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NameColumns {
    Single(String),
    Concat(Vec<String>),
}

impl NameColumns {
    pub fn columns(&self) -> Vec<&str> {
        match self {
            NameColumns::Single(c) => vec![c.as_str()],
            NameColumns::Concat(cs) => cs.iter().map(String::as_str).collect(),
        }
    }
}

/// Duplicate-key collapse when building a candidate set. The source
/// systems disagree here, so the policy is explicit per source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    #[default]
    KeepFirst,
    KeepLast,
}

/// One source column feeding one output column. Only `overwritable`
/// fields may replace a non-null value set by an earlier source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMap {
    pub source: String,
    pub output: String,
    #[serde(default)]
    pub overwritable: bool,
}

impl FieldMap {
    pub fn new(source: &str, output: &str) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            overwritable: false,
        }
    }

    pub fn overwritable(mut self) -> Self {
        self.overwritable = true;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    /// Minimum similarity score (0..=100) to accept a match.
    pub threshold: u8,
    pub name_columns: NameColumns,
    /// Column carrying the source's own identifier, if any.
    #[serde(default)]
    pub id_column: Option<String>,
    pub fields: Vec<FieldMap>,
    #[serde(default)]
    pub dedup: DedupPolicy,
    /// The primary source is the one the unmatched report tracks.
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseConfig {
    pub name_columns: NameColumns,
    #[serde(default)]
    pub id_column: Option<String>,
}

/// Full configuration for one reconciliation run. Source order is
/// significant: earlier sources win field conflicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    pub base: BaseConfig,
    pub sources: Vec<SourceConfig>,
}

impl ReconcileConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base.name_columns.columns().is_empty() {
            return Err(ConfigError::MissingField {
                field: "base.name_columns",
            });
        }
        let mut primaries = 0usize;
        let mut names: Vec<&str> = Vec::with_capacity(self.sources.len());
        for src in &self.sources {
            if src.name.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "sources.name",
                });
            }
            if names.contains(&src.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "sources.name",
                    reason: format!("duplicate source name: {}", src.name),
                });
            }
            names.push(&src.name);
            if src.threshold > 100 {
                return Err(ConfigError::InvalidValue {
                    field: "sources.threshold",
                    reason: format!("{} not in 0..=100", src.threshold),
                });
            }
            if src.name_columns.columns().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "sources.name_columns",
                });
            }
            if src.fields.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "sources.fields",
                });
            }
            if src.primary {
                primaries += 1;
            }
        }
        if primaries > 1 {
            return Err(ConfigError::InvalidValue {
                field: "sources.primary",
                reason: format!("{} sources marked primary, at most one allowed", primaries),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str, threshold: u8, primary: bool) -> SourceConfig {
        SourceConfig {
            name: name.into(),
            threshold,
            name_columns: NameColumns::Single("name".into()),
            id_column: None,
            fields: vec![FieldMap::new("office", "office")],
            dedup: DedupPolicy::default(),
            primary,
        }
    }

    fn config(sources: Vec<SourceConfig>) -> ReconcileConfig {
        ReconcileConfig {
            base: BaseConfig {
                name_columns: NameColumns::Single("name".into()),
                id_column: Some("user_id".into()),
            },
            sources,
        }
    }

    #[test]
    fn test_valid_config() {
        let cfg = config(vec![source("remote", 80, true), source("zk", 70, false)]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let cfg = config(vec![source("remote", 101, false)]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_two_primaries_rejected() {
        let cfg = config(vec![source("a", 80, true), source("b", 80, true)]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_duplicate_source_name_rejected() {
        let cfg = config(vec![source("a", 80, false), source("a", 80, false)]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_empty_field_mapping_rejected() {
        let mut src = source("a", 80, false);
        src.fields.clear();
        assert!(config(vec![src]).validate().is_err());
    }

    #[test]
    fn test_name_columns_deserialize_both_forms() {
        let single: NameColumns = serde_json::from_str("\"name\"").unwrap();
        assert_eq!(single, NameColumns::Single("name".into()));
        let concat: NameColumns =
            serde_json::from_str("[\"first name\", \"last name\"]").unwrap();
        assert_eq!(
            concat,
            NameColumns::Concat(vec!["first name".into(), "last name".into()])
        );
    }
}
