use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::config::DedupPolicy;

/// One parsed tabular row, column name to cell value. `None` is an
/// explicit null, distinct from a missing key and from `Some("")`.
/// BTreeMap keeps column order deterministic for downstream writers.
pub type Row = BTreeMap<String, Option<String>>;

/// One individual as a single source system knows them.
#[derive(Debug, Clone)]
pub struct PersonRecord {
    pub display_name: String,
    pub normalized_key: String,
    /// Identifier as understood by the source (badge number, user id).
    pub source_id: Option<String>,
    pub fields: Row,
}

/// Deduplicated `normalized_key -> PersonRecord` for one enrichment
/// source. Keys keep their first-seen position so matching iterates in
/// a deterministic order regardless of dedup policy.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    keys: Vec<String>,
    records: HashMap<String, PersonRecord>,
}

impl CandidateSet {
    pub fn build(records: impl IntoIterator<Item = PersonRecord>, dedup: DedupPolicy) -> Self {
        let mut set = CandidateSet::default();
        for rec in records {
            if rec.normalized_key.is_empty() {
                log::debug!("dropping candidate with empty key: {:?}", rec.display_name);
                continue;
            }
            match set.records.entry(rec.normalized_key.clone()) {
                std::collections::hash_map::Entry::Vacant(e) => {
                    set.keys.push(rec.normalized_key.clone());
                    e.insert(rec);
                }
                std::collections::hash_map::Entry::Occupied(mut e) => {
                    if dedup == DedupPolicy::KeepLast {
                        e.insert(rec);
                    }
                }
            }
        }
        set
    }

    /// Candidate keys in first-seen order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn get(&self, key: &str) -> Option<&PersonRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Which enrichment source and score justified a field's value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provenance {
    pub source: String,
    pub score: f64,
}

/// Audit record for one enrichment attempt against one source.
/// `matched_key` is present iff the score cleared that source's
/// threshold; `score` is the best score seen either way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchOutcome {
    pub source: String,
    pub matched_key: Option<String>,
    pub score: f64,
}

/// A base record plus whatever the enrichment sources contributed.
/// An absent field means "no match found"; a field present as `None`
/// means "matched, but the source cell was empty".
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub fields: Row,
    pub provenance: BTreeMap<String, Provenance>,
    pub outcomes: Vec<MatchOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateScore {
    pub name: String,
    pub score: f64,
}

/// One entry of the unmatched report, shaped for the JSON side file
/// reviewers work from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmatchedEntry {
    pub employee_id: Option<String>,
    pub employee_name: String,
    pub top_matches: Vec<CandidateScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, key: &str, id: &str) -> PersonRecord {
        PersonRecord {
            display_name: name.to_string(),
            normalized_key: key.to_string(),
            source_id: Some(id.to_string()),
            fields: Row::new(),
        }
    }

    #[test]
    fn test_candidate_set_keep_first() {
        let set = CandidateSet::build(
            vec![rec("Ama", "ama", "1"), rec("AMA", "ama", "2"), rec("Kofi", "kofi", "3")],
            DedupPolicy::KeepFirst,
        );
        assert_eq!(set.keys(), &["ama".to_string(), "kofi".to_string()]);
        assert_eq!(set.get("ama").unwrap().source_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_candidate_set_keep_last_preserves_key_order() {
        let set = CandidateSet::build(
            vec![rec("Ama", "ama", "1"), rec("Kofi", "kofi", "3"), rec("AMA", "ama", "2")],
            DedupPolicy::KeepLast,
        );
        assert_eq!(set.keys(), &["ama".to_string(), "kofi".to_string()]);
        assert_eq!(set.get("ama").unwrap().source_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_candidate_set_drops_empty_keys() {
        let set = CandidateSet::build(vec![rec("???", "", "1")], DedupPolicy::KeepFirst);
        assert!(set.is_empty());
    }

    #[test]
    fn test_unmatched_entry_json_shape() {
        let entry = UnmatchedEntry {
            employee_id: Some("EMP-7".into()),
            employee_name: "XYZ Unmatchable".into(),
            top_matches: vec![CandidateScore {
                name: "completely different person".into(),
                score: 21.0,
            }],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["employee_id"], "EMP-7");
        assert_eq!(json["employee_name"], "XYZ Unmatchable");
        assert_eq!(json["top_matches"][0]["name"], "completely different person");
        assert_eq!(json["top_matches"][0]["score"], 21.0);
    }
}
