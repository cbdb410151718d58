//! Cross-source reconciliation: enrich a base roster from ordered
//! enrichment sources via fuzzy name matching, and report the records
//! the primary source could not account for.

use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::config::{BaseConfig, ReconcileConfig, SourceConfig};
use crate::error::{ConfigError, ReconcileError};
use crate::fieldmap::person_record;
use crate::matching;
use crate::models::{
    CandidateSet, EnrichedRecord, MatchOutcome, PersonRecord, Provenance, Row, UnmatchedEntry,
};

/// Candidates suggested per unmatched record, for manual review.
const UNMATCHED_SUGGESTIONS: usize = 3;

/// One enrichment source ready for matching: its configuration plus
/// the deduplicated candidate set built from its rows. Read-only once
/// built; shared across worker threads during matching.
#[derive(Debug, Clone)]
pub struct EnrichmentSource {
    pub config: SourceConfig,
    pub candidates: CandidateSet,
}

impl EnrichmentSource {
    /// Validate the source's schema and build its candidate set.
    /// Schema errors are fatal here, before any matching starts.
    pub fn build(config: SourceConfig, rows: &[Row]) -> Result<Self, ReconcileError> {
        for col in config.name_columns.columns() {
            require_column(&config.name, rows, col)?;
        }
        if let Some(col) = config.id_column.as_deref() {
            require_column(&config.name, rows, col)?;
        }
        for fm in &config.fields {
            require_column(&config.name, rows, &fm.source)?;
        }
        let records: Vec<PersonRecord> = rows
            .iter()
            .map(|r| person_record(r, &config.name_columns, config.id_column.as_deref()))
            .collect();
        let candidates = CandidateSet::build(records, config.dedup);
        log::info!(
            "source '{}': {} rows, {} unique candidate keys",
            config.name,
            rows.len(),
            candidates.len()
        );
        Ok(Self { config, candidates })
    }
}

/// A column is absent only when no row of a non-empty record set
/// carries it; per-row empty cells are fine.
fn require_column(source: &str, rows: &[Row], column: &str) -> Result<(), ReconcileError> {
    if !rows.is_empty() && !rows.iter().any(|r| r.contains_key(column)) {
        return Err(ReconcileError::MissingColumn {
            source_name: source.to_string(),
            column: column.to_string(),
        });
    }
    Ok(())
}

struct RecordPass {
    enriched: EnrichedRecord,
    unmatched: Option<UnmatchedEntry>,
}

/// Enrich `base_rows` from `sources`, in order. Returns the enriched
/// records in base input order plus the unmatched report for the
/// primary source, also in base input order. Matching runs in
/// parallel across base records; candidate sets are shared read-only
/// and the collect restores input order, so output is reproducible.
pub fn reconcile(
    base: &BaseConfig,
    base_rows: &[Row],
    sources: &[EnrichmentSource],
) -> Result<(Vec<EnrichedRecord>, Vec<UnmatchedEntry>), ReconcileError> {
    for col in base.name_columns.columns() {
        require_column("base", base_rows, col)?;
    }
    if let Some(col) = base.id_column.as_deref() {
        require_column("base", base_rows, col)?;
    }

    let passes: Vec<RecordPass> = base_rows
        .par_iter()
        .map(|row| enrich_record(row, base, sources))
        .collect();

    let mut enriched = Vec::with_capacity(passes.len());
    let mut report = Vec::new();
    for pass in passes {
        enriched.push(pass.enriched);
        if let Some(entry) = pass.unmatched {
            report.push(entry);
        }
    }
    log::info!(
        "reconciled {} base records against {} sources, {} unmatched",
        enriched.len(),
        sources.len(),
        report.len()
    );
    Ok((enriched, report))
}

/// Validate `config`, build every source, and reconcile.
/// `enrichment_tables[i]` pairs with `config.sources[i]`.
pub fn run(
    config: &ReconcileConfig,
    base_rows: &[Row],
    enrichment_tables: &[Vec<Row>],
) -> Result<(Vec<EnrichedRecord>, Vec<UnmatchedEntry>), ReconcileError> {
    config.validate()?;
    if enrichment_tables.len() != config.sources.len() {
        return Err(ConfigError::InvalidValue {
            field: "sources",
            reason: format!(
                "{} sources configured but {} tables supplied",
                config.sources.len(),
                enrichment_tables.len()
            ),
        }
        .into());
    }
    let sources: Vec<EnrichmentSource> = config
        .sources
        .iter()
        .zip(enrichment_tables)
        .map(|(cfg, rows)| EnrichmentSource::build(cfg.clone(), rows))
        .collect::<Result<_, _>>()?;
    reconcile(&config.base, base_rows, &sources)
}

fn enrich_record(row: &Row, base: &BaseConfig, sources: &[EnrichmentSource]) -> RecordPass {
    let person = person_record(row, &base.name_columns, base.id_column.as_deref());
    let mut fields = row.clone();
    let mut provenance = BTreeMap::new();
    let mut outcomes = Vec::with_capacity(sources.len());
    let mut unmatched = None;

    // An empty key cannot be meaningfully scored; the record passes
    // through untouched and stays out of the unmatched report.
    if person.normalized_key.is_empty() {
        return RecordPass {
            enriched: EnrichedRecord {
                fields,
                provenance,
                outcomes,
            },
            unmatched,
        };
    }

    for src in sources {
        let keys = src.candidates.keys().iter().map(String::as_str);
        let result = matching::match_key(&person.normalized_key, keys, src.config.threshold);
        match result.matched_key.as_deref() {
            Some(key) => {
                let matched = src
                    .candidates
                    .get(key)
                    .expect("matched key originates from this candidate set");
                apply_fields(&mut fields, &mut provenance, &src.config, matched, result.score);
            }
            None if src.config.primary => {
                let keys = src.candidates.keys().iter().map(String::as_str);
                unmatched = Some(UnmatchedEntry {
                    employee_id: person.source_id.clone(),
                    employee_name: person.display_name.clone(),
                    top_matches: matching::rank_candidates(
                        &person.normalized_key,
                        keys,
                        UNMATCHED_SUGGESTIONS,
                    ),
                });
            }
            None => {}
        }
        outcomes.push(MatchOutcome {
            source: src.config.name.clone(),
            matched_key: result.matched_key,
            score: result.score,
        });
    }

    RecordPass {
        enriched: EnrichedRecord {
            fields,
            provenance,
            outcomes,
        },
        unmatched,
    }
}

/// Copy a matched candidate's mapped fields onto the output record.
/// A slot holding a non-null value set earlier is kept unless the
/// mapping marks the field overwritable and the new value is non-null;
/// null placeholders are always fillable. A mapped source cell that is
/// missing or null lands as an explicit null, which is how "matched
/// but empty" stays distinct from "no match" (absent key).
fn apply_fields(
    fields: &mut Row,
    provenance: &mut BTreeMap<String, Provenance>,
    config: &SourceConfig,
    matched: &PersonRecord,
    score: f64,
) {
    for fm in &config.fields {
        let value: Option<String> = matched.fields.get(&fm.source).cloned().flatten();
        let occupied = fields.get(&fm.output).is_some_and(|v| v.is_some());
        if occupied && !(fm.overwritable && value.is_some()) {
            continue;
        }
        fields.insert(fm.output.clone(), value);
        provenance.insert(
            fm.output.clone(),
            Provenance {
                source: config.name.clone(),
                score,
            },
        );
    }
}
