//! Fuzzy matching of normalized name keys against a candidate set.

use serde::{Deserialize, Serialize};

mod helpers;
use helpers::sim_levenshtein_pct;

use crate::models::CandidateScore;

/// Outcome of one matching attempt. `matched_key` is present iff
/// `score >= threshold` and the best candidate had any similarity at
/// all: a zero score never constitutes a match, so an empty query or
/// an empty candidate list stays unmatched even at threshold 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub query_key: String,
    pub matched_key: Option<String>,
    pub score: f64,
}

/// Similarity between two keys as a percentage. 100 for equal strings,
/// 0 for equal-length strings with no characters in common.
pub fn similarity(a: &str, b: &str) -> f64 {
    sim_levenshtein_pct(a, b)
}

/// Best candidate at or above `threshold`, with the best score seen.
/// Candidates are scanned in input order and only a strictly higher
/// score replaces the current best, so ties go to the earliest
/// candidate. Returns `(None, 0.0)` for an empty candidate list. A
/// best score of zero is reported but never accepted, so threshold 0
/// means "accept any similarity", not "accept anything".
pub fn best_match<'a, I>(query: &str, candidates: I, threshold: u8) -> (Option<&'a str>, f64)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<&'a str> = None;
    let mut best_score = -1.0f64;
    for cand in candidates {
        let score = similarity(query, cand);
        if score > best_score {
            best = Some(cand);
            best_score = score;
        }
    }
    let score = best_score.max(0.0);
    if best.is_some() && score > 0.0 && score >= f64::from(threshold) {
        (best, score)
    } else {
        (None, score)
    }
}

/// `best_match` packaged as a [`MatchResult`].
pub fn match_key<'a, I>(query: &str, candidates: I, threshold: u8) -> MatchResult
where
    I: IntoIterator<Item = &'a str>,
{
    let (matched, score) = best_match(query, candidates, threshold);
    MatchResult {
        query_key: query.to_string(),
        matched_key: matched.map(str::to_string),
        score,
    }
}

/// Top `limit` candidates ranked by score, for the unmatched report.
/// The sort is stable, so equal scores keep candidate input order.
pub fn rank_candidates<'a, I>(query: &str, candidates: I, limit: usize) -> Vec<CandidateScore>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<CandidateScore> = candidates
        .into_iter()
        .map(|cand| CandidateScore {
            name: cand.to_string(),
            score: similarity(query, cand),
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).expect("scores are finite"));
    scored.truncate(limit);
    scored
}
