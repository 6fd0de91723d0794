//! Candidate filtering against the ledger and the stoplist
use std::collections::HashSet;
use tracing::{debug, info};

use geogif_core::{PlaceCandidate, RunError};

/// Generic location words that are never worth geocoding.
pub const STOPLIST: [&str; 8] = [
    "anywhere", "nowhere", "here", "there", "country", "city", "town", "state",
];

/// Rejects candidates whose name matches, case-insensitively, a previously
/// used location or a stoplist word. Built once per run from the ledger
/// snapshot taken at run start.
pub struct CandidateFilter {
    reject: HashSet<String>,
}

impl CandidateFilter {
    pub fn new(used_names: &[String]) -> Self {
        let reject = used_names
            .iter()
            .map(|n| n.to_lowercase())
            .chain(STOPLIST.iter().map(|w| w.to_string()))
            .collect();
        Self { reject }
    }

    /// Drop rejected candidates. Survivor order matches input order.
    pub fn apply(
        &self,
        candidates: Vec<PlaceCandidate>,
    ) -> Result<Vec<PlaceCandidate>, RunError> {
        let kept: Vec<PlaceCandidate> = candidates
            .into_iter()
            .filter(|c| {
                let rejected = self.reject.contains(&c.name.to_lowercase());
                if rejected {
                    debug!(candidate = %c.name, "candidate rejected");
                }
                !rejected
            })
            .collect();

        if kept.is_empty() {
            return Err(RunError::AllCandidatesRejected);
        }

        info!(remaining = kept.len(), "candidates after filter");
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(names: &[&str]) -> Vec<PlaceCandidate> {
        names
            .iter()
            .enumerate()
            .map(|(rank, name)| PlaceCandidate::new(*name, rank))
            .collect()
    }

    #[test]
    fn test_ledger_names_rejected_case_insensitively() {
        let filter = CandidateFilter::new(&["springfield".to_string()]);
        let kept = filter
            .apply(candidates(&["Springfield", "Paris"]))
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Paris");
    }

    #[test]
    fn test_stoplist_rejected() {
        let filter = CandidateFilter::new(&[]);
        let err = filter.apply(candidates(&["there", "HERE"])).unwrap_err();
        assert!(matches!(err, RunError::AllCandidatesRejected));
    }

    #[test]
    fn test_survivor_order_preserved() {
        let filter = CandidateFilter::new(&["lyon".to_string()]);
        let kept = filter
            .apply(candidates(&["Oslo", "Lyon", "Quito", "Dakar"]))
            .unwrap();
        let names: Vec<&str> = kept.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Oslo", "Quito", "Dakar"]);
        // Ranks still carry the original extraction order.
        assert_eq!(kept[1].rank, 2);
    }

    #[test]
    fn test_empty_ledger_keeps_everything() {
        let filter = CandidateFilter::new(&[]);
        let kept = filter.apply(candidates(&["Paris"])).unwrap();
        assert_eq!(kept.len(), 1);
    }
}
