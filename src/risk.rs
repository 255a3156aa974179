//! Risk propagation
//!
//! The only writer in the crate. A person's `risk` moves from unset to
//! `"high"` and never back.

use crate::analytics::{check_threshold, exposures, HighRiskName};
use crate::error::{TraceError, TraceResult};
use crate::graph::{GraphStore, NodeId, Transaction};
use crate::model::{Person, HIGH_RISK, RISK};
use crate::traversal::ContactGraph;
use chrono::Duration;
use rustc_hash::FxHashSet;
use tracing::{info, warn};

/// Healthy people exposed for at least `threshold`, first-seen order
fn risk_candidates(store: &GraphStore, threshold: Duration) -> Vec<(NodeId, String)> {
    let graph = ContactGraph::new(store);
    let mut seen = FxHashSet::default();
    exposures(&graph, threshold)
        .into_iter()
        .filter(|e| seen.insert(e.healthy))
        .map(|e| (e.healthy, e.healthy_name))
        .collect()
}

/// Flag every healthy person with a long exposure as high risk
///
/// Candidates are selected with the same rule as
/// [`people_to_inform`](crate::analytics::people_to_inform). All flags are
/// written in one transaction: if any write fails, none remain and the store
/// error is returned. People already flagged are written again and still
/// reported.
pub fn set_high_risk(
    store: &mut GraphStore,
    threshold: Duration,
) -> TraceResult<Vec<HighRiskName>> {
    check_threshold(threshold)?;

    let mut tx = Transaction::begin(store);
    let candidates = risk_candidates(tx.store(), threshold);
    if candidates.is_empty() {
        tx.rollback();
        return Ok(Vec::new());
    }

    for (id, _) in &candidates {
        tx.set_node_property(*id, RISK, HIGH_RISK);
    }
    if let Err(e) = tx.commit() {
        warn!("High-risk batch of {} rolled back: {}", candidates.len(), e);
        return Err(e.into());
    }

    let flagged = candidates
        .iter()
        .filter(|(id, _)| {
            store
                .get_node(*id)
                .and_then(Person::from_node)
                .is_some_and(|p| p.is_high_risk())
        })
        .count();
    if flagged != candidates.len() {
        warn!("High-risk batch verification failed: {} of {} flagged", flagged, candidates.len());
        return Err(TraceError::MutationPartiallyApplied {
            flagged,
            expected: candidates.len(),
        });
    }

    info!("Flagged {} people as high risk", flagged);
    Ok(candidates
        .into_iter()
        .map(|(_, name)| HighRiskName { high_risk_name: name })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::graph::Label;
    use crate::loader::{Dataset, PersonRecord, PlaceRecord, VisitRecord};
    use chrono::{DateTime, TimeZone, Utc};

    fn confirmed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 3, 1, 8, 0, 0).unwrap()
    }

    fn after(minutes: i64) -> DateTime<Utc> {
        confirmed() + Duration::minutes(minutes)
    }

    fn exposed_store() -> GraphStore {
        Dataset {
            people: vec![
                PersonRecord::sick("Sam", confirmed()),
                PersonRecord::healthy("Hugo"),
                PersonRecord::healthy("Hana"),
                PersonRecord::healthy("Brief"),
            ],
            places: vec![PlaceRecord::new("Cafe", "Cafe")],
            visits: vec![
                VisitRecord::new("Sam", "Cafe", after(60), after(300)),
                VisitRecord::new("Hugo", "Cafe", after(60), after(300)),
                VisitRecord::new("Hana", "Cafe", after(60), after(300)),
                VisitRecord::new("Brief", "Cafe", after(60), after(70)),
            ],
        }
        .into_store()
        .unwrap()
    }

    fn is_high_risk(store: &GraphStore, name: &str) -> bool {
        store
            .find_node_by_name(&Label::person(), name)
            .and_then(Person::from_node)
            .is_some_and(|p| p.is_high_risk())
    }

    #[test]
    fn test_flags_exposed_people() {
        let mut store = exposed_store();

        let flagged = set_high_risk(&mut store, Duration::hours(2)).unwrap();
        let names: Vec<_> = flagged.into_iter().map(|r| r.high_risk_name).collect();
        assert_eq!(names, vec!["Hugo".to_string(), "Hana".to_string()]);

        assert!(is_high_risk(&store, "Hugo"));
        assert!(is_high_risk(&store, "Hana"));
        assert!(!is_high_risk(&store, "Brief"));
        assert!(!is_high_risk(&store, "Sam"));
    }

    #[test]
    fn test_repeated_calls_are_monotonic() {
        let mut store = exposed_store();

        let first = set_high_risk(&mut store, Duration::hours(2)).unwrap();
        let second = set_high_risk(&mut store, Duration::hours(2)).unwrap();
        assert_eq!(first, second);
        assert!(is_high_risk(&store, "Hugo"));

        // a stricter threshold selects nobody but clears nothing
        assert!(set_high_risk(&mut store, Duration::hours(10)).unwrap().is_empty());
        assert!(is_high_risk(&store, "Hugo"));
        assert!(is_high_risk(&store, "Hana"));
    }

    #[test]
    fn test_failed_write_leaves_no_flags() {
        let mut store = exposed_store();
        store.fail_writes_after(1);

        let err = set_high_risk(&mut store, Duration::hours(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(!is_high_risk(&store, "Hugo"));
        assert!(!is_high_risk(&store, "Hana"));

        store.clear_write_faults();
        assert_eq!(set_high_risk(&mut store, Duration::hours(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_negative_threshold_writes_nothing() {
        let mut store = exposed_store();
        let err = set_high_risk(&mut store, Duration::minutes(-30)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!is_high_risk(&store, "Hugo"));
    }
}
