//! Healthy companion closure
//!
//! Walks healthy co-visitors hop by hop from one seed person.

use super::rows::HealthyName;
use crate::error::TraceResult;
use crate::graph::GraphStore;
use crate::traversal::{healthy_companions_step, transitive_closure, ContactGraph};

/// Healthy people reached at exactly `hops` co-presence steps from `name`
///
/// Each hop keeps only its own distinct people, so with `hops >= 2` the
/// result may include people already met at an earlier hop, the seed
/// included. An unknown seed yields an empty result.
///
/// A person is never their own co-visitor, even with two visits to the same
/// place, so a healthy seed does not reach itself at the first hop. This is
/// stricter than a plain visit-pattern match, which would pair the two
/// visits and return the seed.
pub fn healthy_companions_of(
    store: &GraphStore,
    name: &str,
    hops: usize,
) -> TraceResult<Vec<HealthyName>> {
    super::check_name(name)?;
    super::check_hops(hops)?;

    let graph = ContactGraph::new(store);
    let Some(seed) = graph.person_by_name(name) else {
        return Ok(Vec::new());
    };

    let closure = transitive_closure(seed.id, hops, |p| healthy_companions_step(&graph, p));

    let mut names: Vec<&str> = closure
        .final_layer()
        .iter()
        .filter_map(|id| graph.person(*id))
        .map(|p| p.name.as_str())
        .collect();
    names.sort_unstable();

    Ok(names
        .into_iter()
        .map(|name| HealthyName {
            healthy_name: name.to_string(),
        })
        .collect())
}
