//! Place-mediated traversal over the contact graph
//!
//! Co-presence is never stored: it is derived by pairing two distinct
//! `VISITS` edges that point at the same place. Person→Place steps follow
//! outgoing adjacency, Place→Person steps follow incoming adjacency.

use crate::graph::{GraphStore, Label, NodeId};
use crate::model::{Person, Place, Visit};
use rustc_hash::{FxHashMap, FxHashSet};

/// Decoded people and places of one store snapshot
///
/// Built per request from the store it borrows; never kept across requests.
pub struct ContactGraph<'g> {
    store: &'g GraphStore,
    people: Vec<Person>,
    person_index: FxHashMap<NodeId, usize>,
    places: Vec<Place>,
    place_index: FxHashMap<NodeId, usize>,
}

impl<'g> ContactGraph<'g> {
    pub fn new(store: &'g GraphStore) -> Self {
        let people: Vec<Person> = store
            .get_nodes_by_label(&Label::person())
            .into_iter()
            .filter_map(Person::from_node)
            .collect();
        let places: Vec<Place> = store
            .get_nodes_by_label(&Label::place())
            .into_iter()
            .filter_map(Place::from_node)
            .collect();

        let person_index = people.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        let place_index = places.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

        Self {
            store,
            people,
            person_index,
            places,
            place_index,
        }
    }

    pub fn store(&self) -> &'g GraphStore {
        self.store
    }

    /// Every person, ordered by node id
    pub fn people(&self) -> impl Iterator<Item = &Person> + '_ {
        self.people.iter()
    }

    /// Every place, ordered by node id
    pub fn places(&self) -> impl Iterator<Item = &Place> + '_ {
        self.places.iter()
    }

    pub fn person(&self, id: NodeId) -> Option<&Person> {
        self.person_index.get(&id).map(|&i| &self.people[i])
    }

    pub fn person_by_name(&self, name: &str) -> Option<&Person> {
        self.store
            .find_node_by_name(&Label::person(), name)
            .and_then(|node| self.person(node.id))
    }

    pub fn place(&self, id: NodeId) -> Option<&Place> {
        self.place_index.get(&id).map(|&i| &self.places[i])
    }

    /// Visits made by a person, in insertion order
    pub fn visits_of(&self, person: NodeId) -> impl Iterator<Item = Visit> + '_ {
        self.store
            .outgoing_edges(person)
            .filter_map(Visit::from_edge)
            .filter(move |v| self.place_index.contains_key(&v.place))
    }

    /// Visits made to a place, in insertion order
    pub fn visits_to(&self, place: NodeId) -> impl Iterator<Item = Visit> + '_ {
        self.store
            .incoming_edges(place)
            .filter_map(Visit::from_edge)
            .filter(move |v| self.person_index.contains_key(&v.person))
    }
}

/// Two people with visits to the same place
///
/// (anchor)-[anchor_visit]->(place)<-[counterpart_visit]-(counterpart)
#[derive(Debug, Clone, Copy)]
pub struct CoPresence<'v> {
    pub anchor: &'v Person,
    pub anchor_visit: Visit,
    pub place: &'v Place,
    pub counterpart_visit: Visit,
    pub counterpart: &'v Person,
}

/// Every co-presence whose anchor, place and counterpart pass the filters
///
/// One entry per qualifying pair of visit edges, so the same two people can
/// appear several times. Use [`distinct_pairs`] when only identity matters.
pub fn co_presences<'v, A, P, C>(
    graph: &'v ContactGraph<'_>,
    anchor_filter: A,
    place_filter: P,
    counterpart_filter: C,
) -> Vec<CoPresence<'v>>
where
    A: Fn(&Person) -> bool,
    P: Fn(&Place) -> bool,
    C: Fn(&Person) -> bool,
{
    let anchors: Vec<NodeId> = graph
        .people()
        .filter(|p| anchor_filter(*p))
        .map(|p| p.id)
        .collect();
    co_presences_from(graph, anchors, place_filter, counterpart_filter)
}

/// Co-presences anchored at the given people
///
/// Unknown anchor ids are skipped. A person is never paired with themself.
pub fn co_presences_from<'v, I, P, C>(
    graph: &'v ContactGraph<'_>,
    anchors: I,
    place_filter: P,
    counterpart_filter: C,
) -> Vec<CoPresence<'v>>
where
    I: IntoIterator<Item = NodeId>,
    P: Fn(&Place) -> bool,
    C: Fn(&Person) -> bool,
{
    let mut out = Vec::new();

    for anchor_id in anchors {
        let Some(anchor) = graph.person(anchor_id) else {
            continue;
        };
        for anchor_visit in graph.visits_of(anchor_id) {
            let Some(place) = graph.place(anchor_visit.place) else {
                continue;
            };
            if !place_filter(place) {
                continue;
            }
            for counterpart_visit in graph.visits_to(place.id) {
                if counterpart_visit.id == anchor_visit.id || counterpart_visit.person == anchor_id {
                    continue;
                }
                let Some(counterpart) = graph.person(counterpart_visit.person) else {
                    continue;
                };
                if !counterpart_filter(counterpart) {
                    continue;
                }
                out.push(CoPresence {
                    anchor,
                    anchor_visit,
                    place,
                    counterpart_visit,
                    counterpart,
                });
            }
        }
    }

    out
}

/// Distinct (anchor, counterpart) pairs in first-seen order
pub fn distinct_pairs(co_presences: &[CoPresence<'_>]) -> Vec<(NodeId, NodeId)> {
    let mut seen = FxHashSet::default();
    co_presences
        .iter()
        .map(|c| (c.anchor.id, c.counterpart.id))
        .filter(|pair| seen.insert(*pair))
        .collect()
}

/// Per-hop result of a fixed-depth closure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosureLayers {
    layers: Vec<Vec<NodeId>>,
}

impl ClosureLayers {
    /// Layers 1..=depth; the seed itself is not a layer
    pub fn layers(&self) -> &[Vec<NodeId>] {
        &self.layers
    }

    /// People reached at the last hop
    pub fn final_layer(&self) -> &[NodeId] {
        self.layers.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Union of every layer, first-seen order
    pub fn reached(&self) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        self.layers
            .iter()
            .flatten()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

/// Fixed-depth layered walk from `seed`
///
/// Layer k+1 is the union of `step(p)` over every `p` in layer k,
/// deduplicated within the layer only. A node already reached at an earlier
/// hop is not suppressed, so it shows up again whenever a later layer
/// reaches it.
pub fn transitive_closure<F>(seed: NodeId, depth: usize, mut step: F) -> ClosureLayers
where
    F: FnMut(NodeId) -> Vec<NodeId>,
{
    let mut layers = Vec::with_capacity(depth);
    let mut frontier = vec![seed];

    for _ in 0..depth {
        let mut seen = FxHashSet::default();
        let mut next = Vec::new();
        for node in &frontier {
            for reached in step(*node) {
                if seen.insert(reached) {
                    next.push(reached);
                }
            }
        }
        layers.push(next.clone());
        frontier = next;
    }

    ClosureLayers { layers }
}

/// Healthy people sharing at least one place with `person`
pub fn healthy_companions_step(graph: &ContactGraph<'_>, person: NodeId) -> Vec<NodeId> {
    let hits = co_presences_from(graph, [person], |_| true, Person::is_healthy);
    distinct_pairs(&hits)
        .into_iter()
        .map(|(_, counterpart)| counterpart)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropertyMap;
    use crate::model::{END_TIME, HEALTH_STATUS, NAME, START_TIME};
    use chrono::{TimeZone, Utc};

    struct Fixture {
        store: GraphStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self { store: GraphStore::new() }
        }

        fn person(&mut self, name: &str, status: &str) -> NodeId {
            let mut props = PropertyMap::new();
            props.insert(NAME.to_string(), name.into());
            props.insert(HEALTH_STATUS.to_string(), status.into());
            self.store.create_node_with_properties("Person", props).unwrap()
        }

        fn place(&mut self, name: &str) -> NodeId {
            let mut props = PropertyMap::new();
            props.insert(NAME.to_string(), name.into());
            self.store.create_node_with_properties("Place", props).unwrap()
        }

        fn visit(&mut self, person: NodeId, place: NodeId, from: u32, to: u32) {
            let mut props = PropertyMap::new();
            props.insert(START_TIME.to_string(), Utc.with_ymd_and_hms(2020, 5, 1, from, 0, 0).unwrap().into());
            props.insert(END_TIME.to_string(), Utc.with_ymd_and_hms(2020, 5, 1, to, 0, 0).unwrap().into());
            self.store
                .create_edge_with_properties(person, place, "VISITS", props)
                .unwrap();
        }
    }

    #[test]
    fn test_co_presence_pairs_visits_at_same_place() {
        let mut fx = Fixture::new();
        let alice = fx.person("Alice", "Sick");
        let bob = fx.person("Bob", "Healthy");
        let carol = fx.person("Carol", "Healthy");
        let bar = fx.place("Bar");
        let gym = fx.place("Gym");
        fx.visit(alice, bar, 9, 10);
        fx.visit(bob, bar, 12, 13);
        fx.visit(carol, gym, 9, 10);

        let graph = ContactGraph::new(&fx.store);
        let hits = co_presences(&graph, Person::is_sick, |_| true, Person::is_healthy);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].anchor.name, "Alice");
        assert_eq!(hits[0].counterpart.name, "Bob");
        assert_eq!(hits[0].place.name, "Bar");
    }

    #[test]
    fn test_repeat_visits_collapse_in_distinct_pairs() {
        let mut fx = Fixture::new();
        let alice = fx.person("Alice", "Sick");
        let bob = fx.person("Bob", "Healthy");
        let bar = fx.place("Bar");
        fx.visit(alice, bar, 9, 10);
        fx.visit(alice, bar, 15, 16);
        fx.visit(bob, bar, 12, 13);

        let graph = ContactGraph::new(&fx.store);
        let hits = co_presences(&graph, Person::is_sick, |_| true, Person::is_healthy);

        assert_eq!(hits.len(), 2);
        assert_eq!(distinct_pairs(&hits), vec![(alice, bob)]);
    }

    #[test]
    fn test_person_is_not_own_counterpart() {
        let mut fx = Fixture::new();
        let alice = fx.person("Alice", "Healthy");
        let bar = fx.place("Bar");
        fx.visit(alice, bar, 9, 10);
        fx.visit(alice, bar, 11, 12);

        let graph = ContactGraph::new(&fx.store);
        assert!(healthy_companions_step(&graph, alice).is_empty());
    }

    #[test]
    fn test_place_filter() {
        let mut fx = Fixture::new();
        let alice = fx.person("Alice", "Healthy");
        let bob = fx.person("Bob", "Healthy");
        let bar = fx.place("Bar");
        let gym = fx.place("Gym");
        fx.visit(alice, bar, 9, 10);
        fx.visit(bob, bar, 9, 10);
        fx.visit(alice, gym, 9, 10);
        fx.visit(bob, gym, 9, 10);

        let graph = ContactGraph::new(&fx.store);
        let hits = co_presences_from(&graph, [alice], |p| p.name == "Gym", |_| true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].place.name, "Gym");
    }

    #[test]
    fn test_closure_layers_do_not_suppress_earlier_hops() {
        // A - B share the bar, B - C share the gym
        let mut fx = Fixture::new();
        let a = fx.person("A", "Healthy");
        let b = fx.person("B", "Healthy");
        let c = fx.person("C", "Healthy");
        let bar = fx.place("Bar");
        let gym = fx.place("Gym");
        fx.visit(a, bar, 9, 10);
        fx.visit(b, bar, 9, 10);
        fx.visit(b, gym, 11, 12);
        fx.visit(c, gym, 11, 12);

        let graph = ContactGraph::new(&fx.store);
        let closure = transitive_closure(a, 3, |p| healthy_companions_step(&graph, p));

        assert_eq!(closure.depth(), 3);
        assert_eq!(closure.layers()[0], vec![b]);
        assert_eq!(closure.layers()[1], vec![a, c]);
        // B is reached again at hop 3 even though it was hop 1
        assert_eq!(closure.final_layer(), &[b]);
        assert_eq!(closure.reached(), vec![b, a, c]);
    }

    #[test]
    fn test_closure_from_isolated_seed_is_empty() {
        let mut fx = Fixture::new();
        let loner = fx.person("Loner", "Healthy");

        let graph = ContactGraph::new(&fx.store);
        let closure = transitive_closure(loner, 3, |p| healthy_companions_step(&graph, p));
        assert!(closure.final_layer().is_empty());
        assert!(closure.reached().is_empty());
    }

    #[test]
    fn test_layer_dedup_within_hop() {
        let closure = transitive_closure(NodeId::new(0), 1, |_| {
            vec![NodeId::new(2), NodeId::new(1), NodeId::new(2)]
        });
        assert_eq!(closure.final_layer(), &[NodeId::new(2), NodeId::new(1)]);
    }
}
