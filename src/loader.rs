//! JSON dataset ingestion
//!
//! ```json
//! {
//!   "people": [{"name": "Alice", "healthstatus": "Sick", "confirmedtime": "2020-03-01T08:00:00Z"}],
//!   "places": [{"name": "Bar", "type": "Bar"}],
//!   "visits": [{"person": "Alice", "place": "Bar",
//!               "starttime": "2020-03-01T09:00:00Z", "endtime": "2020-03-01T10:00:00Z"}]
//! }
//! ```

use crate::graph::{GraphError, GraphStore, Label, PropertyMap, VISITS_EDGE};
use crate::model::{
    HealthStatus, CONFIRMED_TIME, END_TIME, HEALTH_STATUS, NAME, PLACE_TYPE, RISK, START_TIME,
};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Dataset loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Visit references unknown person '{0}'")]
    UnknownPerson(String),

    #[error("Visit references unknown place '{0}'")]
    UnknownPlace(String),

    #[error("Visit of '{person}' to '{place}' ends before it starts")]
    InvertedVisit { person: String, place: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    pub healthstatus: HealthStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmedtime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
}

impl PersonRecord {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthstatus: HealthStatus::Healthy,
            confirmedtime: None,
            risk: None,
        }
    }

    pub fn sick(name: impl Into<String>, confirmed: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            healthstatus: HealthStatus::Sick,
            confirmedtime: Some(confirmed),
            risk: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl PlaceRecord {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub person: String,
    pub place: String,
    pub starttime: DateTime<Utc>,
    pub endtime: DateTime<Utc>,
}

impl VisitRecord {
    pub fn new(
        person: impl Into<String>,
        place: impl Into<String>,
        starttime: DateTime<Utc>,
        endtime: DateTime<Utc>,
    ) -> Self {
        Self {
            person: person.into(),
            place: place.into(),
            starttime,
            endtime,
        }
    }
}

/// People, places and visits to ingest into a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub people: Vec<PersonRecord>,
    #[serde(default)]
    pub places: Vec<PlaceRecord>,
    #[serde(default)]
    pub visits: Vec<VisitRecord>,
}

/// Counts of what a load created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub people: usize,
    pub places: usize,
    pub visits: usize,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> LoadResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Create every node and edge of the dataset in `store`
    ///
    /// Visits are checked before anything is written, so a dataset with a
    /// dangling or inverted visit leaves no visits behind.
    pub fn load_into(&self, store: &mut GraphStore) -> LoadResult<LoadStats> {
        let mut seen = FxHashSet::default();
        for person in &self.people {
            let exists = store.find_node_by_name(&Label::person(), &person.name).is_some();
            if exists || !seen.insert(person.name.as_str()) {
                return Err(GraphError::DuplicateName {
                    label: Label::person(),
                    name: person.name.clone(),
                }
                .into());
            }
        }
        seen.clear();
        for place in &self.places {
            let exists = store.find_node_by_name(&Label::place(), &place.name).is_some();
            if exists || !seen.insert(place.name.as_str()) {
                return Err(GraphError::DuplicateName {
                    label: Label::place(),
                    name: place.name.clone(),
                }
                .into());
            }
        }
        for visit in &self.visits {
            let person_known = self.people.iter().any(|p| p.name == visit.person)
                || store.find_node_by_name(&Label::person(), &visit.person).is_some();
            if !person_known {
                return Err(LoadError::UnknownPerson(visit.person.clone()));
            }
            let place_known = self.places.iter().any(|p| p.name == visit.place)
                || store.find_node_by_name(&Label::place(), &visit.place).is_some();
            if !place_known {
                return Err(LoadError::UnknownPlace(visit.place.clone()));
            }
            if visit.starttime > visit.endtime {
                return Err(LoadError::InvertedVisit {
                    person: visit.person.clone(),
                    place: visit.place.clone(),
                });
            }
        }

        let mut stats = LoadStats::default();

        for person in &self.people {
            let mut props = PropertyMap::new();
            props.insert(NAME.to_string(), person.name.as_str().into());
            props.insert(HEALTH_STATUS.to_string(), person.healthstatus.as_str().into());
            if let Some(confirmed) = person.confirmedtime {
                props.insert(CONFIRMED_TIME.to_string(), confirmed.into());
            }
            if let Some(risk) = &person.risk {
                props.insert(RISK.to_string(), risk.as_str().into());
            }
            store.create_node_with_properties(Label::person(), props)?;
            stats.people += 1;
        }

        for place in &self.places {
            let mut props = PropertyMap::new();
            props.insert(NAME.to_string(), place.name.as_str().into());
            props.insert(PLACE_TYPE.to_string(), place.kind.as_str().into());
            store.create_node_with_properties(Label::place(), props)?;
            stats.places += 1;
        }

        for visit in &self.visits {
            let person = store
                .find_node_by_name(&Label::person(), &visit.person)
                .map(|n| n.id)
                .ok_or_else(|| LoadError::UnknownPerson(visit.person.clone()))?;
            let place = store
                .find_node_by_name(&Label::place(), &visit.place)
                .map(|n| n.id)
                .ok_or_else(|| LoadError::UnknownPlace(visit.place.clone()))?;

            let mut props = PropertyMap::new();
            props.insert(START_TIME.to_string(), visit.starttime.into());
            props.insert(END_TIME.to_string(), visit.endtime.into());
            store.create_edge_with_properties(person, place, VISITS_EDGE, props)?;
            stats.visits += 1;
        }

        info!(
            "Loaded {} people, {} places, {} visits",
            stats.people, stats.places, stats.visits
        );
        Ok(stats)
    }

    /// Build a fresh store holding only this dataset
    pub fn into_store(&self) -> LoadResult<GraphStore> {
        let mut store = GraphStore::new();
        self.load_into(&mut store)?;
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Person;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 3, 2, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_and_load_json() {
        let json = r#"{
            "people": [
                {"name": "Alice", "healthstatus": "Sick", "confirmedtime": "2020-03-01T08:00:00Z"},
                {"name": "Bob", "healthstatus": "Healthy"}
            ],
            "places": [{"name": "Bar", "type": "Bar"}],
            "visits": [
                {"person": "Alice", "place": "Bar", "starttime": "2020-03-02T09:00:00Z", "endtime": "2020-03-02T10:00:00Z"},
                {"person": "Alice", "place": "Bar", "starttime": "2020-03-02T18:00:00Z", "endtime": "2020-03-02T19:00:00Z"}
            ]
        }"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        let store = dataset.into_store().unwrap();

        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 2);

        let alice = store.find_node_by_name(&Label::person(), "Alice").unwrap();
        let alice = Person::from_node(alice).unwrap();
        assert!(alice.is_sick());
        assert_eq!(alice.confirmed_at, Some(Utc.with_ymd_and_hms(2020, 3, 1, 8, 0, 0).unwrap()));
    }

    #[test]
    fn test_unknown_visit_reference_rejected_before_writes() {
        let dataset = Dataset {
            people: vec![PersonRecord::healthy("Bob")],
            places: vec![PlaceRecord::new("Bar", "Bar")],
            visits: vec![VisitRecord::new("Ghost", "Bar", at(9), at(10))],
        };
        let mut store = GraphStore::new();
        assert!(matches!(
            dataset.load_into(&mut store),
            Err(LoadError::UnknownPerson(name)) if name == "Ghost"
        ));
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn test_inverted_visit_rejected() {
        let dataset = Dataset {
            people: vec![PersonRecord::healthy("Bob")],
            places: vec![PlaceRecord::new("Bar", "Bar")],
            visits: vec![VisitRecord::new("Bob", "Bar", at(11), at(10))],
        };
        assert!(matches!(
            dataset.into_store(),
            Err(LoadError::InvertedVisit { .. })
        ));
    }

    #[test]
    fn test_duplicate_person_rejected() {
        let dataset = Dataset {
            people: vec![PersonRecord::healthy("Bob")],
            ..Dataset::default()
        };
        let mut store = dataset.into_store().unwrap();
        assert!(matches!(
            dataset.load_into(&mut store),
            Err(LoadError::Graph(GraphError::DuplicateName { .. }))
        ));
    }

    #[test]
    fn test_duplicate_within_dataset_rejected_before_writes() {
        let dataset = Dataset {
            places: vec![PlaceRecord::new("Bar", "Bar"), PlaceRecord::new("Bar", "Pub")],
            ..Dataset::default()
        };
        let mut store = GraphStore::new();
        assert!(dataset.load_into(&mut store).is_err());
        assert_eq!(store.node_count(), 0);
    }

    #[test]
    fn test_incremental_load_can_reference_existing_nodes() {
        let base = Dataset {
            people: vec![PersonRecord::healthy("Bob")],
            places: vec![PlaceRecord::new("Bar", "Bar")],
            visits: vec![],
        };
        let mut store = base.into_store().unwrap();

        let more = Dataset {
            visits: vec![VisitRecord::new("Bob", "Bar", at(9), at(10))],
            ..Dataset::default()
        };
        let stats = more.load_into(&mut store).unwrap();
        assert_eq!(stats, LoadStats { people: 0, places: 0, visits: 1 });
        assert_eq!(store.edge_count(), 1);
    }
}
