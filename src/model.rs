//! Typed views over person, place and visit graph elements

use crate::graph::{Edge, EdgeId, EdgeType, Label, Node, NodeId, PropertyValue};
use crate::temporal::Interval;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NAME: &str = "name";
pub const HEALTH_STATUS: &str = "healthstatus";
pub const CONFIRMED_TIME: &str = "confirmedtime";
pub const RISK: &str = "risk";
pub const PLACE_TYPE: &str = "type";
pub const START_TIME: &str = "starttime";
pub const END_TIME: &str = "endtime";

/// Value written to `risk` by risk propagation
pub const HIGH_RISK: &str = "high";

/// Health status of a person
///
/// Statuses other than `Healthy` and `Sick` are kept verbatim and match
/// neither predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Healthy,
    Sick,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Sick => "Sick",
            HealthStatus::Other(s) => s,
        }
    }
}

impl From<&str> for HealthStatus {
    fn from(s: &str) -> Self {
        match s {
            "Healthy" => HealthStatus::Healthy,
            "Sick" => HealthStatus::Sick,
            other => HealthStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for HealthStatus {
    fn from(s: String) -> Self {
        HealthStatus::from(s.as_str())
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `Person` node
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: NodeId,
    pub name: String,
    pub health: HealthStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub risk: Option<String>,
}

impl Person {
    /// Decode a person node; `None` if it is not a named `Person`
    pub fn from_node(node: &Node) -> Option<Person> {
        if !node.has_label(&Label::person()) {
            return None;
        }
        Some(Person {
            id: node.id,
            name: node.name()?.to_string(),
            health: node
                .string_property(HEALTH_STATUS)
                .map(HealthStatus::from)
                .unwrap_or_else(|| HealthStatus::Other(String::new())),
            confirmed_at: node
                .get_property(CONFIRMED_TIME)
                .and_then(PropertyValue::as_timestamp),
            risk: node.string_property(RISK).map(str::to_string),
        })
    }

    pub fn is_sick(&self) -> bool {
        self.health == HealthStatus::Sick
    }

    pub fn is_healthy(&self) -> bool {
        self.health == HealthStatus::Healthy
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk.as_deref() == Some(HIGH_RISK)
    }

    /// Whether `ts` is strictly after this person's confirmation
    ///
    /// Only a sick person with a recorded confirmation time can satisfy this.
    pub fn confirmed_before(&self, ts: DateTime<Utc>) -> bool {
        match (self.is_sick(), self.confirmed_at) {
            (true, Some(confirmed)) => ts > confirmed,
            _ => false,
        }
    }
}

/// A `Place` node
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: NodeId,
    pub name: String,
    pub kind: String,
}

impl Place {
    pub fn from_node(node: &Node) -> Option<Place> {
        if !node.has_label(&Label::place()) {
            return None;
        }
        Some(Place {
            id: node.id,
            name: node.name()?.to_string(),
            kind: node.string_property(PLACE_TYPE).unwrap_or_default().to_string(),
        })
    }
}

/// A `VISITS` edge from a person to a place
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit {
    pub id: EdgeId,
    pub person: NodeId,
    pub place: NodeId,
    pub interval: Interval,
}

impl Visit {
    /// Decode a visit edge; `None` for other edge types or malformed times
    pub fn from_edge(edge: &Edge) -> Option<Visit> {
        if !edge.is_type(&EdgeType::visits()) {
            return None;
        }
        let start = edge.get_property(START_TIME)?.as_timestamp()?;
        let end = edge.get_property(END_TIME)?.as_timestamp()?;
        Some(Visit {
            id: edge.id,
            person: edge.source,
            place: edge.target,
            interval: Interval::new(start, end).ok()?,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.interval.start()
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.interval.end()
    }
}
