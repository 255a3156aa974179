//! Typed result rows
//!
//! Field names serialize to the names callers key on (`sickName`,
//! `nbHealthy`, ...).

use crate::record::{Record, ToRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelRow {
    pub label: String,
}

impl ToRecord for LabelRow {
    fn columns() -> &'static [&'static str] {
        &["label"]
    }

    fn to_record(&self) -> Record {
        Record::new().with("label", self.label.as_str())
    }
}

/// A sick person's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SickName {
    pub sick_name: String,
}

impl ToRecord for SickName {
    fn columns() -> &'static [&'static str] {
        &["sickName"]
    }

    fn to_record(&self) -> Record {
        Record::new().with("sickName", self.sick_name.as_str())
    }
}

/// Distinct healthy people a sick person may have reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadCount {
    pub sick_name: String,
    pub nb_healthy: usize,
}

impl ToRecord for SpreadCount {
    fn columns() -> &'static [&'static str] {
        &["sickName", "nbHealthy"]
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("sickName", self.sick_name.as_str())
            .with("nbHealthy", self.nb_healthy)
    }
}

/// Distinct places a sick person went to after confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarelessPerson {
    pub sick_name: String,
    pub nb_places: usize,
}

impl ToRecord for CarelessPerson {
    fn columns() -> &'static [&'static str] {
        &["sickName", "nbPlaces"]
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("sickName", self.sick_name.as_str())
            .with("nbPlaces", self.nb_places)
    }
}

/// Healthy people with a long enough exposure to one sick person
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InformList {
    pub sick_name: String,
    pub people_to_inform: Vec<String>,
}

impl ToRecord for InformList {
    fn columns() -> &'static [&'static str] {
        &["sickName", "peopleToInform"]
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("sickName", self.sick_name.as_str())
            .with("peopleToInform", self.people_to_inform.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighRiskName {
    pub high_risk_name: String,
}

impl ToRecord for HighRiskName {
    fn columns() -> &'static [&'static str] {
        &["highRiskName"]
    }

    fn to_record(&self) -> Record {
        Record::new().with("highRiskName", self.high_risk_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthyName {
    pub healthy_name: String,
}

impl ToRecord for HealthyName {
    fn columns() -> &'static [&'static str] {
        &["healthyName"]
    }

    fn to_record(&self) -> Record {
        Record::new().with("healthyName", self.healthy_name.as_str())
    }
}

/// The place with the most distinct sick visitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SickSite {
    #[serde(skip)]
    pub place_name: String,
    pub place_type: String,
    pub nb_of_sick_visits: usize,
}

impl ToRecord for SickSite {
    fn columns() -> &'static [&'static str] {
        &["placeType", "nbOfSickVisits"]
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("placeType", self.place_type.as_str())
            .with("nbOfSickVisits", self.nb_of_sick_visits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_field_names_match_record_columns() {
        let row = SpreadCount {
            sick_name: "Alice".into(),
            nb_healthy: 2,
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            serde_json::to_value(row.to_record()).unwrap()
        );

        let site = SickSite {
            place_name: "Le Bar".into(),
            place_type: "Bar".into(),
            nb_of_sick_visits: 4,
        };
        assert_eq!(
            serde_json::to_value(&site).unwrap(),
            serde_json::json!({"placeType": "Bar", "nbOfSickVisits": 4})
        );
    }

    #[test]
    fn test_inform_list_record() {
        let row = InformList {
            sick_name: "Alice".into(),
            people_to_inform: vec!["Bob".into(), "Carol".into()],
        };
        let record = row.to_record();
        assert_eq!(record.get_str("sickName"), Some("Alice"));
        assert_eq!(record.get_str_list("peopleToInform"), Some(vec!["Bob", "Carol"]));
    }
}
