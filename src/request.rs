//! Name-based request dispatch
//!
//! Requests arrive as an operation name plus bound parameters and are
//! answered with named-field records:
//!
//! | name | params | fields |
//! |---|---|---|
//! | `listLabels` | | `label` |
//! | `possibleSpreaders` | | `sickName` |
//! | `possibleSpreadCounts` | | `sickName`, `nbHealthy` |
//! | `carelessPeople` | `minPlaces`? | `sickName`, `nbPlaces` |
//! | `sociallyCareful` | | `sickName` |
//! | `peopleToInform` | `thresholdMinutes`? | `sickName`, `peopleToInform` |
//! | `setHighRisk` | `thresholdMinutes`? | `highRiskName` |
//! | `healthyCompanionsOf` | `name`, `hops`? | `healthyName` |
//! | `topSickSite` | | `placeType`, `nbOfSickVisits` |
//! | `sickFrom` | `names` | `sickName` |

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::backend::GraphBackend;
use crate::client::ContactTracer;
use crate::error::{TraceError, TraceResult};
use crate::record::{Record, RecordBatch, ToRecord};

/// Every operation the dispatcher knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListLabels,
    PossibleSpreaders,
    PossibleSpreadCounts,
    CarelessPeople,
    SociallyCareful,
    PeopleToInform,
    SetHighRisk,
    HealthyCompanionsOf,
    TopSickSite,
    SickFrom,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::ListLabels,
        Operation::PossibleSpreaders,
        Operation::PossibleSpreadCounts,
        Operation::CarelessPeople,
        Operation::SociallyCareful,
        Operation::PeopleToInform,
        Operation::SetHighRisk,
        Operation::HealthyCompanionsOf,
        Operation::TopSickSite,
        Operation::SickFrom,
    ];

    /// Request name
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListLabels => "listLabels",
            Operation::PossibleSpreaders => "possibleSpreaders",
            Operation::PossibleSpreadCounts => "possibleSpreadCounts",
            Operation::CarelessPeople => "carelessPeople",
            Operation::SociallyCareful => "sociallyCareful",
            Operation::PeopleToInform => "peopleToInform",
            Operation::SetHighRisk => "setHighRisk",
            Operation::HealthyCompanionsOf => "healthyCompanionsOf",
            Operation::TopSickSite => "topSickSite",
            Operation::SickFrom => "sickFrom",
        }
    }

    pub fn from_name(name: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether the operation writes to the store
    pub fn is_mutation(&self) -> bool {
        matches!(self, Operation::SetHighRisk)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bound request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Params {
    pub name: Option<String>,
    pub names: Option<Vec<String>>,
    pub min_places: Option<usize>,
    pub threshold_minutes: Option<i64>,
    pub hops: Option<usize>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_min_places(mut self, min_places: usize) -> Self {
        self.min_places = Some(min_places);
        self
    }

    pub fn with_threshold_minutes(mut self, minutes: i64) -> Self {
        self.threshold_minutes = Some(minutes);
        self
    }

    pub fn with_hops(mut self, hops: usize) -> Self {
        self.hops = Some(hops);
        self
    }

    fn threshold(&self) -> TraceResult<Option<Duration>> {
        self.threshold_minutes
            .map(|minutes| {
                Duration::try_minutes(minutes).ok_or_else(|| {
                    TraceError::InvalidArgument(format!(
                        "thresholdMinutes out of range: {}",
                        minutes
                    ))
                })
            })
            .transpose()
    }
}

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListLabels,
    PossibleSpreaders,
    PossibleSpreadCounts,
    CarelessPeople { min_places: Option<usize> },
    SociallyCareful,
    PeopleToInform { threshold: Option<Duration> },
    SetHighRisk { threshold: Option<Duration> },
    HealthyCompanionsOf { name: String, hops: Option<usize> },
    TopSickSite,
    SickFrom { names: Vec<String> },
}

impl Request {
    /// Parse a request name and its parameters
    ///
    /// Unknown names fail with `Unimplemented`; a missing required parameter
    /// fails with `InvalidArgument`.
    pub fn parse(name: &str, params: &Params) -> TraceResult<Request> {
        let op = Operation::from_name(name)
            .ok_or_else(|| TraceError::Unimplemented(name.to_string()))?;
        Self::from_params(op, params)
    }

    pub fn from_params(op: Operation, params: &Params) -> TraceResult<Request> {
        let request = match op {
            Operation::ListLabels => Request::ListLabels,
            Operation::PossibleSpreaders => Request::PossibleSpreaders,
            Operation::PossibleSpreadCounts => Request::PossibleSpreadCounts,
            Operation::CarelessPeople => Request::CarelessPeople {
                min_places: params.min_places,
            },
            Operation::SociallyCareful => Request::SociallyCareful,
            Operation::PeopleToInform => Request::PeopleToInform {
                threshold: params.threshold()?,
            },
            Operation::SetHighRisk => Request::SetHighRisk {
                threshold: params.threshold()?,
            },
            Operation::HealthyCompanionsOf => Request::HealthyCompanionsOf {
                name: params.name.clone().ok_or_else(|| missing(op, "name"))?,
                hops: params.hops,
            },
            Operation::TopSickSite => Request::TopSickSite,
            Operation::SickFrom => Request::SickFrom {
                names: params.names.clone().ok_or_else(|| missing(op, "names"))?,
            },
        };
        Ok(request)
    }

    pub fn operation(&self) -> Operation {
        match self {
            Request::ListLabels => Operation::ListLabels,
            Request::PossibleSpreaders => Operation::PossibleSpreaders,
            Request::PossibleSpreadCounts => Operation::PossibleSpreadCounts,
            Request::CarelessPeople { .. } => Operation::CarelessPeople,
            Request::SociallyCareful => Operation::SociallyCareful,
            Request::PeopleToInform { .. } => Operation::PeopleToInform,
            Request::SetHighRisk { .. } => Operation::SetHighRisk,
            Request::HealthyCompanionsOf { .. } => Operation::HealthyCompanionsOf,
            Request::TopSickSite => Operation::TopSickSite,
            Request::SickFrom { .. } => Operation::SickFrom,
        }
    }
}

fn missing(op: Operation, param: &str) -> TraceError {
    TraceError::InvalidArgument(format!("{} requires parameter '{}'", op, param))
}

/// Result of a dispatched request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Rows(RecordBatch),
    Single(Record),
}

impl Response {
    fn rows<T: ToRecord>(rows: Vec<T>) -> Self {
        Response::Rows(RecordBatch::from_rows(&rows))
    }

    pub fn columns(&self) -> Vec<&str> {
        match self {
            Response::Rows(batch) => batch.columns.iter().map(String::as_str).collect(),
            Response::Single(record) => record.fields().collect(),
        }
    }

    /// Every record, one for `Single`
    pub fn records(&self) -> Vec<&Record> {
        match self {
            Response::Rows(batch) => batch.records.iter().collect(),
            Response::Single(record) => vec![record],
        }
    }

    pub fn as_rows(&self) -> Option<&RecordBatch> {
        match self {
            Response::Rows(batch) => Some(batch),
            Response::Single(_) => None,
        }
    }

    pub fn as_single(&self) -> Option<&Record> {
        match self {
            Response::Single(record) => Some(record),
            Response::Rows(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Response::Rows(batch) => {
                serde_json::Value::Array(batch.records.iter().map(Record::to_json).collect())
            }
            Response::Single(record) => record.to_json(),
        }
    }
}

/// Dispatches named requests to a [`ContactTracer`]
pub struct RequestHandler<B: GraphBackend> {
    tracer: ContactTracer<B>,
}

impl<B: GraphBackend> RequestHandler<B> {
    pub fn new(tracer: ContactTracer<B>) -> Self {
        Self { tracer }
    }

    pub fn tracer(&self) -> &ContactTracer<B> {
        &self.tracer
    }

    /// Handle a request by name
    pub async fn handle(&self, name: &str, params: &Params) -> TraceResult<Response> {
        let op = Operation::from_name(name)
            .ok_or_else(|| TraceError::Unimplemented(name.to_string()))?;
        debug!("Handling request: {} (mutation: {})", op, op.is_mutation());
        self.tracer.ensure_enabled(op)?;
        let request = Request::from_params(op, params)?;
        self.execute(request).await
    }

    /// Run an already parsed request
    pub async fn execute(&self, request: Request) -> TraceResult<Response> {
        let tracer = &self.tracer;
        let response = match request {
            Request::ListLabels => Response::rows(tracer.list_labels().await?),
            Request::PossibleSpreaders => Response::rows(tracer.possible_spreaders().await?),
            Request::PossibleSpreadCounts => Response::rows(tracer.possible_spread_counts().await?),
            Request::CarelessPeople { min_places } => {
                Response::rows(tracer.careless_people(min_places).await?)
            }
            Request::SociallyCareful => Response::rows(tracer.socially_careful().await?),
            Request::PeopleToInform { threshold } => {
                Response::rows(tracer.people_to_inform(threshold).await?)
            }
            Request::SetHighRisk { threshold } => {
                Response::rows(tracer.set_high_risk(threshold).await?)
            }
            Request::HealthyCompanionsOf { name, hops } => {
                Response::rows(tracer.healthy_companions_of(&name, hops).await?)
            }
            Request::TopSickSite => Response::Single(tracer.top_sick_site().await?.to_record()),
            Request::SickFrom { names } => Response::rows(tracer.sick_from(&names).await?),
        };
        Ok(response)
    }
}
