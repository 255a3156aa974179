//! Tracegraph
//!
//! Contact-tracing analytics over an in-memory property graph of people,
//! places and visits.
//!
//! # Data model
//!
//! - `Person` nodes: `name`, `healthstatus` (`Healthy` / `Sick`),
//!   `confirmedtime`, `risk`
//! - `Place` nodes: `name`, `type`
//! - `VISITS` edges from a person to a place: `starttime`, `endtime`
//!
//! Two people are co-present when they have visits to the same place. The
//! queries in [`analytics`] combine co-presence with visit times and the sick
//! person's confirmation time; [`risk`] is the only module that writes.
//!
//! # Layers
//!
//! - [`graph`]: the store, its indices and write transactions
//! - [`temporal`], [`model`], [`traversal`]: interval arithmetic, typed views,
//!   co-presence and fixed-depth closure
//! - [`analytics`], [`risk`]: the queries
//! - [`backend`], [`client`], [`request`]: sessions, the typed client and the
//!   name-based dispatcher
//!
//! ## Example Usage
//!
//! ```rust
//! use tracegraph::{ContactTracer, Dataset, InMemoryBackend};
//! use tracegraph::loader::{PersonRecord, PlaceRecord, VisitRecord};
//! use chrono::{TimeZone, Utc};
//!
//! let at = |h| Utc.with_ymd_and_hms(2020, 3, 2, h, 0, 0).unwrap();
//! let dataset = Dataset {
//!     people: vec![PersonRecord::sick("Sam", at(1)), PersonRecord::healthy("Hana")],
//!     places: vec![PlaceRecord::new("Cafe", "Cafe")],
//!     visits: vec![
//!         VisitRecord::new("Sam", "Cafe", at(9), at(12)),
//!         VisitRecord::new("Hana", "Cafe", at(9), at(12)),
//!     ],
//! };
//!
//! let tracer = ContactTracer::new(InMemoryBackend::from_dataset(&dataset).unwrap());
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let counts = runtime.block_on(tracer.possible_spread_counts()).unwrap();
//! assert_eq!(counts[0].sick_name, "Sam");
//! assert_eq!(counts[0].nb_healthy, 1);
//! ```

pub mod analytics;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod model;
pub mod record;
pub mod request;
pub mod risk;
pub mod temporal;
pub mod traversal;

pub use analytics::{
    CarelessPerson, HealthyName, HighRiskName, InformList, LabelRow, SickName, SickSite,
    SpreadCount,
};
pub use backend::{GraphBackend, InMemoryBackend};
pub use client::ContactTracer;
pub use config::{ConfigError, TraceConfig};
pub use error::{ErrorKind, TraceError, TraceResult};
pub use graph::{GraphError, GraphStore, Label, NodeId, PropertyValue};
pub use loader::{Dataset, LoadError};
pub use model::{HealthStatus, Person, Place, Visit};
pub use record::{Record, RecordBatch, ToRecord};
pub use request::{Operation, Params, Request, RequestHandler, Response};
