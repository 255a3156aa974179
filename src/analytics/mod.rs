//! Contact-tracing analytics
//!
//! Every query here is read-only and works on one borrowed store snapshot.
//! Parameters are checked before the store is read, and each query returns
//! typed rows from [`rows`].

mod census;
mod companions;
mod exposure;
pub mod rows;
mod spread;

pub use census::{list_labels, sick_from, top_sick_site};
pub use companions::healthy_companions_of;
pub use exposure::{exposures, people_to_inform, Exposure};
pub use rows::{
    CarelessPerson, HealthyName, HighRiskName, InformList, LabelRow, SickName, SickSite,
    SpreadCount,
};
pub use spread::{careless_people, possible_spread_counts, possible_spreaders, socially_careful};

use crate::error::{TraceError, TraceResult};
use chrono::Duration;

pub(crate) fn check_threshold(threshold: Duration) -> TraceResult<()> {
    if threshold < Duration::zero() {
        return Err(TraceError::InvalidArgument(format!(
            "exposure threshold must not be negative, got {} minutes",
            threshold.num_minutes()
        )));
    }
    Ok(())
}

pub(crate) fn check_name(name: &str) -> TraceResult<()> {
    if name.is_empty() {
        return Err(TraceError::InvalidArgument(
            "person name must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn check_hops(hops: usize) -> TraceResult<()> {
    if hops == 0 {
        return Err(TraceError::InvalidArgument(
            "hops must be at least 1".to_string(),
        ));
    }
    Ok(())
}
