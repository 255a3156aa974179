//! Typed entry point for contact-tracing requests
//!
//! One method per analytic operation. Each call checks its parameters,
//! takes one session from the backend, runs the query against that session
//! and releases it before returning.

use chrono::Duration;
use tracing::debug;

use crate::analytics::{
    self, CarelessPerson, HealthyName, HighRiskName, InformList, LabelRow, SickName, SickSite,
    SpreadCount,
};
use crate::backend::GraphBackend;
use crate::config::TraceConfig;
use crate::error::{TraceError, TraceResult};
use crate::request::Operation;
use crate::risk;

/// Contact-tracing client over an injected backend
pub struct ContactTracer<B: GraphBackend> {
    backend: B,
    config: TraceConfig,
}

impl<B: GraphBackend> ContactTracer<B> {
    /// Client with default configuration
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, TraceConfig::default())
    }

    pub fn with_config(backend: B, config: TraceConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Fail with `Unimplemented` when configuration switched `op` off
    pub fn ensure_enabled(&self, op: Operation) -> TraceResult<()> {
        if self.config.is_disabled(op.name()) {
            debug!("Rejecting disabled operation {}", op.name());
            return Err(TraceError::Unimplemented(op.name().to_string()));
        }
        Ok(())
    }

    pub async fn list_labels(&self) -> TraceResult<Vec<LabelRow>> {
        self.ensure_enabled(Operation::ListLabels)?;
        let store = self.backend.read_session().await?;
        Ok(analytics::list_labels(&store))
    }

    pub async fn possible_spreaders(&self) -> TraceResult<Vec<SickName>> {
        self.ensure_enabled(Operation::PossibleSpreaders)?;
        let store = self.backend.read_session().await?;
        Ok(analytics::possible_spreaders(&store))
    }

    pub async fn possible_spread_counts(&self) -> TraceResult<Vec<SpreadCount>> {
        self.ensure_enabled(Operation::PossibleSpreadCounts)?;
        let store = self.backend.read_session().await?;
        Ok(analytics::possible_spread_counts(&store))
    }

    /// `None` uses the configured `careless_min_places`
    pub async fn careless_people(
        &self,
        min_places: Option<usize>,
    ) -> TraceResult<Vec<CarelessPerson>> {
        self.ensure_enabled(Operation::CarelessPeople)?;
        let min_places = min_places.unwrap_or(self.config.careless_min_places);
        let store = self.backend.read_session().await?;
        Ok(analytics::careless_people(&store, min_places))
    }

    pub async fn socially_careful(&self) -> TraceResult<Vec<SickName>> {
        self.ensure_enabled(Operation::SociallyCareful)?;
        let store = self.backend.read_session().await?;
        Ok(analytics::socially_careful(&store))
    }

    /// `None` uses the configured exposure threshold
    pub async fn people_to_inform(
        &self,
        threshold: Option<Duration>,
    ) -> TraceResult<Vec<InformList>> {
        self.ensure_enabled(Operation::PeopleToInform)?;
        let threshold = match threshold {
            Some(threshold) => threshold,
            None => self.config.exposure_threshold()?,
        };
        analytics::check_threshold(threshold)?;
        let store = self.backend.read_session().await?;
        analytics::people_to_inform(&store, threshold)
    }

    /// Flag exposed healthy people as high risk
    ///
    /// Candidate selection and the writes share one exclusive session.
    pub async fn set_high_risk(
        &self,
        threshold: Option<Duration>,
    ) -> TraceResult<Vec<HighRiskName>> {
        self.ensure_enabled(Operation::SetHighRisk)?;
        let threshold = match threshold {
            Some(threshold) => threshold,
            None => self.config.exposure_threshold()?,
        };
        analytics::check_threshold(threshold)?;
        let mut store = self.backend.write_session().await?;
        risk::set_high_risk(&mut store, threshold)
    }

    /// `None` uses the configured `companion_hops`
    pub async fn healthy_companions_of(
        &self,
        name: &str,
        hops: Option<usize>,
    ) -> TraceResult<Vec<HealthyName>> {
        self.ensure_enabled(Operation::HealthyCompanionsOf)?;
        let hops = hops.unwrap_or(self.config.companion_hops);
        analytics::check_name(name)?;
        analytics::check_hops(hops)?;
        let store = self.backend.read_session().await?;
        analytics::healthy_companions_of(&store, name, hops)
    }

    pub async fn top_sick_site(&self) -> TraceResult<SickSite> {
        self.ensure_enabled(Operation::TopSickSite)?;
        let store = self.backend.read_session().await?;
        analytics::top_sick_site(&store)
    }

    pub async fn sick_from(&self, names: &[String]) -> TraceResult<Vec<SickName>> {
        self.ensure_enabled(Operation::SickFrom)?;
        for name in names {
            analytics::check_name(name)?;
        }
        let store = self.backend.read_session().await?;
        analytics::sick_from(&store, names)
    }
}
