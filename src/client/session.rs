//! UI state for one map session
//!
//! [`Session`] decides when a fetch is due and which completions still count.
//! It performs no I/O: callers run the returned [`PendingFetch`] and hand the
//! outcome back through [`Session::complete`].

use tracing::{debug, warn};

use crate::{config::EstimateConfig, pvgis::SolarEstimate};

use super::{
    location::{InvalidLocation, Location},
    map::{MapView, MapViewConfig},
    render::{self, View},
    request::SolarEstimateRequest,
    size::SystemSizeInput,
    state::{CompletedEstimate, FetchError, RequestState},
};

/// Sequence number of an issued request. Later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// A request the session wants sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    pub ticket: FetchTicket,
    pub request: SolarEstimateRequest,
}

#[derive(Debug)]
pub struct Session {
    map: MapView,
    size: SystemSizeInput,
    settings: EstimateConfig,
    state: RequestState,
    issued: u64,
    in_flight: Option<(FetchTicket, SolarEstimateRequest)>,
    last_requested_kw: Option<f64>,
}

impl Session {
    pub fn new(map: MapViewConfig, settings: EstimateConfig, initial_size: &str) -> Self {
        Self {
            map: MapView::new(map),
            size: SystemSizeInput::new(initial_size),
            settings,
            state: RequestState::Idle,
            issued: 0,
            in_flight: None,
            last_requested_kw: None,
        }
    }

    /// Map click. Fetches right away when the size is usable.
    pub fn select_location(
        &mut self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<PendingFetch>, InvalidLocation> {
        let location = self.map.click(latitude, longitude)?;
        debug!(%location, "location selected");
        Ok(self.size.value().map(|kw| self.issue(location, kw)))
    }

    /// Size field edit. An unusable size clears the result; a new usable size
    /// re-fetches for the selected location. Re-entering the size of the last
    /// request only re-fetches after a failure.
    pub fn edit_size(&mut self, raw: impl Into<String>) -> Option<PendingFetch> {
        self.size = SystemSizeInput::new(raw);
        let Some(kw) = self.size.value() else {
            self.clear();
            return None;
        };
        let location = self.map.marker()?;
        let failed = matches!(self.state, RequestState::Failed(_));
        if self.last_requested_kw == Some(kw) && !failed {
            return None;
        }
        Some(self.issue(location, kw))
    }

    /// Applies `outcome` if `ticket` is the most recently issued request.
    /// Returns whether the state changed.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<SolarEstimate, FetchError>,
    ) -> bool {
        match self.in_flight.take() {
            Some((current, request)) if current == ticket => {
                self.state = match outcome {
                    Ok(estimate) => {
                        RequestState::Success(Box::new(CompletedEstimate { request, estimate }))
                    }
                    Err(err) => {
                        warn!(error = ?err, ticket = ticket.sequence(), "solar data fetch failed");
                        RequestState::Failed(err)
                    }
                };
                true
            }
            other => {
                debug!(
                    ticket = ticket.sequence(),
                    latest = self.issued,
                    "discarding stale response"
                );
                self.in_flight = other;
                false
            }
        }
    }

    /// Whether the size field currently permits fetching.
    pub fn can_fetch(&self) -> bool {
        self.size.parsed().is_valid()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn location(&self) -> Option<Location> {
        self.map.marker()
    }

    pub fn size(&self) -> &SystemSizeInput {
        &self.size
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn view(&self) -> View {
        render::render(&self.state, &self.size)
    }

    fn issue(&mut self, location: Location, kw: f64) -> PendingFetch {
        self.issued += 1;
        let ticket = FetchTicket(self.issued);
        let request = SolarEstimateRequest::new(location, kw, &self.settings);
        self.in_flight = Some((ticket, request.clone()));
        self.last_requested_kw = Some(kw);
        self.state = RequestState::Loading;
        debug!(ticket = ticket.sequence(), peak_power_kw = kw, "issuing solar data fetch");
        PendingFetch { ticket, request }
    }

    fn clear(&mut self) {
        if let Some((ticket, _)) = self.in_flight.take() {
            debug!(ticket = ticket.sequence(), "size invalid, dropping in-flight request");
        }
        self.last_requested_kw = None;
        self.state = RequestState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pvgis::response::fixtures;

    fn session(size: &str) -> Session {
        Session::new(MapViewConfig::denmark(), EstimateConfig::default(), size)
    }

    fn estimate() -> SolarEstimate {
        serde_json::from_value(fixtures::pvcalc_value()).unwrap()
    }

    #[test]
    fn test_click_with_valid_size_fetches() {
        let mut s = session("10");
        let pending = s.select_location(56.0, 10.0).unwrap().unwrap();

        assert_eq!(pending.request.location, Location::new(56.0, 10.0).unwrap());
        assert_eq!(pending.request.peak_power_kw, 10.0);
        assert!(s.state().is_loading());
    }

    #[test]
    fn test_click_with_invalid_size_does_not_fetch() {
        let mut s = session("");
        assert!(s.select_location(56.0, 10.0).unwrap().is_none());
        assert_eq!(s.state(), &RequestState::Idle);
        assert_eq!(s.location(), Some(Location::new(56.0, 10.0).unwrap()));
        assert!(!s.can_fetch());
    }

    #[test]
    fn test_invalid_click_is_rejected() {
        let mut s = session("10");
        assert!(s.select_location(95.0, 10.0).is_err());
        assert!(s.location().is_none());
        assert_eq!(s.state(), &RequestState::Idle);
    }

    #[test]
    fn test_size_without_location_does_not_fetch() {
        let mut s = session("");
        assert!(s.edit_size("12").is_none());
        assert!(s.can_fetch());
        assert_eq!(s.state(), &RequestState::Idle);
    }

    #[test]
    fn test_size_change_refetches_same_location() {
        let mut s = session("10");
        let first = s.select_location(56.0, 10.0).unwrap().unwrap();
        assert!(s.complete(first.ticket, Ok(estimate())));

        let second = s.edit_size("20").unwrap();
        assert_eq!(second.request.peak_power_kw, 20.0);
        assert_eq!(second.request.location, first.request.location);
        assert!(second.ticket > first.ticket);
    }

    #[test]
    fn test_same_size_does_not_refetch() {
        let mut s = session("10");
        let first = s.select_location(56.0, 10.0).unwrap().unwrap();
        s.complete(first.ticket, Ok(estimate()));

        assert!(s.edit_size("10.0").is_none());
        assert!(s.state().estimate().is_some());
    }

    #[test]
    fn test_same_size_retries_after_failure() {
        let mut s = session("10");
        let first = s.select_location(56.0, 10.0).unwrap().unwrap();
        s.complete(first.ticket, Err(FetchError::Network("down".into())));

        assert!(s.edit_size("10").is_some());
    }

    #[test]
    fn test_invalid_size_clears_result() {
        for raw in ["0", "", "ten"] {
            let mut s = session("10");
            let first = s.select_location(56.0, 10.0).unwrap().unwrap();
            s.complete(first.ticket, Ok(estimate()));
            assert!(s.state().estimate().is_some());

            assert!(s.edit_size(raw).is_none(), "{raw:?} must not fetch");
            assert_eq!(s.state(), &RequestState::Idle, "{raw:?} must clear");
        }
    }

    #[test]
    fn test_invalid_size_drops_in_flight_response() {
        let mut s = session("10");
        let pending = s.select_location(56.0, 10.0).unwrap().unwrap();
        s.edit_size("0");

        assert!(!s.complete(pending.ticket, Ok(estimate())));
        assert_eq!(s.state(), &RequestState::Idle);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut s = session("10");
        let older = s.select_location(56.0, 10.0).unwrap().unwrap();
        let newer = s.edit_size("20").unwrap();

        assert!(s.complete(newer.ticket, Ok(estimate())));
        assert!(!s.complete(older.ticket, Err(FetchError::Api("late".into()))));

        let completed = s.state().estimate().unwrap();
        assert_eq!(completed.request.peak_power_kw, 20.0);
    }

    #[test]
    fn test_stale_completion_keeps_newer_in_flight() {
        let mut s = session("10");
        let older = s.select_location(56.0, 10.0).unwrap().unwrap();
        let newer = s.select_location(55.7, 12.6).unwrap().unwrap();

        assert!(!s.complete(older.ticket, Ok(estimate())));
        assert!(s.state().is_loading());
        assert!(s.complete(newer.ticket, Ok(estimate())));
    }

    #[test]
    fn test_failure_is_recorded() {
        let mut s = session("10");
        let pending = s.select_location(56.0, 10.0).unwrap().unwrap();
        s.complete(pending.ticket, Err(FetchError::Api("bad".into())));

        assert_eq!(s.state().error(), Some(&FetchError::Api("bad".into())));
    }
}
