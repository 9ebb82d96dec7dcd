use parking_lot::Mutex;
use std::sync::Arc;

use super::{
    fetcher::SolarFetcher,
    location::InvalidLocation,
    render::View,
    session::{PendingFetch, Session},
    state::RequestState,
};

/// Drives a [`Session`] against a [`SolarFetcher`].
///
/// Overlapping calls are allowed; the session's tickets decide which
/// completion is shown. The lock is never held across an `.await`.
#[derive(Clone)]
pub struct ClientApp {
    session: Arc<Mutex<Session>>,
    fetcher: Arc<dyn SolarFetcher>,
}

impl ClientApp {
    pub fn new(session: Session, fetcher: Arc<dyn SolarFetcher>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            fetcher,
        }
    }

    pub async fn click_map(&self, latitude: f64, longitude: f64) -> Result<(), InvalidLocation> {
        let pending = self.session.lock().select_location(latitude, longitude)?;
        if let Some(pending) = pending {
            self.run(pending).await;
        }
        Ok(())
    }

    pub async fn edit_size(&self, raw: &str) {
        let pending = self.session.lock().edit_size(raw);
        if let Some(pending) = pending {
            self.run(pending).await;
        }
    }

    pub fn view(&self) -> View {
        self.session.lock().view()
    }

    pub fn state(&self) -> RequestState {
        self.session.lock().state().clone()
    }

    pub fn can_fetch(&self) -> bool {
        self.session.lock().can_fetch()
    }

    async fn run(&self, pending: PendingFetch) {
        let outcome = self.fetcher.fetch(&pending.request).await;
        self.session.lock().complete(pending.ticket, outcome);
    }
}
