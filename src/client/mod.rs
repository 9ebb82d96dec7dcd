//! Client application: map selection, size input and result display
//!
//! Everything here is UI-agnostic. [`Session`] holds the state machine,
//! [`ClientApp`] runs its fetches, and [`View`] is what a front end draws.

pub mod app;
pub mod fetcher;
pub mod location;
pub mod map;
pub mod render;
pub mod request;
pub mod session;
pub mod size;
pub mod state;

pub use app::ClientApp;
pub use fetcher::{ForwardingClient, SolarFetcher};
pub use location::{InvalidLocation, Location};
pub use map::{MapView, MapViewConfig, MarkerIcon};
pub use render::{ResultsPanel, View};
pub use request::SolarEstimateRequest;
pub use session::{FetchTicket, PendingFetch, Session};
pub use size::{SizeParse, SystemSizeInput};
pub use state::{CompletedEstimate, FetchError, RequestState};
