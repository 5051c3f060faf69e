//! Dinawin admin client core.
//!
//! Platform-independent half of the admin front-end:
//! - `api`: typed API client and per-resource request functions
//! - `request`: transport abstraction implemented by the browser (and by tests)
//! - `session`: session gate, the single owner of authentication state
//! - `route`: route table and navigation guard
//! - `latest`: drops responses overtaken by a newer request
//! - `theme` / `storage`: persisted client preferences

pub mod api;
pub mod error;
pub mod latest;
pub mod request;
pub mod route;
pub mod session;
pub mod storage;
pub mod theme;

pub use api::{ApiClient, ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult, TransportError};
pub use latest::{LatestRequest, Ticket};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use route::{AppRoute, RouteDecision, guard};
pub use session::{Session, SessionChange, SessionController};
pub use storage::{KeyValueStore, MemoryStore};
pub use theme::Theme;

pub use dinawin_shared as shared;
