//! Browser-facing adapters: `fetch` transport, `localStorage`, History router.

mod http;
pub mod router;
mod storage;

pub use http::BrowserHttpClient;
pub use storage::LocalStorage;
