//! Client core for the monitoria message-review dashboard.
//!
//! Everything here is UI-agnostic: a [`store::MessageStore`] holds the
//! current card list and synchronizes it against the backend, a
//! [`filters::FilterCoordinator`] drives re-filtering, and
//! [`session::resolve_mode`] picks the authenticated or no-auth endpoint
//! family per call based on the externally-owned token store.

pub mod client;
pub mod error;
pub mod filters;
pub mod normalize;
pub mod session;
pub mod store;

pub use client::ApiClient;
pub use error::ApiError;
pub use filters::{FilterCoordinator, FilterField};
pub use session::{FileTokenStore, MemoryTokenStore, SessionMode, TokenStore, resolve_mode};
pub use store::MessageStore;
