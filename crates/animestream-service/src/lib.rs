//! # animestream-service
//!
//! Business logic for AnimeStream. Each service is built once at startup
//! from `Arc` handles to the stores, the upload directory and the auth
//! components, and is cheap to clone.

pub mod catalog;
pub mod context;
pub mod delivery;
pub mod upload;
pub mod user;

pub use catalog::CatalogService;
pub use context::{Caller, RequestContext};
pub use delivery::{DeliveryService, EpisodeDelivery};
pub use upload::{StoredUpload, UploadService};
pub use user::UserService;
