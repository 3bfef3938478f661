//! Session-gated episode delivery.

pub mod service;

pub use service::{DeliveryService, EpisodeDelivery};
