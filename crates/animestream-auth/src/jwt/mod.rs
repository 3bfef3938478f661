//! Delivery tokens: short-lived HS256 JWTs minted per video response.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::DeliveryClaims;
pub use decoder::DeliveryTokenDecoder;
pub use encoder::DeliveryTokenEncoder;
