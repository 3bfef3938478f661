//! HTTP request handlers.

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod upload;
pub mod video;
