//! Driver-side client core for the caronas ride-hailing app.
//!
//! Covers the discovery-and-acceptance flow: fetch open ride requests from
//! the backend, enrich them with requester names, preview the route to a
//! pickup point through an external directions provider, and confirm
//! acceptance. Rendering is out of scope; the view layer consumes
//! [`board::BoardSnapshot`]s and forwards taps.

pub mod backend;
pub mod board;
pub mod config;
pub mod directions;
pub mod error;
pub mod history;
pub mod location;
pub mod models;
pub mod repository;
pub mod route;
pub mod selection;
pub mod session;
pub mod vehicle;

pub use board::{BoardSnapshot, RideBoard};
pub use config::ClientConfig;
pub use error::FlowError;
pub use session::Session;
