//! Transport-side consumption of connector configurations

pub mod connector;
pub mod controller;

pub use connector::{Connector, EffectivePool, EffectiveSettings};
pub use controller::{ConnectionController, DefaultConnectionController};
