//! Domain models for the market simulator

pub mod event;
pub mod stock;
