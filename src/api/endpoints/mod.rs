//! API endpoint handlers, one module per route group.
//!
//! Handlers stay thin: parse, call the scorer / classifier / composer, map
//! errors. CPU-bound work goes to the blocking pool.

pub mod health;
pub mod report;
pub mod risk;
pub mod xray;
