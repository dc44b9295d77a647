//! HTTP middleware. Currently only request logging.

pub mod audit;
