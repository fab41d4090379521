//! # API Module
//!
//! Data types exchanged between the engine and its collaborators: the fetch
//! layer upstream and the declarative chart renderer downstream.
//!
//! - [`types`]: raw rows, shared bin scheme, binned rows, colors

pub mod types;

pub use types::*;
