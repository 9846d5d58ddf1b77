//! Typed wrappers for the FRED REST endpoints.
//!
//! Each module owns the wire types for one endpoint family and converts
//! them into `fred-core` domain types.

pub mod categories;
pub mod releases;
pub mod search;
pub mod series;

pub use series::ObservationQuery;
