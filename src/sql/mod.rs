//! Parameterized SQL for the item list: fixed identifiers, values as bind parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
