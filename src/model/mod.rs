//! Data model for the Mandala board.
//!
//! Grids arrive from the API in snake_case and from the built-in dataset in
//! camelCase; both deserialize into [`RawGrid`], which normalizes into the
//! [`Grid`] the store holds. Grids are never mutated in place, a reload
//! replaces the whole collection.

pub mod fallback;
pub mod grid;
pub mod segment;

pub use fallback::fallback_grids;
pub use grid::*;
pub use segment::*;

use serde::{Deserialize, Deserializer};

/// Deserialize a value where `null` means "use the default".
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
