//! Prelude module.
//!
//! Re-exports the collection and numeric helpers used throughout the crate
//! so that every module imports them from one place.

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

pub use core::{
    cell::{Ref, RefCell, RefMut},
    fmt,
};

pub use std::rc::Rc;

// ═══════════════════════════════════════════════════════════════════════════════
// Hash maps - Fx hashing everywhere, insertion-ordered maps for properties
// ═══════════════════════════════════════════════════════════════════════════════

pub use rustc_hash::{FxHashMap, FxHashSet};

pub type IndexMap<K, V> =
    indexmap::IndexMap<K, V, core::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

/// Create an empty IndexMap
#[inline]
pub fn index_map_new<K, V>() -> IndexMap<K, V>
where
    K: core::hash::Hash + Eq,
{
    indexmap::IndexMap::with_hasher(Default::default())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Math functions
// ═══════════════════════════════════════════════════════════════════════════════

/// IEEE-754 helpers backed by libm so results do not depend on the host libc.
pub mod math {
    #[inline]
    pub fn floor(x: f64) -> f64 {
        libm::floor(x)
    }

    #[inline]
    pub fn trunc(x: f64) -> f64 {
        libm::trunc(x)
    }

    /// Remainder with the sign of the dividend, as required by `%`.
    #[inline]
    pub fn fmod(x: f64, y: f64) -> f64 {
        libm::fmod(x, y)
    }

    #[inline]
    pub fn abs(x: f64) -> f64 {
        libm::fabs(x)
    }
}
