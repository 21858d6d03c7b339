//! Profiling support via Tracy.
//!
//! This module provides optional profiling instrumentation using the [Tracy profiler](https://github.com/wolfpld/tracy).
//! Profiling is enabled via the `profiling` Cargo feature.
//!
//! ```toml
//! [dependencies]
//! skinmesh-core = { version = "0.1", features = ["profiling"] }
//! ```
//!
//! # CPU Profiling
//!
//! ```ignore
//! use skinmesh_core::{profile_function, profile_scope};
//!
//! fn compose_character() {
//!     profile_function!();
//!
//!     {
//!         profile_scope!("quantize_influences");
//!         // ... do work ...
//!     }
//! }
//! ```
//!
//! When profiling is disabled (the default), all macros compile to no-ops.

#[cfg(feature = "profiling")]
pub use tracy_client::{self, plot as tracy_plot, span, Client, Span};

/// Create a profiling span for the current scope.
///
/// The span automatically ends when the scope exits.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Create a profiling span for the entire function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Create a profiling span for function (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Plot a value over time in Tracy, e.g. vertex counts per compose.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:literal, $value:expr) => {
        $crate::profiling::tracy_plot!($name, $value as f64)
    };
}

/// Plot a value (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:literal, $value:expr) => {
        let _ = $value;
    };
}

#[cfg(all(test, not(feature = "profiling")))]
mod tests {
    #[test]
    fn macros_expand_without_profiling() {
        profile_function!();
        profile_scope!("scope");
        profile_plot!("vertices", 3usize);
    }
}
