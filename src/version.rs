//! Avocado version.

/// The short version information for the avocado service.
pub const AVOCADO_SHORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The long version information for the avocado service.
pub const AVOCADO_LONG_VERSION: &str =
    concat!("avocado/v", env!("CARGO_PKG_VERSION"), " (", env!("CARGO_PKG_NAME"), ")");
