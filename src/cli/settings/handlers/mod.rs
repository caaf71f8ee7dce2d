//! Setting handlers for different configuration patterns.

pub mod model;
pub mod simple;

pub use model::*;
pub use simple::*;
