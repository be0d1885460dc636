//! Command implementations

pub mod destroy;
pub mod probe;
pub mod run;
pub mod version;
