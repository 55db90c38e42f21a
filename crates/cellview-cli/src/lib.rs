//! Library components of the cellview inspection CLI.

pub mod filters;
pub mod load;
pub mod logging;
pub mod report;
