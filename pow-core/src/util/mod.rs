/// Utility functions for the retarget core
pub mod logging;

pub use logging::init_logging;
