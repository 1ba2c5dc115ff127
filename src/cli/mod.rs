//! Configuration resolution, mode dispatch, and diagnostics reporting.

pub mod args;
pub mod config;
pub mod driver;
pub mod fs;
pub mod light;
pub mod mode;
pub mod reporter;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/light_tests.rs"]
mod light_tests;
#[cfg(test)]
#[path = "tests/mode_tests.rs"]
mod mode_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
