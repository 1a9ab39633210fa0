//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific slice of
//! the core against the public API. All tests run on the host with no
//! real hardware required.

mod logger_tests;
mod sequence_tests;
mod watchdog_tests;
