//! Integration test suite.
//!
//! 1. Registry built from IDD files on disk
//! 2. Historical snapshots
//! 3. Concurrent first use and lookups

pub mod concurrency_tests;
pub mod end_to_end_tests;
pub mod helpers;
pub mod snapshot_tests;
