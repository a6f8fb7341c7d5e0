//! Integration tests: the demo binary end to end, and full dispatch runs
//! through the public API.

pub mod demo_test;
pub mod dispatch_test;
