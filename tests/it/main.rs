//! Single test binary entry point.
//!
//! All integration tests compile into one binary to keep link time down.
//!
//! Structure:
//! - helpers: Table builders and file fixtures
//! - unit: Single-component tests (parser, grid, derived columns, codec)
//! - integration: Editor workflows across import, editing and persistence

mod helpers;
