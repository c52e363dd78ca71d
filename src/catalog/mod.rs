//! Catalog generation and verification.
//!
//! `builder` derives a catalog from the library and `verify` checks a
//! persisted catalog against the library. Both share the scanner, the
//! per-kind metadata normalization, and the name ordering, so a freshly built
//! catalog always verifies against the state it was built from.

pub mod builder;
pub mod model;
pub mod verify;

pub use builder::{BuildOptions, BuildOutcome, build_catalog};
pub use model::{Catalog, Collections, read_guidance};
pub use verify::{VerifyOptions, verify_catalog};
