//! Records of the dataset backing the catalog and the search index.
//!
//! These are read-only after loading. How the dataset gets populated is not a concern of this
//! workspace.

pub mod advisory;
pub mod dataset;
pub mod package;
pub mod sbom;
pub mod status;
pub mod vulnerability;
