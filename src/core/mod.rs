//! Core data model for toolchain discovery.
//!
//! This module contains the types every prober produces or consumes:
//! - Target triplets (parsing, normalization, matching)
//! - Tool roles and toolsets
//! - Executables and primary-path scoring
//! - Assembled toolchains (chains)

pub mod chain;
pub mod executable;
pub mod tool;
pub mod triplet;
pub mod version;

pub use chain::Chain;
pub use executable::{Executable, ToolNames};
pub use tool::{Tool, ToolPath, Toolset};
pub use triplet::{Full, Target, TripletError};
pub use version::{VersionError, VersionQuad};
