//! Compiler environments and build flags handed to generators.

pub mod builder;
pub mod flags;

pub use builder::{Builder, EnvError};
pub use flags::{BuildConfig, FlagSet, Flags, UnknownConfig};
