//! chainfind - discover installed C/C++ toolchains
//!
//! This crate finds GCC, Clang (and its derivatives) and MSVC installations,
//! normalizes what it finds into [`Chain`] records keyed by target triplet,
//! and picks the best toolchain for a given target.

pub mod cc;
pub mod core;
pub mod discovery;
pub mod util;

pub use core::{chain::Chain, triplet::Target};
pub use discovery::{discover_installations, discover_toolchains, ProbeOptions};
