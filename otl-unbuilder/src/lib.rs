//! Decompiling OpenType layout tables into owned rule data
//!
//! This crate turns the packed subtable formats of GSUB and GPOS back into
//! plain maps and rule lists, and can then trace each reachable glyph back
//! to the characters and features that produce it.

pub mod args;
pub mod common;
mod error;
pub mod gdef;
mod glyph_names;
pub mod gpos;
pub mod gsub;
pub mod layout;
pub mod provenance;

pub use error::Error;
pub use gdef::{unbuild_gdef, GdefTable};
pub use glyph_names::{forward_cmap, NameMap};
pub use layout::{unbuild_gpos, unbuild_gsub, GposTable, GsubTable};
pub use provenance::{
    seed_origins, Origin, OriginKey, OriginMap, Resolver, ResolverConfig, ResolverStats,
};
