//! shared helpers for decompiling coverage and class definition tables

use std::collections::BTreeMap;

use smol_str::SmolStr;
use write_fonts::{
    read::tables::layout::{ClassDef, CoverageTable},
    types::{GlyphId16, Tag},
};

pub const DFLT_SCRIPT: Tag = Tag::new(b"DFLT");
pub const DFLT_LANG: Tag = Tag::new(b"dflt");

/// Glyphs grouped by class id, as decompiled from a ClassDef table.
///
/// Class 0 is always present, even when no glyph is explicitly assigned to it.
pub type ClassMap = BTreeMap<u16, Vec<GlyphId16>>;

/// The glyphs in a coverage table, in coverage order.
pub fn unbuild_coverage(coverage: &CoverageTable) -> Vec<GlyphId16> {
    coverage.iter().collect()
}

/// Group the glyphs in a ClassDef by class id.
///
/// Glyphs within a class keep ascending gid order. An empty class 0 is
/// synthesized if the table assigns no glyph to it, since class 0 exists
/// implicitly in the source table.
pub fn unbuild_class_def(class_def: &ClassDef) -> ClassMap {
    let mut classes = ClassMap::new();
    classes.insert(0, Vec::new());
    for (gid, class) in class_def.iter() {
        classes.entry(class).or_default().push(gid);
    }
    for glyphs in classes.values_mut() {
        glyphs.sort_unstable();
    }
    classes
}

/// The symbolic name used for a class id in decompiled contextual rules.
pub fn class_name(class: u16) -> SmolStr {
    smol_str::format_smolstr!("class{class}")
}
