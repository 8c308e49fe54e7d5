//! Decompiling the GDEF attachment point and ligature caret data

use std::collections::BTreeMap;

use write_fonts::{
    read::{
        tables::gdef::{self as rgdef, Gdef},
        ReadError,
    },
    types::GlyphId16,
};

use crate::common;

/// A single ligature caret position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Caret {
    /// A coordinate on the text axis.
    Coordinate(i16),
    /// A contour point index.
    PointIndex(u16),
}

/// The decompiled attachment data of a GDEF table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GdefTable {
    pub version: (u16, u16),
    /// glyph -> attachment point indices
    pub attach_points: BTreeMap<GlyphId16, Vec<u16>>,
    /// ligature glyph -> caret positions, in component order
    pub lig_carets: BTreeMap<GlyphId16, Vec<Caret>>,
    /// mark glyph sets, in declared order
    pub mark_glyph_sets: Vec<Vec<GlyphId16>>,
}

pub fn unbuild_gdef(table: &Gdef) -> Result<GdefTable, ReadError> {
    let version = table.version();
    let attach_points = match table.attach_list().transpose()? {
        Some(list) => unbuild_attach_list(&list)?,
        None => BTreeMap::new(),
    };
    let lig_carets = match table.lig_caret_list().transpose()? {
        Some(list) => unbuild_lig_caret_list(&list)?,
        None => BTreeMap::new(),
    };
    let mark_glyph_sets = match table.mark_glyph_sets_def().transpose()? {
        Some(sets) => unbuild_mark_glyph_sets(&sets)?,
        None => Vec::new(),
    };
    Ok(GdefTable {
        version: (version.major, version.minor),
        attach_points,
        lig_carets,
        mark_glyph_sets,
    })
}

pub(crate) fn unbuild_attach_list(
    list: &rgdef::AttachList,
) -> Result<BTreeMap<GlyphId16, Vec<u16>>, ReadError> {
    let coverage = list.coverage()?;
    let mut points = BTreeMap::new();
    for (gid, attach) in coverage.iter().zip(list.attach_points().iter()) {
        let attach = attach?;
        points.insert(
            gid,
            attach.point_indices().iter().map(|idx| idx.get()).collect(),
        );
    }
    Ok(points)
}

pub(crate) fn unbuild_lig_caret_list(
    list: &rgdef::LigCaretList,
) -> Result<BTreeMap<GlyphId16, Vec<Caret>>, ReadError> {
    let coverage = list.coverage()?;
    let mut carets = BTreeMap::new();
    for (gid, lig_glyph) in coverage.iter().zip(list.lig_glyphs().iter()) {
        let lig_glyph = lig_glyph?;
        let values = lig_glyph
            .caret_values()
            .iter()
            .map(|caret| Ok(unbuild_caret(&caret?)))
            .collect::<Result<_, ReadError>>()?;
        carets.insert(gid, values);
    }
    Ok(carets)
}

fn unbuild_caret(caret: &rgdef::CaretValue) -> Caret {
    match caret {
        rgdef::CaretValue::Format1(caret) => Caret::Coordinate(caret.coordinate()),
        rgdef::CaretValue::Format2(caret) => Caret::PointIndex(caret.caret_value_point_index()),
        // the device table only matters under variations
        rgdef::CaretValue::Format3(caret) => Caret::Coordinate(caret.coordinate()),
    }
}

pub(crate) fn unbuild_mark_glyph_sets(
    sets: &rgdef::MarkGlyphSets,
) -> Result<Vec<Vec<GlyphId16>>, ReadError> {
    sets.coverages()
        .iter()
        .map(|cov| Ok(common::unbuild_coverage(&cov?)))
        .collect()
}
