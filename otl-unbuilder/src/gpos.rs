//! Decompiling GPOS lookup subtables into owned rule data

use std::collections::BTreeMap;

use write_fonts::{
    read::{
        tables::gpos::{self as rgpos, AnchorTable, PositionSubtables},
        ReadError,
    },
    types::GlyphId16,
};

/// An adjustment to a glyph's placement or advance.
///
/// Only the fields present in the source value record are set; device and
/// variation offsets are not represented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Value {
    pub x_placement: Option<i16>,
    pub y_placement: Option<i16>,
    pub x_advance: Option<i16>,
    pub y_advance: Option<i16>,
}

impl Value {
    pub fn is_empty(&self) -> bool {
        self.x_placement.is_none()
            && self.y_placement.is_none()
            && self.x_advance.is_none()
            && self.y_advance.is_none()
    }
}

/// An attachment point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anchor {
    pub x: i16,
    pub y: i16,
    /// Contour point index, for format 2 anchors.
    pub anchor_point: Option<u16>,
}

/// A single decompiled GPOS subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PosSubtable {
    Single(SinglePos),
    Pair(PairPos),
    Cursive(CursivePos),
    MarkBase(MarkBasePos),
    MarkLig(MarkLigPos),
}

impl PosSubtable {
    /// The GPOS lookup type this subtable belongs to.
    pub fn lookup_type(&self) -> u16 {
        match self {
            PosSubtable::Single(_) => 1,
            PosSubtable::Pair(_) => 2,
            PosSubtable::Cursive(_) => 3,
            PosSubtable::MarkBase(_) => 4,
            PosSubtable::MarkLig(_) => 5,
        }
    }
}

/// Decompiled single adjustment (lookup type 1).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SinglePos {
    pub format: u16,
    pub mapping: BTreeMap<GlyphId16, Value>,
}

/// One pair adjustment rule.
///
/// For format 1 subtables both sides are single glyphs; for format 2 they
/// are the glyphs of the respective pair classes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairRule {
    pub first: Vec<GlyphId16>,
    pub second: Vec<GlyphId16>,
    pub values: (Value, Value),
}

/// Decompiled pair adjustment (lookup type 2).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PairPos {
    pub format: u16,
    pub rules: Vec<PairRule>,
}

/// Decompiled cursive attachment (lookup type 3).
///
/// Per glyph, the entry and exit anchors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CursivePos {
    pub mapping: BTreeMap<GlyphId16, (Option<Anchor>, Option<Anchor>)>,
}

/// Decompiled mark-to-base attachment (lookup type 4).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkBasePos {
    /// mark glyph -> (mark class, anchor)
    pub marks: BTreeMap<GlyphId16, (u16, Anchor)>,
    /// base glyph -> mark class -> anchor
    pub bases: BTreeMap<GlyphId16, BTreeMap<u16, Anchor>>,
}

/// Decompiled mark-to-ligature attachment (lookup type 5).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkLigPos {
    /// mark glyph -> (mark class, anchor)
    pub marks: BTreeMap<GlyphId16, (u16, Anchor)>,
    /// ligature glyph -> per-component mark class -> anchor
    pub ligatures: BTreeMap<GlyphId16, Vec<BTreeMap<u16, Anchor>>>,
}

/// Decompile all the subtables of a single GPOS lookup.
///
/// Mark-to-mark and contextual positioning have no equivalent in our rule
/// model and are skipped.
pub fn unbuild_pos_subtables(
    subtables: &PositionSubtables,
) -> Result<Vec<PosSubtable>, ReadError> {
    match subtables {
        PositionSubtables::Single(subs) => subs
            .iter()
            .map(|sub| Ok(PosSubtable::Single(unbuild_single_pos(&sub?)?)))
            .collect(),
        PositionSubtables::Pair(subs) => subs
            .iter()
            .map(|sub| Ok(PosSubtable::Pair(unbuild_pair_pos(&sub?)?)))
            .collect(),
        PositionSubtables::Cursive(subs) => subs
            .iter()
            .map(|sub| Ok(PosSubtable::Cursive(unbuild_cursive_pos(&sub?)?)))
            .collect(),
        PositionSubtables::MarkToBase(subs) => subs
            .iter()
            .map(|sub| Ok(PosSubtable::MarkBase(unbuild_mark_base_pos(&sub?)?)))
            .collect(),
        PositionSubtables::MarkToLig(subs) => subs
            .iter()
            .map(|sub| Ok(PosSubtable::MarkLig(unbuild_mark_lig_pos(&sub?)?)))
            .collect(),
        PositionSubtables::MarkToMark(_) => {
            log::debug!("skipping mark-to-mark positioning subtables");
            Ok(Vec::new())
        }
        PositionSubtables::Contextual(_) | PositionSubtables::ChainContextual(_) => {
            log::debug!("skipping contextual positioning subtables");
            Ok(Vec::new())
        }
    }
}

fn unbuild_value(record: &rgpos::ValueRecord) -> Value {
    Value {
        x_placement: record.x_placement(),
        y_placement: record.y_placement(),
        x_advance: record.x_advance(),
        y_advance: record.y_advance(),
    }
}

fn unbuild_anchor(anchor: &AnchorTable) -> Anchor {
    let anchor_point = match anchor {
        AnchorTable::Format2(anchor) => Some(anchor.anchor_point()),
        _ => None,
    };
    Anchor {
        x: anchor.x_coordinate(),
        y: anchor.y_coordinate(),
        anchor_point,
    }
}

pub(crate) fn unbuild_single_pos(subtable: &rgpos::SinglePos) -> Result<SinglePos, ReadError> {
    let mut mapping = BTreeMap::new();
    let format = match subtable {
        rgpos::SinglePos::Format1(sub) => {
            let coverage = sub.coverage()?;
            let value = unbuild_value(&sub.value_record());
            for target in coverage.iter() {
                mapping.insert(target, value);
            }
            1
        }
        rgpos::SinglePos::Format2(sub) => {
            let coverage = sub.coverage()?;
            for (target, record) in coverage.iter().zip(sub.value_records().iter()) {
                let record = record?;
                mapping.insert(target, unbuild_value(&record));
            }
            2
        }
    };
    Ok(SinglePos { format, mapping })
}

pub(crate) fn unbuild_pair_pos(subtable: &rgpos::PairPos) -> Result<PairPos, ReadError> {
    let mut rules = Vec::new();
    let format = match subtable {
        rgpos::PairPos::Format1(sub) => {
            let coverage = sub.coverage()?;
            for (first, pair_set) in coverage.iter().zip(sub.pair_sets().iter()) {
                let pair_set = pair_set?;
                for record in pair_set.pair_value_records().iter() {
                    let record = record?;
                    rules.push(PairRule {
                        first: vec![first],
                        second: vec![record.second_glyph()],
                        values: (
                            unbuild_value(&record.value_record1),
                            unbuild_value(&record.value_record2),
                        ),
                    });
                }
            }
            1
        }
        rgpos::PairPos::Format2(sub) => {
            let coverage = sub.coverage()?;
            let class_def1 = sub.class_def1()?;
            let mut class1 = crate::common::unbuild_class_def(&class_def1);
            let class2 = crate::common::unbuild_class_def(&sub.class_def2()?);
            // class 0 of the first classdef covers the remaining coverage glyphs
            let class1_zero = class1.entry(0).or_default();
            for gid in coverage.iter() {
                if class_def1.get(gid) == 0 && !class1_zero.contains(&gid) {
                    class1_zero.push(gid);
                }
            }
            class1_zero.sort_unstable();

            for (c1, record) in sub.class1_records().iter().enumerate() {
                let record = record?;
                let first = class1.get(&(c1 as u16)).cloned().unwrap_or_default();
                for (c2, pair) in record.class2_records().iter().enumerate() {
                    let pair = pair?;
                    let values = (
                        unbuild_value(pair.value_record1()),
                        unbuild_value(pair.value_record2()),
                    );
                    if values.0.is_empty() && values.1.is_empty() {
                        continue;
                    }
                    let second = class2.get(&(c2 as u16)).cloned().unwrap_or_default();
                    rules.push(PairRule {
                        first: first.clone(),
                        second,
                        values,
                    });
                }
            }
            2
        }
    };
    Ok(PairPos { format, rules })
}

pub(crate) fn unbuild_cursive_pos(
    subtable: &rgpos::CursivePosFormat1,
) -> Result<CursivePos, ReadError> {
    let coverage = subtable.coverage()?;
    let data = subtable.offset_data();
    let mut mapping = BTreeMap::new();
    for (gid, record) in coverage.iter().zip(subtable.entry_exit_record()) {
        let entry = record
            .entry_anchor(data)
            .transpose()?
            .map(|anchor| unbuild_anchor(&anchor));
        let exit = record
            .exit_anchor(data)
            .transpose()?
            .map(|anchor| unbuild_anchor(&anchor));
        mapping.insert(gid, (entry, exit));
    }
    Ok(CursivePos { mapping })
}

pub(crate) fn unbuild_mark_base_pos(
    subtable: &rgpos::MarkBasePosFormat1,
) -> Result<MarkBasePos, ReadError> {
    let mark_coverage = subtable.mark_coverage()?;
    let mark_array = subtable.mark_array()?;
    let marks = unbuild_mark_array(&mark_coverage, &mark_array)?;

    let base_coverage = subtable.base_coverage()?;
    let base_array = subtable.base_array()?;
    let base_data = base_array.offset_data();
    let mut bases = BTreeMap::new();
    for (gid, record) in base_coverage.iter().zip(base_array.base_records().iter()) {
        let record = record?;
        let mut anchors = BTreeMap::new();
        for (class, anchor) in record.base_anchors(base_data).iter().enumerate() {
            let Some(anchor) = anchor else { continue };
            anchors.insert(class as u16, unbuild_anchor(&anchor?));
        }
        bases.insert(gid, anchors);
    }
    Ok(MarkBasePos { marks, bases })
}

pub(crate) fn unbuild_mark_lig_pos(
    subtable: &rgpos::MarkLigPosFormat1,
) -> Result<MarkLigPos, ReadError> {
    let mark_coverage = subtable.mark_coverage()?;
    let mark_array = subtable.mark_array()?;
    let marks = unbuild_mark_array(&mark_coverage, &mark_array)?;

    let lig_coverage = subtable.ligature_coverage()?;
    let lig_array = subtable.ligature_array()?;
    let mut ligatures = BTreeMap::new();
    for (gid, attach) in lig_coverage
        .iter()
        .zip(lig_array.ligature_attaches().iter())
    {
        let attach = attach?;
        let attach_data = attach.offset_data();
        let mut components = Vec::new();
        for record in attach.component_records().iter() {
            let record = record?;
            let mut anchors = BTreeMap::new();
            for (class, anchor) in record.ligature_anchors(attach_data).iter().enumerate() {
                let Some(anchor) = anchor else { continue };
                anchors.insert(class as u16, unbuild_anchor(&anchor?));
            }
            components.push(anchors);
        }
        ligatures.insert(gid, components);
    }
    Ok(MarkLigPos { marks, ligatures })
}

fn unbuild_mark_array(
    coverage: &write_fonts::read::tables::layout::CoverageTable,
    array: &rgpos::MarkArray,
) -> Result<BTreeMap<GlyphId16, (u16, Anchor)>, ReadError> {
    let data = array.offset_data();
    let mut marks = BTreeMap::new();
    for (gid, record) in coverage.iter().zip(array.mark_records()) {
        let anchor = record.mark_anchor(data)?;
        marks.insert(gid, (record.mark_class(), unbuild_anchor(&anchor)));
    }
    Ok(marks)
}
