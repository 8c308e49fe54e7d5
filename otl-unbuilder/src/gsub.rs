//! Decompiling GSUB lookup subtables into owned rule data

use std::collections::BTreeMap;

use smol_str::SmolStr;
use write_fonts::{
    read::{
        tables::{
            gsub::{self as rgsub, SubstitutionSubtables},
            layout::{
                ChainedSequenceContext, ClassDef, CoverageTable, SequenceContext,
                SequenceLookupRecord,
            },
        },
        ReadError,
    },
    types::GlyphId16,
};

use crate::common::{self, ClassMap};

/// Named glyph classes referenced by the rules of a contextual subtable.
///
/// Keys are the symbolic names produced by [`common::class_name`].
pub type ClassTable = BTreeMap<SmolStr, Vec<GlyphId16>>;

/// A single decompiled GSUB subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubstSubtable {
    Single(SingleSubst),
    Multiple(MultipleSubst),
    Alternate(AlternateSubst),
    Ligature(LigatureSubst),
    Context(ContextSubst),
    ChainContext(ChainContextSubst),
}

impl SubstSubtable {
    /// The GSUB lookup type this subtable belongs to (1..=6).
    pub fn lookup_type(&self) -> u16 {
        match self {
            SubstSubtable::Single(_) => 1,
            SubstSubtable::Multiple(_) => 2,
            SubstSubtable::Alternate(_) => 3,
            SubstSubtable::Ligature(_) => 4,
            SubstSubtable::Context(_) => 5,
            SubstSubtable::ChainContext(_) => 6,
        }
    }
}

/// Decompiled single substitution (lookup type 1).
///
/// Both source formats reduce to a glyph-to-glyph map; we keep the format
/// around so the caller can tell how the mapping was stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleSubst {
    pub format: u16,
    pub mapping: BTreeMap<GlyphId16, GlyphId16>,
}

/// Decompiled multiple substitution (lookup type 2).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultipleSubst {
    pub mapping: BTreeMap<GlyphId16, Vec<GlyphId16>>,
}

/// Decompiled alternate substitution (lookup type 3).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlternateSubst {
    pub alternates: BTreeMap<GlyphId16, Vec<GlyphId16>>,
}

/// Decompiled ligature substitution (lookup type 4).
///
/// Keys are the full input sequence, first glyph included; the first glyph
/// comes from the coverage table, the rest from the ligature's component list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LigatureSubst {
    pub ligatures: BTreeMap<Vec<GlyphId16>, GlyphId16>,
}

/// One position in a contextual rule sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeqItem {
    /// A specific glyph.
    Glyph(GlyphId16),
    /// A reference into the subtable's class table.
    Class(SmolStr),
    /// An inline set of glyphs, from a format 3 coverage table.
    Set(Vec<GlyphId16>),
}

/// A rule in a contextual substitution subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextRule {
    pub input: Vec<SeqItem>,
    /// Indices into the lookup list, applied at positions within the match.
    pub lookup_indices: Vec<u16>,
}

/// Decompiled contextual substitution (lookup type 5).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextSubst {
    pub format: u16,
    pub rules: Vec<ContextRule>,
    /// Classes referenced by format 2 rules; empty for other formats.
    pub classes: ClassTable,
}

/// A rule in a chained contextual substitution subtable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainRule {
    pub backtrack: Vec<SeqItem>,
    pub input: Vec<SeqItem>,
    pub lookahead: Vec<SeqItem>,
    pub lookup_indices: Vec<u16>,
}

/// Decompiled chained contextual substitution (lookup type 6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainContextSubst {
    pub format: u16,
    pub rules: Vec<ChainRule>,
    pub backtrack_classes: ClassTable,
    pub input_classes: ClassTable,
    pub lookahead_classes: ClassTable,
}

/// Decompile all the subtables of a single GSUB lookup.
///
/// Reverse chain subtables (lookup type 8) have no equivalent in our rule
/// model and are skipped.
pub fn unbuild_subtables(
    subtables: &SubstitutionSubtables,
) -> Result<Vec<SubstSubtable>, ReadError> {
    match subtables {
        SubstitutionSubtables::Single(subs) => subs
            .iter()
            .map(|sub| Ok(SubstSubtable::Single(unbuild_single(&sub?)?)))
            .collect(),
        SubstitutionSubtables::Multiple(subs) => subs
            .iter()
            .map(|sub| Ok(SubstSubtable::Multiple(unbuild_multiple(&sub?)?)))
            .collect(),
        SubstitutionSubtables::Alternate(subs) => subs
            .iter()
            .map(|sub| Ok(SubstSubtable::Alternate(unbuild_alternate(&sub?)?)))
            .collect(),
        SubstitutionSubtables::Ligature(subs) => subs
            .iter()
            .map(|sub| Ok(SubstSubtable::Ligature(unbuild_ligature(&sub?)?)))
            .collect(),
        SubstitutionSubtables::Contextual(subs) => subs
            .iter()
            .map(|sub| Ok(SubstSubtable::Context(unbuild_context(&sub?)?)))
            .collect(),
        SubstitutionSubtables::ChainContextual(subs) => subs
            .iter()
            .map(|sub| Ok(SubstSubtable::ChainContext(unbuild_chain_context(&sub?)?)))
            .collect(),
        SubstitutionSubtables::Reverse(_) => {
            log::debug!("skipping reverse chain substitution subtables");
            Ok(Vec::new())
        }
    }
}

pub(crate) fn unbuild_single(subtable: &rgsub::SingleSubst) -> Result<SingleSubst, ReadError> {
    let mut mapping = BTreeMap::new();
    let format = match subtable {
        rgsub::SingleSubst::Format1(sub) => {
            let coverage = sub.coverage()?;
            let delta = sub.delta_glyph_id() as i32;
            for target in coverage.iter() {
                // glyph id arithmetic is modulo 65536
                let out = (target.to_u16() as i32 + delta).rem_euclid(0x1_0000) as u16;
                mapping.insert(target, GlyphId16::new(out));
            }
            1
        }
        rgsub::SingleSubst::Format2(sub) => {
            let coverage = sub.coverage()?;
            for (target, replacement) in
                coverage.iter().zip(sub.substitute_glyph_ids().iter())
            {
                mapping.insert(target, replacement.get());
            }
            2
        }
    };
    Ok(SingleSubst { format, mapping })
}

pub(crate) fn unbuild_multiple(
    subtable: &rgsub::MultipleSubstFormat1,
) -> Result<MultipleSubst, ReadError> {
    let coverage = subtable.coverage()?;
    let mut mapping = BTreeMap::new();
    for (target, sequence) in coverage.iter().zip(subtable.sequences().iter()) {
        let sequence = sequence?;
        let replacement = sequence
            .substitute_glyph_ids()
            .iter()
            .map(|gid| gid.get())
            .collect();
        mapping.insert(target, replacement);
    }
    Ok(MultipleSubst { mapping })
}

pub(crate) fn unbuild_alternate(
    subtable: &rgsub::AlternateSubstFormat1,
) -> Result<AlternateSubst, ReadError> {
    let coverage = subtable.coverage()?;
    let mut alternates = BTreeMap::new();
    for (target, set) in coverage.iter().zip(subtable.alternate_sets().iter()) {
        let set = set?;
        let glyphs = set
            .alternate_glyph_ids()
            .iter()
            .map(|gid| gid.get())
            .collect();
        alternates.insert(target, glyphs);
    }
    Ok(AlternateSubst { alternates })
}

pub(crate) fn unbuild_ligature(
    subtable: &rgsub::LigatureSubstFormat1,
) -> Result<LigatureSubst, ReadError> {
    let coverage = subtable.coverage()?;
    let mut ligatures = BTreeMap::new();
    for (first, set) in coverage.iter().zip(subtable.ligature_sets().iter()) {
        let set = set?;
        for ligature in set.ligatures().iter() {
            let ligature = ligature?;
            let mut components = vec![first];
            components.extend(ligature.component_glyph_ids().iter().map(|gid| gid.get()));
            ligatures.insert(components, ligature.ligature_glyph());
        }
    }
    Ok(LigatureSubst { ligatures })
}

pub(crate) fn unbuild_context(subtable: &SequenceContext) -> Result<ContextSubst, ReadError> {
    match subtable {
        SequenceContext::Format1(sub) => {
            let coverage = sub.coverage()?;
            let mut rules = Vec::new();
            for (first, rule_set) in coverage.iter().zip(sub.seq_rule_sets().iter()) {
                let Some(rule_set) = rule_set else { continue };
                let rule_set = rule_set?;
                for rule in rule_set.seq_rules().iter() {
                    let rule = rule?;
                    let mut input = vec![SeqItem::Glyph(first)];
                    input.extend(
                        rule.input_sequence()
                            .iter()
                            .map(|gid| SeqItem::Glyph(gid.get())),
                    );
                    rules.push(ContextRule {
                        input,
                        lookup_indices: lookup_indices(rule.seq_lookup_records()),
                    });
                }
            }
            Ok(ContextSubst {
                format: 1,
                rules,
                classes: ClassTable::new(),
            })
        }
        SequenceContext::Format2(sub) => {
            let coverage = sub.coverage()?;
            let class_def = sub.class_def()?;
            let classes = context_classes(&coverage, &class_def);
            let mut rules = Vec::new();
            for rule_set in sub.class_seq_rule_sets().iter() {
                let Some(rule_set) = rule_set else { continue };
                let rule_set = rule_set?;
                for rule in rule_set.class_seq_rules().iter() {
                    let rule = rule?;
                    let mut input = vec![SeqItem::Class(common::class_name(1))];
                    input.extend(
                        rule.input_sequence()
                            .iter()
                            .map(|class| SeqItem::Class(common::class_name(class.get()))),
                    );
                    rules.push(ContextRule {
                        input,
                        lookup_indices: lookup_indices(rule.seq_lookup_records()),
                    });
                }
            }
            Ok(ContextSubst {
                format: 2,
                rules,
                classes,
            })
        }
        SequenceContext::Format3(sub) => {
            let input = sub
                .coverages()
                .iter()
                .map(|cov| Ok(SeqItem::Set(common::unbuild_coverage(&cov?))))
                .collect::<Result<_, ReadError>>()?;
            let rule = ContextRule {
                input,
                lookup_indices: lookup_indices(sub.seq_lookup_records()),
            };
            Ok(ContextSubst {
                format: 3,
                rules: vec![rule],
                classes: ClassTable::new(),
            })
        }
    }
}

pub(crate) fn unbuild_chain_context(
    subtable: &ChainedSequenceContext,
) -> Result<ChainContextSubst, ReadError> {
    match subtable {
        ChainedSequenceContext::Format1(sub) => {
            let coverage = sub.coverage()?;
            let mut rules = Vec::new();
            for (first, rule_set) in coverage.iter().zip(sub.chained_seq_rule_sets().iter()) {
                let Some(rule_set) = rule_set else { continue };
                let rule_set = rule_set?;
                for rule in rule_set.chained_seq_rules().iter() {
                    let rule = rule?;
                    let mut input = vec![SeqItem::Glyph(first)];
                    input.extend(
                        rule.input_sequence()
                            .iter()
                            .map(|gid| SeqItem::Glyph(gid.get())),
                    );
                    rules.push(ChainRule {
                        backtrack: glyph_items(rule.backtrack_sequence()),
                        input,
                        lookahead: glyph_items(rule.lookahead_sequence()),
                        lookup_indices: lookup_indices(rule.seq_lookup_records()),
                    });
                }
            }
            Ok(ChainContextSubst {
                format: 1,
                rules,
                backtrack_classes: ClassTable::new(),
                input_classes: ClassTable::new(),
                lookahead_classes: ClassTable::new(),
            })
        }
        ChainedSequenceContext::Format2(sub) => {
            let coverage = sub.coverage()?;
            let backtrack_classes = named_classes(common::unbuild_class_def(
                &sub.backtrack_class_def()?,
            ));
            let input_classes = context_classes(&coverage, &sub.input_class_def()?);
            let lookahead_classes = named_classes(common::unbuild_class_def(
                &sub.lookahead_class_def()?,
            ));
            let mut rules = Vec::new();
            for rule_set in sub.chained_class_seq_rule_sets().iter() {
                let Some(rule_set) = rule_set else { continue };
                let rule_set = rule_set?;
                for rule in rule_set.chained_class_seq_rules().iter() {
                    let rule = rule?;
                    let mut input = vec![SeqItem::Class(common::class_name(1))];
                    input.extend(
                        rule.input_sequence()
                            .iter()
                            .map(|class| SeqItem::Class(common::class_name(class.get()))),
                    );
                    rules.push(ChainRule {
                        backtrack: class_items(rule.backtrack_sequence()),
                        input,
                        lookahead: class_items(rule.lookahead_sequence()),
                        lookup_indices: lookup_indices(rule.seq_lookup_records()),
                    });
                }
            }
            Ok(ChainContextSubst {
                format: 2,
                rules,
                backtrack_classes,
                input_classes,
                lookahead_classes,
            })
        }
        ChainedSequenceContext::Format3(sub) => {
            let backtrack = set_items(sub.backtrack_coverages().iter())?;
            let input = set_items(sub.input_coverages().iter())?;
            let lookahead = set_items(sub.lookahead_coverages().iter())?;
            let rule = ChainRule {
                backtrack,
                input,
                lookahead,
                lookup_indices: lookup_indices(sub.seq_lookup_records()),
            };
            Ok(ChainContextSubst {
                format: 3,
                rules: vec![rule],
                backtrack_classes: ClassTable::new(),
                input_classes: ClassTable::new(),
                lookahead_classes: ClassTable::new(),
            })
        }
    }
}

fn lookup_indices(records: &[SequenceLookupRecord]) -> Vec<u16> {
    records.iter().map(|rec| rec.lookup_list_index()).collect()
}

fn glyph_items(sequence: &[write_fonts::read::types::BigEndian<GlyphId16>]) -> Vec<SeqItem> {
    sequence
        .iter()
        .map(|gid| SeqItem::Glyph(gid.get()))
        .collect()
}

fn class_items(sequence: &[write_fonts::read::types::BigEndian<u16>]) -> Vec<SeqItem> {
    sequence
        .iter()
        .map(|class| SeqItem::Class(common::class_name(class.get())))
        .collect()
}

fn set_items<'a>(
    coverages: impl Iterator<Item = Result<CoverageTable<'a>, ReadError>>,
) -> Result<Vec<SeqItem>, ReadError> {
    coverages
        .map(|cov| Ok(SeqItem::Set(common::unbuild_coverage(&cov?))))
        .collect()
}

/// Classes for a format 2 contextual subtable.
///
/// Coverage glyphs not assigned to a class land in class 0, which exists
/// implicitly in the source table.
fn context_classes(coverage: &CoverageTable, class_def: &ClassDef) -> ClassTable {
    let mut classes = common::unbuild_class_def(class_def);
    for gid in coverage.iter() {
        if class_def.get(gid) == 0 {
            let class0 = classes.entry(0).or_default();
            if !class0.contains(&gid) {
                class0.push(gid);
            }
        }
    }
    if let Some(class0) = classes.get_mut(&0) {
        class0.sort_unstable();
    }
    named_classes(classes)
}

fn named_classes(classes: ClassMap) -> ClassTable {
    classes
        .into_iter()
        .map(|(class, glyphs)| (common::class_name(class), glyphs))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use write_fonts::{
        dump_table,
        read::FontRead,
        tables::{gsub as wgsub, layout as wlayout, layout::builders::CoverageTableBuilder},
    };

    use super::*;

    fn gid(raw: u16) -> GlyphId16 {
        GlyphId16::new(raw)
    }

    fn coverage(glyphs: impl IntoIterator<Item = u16>) -> wlayout::CoverageTable {
        glyphs
            .into_iter()
            .map(gid)
            .collect::<CoverageTableBuilder>()
            .build()
    }

    #[test]
    fn single_subst_delta_wraps_modulo_glyph_space() {
        let table = wgsub::SingleSubstFormat1::new(coverage([4, 0xFFFF]), 3);
        let bytes = dump_table(&table).unwrap();
        let read = rgsub::SingleSubst::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_single(&read).unwrap();
        assert_eq!(sub.format, 1);
        assert_eq!(sub.mapping.get(&gid(4)), Some(&gid(7)));
        // 0xFFFF + 3 wraps to 2
        assert_eq!(sub.mapping.get(&gid(0xFFFF)), Some(&gid(2)));
    }

    #[test]
    fn single_subst_format2_pairs_coverage_order() {
        let table =
            wgsub::SingleSubstFormat2::new(coverage([9, 2]), vec![gid(20), gid(90)]);
        let bytes = dump_table(&table).unwrap();
        let read = rgsub::SingleSubst::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_single(&read).unwrap();
        assert_eq!(sub.format, 2);
        // coverage sorts glyphs, so gid 2 pairs with the first substitute
        assert_eq!(sub.mapping.get(&gid(2)), Some(&gid(20)));
        assert_eq!(sub.mapping.get(&gid(9)), Some(&gid(90)));
    }

    #[test]
    fn multiple_subst_decomposition() {
        let table = wgsub::MultipleSubstFormat1::new(
            coverage([5]),
            vec![wgsub::Sequence::new(vec![gid(6), gid(7)])],
        );
        let bytes = dump_table(&table).unwrap();
        let read = rgsub::MultipleSubstFormat1::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_multiple(&read).unwrap();
        assert_eq!(sub.mapping.get(&gid(5)), Some(&vec![gid(6), gid(7)]));
    }

    #[test]
    fn alternate_subst_sets() {
        let table = wgsub::AlternateSubstFormat1::new(
            coverage([3]),
            vec![wgsub::AlternateSet::new(vec![gid(30), gid(31)])],
        );
        let bytes = dump_table(&table).unwrap();
        let read = rgsub::AlternateSubstFormat1::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_alternate(&read).unwrap();
        assert_eq!(sub.alternates.get(&gid(3)), Some(&vec![gid(30), gid(31)]));
    }

    #[test]
    fn ligature_keys_start_with_coverage_glyph() {
        // f + i -> fi, f + f + i -> ffi
        let table = wgsub::LigatureSubstFormat1::new(
            coverage([10]),
            vec![wgsub::LigatureSet::new(vec![
                wgsub::Ligature::new(gid(100), vec![gid(11)]),
                wgsub::Ligature::new(gid(101), vec![gid(10), gid(11)]),
            ])],
        );
        let bytes = dump_table(&table).unwrap();
        let read = rgsub::LigatureSubstFormat1::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_ligature(&read).unwrap();
        assert_eq!(sub.ligatures.get(&vec![gid(10), gid(11)]), Some(&gid(100)));
        assert_eq!(
            sub.ligatures.get(&vec![gid(10), gid(10), gid(11)]),
            Some(&gid(101))
        );
    }

    #[test]
    fn context_format1_rule_includes_coverage_glyph() {
        let rule = wlayout::SequenceRule::new(
            vec![gid(6)],
            vec![wlayout::SequenceLookupRecord::new(0, 2)],
        );
        let table = wlayout::SequenceContext::format_1(
            coverage([5]),
            vec![Some(wlayout::SequenceRuleSet::new(vec![rule]))],
        );
        let bytes = dump_table(&table).unwrap();
        let read = SequenceContext::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_context(&read).unwrap();
        assert_eq!(sub.format, 1);
        assert_eq!(sub.rules.len(), 1);
        assert_eq!(
            sub.rules[0].input,
            vec![SeqItem::Glyph(gid(5)), SeqItem::Glyph(gid(6))]
        );
        assert_eq!(sub.rules[0].lookup_indices, vec![2]);
    }

    #[test]
    fn context_format2_classes_and_rules() {
        let class_def = [(gid(5), 1u16), (gid(6), 2)]
            .into_iter()
            .collect::<wlayout::ClassDef>();
        let rule = wlayout::ClassSequenceRule::new(
            vec![2],
            vec![wlayout::SequenceLookupRecord::new(0, 3)],
        );
        let table = wlayout::SequenceContext::format_2(
            // gid 9 is covered but unclassed, so it belongs to class 0
            coverage([5, 9]),
            class_def,
            vec![
                None,
                Some(wlayout::ClassSequenceRuleSet::new(vec![rule])),
            ],
        );
        let bytes = dump_table(&table).unwrap();
        let read = SequenceContext::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_context(&read).unwrap();
        assert_eq!(sub.format, 2);
        assert_eq!(
            sub.rules[0].input,
            vec![
                SeqItem::Class("class1".into()),
                SeqItem::Class("class2".into())
            ]
        );
        assert_eq!(sub.rules[0].lookup_indices, vec![3]);
        assert_eq!(sub.classes.get("class1"), Some(&vec![gid(5)]));
        assert_eq!(sub.classes.get("class2"), Some(&vec![gid(6)]));
        assert!(sub.classes.get("class0").unwrap().contains(&gid(9)));
    }

    #[test]
    fn context_format3_single_rule_of_sets() {
        let table = wlayout::SequenceContext::format_3(
            vec![coverage([1, 2]), coverage([3])],
            vec![wlayout::SequenceLookupRecord::new(1, 4)],
        );
        let bytes = dump_table(&table).unwrap();
        let read = SequenceContext::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_context(&read).unwrap();
        assert_eq!(sub.format, 3);
        assert_eq!(sub.rules.len(), 1);
        assert_eq!(
            sub.rules[0].input,
            vec![
                SeqItem::Set(vec![gid(1), gid(2)]),
                SeqItem::Set(vec![gid(3)])
            ]
        );
        assert_eq!(sub.rules[0].lookup_indices, vec![4]);
    }

    #[test]
    fn chain_context_format1_rule() {
        let rule = wlayout::ChainedSequenceRule::new(
            vec![gid(1)],
            vec![gid(8)],
            vec![gid(9)],
            vec![wlayout::SequenceLookupRecord::new(0, 1)],
        );
        let table = wlayout::ChainedSequenceContext::format_1(
            coverage([7]),
            vec![Some(wlayout::ChainedSequenceRuleSet::new(vec![rule]))],
        );
        let bytes = dump_table(&table).unwrap();
        let read = ChainedSequenceContext::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_chain_context(&read).unwrap();
        assert_eq!(sub.format, 1);
        assert_eq!(sub.rules[0].backtrack, vec![SeqItem::Glyph(gid(1))]);
        assert_eq!(
            sub.rules[0].input,
            vec![SeqItem::Glyph(gid(7)), SeqItem::Glyph(gid(8))]
        );
        assert_eq!(sub.rules[0].lookahead, vec![SeqItem::Glyph(gid(9))]);
    }

    #[test]
    fn chain_context_format2_class_tables() {
        let backtrack = [(gid(1), 1u16)].into_iter().collect::<wlayout::ClassDef>();
        let input = [(gid(7), 1u16)].into_iter().collect::<wlayout::ClassDef>();
        let lookahead = [(gid(9), 1u16)].into_iter().collect::<wlayout::ClassDef>();
        let rule = wlayout::ChainedClassSequenceRule::new(
            vec![1],
            vec![],
            vec![1],
            vec![wlayout::SequenceLookupRecord::new(0, 5)],
        );
        let table = wlayout::ChainedSequenceContext::format_2(
            coverage([7]),
            backtrack,
            input,
            lookahead,
            vec![
                None,
                Some(wlayout::ChainedClassSequenceRuleSet::new(vec![rule])),
            ],
        );
        let bytes = dump_table(&table).unwrap();
        let read = ChainedSequenceContext::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_chain_context(&read).unwrap();
        assert_eq!(sub.format, 2);
        assert_eq!(sub.rules[0].backtrack, vec![SeqItem::Class("class1".into())]);
        assert_eq!(sub.rules[0].input, vec![SeqItem::Class("class1".into())]);
        assert_eq!(sub.rules[0].lookahead, vec![SeqItem::Class("class1".into())]);
        assert_eq!(sub.backtrack_classes.get("class1"), Some(&vec![gid(1)]));
        assert_eq!(sub.input_classes.get("class1"), Some(&vec![gid(7)]));
        assert_eq!(sub.lookahead_classes.get("class1"), Some(&vec![gid(9)]));
    }

    #[test]
    fn chain_context_format3_sets() {
        let table = wlayout::ChainedSequenceContext::format_3(
            vec![coverage([1])],
            vec![coverage([7, 8])],
            vec![coverage([9])],
            vec![wlayout::SequenceLookupRecord::new(0, 6)],
        );
        let bytes = dump_table(&table).unwrap();
        let read = ChainedSequenceContext::read(bytes.as_slice().into()).unwrap();
        let sub = unbuild_chain_context(&read).unwrap();
        assert_eq!(sub.format, 3);
        assert_eq!(sub.rules[0].backtrack, vec![SeqItem::Set(vec![gid(1)])]);
        assert_eq!(
            sub.rules[0].input,
            vec![SeqItem::Set(vec![gid(7), gid(8)])]
        );
        assert_eq!(sub.rules[0].lookahead, vec![SeqItem::Set(vec![gid(9)])]);
        assert_eq!(sub.rules[0].lookup_indices, vec![6]);
    }
}
