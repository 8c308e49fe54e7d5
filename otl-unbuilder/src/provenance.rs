//! Tracing output glyphs back to the characters that produce them
//!
//! Starting from the cmap character mapping, we replay the substitution
//! rules of every default language system and record, for each reachable
//! glyph or glyph sequence, where it came from: the input characters, the
//! features involved, and the script.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use write_fonts::types::{GlyphId16, Tag};

use crate::{
    common::DFLT_LANG,
    gsub::{ChainContextSubst, ClassTable, ContextSubst, SeqItem, SingleSubst, SubstSubtable},
    layout::GsubTable,
};

/// Features that rarely say anything useful about provenance.
///
/// Access-all-alternates maps nearly everything to everything, and the
/// small-caps features only churn case variants.
pub const DEFAULT_IGNORED_FEATURES: [Tag; 3] =
    [Tag::new(b"aalt"), Tag::new(b"smcp"), Tag::new(b"c2sc")];

/// Settings for a [`Resolver`].
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Features whose lookups are not walked.
    pub ignored_features: BTreeSet<Tag>,
    /// Cap on the number of glyphs taken from a class or coverage set when
    /// expanding a contextual rule position.
    pub max_class_expansion: usize,
    /// How many times to walk the full lookup graph.
    ///
    /// A second pass picks up rules whose inputs only gained origins during
    /// the first.
    pub pass_count: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            ignored_features: DEFAULT_IGNORED_FEATURES.into_iter().collect(),
            max_class_expansion: 100,
            pass_count: 2,
        }
    }
}

/// Where a glyph (or glyph sequence) came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Origin {
    /// The input characters, concatenated.
    pub input: String,
    /// The features that applied along the way, outermost first.
    pub features: Vec<Tag>,
    pub script: Tag,
    pub language: Tag,
}

/// A key in the origin map: one glyph, or a sequence matched by a
/// contextual rule.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OriginKey {
    Single(GlyphId16),
    Sequence(Vec<GlyphId16>),
}

pub type OriginMap = BTreeMap<OriginKey, Origin>;

/// Counters for the events a resolution run can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Rule inputs with no recorded origin.
    pub missing_origin: usize,
    /// Class or coverage expansions cut off at the configured cap.
    pub truncated_expansions: usize,
    /// Origins overwritten by a later ligature or contextual rule.
    pub overwrites: usize,
    /// Multiple-substitution targets we declined to trace.
    pub multiple_subst_skipped: usize,
}

/// Seed an origin map from character-to-glyph pairs.
///
/// Entries carry no feature or script information; those accumulate as
/// substitution rules are applied. When several characters map to the same
/// glyph the first one wins.
pub fn seed_origins(cmap: impl IntoIterator<Item = (char, GlyphId16)>) -> OriginMap {
    let mut origins = OriginMap::new();
    for (chr, gid) in cmap {
        origins.entry(OriginKey::Single(gid)).or_insert(Origin {
            input: chr.to_string(),
            features: Vec::new(),
            script: crate::common::DFLT_SCRIPT,
            language: DFLT_LANG,
        });
    }
    origins
}

/// Walks a decompiled GSUB table, growing an origin map.
pub struct Resolver<'a> {
    table: &'a GsubTable,
    config: ResolverConfig,
    stats: ResolverStats,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a GsubTable, config: ResolverConfig) -> Self {
        Resolver {
            table,
            config,
            stats: ResolverStats::default(),
        }
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    /// Run the configured number of passes over the lookup graph.
    pub fn resolve(&mut self, origins: &mut OriginMap) {
        for _ in 0..self.config.pass_count {
            self.run_pass(origins);
        }
    }

    fn run_pass(&mut self, origins: &mut OriginMap) {
        let table = self.table;
        // each lookup applies once per pass, under the first feature and
        // script that reach it
        let mut processed = HashSet::new();
        for script in &table.scripts {
            let Some(lang_sys) = script.default_lang_sys.as_ref() else {
                continue;
            };
            let mut features = Vec::new();
            for idx in &lang_sys.feature_indices {
                match table.features.get(*idx as usize) {
                    Some(feature) => features.push(feature),
                    None => log::warn!("feature index {idx} out of bounds"),
                }
            }
            // walk features in a stable order so reruns agree
            features.sort_by(|a, b| a.lookup_indices.cmp(&b.lookup_indices));

            for feature in features {
                if self.config.ignored_features.contains(&feature.tag) {
                    continue;
                }
                for lookup_idx in &feature.lookup_indices {
                    if !processed.insert(*lookup_idx) {
                        continue;
                    }
                    let Some(lookup) = table.lookups.get(*lookup_idx as usize) else {
                        log::warn!("lookup index {lookup_idx} out of bounds");
                        continue;
                    };
                    for subtable in &lookup.subtables {
                        self.apply_subtable(subtable, feature.tag, script.tag, origins);
                    }
                }
            }
        }
    }

    fn apply_subtable(
        &mut self,
        subtable: &SubstSubtable,
        feature: Tag,
        script: Tag,
        origins: &mut OriginMap,
    ) {
        match subtable {
            SubstSubtable::Single(sub) => self.apply_single(sub, feature, script, origins),
            SubstSubtable::Ligature(sub) => {
                for (components, lig) in &sub.ligatures {
                    self.apply_sequence(components, *lig, feature, script, origins);
                }
            }
            SubstSubtable::Context(sub) => self.apply_context(sub, feature, script, origins),
            SubstSubtable::ChainContext(sub) => {
                self.apply_chain_context(sub, feature, script, origins)
            }
            SubstSubtable::Multiple(sub) => {
                // one glyph becoming several has no single origin record
                self.stats.multiple_subst_skipped += sub.mapping.len();
            }
            SubstSubtable::Alternate(_) => {
                log::debug!("alternate substitution does not affect provenance");
            }
        }
    }

    fn apply_single(
        &mut self,
        sub: &SingleSubst,
        feature: Tag,
        script: Tag,
        origins: &mut OriginMap,
    ) {
        for (target, replacement) in &sub.mapping {
            let out_key = OriginKey::Single(*replacement);
            // an earlier-established origin for the output glyph wins
            if origins.contains_key(&out_key) {
                continue;
            }
            let Some(source) = origins.get(&OriginKey::Single(*target)) else {
                log::debug!("no origin for glyph {target}, skipping substitution");
                self.stats.missing_origin += 1;
                continue;
            };
            let mut features = vec![feature];
            features.extend(source.features.iter().copied());
            let origin = Origin {
                input: source.input.clone(),
                features,
                script,
                language: DFLT_LANG,
            };
            origins.insert(out_key, origin);
        }
    }

    /// Record an origin for a glyph produced from a glyph sequence.
    ///
    /// Inputs and features concatenate across the sequence; members with no
    /// origin are omitted, so the record may be partial or even empty.
    /// Unlike single substitution this always overwrites.
    fn apply_sequence(
        &mut self,
        components: &[GlyphId16],
        produced: GlyphId16,
        feature: Tag,
        script: Tag,
        origins: &mut OriginMap,
    ) {
        let mut input = String::new();
        let mut features = vec![feature];
        for component in components {
            let Some(origin) = origins.get(&OriginKey::Single(*component)) else {
                log::debug!("no origin for ligature component {component}");
                self.stats.missing_origin += 1;
                continue;
            };
            input.push_str(&origin.input);
            features.extend(origin.features.iter().copied());
        }
        let key = OriginKey::Single(produced);
        let origin = Origin {
            input,
            features,
            script,
            language: DFLT_LANG,
        };
        if origins.insert(key, origin).is_some() {
            self.stats.overwrites += 1;
        }
    }

    fn apply_context(
        &mut self,
        sub: &ContextSubst,
        feature: Tag,
        script: Tag,
        origins: &mut OriginMap,
    ) {
        for rule in &sub.rules {
            let Some(candidates) = self.expand_items(&rule.input, &sub.classes) else {
                continue;
            };
            self.emit_tuples(&candidates, feature, script, origins);
        }
    }

    fn apply_chain_context(
        &mut self,
        sub: &ChainContextSubst,
        feature: Tag,
        script: Tag,
        origins: &mut OriginMap,
    ) {
        // the tuple key spans the whole match, backtrack and lookahead
        // included, each part expanded against its own class table
        for rule in &sub.rules {
            let Some(mut candidates) = self.expand_items(&rule.backtrack, &sub.backtrack_classes)
            else {
                continue;
            };
            let Some(input) = self.expand_items(&rule.input, &sub.input_classes) else {
                continue;
            };
            let Some(lookahead) = self.expand_items(&rule.lookahead, &sub.lookahead_classes) else {
                continue;
            };
            candidates.extend(input);
            candidates.extend(lookahead);
            self.emit_tuples(&candidates, feature, script, origins);
        }
    }

    /// Expand each rule position to its candidate glyphs.
    ///
    /// Returns `None` if any position references an unknown class.
    fn expand_items(
        &mut self,
        items: &[SeqItem],
        classes: &ClassTable,
    ) -> Option<Vec<Vec<GlyphId16>>> {
        let mut expanded = Vec::with_capacity(items.len());
        for item in items {
            let mut glyphs = match item {
                SeqItem::Glyph(gid) => vec![*gid],
                SeqItem::Set(glyphs) => glyphs.clone(),
                SeqItem::Class(name) => match classes.get(name) {
                    Some(glyphs) => glyphs.clone(),
                    None => {
                        log::debug!("rule references unknown class '{name}'");
                        return None;
                    }
                },
            };
            if glyphs.len() > self.config.max_class_expansion {
                glyphs.truncate(self.config.max_class_expansion);
                self.stats.truncated_expansions += 1;
            }
            expanded.push(glyphs);
        }
        Some(expanded)
    }

    /// Record one origin per tuple in the cartesian product of the
    /// candidate lists.
    fn emit_tuples(
        &mut self,
        candidates: &[Vec<GlyphId16>],
        feature: Tag,
        script: Tag,
        origins: &mut OriginMap,
    ) {
        if candidates.iter().any(Vec::is_empty) {
            return;
        }
        let mut indices = vec![0usize; candidates.len()];
        loop {
            let tuple: Vec<GlyphId16> = indices
                .iter()
                .zip(candidates)
                .map(|(idx, glyphs)| glyphs[*idx])
                .collect();
            self.emit_tuple(&tuple, feature, script, origins);

            // odometer increment
            let mut pos = candidates.len();
            loop {
                if pos == 0 {
                    return;
                }
                pos -= 1;
                indices[pos] += 1;
                if indices[pos] < candidates[pos].len() {
                    break;
                }
                indices[pos] = 0;
            }
        }
    }

    fn emit_tuple(
        &mut self,
        tuple: &[GlyphId16],
        feature: Tag,
        script: Tag,
        origins: &mut OriginMap,
    ) {
        let mut input = String::new();
        let mut features = vec![feature];
        // a contextual match is only meaningful if every member is known
        for gid in tuple {
            let Some(origin) = origins.get(&OriginKey::Single(*gid)) else {
                self.stats.missing_origin += 1;
                return;
            };
            input.push_str(&origin.input);
            features.extend(origin.features.iter().copied());
        }
        let key = OriginKey::Sequence(tuple.to_vec());
        let origin = Origin {
            input,
            features,
            script,
            language: DFLT_LANG,
        };
        if origins.insert(key, origin).is_some() {
            self.stats.overwrites += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use write_fonts::tables::layout::LookupFlag;

    use crate::gsub::{ChainRule, ContextRule, LigatureSubst, MultipleSubst};
    use crate::layout::{FeatureEntry, LangSys, LookupEntry, ScriptEntry};

    use super::*;

    fn gid(raw: u16) -> GlyphId16 {
        GlyphId16::new(raw)
    }

    fn single_lookup(mapping: &[(u16, u16)]) -> LookupEntry<SubstSubtable> {
        LookupEntry {
            lookup_type: 1,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![SubstSubtable::Single(SingleSubst {
                format: 2,
                mapping: mapping
                    .iter()
                    .map(|(from, to)| (gid(*from), gid(*to)))
                    .collect(),
            })],
        }
    }

    fn table_with_lookups(
        features: Vec<(Tag, Vec<u16>)>,
        lookups: Vec<LookupEntry<SubstSubtable>>,
    ) -> GsubTable {
        let feature_count = features.len() as u16;
        GsubTable {
            version: (1, 0),
            lookups,
            features: features
                .into_iter()
                .map(|(tag, lookup_indices)| FeatureEntry {
                    tag,
                    lookup_indices,
                    params: None,
                })
                .collect(),
            scripts: vec![ScriptEntry {
                tag: Tag::new(b"latn"),
                default_lang_sys: Some(LangSys {
                    required_feature_index: None,
                    feature_indices: (0..feature_count).collect(),
                }),
                lang_systems: Vec::new(),
            }],
        }
    }

    fn seed(pairs: &[(char, u16)]) -> OriginMap {
        seed_origins(pairs.iter().map(|(c, g)| (*c, gid(*g))))
    }

    #[test]
    fn single_subst_first_writer_wins() {
        let lookups = vec![
            single_lookup(&[(1, 10)]),
            // second lookup also produces gid 10, from a different source
            single_lookup(&[(2, 10)]),
        ];
        let table = table_with_lookups(vec![(Tag::new(b"liga"), vec![0, 1])], lookups);
        let mut origins = seed(&[('a', 1), ('b', 2)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        let origin = origins.get(&OriginKey::Single(gid(10))).unwrap();
        assert_eq!(origin.input, "a");
        assert_eq!(origin.features, vec![Tag::new(b"liga")]);
        assert_eq!(origin.script, Tag::new(b"latn"));
        assert_eq!(origin.language, Tag::new(b"dflt"));
    }

    #[test]
    fn ligature_concatenates_inputs() {
        let lig = LookupEntry {
            lookup_type: 4,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![SubstSubtable::Ligature(LigatureSubst {
                ligatures: [(vec![gid(1), gid(2)], gid(20))].into_iter().collect(),
            })],
        };
        let table = table_with_lookups(vec![(Tag::new(b"liga"), vec![0])], vec![lig]);
        let mut origins = seed(&[('f', 1), ('i', 2)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        let origin = origins.get(&OriginKey::Single(gid(20))).unwrap();
        assert_eq!(origin.input, "fi");
        assert_eq!(origin.features, vec![Tag::new(b"liga")]);
    }

    #[test]
    fn ligature_with_unknown_component_keeps_known_part() {
        let lig = LookupEntry {
            lookup_type: 4,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![SubstSubtable::Ligature(LigatureSubst {
                // gid 9 has no cmap entry
                ligatures: [(vec![gid(1), gid(9), gid(2)], gid(20))]
                    .into_iter()
                    .collect(),
            })],
        };
        let table = table_with_lookups(vec![(Tag::new(b"liga"), vec![0])], vec![lig]);
        let mut origins = seed(&[('f', 1), ('i', 2)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        let origin = origins.get(&OriginKey::Single(gid(20))).unwrap();
        assert_eq!(origin.input, "fi");
        assert!(resolver.stats().missing_origin > 0);
    }

    #[test]
    fn ligature_with_no_known_components_still_records() {
        let lig = LookupEntry {
            lookup_type: 4,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![SubstSubtable::Ligature(LigatureSubst {
                // neither component has a cmap entry
                ligatures: [(vec![gid(8), gid(9)], gid(20))].into_iter().collect(),
            })],
        };
        let table = table_with_lookups(vec![(Tag::new(b"liga"), vec![0])], vec![lig]);
        let mut origins = seed(&[('f', 1)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        // the rule still assigns, with an empty input
        let origin = origins.get(&OriginKey::Single(gid(20))).unwrap();
        assert_eq!(origin.input, "");
        assert_eq!(origin.features, vec![Tag::new(b"liga")]);
        // two unknown components, counted on both passes
        assert_eq!(resolver.stats().missing_origin, 4);
    }

    #[test]
    fn ligature_overwrites_existing_origin() {
        // pass one records gid 20 from the ligature; the second subtable in
        // the same pass rewrites it
        let lig = LookupEntry {
            lookup_type: 4,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![
                SubstSubtable::Ligature(LigatureSubst {
                    ligatures: [(vec![gid(1), gid(2)], gid(20))].into_iter().collect(),
                }),
                SubstSubtable::Ligature(LigatureSubst {
                    ligatures: [(vec![gid(2), gid(1)], gid(20))].into_iter().collect(),
                }),
            ],
        };
        let table = table_with_lookups(vec![(Tag::new(b"liga"), vec![0])], vec![lig]);
        let mut origins = seed(&[('f', 1), ('i', 2)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        let origin = origins.get(&OriginKey::Single(gid(20))).unwrap();
        assert_eq!(origin.input, "if");
        assert!(resolver.stats().overwrites > 0);
    }

    #[test]
    fn second_pass_picks_up_chained_rules() {
        // a -> b in one lookup; b -> c in an earlier lookup that has already
        // run by the time b gains an origin
        let lookups = vec![single_lookup(&[(2, 3)]), single_lookup(&[(1, 2)])];
        let table = table_with_lookups(vec![(Tag::new(b"ccmp"), vec![0, 1])], lookups);
        let mut origins = seed(&[('a', 1)]);

        let mut one_pass = Resolver::new(
            &table,
            ResolverConfig {
                pass_count: 1,
                ..Default::default()
            },
        );
        let mut first = origins.clone();
        one_pass.resolve(&mut first);
        assert!(!first.contains_key(&OriginKey::Single(gid(3))));

        let mut two_pass = Resolver::new(&table, ResolverConfig::default());
        two_pass.resolve(&mut origins);
        let origin = origins.get(&OriginKey::Single(gid(3))).unwrap();
        assert_eq!(origin.input, "a");
        // both features stack, innermost last
        assert_eq!(
            origin.features,
            vec![Tag::new(b"ccmp"), Tag::new(b"ccmp")]
        );
    }

    #[test]
    fn extra_passes_only_add_entries() {
        let lookups = vec![single_lookup(&[(2, 3)]), single_lookup(&[(1, 2)])];
        let table = table_with_lookups(vec![(Tag::new(b"ccmp"), vec![0, 1])], lookups);
        let seeded = seed(&[('a', 1)]);

        let mut after_one = seeded.clone();
        let mut resolver = Resolver::new(
            &table,
            ResolverConfig {
                pass_count: 1,
                ..Default::default()
            },
        );
        resolver.resolve(&mut after_one);

        let mut after_two = seeded.clone();
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut after_two);

        // every first-pass entry survives the second pass unchanged
        for (key, origin) in &after_one {
            assert_eq!(after_two.get(key), Some(origin));
        }
        assert!(after_two.len() > after_one.len());
    }

    #[test]
    fn context_rule_emits_cartesian_product() {
        let context = LookupEntry {
            lookup_type: 5,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![SubstSubtable::Context(ContextSubst {
                format: 3,
                rules: vec![ContextRule {
                    input: vec![
                        SeqItem::Set(vec![gid(1), gid(2)]),
                        SeqItem::Set(vec![gid(3), gid(4), gid(5)]),
                    ],
                    lookup_indices: vec![],
                }],
                classes: ClassTable::new(),
            })],
        };
        let table = table_with_lookups(vec![(Tag::new(b"calt"), vec![0])], vec![context]);
        let mut origins = seed(&[('a', 1), ('b', 2), ('c', 3), ('d', 4), ('e', 5)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        let sequences = origins
            .keys()
            .filter(|key| matches!(key, OriginKey::Sequence(_)))
            .count();
        assert_eq!(sequences, 6);
        let origin = origins
            .get(&OriginKey::Sequence(vec![gid(2), gid(4)]))
            .unwrap();
        assert_eq!(origin.input, "bd");
        assert_eq!(origin.features, vec![Tag::new(b"calt")]);
    }

    #[test]
    fn context_tuple_requires_all_members_known() {
        let context = LookupEntry {
            lookup_type: 5,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![SubstSubtable::Context(ContextSubst {
                format: 3,
                rules: vec![ContextRule {
                    // gid 9 is unmapped, so no tuple containing it lands
                    input: vec![SeqItem::Set(vec![gid(1), gid(9)]), SeqItem::Glyph(gid(2))],
                    lookup_indices: vec![],
                }],
                classes: ClassTable::new(),
            })],
        };
        let table = table_with_lookups(vec![(Tag::new(b"calt"), vec![0])], vec![context]);
        let mut origins = seed(&[('a', 1), ('b', 2)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        assert!(origins.contains_key(&OriginKey::Sequence(vec![gid(1), gid(2)])));
        assert!(!origins.contains_key(&OriginKey::Sequence(vec![gid(9), gid(2)])));
        assert!(resolver.stats().missing_origin > 0);
    }

    #[test]
    fn backtrack_expansion_truncates_at_cap() {
        // backtrack of a, b, c with a limit of 1: only a is considered
        let chain = LookupEntry {
            lookup_type: 6,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![SubstSubtable::ChainContext(ChainContextSubst {
                format: 3,
                rules: vec![ChainRule {
                    backtrack: vec![SeqItem::Set(vec![gid(1), gid(2), gid(3)])],
                    input: vec![SeqItem::Glyph(gid(4))],
                    lookahead: vec![],
                    lookup_indices: vec![],
                }],
                backtrack_classes: ClassTable::new(),
                input_classes: ClassTable::new(),
                lookahead_classes: ClassTable::new(),
            })],
        };
        let table = table_with_lookups(vec![(Tag::new(b"calt"), vec![0])], vec![chain]);
        let mut origins = seed(&[('a', 1), ('b', 2), ('c', 3), ('d', 4)]);
        let mut resolver = Resolver::new(
            &table,
            ResolverConfig {
                max_class_expansion: 1,
                ..Default::default()
            },
        );
        resolver.resolve(&mut origins);

        let origin = origins
            .get(&OriginKey::Sequence(vec![gid(1), gid(4)]))
            .unwrap();
        assert_eq!(origin.input, "ad");
        assert!(!origins.contains_key(&OriginKey::Sequence(vec![gid(2), gid(4)])));
        assert!(resolver.stats().truncated_expansions > 0);
    }

    #[test]
    fn multiple_subst_is_counted_not_traced() {
        let multi = LookupEntry {
            lookup_type: 2,
            flag: LookupFlag::empty(),
            mark_filtering_set: None,
            subtables: vec![SubstSubtable::Multiple(MultipleSubst {
                mapping: [(gid(1), vec![gid(5), gid(6)])].into_iter().collect(),
            })],
        };
        let table = table_with_lookups(vec![(Tag::new(b"ccmp"), vec![0])], vec![multi]);
        let mut origins = seed(&[('a', 1)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        assert!(!origins.contains_key(&OriginKey::Single(gid(5))));
        assert_eq!(resolver.stats().multiple_subst_skipped, 2);
    }

    #[test]
    fn ignored_features_are_skipped() {
        let lookups = vec![single_lookup(&[(1, 10)])];
        let table = table_with_lookups(vec![(Tag::new(b"aalt"), vec![0])], lookups);
        let mut origins = seed(&[('a', 1)]);
        let mut resolver = Resolver::new(&table, ResolverConfig::default());
        resolver.resolve(&mut origins);

        assert!(!origins.contains_key(&OriginKey::Single(gid(10))));
    }
}
