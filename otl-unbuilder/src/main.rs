//! CLI app for dumping decompiled layout tables and glyph origins as JSON

use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufWriter, Write},
};

use clap::Parser;
use otl_unbuilder::{
    args, forward_cmap, gdef, gpos, gsub, layout, provenance, seed_origins, unbuild_gdef,
    unbuild_gpos, unbuild_gsub, Error, NameMap, Origin, OriginKey, Resolver, ResolverConfig,
};
use serde_json::{json, Map, Value};
use write_fonts::{
    read::{FileRef, FontRef, ReadError, TableProvider},
    types::{GlyphId16, Tag},
};

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = args::Args::parse();
    let data = std::fs::read(&args.font_path).map_err(|inner| Error::Load {
        path: args.font_path.clone(),
        inner,
    })?;

    let mut write_target: Box<dyn Write> = match args.out.as_ref() {
        Some(path) => File::create(path)
            .map_err(|inner| Error::FileWrite {
                path: path.to_owned(),
                inner,
            })
            .map(|f| Box::new(BufWriter::new(f)))?,
        None => Box::new(std::io::stdout()),
    };

    let font = get_font(&data, args.index)?;
    let name_map = NameMap::from_font(&font)?;

    let mut output = Map::new();
    let gsub_table = match font.gsub() {
        Ok(gsub) => Some(unbuild_gsub(&gsub)?),
        Err(_) => None,
    };

    if matches!(args.table, args::Table::All | args::Table::Gsub) {
        if let Some(table) = gsub_table.as_ref() {
            output.insert("gsub".into(), gsub_to_json(table, &name_map));
        }
    }

    if matches!(args.table, args::Table::All | args::Table::Gpos) {
        if let Ok(gpos) = font.gpos() {
            let table = unbuild_gpos(&gpos)?;
            output.insert("gpos".into(), gpos_to_json(&table, &name_map));
        }
    }

    if matches!(args.table, args::Table::All | args::Table::Gdef) {
        if let Ok(gdef) = font.gdef() {
            let table = unbuild_gdef(&gdef)?;
            output.insert("gdef".into(), gdef_to_json(&table, &name_map));
        }
    }

    if matches!(args.table, args::Table::All | args::Table::Origins) {
        if let Some(table) = gsub_table.as_ref() {
            let config = resolver_config(&args);
            let mut origins = seed_origins(forward_cmap(&font)?);
            let mut resolver = Resolver::new(table, config);
            resolver.resolve(&mut origins);
            let stats = resolver.stats();
            log::info!(
                "resolved {} origins ({} missing, {} truncated, {} overwritten, {} multiple skipped)",
                origins.len(),
                stats.missing_origin,
                stats.truncated_expansions,
                stats.overwrites,
                stats.multiple_subst_skipped,
            );
            output.insert("origins".into(), origins_to_json(&origins, &name_map));
        }
    }

    serde_json::to_writer_pretty(&mut write_target, &Value::Object(output))?;
    writeln!(&mut write_target)?;
    write_target.flush()?;

    Ok(())
}

fn get_font(bytes: &[u8], idx: Option<u32>) -> Result<FontRef, Error> {
    let font = FileRef::new(bytes).map_err(Error::FontRead)?;
    match (font, idx.unwrap_or(0)) {
        (FileRef::Font(font), 0) => Ok(font),
        (FileRef::Font(_), other) => Err(Error::FontRead(ReadError::InvalidCollectionIndex(other))),
        (FileRef::Collection(collection), idx) => collection.get(idx).map_err(Error::FontRead),
    }
}

fn resolver_config(args: &args::Args) -> ResolverConfig {
    let mut config = ResolverConfig::default();
    if let Some(passes) = args.passes {
        config.pass_count = passes;
    }
    if let Some(cap) = args.max_expansion {
        config.max_class_expansion = cap;
    }
    if let Some(tags) = args.ignore_features.as_ref() {
        config.ignored_features = tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .filter_map(|tag| Tag::new_checked(tag.as_bytes()).ok())
            .collect::<BTreeSet<_>>();
    }
    config
}

fn name(names: &NameMap, gid: GlyphId16) -> Value {
    Value::String(names.get(gid).to_string())
}

fn name_list(names: &NameMap, glyphs: &[GlyphId16]) -> Value {
    Value::Array(glyphs.iter().map(|gid| name(names, *gid)).collect())
}

fn class_table_to_json(classes: &gsub::ClassTable, names: &NameMap) -> Value {
    Value::Object(
        classes
            .iter()
            .map(|(class, glyphs)| (class.to_string(), name_list(names, glyphs)))
            .collect(),
    )
}

fn seq_items_to_json(items: &[gsub::SeqItem], names: &NameMap) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| match item {
                gsub::SeqItem::Glyph(gid) => json!({ "glyph": name(names, *gid) }),
                gsub::SeqItem::Class(class) => json!({ "class": class.to_string() }),
                gsub::SeqItem::Set(glyphs) => json!({ "set": name_list(names, glyphs) }),
            })
            .collect(),
    )
}

fn subst_subtable_to_json(subtable: &gsub::SubstSubtable, names: &NameMap) -> Value {
    match subtable {
        gsub::SubstSubtable::Single(sub) => json!({
            "kind": "single",
            "format": sub.format,
            "mapping": Value::Object(
                sub.mapping
                    .iter()
                    .map(|(from, to)| (names.get(*from).to_string(), name(names, *to)))
                    .collect(),
            ),
        }),
        gsub::SubstSubtable::Multiple(sub) => json!({
            "kind": "multiple",
            "mapping": Value::Object(
                sub.mapping
                    .iter()
                    .map(|(from, to)| (names.get(*from).to_string(), name_list(names, to)))
                    .collect(),
            ),
        }),
        gsub::SubstSubtable::Alternate(sub) => json!({
            "kind": "alternate",
            "alternates": Value::Object(
                sub.alternates
                    .iter()
                    .map(|(from, to)| (names.get(*from).to_string(), name_list(names, to)))
                    .collect(),
            ),
        }),
        gsub::SubstSubtable::Ligature(sub) => json!({
            "kind": "ligature",
            "rules": Value::Array(
                sub.ligatures
                    .iter()
                    .map(|(components, lig)| json!({
                        "components": name_list(names, components),
                        "ligature": name(names, *lig),
                    }))
                    .collect(),
            ),
        }),
        gsub::SubstSubtable::Context(sub) => json!({
            "kind": "context",
            "format": sub.format,
            "rules": Value::Array(
                sub.rules
                    .iter()
                    .map(|rule| json!({
                        "input": seq_items_to_json(&rule.input, names),
                        "lookups": rule.lookup_indices,
                    }))
                    .collect(),
            ),
            "classes": class_table_to_json(&sub.classes, names),
        }),
        gsub::SubstSubtable::ChainContext(sub) => json!({
            "kind": "chain_context",
            "format": sub.format,
            "rules": Value::Array(
                sub.rules
                    .iter()
                    .map(|rule| json!({
                        "backtrack": seq_items_to_json(&rule.backtrack, names),
                        "input": seq_items_to_json(&rule.input, names),
                        "lookahead": seq_items_to_json(&rule.lookahead, names),
                        "lookups": rule.lookup_indices,
                    }))
                    .collect(),
            ),
            "backtrack_classes": class_table_to_json(&sub.backtrack_classes, names),
            "input_classes": class_table_to_json(&sub.input_classes, names),
            "lookahead_classes": class_table_to_json(&sub.lookahead_classes, names),
        }),
    }
}

fn value_to_json(value: &gpos::Value) -> Value {
    let mut map = Map::new();
    if let Some(v) = value.x_placement {
        map.insert("x_placement".into(), v.into());
    }
    if let Some(v) = value.y_placement {
        map.insert("y_placement".into(), v.into());
    }
    if let Some(v) = value.x_advance {
        map.insert("x_advance".into(), v.into());
    }
    if let Some(v) = value.y_advance {
        map.insert("y_advance".into(), v.into());
    }
    Value::Object(map)
}

fn anchor_to_json(anchor: &gpos::Anchor) -> Value {
    match anchor.anchor_point {
        Some(point) => json!({ "x": anchor.x, "y": anchor.y, "anchor_point": point }),
        None => json!({ "x": anchor.x, "y": anchor.y }),
    }
}

fn pos_subtable_to_json(subtable: &gpos::PosSubtable, names: &NameMap) -> Value {
    match subtable {
        gpos::PosSubtable::Single(sub) => json!({
            "kind": "single",
            "format": sub.format,
            "mapping": Value::Object(
                sub.mapping
                    .iter()
                    .map(|(gid, value)| (names.get(*gid).to_string(), value_to_json(value)))
                    .collect(),
            ),
        }),
        gpos::PosSubtable::Pair(sub) => json!({
            "kind": "pair",
            "format": sub.format,
            "rules": Value::Array(
                sub.rules
                    .iter()
                    .map(|rule| json!({
                        "first": name_list(names, &rule.first),
                        "second": name_list(names, &rule.second),
                        "value1": value_to_json(&rule.values.0),
                        "value2": value_to_json(&rule.values.1),
                    }))
                    .collect(),
            ),
        }),
        gpos::PosSubtable::Cursive(sub) => json!({
            "kind": "cursive",
            "mapping": Value::Object(
                sub.mapping
                    .iter()
                    .map(|(gid, (entry, exit))| {
                        let value = json!({
                            "entry": entry.as_ref().map(anchor_to_json),
                            "exit": exit.as_ref().map(anchor_to_json),
                        });
                        (names.get(*gid).to_string(), value)
                    })
                    .collect(),
            ),
        }),
        gpos::PosSubtable::MarkBase(sub) => json!({
            "kind": "mark_base",
            "marks": marks_to_json(&sub.marks, names),
            "bases": Value::Object(
                sub.bases
                    .iter()
                    .map(|(gid, anchors)| {
                        (names.get(*gid).to_string(), class_anchors_to_json(anchors))
                    })
                    .collect(),
            ),
        }),
        gpos::PosSubtable::MarkLig(sub) => json!({
            "kind": "mark_lig",
            "marks": marks_to_json(&sub.marks, names),
            "ligatures": Value::Object(
                sub.ligatures
                    .iter()
                    .map(|(gid, components)| {
                        let value = Value::Array(
                            components.iter().map(class_anchors_to_json).collect(),
                        );
                        (names.get(*gid).to_string(), value)
                    })
                    .collect(),
            ),
        }),
    }
}

fn marks_to_json(
    marks: &std::collections::BTreeMap<GlyphId16, (u16, gpos::Anchor)>,
    names: &NameMap,
) -> Value {
    Value::Object(
        marks
            .iter()
            .map(|(gid, (class, anchor))| {
                let value = json!({ "class": class, "anchor": anchor_to_json(anchor) });
                (names.get(*gid).to_string(), value)
            })
            .collect(),
    )
}

fn class_anchors_to_json(anchors: &std::collections::BTreeMap<u16, gpos::Anchor>) -> Value {
    Value::Object(
        anchors
            .iter()
            .map(|(class, anchor)| (class.to_string(), anchor_to_json(anchor)))
            .collect(),
    )
}

fn features_to_json(features: &[layout::FeatureEntry]) -> Value {
    Value::Array(
        features
            .iter()
            .map(|feature| {
                let params = feature.params.as_ref().map(|params| match params {
                    layout::FeatureParams::StylisticSet { ui_name_id } => {
                        json!({ "ui_name_id": ui_name_id })
                    }
                    layout::FeatureParams::Size {
                        design_size,
                        identifier,
                        name_entry,
                        range_start,
                        range_end,
                    } => json!({
                        "design_size": design_size,
                        "identifier": identifier,
                        "name_entry": name_entry,
                        "range_start": range_start,
                        "range_end": range_end,
                    }),
                    layout::FeatureParams::CharacterVariant {
                        ui_label_name_id,
                        tooltip_name_id,
                        sample_text_name_id,
                        char_count,
                    } => json!({
                        "ui_label_name_id": ui_label_name_id,
                        "tooltip_name_id": tooltip_name_id,
                        "sample_text_name_id": sample_text_name_id,
                        "char_count": char_count,
                    }),
                });
                json!({
                    "tag": feature.tag.to_string(),
                    "lookups": feature.lookup_indices,
                    "params": params,
                })
            })
            .collect(),
    )
}

fn lang_sys_to_json(sys: &layout::LangSys) -> Value {
    json!({
        "required_feature": sys.required_feature_index,
        "features": sys.feature_indices,
    })
}

fn scripts_to_json(scripts: &[layout::ScriptEntry]) -> Value {
    Value::Object(
        scripts
            .iter()
            .map(|script| {
                let mut langs = Map::new();
                if let Some(dflt) = script.default_lang_sys.as_ref() {
                    langs.insert("dflt".into(), lang_sys_to_json(dflt));
                }
                for (tag, sys) in &script.lang_systems {
                    langs.insert(tag.to_string(), lang_sys_to_json(sys));
                }
                (script.tag.to_string(), Value::Object(langs))
            })
            .collect(),
    )
}

fn gsub_to_json(table: &layout::GsubTable, names: &NameMap) -> Value {
    json!({
        "version": format!("{}.{}", table.version.0, table.version.1),
        "scripts": scripts_to_json(&table.scripts),
        "features": features_to_json(&table.features),
        "lookups": Value::Array(
            table
                .lookups
                .iter()
                .map(|lookup| json!({
                    "type": lookup.lookup_type,
                    "flag": lookup.flag.to_bits(),
                    "mark_filtering_set": lookup.mark_filtering_set,
                    "subtables": Value::Array(
                        lookup
                            .subtables
                            .iter()
                            .map(|sub| subst_subtable_to_json(sub, names))
                            .collect(),
                    ),
                }))
                .collect(),
        ),
    })
}

fn gpos_to_json(table: &layout::GposTable, names: &NameMap) -> Value {
    json!({
        "version": format!("{}.{}", table.version.0, table.version.1),
        "scripts": scripts_to_json(&table.scripts),
        "features": features_to_json(&table.features),
        "lookups": Value::Array(
            table
                .lookups
                .iter()
                .map(|lookup| json!({
                    "type": lookup.lookup_type,
                    "flag": lookup.flag.to_bits(),
                    "mark_filtering_set": lookup.mark_filtering_set,
                    "subtables": Value::Array(
                        lookup
                            .subtables
                            .iter()
                            .map(|sub| pos_subtable_to_json(sub, names))
                            .collect(),
                    ),
                }))
                .collect(),
        ),
    })
}

fn caret_to_json(caret: &gdef::Caret) -> Value {
    match caret {
        gdef::Caret::Coordinate(pos) => json!({ "coord": pos }),
        gdef::Caret::PointIndex(idx) => json!({ "point": idx }),
    }
}

fn gdef_to_json(table: &gdef::GdefTable, names: &NameMap) -> Value {
    json!({
        "version": format!("{}.{}", table.version.0, table.version.1),
        "attach_points": Value::Object(
            table
                .attach_points
                .iter()
                .map(|(gid, points)| (names.get(*gid).to_string(), json!(points)))
                .collect(),
        ),
        "lig_carets": Value::Object(
            table
                .lig_carets
                .iter()
                .map(|(gid, carets)| {
                    let carets = Value::Array(carets.iter().map(caret_to_json).collect());
                    (names.get(*gid).to_string(), carets)
                })
                .collect(),
        ),
        "mark_glyph_sets": Value::Array(
            table
                .mark_glyph_sets
                .iter()
                .map(|set| name_list(names, set))
                .collect(),
        ),
    })
}

fn origins_to_json(origins: &provenance::OriginMap, names: &NameMap) -> Value {
    fn key_name(key: &OriginKey, names: &NameMap) -> String {
        match key {
            OriginKey::Single(gid) => names.get(*gid).to_string(),
            OriginKey::Sequence(glyphs) => glyphs
                .iter()
                .map(|gid| names.get(*gid).to_string())
                .collect::<Vec<_>>()
                .join("+"),
        }
    }

    fn origin_to_json(origin: &Origin) -> Value {
        json!({
            "input": origin.input,
            "features": origin.features.iter().map(Tag::to_string).collect::<Vec<_>>(),
            "script": origin.script.to_string(),
            "language": origin.language.to_string(),
        })
    }

    Value::Object(
        origins
            .iter()
            .map(|(key, origin)| (key_name(key, names), origin_to_json(origin)))
            .collect(),
    )
}
