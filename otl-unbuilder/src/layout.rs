//! Decompiling the script, feature, and lookup lists shared by GSUB and GPOS

use write_fonts::{
    read::{
        tables::{
            gpos::Gpos,
            gsub::Gsub,
            layout::{self as rlayout, FeatureList, ScriptList},
        },
        ReadError,
    },
    tables::layout::LookupFlag,
    types::Tag,
};

use crate::{
    gpos::{unbuild_pos_subtables, PosSubtable},
    gsub::{unbuild_subtables, SubstSubtable},
};

/// A decompiled lookup and the data shared by its subtables.
#[derive(Clone, Debug)]
pub struct LookupEntry<S> {
    pub lookup_type: u16,
    pub flag: LookupFlag,
    pub mark_filtering_set: Option<u16>,
    pub subtables: Vec<S>,
}

/// A decompiled feature record.
#[derive(Clone, Debug)]
pub struct FeatureEntry {
    pub tag: Tag,
    /// Indices into the lookup list, in record order.
    pub lookup_indices: Vec<u16>,
    pub params: Option<FeatureParams>,
}

/// Decompiled feature parameters, for the features that define them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeatureParams {
    StylisticSet {
        ui_name_id: u16,
    },
    Size {
        design_size: u16,
        identifier: u16,
        name_entry: u16,
        range_start: u16,
        range_end: u16,
    },
    CharacterVariant {
        ui_label_name_id: u16,
        tooltip_name_id: u16,
        sample_text_name_id: u16,
        char_count: u16,
    },
}

/// A decompiled language system.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LangSys {
    pub required_feature_index: Option<u16>,
    /// Indices into the feature list.
    pub feature_indices: Vec<u16>,
}

/// A decompiled script record and its language systems.
#[derive(Clone, Debug)]
pub struct ScriptEntry {
    pub tag: Tag,
    pub default_lang_sys: Option<LangSys>,
    pub lang_systems: Vec<(Tag, LangSys)>,
}

/// A fully decompiled GSUB table.
#[derive(Clone, Debug)]
pub struct GsubTable {
    pub version: (u16, u16),
    pub lookups: Vec<LookupEntry<SubstSubtable>>,
    pub features: Vec<FeatureEntry>,
    pub scripts: Vec<ScriptEntry>,
}

/// A fully decompiled GPOS table.
#[derive(Clone, Debug)]
pub struct GposTable {
    pub version: (u16, u16),
    pub lookups: Vec<LookupEntry<PosSubtable>>,
    pub features: Vec<FeatureEntry>,
    pub scripts: Vec<ScriptEntry>,
}

pub fn unbuild_gsub(table: &Gsub) -> Result<GsubTable, ReadError> {
    let version = table.version();
    let mut lookups = Vec::new();
    for lookup in table.lookup_list()?.lookups().iter() {
        let lookup = lookup?;
        let flag = lookup.lookup_flag();
        let mark_filtering_set = flag
            .contains(LookupFlag::USE_MARK_FILTERING_SET)
            .then_some(lookup.mark_filtering_set())
            .flatten();
        let subtables = unbuild_subtables(&lookup.subtables()?)?;
        // extension lookups are flattened by the reader, so derive the type
        // from the decoded subtables where we can
        let lookup_type = subtables
            .first()
            .map(SubstSubtable::lookup_type)
            .unwrap_or_else(|| lookup.lookup_type());
        lookups.push(LookupEntry {
            lookup_type,
            flag,
            mark_filtering_set,
            subtables,
        });
    }

    Ok(GsubTable {
        version: (version.major, version.minor),
        lookups,
        features: unbuild_features(&table.feature_list()?)?,
        scripts: unbuild_scripts(&table.script_list()?)?,
    })
}

pub fn unbuild_gpos(table: &Gpos) -> Result<GposTable, ReadError> {
    let version = table.version();
    let mut lookups = Vec::new();
    for lookup in table.lookup_list()?.lookups().iter() {
        let lookup = lookup?;
        let flag = lookup.lookup_flag();
        let mark_filtering_set = flag
            .contains(LookupFlag::USE_MARK_FILTERING_SET)
            .then_some(lookup.mark_filtering_set())
            .flatten();
        let subtables = unbuild_pos_subtables(&lookup.subtables()?)?;
        let lookup_type = subtables
            .first()
            .map(PosSubtable::lookup_type)
            .unwrap_or_else(|| lookup.lookup_type());
        lookups.push(LookupEntry {
            lookup_type,
            flag,
            mark_filtering_set,
            subtables,
        });
    }

    Ok(GposTable {
        version: (version.major, version.minor),
        lookups,
        features: unbuild_features(&table.feature_list()?)?,
        scripts: unbuild_scripts(&table.script_list()?)?,
    })
}

fn unbuild_features(feature_list: &FeatureList) -> Result<Vec<FeatureEntry>, ReadError> {
    let data = feature_list.offset_data();
    let mut features = Vec::with_capacity(feature_list.feature_records().len());
    for record in feature_list.feature_records() {
        let feature = record.feature(data)?;
        let lookup_indices = feature
            .lookup_list_indices()
            .iter()
            .map(|idx| idx.get())
            .collect();
        let params = feature
            .feature_params()
            .transpose()?
            .map(|params| unbuild_feature_params(&params));
        features.push(FeatureEntry {
            tag: record.feature_tag(),
            lookup_indices,
            params,
        });
    }
    Ok(features)
}

fn unbuild_feature_params(params: &rlayout::FeatureParams) -> FeatureParams {
    match params {
        rlayout::FeatureParams::StylisticSet(params) => FeatureParams::StylisticSet {
            ui_name_id: params.ui_name_id().to_u16(),
        },
        rlayout::FeatureParams::Size(params) => FeatureParams::Size {
            design_size: params.design_size(),
            identifier: params.identifier(),
            name_entry: params.name_entry(),
            range_start: params.range_start(),
            range_end: params.range_end(),
        },
        rlayout::FeatureParams::CharacterVariant(params) => FeatureParams::CharacterVariant {
            ui_label_name_id: params.feat_ui_label_name_id().to_u16(),
            tooltip_name_id: params.feat_ui_tooltip_text_name_id().to_u16(),
            sample_text_name_id: params.sample_text_name_id().to_u16(),
            char_count: params.char_count(),
        },
    }
}

fn unbuild_scripts(script_list: &ScriptList) -> Result<Vec<ScriptEntry>, ReadError> {
    let data = script_list.offset_data();
    let mut scripts = Vec::with_capacity(script_list.script_records().len());
    for record in script_list.script_records() {
        let script = record.script(data)?;
        let default_lang_sys = script
            .default_lang_sys()
            .transpose()?
            .map(|sys| unbuild_lang_sys(&sys));
        let mut lang_systems = Vec::with_capacity(script.lang_sys_records().len());
        for lang_rec in script.lang_sys_records() {
            let sys = lang_rec.lang_sys(script.offset_data())?;
            lang_systems.push((lang_rec.lang_sys_tag(), unbuild_lang_sys(&sys)));
        }
        scripts.push(ScriptEntry {
            tag: record.script_tag(),
            default_lang_sys,
            lang_systems,
        });
    }
    Ok(scripts)
}

fn unbuild_lang_sys(sys: &rlayout::LangSys) -> LangSys {
    let required = sys.required_feature_index();
    LangSys {
        required_feature_index: (required != 0xFFFF).then_some(required),
        feature_indices: sys.feature_indices().iter().map(|idx| idx.get()).collect(),
    }
}
