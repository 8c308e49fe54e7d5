//! Human readable names for glyphs

use std::collections::{BTreeMap, HashMap};

use smol_str::SmolStr;
use write_fonts::read::{
    tables::cmap::{CmapSubtable, EncodingRecord, PlatformId},
    types::{GlyphId16, Tag},
    FontRef, TableProvider,
};

use crate::error::Error;

/// A map for gids to human-readable names
#[derive(Clone, Debug, Default)]
pub struct NameMap(pub(crate) BTreeMap<GlyphId16, SmolStr>);

impl NameMap {
    /// Create a new name mapping for the glyphs in the provided font
    pub fn from_font(font: &FontRef) -> Result<NameMap, Error> {
        let num_glyphs = font
            .maxp()
            .map_err(|_| Error::MissingTable(Tag::new(b"maxp")))?
            .num_glyphs();
        let reverse_cmap = reverse_cmap(font)?;
        let post = font.post().ok();
        let mut name_map = (1..num_glyphs)
            .map(|gid| {
                let gid = GlyphId16::new(gid);
                // first check post, then do fallback
                if let Some(name) = post
                    .as_ref()
                    .and_then(|post| post.glyph_name(gid).map(SmolStr::from))
                {
                    return (gid, name);
                }
                // fallback to unicode or gid
                let name = match reverse_cmap.get(&gid) {
                    Some(raw) if *raw <= 0xFFFF => smol_str::format_smolstr!("uni{raw:04X}"),
                    Some(raw) => smol_str::format_smolstr!("u{raw:X}"),
                    // we have no codepoint, just use glyph ID
                    None => smol_str::format_smolstr!("glyph.{:05}", gid.to_u16()),
                };
                (gid, name)
            })
            .collect::<BTreeMap<_, _>>();
        name_map.insert(GlyphId16::NOTDEF, ".notdef".into());

        Ok(NameMap(name_map))
    }

    /// Returns a human readable name for this gid.
    ///
    /// This will panic if the gid is not in the font used to create this map.
    pub fn get(&self, gid: GlyphId16) -> &SmolStr {
        // map contains a name for every gid in the font
        self.0.get(&gid).unwrap()
    }
}

fn reverse_cmap(font: &FontRef) -> Result<HashMap<GlyphId16, u32>, Error> {
    let cmap = font
        .cmap()
        .map_err(|_| Error::MissingTable(Tag::new(b"cmap")))?;
    let offset_data = cmap.offset_data();

    let mut reverse_cmap = HashMap::new();

    let mut add_to_map = |args: (u32, GlyphId16)| {
        // because multiple glyphs may map to the same codepoint,
        // we always use the lowest codepoint to determine the name.
        let val = reverse_cmap.entry(args.1).or_insert(args.0);
        *val = args.0.min(*val);
    };

    for subtable in cmap
        .encoding_records()
        .iter()
        .filter(is_unicode)
        .filter_map(|rec| rec.subtable(offset_data).ok())
    {
        match subtable {
            CmapSubtable::Format4(subtable) => subtable
                .iter()
                .filter_map(|(unicode, gid)| Some((unicode, GlyphId16::try_from(gid).ok()?)))
                .for_each(&mut add_to_map),
            CmapSubtable::Format12(subtable) => subtable
                .iter()
                .filter_map(|(unicode, gid)| Some((unicode, GlyphId16::try_from(gid).ok()?)))
                .for_each(&mut add_to_map),
            _ => (),
        }
    }

    Ok(reverse_cmap)
}

fn is_unicode(record: &&EncodingRecord) -> bool {
    record.platform_id() == PlatformId::Unicode
        || (record.platform_id() == PlatformId::Windows
            && [1, 10].contains(&record.encoding_id()))
}

/// The character-to-glyph pairs of the font's unicode cmap subtables.
///
/// This is the seed data for provenance resolution.
pub fn forward_cmap(font: &FontRef) -> Result<Vec<(char, GlyphId16)>, Error> {
    let cmap = font
        .cmap()
        .map_err(|_| Error::MissingTable(Tag::new(b"cmap")))?;
    let offset_data = cmap.offset_data();

    let mut pairs = Vec::new();
    let mut push = |unicode: u32, gid| {
        if let Some(chr) = char::from_u32(unicode) {
            pairs.push((chr, gid));
        }
    };

    for subtable in cmap
        .encoding_records()
        .iter()
        .filter(is_unicode)
        .filter_map(|rec| rec.subtable(offset_data).ok())
    {
        match subtable {
            CmapSubtable::Format4(subtable) => {
                for (unicode, gid) in subtable.iter() {
                    if let Ok(gid) = GlyphId16::try_from(gid) {
                        push(unicode, gid);
                    }
                }
            }
            CmapSubtable::Format12(subtable) => {
                for (unicode, gid) in subtable.iter() {
                    if let Ok(gid) = GlyphId16::try_from(gid) {
                        push(unicode, gid);
                    }
                }
            }
            _ => (),
        }
    }

    Ok(pairs)
}
