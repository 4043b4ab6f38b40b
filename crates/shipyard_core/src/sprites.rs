//! Sprite manifest.
//!
//! Lists every sprite and thumbnail a catalog refers to, with the animation
//! settings found in the sprite's nested block.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::value::{serialize_optional_number, AttributeMap};

/// Which output list a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Base ship.
    Ship,
    /// Resolved variant.
    Variant,
    /// Outfit.
    Outfit,
}

/// One record's sprite references.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteReference {
    /// Record name.
    pub name: String,
    /// Record list.
    pub kind: RecordKind,
    /// Sprite path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    /// Thumbnail path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Frames per second.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_number"
    )]
    pub frame_rate: Option<f64>,
    /// Seconds per frame.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_number"
    )]
    pub frame_time: Option<f64>,
    /// Animation plays back and forth. Set by a `rewind` key in the sprite
    /// block or by "rewind" appearing in the record's description.
    pub rewind: bool,
}

impl SpriteReference {
    fn new(
        name: &str,
        kind: RecordKind,
        description: &str,
        sprite: Option<&String>,
        thumbnail: Option<&String>,
        data: Option<&AttributeMap>,
    ) -> Option<Self> {
        if sprite.is_none() && thumbnail.is_none() {
            return None;
        }
        let rewind = description.contains("rewind")
            || data.is_some_and(|data| {
                data.contains_key("rewind")
                    || data
                        .string("description")
                        .is_some_and(|text| text.contains("rewind"))
            });
        Some(Self {
            name: name.to_string(),
            kind,
            sprite: sprite.cloned(),
            thumbnail: thumbnail.cloned(),
            frame_rate: data.and_then(|data| data.number("frame rate")),
            frame_time: data.and_then(|data| data.number("frame time")),
            rewind,
        })
    }
}

/// Collect sprite references from ships, variants and outfits, in that order.
#[must_use]
pub fn sprite_manifest(catalog: &Catalog) -> Vec<SpriteReference> {
    let ships = catalog.ships.iter().filter_map(|ship| {
        SpriteReference::new(
            &ship.name,
            RecordKind::Ship,
            &ship.description,
            ship.sprite.as_ref(),
            ship.thumbnail.as_ref(),
            ship.sprite_data.as_ref(),
        )
    });
    let variants = catalog.variants.iter().filter_map(|variant| {
        let ship = &variant.ship;
        SpriteReference::new(
            &ship.name,
            RecordKind::Variant,
            &ship.description,
            ship.sprite.as_ref(),
            ship.thumbnail.as_ref(),
            ship.sprite_data.as_ref(),
        )
    });
    let outfits = catalog.outfits.iter().filter_map(|outfit| {
        SpriteReference::new(
            &outfit.name,
            RecordKind::Outfit,
            &outfit.description,
            outfit.sprite.as_ref(),
            outfit.thumbnail.as_ref(),
            outfit.sprite_data.as_ref(),
        )
    });
    ships.chain(variants).chain(outfits).collect()
}
