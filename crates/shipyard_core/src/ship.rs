//! Ship definitions.
//!
//! A ship starts with a depth-0 header `ship "<name>"` and owns every deeper
//! line up to the next depth-0 line. A header with a second quoted name
//! (`ship "<base>" "<variant>"`) declares a variant, which is only resolved
//! once every base ship is known.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::block::{absorb, FieldSink, SPRITE_DATA};
use crate::description::{self, DescriptionBuffer};
use crate::hardpoint::{parse_directive, Hardpoints};
use crate::source::SourceFile;
use crate::token::{strip_quotes, words};
use crate::value::{AttributeMap, Value};
use crate::variant::PendingVariant;

/// Keys that collide with typed output fields and are never stored as extras.
const RESERVED_KEYS: [&str; 10] = [
    "name",
    "displayName",
    "variant",
    "baseShip",
    "engines",
    "reverseEngines",
    "steeringEngines",
    "guns",
    "turrets",
    "bays",
];

/// Sections that are not part of the ship's own data. Each is skipped with
/// everything nested under it.
const SKIPPED_SECTIONS: [&str; 5] = ["add attributes", "outfits", "leak", "explode", "final explode"];

/// A parsed base ship.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipRecord {
    /// Ship name from the header.
    pub name: String,
    /// Name shown in place of `name`, if overridden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Joined description text; never empty.
    pub description: String,
    /// The `attributes` block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeMap>,
    /// Sprite path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    /// Thumbnail path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Block nested under the sprite line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_data: Option<AttributeMap>,
    /// Engines, weapon mounts and bays.
    #[serde(flatten)]
    pub hardpoints: Hardpoints,
    /// Every other field, in source order.
    #[serde(flatten)]
    pub extra: AttributeMap,
}

impl ShipRecord {
    /// Check if the ship carries real data rather than being a stub.
    ///
    /// Reverse and steering engines alone do not count.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.attributes.is_some()
            || !self.hardpoints.engines.is_empty()
            || !self.hardpoints.guns.is_empty()
            || !self.hardpoints.turrets.is_empty()
            || !self.hardpoints.bays.is_empty()
    }
}

/// Outcome of parsing one `ship` header.
#[derive(Debug, Clone)]
pub enum ParsedShip {
    /// A complete base ship.
    Base(ShipRecord),
    /// A variant declaration, resolved later.
    Variant(PendingVariant),
    /// The header was malformed or the ship had no description.
    Skipped,
}

/// Read a ship header: the base name and optional variant name.
#[must_use]
pub fn ship_header(line: &str) -> Option<(String, Option<String>)> {
    let words = words(line);
    match words.as_slice() {
        [keyword, name, rest @ ..]
            if keyword.text == "ship"
                && !keyword.is_quoted()
                && name.is_quoted()
                && !name.text.is_empty() =>
        {
            let variant = rest
                .first()
                .filter(|w| w.is_quoted() && !w.text.is_empty())
                .map(|w| w.text.to_string());
            Some((name.text.to_string(), variant))
        }
        _ => None,
    }
}

/// Parse the ship whose header is at `start`.
///
/// Returns the outcome and the index of the first line after the ship.
#[must_use]
pub fn parse_ship(source: &Arc<SourceFile>, start: usize) -> (ParsedShip, usize) {
    let Some((name, variant)) = ship_header(source.line(start)) else {
        return (ParsedShip::Skipped, start + 1);
    };

    if let Some(variant_name) = variant {
        let pending = PendingVariant {
            base_name: name,
            variant_name,
            source: Arc::clone(source),
            start,
        };
        return (ParsedShip::Variant(pending), source.block_end(start + 1, 0));
    }

    let mut builder = ShipBuilder::new(name);
    let mut index = start + 1;
    while index < source.len() {
        if source.is_blank(index) {
            index += 1;
            continue;
        }
        match source.depth(index) {
            0 => break,
            1 => index = builder.line(source, index),
            _ => index += 1,
        }
    }

    let parsed = match builder.finish() {
        Some(ship) => ParsedShip::Base(ship),
        None => ParsedShip::Skipped,
    };
    (parsed, index)
}

/// Accumulates the fields of one ship.
#[derive(Debug)]
struct ShipBuilder {
    name: String,
    display_name: Option<String>,
    description: DescriptionBuffer,
    attributes: Option<AttributeMap>,
    sprite: Option<String>,
    thumbnail: Option<String>,
    sprite_data: Option<AttributeMap>,
    hardpoints: Hardpoints,
    extra: AttributeMap,
}

impl ShipBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            display_name: None,
            description: DescriptionBuffer::new(),
            attributes: None,
            sprite: None,
            thumbnail: None,
            sprite_data: None,
            hardpoints: Hardpoints::default(),
            extra: AttributeMap::new(),
        }
    }

    /// Handle one depth-1 line; returns the next index to examine.
    fn line(&mut self, source: &SourceFile, index: usize) -> usize {
        if let Some(directive) = parse_directive(source, index) {
            match directive.hardpoint {
                Some(hardpoint) => self.hardpoints.push(hardpoint),
                None => debug!(
                    "{}:{}: skipping malformed {:?} in ship '{}'",
                    source.path(),
                    index + 1,
                    directive.kind,
                    self.name
                ),
            }
            return directive.next;
        }

        let bare = strip_quotes(source.text(index));
        if SKIPPED_SECTIONS.iter().any(|section| starts_with_keyword(&bare, section)) {
            return source.block_end(index + 1, 1);
        }

        if description::is_directive(source.line(index)) {
            return description::capture(source, index, &mut self.description);
        }

        absorb(source, index, self)
    }

    fn finish(self) -> Option<ShipRecord> {
        let Some(description) = self.description.finish() else {
            debug!("Dropping ship '{}': no description", self.name);
            return None;
        };
        Some(ShipRecord {
            name: self.name,
            display_name: self.display_name,
            description,
            attributes: self.attributes,
            sprite: self.sprite,
            thumbnail: self.thumbnail,
            sprite_data: self.sprite_data,
            hardpoints: self.hardpoints,
            extra: self.extra,
        })
    }
}

/// Check if `text` is `keyword` alone or followed by whitespace.
fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.strip_prefix(keyword)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

impl FieldSink for ShipBuilder {
    fn field(&mut self, key: String, value: Value) {
        if key.starts_with("ship/") || key.starts_with("thumbnail/") {
            return;
        }
        match key.as_str() {
            "sprite" => self.sprite = value.to_text(),
            "thumbnail" => self.thumbnail = value.to_text(),
            "display name" => self.display_name = value.to_text(),
            "description" => {
                if let Some(text) = value.to_text() {
                    self.description.push(&text);
                }
            }
            "attributes" | SPRITE_DATA => match value {
                Value::Map(map) if key == "attributes" => self.attributes = Some(map),
                Value::Map(map) => self.sprite_data = Some(map),
                _ => trace!("Ignoring non-block '{}' in ship '{}'", key, self.name),
            },
            reserved if RESERVED_KEYS.contains(&reserved) => {
                trace!("Ignoring reserved key '{}' in ship '{}'", reserved, self.name);
            }
            _ => self.extra.push(key, value),
        }
    }

    fn text(&mut self, text: &str) {
        self.description.push(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (ParsedShip, usize) {
        let source = Arc::new(SourceFile::new("data/ships.txt", text));
        parse_ship(&source, 0)
    }

    fn base(text: &str) -> ShipRecord {
        match parse(text).0 {
            ParsedShip::Base(ship) => ship,
            other => panic!("expected a base ship, got {other:?}"),
        }
    }

    #[test]
    fn test_header_forms() {
        assert_eq!(ship_header("ship \"Kestrel\""), Some(("Kestrel".into(), None)));
        assert_eq!(
            ship_header("ship `Kestrel` \"Kestrel (More Weapons)\""),
            Some(("Kestrel".into(), Some("Kestrel (More Weapons)".into())))
        );
        assert_eq!(ship_header("ship Kestrel"), None);
        assert_eq!(ship_header("shipyard \"Basic\""), None);
    }

    #[test]
    fn test_minimal_ship() {
        let ship = base(
            "ship \"Test\"\n\tsprite \"ship/test\"\n\tattributes\n\t\t\"category\" \"Light Warship\"\n\t\t\"cost\" 1000\n\tengine -6 38\n\tgun 0 -20\n\tdescription \"A test ship.\"\n",
        );
        assert_eq!(ship.name, "Test");
        assert_eq!(ship.sprite.as_deref(), Some("ship/test"));
        assert_eq!(ship.description, "A test ship.");
        let attributes = ship.attributes.as_ref().unwrap();
        assert_eq!(attributes.string("category"), Some("Light Warship"));
        assert_eq!(attributes.number("cost"), Some(1000.0));
        assert_eq!(ship.hardpoints.engines.len(), 1);
        assert_eq!(ship.hardpoints.guns.len(), 1);
        assert!(ship.has_data());
    }

    #[test]
    fn test_missing_description_is_skipped() {
        let (parsed, next) = parse("ship \"Ghost\"\n\tattributes\n\t\tmass 5\nship \"Next\"");
        assert!(matches!(parsed, ParsedShip::Skipped));
        assert_eq!(next, 3);
    }

    #[test]
    fn test_variant_header_is_deferred() {
        let (parsed, next) = parse(
            "ship \"Kestrel\" \"Kestrel (Engines)\"\n\tengine 0 0\n\n\t\"add attributes\"\n\t\tthrust 5\noutfit \"X\"",
        );
        let ParsedShip::Variant(pending) = parsed else {
            panic!("expected a variant");
        };
        assert_eq!(pending.base_name, "Kestrel");
        assert_eq!(pending.variant_name, "Kestrel (Engines)");
        assert_eq!(pending.start, 0);
        assert_eq!(next, 5);
    }

    #[test]
    fn test_skipped_blocks_and_sections() {
        let ship = base(
            "ship \"S\"\n\toutfits\n\t\t\"Laser\" 2\n\tleak \"flame\" 50 80\n\texplode\n\t\t\"tiny explosion\" 10\n\t\"final explode\"\n\t\t\"large explosion\"\n\t\"ship/alt\" 1\n\tdescription \"x\"",
        );
        assert!(!ship.extra.contains_key("Laser"));
        assert!(!ship.extra.contains_key("explode"));
        assert!(!ship.extra.contains_key("final explode"));
        assert!(!ship.extra.contains_key("ship/alt"));
        assert!(!ship.extra.contains_key("leak"));
        assert_eq!(ship.description, "x");
    }

    #[test]
    fn test_extras_and_display_name() {
        let ship = base(
            "ship \"S\"\n\t\"display name\" \"Swift\"\n\tplural \"Swifts\"\n\tnoun \"craft\"\n\tthumbnail \"thumbnail/s\"\n\t\"uncapturable\"\n\tdescription `The \"Swift\".`",
        );
        assert_eq!(ship.display_name.as_deref(), Some("Swift"));
        assert_eq!(ship.thumbnail.as_deref(), Some("thumbnail/s"));
        assert_eq!(ship.extra.string("plural"), Some("Swifts"));
        assert_eq!(ship.extra.get("uncapturable"), Some(&Value::Bool(true)));
        assert_eq!(ship.description, "The \"Swift\".");
        assert!(!ship.has_data());
    }

    #[test]
    fn test_reverse_engines_alone_are_not_data() {
        let ship = base("ship \"S\"\n\t\"reverse engine\" 1 2\n\t\tunder\n\tdescription \"x\"");
        assert_eq!(ship.hardpoints.reverse_engines[0].position.as_deref(), Some("under"));
        assert!(!ship.has_data());
    }

    #[test]
    fn test_multiple_descriptions_join() {
        let ship = base("ship \"S\"\n\tdescription \"One.\"\n\tmass 5\n\tdescription \"Two.\"");
        assert_eq!(ship.description, "One. Two.");
    }

    #[test]
    fn test_sprite_data() {
        let ship = base("ship \"S\"\n\tsprite \"ship/s\"\n\t\t\"frame rate\" 4\n\tdescription \"x\"");
        assert_eq!(ship.sprite.as_deref(), Some("ship/s"));
        assert_eq!(ship.sprite_data.unwrap().number("frame rate"), Some(4.0));
    }
}
