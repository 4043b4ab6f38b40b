//! Outfit definitions.

use serde::Serialize;
use tracing::{debug, trace};

use crate::block::{absorb, FieldSink, SPRITE_DATA};
use crate::description::{self, DescriptionBuffer};
use crate::source::SourceFile;
use crate::token::display_name;
use crate::value::{AttributeMap, Value};

/// Keys that collide with typed output fields.
const RESERVED_KEYS: [&str; 2] = ["name", "displayName"];

/// A parsed outfit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitRecord {
    /// Outfit name from the header.
    pub name: String,
    /// Name shown in place of `name`, if overridden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Joined description text; never empty.
    pub description: String,
    /// Sprite path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,
    /// Thumbnail path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Block nested under the sprite line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_data: Option<AttributeMap>,
    /// The `weapon` block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon: Option<AttributeMap>,
    /// Every other field, in source order.
    #[serde(flatten)]
    pub extra: AttributeMap,
}

/// Read an outfit header and return the name.
///
/// A backtick-delimited name runs to the last backtick on the line, so it
/// may contain double quotes and backticks.
#[must_use]
pub fn outfit_header(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("outfit")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim();
    let name = if let Some(inner) = rest.strip_prefix('`') {
        inner.strip_suffix('`')?
    } else {
        let inner = rest.strip_prefix('"')?.strip_suffix('"')?;
        if inner.contains('"') {
            return None;
        }
        inner
    };
    (!name.is_empty()).then(|| name.to_string())
}

/// Parse the outfit whose header is at `start`.
///
/// Returns the outfit, if it has a description, and the index of the first
/// line after it.
#[must_use]
pub fn parse_outfit(source: &SourceFile, start: usize) -> (Option<OutfitRecord>, usize) {
    let Some(name) = outfit_header(source.line(start)) else {
        return (None, start + 1);
    };

    let mut builder = OutfitBuilder::new(name);
    let mut index = start + 1;

    if let Some(first) = source.next_content(index) {
        if source.depth(first) == 1 {
            if let Some(name) = display_name(source.line(first)) {
                builder.display_name = Some(name.to_string());
                index = first + 1;
            }
        }
    }

    while index < source.len() {
        if source.is_blank(index) {
            index += 1;
            continue;
        }
        match source.depth(index) {
            0 => break,
            1 if description::is_directive(source.line(index)) => {
                index = description::capture(source, index, &mut builder.description);
            }
            1 => index = absorb(source, index, &mut builder),
            _ => index += 1,
        }
    }

    (builder.finish(), index)
}

#[derive(Debug)]
struct OutfitBuilder {
    name: String,
    display_name: Option<String>,
    description: DescriptionBuffer,
    sprite: Option<String>,
    thumbnail: Option<String>,
    sprite_data: Option<AttributeMap>,
    weapon: Option<AttributeMap>,
    extra: AttributeMap,
}

impl OutfitBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            display_name: None,
            description: DescriptionBuffer::new(),
            sprite: None,
            thumbnail: None,
            sprite_data: None,
            weapon: None,
            extra: AttributeMap::new(),
        }
    }

    fn finish(self) -> Option<OutfitRecord> {
        let Some(description) = self.description.finish() else {
            debug!("Dropping outfit '{}': no description", self.name);
            return None;
        };
        Some(OutfitRecord {
            name: self.name,
            display_name: self.display_name,
            description,
            sprite: self.sprite,
            thumbnail: self.thumbnail,
            sprite_data: self.sprite_data,
            weapon: self.weapon,
            extra: self.extra,
        })
    }
}

impl FieldSink for OutfitBuilder {
    fn field(&mut self, key: String, value: Value) {
        match key.as_str() {
            "sprite" => self.sprite = value.to_text(),
            "thumbnail" => self.thumbnail = value.to_text(),
            "display name" => self.display_name = value.to_text(),
            "description" => {
                if let Some(text) = value.to_text() {
                    self.description.push(&text);
                }
            }
            "weapon" | SPRITE_DATA => match value {
                Value::Map(map) if key == "weapon" => self.weapon = Some(map),
                Value::Map(map) => self.sprite_data = Some(map),
                _ => trace!("Ignoring non-block '{}' in outfit '{}'", key, self.name),
            },
            reserved if RESERVED_KEYS.contains(&reserved) => {
                trace!("Ignoring reserved key '{}' in outfit '{}'", reserved, self.name);
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

    fn parse(text: &str) -> (Option<OutfitRecord>, usize) {
        let source = SourceFile::new("data/outfits.txt", text);
        parse_outfit(&source, 0)
    }

    #[test]
    fn test_header_forms() {
        assert_eq!(outfit_header("outfit \"Laser\""), Some("Laser".into()));
        assert_eq!(outfit_header("outfit `Say \"Hi\"`"), Some("Say \"Hi\"".into()));
        assert_eq!(outfit_header("outfit `a`b`"), Some("a`b".into()));
        assert_eq!(outfit_header("outfit \"Laser\" 2"), None);
        assert_eq!(outfit_header("outfitter \"Laser\""), None);
        assert_eq!(outfit_header("outfit Laser"), None);
    }

    #[test]
    fn test_outfit_with_weapon() {
        let (outfit, next) = parse(
            "outfit \"Laser\"\n\t\"display name\" \"Beam Laser\"\n\tcategory \"Guns\"\n\t\"cost\" 5000\n\tweapon\n\t\t\"damage\" 10\n\t\t\"velocity\" 8\n\tdescription \"Cuts things.\"\noutfit \"Next\"",
        );
        let outfit = outfit.unwrap();
        assert_eq!(outfit.name, "Laser");
        assert_eq!(outfit.display_name.as_deref(), Some("Beam Laser"));
        assert_eq!(outfit.extra.string("category"), Some("Guns"));
        assert_eq!(outfit.extra.number("cost"), Some(5000.0));
        assert_eq!(outfit.weapon.unwrap().number("damage"), Some(10.0));
        assert_eq!(outfit.description, "Cuts things.");
        assert_eq!(next, 8);
    }

    #[test]
    fn test_bare_description_directive() {
        let (outfit, _) = parse("outfit \"Pod\"\n\tmass 5\n\tdescription Stores things.");
        assert_eq!(outfit.unwrap().description, "Stores things.");
    }

    #[test]
    fn test_no_description_drops_outfit() {
        let (outfit, next) = parse("outfit \"Pod\"\n\tmass 5\n\n");
        assert!(outfit.is_none());
        assert_eq!(next, 4);
    }

    #[test]
    fn test_sprite_and_data() {
        let (outfit, _) = parse(
            "outfit \"Flare\"\n\tsprite \"effect/flare\"\n\t\t\"frame rate\" 12\n\t\trewind\n\tdescription `x`",
        );
        let outfit = outfit.unwrap();
        assert_eq!(outfit.sprite.as_deref(), Some("effect/flare"));
        let data = outfit.sprite_data.unwrap();
        assert_eq!(data.number("frame rate"), Some(12.0));
        assert_eq!(data.string("description"), Some("rewind"));
    }
}
