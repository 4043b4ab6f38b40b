//! Variant resolution.
//!
//! A variant is a ship header naming an existing base ship plus a variant
//! name. Its body lists overrides only: a display name, a new sprite or
//! thumbnail, additive attribute changes, and replacement hardpoint lists.
//! Variants are resolved after every file has been scanned, so a variant
//! may reference a base ship defined in a later file.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::block::parse_block;
use crate::hardpoint::{parse_directive, HardpointKind, Hardpoints};
use crate::ship::ShipRecord;
use crate::source::SourceFile;
use crate::token::{display_name, extract, strip_quotes, Token};
use crate::value::{AttributeMap, Value};

/// A variant declaration waiting for its base ship.
#[derive(Debug, Clone)]
pub struct PendingVariant {
    /// Name of the base ship.
    pub base_name: String,
    /// Name of the variant.
    pub variant_name: String,
    /// File holding the declaration.
    pub source: Arc<SourceFile>,
    /// Index of the header line in `source`.
    pub start: usize,
}

/// A resolved variant: a full copy of its base with overrides applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantShip {
    /// The merged ship. Its name is `"<base> (<variant>)"`.
    #[serde(flatten)]
    pub ship: ShipRecord,
    /// Variant name from the header.
    pub variant: String,
    /// Name of the base ship.
    pub base_ship: String,
}

/// Lookup of base ships by name. The first ship registered under a name wins.
#[derive(Debug, Default)]
pub struct ShipIndex<'a> {
    by_name: HashMap<&'a str, &'a ShipRecord>,
    duplicates: usize,
}

impl<'a> ShipIndex<'a> {
    /// Index `ships` in order, warning about repeated names.
    #[must_use]
    pub fn new(ships: &'a [ShipRecord]) -> Self {
        let mut index = Self::default();
        for ship in ships {
            if index.by_name.contains_key(ship.name.as_str()) {
                warn!("Duplicate ship '{}': keeping the first definition", ship.name);
                index.duplicates += 1;
            } else {
                index.by_name.insert(ship.name.as_str(), ship);
            }
        }
        index
    }

    /// Look up a ship by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a ShipRecord> {
        self.by_name.get(name).copied()
    }

    /// Number of ships whose name was already taken.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// Resolve every pending variant against `index`, in declaration order.
#[must_use]
pub fn resolve_all(pending: &[PendingVariant], index: &ShipIndex<'_>) -> Vec<VariantShip> {
    pending
        .iter()
        .filter_map(|variant| {
            let Some(base) = index.get(&variant.base_name) else {
                warn!(
                    "{}:{}: variant '{}' references unknown base ship '{}'",
                    variant.source.path(),
                    variant.start + 1,
                    variant.variant_name,
                    variant.base_name
                );
                return None;
            };
            resolve(variant, base)
        })
        .collect()
}

/// Apply one variant's overrides to a copy of `base`.
///
/// Returns `None` when the variant changes nothing significant.
#[must_use]
pub fn resolve(variant: &PendingVariant, base: &ShipRecord) -> Option<VariantShip> {
    let mut overrides = Overrides::new(base);
    let source = variant.source.as_ref();
    let mut index = variant.start + 1;

    if let Some(first) = source.next_content(index) {
        if source.depth(first) == 1 {
            if let Some(name) = display_name(source.line(first)) {
                overrides.display_name(name);
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
            1 => index = overrides.line(source, index),
            _ => index += 1,
        }
    }

    let name = format!("{} ({})", variant.base_name, variant.variant_name);
    if !overrides.significant {
        debug!("Skipping variant '{}': no significant changes", name);
        return None;
    }
    let mut ship = overrides.finish();
    if ship.description.trim().is_empty() {
        debug!("Skipping variant '{}': no description", name);
        return None;
    }
    ship.name = name;
    debug!("Added variant '{}'", ship.name);
    Some(VariantShip {
        ship,
        variant: variant.variant_name.clone(),
        base_ship: variant.base_name.clone(),
    })
}

/// Working copy of a base ship plus the hardpoint lists a variant replaces.
struct Overrides {
    ship: ShipRecord,
    hardpoints: Hardpoints,
    replaced: Vec<HardpointKind>,
    significant: bool,
}

impl Overrides {
    fn new(base: &ShipRecord) -> Self {
        Self {
            ship: base.clone(),
            hardpoints: Hardpoints::default(),
            replaced: Vec::new(),
            significant: false,
        }
    }

    fn display_name(&mut self, name: &str) {
        if self.ship.display_name.as_deref() != Some(name) {
            self.ship.display_name = Some(name.to_string());
            self.significant = true;
        }
    }

    /// Handle one depth-1 line of the variant body; returns the next index.
    fn line(&mut self, source: &SourceFile, index: usize) -> usize {
        if let Some(directive) = parse_directive(source, index) {
            if !self.replaced.contains(&directive.kind) {
                self.replaced.push(directive.kind);
            }
            if let Some(hardpoint) = directive.hardpoint {
                self.hardpoints.push(hardpoint);
            }
            self.significant = true;
            return directive.next;
        }

        match strip_quotes(source.text(index)).as_str() {
            "outfits" => return source.block_end(index + 1, 1),
            "add attributes" => return self.add_attributes(source, index),
            _ => {}
        }

        let opens_block = source.opens_block(index);
        match extract(source.line(index), opens_block) {
            Some(Token::Pair(key, value)) if key == "sprite" || key == "thumbnail" => {
                let path = value.to_text();
                let current = if key == "sprite" {
                    &mut self.ship.sprite
                } else {
                    &mut self.ship.thumbnail
                };
                if path.is_some() && *current != path {
                    *current = path;
                    self.significant = true;
                }
                if opens_block {
                    let (data, next) = parse_block(source, index + 1);
                    if self.ship.sprite_data.as_ref() != Some(&data) {
                        self.ship.sprite_data = Some(data);
                        self.significant = true;
                    }
                    return next;
                }
                index + 1
            }
            _ => index + 1,
        }
    }

    /// Apply the directly nested lines of an `add attributes` block.
    fn add_attributes(&mut self, source: &SourceFile, index: usize) -> usize {
        self.significant = true;
        let end = source.block_end(index + 1, 1);
        let Some(first) = source.next_content(index + 1).filter(|&i| i < end) else {
            return end;
        };
        let depth = source.depth(first);
        let attributes = self.ship.attributes.get_or_insert_with(AttributeMap::new);
        for line in first..end {
            if source.is_blank(line) || source.depth(line) != depth {
                continue;
            }
            match extract(source.line(line), false) {
                Some(Token::Pair(key, value)) => attributes.add(key, value),
                Some(Token::Flag(key)) => attributes.add(key, Value::Bool(true)),
                _ => {}
            }
        }
        end
    }

    fn finish(self) -> ShipRecord {
        let Self {
            mut ship,
            hardpoints,
            replaced,
            ..
        } = self;
        for kind in HardpointKind::ALL {
            if replaced.contains(&kind) {
                ship.hardpoints.replace(kind, &hardpoints);
            }
        }
        ship
    }
}
