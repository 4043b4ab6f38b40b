//! Two-pass assembly of a catalog from many files.
//!
//! The first pass scans files one at a time, collecting base ships, outfits
//! and pending variants. The second pass runs once, after the last file, and
//! resolves every pending variant against the full set of base ships.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::outfit::{parse_outfit, OutfitRecord};
use crate::ship::{parse_ship, ParsedShip, ShipRecord};
use crate::source::SourceFile;
use crate::variant::{resolve_all, PendingVariant, ShipIndex, VariantShip};

/// Header prefixes that start a record.
const SHIP_PREFIXES: [&str; 2] = ["ship \"", "ship `"];
const OUTFIT_PREFIXES: [&str; 2] = ["outfit \"", "outfit `"];

/// The three output lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    /// Base ships in discovery order.
    pub ships: Vec<ShipRecord>,
    /// Resolved variants in declaration order.
    pub variants: Vec<VariantShip>,
    /// Outfits in discovery order.
    pub outfits: Vec<OutfitRecord>,
}

impl Catalog {
    /// Check if all three lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ships.is_empty() && self.variants.is_empty() && self.outfits.is_empty()
    }
}

/// Counters for one assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Files scanned.
    pub files: usize,
    /// Base ships kept.
    pub ships: usize,
    /// Ships dropped by the stub filter.
    pub stubs: usize,
    /// Ships sharing a name with an earlier ship.
    pub duplicates: usize,
    /// Outfits kept.
    pub outfits: usize,
    /// Variant declarations seen.
    pub pending: usize,
    /// Variants emitted.
    pub variants: usize,
    /// Variants not emitted.
    pub skipped: usize,
}

/// First-pass state, threaded through every file.
#[derive(Debug, Default)]
pub struct Assembler {
    ships: Vec<ShipRecord>,
    outfits: Vec<OutfitRecord>,
    pending: Vec<PendingVariant>,
    files: usize,
    stubs: usize,
}

impl Assembler {
    /// Create an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one file and collect its records.
    pub fn scan(&mut self, path: &str, text: &str) {
        let source = Arc::new(SourceFile::new(path, text));
        let (ships, outfits, pending) = (self.ships.len(), self.outfits.len(), self.pending.len());

        let mut index = 0;
        while index < source.len() {
            if source.depth(index) != 0 {
                index += 1;
                continue;
            }
            let text = source.text(index);
            if SHIP_PREFIXES.iter().any(|prefix| text.starts_with(*prefix)) {
                let (parsed, next) = parse_ship(&source, index);
                self.collect_ship(parsed);
                index = next.max(index + 1);
            } else if OUTFIT_PREFIXES.iter().any(|prefix| text.starts_with(*prefix)) {
                let (outfit, next) = parse_outfit(&source, index);
                self.outfits.extend(outfit);
                index = next.max(index + 1);
            } else {
                index += 1;
            }
        }

        self.files += 1;
        debug!(
            "Scanned {}: {} ships, {} outfits, {} variants",
            path,
            self.ships.len() - ships,
            self.outfits.len() - outfits,
            self.pending.len() - pending
        );
    }

    fn collect_ship(&mut self, parsed: ParsedShip) {
        match parsed {
            ParsedShip::Base(ship) if ship.has_data() => self.ships.push(ship),
            ParsedShip::Base(ship) => {
                debug!("Dropping stub ship '{}'", ship.name);
                self.stubs += 1;
            }
            ParsedShip::Variant(pending) => self.pending.push(pending),
            ParsedShip::Skipped => {}
        }
    }

    /// Resolve pending variants and produce the catalog.
    #[must_use]
    pub fn finish(self) -> (Catalog, ScanSummary) {
        let (variants, duplicates) = {
            let index = ShipIndex::new(&self.ships);
            (resolve_all(&self.pending, &index), index.duplicates())
        };

        let summary = ScanSummary {
            files: self.files,
            ships: self.ships.len(),
            stubs: self.stubs,
            duplicates,
            outfits: self.outfits.len(),
            pending: self.pending.len(),
            variants: variants.len(),
            skipped: self.pending.len() - variants.len(),
        };
        info!(
            "Assembled {} ships, {} variants ({} skipped), {} outfits from {} files",
            summary.ships, summary.variants, summary.skipped, summary.outfits, summary.files
        );

        let catalog = Catalog {
            ships: self.ships,
            variants,
            outfits: self.outfits,
        };
        (catalog, summary)
    }
}

/// Assemble a catalog from `(path, text)` pairs in the given order.
#[must_use]
pub fn assemble<I, P, T>(files: I) -> (Catalog, ScanSummary)
where
    I: IntoIterator<Item = (P, T)>,
    P: AsRef<str>,
    T: AsRef<str>,
{
    let mut assembler = Assembler::new();
    for (path, text) in files {
        assembler.scan(path.as_ref(), text.as_ref());
    }
    assembler.finish()
}
