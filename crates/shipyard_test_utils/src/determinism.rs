//! Determinism testing utilities.
//!
//! Parsing must be reproducible: the same input files, in the same order,
//! must produce byte-identical serialized output on every run. Sources of
//! non-determinism to watch for:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Attribute maps are insertion-ordered; hash maps are only used for
//!   lookups, never iterated into output.
//!
//! - **Thread scheduling**: Batch runs parse plugins in parallel, so each
//!   plugin's catalog must depend only on its own files.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual parsers (block, ship, outfit, variant)
//! 2. **Property tests**: Random well-formed input parses identically twice
//! 3. **Integration tests**: Full sample trees assemble reproducibly

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use shipyard_core::Catalog;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hash of the serialized catalog from each run.
    pub hashes: Vec<u64>,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic parsing).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that parsing was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Parsing is non-deterministic!\n\
                 Runs: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Assemble `files` `runs` times and compare the serialized catalogs.
///
/// # Example
///
/// ```
/// use shipyard_test_utils::determinism::verify_determinism;
/// use shipyard_test_utils::fixtures::sample_files;
///
/// verify_determinism(3, &sample_files()).assert_deterministic();
/// ```
#[must_use]
pub fn verify_determinism(runs: usize, files: &[(&str, &str)]) -> DeterminismResult {
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let (catalog, _) = shipyard_core::assemble(files.iter().copied());
            catalog_hash(&catalog)
        })
        .collect();

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult {
        is_deterministic,
        hashes,
    }
}

/// Hash a catalog's serialized JSON form.
#[must_use]
pub fn catalog_hash(catalog: &Catalog) -> u64 {
    compute_hash(&catalog_json(catalog))
}

/// Serialize a catalog to compact JSON.
///
/// # Panics
///
/// Panics if serialization fails, which cannot happen for catalog types.
#[must_use]
pub fn catalog_json(catalog: &Catalog) -> String {
    serde_json::to_string(catalog).expect("catalog serializes")
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for parser testing.
///
/// These generate well-formed tab-indented text with random keys, values
/// and nesting.
pub mod strategies {
    use proptest::prelude::*;

    use crate::fixtures::DataFile;

    /// Generate a lowercase key of one or two words.
    pub fn arb_key() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z]{2,10}",
            "[a-z]{2,8} [a-z]{2,8}",
        ]
    }

    /// Generate a number as it would appear in a data file.
    pub fn arb_number() -> impl Strategy<Value = f64> {
        prop_oneof![
            (-100_000i32..100_000i32).prop_map(f64::from),
            (-1000.0f64..1000.0f64),
        ]
    }

    /// Generate a text value without delimiters.
    pub fn arb_text() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z ,.']{0,30}[A-Za-z.]"
    }

    /// Generate one `"key" value` line body.
    pub fn arb_attribute_line() -> impl Strategy<Value = String> {
        (
            arb_key(),
            prop_oneof![
                arb_number().prop_map(|n| n.to_string()),
                arb_text().prop_map(|t| format!("\"{t}\"")),
                arb_text().prop_map(|t| format!("`{t}`")),
            ],
        )
            .prop_map(|(key, value)| format!("\"{key}\" {value}"))
    }

    /// Generate an attribute block of `1..max_lines` lines.
    pub fn arb_attribute_lines(max_lines: usize) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec(arb_attribute_line(), 1..max_lines)
    }

    /// Parameters for one generated ship.
    #[derive(Debug, Clone)]
    pub struct ShipParams {
        /// Ship name.
        pub name: String,
        /// Lines of the `attributes` block.
        pub attributes: Vec<String>,
        /// Gun coordinates.
        pub guns: Vec<(i32, i32)>,
        /// Description text, if any.
        pub description: Option<String>,
    }

    impl ShipParams {
        /// Render as data file text.
        #[must_use]
        pub fn render(&self) -> String {
            let mut file = DataFile::new().line(0, &format!("ship \"{}\"", self.name));
            file = file.line(1, "attributes");
            for line in &self.attributes {
                file = file.line(2, line);
            }
            for (x, y) in &self.guns {
                file = file.line(1, &format!("gun {x} {y}"));
            }
            if let Some(text) = &self.description {
                file = file.line(1, &format!("description \"{text}\""));
            }
            file.blank().build()
        }
    }

    /// Generate parameters for one ship.
    pub fn arb_ship() -> impl Strategy<Value = ShipParams> {
        (
            "[A-Z][a-z]{2,12}",
            arb_attribute_lines(8),
            proptest::collection::vec((-200i32..200, -200i32..200), 0..4),
            proptest::option::of(arb_text()),
        )
            .prop_map(|(name, attributes, guns, description)| ShipParams {
                name,
                attributes,
                guns,
                description,
            })
    }

    /// Generate a list of ships.
    pub fn arb_ship_list(max_ships: usize) -> impl Strategy<Value = Vec<ShipParams>> {
        proptest::collection::vec(arb_ship(), 1..max_ships)
    }

    /// Generate a nested block as `(depth, line)` pairs, at most `max_depth` deep.
    ///
    /// The first line is always at depth 0.
    pub fn arb_nested_block(max_depth: usize) -> impl Strategy<Value = Vec<(usize, String)>> {
        proptest::collection::vec((0..max_depth, arb_attribute_line()), 1..20).prop_map(
            |lines| {
                let mut depth: Option<usize> = None;
                lines
                    .into_iter()
                    .map(|(target, line)| {
                        // Nesting may only deepen one level at a time.
                        let next = depth.map_or(0, |d| target.min(d + 1));
                        depth = Some(next);
                        (next, line)
                    })
                    .collect()
            },
        )
    }
}
