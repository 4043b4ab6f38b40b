//! Test fixtures and helpers.
//!
//! Sample data files covering every record shape, plus a small builder for
//! writing tab-indented text without counting `\t` escapes by hand.

/// Builder for tab-indented data file text.
#[derive(Debug, Clone, Default)]
pub struct DataFile {
    text: String,
}

impl DataFile {
    /// Start an empty file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line at `depth`.
    #[must_use]
    pub fn line(mut self, depth: usize, text: &str) -> Self {
        for _ in 0..depth {
            self.text.push('\t');
        }
        self.text.push_str(text);
        self.text.push('\n');
        self
    }

    /// Append an empty line.
    #[must_use]
    pub fn blank(mut self) -> Self {
        self.text.push('\n');
        self
    }

    /// Finish and return the text.
    #[must_use]
    pub fn build(self) -> String {
        self.text
    }
}

/// The smallest ship that survives every filter.
pub const MINIMAL_SHIP: &str = "ship \"Test Ship\"
\tsprite \"ship/test\"
\t\"cost\" 1000
\tgun 5 10
\tdescription \"Hello.\"
";

/// A fully featured base ship.
pub const KESTREL: &str = "ship \"Kestrel\"
\tplural \"Kestrels\"
\tsprite \"ship/kestrel\"
\t\t\"frame rate\" 8
\tthumbnail \"thumbnail/kestrel\"
\tattributes
\t\tcategory \"Heavy Warship\"
\t\t\"cost\" 8500000
\t\t\"shields\" 100
\t\t\"hull\" 4100
\t\t\"bonus\" 1
\t\t\"bonus\" 2
\t\tweapon
\t\t\t\"blast radius\" 160
\t\t\t\"shield damage\" 1600
\toutfits
\t\t\"Heavy Laser\" 4
\t\t\"Hyperdrive\"
\tengine -14 181
\tengine 14 181 0.8
\t\"reverse engine\" 0 -170
\t\tunder
\t\"steering engine\" -30 -80
\t\tleft
\tgun -18 -173 \"Heavy Laser\"
\tgun 18 -173 \"Heavy Laser\"
\tturret 0 20
\tbay \"Fighter\" -40 60 over
\t\t\"launch effect\" \"human internal\"
\tleak \"leak\" 60 50
\texplode \"large explosion\" 30
\t\"final explode\" \"final explosion large\"
\tdescription \"The Kestrel is a warship
\t\tbuilt for long patrols.\"
\tdescription `Captains call it the \"Bird\".`
";

/// Variants of [`KESTREL`].
pub const KESTREL_VARIANTS: &str = "ship \"Kestrel\" \"Kestrel (More Shields)\"
\t\"display name\" \"Shielded Kestrel\"
\t\"add attributes\"
\t\t\"shields\" 50
\t\t\"outfit space\" 10

ship \"Kestrel\" \"Kestrel (More Weapons)\"
\tgun 0 -180
\toutfits
\t\t\"Heavy Laser\" 5

ship \"Kestrel\" \"Kestrel (Refit)\"
\toutfits
\t\t\"Heavy Laser\" 2

ship \"Corvette\" \"Corvette (Missing)\"
\tgun 0 0
";

/// Outfits, including a weapon block and a backtick-delimited name.
pub const OUTFITS: &str = "outfit \"Heavy Laser\"
\t\"display name\" `Heavy \"Beam\" Laser`
\tcategory \"Guns\"
\t\"cost\" 9000
\tthumbnail \"outfit/heavy laser\"
\tweapon
\t\tsprite \"projectile/heavy laser\"
\t\t\t\"frame rate\" 10
\t\t\"velocity\" 20
\t\t\"hull damage\" 18
\tdescription \"Hot.\"

outfit `Quote \"Unquote\"`
\t\"mass\" 3
\tdescription
\t\tA legacy indented
\t\tdescription.

outfit \"Stub\"
\t\"mass\" 1
";

/// A ship with no description, which must be dropped.
pub const UNDESCRIBED_SHIP: &str = "ship \"Ghost\"
\tattributes
\t\t\"hull\" 5
\tgun 0 0
";

/// The sample files in load order.
#[must_use]
pub fn sample_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("data/human/kestrel.txt", KESTREL),
        ("data/human/variants.txt", KESTREL_VARIANTS),
        ("data/human/outfits.txt", OUTFITS),
        ("data/misc/ghost.txt", UNDESCRIBED_SHIP),
    ]
}

/// Generate `count` ships with one variant each, for load and timing tests.
#[must_use]
pub fn generated_ships(count: usize) -> String {
    let mut file = DataFile::new();
    for n in 0..count {
        let name = format!("ship \"Hull {n}\"");
        let variant = format!("ship \"Hull {n}\" \"Hull {n} (Armed)\"");
        file = file
            .line(0, &name)
            .line(1, &format!("sprite \"ship/hull{n}\""))
            .line(1, "attributes")
            .line(2, &format!("\"shields\" {}", n * 10))
            .line(2, "\"category\" \"Transport\"")
            .line(1, &format!("engine 0 {n}"))
            .line(1, "gun 1 2")
            .line(1, "description \"Generated hull.\"")
            .blank()
            .line(0, &variant)
            .line(1, "gun 3 4")
            .line(1, "\"add attributes\"")
            .line(2, "\"shields\" 5")
            .blank();
    }
    file.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_indents_with_tabs() {
        let text = DataFile::new().line(0, "ship \"A\"").line(2, "mass 5").blank().build();
        assert_eq!(text, "ship \"A\"\n\t\tmass 5\n\n");
    }

    #[test]
    fn test_generated_ships_has_headers() {
        let text = generated_ships(3);
        assert_eq!(text.matches("\nship \"Hull").count() + 1, 6);
    }
}
