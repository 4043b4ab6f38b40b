use serde_json::json;

use shipyard_core::prelude::*;
use shipyard_test_utils::determinism::{catalog_json, verify_determinism};
use shipyard_test_utils::fixtures::{
    sample_files, DataFile, KESTREL, MINIMAL_SHIP, OUTFITS, UNDESCRIBED_SHIP,
};

fn ships_only(text: &str) -> Vec<ShipRecord> {
    assemble([("data/ships.txt", text)]).0.ships
}

#[test]
fn minimal_ship_serializes_to_expected_document() {
    let ships = ships_only(MINIMAL_SHIP);
    assert_eq!(ships.len(), 1);

    let document = serde_json::to_value(&ships[0]).unwrap();
    assert_eq!(
        document,
        json!({
            "name": "Test Ship",
            "sprite": "ship/test",
            "cost": 1000,
            "guns": [{"x": 5, "y": 10}],
            "engines": [],
            "reverseEngines": [],
            "steeringEngines": [],
            "turrets": [],
            "bays": [],
            "description": "Hello."
        })
    );
}

#[test]
fn ship_without_description_is_dropped() {
    assert!(ships_only(UNDESCRIBED_SHIP).is_empty());
}

#[test]
fn whitespace_only_description_is_dropped() {
    let text = DataFile::new()
        .line(0, "ship \"Blank\"")
        .line(1, "gun 0 0")
        .line(1, "description \"   \"")
        .build();
    assert!(ships_only(&text).is_empty());
}

#[test]
fn description_closed_at_same_depth_drops_delimiter() {
    let text = "ship \"A\"\n\tgun 0 0\n\tdescription \"Line one\n\tline two.\"\n";
    let ships = ships_only(text);
    assert_eq!(ships.len(), 1);
    assert_eq!(ships[0].description, "Line one line two.");
}

#[test]
fn description_closed_at_top_level_keeps_rest_of_ship() {
    let text = "ship \"A\"\n\tdescription \"Line one\nline two.\"\n\tgun 0 0\n";
    let ships = ships_only(text);
    assert_eq!(ships.len(), 1);
    assert_eq!(ships[0].description, "Line one line two.");
    assert_eq!(ships[0].hardpoints.guns, vec![Mount { x: 0.0, y: 0.0 }]);
}

#[test]
fn stub_ship_without_hardware_is_dropped() {
    let text = DataFile::new()
        .line(0, "ship \"Stub\"")
        .line(1, "sprite \"ship/stub\"")
        .line(1, "\"reverse engine\" 0 10")
        .line(1, "description \"Only a picture.\"")
        .build();
    let (catalog, summary) = assemble([("data/stub.txt", text)]);
    assert!(catalog.ships.is_empty());
    assert_eq!(summary.stubs, 1);
}

#[test]
fn repeated_keys_become_a_list() {
    let ships = ships_only(KESTREL);
    let attributes = ships[0].attributes.as_ref().unwrap();
    assert_eq!(
        attributes.get("bonus"),
        Some(&Value::List(vec![Value::Number(1.0), Value::Number(2.0)]))
    );
}

#[test]
fn full_ship_fields() {
    let ship = &ships_only(KESTREL)[0];

    assert_eq!(ship.name, "Kestrel");
    assert_eq!(
        ship.description,
        "The Kestrel is a warship built for long patrols. Captains call it the \"Bird\"."
    );
    assert_eq!(ship.thumbnail.as_deref(), Some("thumbnail/kestrel"));
    assert_eq!(
        ship.sprite_data.as_ref().and_then(|d| d.number("frame rate")),
        Some(8.0)
    );
    assert_eq!(ship.extra.string("plural"), Some("Kestrels"));

    let attributes = ship.attributes.as_ref().unwrap();
    assert_eq!(attributes.string("category"), Some("Heavy Warship"));
    assert_eq!(
        attributes.map("weapon").and_then(|w| w.number("blast radius")),
        Some(160.0)
    );

    let hardpoints = &ship.hardpoints;
    assert_eq!(hardpoints.engines.len(), 2);
    assert_eq!(hardpoints.engines[1].zoom, Some(0.8));
    assert_eq!(hardpoints.reverse_engines[0].position.as_deref(), Some("under"));
    assert_eq!(hardpoints.steering_engines[0].position.as_deref(), Some("left"));
    assert_eq!(hardpoints.guns.len(), 2);
    assert_eq!(hardpoints.turrets.len(), 1);
    assert_eq!(hardpoints.bays[0].bay_type, "Fighter");
    assert_eq!(hardpoints.bays[0].position.as_deref(), Some("over"));

    for skipped in ["outfits", "Heavy Laser", "leak", "explode", "final explode"] {
        assert!(!ship.extra.contains_key(skipped), "{skipped} should be skipped");
    }
}

#[test]
fn outfits_parse_with_weapon_and_display_name() {
    let (catalog, _) = assemble([("data/outfits.txt", OUTFITS)]);
    assert_eq!(catalog.outfits.len(), 2);

    let laser = &catalog.outfits[0];
    assert_eq!(laser.display_name.as_deref(), Some("Heavy \"Beam\" Laser"));
    assert_eq!(laser.extra.string("category"), Some("Guns"));
    let weapon = laser.weapon.as_ref().unwrap();
    assert_eq!(weapon.string("sprite"), Some("projectile/heavy laser"));
    assert_eq!(
        weapon.map("spriteData").and_then(|d| d.number("frame rate")),
        Some(10.0)
    );

    let quoted = &catalog.outfits[1];
    assert_eq!(quoted.name, "Quote \"Unquote\"");
    assert_eq!(quoted.description, "A legacy indented description.");
}

#[test]
fn sample_tree_assembles_with_expected_counts() {
    let (catalog, summary) = assemble(sample_files());

    assert_eq!(catalog.ships.len(), 1);
    assert_eq!(catalog.variants.len(), 2);
    assert_eq!(catalog.outfits.len(), 2);
    assert_eq!(summary.files, 4);
    assert_eq!(summary.pending, 4);
    assert_eq!(summary.skipped, 2);
}

#[test]
fn variant_may_precede_its_base_file() {
    let mut files = sample_files();
    files.reverse();
    let (catalog, _) = assemble(files);
    assert_eq!(catalog.variants.len(), 2);
}

#[test]
fn duplicate_names_keep_both_ships_and_resolve_against_first() {
    let first = DataFile::new()
        .line(0, "ship \"Twin\"")
        .line(1, "attributes")
        .line(2, "\"shields\" 10")
        .line(1, "description \"First.\"")
        .build();
    let second = first.replace("10", "99").replace("First.", "Second.");
    let variant = DataFile::new()
        .line(0, "ship \"Twin\" \"Twin (Plus)\"")
        .line(1, "\"add attributes\"")
        .line(2, "\"shields\" 1")
        .build();

    let (catalog, summary) = assemble([
        ("data/a.txt", first.as_str()),
        ("data/b.txt", second.as_str()),
        ("data/c.txt", variant.as_str()),
    ]);

    assert_eq!(catalog.ships.len(), 2);
    assert_eq!(summary.duplicates, 1);
    let shields = catalog.variants[0]
        .ship
        .attributes
        .as_ref()
        .and_then(|a| a.number("shields"));
    assert_eq!(shields, Some(11.0));
}

#[test]
fn crlf_input_matches_lf_input() {
    let crlf = MINIMAL_SHIP.replace('\n', "\r\n");
    let (lf, _) = assemble([("data/a.txt", MINIMAL_SHIP)]);
    let (cr, _) = assemble([("data/a.txt", crlf.as_str())]);
    assert_eq!(catalog_json(&lf), catalog_json(&cr));
}

#[test]
fn unrelated_top_level_lines_are_ignored() {
    let text = format!("government \"Republic\"\n\tcolor 1 0 0\n\n{MINIMAL_SHIP}\nsystem \"Sol\"\n");
    assert_eq!(ships_only(&text).len(), 1);
}

#[test]
fn parsing_is_deterministic() {
    verify_determinism(5, &sample_files()).assert_deterministic();
}
