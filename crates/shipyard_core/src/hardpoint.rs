//! Hardpoint directives: engines, weapon mounts and bays.
//!
//! Each directive is a single line of words followed by numeric coordinates.
//! Reverse and steering engines may carry an indented position, bays an
//! indented list of quoted effect pairs.

use indexmap::IndexMap;
use serde::Serialize;

use crate::source::SourceFile;
use crate::token::{split_quoted, single_quoted, words, Word};
use crate::value::{serialize_number, serialize_optional_number};

/// Forward thrust flare.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Engine {
    /// Horizontal offset.
    #[serde(serialize_with = "serialize_number")]
    pub x: f64,
    /// Vertical offset.
    #[serde(serialize_with = "serialize_number")]
    pub y: f64,
    /// Flare scale.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_number"
    )]
    pub zoom: Option<f64>,
}

/// Reverse or steering thrust flare.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectedEngine {
    /// Horizontal offset.
    #[serde(serialize_with = "serialize_number")]
    pub x: f64,
    /// Vertical offset.
    #[serde(serialize_with = "serialize_number")]
    pub y: f64,
    /// Flare scale.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_number"
    )]
    pub zoom: Option<f64>,
    /// Draw position, e.g. `over` or `under`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Gun or turret mount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mount {
    /// Horizontal offset.
    #[serde(serialize_with = "serialize_number")]
    pub x: f64,
    /// Vertical offset.
    #[serde(serialize_with = "serialize_number")]
    pub y: f64,
}

/// Carried-craft bay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bay {
    /// Bay category, e.g. `Fighter`.
    #[serde(rename = "type")]
    pub bay_type: String,
    /// Horizontal offset.
    #[serde(serialize_with = "serialize_number")]
    pub x: f64,
    /// Vertical offset.
    #[serde(serialize_with = "serialize_number")]
    pub y: f64,
    /// Trailing words after the coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Quoted effect pairs from the indented block.
    #[serde(flatten)]
    pub effects: IndexMap<String, String>,
}

/// Hardpoint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardpointKind {
    /// `engine`
    Engine,
    /// `"reverse engine"`
    ReverseEngine,
    /// `"steering engine"`
    SteeringEngine,
    /// `gun`
    Gun,
    /// `turret`
    Turret,
    /// `bay`
    Bay,
}

impl HardpointKind {
    /// Every kind, in output order.
    pub const ALL: [Self; 6] = [
        Self::Engine,
        Self::ReverseEngine,
        Self::SteeringEngine,
        Self::Gun,
        Self::Turret,
        Self::Bay,
    ];

    /// Detect the directive keyword. Returns the kind and how many words it used.
    fn detect(words: &[Word<'_>]) -> Option<(Self, usize)> {
        let first = words.first()?;
        let second = words.get(1).filter(|w| !w.is_quoted()).map(|w| w.text);
        let kind = match (first.text, first.is_quoted(), second) {
            ("engine", false, _) => (Self::Engine, 1),
            ("reverse engine", true, _) => (Self::ReverseEngine, 1),
            ("steering engine", true, _) => (Self::SteeringEngine, 1),
            ("reverse", false, Some("engine")) => (Self::ReverseEngine, 2),
            ("steering", false, Some("engine")) => (Self::SteeringEngine, 2),
            ("gun", false, _) => (Self::Gun, 1),
            ("turret", false, _) => (Self::Turret, 1),
            ("bay", false, _) => (Self::Bay, 1),
            _ => return None,
        };
        Some(kind)
    }
}

/// One parsed hardpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Hardpoint {
    /// Forward engine.
    Engine(Engine),
    /// Reverse engine.
    ReverseEngine(DirectedEngine),
    /// Steering engine.
    SteeringEngine(DirectedEngine),
    /// Gun mount.
    Gun(Mount),
    /// Turret mount.
    Turret(Mount),
    /// Bay.
    Bay(Bay),
}

impl Hardpoint {
    /// Category of this hardpoint.
    #[must_use]
    pub fn kind(&self) -> HardpointKind {
        match self {
            Self::Engine(_) => HardpointKind::Engine,
            Self::ReverseEngine(_) => HardpointKind::ReverseEngine,
            Self::SteeringEngine(_) => HardpointKind::SteeringEngine,
            Self::Gun(_) => HardpointKind::Gun,
            Self::Turret(_) => HardpointKind::Turret,
            Self::Bay(_) => HardpointKind::Bay,
        }
    }
}

/// A recognised hardpoint directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Which directive keyword matched.
    pub kind: HardpointKind,
    /// The hardpoint, or `None` if its coordinates were not numeric.
    pub hardpoint: Option<Hardpoint>,
    /// Index of the next line to examine.
    pub next: usize,
}

/// Parse a hardpoint directive at `index`, or return `None` if the line is not one.
#[must_use]
pub fn parse_directive(source: &SourceFile, index: usize) -> Option<Directive> {
    let words = words(source.text(index));
    let (kind, used) = HardpointKind::detect(&words)?;
    let args = &words[used..];
    let x = args.first().and_then(Word::number);
    let y = args.get(1).and_then(Word::number);

    let mut next = index + 1;
    let hardpoint = match kind {
        HardpointKind::Engine => x.zip(y).map(|(x, y)| {
            Hardpoint::Engine(Engine {
                x,
                y,
                zoom: args.get(2).and_then(Word::number),
            })
        }),
        HardpointKind::ReverseEngine | HardpointKind::SteeringEngine => {
            let (position, end) = last_nested_line(source, index);
            next = end;
            x.zip(y).map(|(x, y)| {
                let engine = DirectedEngine {
                    x,
                    y,
                    zoom: args.get(2).and_then(Word::number),
                    position,
                };
                if kind == HardpointKind::ReverseEngine {
                    Hardpoint::ReverseEngine(engine)
                } else {
                    Hardpoint::SteeringEngine(engine)
                }
            })
        }
        HardpointKind::Gun | HardpointKind::Turret => x.zip(y).map(|(x, y)| {
            let mount = Mount { x, y };
            if kind == HardpointKind::Gun {
                Hardpoint::Gun(mount)
            } else {
                Hardpoint::Turret(mount)
            }
        }),
        HardpointKind::Bay => {
            let (effects, end) = bay_effects(source, index);
            next = end;
            parse_bay(args, effects).map(Hardpoint::Bay)
        }
    };

    Some(Directive {
        kind,
        hardpoint,
        next,
    })
}

fn parse_bay(args: &[Word<'_>], effects: IndexMap<String, String>) -> Option<Bay> {
    let bay_type = args.first()?.text.to_string();
    let x = args.get(1)?.number()?;
    let y = args.get(2)?.number()?;
    let rest: Vec<&str> = args.iter().skip(3).map(|w| w.text).collect();
    Some(Bay {
        bay_type,
        x,
        y,
        position: (!rest.is_empty()).then(|| rest.join(" ")),
        effects,
    })
}

/// The last deeper line under `index` and the index after the nested block.
fn last_nested_line(source: &SourceFile, index: usize) -> (Option<String>, usize) {
    let depth = source.depth(index);
    let end = source.block_end(index + 1, depth);
    let last = (index + 1..end)
        .rev()
        .find(|&i| !source.is_blank(i))
        .map(|i| source.text(i).to_string());
    (last, end)
}

/// Quoted key/value pairs under a bay line and the index after them.
fn bay_effects(source: &SourceFile, index: usize) -> (IndexMap<String, String>, usize) {
    let depth = source.depth(index);
    let end = source.block_end(index + 1, depth);
    let effects = (index + 1..end)
        .filter_map(|i| {
            let (key, rest) = split_quoted(source.text(i))?;
            let value = single_quoted(rest.trim())?;
            Some((key.to_string(), value.to_string()))
        })
        .collect();
    (effects, end)
}

/// All hardpoint lists of a ship.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardpoints {
    /// Forward engines.
    pub engines: Vec<Engine>,
    /// Reverse engines.
    pub reverse_engines: Vec<DirectedEngine>,
    /// Steering engines.
    pub steering_engines: Vec<DirectedEngine>,
    /// Gun mounts.
    pub guns: Vec<Mount>,
    /// Turret mounts.
    pub turrets: Vec<Mount>,
    /// Bays.
    pub bays: Vec<Bay>,
}

impl Hardpoints {
    /// Append a hardpoint to its list.
    pub fn push(&mut self, hardpoint: Hardpoint) {
        match hardpoint {
            Hardpoint::Engine(engine) => self.engines.push(engine),
            Hardpoint::ReverseEngine(engine) => self.reverse_engines.push(engine),
            Hardpoint::SteeringEngine(engine) => self.steering_engines.push(engine),
            Hardpoint::Gun(mount) => self.guns.push(mount),
            Hardpoint::Turret(mount) => self.turrets.push(mount),
            Hardpoint::Bay(bay) => self.bays.push(bay),
        }
    }

    /// Replace one list wholesale with the same list from `other`.
    pub fn replace(&mut self, kind: HardpointKind, other: &Self) {
        match kind {
            HardpointKind::Engine => self.engines.clone_from(&other.engines),
            HardpointKind::ReverseEngine => self.reverse_engines.clone_from(&other.reverse_engines),
            HardpointKind::SteeringEngine => {
                self.steering_engines.clone_from(&other.steering_engines);
            }
            HardpointKind::Gun => self.guns.clone_from(&other.guns),
            HardpointKind::Turret => self.turrets.clone_from(&other.turrets),
            HardpointKind::Bay => self.bays.clone_from(&other.bays),
        }
    }

    /// Number of entries in one list.
    #[must_use]
    pub fn count(&self, kind: HardpointKind) -> usize {
        match kind {
            HardpointKind::Engine => self.engines.len(),
            HardpointKind::ReverseEngine => self.reverse_engines.len(),
            HardpointKind::SteeringEngine => self.steering_engines.len(),
            HardpointKind::Gun => self.guns.len(),
            HardpointKind::Turret => self.turrets.len(),
            HardpointKind::Bay => self.bays.len(),
        }
    }
}
