use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::unit::Unit;

pub const FACTION_IDS: RangeInclusive<u8> = 1..=10;
pub const SECTOR_IDS: RangeInclusive<u8> = 1..=5;
pub const GENERAL_SECTOR_ID: u8 = 1;
pub const GENERAL_SECTOR_NAME: &str = "General";

/// A (faction, sector) pair on the roster grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub faction: u8,
    pub sector: u8,
}

impl Coordinate {
    pub fn new(faction: u8, sector: u8) -> Self {
        Self { faction, sector }
    }

    /// Decimal concatenation of faction and sector, e.g. 3/2 -> 32, 10/1 -> 101.
    pub fn code(&self) -> u32 {
        u32::from(self.faction) * 10 + u32::from(self.sector)
    }

    pub fn from_code(code: u32) -> Option<Self> {
        let faction = u8::try_from(code / 10).ok()?;
        let sector = u8::try_from(code % 10).ok()?;
        let coordinate = Self { faction, sector };
        coordinate.is_on_grid().then_some(coordinate)
    }

    pub fn is_on_grid(&self) -> bool {
        FACTION_IDS.contains(&self.faction) && SECTOR_IDS.contains(&self.sector)
    }

    pub fn is_general(&self) -> bool {
        self.sector == GENERAL_SECTOR_ID
    }

    /// Every coordinate in ascending (faction, sector) order.
    pub fn grid() -> impl Iterator<Item = Coordinate> {
        FACTION_IDS
            .flat_map(|faction| SECTOR_IDS.map(move |sector| Coordinate { faction, sector }))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Yields the raw record strings for one coordinate. Zero or one rows mean
/// the sector does not exist.
pub trait RowSource {
    fn rows(&self, coordinate: Coordinate, lang: Language) -> Vec<String>;
}

/// Yields localized names: each existing faction followed by its
/// non-general sectors, in ascending grid order.
pub trait NameSource {
    fn names(&self, lang: Language) -> Vec<String>;
}

impl<F> RowSource for F
where
    F: Fn(Coordinate, Language) -> Vec<String>,
{
    fn rows(&self, coordinate: Coordinate, lang: Language) -> Vec<String> {
        self(coordinate, lang)
    }
}

impl NameSource for [String] {
    fn names(&self, _lang: Language) -> Vec<String> {
        self.to_vec()
    }
}

impl NameSource for Vec<String> {
    fn names(&self, _lang: Language) -> Vec<String> {
        self.clone()
    }
}

/// Split the pipe-delimited wire form of a name list.
pub fn split_names(wire: &str) -> Vec<String> {
    let mut names: Vec<String> = wire.split('|').map(|s| s.trim().to_string()).collect();
    while names.last().is_some_and(|s| s.is_empty()) {
        names.pop();
    }
    names
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorialForce {
    pub coordinate: Coordinate,
    pub name: String,
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: u8,
    pub name: String,
    pub sectors: Vec<SectorialForce>,
}

impl Faction {
    pub fn sector(&self, sector: u8) -> Option<&SectorialForce> {
        self.sectors.iter().find(|s| s.coordinate.sector == sector)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Incident {
    /// A row that could not be decoded. `row` counts from 0 and includes the
    /// discarded header row.
    MalformedRecord {
        coordinate: Coordinate,
        row: usize,
        message: String,
    },
    /// The name list ran out before this faction was named.
    FactionNameExhausted { faction: u8 },
    /// The name list ran out before this sector was named.
    NameExhausted { coordinate: Coordinate },
    /// Names left over after every faction and sector was named.
    NamesUnused { count: usize },
}

impl Incident {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRecord { .. } => "malformed_record",
            Self::FactionNameExhausted { .. } => "faction_name_exhausted",
            Self::NameExhausted { .. } => "name_exhausted",
            Self::NamesUnused { .. } => "names_unused",
        }
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord {
                coordinate,
                row,
                message,
            } => write!(
                f,
                "coordinate={coordinate} kind={} row={row} {message}",
                self.kind()
            ),
            Self::FactionNameExhausted { faction } => {
                write!(f, "faction={faction} kind={}", self.kind())
            }
            Self::NameExhausted { coordinate } => {
                write!(f, "coordinate={coordinate} kind={}", self.kind())
            }
            Self::NamesUnused { count } => write!(f, "kind={} count={count}", self.kind()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub language: Language,
    pub factions: Vec<Faction>,
    pub incidents: Vec<Incident>,
}

impl Roster {
    pub fn faction(&self, id: u8) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    pub fn sector(&self, coordinate: Coordinate) -> Option<&SectorialForce> {
        self.faction(coordinate.faction)?.sector(coordinate.sector)
    }

    pub fn sectors(&self) -> impl Iterator<Item = &SectorialForce> {
        self.factions.iter().flat_map(|f| f.sectors.iter())
    }

    pub fn units(&self) -> impl Iterator<Item = (Coordinate, &Unit)> {
        self.sectors()
            .flat_map(|s| s.units.iter().map(move |u| (s.coordinate, u)))
    }

    /// First occurrence of a unit id in grid order.
    pub fn unit(&self, id: i32) -> Option<(Coordinate, &Unit)> {
        self.units().find(|(_, u)| u.id.value() == Some(id))
    }

    pub fn units_named(&self, ics_name: &str) -> Vec<(Coordinate, &Unit)> {
        self.units()
            .filter(|(_, u)| u.ics_name.eq_ignore_ascii_case(ics_name.trim()))
            .collect()
    }

    pub fn faction_names(&self) -> BTreeMap<u8, String> {
        self.factions
            .iter()
            .map(|f| (f.id, f.name.clone()))
            .collect()
    }

    pub fn sector_names(&self) -> BTreeMap<Coordinate, String> {
        self.sectors()
            .map(|s| (s.coordinate, s.name.clone()))
            .collect()
    }
}

/// Scan the grid, decode every existing sector and name the result.
///
/// Name retrieval runs on its own thread while the grid is decoded; naming
/// starts once both are complete.
pub fn assemble<R, N>(rows: &R, names: &N, lang: Language) -> Roster
where
    R: RowSource + ?Sized,
    N: NameSource + Sync + ?Sized,
{
    let (mut roster, queue) = std::thread::scope(|scope| {
        let fetch = scope.spawn(|| names.names(lang));
        let roster = decode_grid(rows, lang);
        let queue = fetch
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (roster, queue)
    });
    apply_names(&mut roster, queue);
    roster
}

/// Decode every coordinate with more than one row. Names are left empty.
pub fn decode_grid<R>(rows: &R, lang: Language) -> Roster
where
    R: RowSource + ?Sized,
{
    let mut factions: Vec<Faction> = Vec::new();
    let mut incidents = Vec::new();

    for coordinate in Coordinate::grid() {
        let raw_rows = rows.rows(coordinate, lang);
        if raw_rows.len() <= 1 {
            continue;
        }

        let mut units = Vec::with_capacity(raw_rows.len() - 1);
        for (row, raw) in raw_rows.iter().enumerate().skip(1) {
            match Unit::decode(raw) {
                Ok(unit) => units.push(unit),
                Err(e) => {
                    tracing::warn!(
                        target: "roster::assemble",
                        coordinate = %coordinate,
                        row,
                        error = %e,
                        "record.skipped"
                    );
                    incidents.push(Incident::MalformedRecord {
                        coordinate,
                        row,
                        message: e.to_string(),
                    });
                }
            }
        }
        tracing::debug!(
            target: "roster::assemble",
            coordinate = %coordinate,
            units = units.len(),
            "sector.decoded"
        );

        let sector = SectorialForce {
            coordinate,
            name: String::new(),
            units,
        };
        match factions.last_mut() {
            Some(faction) if faction.id == coordinate.faction => faction.sectors.push(sector),
            _ => factions.push(Faction {
                id: coordinate.faction,
                name: String::new(),
                sectors: vec![sector],
            }),
        }
    }

    Roster {
        language: lang,
        factions,
        incidents,
    }
}

/// Front-to-back cursor over the localized name list.
#[derive(Debug, Clone, Default)]
pub struct NameCursor {
    queue: VecDeque<String>,
    consumed: usize,
}

impl NameCursor {
    pub fn new(names: Vec<String>) -> Self {
        Self {
            queue: names.into(),
            consumed: 0,
        }
    }

    pub fn next_name(&mut self) -> Option<String> {
        let name = self.queue.pop_front()?;
        self.consumed += 1;
        Some(name)
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

/// Assign names in grid order: one per faction, then one per non-general
/// sector of that faction. General sectors are always named
/// [`GENERAL_SECTOR_NAME`] and take nothing from the list.
pub fn apply_names(roster: &mut Roster, names: Vec<String>) {
    let mut cursor = NameCursor::new(names);
    let mut exhausted: Option<Incident> = None;

    for faction in &mut roster.factions {
        match cursor.next_name() {
            Some(name) => faction.name = name,
            None => {
                exhausted.get_or_insert(Incident::FactionNameExhausted {
                    faction: faction.id,
                });
            }
        }
        for sector in &mut faction.sectors {
            if sector.coordinate.is_general() {
                sector.name = GENERAL_SECTOR_NAME.to_string();
                continue;
            }
            match cursor.next_name() {
                Some(name) => sector.name = name,
                None => {
                    exhausted.get_or_insert(Incident::NameExhausted {
                        coordinate: sector.coordinate,
                    });
                }
            }
        }
    }

    if let Some(incident) = exhausted {
        tracing::warn!(
            target: "roster::names",
            at = %incident,
            consumed = cursor.consumed(),
            "names.exhausted"
        );
        roster.incidents.push(incident);
    } else if cursor.remaining() > 0 {
        tracing::warn!(
            target: "roster::names",
            remaining = cursor.remaining(),
            "names.unused"
        );
        roster.incidents.push(Incident::NamesUnused {
            count: cursor.remaining(),
        });
    }
}
