use std::collections::BTreeMap;

use crate::language::Language;
use crate::roster::{
    self, Coordinate, Faction, Incident, NameSource, Roster, RowSource, SectorialForce,
};
use crate::unit::Unit;

use super::error::{CoreError, CoreErrorCode};
use super::feed::FeedSnapshot;
use super::types::Summary;

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug, Clone)]
pub struct Session {
    summary: Summary,
    roster: Roster,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Decode a persisted feed snapshot and assemble the roster for one of
    /// its languages. Without a hint the snapshot must hold exactly one.
    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        hint: Option<Language>,
    ) -> Result<Session, CoreError> {
        let feed = FeedSnapshot::from_bytes(bytes.as_ref())?;
        self.open_feed(&feed, hint)
    }

    pub fn open_feed(
        &self,
        feed: &FeedSnapshot,
        hint: Option<Language>,
    ) -> Result<Session, CoreError> {
        let lang = match hint {
            Some(lang) if feed.language(lang).is_some() => lang,
            Some(lang) => {
                return Err(CoreError::new(
                    CoreErrorCode::NotFound,
                    format!("feed snapshot has no {lang} data"),
                ));
            }
            None => match feed.languages().as_slice() {
                [lang] => *lang,
                [] => {
                    return Err(CoreError::new(
                        CoreErrorCode::NotFound,
                        "feed snapshot contains no languages",
                    ));
                }
                many => {
                    let codes: Vec<&str> = many.iter().map(|l| l.code()).collect();
                    return Err(CoreError::new(
                        CoreErrorCode::LanguageAmbiguous,
                        format!(
                            "feed snapshot holds {}; supply a language hint",
                            codes.join(", ")
                        ),
                    ));
                }
            },
        };

        Ok(self.assemble(feed, feed, lang))
    }

    pub fn assemble<R, N>(&self, rows: &R, names: &N, lang: Language) -> Session
    where
        R: RowSource + ?Sized,
        N: NameSource + Sync + ?Sized,
    {
        Session::from_roster(roster::assemble(rows, names, lang))
    }

    pub fn decode_record(&self, raw: &str) -> Result<Unit, CoreError> {
        Ok(Unit::decode(raw)?)
    }
}

impl Session {
    pub fn from_roster(roster: Roster) -> Self {
        Self {
            summary: Summary::of(&roster),
            roster,
        }
    }

    pub fn language(&self) -> Language {
        self.roster.language
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn into_roster(self) -> Roster {
        self.roster
    }

    pub fn factions(&self) -> &[Faction] {
        &self.roster.factions
    }

    pub fn faction(&self, id: u8) -> Result<&Faction, CoreError> {
        self.roster.faction(id).ok_or_else(|| {
            CoreError::new(CoreErrorCode::NotFound, format!("no faction with id {id}"))
        })
    }

    pub fn sector(&self, coordinate: Coordinate) -> Result<&SectorialForce, CoreError> {
        self.roster.sector(coordinate).ok_or_else(|| {
            CoreError::new(
                CoreErrorCode::NotFound,
                format!("no sector at coordinate {coordinate}"),
            )
        })
    }

    pub fn unit(&self, id: i32) -> Result<(Coordinate, &Unit), CoreError> {
        self.roster.unit(id).ok_or_else(|| {
            CoreError::new(CoreErrorCode::NotFound, format!("no unit with id {id}"))
        })
    }

    pub fn units_named(&self, ics_name: &str) -> Vec<(Coordinate, &Unit)> {
        self.roster.units_named(ics_name)
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.roster.incidents
    }

    /// Incidents as errors, for callers that want to fail on any of them.
    pub fn incident_errors(&self) -> Vec<CoreError> {
        self.roster
            .incidents
            .iter()
            .map(|incident| {
                let code = match incident {
                    Incident::MalformedRecord { .. } => CoreErrorCode::MalformedRecord,
                    Incident::FactionNameExhausted { .. }
                    | Incident::NameExhausted { .. }
                    | Incident::NamesUnused { .. } => CoreErrorCode::NameMismatch,
                };
                CoreError::new(code, incident.to_string())
            })
            .collect()
    }

    pub fn faction_names(&self) -> BTreeMap<u8, String> {
        self.roster.faction_names()
    }

    pub fn sector_names(&self) -> BTreeMap<Coordinate, String> {
        self.roster.sector_names()
    }
}
