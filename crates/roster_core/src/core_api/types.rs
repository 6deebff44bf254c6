use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::roster::{Incident, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidentCounts {
    pub malformed_records: usize,
    pub name_mismatches: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub language: Language,
    pub factions: usize,
    pub sectors: usize,
    pub units: usize,
    pub loadouts: usize,
    pub duo_bonds: usize,
    pub incidents: IncidentCounts,
}

impl Summary {
    pub fn of(roster: &Roster) -> Self {
        let mut incidents = IncidentCounts::default();
        for incident in &roster.incidents {
            match incident {
                Incident::MalformedRecord { .. } => incidents.malformed_records += 1,
                Incident::FactionNameExhausted { .. }
                | Incident::NameExhausted { .. }
                | Incident::NamesUnused { .. } => {
                    incidents.name_mismatches += 1
                }
            }
        }

        Self {
            language: roster.language,
            factions: roster.factions.len(),
            sectors: roster.sectors().count(),
            units: roster.units().count(),
            loadouts: roster.units().map(|(_, u)| u.loadouts().count()).sum(),
            duo_bonds: roster.units().filter(|(_, u)| u.duo.is_some()).count(),
            incidents,
        }
    }
}
