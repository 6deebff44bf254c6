use serde::{Deserialize, Serialize};

use crate::duo::{self, DuoBond};
use crate::fields::{DecodeError, DecodeErrorKind, FieldReader};
use crate::layout::{
    GroupField, GroupLayout, ICS_NAME_FIELD, RECORD_DELIMITER, RECORD_FIELD_COUNT,
    UNIT_COUNT_FIELD, UNIT_ID_FIELD, WINDOW_FIELD,
};
use crate::profile::{GroupFields, Loadout, ProfileGroup};
use crate::stat::Stat;

/// Basic blocks with this many populated fields or fewer mark an unused slot.
const EMPTY_GROUP_THRESHOLD: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Stat,
    pub ics_name: String,
    pub unit_count: Stat,
    pub window: String,
    pub groups: Vec<ProfileGroup>,
    pub duo: Option<DuoBond>,
}

impl Unit {
    /// Decode one `|`-delimited record and run the duo linking pass over it.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let mut unit = Self::decode_unlinked(raw)?;
        duo::link(&mut unit);
        Ok(unit)
    }

    /// First phase only: groups are decoded, duo-marked loadouts stay pending.
    pub fn decode_unlinked(raw: &str) -> Result<Self, DecodeError> {
        if raw.trim().is_empty() {
            return Err(DecodeError::new(DecodeErrorKind::Empty, "empty record"));
        }
        let r = FieldReader::split(raw, RECORD_DELIMITER, "record", RECORD_FIELD_COUNT)?;

        let mut groups = Vec::new();
        for layout in GroupLayout::all() {
            let fields = GroupFields {
                basic: r.read_str(layout.index_of(GroupField::Basic))?,
                stats: r.read_str(layout.index_of(GroupField::Stats))?,
                skills_a: r.read_str(layout.index_of(GroupField::SkillsA))?,
                equipment: r.read_str(layout.index_of(GroupField::Equipment))?,
                skills_b: r.read_str(layout.index_of(GroupField::SkillsB))?,
                profiles: r.read_str(layout.index_of(GroupField::Profiles))?,
            };
            if fields.populated_basic_fields() <= EMPTY_GROUP_THRESHOLD {
                continue;
            }
            groups.push(ProfileGroup::decode(layout.slot, fields)?);
        }

        Ok(Self {
            id: r.read_stat(UNIT_ID_FIELD)?,
            ics_name: r.read_string(ICS_NAME_FIELD)?,
            unit_count: r.read_stat(UNIT_COUNT_FIELD)?,
            window: r.read_string(WINDOW_FIELD)?,
            groups,
            duo: None,
        })
    }

    /// Display name of the first profile group.
    pub fn name(&self) -> &str {
        self.groups.first().map_or("", |g| g.name.as_str())
    }

    pub fn loadouts(&self) -> impl Iterator<Item = &Loadout> {
        self.groups.iter().flat_map(|g| g.loadouts.iter())
    }

    pub fn loadout(&self, id: i32) -> Option<&Loadout> {
        self.loadouts().find(|l| l.id.value() == Some(id))
    }

    pub fn is_duo_member(&self, loadout_id: i32) -> bool {
        self.duo
            .as_ref()
            .is_some_and(|bond| bond.members.contains(&Stat::Value(loadout_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(groups: [&str; 3]) -> String {
        format!("12|FUSILIER|4|{}|{}|{}|1", groups[0], groups[1], groups[2])
    }

    const GROUP: &str = "LI@Line Infantry@0@0@1@0@0@0@Fusiliers@0@1@@@\
                         |10-5@13@12@10@12@1@0@1@2@0@@@2\
                         ||||101#Fusilier#Combi Rifle##0#10#1#-#1%0%0#0";
    const EMPTY: &str = "@@@@@@@@@@@@@|@@@@@@@@@@@@||||";

    #[test]
    fn decodes_identity_fields() {
        let unit = Unit::decode(&record([GROUP, EMPTY, EMPTY])).expect("unit");
        assert_eq!(unit.id, Stat::Value(12));
        assert_eq!(unit.ics_name, "FUSILIER");
        assert_eq!(unit.unit_count, Stat::Value(4));
        assert_eq!(unit.window, "1");
        assert_eq!(unit.name(), "Fusiliers");
        assert_eq!(unit.groups.len(), 1);
        assert!(unit.duo.is_none());
    }

    #[test]
    fn empty_record_is_rejected() {
        let err = Unit::decode("  ").expect_err("empty");
        assert_eq!(err.kind, DecodeErrorKind::Empty);
    }

    #[test]
    fn short_record_is_rejected() {
        let err = Unit::decode("1|A|2").expect_err("short");
        assert_eq!(err.kind, DecodeErrorKind::MissingField);
    }
}
