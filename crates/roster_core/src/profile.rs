use serde::{Deserialize, Serialize};

use crate::fields::{DecodeError, FieldReader};
use crate::layout::{
    BASIC_FIELD_COUNT, BLOCK_DELIMITER, LOADOUT_DELIMITER, LOADOUT_FIELD_COUNT, ORDER_DELIMITER,
    ORDER_FIELD_COUNT, STATS_FIELD_COUNT,
};
use crate::scalar::{parse_has, parse_movement, parse_notes};
use crate::stat::{HitPoints, Movement, Stat};

// Basic block
const BASIC_TYPE: usize = 0;
const BASIC_ROLE: usize = 1;
const BASIC_CUBE: usize = 2;
const BASIC_CUBE_VARIANT: usize = 3;
const BASIC_REGULAR: usize = 4;
const BASIC_IRREGULAR: usize = 5;
const BASIC_IMPETUOUS: usize = 6;
const BASIC_FRENZIED: usize = 7;
const BASIC_NAME: usize = 8;
const BASIC_EXTREMELY_IMPETUOUS: usize = 9;
const BASIC_HACKABLE: usize = 10;
const BASIC_NOTES: usize = 13;

// Stat block
const STAT_MOVEMENT: usize = 0;
const STAT_CC: usize = 1;
const STAT_BS: usize = 2;
const STAT_PH: usize = 3;
const STAT_WIP: usize = 4;
const STAT_ARM: usize = 5;
const STAT_BTS: usize = 6;
const STAT_HIT_POINTS: usize = 7;
const STAT_AVAILABILITY: usize = 8;
const STAT_HIT_POINTS_KIND: usize = 9;
const STAT_SILHOUETTE: usize = 12;

// Loadout
const LOADOUT_ID: usize = 0;
const LOADOUT_NAME: usize = 1;
const LOADOUT_WEAPONS: usize = 2;
const LOADOUT_MELEE: usize = 3;
const LOADOUT_SWC: usize = 4;
const LOADOUT_POINTS: usize = 5;
const LOADOUT_SQUAD_SIZE: usize = 6;
const LOADOUT_ATTACHMENT: usize = 7;
const LOADOUT_ORDERS: usize = 8;
const LOADOUT_DUO: usize = 9;

const SWC_EXTRA_MARKER: char = '+';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    Selectable,
    AttachedTo(i32),
}

impl Attachment {
    pub fn from_raw(raw: &str) -> Self {
        match Stat::from_raw(raw) {
            Stat::Value(id) => Self::AttachedTo(id),
            Stat::Unknown => Self::Selectable,
        }
    }
}

/// Orders a loadout adds to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderContribution {
    pub regular: Stat,
    pub irregular: Stat,
    pub impetuous: Stat,
}

impl OrderContribution {
    pub fn from_raw(raw: &str) -> Result<Self, DecodeError> {
        let r = FieldReader::split_exact(
            raw,
            ORDER_DELIMITER,
            "order triple",
            ORDER_FIELD_COUNT,
        )?;
        Ok(Self {
            regular: r.read_stat(0)?,
            irregular: r.read_stat(1)?,
            impetuous: r.read_stat(2)?,
        })
    }
}

/// Support weapon cost. Fractional in the feed (e.g. `0.5`); a trailing `+`
/// flags an extra cost on top of the listed value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SupportCost {
    pub value: Option<f32>,
    pub extra: bool,
}

impl SupportCost {
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        let extra = trimmed.ends_with(SWC_EXTRA_MARKER);
        let numeric = trimmed.trim_end_matches(SWC_EXTRA_MARKER).trim();
        Self {
            value: numeric.parse::<f32>().ok().filter(|v| v.is_finite()),
            extra,
        }
    }
}

/// One purchasable configuration of a profile group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub id: Stat,
    pub name: String,
    pub weapons: String,
    pub melee_weapons: String,
    pub swc: SupportCost,
    pub points: Stat,
    pub squad_size: Stat,
    pub orders: OrderContribution,
    pub attachment: Attachment,
    /// Id of the duo bond this loadout is a member of.
    pub duo: Option<Stat>,
    #[serde(skip)]
    pub(crate) is_duo: bool,
}

impl Loadout {
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let r = FieldReader::split(raw, LOADOUT_DELIMITER, "loadout", LOADOUT_FIELD_COUNT)?;
        Ok(Self {
            id: r.read_stat(LOADOUT_ID)?,
            name: r.read_string(LOADOUT_NAME)?,
            weapons: r.read_string(LOADOUT_WEAPONS)?,
            melee_weapons: r.read_string(LOADOUT_MELEE)?,
            swc: SupportCost::from_raw(r.read_str(LOADOUT_SWC)?),
            points: r.read_stat(LOADOUT_POINTS)?,
            squad_size: r.read_stat(LOADOUT_SQUAD_SIZE)?,
            attachment: Attachment::from_raw(r.read_str(LOADOUT_ATTACHMENT)?),
            orders: OrderContribution::from_raw(r.read_str(LOADOUT_ORDERS)?)?,
            duo: None,
            is_duo: r.read_flag(LOADOUT_DUO)?,
        })
    }

    pub fn is_selectable(&self) -> bool {
        self.attachment == Attachment::Selectable
    }

    /// Carries the duo marker and has not been linked yet.
    pub fn is_duo_candidate(&self) -> bool {
        self.is_duo
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBlock {
    pub movement: Movement,
    pub close_combat: Stat,
    pub ballistic_skill: Stat,
    pub physical: Stat,
    pub willpower: Stat,
    pub armor: Stat,
    pub bts: Stat,
    pub hit_points: HitPoints,
    pub availability: Stat,
    pub silhouette: Stat,
}

impl StatBlock {
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let r = FieldReader::split(raw, BLOCK_DELIMITER, "stat block", STATS_FIELD_COUNT)?;
        Ok(Self {
            movement: parse_movement(r.read_str(STAT_MOVEMENT)?),
            close_combat: r.read_stat(STAT_CC)?,
            ballistic_skill: r.read_stat(STAT_BS)?,
            physical: r.read_stat(STAT_PH)?,
            willpower: r.read_stat(STAT_WIP)?,
            armor: r.read_stat(STAT_ARM)?,
            bts: r.read_stat(STAT_BTS)?,
            hit_points: HitPoints::from_raw(
                r.read_str(STAT_HIT_POINTS)?,
                r.read_str(STAT_HIT_POINTS_KIND)?,
            ),
            availability: r.read_stat(STAT_AVAILABILITY)?,
            silhouette: r.read_stat(STAT_SILHOUETTE)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderFlags {
    pub regular: bool,
    pub irregular: bool,
    pub impetuous: bool,
    pub extremely_impetuous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupFlags {
    pub cube: bool,
    pub cube_variant: bool,
    pub frenzied: bool,
    pub hackable: bool,
}

/// Raw top-level fields belonging to one profile group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupFields<'a> {
    pub basic: &'a str,
    pub stats: &'a str,
    pub skills_a: &'a str,
    pub equipment: &'a str,
    pub skills_b: &'a str,
    pub profiles: &'a str,
}

impl GroupFields<'_> {
    /// Number of populated sub-fields in the basic block. The feed signals an
    /// unused group slot with a basic block of at most one populated field.
    pub fn populated_basic_fields(&self) -> usize {
        FieldReader::split(self.basic, BLOCK_DELIMITER, "basic block", 0)
            .map_or(0, |r| r.populated_count())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileGroup {
    pub slot: usize,
    pub name: String,
    pub troop_type: String,
    pub role: String,
    pub stats: StatBlock,
    pub orders: OrderFlags,
    pub flags: GroupFlags,
    pub notes: Vec<String>,
    pub skills: Vec<String>,
    pub equipment: Vec<String>,
    pub loadouts: Vec<Loadout>,
    /// Loadouts carrying the duo marker, held back for the duo linker.
    #[serde(skip)]
    pub(crate) duo_candidates: Vec<Loadout>,
}

impl ProfileGroup {
    pub fn decode(slot: usize, fields: GroupFields<'_>) -> Result<Self, DecodeError> {
        let basic = FieldReader::split(
            fields.basic,
            BLOCK_DELIMITER,
            "basic block",
            BASIC_FIELD_COUNT,
        )?;
        let stats = StatBlock::decode(fields.stats)?;

        let mut loadouts = Vec::new();
        let mut duo_candidates = Vec::new();
        for entry in fields.profiles.split(BLOCK_DELIMITER) {
            if entry.trim().is_empty() {
                continue;
            }
            let loadout = Loadout::decode(entry)?;
            if loadout.is_duo {
                duo_candidates.push(loadout);
            } else {
                loadouts.push(loadout);
            }
        }

        Ok(Self {
            slot,
            name: basic.read_string(BASIC_NAME)?,
            troop_type: basic.read_string(BASIC_TYPE)?,
            role: basic.read_string(BASIC_ROLE)?,
            stats,
            orders: OrderFlags {
                regular: basic.read_flag(BASIC_REGULAR)?,
                irregular: basic.read_flag(BASIC_IRREGULAR)?,
                impetuous: basic.read_flag(BASIC_IMPETUOUS)?,
                extremely_impetuous: basic.read_flag(BASIC_EXTREMELY_IMPETUOUS)?,
            },
            flags: GroupFlags {
                cube: basic.read_flag(BASIC_CUBE)?,
                cube_variant: basic.read_flag(BASIC_CUBE_VARIANT)?,
                frenzied: basic.read_flag(BASIC_FRENZIED)?,
                hackable: basic.read_flag(BASIC_HACKABLE)?,
            },
            notes: parse_notes(basic.read_str(BASIC_NOTES)?),
            skills: parse_has(&[fields.skills_a, fields.skills_b]),
            equipment: parse_has(&[fields.equipment]),
            loadouts,
            duo_candidates,
        })
    }

    pub fn loadout(&self, id: i32) -> Option<&Loadout> {
        self.loadouts.iter().find(|l| l.id.value() == Some(id))
    }

    pub fn has_pending_duo(&self) -> bool {
        !self.duo_candidates.is_empty()
    }
}
