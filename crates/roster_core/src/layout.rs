//! Positional contract of one raw roster record.
//!
//! A record nests four delimiter levels: `|` between top-level fields, `@`
//! inside a block, `#` inside a single loadout and `%` inside the order
//! triple of a loadout.

pub const RECORD_DELIMITER: char = '|';
pub const BLOCK_DELIMITER: char = '@';
pub const LOADOUT_DELIMITER: char = '#';
pub const ORDER_DELIMITER: char = '%';

pub const UNIT_ID_FIELD: usize = 0;
pub const ICS_NAME_FIELD: usize = 1;
pub const UNIT_COUNT_FIELD: usize = 2;
pub const FIRST_GROUP_FIELD: usize = 3;
pub const GROUP_FIELD_COUNT: usize = 6;
pub const GROUP_SLOTS: usize = 3;
pub const WINDOW_FIELD: usize = FIRST_GROUP_FIELD + GROUP_SLOTS * GROUP_FIELD_COUNT;
pub const RECORD_FIELD_COUNT: usize = WINDOW_FIELD + 1;

pub const BASIC_FIELD_COUNT: usize = 14;
pub const STATS_FIELD_COUNT: usize = 13;
pub const LOADOUT_FIELD_COUNT: usize = 10;
pub const ORDER_FIELD_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRange {
    pub start: usize,
    pub end: usize,
}

impl FieldRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Basic,
    Stats,
    SkillsA,
    Equipment,
    SkillsB,
    Profiles,
}

impl GroupField {
    fn offset(self) -> usize {
        match self {
            GroupField::Basic => 0,
            GroupField::Stats => 1,
            GroupField::SkillsA => 2,
            GroupField::Equipment => 3,
            GroupField::SkillsB => 4,
            GroupField::Profiles => 5,
        }
    }
}

/// Where one profile group's six fields live in the top-level split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLayout {
    pub slot: usize,
    pub range: FieldRange,
}

impl GroupLayout {
    pub fn for_slot(slot: usize) -> Option<Self> {
        if slot >= GROUP_SLOTS {
            return None;
        }
        let start = FIRST_GROUP_FIELD + slot * GROUP_FIELD_COUNT;
        Some(Self {
            slot,
            range: FieldRange {
                start,
                end: start + GROUP_FIELD_COUNT,
            },
        })
    }

    pub fn all() -> impl Iterator<Item = GroupLayout> {
        (0..GROUP_SLOTS).filter_map(Self::for_slot)
    }

    pub fn index_of(&self, field: GroupField) -> usize {
        self.range.start + field.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_slots_tile_the_record_between_header_and_window() {
        let mut expected = FIRST_GROUP_FIELD;
        for group in GroupLayout::all() {
            assert_eq!(group.range.start, expected);
            assert_eq!(group.range.len(), GROUP_FIELD_COUNT);
            expected = group.range.end;
        }
        assert_eq!(expected, WINDOW_FIELD);
        assert_eq!(RECORD_FIELD_COUNT, 22);
    }

    #[test]
    fn group_field_indices() {
        let second = GroupLayout::for_slot(1).expect("slot 1");
        assert_eq!(second.index_of(GroupField::Basic), 9);
        assert_eq!(second.index_of(GroupField::Profiles), 14);
        assert!(GroupLayout::for_slot(GROUP_SLOTS).is_none());
    }
}
