use roster_core::fields::DecodeErrorKind;
use roster_core::profile::Attachment;
use roster_core::stat::{HitPoints, Movement, Stat};
use roster_core::unit::Unit;

const EMPTY_GROUP: &str = "@@@@@@@@@@@@@|@@@@@@@@@@@@||||";

fn basic(kind: &str, name: &str) -> String {
    format!("{kind}@Role@0@0@1@0@0@0@{name}@0@0@@@")
}

fn group(basic: &str, stats: &str, profiles: &str) -> String {
    format!("{basic}|{stats}||||{profiles}")
}

fn record(id: i32, groups: &[String]) -> String {
    let mut fields = vec![id.to_string(), format!("UNIT{id}"), "1".to_string()];
    for slot in 0..3 {
        fields.push(
            groups
                .get(slot)
                .cloned()
                .unwrap_or_else(|| EMPTY_GROUP.to_string()),
        );
    }
    fields.push("1".to_string());
    fields.join("|")
}

const STATS: &str = "10-5@13@12@10@12@1@0@1@2@0@@@2";

#[test]
fn sparse_second_group_is_dropped() {
    // Only the type field is populated in group 2.
    let sparse = group("LI@@@@@@@@@@@@@", "@@@@@@@@@@@@", "");
    let raw = record(
        1,
        &[
            group(&basic("LI", "Main"), STATS, "11#A#R##0#10#1#-#1%0%0#0"),
            sparse,
        ],
    );
    let unit = Unit::decode(&raw).expect("unit");
    assert_eq!(unit.groups.len(), 1);
    assert_eq!(unit.groups[0].name, "Main");
    assert_eq!(unit.groups[0].slot, 0);
}

#[test]
fn third_group_keeps_its_slot() {
    let raw = record(
        2,
        &[
            group(&basic("LI", "One"), STATS, ""),
            EMPTY_GROUP.to_string(),
            group(&basic("REM", "Three"), STATS, ""),
        ],
    );
    let unit = Unit::decode(&raw).expect("unit");
    let slots: Vec<usize> = unit.groups.iter().map(|g| g.slot).collect();
    assert_eq!(slots, vec![0, 2]);
}

#[test]
fn duo_bond_spans_two_groups() {
    let raw = record(
        3,
        &[
            group(
                &basic("HI", "Lead"),
                STATS,
                "31#Lead#Rifle##0#30#1#-#1%0%0#0@32#Lead Duo#Rifle##0#45#2#-#1%0%0#1",
            ),
            group(&basic("REM", "Drone"), STATS, "41#Drone#Flash Pulse##0#12#1#31#0%0%0#0"),
        ],
    );
    let unit = Unit::decode(&raw).expect("unit");
    let bond = unit.duo.as_ref().expect("duo bond");

    assert_eq!(bond.id(), Stat::Value(32));
    assert_eq!(bond.members.len(), 2);
    assert_eq!(bond.members, vec![Stat::Value(31), Stat::Value(41)]);
    assert_eq!(bond.loadout.attachment, Attachment::Selectable);
    for id in [31, 41] {
        assert_eq!(unit.loadout(id).and_then(|l| l.duo), Some(Stat::Value(32)));
    }
    assert!(unit.loadout(32).is_none());
}

#[test]
fn attached_loadout_made_selectable_when_promoted() {
    let raw = record(
        4,
        &[
            group(&basic("HI", "Lead"), STATS, "51#Lead#Rifle##0#30#1#-#1%0%0#0"),
            group(&basic("REM", "Drone"), STATS, "52#Pair#R##0#20#1#51#1%0%0#1"),
        ],
    );
    let unit = Unit::decode(&raw).expect("unit");
    let bond = unit.duo.as_ref().expect("duo bond");
    assert!(bond.loadout.is_selectable());
    // The drone group only held the duo loadout, so it contributes no member.
    assert_eq!(bond.members, vec![Stat::Value(51)]);
}

#[test]
fn unlinked_decode_keeps_duo_pending() {
    let raw = record(
        5,
        &[group(
            &basic("HI", "Lead"),
            STATS,
            "61#Lead#Rifle##0#30#1#-#1%0%0#0@62#Duo#Rifle##0#45#2#-#1%0%0#1",
        )],
    );
    let unit = Unit::decode_unlinked(&raw).expect("unit");
    assert!(unit.duo.is_none());
    assert!(unit.groups[0].has_pending_duo());
    assert_eq!(unit.loadouts().count(), 1);
}

#[test]
fn structure_and_unknown_stats() {
    let stats = "-@13@?@10@12@8@6@3@T@1@@@7";
    let raw = record(6, &[group(&basic("TAG", "Walker"), stats, "")]);
    let unit = Unit::decode(&raw).expect("unit");
    let block = &unit.groups[0].stats;

    assert_eq!(block.movement, Movement::new(0.0, 0.0));
    assert_eq!(block.hit_points, HitPoints::Structure(3));
    assert_eq!(block.ballistic_skill, Stat::Unknown);
    assert_eq!(block.availability, Stat::Unknown);
    assert_eq!(block.silhouette, Stat::Value(7));
}

#[test]
fn malformed_loadout_fails_whole_record() {
    let raw = record(
        7,
        &[group(&basic("LI", "Main"), STATS, "71#Only#Three")],
    );
    let err = Unit::decode(&raw).expect_err("short loadout");
    assert_eq!(err.kind, DecodeErrorKind::MissingField);
    assert!(err.message.contains("loadout"));
}

#[test]
fn malformed_stat_block_fails_whole_record() {
    let raw = record(8, &[group(&basic("LI", "Main"), "10-5@13@12", "")]);
    let err = Unit::decode(&raw).expect_err("short stats");
    assert!(err.message.contains("stat block"));
}

#[test]
fn non_numeric_unit_id_is_unknown() {
    let raw = record(9, &[group(&basic("LI", "Main"), STATS, "")]).replacen('9', "x", 1);
    let unit = Unit::decode(&raw).expect("unit");
    assert_eq!(unit.id, Stat::Unknown);
    assert_eq!(unit.groups.len(), 1);
}

#[test]
fn empty_loadout_id_is_unknown() {
    let raw = record(
        9,
        &[group(&basic("LI", "Main"), STATS, "#Blank#Rifle##0#10#1#-#1%0%0#0")],
    );
    let unit = Unit::decode(&raw).expect("unit");
    let loadout = unit.loadouts().next().expect("loadout");
    assert_eq!(loadout.id, Stat::Unknown);
    assert_eq!(loadout.name, "Blank");
}

#[test]
fn decoding_is_repeatable() {
    let raw = record(
        10,
        &[
            group(
                &basic("HI", "Lead"),
                STATS,
                "81#Lead#Rifle##0#30#1#-#1%0%0#0@82#Duo#Rifle##0#45#2#-#1%0%0#1",
            ),
            group(&basic("REM", "Drone"), STATS, "91#Drone#Pulse##0#12#1#81#0%0%0#0"),
        ],
    );
    let first = Unit::decode(&raw).expect("first");
    let second = Unit::decode(&raw).expect("second");
    assert_eq!(first, second);
}
