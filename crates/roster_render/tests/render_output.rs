use std::path::PathBuf;

use roster_core::core_api::{Engine, Session};
use roster_render::{
    TextRenderOptions, render_incidents_text, render_json_full, render_json_unit, render_text,
    render_unit_text,
};
use serde_json::Value;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn fixture_session() -> Session {
    let bytes = std::fs::read(workspace_root().join("tests/fixtures/feed.json"))
        .expect("fixture should be readable");
    Engine::new()
        .open_bytes(bytes, None)
        .expect("fixture should parse")
}

fn keys(value: &Value) -> Vec<&str> {
    value
        .as_object()
        .expect("json should be an object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn full_json_uses_canonical_top_level_order() {
    let session = fixture_session();
    let value = render_json_full(&session);
    assert_eq!(
        keys(&value),
        vec!["language", "summary", "factions", "incidents"]
    );
    assert_eq!(value["language"], "en");
    assert_eq!(value["summary"]["units"], 5);
    assert_eq!(value["summary"]["incidents"]["malformed_records"], 1);
}

#[test]
fn full_json_nests_factions_sectors_and_units() {
    let session = fixture_session();
    let value = render_json_full(&session);
    let factions = value["factions"].as_array().expect("factions array");
    assert_eq!(factions.len(), 2);
    assert_eq!(factions[0]["name"], "PanOceania");
    assert_eq!(factions[0]["sectors"][1]["name"], "Shock Army");
    assert_eq!(factions[0]["sectors"][1]["coordinate"], 12);
    assert_eq!(factions[1]["sectors"][0]["name"], "General");

    let units = factions[1]["sectors"][0]["units"]
        .as_array()
        .expect("units array");
    let ids: Vec<i64> = units.iter().filter_map(|u| u["id"].as_i64()).collect();
    assert_eq!(ids, vec![510, 520]);
}

#[test]
fn unit_json_uses_canonical_order_and_null_unknowns() {
    let session = fixture_session();
    let (_, unit) = session.unit(520).expect("unit 520");
    let value = render_json_unit(unit);
    assert_eq!(
        keys(&value),
        vec![
            "id",
            "ics_name",
            "name",
            "unit_count",
            "window",
            "groups",
            "duo"
        ]
    );

    let stats = &value["groups"][0]["stats"];
    assert_eq!(
        keys(stats),
        vec![
            "movement",
            "cc",
            "bs",
            "ph",
            "wip",
            "arm",
            "bts",
            "hit_points",
            "ava",
            "silhouette"
        ]
    );
    assert_eq!(stats["movement"], serde_json::json!([0.0, 0.0]));
    assert_eq!(stats["bs"], Value::Null);
    assert_eq!(stats["ava"], Value::Null);
    assert_eq!(stats["hit_points"]["kind"], "wounds");
    assert_eq!(value["duo"], Value::Null);
}

#[test]
fn unit_json_carries_duo_bond() {
    let session = fixture_session();
    let (_, unit) = session.unit(230).expect("unit 230");
    let value = render_json_unit(unit);

    assert_eq!(value["window"], "3");
    assert_eq!(value["duo"]["id"], 232);
    assert_eq!(value["duo"]["members"], serde_json::json!([231, 241]));
    assert_eq!(value["groups"][1]["stats"]["hit_points"]["kind"], "structure");
    assert_eq!(value["groups"][1]["loadouts"][0]["attached_to"], 231);
    assert_eq!(value["groups"][1]["loadouts"][0]["duo"], 232);
}

#[test]
fn text_outline_lists_every_unit() {
    let session = fixture_session();
    let text = render_text(&session, TextRenderOptions::default());

    assert!(text.contains("PanOceania [1]"));
    assert!(text.contains("  Shock Army [12] (1 units)"));
    assert!(text.contains("Yu Jing [3]"));
    for ics in ["FUSILIER", "TRINITY", "ORC", "GUIJIA", "ZHANSHI"] {
        assert!(text.contains(ics), "missing {ics} in outline");
    }
    assert!(!text.contains("MOV"));
}

#[test]
fn verbose_unit_text_lists_stats_and_loadouts() {
    let session = fixture_session();
    let (_, unit) = session.unit(230).expect("unit 230");
    let text = render_unit_text(unit, TextRenderOptions { verbose: true });

    assert!(text.starts_with("TRINITY"));
    assert!(text.contains("MOV 4-2 CC 15"));
    assert!(text.contains("STR 1"));
    assert!(text.contains("Skills: Courage, Dodge: 2"));
    assert!(text.contains("attached to 231"));
    assert!(text.contains("Duo #232: 231 + 241"));
}

#[test]
fn incidents_render_one_per_line() {
    let session = fixture_session();
    let text = render_incidents_text(session.incidents());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("coordinate=11 kind=malformed_record row=3"));
}
