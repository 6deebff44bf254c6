use std::fmt::Write as _;

use roster_core::core_api::{Session, Summary};
use roster_core::duo::DuoBond;
use roster_core::profile::{Attachment, Loadout, ProfileGroup, StatBlock};
use roster_core::roster::{Faction, Incident, SectorialForce};
use roster_core::stat::{HitPoints, Stat};
use roster_core::unit::Unit;
use serde_json::{Map as JsonMap, Value as JsonValue};

const UNIT_NAME_WIDTH: usize = 28;
const LOADOUT_NAME_WIDTH: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    pub verbose: bool,
}

pub fn render_json_full(session: &Session) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "language".to_string(),
        JsonValue::String(session.language().code().to_string()),
    );
    out.insert("summary".to_string(), summary_to_json(session.summary()));
    out.insert(
        "factions".to_string(),
        JsonValue::Array(session.factions().iter().map(render_json_faction).collect()),
    );
    out.insert(
        "incidents".to_string(),
        JsonValue::Array(session.incidents().iter().map(incident_to_json).collect()),
    );
    JsonValue::Object(out)
}

pub fn render_json_unit(unit: &Unit) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("id".to_string(), stat_to_json(unit.id));
    m.insert("ics_name".to_string(), JsonValue::String(unit.ics_name.clone()));
    m.insert("name".to_string(), JsonValue::String(unit.name().to_string()));
    m.insert("unit_count".to_string(), stat_to_json(unit.unit_count));
    m.insert("window".to_string(), JsonValue::String(unit.window.clone()));
    m.insert(
        "groups".to_string(),
        JsonValue::Array(unit.groups.iter().map(group_to_json).collect()),
    );
    m.insert(
        "duo".to_string(),
        unit.duo.as_ref().map_or(JsonValue::Null, duo_to_json),
    );
    JsonValue::Object(m)
}

fn summary_to_json(summary: &Summary) -> JsonValue {
    let mut incidents = JsonMap::new();
    incidents.insert(
        "malformed_records".to_string(),
        JsonValue::from(summary.incidents.malformed_records),
    );
    incidents.insert(
        "name_mismatches".to_string(),
        JsonValue::from(summary.incidents.name_mismatches),
    );

    let mut m = JsonMap::new();
    m.insert("factions".to_string(), JsonValue::from(summary.factions));
    m.insert("sectors".to_string(), JsonValue::from(summary.sectors));
    m.insert("units".to_string(), JsonValue::from(summary.units));
    m.insert("loadouts".to_string(), JsonValue::from(summary.loadouts));
    m.insert("duo_bonds".to_string(), JsonValue::from(summary.duo_bonds));
    m.insert("incidents".to_string(), JsonValue::Object(incidents));
    JsonValue::Object(m)
}

pub fn render_json_faction(faction: &Faction) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("id".to_string(), JsonValue::from(faction.id));
    m.insert("name".to_string(), JsonValue::String(faction.name.clone()));
    m.insert(
        "sectors".to_string(),
        JsonValue::Array(faction.sectors.iter().map(sector_to_json).collect()),
    );
    JsonValue::Object(m)
}

fn sector_to_json(sector: &SectorialForce) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "coordinate".to_string(),
        JsonValue::from(sector.coordinate.code()),
    );
    m.insert("sector".to_string(), JsonValue::from(sector.coordinate.sector));
    m.insert("name".to_string(), JsonValue::String(sector.name.clone()));
    m.insert(
        "units".to_string(),
        JsonValue::Array(sector.units.iter().map(render_json_unit).collect()),
    );
    JsonValue::Object(m)
}

fn group_to_json(group: &ProfileGroup) -> JsonValue {
    let mut orders = JsonMap::new();
    orders.insert("regular".to_string(), JsonValue::Bool(group.orders.regular));
    orders.insert(
        "irregular".to_string(),
        JsonValue::Bool(group.orders.irregular),
    );
    orders.insert(
        "impetuous".to_string(),
        JsonValue::Bool(group.orders.impetuous),
    );
    orders.insert(
        "extremely_impetuous".to_string(),
        JsonValue::Bool(group.orders.extremely_impetuous),
    );

    let mut flags = JsonMap::new();
    flags.insert("cube".to_string(), JsonValue::Bool(group.flags.cube));
    flags.insert(
        "cube_variant".to_string(),
        JsonValue::Bool(group.flags.cube_variant),
    );
    flags.insert("frenzied".to_string(), JsonValue::Bool(group.flags.frenzied));
    flags.insert("hackable".to_string(), JsonValue::Bool(group.flags.hackable));

    let mut m = JsonMap::new();
    m.insert("slot".to_string(), JsonValue::from(group.slot));
    m.insert("name".to_string(), JsonValue::String(group.name.clone()));
    m.insert(
        "troop_type".to_string(),
        JsonValue::String(group.troop_type.clone()),
    );
    m.insert("role".to_string(), JsonValue::String(group.role.clone()));
    m.insert("stats".to_string(), stats_to_json(&group.stats));
    m.insert("orders".to_string(), JsonValue::Object(orders));
    m.insert("flags".to_string(), JsonValue::Object(flags));
    m.insert("notes".to_string(), strings_to_json(&group.notes));
    m.insert("skills".to_string(), strings_to_json(&group.skills));
    m.insert("equipment".to_string(), strings_to_json(&group.equipment));
    m.insert(
        "loadouts".to_string(),
        JsonValue::Array(group.loadouts.iter().map(loadout_to_json).collect()),
    );
    JsonValue::Object(m)
}

fn stats_to_json(stats: &StatBlock) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "movement".to_string(),
        JsonValue::Array(vec![
            JsonValue::from(stats.movement.first),
            JsonValue::from(stats.movement.second),
        ]),
    );
    m.insert("cc".to_string(), stat_to_json(stats.close_combat));
    m.insert("bs".to_string(), stat_to_json(stats.ballistic_skill));
    m.insert("ph".to_string(), stat_to_json(stats.physical));
    m.insert("wip".to_string(), stat_to_json(stats.willpower));
    m.insert("arm".to_string(), stat_to_json(stats.armor));
    m.insert("bts".to_string(), stat_to_json(stats.bts));
    m.insert("hit_points".to_string(), hit_points_to_json(stats.hit_points));
    m.insert("ava".to_string(), stat_to_json(stats.availability));
    m.insert("silhouette".to_string(), stat_to_json(stats.silhouette));
    JsonValue::Object(m)
}

fn loadout_to_json(loadout: &Loadout) -> JsonValue {
    let mut orders = JsonMap::new();
    orders.insert("regular".to_string(), stat_to_json(loadout.orders.regular));
    orders.insert(
        "irregular".to_string(),
        stat_to_json(loadout.orders.irregular),
    );
    orders.insert(
        "impetuous".to_string(),
        stat_to_json(loadout.orders.impetuous),
    );

    let mut m = JsonMap::new();
    m.insert("id".to_string(), stat_to_json(loadout.id));
    m.insert("name".to_string(), JsonValue::String(loadout.name.clone()));
    m.insert(
        "weapons".to_string(),
        JsonValue::String(loadout.weapons.clone()),
    );
    m.insert(
        "melee_weapons".to_string(),
        JsonValue::String(loadout.melee_weapons.clone()),
    );
    m.insert(
        "swc".to_string(),
        match loadout.swc.value {
            Some(v) => JsonValue::from(f64::from(v)),
            None => JsonValue::Null,
        },
    );
    m.insert("swc_extra".to_string(), JsonValue::Bool(loadout.swc.extra));
    m.insert("points".to_string(), stat_to_json(loadout.points));
    m.insert("squad_size".to_string(), stat_to_json(loadout.squad_size));
    m.insert("orders".to_string(), JsonValue::Object(orders));
    m.insert(
        "attached_to".to_string(),
        match loadout.attachment {
            Attachment::Selectable => JsonValue::Null,
            Attachment::AttachedTo(id) => JsonValue::from(id),
        },
    );
    m.insert(
        "duo".to_string(),
        loadout.duo.map_or(JsonValue::Null, stat_to_json),
    );
    JsonValue::Object(m)
}

fn duo_to_json(bond: &DuoBond) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("id".to_string(), stat_to_json(bond.id()));
    m.insert("loadout".to_string(), loadout_to_json(&bond.loadout));
    m.insert(
        "members".to_string(),
        JsonValue::Array(bond.members.iter().map(|id| stat_to_json(*id)).collect()),
    );
    JsonValue::Object(m)
}

fn incident_to_json(incident: &Incident) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "kind".to_string(),
        JsonValue::String(incident.kind().to_string()),
    );
    match incident {
        Incident::MalformedRecord {
            coordinate,
            row,
            message,
        } => {
            m.insert("coordinate".to_string(), JsonValue::from(coordinate.code()));
            m.insert("row".to_string(), JsonValue::from(*row));
            m.insert("message".to_string(), JsonValue::String(message.clone()));
        }
        Incident::FactionNameExhausted { faction } => {
            m.insert("faction".to_string(), JsonValue::from(*faction));
        }
        Incident::NameExhausted { coordinate } => {
            m.insert("coordinate".to_string(), JsonValue::from(coordinate.code()));
        }
        Incident::NamesUnused { count } => {
            m.insert("count".to_string(), JsonValue::from(*count));
        }
    }
    JsonValue::Object(m)
}

fn stat_to_json(stat: Stat) -> JsonValue {
    stat.value().map_or(JsonValue::Null, JsonValue::from)
}

fn hit_points_to_json(hit_points: HitPoints) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "kind".to_string(),
        JsonValue::String(hit_points.as_str().to_string()),
    );
    m.insert(
        "value".to_string(),
        hit_points.value().map_or(JsonValue::Null, JsonValue::from),
    );
    JsonValue::Object(m)
}

fn strings_to_json(values: &[String]) -> JsonValue {
    JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect())
}

pub fn render_text(session: &Session, options: TextRenderOptions) -> String {
    render_factions_text(session.factions(), options)
}

/// Outline of the given factions only. Used for `--faction` style filtering.
pub fn render_factions_text(factions: &[Faction], options: TextRenderOptions) -> String {
    let mut out = String::new();
    if factions.is_empty() {
        writeln!(&mut out, "no factions").expect("writing to String cannot fail");
        return out;
    }
    for faction in factions {
        writeln!(
            &mut out,
            "{} [{}]",
            display_name(&faction.name),
            faction.id
        )
        .expect("writing to String cannot fail");
        for sector in &faction.sectors {
            writeln!(
                &mut out,
                "  {} [{}] ({} units)",
                display_name(&sector.name),
                sector.coordinate,
                sector.units.len()
            )
            .expect("writing to String cannot fail");
            for unit in &sector.units {
                write_unit(&mut out, unit, options, "    ");
            }
        }
    }
    out
}

pub fn render_unit_text(unit: &Unit, options: TextRenderOptions) -> String {
    let mut out = String::new();
    write_unit(&mut out, unit, options, "");
    out
}

fn write_unit(out: &mut String, unit: &Unit, options: TextRenderOptions, indent: &str) {
    let line = format!(
        "{indent}{:<w$} #{:<6} {}",
        fit_column(&unit.ics_name, UNIT_NAME_WIDTH),
        unit.id.to_string(),
        unit.name(),
        w = UNIT_NAME_WIDTH
    );
    writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
    if !options.verbose {
        return;
    }

    for group in &unit.groups {
        writeln!(
            out,
            "{indent}  [{}] {} ({})",
            group.troop_type, group.name, group.role
        )
        .expect("writing to String cannot fail");
        writeln!(out, "{indent}    {}", stat_line(&group.stats))
            .expect("writing to String cannot fail");
        if !group.skills.is_empty() {
            writeln!(out, "{indent}    Skills: {}", group.skills.join(", "))
                .expect("writing to String cannot fail");
        }
        if !group.equipment.is_empty() {
            writeln!(out, "{indent}    Equipment: {}", group.equipment.join(", "))
                .expect("writing to String cannot fail");
        }
        for note in &group.notes {
            writeln!(out, "{indent}    Note: {note}").expect("writing to String cannot fail");
        }
        for loadout in &group.loadouts {
            let duo_member = loadout.id.value().is_some_and(|id| unit.is_duo_member(id));
            write_loadout(out, loadout, indent, duo_member);
        }
    }

    if let Some(bond) = &unit.duo {
        let members: Vec<String> = bond.members.iter().map(Stat::to_string).collect();
        writeln!(out, "{indent}  Duo #{}: {}", bond.id(), members.join(" + "))
            .expect("writing to String cannot fail");
        write_loadout(out, &bond.loadout, indent, false);
    }
}

fn write_loadout(out: &mut String, loadout: &Loadout, indent: &str, duo_member: bool) {
    let swc = match loadout.swc.value {
        Some(v) if loadout.swc.extra => format!("{v}+"),
        Some(v) => format!("{v}"),
        None => "-".to_string(),
    };
    let mut line = format!(
        "{indent}    {:<6} {:<w$} SWC {:<5} {:>4} pts",
        loadout.id.to_string(),
        fit_column(&loadout.name, LOADOUT_NAME_WIDTH),
        swc,
        loadout.points.to_string(),
        w = LOADOUT_NAME_WIDTH
    );
    if let Attachment::AttachedTo(parent) = loadout.attachment {
        write!(&mut line, "  attached to {parent}").expect("writing to String cannot fail");
    }
    if duo_member {
        line.push_str("  duo");
    }
    writeln!(out, "{}", line.trim_end()).expect("writing to String cannot fail");
}

fn stat_line(stats: &StatBlock) -> String {
    format!(
        "MOV {}-{} CC {} BS {} PH {} WIP {} ARM {} BTS {} {} AVA {} S {}",
        stats.movement.first,
        stats.movement.second,
        stats.close_combat,
        stats.ballistic_skill,
        stats.physical,
        stats.willpower,
        stats.armor,
        stats.bts,
        stats.hit_points,
        stats.availability,
        stats.silhouette
    )
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "(unnamed)" } else { name }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

pub fn render_incidents_text(incidents: &[Incident]) -> String {
    let mut out = String::new();
    for incident in incidents {
        writeln!(&mut out, "{incident}").expect("writing to String cannot fail");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_column_marks_truncation() {
        assert_eq!(fit_column("Fusilier", 10), "Fusilier");
        assert_eq!(fit_column("Fusilier Hacker", 8), "Fusilie~");
    }

    #[test]
    fn unknown_stat_is_null() {
        assert_eq!(stat_to_json(Stat::Unknown), JsonValue::Null);
        assert_eq!(stat_to_json(Stat::Value(0)), JsonValue::from(0));
    }

    #[test]
    fn hit_points_carry_kind() {
        let value = hit_points_to_json(HitPoints::Structure(3));
        assert_eq!(value["kind"], "structure");
        assert_eq!(value["value"], 3);
        assert_eq!(hit_points_to_json(HitPoints::Unknown)["value"], JsonValue::Null);
    }

    #[test]
    fn faction_name_exhaustion_names_the_faction() {
        let value = incident_to_json(&Incident::FactionNameExhausted { faction: 3 });
        assert_eq!(value["kind"], "faction_name_exhausted");
        assert_eq!(value["faction"], 3);
        assert_eq!(value.get("coordinate"), None);
    }
}
