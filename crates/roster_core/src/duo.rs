//! Second decoding pass: turns a duo-marked loadout into a bond across the
//! unit's profile groups.

use serde::{Deserialize, Serialize};

use crate::profile::{Attachment, Loadout};
use crate::stat::Stat;
use crate::unit::Unit;

/// A combined purchase. Its identity is the duo-marked loadout; `members`
/// holds one loadout id per profile group, in group order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuoBond {
    pub loadout: Loadout,
    pub members: Vec<Stat>,
}

impl DuoBond {
    pub fn id(&self) -> Stat {
        self.loadout.id
    }
}

/// Link pending duo loadouts of `unit`. Units without a marker are left as
/// they are. Returns the bond id when one was created.
pub fn link(unit: &mut Unit) -> Option<Stat> {
    let mut bond_loadout: Option<Loadout> = None;
    for group in &mut unit.groups {
        for mut candidate in std::mem::take(&mut group.duo_candidates) {
            candidate.is_duo = false;
            if bond_loadout.is_none() {
                bond_loadout = Some(candidate);
                continue;
            }
            tracing::warn!(
                target: "roster::duo",
                unit = %unit.id,
                loadout = %candidate.id,
                "duo.extra_marker_ignored"
            );
            group.loadouts.push(candidate);
        }
    }

    let mut loadout = bond_loadout?;
    loadout.attachment = Attachment::Selectable;
    let bond_id = loadout.id;

    let mut members = Vec::with_capacity(unit.groups.len());
    for group in &mut unit.groups {
        if let Some(first) = group.loadouts.first_mut() {
            first.duo = Some(bond_id);
            members.push(first.id);
        }
    }

    unit.duo = Some(DuoBond { loadout, members });
    Some(bond_id)
}
