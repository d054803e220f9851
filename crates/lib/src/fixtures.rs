//! Static caregiver reference data for the clock-in manager screen.
//!
//! Fixture rows; nothing here is created or destroyed at runtime. Only rows
//! with an id can be texted through the gateway.

use serde::Serialize;

/// One row of the clock-in roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Caregiver {
    /// Stable id for textable caregivers; `None` for display-only rows.
    pub id: Option<&'static str>,
    pub name: &'static str,
    pub phone: &'static str,
    pub shift_time: &'static str,
    pub status: &'static str,
    pub coordinator: &'static str,
    pub texted: &'static str,
    pub called: &'static str,
    pub needs_review: &'static str,
}

const ROSTER: [Caregiver; 5] = [
    Caregiver {
        id: Some("grace"),
        name: "Grace Anderson",
        phone: "+1 (212) 345-6789",
        shift_time: "8:00 AM",
        status: "Compliant",
        coordinator: "Matt",
        texted: "7:50 AM",
        called: "8:05 AM",
        needs_review: "Yes",
    },
    Caregiver {
        id: Some("liam"),
        name: "Liam Johnson",
        phone: "+1 (312) 232-7554",
        shift_time: "9:00 AM",
        status: "Wrong location",
        coordinator: "Sara",
        texted: "8:50 AM",
        called: "9:05 AM",
        needs_review: "Yes",
    },
    Caregiver {
        id: None,
        name: "Ava Martinez",
        phone: "—",
        shift_time: "9:00 AM",
        status: "Compliant",
        coordinator: "Amra",
        texted: "8:50 AM",
        called: "9:05 AM",
        needs_review: "—",
    },
    Caregiver {
        id: None,
        name: "Noah Brown",
        phone: "—",
        shift_time: "9:00 AM",
        status: "Compliant",
        coordinator: "Coral",
        texted: "8:50 AM",
        called: "N/A",
        needs_review: "—",
    },
    Caregiver {
        id: None,
        name: "Sophia Davis",
        phone: "+1 (646) 987-6543",
        shift_time: "9:30 AM",
        status: "Compliant",
        coordinator: "Helen",
        texted: "Not yet sent",
        called: "N/A",
        needs_review: "—",
    },
];

/// The full clock-in roster, in display order.
pub fn roster() -> &'static [Caregiver] {
    &ROSTER
}

/// Look up a textable caregiver by id.
pub fn caregiver(id: &str) -> Option<&'static Caregiver> {
    ROSTER.iter().find(|c| c.id == Some(id))
}

/// Ids of the caregivers that can be texted.
pub fn textable_ids() -> Vec<&'static str> {
    ROSTER.iter().filter_map(|c| c.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textable_caregivers_resolve_by_id() {
        let liam = caregiver("liam").expect("liam fixture");
        assert_eq!(liam.name, "Liam Johnson");
        assert_eq!(liam.shift_time, "9:00 AM");
        let grace = caregiver("grace").expect("grace fixture");
        assert_eq!(grace.shift_time, "8:00 AM");
    }

    #[test]
    fn display_only_rows_have_no_id() {
        assert!(caregiver("ava").is_none());
        assert_eq!(textable_ids(), vec!["grace", "liam"]);
        assert_eq!(roster().len(), 5);
    }
}
