//! Human-readable hours-of-operation rendering.

use storesweep_core::MISSING;

use crate::types::{DayHours, OperationalHours};

/// Renders operational hours as one display string.
///
/// `open24Hours` short-circuits everything to `"24/7"`. Otherwise days
/// render Monday through Sunday, `"; "`-joined:
///
/// - day absent from the payload → `"<Day>: <MISSING>"`
/// - closed → `"<Day>: Closed"`
/// - open the full day → `"<Day>: 24Hours"`
/// - otherwise → `"<Day>: {startHr}-{endHr}"`
///
/// A temporary-hours blob, when present, appends a final
/// `"Temporary hours: ..."` segment.
#[must_use]
pub fn human_hours(hours: &OperationalHours) -> String {
    if hours.open24_hours {
        return "24/7".to_string();
    }

    let days: [(&str, &Option<DayHours>); 7] = [
        ("Monday", &hours.monday),
        ("Tuesday", &hours.tuesday),
        ("Wednesday", &hours.wednesday),
        ("Thursday", &hours.thursday),
        ("Friday", &hours.friday),
        ("Saturday", &hours.saturday),
        ("Sunday", &hours.sunday),
    ];

    let mut parts: Vec<String> = days
        .iter()
        .map(|(label, day)| match day {
            None => format!("{label}: {MISSING}"),
            Some(d) if d.closed => format!("{label}: Closed"),
            Some(d) if d.open_full_day => format!("{label}: 24Hours"),
            Some(d) => format!(
                "{label}: {}-{}",
                d.start_hr.as_deref().unwrap_or(MISSING),
                d.end_hr.as_deref().unwrap_or(MISSING),
            ),
        })
        .collect();

    if let Some(temporary) = &hours.temporary_hours {
        parts.push(format!("Temporary hours: {temporary}"));
    }

    parts.join("; ")
}
