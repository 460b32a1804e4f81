//! ISO-8601 duration formatting for video lengths.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$").expect("static regex")
});

/// Convert an ISO-8601 period such as `PT4M13S` to `4:13`.
///
/// Uses `H:MM:SS` when there is at least one hour, `M:SS` otherwise. Days are
/// folded into hours. An empty or unparseable value yields an empty string.
pub fn format_duration(iso: &str) -> String {
    let Some(caps) = ISO_DURATION.captures(iso.trim()) else {
        return String::new();
    };
    // "P" or "PT" alone matches the pattern but carries no components.
    if (1..=4).all(|i| caps.get(i).is_none()) {
        return String::new();
    }

    let Some((hours, minutes, seconds)) = hours_minutes_seconds(&caps) else {
        return String::new();
    };

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// `None` when a component does not fit in a `u64` or days overflow hours.
fn hours_minutes_seconds(caps: &Captures<'_>) -> Option<(u64, u64, u64)> {
    // Absent components are zero.
    let component = |i: usize| -> Option<u64> {
        caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
    };
    let hours = component(1)?.checked_mul(24)?.checked_add(component(2)?)?;
    Some((hours, component(3)?, component(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
        assert_eq!(format_duration("PT5M9S"), "5:09");
        assert_eq!(format_duration("PT45S"), "0:45");
    }

    #[test]
    fn formats_partial_components() {
        assert_eq!(format_duration("PT2H"), "2:00:00");
        assert_eq!(format_duration("PT10M"), "10:00");
        assert_eq!(format_duration("PT1H30S"), "1:00:30");
    }

    #[test]
    fn folds_days_into_hours() {
        assert_eq!(format_duration("P1DT2H3M4S"), "26:03:04");
        assert_eq!(format_duration("P0D"), "0:00");
    }

    #[test]
    fn empty_or_garbage_is_empty() {
        assert_eq!(format_duration(""), "");
        assert_eq!(format_duration("PT"), "");
        assert_eq!(format_duration("four minutes"), "");
        assert_eq!(format_duration("PT4X"), "");
        assert_eq!(format_duration("P768614336404564651D"), "");
        assert_eq!(format_duration("PT99999999999999999999S"), "");
    }
}
