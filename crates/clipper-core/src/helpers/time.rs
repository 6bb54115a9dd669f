// crates/clipper-core/src/helpers/time.rs
//
// Time text used by the start/end entries, the ruler labels, the duration
// label and the preview time readout. One canonical format everywhere:
// `hh:mm:ss`, fractional seconds dropped on display.

use crate::error::CutError;

/// Format a position in seconds as `hh:mm:ss`.
///
/// Fractional seconds are truncated, negative input clamps to zero, and
/// hours keep growing past two digits rather than wrapping.
///
/// ```
/// use clipper_core::helpers::time::format_time;
/// assert_eq!(format_time(0.0),     "00:00:00");
/// assert_eq!(format_time(61.9),    "00:01:01");
/// assert_eq!(format_time(3725.0),  "01:02:05");
/// assert_eq!(format_time(-4.0),    "00:00:00");
/// ```
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() { seconds.max(0.0) as u64 } else { 0 };
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Parse `hh:mm:ss` or `hh:mm:ss.frac` into seconds.
///
/// Each field is one or more ASCII digits; only the seconds field may carry
/// a fractional part. Minutes and seconds are not range-checked, so
/// `00:90:00` is 5400 s and republishing normalizes it to `01:30:00`.
///
/// ```
/// use clipper_core::helpers::time::parse_time;
/// assert_eq!(parse_time("00:01:30").unwrap(), 90.0);
/// assert_eq!(parse_time("1:02:03.5").unwrap(), 3723.5);
/// assert!(parse_time("1:30").is_err());
/// ```
pub fn parse_time(text: &str) -> Result<f64, CutError> {
    let bad = || CutError::Format { input: text.to_string() };
    let trimmed = text.trim();

    let mut fields = trimmed.split(':');
    let (Some(h), Some(m), Some(s), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(bad());
    };

    let hours   = parse_digits(h).ok_or_else(bad)?;
    let minutes = parse_digits(m).ok_or_else(bad)?;

    let seconds = match s.split_once('.') {
        None => parse_digits(s).ok_or_else(bad)? as f64,
        Some((whole, frac)) => {
            if parse_digits(whole).is_none() || parse_digits(frac).is_none() {
                return Err(bad());
            }
            s.parse::<f64>().map_err(|_| bad())?
        }
    };

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Unsigned integer made only of ASCII digits (no sign, no spaces).
fn parse_digits(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_strings_round_trip() {
        for text in ["00:00:00", "00:00:59", "00:59:59", "01:00:00", "12:34:56", "99:59:59"] {
            let secs = parse_time(text).unwrap();
            assert_eq!(format_time(secs), text);
        }
    }

    #[test]
    fn fractional_seconds_are_accepted_and_dropped_on_display() {
        let secs = parse_time("00:00:05.750").unwrap();
        assert!((secs - 5.75).abs() < 1e-9);
        assert_eq!(format_time(secs), "00:00:05");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_time("  00:00:10 ").unwrap(), 10.0);
    }

    #[test]
    fn rejects_text_outside_both_grammars() {
        for text in ["", "10", "1:30", "a:b:c", "00:00:-1", "00:00:05.", "00:00:.5",
                     "00:00:05.5.5", "1:2:3:4", "+1:00:00", "00: 01:00"] {
            assert!(
                matches!(parse_time(text), Err(CutError::Format { .. })),
                "{text:?} should be a format error"
            );
        }
    }

    #[test]
    fn format_error_carries_original_text() {
        match parse_time("nope") {
            Err(CutError::Format { input }) => assert_eq!(input, "nope"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hours_grow_past_two_digits() {
        assert_eq!(format_time(100.0 * 3600.0), "100:00:00");
    }
}
