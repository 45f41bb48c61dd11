//! String formatting for clock readouts and split deltas
//!
//! All inputs are whole milliseconds.

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Format an elapsed time as `mm:ss.mmm`, or `hh:mm:ss.mmm` from one hour up
///
/// Negative inputs are clamped to zero; a running clock never goes backwards.
pub fn format_time(milliseconds: i64) -> String {
    let ms = milliseconds.max(0);
    let clock = format!(
        "{:02}:{:02}.{:03}",
        ms / MS_PER_MINUTE % 60,
        ms / MS_PER_SECOND % 60,
        ms % MS_PER_SECOND
    );

    if ms >= MS_PER_HOUR {
        format!("{:02}:{}", ms / MS_PER_HOUR, clock)
    } else {
        clock
    }
}

/// Format a signed difference against a reference time
///
/// The sign is always explicit: `+` behind, `-` ahead, `=` for an exact tie.
/// The leading unit is unpadded and chosen by magnitude: `s.mmm`, `m:ss.mmm`
/// or `h:mm:ss.mmm`.
pub fn format_delta(milliseconds: i64) -> String {
    let sign = match milliseconds.signum() {
        1 => '+',
        -1 => '-',
        _ => '=',
    };
    let ms = milliseconds.unsigned_abs();
    let (hour, minute, second) = (MS_PER_HOUR as u64, MS_PER_MINUTE as u64, MS_PER_SECOND as u64);

    let whole = if ms >= hour {
        format!(
            "{}:{:02}:{:02}",
            ms / hour,
            ms / minute % 60,
            ms / second % 60
        )
    } else if ms >= minute {
        format!("{}:{:02}", ms / minute, ms / second % 60)
    } else {
        format!("{}", ms / second)
    };

    format!("{}{}.{:03}", sign, whole, ms % second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_under_an_hour_has_no_hour_field() {
        assert_eq!(format_time(200_000), "03:20.000");
        assert_eq!(format_time(0), "00:00.000");
        assert_eq!(format_time(3_599_999), "59:59.999");
    }

    #[test]
    fn test_time_from_an_hour_shows_hours() {
        assert_eq!(format_time(4_000_000), "01:06:40.000");
        assert_eq!(format_time(3_600_000), "01:00:00.000");
        assert_eq!(format_time(36_000_000 + 61_005), "10:01:01.005");
    }

    #[test]
    fn test_time_clamps_negative() {
        assert_eq!(format_time(-5), "00:00.000");
    }

    #[test]
    fn test_delta_seconds() {
        assert_eq!(format_delta(-100), "-0.100");
        assert_eq!(format_delta(1_500), "+1.500");
        assert_eq!(format_delta(59_999), "+59.999");
    }

    #[test]
    fn test_delta_minutes() {
        assert_eq!(format_delta(-100_000), "-1:40.000");
        assert_eq!(format_delta(100_000), "+1:40.000");
        assert_eq!(format_delta(60_000), "+1:00.000");
    }

    #[test]
    fn test_delta_hours() {
        assert_eq!(format_delta(-4_000_000), "-1:06:40.000");
        assert_eq!(format_delta(3_600_001), "+1:00:00.001");
    }

    #[test]
    fn test_delta_tie() {
        assert_eq!(format_delta(0), "=0.000");
    }

    #[test]
    fn test_delta_sub_second_keeps_sign() {
        assert_eq!(format_delta(-1), "-0.001");
        assert_eq!(format_delta(1), "+0.001");
    }
}
