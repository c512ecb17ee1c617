use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use pretty_assertions::assert_eq;

use guidance_core::clock::{Clock, FixedClock, SystemClock, DEFAULT_UTC_OFFSET_HOURS};
use guidance_core::errors::GuidanceError;

#[test]
fn test_fixed_clock_converts_to_civil_time() {
    // 20:30 UTC on June 9 is 04:30 on June 10 at UTC+8
    let clock = FixedClock::utc8(Utc.with_ymd_and_hms(2025, 6, 9, 20, 30, 0).unwrap());

    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
    assert_eq!(
        clock.now_local().time(),
        NaiveTime::from_hms_opt(4, 30, 0).unwrap()
    );
}

#[test]
fn test_fixed_clock_with_explicit_offset() {
    let clock = FixedClock::new(
        Utc.with_ymd_and_hms(2025, 6, 9, 20, 30, 0).unwrap(),
        FixedOffset::east_opt(0).unwrap(),
    );

    assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 9).unwrap());
}

#[test]
fn test_system_clock_offset() {
    let clock = SystemClock::new(DEFAULT_UTC_OFFSET_HOURS).unwrap();
    assert_eq!(clock.offset(), FixedOffset::east_opt(8 * 3600).unwrap());

    let default_clock = SystemClock::default();
    assert_eq!(default_clock.offset(), clock.offset());
}

#[test]
fn test_system_clock_accepts_western_offsets() {
    let clock = SystemClock::new(-5).unwrap();
    assert_eq!(clock.offset(), FixedOffset::east_opt(-5 * 3600).unwrap());
}

#[test]
fn test_system_clock_rejects_out_of_range_offsets() {
    for hours in [24, -24, 99] {
        let err = SystemClock::new(hours).unwrap_err();
        assert!(matches!(err, GuidanceError::InvalidInput(_)));
    }
}
