//! Fuzz target for record and calendar date parsing.
//!
//! Run with: cargo +nightly fuzz run date_fuzz -- -max_total_time=60

#![no_main]

use formdesk_core::{parse_calendar_date, parse_record_date, DateRange};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let calendar = parse_calendar_date(input);
        let record = parse_record_date(input);

        // A calendar date always bounds itself.
        if let Some(day) = calendar {
            let range = DateRange::new(Some(day), Some(day));
            assert!(range.is_active());
            assert!(range.lower_bound() <= range.upper_bound());
        }

        // An empty range admits everything, parseable or not.
        assert!(DateRange::default().contains(Some(input)));
        if let Some(value) = record {
            assert!(DateRange::default().contains_datetime(value));
        }
    }
});
