//! Fuzz target for the listing search filter.
//!
//! Run with: cargo +nightly fuzz run search_fuzz -- -max_total_time=60

#![no_main]

use formdesk_core::{ListFilter, RawFields, Record, Resource};
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let records: Vec<Record> = input
            .split('\n')
            .take(16)
            .enumerate()
            .filter_map(|(i, line)| {
                Record::from_value(
                    json!({"id": i, "pr_code": line, "status": "Pending", "date": line}),
                    "id",
                )
                .ok()
            })
            .collect();

        let filter = ListFilter {
            search: input.chars().take(8).collect(),
            ..ListFilter::default()
        };
        let profile = Resource::PurchaseRequest.profile();
        let view = filter.apply(profile, &records, &RawFields);

        // The view is a subsequence of the source.
        assert!(view.len() <= records.len());
        for record in &view {
            assert!(filter.matches(profile, record, &RawFields));
        }
    }
});
