//! Property tests for preamble injection.

use proptest::prelude::*;

use compart::config::PreambleConfig;
use compart::domain::services::preamble::{inject, render, Injection, PreambleSpec};
use compart::CompartmentKey;

fn c_line() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _(){};#<>\"*=/]{0,50}").unwrap()
}

fn spec() -> impl Strategy<Value = PreambleSpec> {
    (1u32..15, 1usize..15, any::<bool>()).prop_map(|(key, total, is_binary)| PreambleSpec {
        key: CompartmentKey::new(key),
        total_compartments: total,
        is_binary,
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: injecting twice changes nothing the second time.
    #[test]
    fn property_injection_is_idempotent(
        lines in proptest::collection::vec(c_line(), 0..=20),
        spec in spec(),
    ) {
        let config = PreambleConfig::default();
        let text = lines.join("\n");
        let preamble = render(&spec, &config);

        let once = inject(&text, &preamble, &config);
        let once = once.new_content().map(str::to_string).unwrap_or(text.clone());

        prop_assert_eq!(inject(&once, &preamble, &config), Injection::Unchanged);
    }

    /// PROPERTY: a preamble for another key replaces the old one instead of
    /// stacking, and the original source survives.
    #[test]
    fn property_stale_preamble_is_replaced(
        lines in proptest::collection::vec(c_line(), 1..=20),
        old in spec(),
        new in spec(),
    ) {
        let config = PreambleConfig::default();
        let stale = render(&old, &config);
        let fresh = render(&new, &config);
        // The count only shows up in binary preambles
        prop_assume!(stale != fresh);
        let text = lines.join("\n");

        let first = inject(&text, &stale, &config);
        let stamped = first.new_content().unwrap().to_string();
        let second = inject(&stamped, &fresh, &config);

        let Injection::Replaced(result) = second else {
            return Err(TestCaseError::fail(format!("expected replacement, got {:?}", second)));
        };
        prop_assert_eq!(result.matches("compart:preamble v1").count(), 1);
        prop_assert!(result.starts_with(&fresh));
        prop_assert!(result.ends_with(&text));
    }
}
