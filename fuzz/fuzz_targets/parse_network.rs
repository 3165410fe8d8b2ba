#![no_main]

use aopnet_analysis::{AnalysisOptions, analyze};
use aopnet_core::io::{NetworkFormat, parse_network};
use libfuzzer_sys::fuzz_target;

// Arbitrary JSON must either fail to parse, be rejected as malformed, or
// analyze cleanly. Never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(network) = parse_network(text, NetworkFormat::Json) else {
        return;
    };
    if network.events.len() > 64 || network.relationships.len() > 128 {
        return;
    }
    let _ = analyze(&network, &AnalysisOptions::default());
    if let Ok(json) = serde_json::to_string(&network) {
        let reparsed = parse_network(&json, NetworkFormat::Json).expect("round trip");
        assert_eq!(reparsed, network);
    }
});
