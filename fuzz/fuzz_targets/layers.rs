#![no_main]

use std::collections::BTreeSet;

use aopnet_analysis::{AnalysisOptions, analyze};
use aopnet_core::{BiologicalLevel, Event, FeedbackStrategy, Network, Relationship};
use libfuzzer_sys::fuzz_target;

// Byte layout: [strategy, node count, level per node..., (from, to) pairs...].
fn decode(data: &[u8]) -> Option<(FeedbackStrategy, Network)> {
    let (&strategy, rest) = data.split_first()?;
    let (&count, rest) = rest.split_first()?;
    let n = usize::from(count % 10) + 1;
    if rest.len() < n {
        return None;
    }
    let (levels, pairs) = rest.split_at(n);
    let id = |i: u8| format!("E{}", usize::from(i) % n);

    let events = levels
        .iter()
        .enumerate()
        .map(|(i, &l)| {
            let level = BiologicalLevel::ALL[usize::from(l) % BiologicalLevel::ALL.len()];
            Event::new(format!("E{i}"), level)
        })
        .collect();
    let relationships = pairs
        .chunks_exact(2)
        .take(16)
        .map(|pair| Relationship::new(id(pair[0]), id(pair[1])))
        .collect();

    let strategy = if strategy % 2 == 0 {
        FeedbackStrategy::PathLocal
    } else {
        FeedbackStrategy::EdgeColoring
    };
    Some((strategy, Network::new("fuzz", events, relationships)))
}

fuzz_target!(|data: &[u8]| {
    let Some((strategy, network)) = decode(data) else {
        return;
    };
    let analysis = analyze(&network, &AnalysisOptions::with_strategy(strategy))
        .expect("generated networks are well formed");

    let mut placed = BTreeSet::new();
    for layer in &analysis.layers {
        assert!(!layer.is_empty());
        assert!(layer.events().iter().all(|e| e.level == layer.level()));
        for id in layer.ids() {
            assert!(placed.insert(id), "{id} placed twice");
        }
    }
    assert_eq!(placed.len() + analysis.unplaced.len(), network.events.len());

    assert!(analysis.feedback.is_disjoint(&analysis.indirect));
    let distinct: BTreeSet<&Relationship> = network.relationships.iter().collect();
    assert_eq!(
        analysis.feedback.len() + analysis.indirect.len() + analysis.displayed.len(),
        distinct.len()
    );
});
