//! Independent settlement groups example.
//!
//! Two sets of participants with no shared debts settle completely
//! independently; no transfer ever crosses between the groups.

use settlement_engine::core::participant::ParticipantId;
use settlement_engine::core::record::DebtRecord;
use settlement_engine::graph::adjacency::DebtGraph;
use settlement_engine::graph::components::find_components;
use settlement_engine::settlement::netting::NettingEngine;

fn record(creditor: &str, debtor: &str, amount: i64) -> DebtRecord {
    DebtRecord::new(
        ParticipantId::new(creditor),
        ParticipantId::new(debtor),
        amount,
    )
    .expect("demo records are valid")
}

fn main() {
    println!("=== settlement-engine: Independent Groups Example ===\n");

    let records = vec![
        // Flat-share group
        record("Ola", "Bartek", 120),
        record("Bartek", "Celina", 80),
        record("Celina", "Ola", 40),
        // Unrelated road-trip group
        record("Ula", "Witek", 55),
        record("Witek", "Ula", 15),
    ];

    let graph = DebtGraph::from_records(&records);
    let components = find_components(&graph);
    println!("Settlement groups found: {}", components.len());
    for (i, component) in components.iter().enumerate() {
        let members: Vec<&str> = component.members().iter().map(|m| m.as_str()).collect();
        println!("  Group {}: {}", i, members.join(", "));
    }

    let result = NettingEngine::settle_records(&records).expect("demo records conserve value");
    println!();
    println!("{}", result);
}
