//! Basic settlement example.
//!
//! Demonstrates how the engine nets a small trip's debts into the
//! fewest transfers.

use settlement_engine::core::balance::BalanceSheet;
use settlement_engine::core::participant::ParticipantId;
use settlement_engine::core::record::DebtRecord;
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
    println!("=== settlement-engine: Basic Settlement Example ===\n");

    let records = vec![
        record("Jacek", "Dominik", 10),
        record("Dominik", "Jacek", 5),
        record("Kasia", "Dominik", 5),
        record("Michał", "Kamil", 13),
    ];

    println!("Debt records:");
    for r in &records {
        println!("  {} owes {} {}", r.debtor(), r.creditor(), r.amount());
    }

    let balances = BalanceSheet::from_records(&records);
    println!("\nNet positions:");
    for (participant, position) in balances.positions() {
        println!("  {:<10} {:+}", participant.as_str(), position);
    }

    let result = NettingEngine::settle_records(&records).expect("demo records conserve value");
    println!();
    println!("{}", result);
}
