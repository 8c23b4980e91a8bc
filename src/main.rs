//! settlement-engine CLI
//!
//! Run batch debt settlement from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a record file and write the transfers
//! settlement-engine settle debts.csv transfers.csv
//!
//! # Print the settlement summary as JSON
//! settlement-engine settle debts.csv transfers.csv --format json
//!
//! # Inspect the independent settlement groups
//! settlement-engine components debts.csv
//!
//! # Generate a random debt network for testing
//! settlement-engine generate --participants 10 --debts 30
//! ```

use settlement_engine::core::balance::BalanceSheet;
use settlement_engine::core::record::{Amount, DebtRecord};
use settlement_engine::format::rows;
use settlement_engine::graph::adjacency::DebtGraph;
use settlement_engine::graph::components::find_components;
use settlement_engine::settlement::netting::NettingEngine;
use settlement_engine::simulation::generate::{generate_random_network, NetworkConfig};
use std::fs::File;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settlement-engine — settle group debts with a minimal set of transfers

USAGE:
    settlement-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Net a debt record file into a transfer file
    components  Show the independent settlement groups in a record file
    generate    Generate a random debt network (for testing)
    help        Show this message

ARGUMENTS (settle):
    <INPUT>             Path to the debt records (creditor,debtor,amount rows)
    <OUTPUT>            Path to write the transfers (payer,receiver,amount rows)

OPTIONS (settle):
    --format <FORMAT>   Summary format on stdout: text (default) or json

ARGUMENTS (components):
    <INPUT>             Path to the debt records

OPTIONS (generate):
    --participants <N>  Number of participants (default: 10)
    --debts <N>         Number of debt records (default: 30)
    --clusters <N>      Number of disjoint clusters (default: 1)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    settlement-engine settle debts.csv transfers.csv
    settlement-engine settle debts.csv transfers.csv --format json
    settlement-engine components debts.csv
    settlement-engine generate --participants 20 --debts 60 --output test.csv"#
    );
}

/// JSON output schema for settlement results.
#[derive(serde::Serialize)]
struct SettlementOutput {
    gross_total: Amount,
    net_total: Amount,
    savings: Amount,
    savings_percent: f64,
    component_count: usize,
    transfer_count: usize,
    transfers: Vec<TransferOutput>,
}

#[derive(serde::Serialize)]
struct TransferOutput {
    payer: String,
    receiver: String,
    amount: Amount,
}

fn load_records(path: &str) -> Vec<DebtRecord> {
    let file = File::open(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    rows::read_records(file).unwrap_or_else(|e| {
        eprintln!("Error parsing records from '{}': {}", path, e);
        eprintln!("Expected headerless rows: creditor,debtor,amount");
        process::exit(1);
    })
}

fn cmd_settle(args: &[String]) {
    let mut positional = Vec::new();
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            other if other.starts_with("--") => {
                eprintln!("Unknown option: {}", other);
                process::exit(1);
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let input_path = positional.first().cloned().unwrap_or_else(|| {
        eprintln!("No source path given.");
        process::exit(1);
    });
    let output_path = positional.get(1).cloned().unwrap_or_else(|| {
        eprintln!("No destination path given.");
        process::exit(1);
    });

    let records = load_records(&input_path);
    let result = NettingEngine::settle_records(&records).unwrap_or_else(|e| {
        eprintln!("Settlement failed: {}", e);
        process::exit(1);
    });

    let output_file = File::create(&output_path).unwrap_or_else(|e| {
        eprintln!("Error occurred while saving data to '{}': {}", output_path, e);
        process::exit(1);
    });
    rows::write_transfers(output_file, result.transfers()).unwrap_or_else(|e| {
        eprintln!("Error occurred while saving data to '{}': {}", output_path, e);
        process::exit(1);
    });

    if format == "json" {
        let output = SettlementOutput {
            gross_total: result.gross_total(),
            net_total: result.net_total(),
            savings: result.savings(),
            savings_percent: result.savings_percent(),
            component_count: result.component_count(),
            transfer_count: result.transfer_count(),
            transfers: result
                .transfers()
                .iter()
                .map(|t| TransferOutput {
                    payer: t.payer.to_string(),
                    receiver: t.receiver.to_string(),
                    amount: t.amount,
                })
                .collect(),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing summary: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", result);
        println!("Wrote {} transfers to {}", result.transfer_count(), output_path);
    }
}

fn cmd_components(args: &[String]) {
    let input_path = args.first().cloned().unwrap_or_else(|| {
        eprintln!("No source path given.");
        process::exit(1);
    });

    let records = load_records(&input_path);
    let graph = DebtGraph::from_records(&records);
    let components = find_components(&graph);
    let balances = BalanceSheet::from_records(&records);

    println!("Settlement groups: {}", components.len());
    for (i, component) in components.iter().enumerate() {
        let volume: Amount = records
            .iter()
            .filter(|r| component.contains(r.creditor()))
            .map(|r| r.amount())
            .sum();
        println!("\nGroup {} ({} members, gross volume {}):", i, component.len(), volume);
        for member in component.members() {
            println!("  {:<20} net {:+}", member.as_str(), balances.position(member));
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut participants = 10usize;
    let mut debts = 30usize;
    let mut clusters = 1usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                participants = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--participants requires a number");
                    process::exit(1);
                });
            }
            "--debts" => {
                i += 1;
                debts = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--debts requires a number");
                    process::exit(1);
                });
            }
            "--clusters" => {
                i += 1;
                clusters = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--clusters requires a number");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = NetworkConfig {
        participant_count: participants,
        cluster_count: clusters,
        avg_debts_per_participant: debts / participants.max(1),
        ..Default::default()
    };

    let set = generate_random_network(&config);

    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        for record in set.records() {
            writer
                .write_record([
                    record.creditor().as_str(),
                    record.debtor().as_str(),
                    &record.amount().to_string(),
                ])
                .unwrap_or_else(|e| {
                    eprintln!("Error writing record: {}", e);
                    process::exit(1);
                });
        }
        writer.flush().unwrap_or_else(|e| {
            eprintln!("Error writing record: {}", e);
            process::exit(1);
        });
    }
    let csv_text = String::from_utf8_lossy(&buf).into_owned();

    if let Some(path) = output_path {
        std::fs::write(&path, &csv_text).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} debts across {} participants → {}",
            set.len(),
            participants,
            path
        );
    } else {
        print!("{}", csv_text);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "components" => cmd_components(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
