//! Exercise harness for a document server.
//!
//! Runs exactly one procedure per invocation and prints its result as JSON.
//! Failures are logged and returned from `main`, so the process exits non-zero.

mod cli;
mod config;
mod observability;
mod procedures;

use clap::Parser as _;
use serde::Serialize;
use tracing::error;

use crate::cli::{Cli, Procedure};
use crate::procedures::Target;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    config::init();
    observability::init_observability();

    let cli = Cli::parse();
    let target = Target::new(cli.urls);
    if let Err(err) = run(cli.procedure, &target).await {
        error!(error = %err, "procedure failed");
        return Err(err);
    }
    Ok(())
}

async fn run(procedure: Procedure, target: &Target) -> anyhow::Result<()> {
    match procedure {
        Procedure::ListDatabases { start, page_size } => {
            let names = procedures::list_database_names(target, start, page_size).await?;
            print_json(&names)
        }
        Procedure::Stats { database } => {
            let stats = procedures::get_statistics(target, &database).await?;
            print_json(&stats)
        }
        Procedure::Topology { database } => {
            let topology = procedures::get_topology(target, &database).await?;
            print_json(&topology)
        }
        Procedure::CreateDatabase { name } => {
            let result = procedures::create_database(target, &name).await?;
            print_json(&result)
        }
        Procedure::CreateAndDelete { hard } => {
            let name = procedures::random_database_name();
            println!("name: {name}");
            let mut printed = Ok(());
            let outcome = procedures::create_and_delete_database(target, &name, hard, |created| {
                printed = print_json(created);
            })
            .await?;
            printed?;
            print_json(&outcome.deleted)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
