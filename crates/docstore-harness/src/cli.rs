use clap::{Parser, Subcommand};

use crate::config::DEFAULT_URL;

#[derive(Parser, Debug)]
#[command(name = "docstore-harness")]
#[command(about = "Run one exercise procedure against a document server")]
pub struct Cli {
    /// Server URL; repeat the flag or comma-separate for a cluster.
    #[arg(
        long = "url",
        env = "DOCSTORE_URLS",
        value_delimiter = ',',
        default_value = DEFAULT_URL,
        global = true
    )]
    pub urls: Vec<String>,

    #[command(subcommand)]
    pub procedure: Procedure,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Procedure {
    /// List database names on the server.
    ListDatabases {
        #[arg(long, default_value_t = 0)]
        start: u32,
        #[arg(long, default_value_t = 3)]
        page_size: u32,
    },
    /// Print statistics of a database.
    Stats {
        #[arg(long, env = "DOCSTORE_DATABASE", default_value = "PyRavenDB")]
        database: String,
    },
    /// Print the topology of a database, fetched through a session.
    Topology {
        #[arg(long, env = "DOCSTORE_DATABASE", default_value = "PyRavenDB")]
        database: String,
    },
    /// Create a database.
    CreateDatabase {
        #[arg(long, default_value = "TestDb")]
        name: String,
    },
    /// Create a database with a random name, then delete it.
    CreateAndDelete {
        /// Remove data files too instead of a soft delete.
        #[arg(long)]
        hard: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_databases_defaults() {
        let cli = Cli::try_parse_from(["docstore-harness", "list-databases"]).expect("parse");
        assert_eq!(
            cli.procedure,
            Procedure::ListDatabases {
                start: 0,
                page_size: 3
            }
        );
        assert!(!cli.urls.is_empty());
    }

    #[test]
    fn urls_accept_repeats_and_commas() {
        let cli = Cli::try_parse_from([
            "docstore-harness",
            "--url",
            "http://a:8080,http://b:8080",
            "--url",
            "http://c:8080",
            "create-and-delete",
        ])
        .expect("parse");
        assert_eq!(cli.urls, ["http://a:8080", "http://b:8080", "http://c:8080"]);
        assert_eq!(cli.procedure, Procedure::CreateAndDelete { hard: false });
    }

    #[test]
    fn stats_takes_database_flag() {
        let cli = Cli::try_parse_from(["docstore-harness", "stats", "--database", "not-exists"])
            .expect("parse");
        assert_eq!(
            cli.procedure,
            Procedure::Stats {
                database: "not-exists".into()
            }
        );
    }

    #[test]
    fn a_procedure_is_required() {
        assert!(Cli::try_parse_from(["docstore-harness"]).is_err());
    }
}
