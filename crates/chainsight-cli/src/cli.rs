use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chainsight")]
#[command(about = "Chainsight - supply chain strategy dashboard data service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Warehouse connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the dashboard datasets for a scenario
    Dashboard {
        /// Strategy mode (GROWTH, MARGIN, CASH)
        strategy: String,

        /// Shock event (NONE, SUPPLY_DISRUPTION, PORT_STRIKE, DEMAND_SURGE)
        #[arg(default_value = "NONE")]
        shock: String,

        /// Also fetch the unshocked baseline for comparison
        #[arg(long)]
        baseline: bool,
    },

    /// Load the unshocked baseline rows for a strategy
    Baseline {
        /// Strategy mode (GROWTH, MARGIN, CASH)
        strategy: String,
    },

    /// List the named analysis queries
    Queries,

    /// Run one analysis query by name
    Query {
        /// Registry name, e.g. triangle_metrics
        name: String,
    },

    /// Ask the narrative analyst a question
    Ask {
        question: String,

        /// Ground the answer in QBR documents instead of the semantic model
        #[arg(long)]
        documents: bool,
    },

    /// Start API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Initialize warehouse schema
    InitDb,
}
