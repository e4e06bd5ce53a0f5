use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "loadgate",
    about = "loadgate — utilization-aware scheduling policies",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every configured plugin and print configuration warnings
    Validate {
        /// Scheduler configuration file (TOML)
        #[arg(short, long, default_value = "loadgate.toml")]
        config: String,
    },
    /// Run a task against node usage snapshots.
    ///
    /// Prints the predicate verdict for every node and, for feasible nodes,
    /// the score each plugin assigned. No node is selected.
    Evaluate {
        /// Scheduler configuration file (TOML)
        #[arg(short, long, default_value = "loadgate.toml")]
        config: String,
        /// JSON array of node snapshots
        #[arg(short, long)]
        nodes: String,
        /// Task identity as namespace/name
        #[arg(short, long, default_value = "default/task")]
        task: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("loadgate=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => commands::validate::validate(&config),
        Commands::Evaluate { config, nodes, task, format } => {
            commands::evaluate::evaluate(&config, &nodes, &task, &format)
        }
    }
}
