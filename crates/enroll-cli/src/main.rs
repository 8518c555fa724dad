//! Student Enrollment CLI
//!
//! Terminal front-end for the enrollment server: list, inspect, enroll,
//! update and remove students, or fill in the interactive form.

mod api;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use enroll_types::NewStudent;
use tracing::{error, info};

use api::{Client, DEFAULT_SERVER_URL};
use commands::students::UpdateOptions;

#[derive(Parser)]
#[command(name = "enroll")]
#[command(author, version, about = "Student enrollment from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enrollment server URL
    #[arg(long, global = true, env = "ENROLL_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive enrollment form
    Form,

    /// List every enrolled student
    List,

    /// Show one student
    Get {
        /// Roll number
        roll_no: String,
    },

    /// Enroll a new student (enrollment date is set by the server)
    Add {
        /// Roll number
        #[arg(long = "roll")]
        roll_no: String,

        /// Full name
        #[arg(long = "name")]
        full_name: String,

        #[arg(long)]
        class: String,

        /// Birth date (YYYY-MM-DD)
        #[arg(long = "birth")]
        birth_date: String,

        #[arg(long)]
        address: String,
    },

    /// Change fields of an enrolled student
    Update {
        /// Roll number
        roll_no: String,

        #[arg(long = "name")]
        full_name: Option<String>,

        #[arg(long)]
        class: Option<String>,

        /// Birth date (YYYY-MM-DD)
        #[arg(long = "birth")]
        birth_date: Option<String>,

        #[arg(long)]
        address: Option<String>,

        /// Enrollment date (YYYY-MM-DD)
        #[arg(long = "enrolled")]
        enrollment_date: Option<String>,
    },

    /// Remove a student
    Delete {
        /// Roll number
        roll_no: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show how many students are enrolled
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter("enroll_cli=debug")
            .with_target(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;
        info!("Using server {}", cli.server);
    }

    let client = Client::new(cli.server);

    let result = match cli.command {
        Commands::Form => commands::form::run(&client).await,
        Commands::List => commands::students::list(&client).await,
        Commands::Get { roll_no } => commands::students::show(&client, &roll_no).await,
        Commands::Add {
            roll_no,
            full_name,
            class,
            birth_date,
            address,
        } => {
            commands::students::add(
                &client,
                NewStudent {
                    roll_no,
                    full_name,
                    class,
                    birth_date,
                    address,
                },
            )
            .await
        }
        Commands::Update {
            roll_no,
            full_name,
            class,
            birth_date,
            address,
            enrollment_date,
        } => {
            commands::students::update(
                &client,
                &roll_no,
                UpdateOptions {
                    full_name,
                    class,
                    birth_date,
                    address,
                    enrollment_date,
                },
            )
            .await
        }
        Commands::Delete { roll_no, yes } => {
            commands::students::delete(&client, &roll_no, yes).await
        }
        Commands::Stats => commands::students::stats(&client).await,
    };

    if let Err(ref e) = result {
        error!("Command failed: {}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    result
}
