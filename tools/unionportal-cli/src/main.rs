//! Union Portal CLI: membership form export and portal account tools.
//!
//! Usage:
//!   unionportal export <MEMBER_JSON>     Render a filled membership form PDF
//!   unionportal validate <MEMBER_JSON>   Show how a member record will be read
//!   unionportal fields                   Print the form coordinate table
//!   unionportal check-template           Check which template would load
//!   unionportal auth <ACTION>            Call the registration/login endpoints

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use unionportal_common::config::{AppConfig, PaperFormat};

mod commands;

use commands::auth::AuthCommand;

#[derive(Parser)]
#[command(
    name = "unionportal",
    about = "Union membership portal tools: form export and account registration",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a filled membership application form
    Export {
        /// Member record (JSON object)
        member: PathBuf,

        /// Template location (URL, data URL, or path); defaults to the portal's
        #[arg(short, long)]
        template: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Paper format: a4|letter
        #[arg(long)]
        paper: Option<PaperFormat>,
    },

    /// Show the normalized view of a member record
    Validate {
        /// Member record (JSON object)
        member: PathBuf,
    },

    /// Print the form field coordinate table
    Fields,

    /// Check which template source loads
    CheckTemplate {
        /// Template location; defaults to the portal's
        #[arg(short, long)]
        template: Option<String>,
    },

    /// Registration and login endpoints
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    unionportal_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Export {
            member,
            template,
            output,
            paper,
        } => commands::export::run(&config, member, template, output, paper).await,
        Commands::Validate { member } => commands::validate::run(member),
        Commands::Fields => commands::fields::run(),
        Commands::CheckTemplate { template } => {
            commands::check_template::run(&config, template).await
        }
        Commands::Auth { action } => commands::auth::run(&config, action).await,
    }
}
