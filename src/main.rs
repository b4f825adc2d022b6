//! Health Diary CLI
//!
//! Command-line client for the diary contract:
//! - Connect an account
//! - Add a daily entry
//! - List your entries
//! - Generate a config file

use clap::{Parser, Subcommand};
use health_diary::{
    generate_default_config, Address, Config, DiaryClient, Entry, FormField, HttpProvider,
    LoggingConfig, Notice, NoticeLevel, Notifier, ProviderWallet,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "health-diary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Daily health diary kept on-chain")]
#[command(long_about = "Record weight, steps and calories to the diary contract and list the entries your account has made.\nTransactions are signed by the node behind --rpc-url.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/health-diary/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint, overrides the config file
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Diary contract address, overrides the config file
    #[arg(long, global = true)]
    pub contract: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authorize an account and show how many entries it has
    Connect,

    /// List your entries
    Entries,

    /// Add today's entry
    Add {
        /// Weight in kilograms
        #[arg(long)]
        weight: String,
        /// Steps walked
        #[arg(long)]
        steps: String,
        /// Calories eaten
        #[arg(long)]
        calories_in: String,
        /// Calories burned
        #[arg(long)]
        calories_out: String,
        /// Free-form note
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Prints notifications to the terminal
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Error => eprintln!("✕ {}", notice.message),
        }
    }
}

type CliClient = DiaryClient<ProviderWallet<HttpProvider>, ConsoleNotifier>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.rpc_url {
        config.network.rpc_url = url;
    }
    if let Some(contract) = cli.contract {
        config.network.contract_address = contract;
    }

    init_logging(&config.logging);

    match cli.command {
        Commands::Connect => {
            let client = connect(&config).await?;
            if let Some(account) = client.account() {
                println!("Connected: {}", account);
            }
            println!("Entries: {}", client.entries().len());
        }

        Commands::Entries => {
            let client = connect(&config).await?;
            print_entries(&client.entries(), &cli.format)?;
        }

        Commands::Add {
            weight,
            steps,
            calories_in,
            calories_out,
            note,
        } => {
            let client = connect(&config).await?;
            client.set_field(FormField::WeightKg, weight);
            client.set_field(FormField::Steps, steps);
            client.set_field(FormField::CaloriesIn, calories_in);
            client.set_field(FormField::CaloriesOut, calories_out);
            client.set_field(FormField::Note, note);

            if client.submit_entry().await.is_err() {
                std::process::exit(1);
            }
            print_entries(&client.entries(), &cli.format)?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("health_diary={}", logging.level)));

    // Logs go to stderr so table/json output stays clean
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Build a client and connect it, exiting if the wallet refuses
async fn connect(config: &Config) -> Result<CliClient, Box<dyn std::error::Error>> {
    let provider = HttpProvider::new(&config.network.rpc_url, config.network.request_timeout())?;
    let contract: Address = config.network.contract_address.parse()?;
    tracing::info!(rpc = %provider.url(), %contract, "Connecting");

    let wallet =
        ProviderWallet::new(Some(provider), contract).poll_interval(config.network.poll_interval());
    let client = DiaryClient::new(wallet, ConsoleNotifier);

    // The notifier has already explained the failure
    if client.connect().await.is_err() {
        std::process::exit(1);
    }
    Ok(client)
}

fn print_entries(entries: &[Entry], format: &str) -> Result<(), Box<dyn std::error::Error>> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries yet.");
        return Ok(());
    }

    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>8}  {}",
        "Date", "Weight", "Steps", "Cal In", "Cal Out", "Note"
    );
    println!("{}", "-".repeat(60));
    for entry in entries {
        println!(
            "{:<12} {:>5} kg {:>8} {:>8} {:>8}  {}",
            entry.date_label(),
            entry.weight_kg,
            entry.steps,
            entry.calories_in,
            entry.calories_out,
            entry.note
        );
    }

    Ok(())
}
