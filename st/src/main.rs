//! spacetrack: fetch satellite catalog data from www.space-track.org.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use orbit::{Config, Format, Limit, OrderBy, Sort};

mod commands;
mod logger;
mod prompts;

#[derive(Parser)]
#[command(name = "spacetrack")]
#[command(about = "Fetch satellite catalog data from www.space-track.org")]
#[command(version)]
struct Cli {
    /// Config file (default: $SPACETRACK_CONFIG, then the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory where records are written
    #[arg(short = 'w', long = "work-dir", global = true)]
    work_dir: Option<PathBuf>,

    /// File holding the passphrase that seals the credentials
    #[arg(long = "secret-file", global = true)]
    secret_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long = "log-file", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch general perturbations (orbital element) data
    Gp {
        /// Format of the written files: json, xml, csv, html
        #[arg(short = 'f', long = "format")]
        format: Option<Format>,

        /// Sort direction for --orderby: asc or desc
        #[arg(short = 's', long = "sort", default_value = "asc")]
        sort: Sort,

        /// Field to order by; ignored unless it is a sortable gp field
        #[arg(short = 'o', long = "orderby", default_value = "norad_cat_id")]
        orderby: String,

        /// Maximum number of records (0 = no limit)
        #[arg(short = 'l', long = "limit", default_value_t = 0)]
        limit: i64,

        /// Records to skip, used together with --limit
        #[arg(long = "skip", default_value_t = 0)]
        skip: i64,

        /// Filter such as epoch<now-30 or MEAN_MOTION>15 (repeatable)
        #[arg(short = 'F', long = "filter", value_name = "FIELD<OP>VALUE")]
        filters: Vec<String>,

        /// Write one file per record
        #[arg(long = "per-row")]
        per_row: bool,

        /// Print the request path without contacting space-track
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,
    },

    /// Fetch recent decay messages
    Decay {
        /// How many days back to look
        #[arg(short = 'd', long = "days", default_value_t = 1)]
        days: u32,

        /// Maximum number of records (0 = no limit)
        #[arg(short = 'l', long = "limit", default_value_t = 0)]
        limit: i64,

        /// Format of the written files: json, xml, csv, html
        #[arg(short = 'f', long = "format")]
        format: Option<Format>,

        /// Write one file per record
        #[arg(long = "per-row")]
        per_row: bool,

        /// Print the request path without contacting space-track
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,
    },

    /// Fetch recent public conjunction data messages
    Cdm {
        /// How many days back to look
        #[arg(short = 'd', long = "days", default_value_t = 1)]
        days: u32,

        /// Maximum number of records (0 = no limit)
        #[arg(short = 'l', long = "limit", default_value_t = 0)]
        limit: i64,

        /// Format of the written files: json, xml, csv, html
        #[arg(short = 'f', long = "format")]
        format: Option<Format>,

        /// Write one file per record
        #[arg(long = "per-row")]
        per_row: bool,

        /// Print the request path without contacting space-track
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,
    },

    /// Seal and store space-track credentials
    Credentials {
        /// Account user name or email (prompted if missing)
        #[arg(long = "identity")]
        identity: Option<String>,

        /// Account password (prompted if missing)
        #[arg(long = "password")]
        password: Option<String>,

        /// 32 character passphrase used to seal the credentials
        #[arg(long = "passphrase", conflicts_with = "auto_passphrase")]
        passphrase: Option<String>,

        /// Generate a random passphrase
        #[arg(long = "auto-passphrase")]
        auto_passphrase: bool,
    },

    /// List the fields accepted by `gp --filter`
    Fields,
}

fn load_config(cli: &Cli) -> orbit::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(dir) = &cli.work_dir {
        config.work_dir = dir.clone();
    }
    if let Some(file) = &cli.secret_file {
        config.secret_file = Some(file.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(file) = &cli.log_file {
        config.log_file = Some(file.clone());
    }
    Ok(config)
}

fn run(cli: Cli) -> orbit::Result<()> {
    let mut config = load_config(&cli)?;
    logger::init_logger(&config.log_level, config.log_file.as_deref())?;
    log::debug!("using config {}", config.path.display());

    match cli.command {
        Commands::Gp { format, sort, orderby, limit, skip, filters, per_row, dry_run } => {
            let opts = commands::FetchOptions { format, per_row, dry_run };
            commands::gp(
                &mut config,
                &filters,
                OrderBy::new(orderby, sort),
                Limit::new(limit, skip),
                &opts,
            )
        }
        Commands::Decay { days, limit, format, per_row, dry_run } => {
            let opts = commands::FetchOptions { format, per_row, dry_run };
            commands::decay(&mut config, days, limit, &opts)
        }
        Commands::Cdm { days, limit, format, per_row, dry_run } => {
            let opts = commands::FetchOptions { format, per_row, dry_run };
            commands::cdm(&mut config, days, limit, &opts)
        }
        Commands::Credentials { identity, password, passphrase, auto_passphrase } => {
            commands::credentials(&mut config, identity, password, passphrase, auto_passphrase)
        }
        Commands::Fields => commands::fields(),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
