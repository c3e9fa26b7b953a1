//! regard CLI Application
//!
//! Looks up a domain, IP address or AS number over RDAP (falling back to
//! WHOIS) and prints a normalized summary, the summary as JSON, the full
//! query result, or the raw registry response.

mod json;
mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use regard_lib::{
    create_summary, load_env_config, parse_timeout_string, validate_query, ConfigManager,
    EnvConfig, FileConfig, Lookup, LookupConfig, ProtocolPreference, QueryResult,
};
use std::process;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CLI arguments for regard
#[derive(Parser, Debug)]
#[command(name = "regard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Domain, IP and ASN research using RDAP with WHOIS fallback")]
#[command(
    long_about = "Look up a domain, IP address or AS number and show a normalized summary.\n\nRDAP is tried first; WHOIS is used when RDAP fails unless --rdap is given.",
    after_help = "Examples:\n  regard example.com\n  regard --json example.com\n  regard --whois example.com\n  regard 8.8.8.8\n  regard AS15169\n\nExit status is 0 when the registry answered, and 1 for argument or\nconfiguration errors and for lookups that found no registry answer."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain name, IP address or AS number (e.g. AS15169)
    #[arg(value_name = "QUERY")]
    pub query: Option<String>,

    /// Force use of the WHOIS protocol
    #[arg(long = "whois", conflicts_with = "rdap", help_heading = "Protocol")]
    pub whois: bool,

    /// Use RDAP only, without WHOIS fallback
    #[arg(long = "rdap", help_heading = "Protocol")]
    pub rdap: bool,

    /// Print the raw registry response
    #[arg(long = "raw", help_heading = "Output Format")]
    pub raw: bool,

    /// Print the full query result as JSON
    #[arg(short = 'v', long = "verbose", help_heading = "Output Format")]
    pub verbose: bool,

    /// Print the summary as JSON
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Disable colored output
    #[arg(long = "no-color", help_heading = "Output Format")]
    pub no_color: bool,

    /// Per-request timeout (e.g. "5s", "30s", "2m")
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Configuration")]
    pub timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug logs on stderr
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,
}

/// Effective settings after merging config files, environment and flags.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    preference: ProtocolPreference,
    timeout_secs: u64,
    color: bool,
    json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preference: ProtocolPreference::Auto,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            color: true,
            json: false,
        }
    }
}

impl Settings {
    fn lookup_config(&self) -> LookupConfig {
        LookupConfig::default()
            .with_preference(self.preference)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(args.debug);

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    match run(args).await {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Install the stderr log subscriber.
///
/// `--debug` turns on debug logs for both crates; otherwise `RUST_LOG` is
/// honored and the default level is `warn`.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("regard=debug,regard_lib=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    let query = args
        .query
        .as_deref()
        .ok_or_else(|| "No query specified. Run 'regard --help' for usage".to_string())?;

    validate_query(query).map_err(|e| e.to_string())
}

/// Run one lookup and print it. Returns whether the lookup succeeded.
async fn run(args: Args) -> Result<bool, Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let settings = build_settings(&args, &env_config)?;
    debug!(?settings, "resolved settings");

    if !settings.color {
        console::set_colors_enabled(false);
    }

    let lookup = Lookup::new(settings.lookup_config())?;
    let query = args.query.as_deref().unwrap_or_default();
    let result = lookup.query(query).await?;

    display_result(&args, &settings, &result, console::colors_enabled())?;

    Ok(result.success)
}

/// Print `result` in the selected output mode.
///
/// Modes in priority order: raw, verbose, JSON summary, terminal summary.
/// `color` enables ANSI styling for the JSON and terminal modes.
fn display_result(
    args: &Args,
    settings: &Settings,
    result: &QueryResult,
    color: bool,
) -> Result<(), serde_json::Error> {
    if args.raw {
        if result.raw_data.is_empty() {
            println!("Error: {}", result.error);
        } else {
            print!("{}", result.raw_data);
        }
    } else if args.verbose {
        println!("{}", json::to_pretty_json(result, color)?);
    } else if settings.json {
        if result.success {
            println!("{}", json::to_pretty_json(&create_summary(result), color)?);
        } else {
            println!("{}", serde_json::json!({ "error": result.error }));
        }
    } else if result.success {
        ui::print_summary(&create_summary(result), color);
    } else {
        println!("Error: {}", result.error);
    }

    Ok(())
}

/// Build settings from config files, environment and CLI flags.
///
/// Precedence: CLI > environment > config file > defaults. An explicit
/// `--config` wins over `REGARD_CONFIG`, which wins over discovery.
fn build_settings(args: &Args, env_config: &EnvConfig) -> Result<Settings, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new(args.debug);

    let file_config = if let Some(path) = &args.config {
        debug!(path = %path, "using explicit config file (--config)");
        config_manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?
    } else if let Some(path) = &env_config.config {
        debug!(path = %path, "using explicit config file (REGARD_CONFIG)");
        config_manager
            .load_file(path)
            .map_err(|e| format!("Failed to load config file '{}': {}", path, e))?
    } else {
        config_manager.discover_and_load()?
    };

    let settings = merge_file_config(Settings::default(), &file_config)?;
    let settings = apply_environment_config(settings, env_config);
    apply_cli_args(settings, args)
}

fn merge_file_config(
    mut settings: Settings,
    file_config: &FileConfig,
) -> Result<Settings, Box<dyn std::error::Error>> {
    if let Some(defaults) = &file_config.defaults {
        if let Some(preference) = defaults.protocol_preference()? {
            settings.preference = preference;
        }
        if let Some(secs) = defaults.timeout_secs()? {
            settings.timeout_secs = secs;
        }
        if let Some(color) = defaults.color {
            settings.color = color;
        }
        if let Some(json) = defaults.json {
            settings.json = json;
        }
    }

    Ok(settings)
}

fn apply_environment_config(mut settings: Settings, env_config: &EnvConfig) -> Settings {
    if let Some(preference) = env_config.protocol {
        settings.preference = preference;
    }
    if let Some(secs) = env_config.timeout_secs {
        settings.timeout_secs = secs;
    }
    if let Some(no_color) = env_config.no_color {
        settings.color = !no_color;
    }
    if let Some(json) = env_config.json {
        settings.json = json;
    }

    settings
}

/// Apply CLI arguments (highest precedence).
///
/// Flags only ever switch behavior on, so an absent flag keeps the value
/// from the environment or config file.
fn apply_cli_args(mut settings: Settings, args: &Args) -> Result<Settings, Box<dyn std::error::Error>> {
    if args.whois {
        settings.preference = ProtocolPreference::Whois;
    } else if args.rdap {
        settings.preference = ProtocolPreference::Rdap;
    }

    if let Some(timeout) = &args.timeout {
        settings.timeout_secs = parse_timeout_string(timeout).ok_or_else(|| {
            format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            )
        })?;
    }

    if args.no_color {
        settings.color = false;
    }
    if args.json {
        settings.json = true;
    }

    Ok(settings)
}
