use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use energy_dash::cli::{self, OutputFormat, ThemeAction};
use energy_dash::config;
use energy_dash::form::FormInput;
use energy_dash::logging;
use energy_dash::theme::Theme;

#[derive(Debug, Parser)]
#[command(name = "energy-dash")]
#[command(about = "Next-hour energy prediction dashboard")]
struct App {
    /// Prediction service base URL (overrides config and ENERGY_DASH_API_URL)
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// The reading sent to the prediction service.
#[derive(Debug, Args)]
struct ReadingArgs {
    /// Current energy usage
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    energy: String,
    /// Temperature in °C
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    temp: String,
    /// Relative humidity in %
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    hum: String,
    /// Optional timestamp, passed through to the service
    #[arg(long, default_value = "")]
    ts: String,
}

impl From<ReadingArgs> for FormInput {
    fn from(args: ReadingArgs) -> Self {
        FormInput::new(args.energy, args.temp, args.hum).with_timestamp(args.ts)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive dashboard (default)
    Dash,
    /// Request a single next-hour prediction
    Predict {
        #[command(flatten)]
        reading: ReadingArgs,
    },
    /// 24 chained hourly predictions
    Forecast {
        #[command(flatten)]
        reading: ReadingArgs,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Predictions at 3h / 6h / 12h / 24h
    Multistep {
        #[command(flatten)]
        reading: ReadingArgs,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check the prediction service and local configuration
    Health,
    /// Show or change the light/dark theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeCommand>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Subcommand)]
enum ThemeCommand {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        #[arg(value_parser = cli::parse_theme)]
        theme: Theme,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Write the default config to ~/.energy-dash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `api.base_url`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    let mut cfg = config::load();
    if let Some(api) = app.api {
        cfg.api.base_url = api;
    }
    logging::init(&cfg);

    match app.command.unwrap_or(Commands::Dash) {
        Commands::Dash => cli::run_dash(&cfg),
        Commands::Predict { reading } => cli::run_predict(&cfg, reading.into()),
        Commands::Forecast { reading, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_forecast(&cfg, reading.into(), fmt)
        }
        Commands::Multistep { reading, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_multistep(&cfg, reading.into(), fmt)
        }
        Commands::Health => cli::run_health(&cfg),
        Commands::Theme { action } => {
            let action = match action.unwrap_or(ThemeCommand::Show) {
                ThemeCommand::Show => ThemeAction::Show,
                ThemeCommand::Toggle => ThemeAction::Toggle,
                ThemeCommand::Set { theme } => ThemeAction::Set(theme),
            };
            cli::run_theme(&cfg, action)
        }
        Commands::Config { action } => match action {
            ConfigCommand::Show => cli::run_config_show(),
            ConfigCommand::Init { force } => cli::run_config_init(force),
            ConfigCommand::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigCommand::Reset => cli::run_config_reset(),
        },
    }
}
