use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use zenlayercloud_provider::config::ProviderConfig;
use zenlayercloud_provider::engine::{HostContext, Timeouts};
use zenlayercloud_provider::resource::{
    Callback, Provider, ResourceData, DATA_SOURCE_TYPES, RESOURCE_TYPES,
};
use zenlayercloud_provider::VERSION;

/// Host shim for the Zenlayer Cloud provider
#[derive(Parser, Debug)]
#[command(name = "zenlayercloud-provider", version = VERSION, about, long_about = None)]
struct Args {
    /// Provider config file (JSON); defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one resource callback and print the resulting snapshot
    Resource {
        #[arg(value_enum)]
        callback: CallbackArg,

        /// Resource type, e.g. zenlayercloud_sdn_port
        type_name: String,

        /// Resource id (read, update, delete, import)
        #[arg(long)]
        id: Option<String>,

        /// JSON file with the planned or stored attributes
        #[arg(long)]
        attrs: Option<PathBuf>,

        /// JSON file with the prior attributes an update is diffed against
        #[arg(long)]
        prior: Option<PathBuf>,

        /// Per-operation timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Read a data source and print the result
    Data {
        /// Data source type, e.g. zenlayercloud_sdn_ports
        type_name: String,

        /// JSON file with the query arguments
        #[arg(long)]
        args: Option<PathBuf>,
    },

    /// List supported resource and data source types
    Types,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CallbackArg {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl From<CallbackArg> for Callback {
    fn from(arg: CallbackArg) -> Self {
        match arg {
            CallbackArg::Create => Callback::Create,
            CallbackArg::Read => Callback::Read,
            CallbackArg::Update => Callback::Update,
            CallbackArg::Delete => Callback::Delete,
            CallbackArg::Import => Callback::Import,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("zenlayercloud-provider {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("zenlayercloud").join("provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".zenlayercloud").join("provider.log");
    }
    PathBuf::from("zenlayercloud-provider.log")
}

fn read_attributes(path: Option<&Path>) -> Result<Map<String, Value>> {
    let Some(path) = path else {
        return Ok(Map::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    match parsed {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}

fn load_config(path: Option<&Path>) -> Result<ProviderConfig> {
    let config = match path {
        Some(path) => ProviderConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ProviderConfig::load_default(),
    };
    Ok(config.with_env()?)
}

fn configure(path: Option<&Path>) -> Result<Provider> {
    let config = load_config(path)?;
    Ok(Provider::configure(&config)?)
}

/// Cancel in-flight work on Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            child.cancel();
        }
    });
    token
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config_path = args.config.as_deref();
    let ctx = HostContext::new().with_cancellation(cancel_on_ctrl_c());

    let data = match args.command {
        Command::Resource {
            callback,
            type_name,
            id,
            attrs,
            prior,
            timeout,
        } => {
            let attributes = read_attributes(attrs.as_deref())?;
            let id = id.unwrap_or_default();
            let mut data = match prior {
                Some(prior) => {
                    ResourceData::for_update(id, attributes, read_attributes(Some(&prior))?)
                }
                None => ResourceData::from_state(id, attributes),
            };
            if let Some(secs) = timeout {
                data = data.with_timeouts(Timeouts::uniform(Duration::from_secs(secs)));
            }

            let provider = configure(config_path)?;
            provider.apply(&ctx, callback.into(), &type_name, &mut data).await?;
            data
        }
        Command::Data { type_name, args } => {
            let mut data = ResourceData::new(read_attributes(args.as_deref())?);
            let provider = configure(config_path)?;
            provider.read_data_source(&ctx, &type_name, &mut data).await?;
            data
        }
        // listing types needs no credentials
        Command::Types => {
            for name in RESOURCE_TYPES {
                println!("resource     {name}");
            }
            for name in DATA_SOURCE_TYPES {
                println!("data source  {name}");
            }
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
