//! bitcoin-rpc - send one JSON-RPC command to a Bitcoin Core node.
//!
//! Endpoint and credentials are resolved the way `bitcoin-cli` does it:
//! command-line flags first, then `bitcoin.conf`, then the `.cookie` file
//! in the data directory.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bitcoin_rpc_client::config::{
    cookie_path, default_data_dir, read_cookie, ConfFile, CONF_FILE_NAME,
};
use bitcoin_rpc_client::registry::{self, MethodDescriptor, MethodGroup};
use bitcoin_rpc_client::{ClientConfig, Credentials, Endpoint, Network, RpcClient, RpcError};

/// Host used when neither the flags nor bitcoin.conf name one.
const DEFAULT_RPC_HOST: &str = "127.0.0.1";

#[derive(Debug, Parser)]
#[command(
    name = "bitcoin-rpc",
    version,
    about = "Send a JSON-RPC command to a Bitcoin Core node"
)]
struct Cli {
    /// Configuration file (default: <datadir>/bitcoin.conf)
    #[arg(long)]
    conf: Option<PathBuf>,

    /// Data directory holding bitcoin.conf and the auth cookie
    #[arg(long)]
    datadir: Option<PathBuf>,

    /// Network: main, test, regtest or signet (default: from bitcoin.conf)
    #[arg(long)]
    network: Option<Network>,

    /// Node host
    #[arg(long)]
    rpcconnect: Option<String>,

    /// Node RPC port (default: per network)
    #[arg(long)]
    rpcport: Option<u16>,

    #[arg(long)]
    rpcuser: Option<String>,

    #[arg(long)]
    rpcpassword: Option<String>,

    /// Send the call to /wallet/<name>
    #[arg(long)]
    rpcwallet: Option<String>,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Reject argument counts the method does not accept
    #[arg(long)]
    strict_arity: bool,

    /// List every known method and exit
    #[arg(long, conflicts_with = "describe")]
    list: bool,

    /// Describe METHOD instead of calling it
    #[arg(long)]
    describe: bool,

    /// RPC method name
    #[arg(required_unless_present = "list")]
    method: Option<String>,

    /// Positional arguments: string-typed params are sent as-is, the rest
    /// are parsed as JSON (bare words become strings)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "bitcoin_rpc_client=warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    if cli.list {
        print_method_list();
        return Ok(ExitCode::SUCCESS);
    }

    let method = cli.method.clone().unwrap_or_default();

    if cli.describe {
        let descriptor = registry::describe(&method)
            .with_context(|| format!("Unknown RPC method: {method}"))?;
        print_descriptor(descriptor);
        return Ok(ExitCode::SUCCESS);
    }

    let config = resolve_config(&cli)?;
    tracing::debug!(endpoint = %config.endpoint(), "resolved configuration");

    let client = RpcClient::new(config);
    let args = convert_args(registry::describe(&method), &cli.args);

    match client.call(&method, args).await {
        Ok(value) => {
            print_result(&value)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(RpcError::Application { code, message, .. }) => {
            eprintln!("error code: {code}\nerror message:\n{message}");
            Ok(ExitCode::FAILURE)
        }
        // bitcoind answers most failed calls with 404/500 and a JSON error body.
        Err(
            RpcError::ClientError {
                remote: Some(remote),
                ..
            }
            | RpcError::ServerError {
                remote: Some(remote),
                ..
            },
        ) => {
            eprintln!("error code: {}\nerror message:\n{}", remote.code, remote.message);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).with_context(|| format!("{method} failed")),
    }
}

/// Build the client configuration from flags, bitcoin.conf and the cookie file.
fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let conf_path = cli.conf.clone().or_else(|| {
        cli.datadir
            .clone()
            .or_else(default_data_dir)
            .map(|dir| dir.join(CONF_FILE_NAME))
    });

    let conf = match &conf_path {
        Some(path) if path.exists() => ConfFile::load(path)?,
        Some(path) if cli.conf.is_some() => {
            bail!("Configuration file {} not found", path.display())
        }
        _ => ConfFile::default(),
    };

    let network = match cli.network {
        Some(network) => network,
        None => conf.network()?,
    };

    let host = cli
        .rpcconnect
        .clone()
        .or_else(|| conf.rpc_connect(network).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());

    let port = match cli.rpcport {
        Some(port) => port,
        None => conf
            .rpc_port(network)?
            .unwrap_or_else(|| network.default_rpc_port()),
    };

    let data_dir = cli
        .datadir
        .clone()
        .or_else(|| conf.data_dir())
        .or_else(default_data_dir);

    let credentials = resolve_credentials(cli, &conf, network, data_dir.as_deref())?;

    let mut config = ClientConfig::from_parts(Endpoint::new(&host, port)?, credentials)
        .with_arity_check(cli.strict_arity);
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(wallet) = &cli.rpcwallet {
        config = config.with_wallet(wallet);
    }
    Ok(config)
}

fn resolve_credentials(
    cli: &Cli,
    conf: &ConfFile,
    network: Network,
    data_dir: Option<&Path>,
) -> Result<Credentials> {
    let user = cli
        .rpcuser
        .clone()
        .or_else(|| conf.rpc_user(network).map(str::to_string));
    let password = cli
        .rpcpassword
        .clone()
        .or_else(|| conf.rpc_password(network).map(str::to_string));

    if let (Some(user), Some(password)) = (user, password) {
        return Ok(Credentials::new(user, password));
    }

    let data_dir = data_dir.context("No RPC credentials and no data directory for a cookie")?;
    let cookie = cookie_path(data_dir, network);
    read_cookie(&cookie).with_context(|| {
        format!(
            "No RPC credentials: pass --rpcuser/--rpcpassword or check {}",
            cookie.display()
        )
    })
}

/// Argument hints whose values are always sent as JSON strings.
const STRING_HINTS: &[&str] = &["string", "hex", "base64"];

/// Convert command-line words into positional params.
///
/// Arguments the registry declares as strings are passed through untouched,
/// so a numeric passphrase or label stays a string. Everything else goes
/// through [`parse_arg`].
fn convert_args(descriptor: Option<&MethodDescriptor>, args: &[String]) -> Vec<Value> {
    args.iter()
        .enumerate()
        .map(|(idx, arg)| {
            let hint = descriptor.and_then(|d| d.args.get(idx)).map(|spec| spec.hint);
            match hint {
                Some(hint) if STRING_HINTS.contains(&hint) => Value::String(arg.clone()),
                _ => parse_arg(arg),
            }
        })
        .collect()
}

/// JSON if it parses, otherwise the raw word as a JSON string.
fn parse_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()))
}

fn print_result(value: &Value) -> Result<()> {
    match value {
        Value::Null => {}
        Value::String(s) => println!("{s}"),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}

/// `name "required" ( optional )` in the style of bitcoind's help output.
fn signature(descriptor: &MethodDescriptor) -> String {
    let mut out = descriptor.name.to_string();
    for arg in descriptor.args {
        if arg.required {
            out.push_str(&format!(" \"{}\"", arg.name));
        } else {
            out.push_str(&format!(" ( {} )", arg.name));
        }
    }
    out
}

fn print_method_list() {
    for group in MethodGroup::ALL {
        println!("== {} ==", group.as_str());
        for descriptor in registry::methods_in(*group) {
            println!("{}", signature(descriptor));
        }
        println!();
    }
}

fn print_descriptor(descriptor: &MethodDescriptor) {
    println!("{}", signature(descriptor));
    println!();
    println!("{}", descriptor.description);
    println!("Group: {}", descriptor.group.as_str());
    if descriptor.args.is_empty() {
        return;
    }
    println!();
    println!("Arguments:");
    for (idx, arg) in descriptor.args.iter().enumerate() {
        let requiredness = if arg.required { "required" } else { "optional" };
        println!("{}. {} ({}, {})", idx + 1, arg.name, arg.hint, requiredness);
    }
}
