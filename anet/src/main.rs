#[macro_use]
extern crate human_panic;

use anet::constants::error_code_table;
use anet::{native, Adapter, Value, Values};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use itertools::Itertools;
use log::{debug, info, warn, LevelFilter};
use std::os::unix::io::RawFd;

#[derive(Parser)]
#[clap(version, about = "Socket utility primitives behind a call adapter")]
struct Args {
    /// Prints debug information verbosely
    #[clap(short, long)]
    debug: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Invoke a named operation; arguments are nil, true/false, numbers or text
    Call {
        operation: String,
        #[clap(allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Resolve a host name to an IP address
    Resolve { host: String },
    /// Print the published error codes
    Codes,
    /// Run a single-threaded echo server
    Serve {
        /// Address to bind to
        #[clap(long, env = "ANET_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[clap(short, long, env = "ANET_PORT", default_value = "7000")]
        port: u16,

        /// Disable Nagle's algorithm on accepted connections
        #[clap(long)]
        nodelay: bool,

        /// Enable keep-alive on accepted connections
        #[clap(long)]
        keepalive: bool,
    },
    /// Send a message and print the reply
    Send { host: String, port: u16, message: String },
}

fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let mut logger = env_logger::builder();
    logger.format_module_path(false);

    if args.debug {
        logger.filter_level(LevelFilter::Debug).init();
    } else {
        logger.filter_level(LevelFilter::Info).parse_default_env().init();

        setup_panic!();
    }

    let adapter = Adapter::native();
    match args.command {
        Command::Call { operation, args } => {
            let args: Vec<Value> = args.iter().map(|a| anet::util::parse_literal(a)).collect();
            let values = adapter.call(&operation, &args)?;

            println!("{}", values.iter().join("\t"));
        }
        Command::Resolve { host } => {
            let values = adapter.call("resolve", &[host.into()])?;
            match &values[..] {
                [Value::Boolean(true), address] => println!("{}", address),
                [_, message] => bail!("{}", message),
                _ => unreachable!(),
            }
        }
        Command::Codes => {
            for (name, code) in error_code_table() {
                println!("{}\t{}", name, code);
            }
        }
        Command::Serve {
            host,
            port,
            nodelay,
            keepalive,
        } => serve(&adapter, host, port, nodelay, keepalive)?,
        Command::Send { host, port, message } => send(&adapter, host, port, message)?,
    }

    Ok(())
}

/// The primary result of a descriptor- or count-producing reply.
fn primary(values: &[Value]) -> Result<i64> {
    match values {
        [Value::Integer(result), ..] => Ok(*result),
        [_, message, code] => bail!("{} (code {})", message, code),
        _ => bail!("Unexpected reply: {:?}", values),
    }
}

/// Interprets a status reply; failures are logged, not fatal.
fn status(
    operation: &str,
    values: Values,
) {
    if let [Value::Boolean(false), message, ..] = &values[..] {
        warn!("{} failed: {}", operation, message);
    }
}

///
///
///
fn serve(
    adapter: &Adapter,
    host: String,
    port: u16,
    nodelay: bool,
    keepalive: bool,
) -> Result<()> {
    let values = adapter.call("tcpserver", &[port.into(), host.into()])?;
    let server = primary(&values).context("Failed to listen")? as RawFd;
    let local = native::sock_name(server)?;
    info!("Listening on {}.", local);

    loop {
        let values = adapter.call("accept", &[server.into(), true.into(), true.into()])?;
        let client = match primary(&values) {
            Ok(client) => client as RawFd,
            Err(e) => {
                warn!("Accept failed: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}:{}.", values[1], values[2]);

        if nodelay {
            status("tcpnodelay", adapter.call("tcpnodelay", &[client.into()])?);
        }
        if keepalive {
            status("tcpkeepalive", adapter.call("tcpkeepalive", &[client.into()])?);
        }

        let echoed = echo(adapter, client)?;
        debug!("Echoed {} bytes.", echoed);

        status("close", adapter.call("close", &[client.into()])?);
    }
}

/// Echoes everything read from `client` until end of stream or an error.
fn echo(
    adapter: &Adapter,
    client: RawFd,
) -> Result<usize> {
    let mut total = 0;

    loop {
        let values = adapter.call("read", &[client.into()])?;
        let payload = match &values[..] {
            [Value::Integer(0), _] => return Ok(total),
            [Value::Integer(_), payload] => payload.clone(),
            [_, message, _] => {
                warn!("Read failed: {}", message);
                return Ok(total);
            }
            _ => unreachable!(),
        };

        let values = adapter.call("write", &[client.into(), payload])?;
        match &values[..] {
            [Value::Integer(written)] => total += *written as usize,
            [_, message, _] => {
                warn!("Write failed: {}", message);
                return Ok(total);
            }
            _ => unreachable!(),
        }
    }
}

///
///
///
fn send(
    adapter: &Adapter,
    host: String,
    port: u16,
    message: String,
) -> Result<()> {
    let values = adapter.call("tcpconnect", &[host.into(), port.into()])?;
    let fd = primary(&values).context("Failed to connect")? as RawFd;
    status("tcpnodelay", adapter.call("tcpnodelay", &[fd.into()])?);

    let values = adapter.call("write", &[fd.into(), message.into()])?;
    primary(&values).context("Failed to write")?;

    let values = adapter.call("read", &[fd.into()])?;
    match &values[..] {
        [Value::Integer(_), payload] => println!("{}", payload),
        [_, message, _] => warn!("Read failed: {}", message),
        _ => unreachable!(),
    }

    status("close", adapter.call("close", &[fd.into()])?);

    Ok(())
}
