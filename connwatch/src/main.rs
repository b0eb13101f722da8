use clap::{Parser, Subcommand};
use connwatch_core::cli::conf::{ConfigCmd, check, dump};
use connwatch_core::conf::{Overrides, load_config};
use connwatch_core::logging::{LogFormat, default_log_format, init_logging};
use connwatch_core::server;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "connwatch",
    version,
    about = "Connwatch: router VPN session metrics from syslog"
)]
struct Cli {
    /// Path to the Connwatch config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Syslog TCP listen ip:port
    #[arg(long, global = true)]
    syslog_listen: Option<String>,

    /// HTTP (metrics) listen ip:port
    #[arg(long, global = true)]
    http_listen: Option<String>,

    /// Comma separated list of ipaddr/host pairs used to look up device name
    /// (e.g. '10.11.12.13/router1')
    #[arg(long, global = true)]
    device_names: Option<String>,

    /// Path to the GeoIP ASN database
    #[arg(long, global = true)]
    geoip_file: Option<PathBuf>,

    /// Log output format (defaults to pretty on a terminal, JSON otherwise)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },

    /// Run Connwatch (default)
    Run,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            syslog_listen: self.syslog_listen.clone(),
            http_listen: self.http_listen.clone(),
            geoip_file: self.geoip_file.clone(),
            device_names: self.device_names.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let overrides = cli.overrides();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Some(Command::Config { cmd }) => match cmd {
            ConfigCmd::Check => check(config, &overrides),
            ConfigCmd::Dump => dump(config, &overrides),
        },

        Some(Command::Run) | None => {
            init_logging(cli.log_format.unwrap_or_else(default_log_format));

            load_config(config, &overrides)
                .map_err(anyhow::Error::from)
                .and_then(server::run)
        }
    };

    if let Err(e) = result {
        eprintln!("connwatch: {e:#}");
        std::process::exit(1);
    }
}
