use std::io::{self, Write};
use std::process;

use clap::Parser;
use log::error;

use tlsget::{fetch, Config};

const DEFAULT_HOST: &str = "api.fiscaldata.treasury.gov";
const DEFAULT_PATH: &str = "/services/api/fiscal_service/v1/accounting/od/schedules_fed_debt_daily_activity?filter=record_date:eq:2022-05-01";

/// One-shot HTTPS GET over a fresh TLS session.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Host name to resolve and connect to
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Absolute request path
    #[arg(long, default_value = DEFAULT_PATH)]
    path: String,

    /// Service name or port number
    #[arg(long, default_value = "https")]
    service: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = Config {
        host: args.host,
        path: args.path,
        service: args.service,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = fetch(&config, &mut out) {
        error!("{err}");
        process::exit(1);
    }
    let _ = out.flush();
}
