use clap::Parser;
use std::io::{self, BufRead, Write};
use std::net::IpAddr;
use std::time::Duration;

pub mod asn;
pub mod config;
pub mod dns;
pub mod error;
pub mod report;
pub mod trace;
pub mod tui;
pub mod validation;

use config::Config;
use validation::Target;

const PROMPT: &str = "Enter the domain name or IP for tracing: ";

#[derive(Debug, Parser)]
#[clap(
    name = "tracewhois",
    about = "Traces the route to a host and annotates every hop with its ASN, provider & country"
)]
struct Opt {
    /// Domain name or IP to trace (asked for interactively if omitted)
    #[clap(value_name = "TARGET")]
    target: Option<String>,

    /// Base URL of the RIPEstat-compatible registry lookup service
    #[clap(long = "registry-url", default_value = asn::API_URL, value_name = "URL")]
    registry_url: String,

    /// Timeout for each registry request
    #[clap(long = "timeout", default_value_t = 5, value_name = "SECS")]
    timeout: u64,

    /// Give up on the trace utility after this long (0 waits forever)
    #[clap(long = "trace-timeout", default_value_t = 300, value_name = "SECS")]
    trace_timeout: u64,

    /// Show the report in an interactive table
    #[clap(long = "tui")]
    tui: bool,
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            registry_url: opt.registry_url.clone(),
            lookup_timeout: Duration::from_secs(opt.timeout),
            trace_timeout: (opt.trace_timeout > 0).then(|| Duration::from_secs(opt.trace_timeout)),
            tui: opt.tui,
            ..Config::default()
        }
    }
}

fn prompt() -> io::Result<String> {
    print!("{PROMPT}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Resolves and traces `target`. Failures are reported and give no hops.
fn collect_hops(target: &Target, config: &Config) -> (Option<IpAddr>, Vec<IpAddr>) {
    let addr = match dns::resolve(target) {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("{e}");
            return (None, Vec::new());
        }
    };
    match trace::trace(addr, &config.trace_command, config.trace_timeout) {
        Ok(hops) => (Some(addr), hops),
        Err(e) => {
            eprintln!("{e}");
            (Some(addr), Vec::new())
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let opt = Opt::parse();
    let config = Config::from(&opt);
    let target = Target::new(match opt.target {
        Some(target) => target,
        None => prompt()?,
    });

    let registry = asn::RipeStat::new(&config.registry_url, config.lookup_timeout)?;
    let (addr, hops) = collect_hops(&target, &config);
    let rows = report::rows(&hops, |hop| asn::enrich_addr(&registry, hop));

    if config.tui {
        let summary = match addr {
            Some(addr) => format!("Trace to {target} ({addr}), {} hops", hops.len()),
            None => format!("Trace to {target}, no hops"),
        };
        println!("Looking up {} hops...", hops.len());
        tui::run_tui(summary, rows.collect())?;
    } else {
        for row in rows {
            println!("{row}");
        }
    }

    Ok(())
}
