use crate::error::{Error, Result};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Read;
use std::net::{IpAddr, Ipv4Addr};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("IPv4 pattern is valid")
});

/// Marker printed by the trace utility for a hop that never answered.
const UNRESPONSIVE_MARKER: &str = "***";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The platform trace utility, in numeric (no reverse DNS) mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceCommand {
    program: String,
    args: Vec<String>,
}

impl TraceCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl Default for TraceCommand {
    #[cfg(windows)]
    fn default() -> Self {
        Self::new("tracert", &["-d"])
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self::new("traceroute", &["-n"])
    }
}

/// Kills and reaps the child on drop, whichever way we leave [`trace`].
struct ChildGuard(Child);

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Ok(None) = self.0.try_wait() {
            let _ = self.0.kill();
        }
        let _ = self.0.wait();
    }
}

/// Runs the trace utility against `target` and returns the hop addresses
/// in the order they were discovered.
///
/// With `timeout` set the utility is killed once it runs past it.
pub fn trace(
    target: IpAddr,
    command: &TraceCommand,
    timeout: Option<Duration>,
) -> Result<Vec<IpAddr>> {
    log::debug!(
        "running {} {} {target}",
        command.program,
        command.args.iter().join(" ")
    );
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .arg(target.to_string())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map(ChildGuard)
        .map_err(Error::trace_unavailable)?;

    let stdout = drain(child.0.stdout.take());
    let stderr = drain(child.0.stderr.take());

    let deadline = timeout.map(|timeout| Instant::now() + timeout);
    while child.0.try_wait().map_err(Error::trace_unavailable)?.is_none() {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Error::trace_unavailable(format!(
                "{} did not finish within {}s",
                command.program,
                timeout.unwrap_or_default().as_secs()
            )));
        }
        thread::sleep(POLL_INTERVAL);
    }

    let mut output = stdout.join().unwrap_or_default();
    output.extend(stderr.join().unwrap_or_default());

    let hops = parse_output(&decode_output(&output), target);
    log::debug!("parsed {} hops", hops.len());
    Ok(hops)
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Decodes the utility's output, replacing anything that is not UTF-8.
///
/// Everything we look for (digits, dots, `*`) is ASCII, so the console code
/// page of the utility does not matter.
pub fn decode_output(output: &[u8]) -> String {
    String::from_utf8_lossy(output).into_owned()
}

/// Returns `true` for a line reporting a hop where every probe timed out.
pub fn is_unresponsive(line: &str) -> bool {
    line.split_whitespace()
        .collect::<String>()
        .contains(UNRESPONSIVE_MARKER)
}

/// Extracts the hop addresses from the utility's output.
///
/// Parsing stops at the first unresponsive hop. Each remaining line
/// contributes its first IPv4 address, skipping the target itself and
/// addresses already seen.
pub fn parse_output(output: &str, target: IpAddr) -> Vec<IpAddr> {
    output
        .lines()
        .take_while(|line| !is_unresponsive(line))
        .filter_map(|line| IPV4_PATTERN.find(line))
        .filter_map(|found| found.as_str().parse::<Ipv4Addr>().ok())
        .map(IpAddr::V4)
        .filter(|addr| *addr != target)
        .unique()
        .collect()
}
