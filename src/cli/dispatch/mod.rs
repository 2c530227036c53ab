use crate::cli::actions::{server, Action};
use crate::session::EXPIRATION_SECONDS;
use anyhow::Result;

/// Turn parsed arguments into the action to execute.
///
/// # Errors
///
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server(server::Args {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        session_ttl_seconds: matches
            .get_one::<i64>("session-ttl")
            .copied()
            .unwrap_or(EXPIRATION_SECONDS),
        sweep_interval_seconds: matches
            .get_one::<u64>("sweep-interval")
            .copied()
            .unwrap_or(60),
    }))
}
