use crate::api;
use anyhow::Result;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub session_ttl_seconds: i64,
    pub sweep_interval_seconds: u64,
}

/// Execute the server action.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);
    api::new(
        args.port,
        args.session_ttl_seconds,
        args.sweep_interval_seconds,
    )
    .await
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("session_ttl", format!("{}s", args.session_ttl_seconds)),
        ("sweep_interval", format!("{}s", args.sweep_interval_seconds)),
        ("version", env!("CARGO_PKG_VERSION").to_string()),
        ("commit", short_commit(crate::GIT_COMMIT_HASH)),
    ];
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = String::from("Startup configuration:");
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_commit_truncates_long_hashes() {
        assert_eq!(short_commit("0123456789abcdef"), "0123456");
        assert_eq!(short_commit("abc"), "abc");
        assert_eq!(short_commit("  abc  "), "abc");
    }

    #[test]
    fn args_are_debuggable() {
        let args = Args {
            port: 8080,
            session_ttl_seconds: 86_400,
            sweep_interval_seconds: 60,
        };
        let printed = format!("{args:?}");
        assert!(printed.contains("8080"));
        assert!(printed.contains("86400"));
    }
}
