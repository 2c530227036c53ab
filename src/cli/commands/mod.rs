use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

use crate::session::EXPIRATION_SECONDS;

/// Seconds between sweeps of expired sessions.
const DEFAULT_SWEEP_INTERVAL: &str = "60";

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("anagrafe")
        .about("Identity directory and session authentication")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ANAGRAFE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("session-ttl")
                .long("session-ttl")
                .help("Seconds a session stays live without activity")
                .default_value(Box::leak(EXPIRATION_SECONDS.to_string().into_boxed_str()) as &'static str)
                .env("ANAGRAFE_SESSION_TTL")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new("sweep-interval")
                .long("sweep-interval")
                .help("Seconds between sweeps of expired sessions")
                .default_value(DEFAULT_SWEEP_INTERVAL)
                .env("ANAGRAFE_SWEEP_INTERVAL")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ANAGRAFE_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "anagrafe");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Identity directory and session authentication"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        let command = new();
        let matches = command.get_matches_from(vec!["anagrafe"]);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert_eq!(
            matches.get_one::<i64>("session-ttl").copied(),
            Some(EXPIRATION_SECONDS)
        );
        assert_eq!(matches.get_one::<u64>("sweep-interval").copied(), Some(60));
    }

    #[test]
    fn test_check_flags() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "anagrafe",
            "--port",
            "8443",
            "--session-ttl",
            "3600",
            "--sweep-interval",
            "5",
        ]);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8443));
        assert_eq!(matches.get_one::<i64>("session-ttl").copied(), Some(3600));
        assert_eq!(matches.get_one::<u64>("sweep-interval").copied(), Some(5));
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("ANAGRAFE_PORT", Some("443")),
                ("ANAGRAFE_SESSION_TTL", Some("7200")),
                ("ANAGRAFE_SWEEP_INTERVAL", Some("30")),
                ("ANAGRAFE_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["anagrafe"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(matches.get_one::<i64>("session-ttl").copied(), Some(7200));
                assert_eq!(matches.get_one::<u64>("sweep-interval").copied(), Some(30));
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("ANAGRAFE_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["anagrafe"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("ANAGRAFE_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["anagrafe".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();
                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let command = new();
        let result = command.try_get_matches_from(vec!["anagrafe", "--session-ttl", "0"]);
        assert!(result.is_err());
    }
}
