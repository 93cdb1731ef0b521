use clap::{builder::ValueParser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_JSON: &str = "log-json";

/// Accepts a level name (`error`=0 .. `trace`=4) or a raw count, which is
/// what repeated `-v` flags feed through.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

        let lower = level.to_lowercase();
        LEVELS
            .iter()
            .position(|name| *name == lower)
            .and_then(|index| u8::try_from(index).ok())
            .or_else(|| level.parse::<u8>().ok())
            .ok_or_else(|| format!("invalid log level: {level}"))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("MEALPLAN_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .arg(
            Arg::new(ARG_LOG_JSON)
                .long("log-json")
                .help("Emit logs as JSON lines on stderr")
                .env("MEALPLAN_LOG_JSON")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}

/// Logging settings resolved from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// `None` keeps the subscriber at its error-only default.
    pub level: Option<Level>,
    pub json: bool,
}

impl LogOptions {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let level = match matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0) {
            0 => None,
            1 => Some(Level::WARN),
            2 => Some(Level::INFO),
            3 => Some(Level::DEBUG),
            _ => Some(Level::TRACE),
        };

        Self {
            level,
            json: matches.get_flag(ARG_LOG_JSON),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> LogOptions {
        let matches = with_args(Command::new("mealplan")).get_matches_from(args.iter().copied());
        LogOptions::parse(&matches)
    }

    #[test]
    fn test_flags_map_to_levels() {
        temp_env::with_vars(
            [
                ("MEALPLAN_LOG_LEVEL", None::<&str>),
                ("MEALPLAN_LOG_JSON", None::<&str>),
            ],
            || {
                assert_eq!(
                    parse(&["mealplan"]),
                    LogOptions {
                        level: None,
                        json: false
                    }
                );
                assert_eq!(parse(&["mealplan", "-vv"]).level, Some(Level::INFO));
                assert_eq!(parse(&["mealplan", "-vvvvvv"]).level, Some(Level::TRACE));
                assert!(parse(&["mealplan", "--log-json"]).json);
            },
        );
    }

    #[test]
    fn test_env_level_names() {
        temp_env::with_vars(
            [
                ("MEALPLAN_LOG_LEVEL", Some("DEBUG")),
                ("MEALPLAN_LOG_JSON", Some("true")),
            ],
            || {
                let options = parse(&["mealplan"]);
                assert_eq!(options.level, Some(Level::DEBUG));
                assert!(options.json);
            },
        );
    }

    #[test]
    fn test_rejects_unknown_level() {
        temp_env::with_var("MEALPLAN_LOG_LEVEL", Some("loud"), || {
            let result = with_args(Command::new("mealplan")).try_get_matches_from(["mealplan"]);
            assert!(result.is_err());
        });
    }
}
