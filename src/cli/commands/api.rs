use crate::auth::DEFAULT_BASE_URL;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TOKEN_FILE: &str = "token-file";

/// Session file used when `--token-file` is not given.
const SESSION_FILE: &str = "session.json";
const FALLBACK_SESSION_FILE: &str = ".mealplan-session.json";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .short('u')
                .long("api-url")
                .help("Base URL of the auth API")
                .env("MEALPLAN_API_URL")
                .default_value(DEFAULT_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_FILE)
                .long("token-file")
                .help("File holding the session token (default: <config dir>/mealplan/session.json)")
                .env("MEALPLAN_TOKEN_FILE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

#[derive(Debug, Clone)]
pub struct Options {
    pub api_url: String,
    pub token_file: PathBuf,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let api_url = matches
            .get_one::<String>(ARG_API_URL)
            .cloned()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let token_file = matches
            .get_one::<PathBuf>(ARG_TOKEN_FILE)
            .cloned()
            .unwrap_or_else(default_token_file);

        Self {
            api_url,
            token_file,
        }
    }
}

/// `<config dir>/mealplan/session.json`, or a dotfile in the working
/// directory when the platform has no config directory.
#[must_use]
pub fn default_token_file() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(FALLBACK_SESSION_FILE),
        |dir| dir.join(env!("CARGO_PKG_NAME")).join(SESSION_FILE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token_file_under_config_dir() {
        let expected = dirs::config_dir().map_or_else(
            || PathBuf::from(FALLBACK_SESSION_FILE),
            |dir| dir.join("mealplan").join("session.json"),
        );
        assert_eq!(default_token_file(), expected);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_default_token_file_follows_xdg() {
        temp_env::with_vars(
            [
                ("XDG_CONFIG_HOME", Some("/tmp/xdg")),
                ("HOME", Some("/home/cook")),
            ],
            || {
                assert_eq!(
                    default_token_file(),
                    PathBuf::from("/tmp/xdg/mealplan/session.json")
                );
            },
        );
        temp_env::with_vars(
            [
                ("XDG_CONFIG_HOME", None::<&str>),
                ("HOME", Some("/home/cook")),
            ],
            || {
                assert_eq!(
                    default_token_file(),
                    PathBuf::from("/home/cook/.config/mealplan/session.json")
                );
            },
        );
    }

    #[test]
    fn test_options_prefer_explicit_token_file() {
        temp_env::with_var("MEALPLAN_API_URL", None::<&str>, || {
            let matches = with_args(Command::new("mealplan")).get_matches_from([
                "mealplan",
                "--token-file",
                "/tmp/session.json",
            ]);
            let options = Options::parse(&matches);
            assert_eq!(options.token_file, PathBuf::from("/tmp/session.json"));
            assert_eq!(options.api_url, DEFAULT_BASE_URL);
        });
    }
}
