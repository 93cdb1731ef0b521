use crate::cli::{
    actions::Action,
    commands::{self, logging::LogOptions},
    dispatch, telemetry,
};
use anyhow::Result;

/// Parse the command line, install logging and resolve the action to run.
///
/// # Errors
///
/// Returns an error if logging cannot be initialized or the arguments do not
/// form a valid action.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let log = LogOptions::parse(&matches);
    telemetry::init(log.level, log.json)?;

    dispatch::handler(&matches)
}
