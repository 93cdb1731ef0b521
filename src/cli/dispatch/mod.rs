//! Maps parsed CLI arguments to the action to run.

use crate::cli::{
    actions::{
        account::{AccountCommand, Args},
        Action,
    },
    commands::{account, api},
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

/// # Errors
/// Returns an error if the subcommand or one of its required arguments is missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let api_opts = api::Options::parse(matches);
    let globals = GlobalArgs::new(api_opts.api_url, api_opts.token_file);

    let (name, sub_m) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;

    let command = match name {
        account::CMD_REGISTER => AccountCommand::Register {
            email: string(sub_m, account::ARG_EMAIL)?,
            password: secret(sub_m, account::ARG_PASSWORD)?,
            password_confirmation: secret(sub_m, account::ARG_PASSWORD_CONFIRMATION)?,
        },
        account::CMD_LOGIN => AccountCommand::Login {
            email: string(sub_m, account::ARG_EMAIL)?,
            password: secret(sub_m, account::ARG_PASSWORD)?,
        },
        account::CMD_LOGOUT => AccountCommand::Logout,
        account::CMD_ME => AccountCommand::Me,
        account::CMD_SEND_CONFIRMATION => AccountCommand::SendConfirmation {
            email: string(sub_m, account::ARG_EMAIL)?,
        },
        account::CMD_CONFIRM => AccountCommand::Confirm {
            token: secret(sub_m, account::ARG_TOKEN)?,
        },
        account::CMD_SEND_PASSWORD_RESET => AccountCommand::SendPasswordReset {
            email: string(sub_m, account::ARG_EMAIL)?,
        },
        account::CMD_RESET_PASSWORD => AccountCommand::ResetPassword {
            token: secret(sub_m, account::ARG_TOKEN)?,
            password: secret(sub_m, account::ARG_PASSWORD)?,
            password_confirmation: secret(sub_m, account::ARG_PASSWORD_CONFIRMATION)?,
        },
        account::CMD_CHANGE_PASSWORD => AccountCommand::ChangePassword {
            current_password: secret(sub_m, account::ARG_CURRENT_PASSWORD)?,
            password: secret(sub_m, account::ARG_PASSWORD)?,
            password_confirmation: secret(sub_m, account::ARG_PASSWORD_CONFIRMATION)?,
        },
        account::CMD_STATUS => AccountCommand::Status,
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(Action::Account(Args { globals, command }))
}

fn string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    string(matches, id).map(SecretString::from)
}
