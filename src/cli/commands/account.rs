use clap::{Arg, Command};

pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_ME: &str = "me";
pub const CMD_SEND_CONFIRMATION: &str = "send-confirmation";
pub const CMD_CONFIRM: &str = "confirm";
pub const CMD_SEND_PASSWORD_RESET: &str = "send-password-reset";
pub const CMD_RESET_PASSWORD: &str = "reset-password";
pub const CMD_CHANGE_PASSWORD: &str = "change-password";
pub const CMD_STATUS: &str = "status";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_PASSWORD_CONFIRMATION: &str = "password-confirmation";
pub const ARG_CURRENT_PASSWORD: &str = "current-password";
pub const ARG_TOKEN: &str = "token";

fn email() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long("email")
        .help("Account email address")
        .env("MEALPLAN_EMAIL")
        .required(true)
}

fn password() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help("Account password")
        .env("MEALPLAN_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn password_confirmation() -> Arg {
    Arg::new(ARG_PASSWORD_CONFIRMATION)
        .short('c')
        .long("password-confirmation")
        .help("Repeat the password")
        .env("MEALPLAN_PASSWORD_CONFIRMATION")
        .hide_env_values(true)
        .required(true)
}

fn token(help: &'static str, env: &'static str) -> Arg {
    Arg::new(ARG_TOKEN)
        .short('t')
        .long("token")
        .help(help)
        .env(env)
        .hide_env_values(true)
        .required(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account and start a session")
                .arg(email())
                .arg(password())
                .arg(password_confirmation()),
        )
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Log in and store the session token")
                .arg(email())
                .arg(password()),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("End the current session"))
        .subcommand(Command::new(CMD_ME).about("Show the logged-in user"))
        .subcommand(
            Command::new(CMD_SEND_CONFIRMATION)
                .about("Send the email confirmation message again")
                .arg(email()),
        )
        .subcommand(
            Command::new(CMD_CONFIRM)
                .about("Confirm an email address")
                .arg(token(
                    "Confirmation token from the email",
                    "MEALPLAN_CONFIRMATION_TOKEN",
                )),
        )
        .subcommand(
            Command::new(CMD_SEND_PASSWORD_RESET)
                .about("Send a password reset email")
                .arg(email()),
        )
        .subcommand(
            Command::new(CMD_RESET_PASSWORD)
                .about("Set a new password with a reset token")
                .arg(token("Reset token from the email", "MEALPLAN_RESET_TOKEN"))
                .arg(password())
                .arg(password_confirmation()),
        )
        .subcommand(
            Command::new(CMD_CHANGE_PASSWORD)
                .about("Change the password of the logged-in user")
                .arg(
                    Arg::new(ARG_CURRENT_PASSWORD)
                        .long("current-password")
                        .help("Current password")
                        .env("MEALPLAN_CURRENT_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(password())
                .arg(password_confirmation()),
        )
        .subcommand(Command::new(CMD_STATUS).about("Tell whether a session token is stored"))
}
