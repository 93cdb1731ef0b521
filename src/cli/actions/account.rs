use crate::{
    auth::{
        AuthClient, Credentials, PasswordChange, PasswordResetRequest, PasswordUpdate,
        SignupCredentials, User,
    },
    cli::globals::GlobalArgs,
    forms::{SigninForm, SignupForm},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

#[derive(Debug)]
pub enum AccountCommand {
    Register {
        email: String,
        password: SecretString,
        password_confirmation: SecretString,
    },
    Login {
        email: String,
        password: SecretString,
    },
    Logout,
    Me,
    SendConfirmation {
        email: String,
    },
    Confirm {
        token: SecretString,
    },
    SendPasswordReset {
        email: String,
    },
    ResetPassword {
        token: SecretString,
        password: SecretString,
        password_confirmation: SecretString,
    },
    ChangePassword {
        current_password: SecretString,
        password: SecretString,
        password_confirmation: SecretString,
    },
    Status,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: AccountCommand,
}

/// Run one account command against the auth API and print the outcome.
/// # Errors
/// Returns an error if the client cannot be built or the call fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!(
        "api url: {}, token file: {}",
        args.globals.api_url,
        args.globals.token_file.display()
    );

    let client = args
        .globals
        .client()
        .context("failed to initialize auth client")?;

    let output = run(&client, args.command).await?;

    println!("{output}");

    Ok(())
}

/// Executes the command and returns the text to print.
async fn run(client: &AuthClient, command: AccountCommand) -> Result<String> {
    match command {
        AccountCommand::Register {
            email,
            password,
            password_confirmation,
        } => {
            let credentials = SignupCredentials::new(
                email,
                password.expose_secret(),
                password_confirmation.expose_secret(),
            );
            let user = SignupForm::new(client).submit(&credentials).await?;
            render_user(&user)
        }
        AccountCommand::Login { email, password } => {
            let credentials = Credentials::new(email, password.expose_secret());
            let user = SigninForm::new(client).submit(&credentials).await?;
            render_user(&user)
        }
        AccountCommand::Logout => {
            client.logout().await?;
            Ok("Logged out".to_string())
        }
        AccountCommand::Me => {
            let user = client.current_user().await?;
            render_user(&user)
        }
        AccountCommand::SendConfirmation { email } => {
            client.send_confirmation(&email).await?;
            Ok(format!("Confirmation email sent to {email}"))
        }
        AccountCommand::Confirm { token } => {
            let user = client.confirm_email(token.expose_secret()).await?;
            render_user(&user)
        }
        AccountCommand::SendPasswordReset { email } => {
            client
                .send_password_reset(&PasswordResetRequest {
                    email: email.clone(),
                })
                .await?;
            Ok(format!("Password reset email sent to {email}"))
        }
        AccountCommand::ResetPassword {
            token,
            password,
            password_confirmation,
        } => {
            let update = PasswordUpdate {
                reset_password_token: token.expose_secret().to_string(),
                password: password.expose_secret().to_string(),
                password_confirmation: password_confirmation.expose_secret().to_string(),
            };
            let user = client.reset_password(&update).await?;
            render_user(&user)
        }
        AccountCommand::ChangePassword {
            current_password,
            password,
            password_confirmation,
        } => {
            let change = PasswordChange {
                current_password: current_password.expose_secret().to_string(),
                password: password.expose_secret().to_string(),
                password_confirmation: password_confirmation.expose_secret().to_string(),
            };
            let user = client.change_password(&change).await?;
            render_user(&user)
        }
        AccountCommand::Status => Ok(if client.is_authenticated() {
            "authenticated".to_string()
        } else {
            "not authenticated".to_string()
        }),
    }
}

fn render_user(user: &User) -> Result<String> {
    serde_json::to_string_pretty(user).context("failed to encode user")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::{MemoryTokenStore, TokenStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn status_reports_session() {
        let store = Arc::new(MemoryTokenStore::new());
        // Unroutable on purpose: status must not touch the network.
        let client = AuthClient::new(Some("http://127.0.0.1:9"), store.clone()).unwrap();

        assert_eq!(
            run(&client, AccountCommand::Status).await.unwrap(),
            "not authenticated"
        );

        store.set_token("token").unwrap();
        assert_eq!(
            run(&client, AccountCommand::Status).await.unwrap(),
            "authenticated"
        );
    }

    #[tokio::test]
    async fn me_without_session_fails_locally() {
        let client =
            AuthClient::new(Some("http://127.0.0.1:9"), Arc::new(MemoryTokenStore::new())).unwrap();

        let err = run(&client, AccountCommand::Me).await.unwrap_err();
        assert_eq!(err.to_string(), crate::auth::NOT_AUTHENTICATED_MESSAGE);
    }

    #[tokio::test]
    async fn register_mismatch_fails_locally() {
        let client =
            AuthClient::new(Some("http://127.0.0.1:9"), Arc::new(MemoryTokenStore::new())).unwrap();

        let err = run(
            &client,
            AccountCommand::Register {
                email: "cook@mealplan.dev".to_string(),
                password: SecretString::from("secret-1".to_string()),
                password_confirmation: SecretString::from("secret-2".to_string()),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), crate::forms::PASSWORD_MISMATCH_MESSAGE);
    }

    #[test]
    fn render_user_is_json() {
        let user = User {
            id: 7,
            email: "cook@mealplan.dev".to_string(),
            confirmed: true,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-02T00:00:00Z".to_string(),
        };
        let rendered: serde_json::Value = serde_json::from_str(&render_user(&user).unwrap()).unwrap();
        assert_eq!(rendered["id"], 7);
        assert_eq!(rendered["confirmed"], true);
    }
}
