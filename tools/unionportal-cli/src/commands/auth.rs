//! Registration and login against the portal backend.

use clap::Subcommand;
use unionportal_client::{
    AuthResponse, LoginRequest, PortalClient, QuickRegisterRequest, SetPasswordRequest,
    VerifyCodeRequest,
};
use unionportal_common::config::AppConfig;

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Register with name and e-mail; a verification code is sent
    QuickRegister {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,
    },

    /// Confirm the e-mailed verification code
    VerifyCode {
        #[arg(long)]
        email: String,

        #[arg(long)]
        code: String,
    },

    /// Set the account password after verification
    SetPassword {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Token returned by verify-code
        #[arg(long)]
        token: Option<String>,
    },

    /// Log in and print the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

pub async fn run(config: &AppConfig, action: AuthCommand) -> anyhow::Result<()> {
    let client = PortalClient::from_config(&config.portal);
    tracing::debug!(base_url = client.base_url(), "Using portal backend");

    let result = match action {
        AuthCommand::QuickRegister {
            first_name,
            last_name,
            email,
            phone,
        } => {
            client
                .quick_register(&QuickRegisterRequest {
                    first_name,
                    last_name,
                    email,
                    phone,
                })
                .await
        }
        AuthCommand::VerifyCode { email, code } => {
            client.verify_code(&VerifyCodeRequest { email, code }).await
        }
        AuthCommand::SetPassword {
            email,
            password,
            token,
        } => {
            client
                .set_password(&SetPasswordRequest {
                    email,
                    password,
                    token,
                })
                .await
        }
        AuthCommand::Login { email, password } => {
            client.login(&LoginRequest { email, password }).await
        }
    };

    match result {
        Ok(response) => {
            print_response(&response)?;
            Ok(())
        }
        Err(e) => {
            println!("[ERROR] {e}");
            Err(e.into())
        }
    }
}

fn print_response(response: &AuthResponse) -> anyhow::Result<()> {
    if let Some(message) = &response.message {
        println!("{message}");
    }
    if let Some(token) = &response.token {
        println!("Token: {token}");
    }
    if let Some(user) = &response.user {
        println!("User: {}", serde_json::to_string_pretty(user)?);
    }
    if !response.extra.is_empty() {
        println!("{}", serde_json::to_string_pretty(&response.extra)?);
    }
    Ok(())
}
