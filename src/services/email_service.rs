// src/services/email_service.rs
// DOCUMENTATION: Verification email delivery over SMTP
// PURPOSE: Build and send verification links; log them when SMTP is not configured

use crate::config::Config;
use crate::errors::TravelError;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

const VERIFICATION_SUBJECT: &str = "Please verify your email address";

pub struct EmailService {
    /// None when SMTP credentials are missing
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    app_base_url: String,
}

impl EmailService {
    pub fn from_config(config: &Config) -> Result<Self, TravelError> {
        let transport = if config.email_enabled() {
            let creds = Credentials::new(config.email_user.clone(), config.email_pass.clone());
            let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| {
                    TravelError::EmailError(format!("Failed to create SMTP transport: {}", e))
                })?
                .credentials(creds)
                .port(config.smtp_port)
                .build();
            Some(transport)
        } else {
            None
        };

        Ok(Self {
            transport,
            from: config.email_from.clone(),
            app_base_url: config.app_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Link the user follows to confirm their address
    pub fn verification_url(&self, token: &str) -> String {
        format!("{}/verify/{}", self.app_base_url, token)
    }

    pub fn build_verification_message(&self, to: &str, token: &str) -> Result<Message, TravelError> {
        let url = self.verification_url(token);
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| TravelError::EmailError(format!("Invalid from address: {}", e)))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| TravelError::EmailError(format!("Invalid to address: {}", e)))?;

        let text = format!("Click the following link to verify your email: {}", url);
        let html = format!(
            "<p>Click the following link to verify your email: <a href=\"{}\">Verify Email</a></p>",
            url
        );

        Message::builder()
            .from(from)
            .to(to)
            .subject(VERIFICATION_SUBJECT)
            .multipart(MultiPart::alternative_plain_html(text, html))
            .map_err(|e| TravelError::EmailError(format!("Failed to build email: {}", e)))
    }

    pub async fn send_verification_email(&self, to: &str, token: &str) -> Result<(), TravelError> {
        let Some(transport) = &self.transport else {
            log::info!(
                "SMTP not configured; verification link for {}: {}",
                to,
                self.verification_url(token)
            );
            return Ok(());
        };

        let message = self.build_verification_message(to, token)?;
        let response = transport
            .send(message)
            .await
            .map_err(|e| TravelError::EmailError(format!("Failed to send email: {}", e)))?;

        log::info!(
            "Verification email sent to {} ({})",
            to,
            response.code()
        );
        Ok(())
    }

    /// Send in the background; failures are only logged
    pub fn dispatch_verification_email(self: &Arc<Self>, to: String, token: String) {
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = service.send_verification_email(&to, &token).await {
                log::error!("Error sending verification email to {}: {}", to, e);
            }
        });
    }
}
