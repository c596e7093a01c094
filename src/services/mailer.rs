// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Outgoing email via an HTTP mail relay.
//!
//! Delivery is fire-and-forget: account flows never block on (or fail
//! because of) the relay. When the relay is not configured the mailer logs
//! and drops each message, which is the normal mode for local development.

use serde::Serialize;

use crate::config::Config;

/// Mail relay client.
#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
    from: String,
    frontend_url: String,
}

/// Relay request body.
#[derive(Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl Mailer {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            from: config.emails_from.clone(),
            frontend_url: config.frontend_url.clone(),
        }
    }

    /// Send the account verification email for a freshly registered donor.
    pub fn send_new_account_email(&self, to: &str, full_name: &str, token: &str) {
        let link = format!("{}/verify-account?token={}", self.frontend_url, token);
        let subject = format!("Rokto - New account for {full_name}");
        let html = format!(
            "<p>Welcome to Rokto, {full_name}!</p>\
             <p>Confirm your account to appear in donor searches:</p>\
             <p><a href=\"{link}\">{link}</a></p>"
        );

        self.dispatch(to, subject, html);
    }

    /// Send a password recovery email carrying a reset token.
    pub fn send_reset_password_email(&self, to: &str, full_name: &str, token: &str) {
        let link = format!("{}/reset-password?token={}", self.frontend_url, token);
        let subject = format!("Rokto - Password recovery for {full_name}");
        let html = format!(
            "<p>Hello {full_name},</p>\
             <p>We received a request to reset your password. The link below is \
             valid for a limited time:</p>\
             <p><a href=\"{link}\">{link}</a></p>\
             <p>If you did not ask for this, you can ignore this email.</p>"
        );

        self.dispatch(to, subject, html);
    }

    /// Hand a message to the relay on a background task.
    fn dispatch(&self, to: &str, subject: String, html: String) {
        let (Some(api_url), Some(api_key)) = (self.api_url.clone(), self.api_key.clone()) else {
            tracing::info!(to = %to, subject = %subject, "Mail relay not configured, skipping email");
            return;
        };

        let http = self.http.clone();
        let from = self.from.clone();
        let to = to.to_string();

        tokio::spawn(async move {
            let body = OutgoingEmail {
                from: &from,
                to: &to,
                subject: &subject,
                html: &html,
            };

            let result = http
                .post(&api_url)
                .bearer_auth(&api_key)
                .json(&body)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    tracing::info!(to = %to, subject = %subject, "Email handed to relay");
                }
                Ok(response) => {
                    tracing::error!(
                        to = %to,
                        status = %response.status(),
                        "Mail relay rejected email"
                    );
                }
                Err(e) => {
                    tracing::error!(to = %to, error = %e, "Failed to reach mail relay");
                }
            }
        });
    }
}
