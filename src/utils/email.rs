//! Notification dispatch over SMTP.
//!
//! All sends are best-effort: state transitions in the workflow never depend
//! on delivery. Callers spawn these from a background task and log failures.

use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

use crate::config::email::EmailConfig;
use praxeum_core::AppError;
use praxeum_models::enums::RequestKind;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Notify the requesting teacher that staff decided their request.
    #[instrument(skip(self))]
    pub async fn send_decision_notice(
        &self,
        to_email: &str,
        to_name: &str,
        kind: RequestKind,
        approved: bool,
        reason: Option<&str>,
    ) -> Result<(), AppError> {
        let outcome = if approved { "approved" } else { "rejected" };
        let subject = format!("Your {} request was {}", kind_label(kind), outcome);

        let mut text_body = format!(
            "Hi {},\n\nYour {} request has been {}.\n",
            to_name,
            kind_label(kind),
            outcome
        );
        if let Some(reason) = reason {
            text_body.push_str(&format!("\nReason: {}\n", reason));
        }
        text_body.push_str("\nBest regards,\nPraxeum Team");

        let html_body = self.simple_template(to_name, &subject, reason);

        self.send_email(to_email, &subject, &text_body, &html_body)
            .await
    }

    /// Notify a nominated replacement teacher that a swap awaits their
    /// confirmation.
    #[instrument(skip(self))]
    pub async fn send_swap_nomination(
        &self,
        to_email: &str,
        to_name: &str,
        class_name: &str,
        session_date: &str,
    ) -> Result<(), AppError> {
        let subject = "You have been nominated for a session swap".to_string();
        let detail = format!(
            "You were nominated to take over {} on {}. Please confirm or decline in the app.",
            class_name, session_date
        );
        let text_body = format!("Hi {},\n\n{}\n\nBest regards,\nPraxeum Team", to_name, detail);
        let html_body = self.simple_template(to_name, &subject, Some(&detail));

        self.send_email(to_email, &subject, &text_body, &html_body)
            .await
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::debug!(to = %to_email, subject = %subject, "Email disabled, skipping send");
            return Ok(());
        }

        let message = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from address: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid to address: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::internal(anyhow::anyhow!("SMTP relay error: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            ))
            .build();

        mailer
            .send(&message)
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn simple_template(&self, name: &str, headline: &str, detail: Option<&str>) -> String {
        format!(
            r#"<html><body style="font-family: sans-serif;">
<h2>{}</h2>
<p>Hi {},</p>
{}
<p>Best regards,<br/>{} Team</p>
</body></html>"#,
            headline,
            name,
            detail
                .map(|d| format!("<p>{}</p>", d))
                .unwrap_or_default(),
            self.config.from_name
        )
    }
}

fn kind_label(kind: RequestKind) -> &'static str {
    match kind {
        RequestKind::Reschedule => "reschedule",
        RequestKind::Swap => "session swap",
        RequestKind::ModalityChange => "modality change",
    }
}
