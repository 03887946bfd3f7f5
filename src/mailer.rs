use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::config::SmtpConfig;

/// Outbound notification seam. All business mail goes to the fixed notify
/// address, so the trait only carries subject and body.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, subject: &str, html: String) -> anyhow::Result<()>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)?
            .port(cfg.port)
            .credentials(Credentials::new(cfg.user.clone(), cfg.pass.clone()))
            .build();
        let from: Mailbox = format!("{} <{}>", cfg.from_name, cfg.user).parse()?;
        let to: Mailbox = cfg.notify_to.parse()?;
        Ok(Self {
            transport,
            from,
            to,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, subject: &str, html: String) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)?;
        self.transport.send(message).await?;
        debug!(subject, "notification email sent");
        Ok(())
    }
}

/// Test double that records every send instead of talking SMTP.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, subject: &str, html: String) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), html));
        Ok(())
    }
}

/// Label/value notification body shared by the callback and trip emails.
pub fn notification_html(title: &str, fields: &[(&str, String)]) -> String {
    let rows: String = fields
        .iter()
        .map(|(label, value)| {
            format!(
                "<tr><td style=\"padding:10px 0;border-bottom:1px solid #f0f0f0;\">\
                 <strong>{}:</strong> <span>{}</span></td></tr>",
                label, value
            )
        })
        .collect();
    format!(
        "<!DOCTYPE html><html lang=\"en\"><body style=\"font-family:Arial,sans-serif;\">\
         <h2>Banaja Travels</h2><p>{}</p>\
         <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">{}</table>\
         <p style=\"font-size:12px;color:#888;\">This is an automated notification from \
         Banaja Travels. Please do not reply to this email.</p>\
         </body></html>",
        title, rows
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_html_renders_every_field() {
        let html = notification_html(
            "New Callback Request",
            &[
                ("Phone", "+91 9876543210".to_string()),
                ("Country", "India".to_string()),
                ("Location", "N/A".to_string()),
            ],
        );
        assert!(html.contains("New Callback Request"));
        assert!(html.contains("Phone"));
        assert!(html.contains("+91 9876543210"));
        assert!(html.contains("Country"));
        assert!(html.contains("India"));
        assert!(html.contains("N/A"));
    }
}
