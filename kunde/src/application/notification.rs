use std::sync::Arc;

use acme_application::mail::{MailMessage, Mailer, SendResult};
use acme_domain::entity::Entity;

use crate::domain::Kunde;

/// 新客户的邮件通知；发送失败只记录日志
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    to: String,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn message(&self, kunde: &Kunde) -> MailMessage {
        MailMessage::builder()
            .from(self.from.as_str())
            .to(self.to.as_str())
            .subject(format!("Neuer Kunde {}", kunde.id()))
            .html_body(format!("<b>Neuer Kunde:</b> <i>{}</i>", kunde.nachname))
            .build()
    }

    pub async fn kunde_created(&self, kunde: &Kunde) {
        let message = self.message(kunde);
        match self.mailer.send(&message).await {
            SendResult::Success => tracing::debug!(id = %kunde.id(), "mail sent"),
            SendResult::SendError(reason) => {
                tracing::warn!(id = %kunde.id(), reason = %reason, "mail not sent")
            }
            SendResult::AuthenticationError(reason) => {
                tracing::warn!(id = %kunde.id(), reason = %reason, "mail server rejected credentials")
            }
        }
    }
}
