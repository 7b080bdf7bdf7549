use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::application::Application;
use crate::models::vacancy::Vacancy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Transactional email API client: `POST {from, to, subject, html}`.
#[derive(Clone)]
pub struct EmailApiMailer {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl EmailApiMailer {
    pub fn new(client: Client, url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            url,
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for EmailApiMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let mut request = self.client.post(&self.url).json(message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let res = request.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Email API error {}: {}", status, text)));
        }
        Ok(())
    }
}

/// Status-change emails. Delivery is best-effort: failures are logged and
/// the triggering operation still succeeds.
#[derive(Clone)]
pub struct NotificationService {
    mailer: Option<Arc<dyn Mailer>>,
    from: String,
}

impl NotificationService {
    pub fn new(mailer: Option<Arc<dyn Mailer>>, from: String) -> Self {
        Self { mailer, from }
    }

    /// Email is disabled when no API URL is configured.
    pub fn from_config(config: &Config, client: Client) -> Self {
        let mailer = config.email_api_url.clone().map(|url| {
            Arc::new(EmailApiMailer::new(client, url, config.email_api_key.clone()))
                as Arc<dyn Mailer>
        });
        Self::new(mailer, config.email_from.clone())
    }

    pub async fn vacancy_status_changed(&self, vacancy: &Vacancy) {
        let subject = format!("Your vacancy \"{}\" was {}", vacancy.title, vacancy.status);
        let html = format!(
            "<p>Hello,</p><p>Your vacancy <strong>{}</strong> at {} has been <strong>{}</strong>.</p>",
            escape_html(&vacancy.title),
            escape_html(&vacancy.company),
            escape_html(&vacancy.status),
        );
        self.deliver(vacancy.poster_email.as_deref(), subject, html)
            .await;
    }

    pub async fn application_status_changed(&self, application: &Application, vacancy_title: &str) {
        let subject = format!("Update on your application for \"{}\"", vacancy_title);
        let html = format!(
            "<p>Hello,</p><p>Your application for <strong>{}</strong> is now <strong>{}</strong>.</p>",
            escape_html(vacancy_title),
            escape_html(&application.status),
        );
        self.deliver(application.applicant_email.as_deref(), subject, html)
            .await;
    }

    async fn deliver(&self, to: Option<&str>, subject: String, html: String) {
        let Some(mailer) = &self.mailer else {
            debug!("Email disabled; skipping notification");
            return;
        };
        let Some(to) = to.filter(|t| !t.trim().is_empty()) else {
            debug!(%subject, "No recipient address; skipping notification");
            return;
        };

        let message = EmailMessage {
            from: self.from.clone(),
            to: to.to_string(),
            subject,
            html,
        };
        match mailer.send(&message).await {
            Ok(()) => info!(to = %message.to, "Notification sent"),
            Err(e) => warn!(error = %e, to = %message.to, "Failed to send notification"),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn vacancy(poster_email: Option<&str>) -> Vacancy {
        Vacancy {
            id: Uuid::new_v4(),
            title: "Chef <Head>".into(),
            company: "Bistro".into(),
            location: "Paris".into(),
            employment_type: None,
            salary_from: None,
            salary_to: None,
            currency: None,
            description: None,
            requirements: None,
            contact_email: None,
            status: "approved".into(),
            posted_by: Uuid::new_v4(),
            poster_email: poster_email.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sends_an_escaped_email_to_the_poster() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|m| {
                m.to == "poster@example.com"
                    && m.from == "no-reply@example.com"
                    && m.html.contains("Chef &lt;Head&gt;")
                    && m.html.contains("approved")
            })
            .times(1)
            .returning(|_| Ok(()));
        let service =
            NotificationService::new(Some(Arc::new(mailer)), "no-reply@example.com".into());

        service
            .vacancy_status_changed(&vacancy(Some("poster@example.com")))
            .await;
    }

    #[tokio::test]
    async fn skips_recipients_without_an_address() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);
        let service = NotificationService::new(Some(Arc::new(mailer)), "x@example.com".into());

        service.vacancy_status_changed(&vacancy(None)).await;
    }

    #[tokio::test]
    async fn delivery_failures_do_not_propagate() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(Error::Upstream("503".into())));
        let service = NotificationService::new(Some(Arc::new(mailer)), "x@example.com".into());

        service
            .vacancy_status_changed(&vacancy(Some("poster@example.com")))
            .await;
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
