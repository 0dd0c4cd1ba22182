use anyhow::Context;
use async_trait::async_trait;

use super::EmailProvider;

pub struct MailgunProvider {
    api_key: String,
    domain: String,
    from: String,
    client: reqwest::Client,
}

impl MailgunProvider {
    pub fn new(api_key: String, domain: String, from: String) -> Self {
        Self {
            api_key,
            domain,
            from,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailProvider for MailgunProvider {
    async fn send_email(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()> {
        let url = format!("https://api.mailgun.net/v3/{}/messages", self.domain);

        self.client
            .post(&url)
            .basic_auth("api", Some(&self.api_key))
            .form(&[
                ("from", self.from.as_str()),
                ("to", to),
                ("subject", subject),
                ("html", html),
            ])
            .send()
            .await
            .context("failed to send email")?
            .error_for_status()
            .context("mail API returned error")?;

        Ok(())
    }
}
