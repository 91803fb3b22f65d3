use super::{Error, NotificationsApi};
use async_trait::async_trait;
use notifier_wire::NotificationList;

pub struct NotificationsApiConfig {
    /// Address of the server without trailing slash, eg. `http://localhost:3000`.
    pub base_url: String,
    /// JWT sent as bearer token with every request.
    pub token: String,
}

pub struct NotificationsApiImpl {
    config: NotificationsApiConfig,
    http_client: reqwest::Client,
}

impl NotificationsApiImpl {
    pub fn new(config: NotificationsApiConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn ensure_success(response: &reqwest::Response) -> Result<(), Error> {
        let status = response.status();
        match status.is_success() {
            true => Ok(()),
            false => Err(Error::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl NotificationsApi for NotificationsApiImpl {
    async fn list_notifications(
        &self,
        page: u32,
        limit: u32,
        only_unread: bool,
    ) -> Result<NotificationList, Error> {
        let response = self
            .http_client
            .get(format!("{}/api/v1/notifications", self.config.base_url))
            .query(&[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("only_unread", only_unread.to_string()),
            ])
            .bearer_auth(&self.config.token)
            .send()
            .await?;
        Self::ensure_success(&response)?;

        let list = response.json().await?;

        Ok(list)
    }

    async fn mark_notification_read(&self, id: &str) -> Result<(), Error> {
        let response = self
            .http_client
            .put(format!(
                "{}/api/v1/notifications/{id}/read",
                self.config.base_url
            ))
            .bearer_auth(&self.config.token)
            .send()
            .await?;
        Self::ensure_success(&response)
    }

    async fn mark_all_notifications_read(&self) -> Result<(), Error> {
        let response = self
            .http_client
            .put(format!(
                "{}/api/v1/notifications/read",
                self.config.base_url
            ))
            .bearer_auth(&self.config.token)
            .send()
            .await?;
        Self::ensure_success(&response)
    }

    async fn delete_notification(&self, id: &str) -> Result<(), Error> {
        let response = self
            .http_client
            .delete(format!(
                "{}/api/v1/notifications/{id}",
                self.config.base_url
            ))
            .bearer_auth(&self.config.token)
            .send()
            .await?;
        Self::ensure_success(&response)
    }
}
