use crate::constants::{
    DEFAULT_SHARE_NAME, HEADER_API_KEY, HEADER_DELIVERY_KEY, REQUEST_TIMEOUT, USER_AGENT,
};
use crate::error::{ShareError, ShareResult};
use crate::models::{ConfigFetch, Group, PendingSelection, ShareContent, SubmitOutcome};
use reqwest::multipart;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Client for the share negotiation protocol. Owns a single pooled HTTP
/// client with the product user agent and 20 second timeouts; construct
/// one at startup and share it across calls.
pub struct ShareClient {
    http: reqwest::Client,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigBody {
    name: Option<String>,
    icon: Option<String>,
    endpoint: Option<String>,
    delivery_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroupChoiceBody {
    #[serde(default)]
    share_id: String,
    #[serde(default)]
    groups: Vec<WireGroup>,
}

/// A group as the server sends it in a 202 body. `id` and `name` are
/// required there; only client-side proposed groups lack an id.
#[derive(Debug, Deserialize)]
struct WireGroup {
    id: String,
    name: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<WireGroup> for Group {
    fn from(wire: WireGroup) -> Self {
        Group {
            id: Some(wire.id),
            name: wire.name,
            icon: wire.icon.filter(|s| !s.is_empty()),
            description: wire.description.filter(|s| !s.is_empty()),
        }
    }
}

/// URLs to try for a configuration fetch. A scheme-qualified address is
/// used verbatim; a bare host gets one HTTPS attempt, then one HTTP
/// attempt.
fn candidate_urls(raw_url: &str) -> Vec<String> {
    let lower = raw_url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        vec![raw_url.to_string()]
    } else {
        vec![format!("https://{raw_url}"), format!("http://{raw_url}")]
    }
}

impl ShareClient {
    pub fn new() -> ShareResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .read_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT.as_str())
            .build()?;

        Ok(Self { http })
    }

    /// Fetch the share configuration from `raw_url`, trying HTTPS before
    /// HTTP when the address has no scheme. The first success wins; when
    /// every attempt fails the error of the last attempt is returned, so
    /// for a bare host the HTTP failure shadows the HTTPS one.
    pub async fn fetch_configuration(
        &self,
        raw_url: &str,
        api_key: Option<&str>,
    ) -> ShareResult<ConfigFetch> {
        let mut last_error = None;

        for url in candidate_urls(raw_url) {
            match self.fetch_configuration_once(&url, api_key).await {
                Ok(fetch) => return Ok(fetch),
                Err(e) => {
                    debug!("Configuration fetch against {} failed: {}", url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| ShareError::Protocol("No configuration URL given".to_string())))
    }

    async fn fetch_configuration_once(
        &self,
        url: &str,
        api_key: Option<&str>,
    ) -> ShareResult<ConfigFetch> {
        let mut request = self.http.get(url);
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            request = request.header(HEADER_API_KEY, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ShareError::from_status(status));
        }

        let body: ConfigBody = serde_json::from_str(&response.text().await?)?;

        Ok(ConfigFetch {
            name: body
                .name
                .unwrap_or_else(|| DEFAULT_SHARE_NAME.to_string()),
            icon: body.icon.unwrap_or_default(),
            endpoint: body.endpoint.unwrap_or_else(|| url.to_string()),
            delivery_key: body.delivery_key.unwrap_or_default(),
            config_url: url.to_string(),
        })
    }

    /// Submit shared content to the configured endpoint. Text goes as a
    /// JSON document, an image as a multipart form. A 200 means the share
    /// is delivered; a 202 means the server parked it pending a group
    /// choice.
    pub async fn submit_content(
        &self,
        endpoint: &str,
        content: &ShareContent,
        delivery_key: Option<&str>,
    ) -> ShareResult<SubmitOutcome> {
        let timestamp = chrono::Utc::now().timestamp_millis();

        let request = match content {
            ShareContent::Text {
                text,
                title,
                subject,
            } => {
                let mut body = serde_json::Map::new();
                body.insert("text".to_string(), json!(text));
                if let Some(title) = title.as_deref().filter(|t| !t.is_empty()) {
                    body.insert("title".to_string(), json!(title));
                }
                if let Some(subject) = subject.as_deref().filter(|s| !s.is_empty()) {
                    body.insert("subject".to_string(), json!(subject));
                }
                body.insert("type".to_string(), json!("text"));
                body.insert("timestamp".to_string(), json!(timestamp));

                self.http
                    .post(endpoint)
                    .json(&serde_json::Value::Object(body))
            }
            ShareContent::Image {
                bytes,
                file_name,
                mime_type,
                text,
                title,
                subject,
            } => {
                let image = multipart::Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)?;

                let mut form = multipart::Form::new().part("image", image);
                if let Some(text) = text.as_deref().filter(|t| !t.is_empty()) {
                    form = form.text("text", text.to_string());
                }
                if let Some(title) = title.as_deref().filter(|t| !t.is_empty()) {
                    form = form.text("title", title.to_string());
                }
                if let Some(subject) = subject.as_deref().filter(|s| !s.is_empty()) {
                    form = form.text("subject", subject.to_string());
                }
                form = form
                    .text("type", "image")
                    .text("timestamp", timestamp.to_string());

                self.http.post(endpoint).multipart(form)
            }
        };

        let request = match delivery_key.filter(|k| !k.is_empty()) {
            Some(key) => request.header(HEADER_DELIVERY_KEY, key),
            None => request,
        };

        let response = request.send().await?;
        Self::interpret_submit_response(response).await
    }

    async fn interpret_submit_response(response: reqwest::Response) -> ShareResult<SubmitOutcome> {
        let status = response.status();
        match status.as_u16() {
            200 => Ok(SubmitOutcome::Delivered),
            202 => {
                let body: GroupChoiceBody = serde_json::from_str(&response.text().await?)?;

                if body.share_id.is_empty() {
                    return Err(ShareError::Protocol("No share_id provided".to_string()));
                }
                if body.groups.is_empty() {
                    return Err(ShareError::Protocol("No groups provided".to_string()));
                }

                Ok(SubmitOutcome::GroupChoiceNeeded(PendingSelection {
                    share_id: body.share_id,
                    groups: body.groups.into_iter().map(Group::from).collect(),
                }))
            }
            _ => Err(ShareError::from_status(status)),
        }
    }

    /// Route a parked share into a group: an existing group by id, or a
    /// proposed group by name with a null id. A 202 here would mean the
    /// server asked for a group choice again; that is a protocol
    /// violation and is surfaced as an error rather than recursed into.
    pub async fn submit_group_selection(
        &self,
        endpoint: &str,
        share_id: &str,
        group: &Group,
        delivery_key: Option<&str>,
    ) -> ShareResult<()> {
        let body = match &group.id {
            Some(id) => json!({ "share_id": share_id, "group_id": id }),
            None => json!({
                "share_id": share_id,
                "group_id": null,
                "group_name": group.name,
            }),
        };

        let mut request = self.http.post(endpoint).json(&body);
        if let Some(key) = delivery_key.filter(|k| !k.is_empty()) {
            request = request.header(HEADER_DELIVERY_KEY, key);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.as_u16() == 202 {
            return Err(ShareError::Protocol(
                "Unexpected group choice in response to a group selection".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(ShareError::from_status(status));
        }

        Ok(())
    }
}
