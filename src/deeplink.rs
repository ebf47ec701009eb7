use crate::error::{ShareError, ShareResult};
use reqwest::Url;

/// A setup deep link, e.g. from a scanned QR code:
/// `<scheme>://setup?url=<config-url>&key=<api-key>`. Feeding it to the
/// configuration fetch is identical to the user typing the address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupLink {
    pub config_url: String,
    pub api_key: Option<String>,
}

pub fn parse_setup_link(uri: &str) -> ShareResult<SetupLink> {
    let url = Url::parse(uri).map_err(|e| ShareError::Link(e.to_string()))?;

    let mut config_url = None;
    let mut api_key = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "url" => config_url = Some(value.into_owned()),
            "key" => api_key = Some(value.into_owned()),
            _ => {}
        }
    }

    let config_url = config_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ShareError::Link("missing url parameter".to_string()))?;

    Ok(SetupLink {
        config_url,
        api_key: api_key.filter(|k| !k.is_empty()),
    })
}
