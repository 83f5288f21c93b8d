// Hand-crafted async HTTP client for the generative-language provider.
//
// Base path: https://generativelanguage.googleapis.com/v1beta/
// Auth: `key` query parameter, attached to every request addressed to the
// configured base URL (requests elsewhere are left untouched).

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::models::{ErrorEnvelope, GenerateRequest, GenerateResponse, ModelInfo, ModelsPage};
use crate::transport::TransportConfig;

/// Public endpoint of the provider.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Async client for the provider's model listing and generation endpoints.
pub struct GenerativeClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl GenerativeClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    pub fn from_api_key(
        base_url: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http, api_key)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        api_key: &SecretString,
    ) -> Result<Self, Error> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(Error::MissingApiKey);
        }
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.clone(),
        })
    }

    /// Ensure the base URL ends with `/` so relative joins keep its path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"models"`) onto the base URL and
    /// authorize it.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let mut url = self.base_url.join(path)?;
        self.authorize(&mut url);
        Ok(url)
    }

    /// Append the `key` query parameter when `url` targets the provider
    /// and does not already carry one.
    pub(crate) fn authorize(&self, url: &mut Url) {
        if !url.as_str().starts_with(self.base_url.as_str()) {
            return;
        }
        if url.query_pairs().any(|(k, _)| k == "key") {
            return;
        }
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
    }

    /// URL with the key redacted, for logging.
    fn redacted(url: &Url) -> String {
        let mut shown = url.clone();
        shown.set_query(None);
        shown.to_string()
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List every model the key can see, following `nextPageToken`.
    ///
    /// `GET /models`
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, Error> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.url("models")?;
            if let Some(ref token) = page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }
            let page: ModelsPage = self.get(url).await?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = models.len(), "listed provider models");
        Ok(models)
    }

    /// Run a single generation call.
    ///
    /// `POST /models/{id}:generateContent`. A leading `models/` on the id
    /// is tolerated.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, Error> {
        let id = model.strip_prefix("models/").unwrap_or(model);
        let url = self.url(&format!("models/{id}:generateContent"))?;
        let resp: GenerateResponse = self.post(url, request).await?;

        if let Some(err) = resp.error {
            return Err(Error::Provider {
                status: 200,
                code: err.code,
                message: err.message.unwrap_or_else(|| "provider returned an error".into()),
            });
        }
        Ok(resp)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", Self::redacted(&url));

        let resp = self.http.get(url).send().await.map_err(Self::transport)?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("POST {}", Self::redacted(&url));

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Transport errors carry the request URL, which holds the key.
    fn transport(err: reqwest::Error) -> Error {
        Error::Transport(err.without_url())
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Self::transport)?;

        if !status.is_success() {
            return Err(Self::parse_error(status, body));
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    fn parse_error(status: reqwest::StatusCode, raw: String) -> Error {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&raw) {
            Error::Provider {
                status: status.as_u16(),
                code: envelope.error.code,
                message: envelope.error.message.unwrap_or_else(|| status.to_string()),
            }
        } else {
            Error::Provider {
                status: status.as_u16(),
                code: None,
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> GenerativeClient {
        GenerativeClient::from_reqwest(
            base,
            reqwest::Client::new(),
            &SecretString::from("secret-key".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn key_is_attached_to_provider_urls() {
        let c = client("https://provider.test/v1beta");
        let url = c.url("models").unwrap();
        assert_eq!(url.as_str(), "https://provider.test/v1beta/models?key=secret-key");
    }

    #[test]
    fn existing_key_param_is_kept() {
        let c = client("https://provider.test/v1beta/");
        let mut url = Url::parse("https://provider.test/v1beta/models?key=other").unwrap();
        c.authorize(&mut url);
        assert_eq!(url.query(), Some("key=other"));
    }

    #[test]
    fn foreign_urls_are_left_alone() {
        let c = client("https://provider.test/v1beta/");
        let mut url = Url::parse("https://elsewhere.test/models").unwrap();
        c.authorize(&mut url);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn blank_key_is_rejected() {
        let result = GenerativeClient::from_reqwest(
            DEFAULT_BASE_URL,
            reqwest::Client::new(),
            &SecretString::from("  ".to_string()),
        );
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[test]
    fn error_envelope_is_parsed() {
        let err = GenerativeClient::parse_error(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"code":429,"message":"Resource has been exhausted"}}"#.into(),
        );
        assert!(err.is_quota());
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn quota_message_is_detected_case_insensitively() {
        let err = Error::Provider {
            status: 400,
            code: None,
            message: "You exceeded your current QUOTA".into(),
        };
        assert!(err.is_quota());
    }
}
