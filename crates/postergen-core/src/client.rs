use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::*;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

const USER_AGENT: &str = "postergen/0.1";

const TEMPLATE_FORMAT_ERROR: &str = "Template data from the API is not in the expected format.";
const LOGO_FORMAT_ERROR: &str = "Logo data from the API is not in the expected format.";
const PDF_URL_FORMAT_ERROR: &str = "PDF URL not found in the server response.";
const UNKNOWN_NETWORK_ERROR: &str = "An unknown network error occurred.";
const GENERIC_SERVER_ERROR: &str = "The server returned an error.";

/// Client for the poster backend. Holds no per-call state; clone freely and
/// use concurrently.
#[derive(Clone)]
pub struct PosterClient {
    http: Client,
    api_base: Url,
    file_base: String,
}

impl PosterClient {
    pub fn new(config: Config) -> Result<Self> {
        // Relative joins drop the last path segment unless the base ends
        // with a slash.
        let mut raw = config.api_base_url;
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let api_base = raw
            .parse::<Url>()
            .map_err(|err| Error::InvalidConfig(format!("invalid api base url: {err}")))?;
        let file_base = config.file_base_url.trim_end_matches('/').to_string();

        let http = Client::builder()
            .timeout(Duration::from_secs(180))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| Error::InvalidConfig(format!("failed to build client: {err}")))?;

        Ok(Self {
            http,
            api_base,
            file_base,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Absolute link for a server-supplied relative artifact path. The path
    /// is concatenated as-is, not validated.
    pub fn file_url(&self, relative: &str) -> String {
        format!("{}/{}", self.file_base, relative)
    }

    /// Fetch the catalog of poster templates, with embedded
    /// `required_fields` / `customization_data` decoded into structured
    /// values. Order is preserved from the server response.
    pub async fn fetch_templates(&self) -> Result<Vec<Template>> {
        let payload = self
            .request(Method::GET, "posters/templates", None, Option::<&()>::None)
            .await?;
        let records = payload
            .pointer("/listdatapayload/data")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Format(TEMPLATE_FORMAT_ERROR.into()))?;
        records
            .iter()
            .map(|record| Ok(serde_json::from_value(record.clone())?))
            .collect()
    }

    /// Fetch the predefined logo library. Elements pass through untouched;
    /// only the container shape is checked.
    pub async fn fetch_logos(&self) -> Result<Vec<Logo>> {
        let payload = self
            .request(Method::GET, "logos", None, Option::<&()>::None)
            .await?;
        let logos = payload
            .pointer("/datapayload/data")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Format(LOGO_FORMAT_ERROR.into()))?;
        Ok(logos.clone())
    }

    /// Submit a generation request and resolve the returned relative
    /// artifact path against the file-server origin.
    pub async fn generate_poster(
        &self,
        template_id: u64,
        business_name: &str,
        data: Map<String, Value>,
        customization_data: Map<String, Value>,
    ) -> Result<GeneratedPoster> {
        let body = GenerationRequest {
            business_name: business_name.to_string(),
            data,
            customization_data,
        };
        let query = vec![("template_id".to_string(), template_id.to_string())];
        let payload = self
            .request(Method::POST, "posters/generate", Some(query), Some(&body))
            .await?;

        // The path must be a non-empty string, not merely present.
        let relative = match payload.pointer("/datapayload/data/pdf_url") {
            Some(Value::String(path)) if !path.is_empty() => path,
            _ => return Err(Error::Format(PDF_URL_FORMAT_ERROR.into())),
        };
        Ok(GeneratedPoster {
            pdf_url: self.file_url(relative),
        })
    }

    async fn request<B>(
        &self,
        method: Method,
        path: &str,
        query: Option<Vec<(String, String)>>,
        body: Option<&B>,
    ) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let mut url = self
            .api_base
            .join(path)
            .map_err(|err| Error::InvalidConfig(format!("invalid url: {err}")))?;
        if let Some(q) = &query {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in q {
                pairs.append_pair(key, value);
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut req = self.http.request(method, url).headers(headers);
        if let Some(b) = body {
            req = req.json(b);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status.is_success() {
            // A malformed success body stays a parse error; only non-2xx
            // statuses become Api errors.
            return Ok(serde_json::from_str(&text)?);
        }

        let message = match serde_json::from_str::<Value>(&text) {
            Err(_) => UNKNOWN_NETWORK_ERROR.to_string(),
            // An empty message is as useless as a missing one.
            Ok(body) => body
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string()),
        };
        Err(Error::Api { status, message })
    }
}
