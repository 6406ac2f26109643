//! Blocking HTTP transport: engine selection, proxies, verbs, and response
//! decoding.
//!
//! Every call opens a fresh connection scoped to that request; nothing is
//! pooled or reused between calls. Responses with a non-success status are
//! surfaced as [`Error::Http`] with the original status and body, without
//! retry.

use std::env;
use std::io::Cursor;

use log::debug;
use reqwest::Method;
use reqwest::blocking::multipart::{Form, Part};

use crate::error::Error;
use crate::table::Series;

/// Production engine base URL.
pub const ENGINE_URL: &str = "https://engine.energytransitionmodel.com/api/v3";

/// Beta engine base URL, an alternate deployment with potentially different
/// data than production.
pub const BETA_ENGINE_URL: &str = "https://beta-engine.energytransitionmodel.com/api/v3";

/// Response decoding mode, selected by the caller per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoder {
    /// Parse the body as JSON into a [`serde_json::Value`].
    #[default]
    Json,
    /// Return the body as decoded text.
    Text,
    /// Return the body as a seekable in-memory byte stream.
    Bytes,
}

/// A decoded response body.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Structured data, from [`Decoder::Json`].
    Json(serde_json::Value),
    /// Plain text, from [`Decoder::Text`].
    Text(String),
    /// Seekable bytes, from [`Decoder::Bytes`].
    Bytes(Cursor<Vec<u8>>),
}

impl Payload {
    /// Consumes the payload as JSON.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if the payload was requested with a
    /// different decoder.
    pub fn into_json(self) -> Result<serde_json::Value, Error> {
        match self {
            Self::Json(value) => Ok(value),
            other => Err(Error::Decode(format!(
                "expected a JSON payload, got {}",
                other.kind()
            ))),
        }
    }

    /// Consumes the payload as text.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if the payload was requested with a
    /// different decoder.
    pub fn into_text(self) -> Result<String, Error> {
        match self {
            Self::Text(text) => Ok(text),
            other => Err(Error::Decode(format!(
                "expected a text payload, got {}",
                other.kind()
            ))),
        }
    }

    /// Consumes the payload as a seekable byte stream.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if the payload was requested with a
    /// different decoder.
    pub fn into_bytes(self) -> Result<Cursor<Vec<u8>>, Error> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            other => Err(Error::Decode(format!(
                "expected a bytes payload, got {}",
                other.kind()
            ))),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
        }
    }
}

/// Explicit proxy URLs per scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyMap {
    /// Proxy for plain HTTP traffic.
    pub http: Option<String>,
    /// Proxy for HTTPS traffic.
    pub https: Option<String>,
}

/// Proxy configuration accepted by [`Transport::set_proxies`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxySpec {
    /// No proxying.
    Direct,
    /// Snapshot `HTTP_PROXY` and `HTTPS_PROXY` from the environment at the
    /// time the setter runs. Requests never re-read the environment.
    Auto,
    /// Use the given proxy URLs as-is.
    Explicit(ProxyMap),
}

/// Pass-through request options: extra headers, query pairs, a JSON body,
/// and an optional file-form part.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    json: Option<serde_json::Value>,
    file: Option<FilePart>,
}

#[derive(Debug, Clone)]
struct FilePart {
    name: String,
    contents: String,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Sets a JSON request body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json = Some(body);
        self
    }

    /// Attaches text contents as a multipart file-form field named `file`.
    pub fn file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.file = Some(FilePart {
            name: name.into(),
            contents: contents.into(),
        });
        self
    }
}

/// Blocking transport bound to one of the fixed engine deployments.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    beta_engine: bool,
    engine_url: Option<String>,
    proxies: ProxyMap,
}

impl Transport {
    /// Creates a transport targeting the production engine, no proxies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the beta engine deployment is selected.
    pub fn beta_engine(&self) -> bool {
        self.beta_engine
    }

    /// Selects between the production and beta engine deployments.
    pub fn set_beta_engine(&mut self, beta: bool) {
        self.beta_engine = beta;
    }

    /// Custom engine URL override, if any.
    pub fn engine_url(&self) -> Option<&str> {
        self.engine_url.as_deref()
    }

    /// Overrides the engine base URL, e.g. for a self-hosted engine.
    ///
    /// While set, the override takes precedence over the beta flag. Pass
    /// `None` to return to the fixed deployments. A trailing slash is
    /// stripped so path concatenation stays uniform.
    pub fn set_engine_url(&mut self, url: Option<String>) {
        self.engine_url = url.map(|u| u.trim_end_matches('/').to_string());
    }

    /// The currently configured proxy URLs.
    pub fn proxies(&self) -> &ProxyMap {
        &self.proxies
    }

    /// Applies a proxy configuration.
    ///
    /// `ProxySpec::Auto` reads `HTTP_PROXY` and `HTTPS_PROXY` once, here;
    /// the snapshot is what later requests use. Proxy URLs are validated
    /// immediately so a bad value fails at configuration time rather than
    /// on the first request.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if a proxy URL is not parseable.
    pub fn set_proxies(&mut self, spec: ProxySpec) -> Result<(), Error> {
        let map = match spec {
            ProxySpec::Direct => ProxyMap::default(),
            ProxySpec::Auto => ProxyMap {
                http: env::var("HTTP_PROXY").ok(),
                https: env::var("HTTPS_PROXY").ok(),
            },
            ProxySpec::Explicit(map) => map,
        };

        if let Some(url) = &map.http {
            reqwest::Proxy::http(url).map_err(|e| Error::Config {
                field: "proxies.http".to_string(),
                message: format!("\"{url}\" is not a valid proxy URL: {e}"),
            })?;
        }
        if let Some(url) = &map.https {
            reqwest::Proxy::https(url).map_err(|e| Error::Config {
                field: "proxies.https".to_string(),
                message: format!("\"{url}\" is not a valid proxy URL: {e}"),
            })?;
        }

        self.proxies = map;
        Ok(())
    }

    /// The base URL requests resolve against: the custom override when set,
    /// otherwise the deployment selected by the beta flag.
    pub fn base_url(&self) -> &str {
        match &self.engine_url {
            Some(url) => url,
            None if self.beta_engine => BETA_ENGINE_URL,
            None => ENGINE_URL,
        }
    }

    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// Returns `Network` on transport failure, `Http` on a non-success
    /// status, or `Decode` if the body does not match the decoder.
    pub fn get(&self, path: &str, decoder: Decoder, opts: RequestOptions) -> Result<Payload, Error> {
        self.request(Method::GET, path, decoder, opts)
    }

    /// Issues a POST request.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Transport::get`].
    pub fn post(&self, path: &str, decoder: Decoder, opts: RequestOptions) -> Result<Payload, Error> {
        self.request(Method::POST, path, decoder, opts)
    }

    /// Issues a PUT request.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Transport::get`].
    pub fn put(&self, path: &str, decoder: Decoder, opts: RequestOptions) -> Result<Payload, Error> {
        self.request(Method::PUT, path, decoder, opts)
    }

    /// Issues a DELETE request.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Transport::get`].
    pub fn delete(
        &self,
        path: &str,
        decoder: Decoder,
        opts: RequestOptions,
    ) -> Result<Payload, Error> {
        self.request(Method::DELETE, path, decoder, opts)
    }

    /// Serializes a series to delimited text and PUTs it as a file-form
    /// field, named by the series key unless `name` overrides it.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Transport::get`].
    pub fn put_series(
        &self,
        path: &str,
        series: &Series,
        name: Option<&str>,
        opts: RequestOptions,
    ) -> Result<Payload, Error> {
        let name = name.unwrap_or_else(|| series.key());
        let opts = opts.file(name, series.to_delimited_text());
        self.put(path, Decoder::Json, opts)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        decoder: Decoder,
        opts: RequestOptions,
    ) -> Result<Payload, Error> {
        let url = format!("{}{}", self.base_url(), path);
        debug!("{method} {url}");

        let client = self.build_client()?;
        let mut request = client.request(method, &url);

        for (name, value) in &opts.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !opts.query.is_empty() {
            request = request.query(&opts.query);
        }
        if let Some(body) = &opts.json {
            request = request.json(body);
        }
        if let Some(file) = opts.file {
            let part = Part::text(file.contents).file_name(file.name);
            request = request.multipart(Form::new().part("file", part));
        }

        let response = request.send().map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        match decoder {
            Decoder::Json => {
                let value = response
                    .json()
                    .map_err(|e| Error::Decode(format!("response JSON: {e}")))?;
                Ok(Payload::Json(value))
            }
            Decoder::Text => {
                let text = response
                    .text()
                    .map_err(|e| Error::Decode(format!("response text: {e}")))?;
                Ok(Payload::Text(text))
            }
            Decoder::Bytes => {
                let bytes = response
                    .bytes()
                    .map_err(|e| Error::Decode(format!("response bytes: {e}")))?;
                Ok(Payload::Bytes(Cursor::new(bytes.to_vec())))
            }
        }
    }

    fn build_client(&self) -> Result<reqwest::blocking::Client, Error> {
        // blocking reqwest applies a 30s total timeout by default; calls
        // here block for the full round trip instead
        let mut builder = reqwest::blocking::Client::builder().timeout(None);

        if self.proxies.http.is_none() && self.proxies.https.is_none() {
            // proxies are resolved when set_proxies runs, never sniffed
            // from the environment per request
            builder = builder.no_proxy();
        }
        if let Some(url) = &self.proxies.http {
            let proxy = reqwest::Proxy::http(url).map_err(|e| Error::Config {
                field: "proxies.http".to_string(),
                message: e.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }
        if let Some(url) = &self.proxies.https {
            let proxy = reqwest::Proxy::https(url).map_err(|e| Error::Config {
                field: "proxies.https".to_string(),
                message: e.to_string(),
            })?;
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(|e| Error::Network(e.to_string()))
    }
}
