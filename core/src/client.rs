//! Client construction and the shared connection core.
//!
//! # Design
//! `ClientCore` holds everything a request needs (base URL, credentials,
//! timeout, transport) and is immutable once built. Every service spec keeps
//! an `Arc` to it. `Client` is the root handle: it applies `ClientOption`s in
//! order, stops at the first one that fails, and then builds one instance of
//! each service bound to the new core.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::http::{check_status, parse_json, HttpMethod, HttpRequest, HttpResponse};
use crate::services::{
    DrillerService, HistoryService, MeterReadingService, MeterService, PermitService, WellService,
};
use crate::transport::{Transport, UreqTransport};

pub const DEFAULT_URL: &str = "https://localhost";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const MISSING_SCHEME: &str =
    "missing scheme from host parameter: please prefix with http:// or https://";

/// How requests authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    /// OpenID access token sent as `Authorization: Bearer <token>`.
    #[default]
    OpenId,
}

/// Connection settings and transport shared by every service.
pub struct ClientCore {
    base_url: String,
    url: Url,
    auth_type: AuthType,
    access_token: String,
    timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl ClientCore {
    /// The host as configured, without trailing slashes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Headers attached to every request.
    pub fn headers(&self) -> Vec<(String, String)> {
        let authorization = match self.auth_type {
            AuthType::OpenId => format!("Bearer {}", self.access_token),
        };
        vec![
            ("Authorization".to_string(), authorization),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ]
    }

    /// Absolute URL for `path` relative to the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| Error::InvalidArgument(format!("bad endpoint '{raw}': {e}")))
    }

    pub fn build_request(&self, method: HttpMethod, url: &Url, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: url.to_string(),
            headers: self.headers(),
            body,
        }
    }

    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.transport.send(request)
    }

    /// Send a request and decode a JSON body, expecting `expected` status.
    pub(crate) fn fetch<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: &Url,
        body: Option<String>,
        expected: u16,
    ) -> Result<T> {
        let response = self.send(self.build_request(method, url, body))?;
        parse_json(&response, expected)
    }

    /// Send a request whose response body is ignored.
    pub(crate) fn fetch_empty(
        &self,
        method: HttpMethod,
        url: &Url,
        body: Option<String>,
        expected: u16,
    ) -> Result<()> {
        let response = self.send(self.build_request(method, url, body))?;
        check_status(&response, expected)
    }
}

impl fmt::Debug for ClientCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCore")
            .field("base_url", &self.base_url)
            .field("auth_type", &self.auth_type)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Settings collected while options are applied.
struct ClientConfig {
    base_url: String,
    url: Url,
    auth_type: AuthType,
    access_token: String,
    timeout: Duration,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientConfig {
    fn new() -> Result<Self> {
        Ok(Self {
            base_url: DEFAULT_URL.to_string(),
            url: parse_host(DEFAULT_URL)?,
            auth_type: AuthType::default(),
            access_token: String::new(),
            timeout: DEFAULT_TIMEOUT,
            transport: None,
        })
    }

    fn into_core(self) -> ClientCore {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new(self.timeout)));
        ClientCore {
            base_url: self.base_url,
            url: self.url,
            auth_type: self.auth_type,
            access_token: self.access_token,
            timeout: self.timeout,
            transport,
        }
    }
}

/// A construction-time setting for `Client::new`.
pub enum ClientOption {
    Host(String),
    AccessToken(String),
    Timeout(Duration),
    Transport(Arc<dyn Transport>),
}

impl ClientOption {
    fn apply(self, config: &mut ClientConfig) -> Result<()> {
        match self {
            ClientOption::Host(host) => {
                config.url = parse_host(&host)?;
                config.base_url = host.trim_end_matches('/').to_string();
            }
            ClientOption::AccessToken(token) => {
                config.auth_type = AuthType::OpenId;
                config.access_token = token;
            }
            ClientOption::Timeout(timeout) => config.timeout = timeout,
            ClientOption::Transport(transport) => config.transport = Some(transport),
        }
        Ok(())
    }
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOption::Host(host) => f.debug_tuple("Host").field(host).finish(),
            ClientOption::AccessToken(_) => f.write_str("AccessToken(..)"),
            ClientOption::Timeout(timeout) => f.debug_tuple("Timeout").field(timeout).finish(),
            ClientOption::Transport(_) => f.write_str("Transport(..)"),
        }
    }
}

/// Use `host` instead of `DEFAULT_URL`. The host must carry a scheme.
pub fn set_host(host: impl Into<String>) -> ClientOption {
    ClientOption::Host(host.into())
}

/// Authenticate every request with a bearer token.
pub fn set_access_token(token: impl Into<String>) -> ClientOption {
    ClientOption::AccessToken(token.into())
}

pub fn set_timeout(timeout: Duration) -> ClientOption {
    ClientOption::Timeout(timeout)
}

/// Send requests through `transport` instead of the default `ureq` agent.
pub fn set_transport(transport: Arc<dyn Transport>) -> ClientOption {
    ClientOption::Transport(transport)
}

fn parse_host(host: &str) -> Result<Url> {
    match Url::parse(host) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Err(Error::InvalidConfiguration(MISSING_SCHEME.to_string()))
        }
        Err(e) => Err(Error::InvalidConfiguration(format!(
            "invalid host '{host}': {e}"
        ))),
    }
}

/// Root handle to the Hydros API.
pub struct Client {
    core: Arc<ClientCore>,
    pub well: WellService,
    pub driller: DrillerService,
    pub permit: PermitService,
    pub meter: MeterService,
    pub meter_reading: MeterReadingService,
    pub history: HistoryService,
}

impl Client {
    /// Build a client, applying `options` in order.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        let mut config = ClientConfig::new()?;
        for option in options {
            option.apply(&mut config)?;
        }
        let core = Arc::new(config.into_core());
        debug!(base_url = %core.base_url, "client constructed");
        Ok(Self::from_core(core))
    }

    /// A client with every setting at its default.
    pub fn with_defaults() -> Result<Self> {
        Self::new(std::iter::empty())
    }

    fn from_core(core: Arc<ClientCore>) -> Self {
        Self {
            well: WellService::new(Arc::clone(&core)),
            driller: DrillerService::new(Arc::clone(&core)),
            permit: PermitService::new(Arc::clone(&core)),
            meter: MeterService::new(Arc::clone(&core)),
            meter_reading: MeterReadingService::new(Arc::clone(&core)),
            history: HistoryService::new(Arc::clone(&core)),
            core,
        }
    }

    pub fn core(&self) -> &Arc<ClientCore> {
        &self.core
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    pub fn url(&self) -> &Url {
        self.core.url()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Service;

    #[test]
    fn defaults_are_applied() {
        let client = Client::with_defaults().unwrap();
        assert_eq!(client.base_url(), DEFAULT_URL);
        assert_eq!(client.core().auth_type(), AuthType::OpenId);
        assert_eq!(client.core().timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn set_host_keeps_the_input() {
        let client = Client::new([set_host("https://api.somewhere.com")]).unwrap();
        assert_eq!(client.base_url(), "https://api.somewhere.com");
    }

    #[test]
    fn set_host_exposes_url_parts() {
        let client = Client::new([set_host("https://api/somePath")]).unwrap();
        assert_eq!(client.url().scheme(), "https");
        assert_eq!(client.url().host_str(), Some("api"));
        assert_eq!(client.url().path(), "/somePath");
    }

    #[test]
    fn host_without_scheme_is_rejected() {
        for host in ["api", ""] {
            let err = Client::new([set_host(host)]).unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration(_)));
            assert_eq!(err.to_string(), MISSING_SCHEME);
        }
    }

    #[test]
    fn first_failing_option_aborts_construction() {
        let result = Client::new([
            set_access_token("abc"),
            set_host("nope"),
            set_host("https://fine.example.com"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn access_token_goes_into_bearer_header() {
        let client = Client::new([set_access_token("t0k3n")]).unwrap();
        let headers = client.core().headers();
        assert!(headers.contains(&("Authorization".to_string(), "Bearer t0k3n".to_string())));
        assert!(headers.contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(headers.contains(&("Accept".to_string(), "application/json".to_string())));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = Client::new([set_host("http://localhost:3000/")]).unwrap();
        let url = client.core().endpoint("wells/1.json").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/wells/1.json");
    }

    #[test]
    fn services_share_the_core() {
        let client = Client::with_defaults().unwrap();
        assert!(Arc::ptr_eq(client.well.spec().core(), client.core()));
        assert!(Arc::ptr_eq(client.history.spec().core(), client.core()));
    }
}
