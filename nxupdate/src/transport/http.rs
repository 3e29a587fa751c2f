//! `reqwest`-backed transport.

use std::error::Error as StdError;
use std::io::{self, Read, Write};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use super::{TransferError, Transport};

/// Default timeout for establishing a connection in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;

/// Keepalive interval so a vanished peer fails the read instead of hanging.
const TCP_KEEPALIVE_SECS: u64 = 60;

/// Maximum redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// Buffer size for streaming response bodies (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Settings used to build the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    /// Optional request timeout. `None` never cuts off a slow body.
    pub timeout: Option<Duration>,
    /// Timeout for establishing the TCP/TLS connection.
    pub connect_timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Skip certificate validation.
    pub accept_invalid_certs: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            accept_invalid_certs: true,
        }
    }
}

impl HttpSettings {
    /// Set or clear the request timeout.
    pub fn with_timeout(mut self, timeout: impl Into<Option<Duration>>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable or disable certificate validation.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

/// The user agent sent when none is configured.
pub fn default_user_agent() -> String {
    format!("nxupdate/{}", env!("CARGO_PKG_VERSION"))
}

/// Production transport using a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport from the given settings.
    pub fn new(settings: HttpSettings) -> Result<Self, TransferError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .tcp_keepalive(Duration::from_secs(TCP_KEEPALIVE_SECS))
            .user_agent(settings.user_agent)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransferError::Request(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransferError> {
        let mut response = self.client.get(url).send().map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status(status.as_u16()));
        }

        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut written = 0u64;

        loop {
            let bytes_read = response.read(&mut buffer).map_err(classify_read)?;
            if bytes_read == 0 {
                break;
            }

            sink.write_all(&buffer[..bytes_read])
                .map_err(|e| TransferError::Write(e.to_string()))?;

            written += bytes_read as u64;
        }

        Ok(written)
    }

    fn head(&self, url: &str) -> Result<u16, TransferError> {
        let response = self.client.head(url).send().map_err(classify)?;
        Ok(response.status().as_u16())
    }
}

/// Map a `reqwest` error onto the transfer taxonomy.
fn classify(err: reqwest::Error) -> TransferError {
    let message = describe(&err);

    if err.is_timeout() {
        TransferError::Timeout(message)
    } else if err.is_connect() {
        if has_source(&err, is_dns_failure) {
            TransferError::Resolve(message)
        } else if has_source(&err, is_invalid_data) {
            TransferError::Tls(message)
        } else {
            TransferError::Connect(message)
        }
    } else if err.is_builder() {
        TransferError::InvalidUrl(message)
    } else if let Some(status) = err.status() {
        TransferError::Status(status.as_u16())
    } else {
        TransferError::Request(message)
    }
}

/// Map an error raised while reading the response body.
fn classify_read(err: io::Error) -> TransferError {
    if err.kind() == io::ErrorKind::TimedOut {
        return TransferError::Timeout(err.to_string());
    }

    match err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<reqwest::Error>())
    {
        Some(inner) if inner.is_timeout() => TransferError::Timeout(describe(inner)),
        _ => TransferError::Request(format!("read error: {}", err)),
    }
}

/// Whether any error in the source chain matches `predicate`.
fn has_source(err: &reqwest::Error, predicate: fn(&(dyn StdError + 'static)) -> bool) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if predicate(cause) {
            return true;
        }
        source = cause.source();
    }
    false
}

/// The connector labels resolver failures `dns error`.
fn is_dns_failure(cause: &(dyn StdError + 'static)) -> bool {
    cause.to_string().starts_with("dns error")
}

/// TLS failures surface from the connector as `InvalidData` I/O errors.
fn is_invalid_data(cause: &(dyn StdError + 'static)) -> bool {
    cause
        .downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::InvalidData)
}

/// Render an error together with its source chain.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
