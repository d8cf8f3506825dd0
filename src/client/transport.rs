use std::time::Duration;

use serde::Deserialize;

use super::filter::RetryPolicy;
use crate::error::ExchangeError;

/// Client-side TLS material, already loaded to PEM bytes.
///
/// Reading certificate/key files is host glue; the core only consumes the
/// bytes and hands them to the transport.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Extra root CA certificate (PEM)
    pub ca_pem: Option<Vec<u8>>,
    /// Client identity for mutual TLS: certificate chain + private key (PEM)
    pub identity_pem: Option<Vec<u8>>,
}

/// Transport configuration for one client.
///
/// `read_timeout_ms` is the default per-call deadline; a value ≤ 0 disables
/// it, and the reserved request header overrides it per call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Base URL every method path is resolved against
    pub base_url: String,
    /// Default read deadline in milliseconds; ≤ 0 means none
    pub read_timeout_ms: i64,
    /// Connection establishment timeout
    pub connect_timeout_ms: Option<u64>,
    /// Headers applied to every request, before per-call headers
    pub default_headers: Vec<(String, String)>,
    /// Client-side retry budget; `None` disables retry
    pub retry: Option<RetryPolicy>,
    /// Mutual-TLS material (not part of the serialized config surface)
    #[serde(skip)]
    pub tls: Option<TlsConfig>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            base_url: String::new(),
            read_timeout_ms: 0,
            connect_timeout_ms: None,
            default_headers: Vec::new(),
            retry: None,
            tls: None,
        }
    }
}

impl TransportConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        TransportConfig {
            base_url: base_url.into(),
            ..TransportConfig::default()
        }
    }

    pub fn read_timeout_ms(mut self, ms: i64) -> Self {
        self.read_timeout_ms = ms;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Build the async transport.
    pub fn build_async(&self) -> Result<reqwest::Client, ExchangeError> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(ms) = self.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        builder = self.apply_tls_async(builder)?;
        builder
            .build()
            .map_err(|e| ExchangeError::config(format!("failed to build transport: {e}")))
    }

    /// Build the blocking transport.
    pub fn build_blocking(&self) -> Result<reqwest::blocking::Client, ExchangeError> {
        let mut builder = reqwest::blocking::Client::builder().use_rustls_tls();
        if let Some(ms) = self.connect_timeout_ms {
            builder = builder.connect_timeout(Duration::from_millis(ms));
        }
        builder = self.apply_tls_blocking(builder)?;
        builder
            .build()
            .map_err(|e| ExchangeError::config(format!("failed to build transport: {e}")))
    }

    fn apply_tls_async(
        &self,
        mut builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder, ExchangeError> {
        let Some(tls) = &self.tls else {
            return Ok(builder);
        };
        if let Some(ca) = &tls.ca_pem {
            let cert = reqwest::Certificate::from_pem(ca)
                .map_err(|e| ExchangeError::config(format!("unusable CA certificate: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        if let Some(identity) = &tls.identity_pem {
            let id = reqwest::Identity::from_pem(identity)
                .map_err(|e| ExchangeError::config(format!("unusable client identity: {e}")))?;
            builder = builder.identity(id);
        }
        Ok(builder)
    }

    fn apply_tls_blocking(
        &self,
        mut builder: reqwest::blocking::ClientBuilder,
    ) -> Result<reqwest::blocking::ClientBuilder, ExchangeError> {
        let Some(tls) = &self.tls else {
            return Ok(builder);
        };
        if let Some(ca) = &tls.ca_pem {
            let cert = reqwest::Certificate::from_pem(ca)
                .map_err(|e| ExchangeError::config(format!("unusable CA certificate: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }
        if let Some(identity) = &tls.identity_pem {
            let id = reqwest::Identity::from_pem(identity)
                .map_err(|e| ExchangeError::config(format!("unusable client identity: {e}")))?;
            builder = builder.identity(id);
        }
        Ok(builder)
    }
}
