use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use super::descriptor::ExchangeDescriptor;
use super::filter::RetryPolicy;
use super::proxy::ClientProxy;
use super::transport::{TlsConfig, TransportConfig};
use crate::error::ExchangeError;

/// Per-interface overrides. Any field left unset inherits the top-level
/// default from [`ClientsConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientEntry {
    /// Interface this entry applies to: simple name, qualified name, or a
    /// `*` glob. Matching ignores case, `-` and `_`.
    pub name: String,
    pub base_url: Option<String>,
    pub read_timeout_ms: Option<i64>,
    pub connect_timeout_ms: Option<u64>,
    pub headers: Vec<(String, String)>,
    pub retry: Option<RetryPolicy>,
}

/// Top-level client configuration: global defaults plus per-interface
/// override entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientsConfig {
    /// When false, no clients are registered at all.
    pub enabled: bool,
    pub base_url: Option<String>,
    pub read_timeout_ms: Option<i64>,
    pub connect_timeout_ms: Option<u64>,
    pub headers: Vec<(String, String)>,
    pub retry: Option<RetryPolicy>,
    pub clients: Vec<ClientEntry>,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        ClientsConfig {
            enabled: true,
            base_url: None,
            read_timeout_ms: None,
            connect_timeout_ms: None,
            headers: Vec::new(),
            retry: None,
            clients: Vec::new(),
        }
    }
}

impl ClientsConfig {
    /// First entry whose name pattern matches the interface, if any.
    pub fn entry_for(&self, interface: &str) -> Option<&ClientEntry> {
        self.clients
            .iter()
            .find(|e| name_matches(&e.name, interface))
    }

    /// Effective transport for one interface: entry overrides layered over
    /// the top-level defaults. TLS material is supplied separately by the
    /// host, never from serialized config.
    pub fn transport_for(&self, interface: &str) -> Result<TransportConfig, ExchangeError> {
        let entry = self.entry_for(interface);
        let base_url = entry
            .and_then(|e| e.base_url.clone())
            .or_else(|| self.base_url.clone())
            .ok_or_else(|| {
                ExchangeError::config(format!("no base URL configured for `{interface}`"))
            })?;
        // union by header name, entry value replacing the default
        let mut headers = self.headers.clone();
        if let Some(e) = entry {
            for (name, value) in &e.headers {
                match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                    Some(slot) => slot.1 = value.clone(),
                    None => headers.push((name.clone(), value.clone())),
                }
            }
        }
        Ok(TransportConfig {
            base_url,
            read_timeout_ms: entry
                .and_then(|e| e.read_timeout_ms)
                .or(self.read_timeout_ms)
                .unwrap_or(0),
            connect_timeout_ms: entry
                .and_then(|e| e.connect_timeout_ms)
                .or(self.connect_timeout_ms),
            default_headers: headers,
            retry: entry
                .and_then(|e| e.retry.clone())
                .or_else(|| self.retry.clone()),
            tls: None,
        })
    }
}

/// Whether a config entry name matches an interface name. Comparison drops
/// case, `-` and `_`, so `user-api`, `user_api` and `UserApi` all name the
/// same interface; a qualified pattern also matches on its last segment, and
/// `*` globs over any characters.
pub fn name_matches(pattern: &str, interface: &str) -> bool {
    let canon = |s: &str| {
        s.chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    let target = canon(interface);
    let simple = pattern.rsplit('.').next().unwrap_or(pattern);

    if pattern.contains('*') {
        for candidate in [pattern, simple] {
            let escaped = canon(candidate)
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*");
            if let Ok(re) = regex::Regex::new(&format!("^{escaped}$")) {
                if re.is_match(&target) {
                    return true;
                }
            }
        }
        false
    } else {
        canon(pattern) == target || canon(simple) == target
    }
}

/// Registry of ready-to-use client proxies, keyed by interface name.
#[derive(Default)]
pub struct ClientRegistry {
    clients: HashMap<String, Arc<ClientProxy>>,
    tls: Option<TlsConfig>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        ClientRegistry::default()
    }

    /// TLS material applied to every client registered afterwards.
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Build and register a proxy for every descriptor. With `enabled:
    /// false` this is a no-op and the registry stays empty.
    pub fn register_all(
        mut self,
        descriptors: Vec<ExchangeDescriptor>,
        config: &ClientsConfig,
    ) -> crate::Result<Self> {
        if !config.enabled {
            tracing::info!("client registration disabled by configuration");
            return Ok(self);
        }
        for descriptor in descriptors {
            let mut transport = config.transport_for(&descriptor.name)?;
            transport.tls = self.tls.clone();
            let name = descriptor.name.clone();
            let proxy = ClientProxy::new(descriptor, transport)?;
            tracing::debug!(client = %name, "registered exchange client");
            self.clients.insert(name, Arc::new(proxy));
        }
        Ok(self)
    }

    pub fn get(&self, interface: &str) -> crate::Result<Arc<ClientProxy>> {
        self.clients.get(interface).cloned().ok_or_else(|| {
            ExchangeError::config(format!("no client registered for `{interface}`"))
        })
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clients.keys().map(String::as_str)
    }
}
