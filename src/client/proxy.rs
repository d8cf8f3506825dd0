use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::descriptor::{join_paths, ExchangeDescriptor};
use super::filter::{ExchangeFilter, TimeoutFilter};
use super::transport::TransportConfig;
use crate::error::ExchangeError;
use crate::scan::BindingLocation;

/// Fully resolved outgoing request, produced from a descriptor plus call
/// arguments and threaded through the filter chain before hitting the wire.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    /// Effective read deadline; `None` means no deadline
    pub timeout_ms: Option<i64>,
}

/// Arguments for one dispatched call.
///
/// Named arguments are routed by the method descriptor's bindings; ad-hoc
/// headers and the request body are supplied separately.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    args: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl CallArgs {
    pub fn new() -> Self {
        CallArgs::default()
    }

    /// Supply a named argument. Where it lands (path, query, header) is
    /// decided by the descriptor binding with the same name.
    pub fn arg(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.args.push((name.into(), value.to_string()));
        self
    }

    /// Add a request header not declared on the interface.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the JSON request body.
    pub fn body<T: Serialize>(mut self, value: &T) -> crate::Result<Self> {
        self.body = Some(serde_json::to_value(value)?);
        Ok(self)
    }
}

/// Descriptor-driven HTTP client for one interface.
///
/// Holds the descriptor table, the transport configuration and the filter
/// chain; `invoke`/`invoke_blocking` are the two call styles over the same
/// dispatch pipeline.
pub struct ClientProxy {
    descriptor: Arc<ExchangeDescriptor>,
    transport: TransportConfig,
    http: reqwest::Client,
    blocking: OnceLock<reqwest::blocking::Client>,
    filters: Vec<Arc<dyn ExchangeFilter>>,
}

impl std::fmt::Debug for ClientProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientProxy")
            .field("descriptor", &self.descriptor)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl ClientProxy {
    pub fn new(descriptor: ExchangeDescriptor, transport: TransportConfig) -> crate::Result<Self> {
        if transport.base_url.is_empty() {
            return Err(ExchangeError::config(format!(
                "no base URL configured for client `{}`",
                descriptor.name
            )));
        }
        Url::parse(&transport.base_url).map_err(|e| {
            ExchangeError::config(format!("invalid base URL `{}`: {e}", transport.base_url))
        })?;
        let http = transport.build_async()?;
        let filters: Vec<Arc<dyn ExchangeFilter>> =
            vec![Arc::new(TimeoutFilter::new(transport.read_timeout_ms))];
        Ok(ClientProxy {
            descriptor: Arc::new(descriptor),
            transport,
            http,
            blocking: OnceLock::new(),
            filters,
        })
    }

    /// Append a filter after the built-in timeout filter.
    pub fn with_filter(mut self, filter: Arc<dyn ExchangeFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn descriptor(&self) -> &ExchangeDescriptor {
        &self.descriptor
    }

    /// Dispatch a call and deserialize the JSON response body.
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        method: &str,
        args: CallArgs,
    ) -> crate::Result<T> {
        let (_, body) = self.dispatch(method, args).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Dispatch a call and return the raw response body.
    pub async fn invoke_raw(&self, method: &str, args: CallArgs) -> crate::Result<(u16, String)> {
        self.dispatch(method, args).await
    }

    /// Blocking counterpart of [`invoke`](Self::invoke). Must not be called
    /// from within an async runtime.
    pub fn invoke_blocking<T: DeserializeOwned>(
        &self,
        method: &str,
        args: CallArgs,
    ) -> crate::Result<T> {
        let (_, body) = self.dispatch_blocking(method, args)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Blocking counterpart of [`invoke_raw`](Self::invoke_raw).
    pub fn invoke_raw_blocking(
        &self,
        method: &str,
        args: CallArgs,
    ) -> crate::Result<(u16, String)> {
        self.dispatch_blocking(method, args)
    }

    async fn dispatch(&self, method: &str, args: CallArgs) -> crate::Result<(u16, String)> {
        let ctx = self.build_context(method, args)?;
        let attempts = self.attempt_budget();
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let started = Instant::now();
            let outcome = self.send_async(&ctx).await;
            self.observe(&ctx, &outcome, started.elapsed());
            if attempt < attempts && self.wants_retry(&outcome) {
                tracing::debug!(
                    client = %self.descriptor.name,
                    method,
                    attempt,
                    "retrying failed attempt"
                );
                continue;
            }
            return finish(outcome);
        }
    }

    fn dispatch_blocking(&self, method: &str, args: CallArgs) -> crate::Result<(u16, String)> {
        let ctx = self.build_context(method, args)?;
        let attempts = self.attempt_budget();
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let started = Instant::now();
            let outcome = self.send_blocking(&ctx);
            self.observe(&ctx, &outcome, started.elapsed());
            if attempt < attempts && self.wants_retry(&outcome) {
                tracing::debug!(
                    client = %self.descriptor.name,
                    method,
                    attempt,
                    "retrying failed attempt"
                );
                continue;
            }
            return finish(outcome);
        }
    }

    fn attempt_budget(&self) -> u32 {
        self.transport
            .retry
            .as_ref()
            .map(|p| p.max_attempts.max(1))
            .unwrap_or(1)
    }

    fn wants_retry(&self, outcome: &crate::Result<(u16, String)>) -> bool {
        self.transport
            .retry
            .as_ref()
            .is_some_and(|p| p.wants_retry(outcome))
    }

    fn observe(&self, ctx: &RequestContext, outcome: &crate::Result<(u16, String)>, latency: Duration) {
        let status = outcome.as_ref().ok().map(|(s, _)| *s);
        for filter in &self.filters {
            filter.after(ctx, status, latency);
        }
    }

    /// Resolve descriptor + arguments into a concrete request, then run the
    /// before-filters over it.
    fn build_context(&self, method: &str, args: CallArgs) -> crate::Result<RequestContext> {
        let desc = self.descriptor.method(method).ok_or_else(|| {
            ExchangeError::invocation(format!(
                "no method `{method}` on `{}`",
                self.descriptor.name
            ))
        })?;

        let mut path = join_paths(&self.descriptor.base_path, &desc.path);
        if !path.is_empty() && !path.starts_with('/') {
            path.insert(0, '/');
        }

        let mut query: Vec<(String, String)> = Vec::new();
        let mut headers: Vec<(String, String)> = self.transport.default_headers.clone();
        for (name, value) in &args.args {
            let binding = desc.find_binding(name).ok_or_else(|| {
                ExchangeError::invocation(format!(
                    "argument `{name}` has no binding in `{}::{method}`",
                    self.descriptor.name
                ))
            })?;
            match binding.location {
                BindingLocation::Path => {
                    let placeholder = format!("{{{name}}}");
                    if !path.contains(&placeholder) {
                        return Err(ExchangeError::invocation(format!(
                            "path variable `{name}` not present in `{path}`"
                        )));
                    }
                    path = path.replace(&placeholder, &urlencoding::encode(value));
                }
                BindingLocation::Query => query.push((name.clone(), value.clone())),
                BindingLocation::Header => headers.push((name.clone(), value.clone())),
                BindingLocation::Body => {
                    return Err(ExchangeError::invocation(format!(
                        "argument `{name}` is body-bound; supply it via CallArgs::body"
                    )));
                }
            }
        }
        if let Some(open) = path.find('{') {
            let close = path[open..].find('}').map(|i| open + i + 1).unwrap_or(path.len());
            return Err(ExchangeError::invocation(format!(
                "unbound path variable {} in `{path}`",
                &path[open..close]
            )));
        }
        headers.extend(args.headers);

        let mut url = Url::parse(&format!(
            "{}{path}",
            self.transport.base_url.trim_end_matches('/')
        ))
        .map_err(|e| ExchangeError::invocation(format!("cannot build request URL: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &query {
                pairs.append_pair(k, v);
            }
        }

        let mut ctx = RequestContext {
            method: desc.method.clone(),
            url,
            headers,
            body: args.body,
            timeout_ms: None,
        };
        for filter in &self.filters {
            filter.before(&mut ctx)?;
        }
        Ok(ctx)
    }

    async fn send_async(&self, ctx: &RequestContext) -> crate::Result<(u16, String)> {
        let mut req = self.http.request(ctx.method.clone(), ctx.url.clone());
        for (name, value) in &ctx.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &ctx.body {
            req = req.json(body);
        }

        let response = match ctx.timeout_ms {
            Some(ms) => {
                let deadline = Duration::from_millis(ms as u64);
                // Dropping the future on expiry cancels the in-flight request.
                match tokio::time::timeout(deadline, req.send()).await {
                    Ok(result) => result?,
                    Err(_) => return Err(self.deadline_expired(ctx, ms)),
                }
            }
            None => req.send().await?,
        };

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    fn send_blocking(&self, ctx: &RequestContext) -> crate::Result<(u16, String)> {
        let client = self.blocking_client()?;
        let mut req = client.request(ctx.method.clone(), ctx.url.clone());
        for (name, value) in &ctx.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &ctx.body {
            req = req.json(body);
        }
        if let Some(ms) = ctx.timeout_ms {
            req = req.timeout(Duration::from_millis(ms as u64));
        }

        let response = match req.send() {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                return Err(self.deadline_expired(ctx, ctx.timeout_ms.unwrap_or(0)));
            }
            Err(e) => return Err(e.into()),
        };
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok((status, body))
    }

    fn deadline_expired(&self, ctx: &RequestContext, timeout_ms: i64) -> ExchangeError {
        tracing::warn!(
            timeout_ms,
            url = %ctx.url,
            "request exceeded its read deadline"
        );
        ExchangeError::Timeout {
            timeout_ms,
            url: ctx.url.to_string(),
        }
    }

    fn blocking_client(&self) -> crate::Result<&reqwest::blocking::Client> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }
        let built = self.transport.build_blocking()?;
        Ok(self.blocking.get_or_init(|| built))
    }
}

/// Build the client for one interface: the runtime entry point pairing a
/// descriptor table with its transport.
pub fn build_client(
    descriptor: ExchangeDescriptor,
    transport: TransportConfig,
) -> crate::Result<ClientProxy> {
    ClientProxy::new(descriptor, transport)
}

fn finish(outcome: crate::Result<(u16, String)>) -> crate::Result<(u16, String)> {
    let (status, body) = outcome?;
    if (200..300).contains(&status) {
        Ok((status, body))
    } else {
        Err(ExchangeError::Status { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MethodDescriptor;

    fn sample_proxy() -> ClientProxy {
        let desc = ExchangeDescriptor::new("UserApi").base_path("/api/v1").route(
            MethodDescriptor::new("get_user", Method::GET, "/users/{id}")
                .binding("id", BindingLocation::Path)
                .binding("verbose", BindingLocation::Query)
                .binding("x-tenant", BindingLocation::Header),
        );
        ClientProxy::new(desc, TransportConfig::new("http://localhost:8080")).unwrap()
    }

    #[test]
    fn context_resolves_path_query_and_header_bindings() {
        let proxy = sample_proxy();
        let ctx = proxy
            .build_context(
                "get_user",
                CallArgs::new()
                    .arg("id", 42)
                    .arg("verbose", true)
                    .arg("x-tenant", "acme"),
            )
            .unwrap();
        assert_eq!(
            ctx.url.as_str(),
            "http://localhost:8080/api/v1/users/42?verbose=true"
        );
        assert!(ctx
            .headers
            .contains(&("x-tenant".to_string(), "acme".to_string())));
    }

    #[test]
    fn path_values_are_percent_encoded() {
        let proxy = sample_proxy();
        let ctx = proxy
            .build_context("get_user", CallArgs::new().arg("id", "a/b c"))
            .unwrap();
        assert_eq!(ctx.url.path(), "/api/v1/users/a%2Fb%20c");
    }

    #[test]
    fn unbound_path_variable_is_rejected() {
        let proxy = sample_proxy();
        let err = proxy
            .build_context("get_user", CallArgs::new())
            .unwrap_err();
        assert!(err.to_string().contains("{id}"));
    }

    #[test]
    fn unknown_argument_is_rejected() {
        let proxy = sample_proxy();
        let err = proxy
            .build_context("get_user", CallArgs::new().arg("id", 1).arg("nope", 2))
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let proxy = sample_proxy();
        let err = proxy
            .build_context("delete_user", CallArgs::new())
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Invocation(_)));
    }

    #[test]
    fn missing_base_url_is_a_config_error() {
        let err =
            ClientProxy::new(ExchangeDescriptor::new("UserApi"), TransportConfig::default())
                .unwrap_err();
        assert!(matches!(err, ExchangeError::Config(_)));
    }

    #[test]
    fn non_success_status_becomes_a_status_error() {
        let err = finish(Ok((404, "missing".into()))).unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }
}
