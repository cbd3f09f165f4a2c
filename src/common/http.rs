use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Error};
use tracing::trace;

use crate::{common::errors::ResolutionError, configs::HttpProxyConfig};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

pub struct HttpClient;

impl HttpClient {
  pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
  }

  pub fn with_options(timeout: Duration, proxy: Option<&HttpProxyConfig>) -> Result<Client, Error> {
    let mut builder = Client::builder()
      .user_agent(Self::default_user_agent())
      .cookie_store(true)
      .timeout(timeout);

    if let Some(proxy_config) = proxy {
      if let Some(url) = &proxy_config.url {
        let mut proxy_obj = reqwest::Proxy::all(url)?;
        if let (Some(username), Some(password)) = (&proxy_config.username, &proxy_config.password) {
          proxy_obj = proxy_obj.basic_auth(username, password);
        }
        builder = builder.proxy(proxy_obj);
      }
    }

    builder.build()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
  Get,
  Post,
}

/// A single request handed to an [`HttpExecutor`].
#[derive(Debug, Clone)]
pub struct HttpRequest {
  pub method: HttpMethod,
  pub url: String,
  pub headers: Vec<(String, String)>,
  pub body: Option<String>,
}

impl HttpRequest {
  pub fn get(url: impl Into<String>) -> Self {
    Self {
      method: HttpMethod::Get,
      url: url.into(),
      headers: Vec::new(),
      body: None,
    }
  }

  pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
    Self {
      method: HttpMethod::Post,
      url: url.into(),
      headers: Vec::new(),
      body: Some(body.into()),
    }
  }

  pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }

  pub fn header_value(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

/// Fully buffered response. The connection that produced it is already released.
#[derive(Debug, Clone)]
pub struct HttpResponse {
  pub status: u16,
  pub body: String,
}

impl HttpResponse {
  pub fn new(status: u16, body: impl Into<String>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }

  /// 2xx with a body, i.e. anything but 204.
  pub fn is_success_with_content(&self) -> bool {
    (200..300).contains(&self.status) && self.status != 204
  }
}

/// Executes one request/response cycle.
///
/// Implementations own the connection for exactly the duration of `execute`
/// and must release it on every exit path, including when the returned future
/// is dropped before completion.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
  async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ResolutionError>;
}

/// [`HttpExecutor`] backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestExecutor {
  client: Client,
}

impl ReqwestExecutor {
  pub fn new(client: Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
  async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ResolutionError> {
    let mut builder = match request.method {
      HttpMethod::Get => self.client.get(&request.url),
      HttpMethod::Post => self.client.post(&request.url),
    };

    for (name, value) in &request.headers {
      builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = request.body {
      builder = builder.body(body);
    }

    trace!("{:?} {}", request.method, request.url);

    // The response owns the pooled connection; reading the body to the end
    // (or dropping the response on error) hands it back.
    let response = builder
      .send()
      .await
      .map_err(|e| ResolutionError::transport(&request.url, e))?;
    let status = response.status().as_u16();
    let body = response
      .text()
      .await
      .map_err(|e| ResolutionError::transport(&request.url, e))?;

    Ok(HttpResponse { status, body })
  }
}
