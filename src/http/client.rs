use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};

use crate::http::body::RequestBody;
use crate::http::request::{Credentials, Request};
use crate::http::response::Response;
use crate::http::types::Protocol;
use crate::{HttperError, Result};

const TIMEOUT: Duration = Duration::from_secs(30);

/// 按协议提示选择底层连接的 HTTP 客户端
///
/// HTTP/1.1 与 HTTP/2 prior knowledge 需要不同的连接池配置，
/// 因此各自持有一个 reqwest 客户端。
#[derive(Clone)]
pub struct Client {
    default: reqwest::Client,
    http1: reqwest::Client,
    prior_knowledge: reqwest::Client,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClientOptions {
    /// 接受无效的 TLS 证书（本地开发服务器）
    pub insecure: bool,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_options(ClientOptions::default())
    }

    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let builder = || {
            reqwest::Client::builder()
                .timeout(TIMEOUT)
                .danger_accept_invalid_certs(options.insecure)
        };

        Ok(Self {
            default: builder().build()?,
            http1: builder().http1_only().build()?,
            prior_knowledge: builder().http2_prior_knowledge().build()?,
        })
    }

    fn inner(&self, protocol: Option<Protocol>) -> &reqwest::Client {
        match protocol {
            Some(Protocol::Http11) => &self.http1,
            Some(Protocol::Http2PriorKnowledge) => &self.prior_knowledge,
            Some(Protocol::Http2) | None => &self.default,
        }
    }

    /// 把请求转换为 reqwest 请求，不发送
    pub fn build(&self, request: Request) -> Result<reqwest::Request> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| HttperError::ParseError(format!("Invalid HTTP method: {}", e)))?;

        let mut headers = request.headers;
        if let Some(body) = &request.body {
            if let RequestBody::Multipart(multipart) = body
                && !headers.contains_key(CONTENT_TYPE)
            {
                let content_type = HeaderValue::from_str(&multipart.content_type()).map_err(|e| {
                    HttperError::ParseError(format!("Invalid multipart boundary: {}", e))
                })?;
                headers.insert(CONTENT_TYPE, content_type);
            }
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.content_length()));
        }

        let mut builder = self
            .inner(request.protocol)
            .request(method, request.url)
            .headers(headers);

        if request.protocol == Some(Protocol::Http2) {
            builder = builder.version(Protocol::Http2.version());
        }

        if let Some(Credentials::Basic { username, password }) = request.credentials {
            builder = builder.basic_auth(username, password);
        }

        if let Some(body) = request.body {
            builder = builder.body(reqwest::Body::from(body));
        }

        Ok(builder.build()?)
    }

    pub async fn execute(&self, request: Request) -> Result<Response> {
        let protocol = request.protocol;
        let request = self.build(request)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

        let start = Instant::now();
        let response = self.inner(protocol).execute(request).await?;

        let status = response.status().as_u16();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let duration = start.elapsed();

        tracing::debug!(status, ?version, elapsed = ?duration, "response received");
        Response::new(status, version, headers, body, duration)
    }
}
