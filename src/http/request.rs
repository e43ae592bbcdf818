use reqwest::header::HeaderMap as Headers;
use url::Url;

use crate::http::body::RequestBody;
use crate::http::types::{Method, Protocol};

/// 由 Authorization header 转换出的传输层凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic {
        username: String,
        password: Option<String>,
    },
}

/// 可直接交给 [`Client`](crate::http::Client) 执行的请求
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub protocol: Option<Protocol>,
    pub headers: Headers,
    pub credentials: Option<Credentials>,
    pub body: Option<RequestBody>,

    /// `###` 之后的标题
    pub name: Option<String>,
    /// 在文档中的块序号（从 1 开始）
    pub block: usize,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            protocol: None,
            headers: Headers::new(),
            credentials: None,
            body: None,
            name: None,
            block: 0,
        }
    }

    pub fn with_protocol(mut self, protocol: Option<Protocol>) -> Self {
        self.protocol = protocol;
        self
    }

    /// `GET https://example.com HTTP/2`
    pub fn request_line(&self) -> String {
        match self.protocol {
            Some(protocol) => format!("{} {} {}", self.method, self.url, protocol),
            None => format!("{} {}", self.method, self.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        Request::new(Method::Post, Url::parse("https://example.com/users").unwrap())
    }

    #[test]
    fn test_request_line() {
        assert_eq!(request().request_line(), "POST https://example.com/users");
        assert!(request().headers.is_empty());
        let request = request().with_protocol(Some(Protocol::Http11));
        assert_eq!(request.request_line(), "POST https://example.com/users HTTP/1.1");
    }
}
