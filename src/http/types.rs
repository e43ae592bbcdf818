use std::fmt;

use crate::{HttperError, Result};

/// 请求行里允许出现的方法（大小写敏感）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Head,
    Options,
    Delete,
    Patch,
    Post,
    Put,
    Connect,
    Grpc,
    Websocket,
    Graphql,
}

impl Method {
    pub const ALL: [Method; 11] = [
        Method::Get,
        Method::Head,
        Method::Options,
        Method::Delete,
        Method::Patch,
        Method::Post,
        Method::Put,
        Method::Connect,
        Method::Grpc,
        Method::Websocket,
        Method::Graphql,
    ];

    /// 精确匹配方法名，`get` 不算 GET
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == token)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Connect => "CONNECT",
            Method::Grpc => "GRPC",
            Method::Websocket => "WEBSOCKET",
            Method::Graphql => "GRAPHQL",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 请求行末尾可选的协议提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http11,
    Http2,
    /// 不经过 Upgrade/ALPN，直接以 HTTP/2 建立连接
    Http2PriorKnowledge,
}

impl Protocol {
    pub const ALL: [Protocol; 3] = [
        Protocol::Http11,
        Protocol::Http2,
        Protocol::Http2PriorKnowledge,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == token)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http11 => "HTTP/1.1",
            Protocol::Http2 => "HTTP/2",
            Protocol::Http2PriorKnowledge => "HTTP/2 (Prior Knowledge)",
        }
    }

    /// 协议名按空格切分后占用的 token 数
    pub fn token_count(&self) -> usize {
        self.as_str().split(' ').count()
    }

    pub fn version(&self) -> reqwest::Version {
        match self {
            Protocol::Http11 => reqwest::Version::HTTP_11,
            Protocol::Http2 | Protocol::Http2PriorKnowledge => reqwest::Version::HTTP_2,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);
impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Self(code))
        } else {
            Err(HttperError::ParseError(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }

    pub fn is_client_error(&self) -> bool {
        (400..=499).contains(&self.0)
    }

    pub fn reason_phrase(&self) -> &'static str {
        reqwest::StatusCode::from_u16(self.0)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
    }
}
