use bytes::Bytes;
use reqwest::Version;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap as Headers};
use std::time::Duration;

use crate::Result;
use crate::http::types::Status;

#[derive(Debug, Clone)]
pub struct Response {
    pub status: Status,
    pub version: Version,
    pub headers: Headers,
    pub body: Bytes,
    pub duration: Duration,
}

impl Response {
    pub fn new(
        status: u16,
        version: Version,
        headers: Headers,
        body: Bytes,
        duration: Duration,
    ) -> Result<Self> {
        Ok(Self {
            status: Status::new(status)?,
            version,
            headers,
            body,
            duration,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 响应头中的 Content-Length；缺失时取实际读到的字节数
    pub fn content_length(&self) -> u64 {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(self.body.len() as u64)
    }

    /// 去掉参数的媒体类型，例如 `application/json`
    pub fn media_type(&self) -> Option<mime::Mime> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn response(headers: Headers, body: &'static str) -> Response {
        Response::new(
            200,
            Version::HTTP_11,
            headers,
            Bytes::from_static(body.as_bytes()),
            Duration::from_millis(12),
        )
        .unwrap()
    }

    #[test]
    fn test_content_length_prefers_header() {
        let mut headers = Headers::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("42"));
        assert_eq!(response(headers, "short").content_length(), 42);
        assert_eq!(response(Headers::new(), "short").content_length(), 5);
    }

    #[test]
    fn test_media_type() {
        let mut headers = Headers::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        let response = response(headers, "{}");
        assert_eq!(response.media_type().unwrap().essence_str(), "application/json");
        assert_eq!(response.text(), "{}");
        assert!(response.is_success());
    }

    #[test]
    fn test_invalid_status() {
        assert!(
            Response::new(42, Version::HTTP_11, Headers::new(), Bytes::new(), Duration::ZERO)
                .is_err()
        );
    }
}
