use crate::http::Response;
use colored::*;
use reqwest::header::HeaderMap;

/// 短响应体在紧凑模式下直接显示的上限（字节）
const COMPACT_BODY_LIMIT: usize = 200;

pub enum ResponseFormat {
    Compact,
    Verbose,
}

pub struct ResponseFormatter {
    format: ResponseFormat,
    color: bool,
}

impl ResponseFormatter {
    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn format(&self, response: &Response) -> String {
        match self.format {
            ResponseFormat::Compact => self.format_compact(response),
            ResponseFormat::Verbose => self.format_verbose(response),
        }
    }

    /// 请求行与请求头，只在 verbose 模式下输出
    pub fn format_request(&self, request_line: &str, headers: &HeaderMap) -> Option<String> {
        let ResponseFormat::Verbose = self.format else {
            return None;
        };

        let mut output = vec![self.paint(&format!("> {}", request_line), |s| s.cyan().bold())];
        for (key, value) in headers.iter() {
            let value = value.to_str().unwrap_or("<invalid utf-8>");
            output.push(self.paint(&format!("> {}: {}", key, value), |s| s.dimmed()));
        }
        Some(output.join("\n"))
    }

    fn format_compact(&self, response: &Response) -> String {
        let mut output = vec![self.status_line(response, false)];

        if !response.body.is_empty() {
            if response.body.len() < COMPACT_BODY_LIMIT {
                output.push(pretty_body(response));
            } else {
                output.push(format!("Body: {} bytes", response.body.len()));
            }
        }

        output.join("\n")
    }

    fn format_verbose(&self, response: &Response) -> String {
        let mut output = vec![self.status_line(response, true)];

        for (key, value) in response.headers.iter() {
            let value = value.to_str().unwrap_or("<invalid utf-8>");
            output.push(self.paint(&format!("< {}: {}", key, value), |s| s.blue()));
        }

        if !response.body.is_empty() {
            output.push(String::new());
            output.push(pretty_body(response));
        }

        output.join("\n")
    }

    fn status_line(&self, response: &Response, with_version: bool) -> String {
        let status_line = if with_version {
            format!(
                "< {:?} {} {}",
                response.version,
                response.status.code(),
                response.status.reason_phrase()
            )
        } else {
            format!(
                "HTTP {} {}",
                response.status.code(),
                response.status.reason_phrase()
            )
        };

        if response.is_success() {
            self.paint(&status_line, |s| s.green().bold())
        } else if response.status.is_client_error() {
            self.paint(&status_line, |s| s.yellow().bold())
        } else {
            self.paint(&status_line, |s| s.red().bold())
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// JSON 响应体格式化输出，其他内容按文本显示
fn pretty_body(response: &Response) -> String {
    serde_json::from_slice::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| response.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use reqwest::Version;
    use reqwest::header::{CONTENT_TYPE, HeaderValue};
    use std::time::Duration;

    fn response(status: u16, body: &'static str) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Response::new(
            status,
            Version::HTTP_11,
            headers,
            Bytes::from_static(body.as_bytes()),
            Duration::from_millis(5),
        )
        .unwrap()
    }

    #[test]
    fn test_compact_pretty_prints_json() {
        let formatter = ResponseFormatter::new(ResponseFormat::Compact).without_color();
        let output = formatter.format(&response(200, "{\"id\":1}"));
        assert_eq!(output, "HTTP 200 OK\n{\n  \"id\": 1\n}");
    }

    #[test]
    fn test_compact_summarizes_large_body() {
        let formatter = ResponseFormatter::new(ResponseFormat::Compact).without_color();
        let body: &'static str = Box::leak("x".repeat(300).into_boxed_str());
        let output = formatter.format(&response(404, body));
        assert_eq!(output, "HTTP 404 Not Found\nBody: 300 bytes");
    }

    #[test]
    fn test_verbose_includes_headers() {
        let formatter = ResponseFormatter::new(ResponseFormat::Verbose).without_color();
        let output = formatter.format(&response(500, "oops"));
        assert!(output.starts_with("< HTTP/1.1 500 Internal Server Error"));
        assert!(output.contains("< content-type: application/json"));
        assert!(output.ends_with("\n\noops"));
    }

    #[test]
    fn test_request_only_in_verbose() {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));

        let compact = ResponseFormatter::new(ResponseFormat::Compact).without_color();
        assert!(compact.format_request("GET https://h/", &headers).is_none());

        let verbose = ResponseFormatter::new(ResponseFormat::Verbose).without_color();
        assert_eq!(
            verbose.format_request("GET https://h/", &headers).unwrap(),
            "> GET https://h/\n> accept: */*"
        );
    }
}
