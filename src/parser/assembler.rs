use std::path::Path;

use reqwest::header::{HeaderName, HeaderValue};

use crate::http::{Credentials, Request};
use crate::parser::body::parse_body;
use crate::parser::essentials::parse_essentials;
use crate::parser::form::split_head_body;
use crate::parser::headers::{is_comment, parse_headers};
use crate::parser::types::{HeaderSet, ParseError, ParseResult, RequestBlock};

/// 把一个请求块组装成可执行请求
///
/// 只包含注释的块返回 `Ok(None)`。
pub fn assemble(block: &RequestBlock<'_>, base_dir: &Path) -> ParseResult<Option<Request>> {
    let Some((skipped, text)) = skip_preamble(block.text) else {
        return Ok(None);
    };
    let line = block.line + skipped;

    let (head, body) = split_head_body(text);
    let mut logical = join_continuations(head).into_iter();
    let Some(essentials_line) = logical.next() else {
        return Ok(None);
    };

    let essentials = parse_essentials(&essentials_line, line)?;
    let headers = parse_headers(&logical.collect::<Vec<_>>().join("\n"));
    let body = parse_body(headers.get("Content-Type"), body, base_dir)?;

    let mut request = Request::new(essentials.method, essentials.url)
        .with_protocol(essentials.protocol);
    request.name = block.title.map(str::to_string);
    request.block = block.number;
    request.body = body;

    transfer_headers(&mut request, &headers, line)?;

    tracing::debug!(
        block = block.number,
        request = %request.request_line(),
        headers = request.headers.len(),
        "assembled request"
    );
    Ok(Some(request))
}

/// 跳过请求行之前的空行和注释行，返回跳过的行数与剩余文本
fn skip_preamble(text: &str) -> Option<(usize, &str)> {
    let mut offset = 0;
    for (index, line) in text.split_inclusive('\n').enumerate() {
        let trimmed = line.trim();
        if !trimmed.is_empty() && !is_comment(trimmed) {
            return Some((index, &text[offset..]));
        }
        offset += line.len();
    }
    None
}

/// 以四个空格或制表符开头的行接在上一行末尾，注释行被丢弃
fn join_continuations(head: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw in head.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || is_comment(trimmed) {
            continue;
        }

        let indented = raw.starts_with("    ") || raw.starts_with('\t');
        match lines.last_mut() {
            Some(previous) if indented => previous.push_str(trimmed),
            _ => lines.push(trimmed.to_string()),
        }
    }

    lines
}

/// 复制 header；`Authorization: Basic user [pass]` 转换为 Basic 凭据，不再作为原始 header 发送
fn transfer_headers(request: &mut Request, headers: &HeaderSet, line: usize) -> ParseResult<()> {
    for (key, value) in headers.iter() {
        if key.eq_ignore_ascii_case("authorization")
            && let Some((username, password)) = basic_credentials(value)
        {
            request.credentials = Some(Credentials::Basic {
                username: username.to_string(),
                password,
            });
            continue;
        }

        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| ParseError::InvalidHeader {
            line,
            message: format!("'{}': {}", key, e),
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| ParseError::InvalidHeader {
            line,
            message: format!("value of '{}': {}", key, e),
        })?;
        request.headers.append(name, value);
    }
    Ok(())
}

/// `Basic alice secret` -> ("alice", Some("secret"))
///
/// 用户名之后的所有 token 以单个空格连接作为密码。
fn basic_credentials(value: &str) -> Option<(&str, Option<String>)> {
    let mut tokens = value.split_whitespace();
    if !tokens.next()?.eq_ignore_ascii_case("basic") {
        return None;
    }
    let username = tokens.next()?;
    let rest: Vec<&str> = tokens.collect();
    let password = (!rest.is_empty()).then(|| rest.join(" "));
    Some((username, password))
}
