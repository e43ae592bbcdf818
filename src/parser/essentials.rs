use crate::http::types::{Method, Protocol};
use crate::parser::types::{ParseError, ParseResult};
use url::Url;

/// 请求行解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Essentials {
    pub method: Method,
    pub url: Url,
    pub protocol: Option<Protocol>,
}

/// 解析请求行
///
/// token 按单个空格切分，顺序无关：每个 token 依次尝试方法、URL、协议，
/// 每一类只取第一个命中的值，无法归类的 token 被忽略。方法缺省为 GET，
/// 找不到 URL 时报错。
///
/// 方法名总是先被当作方法处理，所以和方法同名的字面量永远不会成为 URL。
pub fn parse_essentials(line: &str, line_number: usize) -> ParseResult<Essentials> {
    let tokens: Vec<&str> = line.split(' ').map(str::trim).collect();

    let mut method = None;
    let mut url = None;
    let mut protocol = None;

    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index];
        if token.is_empty() {
            index += 1;
            continue;
        }

        if method.is_none()
            && let Some(parsed) = classify_method(token)
        {
            method = Some(parsed);
            index += 1;
            continue;
        }

        if url.is_none()
            && let Some(parsed) = classify_url(token)
        {
            url = Some(parsed);
            index += 1;
            continue;
        }

        if protocol.is_none()
            && let Some((parsed, consumed)) = classify_protocol(&tokens[index..])
        {
            protocol = Some(parsed);
            index += consumed;
            continue;
        }

        tracing::debug!(token, line = line_number, "ignoring unrecognized token in request line");
        index += 1;
    }

    let url = url.ok_or_else(|| ParseError::MissingUrl {
        line: line_number,
        essentials: line.to_string(),
    })?;

    Ok(Essentials {
        method: method.unwrap_or_default(),
        url,
        protocol,
    })
}

fn classify_method(token: &str) -> Option<Method> {
    Method::from_token(token)
}

/// 只接受带 scheme 的绝对 URL
fn classify_url(token: &str) -> Option<Url> {
    Url::parse(token).ok()
}

/// 协议名可能包含空格，因此拼接相邻 token 比较，最长匹配优先。
/// 返回匹配到的协议及其占用的 token 数。
fn classify_protocol(tokens: &[&str]) -> Option<(Protocol, usize)> {
    Protocol::ALL
        .into_iter()
        .filter(|protocol| {
            let count = protocol.token_count();
            tokens.len() >= count && tokens[..count].join(" ") == protocol.as_str()
        })
        .max_by_key(|protocol| protocol.token_count())
        .map(|protocol| (protocol, protocol.token_count()))
}
