use std::path::Path;

use crate::http::body::RequestBody;
use crate::http::multipart::MultipartBody;
use crate::parser::form;
use crate::parser::types::{ParseError, ParseResult};

/// 拆分 Content-Type：`multipart/form-data; boundary=foo` -> ("multipart/form-data", Some("foo"))
pub fn split_content_type(raw: &str) -> (&str, Option<&str>) {
    let (media_type, params) = raw.split_once(';').unwrap_or((raw, ""));

    let boundary = params
        .split(';')
        .map(str::trim)
        .find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("boundary")
                .then(|| value.trim().trim_matches('"'))
        })
        .filter(|boundary| !boundary.is_empty());

    (media_type.trim(), boundary)
}

/// 根据 Content-Type 构造请求体
///
/// - 没有 Content-Type：无请求体
/// - application/json：原文透传，不做重新序列化
/// - multipart/form-data：按 boundary 重建表单，`< path` 相对于 `base_dir`
/// - 其他类型：记录警告，不生成请求体
pub fn parse_body(
    content_type: Option<&str>,
    body: &str,
    base_dir: &Path,
) -> ParseResult<Option<RequestBody>> {
    let Some(raw) = content_type.map(str::trim).filter(|ct| !ct.is_empty()) else {
        return Ok(None);
    };

    let (media_type, boundary) = split_content_type(raw);

    if media_type.eq_ignore_ascii_case("application/json") {
        return Ok(Some(RequestBody::json(body)));
    }

    if media_type.eq_ignore_ascii_case("multipart/form-data") {
        let boundary = boundary.ok_or_else(|| ParseError::MissingBoundary {
            content_type: raw.to_string(),
        })?;
        let fields = form::parse_form(boundary, body, base_dir)?;
        return Ok(Some(RequestBody::Multipart(MultipartBody::new(
            boundary, fields,
        ))));
    }

    tracing::warn!(content_type = media_type, "unknown content-type, request body dropped");
    Ok(None)
}
