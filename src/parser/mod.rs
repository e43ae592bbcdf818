pub mod assembler;
pub mod body;
pub mod essentials;
pub mod form;
pub mod headers;
pub mod http_file;
pub mod splitter;
pub mod types;

use std::path::Path;

use crate::http::Request;
use crate::variable::Environment;

// Re-export commonly used types
pub use http_file::HttpFileParser;
pub use types::{BlockError, HeaderSet, ParseError, ParseResult, ParsedDocument, RequestBlock};

/// 从文件路径解析 HTTP 文件
pub fn parse_file<P: AsRef<Path>>(path: P, env: &Environment) -> ParseResult<ParsedDocument> {
    HttpFileParser::parse_file(path, env)
}

/// 解析整个文档，收集所有成功的请求和失败的块
pub fn parse_document(content: &str, env: &Environment, base_dir: &Path) -> ParsedDocument {
    HttpFileParser::parse_content(content, env, base_dir)
}

/// 解析整个文档，遇到第一个失败的块即返回
pub fn parse_request(
    content: &str,
    env: &Environment,
    base_dir: &Path,
) -> Result<Vec<Request>, BlockError> {
    HttpFileParser::parse_content_strict(content, env, base_dir)
}
