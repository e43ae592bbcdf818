use std::path::Path;

use crate::http::Request;
use crate::parser::assembler::assemble;
use crate::parser::splitter::split_blocks;
use crate::parser::types::{BlockError, ParseResult, ParsedDocument};
use crate::variable::{Environment, VariableResolver};

/// HTTP 文件解析器
pub struct HttpFileParser;

impl HttpFileParser {
    /// 从文件路径解析，附件路径相对于文件所在目录
    pub fn parse_file<P: AsRef<Path>>(path: P, env: &Environment) -> ParseResult<ParsedDocument> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let parsed = Self::parse_content(&content, env, base_dir);
        Ok(parsed.with_source_path(path.to_path_buf()))
    }

    /// 从字符串内容解析
    ///
    /// 先替换占位符再切分；某个块失败不影响其他块，失败按块序号记录。
    pub fn parse_content(content: &str, env: &Environment, base_dir: &Path) -> ParsedDocument {
        let content = VariableResolver::substitute(content, env);
        let mut document = ParsedDocument::new();

        for block in split_blocks(&content) {
            if block.is_empty() {
                continue;
            }

            match assemble(&block, base_dir) {
                Ok(Some(request)) => document.requests.push(request),
                Ok(None) => tracing::debug!(block = block.number, "skipping comment-only block"),
                Err(error) => {
                    tracing::warn!(block = block.number, line = block.line, %error, "cannot parse request");
                    document.failures.push(BlockError {
                        block: block.number,
                        line: block.line,
                        error,
                    });
                }
            }
        }

        document
    }

    /// 严格模式：第一个失败的块直接返回错误
    pub fn parse_content_strict(
        content: &str,
        env: &Environment,
        base_dir: &Path,
    ) -> Result<Vec<Request>, BlockError> {
        let content = VariableResolver::substitute(content, env);
        let mut requests = Vec::new();

        for block in split_blocks(&content).filter(|block| !block.is_empty()) {
            let assembled = assemble(&block, base_dir).map_err(|error| BlockError {
                block: block.number,
                line: block.line,
                error,
            })?;
            requests.extend(assembled);
        }

        Ok(requests)
    }
}
