use std::path::PathBuf;

use crate::http::Request;

/// 大小写不敏感、可重复的 header 集合
///
/// 同名 header 的多个值按出现顺序保存；key 的顺序与拼写以第一次出现为准。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个值，不覆盖已有的同名 header
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(index) => self.entries[index].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// 第一个值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(|s| s.as_str())
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.position(key)
            .map(|index| self.entries[index].1.as_slice())
            .unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.position(key)
            .map(|index| self.entries.remove(index).1)
    }

    /// 按插入顺序展开为 (name, value)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// 不同 header 名的数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

/// 文档中以 `###` 分隔的一个请求块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBlock<'a> {
    /// 块序号（从 1 开始，包含被跳过的空块）
    pub number: usize,

    /// 块正文第一行所在的行号（从 1 开始）
    pub line: usize,

    /// 分隔行 `###` 之后的标题
    pub title: Option<&'a str>,

    /// 去掉首尾空白后的块内容
    pub text: &'a str,
}

impl RequestBlock<'_> {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// 解析错误类型
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 请求行中找不到 URL
    #[error("No URL found in request line at line {line}: '{essentials}'")]
    MissingUrl { line: usize, essentials: String },

    /// header 名或值不是合法的 HTTP token
    #[error("Invalid header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },

    /// multipart/form-data 缺少 boundary 参数
    #[error("Missing multipart boundary in Content-Type '{content_type}'")]
    MissingBoundary { content_type: String },

    /// `< path` 引用的文件无法打开
    #[error("Cannot read attachment '{}': {source}", .path.display())]
    Attachment {
        path: PathBuf,
        source: std::io::Error,
    },

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// 是否属于 IO 类错误（附件或文档读取失败）
    pub fn is_io(&self) -> bool {
        matches!(self, ParseError::Attachment { .. } | ParseError::Io(_))
    }
}

/// 解析结果类型别名
pub type ParseResult<T> = Result<T, ParseError>;

/// 某个请求块解析失败，附带块序号便于定位
#[derive(Debug, thiserror::Error)]
#[error("request #{block} (line {line}): {error}")]
pub struct BlockError {
    pub block: usize,
    pub line: usize,
    #[source]
    pub error: ParseError,
}

/// 整个文档的解析结果：成功的请求与失败的块互不影响
#[derive(Debug, Default)]
pub struct ParsedDocument {
    /// 按文档顺序排列的可执行请求
    pub requests: Vec<Request>,

    /// 解析失败的块
    pub failures: Vec<BlockError>,

    /// 源文件路径（用于错误报告）
    pub source_path: Option<PathBuf>,
}

impl ParsedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_path(mut self, path: PathBuf) -> Self {
        self.source_path = Some(path);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// 按块序号查找失败原因
    pub fn failure(&self, block: usize) -> Option<&BlockError> {
        self.failures.iter().find(|f| f.block == block)
    }

    /// 只要有一个块失败就返回第一个错误
    pub fn into_result(self) -> Result<Vec<Request>, BlockError> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure),
            None => Ok(self.requests),
        }
    }
}
