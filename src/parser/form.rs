use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::parser::headers::parse_headers;
use crate::parser::types::{HeaderSet, ParseError, ParseResult};

/// 表单中的一个字段
#[derive(Debug)]
pub struct FormField {
    pub name: String,
    /// 有 filename 即为文件字段
    pub filename: Option<String>,
    pub headers: HeaderSet,
    pub content: FieldContent,
}

impl FormField {
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }
}

#[derive(Debug)]
pub enum FieldContent {
    /// 普通字段的原始文本
    Text(String),
    /// 文件字段引用的文件，相邻文件之间以 `\n` 连接
    Files(Vec<Attachment>),
}

impl FieldContent {
    pub const FILE_SEPARATOR: &'static [u8] = b"\n";

    /// 字段内容的字节数
    pub fn len(&self) -> u64 {
        match self {
            FieldContent::Text(text) => text.len() as u64,
            FieldContent::Files(files) => {
                let separators = files.len().saturating_sub(1) * Self::FILE_SEPARATOR.len();
                files.iter().map(|f| f.len).sum::<u64>() + separators as u64
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 已打开的附件；内容在发送时才以流的方式读取
#[derive(Debug)]
pub struct Attachment {
    pub path: PathBuf,
    pub len: u64,
    file: File,
}

impl Attachment {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = File::open(&path)?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"));
        }
        Ok(Self {
            path,
            len: metadata.len(),
            file,
        })
    }

    pub fn into_file(self) -> File {
        self.file
    }
}

/// 把伪 multipart 文本还原为字段列表
///
/// 1. 按 `--<boundary>` 切分，丢弃空片段和结尾的 `--`
/// 2. 每个片段以第一个空行分为 header 与 body
/// 3. 没有 Content-Disposition 的片段以其在切分结果中的位置（从 0 开始）命名
/// 4. 带 filename 的字段只识别以 `< ` 开头的行，路径相对于 `base_dir`
pub fn parse_form(boundary: &str, body: &str, base_dir: &Path) -> ParseResult<Vec<FormField>> {
    let delimiter = format!("--{}", boundary);
    let mut fields = Vec::new();

    for (position, fragment) in body.split(delimiter.as_str()).enumerate() {
        let fragment = fragment.trim();
        if fragment.is_empty() || fragment == "--" {
            continue;
        }

        fields.push(parse_field(fragment, position, base_dir)?);
    }

    tracing::debug!(boundary, fields = fields.len(), "reconstructed multipart form");
    Ok(fields)
}

fn parse_field(fragment: &str, position: usize, base_dir: &Path) -> ParseResult<FormField> {
    let (head, body) = split_head_body(fragment);
    let headers = parse_headers(head.trim());

    let Some(disposition) = headers.get("Content-Disposition") else {
        return Ok(FormField {
            name: position.to_string(),
            filename: None,
            content: FieldContent::Text(body.to_string()),
            headers,
        });
    };

    let (name, filename) = disposition_params(disposition);
    let name = name.unwrap_or_else(|| position.to_string());

    let content = if filename.is_some() {
        FieldContent::Files(attachments(body, base_dir)?)
    } else {
        FieldContent::Text(body.to_string())
    };

    Ok(FormField {
        name,
        filename,
        headers,
        content,
    })
}

/// 从 `form-data; name="a"; filename="b"` 中取出 name 与 filename
fn disposition_params(disposition: &str) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut filename = None;

    for segment in disposition.split(';') {
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').to_string();

        match key.trim().to_ascii_lowercase().as_str() {
            "name" => name = Some(value),
            "filename" => filename = Some(value),
            _ => {}
        }
    }

    (name, filename)
}

fn attachments(body: &str, base_dir: &Path) -> ParseResult<Vec<Attachment>> {
    body.lines()
        .filter_map(|line| line.strip_prefix("< "))
        .map(|reference| {
            let path = base_dir.join(reference.trim());
            Attachment::open(&path).map_err(|source| ParseError::Attachment { path, source })
        })
        .collect()
}

/// 在第一个空行处切分，空行本身不属于任何一侧
pub(crate) fn split_head_body(text: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            return (&text[..offset], &text[offset + line.len()..]);
        }
        offset += line.len();
    }
    (text, "")
}
