use std::io;

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tokio_util::io::ReaderStream;

use crate::http::body::ByteStream;
use crate::parser::form::{FieldContent, FormField};

/// 按声明的 boundary 编码的 multipart/form-data 请求体
///
/// 持有所有字段，附件在发送时分块读取，不会整体读入内存。
#[derive(Debug)]
pub struct MultipartBody {
    boundary: String,
    fields: Vec<FormField>,
}

enum Chunk {
    Bytes(Bytes),
    File(std::fs::File),
}

impl MultipartBody {
    pub fn new(boundary: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            boundary: boundary.into(),
            fields,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// 编码后的总字节数
    pub fn content_length(&self) -> u64 {
        let parts: u64 = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| self.part_head(index, field).len() as u64 + field.content.len())
            .sum();
        parts + self.closing().len() as u64
    }

    pub fn into_stream(self) -> ByteStream {
        let chunks = self.into_chunks();
        Box::pin(stream::iter(chunks).flat_map(|chunk| -> ByteStream {
            match chunk {
                Chunk::Bytes(bytes) => Box::pin(stream::once(async move { Ok::<_, io::Error>(bytes) })),
                Chunk::File(file) => Box::pin(ReaderStream::new(tokio::fs::File::from_std(file))),
            }
        }))
    }

    fn into_chunks(self) -> Vec<Chunk> {
        let closing = self.closing();
        // part_head 借用 self，先生成全部头部再拿走字段内容
        let heads: Vec<Vec<u8>> = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| self.part_head(index, field))
            .collect();

        let mut chunks = Vec::new();
        for (head, field) in heads.into_iter().zip(self.fields) {
            chunks.push(Chunk::Bytes(Bytes::from(head)));
            match field.content {
                FieldContent::Text(text) => chunks.push(Chunk::Bytes(Bytes::from(text))),
                FieldContent::Files(files) => {
                    for (i, attachment) in files.into_iter().enumerate() {
                        if i > 0 {
                            chunks.push(Chunk::Bytes(Bytes::from_static(
                                FieldContent::FILE_SEPARATOR,
                            )));
                        }
                        chunks.push(Chunk::File(attachment.into_file()));
                    }
                }
            }
        }

        chunks.push(Chunk::Bytes(Bytes::from(closing)));
        chunks
    }

    /// 分隔行 + part 头部 + 空行
    fn part_head(&self, index: usize, field: &FormField) -> Vec<u8> {
        let mut head = String::new();
        if index > 0 {
            head.push_str("\r\n");
        }
        head.push_str(&format!("--{}\r\n", self.boundary));

        let mut disposition = format!("form-data; name=\"{}\"", escape_quotes(&field.name));
        if let Some(filename) = &field.filename {
            disposition.push_str(&format!("; filename=\"{}\"", escape_quotes(filename)));
        }
        head.push_str(&format!("Content-Disposition: {}\r\n", disposition));

        for (key, value) in field.headers.iter() {
            if key.eq_ignore_ascii_case("content-disposition") {
                continue;
            }
            head.push_str(&format!("{}: {}\r\n", key, value));
        }

        if field.is_file() && !field.headers.contains("Content-Type") {
            head.push_str("Content-Type: application/octet-stream\r\n");
        }

        head.push_str("\r\n");
        head.into_bytes()
    }

    fn closing(&self) -> String {
        if self.fields.is_empty() {
            format!("--{}--\r\n", self.boundary)
        } else {
            format!("\r\n--{}--\r\n", self.boundary)
        }
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::body::RequestBody;
    use crate::parser::form::parse_form;
    use crate::parser::types::HeaderSet;
    use std::fs;
    use tempfile::TempDir;

    fn text_field(name: &str, value: &str) -> FormField {
        FormField {
            name: name.to_string(),
            filename: None,
            headers: HeaderSet::new(),
            content: FieldContent::Text(value.to_string()),
        }
    }

    #[tokio::test]
    async fn test_encode_text_fields() {
        let body = MultipartBody::new("foo", vec![text_field("a", "1"), text_field("b", "two")]);
        let expected = "--foo\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n\
                        --foo\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\ntwo\r\n\
                        --foo--\r\n";

        assert_eq!(body.content_length(), expected.len() as u64);
        let bytes = RequestBody::Multipart(body).collect().await.unwrap();
        assert_eq!(bytes, expected.as_bytes());
    }

    #[tokio::test]
    async fn test_encode_empty_form() {
        let body = MultipartBody::new("x", Vec::new());
        assert_eq!(body.content_length(), 7);
        let bytes = RequestBody::Multipart(body).collect().await.unwrap();
        assert_eq!(bytes, "--x--\r\n".as_bytes());
    }

    #[tokio::test]
    async fn test_encode_files_with_separator() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "first").unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();

        let raw = "--b\nContent-Disposition: form-data; name=\"docs\"; filename=\"all.txt\"\nContent-Type: text/plain\n\n< a.txt\n< b.txt\n--b--";
        let fields = parse_form("b", raw, dir.path()).unwrap();
        let body = MultipartBody::new("b", fields);
        let length = body.content_length();

        let bytes = RequestBody::Multipart(body).collect().await.unwrap();
        let expected = "--b\r\nContent-Disposition: form-data; name=\"docs\"; filename=\"all.txt\"\r\n\
                        Content-Type: text/plain\r\n\r\nfirst\nsecond\r\n--b--\r\n";
        assert_eq!(String::from_utf8_lossy(&bytes), expected);
        assert_eq!(length, bytes.len() as u64);
    }

    #[tokio::test]
    async fn test_file_part_gets_default_content_type() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.bin"), [1u8, 2, 3]).unwrap();

        let raw = "--z\nContent-Disposition: form-data; name=\"f\"; filename=\"data.bin\"\n\n< data.bin\n--z--";
        let fields = parse_form("z", raw, dir.path()).unwrap();
        let bytes = RequestBody::Multipart(MultipartBody::new("z", fields))
            .collect()
            .await
            .unwrap();

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Content-Type: application/octet-stream\r\n\r\n"));
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
