use std::fmt;
use std::io;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt, stream};

use crate::http::multipart::MultipartBody;

/// 请求体的字节流
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

/// 解析得到的请求体
pub enum RequestBody {
    /// 原样发送的字节，例如 JSON 文本
    Bytes(Bytes),
    /// 重建后的 multipart/form-data 表单
    Multipart(MultipartBody),
}

impl RequestBody {
    /// JSON 原文透传
    pub fn json(text: &str) -> Self {
        RequestBody::Bytes(Bytes::copy_from_slice(text.as_bytes()))
    }

    /// 内存中的字节；multipart 返回 None
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RequestBody::Bytes(bytes) => Some(bytes),
            RequestBody::Multipart(_) => None,
        }
    }

    pub fn content_length(&self) -> u64 {
        match self {
            RequestBody::Bytes(bytes) => bytes.len() as u64,
            RequestBody::Multipart(multipart) => multipart.content_length(),
        }
    }

    pub fn into_stream(self) -> ByteStream {
        match self {
            RequestBody::Bytes(bytes) => Box::pin(stream::once(async move { Ok::<_, io::Error>(bytes) })),
            RequestBody::Multipart(multipart) => multipart.into_stream(),
        }
    }

    /// 把整个请求体读入内存，用于 verbose 输出和测试
    pub async fn collect(self) -> io::Result<Bytes> {
        if let RequestBody::Bytes(bytes) = self {
            return Ok(bytes);
        }

        let mut buffer = BytesMut::with_capacity(self.content_length() as usize);
        let mut stream = self.into_stream();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Bytes(bytes) => f
                .debug_struct("Bytes")
                .field("len", &bytes.len())
                .finish(),
            RequestBody::Multipart(multipart) => f
                .debug_struct("Multipart")
                .field("boundary", &multipart.boundary())
                .field("fields", &multipart.fields().len())
                .field("len", &multipart.content_length())
                .finish(),
        }
    }
}

impl From<RequestBody> for reqwest::Body {
    fn from(body: RequestBody) -> Self {
        match body {
            RequestBody::Bytes(bytes) => reqwest::Body::from(bytes),
            RequestBody::Multipart(multipart) => reqwest::Body::wrap_stream(multipart.into_stream()),
        }
    }
}
