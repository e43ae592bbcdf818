use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttperError {
    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML 解析错误: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for HttperError {
    fn from(err: anyhow::Error) -> Self {
        HttperError::Other(err.to_string())
    }
}

// 附件读取失败保留为 IO 错误，其余解析错误统一折叠为 ParseError
impl From<crate::parser::ParseError> for HttperError {
    fn from(err: crate::parser::ParseError) -> Self {
        match err {
            crate::parser::ParseError::Attachment { path, source } => HttperError::IoError(
                std::io::Error::new(source.kind(), format!("{}: {}", path.display(), source)),
            ),
            crate::parser::ParseError::Io(source) => HttperError::IoError(source),
            other => HttperError::ParseError(other.to_string()),
        }
    }
}

impl From<crate::parser::BlockError> for HttperError {
    fn from(err: crate::parser::BlockError) -> Self {
        let message = format!("request #{} (line {})", err.block, err.line);
        match HttperError::from(err.error) {
            HttperError::IoError(source) => HttperError::IoError(std::io::Error::new(
                source.kind(),
                format!("{}: {}", message, source),
            )),
            other => HttperError::ParseError(format!("{}: {}", message, other_message(other))),
        }
    }
}

fn other_message(err: HttperError) -> String {
    match err {
        HttperError::ParseError(message) => message,
        other => other.to_string(),
    }
}

/// Result type for httper crate
pub type Result<T> = std::result::Result<T, HttperError>;
