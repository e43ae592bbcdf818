use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::Result;
use crate::http::Response;

/// `--save` 的默认目录
pub const DEFAULT_SAVE_DIR: &str = ".idea/httpRequests";

const FALLBACK_EXTENSION: &str = "txt";

/// 把响应体写入 `<dir>/<YYYY-MM-DDTHHMMSS>.<status>.<ext>`，返回文件路径
pub fn save_response(dir: &Path, response: &Response, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(file_name(now, response.status.code(), extension(response)));
    fs::write(&path, &response.body)?;

    tracing::debug!(path = %path.display(), bytes = response.body.len(), "response saved");
    Ok(path)
}

fn file_name(now: DateTime<Local>, status: u16, extension: &str) -> String {
    format!("{}.{}.{}", now.format("%Y-%m-%dT%H%M%S"), status, extension)
}

/// 由 Content-Type 推断扩展名
///
/// 候选有多个时依次选择：与 subtype 同名的、`txt`、字典序最大的。
fn extension(response: &Response) -> &'static str {
    let Some(mime) = response.media_type() else {
        return FALLBACK_EXTENSION;
    };
    let Some(extensions) = mime_guess::get_mime_extensions(&mime) else {
        return FALLBACK_EXTENSION;
    };

    extensions
        .iter()
        .find(|ext| **ext == mime.subtype().as_str())
        .or_else(|| extensions.iter().find(|ext| **ext == FALLBACK_EXTENSION))
        .or_else(|| extensions.iter().max())
        .copied()
        .unwrap_or(FALLBACK_EXTENSION)
}
