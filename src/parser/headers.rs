use crate::parser::types::HeaderSet;

/// 解析 header 块，每行 `Key: Value`
///
/// 缺少冒号的行只记录警告并跳过，不会中断解析。
pub fn parse_headers(raw: &str) -> HeaderSet {
    let mut headers = HeaderSet::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }

        match line.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                headers.add(key.trim(), value.trim());
            }
            _ => tracing::warn!(header = line, "cannot parse header"),
        }
    }

    headers
}

/// 判断是否为注释行
pub(crate) fn is_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("//")
}
