use crate::parser::types::RequestBlock;
use regex::{Matches, Regex};
use std::sync::OnceLock;

fn separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"(?m)^###").unwrap())
}

/// 按行首的 `###` 切分文档
///
/// 惰性迭代，分隔符本身被丢弃；`###` 同一行后面的文字作为下一个块的标题。
/// 文档中有 N 个分隔行时产生 N+1 个块，空块由调用方跳过。
pub fn split_blocks(content: &str) -> Blocks<'_> {
    Blocks {
        content,
        separators: separator().find_iter(content),
        cursor: 0,
        line: 1,
        number: 0,
        title: None,
        finished: false,
    }
}

pub struct Blocks<'a> {
    content: &'a str,
    separators: Matches<'static, 'a>,
    cursor: usize,
    line: usize,
    number: usize,
    title: Option<&'a str>,
    finished: bool,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = RequestBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let marker = self.separators.next();
        let end = marker.map_or(self.content.len(), |m| m.start());
        let raw = &self.content[self.cursor..end];

        self.number += 1;
        let leading = raw.len() - raw.trim_start().len();
        let block = RequestBlock {
            number: self.number,
            line: self.line + raw[..leading].matches('\n').count(),
            title: self.title.take(),
            text: raw.trim(),
        };

        match marker {
            Some(marker) => {
                // 分隔行剩余部分是下一个块的标题
                let rest = &self.content[marker.end()..];
                let (title, consumed) = match rest.find('\n') {
                    Some(pos) => (&rest[..pos], pos + 1),
                    None => (rest, rest.len()),
                };
                let title = title.trim();
                self.title = (!title.is_empty()).then_some(title);
                self.cursor = marker.end() + consumed;
                // 块内的换行 + 分隔行本身
                self.line += raw.matches('\n').count() + 1;
            }
            None => self.finished = true,
        }

        Some(block)
    }
}
