use crate::http::{Request, Response};
use reqwest::header::HeaderMap;
use std::path::PathBuf;
use std::time::Duration;

/// 单个请求的执行结果
#[derive(Debug, Clone)]
pub struct RunResult {
    /// 在文档中的块序号（从 1 开始）
    pub block: usize,

    /// `###` 之后的标题
    pub name: Option<String>,

    /// `GET https://example.com HTTP/2`
    pub request_line: String,

    /// 实际发送的请求头（不含 Basic 凭据）
    pub request_headers: HeaderMap,

    /// 响应状态码（如果成功）
    pub status: Option<u16>,

    /// 执行耗时
    pub duration: Duration,

    /// 是否成功（收到 2xx 响应）
    pub success: bool,

    /// 错误消息（如果失败）
    pub error: Option<String>,

    /// 完整的 HTTP 响应（用于详细输出）
    pub response: Option<Response>,

    /// `--save` 写入的文件
    pub saved_to: Option<PathBuf>,
}

impl RunResult {
    /// 发送前记录请求信息
    pub fn pending(request: &Request) -> Self {
        Self {
            block: request.block,
            name: request.name.clone(),
            request_line: request.request_line(),
            request_headers: request.headers.clone(),
            status: None,
            duration: Duration::ZERO,
            success: false,
            error: None,
            response: None,
            saved_to: None,
        }
    }

    pub fn with_response(mut self, response: Response) -> Self {
        self.status = Some(response.status.code());
        self.duration = response.duration;
        self.success = response.is_success();
        self.response = Some(response);
        self
    }

    pub fn with_error(mut self, error: String, duration: Duration) -> Self {
        self.success = false;
        self.error = Some(error);
        self.duration = duration;
        self
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.block),
        }
    }
}

/// 执行摘要
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// 解析失败、未执行的块
    pub invalid: usize,
    pub total_duration: Duration,
}

impl RunSummary {
    pub fn from_results(results: &[RunResult], invalid: usize) -> Self {
        let passed = results.iter().filter(|r| r.success).count();

        Self {
            total: results.len() + invalid,
            passed,
            failed: results.len() - passed,
            invalid,
            total_duration: results.iter().map(|r| r.duration).sum(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.invalid == 0
    }
}
