use crate::http::{Client, Request};
use crate::runner::types::RunResult;
use crate::utils::save_response;
use std::path::PathBuf;
use std::time::Instant;

/// 按文档顺序逐个执行请求
pub struct RequestExecutor {
    client: Client,
    save_dir: Option<PathBuf>,
    fail_fast: bool,
}

impl RequestExecutor {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            save_dir: None,
            fail_fast: false,
        }
    }

    /// 把成功收到的响应体写入该目录
    pub fn with_save_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.save_dir = dir;
        self
    }

    /// 第一个失败的请求之后不再继续
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// 批量执行所有请求，每个结果产生后立即回调
    pub async fn execute_all(
        &self,
        requests: Vec<Request>,
        mut on_result: impl FnMut(&RunResult),
    ) -> Vec<RunResult> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let result = self.execute_one(request).await;
            on_result(&result);

            let stop = self.fail_fast && !result.success;
            results.push(result);
            if stop {
                tracing::info!("stopping after first failed request");
                break;
            }
        }

        results
    }

    /// 执行单个请求
    pub async fn execute_one(&self, request: Request) -> RunResult {
        let result = RunResult::pending(&request);
        let start = Instant::now();

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                return result.with_error(format!("Request failed: {}", e), start.elapsed());
            }
        };

        let mut result = result.with_response(response);
        if let (Some(dir), Some(response)) = (&self.save_dir, &result.response) {
            match save_response(dir, response, chrono::Local::now()) {
                Ok(path) => result.saved_to = Some(path),
                Err(e) => tracing::error!(error = %e, dir = %dir.display(), "saving response"),
            }
        }

        result
    }
}
