use crate::parser::BlockError;
use crate::runner::types::{RunResult, RunSummary};
use crate::utils::{ResponseFormat, ResponseFormatter};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

pub struct RunReporter {
    verbose: bool,
    formatter: ResponseFormatter,
}

impl RunReporter {
    pub fn new(verbose: bool) -> Self {
        let format = if verbose {
            ResponseFormat::Verbose
        } else {
            ResponseFormat::Compact
        };

        Self {
            verbose,
            formatter: ResponseFormatter::new(format),
        }
    }

    /// 打印开始信息
    pub fn print_header(&self, file_path: &str, total: usize) {
        println!(
            "\nRunning {} requests from {}...\n",
            total,
            file_path.bold()
        );
    }

    /// 打印解析失败的块
    pub fn print_parse_failure(&self, failure: &BlockError) {
        println!(
            " {} [#{}] line {}: {}",
            "✗".red(),
            failure.block,
            failure.line,
            failure.error.to_string().red()
        );
    }

    /// 打印单个请求结果
    pub fn print_result(&self, result: &RunResult) {
        let symbol = if result.success { "✓".green() } else { "✗".red() };
        println!(
            " {} [{}] {}",
            symbol,
            result.display_name(),
            result.request_line.cyan()
        );

        if let Some(request) = self
            .formatter
            .format_request(&result.request_line, &result.request_headers)
        {
            print_indented(&request);
        }

        if let Some(response) = &result.response {
            println!("{}", status_table(result));
            if self.verbose || !result.success {
                print_indented(&self.formatter.format(response));
            }
        }

        if let Some(path) = &result.saved_to {
            println!("   {}: {}", "Saved".blue(), path.display());
        }

        // 转换或网络错误
        if let Some(error) = &result.error {
            println!("   {}: {}", "Error".red().bold(), error);
        }
        println!();
    }

    /// 打印执行摘要
    pub fn print_summary(&self, summary: &RunSummary) {
        println!("{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        let mut parts = vec![format!("{} passed", summary.passed.to_string().green())];
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed.to_string().red()));
        }
        if summary.invalid > 0 {
            parts.push(format!("{} invalid", summary.invalid.to_string().yellow()));
        }
        parts.push(format!("{} total", summary.total));

        println!("  {}: {}", "Requests".bold(), parts.join(", "));
        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            summary.total_duration.as_secs_f64()
        );
        println!();
    }
}

impl Default for RunReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Status / Duration / Content-Length 表格
pub fn status_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    if let Some(response) = &result.response {
        let status_color = if response.is_success() {
            Color::Green
        } else if response.status.is_client_error() {
            Color::Yellow
        } else {
            Color::Red
        };

        table.add_row(vec![
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new(format!(
                "{} {}",
                response.status.code(),
                response.status.reason_phrase()
            ))
            .fg(status_color),
        ]);
        table.add_row(vec![
            Cell::new("Duration").add_attribute(Attribute::Bold),
            Cell::new(format!("{:?}", response.duration)),
        ]);
        table.add_row(vec![
            Cell::new("Content-Length").add_attribute(Attribute::Bold),
            Cell::new(response.content_length()),
        ]);
    }

    table
}

fn print_indented(text: &str) {
    for line in text.lines() {
        println!("   {}", line);
    }
}
