use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use httper::http::{Client, ClientOptions};
use httper::parser;
use httper::runner::{RequestExecutor, RunReporter, RunSummary};
use httper::utils::DEFAULT_SAVE_DIR;
use httper::variable::{Environment, EnvironmentLoader};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 要执行的 .http 文件
    pub file: PathBuf,

    /// 使用环境文件中的哪个环境（如 dev、prod）
    #[arg(short, long)]
    pub env: Option<String>,

    /// 指定环境文件（JSON 或 TOML），不再自动查找
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// 覆盖环境变量，可重复
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// 显示请求头、响应头与完整响应体
    #[arg(short, long)]
    pub verbose: bool,

    /// 把响应体保存到输出目录
    #[arg(short, long)]
    pub save: bool,

    /// `--save` 的输出目录
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_SAVE_DIR)]
    pub output_dir: PathBuf,

    /// 接受无效的 TLS 证书
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// 遇到第一个解析失败或请求失败时停止
    #[arg(long)]
    pub fail_fast: bool,
}

fn parse_var(s: &str) -> std::result::Result<(String, String), String> {
    EnvironmentLoader::parse_cli_var(s).ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))
}

/// 执行文档中的所有请求，全部成功时返回 true
pub async fn run(cli: Cli) -> Result<bool> {
    let file = cli
        .file
        .canonicalize()
        .with_context(|| format!("cannot open {}", cli.file.display()))?;
    let document_dir = file.parent().unwrap_or_else(|| Path::new("."));

    let env = load_environment(&cli, document_dir)?;
    tracing::debug!(variables = env.len(), "environment loaded");

    let reporter = RunReporter::new(cli.verbose);
    let (requests, failures) = if cli.fail_fast {
        let content = fs::read_to_string(&file)
            .with_context(|| format!("cannot read {}", file.display()))?;
        match parser::parse_request(&content, &env, document_dir) {
            Ok(requests) => (requests, Vec::new()),
            Err(failure) => {
                reporter.print_parse_failure(&failure);
                return Ok(false);
            }
        }
    } else {
        let document = parser::parse_file(&file, &env)
            .with_context(|| format!("cannot parse {}", file.display()))?;
        (document.requests, document.failures)
    };

    reporter.print_header(&cli.file.display().to_string(), requests.len() + failures.len());
    for failure in &failures {
        reporter.print_parse_failure(failure);
    }

    let client = Client::with_options(ClientOptions {
        insecure: cli.insecure,
    })?;
    let executor = RequestExecutor::new(client)
        .with_save_dir(cli.save.then(|| cli.output_dir.clone()))
        .with_fail_fast(cli.fail_fast);

    let results = executor
        .execute_all(requests, |result| reporter.print_result(result))
        .await;

    let summary = RunSummary::from_results(&results, failures.len());
    reporter.print_summary(&summary);

    Ok(summary.is_success())
}

/// `--env-file` 优先，否则自动查找；未指定 `--env` 时只使用 `--var`
fn load_environment(cli: &Cli, document_dir: &Path) -> Result<Environment> {
    let path = match &cli.env_file {
        Some(path) => Some(path.clone()),
        None if cli.env.is_some() => EnvironmentLoader::discover(document_dir),
        None => None,
    };

    let map = match &path {
        Some(path) => Some(
            EnvironmentLoader::load_from_path(path)
                .with_context(|| format!("cannot load environment file {}", path.display()))?,
        ),
        None => None,
    };

    Ok(EnvironmentLoader::build_environment(
        map.as_ref(),
        cli.env.as_deref(),
        &cli.vars,
    ))
}
