mod cli;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 初始化日志系统
    let level = if cli.verbose {
        "httper=debug,warn"
    } else {
        "httper=info,warn"
    };
    httper::logger::init_logger(level);

    let success = cli::run(cli).await?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
