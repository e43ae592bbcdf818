use crate::Result;
use crate::variable::resolver::VariableResolver;
use crate::variable::types::{ConfigFile, Environment, EnvironmentMap};
use std::fs;
use std::path::{Path, PathBuf};

/// 环境文件加载器
pub struct EnvironmentLoader;

impl EnvironmentLoader {
    /// 与 .http 文件放在同一目录下的 JSON 环境文件
    pub const ENV_FILE: &'static str = "http-client.env.json";
    /// TOML 配置文件名
    pub const CONFIG_FILE: &'static str = "httper.toml";

    /// 从指定路径加载，按扩展名区分 TOML 与 JSON
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<EnvironmentMap> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            let config: ConfigFile = toml::from_str(&content)?;
            Ok(config.into())
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// 查找环境文件
    /// 查找顺序：
    /// 1. 文档目录下的 http-client.env.json
    /// 2. 文档目录及其父目录中的 httper.toml
    /// 3. 用户配置目录 ~/.config/httper/
    pub fn discover(document_dir: &Path) -> Option<PathBuf> {
        let json = document_dir.join(Self::ENV_FILE);
        if json.is_file() {
            return Some(json);
        }

        let mut current = document_dir.to_path_buf();
        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("httper").join(Self::CONFIG_FILE);
        config_path.is_file().then_some(config_path)
    }

    /// 构建最终用于替换的环境
    /// env_name: 环境名称（如 "dev", "prod"）
    /// cli_vars: CLI 传入的变量覆盖（--var key=value）
    pub fn build_environment(
        map: Option<&EnvironmentMap>,
        env_name: Option<&str>,
        cli_vars: &[(String, String)],
    ) -> Environment {
        let mut environment = Environment::new();

        if let Some(name) = env_name {
            match map.and_then(|m| m.get(name)) {
                Some(env) => {
                    for (key, value) in env.iter() {
                        environment.insert(key, VariableResolver::resolve_env_vars(value));
                    }
                }
                None => tracing::warn!(environment = name, "environment not found"),
            }
        }

        // CLI 覆盖优先级最高
        environment.extend(cli_vars.iter().cloned());

        environment
    }

    /// 解析 CLI 变量参数 "key=value"
    pub fn parse_cli_var(s: &str) -> Option<(String, String)> {
        s.split_once('=')
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
    }
}
