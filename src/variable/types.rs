use serde::Deserialize;
use std::collections::HashMap;

/// 扁平的占位符映射：`{{name}}` -> value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, serde_json::Value>")]
pub struct Environment {
    variables: HashMap<String, String>,
}

impl Environment {
    /// 创建新的空环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入变量
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// 获取变量值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// 批量插入变量
    pub fn extend(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        self.variables.extend(vars);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 变量数量
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl From<HashMap<String, serde_json::Value>> for Environment {
    fn from(raw: HashMap<String, serde_json::Value>) -> Self {
        Self {
            variables: raw
                .into_iter()
                .map(|(key, value)| (key, render_value(&value)))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 把环境文件里的标量渲染成替换文本
///
/// 字符串原样输出，null 为空串，数组/对象输出紧凑 JSON。
pub fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 按名称组织的多套环境（如 dev / prod）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentMap {
    pub environments: HashMap<String, Environment>,
}

impl EnvironmentMap {
    /// 获取指定环境的变量
    pub fn get(&self, env_name: &str) -> Option<&Environment> {
        self.environments.get(env_name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.environments.keys().map(|s| s.as_str())
    }
}

/// TOML 配置文件：`[environments.<name>]`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub environments: HashMap<String, Environment>,
}

impl From<ConfigFile> for EnvironmentMap {
    fn from(config: ConfigFile) -> Self {
        Self {
            environments: config.environments,
        }
    }
}
