use crate::variable::types::Environment;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// 变量替换器
pub struct VariableResolver;

impl VariableResolver {
    /// 替换文本中所有 `{{key}}` 占位符
    ///
    /// 只扫描一遍原文：替换结果不会再次参与匹配，未定义的 key 保持原样。
    pub fn substitute(text: &str, env: &Environment) -> String {
        static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = VAR_REGEX.get_or_init(|| Regex::new(r"\{\{([^{}]*)\}\}").unwrap());

        if env.is_empty() {
            return text.to_string();
        }

        re.replace_all(text, |caps: &Captures| {
            let var_name = &caps[1];
            env.get(var_name).unwrap_or(&caps[0]).to_string()
        })
        .into_owned()
    }

    /// 解析并替换系统环境变量 ${VAR}
    pub fn resolve_env_vars(text: &str) -> String {
        static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

        re.replace_all(text, |caps: &Captures| {
            let env_name = &caps[1];
            std::env::var(env_name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Environment {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_substitute_simple() {
        let ctx = env(&[("host", "localhost:8080"), ("token", "secret-token")]);

        let input = "GET https://{{host}}/api\nAuthorization: Bearer {{token}}";
        let output = VariableResolver::substitute(input, &ctx);
        assert_eq!(
            output,
            "GET https://localhost:8080/api\nAuthorization: Bearer secret-token"
        );
    }

    #[test]
    fn test_substitute_repeated_key() {
        let ctx = env(&[("id", "42")]);

        let output = VariableResolver::substitute("/a/{{id}}/b/{{id}}?x={{id}}", &ctx);
        assert_eq!(output, "/a/42/b/42?x=42");
    }

    #[test]
    fn test_substitute_missing_variable() {
        let ctx = env(&[("known", "1")]);

        let input = "{{missing}}/path/{{known}}";
        let output = VariableResolver::substitute(input, &ctx);
        // 未找到的变量保持原样
        assert_eq!(output, "{{missing}}/path/1");
    }

    #[test]
    fn test_substitute_does_not_rescan() {
        let ctx = env(&[("a", "{{b}}"), ("b", "boom")]);

        let output = VariableResolver::substitute("{{a}} {{b}}", &ctx);
        assert_eq!(output, "{{b}} boom");
    }

    #[test]
    fn test_substitute_idempotent() {
        let ctx = env(&[("host", "example.com"), ("path", "users")]);

        let once = VariableResolver::substitute("https://{{host}}/{{path}}?q={{other}}", &ctx);
        let twice = VariableResolver::substitute(&once, &ctx);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_substitute_key_with_symbols() {
        let ctx = env(&[("$random.uuid", "abc"), ("with space", "x")]);

        let output = VariableResolver::substitute("{{$random.uuid}}-{{with space}}", &ctx);
        assert_eq!(output, "abc-x");
    }

    #[test]
    fn test_substitute_nested_braces() {
        let ctx = env(&[("a", "1")]);

        assert_eq!(VariableResolver::substitute("{{{a}}}", &ctx), "{1}");
        assert_eq!(VariableResolver::substitute("{{ {{a}} }}", &ctx), "{{ 1 }}");
    }

    #[test]
    fn test_resolve_env_vars() {
        unsafe {
            std::env::set_var("HTTPER_TEST_VAR", "test_value");
        }

        let input = "Value: ${HTTPER_TEST_VAR}";
        let output = VariableResolver::resolve_env_vars(input);
        assert_eq!(output, "Value: test_value");

        unsafe {
            std::env::remove_var("HTTPER_TEST_VAR");
        }
    }

    #[test]
    fn test_resolve_env_vars_missing() {
        let input = "Value: ${HTTPER_NONEXISTENT_VAR}";
        let output = VariableResolver::resolve_env_vars(input);
        assert_eq!(output, "Value: ${HTTPER_NONEXISTENT_VAR}");
    }
}
