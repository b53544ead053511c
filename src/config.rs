//! 程序配置
//!
//! 加载顺序：
//! 1. 内置默认值
//! 2. TOML 文件（`QUIZ_CONFIG` 指定的路径，否则当前目录下存在的 `quiz.toml`）
//! 3. 环境变量覆盖

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "quiz.toml";

/// LLM 后端
///
/// 两种后端都走 OpenAI 兼容接口，区别只在默认端点和模型
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    #[default]
    OpenAi,
    Gemini,
}

impl LlmBackend {
    pub fn default_api_base(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "https://api.openai.com/v1",
            LlmBackend::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmBackend::OpenAi => "gpt-4o-mini",
            LlmBackend::Gemini => "gemini-2.0-flash",
        }
    }
}

impl FromStr for LlmBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmBackend::OpenAi),
            "gemini" => Ok(LlmBackend::Gemini),
            other => Err(format!("未知的 LLM 后端: {}", other)),
        }
    }
}

/// 考试页面的选择器
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ExamSelectors {
    /// 开始考试按钮
    pub start_button: String,
    /// 交卷按钮
    pub submit_button: String,
    /// 题目容器 id 前缀，后接题号
    pub question_id_prefix: String,
    /// 题干元素（在题目容器内）
    pub question_text: String,
    /// 选项标签（在题目容器内）
    pub option_label: String,
}

impl Default for ExamSelectors {
    fn default() -> Self {
        Self {
            start_button: ".btnStartExam".to_string(),
            submit_button: ".btnSendExam".to_string(),
            question_id_prefix: "div_q_".to_string(),
            question_text: "h4".to_string(),
            option_label: ".form-check-label".to_string(),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 答题循环 ---
    /// 重复答题次数
    pub attempts: u32,
    /// 两次答题之间的间隔（秒）
    pub attempt_delay_secs: u64,
    /// 整场失败后的冷却时间（秒）
    pub failure_cooldown_secs: u64,
    /// 每场题目数量
    pub question_count: usize,
    // --- 页面 ---
    /// 手动登录的页面
    pub login_url: String,
    /// 考试页面
    pub exam_url: String,
    /// 等待元素可点击的超时（秒）
    pub element_timeout_secs: u64,
    /// 点击开始后等待页面渲染（毫秒）
    pub page_settle_ms: u64,
    pub selectors: ExamSelectors,
    // --- 浏览器 ---
    /// 设置后连接已打开的浏览器调试端口，否则自行启动浏览器
    pub browser_debug_port: Option<u16>,
    /// 自行启动时使用的用户数据目录（保留登录状态）
    pub browser_user_data_dir: String,
    /// 浏览器可执行文件路径，不设置则自动探测
    pub browser_executable: Option<String>,
    // --- LLM 配置 ---
    pub llm_backend: LlmBackend,
    pub llm_api_key: String,
    /// 不设置则使用后端的默认端点
    pub llm_api_base_url: Option<String>,
    /// 不设置则使用后端的默认模型
    pub llm_model_name: Option<String>,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    /// 单题最多调用 LLM 的次数
    pub oracle_max_attempts: u32,
    /// 重试退避基数（毫秒），第 k 次失败后等待 k 倍
    pub oracle_backoff_base_ms: u64,
    // --- 日志 ---
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 随机作答与失败记录文件，留空则不写
    pub audit_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attempts: 1,
            attempt_delay_secs: 5,
            failure_cooldown_secs: 30,
            question_count: 10,
            login_url: "https://isafeevent.moe.edu.tw/".to_string(),
            exam_url: "https://isafeevent.moe.edu.tw/exam/".to_string(),
            element_timeout_secs: 20,
            page_settle_ms: 3000,
            selectors: ExamSelectors::default(),
            browser_debug_port: None,
            browser_user_data_dir: "chrome-profile".to_string(),
            browser_executable: None,
            llm_backend: LlmBackend::default(),
            llm_api_key: String::new(),
            llm_api_base_url: None,
            llm_model_name: None,
            llm_temperature: 0.2,
            llm_max_tokens: 200,
            oracle_max_attempts: 3,
            oracle_backoff_base_ms: 2000,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            audit_file: Some("guessed.txt".to_string()),
        }
    }
}

impl Config {
    /// 按 默认值 → TOML 文件 → 环境变量 的顺序加载并校验
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("QUIZ_CONFIG") {
            Ok(path) => Self::from_toml_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载，缺省字段使用默认值
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = get("QUIZ_ATTEMPTS") {
            self.attempts = parse_var("QUIZ_ATTEMPTS", &v)?;
        }
        if let Some(v) = get("QUIZ_ATTEMPT_DELAY_SECS") {
            self.attempt_delay_secs = parse_var("QUIZ_ATTEMPT_DELAY_SECS", &v)?;
        }
        if let Some(v) = get("QUIZ_FAILURE_COOLDOWN_SECS") {
            self.failure_cooldown_secs = parse_var("QUIZ_FAILURE_COOLDOWN_SECS", &v)?;
        }
        if let Some(v) = get("QUIZ_EXAM_URL") {
            self.exam_url = v;
        }
        if let Some(v) = get("QUIZ_LOGIN_URL") {
            self.login_url = v;
        }
        if let Some(v) = get("BROWSER_DEBUG_PORT") {
            self.browser_debug_port = Some(parse_var("BROWSER_DEBUG_PORT", &v)?);
        }
        if let Some(v) = get("BROWSER_USER_DATA_DIR") {
            self.browser_user_data_dir = v;
        }
        if let Some(v) = get("LLM_BACKEND") {
            self.llm_backend = parse_var("LLM_BACKEND", &v)?;
        }
        if let Some(v) = get("LLM_API_KEY") {
            self.llm_api_key = v;
        }
        if let Some(v) = get("LLM_API_BASE_URL") {
            self.llm_api_base_url = Some(v);
        }
        if let Some(v) = get("LLM_MODEL_NAME") {
            self.llm_model_name = Some(v);
        }
        if let Some(v) = get("VERBOSE_LOGGING") {
            self.verbose_logging = parse_var("VERBOSE_LOGGING", &v)?;
        }
        if let Some(v) = get("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
        Ok(())
    }

    /// 校验取值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempts == 0 {
            return Err(ConfigError::invalid("attempts", "至少为 1"));
        }
        if self.question_count == 0 {
            return Err(ConfigError::invalid("question_count", "至少为 1"));
        }
        if self.oracle_max_attempts == 0 {
            return Err(ConfigError::invalid("oracle_max_attempts", "至少为 1"));
        }
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::invalid("llm_api_key", "未设置 (可用环境变量 LLM_API_KEY)"));
        }
        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.llm_api_base_url
            .as_deref()
            .unwrap_or_else(|| self.llm_backend.default_api_base())
    }

    pub fn model_name(&self) -> &str {
        self.llm_model_name
            .as_deref()
            .unwrap_or_else(|| self.llm_backend.default_model())
    }

    pub fn attempt_delay(&self) -> Duration {
        Duration::from_secs(self.attempt_delay_secs)
    }

    pub fn failure_cooldown(&self) -> Duration {
        Duration::from_secs(self.failure_cooldown_secs)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn oracle_backoff_base(&self) -> Duration {
        Duration::from_millis(self.oracle_backoff_base_ms)
    }
}

fn parse_var<T: FromStr>(var_name: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: std::any::type_name::<T>().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_match_exam_site() {
        let config = Config::default();
        assert_eq!(config.question_count, 10);
        assert_eq!(config.failure_cooldown_secs, 30);
        assert_eq!(config.oracle_max_attempts, 3);
        assert_eq!(config.selectors.start_button, ".btnStartExam");
        assert_eq!(config.selectors.submit_button, ".btnSendExam");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            attempts = 4
            llm_backend = "gemini"
            llm_api_key = "k"

            [selectors]
            option_label = "label.choice"
            "#,
        )
        .unwrap();

        assert_eq!(config.attempts, 4);
        assert_eq!(config.llm_backend, LlmBackend::Gemini);
        assert_eq!(config.selectors.option_label, "label.choice");
        assert_eq!(config.selectors.question_text, "h4");
        assert_eq!(config.question_count, 10);
        assert_eq!(config.model_name(), "gemini-2.0-flash");
        assert!(config.api_base_url().contains("generativelanguage"));
    }

    #[test]
    fn test_env_overrides() {
        let env = vars(&[
            ("QUIZ_ATTEMPTS", "7"),
            ("LLM_BACKEND", "Gemini"),
            ("LLM_MODEL_NAME", "custom-model"),
            ("BROWSER_DEBUG_PORT", "9222"),
        ]);
        let mut config = Config::default();
        config.apply_vars(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.attempts, 7);
        assert_eq!(config.llm_backend, LlmBackend::Gemini);
        assert_eq!(config.model_name(), "custom-model");
        assert_eq!(config.browser_debug_port, Some(9222));
    }

    #[test]
    fn test_env_parse_failure() {
        let env = vars(&[("QUIZ_ATTEMPTS", "many")]);
        let mut config = Config::default();
        let err = config.apply_vars(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnvVarParseFailed { ref var_name, .. } if var_name == "QUIZ_ATTEMPTS"
        ));
    }

    #[test]
    fn test_validate() {
        let mut config = Config {
            llm_api_key: "key".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.attempts = 0;
        assert!(config.validate().is_err());

        config.attempts = 1;
        config.llm_api_key = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
