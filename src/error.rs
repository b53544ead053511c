use thiserror::Error;

/// LLM 生成错误
///
/// 只在 `AnswerOracle` 内部流转，重试或随机兜底后就地消化，不会向上传播
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// 请求频率或配额受限（429 / quota / ResourceExhausted）
    #[error("请求频率或配额受限: {0}")]
    RateLimited(String),
    /// 临时性错误（超时、连接中断、5xx）
    #[error("临时性错误: {0}")]
    Transient(String),
    /// 其他不可重试的错误
    #[error("生成失败: {0}")]
    Other(String),
}

impl GenerationError {
    /// 是否值得重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::RateLimited(_) | GenerationError::Transient(_))
    }
}

/// 单题提取错误，跳过该题即可
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// 页面上找不到该题
    #[error("找不到第 {ordinal} 题")]
    NotFound { ordinal: usize },
    /// 题目存在但没有任何选项
    #[error("第 {ordinal} 题没有任何选项")]
    NoOptions { ordinal: usize },
    /// 读取页面失败
    #[error("读取第 {ordinal} 题失败: {message}")]
    Page { ordinal: usize, message: String },
}

/// 单题点击错误，记录后继续下一题
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// 找不到可点击的选项
    #[error("第 {ordinal} 题找不到选项 '{option}' 对应的控件")]
    NotFound { ordinal: usize, option: String },
    /// 执行点击失败
    #[error("第 {ordinal} 题点击失败: {message}")]
    Page { ordinal: usize, message: String },
}

/// 开始 / 提交考试时的页面错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExamError {
    /// 找不到元素
    #[error("找不到元素: {selector}")]
    ElementNotFound { selector: String },
    /// 等待元素可点击超时
    #[error("等待元素 {selector} 超时 ({secs} 秒)")]
    Timeout { selector: String, secs: u64 },
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    Script(String),
}

/// 整场答题失败，交给 RunLoop 决定冷却与重来
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 开始考试失败
    #[error("开始考试失败: {0}")]
    StartFailed(ExamError),
    /// 一道题都没有提取到
    #[error("{attempted} 道题全部提取失败，未提交")]
    NoQuestions { attempted: usize },
    /// 提交失败
    #[error("提交答案失败: {0}")]
    SubmitFailed(ExamError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 启动浏览器失败
    #[error("启动浏览器失败: {0}")]
    LaunchFailed(String),
    /// 创建页面失败
    #[error("创建页面失败: {0}")]
    PageCreationFailed(#[source] chromiumoxide::error::CdpError),
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    ScriptExecutionFailed(#[from] chromiumoxide::error::CdpError),
    /// 脚本返回值无法解析
    #[error("脚本返回值解析失败: {0}")]
    UnexpectedValue(#[from] serde_json::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 字段取值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    Invalid { field: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl ConfigError {
    /// 创建配置项不合法错误
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_retryable() {
        assert!(GenerationError::RateLimited("429".into()).is_retryable());
        assert!(GenerationError::Transient("timeout".into()).is_retryable());
        assert!(!GenerationError::Other("bad request".into()).is_retryable());
    }

    #[test]
    fn test_error_messages_carry_ordinal() {
        let err = ExtractionError::NotFound { ordinal: 5 };
        assert!(err.to_string().contains('5'));

        let err = ActivationError::NotFound {
            ordinal: 3,
            option: "B. 否".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains("B. 否"));
    }
}
