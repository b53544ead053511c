//! LLM 服务 - 业务能力层
//!
//! 只负责"把提示词发给模型并拿回文字"，不关心题目和匹配
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - OpenAI 与 Gemini 都走 OpenAI 兼容接口，后端由配置决定

use std::sync::LazyLock;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;
use crate::infrastructure::Generator;
use crate::services::answer_oracle::SYSTEM_MESSAGE;

static RATE_LIMITED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b429\b|rate[ _-]?limit|quota|resource[ _-]?exhausted|too many requests")
        .expect("valid regex")
});

static TRANSIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)timed?[ _-]?out|connection|connect error|error sending request|temporar|unavailable|overloaded|\b50[0234]\b|stream",
    )
    .expect("valid regex")
});

/// 根据错误信息判断错误类别
pub fn classify_error(message: &str) -> GenerationError {
    if RATE_LIMITED.is_match(message) {
        GenerationError::RateLimited(message.to_string())
    } else if TRANSIENT.is_match(message) {
        GenerationError::Transient(message.to_string())
    } else {
        GenerationError::Other(message.to_string())
    }
}

/// 基于 OpenAI 兼容接口的生成能力
pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGenerator {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(config.api_base_url());

        Self {
            client: Client::with_config(openai_config),
            model_name: config.model_name().to_string(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        }
    }

    fn build_messages(&self, prompt: &str) -> Result<Vec<ChatCompletionRequestMessage>, GenerationError> {
        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_MESSAGE)
            .build()
            .map_err(|e| GenerationError::Other(e.to_string()))?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| GenerationError::Other(e.to_string()))?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ])
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", prompt.len());

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(self.build_messages(prompt)?)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| GenerationError::Other(e.to_string()))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            classify_error(&e.to_string())
        })?;

        debug!("LLM API 调用成功");

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GenerationError::Other("LLM 返回内容为空".to_string()))
    }
}
