//! LLM 服务 - 业务能力层
//!
//! 只负责"发送提示词、拿回文本"能力，不关心批次与解析
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Gemini 的 OpenAI 兼容端点）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;
use crate::services::prompt_builder::SYSTEM_MESSAGE;
use crate::workflow::session::ApiCredential;

/// 文本生成模型
///
/// 把模型看作一个黑盒函数：提示词 → 文本。
/// 编排层只依赖这个 trait，测试时可以换成脚本化的假模型。
#[async_trait]
pub trait QuizModel: Send + Sync {
    /// 发送一次请求，返回模型的原始文本
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// LLM 服务
///
/// 职责：
/// - 调用 OpenAI 兼容的 chat completion 接口
/// - 一次调用只发送一个提示词
/// - 不重试，不解析响应
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 使用用户提供的密钥创建 LLM 服务
    pub fn new(config: &Config, credential: &ApiCredential) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(credential.expose())
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, LlmError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| self.build_failed(e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| self.build_failed(e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.7)
            .max_tokens(4096u32)
            .build()
            .map_err(|e| self.build_failed(e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::api_call_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }

    fn build_failed(&self, e: impl std::fmt::Display) -> LlmError {
        LlmError::RequestBuildFailed {
            model: self.model_name.clone(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl QuizModel for LlmService {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.send_to_llm(prompt, Some(SYSTEM_MESSAGE)).await
    }
}
