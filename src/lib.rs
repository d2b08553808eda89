//! # Doc Quiz
//!
//! 从上传的文档生成选择题测验并评分的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 各种文件格式的解码器，只暴露"字节 → 文本"能力
//! - `DocumentDecoder` - 解码器 trait，按 `DocumentKind` 分派
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `ContentExtractor` - 校验上传并拼接带标题的文本
//! - `build_prompt` / `parse_batch` - 构建提示词、解析一批题目
//! - `LlmService` - 调用 OpenAI 兼容接口（实现 `QuizModel`）
//! - `grade` / `render_feedback` - 评分与展示
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一批题"的完整处理流程
//! - `BatchCtx` - 上下文封装（批次序号 + 批大小）
//! - `BatchFlow` - 流程编排（prompt → model → parse → renumber）
//! - `QuizSession` - 单个用户的会话状态
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/quiz_generator` - 分批、限速、合并
//! - `orchestrator/app` - 文件读取、会话交互
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::DocumentDecoder;
pub use models::{AnswerSheet, Difficulty, GradingOutcome, Question, Quiz, QuizRequest};
pub use orchestrator::{App, QuizGenerator};
pub use services::{ContentExtractor, LlmService, QuizModel};
pub use workflow::{ApiCredential, BatchCtx, BatchFlow, GenerationState, QuizSession};
