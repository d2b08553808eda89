//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责分批调度和会话交互，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `quiz_generator` - 测验生成器
//! - 计算批次数，顺序调用 BatchFlow
//! - 两批之间按固定间隔等待
//! - 合并、重新编号、截断
//! - 任意一批失败即中止
//!
//! ### `app` - 应用入口
//! - 读取文件，提取文本
//! - 持有 QuizSession
//! - 交互答题、提交、重置
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一个会话)
//!     ↓
//! quiz_generator (处理 Vec<QuizBatch>)
//!     ↓
//! workflow::BatchFlow (处理单个批次)
//!     ↓
//! services (能力层：extract / prompt / llm / parse / grade)
//!     ↓
//! infrastructure (基础设施：DocumentDecoder)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：quiz_generator 管批次，app 管会话
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod quiz_generator;

// 重新导出主要类型
pub use app::{parse_command, App, Command};
pub use quiz_generator::QuizGenerator;
