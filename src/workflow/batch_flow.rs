//! 单批题目流程 - 流程层
//!
//! 核心职责：定义"一批题"的完整处理流程
//!
//! 流程顺序：
//! 1. 构建提示词
//! 2. 调用模型
//! 3. 去掉代码块包裹并解析
//! 4. 按批次预编号

use tracing::{debug, error, info};

use crate::error::GenerationError;
use crate::models::quiz::{renumber, QuizBatch};
use crate::models::Difficulty;
use crate::services::{build_prompt, parse_batch, QuizModel};
use crate::workflow::batch_ctx::BatchCtx;
use crate::workflow::generation_state::GenerationState;

/// 单批题目流程
///
/// - 只处理一批，不关心批次之间的间隔与合并
/// - 不持有模型，只借用
/// - 失败直接返回错误，不重试
pub struct BatchFlow<'a, M: QuizModel + ?Sized> {
    model: &'a M,
    difficulty: Difficulty,
}

impl<'a, M: QuizModel + ?Sized> BatchFlow<'a, M> {
    pub fn new(model: &'a M, difficulty: Difficulty) -> Self {
        Self { model, difficulty }
    }

    /// 生成一批题目
    ///
    /// `state` 会依次经过 GeneratingBatch → ParsingBatch → BatchReady / BatchFailed
    pub async fn run(
        &self,
        ctx: &BatchCtx,
        source_text: &str,
        state: &mut GenerationState,
    ) -> Result<QuizBatch, GenerationError> {
        let batch = ctx.batch_index;

        // 每批都按完整数量请求
        *state = GenerationState::GeneratingBatch(batch);
        let prompt = build_prompt(source_text, self.difficulty, ctx.batch_size);
        debug!("{} 提示词长度: {} 字符", ctx, prompt.len());

        info!("{} 🤖 正在调用模型...", ctx);
        let raw = match self.model.complete(&prompt).await {
            Ok(raw) => raw,
            Err(source) => {
                *state = GenerationState::BatchFailed(batch);
                error!("{} ❌ 模型调用失败: {}", ctx, source);
                return Err(GenerationError::ModelCall { batch, source });
            }
        };

        *state = GenerationState::ParsingBatch(batch);
        debug!("{} 响应长度: {} 字符", ctx, raw.len());

        let mut parsed = match parse_batch(&raw, batch, ctx.batch_size) {
            Ok(parsed) => parsed,
            Err(source) => {
                *state = GenerationState::BatchFailed(batch);
                error!("{} ❌ 响应解析失败: {}", ctx, source);
                return Err(GenerationError::MalformedResponse { batch, source });
            }
        };

        renumber(&mut parsed.questions, ctx.first_number());
        *state = GenerationState::BatchReady(batch);
        info!("{} ✓ 解析出 {} 道题目", ctx, parsed.questions.len());

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use async_trait::async_trait;

    struct FixedModel(Result<String, ()>);

    #[async_trait]
    impl QuizModel for FixedModel {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.0.clone().map_err(|_| LlmError::EmptyContent {
                model: "fixed".to_string(),
            })
        }
    }

    fn five_questions() -> String {
        let questions: Vec<serde_json::Value> = (1..=5)
            .map(|n| {
                serde_json::json!({
                    "number": n,
                    "question": format!("Q{}", n),
                    "options": {"A": "a", "B": "b", "C": "c", "D": "d"},
                    "correct": "A",
                    "explanation": "e"
                })
            })
            .collect();
        serde_json::json!({"title": "T", "instructions": "I", "questions": questions}).to_string()
    }

    #[tokio::test]
    async fn test_run_renumbers_by_batch() {
        let model = FixedModel(Ok(five_questions()));
        let flow = BatchFlow::new(&model, Difficulty::Medium);
        let mut state = GenerationState::Idle;

        let batch = flow
            .run(&BatchCtx::new(1, 3, 5), "text", &mut state)
            .await
            .unwrap();

        let numbers: Vec<usize> = batch.questions.iter().map(|q| q.number).collect();
        assert_eq!(numbers, vec![6, 7, 8, 9, 10]);
        assert_eq!(state, GenerationState::BatchReady(1));
    }

    #[tokio::test]
    async fn test_run_model_failure() {
        let model = FixedModel(Err(()));
        let flow = BatchFlow::new(&model, Difficulty::Medium);
        let mut state = GenerationState::Idle;

        let err = flow
            .run(&BatchCtx::new(0, 1, 5), "text", &mut state)
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::ModelCall { batch: 0, .. }));
        assert_eq!(state, GenerationState::BatchFailed(0));
    }

    #[tokio::test]
    async fn test_run_malformed_response() {
        let model = FixedModel(Ok("not json".to_string()));
        let flow = BatchFlow::new(&model, Difficulty::Medium);
        let mut state = GenerationState::Idle;

        let err = flow
            .run(&BatchCtx::new(0, 1, 5), "text", &mut state)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GenerationError::MalformedResponse { batch: 0, .. }
        ));
        assert_eq!(state, GenerationState::BatchFailed(0));
    }
}
