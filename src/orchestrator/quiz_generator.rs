//! 测验生成器 - 编排层
//!
//! ## 职责
//!
//! 把一次"生成 N 道题"的请求拆成若干批，按顺序调用模型，最后合并成一份测验。
//!
//! ## 核心流程
//!
//! 1. **分批**：`ceil(total / batch_size)` 批，每批都请求完整数量
//! 2. **顺序调用**：上一批解析完成后才开始下一批
//! 3. **限速**：两批之间至少间隔 `60 / 每分钟调用次数` 秒，最后一批之后不等待
//! 4. **合并**：按批次顺序拼接，从 1 开始连续编号，截断到请求数量
//!
//! 任意一批失败都会中止整个请求，已完成的批次全部丢弃。

use std::time::Duration;

use tracing::{info, warn};

use crate::config::{min_call_interval, MODEL_CALLS_PER_MINUTE, QUESTION_BATCH_SIZE};
use crate::error::GenerationError;
use crate::models::quiz::{renumber, Quiz, QuizBatch, QuizRequest};
use crate::services::QuizModel;
use crate::utils::logging::{log_batch_complete, log_batch_start, print_final_stats};
use crate::workflow::{BatchCtx, BatchFlow, GenerationState};

/// 测验生成器
pub struct QuizGenerator<M: QuizModel> {
    model: M,
    batch_size: usize,
    min_interval: Duration,
    state: GenerationState,
}

impl<M: QuizModel> QuizGenerator<M> {
    /// 使用固定的批大小与限速创建生成器
    pub fn new(model: M) -> Self {
        Self::with_settings(
            model,
            QUESTION_BATCH_SIZE,
            min_call_interval(MODEL_CALLS_PER_MINUTE),
        )
    }

    pub fn with_settings(model: M, batch_size: usize, min_interval: Duration) -> Self {
        Self {
            model,
            batch_size: batch_size.max(1),
            min_interval,
            state: GenerationState::Idle,
        }
    }

    /// 当前状态
    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// 需要的批次数
    pub fn batch_count(&self, total_questions: usize) -> usize {
        total_questions.div_ceil(self.batch_size)
    }

    /// 生成测验
    pub async fn generate(&mut self, request: &QuizRequest) -> Result<Quiz, GenerationError> {
        let total_batches = self.batch_count(request.total_questions);
        info!(
            "🧩 开始生成 {} 道题（{}），共 {} 批",
            request.total_questions, request.difficulty, total_batches
        );

        self.state = GenerationState::Idle;
        let flow = BatchFlow::new(&self.model, request.difficulty);
        let mut batches: Vec<QuizBatch> = Vec::with_capacity(total_batches);

        for batch_index in 0..total_batches {
            let ctx = BatchCtx::new(batch_index, total_batches, self.batch_size);
            log_batch_start(
                batch_index + 1,
                total_batches,
                ctx.first_number(),
                self.batch_size,
            );

            match flow
                .run(&ctx, request.source_text.as_str(), &mut self.state)
                .await
            {
                Ok(batch) => {
                    log_batch_complete(batch_index + 1, batch.questions.len());
                    batches.push(batch);
                }
                Err(e) => {
                    self.state = GenerationState::Aborted;
                    warn!(
                        "⚠️ 生成中止，丢弃已完成的 {} 批",
                        batches.len()
                    );
                    return Err(e);
                }
            }

            if !ctx.is_last() {
                info!("{} ⏳ 等待 {:?} 后继续", ctx, self.min_interval);
                tokio::time::sleep(self.min_interval).await;
            }
        }

        let quiz = assemble(batches, request.total_questions);
        self.state = GenerationState::Assembled;
        print_final_stats(&quiz.title, quiz.len(), total_batches);

        Ok(quiz)
    }
}

/// 按批次顺序合并，重新编号并截断
fn assemble(batches: Vec<QuizBatch>, total_questions: usize) -> Quiz {
    let (title, instructions) = batches
        .first()
        .map(|b| (b.title.clone(), b.instructions.clone()))
        .unwrap_or_default();

    let mut questions: Vec<_> = batches.into_iter().flat_map(|b| b.questions).collect();
    renumber(&mut questions, 1);
    questions.truncate(total_questions);

    Quiz {
        title,
        instructions,
        questions,
    }
}
