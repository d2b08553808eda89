use std::fmt;

/// 题目生成的状态
///
/// `Idle → GeneratingBatch(i) → ParsingBatch(i) → BatchReady(i) | BatchFailed(i)`，
/// 循环直到 `Assembled` 或 `Aborted`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    GeneratingBatch(usize),
    ParsingBatch(usize),
    BatchReady(usize),
    BatchFailed(usize),
    Assembled,
    Aborted,
}

impl GenerationState {
    /// 是否已经结束
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationState::Assembled | GenerationState::Aborted)
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationState::Idle => write!(f, "空闲"),
            GenerationState::GeneratingBatch(i) => write!(f, "生成第 {} 批", i + 1),
            GenerationState::ParsingBatch(i) => write!(f, "解析第 {} 批", i + 1),
            GenerationState::BatchReady(i) => write!(f, "第 {} 批完成", i + 1),
            GenerationState::BatchFailed(i) => write!(f, "第 {} 批失败", i + 1),
            GenerationState::Assembled => write!(f, "已组装"),
            GenerationState::Aborted => write!(f, "已中止"),
        }
    }
}
