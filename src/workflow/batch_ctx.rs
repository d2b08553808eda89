//! 批次上下文
//!
//! 封装"我正在生成第几批、每批几道题"这一信息

use std::fmt::Display;

/// 批次上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchCtx {
    /// 批次序号（从 0 开始）
    pub batch_index: usize,

    /// 批次总数
    pub total_batches: usize,

    /// 每批题目数量
    pub batch_size: usize,
}

impl BatchCtx {
    /// 创建新的批次上下文
    pub fn new(batch_index: usize, total_batches: usize, batch_size: usize) -> Self {
        Self {
            batch_index,
            total_batches,
            batch_size,
        }
    }

    /// 本批第一道题的全局题号
    pub fn first_number(&self) -> usize {
        self.batch_index * self.batch_size + 1
    }

    pub fn is_last(&self) -> bool {
        self.batch_index + 1 >= self.total_batches
    }
}

impl Display for BatchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[批次 {}/{}]", self.batch_index + 1, self.total_batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_and_last() {
        let ctx = BatchCtx::new(2, 3, 5);
        assert_eq!(ctx.first_number(), 11);
        assert!(ctx.is_last());
        assert!(!BatchCtx::new(0, 3, 5).is_last());
        assert_eq!(ctx.to_string(), "[批次 3/3]");
    }
}
