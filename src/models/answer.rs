use std::collections::BTreeMap;

use crate::models::quiz::OptionKey;

/// 答题卡：题号 → 选中的选项，缺失即未作答
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: BTreeMap<usize, OptionKey>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 选择（或改选）某题的答案
    pub fn select(&mut self, number: usize, key: OptionKey) {
        self.answers.insert(number, key);
    }

    pub fn get(&self, number: usize) -> Option<OptionKey> {
        self.answers.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }
}

impl FromIterator<(usize, OptionKey)> for AnswerSheet {
    fn from_iter<I: IntoIterator<Item = (usize, OptionKey)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// 单题评分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionVerdict {
    pub number: usize,
    /// 用户选择，None 表示未作答
    pub selected: Option<OptionKey>,
    pub correct: OptionKey,
    pub is_correct: bool,
}

/// 评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct GradingResult {
    pub correct_count: usize,
    pub total: usize,
    /// 百分制得分，保留一位小数
    pub score_percent: f64,
    pub verdicts: Vec<QuestionVerdict>,
}

/// 评分结论
#[derive(Debug, Clone, PartialEq)]
pub enum GradingOutcome {
    /// 一道题都没有作答，不计算分数
    Unanswered,
    /// 至少作答一道题，未作答按错误计
    Scored(GradingResult),
}
