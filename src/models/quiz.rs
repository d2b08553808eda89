use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::QUESTION_COUNT_CHOICES;
use crate::error::GenerationError;
use crate::models::document::ExtractedContent;
use crate::models::Difficulty;

/// 选项键（A-D）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    pub fn letter(self) -> char {
        match self {
            OptionKey::A => 'A',
            OptionKey::B => 'B',
            OptionKey::C => 'C',
            OptionKey::D => 'D',
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for OptionKey {
    type Err = String;

    /// 宽松解析：忽略空白与大小写，允许 "a)"、"B." 这类写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s
            .trim()
            .trim_end_matches(|c: char| c == ')' || c == '.' || c == ':')
            .trim();
        match cleaned.to_ascii_uppercase().as_str() {
            "A" => Ok(OptionKey::A),
            "B" => Ok(OptionKey::B),
            "C" => Ok(OptionKey::C),
            "D" => Ok(OptionKey::D),
            _ => Err(format!("无效的选项键: {}", s)),
        }
    }
}

/// 单道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 题号（测验内唯一，从 1 开始）
    pub number: usize,
    /// 题干
    pub prompt: String,
    /// 选项
    pub options: BTreeMap<OptionKey, String>,
    /// 正确答案，一定是 options 中的键
    pub correct: OptionKey,
    /// 答案解析
    pub explanation: String,
}

impl Question {
    /// 正确选项的文本
    pub fn correct_text(&self) -> &str {
        self.options
            .get(&self.correct)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// 一次模型调用得到的一批题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizBatch {
    pub title: String,
    pub instructions: String,
    pub questions: Vec<Question>,
    /// 批次序号（从 0 开始）
    pub batch_index: usize,
}

/// 合并、截断后的完整测验
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    pub title: String,
    pub instructions: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 按题号查找题目
    pub fn question(&self, number: usize) -> Option<&Question> {
        self.questions.iter().find(|q| q.number == number)
    }
}

/// 把题目依次编号为 start, start+1, ...
///
/// 对已经连续编号的序列再次执行不会产生变化
pub fn renumber(questions: &mut [Question], start: usize) {
    for (offset, question) in questions.iter_mut().enumerate() {
        question.number = start + offset;
    }
}

/// 一次"生成"操作的请求
#[derive(Debug, Clone)]
pub struct QuizRequest {
    pub difficulty: Difficulty,
    pub total_questions: usize,
    pub source_text: ExtractedContent,
}

impl QuizRequest {
    /// 创建请求，校验题目数量与源文本
    pub fn new(
        difficulty: Difficulty,
        total_questions: usize,
        source_text: ExtractedContent,
    ) -> Result<Self, GenerationError> {
        if !QUESTION_COUNT_CHOICES.contains(&total_questions) {
            return Err(GenerationError::UnsupportedQuestionCount {
                requested: total_questions,
                allowed: QUESTION_COUNT_CHOICES,
            });
        }
        if source_text.is_blank() {
            return Err(GenerationError::EmptySource);
        }
        Ok(Self {
            difficulty,
            total_questions,
            source_text,
        })
    }
}
