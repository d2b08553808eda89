//! 模型响应解析 - 业务能力层
//!
//! 先去掉 Markdown 代码块包裹，再按题目 JSON 结构解析和校验

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::error::ResponseParseError;
use crate::models::quiz::{OptionKey, Question, QuizBatch};

/// 开头的代码块标记，允许任意语言标注（```json、```JSON、``` 等）
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("valid regex"));

/// 结尾的代码块标记
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?[ \t]*```\s*$").expect("valid regex"));

/// 去掉包裹在响应外层的 Markdown 代码块
///
/// 只有以代码块标记开头的响应才会处理，其余原样返回（去除首尾空白）
pub fn strip_code_fence(raw: &str) -> &str {
    let Some(leading) = LEADING_FENCE.find(raw) else {
        return raw.trim();
    };
    let body = &raw[leading.end()..];
    match TRAILING_FENCE.find(body) {
        Some(trailing) => body[..trailing.start()].trim(),
        None => body.trim(),
    }
}

#[derive(Debug, Deserialize)]
struct RawBatch {
    title: String,
    instructions: String,
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    // 题号稍后会被重新编号，这里只要求字段存在
    #[allow(dead_code)]
    number: serde_json::Value,
    question: String,
    options: BTreeMap<String, String>,
    correct: String,
    explanation: String,
}

/// 解析一批题目
///
/// # 参数
/// - `raw`: 模型返回的原始文本
/// - `batch_index`: 批次序号（从 0 开始）
/// - `batch_size`: 要求的题目数量
///
/// 返回的题目按 1..=batch_size 局部编号
pub fn parse_batch(
    raw: &str,
    batch_index: usize,
    batch_size: usize,
) -> Result<QuizBatch, ResponseParseError> {
    let normalized = strip_code_fence(raw);
    let parsed: RawBatch = serde_json::from_str(normalized)?;

    if parsed.questions.len() < batch_size {
        return Err(ResponseParseError::TooFewQuestions {
            expected: batch_size,
            actual: parsed.questions.len(),
        });
    }
    if parsed.questions.len() > batch_size {
        warn!(
            "第 {} 批返回了 {} 道题目，只保留前 {} 道",
            batch_index + 1,
            parsed.questions.len(),
            batch_size
        );
    }

    let questions = parsed
        .questions
        .into_iter()
        .take(batch_size)
        .enumerate()
        .map(|(local_index, raw_question)| convert_question(raw_question, local_index + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuizBatch {
        title: parsed.title.trim().to_string(),
        instructions: parsed.instructions.trim().to_string(),
        questions,
        batch_index,
    })
}

fn convert_question(raw: RawQuestion, number: usize) -> Result<Question, ResponseParseError> {
    if raw.question.trim().is_empty() {
        return Err(ResponseParseError::EmptyField {
            question: number,
            field: "question",
        });
    }

    let mut options = BTreeMap::new();
    for (key, text) in raw.options {
        let option_key: OptionKey = key
            .parse()
            .map_err(|_| ResponseParseError::InvalidOptionKey {
                question: number,
                key: key.clone(),
            })?;
        if options.insert(option_key, text.trim().to_string()).is_some() {
            return Err(ResponseParseError::DuplicateOptionKey {
                question: number,
                key,
            });
        }
    }

    // 必须恰好是 A-D 四个选项
    let missing: Vec<String> = OptionKey::ALL
        .iter()
        .filter(|key| !options.contains_key(key))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ResponseParseError::MissingOptions {
            question: number,
            missing: missing.join(", "),
        });
    }

    let correct = raw
        .correct
        .parse::<OptionKey>()
        .ok()
        .filter(|key| options.contains_key(key))
        .ok_or_else(|| ResponseParseError::CorrectAnswerNotInOptions {
            question: number,
            key: raw.correct.clone(),
        })?;

    Ok(Question {
        number,
        prompt: raw.question.trim().to_string(),
        options,
        correct,
        explanation: raw.explanation.trim().to_string(),
    })
}
