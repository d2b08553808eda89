//! 提示词构建 - 业务能力层
//!
//! 纯函数，不做任何 I/O

use crate::models::Difficulty;

/// 系统消息
pub const SYSTEM_MESSAGE: &str = "You are an expert educator who writes accurate, unambiguous \
multiple-choice quiz questions strictly from the material you are given. \
You always answer with a single JSON object and nothing else.";

/// 构建出题提示词
///
/// # 参数
/// - `source_text`: 提取出的全部文本
/// - `difficulty`: 难度
/// - `batch_size`: 本次需要的题目数量
pub fn build_prompt(source_text: &str, difficulty: Difficulty, batch_size: usize) -> String {
    format!(
        r#"Create a multiple-choice quiz based on the content below.

Difficulty: {difficulty_name}
{difficulty_description}

Requirements:
- Write exactly {batch_size} questions.
- Every question has exactly four options labelled "A", "B", "C" and "D".
- Exactly one option is correct; "correct" must be one of "A", "B", "C", "D".
- Number the questions from 1 to {batch_size}.
- Every question includes a short explanation of why the correct option is right.
- Use only information found in the content.

Respond with a single JSON object matching this schema and nothing else:
{{
  "title": "string, a short title for the quiz",
  "instructions": "string, one or two sentences telling the learner how to take the quiz",
  "questions": [
    {{
      "number": 1,
      "question": "string",
      "options": {{
        "A": "string",
        "B": "string",
        "C": "string",
        "D": "string"
      }},
      "correct": "A",
      "explanation": "string"
    }}
  ]
}}
The "questions" array must contain exactly {batch_size} objects.

Content:
{source_text}"#,
        difficulty_name = difficulty.name(),
        difficulty_description = difficulty.description(),
        batch_size = batch_size,
        source_text = source_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_all_parts() {
        let prompt = build_prompt("--- Content from a.txt ---\nMitochondria", Difficulty::Hard, 5);

        assert!(prompt.contains("Write exactly 5 questions"));
        assert!(prompt.contains("must contain exactly 5 objects"));
        assert!(prompt.contains("Difficulty: Hard"));
        assert!(prompt.contains(Difficulty::Hard.description()));
        assert!(prompt.contains("\"explanation\""));
        assert!(prompt.ends_with("Mitochondria"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let a = build_prompt("text", Difficulty::Easy, 5);
        let b = build_prompt("text", Difficulty::Easy, 5);
        assert_eq!(a, b);
        assert_ne!(a, build_prompt("text", Difficulty::Expert, 5));
    }
}
