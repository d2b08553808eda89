//! 评分与展示 - 业务能力层
//!
//! 纯计算，不修改测验和答题卡

use std::fmt::Write as _;

use crate::models::answer::{AnswerSheet, GradingOutcome, GradingResult, QuestionVerdict};
use crate::models::quiz::{Question, Quiz};

/// 评分
///
/// 一道题都没作答时返回 `Unanswered`，不给 0 分；
/// 只要作答了至少一道，分母就是全部题目数，未作答按错误计。
pub fn grade(quiz: &Quiz, answers: &AnswerSheet) -> GradingOutcome {
    let verdicts: Vec<QuestionVerdict> = quiz
        .questions
        .iter()
        .map(|question| {
            let selected = answers.get(question.number);
            QuestionVerdict {
                number: question.number,
                selected,
                correct: question.correct,
                is_correct: selected == Some(question.correct),
            }
        })
        .collect();

    if verdicts.iter().all(|v| v.selected.is_none()) {
        return GradingOutcome::Unanswered;
    }

    let total = quiz.questions.len();
    let correct_count = verdicts.iter().filter(|v| v.is_correct).count();

    GradingOutcome::Scored(GradingResult {
        correct_count,
        total,
        score_percent: score_percent(correct_count, total),
        verdicts,
    })
}

/// 百分制得分，保留一位小数
fn score_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

/// 渲染单道题目
pub fn render_question(question: &Question) -> String {
    let mut out = format!("{}. {}\n", question.number, question.prompt);
    for (key, text) in &question.options {
        let _ = writeln!(out, "   {}) {}", key, text);
    }
    out
}

/// 渲染评分反馈
pub fn render_feedback(quiz: &Quiz, outcome: &GradingOutcome) -> String {
    let result = match outcome {
        GradingOutcome::Unanswered => {
            return "⚠️ 还没有作答任何题目，请至少回答一道题后再提交。\n".to_string();
        }
        GradingOutcome::Scored(result) => result,
    };

    let mut out = String::new();
    for verdict in &result.verdicts {
        let Some(question) = quiz.question(verdict.number) else {
            continue;
        };

        if verdict.is_correct {
            let _ = writeln!(out, "✅ 第 {} 题: 正确", verdict.number);
        } else {
            let selected = verdict
                .selected
                .map(|key| key.to_string())
                .unwrap_or_else(|| "未作答".to_string());
            let _ = writeln!(
                out,
                "❌ 第 {} 题: 错误（你的答案: {}，正确答案: {}) {}）",
                verdict.number,
                selected,
                question.correct,
                question.correct_text()
            );
        }
        if !question.explanation.is_empty() {
            let _ = writeln!(out, "   解析: {}", question.explanation);
        }
    }

    let _ = writeln!(
        out,
        "\n🎯 得分: {:.1}% ({}/{})",
        result.score_percent, result.correct_count, result.total
    );
    out
}
