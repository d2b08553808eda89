//! 测验会话
//!
//! 一个会话对应一位用户的一次使用：持有密钥、提取内容、测验和答题卡。
//! 会话之间不共享任何可变状态。

use std::fmt;

use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::{AnswerSheet, ExtractedContent, GradingOutcome, OptionKey, Quiz};
use crate::services::grade;

/// 用户提供的 API 密钥
///
/// 只保存在内存中，`Debug` 输出会被隐藏
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

/// 测验会话
#[derive(Debug)]
pub struct QuizSession {
    credential: ApiCredential,
    content: Option<ExtractedContent>,
    quiz: Option<Quiz>,
    answers: AnswerSheet,
    quiz_generated: bool,
    submitted: bool,
}

impl QuizSession {
    pub fn new(credential: ApiCredential) -> Self {
        Self {
            credential,
            content: None,
            quiz: None,
            answers: AnswerSheet::new(),
            quiz_generated: false,
            submitted: false,
        }
    }

    pub fn credential(&self) -> &ApiCredential {
        &self.credential
    }

    /// 保存提取出的内容，重新上传时覆盖
    pub fn set_content(&mut self, content: ExtractedContent) {
        debug!("会话内容已更新: {} 字符", content.len());
        self.content = Some(content);
    }

    pub fn content(&self) -> Option<&ExtractedContent> {
        self.content.as_ref()
    }

    /// 生成所需的源文本，没有内容时返回错误
    pub fn require_content(&self) -> Result<&ExtractedContent, SessionError> {
        self.content
            .as_ref()
            .filter(|content| !content.is_blank())
            .ok_or(SessionError::NoContent)
    }

    /// 装入新生成的测验，旧答案和提交状态一并清空
    pub fn install_quiz(&mut self, quiz: Quiz) {
        info!("📝 测验已就绪: {} 道题", quiz.len());
        self.quiz = Some(quiz);
        self.answers.clear();
        self.quiz_generated = true;
        self.submitted = false;
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    /// 选择某题的答案
    pub fn select_answer(&mut self, number: usize, key: OptionKey) -> Result<(), SessionError> {
        let quiz = self.quiz.as_ref().ok_or(SessionError::NoQuiz)?;
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        let question = quiz
            .question(number)
            .ok_or(SessionError::UnknownQuestion { number })?;
        if !question.options.contains_key(&key) {
            return Err(SessionError::UnknownOption {
                number,
                key: key.to_string(),
            });
        }

        self.answers.select(number, key);
        Ok(())
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// 提交并评分
    ///
    /// 一道题都没答时返回 `Unanswered`，此时不算提交，可以继续作答
    pub fn submit(&mut self) -> Result<GradingOutcome, SessionError> {
        let quiz = self.quiz.as_ref().ok_or(SessionError::NoQuiz)?;
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        let outcome = grade(quiz, &self.answers);
        if let GradingOutcome::Scored(result) = &outcome {
            self.submitted = true;
            info!(
                "🎯 已提交: {}/{} ({:.1}%)",
                result.correct_count, result.total, result.score_percent
            );
        }
        Ok(outcome)
    }

    /// 重置：清空测验、答案和两个标志，保留内容和密钥
    pub fn reset(&mut self) {
        self.quiz = None;
        self.answers.clear();
        self.quiz_generated = false;
        self.submitted = false;
        debug!("会话已重置");
    }

    pub fn is_quiz_generated(&self) -> bool {
        self.quiz_generated
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use tokio_test::{assert_err, assert_ok};

    fn sample_quiz() -> Quiz {
        let questions = (1..=3)
            .map(|number| Question {
                number,
                prompt: format!("Q{}", number),
                options: [(OptionKey::A, "a".to_string()), (OptionKey::B, "b".to_string())]
                    .into_iter()
                    .collect(),
                correct: OptionKey::A,
                explanation: String::new(),
            })
            .collect();
        Quiz {
            title: "T".to_string(),
            instructions: "I".to_string(),
            questions,
        }
    }

    fn session_with_quiz() -> QuizSession {
        let mut session = QuizSession::new(ApiCredential::new("secret-key"));
        session.set_content(ExtractedContent::new("text"));
        session.install_quiz(sample_quiz());
        session
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = ApiCredential::new("secret-key");
        assert_eq!(credential.expose(), "secret-key");
        assert!(!format!("{:?}", credential).contains("secret"));

        let session = QuizSession::new(credential);
        assert!(!format!("{:?}", session).contains("secret-key"));
    }

    #[test]
    fn test_select_answer_validation() {
        let mut empty = QuizSession::new(ApiCredential::new("k"));
        assert_eq!(
            empty.select_answer(1, OptionKey::A),
            Err(SessionError::NoQuiz)
        );

        let mut session = session_with_quiz();
        assert_ok!(session.select_answer(1, OptionKey::B));
        assert_ok!(session.select_answer(1, OptionKey::A));
        assert_eq!(session.answers().get(1), Some(OptionKey::A));

        assert_eq!(
            session.select_answer(9, OptionKey::A),
            Err(SessionError::UnknownQuestion { number: 9 })
        );
        assert_eq!(
            session.select_answer(2, OptionKey::D),
            Err(SessionError::UnknownOption {
                number: 2,
                key: "D".to_string()
            })
        );
    }

    #[test]
    fn test_submit_unanswered_keeps_session_open() {
        let mut session = session_with_quiz();

        assert_eq!(session.submit(), Ok(GradingOutcome::Unanswered));
        assert!(!session.is_submitted());

        session.select_answer(1, OptionKey::A).unwrap();
        let outcome = session.submit().unwrap();
        assert!(matches!(outcome, GradingOutcome::Scored(ref r) if r.correct_count == 1));
        assert!(session.is_submitted());

        assert_eq!(
            session.select_answer(2, OptionKey::A),
            Err(SessionError::AlreadySubmitted)
        );
        assert_err!(session.submit());
    }

    #[test]
    fn test_reset_keeps_content_and_credential() {
        let mut session = session_with_quiz();
        session.select_answer(1, OptionKey::A).unwrap();
        session.submit().unwrap();

        session.reset();

        assert!(session.quiz().is_none());
        assert!(session.answers().is_empty());
        assert!(!session.is_quiz_generated());
        assert!(!session.is_submitted());
        assert_eq!(session.content().map(|c| c.as_str()), Some("text"));
        assert_eq!(session.credential().expose(), "secret-key");
    }

    #[test]
    fn test_require_content() {
        let mut session = QuizSession::new(ApiCredential::new("k"));
        assert_eq!(session.require_content().err(), Some(SessionError::NoContent));
        session.set_content(ExtractedContent::new("  "));
        assert_eq!(session.require_content().err(), Some(SessionError::NoContent));
    }
}
