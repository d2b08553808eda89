//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：读取文件、提取文本、创建会话
//! 2. **生成测验**：为会话创建模型服务和生成器
//! 3. **交互答题**：从标准输入读取作答命令，提交后输出评分
//!
//! ## 设计特点
//!
//! - **资源所有者**：唯一持有 `QuizSession` 的模块
//! - **向下委托**：提取交给 `ContentExtractor`，生成交给 `QuizGenerator`，评分交给会话

use std::path::PathBuf;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{load_documents, OptionKey, QuizRequest, UploadLimits};
use crate::orchestrator::quiz_generator::QuizGenerator;
use crate::services::{
    render_feedback, render_question, ContentExtractor, LlmService, QuizModel,
};
use crate::utils::logging::{log_extraction, log_startup};
use crate::workflow::{ApiCredential, QuizSession};

/// 交互命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 作答，例如 `3 B` 或 `3b`
    Answer { number: usize, key: OptionKey },
    /// 重新显示题目
    Show,
    /// 提交评分
    Submit,
    /// 丢弃当前测验并重新生成
    Reset,
    Quit,
}

/// 解析一行输入，无法识别时返回 None
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => return None,
        "show" | "显示" => return Some(Command::Show),
        "submit" | "提交" => return Some(Command::Submit),
        "reset" | "重置" => return Some(Command::Reset),
        "quit" | "exit" | "q" | "退出" => return Some(Command::Quit),
        _ => {}
    }

    let split = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    let (number, key) = line.split_at(split);
    let number = number.parse().ok()?;
    let key = key.trim_start_matches([' ', '\t', ':', '.', '-']).parse().ok()?;

    Some(Command::Answer { number, key })
}

/// 应用主结构
pub struct App {
    config: Config,
    session: QuizSession,
}

impl App {
    /// 初始化应用：加载文件并提取文本
    pub async fn initialize(config: Config, paths: &[PathBuf]) -> Result<Self> {
        log_startup(&config, paths.len());

        let credential = ApiCredential::new(config.require_api_key()?);

        info!("\n📁 正在读取文件...");
        let loaded = load_documents(paths, &UploadLimits::default()).await?;
        if loaded.documents.is_empty() {
            for warning in &loaded.warnings {
                warn!("⚠️ 已跳过 {}", warning);
            }
            bail!("没有任何可读取的文件");
        }

        let extractor = ContentExtractor::new(&config);
        let mut report = extractor.process(&loaded.documents).await?;
        report.warnings.splice(0..0, loaded.warnings);
        for warning in &report.warnings {
            warn!("⚠️ 已跳过 {}", warning);
        }
        log_extraction(&report);

        let mut session = QuizSession::new(credential);
        session.set_content(report.content);

        Ok(Self::new(config, session))
    }

    /// 使用已准备好的会话创建应用
    pub fn new(config: Config, session: QuizSession) -> Self {
        Self { config, session }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// 运行应用主逻辑
    ///
    /// 生成失败不会结束程序，会话保留内容和密钥，可以输入 reset 重试
    pub async fn run(&mut self) -> Result<()> {
        self.regenerate().await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let Some(command) = parse_command(&line) else {
                print_help();
                continue;
            };

            match command {
                Command::Answer { number, key } => match self.session.select_answer(number, key) {
                    Ok(()) => println!("✓ 第 {} 题已选择 {}", number, key),
                    Err(e) => println!("⚠️ {}", e),
                },
                Command::Show => self.present(),
                Command::Submit => match self.session.submit() {
                    Ok(outcome) => {
                        if let Some(quiz) = self.session.quiz() {
                            println!("\n{}", render_feedback(quiz, &outcome));
                        }
                    }
                    Err(e) => println!("⚠️ {}", e),
                },
                Command::Reset => {
                    self.session.reset();
                    self.regenerate().await;
                }
                Command::Quit => break,
            }
        }

        Ok(())
    }

    /// 生成并显示新测验，失败时只输出错误
    async fn regenerate(&mut self) {
        let model = LlmService::new(&self.config, self.session.credential());
        self.regenerate_with(model).await;
    }

    /// 用指定模型生成新测验，返回是否成功
    ///
    /// 失败时会话保持重置后的状态
    pub async fn regenerate_with<M: QuizModel>(&mut self, model: M) -> bool {
        match self.generate_quiz(model).await {
            Ok(()) => {
                self.present();
                true
            }
            Err(e) => {
                error!("❌ 测验生成失败: {}", e);
                println!("❌ 测验生成失败: {}\n输入 reset 重试，quit 退出", e);
                false
            }
        }
    }

    /// 用会话中的内容生成新测验
    async fn generate_quiz<M: QuizModel>(&mut self, model: M) -> Result<(), AppError> {
        let content = self.session.require_content()?.clone();
        let request = QuizRequest::new(
            self.config.difficulty,
            self.config.total_questions,
            content,
        )?;

        let quiz = QuizGenerator::new(model).generate(&request).await?;

        self.session.install_quiz(quiz);
        Ok(())
    }

    fn present(&self) {
        let Some(quiz) = self.session.quiz() else {
            return;
        };

        println!("\n{}\n{}\n", quiz.title, quiz.instructions);
        for question in &quiz.questions {
            println!("{}", render_question(question));
        }
        print_help();
    }
}

fn print_help() {
    println!("输入 \"题号 选项\" 作答（如 3 B），submit 提交，reset 重新生成，show 显示题目，quit 退出");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::models::ExtractedContent;
    use async_trait::async_trait;

    /// 固定返回同一段文本的模型，None 表示调用失败
    struct CannedModel(Option<String>);

    #[async_trait]
    impl QuizModel for CannedModel {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.0.clone().ok_or_else(|| LlmError::EmptyContent {
                model: "canned".to_string(),
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

    #[tokio::test(start_paused = true)]
    async fn test_failed_generation_keeps_session() {
        let config = Config {
            total_questions: 5,
            ..Config::default()
        };
        let mut session = QuizSession::new(ApiCredential::new("key"));
        session.set_content(ExtractedContent::new("some text"));
        let mut app = App::new(config, session);

        assert!(!app.regenerate_with(CannedModel(None)).await);
        assert!(app.session().quiz().is_none());
        assert_eq!(app.session().content().map(|c| c.as_str()), Some("some text"));
        assert_eq!(app.session().credential().expose(), "key");

        // 同一个会话可以再次生成
        assert!(app.regenerate_with(CannedModel(Some(five_questions()))).await);
        assert_eq!(app.session().quiz().map(|q| q.len()), Some(5));
    }

    #[test]
    fn test_parse_answer_forms() {
        let expected = Some(Command::Answer {
            number: 3,
            key: OptionKey::B,
        });
        assert_eq!(parse_command("3 B"), expected);
        assert_eq!(parse_command("3b"), expected);
        assert_eq!(parse_command(" 3: b) "), expected);
        assert_eq!(
            parse_command("12 d"),
            Some(Command::Answer {
                number: 12,
                key: OptionKey::D
            })
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_command("SUBMIT"), Some(Command::Submit));
        assert_eq!(parse_command("重置"), Some(Command::Reset));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("show"), Some(Command::Show));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("B 3"), None);
        assert_eq!(parse_command("3 E"), None);
        assert_eq!(parse_command("hello"), None);
    }
}
