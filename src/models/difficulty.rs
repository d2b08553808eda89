use std::fmt;
use std::str::FromStr;

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 简单
    Easy,
    /// 中等
    Medium,
    /// 困难
    Hard,
    /// 专家
    Expert,
}

impl Difficulty {
    /// 全部难度，按从易到难排列
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    /// 写入提示词的难度描述
    pub fn description(self) -> &'static str {
        match self {
            Difficulty::Easy => {
                "Basic recall and understanding questions. Test simple facts, definitions \
                 and main ideas stated directly in the content."
            }
            Difficulty::Medium => {
                "Application and analysis questions. Require connecting related ideas and \
                 applying concepts from the content to familiar situations."
            }
            Difficulty::Hard => {
                "Complex analysis and evaluation questions. Require reasoning across several \
                 parts of the content, comparing alternatives and drawing inferences."
            }
            Difficulty::Expert => {
                "Synthesis and critical thinking questions. Require deep understanding, \
                 evaluating edge cases and applying the content to unfamiliar scenarios; \
                 distractors should be highly plausible."
            }
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    /// 从名称解析难度（不区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("未知难度: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("EASY".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" Expert ".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("trivial".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_every_level_has_distinct_description() {
        let mut seen = std::collections::HashSet::new();
        for level in Difficulty::ALL {
            assert!(seen.insert(level.description()));
        }
    }
}
