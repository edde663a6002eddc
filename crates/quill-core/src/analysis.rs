//! Rule-based text analysis for captured notes.
//!
//! Capture flows run recognized or typed text through a [`TextAnalyzer`] to
//! pre-fill keywords, a title, a category tag and todo items. The analyzer
//! is a trait so a remote NLP service can stand in for the rules without
//! touching storage or ranking.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use crate::defaults::{DEFAULT_CATEGORY, KEYWORD_LIMIT, TITLE_MAX_CHARS};
use crate::models::TextAnalysis;

/// Best-effort text analysis. Implementations never fail; they fall back to
/// empty or default outputs.
pub trait TextAnalyzer: Send + Sync {
    /// Most frequent keywords, highest first.
    fn extract_keywords(&self, text: &str) -> Vec<String>;

    /// Short title derived from the text.
    fn generate_title(&self, text: &str) -> String;

    /// Category label for the text.
    fn classify_text(&self, text: &str) -> String;

    /// Todo items mentioned in the text, in order found.
    fn extract_todos(&self, text: &str) -> Vec<String>;

    /// Run every analysis step.
    fn analyze(&self, text: &str) -> TextAnalysis {
        TextAnalysis {
            keywords: self.extract_keywords(text),
            title: self.generate_title(text),
            tag: self.classify_text(text),
            todos: self.extract_todos(text),
        }
    }
}

static CJK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[一-龥]{2,}").unwrap());

static TODO_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)(?:需要|要|待办|todo)[:：]?\s*(.+)").unwrap(),
        Regex::new(r"\d+[、.]\s*(.+)").unwrap(),
    ]
});

/// A category and the trigger words that select it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub triggers: Vec<String>,
}

impl Category {
    pub fn new<I, S>(name: impl Into<String>, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            triggers: triggers.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, text: &str) -> bool {
        self.triggers.iter().any(|t| text.contains(t.as_str()))
    }
}

/// The built-in category table, in priority order.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "学习",
            ["课程", "学习", "作业", "考试", "复习", "笔记", "教材", "课件"],
        ),
        Category::new(
            "工作",
            ["会议", "项目", "任务", "汇报", "客户", "合同", "方案", "计划"],
        ),
        Category::new(
            "生活",
            ["购物", "健康", "运动", "饮食", "旅行", "家庭", "朋友"],
        ),
        Category::new("灵感", ["想法", "创意", "灵感", "点子", "思考", "感悟"]),
    ]
}

/// Frequency and pattern heuristics tuned for Chinese notes.
#[derive(Debug, Clone)]
pub struct RuleBasedAnalyzer {
    categories: Vec<Category>,
    default_category: String,
}

impl Default for RuleBasedAnalyzer {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            default_category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the category table. Earlier entries win.
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

impl TextAnalyzer for RuleBasedAnalyzer {
    fn extract_keywords(&self, text: &str) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for m in CJK_RUN.find_iter(text) {
            let count = counts.entry(m.as_str()).or_insert(0);
            if *count == 0 {
                order.push(m.as_str());
            }
            *count += 1;
        }

        // Stable sort: equal counts keep first-seen order.
        order.sort_by(|a, b| counts[b].cmp(&counts[a]));
        order
            .into_iter()
            .take(KEYWORD_LIMIT)
            .map(str::to_string)
            .collect()
    }

    fn generate_title(&self, text: &str) -> String {
        let first_line = text.split('\n').next().unwrap_or("");
        if first_line.chars().count() > TITLE_MAX_CHARS {
            let head: String = first_line.chars().take(TITLE_MAX_CHARS).collect();
            format!("{}...", head)
        } else {
            first_line.to_string()
        }
    }

    fn classify_text(&self, text: &str) -> String {
        self.categories
            .iter()
            .find(|c| c.matches(text))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| self.default_category.clone())
    }

    fn extract_todos(&self, text: &str) -> Vec<String> {
        let mut todos = Vec::new();
        for pattern in TODO_PATTERNS.iter() {
            for cap in pattern.captures_iter(text) {
                if let Some(item) = cap.get(1) {
                    let item = item.as_str().trim();
                    if !item.is_empty() {
                        todos.push(item.to_string());
                    }
                }
            }
        }
        todos
    }
}
