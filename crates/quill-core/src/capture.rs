//! Notes built from structured capture forms: study / work / life
//! templates and quick todos.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt::Write;

use crate::error::{Error, Result};
use crate::models::{Note, NoteType};

/// Stored field naming which template produced a note.
pub const TEMPLATE_TYPE_FIELD: &str = "templateType";

/// Tag given to quick todos.
pub const QUICK_TODO_TAG: &str = "待办";

const QUICK_TODO_TITLE_CHARS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyForm {
    #[serde(default)]
    pub knowledge: String,
    #[serde(default)]
    pub mistakes: String,
    #[serde(default)]
    pub key_points: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkForm {
    #[serde(default)]
    pub todo_list: Vec<String>,
    #[serde(default)]
    pub done_list: String,
    #[serde(default)]
    pub deadline: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingItem {
    #[serde(default)]
    pub name: String,
    /// Free text; blank means one.
    #[serde(default)]
    pub quantity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeForm {
    #[serde(default)]
    pub shopping_list: Vec<ShoppingItem>,
    #[serde(default)]
    pub travel: String,
    #[serde(default)]
    pub checkin: String,
}

/// A filled-in template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateForm {
    Study(StudyForm),
    Work(WorkForm),
    Life(LifeForm),
}

fn section(out: &mut String, heading: &str, body: &str) {
    if !body.is_empty() {
        let _ = write!(out, "【{}】\n{}\n\n", heading, body);
    }
}

impl TemplateForm {
    /// Value stored under [`TEMPLATE_TYPE_FIELD`].
    pub fn template_type(&self) -> &'static str {
        match self {
            Self::Study(_) => "study",
            Self::Work(_) => "work",
            Self::Life(_) => "life",
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Study(_) => "学习笔记",
            Self::Work(_) => "工作待办",
            Self::Life(_) => "生活清单",
        }
    }

    pub fn keywords(&self) -> [&'static str; 3] {
        match self {
            Self::Study(_) => ["学习", "知识点", "考点"],
            Self::Work(_) => ["工作", "待办", "任务"],
            Self::Life(_) => ["生活", "清单", "计划"],
        }
    }

    /// Note body: one `【heading】` section per non-empty field.
    pub fn format_content(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Study(form) => {
                section(&mut out, "知识点", &form.knowledge);
                section(&mut out, "错题记录", &form.mistakes);
                section(&mut out, "考点总结", &form.key_points);
            }
            Self::Work(form) => {
                let todos = form
                    .todo_list
                    .iter()
                    .filter(|t| !t.trim().is_empty())
                    .enumerate()
                    .map(|(i, t)| format!("{}. {}", i + 1, t))
                    .collect::<Vec<_>>()
                    .join("\n");
                section(&mut out, "待做事项", &todos);
                section(&mut out, "已完成", &form.done_list);
                section(&mut out, "截止时间", &form.deadline);
            }
            Self::Life(form) => {
                let items = form
                    .shopping_list
                    .iter()
                    .filter(|item| !item.name.trim().is_empty())
                    .map(|item| {
                        let quantity = if item.quantity.is_empty() {
                            "1"
                        } else {
                            item.quantity.as_str()
                        };
                        format!("{} × {}", item.name, quantity)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                section(&mut out, "购物清单", &items);
                section(&mut out, "出行计划", &form.travel);
                section(&mut out, "打卡记录", &form.checkin);
            }
        }
        out.trim().to_string()
    }

    /// The form as stored in `templateData`, title included.
    fn to_data(&self, title: &str) -> Result<JsonValue> {
        let mut data = match self {
            Self::Study(form) => serde_json::to_value(form)?,
            Self::Work(form) => serde_json::to_value(form)?,
            Self::Life(form) => serde_json::to_value(form)?,
        };
        if let Some(map) = data.as_object_mut() {
            map.insert("title".to_string(), JsonValue::String(title.to_string()));
        }
        Ok(data)
    }
}

/// Build an unsaved template note. The title is required.
pub fn template_note(title: &str, form: &TemplateForm) -> Result<Note> {
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("Template title is required".to_string()));
    }

    let mut note = Note::new(title, form.format_content())
        .with_tag(form.tag())
        .with_keywords(form.keywords())
        .with_kind(NoteType::Template);
    note.template_data = Some(form.to_data(title)?);
    note.extra.insert(
        TEMPLATE_TYPE_FIELD.to_string(),
        JsonValue::String(form.template_type().to_string()),
    );
    Ok(note)
}

/// Build an unsaved todo note from one line of text.
///
/// The title is the first twenty characters, with `...` when cut.
pub fn quick_todo_note(text: &str) -> Result<Note> {
    if text.trim().is_empty() {
        return Err(Error::InvalidInput("Todo text is empty".to_string()));
    }

    let mut title: String = text.chars().take(QUICK_TODO_TITLE_CHARS).collect();
    if text.chars().count() > QUICK_TODO_TITLE_CHARS {
        title.push_str("...");
    }

    Ok(Note::new(title, text)
        .with_tag(QUICK_TODO_TAG)
        .with_keywords([QUICK_TODO_TAG, "任务"])
        .with_kind(NoteType::Todo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_study_template_sections() {
        let form = TemplateForm::Study(StudyForm {
            knowledge: "勾股定理".into(),
            mistakes: String::new(),
            key_points: "直角三角形".into(),
        });
        let note = template_note("数学", &form).unwrap();
        assert_eq!(note.content, "【知识点】\n勾股定理\n\n【考点总结】\n直角三角形");
        assert_eq!(note.tag, "学习笔记");
        assert_eq!(note.keywords, vec!["学习", "知识点", "考点"]);
        assert_eq!(note.kind, NoteType::Template);
        assert_eq!(note.extra[TEMPLATE_TYPE_FIELD], "study");
        assert_eq!(note.template_data.unwrap()["title"], "数学");
    }

    #[test]
    fn test_work_template_numbers_non_blank_todos() {
        let form = TemplateForm::Work(WorkForm {
            todo_list: vec!["写周报".into(), "  ".into(), "约客户".into()],
            done_list: String::new(),
            deadline: "周五".into(),
        });
        assert_eq!(
            form.format_content(),
            "【待做事项】\n1. 写周报\n2. 约客户\n\n【截止时间】\n周五"
        );
    }

    #[test]
    fn test_life_template_default_quantity() {
        let form = TemplateForm::Life(LifeForm {
            shopping_list: vec![
                ShoppingItem {
                    name: "牛奶".into(),
                    quantity: "2".into(),
                },
                ShoppingItem {
                    name: "面包".into(),
                    quantity: String::new(),
                },
                ShoppingItem::default(),
            ],
            travel: String::new(),
            checkin: "跑步".into(),
        });
        let note = template_note("周末", &form).unwrap();
        assert_eq!(note.content, "【购物清单】\n牛奶 × 2\n面包 × 1\n\n【打卡记录】\n跑步");
        assert_eq!(
            note.template_data.unwrap()["shoppingList"][0],
            json!({"name": "牛奶", "quantity": "2"})
        );
    }

    #[test]
    fn test_empty_template_has_empty_content() {
        let form = TemplateForm::Work(WorkForm::default());
        assert_eq!(form.format_content(), "");
    }

    #[test]
    fn test_template_requires_title() {
        let form = TemplateForm::Study(StudyForm::default());
        assert!(matches!(template_note("  ", &form), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_template_type_serialized_at_top_level() {
        let form = TemplateForm::Life(LifeForm::default());
        let json = serde_json::to_value(template_note("清单", &form).unwrap()).unwrap();
        assert_eq!(json["templateType"], "life");
        assert_eq!(json["type"], "template");
    }

    #[test]
    fn test_quick_todo_short() {
        let note = quick_todo_note("买菜").unwrap();
        assert_eq!(note.title, "买菜");
        assert_eq!(note.content, "买菜");
        assert_eq!(note.tag, "待办");
        assert_eq!(note.keywords, vec!["待办", "任务"]);
        assert_eq!(note.kind, NoteType::Todo);
    }

    #[test]
    fn test_quick_todo_title_truncated_by_chars() {
        let text = "一二三四五六七八九十一二三四五六七八九十多出来";
        let note = quick_todo_note(text).unwrap();
        assert_eq!(note.title, "一二三四五六七八九十一二三四五六七八九十...");
        assert_eq!(note.content, text);

        let exact = "一二三四五六七八九十一二三四五六七八九十";
        assert_eq!(quick_todo_note(exact).unwrap().title, exact);
    }

    #[test]
    fn test_quick_todo_rejects_blank() {
        assert!(matches!(quick_todo_note(" \n"), Err(Error::InvalidInput(_))));
    }
}
