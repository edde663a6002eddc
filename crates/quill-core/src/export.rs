//! Plain-text export of notes.

use std::fmt::Write;

use crate::models::Note;
use crate::temporal::format_time;

/// Placeholder written instead of the body of a locked note.
pub const LOCKED_PLACEHOLDER: &str = "[已锁定]";

fn body(note: &Note) -> &str {
    if note.is_locked {
        LOCKED_PLACEHOLDER
    } else {
        &note.content
    }
}

/// Render a single note for sharing or saving as a `.txt` file.
pub fn export_note_as_text(note: &Note) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "标题: {}", note.title);
    let _ = writeln!(out, "标签: {}", note.tag);
    let _ = writeln!(out, "创建时间: {}", format_time(note.create_time));
    let _ = write!(out, "\n内容:\n{}\n", body(note));

    if !note.keywords.is_empty() {
        let _ = write!(out, "\n关键词: {}\n", note.keywords.join(", "));
    }

    if !note.todos.is_empty() {
        out.push_str("\n待办事项:\n");
        for (i, todo) in note.todos.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, todo);
        }
    }

    out
}

/// Render a whole collection as one document, in collection order.
pub fn export_notes(notes: &[Note], exported_at: i64) -> String {
    let mut out = String::new();
    out.push_str("笔记数据导出\n");
    let _ = writeln!(out, "导出时间：{}", format_time(exported_at));
    let _ = write!(out, "共 {} 条笔记\n\n", notes.len());
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    for (i, note) in notes.iter().enumerate() {
        let _ = writeln!(out, "【笔记 {}】", i + 1);
        let _ = writeln!(out, "标题：{}", note.title);
        let _ = writeln!(out, "标签：{}", note.tag);
        let _ = writeln!(out, "创建时间：{}", format_time(note.create_time));
        let _ = writeln!(out, "内容：\n{}", body(note));
        if !note.keywords.is_empty() {
            let _ = writeln!(out, "关键词：{}", note.keywords.join(", "));
        }
        if !note.todos.is_empty() {
            out.push_str("待办事项：\n");
            for todo in &note.todos {
                let _ = writeln!(out, "  - {}", todo);
            }
        }
        out.push('\n');
        out.push_str(&"-".repeat(50));
        out.push_str("\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Note {
        Note::new("周会", "讨论排期")
            .with_tag("工作")
            .with_keywords(["排期", "周会"])
            .with_todos(["发纪要", "约客户"])
            .with_create_time(1_700_000_000_000)
    }

    #[test]
    fn test_export_single_note_sections() {
        let text = export_note_as_text(&sample());
        assert!(text.starts_with("标题: 周会\n标签: 工作\n创建时间: "));
        assert!(text.contains("\n内容:\n讨论排期\n"));
        assert!(text.contains("\n关键词: 排期, 周会\n"));
        assert!(text.contains("\n待办事项:\n1. 发纪要\n2. 约客户\n"));
    }

    #[test]
    fn test_export_single_note_omits_empty_sections() {
        let text = export_note_as_text(&Note::new("t", "c"));
        assert!(!text.contains("关键词"));
        assert!(!text.contains("待办事项"));
    }

    #[test]
    fn test_export_hides_locked_content() {
        let mut note = sample();
        note.is_locked = true;
        note.password = Some("$argon2id$hash".into());
        let text = export_note_as_text(&note);
        assert!(!text.contains("讨论排期"));
        assert!(text.contains(LOCKED_PLACEHOLDER));
        assert!(!text.contains("argon2"));
    }

    #[test]
    fn test_export_collection() {
        let notes = vec![sample(), Note::new("灵感", "一个点子")];
        let text = export_notes(&notes, 1_700_000_100_000);
        assert!(text.contains("共 2 条笔记"));
        assert!(text.contains("【笔记 1】\n标题：周会"));
        assert!(text.contains("【笔记 2】\n标题：灵感"));
        assert!(text.contains("待办事项：\n  - 发纪要\n  - 约客户\n"));
        assert_eq!(text.matches(&"-".repeat(50)).count(), 2);
    }

    #[test]
    fn test_export_empty_collection() {
        let text = export_notes(&[], 0);
        assert!(text.contains("共 0 条笔记"));
        assert!(!text.contains("【笔记"));
    }
}
