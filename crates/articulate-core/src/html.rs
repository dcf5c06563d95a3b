//! Markup sink - serializes render instructions to HTML
//!
//! Produces deterministic output with:
//! - One element per line, 2-space indentation
//! - The class names the articulation UI styles against
//! - All text content HTML-escaped

use crate::renderer::{Card, Instruction, NotePosition, SeparatorLevel};
use crate::Conjunction;

// ── Public API ─────────────────────────────────────────────

/// Serialize a list of instructions, starting at indent 0
pub fn to_markup(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    for instruction in instructions {
        write_instruction(&mut out, instruction, 0);
    }
    out
}

/// Serialize one college card
pub fn card_markup(card: &Card) -> String {
    let mut out = String::new();
    write_card(&mut out, card, 0);
    out
}

/// Serialize every card, in order
pub fn cards_markup(cards: &[Card]) -> String {
    let mut out = String::new();
    for card in cards {
        write_card(&mut out, card, 0);
    }
    out
}

/// Class attribute of a separator
pub fn separator_class(conjunction: Conjunction, level: SeparatorLevel) -> &'static str {
    match (level, conjunction) {
        (SeparatorLevel::Course, Conjunction::And) => "course-separator separator-and",
        (SeparatorLevel::Course, Conjunction::Or) => "course-separator separator-or",
        (SeparatorLevel::Group, Conjunction::And) => "group-separator-and",
        (SeparatorLevel::Group, Conjunction::Or) => "group-separator-or",
    }
}

/// Escape text for element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ── Element writers ────────────────────────────────────────

fn write_card(out: &mut String, card: &Card, indent: usize) {
    open(out, indent, "div", "articulation-card");
    open(out, indent + 2, "div", "card-header");
    write_leaf(out, indent + 4, "h3", "college-name", &card.college);
    close(out, indent + 2, "div");
    open(out, indent + 2, "div", "card-body");
    open(out, indent + 4, "ul", "course-list");
    for item in &card.items {
        write_instruction(out, item, indent + 6);
    }
    close(out, indent + 4, "ul");
    close(out, indent + 2, "div");
    close(out, indent, "div");
}

fn write_instruction(out: &mut String, instruction: &Instruction, indent: usize) {
    match instruction {
        Instruction::Item { children } => {
            open(out, indent, "li", "course-item");
            for child in children {
                write_instruction(out, child, indent + 2);
            }
            close(out, indent, "li");
        }
        Instruction::Box { shape, children } => {
            open(out, indent, "div", shape.class_name());
            for child in children {
                write_instruction(out, child, indent + 2);
            }
            close(out, indent, "div");
        }
        Instruction::Chip { label } => write_leaf(out, indent, "div", "course-chip", label),
        Instruction::Notes { notes, position } => {
            let class = match position {
                NotePosition::Above => "course-notes-above",
                NotePosition::Below => "course-notes",
            };
            open(out, indent, "div", class);
            for note in notes {
                open(out, indent + 2, "div", "note-item");
                write_leaf(out, indent + 4, "span", "note-text", note);
                close(out, indent + 2, "div");
            }
            close(out, indent, "div");
        }
        Instruction::Separator { conjunction, level } => {
            let tag = match level {
                SeparatorLevel::Course => "div",
                SeparatorLevel::Group => "li",
            };
            write_leaf(out, indent, tag, separator_class(*conjunction, *level), conjunction.label());
        }
    }
}

// ── Helpers ────────────────────────────────────────────────

fn write_indent(out: &mut String, n: usize) {
    for _ in 0..n {
        out.push(' ');
    }
}

fn open(out: &mut String, indent: usize, tag: &str, class: &str) {
    write_indent(out, indent);
    out.push('<');
    out.push_str(tag);
    out.push_str(" class=\"");
    out.push_str(class);
    out.push_str("\">\n");
}

fn close(out: &mut String, indent: usize, tag: &str) {
    write_indent(out, indent);
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}

fn write_leaf(out: &mut String, indent: usize, tag: &str, class: &str, text: &str) {
    write_indent(out, indent);
    out.push('<');
    out.push_str(tag);
    out.push_str(" class=\"");
    out.push_str(class);
    out.push_str("\">");
    out.push_str(&escape(text));
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}
