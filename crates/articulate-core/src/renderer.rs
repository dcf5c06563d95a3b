//! Renderer - walks canonical `Group` trees into render instructions
//!
//! The output is a tree of block-level instructions (list items, boxes,
//! chips, notes, separators) that maps one-to-one onto markup; see
//! [`crate::html`] for the markup sink.
//!
//! # Layout rules
//!
//! - `single`: one item holding a single box with the chip (if any) and the
//!   group notes below it
//! - `and` / `or`: one item holding the group notes above a box of chips with
//!   a same-kind separator between adjacent chips
//! - `nested`: no box of its own; each child's items are emitted directly,
//!   with a group-level separator between adjacent children
//! - card: each alternative is an item, separated by the card's `groupJoin`

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CollegeArticulation, Conjunction, CourseItem, Group};

/// Box shape wrapping a group's chips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxShape {
    Single,
    And,
    Or,
}

impl BoxShape {
    pub fn class_name(self) -> &'static str {
        match self {
            BoxShape::Single => "group-box-single",
            BoxShape::And => "group-box-and",
            BoxShape::Or => "group-box-or",
        }
    }
}

impl From<Conjunction> for BoxShape {
    fn from(conjunction: Conjunction) -> Self {
        match conjunction {
            Conjunction::And => BoxShape::And,
            Conjunction::Or => BoxShape::Or,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotePosition {
    Above,
    Below,
}

/// Where a separator sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorLevel {
    /// Between chips inside one box
    Course,
    /// Between list items
    Group,
}

/// One block-level render instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Instruction {
    /// A list entry
    Item { children: Vec<Instruction> },
    Box {
        shape: BoxShape,
        children: Vec<Instruction>,
    },
    Chip { label: String },
    Notes {
        notes: Vec<String>,
        position: NotePosition,
    },
    Separator {
        conjunction: Conjunction,
        level: SeparatorLevel,
    },
}

impl Instruction {
    fn separator(conjunction: Conjunction, level: SeparatorLevel) -> Self {
        Instruction::Separator { conjunction, level }
    }

    fn notes(notes: &[String], position: NotePosition) -> Option<Self> {
        if notes.is_empty() {
            return None;
        }
        Some(Instruction::Notes {
            notes: notes.to_vec(),
            position,
        })
    }

    /// Chips directly inside this instruction, not counting nested boxes
    pub fn chip_count(&self) -> usize {
        match self {
            Instruction::Chip { .. } => 1,
            Instruction::Item { children } => children
                .iter()
                .filter(|c| !matches!(c, Instruction::Box { .. }))
                .map(Instruction::chip_count)
                .sum(),
            Instruction::Box { children, .. } => children.iter().map(Instruction::chip_count).sum(),
            _ => 0,
        }
    }
}

/// A college card: its name and the top-level list of alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub college: String,
    pub items: Vec<Instruction>,
}

// ── Public API ─────────────────────────────────────────────

/// Render one course entry: the chip, then its own notes below it.
///
/// A bare label string renders as a chip with no notes.
pub fn render_course_item(item: &CourseItem) -> Vec<Instruction> {
    let (label, notes) = match item {
        CourseItem::Label(label) => return vec![Instruction::Chip { label: label.clone() }],
        CourseItem::Chip(chip) => (chip.label.clone(), chip.notes.as_slice()),
        CourseItem::Listing(listing) => {
            let code = [listing.prefix.as_deref(), listing.number.as_deref()]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            let label = match listing.title.as_deref() {
                Some(title) if !title.is_empty() => format!("{} - {}", code, title),
                _ => code,
            };
            (label, listing.notes.as_slice())
        }
    };

    let mut out = vec![Instruction::Chip { label }];
    out.extend(Instruction::notes(notes, NotePosition::Below));
    out
}

/// Render a group (root or nested) into list-level instructions.
pub fn render_course_group(group: &Group) -> Vec<Instruction> {
    match group {
        Group::Single { courses, notes } => vec![render_single(courses, notes)],
        Group::And { courses, notes } | Group::Or { courses, notes } => {
            let conjunction = group.flat_conjunction().unwrap_or(Conjunction::Or);
            if courses.len() < 2 {
                // A flat box needs two chips to separate.
                return vec![render_single(courses, notes)];
            }

            let mut inner = Vec::new();
            for (i, course) in courses.iter().enumerate() {
                inner.extend(render_course_item(course));
                if i < courses.len() - 1 {
                    inner.push(Instruction::separator(conjunction, SeparatorLevel::Course));
                }
            }

            let mut children: Vec<Instruction> = Instruction::notes(notes, NotePosition::Above).into_iter().collect();
            children.push(Instruction::Box {
                shape: conjunction.into(),
                children: inner,
            });
            vec![Instruction::Item { children }]
        }
        Group::Nested(nested) => {
            let mut out = Vec::new();
            for (i, child) in nested.groups.iter().enumerate() {
                out.extend(render_course_group(child));
                if i < nested.groups.len() - 1 {
                    out.push(Instruction::separator(nested.edge(i), SeparatorLevel::Group));
                }
            }
            out
        }
    }
}

/// Render one college's alternatives as a card.
pub fn render_card(college: &CollegeArticulation) -> Card {
    let mut items = Vec::new();
    for (i, group) in college.groups.iter().enumerate() {
        items.extend(render_course_group(group));
        if i < college.groups.len() - 1 {
            items.push(Instruction::separator(college.group_join, SeparatorLevel::Group));
        }
    }
    Card {
        college: college.college.clone(),
        items,
    }
}

/// Render every college as a card, in order
pub fn render_cards(colleges: &[CollegeArticulation]) -> Vec<Card> {
    colleges.iter().map(render_card).collect()
}

fn render_single(courses: &[CourseItem], notes: &[String]) -> Instruction {
    if courses.len() > 1 {
        debug!(omitted = courses.len() - 1, "single box shows its first chip only");
    }
    let mut children: Vec<Instruction> = courses.first().map(render_course_item).unwrap_or_default();
    children.extend(Instruction::notes(notes, NotePosition::Below));
    Instruction::Item {
        children: vec![Instruction::Box {
            shape: BoxShape::Single,
            children,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CourseChip, CourseListing, Nested};
    use serde_json::json;

    fn chip(label: &str) -> CourseItem {
        CourseItem::Chip(CourseChip {
            label: label.into(),
            notes: vec![],
        })
    }

    fn chip_label(label: &str) -> Instruction {
        Instruction::Chip { label: label.into() }
    }

    fn sep(conjunction: Conjunction, level: SeparatorLevel) -> Instruction {
        Instruction::Separator { conjunction, level }
    }

    /// Every box in the tree, with its shape and chip count
    fn boxes(instructions: &[Instruction], out: &mut Vec<(BoxShape, usize)>) {
        for instruction in instructions {
            match instruction {
                Instruction::Item { children } => boxes(children, out),
                Instruction::Box { shape, children } => {
                    out.push((*shape, instruction.chip_count()));
                    boxes(children, out);
                }
                _ => {}
            }
        }
    }

    fn group_separators(instructions: &[Instruction]) -> Vec<Conjunction> {
        instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::Separator {
                    conjunction,
                    level: SeparatorLevel::Group,
                } => Some(*conjunction),
                _ => None,
            })
            .collect()
    }

    // ── Course items ───────────────────────────────────

    #[test]
    fn test_item_chip_with_notes_below() {
        let item = CourseItem::Chip(CourseChip {
            label: "MATH 1A - Calc I".into(),
            notes: vec!["Honors".into()],
        });
        assert_eq!(
            render_course_item(&item),
            vec![
                chip_label("MATH 1A - Calc I"),
                Instruction::Notes {
                    notes: vec!["Honors".into()],
                    position: NotePosition::Below
                }
            ]
        );
    }

    #[test]
    fn test_item_string_leaf_is_bare_label() {
        assert_eq!(
            render_course_item(&CourseItem::Label("MATH 1A".into())),
            vec![chip_label("MATH 1A")]
        );
    }

    #[test]
    fn test_item_listing_builds_label() {
        let listing = CourseListing {
            prefix: Some("MATH".into()),
            number: Some("1A".into()),
            title: Some("Calc I".into()),
            notes: vec![],
        };
        assert_eq!(
            render_course_item(&CourseItem::Listing(listing)),
            vec![chip_label("MATH 1A - Calc I")]
        );

        let untitled = CourseListing {
            prefix: None,
            number: Some("1A".into()),
            ..CourseListing::default()
        };
        assert_eq!(
            render_course_item(&CourseItem::Listing(untitled)),
            vec![chip_label("1A")]
        );
    }

    // ── Groups ─────────────────────────────────────────

    #[test]
    fn test_single_box_with_notes_below() {
        let group = Group::Single {
            courses: vec![chip("A")],
            notes: vec!["n".into()],
        };
        assert_eq!(
            render_course_group(&group),
            vec![Instruction::Item {
                children: vec![Instruction::Box {
                    shape: BoxShape::Single,
                    children: vec![
                        chip_label("A"),
                        Instruction::Notes {
                            notes: vec!["n".into()],
                            position: NotePosition::Below
                        }
                    ]
                }]
            }]
        );
    }

    #[test]
    fn test_empty_single_renders_empty_box() {
        assert_eq!(
            render_course_group(&Group::empty()),
            vec![Instruction::Item {
                children: vec![Instruction::Box {
                    shape: BoxShape::Single,
                    children: vec![]
                }]
            }]
        );
    }

    #[test]
    fn test_flat_group_separators_and_notes_above() {
        let group = Group::Or {
            courses: vec![chip("A"), chip("B"), chip("C")],
            notes: vec!["pick one".into()],
        };
        assert_eq!(
            render_course_group(&group),
            vec![Instruction::Item {
                children: vec![
                    Instruction::Notes {
                        notes: vec!["pick one".into()],
                        position: NotePosition::Above
                    },
                    Instruction::Box {
                        shape: BoxShape::Or,
                        children: vec![
                            chip_label("A"),
                            sep(Conjunction::Or, SeparatorLevel::Course),
                            chip_label("B"),
                            sep(Conjunction::Or, SeparatorLevel::Course),
                            chip_label("C"),
                        ]
                    }
                ]
            }]
        );
    }

    #[test]
    fn test_nested_has_no_box_and_uses_uniform_join() {
        let group = Group::Nested(Nested {
            groups: vec![
                Group::Single {
                    courses: vec![chip("A")],
                    notes: vec![],
                },
                Group::And {
                    courses: vec![chip("B"), chip("C")],
                    notes: vec![],
                },
            ],
            join: Some(Conjunction::And),
            joins: None,
            notes: vec![],
        });
        let out = render_course_group(&group);
        assert_eq!(out.len(), 3);
        assert!(matches!(out[0], Instruction::Item { .. }));
        assert_eq!(out[1], sep(Conjunction::And, SeparatorLevel::Group));
        assert!(matches!(out[2], Instruction::Item { .. }));
    }

    #[test]
    fn test_per_edge_joins_take_precedence() {
        let group = Group::Nested(Nested {
            groups: vec![Group::empty(), Group::empty(), Group::empty()],
            join: Some(Conjunction::Or),
            joins: Some(vec![Conjunction::And, Conjunction::Or]),
            notes: vec![],
        });
        let out = render_course_group(&group);
        assert_eq!(group_separators(&out), vec![Conjunction::And, Conjunction::Or]);

        let all_and = Group::Nested(Nested {
            groups: vec![Group::empty(), Group::empty(), Group::empty()],
            join: Some(Conjunction::Or),
            joins: Some(vec![Conjunction::And, Conjunction::And]),
            notes: vec![],
        });
        assert_eq!(
            group_separators(&render_course_group(&all_and)),
            vec![Conjunction::And, Conjunction::And]
        );
    }

    #[test]
    fn test_short_joins_fall_back_to_join() {
        let group = Group::Nested(Nested {
            groups: vec![Group::empty(), Group::empty(), Group::empty()],
            join: Some(Conjunction::And),
            joins: Some(vec![Conjunction::Or]),
            notes: vec![],
        });
        assert_eq!(
            group_separators(&render_course_group(&group)),
            vec![Conjunction::Or, Conjunction::And]
        );
    }

    #[test]
    fn test_nested_without_join_defaults_to_or() {
        let group: Group = serde_json::from_value(json!({
            "type": "nested",
            "groups": [{"type": "single", "courses": ["A"]}, {"type": "single", "courses": ["B"]}]
        }))
        .unwrap();
        assert_eq!(group_separators(&render_course_group(&group)), vec![Conjunction::Or]);
    }

    #[test]
    fn test_loaded_group_with_odd_joins_still_renders() {
        let single = json!({"type": "single", "courses": ["A"]});
        let group: Group = serde_json::from_value(json!({
            "type": "nested",
            "groups": [single, single, single],
            "join": "AND",
            "joins": ["and", null]
        }))
        .unwrap();
        assert_eq!(
            group_separators(&render_course_group(&group)),
            vec![Conjunction::And, Conjunction::Or]
        );

        let group: Group = serde_json::from_value(json!({
            "type": "nested",
            "groups": [single, single, single],
            "join": "and",
            "joins": ["xor"]
        }))
        .unwrap();
        assert_eq!(
            group_separators(&render_course_group(&group)),
            vec![Conjunction::Or, Conjunction::And]
        );
    }

    #[test]
    fn test_chip_count_invariant_holds_for_degenerate_groups() {
        let groups = vec![
            Group::Single {
                courses: vec![chip("A"), chip("B"), chip("C")],
                notes: vec![],
            },
            Group::And {
                courses: vec![chip("D")],
                notes: vec![],
            },
            Group::Or {
                courses: vec![],
                notes: vec![],
            },
            Group::And {
                courses: vec![chip("E"), chip("F")],
                notes: vec![],
            },
        ];
        let mut found = Vec::new();
        for group in &groups {
            boxes(&render_course_group(group), &mut found);
        }
        for (shape, chips) in found {
            match shape {
                BoxShape::Single => assert!(chips <= 1, "single box with {} chips", chips),
                BoxShape::And | BoxShape::Or => assert!(chips >= 2, "flat box with {} chips", chips),
            }
        }
    }

    // ── Cards ──────────────────────────────────────────

    #[test]
    fn test_card_separates_alternatives_with_or() {
        let college = CollegeArticulation {
            college: "Foo College".into(),
            group_join: Conjunction::Or,
            groups: vec![
                Group::Single {
                    courses: vec![chip("A")],
                    notes: vec![],
                },
                Group::Single {
                    courses: vec![chip("B")],
                    notes: vec![],
                },
            ],
        };
        let card = render_card(&college);
        assert_eq!(card.college, "Foo College");
        assert_eq!(card.items.len(), 3);
        assert_eq!(group_separators(&card.items), vec![Conjunction::Or]);
    }

    #[test]
    fn test_end_to_end_and_box() {
        let record = crate::CourseRecord::from_value(&json!({
            "key": "MATH 1",
            "type": "COURSE",
            "articulations": [{
                "sending_name": "Foo College",
                "sending_articulation": {
                    "type": "GROUP",
                    "conjunction": "AND",
                    "items": [
                        {"type": "SET", "items": [{"prefix": "MATH", "number": "1A", "title": "Calc I"}]},
                        {"type": "SET", "items": [{"prefix": "MATH", "number": "1B", "title": "Calc II"}]}
                    ]
                }
            }]
        }));
        let colleges = crate::normalize_articulations(&record);
        let card = render_card(&colleges[0]);
        assert_eq!(
            card.items,
            vec![Instruction::Item {
                children: vec![Instruction::Box {
                    shape: BoxShape::And,
                    children: vec![
                        chip_label("MATH 1A - Calc I"),
                        sep(Conjunction::And, SeparatorLevel::Course),
                        chip_label("MATH 1B - Calc II"),
                    ]
                }]
            }]
        );
    }
}
