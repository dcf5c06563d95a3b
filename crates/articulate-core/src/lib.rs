//! Articulate Core - canonical articulation tree normalizer
//!
//! Turns the loosely structured "sending articulation" records produced by
//! upstream transfer-agreement data into one canonical, renderer-ready tree,
//! and walks that tree into an ordered sequence of render instructions.
//!
//! # Architecture
//!
//! ```text
//! JSON record → Schema::detect → RawNode → Normalizer → Group / CollegeArticulation
//!                                                          ↓
//!                                                       Renderer → Instructions → html sink
//! ```
//!
//! # Guarantees
//!
//! - **Total**: normalization and rendering never fail on malformed input
//! - **Deterministic**: same input always produces identical output
//! - **Order preserving**: colleges keep first-appearance order, chips keep input order
//! - **Canonical**: one tree shape per requirement, independent of upstream schema

pub mod assist;
pub mod catalog;
pub mod error;
pub mod fingerprint;
pub mod html;
pub mod normalizer;
pub mod parser;
pub mod renderer;

pub use catalog::{ArticulationRow, CourseKind, CourseRecord};
pub use error::{Error, Result};
pub use normalizer::{normalize_articulations, normalize_sending_node};
pub use renderer::{render_card, render_course_group, render_course_item, Card, Instruction};

use serde::{Deserialize, Deserializer, Serialize};

/// Logical combinator between sibling requirement items
///
/// Deserialization is lossy like [`Conjunction::from_token`]: any string other
/// than `and` (in any case), and any non-string value, reads as `Or`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    And,
    Or,
}

impl Conjunction {
    /// Lossy token parse: `AND` in any case is `And`, everything else is `Or`.
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("and") {
            Conjunction::And
        } else {
            Conjunction::Or
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }

    /// Uppercased word shown on separators
    pub fn label(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

impl<'de> Deserialize<'de> for Conjunction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(token) => Conjunction::from_token(&token),
            _ => Conjunction::Or,
        })
    }
}

impl std::fmt::Display for Conjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete sending course, rendered as an atomic unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseChip {
    pub label: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl CourseChip {
    /// Build a chip from its parts; the label has all whitespace runs collapsed
    /// and is trimmed.
    pub fn new(prefix: &str, number: &str, title: &str, notes: Vec<String>) -> Self {
        let joined = format!("{} {} - {}", prefix, number, title);
        let label = joined.split_whitespace().collect::<Vec<_>>().join(" ");
        Self { label, notes }
    }
}

/// A course entry held by a group.
///
/// Besides the canonical chip, two legacy shapes are still accepted when a
/// tree is read back from JSON: a bare label string, and an unlabelled
/// listing carrying its own prefix/number/title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseItem {
    Label(String),
    Chip(CourseChip),
    Listing(CourseListing),
}

impl From<CourseChip> for CourseItem {
    fn from(chip: CourseChip) -> Self {
        CourseItem::Chip(chip)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseListing {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Canonical requirement tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Group {
    /// Satisfied by at most one course; zero courses means "no match".
    Single {
        courses: Vec<CourseItem>,
        #[serde(default)]
        notes: Vec<String>,
    },
    /// Every course is required.
    And {
        courses: Vec<CourseItem>,
        #[serde(default)]
        notes: Vec<String>,
    },
    /// Any one course suffices.
    Or {
        courses: Vec<CourseItem>,
        #[serde(default)]
        notes: Vec<String>,
    },
    /// Composition of sub-groups.
    Nested(Nested),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nested {
    pub groups: Vec<Group>,
    #[serde(default)]
    pub join: Option<Conjunction>,
    /// Per-edge conjunctions; entry `i` sits between `groups[i]` and `groups[i + 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joins: Option<Vec<Conjunction>>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Nested {
    /// Conjunction between `groups[i]` and `groups[i + 1]`.
    ///
    /// A missing per-edge entry falls back to the uniform join, then to `Or`.
    pub fn edge(&self, i: usize) -> Conjunction {
        self.joins
            .as_ref()
            .and_then(|joins| joins.get(i).copied())
            .or(self.join)
            .unwrap_or(Conjunction::Or)
    }
}

impl Group {
    /// The "no match" group: a single with no course and no notes.
    pub fn empty() -> Self {
        Group::Single {
            courses: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Flat group over `courses`; one course or none becomes a `single`.
    pub fn from_courses(conjunction: Conjunction, courses: Vec<CourseItem>, notes: Vec<String>) -> Self {
        if courses.len() <= 1 {
            return Group::Single { courses, notes };
        }
        match conjunction {
            Conjunction::And => Group::And { courses, notes },
            Conjunction::Or => Group::Or { courses, notes },
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Group::Single { .. })
    }

    /// Conjunction of a flat `and`/`or` group
    pub fn flat_conjunction(&self) -> Option<Conjunction> {
        match self {
            Group::And { .. } => Some(Conjunction::And),
            Group::Or { .. } => Some(Conjunction::Or),
            _ => None,
        }
    }

    /// Courses held directly by this group (empty for `nested`)
    pub fn courses(&self) -> &[CourseItem] {
        match self {
            Group::Single { courses, .. } | Group::And { courses, .. } | Group::Or { courses, .. } => {
                courses
            }
            Group::Nested(_) => &[],
        }
    }

    pub fn into_courses(self) -> Vec<CourseItem> {
        match self {
            Group::Single { courses, .. } | Group::And { courses, .. } | Group::Or { courses, .. } => {
                courses
            }
            Group::Nested(_) => Vec::new(),
        }
    }

    pub fn notes(&self) -> &[String] {
        match self {
            Group::Single { notes, .. } | Group::And { notes, .. } | Group::Or { notes, .. } => notes,
            Group::Nested(nested) => &nested.notes,
        }
    }
}

/// All requirement alternatives one sending college offers for a receiving course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeArticulation {
    pub college: String,
    /// Always `Or`: satisfying any one alternative is enough.
    #[serde(rename = "groupJoin")]
    pub group_join: Conjunction,
    pub groups: Vec<Group>,
}
