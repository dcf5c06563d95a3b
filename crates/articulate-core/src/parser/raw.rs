//! RawNode - the schema-independent intermediate tree
//!
//! Both upstream shapes are parsed into these types before normalization,
//! so the normalizer never has to sniff fields itself.

use serde_json::Value;

use super::fields;
use crate::{Conjunction, CourseChip};

/// One course leaf as found in raw input
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawCourse {
    pub prefix: String,
    pub number: String,
    pub title: String,
    pub notes: Vec<String>,
}

impl RawCourse {
    pub fn from_value(value: &Value) -> Self {
        Self {
            prefix: fields::string(value, "prefix"),
            number: fields::string(value, "number"),
            title: fields::string(value, "title"),
            notes: fields::strings(value, "notes"),
        }
    }

    pub fn to_chip(&self) -> CourseChip {
        CourseChip::new(&self.prefix, &self.number, &self.title, self.notes.clone())
    }
}

/// When a composite node may be flattened into one flat group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapse {
    /// Always keep the nested structure
    Never,
    /// Flatten when every child normalizes to `single`
    Singles,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    /// A flat list of course leaves
    Leaves {
        courses: Vec<RawCourse>,
        conjunction: Option<Conjunction>,
        notes: Vec<String>,
    },
    /// A node composed of sub-nodes
    Composite {
        children: Vec<RawNode>,
        conjunction: Option<Conjunction>,
        /// Per-edge conjunctions, kept verbatim when present
        edges: Option<Vec<Conjunction>>,
        notes: Vec<String>,
        collapse: Collapse,
    },
    /// Unrecognised node type
    Unknown,
}

impl RawNode {
    /// Number of nodes in this subtree, itself included
    pub fn size(&self) -> usize {
        match self {
            RawNode::Composite { children, .. } => 1 + children.iter().map(RawNode::size).sum::<usize>(),
            _ => 1,
        }
    }
}
