//! Raw articulation parser - schema detection and the two schema parsers
//!
//! Two independently evolved upstream shapes exist for a sending articulation:
//!
//! - **Items schema**: nodes tagged `SET` or `GROUP` holding an `items` list,
//!   a uniform `conjunction` and optionally per-edge `conjunctions`.
//! - **Tree schema**: nodes holding direct `courses` and/or sub-node
//!   `children`, with a single `conjunction`.
//!
//! The schema is detected once on the root and the whole tree is parsed with
//! the matching parser into [`RawNode`].

pub mod fields;
pub mod raw;

use serde_json::Value;
use tracing::trace;

pub use raw::{Collapse, RawCourse, RawNode};

use crate::Conjunction;

/// Upstream shape of a sending articulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Items,
    Tree,
}

impl Schema {
    /// An object with `children` or `courses` and no `items` is the tree
    /// schema; everything else, including non-objects, is the items schema.
    pub fn detect(value: &Value) -> Schema {
        match value.as_object() {
            Some(map)
                if !map.contains_key("items")
                    && (map.contains_key("children") || map.contains_key("courses")) =>
            {
                Schema::Tree
            }
            _ => Schema::Items,
        }
    }
}

/// Parse a sending articulation, detecting its schema on the root.
pub fn parse(value: &Value) -> RawNode {
    parse_with(value, Schema::detect(value))
}

/// Parse a sending articulation with a known schema
pub fn parse_with(value: &Value, schema: Schema) -> RawNode {
    match schema {
        Schema::Items => parse_items_schema(value),
        Schema::Tree => parse_tree_schema(value),
    }
}

/// Items schema: `SET` → leaves, `GROUP` → composite, anything else → unknown.
///
/// The conjunction stays `None` when absent so that an unjoined multi-item
/// `SET` and an unjoined `GROUP` can be told apart during normalization.
pub fn parse_items_schema(value: &Value) -> RawNode {
    let items = fields::array(value, "items");
    let conjunction = fields::conjunction(value, "conjunction");
    let notes = fields::strings(value, "notes");

    match fields::tag(value, "type").as_str() {
        "SET" => RawNode::Leaves {
            courses: items.iter().map(RawCourse::from_value).collect(),
            conjunction,
            notes,
        },
        "GROUP" => {
            let children: Vec<RawNode> = items.iter().map(parse_items_schema).collect();
            // Per-edge joins only count when there is something to join.
            let edges = fields::conjunction_list(value, "conjunctions").filter(|_| !children.is_empty());
            let collapse = if edges.is_none() && conjunction.is_some() {
                Collapse::Singles
            } else {
                Collapse::Never
            };
            trace!(children = children.len(), ?collapse, "items schema group");
            RawNode::Composite {
                children,
                conjunction,
                edges,
                notes,
                collapse,
            }
        }
        other => {
            trace!(node_type = other, "unrecognised items schema node");
            RawNode::Unknown
        }
    }
}

/// Tree schema: a node without children is a leaf list over its `courses`;
/// otherwise it is a composite over its `children`.
///
/// An absent conjunction resolves to `Or` here. A composite is flattened only
/// when every child is a terminal leaf holding exactly one course.
pub fn parse_tree_schema(value: &Value) -> RawNode {
    let conjunction = Some(fields::conjunction(value, "conjunction").unwrap_or(Conjunction::Or));
    let notes = fields::strings(value, "notes");
    let children = fields::array(value, "children");

    if children.is_empty() {
        return RawNode::Leaves {
            courses: fields::array(value, "courses")
                .iter()
                .map(RawCourse::from_value)
                .collect(),
            conjunction,
            notes,
        };
    }

    let single_course_leaves = children
        .iter()
        .all(|child| fields::array(child, "children").is_empty() && fields::array(child, "courses").len() == 1);
    let collapse = if single_course_leaves {
        Collapse::Singles
    } else {
        Collapse::Never
    };
    trace!(children = children.len(), ?collapse, "tree schema node");

    RawNode::Composite {
        children: children.iter().map(parse_tree_schema).collect(),
        conjunction,
        edges: None,
        notes,
        collapse,
    }
}
