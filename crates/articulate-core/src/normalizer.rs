//! Canonical normalizer - converts raw sending articulations to `Group` trees
//!
//! # Pipeline
//!
//! `JSON → Schema::detect → parse → RawNode → normalize_raw → collapse_nested → Group`
//!
//! # Guarantees
//!
//! - **Total**: any JSON value yields a well-formed `Group`; the worst case is
//!   an empty `single`
//! - **Deterministic**: same input always produces same output
//! - **Order preserving**: chips and sub-groups keep their input order
//! - **Invariant preserving**: `and`/`or` groups never hold fewer than two chips

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, trace};

use crate::catalog::CourseRecord;
use crate::parser::{self, Collapse, RawCourse, RawNode};
use crate::{CollegeArticulation, Conjunction, CourseItem, Group, Nested};

// ── Public API ─────────────────────────────────────────────

/// Normalize one raw sending articulation of either upstream schema.
///
/// Never fails: missing arrays and strings read as empty, an unrecognised
/// node becomes an empty `single`.
pub fn normalize_sending_node(value: &Value) -> Group {
    let schema = parser::Schema::detect(value);
    let raw = parser::parse_with(value, schema);
    trace!(?schema, nodes = raw.size(), "parsed sending articulation");
    normalize_raw(&raw)
}

/// Normalize every articulation row of a receiving-course record, grouped by
/// sending college in order of first appearance.
///
/// Each college's alternatives are OR-joined.
pub fn normalize_articulations(record: &CourseRecord) -> Vec<CollegeArticulation> {
    let mut order: Vec<(String, Vec<Group>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in &record.articulations {
        let group = normalize_sending_node(&row.sending_articulation);
        match index.get(row.sending_name.as_str()) {
            Some(&i) => order[i].1.push(group),
            None => {
                index.insert(row.sending_name.as_str(), order.len());
                order.push((row.sending_name.clone(), vec![group]));
            }
        }
    }

    debug!(
        course = %record.key,
        rows = record.articulations.len(),
        colleges = order.len(),
        "normalized articulations"
    );

    order
        .into_iter()
        .map(|(college, groups)| CollegeArticulation {
            college,
            group_join: Conjunction::Or,
            groups,
        })
        .collect()
}

/// Normalize an already-parsed raw tree
pub fn normalize_raw(node: &RawNode) -> Group {
    match node {
        RawNode::Leaves {
            courses,
            conjunction,
            notes,
        } => normalize_leaves(courses, *conjunction, notes),
        RawNode::Composite {
            children,
            conjunction,
            edges,
            notes,
            collapse,
        } => {
            let groups: Vec<Group> = children.iter().map(normalize_raw).collect();

            if let Some(edges) = edges {
                // Mixed operators ("A and B or C") need every edge, so never collapse.
                return Group::Nested(Nested {
                    groups,
                    join: None,
                    joins: Some(edges.clone()),
                    notes: notes.clone(),
                });
            }

            let candidate = Nested {
                groups,
                join: Some(conjunction.unwrap_or(Conjunction::Or)),
                joins: None,
                notes: notes.clone(),
            };
            collapse_nested(candidate, *collapse)
        }
        RawNode::Unknown => Group::empty(),
    }
}

// ── Collapsing ─────────────────────────────────────────────

/// Post-processing pass over a `nested` candidate.
///
/// Under [`Collapse::Singles`], a candidate whose children are all `single`
/// becomes one flat group over their chips (in order) with the candidate's
/// uniform join. Child-level notes follow the candidate's own notes, in child
/// order. A flattened result of one chip or none is a `single`. Everything
/// else stays nested.
pub fn collapse_nested(candidate: Nested, policy: Collapse) -> Group {
    let flattenable = policy == Collapse::Singles
        && candidate.joins.is_none()
        && !candidate.groups.is_empty()
        && candidate.groups.iter().all(Group::is_single);

    if !flattenable {
        return Group::Nested(candidate);
    }

    let conjunction = candidate.join.unwrap_or(Conjunction::Or);
    let mut notes = candidate.notes;
    let mut courses: Vec<CourseItem> = Vec::new();
    for group in candidate.groups {
        notes.extend_from_slice(group.notes());
        courses.extend(group.into_courses());
    }
    trace!(chips = courses.len(), %conjunction, "collapsed nested singles");
    Group::from_courses(conjunction, courses, notes)
}

// ── Leaves ─────────────────────────────────────────────────

fn normalize_leaves(courses: &[RawCourse], conjunction: Option<Conjunction>, notes: &[String]) -> Group {
    let chips: Vec<CourseItem> = courses.iter().map(|c| c.to_chip().into()).collect();
    let notes = notes.to_vec();

    if chips.len() <= 1 {
        return Group::Single { courses: chips, notes };
    }

    match conjunction {
        Some(conjunction) => Group::from_courses(conjunction, chips, notes),
        None => {
            // Unjoined multi-course set: keep every chip rather than guess an operator.
            debug!(chips = chips.len(), "set without conjunction kept as single");
            Group::Single { courses: chips, notes }
        }
    }
}
