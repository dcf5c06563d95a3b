//! Upstream conversion - agreement `sendingArticulation` objects to the tree schema
//!
//! Transfer agreements describe the sending side as positioned course groups
//! joined by range-based group conjunctions. This module rewrites that into
//! the `courses`/`children`/`conjunction` tree schema the normalizer accepts.

use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalizer::normalize_sending_node;
use crate::parser::fields;
use crate::{Conjunction, Group, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeType {
    Group,
    Course,
}

/// One course in tree-schema form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeCourse {
    pub prefix: String,
    pub number: String,
    pub title: String,
    pub notes: Vec<String>,
    pub min_units: f64,
    pub max_units: f64,
}

/// One node in tree-schema form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(serialize_with = "upper_conjunction")]
    pub conjunction: Conjunction,
    pub courses: Vec<TreeCourse>,
    pub children: Vec<TreeNode>,
    pub notes: Vec<String>,
}

fn upper_conjunction<S: Serializer>(conjunction: &Conjunction, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(conjunction.label())
}

impl TreeNode {
    fn group(conjunction: Conjunction, children: Vec<TreeNode>, notes: Vec<String>) -> Self {
        Self {
            node_type: NodeType::Group,
            conjunction,
            courses: Vec::new(),
            children,
            notes,
        }
    }

    fn course(courses: Vec<TreeCourse>, notes: Vec<String>) -> Self {
        Self {
            node_type: NodeType::Course,
            conjunction: Conjunction::And,
            courses,
            children: Vec::new(),
            notes,
        }
    }
}

// ── Public API ─────────────────────────────────────────────

/// Convert a `sendingArticulation` object into a tree-schema node.
///
/// Returns `None` for absent/empty input and for articulations that carry a
/// non-blank `noArticulationReason`.
pub fn build_tree(sending: &Value) -> Option<TreeNode> {
    let is_empty = match sending {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return None;
    }

    let reason = fields::string(sending, "noArticulationReason");
    if !reason.trim().is_empty() {
        debug!(reason = %reason.trim(), "no articulation");
        return None;
    }

    let groups: Vec<TreeNode> = by_position(fields::array(sending, "items"), "CourseGroup")
        .into_iter()
        .map(parse_course_group)
        .collect();

    Some(combine_groups(groups, fields::array(sending, "courseGroupConjunctions")))
}

/// Convert and normalize in one step.
pub fn normalize_assist(sending: &Value) -> Result<Option<Group>> {
    match build_tree(sending) {
        Some(tree) => {
            let value = serde_json::to_value(&tree)?;
            Ok(Some(normalize_sending_node(&value)))
        }
        None => Ok(None),
    }
}

/// One positioned course group.
///
/// An `And` group (the default) becomes one course node holding every
/// course; any other group becomes an OR over single-course nodes.
pub fn parse_course_group(group: &Value) -> TreeNode {
    let internal = fields::opt_string(group, "courseConjunction").unwrap_or_else(|| "And".to_string());
    let items = by_position(fields::array(group, "items"), "Course");
    let notes = attribute_notes(group);

    if internal.eq_ignore_ascii_case("and") {
        let courses = items.into_iter().map(|item| make_course(item, &[])).collect();
        return TreeNode::course(courses, notes);
    }

    let children = items
        .into_iter()
        .map(|item| TreeNode::course(vec![make_course(item, &[])], Vec::new()))
        .collect();
    TreeNode::group(Conjunction::Or, children, notes)
}

/// One upstream course; attribute contents become notes.
pub fn make_course(course: &Value, extra_notes: &[String]) -> TreeCourse {
    let mut notes = attribute_notes(course);
    notes.extend_from_slice(extra_notes);

    let missing = |key: &str| course.get(key).map(Value::is_null).unwrap_or(true);
    if missing("prefix") && missing("courseNumber") {
        warn!("upstream course has neither prefix nor number");
        return TreeCourse {
            prefix: "Unknown".into(),
            number: "Course".into(),
            title: "Missing Course".into(),
            notes: vec!["This particular course is broken upstream and displays an empty course.".into()],
            min_units: -1.0,
            max_units: -1.0,
        };
    }

    TreeCourse {
        prefix: fields::string(course, "prefix"),
        number: fields::string(course, "courseNumber"),
        title: fields::string(course, "courseTitle"),
        notes,
        min_units: fields::float(course, "minUnits").unwrap_or(0.0),
        max_units: fields::float(course, "maxUnits").unwrap_or(0.0),
    }
}

/// Join positioned groups using range-based group conjunctions.
///
/// Each range sets the edges `begin..end` (clamped to the `n - 1` edges);
/// unset edges are `And`. Uniform edges give one group with that conjunction.
/// Mixed edges split the groups at every `Or` edge into AND segments, joined
/// by OR; a segment of one course node is kept bare.
pub fn combine_groups(mut groups: Vec<TreeNode>, ranges: &[Value]) -> TreeNode {
    let n = groups.len();
    if n == 0 {
        return TreeNode::group(Conjunction::And, Vec::new(), Vec::new());
    }
    if n == 1 && ranges.is_empty() {
        return groups.remove(0);
    }

    let edge_count = n - 1;
    let mut edges = vec![Conjunction::And; edge_count];
    for range in ranges {
        let conjunction = range_conjunction(range);
        let begin = fields::integer(range, "sendingCourseGroupBeginPosition").unwrap_or(0).max(0);
        let end = fields::integer(range, "sendingCourseGroupEndPosition")
            .unwrap_or(edge_count as i64)
            .min(edge_count as i64);
        for i in begin..end {
            edges[i as usize] = conjunction;
        }
    }

    if let Some(&first) = edges.first() {
        if edges.iter().all(|&e| e == first) {
            return TreeNode::group(first, groups, Vec::new());
        }
    }

    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, group) in groups.into_iter().enumerate() {
        current.push(group);
        if edges.get(i) == Some(&Conjunction::Or) {
            segments.push(segment(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        segments.push(segment(current));
    }

    if segments.len() == 1 {
        return segments.remove(0);
    }
    TreeNode::group(Conjunction::Or, segments, Vec::new())
}

// ── Helpers ────────────────────────────────────────────────

fn segment(mut members: Vec<TreeNode>) -> TreeNode {
    if members.len() == 1 && members[0].node_type == NodeType::Course {
        return members.remove(0);
    }
    TreeNode::group(Conjunction::And, members, Vec::new())
}

/// `Or` in any case is `Or`; anything else, including absent, is `And`.
fn range_conjunction(range: &Value) -> Conjunction {
    match fields::opt_string(range, "groupConjunction") {
        Some(c) if c.eq_ignore_ascii_case("or") => Conjunction::Or,
        _ => Conjunction::And,
    }
}

fn attribute_notes(value: &Value) -> Vec<String> {
    fields::array(value, "attributes")
        .iter()
        .map(|attribute| fields::string(attribute, "content"))
        .filter(|content| !content.is_empty())
        .collect()
}

/// Items of `item_type`, stably sorted by `position`
fn by_position<'a>(items: &'a [Value], item_type: &str) -> Vec<&'a Value> {
    let mut kept: Vec<&Value> = items
        .iter()
        .filter(|item| fields::string(item, "type") == item_type)
        .collect();
    kept.sort_by_key(|item| fields::integer(item, "position").unwrap_or(0));
    kept
}
