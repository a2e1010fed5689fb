//! Path queries.
//!
//! A query is a chain of steps evaluated left to right against a current
//! node, starting at a root:
//!
//! | step | meaning |
//! |---|---|
//! | `name` or `~name` | first descendant (BFS) with that name |
//! | `.Prop` | value of property `Prop`; a node value becomes the current node |
//! | `/Type` or `/Type[n]` | `n`-th descendant (BFS, zero-based) of that type |
//!
//! Steps are split at the first `.`, `/` or `~` after the first character,
//! so `~Form/TextBox[1].Text` is `~Form`, `/TextBox[1]`, `.Text`.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use visprobe_core::{NodeRef, ProbeError, PropertyLayer, PropertyValue};

use crate::traverse::descendants;

static INDEX_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(\d+)]$").expect("index suffix regex is valid"));

const DELIMITERS: [char; 3] = ['.', '/', '~'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Name,
    Property,
    ChildType,
}

/// One parsed step; `value` has the leading marker stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    pub kind: StepKind,
    pub value: &'a str,
}

/// What a query resolved to.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Node(NodeRef),
    Value(PropertyValue),
}

/// Splits the next step off `query`, returning it and the unparsed rest.
pub fn next_step(query: &str) -> (Step<'_>, &str) {
    let split = query
        .char_indices()
        .skip(1)
        .find(|(_, c)| DELIMITERS.contains(c))
        .map_or(query.len(), |(i, _)| i);
    let (current, rest) = query.split_at(split);

    let step = if let Some(value) = current.strip_prefix('.') {
        Step { kind: StepKind::Property, value }
    } else if let Some(value) = current.strip_prefix('/') {
        Step { kind: StepKind::ChildType, value }
    } else {
        Step {
            kind: StepKind::Name,
            value: current.strip_prefix('~').unwrap_or(current),
        }
    };
    (step, rest)
}

/// Evaluates `query` against `root`.
pub fn evaluate(
    root: &NodeRef,
    query: &str,
    properties: &dyn PropertyLayer,
) -> Result<QueryOutcome, ProbeError> {
    if query.is_empty() {
        return Err(ProbeError::Resolution("Query did not contain any steps".into()));
    }

    let mut current = Some(root.clone());
    let mut outcome = QueryOutcome::Node(root.clone());
    let mut rest = query;

    while !rest.is_empty() {
        let Some(node) = current.take() else {
            return Err(ProbeError::Resolution(format!(
                "Could not resolve '{rest}' on null element"
            )));
        };
        let (step, remaining) = next_step(rest);
        rest = remaining;
        trace!(kind = ?step.kind, value = step.value, "Evaluating query step");

        outcome = match step.kind {
            StepKind::Name => QueryOutcome::Node(find_by_name(&node, step.value)?),
            StepKind::ChildType => QueryOutcome::Node(find_by_type(&node, step.value)?),
            StepKind::Property => match read_property(&node, step.value, properties)? {
                PropertyValue::Node(child) => QueryOutcome::Node(child),
                value => QueryOutcome::Value(value),
            },
        };
        if let QueryOutcome::Node(node) = &outcome {
            current = Some(node.clone());
        }
    }

    Ok(outcome)
}

/// Evaluates `query` and requires the result to be a node.
pub fn resolve_element(
    root: &NodeRef,
    query: &str,
    properties: &dyn PropertyLayer,
) -> Result<NodeRef, ProbeError> {
    match evaluate(root, query, properties)? {
        QueryOutcome::Node(node) => Ok(node),
        QueryOutcome::Value(value) => Err(ProbeError::Resolution(format!(
            "Query '{query}' resolved to a value of type '{}', not an element",
            value.type_name().unwrap_or_else(|| "null".to_string())
        ))),
    }
}

fn find_by_name(root: &NodeRef, name: &str) -> Result<NodeRef, ProbeError> {
    descendants(root)
        .find(|node| node.name().as_deref() == Some(name))
        .ok_or_else(|| ProbeError::Resolution(format!("Failed to find element named '{name}'")))
}

fn find_by_type(root: &NodeRef, query: &str) -> Result<NodeRef, ProbeError> {
    let (type_name, index) = match INDEX_SUFFIX.captures(query) {
        Some(caps) => {
            let digits = &caps[1];
            let index = digits.parse::<usize>().map_err(|_| {
                ProbeError::Resolution(format!("Invalid child index '{digits}' in '{query}'"))
            })?;
            let start = caps.get(0).map_or(query.len(), |m| m.start());
            (&query[..start], index)
        }
        None => (query, 0),
    };

    descendants(root)
        .filter(|node| node.type_name() == type_name)
        .nth(index)
        .ok_or_else(|| ProbeError::Resolution(format!("Failed to find child of type '{type_name}'")))
}

fn read_property(
    node: &NodeRef,
    name: &str,
    properties: &dyn PropertyLayer,
) -> Result<PropertyValue, ProbeError> {
    properties
        .get_property(node, name, None)
        .map(|read| read.value)
        .map_err(|_| {
            ProbeError::Resolution(format!(
                "Failed to find property '{name}' on element of type '{}'",
                node.type_name()
            ))
        })
}
