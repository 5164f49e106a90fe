//! JSON query DSL.
//!
//! A query arrives as a nested description and is turned into a cursor
//! tree bottom-up. Leaf terms go through a caller-supplied `make_term`, so
//! the same DSL works against any index that can produce term cursors:
//!
//! ```rust
//! use sift_index::dsl;
//! use sift_query::prelude::*;
//!
//! let spec = dsl::query_from_json(r#"{
//!   "type": "OR",
//!   "queries": [
//!     {"field": "name", "value": "sofia"},
//!     {"field": "name", "value": "amsterdam"}
//!   ]
//! }"#)?;
//!
//! let sofia = vec![1, 3];
//! let amsterdam = vec![2, 3];
//! let mut q = dsl::parse(&spec, &mut |_field, value| {
//!     let postings = if value == "sofia" { sofia.clone() } else { amsterdam.clone() };
//!     Ok(Box::new(Term::from_owned(10, value, postings)) as Box<dyn Query>)
//! })?;
//! assert_eq!(q.next_doc()?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{IndexError, IndexResult};
use serde::{Deserialize, Serialize};
use sift_query::prelude::*;

/// Query node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryKind {
    #[default]
    Term,
    And,
    Or,
    Dismax,
}

/// One node of the serialized query tree.
///
/// Terms carry `field`/`value`; compositors carry `queries` and, for AND
/// only, an optional `not` branch. A `boost` above zero is applied to the
/// built query; `tiebreaker` only matters for DISMAX.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySpec {
    #[serde(rename = "type")]
    pub kind: QueryKind,
    pub queries: Vec<QuerySpec>,
    pub not: Option<Box<QuerySpec>>,
    pub field: String,
    pub value: String,
    pub boost: f32,
    pub tiebreaker: f32,
}

/// Deserialize a query description from a JSON string.
pub fn query_from_json(input: &str) -> IndexResult<QuerySpec> {
    Ok(serde_json::from_str(input)?)
}

/// Deserialize a query description from an already-parsed JSON value, for
/// callers that receive the query embedded in a larger request.
pub fn query_from_value(input: serde_json::Value) -> IndexResult<QuerySpec> {
    Ok(serde_json::from_value(input)?)
}

/// Build a cursor tree from `spec`, creating leaves through `make_term`.
///
/// Single-child AND/OR/DISMAX collapse to the child. Structural
/// violations (a term with children, an OR or DISMAX with a `not` branch,
/// a term without a field) are [`IndexError::InvalidQuery`].
pub fn parse<'a, F>(spec: &QuerySpec, make_term: &mut F) -> IndexResult<Box<dyn Query + 'a>>
where
    F: FnMut(&str, &str) -> IndexResult<Box<dyn Query + 'a>>,
{
    match spec.kind {
        QueryKind::Term => {
            if spec.not.is_some() || !spec.queries.is_empty() {
                return Err(IndexError::InvalidQuery(format!(
                    "term queries can have only field and value: {:?}",
                    spec
                )));
            }
            if spec.field.is_empty() {
                return Err(IndexError::InvalidQuery(format!("missing field: {:?}", spec)));
            }
            Ok(boosted(make_term(&spec.field, &spec.value)?, spec.boost))
        }
        QueryKind::And => {
            let mut children = parse_children(spec, make_term)?;
            let query: Box<dyn Query + 'a> = match &spec.not {
                Some(not) => {
                    let not = parse(not, make_term)?;
                    Box::new(And::new(children).exclude(not))
                }
                None if children.len() == 1 => children.remove(0),
                None => Box::new(And::new(children)),
            };
            Ok(boosted(query, spec.boost))
        }
        QueryKind::Or => {
            if spec.not.is_some() {
                return Err(IndexError::InvalidQuery(format!(
                    "OR queries cannot have a not branch: {:?}",
                    spec
                )));
            }
            let mut children = parse_children(spec, make_term)?;
            let query: Box<dyn Query + 'a> = if children.len() == 1 {
                children.remove(0)
            } else {
                Box::new(Or::new(children))
            };
            Ok(boosted(query, spec.boost))
        }
        QueryKind::Dismax => {
            if spec.not.is_some() {
                return Err(IndexError::InvalidQuery(format!(
                    "DISMAX queries cannot have a not branch: {:?}",
                    spec
                )));
            }
            let mut children = parse_children(spec, make_term)?;
            let query: Box<dyn Query + 'a> = if children.len() == 1 {
                children.remove(0)
            } else {
                Box::new(DisMax::new(spec.tiebreaker, children))
            };
            Ok(boosted(query, spec.boost))
        }
    }
}

fn parse_children<'a, F>(
    spec: &QuerySpec,
    make_term: &mut F,
) -> IndexResult<Vec<Box<dyn Query + 'a>>>
where
    F: FnMut(&str, &str) -> IndexResult<Box<dyn Query + 'a>>,
{
    spec.queries.iter().map(|q| parse(q, make_term)).collect()
}

fn boosted<'a>(mut query: Box<dyn Query + 'a>, boost: f32) -> Box<dyn Query + 'a> {
    if boost > 0.0 {
        query.set_boost(boost);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_term<'a>(_field: &str, _value: &str) -> IndexResult<Box<dyn Query + 'a>> {
        Ok(Box::new(Term::from_owned(10, "t", vec![1, 2, 3])))
    }

    #[test]
    fn test_term_requires_a_field() {
        let spec = QuerySpec {
            kind: QueryKind::Term,
            value: "x".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            parse(&spec, &mut make_term),
            Err(IndexError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_term_rejects_children() {
        let spec = QuerySpec {
            kind: QueryKind::Term,
            field: "f".to_string(),
            queries: vec![QuerySpec::default()],
            ..Default::default()
        };
        assert!(parse(&spec, &mut make_term).is_err());
    }

    #[test]
    fn test_or_rejects_not_branch() {
        let spec = QuerySpec {
            kind: QueryKind::Or,
            not: Some(Box::new(QuerySpec {
                kind: QueryKind::Term,
                field: "f".to_string(),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert!(parse(&spec, &mut make_term).is_err());
    }

    #[test]
    fn test_unknown_type_fails_at_deserialization() {
        assert!(query_from_json(r#"{"type": "PHRASE"}"#).is_err());
    }

    #[test]
    fn test_default_type_is_term() {
        let spec = query_from_json(r#"{"field": "name", "value": "sofia"}"#).unwrap();
        assert_eq!(spec.kind, QueryKind::Term);
    }

    #[test]
    fn test_boost_is_applied() {
        let spec = query_from_json(
            r#"{"type": "OR", "boost": 2.0, "queries": [
                {"field": "a", "value": "x"},
                {"field": "b", "value": "y"}
            ]}"#,
        )
        .unwrap();
        let mut q = parse(&spec, &mut make_term).unwrap();
        q.next_doc().unwrap();
        // two identical children, each idf(10, 3), doubled by the boost
        let expected = 2.0 * 2.0 * sift_query::idf(10, 3);
        assert!((q.score() - expected).abs() < 1e-5);
    }
}
