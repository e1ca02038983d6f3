//! Triples and quads.

use crate::term::{BlankNode, Iri, Term};

/// A subject-predicate-object triple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    /// The subject (an IRI or a blank node)
    pub subject: Term,
    /// The predicate
    pub predicate: Iri,
    /// The object
    pub object: Term,
}

impl Triple {
    /// Build a triple.
    pub fn new(subject: impl Into<Term>, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }
}

/// A quad: a triple plus an optional graph name.
///
/// A quad with no graph name belongs to the default graph.
/// The predicate is an [`Iri`] by construction;
/// the graph name, when present, is an IRI or a blank node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    /// The subject (an IRI or a blank node)
    pub subject: Term,
    /// The predicate
    pub predicate: Iri,
    /// The object
    pub object: Term,
    /// The graph name; `None` denotes the default graph
    pub graph_name: Option<Term>,
}

impl Quad {
    /// Build a quad in the default graph.
    pub fn new(subject: impl Into<Term>, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
            graph_name: None,
        }
    }

    /// Build a quad in the graph named by `graph_name`.
    pub fn new_in_graph(
        subject: impl Into<Term>,
        predicate: Iri,
        object: impl Into<Term>,
        graph_name: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
            graph_name: Some(graph_name.into()),
        }
    }

    /// All blank nodes occurring in this quad,
    /// in subject, object or graph-name position,
    /// one item per occurrence.
    ///
    /// The predicate is never a blank node.
    pub fn blank_nodes(&self) -> impl Iterator<Item = BlankNode> + '_ {
        [Some(&self.subject), Some(&self.object), self.graph_name.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(Term::blank_node)
    }
}

impl From<Triple> for Quad {
    fn from(triple: Triple) -> Self {
        Self {
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
            graph_name: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_nodes_covers_subject_object_and_graph() {
        let (b1, b2, b3) = (BlankNode::new(), BlankNode::new(), BlankNode::new());
        let quad = Quad::new_in_graph(b1, Iri::new("tag:p"), b2, b3);
        let found: Vec<_> = quad.blank_nodes().collect();
        assert_eq!(found, vec![b1, b2, b3]);
    }

    #[test]
    fn blank_nodes_yields_one_item_per_occurrence() {
        let b = BlankNode::new();
        let quad = Quad::new(b, Iri::new("tag:p"), b);
        assert_eq!(quad.blank_nodes().count(), 2);
    }

    #[test]
    fn default_graph_quad_has_no_graph_blank_node() {
        let quad = Quad::new(
            Iri::new("tag:s"),
            Iri::new("tag:p"),
            BlankNode::new(),
        );
        assert_eq!(quad.blank_nodes().count(), 1);
    }
}
