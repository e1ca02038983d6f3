//! RDF terms: IRIs, literals and blank nodes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The datatype IRI of simple literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// The datatype IRI of language-tagged literals.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// An IRI reference.
///
/// This type does not validate its content;
/// producers (parsers, vocabularies) are expected to provide valid IRIs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(Box<str>);

impl Iri {
    /// Wrap `iri` without checking it.
    pub fn new(iri: impl Into<Box<str>>) -> Self {
        Self(iri.into())
    }

    /// The underlying text of this IRI.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

static NEXT_BLANK_NODE: AtomicU64 = AtomicU64::new(0);

/// A blank node, identified by reference.
///
/// Every call to [`BlankNode::new`] mints a fresh identity;
/// copies of the handle all denote the same node.
/// The textual label a blank node had in some concrete syntax is *not*
/// part of its identity and is kept in side maps by the codecs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlankNode(u64);

impl BlankNode {
    /// Mint a new blank node, distinct from every other one in this process.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(NEXT_BLANK_NODE.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:#{}", self.0)
    }
}

/// An RDF literal: a lexical form, a datatype IRI,
/// and for language-tagged strings a language tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    lexical_form: Box<str>,
    datatype: Iri,
    language: Option<Box<str>>,
}

impl Literal {
    /// A simple literal, i.e. one with datatype `xsd:string`.
    pub fn simple(lexical_form: impl Into<Box<str>>) -> Self {
        Self {
            lexical_form: lexical_form.into(),
            datatype: Iri::new(XSD_STRING),
            language: None,
        }
    }

    /// A typed literal.
    pub fn typed(lexical_form: impl Into<Box<str>>, datatype: Iri) -> Self {
        Self {
            lexical_form: lexical_form.into(),
            datatype,
            language: None,
        }
    }

    /// A language-tagged string; its datatype is always `rdf:langString`.
    pub fn language_tagged(lexical_form: impl Into<Box<str>>, tag: impl Into<Box<str>>) -> Self {
        Self {
            lexical_form: lexical_form.into(),
            datatype: Iri::new(RDF_LANG_STRING),
            language: Some(tag.into()),
        }
    }

    /// The lexical form of this literal.
    pub fn lexical_form(&self) -> &str {
        &self.lexical_form
    }

    /// The datatype IRI of this literal.
    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    /// The language tag, if this literal is a language-tagged string.
    pub fn language_tag(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// An RDF term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// An IRI reference
    Iri(Iri),
    /// A literal
    Literal(Literal),
    /// A blank node
    BlankNode(BlankNode),
}

impl Term {
    /// The blank node inside this term, if it is one.
    pub fn blank_node(&self) -> Option<BlankNode> {
        match self {
            Term::BlankNode(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this term is a blank node.
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_nodes_are_identified_by_reference() {
        let b1 = BlankNode::new();
        let b2 = BlankNode::new();
        assert_ne!(b1, b2);
        let b3 = b1;
        assert_eq!(b1, b3);
    }

    #[test]
    fn simple_literal_has_xsd_string_datatype() {
        let lit = Literal::simple("hello");
        assert_eq!(lit.datatype().as_str(), XSD_STRING);
        assert_eq!(lit.language_tag(), None);
        // a typed literal with xsd:string is the same literal
        assert_eq!(lit, Literal::typed("hello", Iri::new(XSD_STRING)));
    }

    #[test]
    fn language_tagged_literal_has_lang_string_datatype() {
        let lit = Literal::language_tagged("chat", "fr");
        assert_eq!(lit.datatype().as_str(), RDF_LANG_STRING);
        assert_eq!(lit.language_tag(), Some("fr"));
    }
}
