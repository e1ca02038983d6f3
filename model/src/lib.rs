//! Concrete RDF 1.1 data model used by the `rdfc` crates:
//! [terms](Term), [quads](Quad), [graphs](Graph) and [datasets](Dataset).
//!
//! Blank nodes are identified *by reference*, not by label:
//! a [`BlankNode`] is an opaque handle minted from a process-wide counter,
//! and two blank nodes are equal iff they are the same node.
//! Textual labels only exist at the codec boundary
//! (see the `rdfc-nquads` crate).
#![deny(missing_docs)]

mod dataset;
mod quad;
mod term;

pub use dataset::{Dataset, Graph};
pub use quad::{Quad, Triple};
pub use term::{BlankNode, Iri, Literal, Term, RDF_LANG_STRING, XSD_STRING};
