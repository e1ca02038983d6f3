//! N-Quads codec for the `rdfc-model` data model.
//!
//! The [decoder](parse) turns an [N-Quads] document into a
//! [`Dataset`](rdfc_model::Dataset) together with the textual label
//! of every blank node encountered;
//! the [encoder](NQuadsSerializer) goes the other way,
//! optionally producing the canonical form
//! (quads sorted in code point order, one per LF-terminated line).
//!
//! [N-Quads]: https://www.w3.org/TR/n-quads/
#![deny(missing_docs)]

mod parser;
mod serializer;

pub use parser::{parse, NQuadsParseError, ParsedNQuads};
pub use serializer::{write_iri, write_literal, NQuadsSerializer, UnlabeledBlankNode};
