//! Serializer for the [N-Quads] concrete syntax,
//! including the RDF 1.1 canonical form.
//!
//! [N-Quads]: https://www.w3.org/TR/n-quads/

use std::collections::{HashMap, HashSet};

use rdfc_model::{BlankNode, Dataset, Iri, Literal, Quad, Term, XSD_STRING};
use thiserror::Error;

/// Raised by [`NQuadsSerializer::serialize`] when a blank node has no entry
/// in the label map and label generation is disabled.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("blank node {0:?} has no label and label generation is disabled")]
pub struct UnlabeledBlankNode(
    /// The offending blank node.
    pub BlankNode,
);

/// Append `iri` to `out` in N-Quads syntax.
pub fn write_iri(out: &mut String, iri: &Iri) {
    out.push('<');
    out.push_str(iri.as_str());
    out.push('>');
}

/// Append `literal` to `out` in canonical N-Quads syntax.
///
/// Only `\`, `"`, LF and CR are escaped, as the canonical form prescribes;
/// the datatype is omitted for `xsd:string`.
pub fn write_literal(out: &mut String, literal: &Literal) {
    out.push('"');
    for c in literal.lexical_form().chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    if let Some(tag) = literal.language_tag() {
        out.push('@');
        out.push_str(tag);
    } else if literal.datatype().as_str() != XSD_STRING {
        out.push_str("^^");
        write_iri(out, literal.datatype());
    }
}

/// Serializer turning a [`Dataset`] into an N-Quads document.
///
/// Blank node labels are looked up in the map given to [`labels`](Self::labels);
/// nodes absent from the map get a fresh `b<n>` label,
/// unless generation is disabled, in which case they are an error.
/// In [`canonical`](Self::canonical) mode the output lines are
/// sorted in code point order and duplicate quads are collapsed.
#[derive(Clone, Copy, Debug)]
pub struct NQuadsSerializer<'a> {
    labels: Option<&'a HashMap<BlankNode, String>>,
    generate_labels: bool,
    canonical: bool,
}

impl Default for NQuadsSerializer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> NQuadsSerializer<'a> {
    /// A serializer with no label map, generating a label for every blank node.
    pub fn new() -> Self {
        Self {
            labels: None,
            generate_labels: true,
            canonical: false,
        }
    }

    /// Use `labels` for blank nodes.
    pub fn labels(mut self, labels: &'a HashMap<BlankNode, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Choose whether blank nodes absent from the label map
    /// get a generated label (the default) or are an error.
    pub fn generate_new_blank_node_labels(mut self, generate: bool) -> Self {
        self.generate_labels = generate;
        self
    }

    /// Choose whether to emit the canonical form:
    /// lines sorted in code point order, duplicates collapsed.
    pub fn canonical(mut self, canonical: bool) -> Self {
        self.canonical = canonical;
        self
    }

    /// Serialize `dataset` to an N-Quads document.
    pub fn serialize(&self, dataset: &Dataset) -> Result<String, UnlabeledBlankNode> {
        let used: HashSet<&str> = self
            .labels
            .iter()
            .flat_map(|m| m.values())
            .map(String::as_str)
            .collect();
        let mut generator = LabelGenerator {
            generated: HashMap::new(),
            used,
            counter: 0,
        };
        let mut lines: Vec<String> = Vec::with_capacity(dataset.len());
        for quad in dataset.quads() {
            lines.push(self.quad_line(quad, &mut generator)?);
        }
        if self.canonical {
            lines.sort_unstable();
            lines.dedup();
        }
        Ok(lines.concat())
    }

    fn quad_line(
        &self,
        quad: &Quad,
        generator: &mut LabelGenerator<'a>,
    ) -> Result<String, UnlabeledBlankNode> {
        let mut line = String::new();
        self.write_term(&mut line, &quad.subject, generator)?;
        line.push(' ');
        write_iri(&mut line, &quad.predicate);
        line.push(' ');
        self.write_term(&mut line, &quad.object, generator)?;
        line.push(' ');
        if let Some(graph_name) = &quad.graph_name {
            self.write_term(&mut line, graph_name, generator)?;
            line.push(' ');
        }
        line.push_str(".\n");
        Ok(line)
    }

    fn write_term(
        &self,
        out: &mut String,
        term: &Term,
        generator: &mut LabelGenerator<'a>,
    ) -> Result<(), UnlabeledBlankNode> {
        match term {
            Term::Iri(iri) => write_iri(out, iri),
            Term::Literal(literal) => write_literal(out, literal),
            Term::BlankNode(node) => {
                out.push_str("_:");
                if let Some(label) = self.labels.and_then(|m| m.get(node)) {
                    out.push_str(label);
                } else if self.generate_labels {
                    out.push_str(generator.label_for(*node));
                } else {
                    return Err(UnlabeledBlankNode(*node));
                }
            }
        }
        Ok(())
    }
}

struct LabelGenerator<'a> {
    generated: HashMap<BlankNode, String>,
    used: HashSet<&'a str>,
    counter: usize,
}

impl LabelGenerator<'_> {
    fn label_for(&mut self, node: BlankNode) -> &str {
        if !self.generated.contains_key(&node) {
            let label = loop {
                let candidate = format!("b{}", self.counter);
                self.counter += 1;
                if !self.used.contains(candidate.as_str()) {
                    break candidate;
                }
            };
            self.generated.insert(node, label);
        }
        &self.generated[&node]
    }
}
