//! Graphs and datasets.

use crate::quad::{Quad, Triple};

/// An RDF dataset: a collection of [quads](Quad).
///
/// Insertion order is preserved but carries no meaning;
/// consumers that need set semantics (such as the canonicalizer)
/// collapse duplicate quads themselves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    quads: Vec<Quad>,
}

impl Dataset {
    /// An empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quad` to this dataset.
    pub fn insert(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    /// Iterate over the quads of this dataset.
    pub fn quads(&self) -> std::slice::Iter<'_, Quad> {
        self.quads.iter()
    }

    /// The number of quads in this dataset, duplicates included.
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Whether this dataset contains no quad.
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

impl FromIterator<Quad> for Dataset {
    fn from_iter<I: IntoIterator<Item = Quad>>(iter: I) -> Self {
        Self {
            quads: iter.into_iter().collect(),
        }
    }
}

impl Extend<Quad> for Dataset {
    fn extend<I: IntoIterator<Item = Quad>>(&mut self, iter: I) {
        self.quads.extend(iter);
    }
}

impl IntoIterator for Dataset {
    type Item = Quad;
    type IntoIter = std::vec::IntoIter<Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Quad;
    type IntoIter = std::slice::Iter<'a, Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.iter()
    }
}

/// An RDF graph: a collection of [triples](Triple).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `triple` to this graph.
    pub fn insert(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    /// Iterate over the triples of this graph.
    pub fn triples(&self) -> std::slice::Iter<'_, Triple> {
        self.triples.iter()
    }

    /// The number of triples in this graph, duplicates included.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether this graph contains no triple.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl From<Graph> for Dataset {
    /// View a graph as a dataset whose quads all live in the default graph.
    fn from(graph: Graph) -> Self {
        graph.triples.into_iter().map(Quad::from).collect()
    }
}
