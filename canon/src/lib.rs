//! Canonicalization of RDF datasets, following the RDFC-1.0 algorithm
//! described at <https://www.w3.org/TR/rdf-canon/>.
//!
//! The entry points are:
//! + [`canonicalize`] / [`canonicalize_graph`]:
//!   canonical N-Quads text of a dataset or graph;
//! + [`is_isomorphic`] / [`is_isomorphic_graphs`]:
//!   equality up to blank node renaming, by comparing canonical forms;
//! + [`to_canonicalized_dataset`] / [`to_canonicalized_dataset_from_nquads`]
//!   / [`to_nquads`]: the same, keeping the dataset and the issued blank
//!   node identifiers available;
//! + the `_with` variants of the above, taking [`C14nOptions`].
//!
//! Canonicalization is CPU-bound and performs no I/O; the worst case is
//! super-polynomial, so adversarial inputs are rejected early through the
//! [`depth_factor`](C14nOptions::depth_factor) and
//! [`permutation_limit`](C14nOptions::permutation_limit) guards rather than
//! left to run without bound.
#![deny(missing_docs)]

use std::collections::HashMap;

use thiserror::Error;

use rdfc_model::{BlankNode, Dataset, Graph, Quad};
use rdfc_nquads::{parse, NQuadsParseError, NQuadsSerializer, UnlabeledBlankNode};

mod hash;
mod issuer;
mod permutations;
mod relabel;

pub use hash::{HashAlgorithm, HashFunction, Sha256, Sha384};
pub use issuer::IdentifierIssuer;

/// The default value of [`C14nOptions::depth_factor`].
pub const DEFAULT_DEPTH_FACTOR: f32 = 1.0;

/// The default value of [`C14nOptions::permutation_limit`].
pub const DEFAULT_PERMUTATION_LIMIT: usize = 6;

/// The default value of [`C14nOptions::blank_node_prefix`].
pub const DEFAULT_BLANK_NODE_PREFIX: &str = "c14n";

/// Options accepted by the `_with` variants of the canonicalization
/// functions.
#[derive(Clone, Debug)]
pub struct C14nOptions {
    /// The hash algorithm used throughout the algorithm
    /// (RDFC-1.0 mandates SHA-256 by default).
    pub hash_algorithm: HashAlgorithm,
    /// The prefix of issued canonical identifiers.
    pub blank_node_prefix: String,
    /// Maximum recursion depth of N-degree hashing,
    /// as a factor of the number of blank nodes in the dataset.
    /// Exceeding it fails with [`C14nError::ToxicGraph`].
    pub depth_factor: f32,
    /// Maximum number of undistinguishable blank nodes the N-degree
    /// permutation search will accept.
    /// Exceeding it fails with [`C14nError::ToxicGraph`].
    pub permutation_limit: usize,
}

impl Default for C14nOptions {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            blank_node_prefix: DEFAULT_BLANK_NODE_PREFIX.to_string(),
            depth_factor: DEFAULT_DEPTH_FACTOR,
            permutation_limit: DEFAULT_PERMUTATION_LIMIT,
        }
    }
}

/// An error raised while canonicalizing a dataset.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum C14nError {
    /// The N-Quads input could not be parsed.
    #[error(transparent)]
    Parse(#[from] NQuadsParseError),
    /// The dataset requires more work than the configured
    /// [guards](C14nOptions::depth_factor) allow;
    /// see <https://www.w3.org/TR/rdf-canon/#dataset-poisoning>.
    #[error("toxic graph: {0}")]
    ToxicGraph(String),
    /// Two distinct blank nodes were given the same input label.
    #[error("input label {0:?} is assigned to more than one blank node")]
    DuplicateInputLabel(String),
    /// A blank node was given an empty input label.
    #[error("input labels must not be empty")]
    EmptyInputLabel,
    /// A blank node went through the algorithm without receiving a
    /// canonical identifier. This is a bug in the canonicalizer,
    /// not an input error.
    #[error("blank node {0:?} was never issued a canonical identifier (this is a bug)")]
    MissingCanonicalLabel(String),
    /// A blank node is missing from the identifier map handed to the
    /// canonical serializer. This is a bug in the canonicalizer,
    /// not an input error.
    #[error(transparent)]
    Unlabeled(#[from] UnlabeledBlankNode),
}

/// A dataset together with the canonical identifier issued to each of its
/// blank nodes, as returned by [`to_canonicalized_dataset`].
///
/// The canonical N-Quads text is obtained with [`to_nquads`].
#[derive(Clone, Debug)]
pub struct CanonicalizedDataset {
    input_dataset: Dataset,
    issued_identifiers: HashMap<BlankNode, String>,
}

impl CanonicalizedDataset {
    /// The dataset that was canonicalized.
    pub fn input_dataset(&self) -> &Dataset {
        &self.input_dataset
    }

    /// The canonical identifier issued to each blank node of the dataset.
    pub fn issued_identifiers(&self) -> &HashMap<BlankNode, String> {
        &self.issued_identifiers
    }
}

/// Return the canonical N-Quads representation of `dataset`,
/// with the default [`C14nOptions`].
pub fn canonicalize(dataset: &Dataset) -> Result<String, C14nError> {
    canonicalize_with(dataset, &C14nOptions::default())
}

/// Return the canonical N-Quads representation of `dataset`:
/// blank nodes are relabeled with canonical identifiers,
/// quads are sorted in code point order, duplicates are collapsed.
pub fn canonicalize_with(dataset: &Dataset, options: &C14nOptions) -> Result<String, C14nError> {
    let issued = issued_identifiers(dataset, None, options)?;
    serialize_canonical(dataset, &issued)
}

/// Return the canonical N-Quads representation of `graph`,
/// with the default [`C14nOptions`].
pub fn canonicalize_graph(graph: &Graph) -> Result<String, C14nError> {
    canonicalize_graph_with(graph, &C14nOptions::default())
}

/// Return the canonical N-Quads representation of `graph`,
/// viewed as a dataset whose triples all live in the default graph.
pub fn canonicalize_graph_with(graph: &Graph, options: &C14nOptions) -> Result<String, C14nError> {
    let dataset: Dataset = graph.triples().cloned().map(Quad::from).collect();
    canonicalize_with(&dataset, options)
}

/// Whether two datasets are isomorphic,
/// i.e. equal up to blank node renaming.
pub fn is_isomorphic(a: &Dataset, b: &Dataset) -> Result<bool, C14nError> {
    is_isomorphic_with(a, b, &C14nOptions::default())
}

/// Whether two datasets are isomorphic,
/// by comparing their canonical N-Quads representations.
pub fn is_isomorphic_with(
    a: &Dataset,
    b: &Dataset,
    options: &C14nOptions,
) -> Result<bool, C14nError> {
    Ok(canonicalize_with(a, options)? == canonicalize_with(b, options)?)
}

/// Whether two graphs are isomorphic,
/// i.e. equal up to blank node renaming.
pub fn is_isomorphic_graphs(a: &Graph, b: &Graph) -> Result<bool, C14nError> {
    is_isomorphic_graphs_with(a, b, &C14nOptions::default())
}

/// Whether two graphs are isomorphic,
/// by comparing their canonical N-Quads representations.
pub fn is_isomorphic_graphs_with(
    a: &Graph,
    b: &Graph,
    options: &C14nOptions,
) -> Result<bool, C14nError> {
    Ok(canonicalize_graph_with(a, options)? == canonicalize_graph_with(b, options)?)
}

/// Canonicalize `dataset` with the default [`C14nOptions`],
/// keeping the dataset and the issued identifiers available.
pub fn to_canonicalized_dataset(dataset: Dataset) -> Result<CanonicalizedDataset, C14nError> {
    to_canonicalized_dataset_with(dataset, None, &C14nOptions::default())
}

/// Canonicalize `dataset`,
/// keeping the dataset and the issued identifiers available.
///
/// `input_labels` optionally supplies the input identifier of blank nodes;
/// it does not influence the result beyond diagnostics, as canonical
/// identifiers only depend on the structure of the dataset.
pub fn to_canonicalized_dataset_with(
    dataset: Dataset,
    input_labels: Option<&HashMap<BlankNode, String>>,
    options: &C14nOptions,
) -> Result<CanonicalizedDataset, C14nError> {
    let issued = issued_identifiers(&dataset, input_labels, options)?;
    Ok(CanonicalizedDataset {
        input_dataset: dataset,
        issued_identifiers: issued,
    })
}

/// Parse `nquads` and canonicalize the resulting dataset,
/// with the default [`C14nOptions`].
pub fn to_canonicalized_dataset_from_nquads(
    nquads: &str,
) -> Result<CanonicalizedDataset, C14nError> {
    to_canonicalized_dataset_from_nquads_with(nquads, &C14nOptions::default())
}

/// Parse `nquads` and canonicalize the resulting dataset.
/// The blank node labels found in the source become the input identifiers.
pub fn to_canonicalized_dataset_from_nquads_with(
    nquads: &str,
    options: &C14nOptions,
) -> Result<CanonicalizedDataset, C14nError> {
    let parsed = parse(nquads)?;
    to_canonicalized_dataset_with(parsed.dataset, Some(&parsed.blank_node_labels), options)
}

/// Return the canonical N-Quads representation of a canonicalized dataset.
pub fn to_nquads(canonicalized: &CanonicalizedDataset) -> Result<String, C14nError> {
    serialize_canonical(
        &canonicalized.input_dataset,
        &canonicalized.issued_identifiers,
    )
}

fn serialize_canonical(
    dataset: &Dataset,
    issued: &HashMap<BlankNode, String>,
) -> Result<String, C14nError> {
    Ok(NQuadsSerializer::new()
        .labels(issued)
        .generate_new_blank_node_labels(false)
        .canonical(true)
        .serialize(dataset)?)
}

fn issued_identifiers(
    dataset: &Dataset,
    input_labels: Option<&HashMap<BlankNode, String>>,
    options: &C14nOptions,
) -> Result<HashMap<BlankNode, String>, C14nError> {
    match options.hash_algorithm {
        HashAlgorithm::Sha256 => relabel::relabel_with::<Sha256>(dataset, input_labels, options),
        HashAlgorithm::Sha384 => relabel::relabel_with::<Sha384>(dataset, input_labels, options),
    }
}

#[cfg(test)]
pub(crate) fn test_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}
