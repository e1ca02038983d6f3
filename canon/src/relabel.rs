//! Deterministic relabeling of blank nodes,
//! implementing the RDFC-1.0 algorithm described at
//! <https://www.w3.org/TR/rdf-canon/>.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::marker::PhantomData;
use std::rc::Rc;

use log::trace;
use rdfc_model::{BlankNode, Dataset, Quad, Term};
use rdfc_nquads::{write_iri, write_literal};

use crate::hash::HashFunction;
use crate::issuer::IdentifierIssuer;
use crate::permutations::for_each_permutation_of;
use crate::{C14nError, C14nOptions};

/// The prefix of the temporary identifiers used inside N-degree hashing.
const TEMPORARY_PREFIX: &str = "b";

/// Compute the canonical identifier of every blank node in `dataset`.
///
/// `input_labels` supplies the input identifier of blank nodes that have one
/// (typically the labels found by the N-Quads decoder); the other blank nodes
/// get a generated input identifier. Input identifiers only serve as internal
/// keys: the result is keyed by blank node handle.
///
/// Implements <https://www.w3.org/TR/rdf-canon/#canon-algorithm>.
pub(crate) fn relabel_with<H: HashFunction>(
    dataset: &Dataset,
    input_labels: Option<&HashMap<BlankNode, String>>,
    options: &C14nOptions,
) -> Result<HashMap<BlankNode, String>, C14nError> {
    // Step 1: set semantics
    let mut distinct = HashSet::new();
    let quads: Vec<&Quad> = dataset.quads().filter(|q| distinct.insert(*q)).collect();

    let mut state = C14nState::<H>::new(options);
    state.label_of = input_label_map(&quads, input_labels)?;

    // Step 2: blank node to quads index, one entry per occurrence
    for quad in &quads {
        for node in quad.blank_nodes() {
            let label = Rc::clone(&state.label_of[&node]);
            state.b2q.entry(label).or_default().push(*quad);
        }
    }

    // Step 3: first-degree hashes, bucketed
    let mut hashes = Vec::with_capacity(state.b2q.len());
    for label in state.b2q.keys() {
        hashes.push((Rc::clone(label), state.hash_first_degree(label)));
    }
    for (label, hash) in hashes {
        state.h2b.entry(hash.clone()).or_default().push(Rc::clone(&label));
        state.b2h.insert(label, hash);
    }

    // Step 4: issue canonical identifiers for unique hashes, in hash order
    let mut next_h2b = BTreeMap::new();
    for (hash, labels) in std::mem::take(&mut state.h2b) {
        debug_assert!(!labels.is_empty());
        if labels.len() > 1 {
            next_h2b.insert(hash, labels);
        } else {
            state.canonical.issue(&labels[0]);
        }
    }
    state.h2b = next_h2b;

    // Step 5: break ties with N-degree hashes, still in hash order
    for identifier_list in state.h2b.values() {
        let mut hash_path_list = Vec::new();
        for identifier in identifier_list {
            if state.canonical.has(identifier) {
                continue;
            }
            let mut issuer = IdentifierIssuer::new(TEMPORARY_PREFIX);
            issuer.issue(identifier);
            hash_path_list.push(state.hash_n_degree(identifier, &issuer, 0)?);
        }
        hash_path_list.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        for (_, issuer) in hash_path_list {
            for (input_label, _) in issuer.entries_in_issue_order() {
                state.canonical.issue(input_label);
            }
        }
    }

    // Step 6: compose handle -> input label -> canonical identifier
    let mut issued = HashMap::with_capacity(state.label_of.len());
    for (node, label) in &state.label_of {
        let Some(id) = state.canonical.get(label) else {
            return Err(C14nError::MissingCanonicalLabel(label.to_string()));
        };
        issued.insert(*node, id.to_string());
    }
    Ok(issued)
}

/// Assign an input identifier to every blank node occurring in `quads`:
/// the caller-supplied one when present, a generated `n<k>` otherwise.
fn input_label_map(
    quads: &[&Quad],
    input_labels: Option<&HashMap<BlankNode, String>>,
) -> Result<HashMap<BlankNode, Rc<str>>, C14nError> {
    let reserved: HashSet<&str> = input_labels
        .iter()
        .flat_map(|m| m.values())
        .map(String::as_str)
        .collect();
    let mut assigned: HashSet<Rc<str>> = HashSet::new();
    let mut label_of: HashMap<BlankNode, Rc<str>> = HashMap::new();
    let mut counter = 0;
    for quad in quads {
        for node in quad.blank_nodes() {
            if label_of.contains_key(&node) {
                continue;
            }
            let label: Rc<str> = match input_labels.and_then(|m| m.get(&node)) {
                Some(label) if label.is_empty() => return Err(C14nError::EmptyInputLabel),
                Some(label) => Rc::from(label.as_str()),
                None => loop {
                    let candidate = format!("n{counter}");
                    counter += 1;
                    if !reserved.contains(candidate.as_str()) {
                        break Rc::from(candidate);
                    }
                },
            };
            if !assigned.insert(Rc::clone(&label)) {
                return Err(C14nError::DuplicateInputLabel(label.to_string()));
            }
            label_of.insert(node, label);
        }
    }
    Ok(label_of)
}

/// The per-invocation state of the algorithm.
struct C14nState<'a, H: HashFunction> {
    /// input identifier of each blank node handle
    label_of: HashMap<BlankNode, Rc<str>>,
    /// blank node to quads index, over subject, object and graph positions
    b2q: BTreeMap<Rc<str>, Vec<&'a Quad>>,
    /// first-degree hash to blank nodes
    h2b: BTreeMap<String, Vec<Rc<str>>>,
    /// memoized first-degree hash of each blank node
    b2h: BTreeMap<Rc<str>, String>,
    canonical: IdentifierIssuer,
    depth_factor: f32,
    permutation_limit: usize,
    _hash: PhantomData<H>,
}

impl<'a, H: HashFunction> C14nState<'a, H> {
    fn new(options: &C14nOptions) -> Self {
        Self {
            label_of: HashMap::new(),
            b2q: BTreeMap::new(),
            h2b: BTreeMap::new(),
            b2h: BTreeMap::new(),
            canonical: IdentifierIssuer::new(&options.blank_node_prefix),
            depth_factor: options.depth_factor,
            permutation_limit: options.permutation_limit,
            _hash: PhantomData,
        }
    }

    /// The canonical N-Quads line for `quad`, with the reference blank node
    /// rendered as `_:a` and every other blank node as `_:z`.
    fn nq_for_hash(&self, quad: &Quad, reference: &str) -> String {
        let mut line = String::new();
        self.term_for_hash(&mut line, &quad.subject, reference);
        write_iri(&mut line, &quad.predicate);
        line.push(' ');
        self.term_for_hash(&mut line, &quad.object, reference);
        if let Some(graph_name) = &quad.graph_name {
            self.term_for_hash(&mut line, graph_name, reference);
        }
        line.push_str(".\n");
        line
    }

    fn term_for_hash(&self, out: &mut String, term: &Term, reference: &str) {
        match term {
            Term::Iri(iri) => {
                write_iri(out, iri);
                out.push(' ');
            }
            Term::Literal(literal) => {
                write_literal(out, literal);
                out.push(' ');
            }
            Term::BlankNode(node) => {
                out.push_str(if self.label_of[node].as_ref() == reference {
                    "_:a "
                } else {
                    "_:z "
                });
            }
        }
    }

    /// Implements <https://www.w3.org/TR/rdf-canon/#hash-1d-quads>.
    fn hash_first_degree(&self, reference: &str) -> String {
        let mut nquads: Vec<String> = self.b2q[reference]
            .iter()
            .map(|quad| self.nq_for_hash(quad, reference))
            .collect();
        nquads.sort_unstable();
        let mut hasher = H::initialize();
        for line in &nquads {
            hasher.update(line);
        }
        let hash = hasher.finalize();
        trace!("hash-first-degree({reference}) -> {hash}");
        hash
    }

    /// Implements <https://www.w3.org/TR/rdf-canon/#hash-related-blank-node>.
    fn hash_related(
        &self,
        related: &str,
        quad: &Quad,
        issuer: &IdentifierIssuer,
        position: &str,
    ) -> String {
        let mut input = H::initialize();
        input.update(position);
        if position != "g" {
            input.update("<");
            input.update(quad.predicate.as_str());
            input.update(">");
        }
        if let Some(id) = self.canonical.get(related) {
            input.update("_:");
            input.update(id);
        } else if let Some(id) = issuer.get(related) {
            input.update("_:");
            input.update(id);
        } else {
            input.update(&self.b2h[related]);
        }
        input.finalize()
    }

    /// Implements <https://www.w3.org/TR/rdf-canon/#hash-nd-quads>.
    ///
    /// Returns the N-degree hash of `identifier` together with the issuer
    /// holding the temporary identifiers of the winning exploration path.
    fn hash_n_degree(
        &self,
        identifier: &str,
        issuer: &IdentifierIssuer,
        depth: usize,
    ) -> Result<(String, IdentifierIssuer), C14nError> {
        if depth as f32 > self.depth_factor * self.b2q.len() as f32 {
            return Err(C14nError::ToxicGraph(format!(
                "too many recursions (limit is {} per blank node)",
                self.depth_factor,
            )));
        }
        // Group the related blank nodes by the hash of their relation,
        // one entry per (quad, position) occurrence.
        let mut hn: BTreeMap<String, Vec<Rc<str>>> = BTreeMap::new();
        for quad in &self.b2q[identifier] {
            for (term, position) in [(&quad.subject, "s"), (&quad.object, "o")]
                .into_iter()
                .chain(quad.graph_name.as_ref().map(|g| (g, "g")))
            {
                if let Term::BlankNode(node) = term {
                    let related = &self.label_of[node];
                    if related.as_ref() == identifier {
                        continue;
                    }
                    let hash = self.hash_related(related, quad, issuer, position);
                    hn.entry(hash).or_default().push(Rc::clone(related));
                }
            }
        }
        let mut data_to_hash = H::initialize();
        let mut ret_issuer: Option<IdentifierIssuer> = None;
        // Process the groups in hash order, committing for each the issuer
        // of the lexicographically smallest exploration path.
        for (related_hash, mut group) in hn {
            data_to_hash.update(&related_hash);
            if group.len() > self.permutation_limit {
                return Err(C14nError::ToxicGraph(format!(
                    "{} undistinguishable blank nodes, permutation limit is {}",
                    group.len(),
                    self.permutation_limit,
                )));
            }
            let mut chosen_path = String::new();
            let mut chosen_issuer: Option<IdentifierIssuer> = None;
            for_each_permutation_of(&mut group, |permutation| -> Result<(), C14nError> {
                let mut issuer_copy = ret_issuer.as_ref().unwrap_or(issuer).clone();
                let mut path = String::new();
                let mut recursion_list: Vec<Rc<str>> = Vec::new();
                for related in permutation {
                    if let Some(id) = self.canonical.get(related) {
                        path.push_str("_:");
                        path.push_str(id);
                    } else {
                        let (id, new) = issuer_copy.issue(related);
                        if new {
                            recursion_list.push(Rc::clone(related));
                        }
                        path.push_str("_:");
                        path.push_str(&id);
                    }
                    if abandons(&chosen_path, &path) {
                        return Ok(());
                    }
                }
                for related in recursion_list {
                    let (sub_hash, sub_issuer) =
                        self.hash_n_degree(&related, &issuer_copy, depth + 1)?;
                    let (id, _) = issuer_copy.issue(&related);
                    path.push_str("_:");
                    path.push_str(&id);
                    path.push('<');
                    path.push_str(&sub_hash);
                    path.push('>');
                    issuer_copy = sub_issuer;
                    if abandons(&chosen_path, &path) {
                        return Ok(());
                    }
                }
                if chosen_path.is_empty() || path < chosen_path {
                    chosen_path = path;
                    chosen_issuer = Some(issuer_copy);
                }
                Ok(())
            })?;
            data_to_hash.update(&chosen_path);
            ret_issuer = chosen_issuer;
        }
        let hash = data_to_hash.finalize();
        trace!("hash-n-degree({identifier}, depth {depth}) -> {hash}");
        Ok((hash, ret_issuer.unwrap_or_else(|| issuer.clone())))
    }
}

/// Whether the exploration of a permutation whose path so far is `path`
/// can be abandoned: no extension of it can beat `chosen_path`.
fn abandons(chosen_path: &str, path: &str) -> bool {
    !chosen_path.is_empty() && path.len() >= chosen_path.len() && path > chosen_path
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hash::Sha256;
    use rdfc_nquads::{parse, ParsedNQuads};

    fn make_state<'a>(parsed: &'a ParsedNQuads) -> C14nState<'a, Sha256> {
        let mut state = C14nState::new(&C14nOptions::default());
        state.label_of = parsed
            .blank_node_labels
            .iter()
            .map(|(node, label)| (*node, Rc::from(label.as_str())))
            .collect();
        for quad in parsed.dataset.quads() {
            for node in quad.blank_nodes() {
                let label = Rc::clone(&state.label_of[&node]);
                state.b2q.entry(label).or_default().push(quad);
            }
        }
        state
    }

    #[test]
    fn hashing_serialization_substitutes_reference_and_other() {
        crate::test_setup();
        let parsed = parse("_:x <tag:p> _:y _:x .\n").unwrap();
        let state = make_state(&parsed);
        let quad = parsed.dataset.quads().next().unwrap();
        assert_eq!(state.nq_for_hash(quad, "x"), "_:a <tag:p> _:z _:a .\n");
        assert_eq!(state.nq_for_hash(quad, "y"), "_:z <tag:p> _:a _:z .\n");
    }

    #[test]
    fn first_degree_hash_ignores_other_labels() {
        crate::test_setup();
        let a = parse("_:x <tag:p> _:y .\n").unwrap();
        let b = parse("_:x <tag:p> _:renamed .\n").unwrap();
        let ha = make_state(&a).hash_first_degree("x");
        let hb = make_state(&b).hash_first_degree("x");
        assert_eq!(ha, hb);
    }

    #[test]
    fn first_degree_hash_depends_on_the_reference_position() {
        crate::test_setup();
        let parsed = parse("_:x <tag:p> _:y .\n").unwrap();
        let state = make_state(&parsed);
        assert_ne!(state.hash_first_degree("x"), state.hash_first_degree("y"));
    }

    #[test]
    fn first_degree_hash_covers_graph_position() {
        crate::test_setup();
        let a = parse("<tag:s> <tag:p> \"v\" _:g .\n").unwrap();
        let b = parse("<tag:s> <tag:p> \"w\" _:g .\n").unwrap();
        let ha = make_state(&a).hash_first_degree("g");
        let hb = make_state(&b).hash_first_degree("g");
        assert_ne!(ha, hb);
    }

    #[test]
    fn generated_input_labels_avoid_caller_labels() {
        crate::test_setup();
        // one caller-labeled node squatting the first generated name
        let parsed = parse("_:x <tag:p> _:y .\n").unwrap();
        let x = parsed.dataset.quads().next().unwrap().subject.blank_node().unwrap();
        let caller: HashMap<_, _> = [(x, "n0".to_string())].into();
        let quads: Vec<&Quad> = parsed.dataset.quads().collect();
        let label_of = input_label_map(&quads, Some(&caller)).unwrap();
        assert_eq!(label_of[&x].as_ref(), "n0");
        let y = parsed.dataset.quads().next().unwrap().object.blank_node().unwrap();
        assert_eq!(label_of[&y].as_ref(), "n1");
    }

    #[test]
    fn duplicate_caller_labels_are_rejected() {
        crate::test_setup();
        let parsed = parse("_:x <tag:p> _:y .\n").unwrap();
        let caller: HashMap<_, _> = parsed
            .blank_node_labels
            .keys()
            .map(|node| (*node, "same".to_string()))
            .collect();
        let err = relabel_with::<Sha256>(
            &parsed.dataset,
            Some(&caller),
            &C14nOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, C14nError::DuplicateInputLabel("same".to_string()));
    }

    #[test]
    fn empty_caller_label_is_rejected() {
        crate::test_setup();
        let parsed = parse("_:x <tag:p> \"v\" .\n").unwrap();
        let caller: HashMap<_, _> = parsed
            .blank_node_labels
            .keys()
            .map(|node| (*node, String::new()))
            .collect();
        let err = relabel_with::<Sha256>(
            &parsed.dataset,
            Some(&caller),
            &C14nOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, C14nError::EmptyInputLabel);
    }

    #[test]
    fn relabel_covers_every_blank_node() {
        crate::test_setup();
        let parsed = parse(concat!(
            "_:a <tag:p> _:b .\n",
            "_:b <tag:p> _:c .\n",
            "_:c <tag:q> \"v\" _:g .\n",
        ))
        .unwrap();
        let issued = relabel_with::<Sha256>(
            &parsed.dataset,
            Some(&parsed.blank_node_labels),
            &C14nOptions::default(),
        )
        .unwrap();
        assert_eq!(issued.len(), 4);
        let mut labels: Vec<_> = issued.values().cloned().collect();
        labels.sort();
        assert_eq!(labels, ["c14n0", "c14n1", "c14n2", "c14n3"]);
    }
}
