//! Issuance of canonical and temporary blank node identifiers.
//!
//! Implements <https://www.w3.org/TR/rdf-canon/#issue-identifier>.

use std::collections::HashMap;
use std::rc::Rc;

/// Mints stable, prefix-tagged identifiers for blank node input labels.
///
/// Issued identifiers are `<prefix><n>` with `n` counting from 0;
/// issuing the same input label twice returns the first identifier again.
/// The order in which labels were first issued is preserved,
/// and is significant when a temporary issuer is merged into the
/// canonical one.
///
/// Cloning yields a fully independent issuer;
/// the N-degree hashing step clones one per explored permutation
/// and commits only the winning clone.
#[derive(Clone, Debug)]
pub struct IdentifierIssuer {
    prefix: Rc<str>,
    issued: HashMap<Rc<str>, Rc<str>>,
    issued_order: Vec<Rc<str>>,
}

impl IdentifierIssuer {
    /// A fresh issuer minting `<prefix><n>` identifiers.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: Rc::from(prefix),
            issued: HashMap::new(),
            issued_order: Vec::new(),
        }
    }

    /// Return the identifier for `input_label`, minting one if needed.
    ///
    /// The boolean is true iff the identifier was newly minted.
    pub fn issue(&mut self, input_label: &str) -> (Rc<str>, bool) {
        if let Some(id) = self.issued.get(input_label) {
            return (Rc::clone(id), false);
        }
        let id: Rc<str> = Rc::from(format!("{}{}", self.prefix, self.issued_order.len()));
        let key: Rc<str> = Rc::from(input_label);
        self.issued.insert(Rc::clone(&key), Rc::clone(&id));
        self.issued_order.push(key);
        (id, true)
    }

    /// Whether an identifier has been issued for `input_label`.
    pub fn has(&self, input_label: &str) -> bool {
        self.issued.contains_key(input_label)
    }

    /// The identifier issued for `input_label`, if any.
    pub fn get(&self, input_label: &str) -> Option<&str> {
        self.issued.get(input_label).map(Rc::as_ref)
    }

    /// The number of identifiers issued so far.
    pub fn issued_count(&self) -> usize {
        self.issued_order.len()
    }

    /// The `(input_label, issued_identifier)` pairs, oldest first.
    pub fn entries_in_issue_order(&self) -> impl Iterator<Item = (&str, &str)> {
        self.issued_order
            .iter()
            .map(move |label| (label.as_ref(), self.issued[label].as_ref()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn issues_prefixed_identifiers_without_gaps() {
        let mut issuer = IdentifierIssuer::new("c14n");
        assert_eq!(issuer.issue("x").0.as_ref(), "c14n0");
        assert_eq!(issuer.issue("y").0.as_ref(), "c14n1");
        assert_eq!(issuer.issue("z").0.as_ref(), "c14n2");
        assert_eq!(issuer.issued_count(), 3);
    }

    #[test]
    fn issue_is_idempotent() {
        let mut issuer = IdentifierIssuer::new("b");
        let (first, new) = issuer.issue("x");
        assert!(new);
        issuer.issue("y");
        let (again, new) = issuer.issue("x");
        assert!(!new);
        assert_eq!(first, again);
        assert_eq!(issuer.issued_count(), 2);
    }

    #[test]
    fn has_and_get() {
        let mut issuer = IdentifierIssuer::new("b");
        assert!(!issuer.has("x"));
        assert_eq!(issuer.get("x"), None);
        issuer.issue("x");
        assert!(issuer.has("x"));
        assert_eq!(issuer.get("x"), Some("b0"));
    }

    #[test]
    fn entries_preserve_issue_order() {
        let mut issuer = IdentifierIssuer::new("b");
        for label in ["m", "a", "z", "a"] {
            issuer.issue(label);
        }
        let entries: Vec<_> = issuer.entries_in_issue_order().collect();
        assert_eq!(entries, [("m", "b0"), ("a", "b1"), ("z", "b2")]);
    }

    #[test]
    fn clones_are_independent() {
        let mut original = IdentifierIssuer::new("b");
        original.issue("x");
        let mut clone = original.clone();
        clone.issue("y");
        original.issue("z");
        assert_eq!(clone.get("y"), Some("b1"));
        assert_eq!(clone.get("z"), None);
        assert_eq!(original.get("z"), Some("b1"));
        assert_eq!(original.get("y"), None);
        let order: Vec<_> = clone.entries_in_issue_order().map(|(l, _)| l).collect();
        assert_eq!(order, ["x", "y"]);
    }
}
