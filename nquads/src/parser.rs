//! Parser for the [N-Quads] concrete syntax.
//!
//! [N-Quads]: https://www.w3.org/TR/n-quads/

use std::collections::HashMap;

use rdfc_model::{BlankNode, Dataset, Iri, Literal, Quad, Term};
use thiserror::Error;

/// The outcome of [`parse`]: the dataset, plus the input label under which
/// each blank node appeared in the source.
///
/// Blank node identity is by reference
/// (two occurrences of the same label yield the same [`BlankNode`]),
/// so the labels are only kept as a side map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedNQuads {
    /// The parsed dataset.
    pub dataset: Dataset,
    /// The label under which each blank node appeared in the source.
    pub blank_node_labels: HashMap<BlankNode, String>,
}

/// An error raised while parsing an N-Quads document.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NQuadsParseError {
    /// A statement is missing its terminating period.
    #[error("line {0}: statement is not terminated by '.'")]
    UnterminatedStatement(usize),
    /// An unexpected character was found.
    #[error("line {line}: expected {expected}, found {found:?}")]
    Unexpected {
        /// Line of the offending character.
        line: usize,
        /// What the grammar allowed at this point.
        expected: &'static str,
        /// The character actually found.
        found: char,
    },
    /// The line ended in the middle of a term.
    #[error("line {0}: unexpected end of line")]
    UnexpectedEndOfLine(usize),
    /// A backslash introduced an escape sequence the grammar does not define.
    #[error("line {0}: invalid escape sequence")]
    InvalidEscape(usize),
    /// A `\u`/`\U` escape does not denote a Unicode scalar value.
    #[error("line {0}: escape sequence denotes an invalid code point")]
    InvalidCodePoint(usize),
    /// A language tag does not match the LANGTAG production.
    #[error("line {0}: invalid language tag")]
    InvalidLanguageTag(usize),
    /// A blank node label is empty or ill-formed.
    #[error("line {0}: invalid blank node label")]
    InvalidBlankNodeLabel(usize),
    /// Content was found after the terminating period.
    #[error("line {0}: trailing content after statement")]
    TrailingContent(usize),
}

/// Parse an N-Quads document.
///
/// Each statement must fit on one line; empty lines and `#` comments are
/// ignored. Language tags are lowercased, as RDF 1.1 defines their value
/// space to be lowercase.
pub fn parse(input: &str) -> Result<ParsedNQuads, NQuadsParseError> {
    let mut dataset = Dataset::new();
    let mut nodes_by_label: HashMap<String, BlankNode> = HashMap::new();
    for (i, line) in input.lines().enumerate() {
        let mut scanner = Scanner::new(line, i + 1);
        scanner.skip_ws();
        if scanner.at_end_or_comment() {
            continue;
        }
        dataset.insert(scanner.statement(&mut nodes_by_label)?);
    }
    let blank_node_labels = nodes_by_label
        .into_iter()
        .map(|(label, node)| (node, label))
        .collect();
    Ok(ParsedNQuads {
        dataset,
        blank_node_labels,
    })
}

struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, line: usize) -> Self {
        Self {
            input,
            pos: 0,
            line,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
        }
    }

    fn at_end_or_comment(&self) -> bool {
        matches!(self.peek(), None | Some('#'))
    }

    fn unexpected(&self, expected: &'static str) -> NQuadsParseError {
        match self.peek() {
            Some(found) => NQuadsParseError::Unexpected {
                line: self.line,
                expected,
                found,
            },
            None => NQuadsParseError::UnexpectedEndOfLine(self.line),
        }
    }

    fn statement(
        &mut self,
        nodes_by_label: &mut HashMap<String, BlankNode>,
    ) -> Result<Quad, NQuadsParseError> {
        let subject = self.node_term(nodes_by_label, "an IRI or a blank node")?;
        self.skip_ws();
        let predicate = self.iri_ref()?;
        self.skip_ws();
        let object = self.object_term(nodes_by_label)?;
        self.skip_ws();
        let graph_name = match self.peek() {
            Some('.') => None,
            None => return Err(NQuadsParseError::UnterminatedStatement(self.line)),
            _ => {
                let g = self.node_term(nodes_by_label, "a graph label or '.'")?;
                self.skip_ws();
                Some(g)
            }
        };
        if self.bump() != Some('.') {
            return Err(NQuadsParseError::UnterminatedStatement(self.line));
        }
        self.skip_ws();
        if !self.at_end_or_comment() {
            return Err(NQuadsParseError::TrailingContent(self.line));
        }
        Ok(Quad {
            subject,
            predicate,
            object,
            graph_name,
        })
    }

    /// An IRI or a blank node (subject and graph-label positions).
    fn node_term(
        &mut self,
        nodes_by_label: &mut HashMap<String, BlankNode>,
        expected: &'static str,
    ) -> Result<Term, NQuadsParseError> {
        match self.peek() {
            Some('<') => Ok(Term::Iri(self.iri_ref()?)),
            Some('_') => Ok(Term::BlankNode(self.blank_node(nodes_by_label)?)),
            _ => Err(self.unexpected(expected)),
        }
    }

    fn object_term(
        &mut self,
        nodes_by_label: &mut HashMap<String, BlankNode>,
    ) -> Result<Term, NQuadsParseError> {
        match self.peek() {
            Some('"') => Ok(Term::Literal(self.literal()?)),
            _ => self.node_term(nodes_by_label, "an IRI, a blank node or a literal"),
        }
    }

    fn iri_ref(&mut self) -> Result<Iri, NQuadsParseError> {
        if self.peek() != Some('<') {
            return Err(self.unexpected("an IRI"));
        }
        self.bump();
        let mut iri = String::new();
        loop {
            match self.bump() {
                Some('>') => return Ok(Iri::new(iri)),
                Some('\\') => iri.push(self.uchar()?),
                Some(c) if c <= ' ' || c == '<' || c == '"' => {
                    return Err(NQuadsParseError::Unexpected {
                        line: self.line,
                        expected: "an IRI character",
                        found: c,
                    })
                }
                Some(c) => iri.push(c),
                None => return Err(NQuadsParseError::UnexpectedEndOfLine(self.line)),
            }
        }
    }

    fn blank_node(
        &mut self,
        nodes_by_label: &mut HashMap<String, BlankNode>,
    ) -> Result<BlankNode, NQuadsParseError> {
        self.bump(); // '_'
        if self.bump() != Some(':') {
            return Err(NQuadsParseError::InvalidBlankNodeLabel(self.line));
        }
        let mut label = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.') {
                label.push(c);
                self.bump();
            } else {
                break;
            }
        }
        // trailing periods terminate the statement, not the label
        while label.ends_with('.') {
            label.pop();
            self.pos -= 1;
        }
        if label.is_empty() || label.starts_with('-') || label.starts_with('.') {
            return Err(NQuadsParseError::InvalidBlankNodeLabel(self.line));
        }
        Ok(*nodes_by_label
            .entry(label)
            .or_insert_with(BlankNode::new))
    }

    fn literal(&mut self) -> Result<Literal, NQuadsParseError> {
        self.bump(); // '"'
        let mut lexical = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\\') => lexical.push(self.echar()?),
                Some(c) => lexical.push(c),
                None => return Err(NQuadsParseError::UnexpectedEndOfLine(self.line)),
            }
        }
        match self.peek() {
            Some('@') => {
                self.bump();
                Ok(Literal::language_tagged(lexical, self.language_tag()?))
            }
            Some('^') => {
                self.bump();
                if self.bump() != Some('^') {
                    return Err(self.unexpected("'^^' before a datatype IRI"));
                }
                Ok(Literal::typed(lexical, self.iri_ref()?))
            }
            _ => Ok(Literal::simple(lexical)),
        }
    }

    /// An ECHAR or UCHAR escape, after the backslash.
    fn echar(&mut self) -> Result<char, NQuadsParseError> {
        match self.peek() {
            Some('t') => self.escaped('\t'),
            Some('b') => self.escaped('\u{8}'),
            Some('n') => self.escaped('\n'),
            Some('r') => self.escaped('\r'),
            Some('f') => self.escaped('\u{c}'),
            Some('"') => self.escaped('"'),
            Some('\'') => self.escaped('\''),
            Some('\\') => self.escaped('\\'),
            _ => self.uchar(),
        }
    }

    fn escaped(&mut self, c: char) -> Result<char, NQuadsParseError> {
        self.bump();
        Ok(c)
    }

    /// A `\uXXXX` or `\UXXXXXXXX` escape, after the backslash.
    fn uchar(&mut self) -> Result<char, NQuadsParseError> {
        let digits = match self.bump() {
            Some('u') => 4,
            Some('U') => 8,
            _ => return Err(NQuadsParseError::InvalidEscape(self.line)),
        };
        let mut value: u32 = 0;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or(NQuadsParseError::InvalidEscape(self.line))?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or(NQuadsParseError::InvalidCodePoint(self.line))
    }

    fn language_tag(&mut self) -> Result<String, NQuadsParseError> {
        let mut tag = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                tag.push(c.to_ascii_lowercase());
                self.bump();
            } else {
                break;
            }
        }
        if tag.is_empty() {
            return Err(NQuadsParseError::InvalidLanguageTag(self.line));
        }
        while self.peek() == Some('-') {
            self.bump();
            tag.push('-');
            let mut sub = 0;
            while let Some(c) = self.peek() {
                if c.is_ascii_alphanumeric() {
                    tag.push(c.to_ascii_lowercase());
                    self.bump();
                    sub += 1;
                } else {
                    break;
                }
            }
            if sub == 0 {
                return Err(NQuadsParseError::InvalidLanguageTag(self.line));
            }
        }
        Ok(tag)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rdfc_model::XSD_STRING;

    #[test]
    fn simple_document() {
        let parsed = parse(concat!(
            "# a comment\n",
            "<tag:s> <tag:p> <tag:o> .\n",
            "\n",
            "<tag:s> <tag:p> \"v\" <tag:g> . # trailing comment\n",
        ))
        .unwrap();
        assert_eq!(parsed.dataset.len(), 2);
        assert!(parsed.blank_node_labels.is_empty());
        let quads: Vec<_> = parsed.dataset.quads().collect();
        assert_eq!(quads[0].graph_name, None);
        assert_eq!(quads[1].graph_name, Some(Term::Iri(Iri::new("tag:g"))));
        assert_eq!(
            quads[1].object,
            Term::Literal(Literal::simple("v")),
        );
    }

    #[test]
    fn same_label_same_blank_node() {
        let parsed = parse("_:b1 <tag:p> _:b2 .\n_:b2 <tag:p> _:b1 .\n").unwrap();
        assert_eq!(parsed.blank_node_labels.len(), 2);
        let quads: Vec<_> = parsed.dataset.quads().collect();
        assert_eq!(quads[0].subject, quads[1].object);
        assert_eq!(quads[0].object, quads[1].subject);
        assert_ne!(quads[0].subject, quads[0].object);
        let mut labels: Vec<_> = parsed.blank_node_labels.values().cloned().collect();
        labels.sort();
        assert_eq!(labels, ["b1", "b2"]);
    }

    #[test]
    fn blank_node_label_followed_by_period() {
        let parsed = parse("_:b1 <tag:p> _:b2.\n").unwrap();
        let mut labels: Vec<_> = parsed.blank_node_labels.values().cloned().collect();
        labels.sort();
        assert_eq!(labels, ["b1", "b2"]);
    }

    #[test]
    fn graph_position_blank_node() {
        let parsed = parse("_:s <tag:p> \"v\" _:g .\n").unwrap();
        assert_eq!(parsed.blank_node_labels.len(), 2);
        let quad = parsed.dataset.quads().next().unwrap();
        assert!(matches!(quad.graph_name, Some(Term::BlankNode(_))));
    }

    #[test]
    fn literals() {
        let parsed = parse(concat!(
            "<tag:s> <tag:p> \"esc\\\\aped \\\"and\\\" \\n\\r\\t\" .\n",
            "<tag:s> <tag:p> \"chat\"@FR .\n",
            "<tag:s> <tag:p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n",
            "<tag:s> <tag:p> \"plain\"^^<http://www.w3.org/2001/XMLSchema#string> .\n",
            "<tag:s> <tag:p> \"\\u00e9\\U0001F980\" .\n",
        ))
        .unwrap();
        let objects: Vec<_> = parsed
            .dataset
            .quads()
            .map(|q| match &q.object {
                Term::Literal(lit) => lit.clone(),
                _ => panic!("expected literal"),
            })
            .collect();
        assert_eq!(objects[0].lexical_form(), "esc\\aped \"and\" \n\r\t");
        assert_eq!(objects[1].language_tag(), Some("fr"));
        assert_eq!(
            objects[2].datatype().as_str(),
            "http://www.w3.org/2001/XMLSchema#integer"
        );
        // explicit xsd:string is the same literal as the plain form
        assert_eq!(objects[3], Literal::simple("plain"));
        assert_eq!(objects[3].datatype().as_str(), XSD_STRING);
        assert_eq!(objects[4].lexical_form(), "é🦀");
    }

    #[test]
    fn reports_errors_with_line_numbers() {
        assert_eq!(
            parse("<tag:s> <tag:p> <tag:o> .\n<tag:s> <tag:p>\n"),
            Err(NQuadsParseError::UnexpectedEndOfLine(2)),
        );
        assert_eq!(
            parse("<tag:s> <tag:p> <tag:o>\n"),
            Err(NQuadsParseError::UnterminatedStatement(1)),
        );
        assert_eq!(
            parse("<tag:s> <tag:p> <tag:o> . <tag:x>\n"),
            Err(NQuadsParseError::TrailingContent(1)),
        );
        assert_eq!(
            parse("<tag:s> <tag:p> \"\\x\" .\n"),
            Err(NQuadsParseError::InvalidEscape(1)),
        );
        assert_eq!(
            parse("<tag:s> <tag:p> \"v\"@ .\n"),
            Err(NQuadsParseError::InvalidLanguageTag(1)),
        );
        assert_eq!(
            parse("_: <tag:p> <tag:o> .\n"),
            Err(NQuadsParseError::InvalidBlankNodeLabel(1)),
        );
        assert!(matches!(
            parse("\"lit\" <tag:p> <tag:o> .\n"),
            Err(NQuadsParseError::Unexpected { line: 1, .. }),
        ));
    }
}
