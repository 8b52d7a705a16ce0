//! The `where` query-parameter grammar.
//!
//! A clause is a parenthesized conjunction of predicates:
//!
//! ```text
//! (status = 'active' AND processBusinessKey MATCHES('key-%') AND priority >= 2)
//! ```
//!
//! Supported comparators are `=`, `MATCHES(...)` and the four ordering
//! operators. Only `AND` joins predicates; `OR` is rejected with a fixed
//! message. Values are single-quoted strings or bare tokens; typed values
//! (`'d_int 10'`) are interpreted downstream by the variable layer.

use crate::error::CoreError;

pub const OR_NOT_SUPPORTED: &str = "The 'OR' operator is not supported in a where clause";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equals,
    Matches,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Equals => "=",
            Comparator::Matches => "MATCHES",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanOrEqual => ">=",
            Comparator::LessThan => "<",
            Comparator::LessThanOrEqual => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub property: String,
    pub comparator: Comparator,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    pub predicates: Vec<Predicate>,
}

impl WhereClause {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Parser::new(raw).parse()
    }

    /// The value of the first predicate matching property and comparator.
    pub fn property(&self, name: &str, comparator: Comparator) -> Option<&str> {
        self.predicates
            .iter()
            .find(|p| p.property == name && p.comparator == comparator)
            .map(|p| p.value.as_str())
    }

    /// Boolean-valued equality predicate (`includeProcessVariables = true`).
    pub fn bool_property(&self, name: &str) -> Result<Option<bool>, CoreError> {
        match self.property(name, Comparator::Equals) {
            None => Ok(None),
            Some(raw) => raw.parse::<bool>().map(Some).map_err(|_| {
                CoreError::Validation(format!(
                    "Parameter '{name}' requires a boolean value, got '{raw}'"
                ))
            }),
        }
    }
}

struct Parser<'a> {
    raw: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            raw,
            chars: raw.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<WhereClause, CoreError> {
        self.skip_ws();
        let parenthesized = self.eat('(');
        let mut predicates = Vec::new();
        loop {
            predicates.push(self.predicate()?);
            self.skip_ws();
            if parenthesized && self.eat(')') {
                self.skip_ws();
                break;
            }
            if self.at_end() {
                if parenthesized {
                    return Err(self.malformed());
                }
                break;
            }
            let joiner = self.word();
            if joiner.eq_ignore_ascii_case("AND") {
                continue;
            }
            if joiner.eq_ignore_ascii_case("OR") {
                return Err(CoreError::Validation(OR_NOT_SUPPORTED.into()));
            }
            return Err(self.malformed());
        }
        if !self.at_end() {
            return Err(self.malformed());
        }
        Ok(WhereClause { predicates })
    }

    fn predicate(&mut self) -> Result<Predicate, CoreError> {
        self.skip_ws();
        let property = self.property_token();
        if property.is_empty() {
            return Err(self.malformed());
        }
        self.skip_ws();
        if self.peek_word_ci("MATCHES") {
            self.word();
            self.skip_ws();
            if !self.eat('(') {
                return Err(self.malformed());
            }
            self.skip_ws();
            let value = self.quoted_value()?;
            self.skip_ws();
            if !self.eat(')') {
                return Err(self.malformed());
            }
            return Ok(Predicate {
                property,
                comparator: Comparator::Matches,
                value,
            });
        }
        let comparator = self.comparator()?;
        self.skip_ws();
        let value = self.value()?;
        Ok(Predicate {
            property,
            comparator,
            value,
        })
    }

    fn comparator(&mut self) -> Result<Comparator, CoreError> {
        let comparator = match (self.peek(), self.peek_at(1)) {
            (Some('>'), Some('=')) => {
                self.pos += 2;
                Comparator::GreaterThanOrEqual
            }
            (Some('<'), Some('=')) => {
                self.pos += 2;
                Comparator::LessThanOrEqual
            }
            (Some('>'), _) => {
                self.pos += 1;
                Comparator::GreaterThan
            }
            (Some('<'), _) => {
                self.pos += 1;
                Comparator::LessThan
            }
            (Some('='), _) => {
                self.pos += 1;
                Comparator::Equals
            }
            _ => return Err(self.malformed()),
        };
        Ok(comparator)
    }

    fn value(&mut self) -> Result<String, CoreError> {
        if self.peek() == Some('\'') {
            return self.quoted_value();
        }
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == ')' {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.malformed());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn quoted_value(&mut self) -> Result<String, CoreError> {
        if !self.eat('\'') {
            return Err(self.malformed());
        }
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\'' {
                let value: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                return Ok(value);
            }
            self.pos += 1;
        }
        Err(self.malformed())
    }

    fn property_token(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '/' | ':' | '.' | '-') {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn word(&mut self) -> String {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphabetic() {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn peek_word_ci(&self, expected: &str) -> bool {
        let end = self.pos + expected.chars().count();
        if end > self.chars.len() {
            return false;
        }
        let candidate: String = self.chars[self.pos..end].iter().collect();
        if !candidate.eq_ignore_ascii_case(expected) {
            return false;
        }
        // The keyword must end at a word boundary.
        !matches!(self.chars.get(end), Some(c) if c.is_alphanumeric() || *c == '_')
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn malformed(&self) -> CoreError {
        CoreError::Validation(format!("An invalid WHERE query was received: {}", self.raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_equality() {
        let clause = WhereClause::parse("(status = 'active')").unwrap();
        assert_eq!(clause.property("status", Comparator::Equals), Some("active"));
    }

    #[test]
    fn parses_conjunction_and_bare_numbers() {
        let clause =
            WhereClause::parse("(status = 'any' AND priority >= 2 AND processId = 'p-1')")
                .unwrap();
        assert_eq!(clause.predicates.len(), 3);
        assert_eq!(
            clause.property("priority", Comparator::GreaterThanOrEqual),
            Some("2")
        );
    }

    #[test]
    fn parses_matches() {
        let clause =
            WhereClause::parse("(processBusinessKey MATCHES('order-%'))").unwrap();
        assert_eq!(
            clause.property("processBusinessKey", Comparator::Matches),
            Some("order-%")
        );
    }

    #[test]
    fn matches_keyword_is_case_insensitive() {
        let clause = WhereClause::parse("(name matches('Review%'))").unwrap();
        assert_eq!(clause.predicates[0].comparator, Comparator::Matches);
    }

    #[test]
    fn parses_typed_literal_verbatim() {
        let clause =
            WhereClause::parse("(variables/local/numberVar >= 'd_int 10')").unwrap();
        assert_eq!(
            clause.property("variables/local/numberVar", Comparator::GreaterThanOrEqual),
            Some("d_int 10")
        );
    }

    #[test]
    fn rejects_disjunction_with_fixed_message() {
        let err = WhereClause::parse(
            "(category = 'http://alfresco.org' OR name = 'something')",
        )
        .unwrap_err();
        match err {
            CoreError::Validation(msg) => assert_eq!(msg, OR_NOT_SUPPORTED),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert!(WhereClause::parse("(name = 'oops)").is_err());
    }

    #[test]
    fn rejects_missing_comparator() {
        assert!(WhereClause::parse("(name 'x')").is_err());
    }

    #[test]
    fn works_without_outer_parentheses() {
        let clause = WhereClause::parse("status = 'completed'").unwrap();
        assert_eq!(
            clause.property("status", Comparator::Equals),
            Some("completed")
        );
    }

    #[test]
    fn bool_property_validates_value() {
        let clause = WhereClause::parse("(includeProcessVariables = true)").unwrap();
        assert_eq!(
            clause.bool_property("includeProcessVariables").unwrap(),
            Some(true)
        );
        let clause = WhereClause::parse("(includeProcessVariables = 'maybe')").unwrap();
        assert!(clause.bool_property("includeProcessVariables").is_err());
    }
}
