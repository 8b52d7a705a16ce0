//! `orderBy` parsing: a field name plus an optional direction.

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    /// Parse `orderBy=<field> [ASC|DESC]`.
    ///
    /// An unrecognized direction token sorts ascending rather than failing;
    /// field names are validated per resource via [`OrderBy::validate_field`].
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut parts = raw.split_whitespace();
        let field = parts
            .next()
            .ok_or_else(|| CoreError::Validation("Parameter orderBy must not be empty".into()))?
            .to_string();
        let direction = match parts.next() {
            Some(token) if token.eq_ignore_ascii_case("DESC") => Direction::Descending,
            _ => Direction::Ascending,
        };
        Ok(Self { field, direction })
    }

    pub fn validate_field(&self, supported: &[&str]) -> Result<(), CoreError> {
        if supported.contains(&self.field.as_str()) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "OrderBy field '{}' is not supported, supported fields are: {}",
                self.field,
                supported.join(", ")
            )))
        }
    }

    pub fn descending(&self) -> bool {
        self.direction == Direction::Descending
    }
}
