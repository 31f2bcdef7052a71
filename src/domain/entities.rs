//! Domain entities: course records and their text form

use std::borrow::Borrow;
use std::fmt;

use itertools::Itertools;
use regex::Regex;

use crate::domain::{DomainError, DomainResult};

/// Unique course identifier, e.g. `CSCI101`.
///
/// Normalized on construction (trimmed, upper case) so that every comparison
/// in the catalog is case-insensitive with respect to user input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks the id is non-empty and, if given, matches `pattern`.
    pub fn validate(&self, pattern: Option<&Regex>) -> Result<(), String> {
        if self.is_empty() {
            return Err("empty course id".to_string());
        }
        match pattern {
            Some(pattern) if !pattern.is_match(&self.0) => Err(format!(
                "course id {} does not match {}",
                self,
                pattern.as_str()
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CourseId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CourseId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// A single catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub prerequisites: Vec<CourseId>,
}

impl Course {
    pub fn new(id: impl AsRef<str>, name: impl Into<String>, prerequisites: Vec<CourseId>) -> Self {
        Self {
            id: CourseId::new(id),
            name: name.into(),
            prerequisites,
        }
    }

    /// Parse one line of a catalog source.
    ///
    /// Returns `Ok(None)` for blank lines. Fields are split on `delimiter` and
    /// trimmed; the first two (id, name) are mandatory, the rest are
    /// prerequisites with empty fields dropped.
    ///
    /// # Arguments
    /// * `line_no` - 1-based line number, reported in `MalformedRecord`
    /// * `line` - Raw line content
    /// * `delimiter` - Field separator
    /// * `id_pattern` - Optional pattern the normalized id must match
    pub fn parse_line(
        line_no: usize,
        line: &str,
        delimiter: char,
        id_pattern: Option<&Regex>,
    ) -> DomainResult<Option<Self>> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
        if fields.len() < 2 {
            return Err(DomainError::MalformedRecord {
                line: line_no,
                reason: format!(
                    "expected at least 2 fields, found {}: {:?}",
                    fields.len(),
                    line.trim()
                ),
            });
        }

        let id = CourseId::new(fields[0]);
        if let Err(reason) = id.validate(id_pattern) {
            return Err(DomainError::MalformedRecord {
                line: line_no,
                reason,
            });
        }

        let prerequisites = fields[2..]
            .iter()
            .filter(|f| !f.is_empty())
            .map(CourseId::new)
            .collect();

        Ok(Some(Self {
            id,
            name: fields[1].to_string(),
            prerequisites,
        }))
    }

    /// Render the record in source format, inverse of [`Course::parse_line`].
    ///
    /// Fields must not contain `delimiter`; see [`Course::check_fields`].
    pub fn to_line(&self, delimiter: char) -> String {
        // A padding space after a whitespace delimiter would read back as an empty field
        let separator = if delimiter.is_whitespace() {
            delimiter.to_string()
        } else {
            format!("{} ", delimiter)
        };
        std::iter::once(self.id.as_str())
            .chain(std::iter::once(self.name.as_str()))
            .chain(self.prerequisites.iter().map(CourseId::as_str))
            .join(&separator)
    }

    /// Checks that no field contains `delimiter`, so that
    /// [`Course::to_line`] reads back as the same record.
    pub fn check_fields(&self, delimiter: char) -> DomainResult<()> {
        let fields = std::iter::once(self.id.as_str())
            .chain(std::iter::once(self.name.as_str()))
            .chain(self.prerequisites.iter().map(CourseId::as_str));
        for field in fields {
            if field.contains(delimiter) {
                return Err(DomainError::InvalidCourse(format!(
                    "{:?} contains the delimiter {:?}",
                    field, delimiter
                )));
            }
        }
        Ok(())
    }

    /// Prerequisites as a display line, `none` when there are none.
    pub fn prerequisites_display(&self) -> String {
        if self.prerequisites.is_empty() {
            "none".to_string()
        } else {
            self.prerequisites.iter().join(", ")
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.id, self.name)
    }
}
