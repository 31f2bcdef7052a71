//! Catalog load/save service
//!
//! Streams records from a delimited text source into a [`Catalog`] and writes
//! a catalog back out in the same format.

use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{Catalog, Course, CourseId, DomainError};
use crate::infrastructure::traits::FileSystem;

/// Outcome of loading one catalog source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Well-formed records handed to the catalog (duplicates included)
    pub records: usize,
    /// Lines that were skipped, one `MalformedRecord` each
    pub malformed: Vec<DomainError>,
}

/// Service for moving catalogs between text sources and memory.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
    delimiter: char,
    id_pattern: Option<Regex>,
}

impl CatalogService {
    /// Create a new catalog service.
    ///
    /// Fails with `Config` if the configured id pattern is not a valid regex.
    pub fn new(fs: Arc<dyn FileSystem>, settings: &Settings) -> ApplicationResult<Self> {
        let id_pattern = settings
            .id_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| ApplicationError::Config {
                message: format!("invalid id_pattern: {}", e),
            })?;

        Ok(Self {
            fs,
            delimiter: settings.delimiter,
            id_pattern,
        })
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse catalog text into records, one result per non-blank line.
    pub fn parse<'a>(
        &'a self,
        content: &'a str,
    ) -> impl Iterator<Item = Result<Course, DomainError>> + 'a {
        content.lines().enumerate().filter_map(move |(i, line)| {
            Course::parse_line(i + 1, line, self.delimiter, self.id_pattern.as_ref()).transpose()
        })
    }

    /// Build a course from interactive input.
    ///
    /// `prerequisites` is a comma-separated list; blanks are dropped. Fields
    /// containing the configured delimiter are rejected, since they could not
    /// be saved and read back.
    pub fn new_course(
        &self,
        id: &str,
        name: &str,
        prerequisites: &str,
    ) -> Result<Course, DomainError> {
        let id = CourseId::new(id);
        id.validate(self.id_pattern.as_ref())
            .map_err(DomainError::InvalidCourse)?;
        if name.trim().is_empty() {
            return Err(DomainError::InvalidCourse(format!("{} has no name", id)));
        }
        let prerequisites = prerequisites
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(CourseId::new)
            .collect();
        let course = Course {
            id,
            name: name.trim().to_string(),
            prerequisites,
        };
        course.check_fields(self.delimiter)?;
        Ok(course)
    }

    /// Load the source at `path` into `catalog`.
    ///
    /// Malformed lines are skipped and reported; duplicate ids are left to
    /// the catalog, which keeps the first record. A source that cannot be
    /// read aborts the load with `SourceUnavailable` (`SourceNotText` for
    /// non-UTF-8 content) and leaves the catalog untouched.
    #[instrument(level = "debug", skip(self, catalog))]
    pub fn load(&self, path: &Path, catalog: &mut Catalog) -> ApplicationResult<LoadReport> {
        let content = self.fs.read_to_string(path).with_source_context(path)?;

        let mut report = LoadReport::default();
        for parsed in self.parse(&content) {
            match parsed {
                Ok(course) => {
                    report.records += 1;
                    let _ = catalog.insert(course);
                }
                Err(e) => {
                    warn!("skipping line: {}", e);
                    report.malformed.push(e);
                }
            }
        }

        info!(
            "loaded {} records from {} ({} skipped), catalog holds {}",
            report.records,
            path.display(),
            report.malformed.len(),
            catalog.len()
        );
        Ok(report)
    }

    /// Render the catalog in source format, ascending id order.
    pub fn render(&self, catalog: &Catalog) -> String {
        let mut out = String::new();
        for course in catalog.iter_inorder() {
            out.push_str(&course.to_line(self.delimiter));
            out.push('\n');
        }
        out
    }

    /// Write the catalog to `path`, creating parent directories as needed.
    #[instrument(level = "debug", skip(self, catalog))]
    pub fn save(&self, path: &Path, catalog: &Catalog) -> ApplicationResult<usize> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, &self.render(catalog))
            .with_path_context("write catalog", path)?;
        debug!("saved {} courses to {}", catalog.len(), path.display());
        Ok(catalog.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;

    fn service(settings: &Settings) -> CatalogService {
        CatalogService::new(Arc::new(RealFileSystem), settings).unwrap()
    }

    #[test]
    fn given_invalid_id_pattern_when_creating_then_config_error() {
        let settings = Settings {
            id_pattern: Some("([".into()),
            ..Settings::default()
        };
        let result = CatalogService::new(Arc::new(RealFileSystem), &settings);
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_content_when_parsing_then_reports_line_numbers() {
        let svc = service(&Settings::default());
        let parsed: Vec<_> = svc
            .parse("CSCI101, Intro\n\nBADLINE\nCSCI201, DS, CSCI101\n")
            .collect();
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].is_ok());
        assert!(matches!(
            parsed[1],
            Err(DomainError::MalformedRecord { line: 3, .. })
        ));
        assert_eq!(parsed[2].as_ref().unwrap().prerequisites.len(), 1);
    }

    #[test]
    fn given_catalog_when_rendering_then_ascending_lines() {
        let svc = service(&Settings::default());
        let mut catalog = Catalog::new();
        for line in ["MATH201, Discrete Math, MATH101", "CSCI101, Intro"] {
            catalog
                .insert(Course::parse_line(1, line, ',', None).unwrap().unwrap())
                .unwrap();
        }
        assert_eq!(
            svc.render(&catalog),
            "CSCI101, Intro\nMATH201, Discrete Math, MATH101\n"
        );
    }
}
