//! Course catalog: the AVL tree keyed by normalized course id

use termtree::Tree;
use tracing::{debug, instrument};

use crate::domain::avl::AvlTree;
use crate::domain::{Course, CourseId, DomainError, DomainResult};

/// In-memory course catalog.
///
/// Ids are normalized to upper case before every lookup, so `csci101` and
/// `CSCI101` address the same record.
#[derive(Debug, Default)]
pub struct Catalog {
    tree: AvlTree<CourseId, Course>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diagnostics(diagnostics: bool) -> Self {
        Self {
            tree: AvlTree::with_diagnostics(diagnostics),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn diagnostics(&self) -> bool {
        self.tree.diagnostics()
    }

    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.tree.set_diagnostics(enabled);
    }

    pub fn toggle_diagnostics(&mut self) -> bool {
        self.tree.toggle_diagnostics()
    }

    /// Adds a course; an id already in the catalog is rejected and the
    /// stored record kept.
    #[instrument(level = "debug", skip_all, fields(id = %course.id))]
    pub fn insert(&mut self, course: Course) -> DomainResult<()> {
        let id = course.id.clone();
        if self.tree.insert(id.clone(), course) {
            Ok(())
        } else {
            debug!("rejected duplicate {}", id);
            Err(DomainError::Duplicate(id))
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, id: &str) -> DomainResult<&Course> {
        let id = CourseId::new(id);
        self.tree
            .get(id.as_str())
            .ok_or(DomainError::NotFound(id))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &str) -> DomainResult<Course> {
        let id = CourseId::new(id);
        self.tree
            .remove(id.as_str())
            .ok_or(DomainError::NotFound(id))
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Courses in ascending id order.
    pub fn iter_inorder(&self) -> impl Iterator<Item = &Course> {
        self.tree.iter_inorder().map(|(_, course)| course)
    }

    pub fn iter_preorder(&self) -> impl Iterator<Item = &Course> {
        self.tree.iter_preorder().map(|(_, course)| course)
    }

    pub fn iter_postorder(&self) -> impl Iterator<Item = &Course> {
        self.tree.iter_postorder().map(|(_, course)| course)
    }

    pub fn iter_levelorder(&self) -> impl Iterator<Item = &Course> {
        self.tree.iter_levelorder().map(|(_, course)| course)
    }

    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    pub fn structure(&self) -> Tree<String> {
        self.tree.structure()
    }
}
