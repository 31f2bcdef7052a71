//! Interactive menu session
//!
//! Blocking request/response loop over any `BufRead`/`Write` pair. Every
//! failure short of terminal I/O is reported and the menu shown again.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::application::services::CatalogService;
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::Settings;
use crate::domain::{Catalog, Course, CourseId};

/// A menu entry, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Load,
    DisplayInOrder,
    Find,
    Delete,
    DisplayPreOrder,
    DisplayPostOrder,
    ToggleDiagnostics,
    AddCourse,
    Exit,
    DisplayLevelOrder,
    ShowStructure,
    Save,
}

impl MenuChoice {
    /// Every entry in display order.
    pub const ALL: [MenuChoice; 12] = [
        MenuChoice::Load,
        MenuChoice::DisplayInOrder,
        MenuChoice::Find,
        MenuChoice::Delete,
        MenuChoice::DisplayPreOrder,
        MenuChoice::DisplayPostOrder,
        MenuChoice::ToggleDiagnostics,
        MenuChoice::AddCourse,
        MenuChoice::Exit,
        MenuChoice::DisplayLevelOrder,
        MenuChoice::ShowStructure,
        MenuChoice::Save,
    ];

    pub fn number(self) -> u8 {
        match self {
            MenuChoice::Load => 1,
            MenuChoice::DisplayInOrder => 2,
            MenuChoice::Find => 3,
            MenuChoice::Delete => 4,
            MenuChoice::DisplayPreOrder => 5,
            MenuChoice::DisplayPostOrder => 6,
            MenuChoice::ToggleDiagnostics => 7,
            MenuChoice::AddCourse => 8,
            MenuChoice::Exit => 9,
            MenuChoice::DisplayLevelOrder => 10,
            MenuChoice::ShowStructure => 11,
            MenuChoice::Save => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Load => "Load Courses",
            MenuChoice::DisplayInOrder => "Display All Courses (InOrder)",
            MenuChoice::Find => "Find Course",
            MenuChoice::Delete => "Delete Course",
            MenuChoice::DisplayPreOrder => "Display PreOrder",
            MenuChoice::DisplayPostOrder => "Display PostOrder",
            MenuChoice::ToggleDiagnostics => "Toggle Diagnostics",
            MenuChoice::AddCourse => "Add Course",
            MenuChoice::Exit => "Exit",
            MenuChoice::DisplayLevelOrder => "Display LevelOrder",
            MenuChoice::ShowStructure => "Show Tree Structure",
            MenuChoice::Save => "Save Courses",
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}. {}", self.number(), self.label())
    }
}

impl FromStr for MenuChoice {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || CliError::InvalidMenuSelection(s.to_string());
        let number: u8 = s.parse().map_err(|_| invalid())?;
        MenuChoice::ALL
            .into_iter()
            .find(|choice| choice.number() == number)
            .ok_or_else(invalid)
    }
}

/// One interactive run over a single catalog.
pub struct Session<R, W> {
    catalog: Catalog,
    service: CatalogService,
    source_path: PathBuf,
    loaded: bool,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(service: CatalogService, settings: &Settings, input: R, output: W) -> Self {
        Self {
            catalog: Catalog::with_diagnostics(settings.diagnostics),
            service,
            source_path: settings.source_path.clone(),
            loaded: false,
            input,
            output,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Consume the session, handing back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu until Exit or end of input.
    pub fn run(&mut self) -> CliResult<()> {
        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match line.parse::<MenuChoice>() {
                Ok(MenuChoice::Exit) => break,
                Ok(choice) => self.dispatch(choice)?,
                Err(e) => output::error(&mut self.output, &e)?,
            }
        }
        output::info(&mut self.output, "Thank you for using the Course Catalog!")?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn dispatch(&mut self, choice: MenuChoice) -> CliResult<()> {
        match choice {
            MenuChoice::Load => self.load(),
            MenuChoice::DisplayInOrder => self.display(choice),
            MenuChoice::Find => {
                let id = self.ask("Enter course identifier:")?;
                self.find(&id)
            }
            MenuChoice::Delete => self.delete(),
            MenuChoice::DisplayPreOrder
            | MenuChoice::DisplayPostOrder
            | MenuChoice::DisplayLevelOrder => self.display(choice),
            MenuChoice::ToggleDiagnostics => {
                let on = self.catalog.toggle_diagnostics();
                output::info(
                    &mut self.output,
                    &format!("Diagnostics {}", if on { "ON" } else { "OFF" }),
                )?;
                Ok(())
            }
            MenuChoice::AddCourse => self.add_course(),
            MenuChoice::ShowStructure => self.show_structure(),
            MenuChoice::Save => self.save(),
            MenuChoice::Exit => Ok(()),
        }
    }

    /// Load the configured source, once per session.
    pub fn load(&mut self) -> CliResult<()> {
        if self.loaded {
            output::info(&mut self.output, "Courses already loaded.")?;
            return Ok(());
        }
        match self.service.load(&self.source_path, &mut self.catalog) {
            Ok(report) => {
                for skipped in &report.malformed {
                    output::warning(&mut self.output, skipped)?;
                }
                self.loaded = true;
                output::success(
                    &mut self.output,
                    &format!("{} courses loaded.", self.catalog.len()),
                )?;
            }
            // Nothing was loaded; the session goes on and load can be retried
            Err(e) => {
                debug!("load failed: {:?}", e);
                output::error(&mut self.output, &e)?;
            }
        }
        Ok(())
    }

    /// Print the course stored under `query`. Without an exact hit, print
    /// every course whose id contains `query`, ascending.
    pub fn find(&mut self, query: &str) -> CliResult<()> {
        match self.catalog.search(query) {
            Ok(course) => output::course(&mut self.output, course)?,
            Err(e) => {
                debug!("{}, trying partial match", e);
                let needle = CourseId::new(query);
                let matches: Vec<&Course> = if needle.is_empty() {
                    Vec::new()
                } else {
                    self.catalog
                        .iter_inorder()
                        .filter(|c| c.id.as_str().contains(needle.as_str()))
                        .collect()
                };
                if matches.is_empty() {
                    output::info(&mut self.output, "Course not found.")?;
                    return Ok(());
                }
                output::header(
                    &mut self.output,
                    &format!("{} courses matching {}:", matches.len(), needle),
                )?;
                for course in matches {
                    output::course(&mut self.output, course)?;
                }
            }
        }
        Ok(())
    }

    fn delete(&mut self) -> CliResult<()> {
        if !self.require_courses()? {
            return Ok(());
        }
        let id = CourseId::new(self.ask("Enter course to delete:")?);
        if self.catalog.search(id.as_str()).is_err() {
            output::info(&mut self.output, "Course not found.")?;
            return Ok(());
        }
        let answer = self.ask(&format!("Are you sure you want to delete {}? (y/n):", id))?;
        if !matches!(answer.to_lowercase().as_str(), "y" | "yes") {
            output::info(&mut self.output, "Deletion canceled.")?;
            return Ok(());
        }
        match self.catalog.remove(id.as_str()) {
            Ok(course) => output::success(&mut self.output, &format!("Deleted {}", course.id))?,
            Err(e) => output::error(&mut self.output, &e)?,
        }
        Ok(())
    }

    fn display(&mut self, choice: MenuChoice) -> CliResult<()> {
        if !self.require_courses()? {
            return Ok(());
        }
        let courses: Vec<&Course> = match choice {
            MenuChoice::DisplayPreOrder => self.catalog.iter_preorder().collect(),
            MenuChoice::DisplayPostOrder => self.catalog.iter_postorder().collect(),
            MenuChoice::DisplayLevelOrder => self.catalog.iter_levelorder().collect(),
            _ => self.catalog.iter_inorder().collect(),
        };
        for course in courses {
            writeln!(self.output, "{}", course)?;
        }
        Ok(())
    }

    fn add_course(&mut self) -> CliResult<()> {
        let id = self.ask("Enter new course ID (e.g., CSCI101):")?;
        if self.catalog.search(&id).is_ok() {
            let message = format!("Course {} already exists.", CourseId::new(&id));
            output::error(&mut self.output, &message)?;
            return Ok(());
        }
        let name = self.ask("Enter course title:")?;
        let prerequisites = self.ask("Enter prerequisites (comma-separated), or leave empty:")?;

        let added = self
            .service
            .new_course(&id, &name, &prerequisites)
            .and_then(|course| {
                let label = course.to_string();
                self.catalog.insert(course).map(|()| label)
            });
        match added {
            Ok(label) => output::success(&mut self.output, &format!("Added {}", label))?,
            Err(e) => output::error(&mut self.output, &e)?,
        }
        Ok(())
    }

    fn show_structure(&mut self) -> CliResult<()> {
        if !self.require_courses()? {
            return Ok(());
        }
        output::header(
            &mut self.output,
            &format!(
                "{} courses, height {}",
                self.catalog.len(),
                self.catalog.height()
            ),
        )?;
        write!(self.output, "{}", self.catalog.structure())?;
        Ok(())
    }

    fn save(&mut self) -> CliResult<()> {
        let target = self.ask("Enter file to save to:")?;
        if target.is_empty() {
            output::info(&mut self.output, "Save cancelled.")?;
            return Ok(());
        }
        let path = PathBuf::from(target);
        match self.service.save(&path, &self.catalog) {
            Ok(count) => output::success(
                &mut self.output,
                &format!("Saved {} courses to {}", count, path.display()),
            )?,
            Err(e) => output::error(&mut self.output, &e)?,
        }
        Ok(())
    }

    /// Listing and delete need something to work on.
    fn require_courses(&mut self) -> CliResult<bool> {
        if self.loaded || !self.catalog.is_empty() {
            return Ok(true);
        }
        output::warning(&mut self.output, "Load courses first.")?;
        Ok(false)
    }

    fn print_menu(&mut self) -> CliResult<()> {
        writeln!(self.output)?;
        output::header(&mut self.output, "Menu:")?;
        for choice in MenuChoice::ALL {
            output::detail(&mut self.output, &choice)?;
        }
        output::prompt(&mut self.output, "Enter choice:")?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> CliResult<String> {
        output::prompt(&mut self.output, question)?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    /// Next trimmed input line, `None` at end of input.
    fn read_line(&mut self) -> CliResult<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }
}
