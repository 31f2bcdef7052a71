//! Integration tests for the interactive menu, driven through in-memory I/O.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use coursecat::application::services::CatalogService;
use coursecat::cli::{MenuChoice, Session};
use coursecat::config::Settings;
use coursecat::infrastructure::RealFileSystem;
use coursecat::util::testing;

const SAMPLE: &str = "\
CSCI101, Introduction to Programming in C++, CSCI100
MATH201, Discrete Mathematics
";

fn settings_for(source: &Path) -> Settings {
    Settings {
        source_path: source.to_path_buf(),
        ..Settings::default()
    }
}

/// Run a full session over `input`, returning everything written.
fn run_session(settings: &Settings, input: &str) -> String {
    testing::init_test_setup();
    colored::control::set_override(false);
    let service = CatalogService::new(Arc::new(RealFileSystem), settings).unwrap();
    let mut session = Session::new(service, settings, Cursor::new(input.to_string()), Vec::new());
    session.run().expect("session runs");
    String::from_utf8(session.into_output()).unwrap()
}

fn sample_source(dir: &TempDir) -> Settings {
    let path = dir.path().join("courses.csv");
    fs::write(&path, SAMPLE).unwrap();
    settings_for(&path)
}

#[test]
fn given_menu_when_shown_then_lists_every_choice() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "9\n");

    for choice in MenuChoice::ALL {
        assert!(out.contains(choice.label()), "missing {}", choice.label());
    }
    assert!(out.contains("Thank you for using the Course Catalog!"));
}

#[test]
fn given_no_load_when_displaying_then_asks_to_load_first() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "2\n9\n");

    assert!(out.contains("Load courses first."));
}

#[test]
fn given_load_when_displaying_in_order_then_sorted_courses() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n2\n9\n");

    assert!(out.contains("2 courses loaded."));
    let csci = out
        .find("CSCI101, Introduction to Programming in C++")
        .expect("CSCI101 listed");
    let math = out.find("MATH201, Discrete Mathematics").expect("MATH201 listed");
    assert!(csci < math);
}

#[test]
fn given_loaded_when_loading_again_then_already_loaded() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n1\n9\n");

    assert!(out.contains("Courses already loaded."));
}

#[test]
fn given_lowercase_id_when_finding_then_prints_course_and_prerequisites() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n3\ncsci101\n9\n");

    assert!(out.contains("CSCI101, Introduction to Programming in C++"));
    assert!(out.contains("Prerequisites: CSCI100"));
}

#[test]
fn given_course_without_prerequisites_when_finding_then_none() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n3\nMATH201\n9\n");

    assert!(out.contains("Prerequisites: none"));
}

#[test]
fn given_unknown_id_when_finding_then_not_found() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n3\nXYZ999\n9\n");

    assert!(out.contains("Course not found."));
}

#[test]
fn given_loaded_when_deleting_then_course_gone() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n4\nmath201\ny\n3\nMATH201\n9\n");

    assert!(out.contains("Are you sure you want to delete MATH201? (y/n):"));
    assert!(out.contains("Deleted MATH201"));
    assert!(out.contains("Course not found."));
}

#[test]
fn given_declined_confirmation_when_deleting_then_course_kept() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n4\nMATH201\nn\n3\nMATH201\n9\n");

    assert!(out.contains("Deletion canceled."));
    assert!(!out.contains("Deleted MATH201"));
    assert!(out.contains("Prerequisites: none"));
}

#[test]
fn given_unknown_id_when_deleting_then_not_found_without_confirmation() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n4\nXYZ999\n9\n");

    assert!(out.contains("Course not found."));
    assert!(!out.contains("Are you sure"));
}

#[test]
fn given_partial_id_when_finding_then_lists_matches_ascending() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("courses.csv");
    fs::write(
        &path,
        "CSCI200, Data Structures\nMATH201, Discrete Mathematics\nCSCI101, Intro\n",
    )
    .unwrap();
    let out = run_session(&settings_for(&path), "1\n3\ncsci\n9\n");

    assert!(out.contains("2 courses matching CSCI:"));
    let intro = out.find("CSCI101, Intro").expect("CSCI101 listed");
    let structures = out.find("CSCI200, Data Structures").expect("CSCI200 listed");
    assert!(intro < structures);
    assert!(!out.contains("MATH201, Discrete Mathematics"));
}

#[test]
fn given_exact_id_when_finding_then_no_partial_listing() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n3\nMATH201\n9\n");

    assert!(out.contains("MATH201, Discrete Mathematics"));
    assert!(!out.contains("courses matching"));
}

#[test]
fn given_name_with_delimiter_when_adding_then_rejected() {
    let dir = TempDir::new().unwrap();
    let input = "8\nCSCI300\nAlgorithms, Part 1\n\n3\nCSCI300\n9\n";
    let out = run_session(&sample_source(&dir), input);

    assert!(out.contains("error: invalid course:"));
    assert!(out.contains("Course not found."));
}

#[test]
fn given_invalid_selection_when_entered_then_reported_and_menu_repeats() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "abc\n42\n9\n");

    assert!(out.contains("error: invalid menu selection: \"abc\""));
    assert!(out.contains("error: invalid menu selection: \"42\""));
    assert_eq!(out.matches("Menu:").count(), 3);
}

#[test]
fn given_end_of_input_when_waiting_for_choice_then_exits() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n");

    assert!(out.contains("2 courses loaded."));
    assert!(out.contains("Thank you for using the Course Catalog!"));
}

#[test]
fn given_missing_source_when_loading_then_error_and_session_continues() {
    let dir = TempDir::new().unwrap();
    let settings = settings_for(&dir.path().join("missing.csv"));
    let out = run_session(&settings, "1\n2\n9\n");

    assert!(out.contains("could not open catalog source"));
    assert!(out.contains("Load courses first."));
    assert!(out.contains("Thank you for using the Course Catalog!"));
}

#[test]
fn given_malformed_line_when_loading_then_warning_shown() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("courses.csv");
    fs::write(&path, "CSCI101, Intro\nBADLINE\n").unwrap();
    let out = run_session(&settings_for(&path), "1\n9\n");

    assert!(out.contains("Warning: malformed record on line 2"));
    assert!(out.contains("1 courses loaded."));
}

#[test]
fn given_toggle_when_selected_twice_then_on_then_off() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "7\n7\n9\n");

    let on = out.find("Diagnostics ON").expect("toggled on");
    let off = out.find("Diagnostics OFF").expect("toggled off");
    assert!(on < off);
}

#[test]
fn given_new_course_when_adding_then_findable() {
    let dir = TempDir::new().unwrap();
    let out = run_session(
        &sample_source(&dir),
        "8\ncsci300\nAlgorithms\ncsci200, math201\n3\nCSCI300\n9\n",
    );

    assert!(out.contains("Added CSCI300, Algorithms"));
    assert!(out.contains("Prerequisites: CSCI200, MATH201"));
}

#[test]
fn given_existing_course_when_adding_then_rejected() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n8\nmath201\n9\n");

    assert!(out.contains("Course MATH201 already exists."));
}

#[test]
fn given_loaded_when_showing_structure_then_header_and_tree() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "1\n11\n9\n");

    assert!(out.contains("2 courses, height 2"));
    assert!(out.contains("CSCI101"));
}

#[test]
fn given_loaded_when_saving_then_file_written() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("saved.csv");
    let input = format!("1\n12\n{}\n9\n", target.display());
    let out = run_session(&sample_source(&dir), &input);

    assert!(out.contains("Saved 2 courses to"));
    let content = fs::read_to_string(&target).unwrap();
    assert_eq!(
        content,
        "CSCI101, Introduction to Programming in C++, CSCI100\nMATH201, Discrete Mathematics\n"
    );
}

#[test]
fn given_empty_target_when_saving_then_cancelled() {
    let dir = TempDir::new().unwrap();
    let out = run_session(&sample_source(&dir), "12\n\n9\n");

    assert!(out.contains("Save cancelled."));
}

#[test]
fn given_loaded_when_displaying_level_order_then_root_first() {
    let dir = TempDir::new().unwrap();
    let settings = sample_source(&dir);
    testing::init_test_setup();
    colored::control::set_override(false);
    let service = CatalogService::new(Arc::new(RealFileSystem), &settings).unwrap();
    let mut session = Session::new(service, &settings, Cursor::new(String::new()), Vec::new());

    session.load().unwrap();
    session.dispatch(MenuChoice::DisplayLevelOrder).unwrap();

    let root = session.catalog().iter_preorder().next().unwrap().id.to_string();
    let out = String::from_utf8(session.into_output()).unwrap();
    let listing = out.split("courses loaded.").nth(1).unwrap();
    assert!(listing.trim_start().starts_with(&root));
}
