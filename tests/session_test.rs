//! Tests for interactive and scripted sessions

use std::fs;
use std::io::{BufRead, BufReader, Cursor};

use tempfile::TempDir;

use dirtree::cli::session::{Flow, Session, GOODBYE, WELCOME};
use dirtree::config::Settings;
use dirtree::domain::CollisionPolicy;
use dirtree::infrastructure::ServiceContainer;
use dirtree::util::testing;

fn container(settings: Settings) -> ServiceContainer {
    testing::init_test_setup();
    ServiceContainer::new(settings)
}

fn interact(container: &mut ServiceContainer, input: &str) -> String {
    let mut session = Session::new(container, Vec::new());
    session.interact(Cursor::new(input)).unwrap();
    String::from_utf8(session.into_inner()).unwrap()
}

fn replay(container: &mut ServiceContainer, script: &str) -> String {
    replay_reader(container, Cursor::new(script))
}

fn replay_reader(container: &mut ServiceContainer, input: impl BufRead) -> String {
    let mut session = Session::new(container, Vec::new());
    session.replay(input).unwrap();
    String::from_utf8(session.into_inner()).unwrap()
}

#[test]
fn given_commands_when_interacting_then_lists_tree_between_banners() {
    let mut container = container(Settings::default());

    let output = interact(
        &mut container,
        "CREATE fruits\nCREATE fruits/apples\ncreate vegetables\nLIST\nx\n",
    );

    assert!(output.starts_with(WELCOME));
    assert!(output.contains("Enter 'x' to quit"));
    assert!(output.contains("fruits\n  apples\nvegetables\n"));
    assert!(output.trim_end().ends_with(GOODBYE));
}

#[test]
fn given_quit_token_when_interacting_then_ignores_remaining_lines() {
    let mut container = container(Settings::default());

    interact(&mut container, "CREATE a\nx\nCREATE b\n");

    assert!(container.tree.resolve("a").is_ok());
    assert!(container.tree.resolve("b").is_err());
}

#[test]
fn given_end_of_input_when_interacting_then_says_goodbye() {
    let mut container = container(Settings::default());

    let output = interact(&mut container, "CREATE a");

    assert!(container.tree.resolve("a").is_ok());
    assert!(output.trim_end().ends_with(GOODBYE));
}

#[test]
fn given_failing_commands_when_interacting_then_reports_and_continues() {
    let mut container = container(Settings::default());

    let output = interact(
        &mut container,
        "DELETE nope\nMOVE a\nfly away\n\nCREATE a\nx\n",
    );

    assert!(output.contains("Cannot delete nope - nope does not exist"));
    assert!(output.contains("Invalid number of parameters for MOVE"));
    assert!(output.contains("Syntax: MOVE <existing-sourcefolder> <existing-targetfolder>"));
    assert!(output.contains("Invalid Command: FLY"));
    assert!(output.contains("Valid Commands are:"));
    assert!(output.contains("CREATE - Create a new folder - CREATE <new-folder>"));
    assert!(output.contains("Command cannot be empty"));
    assert!(container.tree.resolve("a").is_ok());
}

#[test]
fn given_custom_quit_token_and_prompt_when_interacting_then_uses_them() {
    let settings = Settings {
        quit_token: "quit".into(),
        prompt: "> ".into(),
        ..Settings::default()
    };
    let mut container = container(settings);

    let output = interact(&mut container, "x\nquit\n");

    assert!(output.contains("Enter 'quit' to quit"));
    assert!(output.contains("Invalid Command: X"));
    assert!(output.contains("> "));
}

#[test]
fn given_verbose_when_executing_then_reports_success() {
    let settings = Settings {
        verbose: true,
        ..Settings::default()
    };
    let mut container = container(settings);

    let output = replay(&mut container, "CREATE a\nCREATE b\nMOVE b a\nDELETE a/b\n");

    assert!(output.contains("created a"));
    assert!(output.contains("moved b to a"));
    assert!(output.contains("deleted a/b"));
}

#[test]
fn given_collision_when_moving_then_warns() {
    let settings = Settings {
        collision: CollisionPolicy::Reject,
        ..Settings::default()
    };
    let mut container = container(settings);

    let output = replay(
        &mut container,
        "CREATE a\nCREATE a/b\nCREATE x\nCREATE x/b\nMOVE a/b x\n",
    );

    assert!(output.contains("x already contains b, a/b left in place"));
    assert!(container.tree.resolve("a/b").is_ok());
}

#[test]
fn given_script_when_replaying_then_echoes_and_skips_comments() {
    let mut container = container(Settings::default());

    let output = replay(
        &mut container,
        "# set up\nCREATE a\n\nCREATE a/b\nLIST\nx\nCREATE never\n",
    );

    assert!(output.contains("> CREATE a\n"));
    assert!(!output.contains("set up"));
    assert!(output.contains("a\n  b\n"));
    assert!(!output.contains(WELCOME));
    assert!(container.tree.resolve("never").is_err());
}

#[test]
fn given_script_file_when_replaying_then_builds_tree() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("setup.txt");
    fs::write(&path, "CREATE docs\nCREATE docs/Notes\nMOVE docs/notes /\nLIST\n").unwrap();
    let mut container = container(Settings::default());

    let file = fs::File::open(&path).unwrap();
    let output = replay_reader(&mut container, BufReader::new(file));

    assert!(container.tree.resolve("/notes").is_ok());
    assert!(container.tree.resolve("docs").unwrap().is_empty());
    assert!(output.ends_with("docs\nnotes\n"));
}

#[test]
fn given_single_line_when_executing_then_reports_flow() {
    let mut container = container(Settings::default());
    let mut session = Session::new(&mut container, Vec::new());

    assert_eq!(session.execute_line("CREATE a").unwrap(), Flow::Continue);
    assert_eq!(session.execute_line("  x  ").unwrap(), Flow::Quit);
}
