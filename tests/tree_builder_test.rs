//! Tests for directory enumeration and document rendering.

use std::fs;

use tempfile::TempDir;

use specview::tree::{self, TreeError};

#[test]
fn builds_tree_with_directories_first_then_alphabetical() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(root.join("b.md"), "# b").unwrap();
    fs::write(root.join("a.md"), "# a").unwrap();
    fs::create_dir(root.join("zeta")).unwrap();
    fs::write(root.join("zeta/c.md"), "# c").unwrap();
    fs::create_dir(root.join("alpha")).unwrap();

    let tree = tree::build_tree(root, "md").unwrap();

    assert!(tree.is_dir);
    let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "zeta", "a.md", "b.md"]);

    let zeta = &tree.children[1];
    assert_eq!(zeta.children.len(), 1);
    assert_eq!(zeta.children[0].name, "c.md");
}

#[test]
fn hidden_entries_and_foreign_extensions_are_excluded() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::write(root.join("doc.md"), "# doc").unwrap();
    fs::write(root.join("notes.txt"), "skip me").unwrap();
    fs::write(root.join(".hidden.md"), "# hidden").unwrap();
    fs::create_dir(root.join(".git")).unwrap();
    fs::write(root.join(".git/x.md"), "# vcs").unwrap();

    let tree = tree::build_tree(root, "md").unwrap();

    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].name, "doc.md");
}

#[test]
fn document_leaves_carry_rendered_html() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("doc.md"), "# Title\n\n- [x] done\n").unwrap();

    let tree = tree::build_tree(root, "md").unwrap();
    let leaf = &tree.children[0];
    assert!(!leaf.is_dir);

    let file = leaf.file.as_ref().unwrap();
    assert_eq!(file.name, "doc.md");
    assert!(file.content.starts_with("# Title"));
    assert!(file.html_body.contains("<h1>Title</h1>"));
}

#[test]
fn build_trees_covers_multiple_roots() {
    let dir1 = TempDir::new().unwrap();
    let dir2 = TempDir::new().unwrap();
    fs::write(dir1.path().join("one.md"), "# one").unwrap();
    fs::write(dir2.path().join("two.md"), "# two").unwrap();

    let roots = vec![dir1.path().to_path_buf(), dir2.path().to_path_buf()];
    let trees = tree::build_trees(&roots, "md").unwrap();

    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].children[0].name, "one.md");
    assert_eq!(trees[1].children[0].name, "two.md");
}

#[test]
fn missing_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = tree::build_tree(&missing, "md").unwrap_err();
    assert!(matches!(err, TreeError::ReadDir { .. }), "{err}");
}

#[test]
fn render_document_reads_and_converts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("spec.md");
    fs::write(&path, "| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();

    let doc = tree::render_document(&path).unwrap();
    assert_eq!(doc.name, "spec.md");
    assert!(!doc.is_dir);
    assert!(doc.html_body.contains("<table>"));
}

#[test]
fn render_document_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = tree::render_document(&dir.path().join("gone.md")).unwrap_err();
    assert!(matches!(err, TreeError::ReadFile { .. }), "{err}");
}

#[test]
fn tree_serializes_with_wire_field_names() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("doc.md"), "# doc").unwrap();
    fs::create_dir(root.join("empty")).unwrap();

    let tree = tree::build_tree(root, "md").unwrap();
    let json = serde_json::to_value(&tree).unwrap();

    let leaf = &json["children"][1];
    assert_eq!(leaf["is_dir"], false);
    assert!(leaf["file"]["html_body"].as_str().unwrap().contains("<h1>"));

    // Empty directories omit the children/file keys entirely
    let empty = &json["children"][0];
    assert_eq!(empty["name"], "empty");
    assert!(empty.get("children").is_none());
    assert!(empty.get("file").is_none());
}
