//! Tree builder: enumerate document directories and render documents.
//!
//! Pure, stateless transforms invoked on demand by the HTTP handlers and
//! the WebSocket adapter. Walks a root directory into an ordered tree
//! (directories first, then documents, both alphabetical), skipping hidden
//! entries and files that are not recognized documents.

mod render;

pub use render::markdown_to_html;

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Errors from tree building and document rendering.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("Cannot read directory {path}: {reason}")]
    ReadDir { path: PathBuf, reason: String },

    #[error("Cannot read document {path}: {reason}")]
    ReadFile { path: PathBuf, reason: String },
}

/// A rendered document: raw markdown plus its HTML body.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub path: PathBuf,
    pub name: String,
    pub content: String,
    pub html_body: String,
    pub is_dir: bool,
}

/// One node of the document tree: a directory with children, or a
/// document leaf carrying its rendered file.
#[derive(Debug, Clone, Serialize)]
pub struct DocTree {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Document>,
}

/// Build the document tree for a single root directory.
pub fn build_tree(root: &Path, extension: &str) -> Result<DocTree, TreeError> {
    let mut node = DocTree {
        name: file_name(root),
        path: root.to_path_buf(),
        is_dir: true,
        children: Vec::new(),
        file: None,
    };
    walk_dir(root, extension, &mut node)?;
    Ok(node)
}

/// Build trees for several independent roots.
pub fn build_trees(roots: &[PathBuf], extension: &str) -> Result<Vec<DocTree>, TreeError> {
    roots.iter().map(|r| build_tree(r, extension)).collect()
}

/// Read and render a single document.
pub fn render_document(path: &Path) -> Result<Document, TreeError> {
    let content = std::fs::read_to_string(path).map_err(|e| TreeError::ReadFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let html_body = markdown_to_html(&content);

    Ok(Document {
        path: path.to_path_buf(),
        name: file_name(path),
        content,
        html_body,
        is_dir: false,
    })
}

fn walk_dir(dir: &Path, extension: &str, node: &mut DocTree) -> Result<(), TreeError> {
    let entries = std::fs::read_dir(dir).map_err(|e| TreeError::ReadDir {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| TreeError::ReadDir {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let name = entry.file_name();
        if name.to_str().is_some_and(|n| n.starts_with('.')) {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            let mut child = DocTree {
                name: name.to_string_lossy().into_owned(),
                path: path.clone(),
                is_dir: true,
                children: Vec::new(),
                file: None,
            };
            walk_dir(&path, extension, &mut child)?;
            node.children.push(child);
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            let file = render_document(&path)?;
            node.children.push(DocTree {
                name: name.to_string_lossy().into_owned(),
                path,
                is_dir: false,
                children: Vec::new(),
                file: Some(file),
            });
        }
    }

    // Directories first, then alphabetical within each group
    node.children
        .sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
