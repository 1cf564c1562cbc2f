//! Materialize the gadget source tree
//!
//! For every gadget this creates `<root>/<category>/<gadget>/` and one stub
//! per `code` entry. Existing files are never overwritten, so re-running
//! only fills in what is missing.

use crate::definition::{LoadedDefinition, DEFINITION_FILE_NAME};
use crate::paths;
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Progress reported while scaffolding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldEvent<'a> {
    /// The definition copy was (re)written
    DefinitionWritten(&'a Path),
    /// Processing of a category started
    Category(&'a str),
    /// A stub file was created
    Created(&'a Path),
    /// A file was already present and left untouched
    Exists(&'a Path),
}

/// What happened to a single gadget file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Created,
    Exists,
}

#[derive(Debug, Clone)]
pub struct ScaffoldedFile {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// Summary of a scaffold run
#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    pub definition_path: PathBuf,
    pub files: Vec<ScaffoldedFile>,
}

impl ScaffoldReport {
    pub fn created(&self) -> usize {
        self.count(FileOutcome::Created)
    }

    pub fn existing(&self) -> usize {
        self.count(FileOutcome::Exists)
    }

    fn count(&self, outcome: FileOutcome) -> usize {
        self.files.iter().filter(|f| f.outcome == outcome).count()
    }
}

/// Writes the gadget tree under a root directory
#[derive(Debug, Clone)]
pub struct Scaffolder {
    root: PathBuf,
}

impl Scaffolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a gadget's files
    pub fn gadget_dir(&self, category: &str, gadget: &str) -> PathBuf {
        gadget_dir(&self.root, category, gadget)
    }

    /// Path of the definition copy under the root
    pub fn definition_path(&self) -> PathBuf {
        self.root.join(DEFINITION_FILE_NAME)
    }

    /// Write the raw definition text, replacing any previous copy
    pub fn write_definition(&self, text: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create directory: {}", self.root.display()))?;

        let path = self.definition_path();
        fs::write(&path, text)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        Ok(path)
    }

    /// Write the definition copy, then every gadget directory and missing file
    pub fn scaffold<F>(&self, loaded: &LoadedDefinition, mut on_event: F) -> Result<ScaffoldReport>
    where
        F: FnMut(ScaffoldEvent<'_>),
    {
        let definition_path = self.write_definition(&loaded.text)?;
        on_event(ScaffoldEvent::DefinitionWritten(&definition_path));

        let mut report = ScaffoldReport {
            definition_path,
            files: Vec::new(),
        };

        for category in &loaded.definition.gadgets {
            on_event(ScaffoldEvent::Category(&category.name));

            for entry in &category.gadgets {
                let dir = self.gadget_dir(&category.name, &entry.name);
                fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

                for filename in &entry.gadget.code {
                    let file = ensure_file(&dir, filename, &entry.name)?;
                    on_event(match file.outcome {
                        FileOutcome::Created => ScaffoldEvent::Created(&file.path),
                        FileOutcome::Exists => ScaffoldEvent::Exists(&file.path),
                    });
                    report.files.push(file);
                }
            }
        }

        Ok(report)
    }
}

/// Directory holding a gadget's files under `root`
pub fn gadget_dir(root: &Path, category: &str, gadget: &str) -> PathBuf {
    root.join(category).join(gadget)
}

/// Create a stub for `filename` in `dir` unless something is already there
fn ensure_file(dir: &Path, filename: &str, gadget_name: &str) -> Result<ScaffoldedFile> {
    let final_name = paths::final_filename(filename);
    let path = dir.join(&final_name);

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Ok(ScaffoldedFile {
                path,
                outcome: FileOutcome::Exists,
            });
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create file: {}", path.display()));
        }
    };

    file.write_all(paths::stub_contents(&final_name, gadget_name).as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(ScaffoldedFile {
        path,
        outcome: FileOutcome::Created,
    })
}
