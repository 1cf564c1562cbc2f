//! Workspace selection, presence checks and load order
//!
//! The `workspace` block picks which gadgets are active. Active gadgets are
//! checked against the scaffolded tree, and those that pass are ordered so
//! that every gadget comes after the gadgets it `requires`.

use crate::definition::{Gadget, GadgetsDefinition, Workspace};
use crate::paths;
use crate::scaffold::gadget_dir;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a gadget across categories: `<category>/<gadget>`
pub fn gadget_id(category: &str, name: &str) -> String {
    format!("{}/{}", category, name)
}

impl Workspace {
    /// Whether the gadget with `id` is active under this workspace.
    ///
    /// Fails when the gadget's `disabled` value is not a boolean.
    pub fn is_selected(&self, id: &str, gadget: &Gadget) -> Result<bool, String> {
        if gadget.is_disabled()? {
            return Ok(false);
        }
        Ok(if self.enable_all {
            !self.disable.iter().any(|d| d == id)
        } else {
            self.enable.iter().any(|e| e == id)
        })
    }
}

/// A gadget picked by the workspace block
#[derive(Debug, Clone)]
pub struct SelectedGadget<'a> {
    pub category: &'a str,
    pub name: &'a str,
    pub gadget: &'a Gadget,
    /// Decoded `requires` list
    pub requires: Vec<String>,
}

impl SelectedGadget<'_> {
    pub fn id(&self) -> String {
        gadget_id(self.category, self.name)
    }
}

/// Active gadgets, plus the gadgets whose selection fields could not be read
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    pub gadgets: Vec<SelectedGadget<'a>>,
    pub problems: Vec<Problem>,
}

/// Active gadgets, in document order
pub fn select(definition: &GadgetsDefinition) -> Selection<'_> {
    let mut selection = Selection::default();

    let workspace = match definition.workspace() {
        Ok(workspace) => workspace,
        Err(message) => {
            selection.problems.push(Problem::InvalidWorkspace { message });
            return selection;
        }
    };

    for (category, entry) in definition.entries() {
        let id = gadget_id(&category.name, &entry.name);
        let requires = workspace
            .is_selected(&id, &entry.gadget)
            .and_then(|selected| {
                if selected {
                    entry.gadget.requires().map(Some)
                } else {
                    Ok(None)
                }
            });

        match requires {
            Ok(Some(requires)) => selection.gadgets.push(SelectedGadget {
                category: &category.name,
                name: &entry.name,
                gadget: &entry.gadget,
                requires,
            }),
            Ok(None) => {}
            Err(message) => selection.problems.push(Problem::InvalidField { id, message }),
        }
    }

    selection
}

/// Why a gadget was left out of the load order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    InvalidWorkspace { message: String },
    InvalidField { id: String, message: String },
    MissingDirectory { id: String, path: PathBuf },
    MissingFiles { id: String, files: Vec<String> },
    UnresolvedDependencies { id: String, requires: Vec<String> },
}

impl Problem {
    pub fn id(&self) -> &str {
        match self {
            Problem::InvalidWorkspace { .. } => "workspace",
            Problem::InvalidField { id, .. }
            | Problem::MissingDirectory { id, .. }
            | Problem::MissingFiles { id, .. }
            | Problem::UnresolvedDependencies { id, .. } => id,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::InvalidWorkspace { message } => write!(f, "workspace\t{}", message),
            Problem::InvalidField { id, message } => write!(f, "{}\t{}", id, message),
            Problem::MissingDirectory { id, path } => {
                write!(f, "{}\tDirectory not found: {}", id, path.display())
            }
            Problem::MissingFiles { id, files } => {
                write!(f, "{}: MISSING {}", id, files.join(", "))
            }
            Problem::UnresolvedDependencies { id, requires } => {
                write!(f, "{}\tRequires: {}", id, requires.join(", "))
            }
        }
    }
}

/// Result of checking the workspace against a scaffold root
#[derive(Debug, Clone)]
pub struct CheckReport<'a> {
    /// Gadgets ready to load, dependencies first
    pub load_order: Vec<SelectedGadget<'a>>,
    pub problems: Vec<Problem>,
}

impl CheckReport<'_> {
    pub fn is_ok(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Check the selected gadgets against the files under `root`
pub fn check<'a>(definition: &'a GadgetsDefinition, root: &Path) -> CheckReport<'a> {
    let Selection {
        gadgets,
        mut problems,
    } = select(definition);
    let mut present = Vec::new();

    for selected in gadgets {
        let dir = gadget_dir(root, selected.category, selected.name);
        if !dir.is_dir() {
            problems.push(Problem::MissingDirectory {
                id: selected.id(),
                path: dir,
            });
            continue;
        }

        let missing: Vec<String> = selected
            .gadget
            .code
            .iter()
            .map(|f| paths::final_filename(f))
            .filter(|f| !dir.join(f).is_file())
            .collect();
        if !missing.is_empty() {
            problems.push(Problem::MissingFiles {
                id: selected.id(),
                files: missing,
            });
            continue;
        }

        present.push(selected);
    }

    let (load_order, unresolved) = load_order(present);
    problems.extend(unresolved);

    CheckReport {
        load_order,
        problems,
    }
}

/// Order gadgets so each one follows everything it requires.
///
/// Gadgets are taken in rounds: a round takes every remaining gadget whose
/// requirements were all taken in earlier rounds. A round that takes nothing
/// ends the ordering and the rest are reported as unresolved.
pub fn load_order(
    mut pending: Vec<SelectedGadget<'_>>,
) -> (Vec<SelectedGadget<'_>>, Vec<Problem>) {
    let mut loaded: HashSet<String> = HashSet::new();
    let mut ordered = Vec::new();

    while !pending.is_empty() {
        let (ready, rest): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|g| g.requires.iter().all(|r| loaded.contains(r)));

        if ready.is_empty() {
            let problems = rest
                .iter()
                .map(|g| Problem::UnresolvedDependencies {
                    id: g.id(),
                    requires: g
                        .requires
                        .iter()
                        .filter(|r| !loaded.contains(*r))
                        .cloned()
                        .collect(),
                })
                .collect();
            return (ordered, problems);
        }

        loaded.extend(ready.iter().map(|g| g.id()));
        ordered.extend(ready);
        pending = rest;
    }

    (ordered, Vec::new())
}
