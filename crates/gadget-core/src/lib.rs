//! Gadget Core - scaffolding for wiki gadget source trees
//!
//! Reads a gadgets definition (categories of gadgets, each listing its
//! script and style files) and creates `<root>/<category>/<gadget>/` with a
//! stub for every listed file. Existing files are never overwritten, so the
//! scaffold can be re-run at any time to fill in what is missing.
//!
//! # Modules
//!
//! - [`definition`]: document types, the embedded definition, and loading
//! - [`paths`]: extension remapping and stub contents
//! - [`scaffold`]: the directory and file writer
//! - [`check`]: workspace selection, presence checks and load order
//! - [`config`]: scaffold root resolution
//!
//! # Example
//!
//! ```ignore
//! use gadget_core::{DefinitionSource, Scaffolder};
//!
//! let loaded = DefinitionSource::Embedded.load()?;
//! let report = Scaffolder::new("src/gadgets").scaffold(&loaded, |_| {})?;
//! println!("{} files created", report.created());
//! ```

pub mod check;
pub mod config;
pub mod definition;
pub mod error;
pub mod paths;
pub mod scaffold;

// Re-export main types for convenience
pub use check::{check, gadget_id, select, CheckReport, Problem, SelectedGadget, Selection};
pub use config::resolve_root;
pub use definition::{
    Category, DefinitionSource, Gadget, GadgetEntry, GadgetsDefinition, LoadedDefinition,
    Workspace, DEFINITION_FILE_NAME, EMBEDDED_DEFINITION,
};
pub use error::DefinitionError;
pub use scaffold::{FileOutcome, ScaffoldEvent, ScaffoldReport, Scaffolder};
