//! Gadget tools - scaffolding for Utaite Wiki gadget sources

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use gadget_core::{
    check, gadget_id, resolve_root, CheckReport, DefinitionSource, GadgetsDefinition,
    LoadedDefinition, ScaffoldEvent, Scaffolder,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gadget-tools")]
#[command(about = "CLI for scaffolding Utaite Wiki gadget sources")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create gadget directories and stub files (default)
    Scaffold(ScaffoldArgs),
    /// Check that every active gadget has its files and resolvable dependencies
    Check(ScaffoldArgs),
    /// List categories and gadgets from the definition
    List(DefinitionArgs),
}

#[derive(ClapArgs, Debug, Default)]
pub struct DefinitionArgs {
    /// Gadgets definition YAML to use instead of the bundled one
    #[arg(long)]
    pub definition: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ScaffoldArgs {
    /// Directory to scaffold into (defaults to $GADGETS_ROOT, then src/gadgets)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub definition: DefinitionArgs,
}

fn load(args: &DefinitionArgs) -> Result<LoadedDefinition> {
    let source = DefinitionSource::from_option(args.definition.clone());
    source.load().context("Failed to load gadgets definition")
}

fn run_scaffold(args: ScaffoldArgs) -> Result<()> {
    println!("{}", "Scaffolding Utaite Wiki Interface Code...".cyan().bold());

    let loaded = load(&args.definition)?;
    let scaffolder = Scaffolder::new(resolve_root(args.root));

    let report = scaffolder.scaffold(&loaded, |event| match event {
        ScaffoldEvent::DefinitionWritten(path) => {
            println!("{} Definition file: {}", "[CREATED]".green(), path.display());
        }
        ScaffoldEvent::Category(name) => {
            println!();
            println!("Processing Category: {}", name.bold());
        }
        ScaffoldEvent::Created(path) => {
            println!("  {} {}", "+ Created:".green(), path.display());
        }
        ScaffoldEvent::Exists(path) => {
            println!("  {}  {}", "- Exists:".dimmed(), path.display());
        }
    })?;

    println!();
    println!(
        "{} {} created, {} already present in {}",
        "Done!".green().bold(),
        report.created(),
        report.existing(),
        scaffolder.root().display()
    );

    Ok(())
}

fn run_check(args: ScaffoldArgs) -> Result<()> {
    let loaded = load(&args.definition)?;
    let root = resolve_root(args.root);
    let report = check(&loaded.definition, &root);

    println!(
        "{}",
        format!("Load order ({} gadgets):", report.load_order.len())
            .cyan()
            .bold()
    );
    for selected in &report.load_order {
        println!("  {} {}", "->".blue(), selected.id());
    }

    if report.is_ok() {
        println!();
        println!("{} All active gadgets are ready.", "OK".green().bold());
    } else {
        eprintln!();
        eprintln!(
            "{} The following gadgets will not be loaded:",
            "Warning:".yellow()
        );
        for problem in &report.problems {
            eprintln!("  - {}", problem);
        }
    }

    check_outcome(&report, &root)
}

/// Exit status of `check`: an error whenever a gadget was left out
fn check_outcome(report: &CheckReport<'_>, root: &Path) -> Result<()> {
    if report.is_ok() {
        return Ok(());
    }
    anyhow::bail!(
        "{} gadget(s) have problems under {}",
        report.problems.len(),
        root.display()
    )
}

/// One gadget in `list` output
#[derive(Debug, Clone, PartialEq)]
struct ListRow {
    category: String,
    id: String,
    files: usize,
    selected: bool,
    description: Option<String>,
}

/// Gadgets in document order; nothing is selected if the workspace block is unreadable
fn list_rows(definition: &GadgetsDefinition) -> Vec<ListRow> {
    let workspace = definition.workspace().unwrap_or_default();
    definition
        .entries()
        .map(|(category, entry)| {
            let id = gadget_id(&category.name, &entry.name);
            ListRow {
                category: category.name.clone(),
                selected: workspace.is_selected(&id, &entry.gadget).unwrap_or(false),
                id,
                files: entry.gadget.code.len(),
                description: entry.gadget.description(),
            }
        })
        .collect()
}

fn run_list(args: DefinitionArgs) -> Result<()> {
    let loaded = load(&args)?;
    let definition = &loaded.definition;

    if let Err(message) = definition.workspace() {
        eprintln!("{} {}", "Warning:".yellow(), message);
    }

    let rows = list_rows(definition);
    let mut current: Option<&str> = None;
    for row in &rows {
        if current != Some(row.category.as_str()) {
            println!("{}", row.category.cyan().bold());
            current = Some(row.category.as_str());
        }
        let marker = if row.selected {
            "*".green()
        } else {
            " ".normal()
        };
        println!(
            "  {} {} ({} files){}",
            marker,
            row.id,
            row.files,
            row.description
                .as_deref()
                .map(|d| format!(" - {}", d.dimmed()))
                .unwrap_or_default()
        );
    }

    println!();
    println!(
        "{} gadgets, {} files ({} marks gadgets active in the workspace)",
        rows.len(),
        definition.file_count(),
        "*".green()
    );

    Ok(())
}

fn main() -> Result<()> {
    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();

    match args.command {
        Some(Command::Scaffold(scaffold_args)) => run_scaffold(scaffold_args),
        Some(Command::Check(check_args)) => run_check(check_args),
        Some(Command::List(list_args)) => run_list(list_args),
        // No subcommand provided, default to scaffolding with the bundled definition
        None => run_scaffold(ScaffoldArgs::default()),
    }
}
