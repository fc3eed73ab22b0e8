//! pdp CLI: scaffold and run a recursive tree of tasks.
//!
//! Every command except `init` resolves the project root by walking up from
//! the working directory to the nearest `pdp.yml`, then rehydrates the tree
//! from the descriptors on disk.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use pdp::core::locate::{current_node, current_path, node_at_mut};
use pdp::core::render::{enumerate_preorder, render_tree};
use pdp::exit_codes;
use pdp::io::project::{find_project_root, init_project, load_project, validate_project};
use pdp::io::run::run_node;
use pdp::io::scaffold::create_child;
use pdp::tree::Node;

#[derive(Parser)]
#[command(
    name = "pdp",
    version,
    about = "Project scaffolding and recursive task runner"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `pdp.yml` in the current directory.
    Init {
        /// Project name recorded in the root descriptor.
        #[arg(long)]
        name: Option<String>,
    },
    /// Create tasks under the task (or project root) owning the current directory.
    Create {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Materialize directories and descriptors for the whole tree.
    Scaffold,
    /// Check every descriptor for structural validity.
    Validate,
    /// Run a task by name, or the task owning the current directory.
    Run { task: Option<String> },
    /// Print the numbered task tree.
    Tree,
}

fn main() {
    pdp::logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILURE);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { name } => cmd_init(name.as_deref()),
        Command::Create { names } => cmd_create(&names),
        Command::Scaffold => cmd_scaffold(),
        Command::Validate => cmd_validate(),
        Command::Run { task } => cmd_run(task.as_deref()),
        Command::Tree => cmd_tree(),
    }
}

fn cmd_init(name: Option<&str>) -> Result<i32> {
    let cwd = working_dir()?;
    init_project(&cwd, name)?;
    println!("initialized project in {}", cwd.display());
    Ok(exit_codes::OK)
}

fn cmd_create(names: &[String]) -> Result<i32> {
    let cwd = working_dir()?;
    let mut root = open_project(&cwd)?;
    let path = current_path(&root, &cwd).ok_or_else(|| {
        anyhow!(
            "Cannot create task from {}: not the project root or an existing task",
            cwd.display()
        )
    })?;
    let node = node_at_mut(&mut root, &path)
        .ok_or_else(|| anyhow!("current task no longer resolves"))?;
    for name in names {
        create_child(node, name)?;
        println!("created task '{name}'");
    }
    Ok(exit_codes::OK)
}

fn cmd_scaffold() -> Result<i32> {
    let cwd = working_dir()?;
    let root = open_project(&cwd)?;
    let mut count = 0;
    enumerate_preorder(&root, &mut count, &mut |_, _| {});
    println!("scaffolded {count} nodes under {}", root.dir.display());
    Ok(exit_codes::OK)
}

fn cmd_validate() -> Result<i32> {
    let cwd = working_dir()?;
    let Some(root_dir) = find_project_root(&cwd) else {
        eprintln!("project is not initialized (no pdp.yml found)");
        return Ok(exit_codes::FAILURE);
    };
    let invalid = validate_project(&root_dir);
    if invalid.is_empty() {
        println!("all descriptors valid");
        return Ok(exit_codes::OK);
    }
    for path in invalid {
        eprintln!("invalid descriptor: {}", path.display());
    }
    Ok(exit_codes::FAILURE)
}

fn cmd_run(task: Option<&str>) -> Result<i32> {
    let cwd = working_dir()?;
    let root = open_project(&cwd)?;
    let node = match task {
        Some(name) => root
            .find_by_name(name)
            .ok_or_else(|| anyhow!("no task named '{name}'"))?,
        None => current_node(&root, &cwd)
            .ok_or_else(|| anyhow!("no task owns {}", cwd.display()))?,
    };
    if run_node(node)?.succeeded() {
        Ok(exit_codes::OK)
    } else {
        eprintln!("task '{}' reported failure", node.name);
        Ok(exit_codes::FAILURE)
    }
}

fn cmd_tree() -> Result<i32> {
    let cwd = working_dir()?;
    let root = open_project(&cwd)?;
    print!("{}", render_tree(&root));
    Ok(exit_codes::OK)
}

fn working_dir() -> Result<PathBuf> {
    env::current_dir().context("resolve working directory")
}

fn open_project(cwd: &Path) -> Result<Node> {
    let root_dir = find_project_root(cwd)
        .ok_or_else(|| anyhow!("not inside a pdp project (no pdp.yml found)"))?;
    load_project(&root_dir)
}
