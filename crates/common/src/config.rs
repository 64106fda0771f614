//! Command line configuration for the join engine.

use clap::{ArgAction, Parser, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How the pipeline walks independent subtrees.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum ExecutionMode {
    /// Visit every subtree on the calling thread.
    #[default]
    Sequential,
    /// Descend sibling subtrees concurrently during the bottom-up
    /// reduction and the join phase. Top-down reduction stays sequential.
    Parallel,
}

/// Command line arguments for the join engine.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path of the join tree document, or "all" to process every tree in --tree-dir
    #[arg(value_name = "TREE")]
    pub tree: String,

    /// Directory scanned for `.json` tree documents in "all" mode
    #[arg(long, value_name = "DIR", default_value = "trees")]
    pub tree_dir: String,

    /// Specify directory for result files. If <DIR> is `-` or omitted then stdout is used.
    #[arg(short = 'D', long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Fail on unknown projection attributes and on tree edges without a shared attribute
    #[arg(long, action = ArgAction::SetTrue)]
    pub strict: bool,

    /// Choose execution strategy
    #[arg(long, value_enum, default_value = "sequential", value_name = "MODE")]
    pub mode: ExecutionMode,

    /// Enable profiling (write per-phase statistics as `<tree>.profile.json`)
    #[arg(long, short = 'P', action = ArgAction::SetTrue)]
    pub profile: bool,
}

impl Config {
    pub fn tree(&self) -> &str {
        &self.tree
    }

    pub fn should_process_all(&self) -> bool {
        self.tree == "all"
    }

    pub fn tree_dir(&self) -> &str {
        &self.tree_dir
    }

    pub fn tree_name(&self) -> String {
        tree_name(Path::new(&self.tree))
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.output_dir.as_deref()
    }

    pub fn output_to_stdout(&self) -> bool {
        matches!(self.output_dir.as_deref(), None | Some("-"))
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn is_parallel(&self) -> bool {
        self.mode == ExecutionMode::Parallel
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn profiling_enabled(&self) -> bool {
        self.profile
    }

    /// Where the profile for `tree_name` is written: the output directory,
    /// or the working directory when results go to stdout.
    pub fn profile_path(&self, tree_name: &str) -> PathBuf {
        let file = format!("{tree_name}.profile.json");
        match self.output_dir.as_deref() {
            Some(dir) if dir != "-" => Path::new(dir).join(file),
            _ => PathBuf::from(file),
        }
    }
}

/// File stem of a tree document path.
pub fn tree_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown_tree".into())
}

/// Get all `.json` files from `dir`, sorted alphabetically
pub fn get_tree_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
