use std::{
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use clap::Parser;
use common::{get_tree_files, tree_name, BatchSummary, Config};
use executor::{
    JsonDirSink, ProcessOptions, ProcessOutput, Processor, Result, ResultSink, StdoutSink,
};
use jointree::TreeDocument;
use profiler::{Observer, Profiler, TracingObserver};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize simple tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments with clap
    let config = Config::parse();

    if config.should_process_all() {
        run_all_trees(&config);
        return;
    }

    let mut sink = make_sink(&config);
    match run_tree(&config, Path::new(config.tree()), sink.as_mut()) {
        Ok(output) => info!(
            "Processed '{}': {} attributes, {} tuples",
            config.tree(),
            output.arity(),
            output.cardinality()
        ),
        Err(e) => {
            error!("Failed to process '{}': {}", config.tree(), e);
            process::exit(1);
        }
    }
}

fn make_sink(config: &Config) -> Box<dyn ResultSink> {
    match config.output_dir() {
        Some(dir) if !config.output_to_stdout() => Box::new(JsonDirSink::new(dir)),
        _ => Box::new(StdoutSink),
    }
}

/// Loads, evaluates and writes one tree document.
fn run_tree(config: &Config, path: &Path, sink: &mut dyn ResultSink) -> Result<ProcessOutput> {
    let name = tree_name(path);
    let tree = TreeDocument::from_path(path)?.into_join_tree()?;
    info!("Loaded join tree '{}' with {} nodes", name, tree.len());
    debug!("\n{}", tree);

    let profiler = config.profiling_enabled().then(|| Arc::new(Profiler::new()));
    let observer: Arc<dyn Observer> = match &profiler {
        Some(profiler) => profiler.clone(),
        None => Arc::new(TracingObserver),
    };

    let processor = Processor::new(ProcessOptions::from(config)).with_observer(observer);
    let output = processor.process_into(tree, &name, sink)?;

    if let Some(profiler) = profiler {
        let path: PathBuf = config.profile_path(&name);
        profiler.write_json(&path)?;
        info!("Profile written to '{}'", path.display());
    }
    Ok(output)
}

/// Run every `.json` tree document in the tree directory
fn run_all_trees(config: &Config) {
    let tree_dir = config.tree_dir();

    if !Path::new(tree_dir).exists() {
        error!("Directory '{}' not found", tree_dir);
        process::exit(1);
    }

    let files = match get_tree_files(tree_dir) {
        Ok(files) => files,
        Err(e) => {
            error!("Error reading tree dir: {}", e);
            process::exit(1);
        }
    };

    if files.is_empty() {
        error!("No .json files found in {}", tree_dir);
        process::exit(1);
    }

    let mut sink = make_sink(config);
    let mut summary = BatchSummary::new(files.len());
    for path in &files {
        let name = tree_name(path);
        match run_tree(config, path, sink.as_mut()) {
            Ok(output) => summary.record_result(&name, output.arity(), output.cardinality()),
            Err(e) => summary.record_failure(&name, e),
        }
    }

    if !summary.finish() {
        process::exit(1);
    }
}
