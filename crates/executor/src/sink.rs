//! Destinations for pipeline results.

use crate::error::Result;
use crate::processor::ProcessOutput;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Persists or displays a finished result.
///
/// Closures `FnMut(&str, &ProcessOutput) -> Result<()>` are sinks too.
pub trait ResultSink {
    fn write(&mut self, name: &str, output: &ProcessOutput) -> Result<()>;
}

impl<F> ResultSink for F
where
    F: FnMut(&str, &ProcessOutput) -> Result<()>,
{
    fn write(&mut self, name: &str, output: &ProcessOutput) -> Result<()> {
        self(name, output)
    }
}

/// Prints the relation as pretty JSON on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ResultSink for StdoutSink {
    fn write(&mut self, _name: &str, output: &ProcessOutput) -> Result<()> {
        let json = serde_json::to_string_pretty(output.relation())?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}

/// Writes each result to `<dir>/<name>.json`, creating `dir` on first use.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl ResultSink for JsonDirSink {
    fn write(&mut self, name: &str, output: &ProcessOutput) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(name);
        let json = serde_json::to_string_pretty(output.relation())?;
        fs::write(&path, json)?;
        info!(
            "Wrote {} tuples to '{}'",
            output.cardinality(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algebra::{Relation, Value};

    fn output() -> ProcessOutput {
        let relation = Relation::new(
            "A_B",
            ["x", "y"],
            vec![vec![Value::from(1), Value::from("a")]],
        )
        .unwrap();
        ProcessOutput::new(relation)
    }

    #[test]
    fn json_dir_sink_writes_relation_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonDirSink::new(dir.path().join("out"));
        sink.write("chain", &output()).unwrap();

        let text = fs::read_to_string(sink.path_for("chain")).unwrap();
        let back: Relation = serde_json::from_str(&text).unwrap();
        assert_eq!(&back, output().relation());

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "A_B", "attributes": ["x", "y"], "tuples": [[1, "a"]]})
        );
    }

    #[test]
    fn stdout_sink_accepts_output() {
        StdoutSink.write("chain", &output()).unwrap();
    }
}
