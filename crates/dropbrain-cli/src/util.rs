use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;

/// Destination of a JSON report: stdout, or a file when a path is given.
#[derive(Debug, Clone)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn from_output_path(output_path: Option<PathBuf>) -> Self {
        output_path.map_or(Output::Stdout, Output::File)
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout => "stdout".to_string(),
            Output::File(path) => path.display().to_string(),
        }
    }

    /// Writes `value` as pretty JSON followed by a newline.
    pub fn write_json<T>(&self, file_kind: &str, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let written = match self {
            Output::Stdout => write_pretty_json(io::stdout().lock(), value),
            Output::File(path) => {
                let file = File::create(path).with_context(|| {
                    format!("Failed to create {file_kind} file: {}", path.display())
                })?;
                write_pretty_json(BufWriter::new(file), value)
            }
        };
        written.with_context(|| format!("Failed to write {file_kind} to {}", self.display_path()))?;

        if let Output::File(path) = self {
            info!(path = %path.display(), "wrote {file_kind}");
        }
        Ok(())
    }
}

fn write_pretty_json<W, T>(mut writer: W, value: &T) -> io::Result<()>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;

    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;

    Ok(value)
}
