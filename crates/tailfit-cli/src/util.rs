use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::{Context, ensure};
use tailfit_analysis::{EngineConfig, Observation};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }

    /// Writes a text report produced by `render`, then flushes.
    pub fn write_text<F>(&mut self, render: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        render(self).with_context(|| format!("Failed to write report to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads observations from a JSON array of `{ "value", "frequency" }` records.
///
/// Records with zero frequency carry no weight and are dropped. The result is
/// sorted by ascending value, as the empirical transform expects.
///
/// # Errors
///
/// Returns error if the file cannot be read, a value is not positive and
/// finite, or no record with positive frequency remains
pub fn read_observations_file<P>(path: P) -> anyhow::Result<Vec<Observation>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let records: Vec<Observation> = read_json_file("observations", path)?;
    let total = records.len();

    let mut observations = records
        .into_iter()
        .filter(|o| o.frequency > 0)
        .collect::<Vec<_>>();
    if let Some(bad) = observations
        .iter()
        .find(|o| !(o.value.is_finite() && o.value > 0.0))
    {
        anyhow::bail!(
            "Value {} in {} is not a positive finite number",
            bad.value,
            path.display()
        );
    }
    ensure!(
        !observations.is_empty(),
        "No observations with positive frequency in {}",
        path.display()
    );
    if observations.len() < total {
        tracing::warn!(
            dropped = total - observations.len(),
            "ignoring observations with zero frequency"
        );
    }

    observations.sort_by(|a, b| a.value.total_cmp(&b.value));
    Ok(observations)
}

/// Read engine configuration from a JSON file
pub fn read_engine_config_file<P>(path: P) -> anyhow::Result<EngineConfig>
where
    P: AsRef<Path>,
{
    read_json_file("engine config", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_input(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("tailfit-{}-{name}.json", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_observations_sorts_and_drops_empty_records() {
        let path = write_input(
            "sorted",
            r#"[{"value": 4.0, "frequency": 2}, {"value": 1.5, "frequency": 0}, {"value": 1.0, "frequency": 7}]"#,
        );
        let observations = read_observations_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            observations,
            vec![Observation::new(1.0, 7), Observation::new(4.0, 2)]
        );
    }

    #[test]
    fn test_read_observations_rejects_non_positive_values() {
        for (name, value) in [("zero", "0.0"), ("negative", "-3.5")] {
            let path = write_input(
                name,
                &format!(r#"[{{"value": 1.0, "frequency": 3}}, {{"value": {value}, "frequency": 1}}]"#),
            );
            let result = read_observations_file(&path);
            std::fs::remove_file(&path).unwrap();
            let message = result.unwrap_err().to_string();
            assert!(message.contains("not a positive finite number"), "{message}");
        }
    }
}
