use linkscan_core::domain::ExportBundle;
use linkscan_core::ports::{ExportError, LinkExporter};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// JSON exporter, indented or compact
pub struct JsonExporter {
    output_path: PathBuf,
    pretty: bool,
}

impl JsonExporter {
    pub fn new(output_path: PathBuf, pretty: bool) -> Self {
        Self { output_path, pretty }
    }

    /// Directory the temporary file is created in, so the final rename stays
    /// on one filesystem
    fn output_dir(&self) -> &Path {
        match self.output_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn encode(&self, bundle: &ExportBundle, out: impl Write) -> Result<(), ExportError> {
        if self.pretty {
            serde_json::to_writer_pretty(out, bundle)?;
        } else {
            serde_json::to_writer(out, bundle)?;
        }
        Ok(())
    }
}

impl LinkExporter for JsonExporter {
    fn export(&self, bundle: &ExportBundle) -> Result<usize, ExportError> {
        let io_err = |source: std::io::Error| ExportError::Io {
            path: self.output_path.clone(),
            source,
        };

        let temp = NamedTempFile::new_in(self.output_dir()).map_err(io_err)?;
        let mut writer = BufWriter::new(temp);
        self.encode(bundle, &mut writer)?;
        let temp = writer.into_inner().map_err(|e| io_err(e.into_error()))?;

        temp.persist(&self.output_path).map_err(|e| ExportError::Persist {
            path: self.output_path.clone(),
            source: e.error,
        })?;

        debug!("Wrote {} links to {}", bundle.total, self.output_path.display());
        Ok(bundle.total)
    }

    fn describe(&self) -> String {
        if self.pretty {
            "pretty-json".to_string()
        } else {
            "json".to_string()
        }
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }
}
