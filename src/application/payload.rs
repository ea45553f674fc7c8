//! Payload resolution
//!
//! Turns a positional file argument, an inline `--config`/`--configs` flag, or plain flags
//! into a normalized create/update body.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Payload;
use crate::infrastructure::traits::FileSystem;

/// Serialization format of a payload file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    /// Unknown extension: try JSON, then YAML.
    Sniff,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("yml") | Some("yaml") => Self::Yaml,
            _ => Self::Sniff,
        }
    }
}

/// Loads payloads from files and inline flags.
pub struct PayloadResolver {
    fs: Arc<dyn FileSystem>,
}

impl PayloadResolver {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Resolve a payload: file or flags first, inline flag merged on top, normalize last.
    pub fn resolve<P: Payload>(&self, file: Option<&Path>, flags: &P::Flags) -> ApplicationResult<P> {
        let mut payload = match file {
            Some(path) => {
                debug!("resolve: loading payload from {}", path.display());
                self.load_file::<P>(path)?
            }
            None => P::from_flags(flags),
        };
        if let Some(raw) = P::inline_flag(flags) {
            payload.apply_inline(self.load_inline::<P::Inline>(raw)?);
        }
        payload.normalize(flags)?;
        Ok(payload)
    }

    /// Parse a YAML or JSON file into `T`.
    pub fn load_file<T: DeserializeOwned>(&self, path: &Path) -> ApplicationResult<T> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read payload", path)?;
        parse(&content, FileFormat::of(path)).map_err(|message| ApplicationError::MalformedFile {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Interpret an inline flag as a path to a file, falling back to a JSON literal.
    pub fn load_inline<T: DeserializeOwned>(&self, raw: &str) -> ApplicationResult<T> {
        let path = Path::new(raw);
        let file_error = if self.fs.is_file(path) {
            match self.load_file(path) {
                Ok(value) => return Ok(value),
                Err(e) => Some(e.to_string()),
            }
        } else {
            None
        };

        serde_json::from_str(raw).map_err(|e| ApplicationError::InvalidInlineConfig {
            message: match file_error {
                Some(file_error) => format!("{file_error}; as JSON: {e}"),
                None => e.to_string(),
            },
        })
    }
}

fn parse<T: DeserializeOwned>(content: &str, format: FileFormat) -> Result<T, String> {
    match format {
        FileFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        FileFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        FileFormat::Sniff => serde_json::from_str(content).or_else(|json_err| {
            serde_yaml::from_str(content)
                .map_err(|yaml_err| format!("not JSON ({json_err}) nor YAML ({yaml_err})"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn given_extensions_when_detecting_format_then_matches() {
        assert_eq!(FileFormat::of(Path::new("a.json")), FileFormat::Json);
        assert_eq!(FileFormat::of(Path::new("a.YML")), FileFormat::Yaml);
        assert_eq!(FileFormat::of(Path::new("a.yaml")), FileFormat::Yaml);
        assert_eq!(FileFormat::of(Path::new("payload")), FileFormat::Sniff);
    }

    #[test]
    fn given_yaml_without_extension_when_sniffing_then_falls_back_to_yaml() {
        let parsed: BTreeMap<String, String> = parse("a: b\n", FileFormat::Sniff).unwrap();
        assert_eq!(parsed.get("a"), Some(&"b".to_string()));
    }
}
