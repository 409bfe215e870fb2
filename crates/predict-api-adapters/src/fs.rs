//! Filesystem adapter for loading prediction requests.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use predict_api_core::{PredictionRequest, RequestSource, SourcedRequest};
use serde_json::Value;
use tracing::{debug, warn};

/// Path argument that reads requests from standard input.
pub const STDIN_PATH: &str = "-";

/// Extensions holding one request object or an array of them.
const JSON_EXTENSIONS: &[&str] = &["json"];
/// Extensions holding one request object per line.
const JSONL_EXTENSIONS: &[&str] = &["jsonl", "ndjson"];

/// Filesystem request source adapter.
pub struct FsRequestSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsRequestSource {
    /// Creates a new filesystem request source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files, directories, or `-` for stdin
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Collects all request files from the configured paths.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.as_os_str() == STDIN_PATH {
                files.push(path.clone());
            } else if path.is_file() {
                if is_supported_file(path) {
                    files.push(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
        paths.sort();

        for path in paths {
            if path.is_file() && is_supported_file(&path) {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl RequestSource for FsRequestSource {
    fn requests(&self) -> Box<dyn Iterator<Item = Result<SourcedRequest>> + Send + '_> {
        let files = self.collect_files();
        debug!("Found {} request files", files.len());

        Box::new(files.into_iter().flat_map(|path| load_requests(&path)))
    }

    fn count_hint(&self) -> Option<usize> {
        // Request count is only known after decoding each file.
        None
    }
}

/// Format of a request document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    JsonLines,
}

/// Checks if a path has a supported request file extension.
fn is_supported_file(path: &Path) -> bool {
    format_for(path).is_some()
}

fn format_for(path: &Path) -> Option<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)?;
    if JSON_EXTENSIONS.contains(&ext.as_str()) {
        Some(Format::Json)
    } else if JSONL_EXTENSIONS.contains(&ext.as_str()) {
        Some(Format::JsonLines)
    } else {
        None
    }
}

/// Loads every request from one file (or stdin).
///
/// A read failure yields a single error item; decode failures are reported
/// per request so the rest of the file still routes.
fn load_requests(path: &Path) -> Vec<Result<SourcedRequest>> {
    let (label, content, format) = if path.as_os_str() == STDIN_PATH {
        let mut content = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut content) {
            return vec![Err(e).context("Failed to read requests from stdin")];
        }
        let format = sniff_format(&content);
        ("stdin".to_string(), content, format)
    } else {
        let content = match std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path.display()))
        {
            Ok(c) => c,
            Err(e) => return vec![Err(e)],
        };
        let format = format_for(path).unwrap_or(Format::Json);
        (path.to_string_lossy().into_owned(), content, format)
    };

    match format {
        Format::Json => parse_json(&label, &content),
        Format::JsonLines => parse_json_lines(&label, &content),
    }
}

/// Stdin holds a JSON document if it parses as one, JSON Lines otherwise.
fn sniff_format(content: &str) -> Format {
    if serde_json::from_str::<Value>(content).is_ok() {
        Format::Json
    } else {
        Format::JsonLines
    }
}

fn parse_json(label: &str, content: &str) -> Vec<Result<SourcedRequest>> {
    let document = match serde_json::from_str::<Value>(content)
        .with_context(|| format!("Invalid JSON in {label}"))
    {
        Ok(v) => v,
        Err(e) => return vec![Err(e)],
    };

    match document {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| decode(format!("{label}[{index}]"), item))
            .collect(),
        item => vec![decode(label.to_string(), item)],
    }
}

fn parse_json_lines(label: &str, content: &str) -> Vec<Result<SourcedRequest>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let source = format!("{label}:{}", index + 1);
            serde_json::from_str::<Value>(line)
                .with_context(|| format!("Invalid JSON in {source}"))
                .and_then(|item| decode(source, item))
        })
        .collect()
}

fn decode(source: String, item: Value) -> Result<SourcedRequest> {
    if !item.is_object() {
        anyhow::bail!("Request in {source} is not a JSON object");
    }
    let request: PredictionRequest = serde_json::from_value(item)
        .with_context(|| format!("Invalid request in {source}"))?;
    Ok(SourcedRequest::new(source, request))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use predict_api_core::Slot;

    #[test]
    fn test_is_supported_file() {
        assert!(is_supported_file(Path::new("requests.json")));
        assert!(is_supported_file(Path::new("requests.JSON")));
        assert!(is_supported_file(Path::new("requests.jsonl")));
        assert!(is_supported_file(Path::new("requests.ndjson")));
        assert!(!is_supported_file(Path::new("requests.txt")));
        assert!(!is_supported_file(Path::new("requests")));
    }

    #[test]
    fn test_parse_json_object() {
        let items = parse_json("req.json", r#"{"ir_input_tensor": [0.1, 0.2]}"#);
        assert_eq!(items.len(), 1);
        let item = items.into_iter().next().unwrap().unwrap();
        assert_eq!(item.source, "req.json");
        assert_eq!(item.request.samples(Slot::Ir), Some(&[0.1, 0.2][..]));
    }

    #[test]
    fn test_parse_json_array_labels() {
        let items = parse_json("batch.json", r#"[{}, {"audio_waveform_array": [1]}]"#);
        let sources: Vec<_> = items.into_iter().map(|i| i.unwrap().source).collect();
        assert_eq!(sources, vec!["batch.json[0]", "batch.json[1]"]);
    }

    #[test]
    fn test_parse_json_lines_skips_blank_and_reports_errors() {
        let content = "{}\n\n{not json}\n{\"ir_input_tensor\": [1]}\n";
        let items = parse_json_lines("req.jsonl", content);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().source, "req.jsonl:1");
        assert!(items[1].is_err());
        assert_eq!(items[2].as_ref().unwrap().source, "req.jsonl:4");
    }

    #[test]
    fn test_non_object_rejected() {
        let items = parse_json("req.json", "[1, 2]");
        assert!(items.iter().all(Result::is_err));
    }

    #[test]
    fn test_sniff_format() {
        assert_eq!(sniff_format("{\"ir_input_tensor\": [1]}"), Format::Json);
        assert_eq!(sniff_format("[{}, {}]"), Format::Json);
        assert_eq!(sniff_format("{}\n{}\n"), Format::JsonLines);
    }
}
