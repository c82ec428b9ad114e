//! Inline script metadata
//!
//! Scripts declare dependencies in a comment block near the top of the file:
//!
//! ```text
//! // /// script
//! // {
//! //   "dependencies": {
//! //     "commander": "latest"
//! //   }
//! // }
//! // ///
//! ```
//!
//! Only the first [`SCAN_LIMIT`] lines are searched. A missing or broken
//! block never fails a run; it simply declares nothing.

use crate::error::{BunvError, BunvResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Line opening a metadata block
pub const START_MARKER: &str = "// /// script";

/// Line closing a metadata block
pub const END_MARKER: &str = "// ///";

/// Number of leading lines searched for a block
pub const SCAN_LIMIT: usize = 30;

const COMMENT_PREFIX: &str = "//";

/// Outcome of reading a script's metadata block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptMetadata {
    /// No block within the scan bound
    Absent,
    /// A block exists but could not be decoded
    Malformed { reason: String },
    /// A well-formed block and the string-valued dependencies it declares
    Declared(BTreeMap<String, String>),
}

/// Schema of the JSON document inside the block
#[derive(Debug, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    dependencies: Option<BTreeMap<String, Value>>,
}

impl ScriptMetadata {
    /// Extract metadata from script source text
    pub fn parse(source: &str) -> Self {
        match scan_block(source) {
            BlockScan::Absent => Self::Absent,
            BlockScan::Unterminated => Self::Malformed {
                reason: format!(
                    "no closing `{}` within the first {} lines",
                    END_MARKER, SCAN_LIMIT
                ),
            },
            BlockScan::InvalidLine(line) => Self::Malformed {
                reason: format!("line {} inside the block is not a comment", line),
            },
            BlockScan::Found(block) => decode_block(&block.content),
        }
    }

    /// Declared dependencies, empty unless the block was well-formed
    pub fn into_dependencies(self) -> BTreeMap<String, String> {
        match self {
            Self::Declared(deps) => deps,
            Self::Absent | Self::Malformed { .. } => BTreeMap::new(),
        }
    }
}

/// Read and extract the metadata block of a script file.
///
/// Unreadable files are reported as [`ScriptMetadata::Absent`].
pub async fn read_script_metadata(path: &Path) -> ScriptMetadata {
    let source = match tokio::fs::read_to_string(path).await {
        Ok(source) => source,
        Err(e) => {
            debug!("Could not read {} for metadata: {}", path.display(), e);
            return ScriptMetadata::Absent;
        }
    };

    let metadata = ScriptMetadata::parse(&source);
    match &metadata {
        ScriptMetadata::Absent => debug!("No metadata block in {}", path.display()),
        ScriptMetadata::Malformed { reason } => {
            debug!("Ignoring malformed metadata in {}: {}", path.display(), reason)
        }
        ScriptMetadata::Declared(deps) => {
            debug!("{} declares {} dependencies", path.display(), deps.len())
        }
    }
    metadata
}

/// Located metadata block (line indices are zero-based, inclusive)
#[derive(Debug)]
struct Block {
    start: usize,
    end: usize,
    content: String,
}

#[derive(Debug)]
enum BlockScan {
    Absent,
    Unterminated,
    /// One-based line number of a non-comment line inside the block
    InvalidLine(usize),
    Found(Block),
}

fn scan_block(source: &str) -> BlockScan {
    let mut start = None;
    let mut content = Vec::new();

    for (idx, line) in source.lines().take(SCAN_LIMIT).enumerate() {
        let trimmed = line.trim();

        let Some(begin) = start else {
            if trimmed == START_MARKER {
                start = Some(idx);
            }
            continue;
        };

        if trimmed == END_MARKER {
            return BlockScan::Found(Block {
                start: begin,
                end: idx,
                content: content.join("\n"),
            });
        }

        match trimmed.strip_prefix(COMMENT_PREFIX) {
            Some(rest) => content.push(rest.trim()),
            None => return BlockScan::InvalidLine(idx + 1),
        }
    }

    if start.is_some() {
        BlockScan::Unterminated
    } else {
        BlockScan::Absent
    }
}

fn decode_block(content: &str) -> ScriptMetadata {
    if !content.trim_start().starts_with('{') {
        return ScriptMetadata::Malformed {
            reason: "block must contain a JSON object".to_string(),
        };
    }

    match serde_json::from_str::<MetadataDocument>(content) {
        Ok(doc) => ScriptMetadata::Declared(
            doc.dependencies
                .unwrap_or_default()
                .into_iter()
                .filter_map(|(name, version)| version.as_str().map(|v| (name, v.to_string())))
                .collect(),
        ),
        Err(e) => ScriptMetadata::Malformed {
            reason: e.to_string(),
        },
    }
}

/// Add or update dependencies in a script's metadata block.
///
/// An existing block keeps its other top-level fields. When there is no
/// usable block, a new one is inserted at the top of the file (after a
/// shebang line if present). Returns the rewritten source.
pub fn upsert_dependencies(source: &str, additions: &[(String, String)]) -> BunvResult<String> {
    let lines: Vec<&str> = source.lines().collect();

    let (mut doc, replace) = match scan_block(source) {
        BlockScan::Found(block) => match serde_json::from_str::<Map<String, Value>>(&block.content)
        {
            Ok(doc) => (doc, Some((block.start, block.end))),
            Err(e) => {
                warn!("Replacing unreadable metadata block: {}", e);
                (Map::new(), Some((block.start, block.end)))
            }
        },
        BlockScan::Absent | BlockScan::Unterminated | BlockScan::InvalidLine(_) => {
            (Map::new(), None)
        }
    };

    let mut deps = match doc.remove("dependencies") {
        Some(Value::Object(deps)) => deps,
        _ => Map::new(),
    };
    for (name, version) in additions {
        deps.insert(name.clone(), Value::String(version.clone()));
    }
    doc.insert("dependencies".to_string(), Value::Object(deps));

    let block = render_block(&doc)?;

    let mut output: Vec<String> = Vec::with_capacity(lines.len() + block.len() + 1);
    match replace {
        Some((start, end)) => {
            output.extend(lines[..start].iter().map(|l| l.to_string()));
            output.extend(block);
            output.extend(lines[end + 1..].iter().map(|l| l.to_string()));
        }
        None => {
            let header = usize::from(lines.first().is_some_and(|l| l.starts_with("#!")));
            output.extend(lines[..header].iter().map(|l| l.to_string()));
            output.extend(block);
            let rest = &lines[header..];
            if rest.iter().any(|l| !l.trim().is_empty()) {
                output.push(String::new());
            }
            output.extend(rest.iter().map(|l| l.to_string()));
        }
    }

    let mut rendered = output.join("\n");
    rendered.push('\n');
    Ok(rendered)
}

fn render_block(doc: &Map<String, Value>) -> BunvResult<Vec<String>> {
    let json = serde_json::to_string_pretty(doc).map_err(BunvError::Json)?;

    let mut block = vec![START_MARKER.to_string()];
    block.extend(json.lines().map(|line| format!("{} {}", COMMENT_PREFIX, line)));
    block.push(END_MARKER.to_string());
    Ok(block)
}
