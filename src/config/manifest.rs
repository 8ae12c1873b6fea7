//! Dependency manifest (requirements.txt)
//!
//! The manifest is handed to pip unchanged. It is parsed here only so the
//! CLI can report what will be installed and fingerprint the file for the
//! completion marker.
//!
//! The fingerprint covers files pulled in with `-r`/`-c` as well, so editing
//! an included `base.txt` invalidates the fast path. Includes are resolved
//! against the including file's directory, the way pip does. URLs and missing
//! files are left to pip.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{self, Result};
use crate::hash;

/// A single requirement line (e.g. `pandas>=2.0`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Distribution name as written (e.g. "python-docx")
    pub name: String,

    /// Everything after the name: extras, version specifiers, markers, URL
    pub constraint: Option<String>,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match &self.constraint {
            Some(constraint) if constraint.starts_with(['[', '<', '>', '=', '!', '~', ',']) => {
                write!(f, "{constraint}")
            }
            Some(constraint) => write!(f, " {constraint}"),
            None => Ok(()),
        }
    }
}

/// A parsed manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestEntry {
    /// A named requirement
    Requirement(Requirement),

    /// An installer option (`-r other.txt`, `--index-url ...`) or a direct
    /// reference (`./wheels/pkg.whl`, `git+https://...`)
    Directive(String),
}

/// The declared dependency set
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Absolute path of the manifest file
    pub path: PathBuf,

    /// Parsed entries, in file order
    pub entries: Vec<ManifestEntry>,

    fingerprint: String,
}

impl Manifest {
    /// Load and parse the manifest at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(error::deps::manifest_not_found(path.display().to_string()));
        }

        let content = fs::read(path).map_err(|e| {
            error::deps::manifest_read_failed(path.display().to_string(), e.to_string())
        })?;
        let entries = parse_entries(&String::from_utf8_lossy(&content));

        let mut hashed = content;
        let mut seen = HashSet::from([dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())]);
        append_includes(path, &entries, &mut hashed, &mut seen);

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            fingerprint: hash::hash_bytes(&hashed),
        })
    }

    /// Fingerprint of the manifest contents (`blake3:<hex>`)
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Named requirements, in file order
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.entries.iter().filter_map(|entry| match entry {
            ManifestEntry::Requirement(req) => Some(req),
            ManifestEntry::Directive(_) => None,
        })
    }

    /// Whether the manifest declares nothing to install
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Append the contents of every file `entries` include, depth first
fn append_includes(
    manifest: &Path,
    entries: &[ManifestEntry],
    hashed: &mut Vec<u8>,
    seen: &mut HashSet<PathBuf>,
) {
    let base = manifest.parent().unwrap_or_else(|| Path::new("."));
    for entry in entries {
        let ManifestEntry::Directive(directive) = entry else {
            continue;
        };
        let Some(target) = include_target(directive) else {
            continue;
        };
        if target.contains("://") {
            continue;
        }

        let included = base.join(target);
        let key = dunce::canonicalize(&included).unwrap_or_else(|_| included.clone());
        if !seen.insert(key) {
            continue;
        }
        let Ok(content) = fs::read(&included) else {
            tracing::debug!(path = %included.display(), "included manifest not readable");
            continue;
        };

        hashed.push(0);
        hashed.extend_from_slice(target.as_bytes());
        hashed.push(0);
        hashed.extend_from_slice(&content);

        let nested = parse_entries(&String::from_utf8_lossy(&content));
        append_includes(&included, &nested, hashed, seen);
    }
}

/// File named by a `-r`/`-c` directive (`-r base.txt`, `--requirement=base.txt`)
fn include_target(directive: &str) -> Option<&str> {
    let rest = ["--requirement", "--constraint", "-r", "-c"]
        .iter()
        .find_map(|flag| directive.strip_prefix(flag))?;
    let target = rest.trim_start_matches('=').trim();
    (!target.is_empty()).then_some(target)
}

/// Parse manifest text into entries
pub fn parse_entries(text: &str) -> Vec<ManifestEntry> {
    let mut entries = Vec::new();
    let mut pending = String::new();

    for raw in text.lines() {
        // Trailing backslash continues the logical line
        if let Some(head) = raw.strip_suffix('\\') {
            pending.push_str(head);
            pending.push(' ');
            continue;
        }
        pending.push_str(raw);
        let line = std::mem::take(&mut pending);

        if let Some(entry) = parse_line(&line) {
            entries.push(entry);
        }
    }

    if let Some(entry) = parse_line(&pending) {
        entries.push(entry);
    }

    entries
}

fn parse_line(line: &str) -> Option<ManifestEntry> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return None;
    }

    if line.starts_with('-') {
        return Some(ManifestEntry::Directive(line.to_string()));
    }

    let name_len = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .unwrap_or(line.len());
    let (name, rest) = line.split_at(name_len);

    // Paths and URLs (./pkg.whl, git+https://...) continue the name with
    // something no requirement specifier starts with
    let rest = rest.trim();
    let is_reference = name.is_empty()
        || rest
            .chars()
            .next()
            .is_some_and(|c| !matches!(c, '[' | '(' | '<' | '>' | '=' | '!' | '~' | ';' | '@' | ','));
    if is_reference {
        return Some(ManifestEntry::Directive(line.to_string()));
    }

    Some(ManifestEntry::Requirement(Requirement {
        name: name.to_string(),
        constraint: (!rest.is_empty()).then(|| rest.to_string()),
    }))
}

/// Remove a `#` comment that starts the line or follows whitespace
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(idx) => &line[..idx],
        None => line,
    }
}
