//! Jar manifest model.
//!
//! A manifest's main section is an ordered attribute map. Parsing handles
//! continuation lines; writing emits `Manifest-Version` first and wraps
//! lines at the 72-byte limit the jar specification imposes.

use bootweld_core::error::{BootweldError, Result};

/// The conventional manifest entry name.
pub const MANIFEST_NAME: &str = "META-INF/MANIFEST.MF";

/// Maximum manifest line length in bytes, excluding the line terminator.
const MAX_LINE: usize = 72;

/// Ordered main-section attributes of a jar manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the main section of a serialized manifest.
    ///
    /// Per-entry sections (after the first blank line) are ignored; only
    /// main attributes participate in merging.
    ///
    /// A continuation line with no attribute to continue, or a line with no
    /// `:` separator, is malformed.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(bytes);
        let mut attributes: Vec<(String, String)> = Vec::new();

        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                // Blank line ends the main section.
                break;
            }
            if let Some(continuation) = line.strip_prefix(' ') {
                match attributes.last_mut() {
                    Some((_, value)) => value.push_str(continuation),
                    None => {
                        return Err(BootweldError::invalid_header(
                            "manifest continuation line without a preceding attribute",
                        ))
                    }
                }
            } else if let Some((name, value)) = line.split_once(':') {
                attributes.push((name.trim().to_string(), value.trim_start().to_string()));
            } else {
                return Err(BootweldError::invalid_header(format!(
                    "manifest line without ':' separator: {:?}",
                    line
                )));
            }
        }
        Ok(Self { attributes })
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place or appending.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Iterate attributes in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Merge a base manifest with synthesized attributes.
    ///
    /// Synthesized keys always win over same-named base keys; non-colliding
    /// base keys are preserved. With no base, the result holds only the
    /// synthesized attributes.
    pub fn merged(base: Option<&Manifest>, synthesized: &[(&str, &str)]) -> Manifest {
        let mut result = base.cloned().unwrap_or_default();
        for (name, value) in synthesized {
            result.set(*name, *value);
        }
        result
    }

    /// Serialize to the manifest wire format.
    ///
    /// `Manifest-Version` is emitted first (defaulted to `1.0` when absent)
    /// and over-long lines continue with a leading space.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let version = self.get("Manifest-Version").unwrap_or("1.0");
        write_attribute(&mut out, "Manifest-Version", version);
        for (name, value) in &self.attributes {
            if name != "Manifest-Version" {
                write_attribute(&mut out, name, value);
            }
        }
        out.extend_from_slice(b"\r\n");
        out
    }
}

fn write_attribute(out: &mut Vec<u8>, name: &str, value: &str) {
    let line = format!("{}: {}", name, value);
    let bytes = line.as_bytes();
    let mut start = 0;
    let mut limit = MAX_LINE;
    while start < bytes.len() {
        let end = (start + limit).min(bytes.len());
        if start > 0 {
            out.push(b' ');
        }
        out.extend_from_slice(&bytes[start..end]);
        out.extend_from_slice(b"\r\n");
        start = end;
        // Continuation lines lose one byte to the leading space.
        limit = MAX_LINE - 1;
    }
}
