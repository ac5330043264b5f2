// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;

use crate::error::ArchiveError;

/// Path of the manifest inside an archive.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

const MANIFEST_VERSION: &str = "Manifest-Version";
const NAME: &str = "Name";
const LINE_LIMIT: usize = 72;

/// Ordered attribute set; keys compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key).map(|i| self.0[i].1.as_str())
    }

    /// Sets `key`, keeping the original position when it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.0[i].1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.position(key).map(|i| self.0.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

/// A JAR manifest: main attributes plus named per-entry sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    main: Attributes,
    sections: BTreeMap<String, Attributes>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

impl Manifest {
    /// Empty manifest carrying `Manifest-Version: 1.0`.
    #[must_use]
    pub fn new() -> Self {
        let mut main = Attributes::default();
        main.insert(MANIFEST_VERSION, "1.0");
        Self {
            main,
            sections: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn main(&self) -> &Attributes {
        &self.main
    }

    pub const fn main_mut(&mut self) -> &mut Attributes {
        &mut self.main
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Attributes> {
        self.sections.get(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Attributes)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn section_mut(&mut self, name: &str) -> &mut Attributes {
        self.sections.entry(name.to_string()).or_default()
    }

    /// Parses manifest bytes. `origin` names the source in errors.
    ///
    /// # Errors
    ///
    /// Returns `ArchiveError::Manifest` for non-UTF-8 input, a header
    /// without `:`, a continuation line with nothing to continue, or a
    /// section without `Name`.
    pub fn parse(bytes: &[u8], origin: &str) -> Result<Self, ArchiveError> {
        let malformed = |line: usize, message: &str| ArchiveError::Manifest {
            origin: origin.to_string(),
            line,
            message: message.to_string(),
        };

        let text = std::str::from_utf8(bytes).map_err(|e| malformed(0, &e.to_string()))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        // Join continuation lines first, remembering where each header started.
        // Block 0 is the main section even when empty; the first blank line
        // always closes it.
        let mut blocks: Vec<Vec<(usize, String)>> = vec![Vec::new()];
        for (index, line) in text.split('\n').enumerate() {
            let number = index + 1;
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                if blocks.len() == 1 || blocks.last().is_some_and(|b| !b.is_empty()) {
                    blocks.push(Vec::new());
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix(' ') {
                let Some((_, header)) = blocks.last_mut().and_then(|b| b.last_mut()) else {
                    return Err(malformed(number, "continuation line without a header"));
                };
                header.push_str(rest);
                continue;
            }
            if let Some(block) = blocks.last_mut() {
                block.push((number, line.to_string()));
            }
        }

        let mut manifest = Self {
            main: Attributes::default(),
            sections: BTreeMap::new(),
        };
        for (index, block) in blocks.into_iter().enumerate().filter(|(_, b)| !b.is_empty()) {
            let mut attributes = Attributes::default();
            let mut section_name = None;
            for (number, header) in block {
                let (key, value) = header
                    .split_once(':')
                    .ok_or_else(|| malformed(number, "header without ':'"))?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(malformed(number, "empty header name"));
                }
                let value = value.strip_prefix(' ').unwrap_or(value);
                if index > 0 && section_name.is_none() {
                    if !key.eq_ignore_ascii_case(NAME) {
                        return Err(malformed(number, "section does not start with Name"));
                    }
                    section_name = Some(value.to_string());
                    continue;
                }
                attributes.insert(key, value);
            }
            match section_name {
                Some(name) => {
                    let section = manifest.section_mut(&name);
                    for (key, value) in attributes.iter() {
                        section.insert(key, value);
                    }
                }
                None => manifest.main = attributes,
            }
        }
        Ok(manifest)
    }

    /// Copies every attribute of `other` into `self`; `other` wins on equal keys.
    pub fn import(&mut self, other: &Self) {
        for (key, value) in other.main.iter() {
            self.main.insert(key, value);
        }
        for (name, attributes) in &other.sections {
            let section = self.section_mut(name);
            for (key, value) in attributes.iter() {
                section.insert(key, value);
            }
        }
    }

    /// Serializes with CRLF line endings and 72-byte lines,
    /// `Manifest-Version` first.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let version = self.main.get(MANIFEST_VERSION).unwrap_or("1.0");
        write_header(&mut out, MANIFEST_VERSION, version);
        for (key, value) in self.main.iter() {
            if !key.eq_ignore_ascii_case(MANIFEST_VERSION) {
                write_header(&mut out, key, value);
            }
        }
        out.extend_from_slice(b"\r\n");

        for (name, attributes) in &self.sections {
            if attributes.is_empty() {
                continue;
            }
            write_header(&mut out, NAME, name);
            for (key, value) in attributes.iter() {
                write_header(&mut out, key, value);
            }
            out.extend_from_slice(b"\r\n");
        }
        out
    }
}

fn write_header(out: &mut Vec<u8>, key: &str, value: &str) {
    let line = format!("{key}: {value}");
    let mut rest = line.as_str();
    let mut limit = LINE_LIMIT;
    let mut first = true;
    while !rest.is_empty() {
        let mut cut = rest.len().min(limit);
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if !first {
            out.push(b' ');
        }
        out.extend_from_slice(&rest.as_bytes()[..cut]);
        out.extend_from_slice(b"\r\n");
        rest = &rest[cut..];
        // continuation lines spend one byte on the leading space
        limit = LINE_LIMIT - 1;
        first = false;
    }
}
