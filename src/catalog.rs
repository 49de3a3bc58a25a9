//! Constellation catalog — star→channel mapping plus named target frames.
//!
//! ## Mapping file
//!
//! ```text
//! # Ch -> Star
//! 0 1021
//! 1 1022
//! ```
//!
//! One `<channel> <star-id>` pair per line.  The mapping must be injective
//! in both directions and every channel must lie inside the bank.
//!
//! ## Constellation file
//!
//! ```text
//! @Orion
//! 1021
//! 1022
//! @Cassiopeia
//! 1030
//! ```
//!
//! `@` opens a group; bare integers list its stars.  The last group ends at
//! end of file, no closing marker needed.  In both files blank lines and
//! `#` comments are skipped.

use std::collections::BTreeMap;
use std::path::Path;

use log::info;

use crate::error::ConfigError;

/// Injective star id → channel index map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarMapping {
    by_star: BTreeMap<u32, usize>,
}

impl StarMapping {
    pub fn channel_for(&self, star: u32) -> Option<usize> {
        self.by_star.get(&star).copied()
    }

    pub fn len(&self) -> usize {
        self.by_star.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_star.is_empty()
    }

    /// Smallest channel count that covers every mapped channel.
    pub fn channel_count(&self) -> Result<usize, ConfigError> {
        self.by_star
            .values()
            .max()
            .map(|&ch| ch + 1)
            .ok_or(ConfigError::EmptyMapping)
    }
}

/// A named target frame: 1.0 on the constellation's channels, 0.0 elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Constellation {
    pub name: String,
    pub levels: Vec<f32>,
}

/// Constellations in file order; index = selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    constellations: Vec<Constellation>,
}

impl Catalog {
    pub fn new(constellations: Vec<Constellation>) -> Self {
        Self { constellations }
    }

    pub fn get(&self, index: usize) -> Option<&Constellation> {
        self.constellations.get(index)
    }

    pub fn len(&self) -> usize {
        self.constellations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constellations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constellation> {
        self.constellations.iter()
    }
}

/// Non-blank, non-comment lines with their 1-based line numbers.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_star(token: &str, line: usize) -> Result<u32, ConfigError> {
    token.parse().map_err(|_| ConfigError::Parse {
        line,
        reason: "star id is not an unsigned integer",
    })
}

/// Parse a mapping file.
///
/// With `channel_limit` set, every channel must be below it; otherwise
/// the bank size is derived later from [`StarMapping::channel_count`].
pub fn parse_mapping(text: &str, channel_limit: Option<usize>) -> Result<StarMapping, ConfigError> {
    let mut by_star = BTreeMap::new();
    let mut used = BTreeMap::new();

    for (line, content) in content_lines(text) {
        let mut fields = content.split_whitespace();
        let (Some(ch), Some(star), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(ConfigError::Parse {
                line,
                reason: "expected `<channel> <star-id>`",
            });
        };
        let channel: usize = ch.parse().map_err(|_| ConfigError::Parse {
            line,
            reason: "channel is not an unsigned integer",
        })?;
        let star = parse_star(star, line)?;

        if let Some(limit) = channel_limit {
            if channel >= limit {
                return Err(ConfigError::ChannelOutOfRange {
                    channel,
                    limit,
                    line,
                });
            }
        }
        if by_star.insert(star, channel).is_some() {
            return Err(ConfigError::DuplicateStar { star, line });
        }
        if used.insert(channel, star).is_some() {
            return Err(ConfigError::DuplicateChannel { channel, line });
        }
    }

    Ok(StarMapping { by_star })
}

/// Parse a constellation file into frames of `channel_count` entries.
pub fn parse_constellations(
    text: &str,
    mapping: &StarMapping,
    channel_count: usize,
) -> Result<Catalog, ConfigError> {
    let mut constellations = Vec::new();
    let mut current: Option<Constellation> = None;

    for (line, content) in content_lines(text) {
        if let Some(name) = content.strip_prefix('@') {
            if let Some(done) = current.take() {
                constellations.push(done);
            }
            current = Some(Constellation {
                name: name.trim().to_string(),
                levels: vec![0.0; channel_count],
            });
            continue;
        }

        let star = parse_star(content, line)?;
        let Some(group) = current.as_mut() else {
            return Err(ConfigError::Parse {
                line,
                reason: "star listed before the first `@` group",
            });
        };
        let channel = mapping
            .channel_for(star)
            .ok_or(ConfigError::UnknownStar { star, line })?;
        let Some(level) = group.levels.get_mut(channel) else {
            return Err(ConfigError::ChannelOutOfRange {
                channel,
                limit: channel_count,
                line,
            });
        };
        *level = 1.0;
    }

    // The last group has no closing marker.
    if let Some(done) = current {
        constellations.push(done);
    }

    Ok(Catalog::new(constellations))
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        kind: e.kind(),
    })
}

pub fn load_mapping_file(
    path: impl AsRef<Path>,
    channel_limit: Option<usize>,
) -> Result<StarMapping, ConfigError> {
    let path = path.as_ref();
    let mapping = parse_mapping(&read(path)?, channel_limit)?;
    info!("Read {} channel mappings from {}", mapping.len(), path.display());
    Ok(mapping)
}

pub fn load_catalog_file(
    path: impl AsRef<Path>,
    mapping: &StarMapping,
    channel_count: usize,
) -> Result<Catalog, ConfigError> {
    let path = path.as_ref();
    let catalog = parse_constellations(&read(path)?, mapping, channel_count)?;
    info!("Read {} constellations from {}", catalog.len(), path.display());
    Ok(catalog)
}
