//! Relation styles and the style registry.
//!
//! Each relation type can carry a visual style (color, line shape/pattern,
//! label, …) defined in a directory of `.md` files: the file stem is the type
//! name and the YAML frontmatter holds `$`-prefixed style fields. Types
//! without a definition use a process-wide default style. Watching the
//! directory for changes is host glue; hosts call [`StyleRegistry::load`]
//! again and restart the engine when a definition changes.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Fallback stroke color for unstyled or malformed definitions.
pub const DEFAULT_COLOR: u32 = 0x808080;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineShape {
    #[default]
    Straight,
    Curved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePattern {
    #[default]
    Solid,
    Dashed,
}

/// Semantic direction of a relation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
    Bidirectional,
}

/// Visual style of one relation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationStyle {
    /// Hex color string (`#rrggbb`).
    pub color: String,
    pub shape: LineShape,
    pub pattern: LinePattern,
    pub width: f32,
    pub arrow: bool,
    pub direction: Direction,
    /// Name of the inverse relation type, when one exists.
    pub inverse: Option<String>,
    /// Display label; empty means "use the type name".
    pub label: String,
    pub description: Option<String>,
}

impl Default for RelationStyle {
    fn default() -> Self {
        Self {
            color: "#808080".to_string(),
            shape: LineShape::Straight,
            pattern: LinePattern::Solid,
            width: 2.0,
            arrow: true,
            direction: Direction::Outgoing,
            inverse: None,
            label: String::new(),
            description: None,
        }
    }
}

/// Parse a `#rrggbb` hex color into a packed `0xRRGGBB` value.
pub fn parse_hex_color(hex: &str) -> Option<u32> {
    let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Frontmatter parsing
// ────────────────────────────────────────────────────────────────────────────

/// The `$`-prefixed style fields of a definition file's YAML frontmatter.
/// Unknown fields (the rest of the note's frontmatter) are ignored.
#[derive(Debug, Default, Deserialize)]
struct StyleFrontmatter {
    #[serde(rename = "$color")]
    color: Option<String>,
    #[serde(rename = "$shape")]
    shape: Option<String>,
    #[serde(rename = "$pattern")]
    pattern: Option<String>,
    #[serde(rename = "$width")]
    width: Option<f32>,
    #[serde(rename = "$arrow")]
    arrow: Option<bool>,
    #[serde(rename = "$direction")]
    direction: Option<String>,
    #[serde(rename = "$inverse")]
    inverse: Option<String>,
    #[serde(rename = "$label")]
    label: Option<String>,
    #[serde(rename = "$description")]
    description: Option<String>,
}

impl StyleFrontmatter {
    fn into_style(self) -> RelationStyle {
        let defaults = RelationStyle::default();
        RelationStyle {
            color: self.color.unwrap_or(defaults.color),
            shape: self.shape.as_deref().map(parse_shape).unwrap_or_default(),
            pattern: self
                .pattern
                .as_deref()
                .map(parse_pattern)
                .unwrap_or_default(),
            width: self.width.unwrap_or(defaults.width),
            arrow: self.arrow.unwrap_or(defaults.arrow),
            direction: self
                .direction
                .as_deref()
                .map(parse_direction)
                .unwrap_or_default(),
            inverse: self.inverse,
            label: self.label.unwrap_or_default(),
            description: self.description,
        }
    }
}

fn parse_shape(s: &str) -> LineShape {
    match s.to_ascii_lowercase().as_str() {
        "curved" => LineShape::Curved,
        _ => LineShape::Straight,
    }
}

fn parse_pattern(s: &str) -> LinePattern {
    match s.to_ascii_lowercase().as_str() {
        "dashed" => LinePattern::Dashed,
        _ => LinePattern::Solid,
    }
}

fn parse_direction(s: &str) -> Direction {
    match s.to_ascii_lowercase().as_str() {
        "incoming" => Direction::Incoming,
        "bidirectional" => Direction::Bidirectional,
        _ => Direction::Outgoing,
    }
}

/// The frontmatter block between the leading `---` fences, or `None`.
fn extract_frontmatter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---")?;
    let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))?;
    let end = rest.find("\n---")?;
    Some(&rest[..end])
}

fn load_style_file(path: &std::path::Path) -> Result<RelationStyle> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Read style file {}", path.display()))?;
    let frontmatter =
        extract_frontmatter(&text).ok_or_else(|| anyhow!("no frontmatter block"))?;
    let front: StyleFrontmatter =
        serde_yaml::from_str(frontmatter).context("parse YAML frontmatter")?;
    Ok(front.into_style())
}

// ────────────────────────────────────────────────────────────────────────────
// StyleRegistry
// ────────────────────────────────────────────────────────────────────────────

/// Maps relation type names to visual styles, with a default fallback.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    relation_dir: Utf8PathBuf,
    styles: IndexMap<String, RelationStyle>,
    default_style: RelationStyle,
}

impl StyleRegistry {
    pub fn new(relation_dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            relation_dir: relation_dir.as_ref().to_path_buf(),
            styles: IndexMap::new(),
            default_style: RelationStyle::default(),
        }
    }

    pub fn relation_dir(&self) -> &Utf8Path {
        &self.relation_dir
    }

    /// Register a style directly, e.g. for hosts with their own storage.
    pub fn insert(&mut self, relation_type: impl Into<String>, style: RelationStyle) {
        self.styles.insert(relation_type.into(), style);
    }

    /// Reload all definitions from the relation directory. A file that fails
    /// to read or parse is dropped with a warning; other definitions are
    /// unaffected. A missing directory leaves the registry empty.
    /// Returns the number of loaded styles.
    pub fn load(&mut self) -> Result<usize> {
        self.styles.clear();
        let dir = self.relation_dir.as_std_path();
        if !dir.is_dir() {
            eprintln!(
                "[relgraph] Warning: relation style directory {} not found, using defaults",
                self.relation_dir
            );
            return Ok(0);
        }
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    eprintln!("[relgraph] Warning: skipping unreadable entry: {err}");
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match load_style_file(path) {
                Ok(style) => {
                    self.styles.insert(stem.to_string(), style);
                }
                Err(err) => eprintln!(
                    "[relgraph] Warning: skipping style {}: {:#}",
                    path.display(),
                    err
                ),
            }
        }
        Ok(self.styles.len())
    }

    pub fn has(&self, relation_type: &str) -> bool {
        self.styles.contains_key(relation_type)
    }

    /// The style for a type, or the default style when unregistered.
    pub fn get(&self, relation_type: &str) -> &RelationStyle {
        self.styles
            .get(relation_type)
            .unwrap_or(&self.default_style)
    }

    /// The label shown on the graph for a type: the configured non-empty
    /// label, else the type name itself.
    pub fn display_label(&self, relation_type: &str) -> String {
        match self.styles.get(relation_type) {
            Some(style) if !style.label.is_empty() => style.label.clone(),
            _ => relation_type.to_string(),
        }
    }

    /// All registered type names, in load order.
    pub fn relation_types(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
