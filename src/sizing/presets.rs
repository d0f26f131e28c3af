//! Output-size presets: aspect ratios over base sizes, and named size tables loaded from JSON.

use std::{collections::BTreeMap, fmt, path::Path, str::FromStr};

use anyhow::Context as _;

use crate::foundation::{
    core::Dimensions,
    error::{KlinterError, KlinterResult},
};

/// Named aspect ratio as `(width multiplier, height multiplier)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectRatio {
    pub label: &'static str,
    pub width_mult: f64,
    pub height_mult: f64,
}

const fn ratio(label: &'static str, width_mult: f64, height_mult: f64) -> AspectRatio {
    AspectRatio {
        label,
        width_mult,
        height_mult,
    }
}

// Multipliers are stored rounded to four places; derived sizes depend on that rounding.
pub const ASPECT_RATIOS: [AspectRatio; 11] = [
    ratio("1:1", 1.0, 1.0),
    ratio("3:2", 1.5, 1.0),
    ratio("5:4", 1.25, 1.0),
    ratio("8:5", 1.6, 1.0),
    ratio("16:9", 1.7778, 1.0),
    ratio("21:9", 2.3333, 1.0),
    ratio("2:3", 1.0, 1.5),
    ratio("4:5", 1.0, 1.25),
    ratio("5:8", 1.0, 1.6),
    ratio("9:16", 1.0, 1.7778),
    ratio("9:21", 1.0, 2.3333),
];

pub const BASE_SIZES: [u32; 7] = [512, 768, 1024, 1152, 1280, 1408, 1536];

pub fn find_aspect(label: &str) -> KlinterResult<AspectRatio> {
    let label = label.trim();
    ASPECT_RATIOS
        .iter()
        .copied()
        .find(|r| r.label == label)
        .ok_or_else(|| KlinterError::invalid_parameter(format!("unknown aspect ratio '{label}'")))
}

/// Dimensions for `base` along the smaller side at aspect `label`, both sides even.
pub fn aspect_dimensions(base: u32, label: &str) -> KlinterResult<Dimensions> {
    if base == 0 {
        return Err(KlinterError::invalid_parameter("base size must be > 0"));
    }
    let r = find_aspect(label)?;
    let base_f = f64::from(base);
    let (width, height) = if r.width_mult >= r.height_mult {
        (((base_f * r.width_mult) / r.height_mult) as u32, base)
    } else {
        (base, ((base_f * r.height_mult) / r.width_mult) as u32)
    };
    Ok(Dimensions::new(round_up_even(width), round_up_even(height)))
}

fn round_up_even(v: u32) -> u32 {
    if v % 2 == 0 { v } else { v + 1 }
}

/// One row of a [`SizeTable`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SizeEntry {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl SizeEntry {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Named output sizes, loaded once and shared by reference.
///
/// JSON shape: `{"sizes": {"<key>": {"name": "...", "width": 1024, "height": 768}}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SizeTable {
    sizes: BTreeMap<String, SizeEntry>,
}

impl SizeTable {
    pub fn from_json_str(json: &str) -> KlinterResult<Self> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| KlinterError::serde(format!("parse size table: {e}")))?;
        table.validate()?;
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> KlinterResult<Self> {
        Self::from_json_str(&read_table(path.as_ref())?)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn get(&self, key: &str) -> KlinterResult<&SizeEntry> {
        self.sizes
            .get(key)
            .ok_or_else(|| KlinterError::invalid_parameter(format!("unknown size key '{key}'")))
    }

    /// Display labels, `"<key> - <name>"`, in key order.
    pub fn labels(&self) -> Vec<String> {
        self.sizes
            .iter()
            .map(|(key, entry)| format!("{key} - {}", entry.name))
            .collect()
    }

    /// Resolve a label produced by [`SizeTable::labels`].
    pub fn get_by_label(&self, label: &str) -> KlinterResult<&SizeEntry> {
        let key = label.split(" - ").next().unwrap_or(label).trim();
        let entry = self.get(key)?;
        if format!("{key} - {}", entry.name) != label.trim() {
            return Err(KlinterError::invalid_parameter(format!(
                "unknown size label '{label}'"
            )));
        }
        Ok(entry)
    }

    fn validate(&self) -> KlinterResult<()> {
        for (key, entry) in &self.sizes {
            if entry.dimensions().is_empty() {
                return Err(KlinterError::invalid_parameter(format!(
                    "size '{key}' has empty dimensions {}",
                    entry.dimensions()
                )));
            }
        }
        Ok(())
    }
}

/// Size class column of a [`FluxSizeTable`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Tiny,
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 4] = [
        SizeClass::Tiny,
        SizeClass::Small,
        SizeClass::Medium,
        SizeClass::Large,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl FromStr for SizeClass {
    type Err = KlinterError;

    fn from_str(s: &str) -> KlinterResult<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == key)
            .ok_or_else(|| KlinterError::invalid_parameter(format!("unknown size class '{s}'")))
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `Flipped` swaps width and height and reverses the ratio label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Normal,
    Flipped,
}

impl FromStr for Orientation {
    type Err = KlinterError;

    fn from_str(s: &str) -> KlinterResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "flipped" => Ok(Self::Flipped),
            _ => Err(KlinterError::invalid_parameter(format!(
                "unknown orientation '{s}'"
            ))),
        }
    }
}

/// Dimensions plus a human-readable description, e.g. `medium 16:9 (1344x768)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeSelection {
    pub dimensions: Dimensions,
    pub description: String,
}

/// Size table keyed by aspect ratio, then size class.
///
/// JSON shape: `{"sizes": {"16:9": {"tiny": {"width": 672, "height": 384}, ...}}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FluxSizeTable {
    sizes: BTreeMap<String, BTreeMap<SizeClass, Dimensions>>,
}

impl FluxSizeTable {
    pub fn from_json_str(json: &str) -> KlinterResult<Self> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| KlinterError::serde(format!("parse flux size table: {e}")))?;
        for (aspect, row) in &table.sizes {
            if let Some((class, dims)) = row.iter().find(|(_, d)| d.is_empty()) {
                return Err(KlinterError::invalid_parameter(format!(
                    "size '{aspect}' / '{class}' has empty dimensions {dims}"
                )));
            }
        }
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> KlinterResult<Self> {
        Self::from_json_str(&read_table(path.as_ref())?)
    }

    /// Aspect ratio labels in key order.
    pub fn aspects(&self) -> Vec<&str> {
        self.sizes.keys().map(String::as_str).collect()
    }

    /// Size classes defined for `aspect`.
    pub fn classes(&self, aspect: &str) -> KlinterResult<Vec<SizeClass>> {
        Ok(self.row(aspect)?.keys().copied().collect())
    }

    pub fn select(
        &self,
        aspect: &str,
        size: SizeClass,
        orientation: Orientation,
    ) -> KlinterResult<SizeSelection> {
        let dims = *self.row(aspect)?.get(&size).ok_or_else(|| {
            KlinterError::invalid_parameter(format!("no '{size}' size for aspect '{aspect}'"))
        })?;
        let (dimensions, ratio) = match orientation {
            Orientation::Normal => (dims, aspect.to_string()),
            Orientation::Flipped => (
                Dimensions::new(dims.height, dims.width),
                aspect.rsplit(':').collect::<Vec<_>>().join(":"),
            ),
        };
        Ok(SizeSelection {
            dimensions,
            description: format!("{size} {ratio} ({dimensions})"),
        })
    }

    fn row(&self, aspect: &str) -> KlinterResult<&BTreeMap<SizeClass, Dimensions>> {
        self.sizes
            .get(aspect)
            .ok_or_else(|| KlinterError::invalid_parameter(format!("unknown aspect '{aspect}'")))
    }
}

fn read_table(path: &Path) -> KlinterResult<String> {
    Ok(std::fs::read_to_string(path)
        .with_context(|| format!("read size table '{}'", path.display()))?)
}

#[cfg(test)]
#[path = "../../tests/unit/sizing/presets.rs"]
mod tests;
