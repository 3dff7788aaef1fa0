//! Visual classification of query results.

use kehilot_map_history_models::Confidence;
use kehilot_map_source::config::SizeConfig;
use serde::Serialize;

/// Logarithmic marker size scale: `max(base_size, floor(k * ln(m)))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeScale {
    /// Smallest radius in pixels.
    pub base_size: f64,
    /// Multiplier applied to `ln(m)`.
    pub k: f64,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self::from(&SizeConfig::default())
    }
}

impl From<&SizeConfig> for SizeScale {
    fn from(config: &SizeConfig) -> Self {
        Self {
            base_size: config.base_size,
            k: config.k,
        }
    }
}

impl SizeScale {
    /// Marker radius for a magnitude. Absent or zero magnitudes get the
    /// base size.
    #[must_use]
    pub fn radius(&self, magnitude: Option<u64>) -> f64 {
        match magnitude {
            Some(m) if m > 0 => {
                #[allow(clippy::cast_precision_loss)]
                let m = m as f64;
                (self.k * m.ln()).floor().max(self.base_size)
            }
            _ => self.base_size,
        }
    }
}

/// Colour and legend label for a confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfidenceStyle {
    /// CSS colour.
    pub color: &'static str,
    /// Legend label.
    pub label: &'static str,
}

/// Maps a confidence bucket to its marker style.
#[must_use]
pub const fn confidence_style(confidence: Confidence) -> ConfidenceStyle {
    match confidence {
        Confidence::High => ConfidenceStyle {
            color: "#2e7d32",
            label: "High confidence",
        },
        Confidence::Medium => ConfidenceStyle {
            color: "#f9a825",
            label: "Medium confidence",
        },
        Confidence::Low => ConfidenceStyle {
            color: "#c62828",
            label: "Low confidence",
        },
        Confidence::Unknown => ConfidenceStyle {
            color: "#757575",
            label: "Unknown confidence",
        },
    }
}

/// Formats a population for compact labels.
///
/// `1_234_567` becomes `"1.2M"`, `3_400` becomes `"3.4k"`, and anything
/// under a thousand is printed as is. The unit is picked after rounding to
/// one decimal, so `999_960` is `"1.0M"`.
#[must_use]
pub fn format_population(population: u64) -> String {
    if population < 1_000 {
        return population.to_string();
    }
    let tenths = |unit: u64| population.saturating_add(unit / 20) / (unit / 10);
    let thousands = tenths(1_000);
    if thousands < 10_000 {
        format!("{}.{}k", thousands / 10, thousands % 10)
    } else {
        let millions = tenths(1_000_000);
        format!("{}.{}M", millions / 10, millions % 10)
    }
}
