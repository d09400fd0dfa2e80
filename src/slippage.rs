//! Slippage tolerance selection: a fixed preset list plus a manual entry.
//!
//! Values are entered and displayed in percent but stored as ratios
//! (`"1"` → `0.01`). An invalid manual entry is reported through [`SlippageConfig::error`]
//! and never replaces the last valid tolerance.

use crate::config::DEFAULT_SLIPPAGE_PRESETS;
use crate::errors::{AppError, QuoteError, Result};
use crate::utils::{format_amount, is_decimal_str};
use bigdecimal::BigDecimal;
use std::str::FromStr;
use tracing::debug;

/// Upper bound for a manually entered tolerance, in percent.
const MAX_MANUAL_PERCENT: u32 = 100;

/// One entry of the preset list as shown by the settings panel.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableSlippage {
    pub index: usize,
    /// Percent label, e.g. "1".
    pub label: String,
    pub ratio: BigDecimal,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct SlippageConfig {
    labels: Vec<String>,
    presets: Vec<BigDecimal>,
    selected: usize,
    is_manual: bool,
    manual_text: String,
    /// Last manual tolerance that passed validation.
    manual_value: Option<BigDecimal>,
    manual_error: Option<QuoteError>,
}

impl Default for SlippageConfig {
    fn default() -> Self {
        let labels: Vec<String> = DEFAULT_SLIPPAGE_PRESETS.iter().map(|p| p.to_string()).collect();
        let presets = labels
            .iter()
            .filter_map(|label| percent_to_ratio(label))
            .collect();
        Self::from_parts(labels, presets)
    }
}

impl SlippageConfig {
    /// Builds a config from percent labels. Fails on an empty list or an invalid preset.
    pub fn new(labels: &[String]) -> Result<Self> {
        if labels.is_empty() {
            return Err(AppError::Config("at least one slippage preset is required".into()));
        }
        let presets = labels
            .iter()
            .map(|label| {
                percent_to_ratio(label)
                    .ok_or_else(|| AppError::Config(format!("invalid slippage preset {label:?}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_parts(labels.to_vec(), presets))
    }

    fn from_parts(labels: Vec<String>, presets: Vec<BigDecimal>) -> Self {
        Self {
            labels,
            presets,
            selected: 0,
            is_manual: false,
            manual_text: String::new(),
            manual_value: None,
            manual_error: None,
        }
    }

    pub fn selectable_slippages(&self) -> Vec<SelectableSlippage> {
        self.labels
            .iter()
            .zip(&self.presets)
            .enumerate()
            .map(|(index, (label, ratio))| SelectableSlippage {
                index,
                label: label.clone(),
                ratio: ratio.clone(),
                selected: !self.is_manual && index == self.selected,
            })
            .collect()
    }

    /// Selects a preset and leaves manual mode. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.presets.len() {
            return false;
        }
        self.selected = index;
        self.is_manual = false;
        true
    }

    pub fn set_is_manual(&mut self, is_manual: bool) {
        self.is_manual = is_manual;
    }

    pub fn is_manual(&self) -> bool {
        self.is_manual
    }

    pub fn manual_text(&self) -> &str {
        &self.manual_text
    }

    /// Records manual input (percent) and switches to manual mode.
    pub fn set_manual(&mut self, text: &str) {
        self.is_manual = true;
        self.manual_text = text.to_string();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.manual_error = None;
            return;
        }
        match percent_to_ratio(trimmed) {
            Some(ratio) if ratio <= max_manual_ratio() => {
                self.manual_value = Some(ratio);
                self.manual_error = None;
            }
            _ => {
                debug!(input = text, "[SLIPPAGE] rejected manual tolerance");
                self.manual_error = Some(QuoteError::SlippageFormat(text.to_string()));
            }
        }
    }

    /// Manual-entry error, reported only while manual mode is active.
    pub fn error(&self) -> Option<&QuoteError> {
        if self.is_manual {
            self.manual_error.as_ref()
        } else {
            None
        }
    }

    /// Tolerance ratio used for computation.
    pub fn tolerance(&self) -> BigDecimal {
        if self.is_manual {
            if let Some(value) = &self.manual_value {
                return value.clone();
            }
        }
        self.presets[self.selected].clone()
    }

    /// Tolerance in percent as handed to the wallet message (e.g. "1", "2.5").
    pub fn slippage_percent(&self) -> String {
        format_amount(&(self.tolerance() * BigDecimal::from(100)), 4)
    }
}

fn max_manual_ratio() -> BigDecimal {
    BigDecimal::from(MAX_MANUAL_PERCENT) / BigDecimal::from(100)
}

fn percent_to_ratio(percent: &str) -> Option<BigDecimal> {
    if !is_decimal_str(percent) {
        return None;
    }
    BigDecimal::from_str(percent)
        .ok()
        .map(|value| value / BigDecimal::from(100))
}
