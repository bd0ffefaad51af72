//! Relabeling and epoching configuration
//!
//! [`RelabelConfig`] selects how the trigger stream is relabeled.
//! [`EpochingConfig`] carries the windowing and filtering parameters that are
//! handed, untouched, to the external epoching stage. Defaults match the
//! settings used for the priming sessions.

use crate::convention::Convention;
use crate::error::RelabelError;
use serde::{Deserialize, Serialize};

/// What to do with raw codes that are not prime/target/response triggers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum UnmappedPolicy {
    /// Leave them out of the relabeled stream
    #[default]
    Drop,
    /// Keep them in place with their raw code
    PassThrough,
}

/// Options for a relabeling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelabelConfig {
    /// Label-construction rules of the recording session
    pub convention: Convention,
    /// Handling of codes outside {10, 20, 30}
    pub unmapped: UnmappedPolicy,
    /// Fail when trial log rows are left over after the last prime trigger.
    ///
    /// Running out of rows is always an error.
    pub strict_alignment: bool,
}

impl Default for RelabelConfig {
    fn default() -> Self {
        Self {
            convention: Convention::A,
            unmapped: UnmappedPolicy::Drop,
            strict_alignment: true,
        }
    }
}

/// Baseline interval in seconds; `None` means the epoch edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

/// Peak-to-peak rejection thresholds per channel type (volts)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RejectThresholds {
    pub eeg: f64,
}

/// Parameters for the external epoching/filtering stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochingConfig {
    /// Epoch start relative to the onset (s)
    pub tmin: f64,
    /// Epoch end relative to the onset (s)
    pub tmax: f64,
    pub baseline: Baseline,
    pub reject: RejectThresholds,
    /// Band-pass lower cutoff (Hz)
    pub l_freq: f64,
    /// Band-pass upper cutoff (Hz)
    pub h_freq: f64,
    /// Standard montage name for channel positions
    pub montage: String,
    /// Channels marked bad and interpolated before filtering
    pub bad_channels: Vec<String>,
}

impl Default for EpochingConfig {
    /// -0.2 … 1.0 s epochs, baseline -0.2 s to onset, 1–40 Hz, 150 µV rejection.
    fn default() -> Self {
        Self {
            tmin: -0.2,
            tmax: 1.0,
            baseline: Baseline {
                start: Some(-0.2),
                end: None,
            },
            reject: RejectThresholds { eeg: 150e-6 },
            l_freq: 1.0,
            h_freq: 40.0,
            montage: "standard_1020".to_string(),
            bad_channels: vec!["Fp1".to_string(), "Fp2".to_string()],
        }
    }
}

impl EpochingConfig {
    /// Load from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, RelabelError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RelabelError> {
        if self.tmin >= self.tmax {
            return Err(RelabelError::InvalidConfig(format!(
                "tmin ({}) must be before tmax ({})",
                self.tmin, self.tmax
            )));
        }

        let start = self.baseline.start.unwrap_or(self.tmin);
        let end = self.baseline.end.unwrap_or(0.0_f64.min(self.tmax));
        if start < self.tmin || end > self.tmax || start > end {
            return Err(RelabelError::InvalidConfig(format!(
                "baseline ({start}, {end}) must lie within the epoch ({}, {})",
                self.tmin, self.tmax
            )));
        }

        if self.reject.eeg.is_nan() || self.reject.eeg <= 0.0 {
            return Err(RelabelError::InvalidConfig(
                "EEG rejection threshold must be positive".to_string(),
            ));
        }

        if self.l_freq < 0.0 || self.l_freq >= self.h_freq {
            return Err(RelabelError::InvalidConfig(format!(
                "band-pass cutoffs must satisfy 0 <= l_freq < h_freq (got {} / {})",
                self.l_freq, self.h_freq
            )));
        }

        Ok(())
    }
}

/// Per-field replacements applied on top of an [`EpochingConfig`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochingOverrides {
    pub tmin: Option<f64>,
    pub tmax: Option<f64>,
    pub baseline_start: Option<f64>,
    pub baseline_end: Option<f64>,
    pub l_freq: Option<f64>,
    pub h_freq: Option<f64>,
    pub reject_eeg: Option<f64>,
    pub montage: Option<String>,
    pub bad_channels: Option<Vec<String>>,
}

impl EpochingOverrides {
    /// Apply the overrides and validate the result.
    ///
    /// A baseline start left before a new `tmin` follows the epoch start, so
    /// shortening the epoch does not also require a baseline override.
    pub fn apply(&self, mut config: EpochingConfig) -> Result<EpochingConfig, RelabelError> {
        if let Some(tmin) = self.tmin {
            config.tmin = tmin;
            if self.baseline_start.is_none() {
                config.baseline.start = config.baseline.start.map(|start| start.max(tmin));
            }
        }
        if let Some(tmax) = self.tmax {
            config.tmax = tmax;
        }
        if let Some(start) = self.baseline_start {
            config.baseline.start = Some(start);
        }
        if let Some(end) = self.baseline_end {
            config.baseline.end = Some(end);
        }
        if let Some(l_freq) = self.l_freq {
            config.l_freq = l_freq;
        }
        if let Some(h_freq) = self.h_freq {
            config.h_freq = h_freq;
        }
        if let Some(eeg) = self.reject_eeg {
            config.reject.eeg = eeg;
        }
        if let Some(montage) = &self.montage {
            config.montage = montage.clone();
        }
        if let Some(bad) = &self.bad_channels {
            config.bad_channels = bad.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = EpochingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bad_channels, vec!["Fp1", "Fp2"]);
        assert_eq!(config.reject.eeg, 150e-6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EpochingConfig::from_json(r#"{"h_freq": 30.0, "bad_channels": []}"#).unwrap();
        assert_eq!(config.h_freq, 30.0);
        assert_eq!(config.l_freq, 1.0);
        assert!(config.bad_channels.is_empty());
    }

    #[test]
    fn test_invalid_windows_rejected() {
        let inverted = EpochingConfig {
            tmin: 0.5,
            tmax: 0.1,
            ..EpochingConfig::default()
        };
        assert!(inverted.validate().is_err());

        let baseline_outside = EpochingConfig {
            baseline: Baseline {
                start: Some(-0.5),
                end: None,
            },
            ..EpochingConfig::default()
        };
        assert!(baseline_outside.validate().is_err());

        let band = EpochingConfig {
            l_freq: 40.0,
            h_freq: 1.0,
            ..EpochingConfig::default()
        };
        assert!(matches!(band.validate(), Err(RelabelError::InvalidConfig(_))));
    }

    #[test]
    fn test_relabel_config_defaults() {
        let config: RelabelConfig = serde_json::from_str(r#"{"convention": "b"}"#).unwrap();
        assert_eq!(config.convention, Convention::B);
        assert_eq!(config.unmapped, UnmappedPolicy::Drop);
        assert!(config.strict_alignment);
    }

    #[test]
    fn test_overrides_follow_shorter_epoch() {
        let overrides = EpochingOverrides {
            tmin: Some(-0.1),
            ..EpochingOverrides::default()
        };
        let config = overrides.apply(EpochingConfig::default()).unwrap();
        assert_eq!(config.tmin, -0.1);
        assert_eq!(config.baseline.start, Some(-0.1));
    }

    #[test]
    fn test_overrides_set_baseline() {
        let overrides = EpochingOverrides {
            tmin: Some(-0.5),
            baseline_start: Some(-0.3),
            baseline_end: Some(-0.05),
            bad_channels: Some(vec![]),
            ..EpochingOverrides::default()
        };
        let config = overrides.apply(EpochingConfig::default()).unwrap();
        assert_eq!(
            config.baseline,
            Baseline {
                start: Some(-0.3),
                end: Some(-0.05)
            }
        );
        assert!(config.bad_channels.is_empty());

        let outside = EpochingOverrides {
            baseline_start: Some(-0.4),
            ..EpochingOverrides::default()
        };
        assert!(matches!(
            outside.apply(EpochingConfig::default()),
            Err(RelabelError::InvalidConfig(_))
        ));
    }
}
