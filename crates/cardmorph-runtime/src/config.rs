#![forbid(unsafe_code)]

//! Policy-as-data configuration for morphs.
//!
//! [`MorphConfig`] captures every tunable a deployment may want to change
//! without recompiling: per-kind sizing, lift, radii and the duration table,
//! the two-pane split, the backdrop, the mobile breakpoint, and whether the
//! reduced-motion preference is honored.
//!
//! # Loading
//!
//! ```toml
//! # cardmorph.toml
//! mobile_breakpoint = 640.0
//!
//! [document]
//! lift_ms = 300
//! expand_ms = 450
//!
//! [backdrop]
//! blur = 8.0
//! ```
//!
//! ```rust,ignore
//! let config = MorphConfig::from_toml_file("cardmorph.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the built-in constant it overrides, so
//! `MorphConfig::default()` behaves exactly like no configuration at all.

#[cfg(feature = "policy-config")]
use std::path::Path;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use cardmorph_core::environment::DEFAULT_MOBILE_BREAKPOINT;
use cardmorph_engine::backdrop::BackdropConfig;
use cardmorph_engine::kind::{CardDensity, ContentKind, HeightRule, KindProfile};
use thiserror::Error;
use web_time::Duration;

// ---------------------------------------------------------------------------
// Top-level MorphConfig
// ---------------------------------------------------------------------------

/// All morph tunables.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct MorphConfig {
    /// Viewport width below which mobile layouts apply.
    pub mobile_breakpoint: f64,

    /// Collapse all timings to zero when the environment asks for reduced
    /// motion.
    pub respect_reduced_motion: bool,

    /// Scrim appearance.
    pub backdrop: BackdropConfig,

    /// Project detail overrides.
    pub project: KindPolicyConfig,

    /// Document viewer overrides.
    pub document: KindPolicyConfig,

    /// Contact form overrides.
    pub contact: KindPolicyConfig,

    /// Two-pane split for project content.
    pub panes: PanePolicyConfig,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            respect_reduced_motion: true,
            backdrop: BackdropConfig::default(),
            project: KindPolicyConfig::default(),
            document: KindPolicyConfig::default(),
            contact: KindPolicyConfig::default(),
            panes: PanePolicyConfig::default(),
        }
    }
}

impl MorphConfig {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty JSON.
    #[cfg(feature = "policy-config")]
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Json)
    }

    /// Overrides for `kind`.
    pub fn kind(&self, kind: &ContentKind) -> &KindPolicyConfig {
        match kind {
            ContentKind::Project { .. } => &self.project,
            ContentKind::Document { .. } => &self.document,
            ContentKind::Contact => &self.contact,
        }
    }

    /// The profile a morph of `kind` runs with.
    pub fn profile_for(&self, kind: &ContentKind, reduced_motion: bool) -> KindProfile {
        let mut profile = kind.profile();
        self.kind(kind).apply_to(&mut profile);
        if let ContentKind::Project { density } = kind {
            self.panes.apply_to(&mut profile, *density);
        }
        if reduced_motion && self.respect_reduced_motion {
            profile = profile.with_reduced_motion();
        }
        profile
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; an empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !positive(self.mobile_breakpoint) {
            errors.push(format!(
                "mobile_breakpoint must be positive, got {}",
                self.mobile_breakpoint
            ));
        }
        if !non_negative(self.backdrop.blur) {
            errors.push(format!("backdrop.blur must be >= 0, got {}", self.backdrop.blur));
        }
        if !(0.0..=1.0).contains(&self.backdrop.tint.a) {
            errors.push(format!(
                "backdrop.tint.a must be in [0, 1], got {}",
                self.backdrop.tint.a
            ));
        }
        self.project
            .validate("project", KindProfile::project(CardDensity::Regular), &mut errors);
        self.document
            .validate("document", KindProfile::document(), &mut errors);
        self.contact
            .validate("contact", KindProfile::contact(), &mut errors);
        self.panes.validate(&mut errors);
        errors
    }

    /// `self` if [`validate`](Self::validate) finds nothing, otherwise
    /// [`ConfigError::Invalid`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(self);
        }
        for problem in &errors {
            tracing::warn!(%problem, "invalid morph config");
        }
        Err(ConfigError::Invalid(errors))
    }
}

// ---------------------------------------------------------------------------
// Per-kind overrides
// ---------------------------------------------------------------------------

/// Overrides for one content kind. Unset fields keep the built-in value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct KindPolicyConfig {
    pub max_width: Option<f64>,
    pub max_height: Option<HeightRule>,
    pub width_fraction: Option<f64>,
    pub height_fraction: Option<f64>,
    pub lift_offset_y: Option<f64>,
    pub lift_scale: Option<f64>,
    pub radius_idle: Option<f64>,
    pub radius_expanded: Option<f64>,
    pub lift_ms: Option<u64>,
    pub expand_ms: Option<u64>,
    pub collapse_ms: Option<u64>,
    pub fall_ms: Option<u64>,
    pub fade_on_fall: Option<bool>,
}

impl KindPolicyConfig {
    /// Write the set overrides into `profile`.
    pub fn apply_to(&self, profile: &mut KindProfile) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        let ms = |v: Option<u64>| v.map(Duration::from_millis);
        set(&mut profile.sizing.max_width, self.max_width);
        set(&mut profile.sizing.max_height, self.max_height);
        set(&mut profile.sizing.width_fraction, self.width_fraction);
        set(&mut profile.sizing.height_fraction, self.height_fraction);
        set(&mut profile.lift.offset_y, self.lift_offset_y);
        set(&mut profile.lift.scale, self.lift_scale);
        set(&mut profile.radius.idle, self.radius_idle);
        set(&mut profile.radius.expanded, self.radius_expanded);
        set(&mut profile.timings.lift, ms(self.lift_ms));
        set(&mut profile.timings.expand, ms(self.expand_ms));
        set(&mut profile.timings.collapse, ms(self.collapse_ms));
        set(&mut profile.timings.fall, ms(self.fall_ms));
        set(&mut profile.fade_on_fall, self.fade_on_fall);
    }

    /// Check the effective profile these overrides produce on `base`.
    fn validate(&self, name: &str, base: KindProfile, errors: &mut Vec<String>) {
        let mut profile = base;
        self.apply_to(&mut profile);
        let sizing = &profile.sizing;
        if !positive(sizing.max_width) {
            errors.push(format!("{name}.max_width must be > 0, got {}", sizing.max_width));
        }
        match sizing.max_height {
            HeightRule::Fixed { max } if !positive(max) => {
                errors.push(format!("{name}.max_height.max must be > 0, got {max}"));
            }
            HeightRule::MediaPlusBody { aspect, body } if !(positive(aspect) && non_negative(body)) => {
                errors.push(format!(
                    "{name}.max_height needs aspect > 0 and body >= 0, got {aspect} / {body}"
                ));
            }
            _ => {}
        }
        for (field, v) in [
            ("width_fraction", sizing.width_fraction),
            ("height_fraction", sizing.height_fraction),
        ] {
            if !(positive(v) && v <= 1.0) {
                errors.push(format!("{name}.{field} must be in (0, 1], got {v}"));
            }
        }
        if !(1.0..=1.2).contains(&profile.lift.scale) {
            errors.push(format!(
                "{name}.lift_scale must be in [1.0, 1.2], got {}",
                profile.lift.scale
            ));
        }
        for (field, v) in [
            ("radius_idle", profile.radius.idle),
            ("radius_expanded", profile.radius.expanded),
        ] {
            if !non_negative(v) {
                errors.push(format!("{name}.{field} must be >= 0, got {v}"));
            }
        }
        let timings = &profile.timings;
        for (field, v) in [
            ("lift_ms", timings.lift),
            ("expand_ms", timings.expand),
            ("collapse_ms", timings.collapse),
            ("fall_ms", timings.fall),
        ] {
            if v.is_zero() {
                errors.push(format!(
                    "{name}.{field} must be > 0 (reduced motion zeroes timings at runtime)"
                ));
            }
        }
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

// ---------------------------------------------------------------------------
// Two-pane split
// ---------------------------------------------------------------------------

/// Two-pane split for project content.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct PanePolicyConfig {
    pub separate_scale_mobile: f64,
    pub separate_scale_desktop: f64,
    pub compact_card_image_height_pct: f64,
    pub regular_card_image_height_pct: f64,
    pub compact_card_image_width_pct: f64,
    pub regular_card_image_width_pct: f64,
    pub open_image_width_pct: f64,
    pub open_image_height_pct: f64,
}

impl Default for PanePolicyConfig {
    fn default() -> Self {
        let compact = KindProfile::project(CardDensity::Compact).split;
        let regular = KindProfile::project(CardDensity::Regular).split;
        match (compact, regular) {
            (Some(c), Some(r)) => Self {
                separate_scale_mobile: r.separate_scale_mobile,
                separate_scale_desktop: r.separate_scale_desktop,
                compact_card_image_height_pct: c.card_image_height_pct,
                regular_card_image_height_pct: r.card_image_height_pct,
                compact_card_image_width_pct: c.card_image_width_pct,
                regular_card_image_width_pct: r.card_image_width_pct,
                open_image_width_pct: r.open_image_width_pct,
                open_image_height_pct: r.open_image_height_pct,
            },
            _ => Self {
                separate_scale_mobile: 1.15,
                separate_scale_desktop: 1.5,
                compact_card_image_height_pct: 70.0,
                regular_card_image_height_pct: 55.0,
                compact_card_image_width_pct: 35.0,
                regular_card_image_width_pct: 42.0,
                open_image_width_pct: 45.0,
                open_image_height_pct: 40.0,
            },
        }
    }
}

impl PanePolicyConfig {
    /// Write the split for `density` into `profile`, if it has one.
    pub fn apply_to(&self, profile: &mut KindProfile, density: CardDensity) {
        let Some(split) = profile.split.as_mut() else {
            return;
        };
        let compact = density == CardDensity::Compact;
        split.separate_scale_mobile = self.separate_scale_mobile;
        split.separate_scale_desktop = self.separate_scale_desktop;
        split.card_image_height_pct = if compact {
            self.compact_card_image_height_pct
        } else {
            self.regular_card_image_height_pct
        };
        split.card_image_width_pct = if compact {
            self.compact_card_image_width_pct
        } else {
            self.regular_card_image_width_pct
        };
        split.open_image_width_pct = self.open_image_width_pct;
        split.open_image_height_pct = self.open_image_height_pct;
    }

    fn validate(&self, errors: &mut Vec<String>) {
        for (field, v) in [
            ("compact_card_image_height_pct", self.compact_card_image_height_pct),
            ("regular_card_image_height_pct", self.regular_card_image_height_pct),
            ("compact_card_image_width_pct", self.compact_card_image_width_pct),
            ("regular_card_image_width_pct", self.regular_card_image_width_pct),
            ("open_image_width_pct", self.open_image_width_pct),
            ("open_image_height_pct", self.open_image_height_pct),
        ] {
            if !(0.0..=100.0).contains(&v) {
                errors.push(format!("panes.{field} must be in [0, 100], got {v}"));
            }
        }
        for (field, v) in [
            ("separate_scale_mobile", self.separate_scale_mobile),
            ("separate_scale_desktop", self.separate_scale_desktop),
        ] {
            if !(v.is_finite() && v >= 1.0) {
                errors.push(format!("panes.{field} must be >= 1, got {v}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a morph configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    #[error("TOML parse error: {0}")]
    Toml(toml::de::Error),
    /// JSON parse or serialize error.
    #[cfg(feature = "policy-config")]
    #[error("JSON error: {0}")]
    Json(serde_json::Error),
    /// Validation found problems.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardmorph_engine::kind::DocumentKind;

    #[test]
    fn default_matches_built_in_profiles() {
        let config = MorphConfig::default();
        for kind in [
            ContentKind::Project {
                density: CardDensity::Compact,
            },
            ContentKind::Project {
                density: CardDensity::Regular,
            },
            ContentKind::Document {
                document: DocumentKind::Resume,
            },
            ContentKind::Contact,
        ] {
            assert_eq!(config.profile_for(&kind, false), kind.profile(), "{kind:?}");
        }
    }

    #[test]
    fn default_validates_clean() {
        assert!(MorphConfig::default().validate().is_empty());
        assert!(MorphConfig::default().validated().is_ok());
    }

    #[test]
    fn reduced_motion_zeroes_timings_when_respected() {
        let mut config = MorphConfig::default();
        let profile = config.profile_for(&ContentKind::Contact, true);
        assert!(profile.timings.is_instant());
        config.respect_reduced_motion = false;
        let profile = config.profile_for(&ContentKind::Contact, true);
        assert!(!profile.timings.is_instant());
    }

    #[test]
    fn overrides_flow_into_profile() {
        let mut config = MorphConfig::default();
        config.document.expand_ms = Some(650);
        config.document.max_width = Some(800.0);
        let profile = config.profile_for(
            &ContentKind::Document {
                document: DocumentKind::ExtendedCv,
            },
            false,
        );
        assert_eq!(profile.timings.expand, Duration::from_millis(650));
        assert_eq!(profile.sizing.max_width, 800.0);
    }

    #[test]
    fn validate_collects_multiple_problems() {
        let mut config = MorphConfig::default();
        config.contact.width_fraction = Some(1.5);
        config.contact.lift_scale = Some(2.0);
        config.project.fall_ms = Some(0);
        config.panes.open_image_width_pct = 120.0;
        config.mobile_breakpoint = -1.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 5, "{errors:#?}");
        assert!(errors.iter().any(|e| e.contains("contact.width_fraction")));
        assert!(errors.iter().any(|e| e.contains("panes.open_image_width_pct")));
    }

    #[test]
    fn invalid_config_reports_all_problems() {
        let mut config = MorphConfig::default();
        config.document.max_width = Some(0.0);
        let err = config.validated().unwrap_err();
        assert!(err.to_string().contains("document.max_width"));
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn partial_toml_preserves_defaults() {
        let config = MorphConfig::from_toml_str(
            r#"
            mobile_breakpoint = 640.0

            [document]
            expand_ms = 600

            [backdrop]
            blur = 8.0
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.mobile_breakpoint, 640.0);
        assert_eq!(config.document.expand_ms, Some(600));
        assert_eq!(config.document.lift_ms, None);
        assert_eq!(config.backdrop.blur, 8.0);
        assert_eq!(config.backdrop.fade_ms, 500);
        assert_eq!(config.contact, MorphConfig::default().contact);
    }

    #[cfg(feature = "policy-config")]
    #[test]
    fn json_round_trip_and_file_loading() {
        let original = MorphConfig::default();
        let json = original.to_json().expect("serializes");
        assert_eq!(MorphConfig::from_json_str(&json).expect("parses"), original);

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cardmorph.json");
        std::fs::write(&path, json).expect("write");
        assert_eq!(MorphConfig::from_json_file(&path).expect("loads"), original);
        assert!(matches!(
            MorphConfig::from_toml_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
