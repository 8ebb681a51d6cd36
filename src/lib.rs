// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Shotlog library - shot list entry and dashboard for film production
//!
//! This crate provides the shot taxonomy, the shot record model, the add
//! form controller, the persistence gateway (hosted table + storyboard
//! storage), and the dashboard/app shell that ties them together.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod gateway;
pub mod taxonomy;
pub mod tui;

/// Core data types for a shot entry
pub mod types {
    use crate::taxonomy::{AngleType, DutchAngle, Equipment, Focus, Framing, Movement, ShotSize};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use sha2::{Digest, Sha256};
    use std::fmt;
    use std::path::Path;

    // =========================================================================
    // Scene / Shot numbers
    // =========================================================================

    /// Non-negative whole scene number
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SceneNumber(u32);

    impl SceneNumber {
        /// Wrap a scene number
        #[must_use]
        pub fn new(value: u32) -> Self {
            Self(value)
        }

        /// The raw number
        #[must_use]
        pub fn get(self) -> u32 {
            self.0
        }

        /// Parse form input. Accepts surrounding whitespace and whole-valued
        /// decimals such as `5.0`. The error is a short reason for the user.
        pub fn parse(input: &str) -> Result<Self, &'static str> {
            let text = input.trim();
            if text.is_empty() {
                return Err("is required");
            }
            if let Ok(n) = text.parse::<u32>() {
                return Ok(Self(n));
            }
            let value: f64 = text.parse().map_err(|_| "must be a whole number")?;
            if !value.is_finite() {
                return Err("must be a whole number");
            }
            if value < 0.0 {
                return Err("must not be negative");
            }
            if value.fract() != 0.0 {
                return Err("must be a whole number");
            }
            if value > f64::from(u32::MAX) {
                return Err("is too large");
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let scene = value as u32;
            Ok(Self(scene))
        }
    }

    impl fmt::Display for SceneNumber {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    /// Non-negative shot number with one decimal place, stored as tenths
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ShotNumber {
        tenths: u32,
    }

    impl ShotNumber {
        /// Build from tenths, e.g. `21` is shot 2.1
        #[must_use]
        pub fn from_tenths(tenths: u32) -> Self {
            Self { tenths }
        }

        /// Value in tenths
        #[must_use]
        pub fn tenths(self) -> u32 {
            self.tenths
        }

        /// Value as a decimal
        #[must_use]
        pub fn as_f64(self) -> f64 {
            f64::from(self.tenths) / 10.0
        }

        /// Convert a stored decimal, rejecting negatives and extra precision.
        /// Form input goes through [`ShotNumber::parse`], which checks the
        /// typed digits instead.
        pub fn from_f64(value: f64) -> Result<Self, &'static str> {
            if !value.is_finite() {
                return Err("must be a decimal number");
            }
            if value < 0.0 {
                return Err("must not be negative");
            }
            let scaled = value * 10.0;
            let rounded = scaled.round();
            if (scaled - rounded).abs() > 1e-6 {
                return Err("must have at most one decimal place");
            }
            if rounded > f64::from(u32::MAX) {
                return Err("is too large");
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let tenths = rounded as u32;
            Ok(Self { tenths })
        }

        /// Parse form input (`2.1`, ` 3 `, `4.0`)
        pub fn parse(input: &str) -> Result<Self, &'static str> {
            let text = input.trim();
            if text.is_empty() {
                return Err("is required");
            }
            let (negative, digits) = match text.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, text),
            };
            let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
            let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
            if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
                return Err("must be a decimal number");
            }
            if negative {
                return Err("must not be negative");
            }
            let mut fraction = fraction.bytes();
            let first = fraction.next().map_or(0, |b| u32::from(b - b'0'));
            if fraction.any(|b| b != b'0') {
                return Err("must have at most one decimal place");
            }
            let whole: u32 = if whole.is_empty() {
                0
            } else {
                whole.parse().map_err(|_| "is too large")?
            };
            whole
                .checked_mul(10)
                .and_then(|tenths| tenths.checked_add(first))
                .map(Self::from_tenths)
                .ok_or("is too large")
        }
    }

    impl fmt::Display for ShotNumber {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
        }
    }

    impl Serialize for ShotNumber {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_f64(self.as_f64())
        }
    }

    impl<'de> Deserialize<'de> for ShotNumber {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let value = f64::deserialize(deserializer)?;
            Self::from_f64(value)
                .map_err(|reason| serde::de::Error::custom(format!("shot {reason}")))
        }
    }

    fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    // =========================================================================
    // Shot Record
    // =========================================================================

    /// One submitted film shot.
    ///
    /// Built by [`crate::form::FormController`] once a draft validates, and
    /// never changed afterwards. Field names serialize in snake_case, which
    /// is the column layout of the hosted shot table.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ShotRecord {
        pub(crate) scene: SceneNumber,
        pub(crate) shot: ShotNumber,
        #[serde(default)]
        pub(crate) storyboard_url: Option<String>,
        pub(crate) description: String,
        pub(crate) shot_size: ShotSize,
        #[serde(default, deserialize_with = "null_as_empty")]
        pub(crate) subject: String,
        pub(crate) angle_type: AngleType,
        pub(crate) framing: Framing,
        pub(crate) focus: Focus,
        pub(crate) dutch_angle: DutchAngle,
        pub(crate) movement: Movement,
        pub(crate) equipment: Equipment,
        #[serde(default, deserialize_with = "null_as_empty")]
        pub(crate) lighting: String,
        #[serde(default, deserialize_with = "null_as_empty")]
        pub(crate) sound: String,
    }

    impl ShotRecord {
        /// Scene number
        #[must_use]
        pub fn scene(&self) -> SceneNumber {
            self.scene
        }

        /// Shot number
        #[must_use]
        pub fn shot(&self) -> ShotNumber {
            self.shot
        }

        /// Public URL of the uploaded storyboard, if any
        #[must_use]
        pub fn storyboard_url(&self) -> Option<&str> {
            self.storyboard_url.as_deref()
        }

        /// Free-text description
        #[must_use]
        pub fn description(&self) -> &str {
            &self.description
        }

        /// Shot size
        #[must_use]
        pub fn shot_size(&self) -> ShotSize {
            self.shot_size
        }

        /// Subject (may be empty)
        #[must_use]
        pub fn subject(&self) -> &str {
            &self.subject
        }

        /// Angle type
        #[must_use]
        pub fn angle_type(&self) -> AngleType {
            self.angle_type
        }

        /// Framing
        #[must_use]
        pub fn framing(&self) -> Framing {
            self.framing
        }

        /// Focus
        #[must_use]
        pub fn focus(&self) -> Focus {
            self.focus
        }

        /// Dutch angle
        #[must_use]
        pub fn dutch_angle(&self) -> DutchAngle {
            self.dutch_angle
        }

        /// Camera movement
        #[must_use]
        pub fn movement(&self) -> Movement {
            self.movement
        }

        /// Camera support equipment
        #[must_use]
        pub fn equipment(&self) -> Equipment {
            self.equipment
        }

        /// Lighting notes (may be empty)
        #[must_use]
        pub fn lighting(&self) -> &str {
            &self.lighting
        }

        /// Sound notes (may be empty)
        #[must_use]
        pub fn sound(&self) -> &str {
            &self.sound
        }
    }

    /// A row read back from the shot table, with server-assigned columns
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct StoredShot {
        /// Row id, if the table has one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<i64>,
        /// Insert timestamp, if the table has one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateTime<Utc>>,
        /// The shot itself
        #[serde(flatten)]
        pub record: ShotRecord,
    }

    // =========================================================================
    // Storyboard
    // =========================================================================

    /// A storyboard image waiting to be uploaded
    #[derive(Clone, PartialEq, Eq)]
    pub struct StoryboardFile {
        /// Original file name
        pub file_name: String,
        /// MIME type sent to storage
        pub content_type: String,
        /// File contents
        pub bytes: Vec<u8>,
    }

    impl fmt::Debug for StoryboardFile {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("StoryboardFile")
                .field("file_name", &self.file_name)
                .field("content_type", &self.content_type)
                .field("len", &self.bytes.len())
                .finish()
        }
    }

    impl StoryboardFile {
        /// Wrap in-memory bytes; the content type comes from the file name
        pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
            let file_name = file_name.into();
            let content_type = content_type_for(&file_name).to_string();
            Self {
                file_name,
                content_type,
                bytes,
            }
        }

        /// Read a storyboard from disk
        pub fn from_path(path: &Path) -> std::io::Result<Self> {
            let bytes = std::fs::read(path)?;
            let file_name = path
                .file_name()
                .map_or_else(|| "storyboard".to_string(), |n| n.to_string_lossy().into_owned());
            Ok(Self::new(file_name, bytes))
        }

        /// Storage key: content hash prefix plus a sanitised file name, so
        /// the same image always lands on the same object
        #[must_use]
        pub fn object_key(&self) -> String {
            let mut hasher = Sha256::new();
            hasher.update(&self.bytes);
            let hash = hex::encode(hasher.finalize());
            let name: String = self
                .file_name
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                        c.to_ascii_lowercase()
                    } else {
                        '-'
                    }
                })
                .collect();
            format!("{}-{}", &hash[..16], name)
        }
    }

    /// MIME type guessed from a file extension
    #[must_use]
    pub fn content_type_for(file_name: &str) -> &'static str {
        let ext = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            "pdf" => "application/pdf",
            _ => "application/octet-stream",
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_scene_parse() {
            assert_eq!(SceneNumber::parse(" 5 "), Ok(SceneNumber::new(5)));
            assert_eq!(SceneNumber::parse("5.0"), Ok(SceneNumber::new(5)));
            assert_eq!(SceneNumber::parse("0"), Ok(SceneNumber::new(0)));
            assert_eq!(SceneNumber::parse(""), Err("is required"));
            assert_eq!(SceneNumber::parse("-1"), Err("must not be negative"));
            assert_eq!(SceneNumber::parse("2.5"), Err("must be a whole number"));
            assert_eq!(SceneNumber::parse("five"), Err("must be a whole number"));
            assert_eq!(SceneNumber::parse("NaN"), Err("must be a whole number"));
        }

        #[test]
        fn test_shot_parse_and_display() {
            assert_eq!(ShotNumber::parse("2.1").map(|s| s.to_string()), Ok("2.1".to_string()));
            assert_eq!(ShotNumber::parse("3").map(|s| s.to_string()), Ok("3.0".to_string()));
            assert_eq!(ShotNumber::parse("0.3").map(ShotNumber::tenths), Ok(3));
            assert_eq!(ShotNumber::parse("2.15"), Err("must have at most one decimal place"));
            assert_eq!(ShotNumber::parse("2.10000001"), Err("must have at most one decimal place"));
            assert_eq!(ShotNumber::parse("2.1000001"), Err("must have at most one decimal place"));
            assert_eq!(ShotNumber::parse("0.05"), Err("must have at most one decimal place"));
            assert_eq!(ShotNumber::parse("2.100").map(ShotNumber::tenths), Ok(21));
            assert_eq!(ShotNumber::parse("4.").map(ShotNumber::tenths), Ok(40));
            assert_eq!(ShotNumber::parse("1e1"), Err("must be a decimal number"));
            assert_eq!(ShotNumber::parse("."), Err("must be a decimal number"));
            assert_eq!(ShotNumber::parse("99999999999"), Err("is too large"));
            assert_eq!(ShotNumber::parse("-0.5"), Err("must not be negative"));
            assert_eq!(ShotNumber::parse("abc"), Err("must be a decimal number"));
            assert_eq!(ShotNumber::parse("inf"), Err("must be a decimal number"));
            assert_eq!(ShotNumber::parse("   "), Err("is required"));
        }

        #[test]
        fn test_shot_number_serializes_as_json_number() {
            let json = serde_json::to_string(&ShotNumber::from_tenths(21)).unwrap();
            assert_eq!(json, "2.1");
            let back: ShotNumber = serde_json::from_str("4").unwrap();
            assert_eq!(back, ShotNumber::from_tenths(40));
            assert!(serde_json::from_str::<ShotNumber>("-1.0").is_err());
        }

        #[test]
        fn test_stored_shot_tolerates_nulls_and_extra_columns() {
            let row = r#"{
                "id": 7,
                "created_at": "2025-01-01T00:00:00Z",
                "scene": 5,
                "shot": 2.1,
                "storyboard_url": null,
                "description": "Hero walks in",
                "shot_size": "wide shot",
                "subject": null,
                "angle_type": "eye level",
                "framing": "single",
                "focus": "rack focus",
                "dutch_angle": "dutch left",
                "movement": "static",
                "equipment": "stick",
                "lighting": null,
                "sound": "ambient"
            }"#;
            let stored: StoredShot = serde_json::from_str(row).unwrap();
            assert_eq!(stored.id, Some(7));
            assert_eq!(stored.record.scene().get(), 5);
            assert_eq!(stored.record.shot().to_string(), "2.1");
            assert_eq!(stored.record.shot_size(), ShotSize::WideShot);
            assert_eq!(stored.record.subject(), "");
            assert_eq!(stored.record.sound(), "ambient");
            assert!(stored.record.storyboard_url().is_none());
        }

        #[test]
        fn test_stored_shot_rejects_out_of_vocabulary_values() {
            let row = r#"{"scene": 1, "shot": 1.0, "description": "x",
                "shot_size": "very close", "angle_type": "eye level", "framing": "single",
                "focus": "rack focus", "dutch_angle": "dutch left", "movement": "static",
                "equipment": "stick"}"#;
            assert!(serde_json::from_str::<StoredShot>(row).is_err());
        }

        #[test]
        fn test_storyboard_object_key_is_deterministic() {
            let a = StoryboardFile::new("Board 01.PNG", vec![1, 2, 3]);
            let b = StoryboardFile::new("Board 01.PNG", vec![1, 2, 3]);
            let c = StoryboardFile::new("Board 01.PNG", vec![3, 2, 1]);
            assert_eq!(a.content_type, "image/png");
            assert_eq!(a.object_key(), b.object_key());
            assert_ne!(a.object_key(), c.object_key());
            assert!(a.object_key().ends_with("-board-01.png"));
        }

        #[test]
        fn test_content_type_fallback() {
            assert_eq!(content_type_for("frame.jpeg"), "image/jpeg");
            assert_eq!(content_type_for("notes"), "application/octet-stream");
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{PersistenceError, ShotError, ShotResult, UploadError, ValidationError};
    pub use crate::taxonomy::*;
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
