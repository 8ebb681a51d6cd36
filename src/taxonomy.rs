// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Shot taxonomy - the fixed vocabularies for every categorical shot field
//!
//! Each vocabulary is an enum whose first variant is the default. Values
//! serialize as their display strings ("close up", "over-the-shoulder"),
//! which is also what the hosted table stores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A value was not a member of the vocabulary it was parsed against
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {field}")]
pub struct UnknownTerm {
    /// Vocabulary label, e.g. "shot size"
    pub field: &'static str,
    /// The rejected input
    pub value: String,
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every permitted value, in display order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human label of this vocabulary
            pub const LABEL: &'static str = $label;

            /// The stored/displayed string for this value
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }

            fn position(self) -> usize {
                Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
            }

            /// The following value, wrapping to the first
            #[must_use]
            pub fn next(self) -> Self {
                Self::ALL[(self.position() + 1) % Self::ALL.len()]
            }

            /// The preceding value, wrapping to the last
            #[must_use]
            pub fn previous(self) -> Self {
                let len = Self::ALL.len();
                Self::ALL[(self.position() + len - 1) % len]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownTerm;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownTerm {
                        field: $label,
                        value: s.to_string(),
                    })
            }
        }
    };
}

vocabulary! {
    /// Framing distance classification
    ShotSize, "shot size" {
        CloseUp => "close up",
        MediumShot => "medium shot",
        WideShot => "wide shot",
        LongShot => "long shot",
        ExtremeCloseUp => "extreme close up",
        MediumCloseUp => "medium close up",
        /// Mid-thigh up, a.k.a. cowboy shot
        FullShot => "full shot (cowboy)",
        MediumWideShot => "medium wide shot",
        ExtremeLongShot => "extreme long shot",
        Establishing => "establishing",
        Master => "master",
    }
}

vocabulary! {
    /// Camera height relative to the subject
    AngleType, "angle type" {
        EyeLevel => "eye level",
        LowAngle => "low angle",
        HighAngle => "high angle",
        Overhead => "overhead",
        ShoulderLevel => "shoulder level",
        HipLevel => "hip level",
        KneeLevel => "knee level",
        GroundLevel => "ground level",
    }
}

vocabulary! {
    /// How many subjects the frame holds and from where
    Framing, "framing" {
        Single => "single",
        TwoShot => "two shot",
        ThreeShot => "three shot",
        FourShot => "four shot",
        GroupShot => "group shot",
        OverTheShoulder => "over-the-shoulder",
        OverTheHip => "over-the-hip",
        PointOfView => "point of view",
    }
}

vocabulary! {
    /// Focus technique
    Focus, "focus" {
        RackFocus => "rack focus",
        ShallowFocus => "shallow focus",
        DeepFocus => "deep focus",
        TiltShift => "tilt shift",
        Zoom => "zoom",
        CrashZoom => "crash zoom",
    }
}

vocabulary! {
    /// Tilted-horizon direction
    DutchAngle, "dutch angle" {
        DutchLeft => "dutch left",
        DutchRight => "dutch right",
    }
}

vocabulary! {
    /// Camera movement during the take
    Movement, "movement" {
        Static => "static",
        Pan => "pan",
        TrackingShot => "tracking shot",
        Boom => "boom",
        Slide => "slide",
        Tilt => "tilt",
        CameraRoll => "camera roll",
        Pushing => "pushing",
        PullOut => "pull out",
        DollyZoomIn => "dolly zoom-in",
        DollyZoomOut => "dolly zoom-out",
        Shake => "shake",
        Arc => "arc",
    }
}

vocabulary! {
    /// Camera support rig
    Equipment, "equipment" {
        Stick => "stick",
        Drone => "drone",
        Crane => "crane",
        Dolly => "dolly",
        Steadicam => "steadicam",
        HandHeld => "hand held",
        Gimbal => "gimbal",
        VehicleMount => "vehicle mount",
        OverheadRig => "overhead rig",
        Pedestal => "pedestal",
        Stabilizer => "stabilizer",
        MotionControl => "motion control",
        UnderwaterHousing => "underwater housing",
    }
}

/// The categorical fields of a shot, for code that works on vocabularies
/// generically (option pickers, `shotlog taxonomy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyField {
    /// `shot_size`
    ShotSize,
    /// `angle_type`
    AngleType,
    /// `framing`
    Framing,
    /// `focus`
    Focus,
    /// `dutch_angle`
    DutchAngle,
    /// `movement`
    Movement,
    /// `equipment`
    Equipment,
}

fn strings<T: Copy + Into<&'static str>>(all: &[T]) -> Vec<&'static str> {
    all.iter().map(|v| (*v).into()).collect()
}

macro_rules! into_static_str {
    ($($name:ident),+) => {
        $(
            impl From<$name> for &'static str {
                fn from(value: $name) -> Self {
                    value.as_str()
                }
            }
        )+
    };
}

into_static_str!(ShotSize, AngleType, Framing, Focus, DutchAngle, Movement, Equipment);

impl TaxonomyField {
    /// All categorical fields in form order
    pub const ALL: [Self; 7] = [
        Self::ShotSize,
        Self::AngleType,
        Self::Framing,
        Self::Focus,
        Self::DutchAngle,
        Self::Movement,
        Self::Equipment,
    ];

    /// Field name as used on the wire and on the command line
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::ShotSize => "shot_size",
            Self::AngleType => "angle_type",
            Self::Framing => "framing",
            Self::Focus => "focus",
            Self::DutchAngle => "dutch_angle",
            Self::Movement => "movement",
            Self::Equipment => "equipment",
        }
    }

    /// Human label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ShotSize => ShotSize::LABEL,
            Self::AngleType => AngleType::LABEL,
            Self::Framing => Framing::LABEL,
            Self::Focus => Focus::LABEL,
            Self::DutchAngle => DutchAngle::LABEL,
            Self::Movement => Movement::LABEL,
            Self::Equipment => Equipment::LABEL,
        }
    }

    /// Ordered permitted values
    #[must_use]
    pub fn options(&self) -> Vec<&'static str> {
        match self {
            Self::ShotSize => strings(ShotSize::ALL),
            Self::AngleType => strings(AngleType::ALL),
            Self::Framing => strings(Framing::ALL),
            Self::Focus => strings(Focus::ALL),
            Self::DutchAngle => strings(DutchAngle::ALL),
            Self::Movement => strings(Movement::ALL),
            Self::Equipment => strings(Equipment::ALL),
        }
    }

    /// Value a fresh draft starts with
    #[must_use]
    pub fn default_value(&self) -> &'static str {
        match self {
            Self::ShotSize => ShotSize::default().as_str(),
            Self::AngleType => AngleType::default().as_str(),
            Self::Framing => Framing::default().as_str(),
            Self::Focus => Focus::default().as_str(),
            Self::DutchAngle => DutchAngle::default().as_str(),
            Self::Movement => Movement::default().as_str(),
            Self::Equipment => Equipment::default().as_str(),
        }
    }

    /// Whether `value` is an exact member of this vocabulary
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.options().contains(&value)
    }

    /// Look a field up by its key, accepting dashes for underscores
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().replace('-', "_").to_lowercase();
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl fmt::Display for TaxonomyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
