// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Add-shot form: the draft being edited and the submit flow
//!
//! The draft is one struct updated through a single keyed operation, so a
//! reset or a snapshot always covers every field. Categorical slots hold
//! taxonomy values, never free text.

use crate::error::{FieldIssue, ShotError, ValidationError};
use crate::gateway::PersistenceGateway;
use crate::taxonomy::{
    AngleType, DutchAngle, Equipment, Focus, Framing, Movement, ShotSize, TaxonomyField, UnknownTerm,
};
use crate::types::{SceneNumber, ShotNumber, ShotRecord, StoryboardFile};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Every editable field of the form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    /// Scene number (required)
    Scene,
    /// Shot number (required)
    Shot,
    /// Description (required)
    Description,
    /// Shot size
    ShotSize,
    /// Subject
    Subject,
    /// Angle type
    AngleType,
    /// Framing
    Framing,
    /// Focus
    Focus,
    /// Dutch angle
    DutchAngle,
    /// Movement
    Movement,
    /// Equipment
    Equipment,
    /// Lighting
    Lighting,
    /// Sound
    Sound,
}

impl DraftField {
    /// All fields in form order
    pub const ALL: [Self; 13] = [
        Self::Scene,
        Self::Shot,
        Self::Description,
        Self::ShotSize,
        Self::Subject,
        Self::AngleType,
        Self::Framing,
        Self::Focus,
        Self::DutchAngle,
        Self::Movement,
        Self::Equipment,
        Self::Lighting,
        Self::Sound,
    ];

    /// Wire/CLI key
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Shot => "shot",
            Self::Description => "description",
            Self::ShotSize => "shot_size",
            Self::Subject => "subject",
            Self::AngleType => "angle_type",
            Self::Framing => "framing",
            Self::Focus => "focus",
            Self::DutchAngle => "dutch_angle",
            Self::Movement => "movement",
            Self::Equipment => "equipment",
            Self::Lighting => "lighting",
            Self::Sound => "sound",
        }
    }

    /// Label shown next to the input
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scene => "Scene*",
            Self::Shot => "Shot*",
            Self::Description => "Description*",
            Self::ShotSize => "Shot Size",
            Self::Subject => "Subject",
            Self::AngleType => "Angle Type",
            Self::Framing => "Framing",
            Self::Focus => "Focus",
            Self::DutchAngle => "Dutch Angle",
            Self::Movement => "Movement",
            Self::Equipment => "Equipment",
            Self::Lighting => "Lighting",
            Self::Sound => "Sound",
        }
    }

    /// The vocabulary behind a categorical field
    #[must_use]
    pub fn taxonomy(&self) -> Option<TaxonomyField> {
        match self {
            Self::ShotSize => Some(TaxonomyField::ShotSize),
            Self::AngleType => Some(TaxonomyField::AngleType),
            Self::Framing => Some(TaxonomyField::Framing),
            Self::Focus => Some(TaxonomyField::Focus),
            Self::DutchAngle => Some(TaxonomyField::DutchAngle),
            Self::Movement => Some(TaxonomyField::Movement),
            Self::Equipment => Some(TaxonomyField::Equipment),
            _ => None,
        }
    }

    /// Look a field up by key; dashes and camelCase are accepted
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let mut normalized = String::with_capacity(key.len() + 4);
        for (i, c) in key.trim().chars().enumerate() {
            if c == '-' {
                normalized.push('_');
            } else if c.is_ascii_uppercase() && i > 0 {
                normalized.push('_');
                normalized.push(c.to_ascii_lowercase());
            } else {
                normalized.push(c.to_ascii_lowercase());
            }
        }
        Self::ALL.into_iter().find(|f| f.key() == normalized)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One change to the draft. Categorical variants carry vocabulary values,
/// so an out-of-vocabulary value cannot be expressed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Raw scene text
    Scene(String),
    /// Raw shot text
    Shot(String),
    /// Description text
    Description(String),
    /// Shot size
    ShotSize(ShotSize),
    /// Subject text
    Subject(String),
    /// Angle type
    AngleType(AngleType),
    /// Framing
    Framing(Framing),
    /// Focus
    Focus(Focus),
    /// Dutch angle
    DutchAngle(DutchAngle),
    /// Movement
    Movement(Movement),
    /// Equipment
    Equipment(Equipment),
    /// Lighting text
    Lighting(String),
    /// Sound text
    Sound(String),
}

impl FieldUpdate {
    /// Build an update from text, parsing categorical values against
    /// their vocabulary
    pub fn parse(field: DraftField, value: &str) -> Result<Self, ValidationError> {
        fn term<T: FromStr<Err = UnknownTerm>>(field: DraftField, value: &str) -> Result<T, ValidationError> {
            value
                .parse::<T>()
                .map_err(|e| ValidationError::field(field.key(), e.to_string()))
        }

        let text = value.to_string();
        Ok(match field {
            DraftField::Scene => Self::Scene(text),
            DraftField::Shot => Self::Shot(text),
            DraftField::Description => Self::Description(text),
            DraftField::Subject => Self::Subject(text),
            DraftField::Lighting => Self::Lighting(text),
            DraftField::Sound => Self::Sound(text),
            DraftField::ShotSize => Self::ShotSize(term(field, value)?),
            DraftField::AngleType => Self::AngleType(term(field, value)?),
            DraftField::Framing => Self::Framing(term(field, value)?),
            DraftField::Focus => Self::Focus(term(field, value)?),
            DraftField::DutchAngle => Self::DutchAngle(term(field, value)?),
            DraftField::Movement => Self::Movement(term(field, value)?),
            DraftField::Equipment => Self::Equipment(term(field, value)?),
        })
    }
}

/// In-progress values for one shot. Numbers stay as typed text until
/// submit so a half-typed value never gets rejected mid-edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    /// Scene as typed
    pub scene: String,
    /// Shot as typed
    pub shot: String,
    /// Description
    pub description: String,
    /// Shot size
    pub shot_size: ShotSize,
    /// Subject
    pub subject: String,
    /// Angle type
    pub angle_type: AngleType,
    /// Framing
    pub framing: Framing,
    /// Focus
    pub focus: Focus,
    /// Dutch angle
    pub dutch_angle: DutchAngle,
    /// Movement
    pub movement: Movement,
    /// Equipment
    pub equipment: Equipment,
    /// Lighting
    pub lighting: String,
    /// Sound
    pub sound: String,
}

impl Draft {
    /// Apply one update
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Scene(v) => self.scene = v,
            FieldUpdate::Shot(v) => self.shot = v,
            FieldUpdate::Description(v) => self.description = v,
            FieldUpdate::ShotSize(v) => self.shot_size = v,
            FieldUpdate::Subject(v) => self.subject = v,
            FieldUpdate::AngleType(v) => self.angle_type = v,
            FieldUpdate::Framing(v) => self.framing = v,
            FieldUpdate::Focus(v) => self.focus = v,
            FieldUpdate::DutchAngle(v) => self.dutch_angle = v,
            FieldUpdate::Movement(v) => self.movement = v,
            FieldUpdate::Equipment(v) => self.equipment = v,
            FieldUpdate::Lighting(v) => self.lighting = v,
            FieldUpdate::Sound(v) => self.sound = v,
        }
    }

    /// Current value of a field as display text
    #[must_use]
    pub fn value(&self, field: DraftField) -> &str {
        match field {
            DraftField::Scene => &self.scene,
            DraftField::Shot => &self.shot,
            DraftField::Description => &self.description,
            DraftField::ShotSize => self.shot_size.as_str(),
            DraftField::Subject => &self.subject,
            DraftField::AngleType => self.angle_type.as_str(),
            DraftField::Framing => self.framing.as_str(),
            DraftField::Focus => self.focus.as_str(),
            DraftField::DutchAngle => self.dutch_angle.as_str(),
            DraftField::Movement => self.movement.as_str(),
            DraftField::Equipment => self.equipment.as_str(),
            DraftField::Lighting => &self.lighting,
            DraftField::Sound => &self.sound,
        }
    }

    /// Whether nothing differs from a fresh draft
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }

    /// Check required fields and build the record, collecting every issue
    pub fn validate(&self, storyboard_url: Option<String>) -> Result<ShotRecord, ValidationError> {
        let mut issues = Vec::new();

        let scene = match SceneNumber::parse(&self.scene) {
            Ok(scene) => Some(scene),
            Err(reason) => {
                issues.push(issue(DraftField::Scene, reason));
                None
            }
        };
        let shot = match ShotNumber::parse(&self.shot) {
            Ok(shot) => Some(shot),
            Err(reason) => {
                issues.push(issue(DraftField::Shot, reason));
                None
            }
        };
        if self.description.trim().is_empty() {
            issues.push(issue(DraftField::Description, "is required"));
        }

        match (scene, shot) {
            (Some(scene), Some(shot)) if issues.is_empty() => Ok(ShotRecord {
                scene,
                shot,
                storyboard_url,
                description: self.description.trim().to_string(),
                shot_size: self.shot_size,
                subject: self.subject.trim().to_string(),
                angle_type: self.angle_type,
                framing: self.framing,
                focus: self.focus,
                dutch_angle: self.dutch_angle,
                movement: self.movement,
                equipment: self.equipment,
                lighting: self.lighting.trim().to_string(),
                sound: self.sound.trim().to_string(),
            }),
            _ => Err(ValidationError { issues }),
        }
    }
}

fn issue(field: DraftField, reason: &str) -> FieldIssue {
    FieldIssue {
        field: field.key().to_string(),
        reason: reason.to_string(),
    }
}

/// A validated draft plus its pending storyboard, ready to send
#[derive(Debug, Clone)]
pub struct PreparedShot {
    draft: Draft,
    storyboard: Option<StoryboardFile>,
}

impl PreparedShot {
    /// Upload the storyboard (if any), then insert the row.
    ///
    /// The upload must finish before the insert starts; an upload failure
    /// means no insert is attempted.
    pub async fn persist<G>(&self, gateway: &G) -> Result<ShotRecord, ShotError>
    where
        G: PersistenceGateway + ?Sized,
    {
        let storyboard_url = match &self.storyboard {
            Some(file) => {
                debug!(file = %file.file_name, "Uploading storyboard before insert");
                let url = gateway.upload(file).await.map_err(|e| {
                    warn!(error = %e, "Storyboard upload failed; shot not inserted");
                    e
                })?;
                Some(url)
            }
            None => None,
        };

        let record = self.draft.validate(storyboard_url)?;
        gateway.insert(&record).await.map_err(|e| {
            warn!(error = %e, "Shot insert failed; draft kept for retry");
            e
        })?;
        info!(scene = %record.scene(), shot = %record.shot(), "Shot saved");
        Ok(record)
    }
}

/// Owns the draft for one add-shot session
#[derive(Debug, Clone, Default)]
pub struct FormController {
    draft: Draft,
    storyboard: Option<StoryboardFile>,
}

impl FormController {
    /// Fresh form: empty text, taxonomy defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current draft
    #[must_use]
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Pending storyboard, if one is attached
    #[must_use]
    pub fn storyboard(&self) -> Option<&StoryboardFile> {
        self.storyboard.as_ref()
    }

    /// Apply a typed update
    pub fn update(&mut self, update: FieldUpdate) {
        self.draft.apply(update);
    }

    /// Set a field by key from text. Unknown keys and out-of-vocabulary
    /// values are rejected and leave the draft untouched.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        let field = DraftField::from_key(name)
            .ok_or_else(|| ValidationError::field(name, "is not a shot field"))?;
        let update = FieldUpdate::parse(field, value)?;
        self.draft.apply(update);
        Ok(())
    }

    /// Attach a storyboard to upload on submit. Nothing is sent yet.
    pub fn set_storyboard_file(&mut self, file: StoryboardFile) {
        debug!(file = %file.file_name, bytes = file.bytes.len(), "Storyboard attached");
        self.storyboard = Some(file);
    }

    /// Detach the pending storyboard
    pub fn clear_storyboard_file(&mut self) {
        self.storyboard = None;
    }

    /// Validate without side effects
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.draft.validate(None).map(|_| ())
    }

    /// Validate and snapshot the draft for sending. Used directly when the
    /// caller needs to run the network part outside a borrow of the form.
    pub fn prepare(&self) -> Result<PreparedShot, ValidationError> {
        self.validate()?;
        Ok(PreparedShot {
            draft: self.draft.clone(),
            storyboard: self.storyboard.clone(),
        })
    }

    /// Validate, upload, insert. On success the draft is cleared and the
    /// saved record returned; on any failure the draft is left as it was.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<ShotRecord, ShotError>
    where
        G: PersistenceGateway + ?Sized,
    {
        let prepared = self.prepare().map_err(|e| {
            debug!(fields = ?e.fields(), "Submit blocked by validation");
            e
        })?;
        let record = prepared.persist(gateway).await?;
        self.reset();
        Ok(record)
    }

    /// Discard the draft and any pending storyboard
    pub fn cancel(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.draft = Draft::default();
        self.storyboard = None;
    }
}
