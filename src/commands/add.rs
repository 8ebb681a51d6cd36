// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Add command - fill the shot form from flags and submit it

use super::Output;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::error::{FieldIssue, ValidationError};
use crate::form::FormController;
use crate::gateway::{PersistenceGateway, RestGateway};
use crate::types::{ShotRecord, StoryboardFile};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Shot fields accepted on the command line
#[derive(Debug, Clone, Default, clap::Args)]
pub struct AddArgs {
    /// Scene number
    #[arg(long)]
    pub scene: Option<String>,

    /// Shot number (one decimal place, e.g. 2.1)
    #[arg(long)]
    pub shot: Option<String>,

    /// What happens in the shot
    #[arg(long)]
    pub description: Option<String>,

    /// Shot size (see `shotlog taxonomy shot_size`)
    #[arg(long)]
    pub shot_size: Option<String>,

    /// Who or what the shot is on
    #[arg(long)]
    pub subject: Option<String>,

    /// Angle type
    #[arg(long)]
    pub angle_type: Option<String>,

    /// Framing
    #[arg(long)]
    pub framing: Option<String>,

    /// Focus
    #[arg(long)]
    pub focus: Option<String>,

    /// Dutch angle
    #[arg(long)]
    pub dutch_angle: Option<String>,

    /// Camera movement
    #[arg(long)]
    pub movement: Option<String>,

    /// Camera support equipment
    #[arg(long)]
    pub equipment: Option<String>,

    /// Lighting notes
    #[arg(long)]
    pub lighting: Option<String>,

    /// Sound notes
    #[arg(long)]
    pub sound: Option<String>,

    /// Storyboard image to upload with the shot
    #[arg(long)]
    pub storyboard: Option<PathBuf>,
}

impl AddArgs {
    fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("scene", &self.scene),
            ("shot", &self.shot),
            ("description", &self.description),
            ("shot_size", &self.shot_size),
            ("subject", &self.subject),
            ("angle_type", &self.angle_type),
            ("framing", &self.framing),
            ("focus", &self.focus),
            ("dutch_angle", &self.dutch_angle),
            ("movement", &self.movement),
            ("equipment", &self.equipment),
            ("lighting", &self.lighting),
            ("sound", &self.sound),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }

    /// Build a form from the flags. Every problem is reported at once:
    /// bad choices from the flags plus missing/malformed required fields.
    pub fn into_form(&self) -> Result<FormController> {
        let mut form = FormController::new();
        let mut issues: Vec<FieldIssue> = Vec::new();

        for (key, value) in self.fields() {
            if let Err(e) = form.set_field(key, value) {
                issues.extend(e.issues);
            }
        }
        if let Err(e) = form.validate() {
            issues.extend(e.issues);
        }
        if !issues.is_empty() {
            return Err(ValidationError { issues }.into());
        }

        if let Some(path) = &self.storyboard {
            let file = StoryboardFile::from_path(path)
                .with_context(|| format!("Failed to read storyboard {}", path.display()))?;
            form.set_storyboard_file(file);
        }
        Ok(form)
    }
}

/// Submit a built form through any gateway and return the saved record
pub async fn submit<G>(mut form: FormController, gateway: &G) -> Result<ShotRecord>
where
    G: PersistenceGateway + ?Sized,
{
    let record = form.submit(gateway).await.context("Shot was not saved")?;
    Ok(record)
}

/// Run the add command
pub async fn run(args: &AddArgs, config: &Config, out: Output) -> Result<()> {
    // Validate before touching the network
    let form = args.into_form()?;

    let gateway = RestGateway::from_config(&config.gateway)?;
    let record = submit(form, &gateway).await?;
    info!(scene = %record.scene(), shot = %record.shot(), "Shot submitted");

    if out.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", Dashboard::new(std::slice::from_ref(&record)).render_text(out.color));
        if let Some(url) = record.storyboard_url() {
            println!("  storyboard: {url}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use crate::taxonomy::Equipment;

    fn args() -> AddArgs {
        AddArgs {
            scene: Some("12".into()),
            shot: Some("3.5".into()),
            description: Some("Drone over the harbour".into()),
            equipment: Some("drone".into()),
            ..AddArgs::default()
        }
    }

    #[tokio::test]
    async fn test_submit_from_flags() {
        let gateway = MemoryGateway::new();
        let record = submit(args().into_form().unwrap(), &gateway).await.unwrap();
        assert_eq!(record.equipment(), Equipment::Drone);
        assert_eq!(gateway.rows().len(), 1);
    }

    #[test]
    fn test_all_problems_reported_together() {
        let bad = AddArgs {
            scene: None,
            framing: Some("sideways".into()),
            ..args()
        };
        let err = bad.into_form().unwrap_err();
        let validation = err.downcast_ref::<ValidationError>().unwrap();
        assert_eq!(validation.fields(), vec!["framing", "scene"]);
    }

    #[tokio::test]
    async fn test_storyboard_flag_uploads_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        std::fs::write(&path, b"png-bytes").unwrap();
        let gateway = MemoryGateway::new();

        let with_board = AddArgs {
            storyboard: Some(path),
            ..args()
        };
        let form = with_board.into_form().unwrap();
        // bytes are read once, when the form is built
        std::fs::remove_file(dir.path().join("board.png")).unwrap();

        let record = submit(form, &gateway).await.unwrap();
        assert_eq!(gateway.upload_calls(), 1);
        assert!(record.storyboard_url().unwrap().ends_with("-board.png"));
    }
}
