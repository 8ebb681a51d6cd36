// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for shot submission
//!
//! These tests verify:
//! 1. Every valid draft submits and grows the session by exactly one
//! 2. Drafts missing a required field never reach the gateway
//! 3. No record ever carries a value outside its vocabulary

use proptest::prelude::*;
use shotlog::app::{AppShell, Completion};
use shotlog::dashboard::DashboardEvent;
use shotlog::form::{FieldUpdate, FormController};
use shotlog::gateway::MemoryGateway;
use shotlog::taxonomy::{
    AngleType, DutchAngle, Equipment, Focus, Framing, Movement, ShotSize, TaxonomyField,
};
use shotlog::types::ShotRecord;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(future)
}

fn assert_in_vocabulary(record: &ShotRecord) {
    let pairs = [
        (TaxonomyField::ShotSize, record.shot_size().as_str()),
        (TaxonomyField::AngleType, record.angle_type().as_str()),
        (TaxonomyField::Framing, record.framing().as_str()),
        (TaxonomyField::Focus, record.focus().as_str()),
        (TaxonomyField::DutchAngle, record.dutch_angle().as_str()),
        (TaxonomyField::Movement, record.movement().as_str()),
        (TaxonomyField::Equipment, record.equipment().as_str()),
    ];
    for (field, value) in pairs {
        assert!(field.contains(value), "{value} not in {field}");
    }
}

#[derive(Debug, Clone)]
struct ValidDraft {
    scene: u32,
    shot_tenths: u32,
    description: String,
    shot_size: ShotSize,
    angle_type: AngleType,
    framing: Framing,
    focus: Focus,
    dutch_angle: DutchAngle,
    movement: Movement,
    equipment: Equipment,
}

fn valid_draft() -> impl Strategy<Value = ValidDraft> {
    (
        (0u32..10_000, 0u32..100_000, "[A-Za-z][A-Za-z ,.]{0,40}"),
        (
            prop::sample::select(ShotSize::ALL),
            prop::sample::select(AngleType::ALL),
            prop::sample::select(Framing::ALL),
            prop::sample::select(Focus::ALL),
            prop::sample::select(DutchAngle::ALL),
            prop::sample::select(Movement::ALL),
            prop::sample::select(Equipment::ALL),
        ),
    )
        .prop_map(
            |((scene, shot_tenths, description), (shot_size, angle_type, framing, focus, dutch_angle, movement, equipment))| {
                ValidDraft {
                    scene,
                    shot_tenths,
                    description,
                    shot_size,
                    angle_type,
                    framing,
                    focus,
                    dutch_angle,
                    movement,
                    equipment,
                }
            },
        )
}

fn fill(form: &mut FormController, draft: &ValidDraft) {
    form.update(FieldUpdate::Scene(draft.scene.to_string()));
    form.update(FieldUpdate::Shot(format!("{}.{}", draft.shot_tenths / 10, draft.shot_tenths % 10)));
    form.update(FieldUpdate::Description(draft.description.clone()));
    form.update(FieldUpdate::ShotSize(draft.shot_size));
    form.update(FieldUpdate::AngleType(draft.angle_type));
    form.update(FieldUpdate::Framing(draft.framing));
    form.update(FieldUpdate::Focus(draft.focus));
    form.update(FieldUpdate::DutchAngle(draft.dutch_angle));
    form.update(FieldUpdate::Movement(draft.movement));
    form.update(FieldUpdate::Equipment(draft.equipment));
}

proptest! {
    #[test]
    fn valid_drafts_always_submit(draft in valid_draft(), existing in 0usize..3) {
        block_on(async {
            let gateway = MemoryGateway::new();
            let mut shell = AppShell::new();

            for _ in 0..existing {
                shell.handle(DashboardEvent::AddRequested);
                fill(shell.form_mut().unwrap(), &draft);
                prop_assert!(matches!(shell.submit(&gateway).await, Completion::Saved));
            }

            let before = shell.dashboard().len();
            shell.handle(DashboardEvent::AddRequested);
            fill(shell.form_mut().unwrap(), &draft);
            prop_assert!(matches!(shell.submit(&gateway).await, Completion::Saved));
            prop_assert_eq!(shell.dashboard().len(), before + 1);

            let record = shell.records().last().unwrap();
            prop_assert_eq!(record.scene().get(), draft.scene);
            prop_assert_eq!(record.shot().tenths(), draft.shot_tenths);
            prop_assert_eq!(record.shot_size(), draft.shot_size);
            prop_assert_eq!(record.equipment(), draft.equipment);
            assert_in_vocabulary(record);
            Ok(())
        })?;
    }

    #[test]
    fn missing_required_field_never_inserts(draft in valid_draft(), missing in 0usize..3) {
        block_on(async {
            let gateway = MemoryGateway::new();
            let mut shell = AppShell::new();
            shell.handle(DashboardEvent::AddRequested);
            let form = shell.form_mut().unwrap();
            fill(form, &draft);
            let key = ["scene", "shot", "description"][missing];
            form.set_field(key, "").unwrap();

            let completion = shell.submit(&gateway).await;
            match completion {
                Completion::Failed(e) => {
                    let validation = e.as_validation().expect("validation error");
                    prop_assert!(validation.mentions(key));
                }
                other => prop_assert!(false, "expected failure, got {:?}", other),
            }
            prop_assert!(shell.records().is_empty());
            prop_assert_eq!(gateway.insert_calls(), 0);
            Ok(())
        })?;
    }

    #[test]
    fn free_text_never_reaches_a_categorical_field(
        field in prop::sample::select(TaxonomyField::ALL.to_vec()),
        value in "\\PC{0,24}",
    ) {
        block_on(async {
            let gateway = MemoryGateway::new();
            let mut form = FormController::new();
            form.set_field("scene", "1").unwrap();
            form.set_field("shot", "1.0").unwrap();
            form.set_field("description", "Property shot").unwrap();

            let accepted = form.set_field(field.key(), &value).is_ok();
            let known = field
                .options()
                .iter()
                .any(|o| o.eq_ignore_ascii_case(value.trim()));
            prop_assert_eq!(accepted, known);

            let record = form.submit(&gateway).await.unwrap();
            assert_in_vocabulary(&record);
            Ok(())
        })?;
    }
}
