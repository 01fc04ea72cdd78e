// tests/stylist_tests.rs

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;

use common::{edited_uri, outfit_uri, sample_item, wait_until, MockService};
use virtual_stylist::encoder::PreviewRegistry;
use virtual_stylist::error::AppError;
use virtual_stylist::stylist::{CardPhase, EditOutcome, EDIT_FAILED_MESSAGE, RUN_FAILED_MESSAGE};
use virtual_stylist::{StyleCategory, Stylist};

async fn uploaded_stylist(mock: Arc<MockService>) -> Stylist {
    let previews = PreviewRegistry::new();
    let stylist = Stylist::new(mock, previews.clone());
    stylist.upload(sample_item(&previews, "skirt.png").await).await;
    stylist
}

#[tokio::test]
async fn placeholders_are_installed_before_any_result() {
    let gate = Arc::new(Semaphore::new(0));
    let mock = Arc::new(MockService::succeeding().gated(gate.clone()));
    let stylist = Arc::new(uploaded_stylist(mock.clone()).await);

    let run = tokio::spawn({
        let stylist = stylist.clone();
        async move { stylist.start_styling().await }
    });
    wait_until(|| mock.generate_calls() == StyleCategory::ALL.len()).await;

    let view = stylist.snapshot().await;
    assert!(view.generating);
    assert!(!view.can_start);
    assert_eq!(view.outfits.len(), StyleCategory::ALL.len());
    assert!(view.outfits.iter().all(|o| o.outfit.is_loading));
    let ids: Vec<&str> = view.outfits.iter().map(|o| o.outfit.id.as_str()).collect();
    assert_eq!(ids, vec!["skeleton-Casual", "skeleton-Business", "skeleton-Night Out"]);

    gate.add_permits(StyleCategory::ALL.len());
    let report = run.await.unwrap().unwrap();
    assert_eq!(report.succeeded.len(), 3);
    assert!(!stylist.snapshot().await.generating);
}

#[tokio::test]
async fn all_styles_succeed() {
    let stylist = uploaded_stylist(Arc::new(MockService::succeeding())).await;
    let report = stylist.start_styling().await.unwrap();
    assert!(report.failed.is_empty());

    let outfits = stylist.outfits().await;
    assert_eq!(outfits.len(), 3);
    let styles: HashSet<StyleCategory> = outfits.iter().map(|o| o.style).collect();
    assert_eq!(styles, StyleCategory::ALL.into_iter().collect());
    assert!(outfits.iter().all(|o| !o.is_loading && !o.id.starts_with("skeleton-")));
    let refs: HashSet<&str> = outfits.iter().map(|o| o.image_url.as_str()).collect();
    assert_eq!(refs.len(), 3);
    assert!(refs.iter().all(|r| !r.is_empty()));
    assert!(stylist.snapshot().await.error.is_none());
}

#[tokio::test]
async fn partial_failure_keeps_the_successes() {
    let mock = Arc::new(MockService::succeeding().failing(StyleCategory::NightOut));
    let stylist = uploaded_stylist(mock).await;
    let report = stylist.start_styling().await.unwrap();

    assert_eq!(report.succeeded, vec![StyleCategory::Casual, StyleCategory::Business]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].style, StyleCategory::NightOut);
    assert!(!report.is_failed());

    let view = stylist.snapshot().await;
    assert_eq!(view.outfits.len(), 2);
    assert!(view.error.is_none());
    assert!(view.outfits.iter().all(|o| o.outfit.style != StyleCategory::NightOut));
}

#[tokio::test]
async fn total_failure_clears_results_and_sets_run_error() {
    let mock = Arc::new(MockService::succeeding().failing_all());
    let stylist = uploaded_stylist(mock.clone()).await;
    let report = stylist.start_styling().await.unwrap();

    assert!(report.is_failed());
    assert_eq!(mock.generate_calls(), 3);
    let view = stylist.snapshot().await;
    assert!(view.outfits.is_empty());
    assert_eq!(view.error.as_deref(), Some(RUN_FAILED_MESSAGE));
    assert!(view.can_start);

    // Retrying clears the run-level error as soon as placeholders go in.
    let ticket = stylist.begin_run().await.unwrap();
    assert!(stylist.snapshot().await.error.is_none());
    stylist.settle_run(ticket).await;
}

#[tokio::test]
async fn reupload_during_run_clears_state_and_ignores_late_results() {
    let gate = Arc::new(Semaphore::new(0));
    let mock = Arc::new(MockService::succeeding().gated(gate.clone()));
    let stylist = Arc::new(uploaded_stylist(mock.clone()).await);

    let run = tokio::spawn({
        let stylist = stylist.clone();
        async move { stylist.start_styling().await }
    });
    wait_until(|| mock.generate_calls() == 3).await;

    stylist.upload(sample_item(stylist.previews(), "shirt.png").await).await;
    let view = stylist.snapshot().await;
    assert!(view.outfits.is_empty());
    assert!(view.error.is_none());
    assert!(!view.generating);
    assert!(view.can_start);

    gate.add_permits(3);
    let report = run.await.unwrap().unwrap();
    assert!(report.superseded);
    assert!(stylist.outfits().await.is_empty());
}

#[tokio::test]
async fn edit_replaces_only_the_target_image() {
    let mock = Arc::new(MockService::succeeding());
    let stylist = uploaded_stylist(mock.clone()).await;
    stylist.start_styling().await.unwrap();
    let before = stylist.outfits().await;
    let casual = before.iter().find(|o| o.style == StyleCategory::Casual).unwrap().clone();

    let outcome = stylist.edit_outfit(&casual.id, "add a red scarf").await.unwrap();
    assert_eq!(outcome, EditOutcome::Applied);
    assert_eq!(mock.edit_inputs(), vec![(outfit_uri(StyleCategory::Casual), "add a red scarf".to_string())]);

    let after = stylist.outfits().await;
    for (old, new) in before.iter().zip(after.iter()) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.style, new.style);
        assert_eq!(old.description, new.description);
        if old.id == casual.id {
            assert_eq!(new.image_url, edited_uri("add a red scarf"));
        } else {
            assert_eq!(old.image_url, new.image_url);
        }
    }
}

#[tokio::test]
async fn blank_edit_sends_nothing() {
    let mock = Arc::new(MockService::succeeding());
    let stylist = uploaded_stylist(mock.clone()).await;
    stylist.start_styling().await.unwrap();
    let before = stylist.outfits().await;

    let outcome = stylist.edit_outfit(&before[0].id, "   \n\t").await.unwrap();
    assert_eq!(outcome, EditOutcome::Skipped);
    assert_eq!(mock.edit_calls(), 0);
    assert_eq!(stylist.outfits().await, before);
}

#[tokio::test]
async fn failed_edit_preserves_image_and_raises_alert() {
    let mock = Arc::new(MockService::succeeding().failing_edits());
    let stylist = uploaded_stylist(mock.clone()).await;
    stylist.start_styling().await.unwrap();
    let before = stylist.outfits().await;
    let target = &before[1];
    assert!(stylist.open_editor(&target.id).await);

    let res = stylist.edit_outfit(&target.id, "swap the shoes for sneakers").await;
    assert!(matches!(res, Err(AppError::Edit(_))));
    assert_eq!(mock.edit_calls(), 1);
    assert_eq!(stylist.outfits().await, before);

    let view = stylist.snapshot().await;
    assert_eq!(view.alert.as_deref(), Some(EDIT_FAILED_MESSAGE));
    assert_eq!(view.outfits[1].phase, CardPhase::Closed);

    stylist.dismiss_alert().await;
    assert!(stylist.snapshot().await.alert.is_none());
}

#[tokio::test]
async fn edit_lookups_that_do_not_send() {
    let gate = Arc::new(Semaphore::new(0));
    let mock = Arc::new(MockService::succeeding().gated(gate.clone()));
    let stylist = uploaded_stylist(mock.clone()).await;

    assert_eq!(stylist.edit_outfit("nope", "add a hat").await.unwrap(), EditOutcome::NotFound);

    let ticket = stylist.begin_run().await.unwrap();
    assert_eq!(
        stylist.edit_outfit("skeleton-Casual", "add a hat").await.unwrap(),
        EditOutcome::NotReady
    );
    gate.add_permits(3);
    stylist.settle_run(ticket).await;

    let id = stylist.outfits().await[0].id.clone();
    let in_flight = stylist.begin_edit(&id, "add a hat").await.unwrap();
    assert_eq!(stylist.snapshot().await.outfits[0].phase, CardPhase::Submitting);
    assert!(matches!(stylist.begin_edit(&id, "add a belt").await, Err(EditOutcome::Busy)));
    assert_eq!(stylist.settle_edit(in_flight).await.unwrap(), EditOutcome::Applied);
    assert_eq!(mock.edit_calls(), 1);
}

#[tokio::test]
async fn edits_on_different_cards_can_overlap() {
    let gate = Arc::new(Semaphore::new(0));
    let mock = Arc::new(MockService::succeeding().gated_edits(gate.clone()));
    let stylist = Arc::new(uploaded_stylist(mock.clone()).await);
    stylist.start_styling().await.unwrap();
    let before = stylist.outfits().await;

    let spawn_edit = |id: String, instruction: &'static str| {
        let stylist = stylist.clone();
        tokio::spawn(async move { stylist.edit_outfit(&id, instruction).await })
    };
    let first = spawn_edit(before[0].id.clone(), "add a red scarf");
    let second = spawn_edit(before[1].id.clone(), "swap to loafers");
    wait_until(|| mock.edit_calls() == 2).await;

    let view = stylist.snapshot().await;
    assert_eq!(view.outfits[0].phase, CardPhase::Submitting);
    assert_eq!(view.outfits[1].phase, CardPhase::Submitting);
    assert_eq!(view.outfits[2].phase, CardPhase::Closed);

    gate.add_permits(2);
    assert_eq!(first.await.unwrap().unwrap(), EditOutcome::Applied);
    assert_eq!(second.await.unwrap().unwrap(), EditOutcome::Applied);

    let after = stylist.outfits().await;
    assert_eq!(after.iter().map(|o| &o.id).collect::<Vec<_>>(), before.iter().map(|o| &o.id).collect::<Vec<_>>());
    assert_eq!(after[0].image_url, edited_uri("add a red scarf"));
    assert_eq!(after[1].image_url, edited_uri("swap to loafers"));
    assert_eq!(after[2], before[2]);
    assert!(stylist.snapshot().await.outfits.iter().all(|o| o.phase == CardPhase::Closed));
}

#[tokio::test]
async fn edit_result_for_a_replaced_card_is_dropped() {
    let mock = Arc::new(MockService::succeeding());
    let stylist = uploaded_stylist(mock).await;
    stylist.start_styling().await.unwrap();
    let id = stylist.outfits().await[0].id.clone();

    let ticket = stylist.begin_edit(&id, "add a hat").await.unwrap();
    stylist.start_styling().await.unwrap();
    assert_eq!(stylist.settle_edit(ticket).await.unwrap(), EditOutcome::Discarded);
    assert!(stylist.outfits().await.iter().all(|o| o.id != id));
}

#[tokio::test]
async fn editor_toggles_per_card() {
    let stylist = uploaded_stylist(Arc::new(MockService::succeeding())).await;
    stylist.start_styling().await.unwrap();
    let outfits = stylist.outfits().await;

    assert!(stylist.open_editor(&outfits[0].id).await);
    assert!(!stylist.open_editor("missing").await);
    let view = stylist.snapshot().await;
    assert_eq!(view.outfits[0].phase, CardPhase::Editing);
    assert_eq!(view.outfits[1].phase, CardPhase::Closed);

    stylist.close_editor(&outfits[0].id).await;
    assert_eq!(stylist.snapshot().await.outfits[0].phase, CardPhase::Closed);
}
