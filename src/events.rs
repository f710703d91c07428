//! Event lifecycle: create, regenerate, enhance, update, delete.
//!
//! Plan generation is independent of save success: a draft whose
//! generation call fails is still persisted without a plan, and the
//! failure message rides back so the UI can offer to regenerate later.

use crate::error::CoreError;
use crate::planner::{render, Planner};
use crate::store::{EventStore, StoreError};
use crate::types::{Event, EventDraft};

/// Result of creating an event: the persisted record, plus the plan
/// generation failure message when generation did not succeed.
#[derive(Debug)]
pub struct CreatedEvent {
    pub event: Event,
    pub plan_error: Option<String>,
}

/// Create and persist an event from a draft, generating its plan.
///
/// The event is saved regardless of how generation goes; only a storage
/// failure makes this an error.
pub async fn create_event(
    planner: &Planner,
    store: &EventStore,
    draft: EventDraft,
) -> Result<CreatedEvent, CoreError> {
    let mut event = Event::from_draft(draft);

    let plan_error = match planner.generate_plan(&event.draft).await {
        Ok(plan) => {
            event.plan = Some(render::flatten_plan(&plan));
            None
        }
        Err(e) => {
            log::warn!("plan generation failed for new event {}: {}", event.id, e);
            Some(e.to_string())
        }
    };

    store.insert(&event)?;
    Ok(CreatedEvent { event, plan_error })
}

/// Regenerate the plan for a stored event. On failure the stored event
/// is left untouched and the error propagates.
pub async fn regenerate_plan(
    planner: &Planner,
    store: &EventStore,
    id: &str,
) -> Result<Event, CoreError> {
    let mut event = require_event(store, id)?;
    let plan = planner.generate_plan(&event.draft).await?;
    event.plan = Some(render::flatten_plan(&plan));
    event.touch();
    store.update(&event)?;
    Ok(event)
}

/// Rework a stored event's plan per a free-text request. Hard error when
/// the event has no plan yet or the completion call fails.
pub async fn enhance_event(
    planner: &Planner,
    store: &EventStore,
    id: &str,
    request: &str,
) -> Result<Event, CoreError> {
    let mut event = require_event(store, id)?;
    let current = event
        .plan
        .clone()
        .ok_or_else(|| CoreError::NoPlan(id.to_string()))?;

    let enhanced = planner.enhance_plan(&current, request).await?;
    event.plan = Some(enhanced);
    event.touch();
    store.update(&event)?;
    Ok(event)
}

/// Replace the draft fields of a stored event, keeping its plan.
pub fn update_event(store: &EventStore, id: &str, draft: EventDraft) -> Result<Event, CoreError> {
    let mut event = require_event(store, id)?;
    event.draft = draft;
    event.touch();
    store.update(&event)?;
    Ok(event)
}

pub fn delete_event(store: &EventStore, id: &str) -> Result<(), CoreError> {
    store.delete(id)?;
    Ok(())
}

pub fn list_events(store: &EventStore) -> Result<Vec<Event>, CoreError> {
    Ok(store.list()?)
}

fn require_event(store: &EventStore, id: &str) -> Result<Event, CoreError> {
    store
        .get(id)?
        .ok_or_else(|| CoreError::Store(StoreError::NotFound(id.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::completion::{ChatMessage, CompletionError, CompletionProvider, RequestProfile};

    struct MockProvider {
        response: Option<String>,
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _profile: RequestProfile,
        ) -> Result<String, CompletionError> {
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => Err(CompletionError::EmptyResponse),
            }
        }
    }

    fn planner_replying(text: &str) -> Planner {
        Planner::new(Arc::new(MockProvider {
            response: Some(text.to_string()),
        }))
    }

    fn planner_failing() -> Planner {
        Planner::new(Arc::new(MockProvider { response: None }))
    }

    fn store() -> (tempfile::TempDir, EventStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_event_flattens_generated_plan() {
        let planner = planner_replying(r#"{"overview":"Dinner for eight","tips":["Book early"]}"#);
        let (_dir, store) = store();

        let created = create_event(&planner, &store, draft("Dinner"))
            .await
            .unwrap();
        assert!(created.plan_error.is_none());
        let plan = created.event.plan.as_deref().unwrap();
        assert!(plan.starts_with("# Event Plan\n\nDinner for eight"));
        assert!(plan.contains("## Tips"));

        // Persisted, not just returned.
        let stored = store.get(&created.event.id).unwrap().unwrap();
        assert_eq!(stored.plan, created.event.plan);
    }

    #[tokio::test]
    async fn test_create_event_saves_despite_generation_failure() {
        let planner = planner_failing();
        let (_dir, store) = store();

        let created = create_event(&planner, &store, draft("No plan yet"))
            .await
            .unwrap();
        assert!(created.event.plan.is_none());
        assert!(created.plan_error.is_some());

        let stored = store.get(&created.event.id).unwrap().unwrap();
        assert_eq!(stored.draft.title.as_deref(), Some("No plan yet"));
        assert!(stored.plan.is_none());
    }

    #[tokio::test]
    async fn test_create_event_with_unparseable_response_stores_fallback_text() {
        let planner = planner_replying("no structure in sight");
        let (_dir, store) = store();

        let created = create_event(&planner, &store, draft("Garbled"))
            .await
            .unwrap();
        // Malformed output is absorbed, not an error: the stored plan is
        // the visible could-not-parse rendering.
        assert!(created.plan_error.is_none());
        let plan = created.event.plan.as_deref().unwrap();
        assert!(plan.contains("Unable to parse AI response"));
    }

    #[tokio::test]
    async fn test_regenerate_plan_failure_leaves_event_untouched() {
        let good = planner_replying(r#"{"overview":"First plan"}"#);
        let (_dir, store) = store();
        let created = create_event(&good, &store, draft("Stable")).await.unwrap();
        let original = store.get(&created.event.id).unwrap().unwrap();

        let bad = planner_failing();
        let err = regenerate_plan(&bad, &store, &created.event.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Completion(CompletionError::EmptyResponse)
        ));

        let after = store.get(&created.event.id).unwrap().unwrap();
        assert_eq!(after, original);
    }

    #[tokio::test]
    async fn test_regenerate_plan_replaces_plan_and_bumps_updated_at() {
        let planner = planner_replying(r#"{"overview":"Second draft"}"#);
        let (_dir, store) = store();
        let created = create_event(&planner, &store, draft("Evolving")).await.unwrap();

        let updated = regenerate_plan(&planner, &store, &created.event.id)
            .await
            .unwrap();
        assert!(updated.plan.as_deref().unwrap().contains("Second draft"));
        assert!(updated.updated_at >= created.event.updated_at);
    }

    #[tokio::test]
    async fn test_enhance_event_requires_existing_plan() {
        let failing = planner_failing();
        let (_dir, store) = store();
        let created = create_event(&failing, &store, draft("Planless")).await.unwrap();
        assert!(created.event.plan.is_none());

        let enhancer = planner_replying("Better plan text");
        let err = enhance_event(&enhancer, &store, &created.event.id, "make it better")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NoPlan(_)));
    }

    #[tokio::test]
    async fn test_enhance_event_stores_raw_response() {
        let planner = planner_replying(r#"{"overview":"Base"}"#);
        let (_dir, store) = store();
        let created = create_event(&planner, &store, draft("Enhance me")).await.unwrap();

        let enhancer = planner_replying("A fuller plan, now with a rain tent.");
        let updated = enhance_event(&enhancer, &store, &created.event.id, "add a rain plan")
            .await
            .unwrap();
        assert_eq!(
            updated.plan.as_deref(),
            Some("A fuller plan, now with a rain tent.")
        );
    }

    #[tokio::test]
    async fn test_update_event_replaces_draft_and_keeps_plan() {
        let planner = planner_replying(r#"{"overview":"Keep me"}"#);
        let (_dir, store) = store();
        let created = create_event(&planner, &store, draft("Before")).await.unwrap();

        let updated = update_event(&store, &created.event.id, draft("After")).unwrap();
        assert_eq!(updated.draft.title.as_deref(), Some("After"));
        assert_eq!(updated.plan, created.event.plan);
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let planner = planner_failing();
        let (_dir, store) = store();
        let a = create_event(&planner, &store, draft("A")).await.unwrap();
        let b = create_event(&planner, &store, draft("B")).await.unwrap();

        assert_eq!(list_events(&store).unwrap().len(), 2);
        delete_event(&store, &a.event.id).unwrap();
        let remaining = list_events(&store).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.event.id);
    }
}
