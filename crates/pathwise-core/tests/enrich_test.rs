//! Tests for the plan enrichment pipeline.
//!
//! Every test runs against [`StubVideoBackend`], so lookup outcomes and
//! completion order are fully scripted.

use std::sync::Arc;
use std::time::Duration;

use pathwise_core::plan::parse_plan;
use pathwise_core::video::{SearchHit, VideoLookup};
use pathwise_core::{EnrichConfig, LearningPlan, SkillLevel, enrich_plan};
use pathwise_test_utils::{SearchScript, StubVideoBackend, module_query, plan_json, stub_video_id};

const TOPIC: &str = "Rust";

fn sample_plan(module_count: usize) -> LearningPlan {
    let hours = vec![4; module_count];
    parse_plan(&plan_json(TOPIC, SkillLevel::Beginner, &hours)).expect("fixture should parse")
}

fn lookup(backend: &Arc<StubVideoBackend>) -> Arc<VideoLookup> {
    Arc::new(VideoLookup::new(backend.clone()))
}

fn query(i: usize) -> String {
    module_query(TOPIC, i)
}

#[tokio::test]
async fn attaches_a_video_to_every_module() {
    let backend = Arc::new(StubVideoBackend::new());
    let plan = sample_plan(5);

    let enriched = enrich_plan(plan.clone(), lookup(&backend), &EnrichConfig::default()).await;

    assert_eq!(enriched.modules.len(), 5);
    assert_eq!(enriched.video_count(), 5);
    assert_eq!(backend.search_calls(), 5);
    for (i, module) in enriched.modules.iter().enumerate() {
        let video = module.recommended_video.as_ref().expect("video attached");
        let id = stub_video_id(&query(i));
        assert_eq!(video.video_link, format!("https://www.youtube.com/watch?v={id}"));
        assert_eq!(video.thumbnail_link, format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"));
        assert_eq!(video.channel, "Stub Channel");
    }

    // Everything except the videos is untouched.
    assert_eq!(enriched.topic, plan.topic);
    assert_eq!(enriched.total_hours, plan.total_hours);
    assert_eq!(enriched.strategy, plan.strategy);
    for (before, after) in plan.modules.iter().zip(&enriched.modules) {
        assert_eq!(before.title, after.title);
        assert_eq!(before.query, after.query);
        assert_eq!(before.checkpoints, after.checkpoints);
    }
}

#[tokio::test]
async fn preserves_module_order_when_lookups_finish_out_of_order() {
    // Earlier modules finish last.
    let mut backend = StubVideoBackend::new();
    for i in 0..6 {
        backend = backend.with_delay(query(i), Duration::from_millis(20 * (6 - i as u64)));
    }
    let backend = Arc::new(backend);
    let plan = sample_plan(6);

    let enriched = enrich_plan(plan.clone(), lookup(&backend), &EnrichConfig::default()).await;

    assert_eq!(enriched.modules.len(), 6);
    for (i, module) in enriched.modules.iter().enumerate() {
        assert_eq!(module.query, query(i));
        assert_eq!(
            module.recommended_video.as_ref().unwrap().title,
            format!("Video for {}", query(i))
        );
    }
}

#[tokio::test]
async fn lookups_run_concurrently() {
    let mut backend = StubVideoBackend::new();
    for i in 0..5 {
        backend = backend.with_delay(query(i), Duration::from_millis(100));
    }
    let backend = Arc::new(backend);

    let enriched = enrich_plan(sample_plan(5), lookup(&backend), &EnrichConfig::default()).await;

    assert_eq!(enriched.video_count(), 5);
    assert_eq!(
        backend.max_concurrent_searches(),
        5,
        "all lookups should be in flight at once"
    );
}

#[tokio::test]
async fn one_failing_lookup_does_not_affect_the_others() {
    let backend = Arc::new(
        StubVideoBackend::new().with_search(query(2), SearchScript::Fail("quota".to_string())),
    );

    let enriched = enrich_plan(sample_plan(5), lookup(&backend), &EnrichConfig::default()).await;

    assert_eq!(enriched.modules.len(), 5);
    for (i, module) in enriched.modules.iter().enumerate() {
        if i == 2 {
            assert!(module.recommended_video.is_none());
        } else {
            assert!(module.recommended_video.is_some(), "module {i} lost its video");
        }
    }
}

#[tokio::test]
async fn misses_leave_only_those_modules_empty() {
    let backend = Arc::new(
        StubVideoBackend::new()
            .with_search(query(0), SearchScript::Empty)
            .with_search(query(3), SearchScript::NoVideoId),
    );

    let enriched = enrich_plan(sample_plan(4), lookup(&backend), &EnrichConfig::default()).await;

    let attached: Vec<bool> = enriched
        .modules
        .iter()
        .map(|m| m.recommended_video.is_some())
        .collect();
    assert_eq!(attached, vec![false, true, true, false]);
}

#[tokio::test]
async fn slow_lookup_times_out_for_that_module_only() {
    let backend = Arc::new(StubVideoBackend::new().with_delay(query(1), Duration::from_secs(5)));
    let config = EnrichConfig {
        lookup_timeout: Duration::from_millis(100),
    };

    let enriched = enrich_plan(sample_plan(3), lookup(&backend), &config).await;

    assert!(enriched.modules[0].recommended_video.is_some());
    assert!(enriched.modules[1].recommended_video.is_none());
    assert!(enriched.modules[2].recommended_video.is_some());
}

#[tokio::test]
async fn missing_snippet_fields_fall_back_to_placeholders() {
    let mut hit = SearchHit::video("abc", "ignored", "ignored");
    hit.snippet = None;
    let backend = Arc::new(StubVideoBackend::new().with_search(query(0), SearchScript::Hit(hit)));

    let enriched = enrich_plan(sample_plan(1), lookup(&backend), &EnrichConfig::default()).await;

    let video = enriched.modules[0].recommended_video.as_ref().unwrap();
    assert_eq!(video.title, "Unknown Title");
    assert_eq!(video.channel, "Unknown Channel");
}

#[tokio::test]
async fn fan_out_fault_returns_unenriched_plan() {
    let backend = Arc::new(StubVideoBackend::new().with_search(query(1), SearchScript::Panic));
    let plan = sample_plan(4);

    let enriched = enrich_plan(plan.clone(), lookup(&backend), &EnrichConfig::default()).await;

    assert_eq!(enriched, plan);
    assert_eq!(enriched.video_count(), 0);
}

#[tokio::test]
async fn plan_without_modules_is_returned_as_is() {
    let mut plan = sample_plan(1);
    plan.modules.clear();
    let backend = Arc::new(StubVideoBackend::new());

    let enriched = enrich_plan(plan.clone(), lookup(&backend), &EnrichConfig::default()).await;

    assert_eq!(enriched, plan);
    assert_eq!(backend.search_calls(), 0);
}
