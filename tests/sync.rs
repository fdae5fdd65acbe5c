
use std::convert::TryFrom;
use std::time::Duration;

use chrono::Weekday;

use recurring_events::cache::Outcome;
use recurring_events::dates::FixedClock;
use recurring_events::engine::{OutcomeCounts, SyncRequest, Synchronizer, TruncatedCollection};
use recurring_events::error::Error;
use recurring_events::mock_behaviour::MockBehaviour;
use recurring_events::mock_remote::{MockRemote, RemoteCall};
use recurring_events::paging::PagingOptions;
use recurring_events::references::{ReferenceDefaults, ReferenceKind};
use recurring_events::template::{EventTemplate, RawTemplate};

use scenarii::{date, parish_synchronizer, populate_parish_remote};

fn morning_service() -> EventTemplate {
    let raw: RawTemplate = toml::from_str(r#"
        key = "morning"
        title = "Morning Service"
        description = "<p>Morning Service</p>"
        weekdays = [6]
        start = "10:00:00"
        end = "11:15:00"
    "#).unwrap();
    EventTemplate::try_from(raw).unwrap()
}

fn sundays_from(start: &str, weeks: u32) -> SyncRequest {
    let mut request = SyncRequest::new(vec![Weekday::Sun], weeks);
    request.start_date = Some(date(start));
    request
}

fn morning_synchronizer(remote: MockRemote) -> Synchronizer<MockRemote> {
    Synchronizer::new(remote, vec![morning_service()], ReferenceDefaults::default())
        .with_clock(FixedClock(date("2026-10-19")))
}


#[tokio::test]
async fn test_three_morning_services() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut sync = morning_synchronizer(MockRemote::new());
    let summary = sync.synchronize(&sundays_from("2026-02-01", 3)).await;

    assert!(summary.is_success());
    let sunday = summary.weekday(Weekday::Sun).unwrap();
    assert_eq!(sunday.dates, vec![date("2026-02-01"), date("2026-02-08"), date("2026-02-15")]);
    assert_eq!(sunday.counts, OutcomeCounts { created: 3, ..OutcomeCounts::default() });

    assert_eq!(sync.remote().event_slugs().await, vec![
        "2026-02-01-morning-service".to_string(),
        "2026-02-08-morning-service".to_string(),
        "2026-02-15-morning-service".to_string(),
    ]);

    let events = sync.remote().events().await;
    let first = events[0].payload.as_ref().unwrap();
    assert_eq!(first.title, "Morning Service [Sunday 1st February 2026]");
    assert_eq!(first.start_date, "2026-02-01 10:00:00");
    assert_eq!(first.end_date, "2026-02-01 11:15:00");
    assert_eq!(sync.index().len(), 3);
}

#[tokio::test]
async fn test_running_twice_is_harmless() {
    let _ = env_logger::builder().is_test(true).try_init();

    let request = sundays_from("2026-02-01", 3);
    let mut sync = morning_synchronizer(MockRemote::new());
    sync.synchronize(&request).await;

    // A new run, with fresh caches, over the same remote
    let remote = MockRemote::new();
    for event in sync.remote().events().await {
        remote.add_event(&event.slug, event.start).await;
    }
    let mut second = morning_synchronizer(remote);
    let summary = second.synchronize(&request).await;
    assert_eq!(summary.totals(), OutcomeCounts { skipped: 3, ..OutcomeCounts::default() });
    assert_eq!(second.remote().event_ids().await.len(), 3);
    assert!(second.remote().calls().await.iter().all(|call| matches!(call, RemoteCall::ListEvents { .. })));

    // Explicitly allowing updates overwrites them
    let mut update = request.clone();
    update.allow_update = true;
    let summary = second.synchronize(&update).await;
    assert_eq!(summary.totals(), OutcomeCounts { updated: 3, ..OutcomeCounts::default() });
    assert_eq!(second.remote().event_ids().await.len(), 3);
    let events = second.remote().events().await;
    assert!(events.iter().all(|event| event.payload.is_some()));
}

#[tokio::test]
async fn test_dry_run_sends_nothing() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = MockRemote::new();
    let existing = remote.add_event("2026-02-08-morning-service", date("2026-02-08")).await;
    let mut sync = morning_synchronizer(remote);
    let mut request = sundays_from("2026-02-01", 3);
    request.dry_run = true;
    request.allow_update = true;

    let summary = sync.synchronize(&request).await;
    assert!(summary.is_success());
    assert_eq!(summary.totals(), OutcomeCounts { would_create: 2, would_update: 1, ..OutcomeCounts::default() });
    assert_eq!(sync.remote().event_ids().await, vec![existing]);
    assert!(sync.remote().calls().await.iter().all(|call| matches!(call, RemoteCall::ListEvents { .. })));
    // Nothing has been created, so nothing has been indexed
    assert_eq!(sync.index().len(), 1);
}

#[tokio::test]
async fn test_prefetch_failure_aborts_the_run() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = MockRemote::new();
    remote.set_behaviour(MockBehaviour { list_events_behaviour: (0, 1), ..MockBehaviour::default() }).await;
    let mut sync = morning_synchronizer(remote);
    let mut request = sundays_from("2026-02-01", 3);
    request.weekdays.push(Weekday::Fri);

    let summary = sync.synchronize(&request).await;
    assert!(summary.is_success() == false);
    assert!(matches!(summary.fatal, Some(Error::PrefetchFailed(_))));
    assert!(summary.weekdays.is_empty());
    assert_eq!(sync.remote().calls().await, vec![RemoteCall::ListEvents { page: 1 }]);
}

#[tokio::test]
async fn test_failure_stops_the_weekday_only() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = populate_parish_remote().await;
    let mut templates = vec![morning_service()];
    let broken: RawTemplate = toml::from_str(r#"
        key = "broken"
        title = "Second Sunday Lunch"
        weekdays = [6]
        weeks = [2]
        start = "12:30:00"
        end = "14:00:00"
        tags = ["lunch"]
    "#).unwrap();
    templates.push(EventTemplate::try_from(broken).unwrap());
    let rehearsal: RawTemplate = toml::from_str(r#"
        key = "rehearsal"
        title = "Rehearsal"
        weekdays = [4]
        start = "19:30:00"
        end = "21:00:00"
    "#).unwrap();
    templates.push(EventTemplate::try_from(rehearsal).unwrap());

    let mut sync = Synchronizer::new(remote, templates, ReferenceDefaults::default());
    let mut request = sundays_from("2026-02-01", 3);
    request.weekdays.push(Weekday::Fri);

    let summary = sync.synchronize(&request).await;
    assert!(summary.is_success() == false);
    assert!(summary.fatal.is_none());

    let sunday = summary.weekday(Weekday::Sun).unwrap();
    // The failure happens on the second date, the third one is never attempted
    assert_eq!(sunday.dates, vec![date("2026-02-01"), date("2026-02-08")]);
    assert_eq!(sunday.counts.created, 2);
    match &sunday.failure {
        Some(Error::ReferenceNotFound { kind: ReferenceKind::Tag, name }) => assert_eq!(name, "lunch"),
        other => panic!("Unexpected failure {:?}", other),
    }

    let friday = summary.weekday(Weekday::Fri).unwrap();
    assert!(friday.failure.is_none());
    assert_eq!(friday.counts.created, 3);

    let slugs = sync.remote().event_slugs().await;
    assert!(slugs.contains(&"2026-02-08-morning-service".to_string()));
    assert!(slugs.contains(&"2026-02-15-morning-service".to_string()) == false);
    assert!(slugs.iter().any(|slug| slug.contains("second-sunday-lunch")) == false);
    assert!(slugs.contains(&"2026-02-06-rehearsal".to_string()));
}

#[tokio::test]
async fn test_parish_sundays() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = populate_parish_remote().await;
    let mut sync = parish_synchronizer(remote, PagingOptions::default());
    let summary = sync.synchronize(&sundays_from("2026-02-01", 5)).await;
    assert!(summary.is_success());
    // 3 on the 1st Sundays, 2 on the others
    assert_eq!(summary.totals().created, 12);

    let slugs = sync.remote().event_slugs().await;
    assert_eq!(&slugs[..3], &[
        "2026-02-01-holy-communion-from-the-book-of-common-worship-morning".to_string(),
        "2026-02-01-a-service-of-evensong-evening".to_string(),
        "2026-02-01-4-oclock-church-family-service-afternoon".to_string(),
    ]);
    assert!(slugs.contains(&"2026-02-08-a-service-of-choral-evensong-evening".to_string()));
    assert!(slugs.contains(&"2026-02-08-a-service-of-evensong-evening".to_string()) == false);
    assert!(slugs.contains(&"2026-03-01-4-oclock-church-family-service-afternoon".to_string()));

    let events = sync.remote().events().await;
    let four_oclock = events.iter().find(|e| e.slug.starts_with("2026-02-01-4-oclock")).unwrap();
    let payload = four_oclock.payload.as_ref().unwrap();
    assert_eq!(payload.title, "4 O'clock Church - Family Service (afternoon) [Sunday 1st February 2026]");
    assert_eq!(payload.venue, Some(1));
    assert_eq!(payload.organiser, Some(5));
    assert_eq!(payload.tags, vec![103, 104]);
    assert_eq!(payload.categories, vec![203]);
    assert_eq!(payload.image, Some(965));
    assert_eq!(payload.excerpt, "<p>4 O'Clock Church is a family service with different themes, crafts and activities.</p>");

    // Every reference kind has been listed once, and no single lookup was needed
    let calls = sync.remote().calls().await;
    for kind in ReferenceKind::ALL.iter() {
        let listings = calls.iter().filter(|call| matches!(call, RemoteCall::ListReferences { kind: k, .. } if k == kind)).count();
        assert_eq!(listings, 1);
    }
    assert!(calls.iter().any(|call| matches!(call, RemoteCall::FindReference { .. } | RemoteCall::SearchReferences { .. })) == false);
}

#[tokio::test]
async fn test_summer_break() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = populate_parish_remote().await;
    let mut sync = parish_synchronizer(remote, PagingOptions::default());
    let mut request = sundays_from("2026-07-31", 2);
    request.weekdays.push(Weekday::Fri);
    let summary = sync.synchronize(&request).await;
    assert!(summary.is_success());

    // 2026-08-02 and 2026-08-09 are Sundays, 2026-07-31 and 2026-08-07 are Fridays
    let slugs = sync.remote().event_slugs().await;
    assert_eq!(slugs, vec![
        "2026-08-02-holy-communion-from-the-book-of-common-worship-morning".to_string(),
        "2026-08-02-a-service-of-evensong-evening".to_string(),
        "2026-08-09-holy-communion-from-the-book-of-common-worship-morning".to_string(),
        "2026-07-31-adult-choir-rehearsal".to_string(),
    ]);
}

#[tokio::test]
async fn test_only_some_templates() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = populate_parish_remote().await;
    let mut sync = parish_synchronizer(remote, PagingOptions::default());
    let mut request = sundays_from("2026-02-01", 4);
    request.limit_keys = vec!["choral-evensong".to_string()];

    let summary = sync.synchronize(&request).await;
    assert_eq!(summary.totals().created, 1);
    assert_eq!(sync.remote().event_slugs().await, vec!["2026-02-08-a-service-of-choral-evensong-evening".to_string()]);
}

#[tokio::test]
async fn test_categories_beyond_the_page_ceiling() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = populate_parish_remote().await;
    let mut sync = parish_synchronizer(remote, PagingOptions { page_size: 2, max_pages: 1 });
    let mut request = sundays_from("2026-02-08", 1);
    request.limit_keys = vec!["choral-evensong".to_string()];

    let summary = sync.synchronize(&request).await;
    assert!(summary.is_success());
    assert_eq!(summary.totals().created, 1);
    assert!(summary.truncated.contains(&TruncatedCollection::References(ReferenceKind::Category)));
    assert!(summary.truncated.contains(&TruncatedCollection::References(ReferenceKind::Tag)));
    assert_eq!(summary.warnings as usize, summary.truncated.len());

    let calls = sync.remote().calls().await;
    assert!(calls.contains(&RemoteCall::SearchReferences { kind: ReferenceKind::Category, term: "choralevensong".to_string() }));
    assert!(calls.contains(&RemoteCall::FindReference { kind: ReferenceKind::Tag, slug: "choralevensong".to_string() }));
    assert!(calls.iter().any(|call| matches!(call, RemoteCall::FindReference { kind: ReferenceKind::Category, .. })) == false);

    let payload = sync.remote().events().await[0].payload.clone().unwrap();
    assert_eq!(payload.tags, vec![102]);
    assert_eq!(payload.categories, vec![202]);
}

#[tokio::test]
async fn test_truncated_event_prefetch_is_reported() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = MockRemote::new();
    remote.add_event("2026-02-01-morning-service", date("2026-02-01")).await;
    remote.add_event("2026-02-08-morning-service", date("2026-02-08")).await;
    let mut sync = morning_synchronizer(remote).with_paging(PagingOptions { page_size: 1, max_pages: 1 });

    let summary = sync.synchronize(&sundays_from("2026-02-01", 2)).await;
    assert_eq!(summary.truncated, vec![TruncatedCollection::Events]);
    assert_eq!(summary.warnings, 1);
    // The second event was beyond the ceiling, so it is not known
    assert_eq!(summary.totals(), OutcomeCounts { skipped: 1, created: 1, ..OutcomeCounts::default() });
    assert!(summary.to_string().contains("the events could only be partially fetched"));
}

#[tokio::test]
async fn test_delay_between_dates() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut sync = morning_synchronizer(MockRemote::new());
    let mut request = sundays_from("2026-02-01", 3);
    request.delay = Duration::from_millis(30);

    let started = tokio::time::Instant::now();
    let summary = sync.synchronize(&request).await;
    assert!(summary.is_success());
    // Two pauses for three dates
    assert!(started.elapsed() >= Duration::from_millis(60));
}

#[tokio::test]
async fn test_outcomes_are_reported_per_weekday() {
    let _ = env_logger::builder().is_test(true).try_init();

    let remote = populate_parish_remote().await;
    let mut sync = parish_synchronizer(remote, PagingOptions::default());
    let mut request = sundays_from("2026-02-01", 1);
    request.weekdays = vec![Weekday::Fri, Weekday::Sun];
    request.dry_run = true;

    let summary = sync.synchronize(&request).await;
    let order: Vec<Weekday> = summary.weekdays.iter().map(|w| w.weekday).collect();
    assert_eq!(order, vec![Weekday::Fri, Weekday::Sun]);
    assert_eq!(summary.weekday(Weekday::Fri).unwrap().counts.would_create, 1);
    assert_eq!(summary.weekday(Weekday::Sun).unwrap().counts.would_create, 3);

    let mut counts = OutcomeCounts::default();
    counts.record(Outcome::WouldCreate);
    assert_eq!(summary.weekday(Weekday::Fri).unwrap().counts, counts);
}
