// Unit tests for push events and the live feed.
//
// Decoding of the three named events, status mapping from scores, crisis
// matching, and the feed's dedup between pushed and polled updates. No
// network access.

use serde_json::json;

use claimdesk::api::realtime::decode_payload;
use claimdesk::claims::ClaimStatus;
use claimdesk::crisis::{matching_alert, CrisisAlert};
use claimdesk::dashboard::DashboardUpdate;
use claimdesk::events::{status_for_score, LiveFeed, PushEvent, Verification, FEED_CAPACITY};
use rust_socketio::Payload;

fn verification(claim: &str, score: f64) -> PushEvent {
    PushEvent::NewVerification(Verification {
        timestamp: Some("12:00".to_string()),
        claim: claim.to_string(),
        score,
        severity: "High".to_string(),
        emerging: false,
        origin: None,
    })
}

fn crisis(value: serde_json::Value) -> PushEvent {
    PushEvent::from_value("crisis_alert", value).unwrap().unwrap()
}

fn polled(title: &str, status: &str) -> DashboardUpdate {
    DashboardUpdate {
        title: title.to_string(),
        content: "Claim analyzed".to_string(),
        time: "2 minutes ago".to_string(),
        status: status.to_string(),
    }
}

#[test]
fn decode_new_verification() {
    let event = PushEvent::decode(
        "new_verification",
        r#"{"timestamp": "2024-06-01T10:00:00", "claim": "Moon landing was staged", "score": -0.8, "severity": "High"}"#,
    )
    .unwrap()
    .unwrap();

    match event {
        PushEvent::NewVerification(v) => {
            assert_eq!(v.claim, "Moon landing was staged");
            assert_eq!(v.status(), ClaimStatus::False);
            assert!(!v.emerging);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn decode_fills_missing_severity() {
    let event = PushEvent::decode("human_review", r#"{"claim": "x", "score": 0.1}"#)
        .unwrap()
        .unwrap();
    match event {
        PushEvent::HumanReview(v) => assert_eq!(v.severity, "Uncertain"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn decode_crisis_alert() {
    let event = PushEvent::decode(
        "crisis_alert",
        r#"{"claim": "Dam has burst", "crisis_type": "flood", "recommended_action": "Issue correction", "reach": 120000}"#,
    )
    .unwrap()
    .unwrap();
    assert_eq!(event.name(), "crisis_alert");
    match event {
        PushEvent::CrisisAlert(alert) => {
            assert_eq!(alert.reach, Some(120000));
            assert_eq!(alert.recommended_action.as_deref(), Some("Issue correction"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn unknown_event_names_are_skipped() {
    assert!(PushEvent::decode("heartbeat", "{}").unwrap().is_none());
}

#[test]
fn malformed_payload_is_an_error() {
    assert!(PushEvent::decode("new_verification", "not json").is_err());
}

#[test]
fn score_thresholds() {
    assert_eq!(status_for_score(-0.31), ClaimStatus::False);
    assert_eq!(status_for_score(-0.3), ClaimStatus::Pending);
    assert_eq!(status_for_score(0.0), ClaimStatus::Pending);
    assert_eq!(status_for_score(0.3), ClaimStatus::Pending);
    assert_eq!(status_for_score(0.31), ClaimStatus::Verified);
}

// -- Socket.IO payloads --

#[test]
fn socket_payload_matches_publisher_shape() {
    let event = decode_payload(
        "new_verification",
        Payload::Text(vec![json!({
            "timestamp": "2024-06-01T10:00:00.123456",
            "claim": "Garlic cures measles",
            "score": -0.55,
            "severity": "LIKELY FALSE",
            "emerging": true,
            "origin": null
        })]),
    )
    .unwrap()
    .unwrap();

    match event {
        PushEvent::NewVerification(v) => {
            assert_eq!(v.status(), ClaimStatus::False);
            assert!(v.emerging);
            assert_eq!(v.origin, None);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn socket_crisis_payload_carries_context() {
    let event = decode_payload(
        "crisis_alert",
        Payload::Text(vec![json!({
            "timestamp": "2024-06-01T10:00:00",
            "claim": "Hospitals are turning away flood victims",
            "score": -0.7,
            "severity": "LIKELY FALSE",
            "emerging": false,
            "origin": "telegram",
            "crisis_context": {
                "disaster": {"confidence": 0.25, "triggers": ["flood"]},
                "health": {"confidence": 0.1, "triggers": ["hospital"]}
            }
        })]),
    )
    .unwrap()
    .unwrap();

    match event {
        PushEvent::CrisisAlert(alert) => {
            assert_eq!(alert.kind(), Some("disaster"));
            assert_eq!(alert.crisis_context["disaster"].triggers, vec!["flood"]);
            assert_eq!(alert.badge(), "DISASTER CRISIS - LIKELY FALSE RISK");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn malformed_socket_payload_is_an_error() {
    assert!(decode_payload("human_review", Payload::Text(vec![json!("just text")])).is_err());
}

// -- LiveFeed --

#[test]
fn duplicate_claims_are_not_shown_twice() {
    let mut feed = LiveFeed::new();
    assert!(feed.apply(verification("Vaccines cause autism", -0.9)));
    assert!(!feed.apply(verification("vaccines CAUSE autism", -0.9)));

    assert_eq!(feed.updates().count(), 1);
    assert_eq!(feed.counts().false_claims, 1);
}

#[test]
fn polling_skips_claims_already_pushed() {
    let mut feed = LiveFeed::new();
    feed.apply(verification("5G spreads viruses", -0.7));

    let added = feed.merge_polled(vec![
        polled("Election moved to Thursday", "pending"),
        polled("5G spreads viruses", "false"),
    ]);
    assert_eq!(added, 1);
    assert_eq!(feed.updates().count(), 2);
    assert_eq!(feed.counts().false_claims, 1);
    assert_eq!(feed.counts().pending, 1);
}

#[test]
fn polled_batch_keeps_newest_first() {
    let mut feed = LiveFeed::new();
    feed.merge_polled(vec![polled("newest", "verified"), polled("older", "false")]);
    let claims: Vec<&str> = feed.updates().map(|u| u.claim.as_str()).collect();
    assert_eq!(claims, vec!["newest", "older"]);
}

#[test]
fn feed_is_capped() {
    let mut feed = LiveFeed::new();
    for i in 0..(FEED_CAPACITY + 5) {
        feed.apply(verification(&format!("claim {i}"), 0.5));
    }
    assert_eq!(feed.updates().count(), FEED_CAPACITY);
    let newest = format!("claim {}", FEED_CAPACITY + 4);
    assert_eq!(
        feed.updates().next().map(|u| u.claim.as_str()),
        Some(newest.as_str())
    );
    assert_eq!(feed.counts().verified, (FEED_CAPACITY + 5) as u64);
}

#[test]
fn review_queue_dedups_by_claim() {
    let mut feed = LiveFeed::new();
    let review = |claim: &str| {
        PushEvent::HumanReview(Verification {
            timestamp: None,
            claim: claim.to_string(),
            score: 0.0,
            severity: "Uncertain".to_string(),
            emerging: true,
            origin: None,
        })
    };
    assert!(feed.apply(review("Needs a human")));
    assert!(!feed.apply(review("needs a human")));
    assert_eq!(feed.review_queue().count(), 1);
    // Review items don't touch the live panel.
    assert_eq!(feed.updates().count(), 0);
}

#[test]
fn newest_crisis_takes_the_banner() {
    let mut feed = LiveFeed::new();
    feed.apply(crisis(json!({"claim": "Bridge closed"})));
    feed.apply(crisis(json!({"claim": "Power grid down"})));
    assert_eq!(feed.crisis().map(|c| c.claim.as_str()), Some("Power grid down"));

    // A repeat moves back to the front instead of stacking.
    feed.apply(crisis(json!({"claim": "bridge closed"})));
    assert_eq!(feed.crisis().map(|c| c.claim.as_str()), Some("bridge closed"));
}

#[test]
fn listed_crises_stay_behind_pushed_ones() {
    let listed: Vec<CrisisAlert> = serde_json::from_value(json!([
        {"id": 1, "claim": "New COVID variant has 50% mortality rate and vaccine resistance",
         "crisis_type": "health", "severity": "high", "reach": 50000,
         "first_detected": "2 hours ago", "trend": "rising",
         "recommended_action": "Issue WHO-approved correction"}
    ]))
    .unwrap();

    let mut feed = LiveFeed::new();
    feed.apply(crisis(json!({"claim": "Power grid down"})));
    feed.load_crises(listed);

    assert_eq!(feed.crisis().map(|c| c.claim.as_str()), Some("Power grid down"));
    let matched = feed
        .crisis_for("Forwarded: new covid variant has 50% mortality, share now")
        .unwrap();
    assert_eq!(matched.badge(), "HEALTH CRISIS - high RISK");
    assert!(feed.crisis_for("Unrelated claim about taxes").is_none());
}

#[test]
fn alert_matching_uses_leading_characters() {
    let alerts: Vec<CrisisAlert> = serde_json::from_value(json!([
        {"claim": "Government hiding true death toll from natural disaster",
         "crisis_type": "disaster", "severity": "medium"}
    ]))
    .unwrap();

    // The first 20 characters are "government hiding tr".
    assert!(matching_alert("They say the GOVERNMENT HIDING TRUTH again", &alerts).is_some());
    assert!(matching_alert("Government is hiding things", &alerts).is_none());
}

#[test]
fn unknown_polled_status_counts_as_pending() {
    let mut feed = LiveFeed::new();
    feed.merge_polled(vec![polled("odd one", "disputed")]);
    assert_eq!(feed.counts().pending, 1);
}
