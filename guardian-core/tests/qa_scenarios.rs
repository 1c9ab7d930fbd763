//! QA tests for the scripted scenario timings.
//!
//! Every test drives time with a `ManualClock`, so nothing here sleeps.
//! Run with: `cargo test -p guardian-core --test qa_scenarios`

use std::time::Duration;

use guardian_core::scenario::{LandslidePhase, NetworkMode, VolunteerPhase};
use guardian_core::testing::{run_for, test_session, ManualClock};
use guardian_core::{Notice, Region, VerificationForm, VerificationStep};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// =============================================================================
// TEST 1: Landslide reveal runs to completion
// =============================================================================

#[tokio::test]
async fn test_landslide_full_run() {
    let mut session = test_session(1).await.expect("session");
    let mut clock = ManualClock::new();

    session.landslide.toggle(clock.now());
    assert_eq!(session.landslide.phase(), LandslidePhase::Scanning);
    assert_eq!(session.landslide.network(), NetworkMode::Degraded);

    run_for(&mut session, &mut clock, ms(1200), ms(50));
    assert_eq!(session.landslide.active_ids(), &[1, 5]);
    assert!(!session.landslide.skill_deficit());

    run_for(&mut session, &mut clock, ms(1200), ms(50));
    assert_eq!(session.landslide.active_ids(), &[1, 5, 2, 6]);
    assert_eq!(session.landslide.network(), NetworkMode::Mesh);
    assert!(session.landslide.skill_deficit());

    run_for(&mut session, &mut clock, ms(1200), ms(50));
    assert_eq!(session.landslide.phase(), LandslidePhase::FullDeployment);
    assert_eq!(session.landslide.deployed_count(), 6);
    assert_eq!(session.landslide.scan_progress(), 100);
    assert!(session.landslide.skill_deficit());
    assert_eq!(session.landslide.next_deadline(), None);
}

// =============================================================================
// TEST 2: Reset at any point leaves nothing behind
// =============================================================================

#[tokio::test]
async fn test_reset_is_final_at_every_offset() {
    for offset in [0, 100, 1199, 1200, 1900, 2400, 3000, 3600, 5000] {
        let mut session = test_session(2).await.expect("session");
        let mut clock = ManualClock::new();

        session.landslide.start(clock.now());
        run_for(&mut session, &mut clock, ms(offset), ms(100));
        session.landslide.reset();

        let notices = run_for(&mut session, &mut clock, ms(10_000), ms(100));
        assert!(notices.is_empty(), "offset {offset}: {notices:?}");
        assert!(session.landslide.active_ids().is_empty(), "offset {offset}");
        assert_eq!(session.landslide.network(), NetworkMode::Normal);
        assert_eq!(session.landslide.phase(), LandslidePhase::Idle);
        assert_eq!(session.landslide.scan_progress(), 0);
    }
}

// =============================================================================
// TEST 3: Volunteer phone offers a mission but never accepts on its own
// =============================================================================

#[tokio::test]
async fn test_volunteer_offer_without_accept() {
    let mut session = test_session(3).await.expect("session");
    let mut clock = ManualClock::new();

    session.volunteer.open(clock.now());
    let notices = run_for(&mut session, &mut clock, ms(5500), ms(100));
    assert_eq!(
        notices,
        vec![
            Notice::Volunteer(VolunteerPhase::Alerting),
            Notice::Volunteer(VolunteerPhase::MissionOffered),
        ]
    );

    run_for(&mut session, &mut clock, ms(120_000), ms(1000));
    assert_eq!(session.volunteer.phase(), VolunteerPhase::MissionOffered);
    assert!(session.volunteer.battery() < 88);

    assert!(session.volunteer.accept());
    assert_eq!(session.volunteer.phase(), VolunteerPhase::Accepted);
}

#[tokio::test]
async fn test_volunteer_reject_mid_alert() {
    let mut session = test_session(4).await.expect("session");
    let mut clock = ManualClock::new();

    session.volunteer.open(clock.now());
    run_for(&mut session, &mut clock, ms(4200), ms(100));
    assert_eq!(session.volunteer.phase(), VolunteerPhase::Alerting);

    session.volunteer.reject();
    let notices = run_for(&mut session, &mut clock, ms(10_000), ms(100));
    assert!(notices.is_empty());
    assert!(!session.volunteer.is_open());
    assert!(!session.volunteer.accept());
}

// =============================================================================
// TEST 4: Verification through the session
// =============================================================================

#[tokio::test]
async fn test_verification_reports_each_screen() {
    let mut session = test_session(5).await.expect("session");
    let mut clock = ManualClock::new();

    *session.verification.form_mut() = VerificationForm::new("Arun K", "9876543210", "DGCA-2024-001");
    assert!(session.verification.submit(clock.now()));

    let notices = run_for(&mut session, &mut clock, ms(4000), ms(100));
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0], Notice::Verification(VerificationStep::Validating));
    match &notices[1] {
        Notice::Verification(VerificationStep::Verified(entry)) => {
            assert_eq!(entry.id, "DGCA-2024-001");
        }
        other => panic!("expected verified, got {other:?}"),
    }
}

// =============================================================================
// TEST 5: Assistant replies within the typing window
// =============================================================================

#[tokio::test]
async fn test_assistant_reply_window() {
    for seed in 0..20 {
        let mut session = test_session(seed).await.expect("session");
        let mut clock = ManualClock::new();

        session.assistant.open(clock.now());
        run_for(&mut session, &mut clock, ms(800), ms(800));
        session.assistant.send("What is the soil saturation?", clock.now());

        let notices = run_for(&mut session, &mut clock, ms(2000), ms(10));
        let reply = notices
            .iter()
            .find_map(|n| match n {
                Notice::AssistantMessage(text) => Some(text.clone()),
                _ => None,
            })
            .expect("reply within 2s");
        assert!(reply.contains("Soil Saturation"), "seed {seed}");
    }
}

// =============================================================================
// TEST 6: Dashboard keeps rendering one region at a time
// =============================================================================

#[tokio::test]
async fn test_dashboard_cycle_regions() {
    let mut session = test_session(6).await.expect("session");
    let mut clock = ManualClock::new();
    session.dashboard.open(clock.now());

    for expected in [Region::Idukki, Region::Pathanamthitta, Region::Alappuzha, Region::Wayanad] {
        run_for(&mut session, &mut clock, ms(7000), ms(500));
        session.dashboard.cycle_region();
        let view = session.dashboard.view();
        assert_eq!(view.region, expected);
        assert_eq!(view.bundle.name, expected.to_string());
        for (value, metric) in view.live_values.iter().zip(view.bundle.metrics.iter()) {
            assert_eq!(*value, metric.value);
        }
    }
}
