//! QA tests for the headless line protocol.
//!
//! Time is paused, so `#wait` and the assistant's typing delay complete
//! instantly while still firing timers in order.
//! Run with: `cargo test -p guardian-core --test qa_headless`

use guardian_core::headless::{HeadlessConsole, Output};
use guardian_core::testing::test_session;
use guardian_core::{Language, MemoryStore};

async fn console() -> HeadlessConsole<MemoryStore> {
    HeadlessConsole::new(test_session(11).await.expect("session"))
}

async fn run(console: &mut HeadlessConsole<MemoryStore>, line: &str) -> Output {
    let out = console.execute_line(line).await;
    for l in &out.lines {
        println!("{l}");
    }
    out
}

// =============================================================================
// TEST 1: Trigger and watch the reveal
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_trigger_and_wait() {
    let mut console = console().await;

    let out = run(&mut console, "#trigger").await;
    assert!(out.has("[MAP] Landslide detected"));

    let out = run(&mut console, "#wait 3600").await;
    let reveals: Vec<_> = out
        .lines
        .iter()
        .filter(|l| l.contains("assets deployed"))
        .collect();
    assert_eq!(reveals.len(), 3);
    assert!(reveals[2].contains("6/6"));
    assert!(reveals[2].contains("MESH MODE"));
    assert!(out.has("[MAP] Terrain scan complete"));

    let out = run(&mut console, "#trigger").await;
    assert!(out.has("[MAP] Scenario reset"));
    let out = run(&mut console, "#wait 5000").await;
    assert!(out.lines.is_empty());
}

// =============================================================================
// TEST 2: Assistant replies arrive within the command
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_ask_waits_for_reply() {
    let mut console = console().await;

    let out = run(&mut console, "Show me high-risk zones").await;
    // Welcome message, then the reply.
    let headers = out.lines.iter().filter(|l| *l == "[ASSISTANT]").count();
    assert_eq!(headers, 2);
    assert!(out.lines.iter().any(|l| l.contains("Critical Risk Zones in Wayanad District:")));

    let out = run(&mut console, "#ask tell me a joke").await;
    assert!(out.lines.iter().any(|l| l.contains("I'm GuardianNet AI")));
}

// =============================================================================
// TEST 3: Verification success and failure
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_verify_commands() {
    let mut console = console().await;

    let out = run(&mut console, "#verify DGCA-2024-001 Arun K").await;
    assert_eq!(out.lines[0], "[VERIFY] Connecting to Kerala State Database...");
    assert!(out.has("[VERIFY] Validating"));
    assert!(out.lines.iter().any(|l| l.starts_with("[VERIFY] Verified: Arun Kumar")));

    let out = run(&mut console, "#verify ZZZ-000 Nobody Nowhere").await;
    assert!(out.has("[VERIFY] Not found in registry"));

    let out = run(&mut console, "#verify IMA-KL-4521 Priya").await;
    assert!(out.lines.iter().any(|l| l.contains("IMA-KL-4521")));
}

// =============================================================================
// TEST 4: Volunteer flow
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_volunteer_commands() {
    let mut console = console().await;

    run(&mut console, "#volunteer").await;
    let out = run(&mut console, "#accept").await;
    assert!(out.has("[ERROR]"));

    let out = run(&mut console, "#wait 5500").await;
    assert_eq!(
        out.lines,
        vec!["[VOLUNTEER] Emergency alert", "[VOLUNTEER] Mission offered"]
    );

    let out = run(&mut console, "#accept").await;
    assert_eq!(out.lines[0], "[VOLUNTEER] Mission Accepted");
    assert!(out.lines.iter().any(|l| l.contains("Chooralmala")));
}

// =============================================================================
// TEST 5: Region, language, status, and errors
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_misc_commands() {
    let mut console = console().await;

    let out = run(&mut console, "#region Alappuzha").await;
    assert!(out.lines[0].contains("Alappuzha"));
    assert!(out.lines.iter().any(|l| l.contains("Kuttanad")));

    let out = run(&mut console, "#lang ml").await;
    assert!(out.has("[LANG] ml"));
    assert_eq!(console.session().language(), Language::Ml);

    let out = run(&mut console, "#region Alappuzha").await;
    assert!(out.lines[0].contains("കെ.എസ്.ഡി.എം.എ കൺട്രോൾ സെന്റർ"));

    let out = run(&mut console, "#status").await;
    for tag in ["[MAP]", "[ASSISTANT]", "[VERIFY]", "[VOLUNTEER]", "[DASHBOARD]", "[LANG]"] {
        assert!(out.has(tag), "missing {tag}");
    }

    let out = run(&mut console, "#teleport").await;
    assert!(out.has("[ERROR] Unknown command #teleport"));

    assert!(run(&mut console, "   ").await.lines.is_empty());

    let out = run(&mut console, "#quit").await;
    assert!(out.quit);
}

// =============================================================================
// TEST 6: Tactical briefing zones
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_zone_commands() {
    let mut console = console().await;

    let out = run(&mut console, "#zone 2").await;
    assert!(out.has("[ERROR] Zones are available"));

    run(&mut console, "#trigger").await;
    let out = run(&mut console, "#zones").await;
    assert_eq!(out.lines.len(), 6);
    assert_eq!(out.lines[0], "[ZONE] Zone 1 - Punchirimattom: High-Altitude Search");

    let out = run(&mut console, "#zone 2").await;
    assert_eq!(out.lines[0], "[ZONE] Zone 2 - Mundakkai: Search & Rescue");
    assert!(out.lines[1].contains("Silence periods every 30 mins"));
    assert_eq!(out.lines[2], "[ZONE]   Gear: Excavators, Sniffer Dogs");

    let out = run(&mut console, "#zone zone-2").await;
    assert_eq!(out.lines, vec!["[ZONE] Zone 2 deselected"]);

    run(&mut console, "#zone 6").await;
    let out = run(&mut console, "#status").await;
    assert!(out.has("[ZONE] Zone 6 - Downstream"));

    run(&mut console, "#reset").await;
    assert!(console.session().landslide.selected_zone().is_none());
    let out = run(&mut console, "#status").await;
    assert!(!out.has("[ZONE]"));
}

// =============================================================================
// TEST 7: Resource overview counts up, then expands
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_resources_command() {
    let mut console = console().await;

    let out = run(&mut console, "#resources").await;
    assert!(out.has("[RESOURCES] All counts verified"));
    assert!(out.lines.contains(&"[RESOURCES] 1. Heavy Machinery: 42 Units (verified)".to_string()));
    assert!(out.lines.contains(&"[RESOURCES] 4. Medical Teams: 12 Specialists (verified)".to_string()));
    assert!(!console.session().resources.is_counting());

    let out = run(&mut console, "#resources 2").await;
    assert!(out.lines.contains(&"[RESOURCES]   - Thermal Imaging x 4".to_string()));
    assert_eq!(out.lines.iter().filter(|l| l.contains("   - ")).count(), 4);

    let out = run(&mut console, "#resources 2").await;
    assert!(!out.lines.iter().any(|l| l.contains("   - ")));

    // Counters stay put once they reach their targets.
    let out = run(&mut console, "#wait 5000").await;
    assert!(out.lines.is_empty());
}
