//! Line-oriented control of a demo session.
//!
//! This is the scripted counterpart of the terminal UI, meant for automated
//! runs and smoke tests. Input is one command per line:
//! - lines starting with `#` are commands (`#trigger`, `#wait 1500`, ...)
//! - anything else is sent to the assistant, as `#ask` would
//!
//! Every output line starts with a bracketed tag naming the view it came
//! from, e.g. `[MAP]` or `[VERIFY]`.
//!
//! # Example
//!
//! ```ignore
//! use guardian_core::headless::{Command, HeadlessConsole};
//!
//! let mut console = HeadlessConsole::new(session);
//! let output = console.execute("#trigger".parse()?).await;
//! let output = console.execute(Command::Wait(Duration::from_millis(3600))).await;
//! for line in output.lines {
//!     println!("{line}");
//! }
//! ```

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep_until, Instant};

use crate::assets::{strike_zone_index, StrikeZone, STRIKE_ZONES};
use crate::assistant::markup::to_plain_text;
use crate::dashboard::{Region, UnknownRegion};
use crate::language::{KeyValueStore, Language, UnknownLanguage};
use crate::resources::RESOURCE_CATEGORIES;
use crate::session::{GuardianSession, Notice};
use crate::verification::{VerificationForm, VerificationStep};

/// Placeholder mobile number for form submissions made from a script.
const SCRIPTED_MOBILE: &str = "0000000000";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Trigger,
    Reset,
    /// List the strike-team zones, or toggle one by index.
    Zone(Option<usize>),
    Ask(String),
    Verify { id_number: String, full_name: String },
    Volunteer,
    Accept,
    Reject,
    Region(Region),
    /// Show the resource overview, optionally toggling a card by index.
    Resources(Option<usize>),
    Lang(Language),
    Wait(Duration),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command #{0}. Type #help for help.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Region(#[from] UnknownRegion),

    #[error(transparent)]
    Language(#[from] UnknownLanguage),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let Some(body) = line.strip_prefix('#') else {
            return Ok(Command::Ask(line.to_string()));
        };
        let (name, rest) = match body.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (body, ""),
        };

        match name.to_lowercase().as_str() {
            "trigger" => Ok(Command::Trigger),
            "reset" => Ok(Command::Reset),
            "zone" | "zones" if rest.is_empty() => Ok(Command::Zone(None)),
            "zone" | "zones" => strike_zone_index(rest)
                .map(|index| Command::Zone(Some(index)))
                .ok_or(CommandError::Usage("#zone [1-6|zone-N]")),
            "resources" if rest.is_empty() => Ok(Command::Resources(None)),
            "resources" => rest
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=RESOURCE_CATEGORIES.len()).contains(n))
                .map(|n| Command::Resources(Some(n - 1)))
                .ok_or(CommandError::Usage("#resources [1-4]")),
            "ask" if !rest.is_empty() => Ok(Command::Ask(rest.to_string())),
            "ask" => Err(CommandError::Usage("#ask <text>")),
            "verify" => match rest.split_once(char::is_whitespace) {
                Some((id, name)) if !name.trim().is_empty() => Ok(Command::Verify {
                    id_number: id.to_string(),
                    full_name: name.trim().to_string(),
                }),
                _ => Err(CommandError::Usage("#verify <id> <name...>")),
            },
            "volunteer" => Ok(Command::Volunteer),
            "accept" => Ok(Command::Accept),
            "reject" => Ok(Command::Reject),
            "region" if !rest.is_empty() => Ok(Command::Region(rest.parse()?)),
            "region" => Err(CommandError::Usage("#region <name>")),
            "lang" if !rest.is_empty() => Ok(Command::Lang(rest.parse()?)),
            "lang" => Err(CommandError::Usage("#lang <en|hi|ml>")),
            "wait" => rest
                .parse::<u64>()
                .map(|ms| Command::Wait(Duration::from_millis(ms)))
                .map_err(|_| CommandError::Usage("#wait <ms>")),
            "status" => Ok(Command::Status),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(name.to_string())),
        }
    }
}

/// Lines produced by one command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Output {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Whether any line starts with `tag`.
    pub fn has(&self, tag: &str) -> bool {
        self.lines.iter().any(|l| l.starts_with(tag))
    }
}

pub const HELP_LINES: &[&str] = &[
    "[HELP]",
    "  #trigger             - Toggle the landslide scenario",
    "  #reset               - Reset the landslide scenario",
    "  #zone [n]            - List strike-team zones, or select/deselect one",
    "  #ask <text>          - Ask the assistant (plain lines do the same)",
    "  #verify <id> <name>  - Submit the verification form",
    "  #volunteer           - Open the volunteer phone",
    "  #accept              - Accept the offered mission",
    "  #reject              - Reject the mission and close the phone",
    "  #region <name>       - Switch dashboard region",
    "  #resources [n]       - Show resource counts, or expand/collapse card n",
    "  #lang <en|hi|ml>     - Set the display language",
    "  #wait <ms>           - Let timers run",
    "  #status              - Show every view's state",
    "  #help                - Show this help",
    "  #quit                - Exit",
];

/// Render a tick notice as output lines.
pub fn notice_lines(notice: &Notice) -> Vec<String> {
    match notice {
        Notice::Reveal {
            phase,
            network,
            deployed,
            total,
        } => vec![format!(
            "[MAP] {} - {deployed}/{total} assets deployed, network {}",
            phase.label(),
            network.label()
        )],
        Notice::ScanComplete => vec!["[MAP] Terrain scan complete".to_string()],
        Notice::AssistantMessage(text) => {
            let plain = to_plain_text(text);
            let mut lines = vec!["[ASSISTANT]".to_string()];
            lines.extend(plain.lines().map(|l| format!("  {l}")));
            lines
        }
        Notice::Verification(step) => vec![verification_line(step)],
        Notice::Volunteer(phase) => vec![format!("[VOLUNTEER] {}", phase.label())],
        Notice::ResourcesCounted => vec!["[RESOURCES] All counts verified".to_string()],
    }
}

fn zone_line(zone: &StrikeZone) -> String {
    format!("[ZONE] {} - {}: {}", zone.name, zone.area, zone.task)
}

fn verification_line(step: &VerificationStep) -> String {
    match step {
        VerificationStep::Verified(entry) => format!(
            "[VERIFY] Verified: {} ({}) - {}, {}, {}",
            entry.name, entry.id, entry.skill, entry.org, entry.district
        ),
        VerificationStep::NotFound => "[VERIFY] Not found in registry".to_string(),
        VerificationStep::Form => "[VERIFY] Form ready".to_string(),
        busy => format!("[VERIFY] {}", busy.status_message()),
    }
}

/// Executes commands against a session in real (or paused) time.
#[derive(Debug)]
pub struct HeadlessConsole<S> {
    session: GuardianSession<S>,
}

impl<S: KeyValueStore> HeadlessConsole<S> {
    pub fn new(session: GuardianSession<S>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GuardianSession<S> {
        &self.session
    }

    pub fn into_session(self) -> GuardianSession<S> {
        self.session
    }

    /// Lines printed when the console starts.
    pub fn banner(&self) -> Vec<String> {
        let strings = self.session.strings();
        vec![
            "=== GuardianNet Headless Mode ===".to_string(),
            format!("{} {}", strings.title_lead, strings.title_emphasis),
            format!(
                "[LANG] {} ({})",
                self.session.language(),
                self.session.language().native_name()
            ),
            "Type #help for commands.".to_string(),
        ]
    }

    /// Parse and run one input line. Blank lines produce no output.
    pub async fn execute_line(&mut self, line: &str) -> Output {
        if line.trim().is_empty() {
            return Output::default();
        }
        match line.parse::<Command>() {
            Ok(command) => self.execute(command).await,
            Err(e) => {
                let mut out = self.drain();
                out.push(format!("[ERROR] {e}"));
                out
            }
        }
    }

    /// Run one command, first reporting anything that happened since the
    /// previous command.
    pub async fn execute(&mut self, command: Command) -> Output {
        let mut out = self.drain();
        let now = Instant::now();

        match command {
            Command::Trigger => {
                self.session.landslide.toggle(now);
                if self.session.landslide.is_triggered() {
                    out.push("[MAP] Landslide detected in Wayanad. Scanning terrain...");
                } else {
                    out.push("[MAP] Scenario reset");
                }
            }
            Command::Reset => {
                self.session.landslide.reset();
                out.push("[MAP] Scenario reset");
            }
            Command::Zone(index) => self.zone(index, &mut out),
            Command::Ask(text) => {
                self.session.assistant.open(now);
                self.session.assistant.send(&text, now);
                self.run_until(None, |s| !s.assistant.is_typing(), &mut out).await;
            }
            Command::Verify {
                id_number,
                full_name,
            } => self.verify(id_number, full_name, now, &mut out).await,
            Command::Volunteer => {
                self.session.volunteer.open(now);
                out.push(format!("[VOLUNTEER] {}", self.session.volunteer.phase().label()));
            }
            Command::Accept => {
                if self.session.volunteer.accept() {
                    let strings = self.session.strings();
                    let mission = self.session.volunteer.mission();
                    out.push(format!("[VOLUNTEER] {}", strings.mission_accepted));
                    out.push(format!("[VOLUNTEER] {}: {}", strings.mission_target, mission.location));
                    out.push(format!("[VOLUNTEER] {}: {}", strings.mission_distance, mission.distance));
                } else {
                    out.push("[ERROR] No mission is on offer");
                }
            }
            Command::Reject => {
                self.session.volunteer.reject();
                out.push("[VOLUNTEER] Mission rejected, phone closed");
            }
            Command::Region(region) => {
                self.session.dashboard.select_region(region);
                self.dashboard_lines(&mut out);
            }
            Command::Resources(index) => {
                if !self.session.resources.is_open() {
                    self.session.resources.open(now);
                    self.run_until(None, |s| !s.resources.is_counting(), &mut out).await;
                }
                if let Some(index) = index {
                    self.session.resources.toggle_expanded(index);
                }
                self.resource_lines(&mut out);
            }
            Command::Lang(language) => {
                let result = self.session.set_language(language).await;
                out.push(format!("[LANG] {} ({})", language, language.native_name()));
                if let Err(e) = result {
                    out.push(format!("[ERROR] Could not save language: {e}"));
                }
            }
            Command::Wait(duration) => {
                self.run_until(Some(now + duration), |_| false, &mut out).await;
            }
            Command::Status => self.status_lines(&mut out),
            Command::Help => out.lines.extend(HELP_LINES.iter().map(|l| l.to_string())),
            Command::Quit => {
                self.session.shutdown();
                out.push("Goodbye!");
                out.quit = true;
            }
        }
        out
    }

    fn zone(&mut self, index: Option<usize>, out: &mut Output) {
        let sim = &mut self.session.landslide;
        if !sim.is_triggered() {
            out.push("[ERROR] Zones are available once the landslide is triggered");
            return;
        }
        let Some(index) = index else {
            let selected = sim.selected_zone().map(|z| z.id);
            for zone in STRIKE_ZONES {
                let marker = if selected == Some(zone.id) { " *" } else { "" };
                out.push(format!("{}{marker}", zone_line(zone)));
            }
            return;
        };
        sim.toggle_zone(index);
        match sim.selected_zone() {
            Some(zone) => {
                out.push(zone_line(zone));
                out.push(format!("[ZONE]   PROTOCOL: {}", zone.protocol));
                out.push(format!("[ZONE]   Gear: {}", zone.gear));
            }
            None => out.push(format!("[ZONE] {} deselected", STRIKE_ZONES[index].name)),
        }
    }

    async fn verify(&mut self, id_number: String, full_name: String, now: Instant, out: &mut Output) {
        let flow = &mut self.session.verification;
        if flow.step().is_busy() {
            out.push("[ERROR] A verification is already in progress");
            return;
        }
        if !flow.retry() && *flow.step() != VerificationStep::Form {
            flow.close();
        }
        let skill = flow.form().skill;
        *flow.form_mut() = VerificationForm {
            skill,
            ..VerificationForm::new(full_name, SCRIPTED_MOBILE, id_number)
        };
        if !flow.submit(now) {
            out.push("[ERROR] Form is incomplete");
            return;
        }
        out.push(format!("[VERIFY] {}", flow.step().status_message()));
        self.run_until(None, |s| !s.verification.step().is_busy(), out).await;
    }

    /// Collect notices for time that passed while waiting for input.
    fn drain(&mut self) -> Output {
        let mut out = Output::default();
        for notice in self.session.tick(Instant::now()) {
            out.lines.extend(notice_lines(&notice));
        }
        out
    }

    /// Sleep from timer to timer until `done` holds or `deadline` passes.
    ///
    /// Without a deadline this also stops once nothing is scheduled.
    async fn run_until(
        &mut self,
        deadline: Option<Instant>,
        done: impl Fn(&GuardianSession<S>) -> bool,
        out: &mut Output,
    ) {
        loop {
            let now = Instant::now();
            for notice in self.session.tick(now) {
                out.lines.extend(notice_lines(&notice));
            }
            if done(&self.session) || deadline.is_some_and(|d| now >= d) {
                return;
            }
            let wake = match (self.session.next_deadline(), deadline) {
                (Some(next), Some(limit)) => next.min(limit),
                (Some(next), None) => next,
                (None, Some(limit)) => limit,
                (None, None) => return,
            };
            sleep_until(wake).await;
        }
    }

    fn dashboard_lines(&self, out: &mut Output) {
        let strings = self.session.strings();
        let view = self.session.dashboard.view();
        out.push(format!("[DASHBOARD] {} - {}", strings.dashboard_title, view.region));
        for (metric, value) in view.bundle.metrics.iter().zip(view.live_values.iter()) {
            let flag = if metric.critical { " !" } else { "" };
            out.push(format!("[DASHBOARD]   {}: {:.1} {}{flag}", metric.label, value, metric.unit));
        }
        for node in &view.bundle.risk_nodes {
            out.push(format!(
                "[DASHBOARD]   {} [{}] pop {}",
                node.name,
                node.level.label(),
                node.population
            ));
        }
        out.push(format!("[DASHBOARD] {}:", strings.active_alerts));
        for alert in &view.bundle.alerts {
            out.push(format!("[DASHBOARD]   ({:?}) {} - {}", alert.kind, alert.message, alert.time));
        }
    }

    fn resource_lines(&self, out: &mut Output) {
        let overview = &self.session.resources;
        for (index, category) in RESOURCE_CATEGORIES.iter().enumerate() {
            out.push(format!(
                "[RESOURCES] {}. {}: {} {} (verified)",
                index + 1,
                category.title,
                overview.count(index),
                category.unit
            ));
            if overview.expanded() == Some(index) {
                for detail in category.details {
                    out.push(format!("[RESOURCES]   - {detail}"));
                }
            }
        }
    }

    fn status_lines(&self, out: &mut Output) {
        let s = &self.session;
        out.push(format!(
            "[MAP] {} | network {} | deployed {}/{} | scan {}%",
            s.landslide.phase().label(),
            s.landslide.network().label(),
            s.landslide.deployed_count(),
            s.landslide.total_assets(),
            s.landslide.scan_progress()
        ));
        if let Some(zone) = s.landslide.selected_zone() {
            out.push(zone_line(zone));
        }
        out.push(format!(
            "[ASSISTANT] {} | {} messages{}",
            if s.assistant.is_open() { "open" } else { "closed" },
            s.assistant.turns().len(),
            if s.assistant.is_typing() { " | typing" } else { "" }
        ));
        out.push(verification_line(s.verification.step()));
        if s.volunteer.is_open() {
            out.push(format!(
                "[VOLUNTEER] {} | battery {}%",
                s.volunteer.phase().label(),
                s.volunteer.battery()
            ));
        } else {
            out.push("[VOLUNTEER] closed");
        }
        out.push(format!("[DASHBOARD] region {}", s.dashboard.region()));
        if s.resources.is_open() {
            out.push(format!(
                "[RESOURCES] open{}",
                if s.resources.is_counting() { " | counting" } else { "" }
            ));
        } else {
            out.push("[RESOURCES] closed");
        }
        out.push(format!("[LANG] {} ({})", s.language(), s.language().native_name()));
    }
}
