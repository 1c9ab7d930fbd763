//! The volunteer verification portal.
//!
//! Submitting the form runs a lookup against the static registry wrapped in
//! two fixed delays, "connecting" then "validating". The delays are purely
//! cosmetic and always resolve.

use std::time::Duration;

use tokio::time::Instant;

use crate::registry::{Registry, RegistryEntry, SKILL_CATEGORIES};
use crate::schedule::Schedule;

const CONNECT_DELAY: Duration = Duration::from_millis(1500);
const VALIDATE_DELAY: Duration = Duration::from_millis(2000);

/// Fields on the verification form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationForm {
    pub full_name: String,
    pub mobile: String,
    /// One of the [`SKILL_CATEGORIES`] ids.
    pub skill: &'static str,
    pub id_number: String,
}

impl Default for VerificationForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            mobile: String::new(),
            skill: SKILL_CATEGORIES[0].id,
            id_number: String::new(),
        }
    }
}

impl VerificationForm {
    pub fn new(full_name: impl Into<String>, mobile: impl Into<String>, id_number: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            mobile: mobile.into(),
            id_number: id_number.into(),
            ..Self::default()
        }
    }

    /// Whether every required field has content.
    pub fn is_complete(&self) -> bool {
        [&self.full_name, &self.mobile, &self.id_number]
            .iter()
            .all(|f| !f.trim().is_empty())
    }

    /// Advance the skill selector, wrapping around.
    pub fn cycle_skill(&mut self) {
        let index = SKILL_CATEGORIES
            .iter()
            .position(|s| s.id == self.skill)
            .unwrap_or(0);
        self.skill = SKILL_CATEGORIES[(index + 1) % SKILL_CATEGORIES.len()].id;
    }
}

/// Screen the portal is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStep {
    Form,
    Connecting,
    Validating,
    Verified(RegistryEntry),
    NotFound,
}

impl VerificationStep {
    /// Fill level of the progress bar, in percent.
    pub fn progress_percent(&self) -> u8 {
        match self {
            VerificationStep::Form => 0,
            VerificationStep::Connecting => 50,
            VerificationStep::Validating => 90,
            VerificationStep::Verified(_) | VerificationStep::NotFound => 100,
        }
    }

    /// Status line shown under the spinner.
    pub fn status_message(&self) -> &'static str {
        match self {
            VerificationStep::Form => "",
            VerificationStep::Connecting => "Connecting to Kerala State Database...",
            VerificationStep::Validating => "Validating License & Biometrics...",
            VerificationStep::Verified(_) => "Verified",
            VerificationStep::NotFound => "Verification failed",
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, VerificationStep::Connecting | VerificationStep::Validating)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Validate,
    Conclude,
}

/// State machine behind the verification portal.
#[derive(Debug)]
pub struct VerificationFlow {
    registry: Registry,
    form: VerificationForm,
    step: VerificationStep,
    lookup: Option<RegistryEntry>,
    schedule: Schedule<Step>,
}

impl VerificationFlow {
    pub fn new(registry: Registry) -> Self {
        Self::with_time_scale(registry, 1.0)
    }

    pub fn with_time_scale(registry: Registry, scale: f64) -> Self {
        Self {
            registry,
            form: VerificationForm::default(),
            step: VerificationStep::Form,
            lookup: None,
            schedule: Schedule::with_time_scale(scale),
        }
    }

    pub fn form(&self) -> &VerificationForm {
        &self.form
    }

    /// Mutable access to the form. Edits are only meaningful on the form screen.
    pub fn form_mut(&mut self) -> &mut VerificationForm {
        &mut self.form
    }

    pub fn step(&self) -> &VerificationStep {
        &self.step
    }

    /// Submit the form.
    ///
    /// Inert (returns `false`) unless the form screen is showing and every
    /// required field is filled.
    pub fn submit(&mut self, now: Instant) -> bool {
        if self.step != VerificationStep::Form || !self.form.is_complete() {
            return false;
        }
        self.step = VerificationStep::Connecting;
        self.schedule.after(now, CONNECT_DELAY, Step::Validate);
        tracing::info!(skill = self.form.skill, "verification submitted");
        true
    }

    /// Deliver every timer due at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        while let Some(fired) = self.schedule.pop_due(now) {
            match fired.event {
                Step::Validate => {
                    self.step = VerificationStep::Validating;
                    self.lookup = self
                        .registry
                        .verify(&self.form.full_name, &self.form.id_number)
                        .entry()
                        .cloned();
                    self.schedule.after(fired.at, VALIDATE_DELAY, Step::Conclude);
                }
                Step::Conclude => {
                    self.step = match self.lookup.take() {
                        Some(entry) => {
                            tracing::info!(id = %entry.id, "responder verified");
                            VerificationStep::Verified(entry)
                        }
                        None => {
                            tracing::info!("responder not found in registry");
                            VerificationStep::NotFound
                        }
                    };
                }
            }
        }
    }

    /// Return from the failure screen to the form, keeping what was typed.
    pub fn retry(&mut self) -> bool {
        if self.step == VerificationStep::NotFound {
            self.step = VerificationStep::Form;
            true
        } else {
            false
        }
    }

    /// Dismiss the portal, cancelling any lookup and clearing the form.
    pub fn close(&mut self) {
        self.schedule.cancel_all();
        self.form = VerificationForm::default();
        self.step = VerificationStep::Form;
        self.lookup = None;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_deadline()
    }
}
