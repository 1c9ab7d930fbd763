//! Regional control-centre dashboard.
//!
//! Each region maps to a fixed bundle of metrics, risk nodes, and alerts.
//! Switching region is a lookup that replaces the whole bundle, and the
//! live metric readings are re-seeded from the new bundle in the same step,
//! so a render never mixes two regions.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

use crate::assets::RiskLevel;
use crate::schedule::Schedule;

const METRIC_JITTER_PERIOD: Duration = Duration::from_secs(3);
const METRIC_JITTER_SPAN: f64 = 4.0;
const CHART_PERIOD: Duration = Duration::from_secs(2);
const CLOCK_PERIOD: Duration = Duration::from_secs(1);

const CHART_SEED: [u8; 12] = [40, 60, 45, 90, 100, 80, 50, 30, 40, 60, 75, 85];
const CHART_MIN: u8 = 40;
const CHART_MAX_EXCLUSIVE: u8 = 100;

/// A district with dashboard data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Region {
    #[default]
    Wayanad,
    Idukki,
    Pathanamthitta,
    Alappuzha,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Wayanad,
        Region::Idukki,
        Region::Pathanamthitta,
        Region::Alappuzha,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Region::Wayanad => "wayanad",
            Region::Idukki => "idukki",
            Region::Pathanamthitta => "pathanamthitta",
            Region::Alappuzha => "alappuzha",
        }
    }

    /// The static bundle for this region.
    pub fn bundle(&self) -> &'static RegionBundle {
        match self {
            Region::Wayanad => &WAYANAD,
            Region::Idukki => &IDUKKI,
            Region::Pathanamthitta => &PATHANAMTHITTA,
            Region::Alappuzha => &ALAPPUZHA,
        }
    }

    /// The next region in display order, wrapping.
    pub fn next(&self) -> Region {
        let i = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bundle().name)
    }
}

/// Error for an unrecognised region name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown region: {0}")]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.key() == key)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub max: f64,
    pub trend: Trend,
    pub critical: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskNode {
    pub name: &'static str,
    pub level: RiskLevel,
    pub lat: f64,
    pub lng: f64,
    pub population: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: &'static str,
    pub time: &'static str,
}

/// Everything the dashboard shows for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBundle {
    pub name: &'static str,
    pub metrics: [Metric; 4],
    pub risk_nodes: [RiskNode; 4],
    pub alerts: [Alert; 3],
}

const fn metric(
    label: &'static str,
    value: f64,
    unit: &'static str,
    max: f64,
    trend: Trend,
    critical: bool,
) -> Metric {
    Metric {
        label,
        value,
        unit,
        max,
        trend,
        critical,
    }
}

const fn node(name: &'static str, level: RiskLevel, lat: f64, lng: f64, population: u32) -> RiskNode {
    RiskNode {
        name,
        level,
        lat,
        lng,
        population,
    }
}

const fn alert(kind: AlertKind, message: &'static str, time: &'static str) -> Alert {
    Alert {
        kind,
        message,
        time,
    }
}

static WAYANAD: RegionBundle = RegionBundle {
    name: "Wayanad",
    metrics: [
        metric("Rainfall (24h)", 187.0, "mm", 250.0, Trend::Up, true),
        metric("Soil Moisture", 94.0, "%", 100.0, Trend::Up, true),
        metric("Wind Speed", 45.0, "km/h", 100.0, Trend::Stable, false),
        metric("Temperature", 22.0, "°C", 40.0, Trend::Down, false),
    ],
    risk_nodes: [
        node("Meppadi", RiskLevel::Critical, 11.68, 76.13, 12500),
        node("Chooralmala", RiskLevel::High, 11.67, 76.14, 8200),
        node("Mundakkai", RiskLevel::Moderate, 11.69, 76.12, 5600),
        node("Kalpetta", RiskLevel::Low, 11.61, 76.08, 28900),
    ],
    alerts: [
        alert(AlertKind::Critical, "Landslide warning active for Meppadi sector", "2 min ago"),
        alert(AlertKind::Warning, "Soil saturation exceeding 90% threshold", "5 min ago"),
        alert(AlertKind::Info, "Ham radio network activated - Channel VU2KER", "12 min ago"),
    ],
};

static IDUKKI: RegionBundle = RegionBundle {
    name: "Idukki",
    metrics: [
        metric("Dam Level", 2392.0, "ft", 2403.0, Trend::Up, true),
        metric("Inflow Rate", 12400.0, "cusecs", 20000.0, Trend::Up, true),
        metric("Wind Speed", 52.0, "km/h", 100.0, Trend::Up, false),
        metric("Temperature", 18.0, "°C", 40.0, Trend::Down, false),
    ],
    risk_nodes: [
        node("Idukki Arch Dam", RiskLevel::High, 9.84, 76.97, 500),
        node("Cheruthoni", RiskLevel::Critical, 9.85, 76.96, 15400),
        node("Mullaperiyar", RiskLevel::Critical, 9.53, 77.14, 2000),
        node("Painavu", RiskLevel::Moderate, 9.84, 76.94, 12000),
    ],
    alerts: [
        alert(AlertKind::Critical, "Blue alert issued for Idukki Reservoir", "1 min ago"),
        alert(AlertKind::Warning, "Cheruthoni shutters likely to open in 6 hours", "15 min ago"),
        alert(AlertKind::Info, "Evacuation protocol initiated for low-lying areas", "20 min ago"),
    ],
};

static PATHANAMTHITTA: RegionBundle = RegionBundle {
    name: "Pathanamthitta",
    metrics: [
        metric("Pamba Level", 8.4, "m", 10.0, Trend::Up, true),
        metric("Rainfall (24h)", 142.0, "mm", 250.0, Trend::Up, false),
        metric("Wind Speed", 28.0, "km/h", 100.0, Trend::Stable, false),
        metric("Humidity", 98.0, "%", 100.0, Trend::Up, true),
    ],
    risk_nodes: [
        node("Pampa Triveni", RiskLevel::Critical, 9.41, 77.07, 5000),
        node("Ranni Town", RiskLevel::High, 9.38, 76.78, 24000),
        node("Kozhencherry", RiskLevel::Moderate, 9.34, 76.71, 18000),
        node("Pandalam", RiskLevel::Low, 9.23, 76.67, 42000),
    ],
    alerts: [
        alert(AlertKind::Critical, "Flood warning for Pamba river basin", "4 min ago"),
        alert(AlertKind::Warning, "Sabarimala pilgrims advised to stay at base camps", "10 min ago"),
        alert(AlertKind::Info, "NDRF team positioned at Chengannur", "45 min ago"),
    ],
};

static ALAPPUZHA: RegionBundle = RegionBundle {
    name: "Alappuzha",
    metrics: [
        metric("Water Level", 1.2, "m MSL", 2.5, Trend::Up, true),
        metric("Sea State", 4.0, "rough", 5.0, Trend::Up, true),
        metric("Wind Speed", 58.0, "km/h", 100.0, Trend::Up, true),
        metric("Temperature", 27.0, "°C", 40.0, Trend::Stable, false),
    ],
    risk_nodes: [
        node("Kuttanad", RiskLevel::Critical, 9.44, 76.43, 185000),
        node("Thottappally", RiskLevel::High, 9.31, 76.38, 12000),
        node("Alappuzha Beach", RiskLevel::High, 9.49, 76.32, 65000),
        node("Chengannur", RiskLevel::Moderate, 9.32, 76.61, 35000),
    ],
    alerts: [
        alert(AlertKind::Critical, "Sea erosion warning for coastal belt", "just now"),
        alert(AlertKind::Warning, "Kuttanad water logging risk high", "8 min ago"),
        alert(AlertKind::Info, "Fishermen advised not to venture into sea", "1 hour ago"),
    ],
};

/// A consistent snapshot for rendering: one bundle and its live readings.
#[derive(Debug, Clone, Copy)]
pub struct RegionView<'a> {
    pub region: Region,
    pub bundle: &'static RegionBundle,
    pub live_values: &'a [f64; 4],
    pub selected_node: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    JitterMetrics,
    ChartSample,
    Clock,
}

/// Dashboard state and its background tickers.
#[derive(Debug)]
pub struct Dashboard {
    region: Region,
    live_values: [f64; 4],
    selected_node: Option<&'static str>,
    chart: VecDeque<u8>,
    clock: String,
    running: bool,
    schedule: Schedule<Step>,
    rng: StdRng,
}

fn seed_values(bundle: &RegionBundle) -> [f64; 4] {
    [
        bundle.metrics[0].value,
        bundle.metrics[1].value,
        bundle.metrics[2].value,
        bundle.metrics[3].value,
    ]
}

impl Dashboard {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), 1.0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), 1.0)
    }

    pub fn with_rng(rng: StdRng, time_scale: f64) -> Self {
        let region = Region::default();
        Self {
            region,
            live_values: seed_values(region.bundle()),
            selected_node: None,
            chart: CHART_SEED.into_iter().collect(),
            clock: String::from("--:--:--"),
            running: false,
            schedule: Schedule::with_time_scale(time_scale),
            rng,
        }
    }

    /// Start the live tickers.
    pub fn open(&mut self, now: Instant) {
        if self.running {
            return;
        }
        self.running = true;
        self.refresh_clock();
        self.schedule.every(now, METRIC_JITTER_PERIOD, Step::JitterMetrics);
        self.schedule.every(now, CHART_PERIOD, Step::ChartSample);
        self.schedule.every(now, CLOCK_PERIOD, Step::Clock);
    }

    /// Stop every ticker.
    pub fn close(&mut self) {
        self.schedule.cancel_all();
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Switch region, replacing bundle and live readings together.
    pub fn select_region(&mut self, region: Region) {
        if region == self.region {
            return;
        }
        self.region = region;
        self.live_values = seed_values(region.bundle());
        self.selected_node = None;
        tracing::debug!(region = region.key(), "dashboard region switched");
    }

    pub fn cycle_region(&mut self) {
        self.select_region(self.region.next());
    }

    /// Select a risk node, or deselect it if it is already selected.
    ///
    /// Names not in the current region are ignored.
    pub fn toggle_node(&mut self, name: &str) {
        let Some(node) = self
            .region
            .bundle()
            .risk_nodes
            .iter()
            .find(|n| n.name == name)
        else {
            return;
        };
        self.selected_node = if self.selected_node == Some(node.name) {
            None
        } else {
            Some(node.name)
        };
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn view(&self) -> RegionView<'_> {
        RegionView {
            region: self.region,
            bundle: self.region.bundle(),
            live_values: &self.live_values,
            selected_node: self.selected_node,
        }
    }

    pub fn chart(&self) -> &VecDeque<u8> {
        &self.chart
    }

    pub fn clock(&self) -> &str {
        &self.clock
    }

    fn refresh_clock(&mut self) {
        self.clock = chrono::Local::now().format("%H:%M:%S").to_string();
    }

    /// Deliver every ticker due at or before `now`.
    pub fn tick(&mut self, now: Instant) {
        while let Some(fired) = self.schedule.pop_due(now) {
            match fired.event {
                Step::JitterMetrics => {
                    let bundle = self.region.bundle();
                    for (value, metric) in self.live_values.iter_mut().zip(bundle.metrics.iter()) {
                        let change = (self.rng.gen::<f64>() - 0.5) * METRIC_JITTER_SPAN;
                        *value = (*value + change).clamp(0.0, metric.max);
                    }
                }
                Step::ChartSample => {
                    self.chart.pop_front();
                    self.chart
                        .push_back(self.rng.gen_range(CHART_MIN..CHART_MAX_EXCLUSIVE));
                }
                Step::Clock => self.refresh_clock(),
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.schedule.next_deadline()
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parse() {
        assert_eq!("Idukki".parse::<Region>().unwrap(), Region::Idukki);
        assert_eq!(" ALAPPUZHA ".parse::<Region>().unwrap(), Region::Alappuzha);
        assert!("Kochi".parse::<Region>().is_err());
        assert_eq!(Region::Alappuzha.next(), Region::Wayanad);
    }

    #[test]
    fn test_region_switch_is_atomic() {
        let mut d = Dashboard::with_seed(5);
        let t0 = Instant::now();
        d.open(t0);
        d.tick(t0 + Duration::from_secs(30));
        d.toggle_node("Meppadi");

        d.select_region(Region::Idukki);
        let view = d.view();
        assert_eq!(view.bundle.name, "Idukki");
        assert_eq!(view.bundle.risk_nodes[0].name, "Idukki Arch Dam");
        assert_eq!(view.bundle.alerts[0].message, "Blue alert issued for Idukki Reservoir");
        // Live values come from the new bundle, untouched by earlier jitter.
        for (value, metric) in view.live_values.iter().zip(view.bundle.metrics.iter()) {
            assert_eq!(*value, metric.value);
        }
        assert_eq!(view.selected_node, None);
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        let mut d = Dashboard::with_seed(11);
        d.select_region(Region::Alappuzha);
        let t0 = Instant::now();
        d.open(t0);
        d.tick(t0 + Duration::from_secs(3 * 500));
        let view = d.view();
        for (value, metric) in view.live_values.iter().zip(view.bundle.metrics.iter()) {
            assert!(*value >= 0.0 && *value <= metric.max, "{} = {}", metric.label, value);
        }
    }

    #[test]
    fn test_chart_rolls() {
        let mut d = Dashboard::with_seed(2);
        let t0 = Instant::now();
        d.open(t0);
        d.tick(t0 + Duration::from_secs(20));
        assert_eq!(d.chart().len(), 12);
        assert!(d.chart().iter().all(|v| (40..100).contains(v) || CHART_SEED.contains(v)));
    }

    #[test]
    fn test_close_stops_tickers() {
        let mut d = Dashboard::with_seed(3);
        let t0 = Instant::now();
        d.open(t0);
        d.close();
        let before = *d.view().live_values;
        d.tick(t0 + Duration::from_secs(60));
        assert_eq!(*d.view().live_values, before);
        assert!(d.next_deadline().is_none());
    }

    #[test]
    fn test_toggle_node() {
        let mut d = Dashboard::with_seed(1);
        d.toggle_node("Chooralmala");
        assert_eq!(d.view().selected_node, Some("Chooralmala"));
        d.toggle_node("Chooralmala");
        assert_eq!(d.view().selected_node, None);
        d.toggle_node("Kuttanad");
        assert_eq!(d.view().selected_node, None);
    }
}
