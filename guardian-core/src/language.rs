//! Display language and its persisted preference.
//!
//! [`LanguageContext`] is created once at startup from a [`KeyValueStore`]
//! and passed to whatever renders text. Changing the language writes the
//! code through to the store so the choice survives a restart.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::fs;

/// Store key holding the language code.
pub const LANGUAGE_KEY: &str = "guardian-net-lang";

/// Errors from the key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store file is not a JSON object: {0}")]
    NotAnObject(PathBuf),
}

/// A string-to-string preference store.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Preferences kept as one JSON object on disk.
///
/// A missing file reads as empty. Writes rewrite the whole object, keeping
/// keys this program does not know about.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject(self.path.clone())),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.load().await?;
        Ok(map.get(key).and_then(Value::as_str).map(str::to_string))
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.load().await?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, content).await?;
        Ok(())
    }
}

/// In-memory store for tests and headless runs without a file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Supported display languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    En,
    Hi,
    Ml,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Ml];

    /// Storage code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Ml => "ml",
        }
    }

    /// Name of the language in itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिन्दी",
            Language::Ml => "മലയാളം",
        }
    }

    pub fn next(&self) -> Language {
        match self {
            Language::En => Language::Hi,
            Language::Hi => Language::Ml,
            Language::Ml => Language::En,
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Hi => &HI,
            Language::Ml => &ML,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language code: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Only the exact storage codes are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Translated interface text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strings {
    pub title_lead: &'static str,
    pub title_emphasis: &'static str,
    pub view_map: &'static str,
    pub volunteer: &'static str,
    pub ksdma: &'static str,
    pub dashboard_title: &'static str,
    pub dashboard_subtitle: &'static str,
    pub active_alerts: &'static str,
    pub network_nodes: &'static str,
    pub active_units: &'static str,
    pub deployment_status: &'static str,
    pub detected: &'static str,
    pub sector: &'static str,
    pub open_interface: &'static str,
    pub exit_interface: &'static str,
    pub mission_accepted: &'static str,
    pub mission_target: &'static str,
    pub mission_distance: &'static str,
    pub mission_victims: &'static str,
    pub briefing_show: &'static str,
    pub briefing_hide: &'static str,
}

static EN: Strings = Strings {
    title_lead: "Mobilizing the",
    title_emphasis: "Western Ghats",
    view_map: "View Live Map",
    volunteer: "Volunteer",
    ksdma: "KSDMA",
    dashboard_title: "KSDMA Control Center",
    dashboard_subtitle: "Real-time state-level disaster management oversight",
    active_alerts: "Active Alerts",
    network_nodes: "Network Nodes",
    active_units: "Active Response Units",
    deployment_status: "Real-time Volunteer Deployment Status",
    detected: "Landslide detected in",
    sector: "sector",
    open_interface: "OPEN VOLUNTEER INTERFACE",
    exit_interface: "EXIT INTERFACE",
    mission_accepted: "Mission Accepted",
    mission_target: "Target Location",
    mission_distance: "Distance to Target",
    mission_victims: "People trapped",
    briefing_show: "View Tactical Briefing",
    briefing_hide: "Hide Tactical Briefing",
};

static HI: Strings = Strings {
    title_lead: "पश्चिमी घाट को",
    title_emphasis: "लामबंद करना",
    view_map: "लाइव मैप देखें",
    volunteer: "स्वयंसेवक",
    ksdma: "KSDMA",
    dashboard_title: "KSDMA नियंत्रण केंद्र",
    dashboard_subtitle: "वास्तविक समय राज्य स्तरीय आपदा प्रबंधन निगरानी",
    active_alerts: "सक्रिय अलर्ट",
    network_nodes: "नेटवर्क नोड्स",
    active_units: "सक्रिय प्रतिक्रिया इकाइयाँ",
    deployment_status: "वास्तविक समय स्वयंसेवक तैनाती स्थिति",
    detected: "भूस्खलन का पता चला",
    sector: "क्षेत्र में",
    open_interface: "स्वयंसेवक इंटरफ़ेस खोलें",
    exit_interface: "इंटरफ़ेस से बाहर निकलें",
    mission_accepted: "मिशन स्वीकार किया गया",
    mission_target: "लक्ष्य स्थान",
    mission_distance: "लक्ष्य से दूरी",
    mission_victims: "लोग फंसे हुए हैं",
    briefing_show: "सामरिक ब्रीफिंग देखें",
    briefing_hide: "सामरिक ब्रीफिंग छिपाएं",
};

static ML: Strings = Strings {
    title_lead: "പശ്ചിമഘട്ടത്തെ",
    title_emphasis: "സജ്ജമാക്കുന്നു",
    view_map: "ലൈവ് മാപ്പ് കാണുക",
    volunteer: "സന്നദ്ധപ്രവർത്തകർ",
    ksdma: "കെ.എസ്.ഡി.എം.എ",
    dashboard_title: "കെ.എസ്.ഡി.എം.എ കൺട്രോൾ സെന്റർ",
    dashboard_subtitle: "തത്സമയ ദുരന്ത നിവാരണ മേൽനോട്ടം",
    active_alerts: "അലേർട്ടുകൾ",
    network_nodes: "നെറ്റ്‌വർക്ക് നോഡുകൾ",
    active_units: "പ്രതികരണ യൂണിറ്റുകൾ",
    deployment_status: "സന്നദ്ധപ്രവർത്തകരുടെ തത്സമയ വിന്യാസ നില",
    detected: "ഉരുൾപൊട്ടൽ കണ്ടെത്തി",
    sector: "മേഖലയിൽ",
    open_interface: "വോളന്റിയർ ഇന്റർഫേസ്",
    exit_interface: "പുറത്തുകടക്കുക",
    mission_accepted: "ദൗത്യം സ്വീകരിച്ചു",
    mission_target: "ലക്ഷ്യസ്ഥാനം",
    mission_distance: "ദൂരം",
    mission_victims: "കുടുങ്ങിക്കിടക്കുന്നവർ",
    briefing_show: "വിവരങ്ങൾ കാണുക",
    briefing_hide: "വിവരങ്ങൾ മറയ്ക്കുക",
};

/// The active language, backed by a store.
#[derive(Debug)]
pub struct LanguageContext<S> {
    language: Language,
    store: S,
}

impl<S: KeyValueStore> LanguageContext<S> {
    /// Read the saved language, falling back to English.
    ///
    /// Unknown codes and unreadable stores both fall back; a broken store
    /// is logged and otherwise ignored.
    pub async fn init(store: S) -> Self {
        let language = match store.get(LANGUAGE_KEY).await {
            Ok(Some(code)) => code.parse::<Language>().unwrap_or_else(|e: UnknownLanguage| {
                tracing::debug!(error = %e, "ignoring saved language");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read language preference");
                Language::default()
            }
        };
        Self { language, store }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch language and persist the choice.
    ///
    /// The in-memory language changes even if the write fails.
    pub async fn set_language(&mut self, language: Language) -> Result<(), StoreError> {
        self.language = language;
        tracing::info!(lang = language.code(), "language changed");
        self.store.set(LANGUAGE_KEY, language.code()).await
    }

    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_codes_only() {
        assert_eq!("hi".parse::<Language>().unwrap(), Language::Hi);
        assert!("HI".parse::<Language>().is_err());
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::Ml.next(), Language::En);
    }

    #[tokio::test]
    async fn test_memory_store_reload() {
        let mut ctx = LanguageContext::init(MemoryStore::new()).await;
        assert_eq!(ctx.language(), Language::En);
        ctx.set_language(Language::Ml).await.unwrap();

        let reloaded = LanguageContext::init(ctx.into_store()).await;
        assert_eq!(reloaded.language(), Language::Ml);
        assert_eq!(reloaded.strings().mission_distance, "ദൂരം");
    }

    #[tokio::test]
    async fn test_invalid_saved_code_falls_back() {
        let mut store = MemoryStore::new();
        store.set(LANGUAGE_KEY, "klingon").await.unwrap();
        let ctx = LanguageContext::init(store).await;
        assert_eq!(ctx.language(), Language::En);
    }

    #[tokio::test]
    async fn test_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(&path, r#"{"theme":"dark"}"#).await.unwrap();

        let mut store = JsonFileStore::new(&path);
        store.set(LANGUAGE_KEY, "hi").await.unwrap();

        let raw: Value = serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw[LANGUAGE_KEY], "hi");
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get(LANGUAGE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, "[1, 2, 3]").await.unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get(LANGUAGE_KEY).await, Err(StoreError::NotAnObject(_))));
        let ctx = LanguageContext::init(store).await;
        assert_eq!(ctx.language(), Language::En);
    }
}
