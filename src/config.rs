use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which remote service performs translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Google,
    OpenAi,
}

impl Backend {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Some(Backend::Google),
            "openai" => Some(Backend::OpenAi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub source_lang: String,
    pub target_lang: String,
    pub timeout_secs: u64,
    pub max_chars: usize,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_endpoint: String,
    pub translation_enabled: bool,
    pub simulate_copy: bool,
    pub show_original: bool,
    pub font_size: f32,
    pub copy_settle_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Google,
            source_lang: "auto".to_string(),
            target_lang: "zh-CN".to_string(),
            timeout_secs: 10,
            max_chars: 3000,
            openai_api_key: String::new(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_endpoint: "https://api.openai.com/v1".to_string(),
            translation_enabled: false,
            simulate_copy: true,
            show_original: false,
            font_size: 26.0,
            copy_settle_ms: 100,
            poll_interval_ms: 15,
        }
    }
}

impl Config {
    pub fn path() -> PathBuf {
        let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
        let dir = exe.parent().unwrap_or(Path::new("."));
        dir.join("config.json")
    }

    /// Load `config.json` next to the executable, then apply env overrides.
    ///
    /// The file is only read; a missing one means defaults.
    pub fn load() -> Self {
        Self::load_with(&Self::path(), |key| std::env::var(key).ok())
    }

    pub fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::load_from(path).with_env_overrides(lookup)
    }

    pub fn load_from(path: &Path) -> Self {
        let cfg = match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str::<Config>(&s).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "invalid config, using defaults"
                );
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        cfg.sanitized()
    }

    /// Apply non-empty overrides from `lookup` (normally the process environment).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(v) = get("OPENAI_API_KEY") {
            self.openai_api_key = v;
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Some(v) = get("TARGET_LANG") {
            self.target_lang = v;
        }
        if let Some(v) = get("CLIPTRANS_BACKEND") {
            match Backend::parse(&v) {
                Some(b) => self.backend = b,
                None => tracing::warn!(value = %v, "ignoring unknown CLIPTRANS_BACKEND"),
            }
        }
        self
    }

    /// Replace out-of-range values with defaults.
    fn sanitized(mut self) -> Self {
        let d = Self::default();
        if !(self.font_size > 0.0) {
            tracing::warn!(font_size = self.font_size, "font_size must be positive, using default");
            self.font_size = d.font_size;
        }
        if self.max_chars == 0 {
            tracing::warn!("max_chars must be positive, using default");
            self.max_chars = d.max_chars;
        }
        if self.timeout_secs == 0 {
            tracing::warn!("timeout_secs must be positive, using default");
            self.timeout_secs = d.timeout_secs;
        }
        if self.poll_interval_ms == 0 {
            tracing::warn!("poll_interval_ms must be positive, using default");
            self.poll_interval_ms = d.poll_interval_ms;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn copy_settle(&self) -> Duration {
        Duration::from_millis(self.copy_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
