//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the portal and its backend live.
    #[serde(default)]
    pub portal: PortalConfig,

    /// Membership form export defaults.
    #[serde(default)]
    pub export: ExportDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Portal locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Public asset base URL. Takes precedence over `origin` when set.
    pub public_url: Option<String>,

    /// Origin the portal is served from.
    pub origin: String,

    /// Base URL of the REST backend (without the `/api` prefix).
    pub api_base_url: String,
}

/// Default export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Directory exported PDFs are written to.
    pub output_dir: PathBuf,

    /// Template path relative to the public URL or origin.
    pub template_path: String,

    /// Paper format of the generated page.
    pub paper: PaperFormat,

    /// Text size in points.
    pub font_size: f64,

    /// Line advance as a multiple of the font size.
    pub line_height: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "unionportal=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Portrait paper formats, sized in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    #[default]
    A4,
    Letter,
}

impl PaperFormat {
    /// Page width and height in points.
    pub fn size_pt(&self) -> (f64, f64) {
        match self {
            PaperFormat::A4 => (595.28, 841.89),
            PaperFormat::Letter => (612.0, 792.0),
        }
    }
}

impl FromStr for PaperFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PaperFormat::A4),
            "letter" | "us-letter" => Ok(PaperFormat::Letter),
            other => Err(format!("Unknown paper format: {other}. Use: a4, letter")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            portal: PortalConfig::default(),
            export: ExportDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            public_url: None,
            origin: "http://localhost:3000".to_string(),
            api_base_url: "http://localhost:5000".to_string(),
        }
    }
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            template_path: "membership-form-template.png".to_string(),
            paper: PaperFormat::A4,
            font_size: 9.0,
            line_height: 1.15,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl PortalConfig {
    /// Default template location: public URL if configured, else the origin.
    pub fn template_url(&self, template_path: &str) -> String {
        let base = self
            .public_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.origin);
        join_url(base, template_path)
    }

    /// Absolute URL of an API endpoint path such as `/api/auth/login`.
    pub fn api_url(&self, endpoint: &str) -> String {
        join_url(&self.api_base_url, endpoint)
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults,
    /// then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_file();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    fn load_file() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Overlay `UNIONPORTAL_*` variables read through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("UNIONPORTAL_PUBLIC_URL") {
            self.portal.public_url = Some(url);
        }
        if let Some(origin) = lookup("UNIONPORTAL_ORIGIN") {
            self.portal.origin = origin;
        }
        if let Some(api) = lookup("UNIONPORTAL_API_URL") {
            self.portal.api_base_url = api;
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("unionportal").join("config.json")
}
