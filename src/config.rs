use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::cli::CliArgs;
use crate::i18n::Locale;
use crate::model::{Thresholds, ViewKind};

const DEFAULT_REFRESH_MS: u64 = 1_500;
const MIN_REFRESH_MS: u64 = 250;

#[derive(Debug, Clone, Default)]
pub struct RuntimeConfigSnapshot {
    pub source: Option<String>,
    pub locale: Option<Locale>,
    pub snapshot: Option<PathBuf>,
    pub refresh_ms: Option<u64>,
    pub thresholds: Thresholds,
    pub start_view: Option<ViewKind>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfigWatcher {
    path: Option<PathBuf>,
    modified: Option<SystemTime>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct KubeglanceConfigFile {
    #[serde(default)]
    locale: Option<String>,
    #[serde(default, alias = "snapshot_path")]
    snapshot: Option<PathBuf>,
    #[serde(default, alias = "refresh")]
    refresh_ms: Option<u64>,
    #[serde(default)]
    thresholds: Thresholds,
    #[serde(default, alias = "view")]
    start_view: Option<String>,
}

impl RuntimeConfigWatcher {
    pub fn discover() -> Self {
        Self {
            path: discover_config_path(),
            modified: None,
        }
    }

    pub fn load_current(&mut self) -> Result<RuntimeConfigSnapshot> {
        let Some(path) = self.path.clone() else {
            return Ok(RuntimeConfigSnapshot::default());
        };

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read runtime config {}", path.display()))?;
        let snapshot = parse_config(&raw, &path)?;
        self.modified = fs::metadata(&path)
            .ok()
            .and_then(|meta| meta.modified().ok());
        Ok(snapshot)
    }

    pub fn reload_if_changed(&mut self) -> Result<Option<RuntimeConfigSnapshot>> {
        let Some(current_path) = self.path.clone() else {
            self.path = discover_config_path();
            if self.path.is_some() {
                return self.load_current().map(Some);
            }
            return Ok(None);
        };

        if !current_path.exists() {
            self.path = discover_config_path();
            self.modified = None;
            if self.path.is_some() {
                return self.load_current().map(Some);
            }
            return Ok(Some(RuntimeConfigSnapshot::default()));
        }

        let modified = fs::metadata(&current_path)
            .ok()
            .and_then(|meta| meta.modified().ok());
        if modified != self.modified {
            return self.load_current().map(Some);
        }

        Ok(None)
    }
}

fn parse_config(raw: &str, path: &Path) -> Result<RuntimeConfigSnapshot> {
    let parsed: KubeglanceConfigFile = serde_yaml::from_str(raw)
        .with_context(|| format!("failed to parse runtime config {}", path.display()))?;

    let locale = parsed
        .locale
        .as_deref()
        .map(|token| {
            Locale::from_token(token)
                .ok_or_else(|| anyhow!("unknown locale {token:?} in {}", path.display()))
        })
        .transpose()?;
    let start_view = parsed
        .start_view
        .as_deref()
        .map(|token| {
            ViewKind::from_token(token)
                .ok_or_else(|| anyhow!("unknown start_view {token:?} in {}", path.display()))
        })
        .transpose()?;

    Ok(RuntimeConfigSnapshot {
        source: Some(path.display().to_string()),
        locale,
        snapshot: parsed.snapshot,
        refresh_ms: parsed.refresh_ms,
        thresholds: parsed.thresholds,
        start_view,
    })
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub snapshot: PathBuf,
    pub refresh_ms: u64,
    pub locale: Locale,
    pub thresholds: Thresholds,
    pub start_view: ViewKind,
}

impl Settings {
    pub fn resolve(args: &CliArgs, config: &RuntimeConfigSnapshot) -> Result<Self> {
        let snapshot = args
            .snapshot
            .clone()
            .or_else(|| config.snapshot.clone())
            .context("no snapshot file given (use --snapshot or set `snapshot` in the config)")?;
        let locale = match args.locale.as_deref() {
            Some(token) => {
                Locale::from_token(token).ok_or_else(|| anyhow!("unknown locale {token:?}"))?
            }
            None => config.locale.unwrap_or_default(),
        };
        let start_view = match args.view.as_deref() {
            Some(token) => {
                ViewKind::from_token(token).ok_or_else(|| anyhow!("unknown view {token:?}"))?
            }
            None => config.start_view.unwrap_or(ViewKind::Overview),
        };
        let refresh_ms = args
            .refresh_ms
            .or(config.refresh_ms)
            .unwrap_or(DEFAULT_REFRESH_MS)
            .max(MIN_REFRESH_MS);

        Ok(Self {
            snapshot,
            refresh_ms,
            locale,
            thresholds: config.thresholds,
            start_view,
        })
    }
}

/// The part of a reloaded config applied to a running session. A locale
/// pinned by `--locale` is never replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveSettings {
    pub locale: Option<Locale>,
    pub thresholds: Thresholds,
}

impl LiveSettings {
    pub fn resolve(args: &CliArgs, config: &RuntimeConfigSnapshot) -> Self {
        Self {
            locale: config.locale.filter(|_| args.locale.is_none()),
            thresholds: config.thresholds,
        }
    }
}

fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("KUBEGLANCE_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let cwd_candidates = [
        PathBuf::from("kubeglance.yaml"),
        PathBuf::from("kubeglance.yml"),
        PathBuf::from(".kubeglance.yaml"),
    ];
    for candidate in cwd_candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let user_candidates = [
            PathBuf::from(&home).join(".config/kubeglance/config.yaml"),
            PathBuf::from(&home).join(".config/kubeglance/config.yml"),
            PathBuf::from(&home).join(".kubeglance.yaml"),
        ];
        for candidate in user_candidates {
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{LiveSettings, RuntimeConfigSnapshot, Settings, parse_config};
    use crate::cli::CliArgs;
    use crate::i18n::Locale;
    use crate::model::ViewKind;
    use clap::Parser;
    use std::path::{Path, PathBuf};

    #[test]
    fn parses_thresholds_and_aliases() {
        let raw = r#"
locale: zh
snapshot_path: /tmp/cluster.yaml
refresh: 100
view: workloads
thresholds:
  warn_percent: 60
  restart_warning: 3
"#;
        let config = parse_config(raw, Path::new("kubeglance.yaml")).expect("config parses");
        assert_eq!(config.locale, Some(Locale::Zh));
        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/cluster.yaml")));
        assert_eq!(config.start_view, Some(ViewKind::Workloads));
        assert_eq!(config.thresholds.warn_percent, 60);
        assert_eq!(config.thresholds.critical_percent, 90);
        assert_eq!(config.thresholds.restart_warning, 3);
    }

    #[test]
    fn rejects_unknown_locale() {
        let error = parse_config("locale: fr\n", Path::new("kubeglance.yaml"))
            .expect_err("unknown locale must fail");
        assert!(error.to_string().contains("unknown locale"));
    }

    #[test]
    fn cli_flags_override_config() {
        let config = RuntimeConfigSnapshot {
            locale: Some(Locale::Zh),
            snapshot: Some(PathBuf::from("from-config.yaml")),
            refresh_ms: Some(100),
            ..RuntimeConfigSnapshot::default()
        };
        let args = CliArgs::parse_from(["kubeglance", "--locale", "en", "--view", "npu"]);
        let settings = Settings::resolve(&args, &config).expect("settings resolve");
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.snapshot, PathBuf::from("from-config.yaml"));
        assert_eq!(settings.start_view, ViewKind::Npu);
        assert_eq!(settings.refresh_ms, 250);
    }

    #[test]
    fn reload_keeps_locale_pinned_on_the_command_line() {
        let config = parse_config(
            "locale: zh\nthresholds:\n  warn_percent: 50\n",
            Path::new("kubeglance.yaml"),
        )
        .expect("config parses");

        let pinned = CliArgs::parse_from(["kubeglance", "--locale", "en"]);
        let live = LiveSettings::resolve(&pinned, &config);
        assert_eq!(live.locale, None);
        assert_eq!(live.thresholds.warn_percent, 50);

        let unpinned = CliArgs::parse_from(["kubeglance"]);
        assert_eq!(
            LiveSettings::resolve(&unpinned, &config).locale,
            Some(Locale::Zh)
        );
    }

    #[test]
    fn snapshot_path_is_required() {
        let args = CliArgs::parse_from(["kubeglance"]);
        assert!(Settings::resolve(&args, &RuntimeConfigSnapshot::default()).is_err());
    }
}
