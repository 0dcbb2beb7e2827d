//! Draw-form settings and their on-disk home.
//!
//! The file is optional: missing fields take their defaults, a missing file
//! means all defaults. Writes go through a tmp file and keep one backup.
use crate::catalog::{Catalog, PrizeDef};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Upper bound the form puts on quantity
    #[serde(default = "default_max_quantity", rename = "maxQuantity")]
    pub max_quantity: i64,
    /// Initial state of the "unique prizes" toggle
    #[serde(default = "default_unique")]
    pub unique: bool,
    /// Initial state of the "tiered draw" toggle
    #[serde(default = "default_tiered")]
    pub tiered: bool,
    /// Print a per-prize tally under the result
    #[serde(default = "default_show_summary", rename = "showSummary")]
    pub show_summary: bool,
    /// Replaces the bundled catalog when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prizes: Option<Vec<PrizeDef>>,
}

fn default_max_quantity() -> i64 {
    10
}

fn default_unique() -> bool {
    false
}

fn default_tiered() -> bool {
    true
}

fn default_show_summary() -> bool {
    false
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_quantity: default_max_quantity(),
            unique: default_unique(),
            tiered: default_tiered(),
            show_summary: default_show_summary(),
            prizes: None,
        }
    }
}

impl Settings {
    /// The catalog these settings draw from.
    pub fn catalog(&self) -> Result<Catalog, String> {
        match &self.prizes {
            Some(defs) => Catalog::from_defs(defs.clone())
                .map_err(|e| format!("Invalid prizes in settings: {}", e)),
            None => Ok(Catalog::bundled().clone()),
        }
    }
}

pub fn settings_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("lucky-draw")
}

pub fn settings_path() -> PathBuf {
    settings_dir().join(FILE_NAME)
}

fn backup_path(dir: &Path) -> PathBuf {
    dir.join(format!("{FILE_NAME}.bak"))
}

fn tmp_path(dir: &Path) -> PathBuf {
    dir.join(format!("{FILE_NAME}.tmp"))
}

pub fn atomic_save(settings: &Settings) -> Result<PathBuf, String> {
    save_to(&settings_dir(), settings)
}

pub fn load() -> Result<Settings, String> {
    load_from(&settings_dir())
}

/// Write `settings.json` in `dir`, keeping the previous file as `.bak`.
pub fn save_to(dir: &Path, settings: &Settings) -> Result<PathBuf, String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create settings dir: {}", e))?;

    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize: {}", e))?;

    let tmp = tmp_path(dir);
    let main = dir.join(FILE_NAME);
    let bak = backup_path(dir);

    fs::write(&tmp, &json).map_err(|e| format!("Failed to write tmp: {}", e))?;

    if main.exists() {
        if let Err(e) = fs::copy(&main, &bak) {
            eprintln!("Failed to back up settings to {}: {}", bak.display(), e);
        }
    }

    fs::rename(&tmp, &main).map_err(|e| format!("Failed to rename: {}", e))?;

    Ok(main)
}

pub fn load_from(dir: &Path) -> Result<Settings, String> {
    let main = dir.join(FILE_NAME);
    let bak = backup_path(dir);

    let data = if main.exists() {
        fs::read_to_string(&main).map_err(|e| format!("Failed to read settings: {}", e))?
    } else if bak.exists() {
        eprintln!("Settings file not found, loading backup");
        fs::read_to_string(&bak).map_err(|e| format!("Failed to read backup: {}", e))?
    } else {
        return Ok(Settings::default());
    };

    serde_json::from_str(&data).map_err(|e| format!("Failed to parse settings: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    fn scratch_dir() -> PathBuf {
        let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "lucky-draw-settings-{}-{}",
            std::process::id(),
            n
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = scratch_dir();
        assert_eq!(load_from(&dir).unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), r#"{ "maxQuantity": 40, "unique": true }"#).unwrap();

        let settings = load_from(&dir).unwrap();
        assert_eq!(settings.max_quantity, 40);
        assert!(settings.unique);
        assert!(settings.tiered);
        assert!(!settings.show_summary);
        assert!(settings.prizes.is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_then_load_keeps_backup_of_previous() {
        let dir = scratch_dir();
        let first = Settings::default();
        save_to(&dir, &first).unwrap();

        let second = Settings {
            max_quantity: 3,
            ..Settings::default()
        };
        let path = save_to(&dir, &second).unwrap();
        assert_eq!(path, dir.join(FILE_NAME));
        assert!(!tmp_path(&dir).exists());

        assert_eq!(load_from(&dir).unwrap(), second);

        fs::remove_file(&path).unwrap();
        assert_eq!(load_from(&dir).unwrap(), first, "falls back to the backup");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_backup_does_not_block_the_save() {
        let dir = scratch_dir();
        save_to(&dir, &Settings::default()).unwrap();
        // A directory where the backup file belongs makes the copy fail
        fs::create_dir_all(backup_path(&dir)).unwrap();

        let updated = Settings {
            unique: true,
            ..Settings::default()
        };
        save_to(&dir, &updated).unwrap();
        assert_eq!(load_from(&dir).unwrap(), updated);
        assert!(backup_path(&dir).is_dir());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(FILE_NAME), "{ not json").unwrap();
        let err = load_from(&dir).unwrap_err();
        assert!(err.starts_with("Failed to parse settings"), "{err}");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn custom_prizes_replace_bundled_catalog() {
        let settings = Settings {
            prizes: Some(vec![
                PrizeDef {
                    name: "mug".to_string(),
                    weight: 1.0,
                },
                PrizeDef {
                    name: "tote bag".to_string(),
                    weight: 0.0,
                },
            ]),
            ..Settings::default()
        };
        let catalog = settings.catalog().unwrap();
        assert_eq!(catalog.names(), &["mug", "tote bag"]);

        assert_eq!(&Settings::default().catalog().unwrap(), Catalog::bundled());
    }

    #[test]
    fn invalid_custom_prizes_are_reported() {
        let settings = Settings {
            prizes: Some(vec![]),
            ..Settings::default()
        };
        assert_eq!(
            settings.catalog().unwrap_err(),
            "Invalid prizes in settings: catalog must contain at least one prize"
        );
    }

    #[test]
    fn settings_live_under_lucky_draw_dir() {
        assert!(settings_path().ends_with("lucky-draw/settings.json"));
    }
}
