use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persisted frontend settings, merged under the command line.
/// Lives at `~/.config/arnold/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub rom_dir: Option<PathBuf>,
    pub crtc: u8,
    pub stereo: String,
    pub psg: String,
    pub scan_mode: String,
    pub scale: u32,
    pub sound: bool,
    pub tape_sound: bool,
    pub sync_to_video: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "cpc464".into(),
            rom_dir: None,
            crtc: 0,
            stereo: "mono".into(),
            psg: "ay".into(),
            scan_mode: "none".into(),
            scale: 1,
            sound: true,
            tape_sound: true,
            sync_to_video: false,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("arnold").join("config.toml"))
}

/// Load the configuration file; absent or unparsable files fall back to
/// defaults (a warning is printed for the latter).
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(text) => match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: ignoring malformed {}: {e}", path.display());
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

/// Write the configuration back (used by `--save-config`).
pub fn save(config: &Config) -> std::io::Result<()> {
    let Some(path) = config_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(config).expect("config serializes");
    std::fs::write(path, text)
}
