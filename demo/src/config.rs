//! Optional `rig.toml` next to the executable's working directory.
//!
//! Every table and key is optional; anything missing keeps its default. A file that fails
//! to parse is reported and ignored.

use std::{fs, io, path::Path};

use bevy::prelude::*;
use camera_rig::{AimSettings, CameraLockSettings, RigSettings};
use serde::Deserialize;

pub const CONFIG_PATH: &str = "rig.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub rig: RigSettings,
    pub lock: CameraLockSettings,
    pub aim: AimSettings,
}

pub fn load() -> DemoConfig {
    load_from(Path::new(CONFIG_PATH))
}

fn load_from(path: &Path) -> DemoConfig {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!("no {} found, using default rig settings", path.display());
            return DemoConfig::default();
        }
        Err(err) => {
            warn!("could not read {}: {err}", path.display());
            return DemoConfig::default();
        }
    };

    match parse(&text) {
        Ok(config) => config,
        Err(err) => {
            warn!("ignoring {}: {err}", path.display());
            DemoConfig::default()
        }
    }
}

fn parse(text: &str) -> Result<DemoConfig, toml::de::Error> {
    toml::from_str(text)
}
