use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureSettings {
    /// Number of texture units the renderer tracks.
    pub stage_count: usize,
    /// Whether textures loaded through the registry ask for a mipmap chain.
    pub generate_mipmaps: bool,
    /// Reject uploads larger than the driver's maximum texture size instead of
    /// handing them to the driver.
    pub enforce_max_texture_size: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            stage_count: 8,
            generate_mipmaps: true,
            enforce_max_texture_size: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub textures: TextureSettings,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization/Deserialization Error: {0}")]
    Serde(#[from] toml::de::Error),

    #[error("Serialization Error: {0}")]
    SerdeSer(#[from] toml::ser::Error),
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from a specified file path.
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Saves settings to a specified file path, ensuring the directory exists.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let settings = Settings::from_toml_str("[textures]\nstage_count = 4\n").unwrap();
        assert_eq!(settings.textures.stage_count, 4);
        assert!(settings.textures.generate_mipmaps);
        assert!(!settings.textures.enforce_max_texture_size);

        let empty = Settings::from_toml_str("").unwrap();
        assert_eq!(empty, Settings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config").join("textures.toml");

        let mut settings = Settings::default();
        settings.textures.generate_mipmaps = false;
        settings.textures.enforce_max_texture_size = true;
        settings.save_to_file(&path).unwrap();

        assert!(path.exists(), "settings file should be created");
        let loaded = Settings::load_from_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[textures\nstage_count = ").unwrap();

        let result = Settings::load_from_file(&path);
        assert!(matches!(result, Err(SettingsError::Serde(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = Settings::load_from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }
}
