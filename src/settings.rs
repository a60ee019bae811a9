use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    charsets::{Category, CodePointRange},
    error::{Error, Result},
    password_generator::GenerationConfig,
};

/// Prefix of the environment variables that override the settings file.
pub const ENV_PREFIX: &str = "STRONGPW";

/// Persistent defaults for the command line, as stored in `settings.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub length: usize,
    pub categories: Vec<String>,
    pub include_all_unicode: bool,
    pub include_emoji: bool,
    pub include_symbols: bool,
    pub include_dingbats: bool,
    pub exclude_ranges: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            length: 32,
            categories: vec!["latin".to_owned(), "numbers".to_owned(), "signs".to_owned()],
            include_all_unicode: false,
            include_emoji: false,
            include_symbols: false,
            include_dingbats: false,
            exclude_ranges: vec![],
        }
    }
}

/// Parses exclusion ranges leniently: anything malformed is logged and skipped.
pub fn parse_ranges<S: AsRef<str>>(ranges: &[S]) -> Vec<CodePointRange> {
    ranges
        .iter()
        .filter_map(|range| match range.as_ref().parse::<CodePointRange>() {
            Ok(r) => Some(r),
            Err(err) => {
                warn!("ignoring exclusion range: {err}");
                None
            }
        })
        .collect()
}

impl Settings {
    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .filter_map(|name| match name.parse::<Category>() {
                Ok(c) => Some(c),
                Err(_) => {
                    warn!("ignoring unknown category '{name}' in settings");
                    None
                }
            })
            .collect()
    }

    pub fn to_generation_config(&self) -> GenerationConfig {
        let mut config = GenerationConfig::new(self.length)
            .with_categories(self.categories())
            .include_all_unicode(self.include_all_unicode)
            .include_emoji(self.include_emoji)
            .include_symbols(self.include_symbols)
            .include_dingbats(self.include_dingbats);
        config.exclude_ranges = parse_ranges(&self.exclude_ranges);
        config
    }
}

impl From<&GenerationConfig> for Settings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            length: config.length,
            categories: config
                .categories
                .iter()
                .map(|c| c.name().to_owned())
                .collect(),
            include_all_unicode: config.include_all_unicode,
            include_emoji: config.include_emoji,
            include_symbols: config.include_symbols,
            include_dingbats: config.include_dingbats,
            exclude_ranges: config.exclude_ranges.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Location of the settings file, `$XDG_CONFIG_HOME/strongpw/settings.toml` or
/// `$HOME/.config/strongpw/settings.toml`.
pub fn xdg_config_file_location(
    home: Option<&Path>,
    xdg_config_home: Option<&Path>,
) -> Result<PathBuf> {
    let config_home = match (xdg_config_home, home) {
        (Some(xdg), _) => xdg.to_path_buf(),
        (None, Some(home)) => home.join(".config"),
        (None, None) => return Err(Error::Generic("no home directory")),
    };

    Ok(config_home.join("strongpw").join("settings.toml"))
}

fn layered_settings(file: &Path, env_prefix: &str) -> Result<Settings> {
    let mut settings = config::Config::default();
    settings.merge(config::File::from(file.to_path_buf()).required(false))?;
    settings.merge(config::Environment::with_prefix(env_prefix))?;

    Ok(settings.try_into::<Settings>()?)
}

/// Reads the settings file and applies environment overrides on top of it. A missing file
/// yields the defaults.
pub fn read_config(
    home: Option<&Path>,
    xdg_config_home: Option<&Path>,
) -> Result<(Settings, PathBuf)> {
    let location = xdg_config_file_location(home, xdg_config_home)?;
    debug!("reading settings from {}", location.display());

    let settings = layered_settings(&location, ENV_PREFIX)?;
    Ok((settings, location))
}

pub fn save_config(settings: &Settings, config_file_location: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(settings)?;

    if let Some(parent) = config_file_location.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_file_location, contents)?;

    Ok(())
}

#[cfg(test)]
#[path = "tests/settings.rs"]
mod settings_tests;
