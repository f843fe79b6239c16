// ABOUTME: Persistent settings for the cardpost application
// ABOUTME: Holds profile fields, theme registry and font choices, with JSON and in-memory stores

use crate::errors::{CardError, Result};
use crate::style::background::{Background, MAX_BACKGROUND_SCALE, MIN_BACKGROUND_SCALE};
use crate::style::sheet::Theme;
use crate::style::template::{DEFAULT_TEMPLATE_ID, DEFAULT_TIME_FORMAT, FieldId, Profile, Template};
use crate::style::themes::{DEFAULT_THEME_ID, builtin_themes};
use crate::style::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 30;

pub(crate) const DEFAULT_USER_NAME: &str = "Night Owl";
const DEFAULT_USER_ID: &str = "@nightowl";
const DEFAULT_FOOTER_LEFT: &str = "Light sets out after midnight";
const DEFAULT_FOOTER_RIGHT: &str = "Follow for more notes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub template_id: String,
    pub theme_id: String,
    pub font_family: String,
    pub font_size: u32,
    pub user_avatar: String,
    pub user_name: String,
    pub user_id: String,
    pub show_time: bool,
    pub time_format: String,
    pub footer_left_text: String,
    pub footer_right_text: String,
    pub themes: Vec<Theme>,
    pub custom_themes: Vec<Theme>,
    pub background: Background,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            theme_id: DEFAULT_THEME_ID.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            user_avatar: String::new(),
            user_name: DEFAULT_USER_NAME.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            show_time: true,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            footer_left_text: DEFAULT_FOOTER_LEFT.to_string(),
            footer_right_text: DEFAULT_FOOTER_RIGHT.to_string(),
            themes: builtin_themes(),
            custom_themes: Vec::new(),
            background: Background::default(),
        }
    }
}

/// A settings field a user can change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    Profile(FieldId),
    Theme,
    Template,
    FontFamily,
    FontSize,
    ShowTime,
    TimeFormat,
    Background,
    BackgroundScale,
    BackgroundPosition,
}

impl std::str::FromStr for SettingField {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(field) = FieldId::parse(s) {
            return Ok(SettingField::Profile(field));
        }
        match s {
            "theme" => Ok(SettingField::Theme),
            "template" => Ok(SettingField::Template),
            "font-family" => Ok(SettingField::FontFamily),
            "font-size" => Ok(SettingField::FontSize),
            "show-time" => Ok(SettingField::ShowTime),
            "time-format" => Ok(SettingField::TimeFormat),
            "background" => Ok(SettingField::Background),
            "background-scale" => Ok(SettingField::BackgroundScale),
            "background-position" => Ok(SettingField::BackgroundPosition),
            other => Err(CardError::ValidationError(format!(
                "Unknown settings field: {}",
                other
            ))),
        }
    }
}

/// A single user edit, the only way interactive changes reach the settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditField {
    pub field: SettingField,
    pub value: String,
}

impl EditField {
    pub fn new(field: SettingField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

fn or_default(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

impl Settings {
    /// Header and footer values for the template layer
    pub fn profile(&self) -> Profile {
        Profile {
            user_avatar: self.user_avatar.clone(),
            user_name: self.user_name.clone(),
            user_id: self.user_id.clone(),
            show_time: self.show_time,
            time_format: self.time_format.clone(),
            footer_left_text: self.footer_left_text.clone(),
            footer_right_text: self.footer_right_text.clone(),
        }
    }

    /// Install the preset themes when none are stored
    pub fn ensure_presets(&mut self) {
        if self.themes.is_empty() {
            debug!("No stored themes, installing presets");
            self.themes = builtin_themes();
        }
    }

    /// Presets first, then custom themes
    pub fn all_themes(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter().chain(self.custom_themes.iter())
    }

    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.all_themes().find(|t| t.id == id)
    }

    pub fn add_custom_theme(&mut self, mut theme: Theme) -> Result<()> {
        if self.theme(&theme.id).is_some() {
            return Err(CardError::ValidationError(format!(
                "A theme with id '{}' already exists",
                theme.id
            )));
        }
        theme.is_preset = false;
        info!("Adding custom theme '{}'", theme.id);
        self.custom_themes.push(theme);
        Ok(())
    }

    pub fn update_theme(&mut self, mut theme: Theme) -> Result<()> {
        let Some(existing) = self.custom_themes.iter_mut().find(|t| t.id == theme.id) else {
            return Err(CardError::ValidationError(format!(
                "Only custom themes can be updated: '{}'",
                theme.id
            )));
        };
        theme.is_preset = false;
        *existing = theme;
        Ok(())
    }

    pub fn remove_theme(&mut self, id: &str) -> Result<()> {
        let Some(pos) = self.custom_themes.iter().position(|t| t.id == id) else {
            return Err(CardError::ValidationError(format!(
                "Only custom themes can be removed: '{}'",
                id
            )));
        };
        self.custom_themes.remove(pos);
        if self.theme_id == id {
            warn!("Removed active theme '{}', switching to default", id);
            self.theme_id = DEFAULT_THEME_ID.to_string();
        }
        Ok(())
    }

    /// Apply one edit. Empty values restore the field's default.
    pub fn apply_edit(&mut self, edit: &EditField) -> Result<()> {
        let defaults = Settings::default();
        let value = edit.value.as_str();
        debug!("Applying edit {:?} = {:?}", edit.field, value);

        match edit.field {
            SettingField::Profile(FieldId::UserAvatar) => {
                self.user_avatar = or_default(value, &defaults.user_avatar)
            }
            SettingField::Profile(FieldId::UserName) => {
                self.user_name = or_default(value, &defaults.user_name)
            }
            SettingField::Profile(FieldId::UserId) => {
                self.user_id = or_default(value, &defaults.user_id)
            }
            SettingField::Profile(FieldId::FooterLeft) => {
                self.footer_left_text = or_default(value, &defaults.footer_left_text)
            }
            SettingField::Profile(FieldId::FooterRight) => {
                self.footer_right_text = or_default(value, &defaults.footer_right_text)
            }
            SettingField::Theme => {
                let id = or_default(value, DEFAULT_THEME_ID);
                if self.theme(&id).is_none() {
                    return Err(CardError::ValidationError(format!("Unknown theme: {}", id)));
                }
                self.theme_id = id;
            }
            SettingField::Template => {
                let id = or_default(value, DEFAULT_TEMPLATE_ID);
                if Template::by_id(&id).is_none() {
                    return Err(CardError::ValidationError(format!(
                        "Unknown template: {}",
                        id
                    )));
                }
                self.template_id = id;
            }
            SettingField::FontFamily => {
                self.font_family = or_default(value, &defaults.font_family)
            }
            SettingField::FontSize => {
                self.font_size = if value.trim().is_empty() {
                    defaults.font_size
                } else {
                    value
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| {
                            CardError::ValidationError(format!("Invalid font size: {}", value))
                        })?
                        .clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
                };
            }
            SettingField::ShowTime => {
                self.show_time = match value.trim().to_ascii_lowercase().as_str() {
                    "" => defaults.show_time,
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => {
                        return Err(CardError::ValidationError(format!(
                            "Expected true or false, got: {}",
                            other
                        )));
                    }
                };
            }
            SettingField::TimeFormat => {
                self.time_format = or_default(value, &defaults.time_format)
            }
            SettingField::Background => {
                if value.trim().is_empty() {
                    self.background = Background::default();
                } else {
                    self.background.image_url = value.trim().to_string();
                }
            }
            SettingField::BackgroundScale => {
                self.background.scale = if value.trim().is_empty() {
                    defaults.background.scale
                } else {
                    match value.trim().trim_end_matches('%').parse::<u32>() {
                        Ok(scale) if (MIN_BACKGROUND_SCALE..=MAX_BACKGROUND_SCALE).contains(&scale) => {
                            scale
                        }
                        _ => {
                            return Err(CardError::ValidationError(format!(
                                "Background scale must be a percentage from {} to {}, got: {}",
                                MIN_BACKGROUND_SCALE, MAX_BACKGROUND_SCALE, value
                            )));
                        }
                    }
                };
            }
            SettingField::BackgroundPosition => {
                let (x, y) = if value.trim().is_empty() {
                    (defaults.background.x, defaults.background.y)
                } else {
                    Background::parse_position(value).ok_or_else(|| {
                        CardError::ValidationError(format!(
                            "Background position must be x,y in pixels, got: {}",
                            value
                        ))
                    })?
                };
                self.background.x = x;
                self.background.y = y;
            }
        }
        Ok(())
    }
}

/// Where settings live between runs
pub trait SettingsStore {
    fn load(&self) -> Result<Settings>;
    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings persisted as a JSON file
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            info!("No settings file at {:?}, using defaults", self.path);
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let mut settings: Settings = serde_json::from_str(&content).map_err(|e| {
            CardError::ConfigError(format!("Settings file {:?} is not valid: {}", self.path, e))
        })?;
        let clamped = settings.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        if clamped != settings.font_size {
            warn!(
                "Stored font size {} is outside {}-{}, using {}",
                settings.font_size, MIN_FONT_SIZE, MAX_FONT_SIZE, clamped
            );
            settings.font_size = clamped;
        }
        settings.ensure_presets();
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// Settings kept in memory, for tests and one-shot runs
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Option<Settings>>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(Some(settings)),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings> {
        Ok(self.settings.lock().clone().unwrap_or_default())
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.lock() = Some(settings.clone());
        Ok(())
    }
}
