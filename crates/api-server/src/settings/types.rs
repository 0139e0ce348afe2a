use serde::{Deserialize, Serialize};

use taskdash_core::{Error, Result};

/// Session timeout choices in minutes; 0 never signs out
pub const SESSION_TIMEOUT_CHOICES: [u32; 5] = [0, 15, 30, 60, 120];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// Flip between light and dark; a system theme resolves to dark
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light | Self::System => Self::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Timezone {
    #[default]
    Utc,
    Est,
    Pst,
    Gmt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    Public,
    #[default]
    Team,
    Managers,
    Private,
}

/// Preferences shown on the settings page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    // Appearance
    pub theme: Theme,
    pub language: Language,
    pub timezone: Timezone,

    // Notifications
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub task_reminders: bool,
    pub project_updates: bool,
    pub weekly_reports: bool,

    // Privacy and security
    pub two_factor_auth: bool,
    pub session_timeout: u32,
    pub data_sharing: bool,
    pub activity_logging: bool,

    // Performance
    pub auto_save: bool,
    pub animations_enabled: bool,
    pub sound_enabled: bool,

    // Profile
    pub show_online_status: bool,
    pub allow_direct_messages: bool,
    pub profile_visibility: ProfileVisibility,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            timezone: Timezone::default(),
            email_notifications: true,
            push_notifications: true,
            task_reminders: true,
            project_updates: true,
            weekly_reports: true,
            two_factor_auth: false,
            session_timeout: 30,
            data_sharing: false,
            activity_logging: true,
            auto_save: true,
            animations_enabled: true,
            sound_enabled: true,
            show_online_status: true,
            allow_direct_messages: true,
            profile_visibility: ProfileVisibility::default(),
        }
    }
}

impl UserSettings {
    pub fn validate(&self) -> Result<()> {
        if !SESSION_TIMEOUT_CHOICES.contains(&self.session_timeout) {
            return Err(Error::InvalidInput(format!(
                "Session timeout must be one of {:?} minutes",
                SESSION_TIMEOUT_CHOICES
            )));
        }
        Ok(())
    }
}
