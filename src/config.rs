use std::fs;

use iced::Theme;
use serde::{Deserialize, Serialize};

use crate::api::UserProfile;

pub const CONFIG_FILE: &str = "config.json";
pub const SESSION_FILE: &str = "session.json";
pub const DEFAULT_AVATAR: &str = "default_avatar.jpg";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub theme_name: String,
    pub api_base_url: Option<String>,
}

/// Токен и снимок профиля между запусками.
/// Клиент подхватывает токен отсюда при старте.
#[derive(Serialize, Deserialize, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

pub fn load_config() -> Option<Config> {
    let contents = fs::read_to_string(CONFIG_FILE).ok()?;
    serde_json::from_str(&contents).ok()
}

pub fn save_config(theme: &Theme, api_base_url: Option<String>) -> std::io::Result<()> {
    let config = Config {
        theme_name: theme_to_str(theme).to_string(),
        api_base_url,
    };
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(CONFIG_FILE, json)?;
    Ok(())
}

pub fn api_base_url() -> String {
    load_config()
        .and_then(|c| c.api_base_url)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

pub fn load_session() -> Option<Session> {
    let contents = fs::read_to_string(SESSION_FILE).ok()?;
    serde_json::from_str(&contents).ok()
}

pub fn save_session(session: &Session) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    fs::write(SESSION_FILE, json)?;
    Ok(())
}

pub fn clear_session() {
    let _ = fs::remove_file(SESSION_FILE);
}

pub fn theme_from_str(name: &str) -> Option<Theme> {
    Theme::ALL
        .iter()
        .find(|t| theme_to_str(t).eq_ignore_ascii_case(name))
        .cloned()
}

pub fn load_theme() -> Option<Theme> {
    theme_from_str(&load_config()?.theme_name)
}

pub fn theme_to_str(theme: &Theme) -> &'static str {
    match theme {
        Theme::Light => "Light",
        Theme::Dark => "Dark",
        Theme::Dracula => "Dracula",
        Theme::Nord => "Nord",
        Theme::SolarizedLight => "SolarizedLight",
        Theme::SolarizedDark => "SolarizedDark",
        Theme::GruvboxLight => "GruvboxLight",
        Theme::GruvboxDark => "GruvboxDark",
        Theme::CatppuccinLatte => "CatppuccinLatte",
        Theme::CatppuccinFrappe => "CatppuccinFrappe",
        Theme::CatppuccinMacchiato => "CatppuccinMacchiato",
        Theme::CatppuccinMocha => "CatppuccinMocha",
        Theme::TokyoNight => "TokyoNight",
        Theme::TokyoNightStorm => "TokyoNightStorm",
        Theme::TokyoNightLight => "TokyoNightLight",
        Theme::KanagawaWave => "KanagawaWave",
        Theme::KanagawaDragon => "KanagawaDragon",
        Theme::KanagawaLotus => "KanagawaLotus",
        Theme::Moonfly => "Moonfly",
        Theme::Nightfly => "Nightfly",
        Theme::Oxocarbon => "Oxocarbon",
        Theme::Ferra => "Ferra",
        _ => "Unknown",
    }
}
