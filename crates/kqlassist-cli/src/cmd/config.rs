use super::fail;
use crate::ui;
use kqlassist_core::config::{default_config_path, load_config};
use kqlassist_types::AssistError;
use std::path::Path;

pub fn cmd_config_show(config_path: Option<&Path>) {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    if !path.exists() {
        ui::hint(&format!("{} not found; showing defaults", path.display()));
    }
    let config = load_config(Some(&path));
    match toml::to_string_pretty(&config) {
        Ok(text) => print!("{text}"),
        Err(e) => fail(&AssistError::Config(e.to_string())),
    }
}

pub fn cmd_config_path(config_path: Option<&Path>) {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    println!("{}", path.display());
}
