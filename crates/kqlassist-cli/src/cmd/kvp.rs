use super::{fail, read_kvp_text};
use crate::cli::KvpArgs;
use crate::ui;
use kqlassist_core::kvp::{kvp_text_from_url, parse_with};
use kqlassist_core::ParseOptions;
use kqlassist_types::AssistError;

pub fn cmd_kvp_from_url(url: &str) {
    match kvp_text_from_url(url) {
        Ok(text) if text.is_empty() => ui::check_warn("URL has no query parameters"),
        Ok(text) => println!("{text}"),
        Err(e) => fail(&e),
    }
}

pub fn cmd_kvp_check(options: ParseOptions, kvp: &KvpArgs) {
    let text = read_kvp_text(kvp);
    let map = match parse_with(&text, options) {
        Ok(map) => map,
        Err(e) => fail(&AssistError::from(e)),
    };
    if map.is_empty() {
        ui::check_warn("No key=value pairs");
        return;
    }
    println!("{}", map.to_text());
    ui::success(&format!("{} key(s) parsed", map.len()));
}
