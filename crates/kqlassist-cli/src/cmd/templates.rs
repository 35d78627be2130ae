use super::{fail, Context};
use crate::cli::KvpArgs;
use crate::ui;
use colored::Colorize;
use kqlassist_core::TemplateStatus;
use kqlassist_types::AssistError;

pub fn cmd_templates(ctx: &Context, filter: Option<&str>, kvp: &KvpArgs, json: bool) {
    let session = ctx.session(kvp, filter);
    let selected = session.selected().map(|t| t.id.as_str());
    let statuses = session.statuses();

    if json {
        match serde_json::to_string_pretty(&statuses_json(&statuses, selected)) {
            Ok(out) => println!("{out}"),
            Err(e) => fail(&AssistError::Encoding(e.to_string())),
        }
        return;
    }

    ui::section("Templates");
    ui::kv("Library", &ctx.loaded.source.to_string());
    if let Some(filter) = filter {
        ui::kv("Filter", filter);
    }
    ui::kv("Keys", &format_keys(session.kvp().keys()));
    ui::blank();

    if statuses.is_empty() {
        if session.library().is_empty() {
            ui::check_warn("No templates available");
        } else {
            ui::check_warn("No templates match the filter");
        }
        return;
    }

    for status in &statuses {
        let marker = if selected == Some(status.template.id.as_str()) {
            "*".bright_cyan().bold().to_string()
        } else {
            " ".to_string()
        };
        let label = status.label();
        let label = if status.is_satisfiable() {
            label.bright_green().to_string()
        } else {
            label.yellow().to_string()
        };
        println!("{marker} {:<28} {label}", status.template.id);
    }

    if selected.is_none() {
        ui::blank();
        ui::hint("No template is satisfiable yet; add the missing keys with --set key=value");
    }
}

fn statuses_json(statuses: &[TemplateStatus<'_>], selected: Option<&str>) -> Vec<serde_json::Value> {
    statuses
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s.template.id,
                "name": s.template.name,
                "required_keys": s.template.required_keys,
                "missing": s.missing,
                "satisfiable": s.is_satisfiable(),
                "selected": selected == Some(s.template.id.as_str()),
            })
        })
        .collect()
}

fn format_keys<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    let keys: Vec<&str> = keys.collect();
    if keys.is_empty() {
        "(none)".to_string()
    } else {
        keys.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kqlassist_core::{ParseOptions, Session};
    use kqlassist_types::{Template, TemplateLibrary};

    #[test]
    fn key_list_formatting() {
        assert_eq!(format_keys(std::iter::empty()), "(none)");
        assert_eq!(format_keys(["ip", "device"].into_iter()), "ip, device");
    }

    #[test]
    fn json_rows_mark_selection_and_missing_keys() {
        let lib = TemplateLibrary::new(vec![
            Template::new("device", "Device events", ["device"], "{{device}}"),
            Template::new("ip", "Network events", ["ip"], "{{ip}}"),
        ]);
        let mut session = Session::new(lib, ParseOptions::default());
        session.set_kvp_text("ip=1.2.3.4").unwrap();
        let selected = session.selected().map(|t| t.id.as_str());
        let rows = statuses_json(&session.statuses(), selected);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], "device");
        assert_eq!(rows[0]["missing"], serde_json::json!(["device"]));
        assert_eq!(rows[0]["satisfiable"], false);
        assert_eq!(rows[0]["selected"], false);
        assert_eq!(rows[1]["id"], "ip");
        assert_eq!(rows[1]["satisfiable"], true);
        assert_eq!(rows[1]["selected"], true);
        assert!(serde_json::to_string_pretty(&rows).is_ok());
    }
}
