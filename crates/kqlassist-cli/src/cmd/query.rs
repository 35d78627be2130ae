use super::{fail, runtime, Context};
use crate::cli::KvpArgs;
use crate::ui;
use kqlassist_core::{config, destination, matcher, render, Session, Submitter};
use kqlassist_types::AssistError;
use tracing::debug;

fn apply_selection(session: &mut Session, id: Option<&str>) {
    if let Some(id) = id {
        if let Err(e) = session.select(id) {
            fail(&e);
        }
    }
}

pub fn cmd_render(ctx: &Context, id: Option<&str>, filter: Option<&str>, kvp: &KvpArgs) {
    let mut session = ctx.session(kvp, filter);
    apply_selection(&mut session, id);

    let Some(template) = session.selected() else {
        fail(&AssistError::NoTemplateSelected);
    };

    ui::kv("Template", &format!("{} ({})", template.name, template.id));
    ui::kv("Keys", &matcher::requirement_summary(template, session.kvp()));

    let unresolved = render::unresolved(&template.body, session.kvp());
    if unresolved.is_empty() {
        ui::check_ok("All placeholders resolved");
    } else {
        ui::check_warn(&format!(
            "Unresolved placeholders left as-is: {}",
            unresolved.join(", ")
        ));
    }
    ui::blank();

    if let Some(query) = session.preview() {
        println!("{query}");
    }
}

/// Tenant precedence: `--tenant`, then the environment, then the page URL,
/// then a `tid` KVP line when the config allows it.
fn pick_tenant(
    explicit: Option<&str>,
    env: Option<String>,
    page_url: Option<&str>,
    session: &Session,
    allow_kvp_fallback: bool,
) -> Option<String> {
    if let Some(tenant) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        debug!("Tenant from --tenant");
        return Some(tenant.to_string());
    }
    if env.is_some() {
        debug!("Tenant from {}", config::TENANT_ENV);
        return env;
    }
    let resolved = destination::resolve_tenant(page_url, session.kvp(), allow_kvp_fallback);
    debug!(found = resolved.is_some(), "Tenant from page URL or KVP input");
    resolved
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_submit(
    ctx: &Context,
    id: Option<&str>,
    filter: Option<&str>,
    kvp: &KvpArgs,
    page_url: Option<&str>,
    tenant: Option<&str>,
    open: bool,
    json: bool,
) {
    let mut session = ctx.session(kvp, filter);
    apply_selection(&mut session, id);

    let tenant = pick_tenant(
        tenant,
        config::tenant_from_env(),
        page_url,
        &session,
        ctx.config.tenant_from_kvp,
    );

    let submitter = Submitter::from_config(&ctx.config);
    let result = runtime().block_on(submitter.submit_now(
        session.selected(),
        session.kvp(),
        tenant.as_deref(),
    ));
    let submission = match result {
        Ok(s) => s,
        Err(e) => fail(&e),
    };

    if json {
        match serde_json::to_string_pretty(&submission) {
            Ok(out) => println!("{out}"),
            Err(e) => fail(&AssistError::Encoding(e.to_string())),
        }
    } else {
        ui::success(&format!(
            "Encoded '{}' for tenant {} ({} chars)",
            submission.template_id,
            submission.tenant_id,
            submission.payload.len()
        ));
        println!("{}", submission.url);
    }

    if open {
        if let Err(e) = open::that(&submission.url) {
            ui::error(&format!("Failed to open browser: {e}"));
            ui::hint("Copy the URL above into your browser.");
            std::process::exit(1);
        }
        ui::success("Opened Advanced Hunting in your browser");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kqlassist_core::ParseOptions;
    use kqlassist_types::{KeyCase, Template, TemplateLibrary};

    fn session(kvp_text: &str) -> Session {
        let lib = TemplateLibrary::new(vec![Template::new("a", "A", Vec::<String>::new(), "T")]);
        let mut s = Session::new(lib, ParseOptions::new(KeyCase::Sensitive));
        s.set_kvp_text(kvp_text).unwrap();
        s
    }

    const PAGE: &str = "https://security.microsoft.com/v2/advanced-hunting?tid=from-page";

    #[test]
    fn explicit_tenant_wins() {
        let s = session("tid=from-kvp");
        let tid = pick_tenant(Some(" cli "), Some("env".into()), Some(PAGE), &s, true);
        assert_eq!(tid.as_deref(), Some("cli"));
    }

    #[test]
    fn env_beats_page_url() {
        let s = session("");
        let tid = pick_tenant(None, Some("env".into()), Some(PAGE), &s, true);
        assert_eq!(tid.as_deref(), Some("env"));
    }

    #[test]
    fn blank_explicit_falls_through() {
        let s = session("");
        let tid = pick_tenant(Some("  "), None, Some(PAGE), &s, true);
        assert_eq!(tid.as_deref(), Some("from-page"));
    }

    #[test]
    fn kvp_fallback_respects_config() {
        let s = session("tid=from-kvp");
        assert_eq!(
            pick_tenant(None, None, None, &s, true).as_deref(),
            Some("from-kvp")
        );
        assert_eq!(pick_tenant(None, None, None, &s, false), None);
    }
}
