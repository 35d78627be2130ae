//! Destination URL assembly and tenant resolution.

use kqlassist_types::config::DEFAULT_TIME_RANGE_ID;
use kqlassist_types::{AssistError, AssistResult, KvpMap};
use url::Url;

pub const TENANT_PARAM: &str = "tid";
pub const QUERY_PARAM: &str = "query";
pub const TIME_RANGE_PARAM: &str = "timeRangeId";

/// Build the console URL with the default `timeRangeId`.
pub fn build(base_url: &str, tenant_id: &str, payload: &str) -> AssistResult<String> {
    build_with_time_range(base_url, tenant_id, payload, DEFAULT_TIME_RANGE_ID)
}

/// Set `tid`, `query` and `timeRangeId` on `base_url`.
///
/// Other query parameters already on the base URL are kept, ahead of the
/// three set here.
pub fn build_with_time_range(
    base_url: &str,
    tenant_id: &str,
    payload: &str,
    time_range_id: &str,
) -> AssistResult<String> {
    let tenant_id = tenant_id.trim();
    if tenant_id.is_empty() {
        return Err(AssistError::MissingTenant);
    }

    let mut url =
        Url::parse(base_url).map_err(|e| AssistError::InvalidUrl(format!("{base_url}: {e}")))?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !matches!(k.as_ref(), TENANT_PARAM | QUERY_PARAM | TIME_RANGE_PARAM))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(TENANT_PARAM, tenant_id)
        .append_pair(QUERY_PARAM, payload)
        .append_pair(TIME_RANGE_PARAM, time_range_id);

    Ok(url.into())
}

/// `tid` from the page URL; otherwise, when allowed, a `tid` KVP value.
pub fn resolve_tenant(
    page_url: Option<&str>,
    kvp: &KvpMap,
    allow_kvp_fallback: bool,
) -> Option<String> {
    let from_page = page_url
        .and_then(|u| Url::parse(u).ok())
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == TENANT_PARAM)
                .map(|(_, v)| v.trim().to_string())
        })
        .filter(|tid| !tid.is_empty());

    from_page.or_else(|| {
        if !allow_kvp_fallback {
            return None;
        }
        kvp.get(TENANT_PARAM)
            .map(str::trim)
            .filter(|tid| !tid.is_empty())
            .map(str::to_string)
    })
}
