use super::fail;
use kqlassist_core::{decode_payload, destination};
use kqlassist_types::{AssistError, AssistResult};
use url::Url;

/// The payload itself, or the `query` parameter when given a console URL.
fn extract_payload(input: &str) -> AssistResult<String> {
    let input = input.trim();
    if !(input.starts_with("https://") || input.starts_with("http://")) {
        return Ok(input.to_string());
    }
    let url = Url::parse(input).map_err(|e| AssistError::InvalidUrl(format!("{input}: {e}")))?;
    url.query_pairs()
        .find(|(k, _)| k == destination::QUERY_PARAM)
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| {
            AssistError::InvalidUrl(format!(
                "no '{}' parameter in {input}",
                destination::QUERY_PARAM
            ))
        })
}

pub fn cmd_decode(input: &str) {
    let query = extract_payload(input).and_then(|payload| decode_payload(&payload));
    match query {
        Ok(query) => println!("{query}"),
        Err(e) => fail(&e),
    }
}
