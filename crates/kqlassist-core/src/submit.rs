//! Render, encode and build: the submission pipeline.
//!
//! Validation happens up front in [`Submitter::prepare`] so that a missing
//! template, missing keys or a missing tenant fail before any compression
//! work. Each prepared submission carries a ticket; when a newer submission
//! has been prepared by the time encoding finishes, the older one resolves to
//! [`AssistError::Superseded`].

use crate::destination;
use crate::matcher::missing_keys;
use crate::payload::PayloadEncoder;
use crate::render::render;
use kqlassist_types::{AssistConfig, AssistError, AssistResult, KvpMap, Template};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// A validated submission waiting to be encoded.
#[derive(Debug, Clone)]
pub struct PreparedSubmission {
    ticket: u64,
    pub template_id: String,
    pub tenant_id: String,
    pub query: String,
}

impl PreparedSubmission {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

/// The result of a submission: the rendered query and the console URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub template_id: String,
    pub tenant_id: String,
    pub query: String,
    pub payload: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Submitter {
    encoder: PayloadEncoder,
    root_url: String,
    time_range_id: String,
    latest: Arc<AtomicU64>,
}

impl Submitter {
    pub fn new(
        encoder: PayloadEncoder,
        root_url: impl Into<String>,
        time_range_id: impl Into<String>,
    ) -> Self {
        Self {
            encoder,
            root_url: root_url.into(),
            time_range_id: time_range_id.into(),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &AssistConfig) -> Self {
        Self::new(
            PayloadEncoder::default(),
            config.root_url.clone(),
            config.time_range_id.clone(),
        )
    }

    pub fn with_encoder(mut self, encoder: PayloadEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn encoder(&self) -> &PayloadEncoder {
        &self.encoder
    }

    /// Validate inputs and render the query. Does no encoding.
    pub fn prepare(
        &self,
        template: Option<&Template>,
        kvp: &KvpMap,
        tenant_id: Option<&str>,
    ) -> AssistResult<PreparedSubmission> {
        let template = template.ok_or(AssistError::NoTemplateSelected)?;

        let missing = missing_keys(template, kvp);
        if !missing.is_empty() {
            return Err(AssistError::MissingRequiredKeys(missing));
        }

        let tenant_id = tenant_id
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AssistError::MissingTenant)?;

        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(template = %template.id, ticket, "Prepared submission");

        Ok(PreparedSubmission {
            ticket,
            template_id: template.id.clone(),
            tenant_id: tenant_id.to_string(),
            query: render(&template.body, kvp),
        })
    }

    /// Encode and build the URL for a prepared submission.
    pub async fn submit(&self, prepared: PreparedSubmission) -> AssistResult<Submission> {
        let payload = self.encoder.encode(&prepared.query).await?;

        if self.latest.load(Ordering::SeqCst) != prepared.ticket {
            debug!(ticket = prepared.ticket, "Submission superseded");
            return Err(AssistError::Superseded);
        }

        let url = destination::build_with_time_range(
            &self.root_url,
            &prepared.tenant_id,
            &payload,
            &self.time_range_id,
        )?;
        info!(template = %prepared.template_id, payload_len = payload.len(), "Built Advanced Hunting URL");

        Ok(Submission {
            template_id: prepared.template_id,
            tenant_id: prepared.tenant_id,
            query: prepared.query,
            payload,
            url,
        })
    }

    /// [`prepare`](Self::prepare) then [`submit`](Self::submit).
    pub async fn submit_now(
        &self,
        template: Option<&Template>,
        kvp: &KvpMap,
        tenant_id: Option<&str>,
    ) -> AssistResult<Submission> {
        let prepared = self.prepare(template, kvp, tenant_id)?;
        self.submit(prepared).await
    }
}

#[cfg(all(test, feature = "gzip"))]
mod tests {
    use super::*;
    use crate::payload::{decode_payload, Compressor, GzipCompressor};
    use std::sync::atomic::AtomicUsize;

    struct CountingCompressor {
        calls: Arc<AtomicUsize>,
    }

    impl Compressor for CountingCompressor {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn compress(&self, bytes: &[u8]) -> AssistResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            GzipCompressor.compress(bytes)
        }
    }

    fn counting_submitter() -> (Submitter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let encoder = PayloadEncoder::new(Arc::new(CountingCompressor {
            calls: calls.clone(),
        }));
        (
            Submitter::from_config(&AssistConfig::default()).with_encoder(encoder),
            calls,
        )
    }

    fn ip_template() -> Template {
        Template::new("ip", "Network events", ["ip"], "T | where X == \"{{ip}}\"")
    }

    #[tokio::test]
    async fn end_to_end() {
        let (submitter, calls) = counting_submitter();
        let kvp: KvpMap = [("ip", "1.2.3.4")].into_iter().collect();
        let t = ip_template();
        let sub = submitter.submit_now(Some(&t), &kvp, Some("tenant")).await.unwrap();
        assert_eq!(sub.query, "T | where X == \"1.2.3.4\"");
        assert_eq!(decode_payload(&sub.payload).unwrap(), sub.query);
        assert!(sub
            .url
            .starts_with("https://security.microsoft.com/v2/advanced-hunting?tid=tenant&query="));
        assert!(sub.url.ends_with("&timeRangeId=month"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_template() {
        let (submitter, _) = counting_submitter();
        let err = submitter
            .submit_now(None, &KvpMap::new(), Some("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssistError::NoTemplateSelected));
    }

    #[tokio::test]
    async fn missing_keys_fail() {
        let (submitter, calls) = counting_submitter();
        let t = Template::new("d", "Device", ["device"], "{{device}}");
        let kvp: KvpMap = [("ip", "1.2.3.4")].into_iter().collect();
        let err = submitter.submit_now(Some(&t), &kvp, Some("t")).await.unwrap_err();
        match err {
            AssistError::MissingRequiredKeys(keys) => assert_eq!(keys, vec!["device"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_tenant_fails_before_encoding() {
        let (submitter, calls) = counting_submitter();
        let kvp: KvpMap = [("ip", "1.2.3.4")].into_iter().collect();
        let t = ip_template();
        for tenant in [None, Some(""), Some("  ")] {
            let err = submitter.submit_now(Some(&t), &kvp, tenant).await.unwrap_err();
            assert!(matches!(err, AssistError::MissingTenant));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn older_submission_is_superseded() {
        let (submitter, _) = counting_submitter();
        let kvp: KvpMap = [("ip", "1.2.3.4")].into_iter().collect();
        let t = ip_template();
        let first = submitter.prepare(Some(&t), &kvp, Some("t")).unwrap();
        let second = submitter.prepare(Some(&t), &kvp, Some("t")).unwrap();
        assert!(second.ticket() > first.ticket());

        assert!(matches!(
            submitter.submit(first).await,
            Err(AssistError::Superseded)
        ));
        assert!(submitter.submit(second).await.is_ok());
    }

    #[tokio::test]
    async fn unavailable_encoder() {
        let submitter = Submitter::from_config(&AssistConfig::default())
            .with_encoder(PayloadEncoder::unavailable());
        let kvp: KvpMap = [("ip", "1.2.3.4")].into_iter().collect();
        let err = submitter
            .submit_now(Some(&ip_template()), &kvp, Some("t"))
            .await
            .unwrap_err();
        assert!(matches!(err, AssistError::EncodingUnavailable));
    }

    #[tokio::test]
    async fn custom_time_range() {
        let config = AssistConfig {
            time_range_id: "week".into(),
            ..AssistConfig::default()
        };
        let submitter = Submitter::from_config(&config);
        let kvp: KvpMap = [("ip", "1.2.3.4")].into_iter().collect();
        let sub = submitter
            .submit_now(Some(&ip_template()), &kvp, Some("t"))
            .await
            .unwrap();
        assert!(sub.url.ends_with("timeRangeId=week"));
    }
}
