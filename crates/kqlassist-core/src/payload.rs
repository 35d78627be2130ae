//! Advanced Hunting `query` payload encoding.
//!
//! The console decodes the parameter as base64 (standard alphabet, padded),
//! then gunzips it, then reads the bytes as UTF-16LE. The forward path here
//! must match that bit for bit:
//!
//! 1. text to UTF-16LE, two bytes per code unit (surrogates stay as two units)
//! 2. gzip with a fixed header (mtime 0, OS unknown) so output is reproducible
//! 3. standard base64 with `=` padding

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kqlassist_types::{AssistError, AssistResult};
use std::sync::Arc;
use tracing::debug;

/// A compression backend for the payload.
pub trait Compressor: Send + Sync {
    fn name(&self) -> &'static str;

    fn compress(&self, bytes: &[u8]) -> AssistResult<Vec<u8>>;
}

/// gzip (RFC 1952) at the default level.
#[cfg(feature = "gzip")]
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipCompressor;

/// OS byte written in the gzip header (255 = unknown).
#[cfg(feature = "gzip")]
const GZIP_OS_UNKNOWN: u8 = 255;

#[cfg(feature = "gzip")]
impl Compressor for GzipCompressor {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress(&self, bytes: &[u8]) -> AssistResult<Vec<u8>> {
        use std::io::Write;

        let mut encoder = flate2::GzBuilder::new()
            .mtime(0)
            .operating_system(GZIP_OS_UNKNOWN)
            .write(Vec::with_capacity(bytes.len() / 2 + 32), flate2::Compression::default());
        encoder
            .write_all(bytes)
            .map_err(|e| AssistError::Encoding(format!("gzip write failed: {e}")))?;
        encoder
            .finish()
            .map_err(|e| AssistError::Encoding(format!("gzip finish failed: {e}")))
    }
}

/// UTF-16LE bytes: low byte then high byte for every UTF-16 code unit.
pub fn utf16le_bytes(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

pub fn utf16le_decode(bytes: &[u8]) -> AssistResult<String> {
    if bytes.len() % 2 != 0 {
        return Err(AssistError::Encoding(format!(
            "UTF-16LE data has odd length {}",
            bytes.len()
        )));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|e| AssistError::Encoding(format!("invalid UTF-16: {e}")))
}

/// Turns rendered query text into the `query` URL parameter value.
#[derive(Clone)]
pub struct PayloadEncoder {
    compressor: Option<Arc<dyn Compressor>>,
}

impl PayloadEncoder {
    pub fn new(compressor: Arc<dyn Compressor>) -> Self {
        Self {
            compressor: Some(compressor),
        }
    }

    /// An encoder with no compression backend; every encode fails with
    /// [`AssistError::EncodingUnavailable`].
    pub fn unavailable() -> Self {
        Self { compressor: None }
    }

    pub fn is_available(&self) -> bool {
        self.compressor.is_some()
    }

    pub fn encode_blocking(&self, text: &str) -> AssistResult<String> {
        let compressor = self
            .compressor
            .as_ref()
            .ok_or(AssistError::EncodingUnavailable)?;
        let bytes = utf16le_bytes(text);
        let compressed = compressor.compress(&bytes)?;
        debug!(
            compressor = compressor.name(),
            utf16_bytes = bytes.len(),
            compressed_bytes = compressed.len(),
            "Encoded query payload"
        );
        Ok(STANDARD.encode(compressed))
    }

    /// Encode on the blocking pool. No timeout and no retry.
    pub async fn encode(&self, text: &str) -> AssistResult<String> {
        if !self.is_available() {
            return Err(AssistError::EncodingUnavailable);
        }
        let encoder = self.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || encoder.encode_blocking(&text))
            .await
            .map_err(|e| AssistError::Encoding(format!("encode task failed: {e}")))?
    }
}

impl Default for PayloadEncoder {
    fn default() -> Self {
        #[cfg(feature = "gzip")]
        {
            Self::new(Arc::new(GzipCompressor))
        }
        #[cfg(not(feature = "gzip"))]
        {
            Self::unavailable()
        }
    }
}

impl std::fmt::Debug for PayloadEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadEncoder")
            .field("compressor", &self.compressor.as_ref().map(|c| c.name()))
            .finish()
    }
}

/// Inverse of [`PayloadEncoder::encode`]: base64, gunzip, UTF-16LE.
pub fn decode_payload(encoded: &str) -> AssistResult<String> {
    let compressed = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AssistError::Encoding(format!("invalid base64: {e}")))?;
    let bytes = gunzip(&compressed)?;
    utf16le_decode(&bytes)
}

#[cfg(feature = "gzip")]
fn gunzip(compressed: &[u8]) -> AssistResult<Vec<u8>> {
    use std::io::Read;

    let mut out = Vec::new();
    flate2::read::GzDecoder::new(compressed)
        .read_to_end(&mut out)
        .map_err(|e| AssistError::Encoding(format!("invalid gzip stream: {e}")))?;
    Ok(out)
}

#[cfg(not(feature = "gzip"))]
fn gunzip(_compressed: &[u8]) -> AssistResult<Vec<u8>> {
    Err(AssistError::EncodingUnavailable)
}
