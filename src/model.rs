//! Model container parsing and the inference facade.
//!
//! A packaged model is a flat byte image: a small fixed header carrying
//! magic bytes, schema version, flags, and the network dimensions,
//! followed by little-endian f32 weights. Mapping the image is a
//! lightweight parse: no copying of the payload happens until the
//! runtime allocates its working buffers.
//!
//! The runtime boundary is the [`ModelRuntime`] trait: bind the input
//! view, invoke synchronously, read the output view. The output is a
//! borrowed slice invalidated by the next `invoke`; it is never handed
//! out as an owned value. [`DenseAutoencoder`] is the bundled
//! implementation, a two-layer reconstruction network executing in
//! buffers sized once against an arena budget at initialization.

use crate::error::{Result, SentinelError};
use std::path::Path;

/// Model container magic bytes.
const MODEL_MAGIC: &[u8; 4] = b"SENM";

/// Fixed header size preceding the weight payload.
const HEADER_SIZE: usize = 16;

/// Schema major version this runtime supports.
pub const SUPPORTED_SCHEMA_VERSION: u8 = 1;

/// A parsed model container.
///
/// Validated header plus the weight payload, not yet bound to any
/// runtime buffers.
#[derive(Debug, Clone)]
pub struct ModelImage {
    version: (u8, u8),
    quantized: bool,
    input_dim: usize,
    hidden_dim: usize,
    weights: Vec<f32>,
}

impl ModelImage {
    /// Parse a model image from raw bytes.
    ///
    /// # Errors
    ///
    /// - `InvalidModel` if the bytes are truncated, the magic does not
    ///   match, a dimension is zero, or the payload length disagrees
    ///   with the declared dimensions.
    /// - `SchemaVersionMismatch` if the schema major version is not
    ///   [`SUPPORTED_SCHEMA_VERSION`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(SentinelError::invalid_model(format!(
                "data too short: {} bytes, minimum {} required",
                bytes.len(),
                HEADER_SIZE
            )));
        }

        if &bytes[0..4] != MODEL_MAGIC {
            return Err(SentinelError::invalid_model(format!(
                "invalid magic bytes: expected SENM, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = (bytes[4], bytes[5]);
        if version.0 != SUPPORTED_SCHEMA_VERSION {
            return Err(SentinelError::SchemaVersionMismatch {
                found: version.0,
                supported: SUPPORTED_SCHEMA_VERSION,
            });
        }

        let flags = bytes[6];
        let quantized = (flags & 0x01) != 0;
        if quantized {
            // Reserved flag; no quantized payloads are produced yet.
            return Err(SentinelError::invalid_model(
                "quantized payloads are not supported",
            ));
        }

        let input_dim = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
        let hidden_dim = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
        if input_dim == 0 || hidden_dim == 0 {
            return Err(SentinelError::invalid_model(format!(
                "dimensions must be non-zero, got input={input_dim} hidden={hidden_dim}"
            )));
        }

        // Header dimensions are untrusted; the payload size must be
        // computed with checked arithmetic so absurd dimensions are an
        // error, not an overflow.
        let expected_bytes = Self::checked_payload_len(input_dim, hidden_dim).ok_or_else(|| {
            SentinelError::invalid_model(format!(
                "dimensions overflow: input={input_dim} hidden={hidden_dim}"
            ))
        })?;
        let payload = &bytes[HEADER_SIZE..];
        if payload.len() != expected_bytes {
            return Err(SentinelError::invalid_model(format!(
                "payload holds {} bytes, dimensions {}x{} require {}",
                payload.len(),
                input_dim,
                hidden_dim,
                expected_bytes
            )));
        }

        let weights = payload
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        Ok(Self {
            version,
            quantized,
            input_dim,
            hidden_dim,
            weights,
        })
    }

    /// Read and parse a model image from a file.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors and everything [`from_bytes`] rejects.
    ///
    /// [`from_bytes`]: ModelImage::from_bytes
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Total parameter count for the given dimensions.
    ///
    /// Encoder weights and bias plus decoder weights and bias. Callers
    /// pass dimensions already validated against overflow; the parser
    /// itself uses a checked computation.
    #[must_use]
    pub fn param_count(input_dim: usize, hidden_dim: usize) -> usize {
        hidden_dim * input_dim + hidden_dim + input_dim * hidden_dim + input_dim
    }

    /// Payload length in bytes for the given dimensions, or `None` when
    /// the computation overflows `usize`.
    fn checked_payload_len(input_dim: usize, hidden_dim: usize) -> Option<usize> {
        hidden_dim
            .checked_mul(input_dim)?
            .checked_mul(2)?
            .checked_add(hidden_dim)?
            .checked_add(input_dim)?
            .checked_mul(4)
    }

    /// Schema version (major, minor).
    #[must_use]
    pub fn version(&self) -> (u8, u8) {
        self.version
    }

    /// Whether the payload is quantized.
    #[must_use]
    pub fn is_quantized(&self) -> bool {
        self.quantized
    }

    /// Input (and output) dimension of the network.
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Hidden-layer dimension.
    #[must_use]
    pub fn hidden_dim(&self) -> usize {
        self.hidden_dim
    }

    /// Raw flat weight vector.
    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Builder producing model image bytes, used by tests, benches, and the
/// demo tools to fabricate loadable models.
#[derive(Debug, Default)]
pub struct ModelImageBuilder {
    version: Option<(u8, u8)>,
    quantized: bool,
    input_dim: usize,
    hidden_dim: usize,
    weights: Vec<f32>,
}

impl ModelImageBuilder {
    /// Create a builder with no dimensions set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the schema version written into the header.
    #[must_use]
    pub fn with_version(mut self, major: u8, minor: u8) -> Self {
        self.version = Some((major, minor));
        self
    }

    /// Mark the payload as quantized (reserved; loading will refuse it).
    #[must_use]
    pub fn with_quantized(mut self, quantized: bool) -> Self {
        self.quantized = quantized;
        self
    }

    /// Set network dimensions.
    #[must_use]
    pub fn with_dims(mut self, input_dim: usize, hidden_dim: usize) -> Self {
        self.input_dim = input_dim;
        self.hidden_dim = hidden_dim;
        self
    }

    /// Set the flat weight vector. Length must equal
    /// [`ModelImage::param_count`] for the chosen dimensions.
    #[must_use]
    pub fn with_weights(mut self, weights: Vec<f32>) -> Self {
        self.weights = weights;
        self
    }

    /// Serialize the image bytes.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.weights.len() * 4);

        bytes.extend_from_slice(MODEL_MAGIC);

        let (major, minor) = self.version.unwrap_or((SUPPORTED_SCHEMA_VERSION, 0));
        bytes.push(major);
        bytes.push(minor);

        let mut flags: u8 = 0;
        if self.quantized {
            flags |= 0x01;
        }
        bytes.push(flags);
        bytes.push(0); // reserved

        bytes.extend_from_slice(&(self.input_dim as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.hidden_dim as u32).to_le_bytes());

        for w in &self.weights {
            bytes.extend_from_slice(&w.to_le_bytes());
        }

        bytes
    }
}

/// Synchronous single-shot inference boundary.
///
/// One invocation per complete window. The runtime retains no state
/// between invocations beyond its preallocated working memory.
pub trait ModelRuntime {
    /// Input dimension the runtime was allocated for.
    fn input_dim(&self) -> usize;

    /// Mutable view of the input buffer.
    fn input_mut(&mut self) -> &mut [f32];

    /// Read-only view of the output buffer.
    ///
    /// Contents are valid only until the next [`invoke`] call
    /// overwrites them.
    ///
    /// [`invoke`]: ModelRuntime::invoke
    fn output(&self) -> &[f32];

    /// Run inference over the currently bound input buffer.
    ///
    /// # Errors
    ///
    /// `InferenceFailed` if the runtime reports anything but success.
    fn invoke(&mut self) -> Result<()>;

    /// Copy `window` into the input view, invoke, and return the output.
    ///
    /// # Errors
    ///
    /// `InferenceFailed` from [`invoke`]. A window length that differs
    /// from the allocated input dimension is a wiring bug, not a runtime
    /// condition, and panics.
    ///
    /// [`invoke`]: ModelRuntime::invoke
    fn infer(&mut self, window: &[f32]) -> Result<&[f32]> {
        assert_eq!(
            window.len(),
            self.input_dim(),
            "window length {} does not match model input dimension {}",
            window.len(),
            self.input_dim()
        );
        self.input_mut().copy_from_slice(window);
        self.invoke()?;
        Ok(self.output())
    }
}

/// Dense two-layer autoencoder runtime.
///
/// ReLU hidden layer, linear output layer, executing entirely in
/// buffers allocated once at construction. Stands at the same boundary
/// an external micro-inference engine would occupy.
#[derive(Debug)]
pub struct DenseAutoencoder {
    image: ModelImage,
    input: Vec<f32>,
    hidden: Vec<f32>,
    output: Vec<f32>,
}

impl DenseAutoencoder {
    /// Allocate working buffers for `image` against an arena budget.
    ///
    /// Mirrors the one-time tensor allocation step of an embedded
    /// runtime: the input, hidden, and output activations must fit in
    /// `arena_bytes`.
    ///
    /// # Errors
    ///
    /// `BufferAllocationFailed` if the activations exceed the budget.
    pub fn allocate(image: ModelImage, arena_bytes: usize) -> Result<Self> {
        let n = image.input_dim();
        let h = image.hidden_dim();
        let needed = (n + h + n) * std::mem::size_of::<f32>();
        if needed > arena_bytes {
            return Err(SentinelError::BufferAllocationFailed {
                needed,
                arena: arena_bytes,
            });
        }
        Ok(Self {
            input: vec![0.0; n],
            hidden: vec![0.0; h],
            output: vec![0.0; n],
            image,
        })
    }

    /// The parsed image backing this runtime.
    #[must_use]
    pub fn image(&self) -> &ModelImage {
        &self.image
    }
}

impl ModelRuntime for DenseAutoencoder {
    fn input_dim(&self) -> usize {
        self.image.input_dim()
    }

    fn input_mut(&mut self) -> &mut [f32] {
        &mut self.input
    }

    fn output(&self) -> &[f32] {
        &self.output
    }

    fn invoke(&mut self) -> Result<()> {
        let n = self.image.input_dim();
        let h = self.image.hidden_dim();
        let (enc_w, rest) = self.image.weights().split_at(h * n);
        let (enc_b, rest) = rest.split_at(h);
        let (dec_w, dec_b) = rest.split_at(n * h);

        // hidden = relu(enc_w * x + enc_b), row-major weights
        let mut hidden = std::mem::take(&mut self.hidden);
        for (j, slot) in hidden.iter_mut().enumerate() {
            let row = &enc_w[j * n..(j + 1) * n];
            let mut acc = enc_b[j];
            for (w, x) in row.iter().zip(self.input.iter()) {
                acc += w * x;
            }
            *slot = acc.max(0.0);
        }

        // output = dec_w * hidden + dec_b
        let mut output = std::mem::take(&mut self.output);
        for (k, slot) in output.iter_mut().enumerate() {
            let row = &dec_w[k * h..(k + 1) * h];
            let mut acc = dec_b[k];
            for (w, a) in row.iter().zip(hidden.iter()) {
                acc += w * a;
            }
            *slot = acc;
        }

        self.hidden = hidden;
        self.output = output;
        Ok(())
    }
}
