//! Synthetic GGUF byte streams for tests.
//!
//! Only ever used as a dev-dependency.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

/// Builds a GGUF metadata header entry by entry.
#[derive(Debug, Clone)]
pub struct GgufBuilder {
    version: u32,
    tensor_count: u64,
    declared_kv_count: Option<u64>,
    count: u64,
    body: Vec<u8>,
}

impl GgufBuilder {
    pub fn new(version: u32) -> Self {
        Self { version, tensor_count: 0, declared_kv_count: None, count: 0, body: Vec::new() }
    }

    pub fn tensor_count(mut self, n: u64) -> Self {
        self.tensor_count = n;
        self
    }

    /// Write `n` as the key-value count instead of the real number of entries.
    pub fn declared_kv_count(mut self, n: u64) -> Self {
        self.declared_kv_count = Some(n);
        self
    }

    /// Versioned size field: u32 for v1, u64 otherwise.
    pub fn size(&self, n: u64) -> Vec<u8> {
        if self.version == 1 { (n as u32).to_le_bytes().to_vec() } else { n.to_le_bytes().to_vec() }
    }

    pub fn encode_string(&self, s: &str) -> Vec<u8> {
        let mut buf = self.size(s.len() as u64);
        buf.extend_from_slice(s.as_bytes());
        buf
    }

    /// Append one entry with an already-encoded payload.
    pub fn raw(mut self, key: &str, tag: u32, payload: &[u8]) -> Self {
        let key = self.encode_string(key);
        self.body.extend_from_slice(&key);
        self.body.extend_from_slice(&tag.to_le_bytes());
        self.body.extend_from_slice(payload);
        self.count += 1;
        self
    }

    pub fn u8(self, key: &str, v: u8) -> Self {
        self.raw(key, 0, &[v])
    }

    pub fn i16(self, key: &str, v: i16) -> Self {
        self.raw(key, 3, &v.to_le_bytes())
    }

    pub fn u32(self, key: &str, v: u32) -> Self {
        self.raw(key, 4, &v.to_le_bytes())
    }

    pub fn i32(self, key: &str, v: i32) -> Self {
        self.raw(key, 5, &v.to_le_bytes())
    }

    pub fn f32(self, key: &str, v: f32) -> Self {
        self.raw(key, 6, &v.to_le_bytes())
    }

    pub fn bool(self, key: &str, v: bool) -> Self {
        self.raw(key, 7, &[u8::from(v)])
    }

    pub fn string(self, key: &str, v: &str) -> Self {
        let payload = self.encode_string(v);
        self.raw(key, 8, &payload)
    }

    pub fn u64(self, key: &str, v: u64) -> Self {
        self.raw(key, 10, &v.to_le_bytes())
    }

    pub fn i64(self, key: &str, v: i64) -> Self {
        self.raw(key, 11, &v.to_le_bytes())
    }

    pub fn f64(self, key: &str, v: f64) -> Self {
        self.raw(key, 12, &v.to_le_bytes())
    }

    pub fn u32_array(self, key: &str, values: &[u32]) -> Self {
        let mut payload = 4u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&self.size(values.len() as u64));
        for v in values {
            payload.extend_from_slice(&v.to_le_bytes());
        }
        self.raw(key, 9, &payload)
    }

    pub fn string_array(self, key: &str, values: &[&str]) -> Self {
        let mut payload = 8u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&self.size(values.len() as u64));
        for s in values {
            payload.extend_from_slice(&self.encode_string(s));
        }
        self.raw(key, 9, &payload)
    }

    pub fn build(&self) -> Vec<u8> {
        let mut d = Vec::new();
        d.extend_from_slice(b"GGUF");
        d.extend_from_slice(&self.version.to_le_bytes());
        d.extend_from_slice(&self.size(self.tensor_count));
        d.extend_from_slice(&self.size(self.declared_kv_count.unwrap_or(self.count)));
        d.extend_from_slice(&self.body);
        d
    }

    /// Zero-pad to a whole number of `chunk`-sized blocks.
    pub fn build_padded(&self, chunk: usize) -> Vec<u8> {
        let mut d = self.build();
        let padded = d.len().div_ceil(chunk).max(1) * chunk;
        d.resize(padded, 0);
        d
    }

    /// Write the padded stream into `dir` and return its path.
    pub fn write(&self, dir: &tempfile::TempDir, name: &str, chunk: usize) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, self.build_padded(chunk)).unwrap();
        path
    }
}

/// A v2 header with `general.architecture = "llama"`, `general.name`, and
/// every required llama field.
#[must_use]
pub fn llama_v2() -> GgufBuilder {
    GgufBuilder::new(2)
        .string("general.architecture", "llama")
        .string("general.name", "LLaMA v2")
        .u32("llama.attention.head_count", 32)
        .u32("llama.context_length", 4096)
        .f32("llama.attention.layer_norm_rms_epsilon", 1e-6)
        .u32("llama.embedding_length", 4096)
        .u32("llama.feed_forward_length", 11008)
        .u32("llama.rope.dimension_count", 128)
}
