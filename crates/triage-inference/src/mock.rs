//! Mock embedding backend for deterministic testing.
//!
//! Generates deterministic embeddings so clustering tests are reproducible
//! without a live embedding service. Specific texts can be pinned to
//! stipulated vectors to construct exact similarity geometries.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use triage_core::{EmbeddingBackend, Error, Result, Vector};

/// Mock embedding backend for testing.
#[derive(Clone)]
pub struct MockEmbeddingBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    dimension: usize,
    pinned: HashMap<String, Vector>,
    failing_texts: HashSet<String>,
    failure_rate: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            dimension: 384,
            pinned: HashMap::new(),
            failing_texts: HashSet::new(),
            failure_rate: 0.0,
        }
    }
}

impl MockEmbeddingBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        Arc::make_mut(&mut self.config).dimension = dimension;
        self
    }

    /// Pin a specific input text to a stipulated vector.
    pub fn with_vector(mut self, text: impl Into<String>, vector: Vector) -> Self {
        Arc::make_mut(&mut self.config).pinned.insert(text.into(), vector);
        self
    }

    /// Make embedding fail for one specific input text.
    pub fn with_failing_text(mut self, text: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config)
            .failing_texts
            .insert(text.into());
        self
    }

    /// Set failure rate (0.0 - 1.0) for testing error handling.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        Arc::make_mut(&mut self.config).failure_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// All texts embedded so far, in call order.
    pub fn embedded_texts(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of embed calls (counting each text separately).
    pub fn embed_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn should_fail(&self) -> bool {
        use rand::Rng;
        self.config.failure_rate > 0.0
            && rand::thread_rng().gen::<f64>() < self.config.failure_rate
    }

    fn embed_one(&self, text: &str) -> Result<Vector> {
        self.call_log.lock().unwrap().push(text.to_string());

        if self.config.failing_texts.contains(text) {
            return Err(Error::Embedding(format!(
                "Simulated failure for input: {}",
                text
            )));
        }
        if self.should_fail() {
            return Err(Error::Embedding("Simulated random failure".to_string()));
        }

        if let Some(vector) = self.config.pinned.get(text) {
            return Ok(vector.clone());
        }
        Ok(MockEmbeddingGenerator::generate(
            text,
            self.config.dimension,
        ))
    }
}

impl Default for MockEmbeddingBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingBackend for MockEmbeddingBackend {
    async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vector>> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}

/// Deterministic embedding generator.
pub struct MockEmbeddingGenerator;

impl MockEmbeddingGenerator {
    /// Generate a deterministic embedding from text.
    ///
    /// Uses character-based hashing for reproducibility: the same text
    /// always produces the same unit vector.
    pub fn generate(text: &str, dimension: usize) -> Vector {
        let mut vec = vec![0.0; dimension];

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % dimension;
            vec[idx] += 0.1;
        }

        Self::normalize(&mut vec);
        vec
    }

    /// Normalize a vector in place to unit magnitude (no-op on zero vectors).
    pub fn normalize(vec: &mut [f32]) {
        let magnitude: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            vec.iter_mut().for_each(|x| *x /= magnitude);
        }
    }

    /// Cosine similarity between two vectors (0.0 on zero magnitude).
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if mag_a > 0.0 && mag_b > 0.0 {
            dot / (mag_a * mag_b)
        } else {
            0.0
        }
    }
}
