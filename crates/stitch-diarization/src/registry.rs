//! Global speaker registry and chunk-local to global ID mapping

use stitch_core::Embedding;
use tracing::debug;

use crate::centroid::SpeakerCentroids;
use crate::error::DiarizationError;
use crate::similarity::{cosine_similarity, SimilarityError};

/// One global speaker identity
///
/// The centroid is the one the speaker was registered with and is never
/// re-averaged with later chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSpeaker {
    pub id: String,
    pub centroid: Embedding,
}

/// Chunk-local speaker ID to global speaker ID, in local-ID order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerMapping {
    pairs: Vec<(String, String)>,
}

impl SpeakerMapping {
    pub fn get(&self, local_id: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(local, _)| local == local_id)
            .map(|(_, global)| global.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(local, global)| (local.as_str(), global.as_str()))
    }

    fn insert(&mut self, local: &str, global: String) {
        self.pairs.push((local.to_string(), global));
    }
}

/// Every global speaker discovered so far in one merge run
///
/// Speakers are kept in registration order; that order breaks similarity ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerRegistry {
    speakers: Vec<GlobalSpeaker>,
}

impl SpeakerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.speakers.iter().any(|s| s.id == id)
    }

    pub fn centroid(&self, id: &str) -> Option<&[f64]> {
        self.speakers
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.centroid.as_slice())
    }

    pub fn speakers(&self) -> &[GlobalSpeaker] {
        &self.speakers
    }

    /// Next unused global ID: one past the largest numeric ID, or 1
    ///
    /// IDs that are not integers (possible when the first chunk's local IDs
    /// are labels) never collide with minted IDs and are skipped here.
    /// `None` once the largest ID is `u64::MAX`.
    pub fn next_id(&self) -> Option<u64> {
        match self
            .speakers
            .iter()
            .filter_map(|s| s.id.trim().parse::<u64>().ok())
            .max()
        {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Register every speaker of chunk 0 under its own ID
    pub fn seed(&mut self, centroids: &SpeakerCentroids) -> SpeakerMapping {
        let mut mapping = SpeakerMapping::default();
        for (local_id, centroid) in centroids.iter() {
            if !self.contains(local_id) {
                self.register(local_id.to_string(), centroid.to_vec());
            }
            mapping.insert(local_id, local_id.to_string());
        }
        debug!("Seeded registry with {} speakers", self.speakers.len());
        mapping
    }

    /// Map one chunk's speakers onto global speakers, minting new ones as needed
    ///
    /// Each local speaker independently takes the global speaker with the
    /// highest similarity strictly above `threshold`. Only speakers registered
    /// before this call are candidates, so two speakers of the same chunk never
    /// match each other. Nothing prevents two local speakers from landing on
    /// the same global speaker.
    pub fn map_chunk(
        &mut self,
        chunk_index: usize,
        centroids: &SpeakerCentroids,
        threshold: f64,
    ) -> Result<SpeakerMapping, DiarizationError> {
        let known = self.speakers.len();
        let mut mapping = SpeakerMapping::default();

        for (local_id, centroid) in centroids.iter() {
            let mut best: Option<(usize, f64)> = None;

            for (idx, global) in self.speakers[..known].iter().enumerate() {
                let similarity = cosine_similarity(centroid, &global.centroid).map_err(|e| {
                    lift_similarity_error(e, chunk_index, local_id, &global.id)
                })?;

                let best_so_far = best.map_or(threshold, |(_, sim)| sim);
                if similarity > best_so_far {
                    best = Some((idx, similarity));
                }
            }

            match best {
                Some((idx, similarity)) => {
                    let global_id = self.speakers[idx].id.clone();
                    debug!(
                        chunk = chunk_index,
                        local = local_id,
                        global = %global_id,
                        similarity,
                        "Matched speaker"
                    );
                    mapping.insert(local_id, global_id);
                }
                None => {
                    let global_id = self
                        .next_id()
                        .ok_or(DiarizationError::SpeakerIdsExhausted { chunk: chunk_index })?
                        .to_string();
                    debug!(
                        chunk = chunk_index,
                        local = local_id,
                        global = %global_id,
                        "New global speaker"
                    );
                    self.register(global_id.clone(), centroid.to_vec());
                    mapping.insert(local_id, global_id);
                }
            }
        }

        Ok(mapping)
    }

    fn register(&mut self, id: String, centroid: Embedding) {
        self.speakers.push(GlobalSpeaker { id, centroid });
    }
}

fn lift_similarity_error(
    error: SimilarityError,
    chunk: usize,
    local_id: &str,
    global_id: &str,
) -> DiarizationError {
    match error {
        SimilarityError::DimensionMismatch { left, right } => DiarizationError::DimensionMismatch {
            chunk,
            speaker: local_id.to_string(),
            expected: right,
            actual: left,
        },
        SimilarityError::ZeroNorm => DiarizationError::ZeroNormEmbedding {
            chunk,
            speaker: local_id.to_string(),
            global: global_id.to_string(),
        },
    }
}
