//! Per-speaker centroid computation

use std::collections::HashMap;

use stitch_core::{DiarisationSegment, Embedding};

use crate::error::DiarizationError;

/// Mean embedding of every speaker in one scope, in first-appearance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerCentroids {
    entries: Vec<(String, Embedding)>,
}

impl SpeakerCentroids {
    /// Average the embeddings of each speaker found in `segments`
    ///
    /// `chunk_index` is only used to give errors context.
    pub fn from_segments(
        chunk_index: usize,
        segments: &[DiarisationSegment],
    ) -> Result<Self, DiarizationError> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut sums: Vec<(String, Embedding, usize)> = Vec::new();

        for segment in segments {
            match positions.get(segment.speaker_id.as_str()) {
                Some(&idx) => {
                    let (speaker, sum, count) = &mut sums[idx];
                    if sum.len() != segment.embedding.len() {
                        return Err(DiarizationError::DimensionMismatch {
                            chunk: chunk_index,
                            speaker: speaker.clone(),
                            expected: sum.len(),
                            actual: segment.embedding.len(),
                        });
                    }
                    for (acc, value) in sum.iter_mut().zip(segment.embedding.iter()) {
                        *acc += value;
                    }
                    *count += 1;
                }
                None => {
                    positions.insert(segment.speaker_id.as_str(), sums.len());
                    sums.push((segment.speaker_id.clone(), segment.embedding.clone(), 1));
                }
            }
        }

        let entries = sums
            .into_iter()
            .map(|(speaker, mut sum, count)| {
                if count > 1 {
                    let n = count as f64;
                    sum.iter_mut().for_each(|v| *v /= n);
                }
                (speaker, sum)
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Centroid of one speaker
    pub fn get(&self, speaker_id: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(id, _)| id == speaker_id)
            .map(|(_, centroid)| centroid.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries
            .iter()
            .map(|(id, centroid)| (id.as_str(), centroid.as_slice()))
    }

    pub fn speaker_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(speaker: &str, embedding: Vec<f64>) -> DiarisationSegment {
        DiarisationSegment {
            start_time: 0.0,
            end_time: 1.0,
            speaker_id: speaker.to_string(),
            quality_score: 0.9,
            embedding,
        }
    }

    #[test]
    fn test_mean_per_speaker() {
        let segments = vec![
            segment("A", vec![1.0, 0.0]),
            segment("B", vec![0.0, 4.0]),
            segment("A", vec![3.0, 2.0]),
        ];

        let centroids = SpeakerCentroids::from_segments(0, &segments).unwrap();
        assert_eq!(centroids.len(), 2);
        assert_eq!(centroids.get("A"), Some(&[2.0, 1.0][..]));
        assert_eq!(centroids.get("B"), Some(&[0.0, 4.0][..]));
        assert_eq!(centroids.get("C"), None);
    }

    #[test]
    fn test_first_appearance_order() {
        let segments = vec![
            segment("3", vec![1.0]),
            segment("1", vec![1.0]),
            segment("3", vec![1.0]),
            segment("2", vec![1.0]),
        ];

        let centroids = SpeakerCentroids::from_segments(0, &segments).unwrap();
        let ids: Vec<&str> = centroids.speaker_ids().collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_single_segment_keeps_embedding() {
        let centroids =
            SpeakerCentroids::from_segments(0, &[segment("1", vec![0.25, -0.5, 0.125])]).unwrap();
        assert_eq!(centroids.get("1"), Some(&[0.25, -0.5, 0.125][..]));
    }

    #[test]
    fn test_empty_segments() {
        let centroids = SpeakerCentroids::from_segments(4, &[]).unwrap();
        assert!(centroids.is_empty());
    }

    #[test]
    fn test_dimension_mismatch_within_speaker() {
        let segments = vec![segment("1", vec![1.0, 0.0]), segment("1", vec![1.0])];

        match SpeakerCentroids::from_segments(2, &segments) {
            Err(DiarizationError::DimensionMismatch {
                chunk,
                speaker,
                expected,
                actual,
            }) => {
                assert_eq!(chunk, 2);
                assert_eq!(speaker, "1");
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
