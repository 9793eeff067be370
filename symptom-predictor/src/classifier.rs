//! Forward inference over the trained symptom classifier
//!
//! The network is embedding → global average pooling → dense(relu) →
//! dense(softmax). Training happens elsewhere; the weights arrive as a JSON
//! export of the Keras layer weights.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::encoder::EncodedSequence;
use crate::error::{PredictorError, PredictorResult};

/// Probability per output class; index `i` belongs to cause id `i + 1`
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution(Vec<f32>);

impl Distribution {
    pub fn probabilities(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f32 {
        self.0.iter().sum()
    }
}

impl From<Vec<f32>> for Distribution {
    fn from(probabilities: Vec<f32>) -> Self {
        Self(probabilities)
    }
}

/// Maps an encoded sequence to a distribution over the cause vocabulary
///
/// Implementations are shared across request handlers, so they must be
/// callable concurrently through `&self`.
#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    fn predict(&self, sequence: &EncodedSequence) -> PredictorResult<Distribution>;

    fn num_classes(&self) -> usize;
}

/// Weights of one dense layer, Keras layout (`kernel` is inputs × units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

/// Vocabulary fingerprints recorded by the training run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFingerprints {
    pub symptoms: String,
    pub causes: String,
}

/// Serialized trained model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Sequence width the model was built for, when recorded
    #[serde(default)]
    pub input_length: Option<usize>,
    /// One row per symptom id, row 0 for padding
    pub embedding: Vec<Vec<f32>>,
    pub hidden: DenseLayer,
    pub output: DenseLayer,
    #[serde(default)]
    pub fingerprints: Option<ArtifactFingerprints>,
}

#[derive(Debug, Clone)]
pub struct DenseClassifier {
    embedding: Array2<f32>,
    hidden_kernel: Array2<f32>,
    hidden_bias: Array1<f32>,
    output_kernel: Array2<f32>,
    output_bias: Array1<f32>,
    input_length: Option<usize>,
    fingerprints: Option<ArtifactFingerprints>,
}

fn to_matrix(rows: Vec<Vec<f32>>, name: &str) -> PredictorResult<Array2<f32>> {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    if height == 0 || width == 0 {
        return Err(PredictorError::InvalidModel(format!("{} is empty", name)));
    }
    if rows.iter().any(|row| row.len() != width) {
        return Err(PredictorError::InvalidModel(format!(
            "{} rows have differing lengths",
            name
        )));
    }

    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), flat)
        .map_err(|e| PredictorError::InvalidModel(format!("{}: {}", name, e)))
}

fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max = logits.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
    let exp = logits.mapv(|v| (v - max).exp());
    let total = exp.sum();
    exp / total
}

impl DenseClassifier {
    pub fn from_artifact(artifact: ModelArtifact) -> PredictorResult<Self> {
        let embedding = to_matrix(artifact.embedding, "embedding")?;
        let hidden_kernel = to_matrix(artifact.hidden.kernel, "hidden kernel")?;
        let hidden_bias = Array1::from(artifact.hidden.bias);
        let output_kernel = to_matrix(artifact.output.kernel, "output kernel")?;
        let output_bias = Array1::from(artifact.output.bias);

        if hidden_kernel.nrows() != embedding.ncols() {
            return Err(PredictorError::InvalidModel(format!(
                "hidden kernel expects {} inputs, embedding width is {}",
                hidden_kernel.nrows(),
                embedding.ncols()
            )));
        }
        if hidden_bias.len() != hidden_kernel.ncols() {
            return Err(PredictorError::InvalidModel(format!(
                "hidden bias has {} values for {} units",
                hidden_bias.len(),
                hidden_kernel.ncols()
            )));
        }
        if output_kernel.nrows() != hidden_kernel.ncols() {
            return Err(PredictorError::InvalidModel(format!(
                "output kernel expects {} inputs, hidden layer has {} units",
                output_kernel.nrows(),
                hidden_kernel.ncols()
            )));
        }
        if output_bias.len() != output_kernel.ncols() {
            return Err(PredictorError::InvalidModel(format!(
                "output bias has {} values for {} classes",
                output_bias.len(),
                output_kernel.ncols()
            )));
        }
        if artifact.input_length == Some(0) {
            return Err(PredictorError::InvalidModel(
                "input_length must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            embedding,
            hidden_kernel,
            hidden_bias,
            output_kernel,
            output_bias,
            input_length: artifact.input_length,
            fingerprints: artifact.fingerprints,
        })
    }

    pub fn load(path: &Path) -> PredictorResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PredictorError::artifact(path, e.to_string()))?;
        let artifact: ModelArtifact = serde_json::from_str(&json)
            .map_err(|e| PredictorError::artifact(path, format!("malformed model: {}", e)))?;
        let classifier =
            Self::from_artifact(artifact).map_err(|e| PredictorError::artifact(path, e.to_string()))?;

        tracing::debug!(
            path = %path.display(),
            embedding_rows = classifier.embedding_rows(),
            embedding_dim = classifier.embedding.ncols(),
            hidden_units = classifier.hidden_kernel.ncols(),
            classes = classifier.num_classes(),
            "Loaded classifier"
        );
        Ok(classifier)
    }

    /// Symptom vocabulary size + 1 for a consistent artifact
    pub fn embedding_rows(&self) -> usize {
        self.embedding.nrows()
    }

    pub fn input_length(&self) -> Option<usize> {
        self.input_length
    }

    pub fn fingerprints(&self) -> Option<&ArtifactFingerprints> {
        self.fingerprints.as_ref()
    }
}

impl Classifier for DenseClassifier {
    fn predict(&self, sequence: &EncodedSequence) -> PredictorResult<Distribution> {
        if sequence.is_empty() {
            return Err(PredictorError::Inference("empty input sequence".to_string()));
        }
        if let Some(expected) = self.input_length {
            if sequence.len() != expected {
                return Err(PredictorError::Inference(format!(
                    "model expects sequences of length {}, got {}",
                    expected,
                    sequence.len()
                )));
            }
        }

        let rows = self.embedding_rows();
        let indices = sequence
            .ids()
            .iter()
            .map(|&id| {
                usize::try_from(id)
                    .ok()
                    .filter(|&index| index < rows)
                    .ok_or_else(|| {
                        PredictorError::Inference(format!(
                            "token id {} outside embedding table of {} rows",
                            id, rows
                        ))
                    })
            })
            .collect::<PredictorResult<Vec<usize>>>()?;

        // Padding positions take part in the average
        let pooled = self
            .embedding
            .select(Axis(0), &indices)
            .mean_axis(Axis(0))
            .ok_or_else(|| PredictorError::Inference("empty input sequence".to_string()))?;

        let hidden = (pooled.dot(&self.hidden_kernel) + &self.hidden_bias).mapv(|v| v.max(0.0));
        let logits = hidden.dot(&self.output_kernel) + &self.output_bias;
        let probabilities = softmax(&logits);

        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(PredictorError::Inference(
                "classifier produced non-finite probabilities".to_string(),
            ));
        }

        Ok(Distribution(probabilities.to_vec()))
    }

    fn num_classes(&self) -> usize {
        self.output_bias.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    /// 4 symptom ids + padding, width 2, identity hidden layer, 3 classes
    fn artifact() -> ModelArtifact {
        ModelArtifact {
            input_length: Some(4),
            embedding: vec![
                vec![0.0, 0.0],
                vec![4.0, 0.0],
                vec![0.0, 4.0],
                vec![-4.0, 0.0],
                vec![2.0, 2.0],
            ],
            hidden: DenseLayer {
                kernel: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                bias: vec![0.0, 0.0],
            },
            output: DenseLayer {
                kernel: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]],
                bias: vec![0.0, 0.0, 0.0],
            },
            fingerprints: None,
        }
    }

    fn expected_softmax(logits: &[f32]) -> Vec<f32> {
        let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
        let total: f32 = exp.iter().sum();
        exp.iter().map(|v| v / total).collect()
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < TOLERANCE, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_forward_pass_matches_hand_computation() {
        let classifier = DenseClassifier::from_artifact(artifact()).unwrap();

        // mean of rows [0, 0, 1, 2] = [1.0, 1.0]; relu keeps it; logits [1, 1, 0]
        let distribution = classifier
            .predict(&EncodedSequence::from(vec![0, 0, 1, 2]))
            .unwrap();
        assert_close(distribution.probabilities(), &expected_softmax(&[1.0, 1.0, 0.0]));

        // mean of rows [0, 0, 0, 3] = [-1, 0]; relu zeroes it; logits [0, 0, 0]
        let distribution = classifier
            .predict(&EncodedSequence::from(vec![0, 0, 0, 3]))
            .unwrap();
        assert_close(distribution.probabilities(), &[1.0 / 3.0; 3]);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let classifier = DenseClassifier::from_artifact(artifact()).unwrap();
        let distribution = classifier
            .predict(&EncodedSequence::from(vec![1, 4, 2, 4]))
            .unwrap();

        assert_eq!(distribution.len(), classifier.num_classes());
        assert!((distribution.sum() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_unknown_id_is_inference_error() {
        let classifier = DenseClassifier::from_artifact(artifact()).unwrap();
        let err = classifier
            .predict(&EncodedSequence::from(vec![0, 0, 0, 5]))
            .unwrap_err();
        assert!(matches!(err, PredictorError::Inference(_)));
    }

    #[test]
    fn test_declared_input_length_enforced() {
        let classifier = DenseClassifier::from_artifact(artifact()).unwrap();
        let err = classifier
            .predict(&EncodedSequence::from(vec![0, 1, 2]))
            .unwrap_err();
        assert!(err.to_string().contains("length 4"));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let mut bad = artifact();
        bad.hidden.kernel = vec![vec![1.0, 0.0]];
        assert!(matches!(
            DenseClassifier::from_artifact(bad),
            Err(PredictorError::InvalidModel(_))
        ));

        let mut ragged = artifact();
        ragged.embedding[2] = vec![1.0];
        assert!(DenseClassifier::from_artifact(ragged).is_err());

        let mut short_bias = artifact();
        short_bias.output.bias = vec![0.0];
        assert!(DenseClassifier::from_artifact(short_bias).is_err());
    }

    #[test]
    fn test_softmax_is_stable_for_large_logits() {
        let probabilities = softmax(&Array1::from(vec![1000.0, 1000.0, -1000.0]));
        assert!(probabilities.iter().all(|p| p.is_finite()));
        assert!((probabilities[0] - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn test_artifact_json_round_trip_fields() {
        let json = serde_json::to_string(&artifact()).unwrap();
        let parsed: ModelArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.input_length, Some(4));
        assert!(parsed.fingerprints.is_none());
        assert!(DenseClassifier::from_artifact(parsed).is_ok());
    }
}
