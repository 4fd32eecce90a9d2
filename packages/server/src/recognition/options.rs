use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Embedding model used by the external matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceModel {
    #[serde(rename = "VGG-Face")]
    VggFace,
    Facenet,
    Facenet512,
    OpenFace,
    DeepFace,
    DeepID,
    ArcFace,
    Dlib,
    SFace,
    GhostFaceNet,
}

impl FaceModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VggFace => "VGG-Face",
            Self::Facenet => "Facenet",
            Self::Facenet512 => "Facenet512",
            Self::OpenFace => "OpenFace",
            Self::DeepFace => "DeepFace",
            Self::DeepID => "DeepID",
            Self::ArcFace => "ArcFace",
            Self::Dlib => "Dlib",
            Self::SFace => "SFace",
            Self::GhostFaceNet => "GhostFaceNet",
        }
    }
}

/// Face detector run before embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorBackend {
    Opencv,
    Ssd,
    Dlib,
    Mtcnn,
    Retinaface,
    Mediapipe,
    Yolov8,
    Yunet,
    Centerface,
    Skip,
}

impl DetectorBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opencv => "opencv",
            Self::Ssd => "ssd",
            Self::Dlib => "dlib",
            Self::Mtcnn => "mtcnn",
            Self::Retinaface => "retinaface",
            Self::Mediapipe => "mediapipe",
            Self::Yolov8 => "yolov8",
            Self::Yunet => "yunet",
            Self::Centerface => "centerface",
            Self::Skip => "skip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
    EuclideanL2,
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::EuclideanL2 => "euclidean_l2",
        }
    }
}

/// Fixed matcher options, chosen once at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecognitionConfig {
    /// Program implementing the matcher command-line contract.
    pub command: String,
    /// Arguments placed before the generated `find ...` arguments.
    #[serde(default)]
    pub args: Vec<String>,
    /// Directory of reference photos named `<id>[_suffix].<ext>`.
    pub reference_dir: PathBuf,
    pub model: FaceModel,
    pub detector: DetectorBackend,
    pub distance_metric: DistanceMetric,
    /// Distance cutoff; the matcher's own default applies when unset.
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub anti_spoofing: bool,
}
