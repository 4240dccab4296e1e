use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub processing: ProcessingConfig,

    #[serde(default)]
    pub eas: EasConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub setup: SetupConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorConfig::default(),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
            eas: EasConfig::default(),
            logging: LoggingConfig::default(),
            report: ReportConfig::default(),
            setup: SetupConfig::default(),
        }
    }
}

/// Which external evaluator program drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    /// Unlabelled batch analysis over an image directory.
    Analyzer,
    /// Labelled evaluation over a dataset with `with_status`/`without_status` subsets.
    BboxEval,
}

impl EvaluatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluatorKind::Analyzer => "analyzer",
            EvaluatorKind::BboxEval => "bbox_eval",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analyzer" => Some(EvaluatorKind::Analyzer),
            "bbox_eval" | "bbox-eval" | "eval" => Some(EvaluatorKind::BboxEval),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subset {
    WithStatus,
    WithoutStatus,
    Both,
}

impl Subset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subset::WithStatus => "with_status",
            Subset::WithoutStatus => "without_status",
            Subset::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "with_status" => Some(Subset::WithStatus),
            "without_status" => Some(Subset::WithoutStatus),
            "both" => Some(Subset::Both),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    #[serde(default = "default_evaluator_kind")]
    pub kind: EvaluatorKind,

    #[serde(default = "default_python")]
    pub python: String,

    /// Directory holding the evaluator and report scripts.
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    #[serde(default = "default_question")]
    pub question: String,

    #[serde(default = "default_true")]
    pub save_intermediate_images: bool,

    #[serde(default = "default_subset")]
    pub subset: Subset,

    #[serde(default)]
    pub max_samples: Option<u32>,
}

fn default_evaluator_kind() -> EvaluatorKind {
    EvaluatorKind::Analyzer
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_scripts_dir() -> PathBuf {
    PathBuf::from("scripts")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("data/images")
}

pub(crate) fn default_question() -> String {
    "How would you determine the current gear position of the washing machine, \
     where the red line in the image corresponds to the gear indicator pointer. \
     You should treat this as a clock hand, where the red point represents the pointer, \
     and the surrounding text represents the scale marks. \
     The text is connected to the knob perimeter (not the center) through green extension lines below. \
     The mode is determined by which green scale line endpoint on the knob edge the pointer most likely connects to. \
     The correct mode's text extension line and the red line can connect to point to the center. \
     Remember that the green lines below the text correspond to the text. \
     You should only focus on modes that have corresponding green lines, ignore others."
        .to_string()
}

fn default_true() -> bool {
    true
}

fn default_subset() -> Subset {
    Subset::Both
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            kind: default_evaluator_kind(),
            python: default_python(),
            scripts_dir: default_scripts_dir(),
            image_dir: default_image_dir(),
            question: default_question(),
            save_intermediate_images: default_true(),
            subset: default_subset(),
            max_samples: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Parent of the timestamped per-run directories.
    #[serde(default = "default_output_root")]
    pub root: PathBuf,

    /// Fixed run directory; disables the timestamped layout.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default)]
    pub jsonl: Option<PathBuf>,
}

fn default_output_root() -> PathBuf {
    PathBuf::from("output")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            dir: None,
            jsonl: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default = "default_num_processors")]
    pub num_processors: u32,

    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_num_processors() -> u32 {
    4
}

fn default_batch_size() -> u32 {
    2
}

fn default_max_tokens() -> u32 {
    512
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            num_processors: default_num_processors(),
            batch_size: default_batch_size(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EasConfig {
    #[serde(default = "default_eas_url")]
    pub url: String,

    #[serde(default)]
    pub token: String,

    #[serde(default = "default_model_name")]
    pub model_name: String,
}

fn default_eas_url() -> String {
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation".to_string()
}

fn default_model_name() -> String {
    "Qwen3-VL-235B-A22B-Instruct-FP8".to_string()
}

impl Default for EasConfig {
    fn default() -> Self {
        Self {
            url: default_eas_url(),
            token: String::new(),
            model_name: default_model_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub debug: bool,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl LoggingConfig {
    /// Filter directive for the driver's own logger.
    pub fn filter_directive(&self) -> String {
        if self.debug {
            return "debug".to_string();
        }
        let level = match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "warn" | "warning" => "warn",
            "error" | "critical" | "fatal" => "error",
            "off" => "off",
            _ => "info",
        };
        level.to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub html: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            html: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetupConfig {
    /// `pip install -r` target run before the evaluator; skipped when unset.
    #[serde(default)]
    pub requirements: Option<PathBuf>,
}
