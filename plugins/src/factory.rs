use vlmrun_core::api::{EvaluatorKind, EvaluatorStrategy, ReportStrategy};

use crate::backend::{AnalyzerEvaluator, BboxEvalEvaluator};
use crate::report::{EvalReport, HtmlReport};

pub fn build_evaluator(kind: EvaluatorKind) -> Box<dyn EvaluatorStrategy> {
    match kind {
        EvaluatorKind::Analyzer => Box::new(AnalyzerEvaluator),
        EvaluatorKind::BboxEval => Box::new(BboxEvalEvaluator),
    }
}

/// Report generator paired with each evaluator's output format.
pub fn build_report(kind: EvaluatorKind) -> Box<dyn ReportStrategy> {
    match kind {
        EvaluatorKind::Analyzer => Box::new(HtmlReport),
        EvaluatorKind::BboxEval => Box::new(EvalReport),
    }
}
