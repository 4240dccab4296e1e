mod eval;
mod html;

pub use eval::EvalReport;
pub use html::HtmlReport;
