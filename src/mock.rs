//! Placeholder result used when no live provider can answer.

use crate::result::AnalysisResult;

pub const MOCK_ALT_TEXT: &str = "Uploaded image awaiting description";
pub const MOCK_CAPTION: &str = "An automatic description is not available right now. \
    Replace this placeholder with a short description of the image.";

/// The fixed placeholder returned without a credential or after every
/// caption provider has failed. Always equal across calls.
pub fn mock_result() -> AnalysisResult {
    AnalysisResult::new(MOCK_ALT_TEXT, MOCK_CAPTION)
}
