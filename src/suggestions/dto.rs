use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
    /// True when today's suggestion had already been settled and no new text
    /// was produced for this request.
    pub already_received: bool,
}
