use serde::Serialize;

/// Uniform JSON wrapper returned by every Todo endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    pub data: Option<T>,
    pub total_result: usize,
}

impl<T> Envelope<T> {
    pub fn new(status_code: u16, message: impl Into<String>, data: Option<T>, total_result: usize) -> Self {
        Self {
            status_code,
            message: message.into(),
            data,
            total_result,
        }
    }

    pub fn single(status_code: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self::new(status_code, message, data, 1)
    }
}

impl<T> Envelope<Vec<T>> {
    /// An empty list is reported as `data: null`.
    pub fn list(items: Vec<T>) -> Self {
        let total = items.len();
        let data = if items.is_empty() { None } else { Some(items) };
        Self::new(200, "success", data, total)
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub message: String,
}
