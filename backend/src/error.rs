use crate::inference::pipeline::PipelineError;
use actix_multipart::MultipartError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use shared::ErrorResponse;

/// Errors surfaced to the browser. Messages are deliberately generic; the
/// detail goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("No image was uploaded")]
    MissingImage,
    #[error("The uploaded image exceeds the {0} byte limit")]
    PayloadTooLarge(usize),
    #[error("The uploaded file could not be read as an image")]
    InvalidImage,
    #[error("There was an error running the prediction. Please try again later.")]
    PredictionFailed,
    #[error("The classifier is not available right now. Please try again later.")]
    ModelUnavailable,
    #[error("Upload failed: {0}")]
    Upload(#[from] MultipartError),
    #[error("Internal server error")]
    Internal,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::MissingImage | ApiError::InvalidImage | ApiError::Upload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::PredictionFailed | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Decode(_) => ApiError::InvalidImage,
            PipelineError::Load(_) => ApiError::ModelUnavailable,
            PipelineError::Classifier(_)
            | PipelineError::EmptyOutput
            | PipelineError::LabelMismatch { .. }
            | PipelineError::NonFiniteOutput { .. } => ApiError::PredictionFailed,
        }
    }
}
