use base64::{engine::general_purpose::STANDARD, Engine as _};
use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use shared::{Credentials, ErrorResponse, LoginResponse, PredictionResponse};

fn basic_auth(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.username, credentials.password);
    format!("Basic {}", STANDARD.encode(pair))
}

/// Pulls the server's `{error}` message out of a failed response.
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("Server error: {}", status),
    }
}

pub async fn login(credentials: &Credentials) -> Result<LoginResponse, String> {
    let response = Request::post("/api/login")
        .json(credentials)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    // A rejected login still carries a LoginResponse body.
    response
        .json::<LoginResponse>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn logout(credentials: &Credentials) {
    let result = Request::post("/api/logout")
        .header("Authorization", &basic_auth(credentials))
        .send()
        .await;
    if let Err(e) = result {
        log::warn!("Logout notification failed: {}", e);
    }
}

pub async fn predict(credentials: &Credentials, file: &GlooFile) -> Result<PredictionResponse, String> {
    let form_data = web_sys::FormData::new().map_err(|_| "Failed to prepare upload.".to_string())?;
    form_data
        .append_with_blob_and_filename("image", file.as_ref(), &file.name())
        .map_err(|_| "Failed to prepare upload.".to_string())?;

    let response = Request::post("/api/predict")
        .header("Authorization", &basic_auth(credentials))
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.ok() {
        response
            .json::<PredictionResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(error_message(response).await)
    }
}
