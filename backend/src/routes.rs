use crate::auth::middleware::{validate_credentials, AuthenticatedUser};
use crate::auth::routes::{login, logout};
use crate::error::ApiError;
use crate::inference::recommendations;
use crate::inference::store::ModelStore;
use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use futures::{StreamExt, TryStreamExt};
use serde_json::json;
use shared::PredictionResponse;
use std::path::PathBuf;
use uuid::Uuid;

/// Largest accepted upload, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .route("/login", web::post().to(login))
            .service(
                web::resource("/logout")
                    .wrap(HttpAuthentication::basic(validate_credentials))
                    .route(web::post().to(logout)),
            )
            .service(
                web::resource("/predict")
                    .wrap(HttpAuthentication::basic(validate_credentials))
                    .route(web::post().to(predict)),
            ),
    );
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    if frontend_dir.is_dir() {
        cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
    } else {
        log::warn!(
            "Frontend directory {} not found; serving the API only",
            frontend_dir.display()
        );
    }
}

async fn health(store: web::Data<ModelStore>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "model_loaded": store.is_loaded(),
    }))
}

async fn predict(
    user: AuthenticatedUser,
    store: web::Data<ModelStore>,
    limit: web::Data<UploadLimit>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let image_data = read_first_file(&mut payload, limit.0).await?;
    log::info!(
        "Prediction request {} from {} ({} bytes)",
        request_id,
        user.0,
        image_data.len()
    );

    let store = store.into_inner();
    let outcome = web::block(move || {
        let pipeline = store.get()?;
        let prediction = pipeline.predict(&image_data)?;
        Ok::<_, crate::inference::pipeline::PipelineError>((prediction, pipeline.labels().to_vec()))
    })
    .await
    .map_err(|e| {
        log::error!("Prediction request {} could not run: {}", request_id, e);
        ApiError::Internal
    })?;

    let (prediction, class_labels) = outcome.map_err(|e| {
        log::error!("Prediction request {} failed: {}", request_id, e);
        ApiError::from(e)
    })?;

    let recommendation = recommendations::for_label(&prediction.class_label);
    Ok(HttpResponse::Ok().json(PredictionResponse {
        class_label: prediction.class_label,
        confidence: prediction.confidence,
        probabilities: prediction.probabilities,
        class_labels,
        recommendation,
    }))
}

/// Collects the first non-empty multipart field, enforcing `limit`.
async fn read_first_file(payload: &mut Multipart, limit: usize) -> Result<Vec<u8>, ApiError> {
    while let Some(mut field) = payload.try_next().await? {
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if data.len() + chunk.len() > limit {
                return Err(ApiError::PayloadTooLarge(limit));
            }
            data.extend_from_slice(&chunk);
        }
        if !data.is_empty() {
            return Ok(data);
        }
    }
    Err(ApiError::MissingImage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::gate::AccessGate;
    use crate::config::{UserConfig, UserSecret};
    use crate::inference::classifier::Classifier;
    use crate::inference::pipeline::tests::{
        labels, png_bytes, FailingClassifier, FixedClassifier,
    };
    use crate::inference::pipeline::Pipeline;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use shared::{Credentials, ErrorResponse, LoginResponse};

    const BOUNDARY: &str = "----cacao-test-boundary";

    fn gate() -> AccessGate {
        let users = [UserConfig {
            username: "yeimer".into(),
            secret: UserSecret::Plain {
                password: "password123".into(),
            },
        }];
        AccessGate::from_config(&users, 4 /* bcrypt minimum cost */).unwrap()
    }

    fn basic(user: &str, pass: &str) -> (header::HeaderName, String) {
        let encoded = STANDARD.encode(format!("{}:{}", user, pass));
        (header::AUTHORIZATION, format!("Basic {}", encoded))
    }

    fn multipart_body(data: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"image\"; filename=\"pod.png\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn predict_request(data: &[u8], user: &str, pass: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/predict")
            .insert_header(basic(user, pass))
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(multipart_body(data))
    }

    macro_rules! app {
        ($classifier:expr) => {
            app!($classifier, 10 * 1024 * 1024)
        };
        ($classifier:expr, $limit:expr) => {{
            let classifier: Box<dyn Classifier> = Box::new($classifier);
            let store = ModelStore::preloaded(Pipeline::new(classifier, labels()));
            test::init_service(
                App::new()
                    .app_data(web::Data::new(gate()))
                    .app_data(web::Data::new(store))
                    .app_data(web::Data::new(UploadLimit($limit)))
                    .configure(configure_api),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn login_accepts_known_pair() {
        let app = app!(FixedClassifier::new(vec![0.9, 0.1]));
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(Credentials::new("yeimer", "password123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: LoginResponse = test::read_body_json(resp).await;
        assert!(body.authenticated);
    }

    #[actix_web::test]
    async fn login_rejects_other_pairs_with_generic_message() {
        let app = app!(FixedClassifier::new(vec![0.9, 0.1]));
        for (user, pass) in [("yeimer", "wrong"), ("ghost", "password123")] {
            let req = test::TestRequest::post()
                .uri("/api/login")
                .set_json(Credentials::new(user, pass))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: LoginResponse = test::read_body_json(resp).await;
            assert!(!body.authenticated);
            assert_eq!(body.message, "Incorrect username or password");
        }
    }

    #[actix_web::test]
    async fn predict_returns_label_confidence_and_advice() {
        let app = app!(FixedClassifier::new(vec![0.75, 0.25]));
        let req = predict_request(&png_bytes(300, 200), "yeimer", "password123").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: PredictionResponse = test::read_body_json(resp).await;
        assert_eq!(body.class_label, "Monilia");
        assert_eq!(body.confidence, 0.75);
        assert_eq!(body.class_labels, vec!["Monilia", "Sana"]);
        assert_eq!(body.recommendation.items.len(), 4);
    }

    #[actix_web::test]
    async fn predict_requires_valid_credentials() {
        let app = app!(FixedClassifier::new(vec![0.75, 0.25]));
        let req = predict_request(&png_bytes(8, 8), "yeimer", "nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn undecodable_upload_is_a_user_facing_error() {
        let app = app!(FixedClassifier::new(vec![0.75, 0.25]));
        let req = predict_request(b"%PDF-1.4 not an image", "yeimer", "password123").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "The uploaded file could not be read as an image");

        let health = test::TestRequest::get().uri("/api/health").to_request();
        assert_eq!(test::call_service(&app, health).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn classifier_failure_is_generic_error() {
        let app = app!(FailingClassifier);
        let req = predict_request(&png_bytes(16, 16), "yeimer", "password123").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.error.starts_with("There was an error running the prediction"));
        assert!(!body.error.contains("device lost"));
    }

    #[actix_web::test]
    async fn nan_scores_are_a_prediction_failure_not_a_result() {
        let app = app!(FixedClassifier::new(vec![f32::NAN, f32::NAN]));
        let req = predict_request(&png_bytes(16, 16), "yeimer", "password123").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(
            body.error,
            "There was an error running the prediction. Please try again later."
        );
    }

    #[actix_web::test]
    async fn oversized_upload_is_rejected() {
        let app = app!(FixedClassifier::new(vec![0.75, 0.25]), 16);
        let req = predict_request(&png_bytes(64, 64), "yeimer", "password123").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[actix_web::test]
    async fn logout_is_acknowledged() {
        let app = app!(FixedClassifier::new(vec![0.75, 0.25]));
        let req = test::TestRequest::post()
            .uri("/api/logout")
            .insert_header(basic("yeimer", "password123"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: LoginResponse = test::read_body_json(resp).await;
        assert!(!body.authenticated);
    }
}
