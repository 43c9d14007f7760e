use super::gate::AccessGate;
use super::middleware::AuthenticatedUser;
use actix_web::{web, HttpResponse};
use shared::{Credentials, LoginResponse};

pub async fn login(gate: web::Data<AccessGate>, body: web::Json<Credentials>) -> HttpResponse {
    let credentials = body.into_inner();

    match gate.authenticate(&credentials.username, &credentials.password) {
        Ok(()) => {
            log::info!("User {} logged in", credentials.username);
            HttpResponse::Ok().json(LoginResponse {
                authenticated: true,
                message: "Login successful".to_string(),
            })
        }
        Err(e) => {
            log::warn!("Failed login attempt for {}", credentials.username);
            HttpResponse::Unauthorized().json(LoginResponse {
                authenticated: false,
                message: e.to_string(),
            })
        }
    }
}

pub async fn logout(user: AuthenticatedUser) -> HttpResponse {
    log::info!("User {} logged out", user.0);
    HttpResponse::Ok().json(LoginResponse {
        authenticated: false,
        message: "Session closed successfully".to_string(),
    })
}
