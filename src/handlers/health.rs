use actix_web::{web, HttpResponse, Result};
use chrono::Utc;

use crate::models::HealthStatus;
use crate::services::QuoteService;

pub async fn health_check(service: web::Data<QuoteService>) -> Result<HttpResponse> {
    let response = HealthStatus {
        status: "ok".to_string(),
        timestamp: Utc::now().with_timezone(&service.timezone()).to_rfc3339(),
    };
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::quote_service::tests::{service_with, RecordingNotifier};
    use actix_web::{test, App};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_check() {
        let service = web::Data::new(service_with(Arc::new(RecordingNotifier::default()), true));
        let app = test::init_service(
            App::new()
                .app_data(service)
                .configure(crate::handlers::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: HealthStatus = test::read_body_json(resp).await;
        assert_eq!(body.status, "ok");
        assert!(body.timestamp.ends_with("+00:00"));
    }
}
