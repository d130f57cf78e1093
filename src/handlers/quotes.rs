//! 历史行情接口处理器
//!
//! POST /api/stock/quotes
//!
//! 请求体：
//! ```json
//! {"companySymbol": "AAPL", "startDate": "2023-01-01", "endDate": "2023-01-31", "email": "user@example.com"}
//! ```
//!
//! - 200: `{companySymbol, companyName, startDate, endDate, quotes: [{Date, Open, High, Low, Close, Volume}]}`
//! - 400: `{errors: [...]}` 校验失败
//! - 502: `{errors: [...]}` 邮件发送失败

use actix_web::{web, HttpResponse};

use crate::error::ServiceError;
use crate::models::QuoteRequestPayload;
use crate::services::QuoteService;

/// 查询历史行情并通过邮件发送 CSV
///
/// 请求体按原始字节读取，空或非法 JSON 交给校验层报告缺失字段
pub async fn get_quotes(
    service: web::Data<QuoteService>,
    body: web::Bytes,
) -> Result<HttpResponse, ServiceError> {
    let payload = QuoteRequestPayload::from_bytes(&body);
    let response = service.handle(&payload).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/stock").route("/quotes", web::post().to(get_quotes)));
}
