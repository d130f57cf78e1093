//! 历史行情请求处理
//!
//! 流程：校验 -> 查询公司名称 -> 生成行情 -> 发送邮件 -> 返回结果

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::ServiceError;
use crate::models::{QuoteRequestPayload, QuoteResponse};
use crate::services::notify::{Notifier, QuoteEmail};
use crate::services::symbols::SymbolDirectory;
use crate::services::validation::validate;
use crate::services::QuoteGenerator;

/// 历史行情服务
pub struct QuoteService {
    symbols: Arc<SymbolDirectory>,
    generator: QuoteGenerator,
    notifier: Arc<dyn Notifier>,
    /// 计算"今天"的时区
    timezone: Tz,
    /// 邮件发送失败时是否让请求失败
    strict_delivery: bool,
}

impl QuoteService {
    pub fn new(
        symbols: Arc<SymbolDirectory>,
        notifier: Arc<dyn Notifier>,
        timezone: Tz,
        strict_delivery: bool,
    ) -> Self {
        Self {
            symbols,
            generator: QuoteGenerator::new(),
            notifier,
            timezone,
            strict_delivery,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    /// 处理一次行情请求
    pub async fn handle(&self, payload: &QuoteRequestPayload) -> Result<QuoteResponse, ServiceError> {
        let request = validate(payload, &self.symbols, self.today())
            .await
            .map_err(|violations| {
                let fields: Vec<&str> = violations.iter().map(|v| v.field).collect();
                log::info!("请求校验失败，字段: {}", fields.join(", "));
                ServiceError::Validation(violations.into_iter().map(|v| v.message).collect())
            })?;

        // 校验已确认代码存在；若缓存恰好在两次读取之间刷新，退回到大写代码
        let company_name = match self.symbols.get_company_name(&request.symbol).await {
            Some(name) => name,
            None => {
                log::warn!("代码 {} 校验通过但未找到公司名称", request.symbol);
                request.symbol.to_uppercase()
            }
        };

        let quotes = self
            .generator
            .generate(&request.symbol, request.start, request.end);

        log::info!(
            "生成行情: {} {} ~ {}，共 {} 条",
            request.symbol.to_uppercase(),
            request.start_date,
            request.end_date,
            quotes.len()
        );

        let email = QuoteEmail::for_quotes(
            &request.email,
            &company_name,
            &request.start_date,
            &request.end_date,
            &quotes,
        );

        if let Err(e) = self.notifier.send(&email).await {
            if self.strict_delivery {
                log::error!("行情邮件发送失败: {}", e);
                return Err(ServiceError::Delivery(e));
            }
            log::warn!("行情邮件发送失败（已忽略）: {}", e);
        }

        Ok(QuoteResponse {
            company_symbol: request.symbol.to_uppercase(),
            company_name,
            start_date: request.start_date,
            end_date: request.end_date,
            quotes,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::SymbolRecord;
    use crate::services::notify::NotifyError;
    use crate::services::symbols::SymbolSource;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    pub struct OfflineSource;

    #[async_trait]
    impl SymbolSource for OfflineSource {
        async fn fetch(&self) -> Result<Vec<SymbolRecord>> {
            Err(anyhow!("offline"))
        }
    }

    /// 记录所有发送请求的测试通知
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<QuoteEmail>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn sent(&self) -> Vec<QuoteEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, email: &QuoteEmail) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                return Err(NotifyError::Transport("connection refused".to_string()));
            }
            Ok(())
        }
    }

    pub fn service_with(notifier: Arc<RecordingNotifier>, strict_delivery: bool) -> QuoteService {
        let symbols = Arc::new(SymbolDirectory::new(
            Arc::new(OfflineSource),
            Duration::from_secs(3600),
        ));
        QuoteService::new(symbols, notifier, chrono_tz::UTC, strict_delivery)
    }

    fn payload(symbol: &str, start: &str, end: &str) -> QuoteRequestPayload {
        QuoteRequestPayload {
            company_symbol: Some(symbol.to_string()),
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            email: Some("test@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_handle_success() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service_with(notifier.clone(), true);

        let response = service
            .handle(&payload("aapl", "2023-01-02", "2023-01-08"))
            .await
            .unwrap();

        assert_eq!(response.company_symbol, "AAPL");
        assert_eq!(response.company_name, "Apple Inc.");
        assert_eq!(response.start_date, "2023-01-02");
        assert_eq!(response.end_date, "2023-01-08");
        assert_eq!(response.quotes.len(), 5);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "test@example.com");
        assert_eq!(sent[0].subject, "Apple Inc.");
        assert_eq!(sent[0].body, "From 2023-01-02 to 2023-01-08");
    }

    #[tokio::test]
    async fn test_generation_uses_raw_symbol() {
        let service = service_with(Arc::new(RecordingNotifier::default()), true);

        let lower = service.handle(&payload("aapl", "2023-01-02", "2023-01-02")).await.unwrap();
        let upper = service.handle(&payload("AAPL", "2023-01-02", "2023-01-02")).await.unwrap();

        assert_eq!(lower.company_symbol, upper.company_symbol);
        assert_ne!(lower.quotes, upper.quotes);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_dispatch() {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = service_with(notifier.clone(), true);

        let result = service.handle(&payload("INVALIDXYZ123", "2023-01-02", "2023-01-06")).await;

        match result {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors, vec!["The company symbol \"INVALIDXYZ123\" is not valid."]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_strict_delivery_failure() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let service = service_with(notifier.clone(), true);

        let result = service.handle(&payload("MSFT", "2023-01-02", "2023-01-06")).await;

        assert!(matches!(result, Err(ServiceError::Delivery(_))));
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_lenient_delivery_failure_keeps_response() {
        let notifier = Arc::new(RecordingNotifier::failing());
        let service = service_with(notifier.clone(), false);

        let response = service
            .handle(&payload("MSFT", "2023-01-02", "2023-01-06"))
            .await
            .unwrap();

        assert_eq!(response.company_name, "Microsoft Corporation");
        assert_eq!(response.quotes.len(), 5);
    }
}
