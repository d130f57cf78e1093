//! 请求校验
//!
//! 按字段顺序执行各项检查，返回全部违规（不在第一条处中断）：
//! 1. companySymbol: 必填、代码存在
//! 2. startDate: 必填、YYYY-MM-DD、不晚于 endDate
//! 3. endDate: 必填、YYYY-MM-DD、不早于 startDate
//! 4. email: 必填、邮箱格式
//! 5. startDate / endDate 不晚于今天
//!
//! 字段为空时跳过该字段的其余检查；日期比较只在两个日期都合法时进行

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{QuoteRequest, QuoteRequestPayload};
use crate::services::symbols::SymbolDirectory;

pub const FIELD_COMPANY_SYMBOL: &str = "companySymbol";
pub const FIELD_START_DATE: &str = "startDate";
pub const FIELD_END_DATE: &str = "endDate";
pub const FIELD_EMAIL: &str = "email";

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date regex"));

/// HTML5 邮箱格式
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("valid email regex")
});

/// 单条校验违规
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// 字段名（请求体中的名称）
    pub field: &'static str,
    pub message: String,
}

impl Violation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// 非空白值
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// 严格解析 YYYY-MM-DD，年份从 1 开始
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .filter(|date| date.year() >= 1)
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw)
}

fn check_required(
    field: &'static str,
    value: Option<&str>,
    message: &str,
    violations: &mut Vec<Violation>,
) {
    if value.is_none() {
        violations.push(Violation::new(field, message));
    }
}

/// 已填写但格式不对
fn check_date_format(
    field: &'static str,
    raw: Option<&str>,
    parsed: Option<NaiveDate>,
    message: &str,
    violations: &mut Vec<Violation>,
) {
    if raw.is_some() && parsed.is_none() {
        violations.push(Violation::new(field, message));
    }
}

fn check_not_future(
    field: &'static str,
    date: Option<NaiveDate>,
    today: NaiveDate,
    message: &str,
    violations: &mut Vec<Violation>,
) {
    if date.is_some_and(|d| d > today) {
        violations.push(Violation::new(field, message));
    }
}

/// 校验原始请求，通过时返回类型化请求
///
/// `today` 由调用方按配置时区计算
pub async fn validate(
    payload: &QuoteRequestPayload,
    symbols: &SymbolDirectory,
    today: NaiveDate,
) -> Result<QuoteRequest, Vec<Violation>> {
    let mut violations = Vec::new();

    let symbol = present(payload.company_symbol.as_deref());
    let start_raw = present(payload.start_date.as_deref());
    let end_raw = present(payload.end_date.as_deref());
    let email = present(payload.email.as_deref());

    let start = start_raw.and_then(parse_date);
    let end = end_raw.and_then(parse_date);
    let inverted = matches!((start, end), (Some(s), Some(e)) if s > e);

    // companySymbol
    check_required(FIELD_COMPANY_SYMBOL, symbol, "Company symbol is required.", &mut violations);
    if let Some(symbol) = symbol {
        if !symbols.is_valid_symbol(symbol).await {
            violations.push(Violation::new(
                FIELD_COMPANY_SYMBOL,
                format!("The company symbol \"{}\" is not valid.", symbol),
            ));
        }
    }

    // startDate
    check_required(FIELD_START_DATE, start_raw, "Start date is required.", &mut violations);
    check_date_format(
        FIELD_START_DATE,
        start_raw,
        start,
        "Start date must be a valid date in YYYY-MM-DD format.",
        &mut violations,
    );
    if inverted {
        violations.push(Violation::new(
            FIELD_START_DATE,
            "Start date must be less than or equal to end date.",
        ));
    }

    // endDate
    check_required(FIELD_END_DATE, end_raw, "End date is required.", &mut violations);
    check_date_format(
        FIELD_END_DATE,
        end_raw,
        end,
        "End date must be a valid date in YYYY-MM-DD format.",
        &mut violations,
    );
    if inverted {
        violations.push(Violation::new(
            FIELD_END_DATE,
            "End date must be greater than or equal to start date.",
        ));
    }

    // email
    check_required(FIELD_EMAIL, email, "Email is required.", &mut violations);
    if email.is_some_and(|e| !is_valid_email(e)) {
        violations.push(Violation::new(FIELD_EMAIL, "Email must be a valid email address."));
    }

    check_not_future(FIELD_START_DATE, start, today, "Start date cannot be in the future.", &mut violations);
    check_not_future(FIELD_END_DATE, end, today, "End date cannot be in the future.", &mut violations);

    match (symbol, start_raw, end_raw, start, end, email) {
        (Some(symbol), Some(start_raw), Some(end_raw), Some(start), Some(end), Some(email))
            if violations.is_empty() =>
        {
            Ok(QuoteRequest {
                symbol: symbol.to_string(),
                start_date: start_raw.to_string(),
                end_date: end_raw.to_string(),
                start,
                end,
                email: email.to_string(),
            })
        }
        _ => Err(violations),
    }
}
