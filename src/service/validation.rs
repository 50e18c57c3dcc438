//! Request validation for client payloads and paging parameters.

use crate::error::{AppError, FieldError};
use crate::model::{ClientDraft, ClientPayload, ListParams, Pagination};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

pub const NAME_MAX_CHARS: usize = 100;
pub const EMAIL_MAX_CHARS: usize = 150;

/// One `@`, no whitespace, a dot somewhere in the domain.
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

static EMAIL_REGEX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN));

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create/update body. Every failing field is reported, not just the first.
    pub fn client(payload: ClientPayload) -> Result<ClientDraft, AppError> {
        let mut errors = Vec::new();

        let name = required_text("name", payload.name, NAME_MAX_CHARS, &mut errors);
        let surname = required_text("surname", payload.surname, NAME_MAX_CHARS, &mut errors);
        let email = required_text("email", payload.email, EMAIL_MAX_CHARS, &mut errors);
        if let Some(ref e) = email {
            if !is_email(e)? {
                errors.push(FieldError::new("email", "email must be a valid email address"));
            }
        }
        let birthdate = match payload.birthdate.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(FieldError::new("birthdate", "birthdate is required"));
                None
            }
            Some(s) => {
                let parsed = parse_timestamp(s);
                if parsed.is_none() {
                    errors.push(FieldError::new(
                        "birthdate",
                        "birthdate must be a date (YYYY-MM-DD) or an RFC 3339 timestamp",
                    ));
                }
                parsed
            }
        };

        match (name, surname, email, birthdate) {
            (Some(name), Some(surname), Some(email), Some(birthdate)) if errors.is_empty() => Ok(ClientDraft {
                name,
                surname,
                email,
                birthdate,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }

    /// Resolve paging defaults. Pages start at 1; `pageSize` above `max_page_size` is clamped.
    pub fn pagination(params: &ListParams, max_page_size: u32) -> Result<Pagination, AppError> {
        let mut errors = Vec::new();
        let page = bounded("page", params.page, Pagination::DEFAULT_PAGE, &mut errors);
        let page_size = bounded("pageSize", params.page_size, Pagination::DEFAULT_PAGE_SIZE, &mut errors);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        let max_page_size = max_page_size.max(1);
        if page_size > max_page_size {
            tracing::debug!(requested = page_size, max = max_page_size, "clamping pageSize");
        }
        Ok(Pagination {
            page,
            page_size: page_size.min(max_page_size),
        })
    }
}

fn required_text(field: &str, value: Option<String>, max_chars: usize, errors: &mut Vec<FieldError>) -> Option<String> {
    let value = value.as_deref().map(str::trim).unwrap_or("");
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", field)));
        return None;
    }
    if value.chars().count() > max_chars {
        errors.push(FieldError::new(
            field,
            format!("{} must be at most {} characters", field, max_chars),
        ));
        return None;
    }
    Some(value.to_string())
}

fn bounded(field: &str, value: Option<i64>, default: u32, errors: &mut Vec<FieldError>) -> u32 {
    match value {
        None => default,
        Some(n) if n < 1 => {
            errors.push(FieldError::new(field, format!("{} must be at least 1", field)));
            default
        }
        Some(n) => match u32::try_from(n) {
            Ok(n) => n,
            Err(_) => {
                errors.push(FieldError::new(field, format!("{} must be at most {}", field, u32::MAX)));
                default
            }
        },
    }
}

fn is_email(s: &str) -> Result<bool, AppError> {
    match &*EMAIL_REGEX {
        Ok(re) => Ok(re.is_match(s)),
        Err(e) => Err(AppError::Internal(format!("invalid email pattern: {}", e))),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, surname: &str, email: &str, birthdate: &str) -> ClientPayload {
        ClientPayload {
            id: None,
            name: Some(name.into()),
            surname: Some(surname.into()),
            email: Some(email.into()),
            birthdate: Some(birthdate.into()),
        }
    }

    fn field_errors(err: AppError) -> Vec<FieldError> {
        match err {
            AppError::Validation(errors) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn valid_payload_is_trimmed() {
        let draft = RequestValidator::client(payload(" Ana ", "Silva", " ana@x.com", "1990-01-01")).unwrap();
        assert_eq!(draft.name, "Ana");
        assert_eq!(draft.email, "ana@x.com");
        assert_eq!(draft.birthdate, Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn empty_payload_reports_every_field() {
        let errors = field_errors(RequestValidator::client(ClientPayload::default()).unwrap_err());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "surname", "email", "birthdate"]);
    }

    #[test]
    fn blank_name_is_required() {
        let errors = field_errors(RequestValidator::client(payload("   ", "Silva", "ana@x.com", "1990-01-01")).unwrap_err());
        assert_eq!(errors, vec![FieldError::new("name", "name is required")]);
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["not-an-email", "a@b", "a b@c.com", "a@@c.com", "@x.com"] {
            let errors = field_errors(RequestValidator::client(payload("Ana", "Silva", bad, "1990-01-01")).unwrap_err());
            assert_eq!(errors.len(), 1, "{}", bad);
            assert_eq!(errors[0].field, "email");
            assert!(errors[0].message.contains("email"));
        }
    }

    #[test]
    fn email_regex_is_built_once() {
        let first: *const Regex = EMAIL_REGEX.as_ref().unwrap();
        assert!(is_email("ana@x.com").unwrap());
        assert!(!is_email("ana@x").unwrap());
        let second: *const Regex = EMAIL_REGEX.as_ref().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn length_bounds_count_characters() {
        let at_limit = "é".repeat(NAME_MAX_CHARS);
        assert!(RequestValidator::client(payload(&at_limit, "Silva", "ana@x.com", "1990-01-01")).is_ok());

        let over = "a".repeat(NAME_MAX_CHARS + 1);
        let errors = field_errors(RequestValidator::client(payload("Ana", &over, "ana@x.com", "1990-01-01")).unwrap_err());
        assert_eq!(errors[0].field, "surname");
        assert_eq!(errors[0].message, "surname must be at most 100 characters");

        let long_email = format!("{}@x.com", "a".repeat(EMAIL_MAX_CHARS));
        let errors = field_errors(RequestValidator::client(payload("Ana", "Silva", &long_email, "1990-01-01")).unwrap_err());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn birthdate_accepts_several_forms() {
        let expected = Utc.with_ymd_and_hms(1990, 1, 1, 12, 30, 0).unwrap();
        for s in ["1990-01-01T12:30:00Z", "1990-01-01T14:30:00+02:00", "1990-01-01T12:30:00", "1990-01-01T12:30:00.000"] {
            let draft = RequestValidator::client(payload("Ana", "Silva", "ana@x.com", s)).unwrap();
            assert_eq!(draft.birthdate, expected, "{}", s);
        }
    }

    #[test]
    fn unparseable_birthdate_is_rejected() {
        let errors = field_errors(RequestValidator::client(payload("Ana", "Silva", "ana@x.com", "01/01/1990")).unwrap_err());
        assert_eq!(errors[0].field, "birthdate");
    }

    #[test]
    fn pagination_defaults() {
        let p = RequestValidator::pagination(&ListParams::default(), 100).unwrap();
        assert_eq!(p, Pagination { page: 1, page_size: 10 });
    }

    #[test]
    fn page_size_is_clamped_to_the_maximum() {
        let params = ListParams { page: Some(3), page_size: Some(10_000) };
        let p = RequestValidator::pagination(&params, 100).unwrap();
        assert_eq!(p, Pagination { page: 3, page_size: 100 });
    }

    #[test]
    fn non_positive_paging_is_rejected() {
        let params = ListParams { page: Some(0), page_size: Some(-5) };
        let errors = field_errors(RequestValidator::pagination(&params, 100).unwrap_err());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["page", "pageSize"]);
    }

    #[test]
    fn page_beyond_u32_is_rejected() {
        let params = ListParams { page: Some(i64::from(u32::MAX) + 1), page_size: None };
        let errors = field_errors(RequestValidator::pagination(&params, 100).unwrap_err());
        assert_eq!(errors[0].field, "page");
    }
}
