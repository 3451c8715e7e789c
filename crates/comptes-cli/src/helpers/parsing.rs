//! Parsing helpers for dates, amounts, lists and JSON transaction payloads.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use comptes_core::storage::{NewTransaction, TransactionPatch};

use crate::errors::CliError;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Parse a date relative to the current time.
pub fn parse_date(value: &str) -> anyhow::Result<DateTime<Utc>> {
    parse_date_at(value, Utc::now())
}

/// Parse `today`/`yesterday`/`tomorrow`, RFC 3339, or one of the day-first
/// and ISO layouts. Dates without an offset are read as UTC.
pub fn parse_date_at(value: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let trimmed = value.trim();
    match trimmed.to_lowercase().as_str() {
        "today" => return Ok(now),
        "yesterday" => return Ok(now - Duration::days(1)),
        "tomorrow" => return Ok(now + Duration::days(1)),
        _ => {}
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            let naive = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow::anyhow!("Invalid date value: {}", value))?;
            return Ok(naive.and_utc());
        }
    }

    Err(CliError::invalid_input_with_hint(
        format!("unable to parse date: {}", value),
        "Use YYYY-MM-DD, DD/MM/YYYY, today, yesterday or tomorrow.",
    )
    .into())
}

/// Parse a signed decimal amount. A comma decimal separator is accepted.
pub fn parse_amount(value: &str) -> anyhow::Result<Decimal> {
    let normalised = value.trim().replace(',', ".");
    Decimal::from_str(&normalised)
        .map_err(|_| CliError::invalid_input(format!("invalid amount: {}", value)).into())
}

/// Split a comma-separated list, dropping blanks.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Transaction fields as given on the command line in JSON form.
///
/// Dates accept the same layouts as `--date`.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TransactionInput {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            CliError::invalid_input_with_hint(
                format!("failed to parse JSON: {}", e),
                r#"Example: '{"account":"BANQUE","amount":-25.50,"description":"Courses"}'"#,
            )
            .into()
        })
    }

    /// Build a new transaction. Missing account and description are left
    /// empty for session defaults and the required-field check to handle.
    pub fn into_new(self) -> anyhow::Result<NewTransaction> {
        let mut new = NewTransaction::new(
            self.account.unwrap_or_default(),
            self.amount.unwrap_or_default(),
            self.description.unwrap_or_default(),
        );
        new.id = self.id.filter(|id| !id.trim().is_empty());
        new.categories = self.categories.unwrap_or_default();
        new.tags = self.tags.unwrap_or_default();
        new.date = parse_optional_date(self.date.as_deref())?;
        new.created_at = parse_optional_date(self.created_at.as_deref())?;
        Ok(new)
    }

    /// Build an edit patch from the fields that are present.
    pub fn into_patch(self) -> anyhow::Result<TransactionPatch> {
        Ok(TransactionPatch {
            account: self.account.filter(|a| !a.is_empty()),
            date: parse_optional_date(self.date.as_deref())?,
            amount: self.amount,
            description: self.description.filter(|d| !d.is_empty()),
            categories: self.categories,
            tags: self.tags,
        })
    }
}

fn parse_optional_date(value: Option<&str>) -> anyhow::Result<Option<DateTime<Utc>>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_date(v).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_dates() {
        assert_eq!(parse_date_at("today", noon()).unwrap(), noon());
        assert_eq!(
            parse_date_at("Yesterday", noon()).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 14, 12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date_at("tomorrow", noon()).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 16, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_date_layouts() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_date_at("2024-01-15", noon()).unwrap(), midnight);
        assert_eq!(parse_date_at("15/01/2024", noon()).unwrap(), midnight);
        assert_eq!(parse_date_at("15-01-2024", noon()).unwrap(), midnight);

        let afternoon = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        assert_eq!(parse_date_at("2024-01-15 14:30:00", noon()).unwrap(), afternoon);
        assert_eq!(parse_date_at("15/01/2024 14:30:00", noon()).unwrap(), afternoon);
        assert_eq!(
            parse_date_at("2024-01-15T14:30:00+00:00", noon()).unwrap(),
            afternoon
        );
    }

    #[test]
    fn test_bad_date_is_invalid_input() {
        let err = parse_date_at("next week", noon()).unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli.exit_code(), crate::constants::exit_codes::INVALID_INPUT);
        assert!(err.to_string().contains("unable to parse date: next week"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("-25.50").unwrap(), dec!(-25.50));
        assert_eq!(parse_amount("12,3").unwrap(), dec!(12.3));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("ALM, URG,,"), vec!["ALM", "URG"]);
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn test_json_input_into_new() {
        let input = TransactionInput::from_json(
            r#"{"account":"BANQUE","amount":-25.5,"description":"Courses","categories":["ALM"],"date":"15/01/2024","is_active":false}"#,
        )
        .unwrap();
        let new = input.into_new().unwrap();
        assert_eq!(new.account, "BANQUE");
        assert_eq!(new.amount, dec!(-25.5));
        assert_eq!(new.categories, vec!["ALM"]);
        assert_eq!(
            new.date,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap())
        );
        assert!(new.id.is_none());
    }

    #[test]
    fn test_json_input_into_patch_keeps_absent_fields_unset() {
        let patch = TransactionInput::from_json(r#"{"amount":-30.00}"#)
            .unwrap()
            .into_patch()
            .unwrap();
        assert_eq!(patch.amount, Some(dec!(-30.00)));
        assert!(patch.description.is_none());
        assert!(patch.categories.is_none());
    }

    #[test]
    fn test_malformed_json() {
        assert!(TransactionInput::from_json("{amount:").is_err());
    }
}
