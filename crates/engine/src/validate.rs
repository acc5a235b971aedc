//! Field-by-field validation and normalization of candidate records.
//!
//! Every write to the ledger store funnels through [`validate_expense`]
//! or [`validate_income`]. Both collect **all** violations before
//! failing, so a client gets one batched report instead of a
//! fix-one-resubmit loop. Partial updates pass the existing record;
//! omitted fields keep their prior values and the merged result is
//! re-validated as a whole.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    Amount, Currency, Expense, Income, PaymentMethod, ReceivedMethod, ValidationReport,
    ViolationKind,
};

const MAX_CATEGORY_LEN: usize = 50;
const MAX_SOURCE_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 200;
const MAX_MERCHANT_LEN: usize = 100;
const MAX_TAG_LEN: usize = 30;

const RECEIPT_PREFIX: &str = "attachments/receipts/";
const INCOME_DOC_PREFIX: &str = "attachments/income_docs/";

/// Candidate fields for creating or partially updating an expense.
///
/// Clearable optionals (`description`, `merchant`,
/// `receipt_image_path`) are doubly wrapped: the outer `None` means
/// "field omitted, keep the prior value", an inner `None` means "clear
/// the stored value".
#[derive(Clone, Debug, Default)]
pub struct ExpenseDraft {
    pub id: Option<Uuid>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub incurred_at: Option<DateTime<Utc>>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub description: Option<Option<String>>,
    pub merchant: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub receipt_image_path: Option<Option<String>>,
}

/// Candidate fields for creating or partially updating an income. Same
/// omit-versus-clear contract as [`ExpenseDraft`].
#[derive(Clone, Debug, Default)]
pub struct IncomeDraft {
    pub id: Option<Uuid>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub source: Option<String>,
    pub received_method: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub recorded_at: Option<DateTime<Utc>>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub attachment_path: Option<Option<String>>,
}

/// Validates an expense draft against the merged prior record (if any).
///
/// `category_names` is the exact-name snapshot of the category registry
/// at validation time. On create the returned record carries a fresh id
/// and `recorded_at = now`.
pub fn validate_expense(
    draft: &ExpenseDraft,
    existing: Option<&Expense>,
    category_names: &HashSet<String>,
    now: DateTime<Utc>,
) -> Result<Expense, ValidationReport> {
    let mut report = ValidationReport::default();

    check_immutable_id(&mut report, draft.id, existing.map(|e| e.id));
    check_immutable_recorded_at(&mut report, draft.recorded_at, existing.map(|e| e.recorded_at));

    let amount = amount_field(&mut report, draft.amount.as_deref(), existing.map(|e| e.amount));
    let currency = currency_field(
        &mut report,
        draft.currency.as_deref(),
        existing.map(|e| e.currency),
    );

    let category = required_text(
        &mut report,
        "category",
        draft.category.as_deref(),
        existing.map(|e| e.category.as_str()),
        MAX_CATEGORY_LEN,
    );
    if let Some(name) = &category
        && !category_names.contains(name)
    {
        report.push(
            "category",
            ViolationKind::UnknownCategory,
            format!("category \"{name}\" does not exist"),
        );
    }

    let payment_method = method_field(
        &mut report,
        "payment_method",
        draft.payment_method.as_deref(),
        existing.map(|e| e.payment_method),
        |raw| PaymentMethod::try_from(raw).map_err(|err| err.to_string()),
    );

    let incurred_at = instant_field(
        &mut report,
        "incurred_at",
        draft.incurred_at,
        existing.map(|e| e.incurred_at),
        now,
    );

    let description = optional_text(
        &mut report,
        "description",
        draft.description.as_ref().map(Option::as_deref),
        existing.and_then(|e| e.description.as_deref()),
        MAX_DESCRIPTION_LEN,
    );
    let merchant = optional_text(
        &mut report,
        "merchant",
        draft.merchant.as_ref().map(Option::as_deref),
        existing.and_then(|e| e.merchant.as_deref()),
        MAX_MERCHANT_LEN,
    );

    let tags = match &draft.tags {
        Some(raw) => normalize_tags(&mut report, raw),
        None => existing.map(|e| e.tags.clone()).unwrap_or_default(),
    };

    let receipt_image_path = path_field(
        &mut report,
        "receipt_image_path",
        draft.receipt_image_path.as_ref().map(Option::as_deref),
        existing.and_then(|e| e.receipt_image_path.as_deref()),
        RECEIPT_PREFIX,
    );

    if !report.is_empty() {
        return Err(report);
    }

    // All fields checked above; defaults below are unreachable.
    Ok(Expense {
        id: existing.map_or_else(Uuid::new_v4, |e| e.id),
        amount: amount.unwrap_or(Amount::ZERO),
        currency: currency.unwrap_or_else(fallback_currency),
        category: category.unwrap_or_default(),
        payment_method: payment_method.unwrap_or(PaymentMethod::Other),
        incurred_at: incurred_at.unwrap_or(now),
        recorded_at: existing.map_or(now, |e| e.recorded_at),
        description,
        merchant,
        tags,
        receipt_image_path,
    })
}

/// Validates an income draft against the merged prior record (if any).
pub fn validate_income(
    draft: &IncomeDraft,
    existing: Option<&Income>,
    now: DateTime<Utc>,
) -> Result<Income, ValidationReport> {
    let mut report = ValidationReport::default();

    check_immutable_id(&mut report, draft.id, existing.map(|i| i.id));
    check_immutable_recorded_at(&mut report, draft.recorded_at, existing.map(|i| i.recorded_at));

    let amount = amount_field(&mut report, draft.amount.as_deref(), existing.map(|i| i.amount));
    let currency = currency_field(
        &mut report,
        draft.currency.as_deref(),
        existing.map(|i| i.currency),
    );

    let source = required_text(
        &mut report,
        "source",
        draft.source.as_deref(),
        existing.map(|i| i.source.as_str()),
        MAX_SOURCE_LEN,
    );

    let received_method = method_field(
        &mut report,
        "received_method",
        draft.received_method.as_deref(),
        existing.map(|i| i.received_method),
        |raw| ReceivedMethod::try_from(raw).map_err(|err| err.to_string()),
    );

    let received_at = instant_field(
        &mut report,
        "received_at",
        draft.received_at,
        existing.map(|i| i.received_at),
        now,
    );

    let description = optional_text(
        &mut report,
        "description",
        draft.description.as_ref().map(Option::as_deref),
        existing.and_then(|i| i.description.as_deref()),
        MAX_DESCRIPTION_LEN,
    );

    let tags = match &draft.tags {
        Some(raw) => normalize_tags(&mut report, raw),
        None => existing.map(|i| i.tags.clone()).unwrap_or_default(),
    };

    let attachment_path = path_field(
        &mut report,
        "attachment_path",
        draft.attachment_path.as_ref().map(Option::as_deref),
        existing.and_then(|i| i.attachment_path.as_deref()),
        INCOME_DOC_PREFIX,
    );

    if !report.is_empty() {
        return Err(report);
    }

    Ok(Income {
        id: existing.map_or_else(Uuid::new_v4, |i| i.id),
        amount: amount.unwrap_or(Amount::ZERO),
        currency: currency.unwrap_or_else(fallback_currency),
        source: source.unwrap_or_default(),
        received_method: received_method.unwrap_or(ReceivedMethod::Other),
        received_at: received_at.unwrap_or(now),
        recorded_at: existing.map_or(now, |i| i.recorded_at),
        description,
        tags,
        attachment_path,
    })
}

fn fallback_currency() -> Currency {
    // Only reached when the report is non-empty, which short-circuits
    // before the record is built.
    Currency::try_from("XXX").unwrap_or_else(|_| unreachable!())
}

fn check_immutable_id(report: &mut ValidationReport, supplied: Option<Uuid>, prior: Option<Uuid>) {
    let Some(supplied) = supplied else { return };
    match prior {
        Some(prior) if supplied == prior => {}
        Some(_) => report.push("id", ViolationKind::Immutable, "id is immutable"),
        None => report.push("id", ViolationKind::Immutable, "id is assigned by the server"),
    }
}

fn check_immutable_recorded_at(
    report: &mut ValidationReport,
    supplied: Option<DateTime<Utc>>,
    prior: Option<DateTime<Utc>>,
) {
    let Some(supplied) = supplied else { return };
    match prior {
        Some(prior) if supplied == prior => {}
        Some(_) => report.push(
            "recorded_at",
            ViolationKind::Immutable,
            "recorded_at is immutable",
        ),
        None => report.push(
            "recorded_at",
            ViolationKind::Immutable,
            "recorded_at is assigned by the server",
        ),
    }
}

fn amount_field(
    report: &mut ValidationReport,
    candidate: Option<&str>,
    prior: Option<Amount>,
) -> Option<Amount> {
    match candidate {
        Some(raw) => match raw.parse::<Amount>() {
            Ok(amount) if amount.is_positive() => Some(amount),
            Ok(_) => {
                report.push(
                    "amount",
                    ViolationKind::InvalidAmount,
                    "amount must be greater than zero",
                );
                None
            }
            Err(err) => {
                report.push("amount", ViolationKind::InvalidAmount, err.to_string());
                None
            }
        },
        None => {
            if prior.is_none() {
                report.push("amount", ViolationKind::Missing, "amount is required");
            }
            prior
        }
    }
}

fn currency_field(
    report: &mut ValidationReport,
    candidate: Option<&str>,
    prior: Option<Currency>,
) -> Option<Currency> {
    match candidate {
        Some(raw) => match Currency::try_from(raw) {
            Ok(currency) => Some(currency),
            Err(err) => {
                report.push("currency", ViolationKind::InvalidCurrency, err.to_string());
                None
            }
        },
        None => {
            if prior.is_none() {
                report.push("currency", ViolationKind::Missing, "currency is required");
            }
            prior
        }
    }
}

fn method_field<M: Copy>(
    report: &mut ValidationReport,
    field: &'static str,
    candidate: Option<&str>,
    prior: Option<M>,
    parse: impl Fn(&str) -> Result<M, String>,
) -> Option<M> {
    match candidate {
        Some(raw) => match parse(raw) {
            Ok(method) => Some(method),
            Err(message) => {
                report.push(field, ViolationKind::InvalidMethod, message);
                None
            }
        },
        None => {
            if prior.is_none() {
                report.push(field, ViolationKind::Missing, format!("{field} is required"));
            }
            prior
        }
    }
}

fn instant_field(
    report: &mut ValidationReport,
    field: &'static str,
    candidate: Option<DateTime<Utc>>,
    prior: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let merged = candidate.or(prior);
    match merged {
        Some(instant) => {
            if instant > now {
                report.push(
                    field,
                    ViolationKind::FutureDate,
                    format!("{field} must not be in the future"),
                );
            }
            Some(instant)
        }
        None => {
            report.push(field, ViolationKind::Missing, format!("{field} is required"));
            None
        }
    }
}

fn required_text(
    report: &mut ValidationReport,
    field: &'static str,
    candidate: Option<&str>,
    prior: Option<&str>,
    max_len: usize,
) -> Option<String> {
    match candidate {
        Some(raw) => checked_text(report, field, raw, max_len),
        None => {
            if prior.is_none() {
                report.push(field, ViolationKind::Missing, format!("{field} is required"));
            }
            prior.map(ToOwned::to_owned)
        }
    }
}

fn optional_text(
    report: &mut ValidationReport,
    field: &'static str,
    candidate: Option<Option<&str>>,
    prior: Option<&str>,
    max_len: usize,
) -> Option<String> {
    match candidate {
        Some(Some(raw)) => checked_text(report, field, raw, max_len),
        // Explicit null clears the stored value.
        Some(None) => None,
        None => prior.map(ToOwned::to_owned),
    }
}

fn checked_text(
    report: &mut ValidationReport,
    field: &'static str,
    raw: &str,
    max_len: usize,
) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        report.push(field, ViolationKind::InvalidText, format!("{field} cannot be empty"));
        return None;
    }
    if trimmed.chars().count() > max_len {
        report.push(
            field,
            ViolationKind::InvalidText,
            format!("{field} must be at most {max_len} characters"),
        );
        return None;
    }
    Some(trimmed.to_owned())
}

/// Trims, drops empties, and de-duplicates case-sensitively, keeping the
/// first occurrence order.
fn normalize_tags(report: &mut ValidationReport, raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for value in raw {
        let tag = value.trim();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LEN {
            report.push(
                "tags",
                ViolationKind::InvalidText,
                format!("tags must be at most {MAX_TAG_LEN} characters"),
            );
            continue;
        }
        if seen.insert(tag.to_owned()) {
            tags.push(tag.to_owned());
        }
    }
    tags
}

fn path_field(
    report: &mut ValidationReport,
    field: &'static str,
    candidate: Option<Option<&str>>,
    prior: Option<&str>,
    prefix: &str,
) -> Option<String> {
    let raw = match candidate {
        Some(Some(raw)) => raw,
        // Explicit null clears the stored value.
        Some(None) => return None,
        None => return prior.map(ToOwned::to_owned),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        report.push(field, ViolationKind::InvalidPath, format!("{field} cannot be empty"));
        return None;
    }
    if trimmed.starts_with('/') {
        report.push(
            field,
            ViolationKind::InvalidPath,
            format!("{field} must be a relative path"),
        );
        return None;
    }
    if trimmed.split('/').any(|part| part == "..") {
        report.push(
            field,
            ViolationKind::InvalidPath,
            format!("{field} must not contain '..' components"),
        );
        return None;
    }
    if !trimmed.starts_with(prefix) || trimmed.len() == prefix.len() {
        report.push(
            field,
            ViolationKind::InvalidPath,
            format!("{field} must point inside '{prefix}'"),
        );
        return None;
    }
    Some(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn groceries() -> HashSet<String> {
        HashSet::from(["Groceries".to_string()])
    }

    fn base_draft(now: DateTime<Utc>) -> ExpenseDraft {
        ExpenseDraft {
            amount: Some("10.50".to_string()),
            currency: Some("EUR".to_string()),
            category: Some("Groceries".to_string()),
            payment_method: Some("cash".to_string()),
            incurred_at: Some(now - Duration::hours(1)),
            ..Default::default()
        }
    }

    #[test]
    fn create_normalizes_and_assigns_server_fields() {
        let now = Utc::now();
        let mut draft = base_draft(now);
        draft.currency = Some(" eur ".to_string());
        draft.tags = Some(vec![
            " food ".to_string(),
            "food".to_string(),
            "".to_string(),
            "weekly".to_string(),
        ]);

        let expense = validate_expense(&draft, None, &groceries(), now).unwrap();
        assert_eq!(expense.amount.to_string(), "10.50");
        assert_eq!(expense.currency.code(), "EUR");
        assert_eq!(expense.tags, vec!["food", "weekly"]);
        assert_eq!(expense.recorded_at, now);
    }

    #[test]
    fn collects_every_violation_in_one_report() {
        let now = Utc::now();
        let draft = ExpenseDraft {
            amount: Some("zero".to_string()),
            currency: Some("EURO".to_string()),
            category: Some("Nope".to_string()),
            payment_method: Some("cheque".to_string()),
            incurred_at: Some(now + Duration::days(1)),
            ..Default::default()
        };

        let report = validate_expense(&draft, None, &groceries(), now).unwrap_err();
        assert!(report.has(ViolationKind::InvalidAmount));
        assert!(report.has(ViolationKind::InvalidCurrency));
        assert!(report.has(ViolationKind::UnknownCategory));
        assert!(report.has(ViolationKind::InvalidMethod));
        assert!(report.has(ViolationKind::FutureDate));
        assert_eq!(report.violations().len(), 5);
    }

    #[test]
    fn category_lookup_is_case_sensitive() {
        let now = Utc::now();
        let mut draft = base_draft(now);
        draft.category = Some("groceries".to_string());

        let report = validate_expense(&draft, None, &groceries(), now).unwrap_err();
        assert!(report.has(ViolationKind::UnknownCategory));
    }

    #[test]
    fn missing_required_fields_on_create() {
        let now = Utc::now();
        let report =
            validate_expense(&ExpenseDraft::default(), None, &groceries(), now).unwrap_err();
        assert!(report.has(ViolationKind::Missing));
        assert_eq!(report.violations().len(), 5);
    }

    #[test]
    fn partial_update_keeps_omitted_fields() {
        let now = Utc::now();
        let existing =
            validate_expense(&base_draft(now), None, &groceries(), now).unwrap();

        let patch = ExpenseDraft {
            tags: Some(vec!["market".to_string()]),
            ..Default::default()
        };
        let updated = validate_expense(&patch, Some(&existing), &groceries(), now).unwrap();

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.amount, existing.amount);
        assert_eq!(updated.category, existing.category);
        assert_eq!(updated.recorded_at, existing.recorded_at);
        assert_eq!(updated.tags, vec!["market"]);
    }

    #[test]
    fn immutable_fields_reject_changed_values() {
        let now = Utc::now();
        let existing =
            validate_expense(&base_draft(now), None, &groceries(), now).unwrap();

        let patch = ExpenseDraft {
            id: Some(Uuid::new_v4()),
            recorded_at: Some(now + Duration::seconds(5)),
            ..Default::default()
        };
        let report = validate_expense(&patch, Some(&existing), &groceries(), now).unwrap_err();
        assert!(report.has(ViolationKind::Immutable));
        assert_eq!(report.violations().len(), 2);

        // Echoing back the unchanged values is fine.
        let echo = ExpenseDraft {
            id: Some(existing.id),
            recorded_at: Some(existing.recorded_at),
            ..Default::default()
        };
        assert!(validate_expense(&echo, Some(&existing), &groceries(), now).is_ok());
    }

    #[test]
    fn income_requires_source_not_category() {
        let now = Utc::now();
        let draft = IncomeDraft {
            amount: Some("100.00".to_string()),
            currency: Some("EUR".to_string()),
            source: Some(" Acme Corp ".to_string()),
            received_method: Some("salary".to_string()),
            received_at: Some(now - Duration::hours(2)),
            ..Default::default()
        };
        let income = validate_income(&draft, None, now).unwrap();
        assert_eq!(income.source, "Acme Corp");
        assert_eq!(income.received_method, ReceivedMethod::Salary);
    }

    #[test]
    fn explicit_null_clears_optional_fields() {
        let now = Utc::now();
        let mut draft = base_draft(now);
        draft.merchant = Some(Some("Corner Shop".to_string()));
        draft.description = Some(Some("weekly run".to_string()));
        let existing = validate_expense(&draft, None, &groceries(), now).unwrap();
        assert_eq!(existing.merchant.as_deref(), Some("Corner Shop"));

        // Inner None is the deserialized form of a JSON null.
        let patch = ExpenseDraft {
            merchant: Some(None),
            ..Default::default()
        };
        let updated = validate_expense(&patch, Some(&existing), &groceries(), now).unwrap();
        assert_eq!(updated.merchant, None);
        // Omitted fields are untouched.
        assert_eq!(updated.description.as_deref(), Some("weekly run"));
    }

    #[test]
    fn attachment_paths_stay_inside_their_area() {
        let now = Utc::now();
        let mut draft = base_draft(now);
        draft.receipt_image_path = Some(Some("attachments/receipts/../secret.png".to_string()));
        let report = validate_expense(&draft, None, &groceries(), now).unwrap_err();
        assert!(report.has(ViolationKind::InvalidPath));

        let mut draft = base_draft(now);
        draft.receipt_image_path = Some(Some("attachments/receipts/jan/r1.png".to_string()));
        let expense = validate_expense(&draft, None, &groceries(), now).unwrap();
        assert_eq!(
            expense.receipt_image_path.as_deref(),
            Some("attachments/receipts/jan/r1.png")
        );
    }
}
