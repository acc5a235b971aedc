//! Fixed method enumerations for expenses and incomes.

use thiserror::Error;

/// Error produced when a method string is not in the allowed set.
///
/// `allowed` lists the accepted values, sorted, for error messages.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("must be one of: {allowed}")]
pub struct ParseMethodError {
    allowed: &'static str,
}

/// How an expense was paid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Cash,
    DebitCard,
    CreditCard,
    BankTransfer,
    MobilePayment,
    Other,
}

impl PaymentMethod {
    const ALLOWED: &'static str =
        "bank_transfer, cash, credit_card, debit_card, mobile_payment, other";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::DebitCard => "debit_card",
            Self::CreditCard => "credit_card",
            Self::BankTransfer => "bank_transfer",
            Self::MobilePayment => "mobile_payment",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = ParseMethodError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "debit_card" => Ok(Self::DebitCard),
            "credit_card" => Ok(Self::CreditCard),
            "bank_transfer" => Ok(Self::BankTransfer),
            "mobile_payment" => Ok(Self::MobilePayment),
            "other" => Ok(Self::Other),
            _ => Err(ParseMethodError {
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// How an income was received.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReceivedMethod {
    Salary,
    Bonus,
    Interest,
    Gift,
    Other,
}

impl ReceivedMethod {
    const ALLOWED: &'static str = "bonus, gift, interest, other, salary";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Bonus => "bonus",
            Self::Interest => "interest",
            Self::Gift => "gift",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for ReceivedMethod {
    type Error = ParseMethodError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "salary" => Ok(Self::Salary),
            "bonus" => Ok(Self::Bonus),
            "interest" => Ok(Self::Interest),
            "gift" => Ok(Self::Gift),
            "other" => Ok(Self::Other),
            _ => Err(ParseMethodError {
                allowed: Self::ALLOWED,
            }),
        }
    }
}
