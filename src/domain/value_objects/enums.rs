//! # Vendor Enums
//!
//! Enumerations mirrored from the iiko Cloud API.
//!
//! - [`DeliveryStatus`] - Delivery order lifecycle
//! - [`DeliveryItemStatus`] - Cooking state of an order line
//! - [`OrderCreationStatus`] - Outcome of asynchronous order creation
//! - [`PaymentTypeKind`] - Payment classification
//! - [`OrderServiceType`] - How the order reaches the guest
//! - [`SexType`], [`ConsentStatus`] - Loyalty customer attributes
//! - [`WalletType`] - Loyalty wallet classification
//!
//! String enums serialize with their exact vendor spelling. Integer enums
//! (`SexType`, `ConsentStatus`, `WalletType`) serialize as JSON numbers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing enum values from strings or integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
    /// The provided integer code is not valid for the enum.
    InvalidCode(&'static str, u8),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
            Self::InvalidCode(enum_name, code) => {
                write!(f, "invalid {} code: {}", enum_name, code)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

/// Generates `as_str`, `Display` and `FromStr` for a vendor string enum.
macro_rules! vendor_str_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Returns the vendor spelling.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseEnumError::InvalidValue(stringify!($name), s.to_string())),
                }
            }
        }
    };
}

/// Generates the integer conversions for a vendor integer enum.
macro_rules! vendor_int_enum {
    ($name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ParseEnumError;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(ParseEnumError::InvalidCode(stringify!($name), code)),
                }
            }
        }
    };
}

/// Delivery order status.
///
/// Statuses advance roughly in declaration order; `Closed` and `Cancelled`
/// are terminal.
///
/// # Examples
///
/// ```
/// use iiko_client::domain::value_objects::enums::DeliveryStatus;
///
/// let status: DeliveryStatus = "OnWay".parse().unwrap();
/// assert_eq!(status, DeliveryStatus::OnWay);
/// assert!(!status.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// Created but not yet confirmed by the operator.
    Unconfirmed,
    /// Waiting for cooking to be scheduled.
    WaitCooking,
    /// Ready to be cooked.
    ReadyForCooking,
    /// Kitchen started cooking.
    CookingStarted,
    /// Kitchen finished cooking.
    CookingCompleted,
    /// Waiting for the courier.
    Waiting,
    /// Courier is on the way.
    OnWay,
    /// Handed to the guest.
    Delivered,
    /// Closed in the POS.
    Closed,
    /// Cancelled.
    Cancelled,
}

vendor_str_enum!(DeliveryStatus {
    Unconfirmed => "Unconfirmed",
    WaitCooking => "WaitCooking",
    ReadyForCooking => "ReadyForCooking",
    CookingStarted => "CookingStarted",
    CookingCompleted => "CookingCompleted",
    Waiting => "Waiting",
    OnWay => "OnWay",
    Delivered => "Delivered",
    Closed => "Closed",
    Cancelled => "Cancelled",
});

impl DeliveryStatus {
    /// Returns true if no further transitions are expected.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }
}

/// Cooking state of a single order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryItemStatus {
    /// Added to the order.
    Added,
    /// Cooking started.
    CookingStarted,
    /// Cooking finished.
    CookingComplete,
    /// Served.
    Served,
}

vendor_str_enum!(DeliveryItemStatus {
    Added => "Added",
    CookingStarted => "CookingStarted",
    CookingComplete => "CookingComplete",
    Served => "Served",
});

/// Outcome of asynchronous order creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderCreationStatus {
    /// The order was created.
    Success,
    /// Creation is still running.
    InProgress,
    /// Creation failed; see the accompanying error info.
    Error,
}

vendor_str_enum!(OrderCreationStatus {
    Success => "Success",
    InProgress => "InProgress",
    Error => "Error",
});

/// Payment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentTypeKind {
    /// Cash.
    Cash,
    /// Bank card.
    Card,
    /// iikoCard loyalty payment.
    IikoCard,
    /// External payment system.
    External,
}

vendor_str_enum!(PaymentTypeKind {
    Cash => "Cash",
    Card => "Card",
    IikoCard => "IikoCard",
    External => "External",
});

/// How the order reaches the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderServiceType {
    /// Dine-in.
    Common,
    /// Delivered by a courier.
    DeliveryByCourier,
    /// Picked up by the guest.
    DeliveryByClient,
}

vendor_str_enum!(OrderServiceType {
    Common => "Common",
    DeliveryByCourier => "DeliveryByCourier",
    DeliveryByClient => "DeliveryByClient",
});

/// Loyalty customer sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum SexType {
    /// Not specified.
    #[default]
    NotSpecified = 0,
    /// Male.
    Male = 1,
    /// Female.
    Female = 2,
}

vendor_int_enum!(SexType {
    NotSpecified = 0,
    Male = 1,
    Female = 2,
});

/// Consent to personal data processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum ConsentStatus {
    /// Unknown.
    #[default]
    Unknown = 0,
    /// Consent given.
    Given = 1,
    /// Consent revoked.
    Revoked = 2,
}

vendor_int_enum!(ConsentStatus {
    Unknown = 0,
    Given = 1,
    Revoked = 2,
});

/// Loyalty wallet classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum WalletType {
    /// Deposit or corporate nutrition.
    DepositOrCorporateNutrition = 0,
    /// Bonus program.
    BonusProgram = 1,
    /// Products program.
    ProductsProgram = 2,
    /// Discount program.
    DiscountProgram = 3,
    /// Certificate program.
    CertificateProgram = 4,
}

vendor_int_enum!(WalletType {
    DepositOrCorporateNutrition = 0,
    BonusProgram = 1,
    ProductsProgram = 2,
    DiscountProgram = 3,
    CertificateProgram = 4,
});
