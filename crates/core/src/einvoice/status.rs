//! E-invoice lifecycle states.

use serde::{Deserialize, Serialize};

use super::error::EInvoiceError;

/// E-invoice lifecycle status.
///
/// `Draft` invoices have no IRN. Submission moves a draft to `IrnAssigned`;
/// authority callbacks drive it to one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EInvoiceStatus {
    /// No IRN assigned yet.
    Draft,
    /// The authority (or simulator) assigned an IRN.
    IrnAssigned,
    /// Accepted by the authority (terminal).
    Valid,
    /// Cancelled at the authority (terminal).
    Cancelled,
    /// Rejected by the authority (terminal).
    Invalid,
}

impl EInvoiceStatus {
    /// Returns the canonical wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::IrnAssigned => "IRN_ASSIGNED",
            Self::Valid => "VALID",
            Self::Cancelled => "CANCELLED",
            Self::Invalid => "INVALID",
        }
    }

    /// Returns true for states no forward transition leaves.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Valid | Self::Cancelled | Self::Invalid)
    }

    /// Returns true if the transition to `next` is allowed.
    ///
    /// - `Draft → IrnAssigned` (submission)
    /// - `IrnAssigned → Valid | Cancelled | Invalid` (authority callbacks)
    /// - any state → itself (idempotent redelivery under a fresh nonce)
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        match self {
            Self::Draft => next == Self::IrnAssigned,
            Self::IrnAssigned => next.is_terminal(),
            Self::Valid | Self::Cancelled | Self::Invalid => false,
        }
    }

    /// Validates the transition to `next`.
    ///
    /// # Errors
    ///
    /// Returns `EInvoiceError::InvalidTransition` when the move is not
    /// allowed by the state machine.
    pub fn ensure_transition_to(self, next: Self) -> Result<(), EInvoiceError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(EInvoiceError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for EInvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EInvoiceStatus {
    type Err = EInvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "IRN_ASSIGNED" => Ok(Self::IrnAssigned),
            "VALID" => Ok(Self::Valid),
            "CANCELLED" => Ok(Self::Cancelled),
            "INVALID" => Ok(Self::Invalid),
            other => Err(EInvoiceError::UnknownStatus(other.to_string())),
        }
    }
}
