//! Status enums for orders and invoices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Persisted order lifecycle status.
///
/// The valid transitions are:
/// - ApprovalPending → InProgress (approve)
/// - InProgress → Completed (complete)
/// - ApprovalPending | InProgress → Cancelled (cancel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Waiting for approval.
    ApprovalPending,
    /// Approved and being fulfilled.
    InProgress,
    /// Fulfilled (terminal).
    Completed,
    /// Cancelled with a reason (terminal).
    Cancelled,
}

impl OrderStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApprovalPending => "approval_pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approval_pending" => Some(Self::ApprovalPending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further state change is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persisted invoice status.
///
/// Payment progress is not stored here; it is derived from allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued and live.
    #[default]
    Open,
    /// Cancelled with a reason (terminal).
    Cancelled,
}

impl InvoiceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further state change is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Colour family a status badge is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    /// Grey.
    Neutral,
    /// Blue.
    Info,
    /// Green.
    Success,
    /// Amber.
    Warning,
    /// Red.
    Danger,
}

/// Status shown to users for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDisplayStatus {
    /// Waiting for approval.
    ApprovalPending,
    /// In progress and not yet due.
    InProgress,
    /// In progress past its due date.
    Overdue,
    /// Completed.
    Completed,
    /// Cancelled.
    Cancelled,
}

impl OrderDisplayStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApprovalPending => "approval_pending",
            Self::InProgress => "in_progress",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable badge label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ApprovalPending => "Approval Pending",
            Self::InProgress => "In Progress",
            Self::Overdue => "Overdue",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Badge colour family.
    #[must_use]
    pub fn tone(&self) -> BadgeTone {
        match self {
            Self::ApprovalPending => BadgeTone::Warning,
            Self::InProgress => BadgeTone::Info,
            Self::Overdue | Self::Cancelled => BadgeTone::Danger,
            Self::Completed => BadgeTone::Success,
        }
    }
}

impl fmt::Display for OrderDisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status shown to users for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceDisplayStatus {
    /// Nothing paid, not yet due.
    Open,
    /// Something paid, not yet due.
    PartiallyPaid,
    /// Past due and not fully paid.
    Overdue,
    /// Fully paid.
    Settled,
    /// Cancelled.
    Cancelled,
}

impl InvoiceDisplayStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::PartiallyPaid => "partially_paid",
            Self::Overdue => "overdue",
            Self::Settled => "settled",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable badge label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::PartiallyPaid => "Partially Paid",
            Self::Overdue => "Overdue",
            Self::Settled => "Settled",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Badge colour family.
    #[must_use]
    pub fn tone(&self) -> BadgeTone {
        match self {
            Self::Open => BadgeTone::Neutral,
            Self::PartiallyPaid => BadgeTone::Info,
            Self::Overdue | Self::Cancelled => BadgeTone::Danger,
            Self::Settled => BadgeTone::Success,
        }
    }
}

impl fmt::Display for InvoiceDisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
