use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier wrapper for persisted grants. Generated once, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantId(pub Uuid);

impl GrantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GrantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GrantId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// Rejected value for a closed string-set field, reported with the full
/// allowed list so the message doubles as user guidance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnumValue {
    column: &'static str,
    allowed: String,
}

impl InvalidEnumValue {
    fn new(column: &'static str, allowed: String) -> Self {
        Self { column, allowed }
    }
}

impl fmt::Display for InvalidEnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value in \"{}\". Allowed: {}.",
            self.column, self.allowed
        )
    }
}

impl std::error::Error for InvalidEnumValue {}

/// Geographic scope of the funding call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Local,
    National,
    International,
}

impl Order {
    pub const VALUES: [Self; 3] = [Self::Local, Self::National, Self::International];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::National => "National",
            Self::International => "International",
        }
    }

    pub fn allowed_values() -> String {
        join_labels(Self::VALUES.iter().map(|value| value.label()))
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::National
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Order {
    type Err = InvalidEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        find_by_label(&Self::VALUES, value)
            .ok_or_else(|| InvalidEnumValue::new("order", Self::allowed_values()))
    }
}

/// Kind of funding instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantType {
    #[serde(rename = "Grant-subsidy")]
    GrantSubsidy,
    Prize,
    Scholarship,
    Contract,
    Competition,
    Other,
}

impl GrantType {
    pub const VALUES: [Self; 6] = [
        Self::GrantSubsidy,
        Self::Prize,
        Self::Scholarship,
        Self::Contract,
        Self::Competition,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::GrantSubsidy => "Grant-subsidy",
            Self::Prize => "Prize",
            Self::Scholarship => "Scholarship",
            Self::Contract => "Contract",
            Self::Competition => "Competition",
            Self::Other => "Other",
        }
    }

    pub fn allowed_values() -> String {
        join_labels(Self::VALUES.iter().map(|value| value.label()))
    }
}

impl Default for GrantType {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for GrantType {
    type Err = InvalidEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        find_by_label(&Self::VALUES, value)
            .ok_or_else(|| InvalidEnumValue::new("type", Self::allowed_values()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Cop,
    Usd,
}

impl Currency {
    pub const VALUES: [Self; 2] = [Self::Cop, Self::Usd];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cop => "COP",
            Self::Usd => "USD",
        }
    }

    pub fn allowed_values() -> String {
        join_labels(Self::VALUES.iter().map(|value| value.label()))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Cop
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Currency {
    type Err = InvalidEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        find_by_label(&Self::VALUES, value)
            .ok_or_else(|| InvalidEnumValue::new("currency", Self::allowed_values()))
    }
}

/// Whether the organization currently satisfies the call's requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementStatus {
    Yes,
    No,
    Partially,
}

impl RequirementStatus {
    pub const VALUES: [Self; 3] = [Self::Yes, Self::No, Self::Partially];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Partially => "Partially",
        }
    }

    pub fn allowed_values() -> String {
        join_labels(Self::VALUES.iter().map(|value| value.label()))
    }
}

impl Default for RequirementStatus {
    fn default() -> Self {
        Self::No
    }
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for RequirementStatus {
    type Err = InvalidEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        find_by_label(&Self::VALUES, value)
            .ok_or_else(|| InvalidEnumValue::new("meetsRequirements", Self::allowed_values()))
    }
}

/// Lifecycle state of the funding call itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallStatus {
    Open,
    Closed,
    Evaluating,
}

impl CallStatus {
    pub const VALUES: [Self; 3] = [Self::Open, Self::Closed, Self::Evaluating];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Evaluating => "Evaluating",
        }
    }

    pub fn allowed_values() -> String {
        join_labels(Self::VALUES.iter().map(|value| value.label()))
    }
}

impl Default for CallStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for CallStatus {
    type Err = InvalidEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        find_by_label(&Self::VALUES, value)
            .ok_or_else(|| InvalidEnumValue::new("callStatus", Self::allowed_values()))
    }
}

/// Internal application-pipeline state for the opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsmStatus {
    #[serde(rename = "Pending to apply")]
    PendingToApply,
    Applied,
    Rejected,
    Approved,
    #[serde(rename = "Not applying")]
    NotApplying,
}

impl UsmStatus {
    pub const VALUES: [Self; 5] = [
        Self::PendingToApply,
        Self::Applied,
        Self::Rejected,
        Self::Approved,
        Self::NotApplying,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingToApply => "Pending to apply",
            Self::Applied => "Applied",
            Self::Rejected => "Rejected",
            Self::Approved => "Approved",
            Self::NotApplying => "Not applying",
        }
    }

    pub fn allowed_values() -> String {
        join_labels(Self::VALUES.iter().map(|value| value.label()))
    }
}

impl Default for UsmStatus {
    fn default() -> Self {
        Self::PendingToApply
    }
}

impl fmt::Display for UsmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for UsmStatus {
    type Err = InvalidEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        find_by_label(&Self::VALUES, value)
            .ok_or_else(|| InvalidEnumValue::new("usmStatus", Self::allowed_values()))
    }
}

fn find_by_label<T: Copy + fmt::Display>(values: &[T], raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    values
        .iter()
        .copied()
        .find(|value| value.to_string() == trimmed)
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

/// One funding opportunity as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    pub id: GrantId,
    pub name: String,
    pub entity: String,
    pub order: Order,
    #[serde(rename = "type")]
    pub grant_type: GrantType,
    pub sector: String,
    pub components: String,
    pub amount: f64,
    pub currency: Currency,
    pub meets_requirements: RequirementStatus,
    pub missing_requirements: String,
    pub deadline: NaiveDate,
    pub link: String,
    pub call_status: CallStatus,
    pub usm_status: UsmStatus,
}

/// Everything a grant carries except its identity; the unit of creation,
/// replacement, and CSV import.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantDraft {
    pub name: String,
    pub entity: String,
    pub order: Order,
    pub grant_type: GrantType,
    pub sector: String,
    pub components: String,
    pub amount: f64,
    pub currency: Currency,
    pub meets_requirements: RequirementStatus,
    pub missing_requirements: String,
    pub deadline: NaiveDate,
    pub link: String,
    pub call_status: CallStatus,
    pub usm_status: UsmStatus,
}

impl GrantDraft {
    /// Collection-invariant checks for manual entry. The deadline is already
    /// a parsed date by construction, so only the textual requirements and
    /// the amount bound remain.
    pub fn validation_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.trim().is_empty() {
            problems.push("field \"name\" must not be empty.".to_string());
        }
        if self.entity.trim().is_empty() {
            problems.push("field \"entity\" must not be empty.".to_string());
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            problems.push("field \"amount\" must be a non-negative number.".to_string());
        }
        problems
    }

    pub fn into_grant(self, id: GrantId) -> Grant {
        Grant {
            id,
            name: self.name,
            entity: self.entity,
            order: self.order,
            grant_type: self.grant_type,
            sector: self.sector,
            components: self.components,
            amount: self.amount,
            currency: self.currency,
            meets_requirements: self.meets_requirements,
            missing_requirements: self.missing_requirements,
            deadline: self.deadline,
            link: self.link,
            call_status: self.call_status,
            usm_status: self.usm_status,
        }
    }
}
