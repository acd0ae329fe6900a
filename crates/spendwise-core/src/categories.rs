//! Budget category taxonomy
//!
//! The closed, ordered set of labels a transaction may carry. The set is fixed
//! at build time and `Other` is always a member.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Groceries,
    Rent,
    Utilities,
    Transportation,
    Entertainment,
    DiningOut,
    Shopping,
    Travel,
    Health,
    Education,
    PersonalCare,
    Gifts,
    Investments,
    Savings,
    Salary,
    /// Catch-all for anything outside the taxonomy
    Other,
}

impl Category {
    /// Display label, as offered in the transaction form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::Rent => "Rent",
            Self::Utilities => "Utilities",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::DiningOut => "Dining Out",
            Self::Shopping => "Shopping",
            Self::Travel => "Travel",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::PersonalCare => "Personal Care",
            Self::Gifts => "Gifts",
            Self::Investments => "Investments",
            Self::Savings => "Savings",
            Self::Salary => "Salary",
            Self::Other => "Other",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [Category] {
        &[
            Self::Groceries,
            Self::Rent,
            Self::Utilities,
            Self::Transportation,
            Self::Entertainment,
            Self::DiningOut,
            Self::Shopping,
            Self::Travel,
            Self::Health,
            Self::Education,
            Self::PersonalCare,
            Self::Gifts,
            Self::Investments,
            Self::Savings,
            Self::Salary,
            Self::Other,
        ]
    }

    /// Look up a category by its exact label
    pub fn from_label(label: &str) -> Option<Category> {
        Self::all().iter().copied().find(|c| c.as_str() == label)
    }

    /// Whether `label` names a member of the taxonomy
    pub fn is_member(label: &str) -> bool {
        Self::from_label(label).is_some()
    }

    /// Comma-separated label list for embedding in prompts
    pub fn prompt_list() -> String {
        Self::all()
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
