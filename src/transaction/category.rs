//! The fixed set of categories offered to users and the category filter.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// The name of the filter option that matches every category.
pub const ALL_CATEGORIES: &str = "All";

/// A category for expenses and income, e.g. 'Food', 'Salary'.
///
/// Stores accept any category name, this list is what the app offers when
/// recording a transaction.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Salary,
    Freelance,
    Business,
    Investment,
    #[serde(rename = "Other Income")]
    OtherIncome,
    Food,
    Transportation,
    Shopping,
    Bills,
    Entertainment,
    Healthcare,
    Education,
    Other,
}

impl Category {
    const INCOME: [Category; 5] = [
        Category::Salary,
        Category::Freelance,
        Category::Business,
        Category::Investment,
        Category::OtherIncome,
    ];

    const EXPENSE: [Category; 8] = [
        Category::Food,
        Category::Transportation,
        Category::Shopping,
        Category::Bills,
        Category::Entertainment,
        Category::Healthcare,
        Category::Education,
        Category::Other,
    ];

    /// The categories offered for income.
    pub fn income() -> &'static [Category] {
        &Self::INCOME
    }

    /// The categories offered for expenses.
    pub fn expense() -> &'static [Category] {
        &Self::EXPENSE
    }

    /// The categories offered for a transaction of the given type.
    pub fn for_kind(is_income: bool) -> &'static [Category] {
        if is_income {
            Self::income()
        } else {
            Self::expense()
        }
    }

    /// Whether this is one of the income categories.
    pub fn is_income(self) -> bool {
        Self::INCOME.contains(&self)
    }

    /// The name that is stored with a transaction.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Business => "Business",
            Category::Investment => "Investment",
            Category::OtherIncome => "Other Income",
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The given name is not one of the fixed categories.
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("{0} is not a known category")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::INCOME
            .iter()
            .chain(Self::EXPENSE.iter())
            .find(|category| category.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Restricts a query to one category, or to none with [CategoryFilter::All].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Match every category.
    #[default]
    All,
    /// Match transactions whose category is exactly this name.
    Only(String),
}

impl CategoryFilter {
    /// Whether `category` passes the filter.
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(name) => name == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    /// Parses [ALL_CATEGORIES] as [CategoryFilter::All], anything else as an
    /// exact category name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_CATEGORIES {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.to_owned()))
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category.as_str().to_owned())
    }
}
