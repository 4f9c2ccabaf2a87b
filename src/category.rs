//! The fixed set of spending categories and their presentation settings.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// What a transaction was for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Rent, mortgage and home costs.
    Housing,
    /// Groceries and eating out.
    Food,
    /// Fuel, public transport and fares.
    Transport,
    /// Power, water, internet and phone bills.
    Utilities,
    /// Medical costs and pharmacy.
    Health,
    /// Entertainment, hobbies and travel.
    Leisure,
    /// Salary and work expenses.
    Work,
    /// Anything that fits nowhere else.
    #[default]
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 8] = [
        Category::Housing,
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Health,
        Category::Leisure,
        Category::Work,
        Category::Other,
    ];

    /// The identifier used in forms and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Housing => "housing",
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Utilities => "utilities",
            Category::Health => "health",
            Category::Leisure => "leisure",
            Category::Work => "work",
            Category::Other => "other",
        }
    }

    /// The display settings for this category.
    pub fn option(self) -> &'static CategoryOption {
        // CATEGORY_OPTIONS is ordered the same as Category::ALL.
        &CATEGORY_OPTIONS[self as usize]
    }

    /// The label shown to users.
    pub fn label(self) -> &'static str {
        self.option().label
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category from its identifier, its label or one of its aliases.
    ///
    /// Matching ignores case and surrounding whitespace.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let needle = text.trim().to_lowercase();

        CATEGORY_OPTIONS
            .iter()
            .find(|option| {
                option.category.as_str() == needle
                    || option.label.to_lowercase() == needle
                    || option.aliases.contains(&needle.as_str())
            })
            .map(|option| option.category)
            .ok_or_else(|| Error::InvalidCategory(text.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == text)
            .ok_or(FromSqlError::InvalidType)
    }
}

/// How a category is presented in the UI.
#[derive(Debug, PartialEq)]
pub struct CategoryOption {
    /// The category these settings are for.
    pub category: Category,
    /// The name shown in the UI.
    pub label: &'static str,
    /// Hex colour used in charts.
    pub color: &'static str,
    /// Tailwind classes for the category badge.
    pub badge_style: &'static str,
    /// Other names accepted when importing, e.g. from older Portuguese exports.
    pub aliases: &'static [&'static str],
}

/// The presentation settings for every category, in the same order as [Category::ALL].
pub static CATEGORY_OPTIONS: [CategoryOption; 8] = [
    CategoryOption {
        category: Category::Housing,
        label: "Housing",
        color: "#6366f1",
        badge_style: "bg-indigo-100 text-indigo-800 dark:bg-indigo-900 dark:text-indigo-300",
        aliases: &["moradia", "rent"],
    },
    CategoryOption {
        category: Category::Food,
        label: "Food",
        color: "#f59e0b",
        badge_style: "bg-amber-100 text-amber-800 dark:bg-amber-900 dark:text-amber-300",
        aliases: &["alimentacao", "alimentação", "groceries"],
    },
    CategoryOption {
        category: Category::Transport,
        label: "Transport",
        color: "#0ea5e9",
        badge_style: "bg-sky-100 text-sky-800 dark:bg-sky-900 dark:text-sky-300",
        aliases: &["transporte"],
    },
    CategoryOption {
        category: Category::Utilities,
        label: "Utilities",
        color: "#a855f7",
        badge_style: "bg-purple-100 text-purple-800 dark:bg-purple-900 dark:text-purple-300",
        aliases: &["contas", "bills"],
    },
    CategoryOption {
        category: Category::Health,
        label: "Health",
        color: "#ef4444",
        badge_style: "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300",
        aliases: &["saude", "saúde"],
    },
    CategoryOption {
        category: Category::Leisure,
        label: "Leisure",
        color: "#ec4899",
        badge_style: "bg-pink-100 text-pink-800 dark:bg-pink-900 dark:text-pink-300",
        aliases: &["lazer"],
    },
    CategoryOption {
        category: Category::Work,
        label: "Work",
        color: "#10b981",
        badge_style: "bg-emerald-100 text-emerald-800 dark:bg-emerald-900 dark:text-emerald-300",
        aliases: &["trabalho", "salary"],
    },
    CategoryOption {
        category: Category::Other,
        label: "Other",
        color: "#71717a",
        badge_style: "bg-gray-100 text-gray-800 dark:bg-gray-700 dark:text-gray-300",
        aliases: &["outros", "misc"],
    },
];
