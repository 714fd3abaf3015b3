//! The label sets used by the pipelines.

use serde::{Deserialize, Serialize};

use crate::classifier::DispatchLabel;

const MEAL_ROUTER: &str = "You are a routing assistant. Classify the user's request into one of the following categories:
- BREAKFAST: If the user is asking for a breakfast recipe.
- LUNCH: If the user is asking for a lunch recipe.
- DINNER: If the user is asking for a dinner recipe.
- OTHER: For any other request.

Respond ONLY with the category name (BREAKFAST, LUNCH, DINNER, or OTHER).";

const RECIPE_ROUTER: &str =
    "Is the following user input asking for a cooking recipe? Respond with 'YES' or 'NO'.";

const BUTTER_INSPECTOR: &str = "You are a strict health inspector. Check the following recipe for the ingredient 'butter'. If it contains butter, respond with 'CONTAINS_BUTTER'. If it does not, respond with 'PASS'.";

/// Which meal a request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealLabel {
    Breakfast,
    Lunch,
    Dinner,
    Other,
}

impl DispatchLabel for MealLabel {
    const PRIORITY: &'static [Self] = &[Self::Breakfast, Self::Lunch, Self::Dinner];
    const DEFAULT: Self = Self::Other;

    fn keyword(self) -> &'static str {
        match self {
            Self::Breakfast => "BREAKFAST",
            Self::Lunch => "LUNCH",
            Self::Dinner => "DINNER",
            Self::Other => "OTHER",
        }
    }

    fn instruction() -> &'static str {
        MEAL_ROUTER
    }
}

/// Whether the user asked for a recipe at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeIntent {
    Yes,
    No,
}

impl DispatchLabel for RecipeIntent {
    const PRIORITY: &'static [Self] = &[Self::Yes];
    const DEFAULT: Self = Self::No;

    fn keyword(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }

    fn instruction() -> &'static str {
        RECIPE_ROUTER
    }
}

/// The butter inspector's verdict on a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectionVerdict {
    ContainsButter,
    Pass,
}

impl DispatchLabel for InspectionVerdict {
    const PRIORITY: &'static [Self] = &[Self::ContainsButter];
    const DEFAULT: Self = Self::Pass;

    fn keyword(self) -> &'static str {
        match self {
            Self::ContainsButter => "CONTAINS_BUTTER",
            Self::Pass => "PASS",
        }
    }

    fn instruction() -> &'static str {
        BUTTER_INSPECTOR
    }
}
