use serde::{Deserialize, Serialize};

/// Fixed set of spending categories. Not user-extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Shopping,
    Health,
    Housing,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Health => "Health",
            Self::Housing => "Housing",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup by label. Unknown labels are rejected rather
    /// than mapped to `Other`.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == lower)
    }

    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Food,
            Self::Transport,
            Self::Utilities,
            Self::Entertainment,
            Self::Shopping,
            Self::Health,
            Self::Housing,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
