//! Top-level storefront sections used for navigation.

use serde::{Deserialize, Serialize};

/// A navigable section of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppSection {
    Home,
    Shop,
    Stylist,
    Cart,
    Admin,
}

impl AppSection {
    /// Every section, in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Shop,
        Self::Stylist,
        Self::Cart,
        Self::Admin,
    ];

    /// URL path of the section's page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Shop => "/shop",
            Self::Stylist => "/stylist",
            Self::Cart => "/cart",
            Self::Admin => "/admin",
        }
    }

    /// Navigation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "ホーム",
            Self::Shop => "コレクション",
            Self::Stylist => "AIスタイリスト",
            Self::Cart => "カート",
            Self::Admin => "管理モード",
        }
    }
}

impl std::fmt::Display for AppSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
