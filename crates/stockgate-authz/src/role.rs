use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Operator,
    Manager,
    GlobalAdmin,
}

impl RoleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RoleKind::Operator => "operator",
            RoleKind::Manager => "manager",
            RoleKind::GlobalAdmin => "global_admin",
        }
    }

    /// Operators and managers only ever act inside their assigned location.
    pub fn requires_location(self) -> bool {
        !matches!(self, RoleKind::GlobalAdmin)
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "operator" | "cashier" => Ok(RoleKind::Operator),
            "manager" => Ok(RoleKind::Manager),
            "global_admin" | "super_admin" => Ok(RoleKind::GlobalAdmin),
            _ => Err(()),
        }
    }
}
