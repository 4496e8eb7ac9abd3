use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(DoctorStatus {
    Active => "active",
    Suspended => "suspended",
});

str_enum!(ThemeMode {
    Light => "light",
    Dark => "dark",
});

impl DoctorStatus {
    /// Chip label shown in tables and report cards.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Suspended => "Suspended",
        }
    }

    /// Status after a toggle: active becomes suspended, anything else becomes active.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Active => Self::Suspended,
            Self::Suspended => Self::Active,
        }
    }
}

impl Default for DoctorStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl ThemeMode {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Page background colour for this mode.
    pub fn background(&self) -> &'static str {
        match self {
            Self::Light => "#f5f5f5",
            Self::Dark => "#121212",
        }
    }

    /// Card ("paper") colour for this mode.
    pub fn paper(&self) -> &'static str {
        match self {
            Self::Light => "#fff",
            Self::Dark => "#1e1e1e",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Light => "#000",
            Self::Dark => "#fff",
        }
    }
}

impl Default for ThemeMode {
    fn default() -> Self {
        Self::Light
    }
}
