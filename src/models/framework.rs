use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The test runner a workspace uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    Jest,
    Vitest,
    Mocha,
    UnityEditmode,
    UnityPlaymode,
    #[default]
    Unknown,
}

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::Jest => "jest",
            Framework::Vitest => "vitest",
            Framework::Mocha => "mocha",
            Framework::UnityEditmode => "unity-editmode",
            Framework::UnityPlaymode => "unity-playmode",
            Framework::Unknown => "unknown",
        }
    }

    pub fn is_unity(&self) -> bool {
        matches!(self, Framework::UnityEditmode | Framework::UnityPlaymode)
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jest" => Ok(Framework::Jest),
            "vitest" => Ok(Framework::Vitest),
            "mocha" => Ok(Framework::Mocha),
            "unity-editmode" => Ok(Framework::UnityEditmode),
            "unity-playmode" => Ok(Framework::UnityPlaymode),
            "unknown" => Ok(Framework::Unknown),
            other => Err(format!("unknown framework '{}'", other)),
        }
    }
}
