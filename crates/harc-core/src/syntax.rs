//! Assembly syntax selection.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Assembly text dialect used when printing instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssemblySyntax {
    /// Intel syntax: destination first, `size ptr [base + index*scale + disp]`.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "INTEL"))]
    Intel,
    /// AT&T syntax: source first, `%` registers, `$` immediates.
    #[cfg_attr(feature = "serde", serde(rename = "AT&T"))]
    Att,
}

impl AssemblySyntax {
    /// Configuration spelling of this syntax.
    pub const fn as_str(self) -> &'static str {
        match self {
            AssemblySyntax::Intel => "INTEL",
            AssemblySyntax::Att => "AT&T",
        }
    }
}

impl fmt::Display for AssemblySyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown syntax name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown assembly syntax `{0}` (expected INTEL or AT&T)")]
pub struct ParseSyntaxError(pub String);

impl FromStr for AssemblySyntax {
    type Err = ParseSyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "intel" => Ok(AssemblySyntax::Intel),
            "at&t" | "att" | "atnt" | "gas" => Ok(AssemblySyntax::Att),
            _ => Err(ParseSyntaxError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_syntax() {
        assert_eq!("INTEL".parse(), Ok(AssemblySyntax::Intel));
        assert_eq!("intel".parse(), Ok(AssemblySyntax::Intel));
        assert_eq!("AT&T".parse(), Ok(AssemblySyntax::Att));
        assert_eq!(" att ".parse(), Ok(AssemblySyntax::Att));
        assert!("masm".parse::<AssemblySyntax>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for syntax in [AssemblySyntax::Intel, AssemblySyntax::Att] {
            assert_eq!(syntax.to_string().parse(), Ok(syntax));
        }
        assert_eq!(AssemblySyntax::default(), AssemblySyntax::Intel);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_configuration_spelling() {
        let json = serde_json::to_string(&AssemblySyntax::Att).unwrap();
        assert_eq!(json, "\"AT&T\"");
        let back: AssemblySyntax = serde_json::from_str("\"INTEL\"").unwrap();
        assert_eq!(back, AssemblySyntax::Intel);
    }
}
