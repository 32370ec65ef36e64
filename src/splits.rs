use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DatasetError;

pub use crate::constants::splits::ALL_SPLITS;

/// Named dataset partitions produced by a builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitLabel {
    /// Training split.
    Train,
    /// Validation split.
    Validation,
    /// Test split.
    Test,
}

impl SplitLabel {
    /// Canonical lowercase split name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SplitLabel::Train => "train",
            SplitLabel::Validation => "validation",
            SplitLabel::Test => "test",
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitLabel {
    type Err = DatasetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(SplitLabel::Train),
            "validation" | "val" | "dev" => Ok(SplitLabel::Validation),
            "test" => Ok(SplitLabel::Test),
            other => Err(DatasetError::Configuration(format!(
                "unknown split '{other}' (expected train, validation, or test)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_names_parse_with_aliases() {
        assert_eq!("train".parse::<SplitLabel>().unwrap(), SplitLabel::Train);
        assert_eq!("VAL".parse::<SplitLabel>().unwrap(), SplitLabel::Validation);
        assert_eq!(" test ".parse::<SplitLabel>().unwrap(), SplitLabel::Test);
        assert!("holdout".parse::<SplitLabel>().is_err());
    }

    #[test]
    fn split_label_serializes_lowercase() {
        let encoded = serde_json::to_string(&SplitLabel::Validation).unwrap();
        assert_eq!(encoded, "\"validation\"");
        assert_eq!(SplitLabel::Validation.to_string(), "validation");
    }

    #[test]
    fn all_splits_round_trip_through_names() {
        for split in ALL_SPLITS {
            assert_eq!(split.as_str().parse::<SplitLabel>().unwrap(), split);
        }
        let mut sorted = ALL_SPLITS;
        sorted.sort();
        assert_eq!(sorted, ALL_SPLITS);
    }
}
