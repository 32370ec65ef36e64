/// ASL Citizen isolated-sign loader.
pub mod asl_citizen;
/// How2Sign continuous-signing loader.
pub mod how2sign;

pub use asl_citizen::AslCitizen;
pub use how2sign::How2Sign;

use crate::config::DatasetConfig;
use crate::constants;
use crate::errors::DatasetError;
use crate::source::DatasetBuilder;

/// Names accepted by `builder_for`.
pub fn names() -> [&'static str; 2] {
    [constants::asl_citizen::NAME, constants::how2sign::NAME]
}

/// Default config of a registered dataset.
pub fn default_config(name: &str) -> Result<DatasetConfig, DatasetError> {
    match name {
        constants::asl_citizen::NAME => Ok(AslCitizen::default_config()),
        constants::how2sign::NAME => Ok(How2Sign::default_config()),
        other => Err(unknown_dataset(other)),
    }
}

/// Boxed builder for a registered dataset.
pub fn builder_for(
    name: &str,
    config: DatasetConfig,
) -> Result<Box<dyn DatasetBuilder>, DatasetError> {
    match name {
        constants::asl_citizen::NAME => Ok(Box::new(AslCitizen::new(config))),
        constants::how2sign::NAME => Ok(Box::new(How2Sign::new(config))),
        other => Err(unknown_dataset(other)),
    }
}

fn unknown_dataset(name: &str) -> DatasetError {
    DatasetError::Configuration(format!(
        "unknown dataset '{name}' (available: {})",
        names().join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_known_names() {
        for name in names() {
            let builder = builder_for(name, default_config(name).unwrap()).unwrap();
            assert_eq!(builder.name(), name);
            builder.info().unwrap();
        }
    }

    #[test]
    fn registry_rejects_unknown_names() {
        assert!(matches!(
            builder_for("signbank", DatasetConfig::default()),
            Err(DatasetError::Configuration(_))
        ));
        assert!(default_config("signbank").is_err());
    }
}
