//! Parameter file loading
//!
//! Parameter sets are TOML files under `$HWY_SW_ROOT/params`, deserialised
//! straight into the struct of the module that owns them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (HWY_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot read the parameter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot deserialise the parameters: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file relative to `$HWY_SW_ROOT/params`.
pub fn load<P: DeserializeOwned>(param_file_path: &str) -> Result<P, LoadError> {
    let params_dir = crate::host::get_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?
        .join("params");

    load_from(params_dir.join(param_file_path))
}

/// Load a parameter file from an explicit path.
pub fn load_from<P: DeserializeOwned, F: AsRef<Path>>(path: F) -> Result<P, LoadError> {
    let params_str = fs::read_to_string(path).map_err(LoadError::FileLoadError)?;
    parse(&params_str)
}

/// Parse parameters from the contents of a TOML file.
pub fn parse<P: DeserializeOwned>(params_str: &str) -> Result<P, LoadError> {
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct LaneParams {
        width_m: f64,
        count: usize,
    }

    #[test]
    fn test_parse() {
        let p: LaneParams = parse("width_m = 4.0\ncount = 3\n").unwrap();
        assert_eq!(
            p,
            LaneParams {
                width_m: 4.0,
                count: 3
            }
        );

        let missing: Result<LaneParams, _> = parse("width_m = 4.0\n");
        assert!(matches!(missing, Err(LoadError::DeserialiseError(_))));
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("hwy_util_no_such_params.toml");
        let result: Result<LaneParams, _> = load_from(&path);
        assert!(matches!(result, Err(LoadError::FileLoadError(_))));
    }
}
