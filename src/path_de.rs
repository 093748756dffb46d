use serde::de::DeserializeOwned;

use crate::error::ExtractError;
use crate::schema::Record;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, ExtractError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(path_error)
}

/// Hand a cast record to a native struct.
pub fn from_record<T: DeserializeOwned>(record: &Record) -> Result<T, ExtractError> {
    let json = serde_json::to_value(record).map_err(|e| ExtractError {
        path: ".".to_string(),
        message: e.to_string(),
    })?;
    serde_path_to_error::deserialize::<_, T>(json).map_err(path_error)
}

fn path_error<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> ExtractError {
    let path = err.path().to_string();
    ExtractError { path, message: err.into_inner().to_string() }
}
