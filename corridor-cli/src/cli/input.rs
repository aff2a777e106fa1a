//! Garden snapshot loading.

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

use corridor_core::Garden;
use serde::de::Error as _;
use serde_json::Value;
use tracing::{debug, instrument};

use super::commands::CliError;

/// Reads a garden snapshot from `path`, or from stdin when `path` is `-`.
///
/// Both `{"gardens": [...], "observations": [...]}` documents and bare garden
/// arrays are accepted. Observations are counted and otherwise ignored.
///
/// # Errors
/// Returns [`CliError::Io`] when the input cannot be read and
/// [`CliError::Snapshot`] when it is malformed or holds an invalid garden.
#[instrument(name = "cli.load_gardens", err, fields(path = %path.display()))]
pub fn load_gardens(path: &Path) -> Result<Vec<Garden>, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut raw = String::new();
    if path == Path::new("-") {
        io::stdin()
            .lock()
            .read_to_string(&mut raw)
            .map_err(io_error)?;
    } else {
        BufReader::new(File::open(path).map_err(io_error)?)
            .read_to_string(&mut raw)
            .map_err(io_error)?;
    }
    let gardens = parse_snapshot(&raw).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(gardens = gardens.len(), "snapshot loaded");
    Ok(gardens)
}

/// Parses a snapshot document or bare garden array.
pub(super) fn parse_snapshot(raw: &str) -> Result<Vec<Garden>, serde_json::Error> {
    let gardens = match serde_json::from_str(raw)? {
        Value::Object(mut document) => {
            if let Some(observations) = document.get("observations").and_then(Value::as_array) {
                debug!(observations = observations.len(), "ignoring observations");
            }
            document
                .remove("gardens")
                .ok_or_else(|| serde_json::Error::missing_field("gardens"))?
        }
        bare @ Value::Array(_) => bare,
        _ => {
            return Err(serde_json::Error::custom(
                "expected a snapshot object or an array of gardens",
            ));
        }
    };
    serde_json::from_value(gardens)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    const GARDEN: &str =
        r#"{"id":"g1","latitude":40.0,"longitude":-111.0,"qualityScore":60,"tier":"gold"}"#;

    #[test]
    fn single_garden_array_is_bare_input() {
        let gardens = parse_snapshot(&format!("[{GARDEN}]")).expect("valid array");
        assert_eq!(gardens.len(), 1);
        assert_eq!(gardens[0].id(), "g1");
    }

    #[test]
    fn observations_are_ignored() {
        let raw = format!(r#"{{"gardens":[{GARDEN}],"observations":[{{"any":"thing"}},1,"x"]}}"#);
        let gardens = parse_snapshot(&raw).expect("valid document");
        assert_eq!(gardens.len(), 1);
    }

    #[rstest]
    #[case::missing_gardens(r#"{"observations":[]}"#)]
    #[case::scalar("42")]
    #[case::not_json("gardens:")]
    #[case::bad_latitude(
        r#"[{"id":"x","latitude":91.0,"longitude":0.0,"qualityScore":1}]"#
    )]
    fn malformed_snapshots_are_rejected(#[case] raw: &str) {
        assert!(parse_snapshot(raw).is_err());
    }
}
