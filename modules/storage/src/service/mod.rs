pub mod fs;

use crate::config::OutputConfig;
use serde::Serialize;
use std::path::PathBuf;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to serialize YAML: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// The stage of the conversion which failed.
    pub fn stage(&self) -> &'static str {
        "write"
    }
}

/// Output formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Serialize a value, keeping the order of map keys as provided by the value.
    pub fn serialize<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<u8>, Error> {
        Ok(match self {
            Self::Json => {
                let mut data = serde_json::to_vec_pretty(value)?;
                data.push(b'\n');
                data
            }
            Self::Yaml => serde_yml::to_string(value)?.into_bytes(),
        })
    }
}

/// Serialize a value into all requested output files.
///
/// All formats are serialized before the first file is written. Each file is written to a
/// temporary file first and then moved into place.
#[instrument(skip(value), err(level=tracing::Level::INFO))]
pub fn emit<T: Serialize + ?Sized>(
    value: &T,
    config: &OutputConfig,
) -> Result<Vec<PathBuf>, Error> {
    let outputs = config
        .targets()
        .into_iter()
        .map(|(format, path)| Ok((format, path, format.serialize(value)?)))
        .collect::<Result<Vec<_>, Error>>()?;

    let mut result = Vec::with_capacity(outputs.len());
    for (format, path, data) in outputs {
        fs::write_atomic(&path, &data)?;
        log::info!("Wrote {format} output: {}", path.display());
        result.push(path);
    }

    Ok(result)
}

#[cfg(test)]
mod test {
    use super::*;
    use ovaljson_test_context::OvalContext;
    use serde::Serialize;
    use std::collections::BTreeMap;
    use test_context::test_context;
    use test_log::test;

    /// A map which serializes its entries in reverse alphabetical order.
    struct Reversed(BTreeMap<&'static str, u32>);

    impl Serialize for Reversed {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.0.iter().rev())
        }
    }

    fn reversed() -> Reversed {
        Reversed(BTreeMap::from([("a", 1), ("b", 2), ("c", 3)]))
    }

    #[test]
    fn keep_key_order() -> anyhow::Result<()> {
        let json = String::from_utf8(Format::Json.serialize(&reversed())?)?;
        assert_eq!(json, "{\n  \"c\": 3,\n  \"b\": 2,\n  \"a\": 1\n}\n");

        let yaml = String::from_utf8(Format::Yaml.serialize(&reversed())?)?;
        assert_eq!(yaml, "c: 3\nb: 2\na: 1\n");

        Ok(())
    }

    #[test_context(OvalContext)]
    #[test]
    fn emit_json_only(ctx: &OvalContext) -> anyhow::Result<()> {
        let config = OutputConfig::new(ctx.path("result"));

        let written = emit(&reversed(), &config)?;

        assert_eq!(written, vec![ctx.path("result.json")]);
        assert!(!ctx.path("result.yaml").exists());
        let value: serde_json::Value = serde_json::from_slice(&std::fs::read(&written[0])?)?;
        assert_eq!(value["b"], 2);

        Ok(())
    }

    #[test_context(OvalContext)]
    #[test]
    fn emit_json_and_yaml(ctx: &OvalContext) -> anyhow::Result<()> {
        let config = OutputConfig::new(ctx.path("result.json")).with_yaml(true);

        let written = emit(&reversed(), &config)?;

        assert_eq!(
            written,
            vec![ctx.path("result.json"), ctx.path("result.yaml")]
        );
        assert_eq!(
            std::fs::read_to_string(ctx.path("result.yaml"))?,
            "c: 3\nb: 2\na: 1\n"
        );

        Ok(())
    }

    #[test_context(OvalContext)]
    #[test]
    fn emit_into_missing_directory(ctx: &OvalContext) -> anyhow::Result<()> {
        let config = OutputConfig::new(ctx.path("missing/result"));

        let err = emit(&reversed(), &config).expect_err("must fail");

        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.stage(), "write");
        assert!(!ctx.path("missing").exists());

        Ok(())
    }
}
