use crate::service::Format;
use std::path::{Path, PathBuf};

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
#[command(next_help_heading = "Output")]
pub struct OutputConfig {
    /// Output file. A `.json` suffix is appended, unless already present.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Also write a YAML file, next to the JSON file.
    #[arg(long, env = "OVALJSON_YAML")]
    pub yaml: bool,
}

impl OutputConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            yaml: false,
        }
    }

    pub fn with_yaml(mut self, yaml: bool) -> Self {
        self.yaml = yaml;
        self
    }

    /// The path of the JSON file.
    pub fn json_path(&self) -> PathBuf {
        json_path(&self.output)
    }

    /// The path of the YAML file, if requested.
    pub fn yaml_path(&self) -> Option<PathBuf> {
        self.yaml.then(|| self.json_path().with_extension("yaml"))
    }

    /// All files to write, the JSON one first.
    pub fn targets(&self) -> Vec<(Format, PathBuf)> {
        let mut result = vec![(Format::Json, self.json_path())];
        if let Some(path) = self.yaml_path() {
            result.push((Format::Yaml, path));
        }
        result
    }
}

fn json_path(output: &Path) -> PathBuf {
    if output.extension().is_some_and(|ext| ext == "json") {
        return output.to_path_buf();
    }

    let mut path = output.as_os_str().to_owned();
    path.push(".json");
    path.into()
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("out", "out.json", "out.yaml")]
    #[case("out.json", "out.json", "out.yaml")]
    #[case("dir/ubuntu.jammy", "dir/ubuntu.jammy.json", "dir/ubuntu.jammy.yaml")]
    #[case("/tmp/out.json.bak", "/tmp/out.json.bak.json", "/tmp/out.json.bak.yaml")]
    fn paths(#[case] output: &str, #[case] json: &str, #[case] yaml: &str) {
        let config = OutputConfig::new(output);
        assert_eq!(config.json_path(), PathBuf::from(json));
        assert_eq!(config.yaml_path(), None);
        assert_eq!(config.targets(), vec![(Format::Json, PathBuf::from(json))]);

        let config = config.with_yaml(true);
        assert_eq!(config.yaml_path(), Some(PathBuf::from(yaml)));
        assert_eq!(
            config.targets(),
            vec![
                (Format::Json, PathBuf::from(json)),
                (Format::Yaml, PathBuf::from(yaml)),
            ]
        );
    }
}
