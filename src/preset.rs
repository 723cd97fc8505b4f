//! Presets: named generator settings plus example source, stored as
//! `[Settings]` (`name=value` lines) and `[Sources]` (one source line each).

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::generator::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Settings,
    Sources,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preset {
    properties: Vec<(String, String)>,
    sources: Vec<String>,
}

impl Preset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a config and a source buffer, ready to be saved
    pub fn from_parts(config: &Config, source: &str) -> Self {
        let mut preset = Self::new();
        for (name, value) in config.properties() {
            preset.set_property(name, value);
        }
        for line in source.lines().filter(|l| !l.is_empty()) {
            preset.add_source(line);
        }
        preset
    }

    pub fn parse(text: &str) -> Self {
        let mut preset = Self::new();
        let mut section = Section::None;

        for line in text.lines() {
            if line.len() > 2 && line.starts_with('[') && line.ends_with(']') {
                section = match line[1..line.len() - 1].to_lowercase().as_str() {
                    "settings" => Section::Settings,
                    "sources" => Section::Sources,
                    other => {
                        log::debug!("skipping unknown preset section '{}'", other);
                        Section::None
                    }
                };
            } else if !line.is_empty() {
                match section {
                    Section::Settings => {
                        if let Some((name, value)) = line.split_once('=') {
                            preset.set_property(name, value);
                        }
                    }
                    Section::Sources => preset.add_source(line),
                    Section::None => {}
                }
            }
        }
        preset
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        log::info!("loaded preset {}", path.as_ref().display());
        Ok(Self::parse(&text))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.to_string())?;
        log::info!("saved preset {}", path.as_ref().display());
        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace a setting, keeping first-seen order
    pub fn set_property(&mut self, name: &str, value: &str) {
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name.to_string(), value.to_string())),
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn add_source(&mut self, line: &str) {
        self.sources.push(line.to_string());
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Source lines joined back into one buffer
    pub fn source(&self) -> String {
        self.sources.join("\n")
    }

    pub fn config(&self) -> Config {
        Config::from_properties(self.properties())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Settings]")?;
        for (name, value) in &self.properties {
            writeln!(f, "{}={}", name, value)?;
        }
        writeln!(f)?;
        writeln!(f, "[Sources]")?;
        for source in &self.sources {
            writeln!(f, "{}", source)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIN32: &str = "[Settings]\n\
                         Prefix=FPL__WIN32_FUNC_\n\
                         LoadMacro=LOAD\n\
                         \n\
                         [Sources]\n\
                         int a(int x)\n\
                         void b(void)\n";

    #[test]
    fn test_parse_sections() {
        let preset = Preset::parse(WIN32);
        assert_eq!(preset.property("Prefix"), Some("FPL__WIN32_FUNC_"));
        assert_eq!(preset.property("LoadMacro"), Some("LOAD"));
        assert_eq!(preset.sources(), &["int a(int x)", "void b(void)"]);
        assert_eq!(preset.source(), "int a(int x)\nvoid b(void)");
    }

    #[test]
    fn test_parse_value_keeps_later_equals() {
        let preset = Preset::parse("[settings]\nLoadLibFieldPrefix=a=b\nnoequals\n");
        assert_eq!(preset.property("LoadLibFieldPrefix"), Some("a=b"));
        assert_eq!(preset.properties().count(), 1);
    }

    #[test]
    fn test_parse_unknown_section_is_skipped() {
        let preset = Preset::parse("[Other]\nPrefix=X\n[Sources]\nint f()\n");
        assert_eq!(preset.property("Prefix"), None);
        assert_eq!(preset.sources().len(), 1);
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let preset = Preset::parse("[Settings]\nPrefix=A\nPrefix=B\n");
        assert_eq!(preset.property("Prefix"), Some("B"));
    }

    #[test]
    fn test_config_from_preset() {
        let config = Preset::parse(WIN32).config();
        assert_eq!(config.prefix, "FPL__WIN32_FUNC_");
        assert_eq!(config.load_macro, "LOAD");
        assert_eq!(config.load_lib_handle, "");
    }

    #[test]
    fn test_display_format() {
        let preset = Preset::parse(WIN32);
        assert_eq!(preset.to_string(), WIN32);
    }

    #[test]
    fn test_from_parts() {
        let preset = Preset::from_parts(&Config::default(), "int f(int a)\n\nvoid g()");
        assert_eq!(preset.property("LoadLibName"), Some("libraryName"));
        assert_eq!(preset.sources(), &["int f(int a)", "void g()"]);
        assert_eq!(preset.config(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("protgen-preset-{}.txt", std::process::id()));
        let preset = Preset::from_parts(&Config::default(), "int f(int a)");
        preset.save(&path).unwrap();
        let loaded = Preset::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, preset);
    }
}
