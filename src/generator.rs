use std::fmt;
use std::io::{self, Cursor, Read};

use crate::ast::FunctionPrototype;
use crate::parser::parse_source;

pub const PREFIX: &str = "Prefix";
pub const LOAD_MACRO: &str = "LoadMacro";
pub const LOAD_LIB_HANDLE: &str = "LoadLibHandle";
pub const LOAD_LIB_NAME: &str = "LoadLibName";
pub const LOAD_LIB_FIELD_PREFIX: &str = "LoadLibFieldPrefix";

/// Option names in the order they are written to presets
pub const OPTION_NAMES: [&str; 5] = [
    PREFIX,
    LOAD_MACRO,
    LOAD_LIB_HANDLE,
    LOAD_LIB_NAME,
    LOAD_LIB_FIELD_PREFIX,
];

/// Naming options for generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prepended to every function name; its lowercase form names the typedefs
    pub prefix: String,
    pub load_macro: String,
    pub load_lib_handle: String,
    pub load_lib_name: String,
    pub load_lib_field_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: "FPL__WIN32_FUNC_".to_string(),
            load_macro: "FPL__WIN32_GET_FUNCTION_ADDRESS_RETURN".to_string(),
            load_lib_handle: "libraryHandle".to_string(),
            load_lib_name: "libraryName".to_string(),
            load_lib_field_prefix: "wapi->user.".to_string(),
        }
    }
}

impl Config {
    /// Build a config from named options. Options that are not given stay empty.
    pub fn from_properties<'a, I>(properties: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::empty();
        for (name, value) in properties {
            if !config.set(name, value) {
                log::debug!("ignoring unknown option '{}'", name);
            }
        }
        config
    }

    fn empty() -> Self {
        Self {
            prefix: String::new(),
            load_macro: String::new(),
            load_lib_handle: String::new(),
            load_lib_name: String::new(),
            load_lib_field_prefix: String::new(),
        }
    }

    /// Look up an option by its name, e.g. `"LoadMacro"`
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            PREFIX => &self.prefix,
            LOAD_MACRO => &self.load_macro,
            LOAD_LIB_HANDLE => &self.load_lib_handle,
            LOAD_LIB_NAME => &self.load_lib_name,
            LOAD_LIB_FIELD_PREFIX => &self.load_lib_field_prefix,
            _ => return None,
        };
        Some(value)
    }

    /// Set an option by its name. Returns false for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            PREFIX => &mut self.prefix,
            LOAD_MACRO => &mut self.load_macro,
            LOAD_LIB_HANDLE => &mut self.load_lib_handle,
            LOAD_LIB_NAME => &mut self.load_lib_name,
            LOAD_LIB_FIELD_PREFIX => &mut self.load_lib_field_prefix,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// All options as name/value pairs
    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &str)> {
        OPTION_NAMES
            .into_iter()
            .filter_map(move |name| self.get(name).map(|value| (name, value)))
    }
}

/// Parse prototype source and render it, folding any failure into a single
/// `Error: ...` line so the result can always be shown as-is.
pub fn generate(source: &str, config: &Config) -> String {
    match parse_source(source) {
        Ok(prototypes) => render(&prototypes, config),
        Err(e) => {
            log::debug!("generation failed: {}", e);
            format!("Error: {}\n", e)
        }
    }
}

/// Render the prototypes, declarations and load sections.
/// Renders nothing at all for an empty prototype list.
pub fn render(prototypes: &[FunctionPrototype], config: &Config) -> String {
    if prototypes.is_empty() {
        return String::new();
    }
    Sections { prototypes, config }.to_string()
}

struct Sections<'a> {
    prototypes: &'a [FunctionPrototype],
    config: &'a Config,
}

impl fmt::Display for Sections<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = &self.config.prefix;
        let type_prefix = prefix.to_lowercase();

        writeln!(f, "// Prototypes")?;
        for func in self.prototypes {
            let returns = join_names(&func.returns);
            let gap = if returns.is_empty() || returns.ends_with('*') {
                ""
            } else {
                " "
            };
            let args = func
                .args
                .iter()
                .map(|arg| join_names(&arg.names))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                f,
                "#define {prefix}{name}(name) {returns}{gap}name({args})",
                name = func.name
            )?;
            writeln!(f, "typedef {prefix}{name}({type_prefix}{name});", name = func.name)?;
        }

        writeln!(f)?;
        writeln!(f, "// Declarations")?;
        for func in self.prototypes {
            writeln!(f, "{type_prefix}{name} *{name};", name = func.name)?;
        }

        writeln!(f)?;
        writeln!(f, "// Load")?;
        let config = self.config;
        for func in self.prototypes {
            writeln!(
                f,
                "{}({}, {}, {}{name}, {type_prefix}{name}, \"{name}\");",
                config.load_macro,
                config.load_lib_handle,
                config.load_lib_name,
                config.load_lib_field_prefix,
                name = func.name
            )?;
        }
        Ok(())
    }
}

/// Join name tokens with single spaces, except around `*`
fn join_names(names: &[String]) -> String {
    let mut result = String::new();
    let mut prev: Option<&str> = None;
    for name in names {
        if let Some(prev) = prev {
            if prev != "*" && name != "*" {
                result.push(' ');
            }
        }
        result.push_str(name);
        prev = Some(name);
    }
    result
}

/// A reader that turns prototype source from `inner` into generated code
pub struct GeneratingReader<R: Read> {
    inner: R,
    config: Config,
    output: Option<Cursor<Vec<u8>>>,
}

impl<R: Read> GeneratingReader<R> {
    pub fn new(inner: R, config: Config) -> Self {
        Self {
            inner,
            config,
            output: None,
        }
    }

    /// Drain `inner` and generate from the whole input at once
    fn generate_output(&mut self) -> io::Result<Cursor<Vec<u8>>> {
        let mut source = String::new();
        self.inner.read_to_string(&mut source)?;
        Ok(Cursor::new(generate(&source, &self.config).into_bytes()))
    }
}

impl<R: Read> Read for GeneratingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.output.is_none() {
            let output = self.generate_output()?;
            self.output = Some(output);
        }

        match self.output.as_mut() {
            Some(output) => output.read(buf),
            None => Ok(0),
        }
    }
}
