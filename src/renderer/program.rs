//! Shader programs
//!
//! Programs are WGSL sources looked up by name. The built-in sources are
//! compiled into the binary; a search directory can override any of them
//! with `<dir>/<name>.wgsl`.

use crate::context::WgpuContext;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a directory of WGSL overrides.
pub const SHADER_DIR_ENV: &str = "CUBEWORKS_SHADER_DIR";

const BUILTIN_PROGRAMS: &[(&str, &str)] = &[
    ("cubes", include_str!("../shaders/cubes.wgsl")),
    ("instancing", include_str!("../shaders/instancing.wgsl")),
    ("debug_rect", include_str!("../shaders/debug_rect.wgsl")),
];

/// Errors raised while loading a program.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("unknown program `{0}`")]
    NotFound(String),
    #[error("failed to read program `{name}` from {}", path.display())]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("program `{name}` has no `{entry}` entry point")]
    MissingEntry { name: String, entry: &'static str },
}

/// Where a program's source came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramOrigin {
    Builtin,
    File(PathBuf),
}

/// A loaded WGSL program with `vs_main` and `fs_main` entry points.
#[derive(Debug, Clone)]
pub struct Program {
    name: String,
    source: Cow<'static, str>,
    origin: ProgramOrigin,
}

impl Program {
    /// Vertex stage entry point every program provides.
    pub const VERTEX_ENTRY: &'static str = "vs_main";
    /// Fragment stage entry point every program provides.
    pub const FRAGMENT_ENTRY: &'static str = "fs_main";
    /// Boolean override that lets a program linearize its sRGB colors
    /// when drawing to an sRGB target.
    pub const SRGB_TARGET: &'static str = "SRGB_TARGET";

    fn new(
        name: &str,
        source: Cow<'static, str>,
        origin: ProgramOrigin,
    ) -> Result<Self, ProgramError> {
        for entry in [Self::VERTEX_ENTRY, Self::FRAGMENT_ENTRY] {
            if !declares_fn(&source, entry) {
                return Err(ProgramError::MissingEntry {
                    name: name.to_string(),
                    entry,
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            source,
            origin,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn origin(&self) -> &ProgramOrigin {
        &self.origin
    }

    /// Whether the source declares the override constant `name`.
    pub fn declares_override(&self, name: &str) -> bool {
        self.source.lines().any(|line| {
            line.trim_start()
                .strip_prefix("override ")
                .and_then(|rest| rest.trim_start().strip_prefix(name))
                .is_some_and(|rest| rest.trim_start().starts_with(':'))
        })
    }

    /// Compile the source into a shader module.
    pub fn create_module(&self, ctx: &WgpuContext) -> wgpu::ShaderModule {
        ctx.device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&self.name),
                source: wgpu::ShaderSource::Wgsl(self.source.clone()),
            })
    }
}

fn declares_fn(source: &str, entry: &str) -> bool {
    source.lines().any(|line| {
        line.trim_start()
            .strip_prefix("fn ")
            .and_then(|rest| rest.trim_start().strip_prefix(entry))
            .is_some_and(|rest| rest.trim_start().starts_with('('))
    })
}

/// Resolves program names to sources.
#[derive(Debug, Clone, Default)]
pub struct ProgramLibrary {
    search_dir: Option<PathBuf>,
}

impl ProgramLibrary {
    /// A library with only the built-in programs.
    pub fn new() -> Self {
        Self::default()
    }

    /// A library that honors [`SHADER_DIR_ENV`] when it is set.
    pub fn from_env() -> Self {
        match std::env::var_os(SHADER_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new().with_search_dir(dir),
            _ => Self::new(),
        }
    }

    /// Look for `<dir>/<name>.wgsl` before falling back to the built-ins.
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    pub fn search_dir(&self) -> Option<&Path> {
        self.search_dir.as_deref()
    }

    /// Names of the built-in programs.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_PROGRAMS.iter().map(|(name, _)| *name)
    }

    /// Load the program called `name`.
    pub fn load(&self, name: &str) -> Result<Program, ProgramError> {
        if let Some(dir) = &self.search_dir {
            let path = dir.join(format!("{name}.wgsl"));
            if path.is_file() {
                let source = std::fs::read_to_string(&path).map_err(|source| ProgramError::Io {
                    name: name.to_string(),
                    path: path.clone(),
                    source,
                })?;
                tracing::info!(program = name, path = %path.display(), "loaded program override");
                return Program::new(name, Cow::Owned(source), ProgramOrigin::File(path));
            }
        }

        let (_, source) = BUILTIN_PROGRAMS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .ok_or_else(|| ProgramError::NotFound(name.to_string()))?;
        Program::new(name, Cow::Borrowed(source), ProgramOrigin::Builtin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cubeworks-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_builtin_programs_load() {
        let library = ProgramLibrary::new();
        for name in ProgramLibrary::builtin_names() {
            let program = library.load(name).unwrap();
            assert_eq!(program.name(), name);
            assert_eq!(program.origin(), &ProgramOrigin::Builtin);
        }
    }

    #[test]
    fn test_unknown_program() {
        let err = ProgramLibrary::new().load("vs_missing").unwrap_err();
        assert!(matches!(err, ProgramError::NotFound(ref n) if n == "vs_missing"));
        assert_eq!(err.to_string(), "unknown program `vs_missing`");
    }

    #[test]
    fn test_search_dir_override() {
        let dir = scratch_dir("override");
        let source = "@vertex\nfn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(); }\n\
                      @fragment\nfn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }\n";
        std::fs::write(dir.join("cubes.wgsl"), source).unwrap();

        let library = ProgramLibrary::new().with_search_dir(&dir);
        let program = library.load("cubes").unwrap();
        assert_eq!(program.source(), source);
        assert_eq!(
            program.origin(),
            &ProgramOrigin::File(dir.join("cubes.wgsl"))
        );

        // Programs without an override still come from the built-ins.
        let fallback = library.load("instancing").unwrap();
        assert_eq!(fallback.origin(), &ProgramOrigin::Builtin);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_override_without_entry_point() {
        let dir = scratch_dir("no-entry");
        std::fs::write(dir.join("broken.wgsl"), "fn vs_main() {}\n").unwrap();

        let err = ProgramLibrary::new()
            .with_search_dir(&dir)
            .load("broken")
            .unwrap_err();
        assert!(matches!(
            err,
            ProgramError::MissingEntry { entry: "fs_main", .. }
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_srgb_override_declared() {
        let library = ProgramLibrary::new();
        for name in ["cubes", "instancing"] {
            let program = library.load(name).unwrap();
            assert!(program.declares_override(Program::SRGB_TARGET), "{name}");
        }
        // The overlay linearizes its colors on the CPU.
        let rect = library.load("debug_rect").unwrap();
        assert!(!rect.declares_override(Program::SRGB_TARGET));
    }

    #[test]
    fn test_declares_fn() {
        assert!(declares_fn("fn vs_main(in: V) -> O {", "vs_main"));
        assert!(declares_fn("  fn  fs_main (x: f32)", "fs_main"));
        assert!(!declares_fn("fn vs_main_alt() {}", "vs_main"));
        assert!(!declares_fn("// vs_main", "vs_main"));
    }
}
