//! External compiler invocation with obfuscation transforms
//!
//! The obfuscating compiler is an opaque executable carrying LLVM
//! obfuscation passes behind `-mllvm` flags. Each compile job stages its
//! input in a fresh uuid-named scratch directory under the configured
//! working directory, runs the compiler under a timeout, and removes the
//! scratch directory on every exit path.

use std::path::Path;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::time::timeout;
use uuid::Uuid;

use crate::config::CompilerConfig;
use crate::error::{Error, Result};

/// Source file extensions the service accepts
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["c", "cc", "cpp"];

/// Obfuscation transform selected by the caller
///
/// One flag per LLVM obfuscation pass: control-flow flattening, bogus
/// control flow, instruction substitution, string obfuscation, and
/// variable rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOption {
    Fla,
    Bcf,
    Sub,
    Sobf,
    Vrobf,
}

impl TransformOption {
    /// Parse a form value into a transform option.
    ///
    /// Leading dashes are stripped, so `fla`, `-fla`, and `--fla` all
    /// resolve to the same pass. Anything outside the allowed set is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim_start_matches('-') {
            "fla" => Some(Self::Fla),
            "bcf" => Some(Self::Bcf),
            "sub" => Some(Self::Sub),
            "sobf" => Some(Self::Sobf),
            "vrobf" => Some(Self::Vrobf),
            _ => None,
        }
    }

    /// The `-mllvm` flag name for this pass
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Fla => "fla",
            Self::Bcf => "bcf",
            Self::Sub => "sub",
            Self::Sobf => "sobf",
            Self::Vrobf => "vrobf",
        }
    }
}

impl std::fmt::Display for TransformOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.flag())
    }
}

/// Compute the artifact name for an input filename and transform.
///
/// The extension is dropped and the pass name appended: `a.c` + `fla`
/// becomes `a_fla`.
pub fn output_filename(input: &str, option: TransformOption) -> String {
    let stem = input.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(input);
    format!("{}_{}", stem, option.flag())
}

/// A compiled binary ready to be returned to the caller
#[derive(Debug)]
pub struct CompiledArtifact {
    /// Attachment filename (`<stem>_<option>`)
    pub filename: String,
    /// Binary contents
    pub bytes: Vec<u8>,
}

/// Driver for the external obfuscating compiler
#[derive(Debug, Clone)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Create a new compiler driver
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Compile a staged source file with the given transform.
    ///
    /// `filename` must already be sanitized. The input is written to a
    /// fresh scratch directory, the compiler is invoked as
    /// `<binary> -mllvm -<option> <input> -o <output>` (plus `-lstdc++`
    /// for C++ sources), and the scratch directory is removed whether the
    /// invocation succeeds, fails, or times out.
    pub async fn compile(
        &self,
        filename: &str,
        source: &[u8],
        option: TransformOption,
    ) -> Result<CompiledArtifact> {
        let scratch = self
            .config
            .work_dir
            .join(format!("job-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&scratch).await?;

        let result = self.run_job(&scratch, filename, source, option).await;

        // Every exit path ends here: no job files outlive the request.
        if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
            tracing::warn!("Failed to remove scratch dir {}: {}", scratch.display(), e);
        }

        result
    }

    async fn run_job(
        &self,
        scratch: &Path,
        filename: &str,
        source: &[u8],
        option: TransformOption,
    ) -> Result<CompiledArtifact> {
        let input_path = scratch.join(filename);
        tokio::fs::write(&input_path, source).await?;

        let output_name = output_filename(filename, option);
        let output_path = scratch.join(&output_name);

        let mut command = Command::new(&self.config.binary);
        command
            .arg("-mllvm")
            .arg(format!("-{}", option.flag()))
            .arg(&input_path)
            .arg("-o")
            .arg(&output_path)
            .kill_on_drop(true);

        // The original toolchain links the C++ runtime only for .cpp inputs.
        let is_cpp = crate::sanitize::extension(filename)
            .map(|ext| ext.eq_ignore_ascii_case("cpp"))
            .unwrap_or(false);
        if is_cpp {
            command.arg("-lstdc++");
        }

        let start = Instant::now();
        let limit = Duration::from_secs(self.config.timeout_secs);

        let output = match timeout(limit, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::error!(
                    "Failed to spawn compiler {}: {}",
                    self.config.binary.display(),
                    e
                );
                return Err(Error::CompilationFailed);
            }
            Err(_) => {
                tracing::error!(
                    "Compiler timed out after {}s on {}",
                    limit.as_secs(),
                    filename
                );
                return Err(Error::CompilationFailed);
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                "Compiler exited with {} on {}: {}",
                output.status,
                filename,
                stderr.trim()
            );
            return Err(Error::CompilationFailed);
        }

        let bytes = tokio::fs::read(&output_path).await.map_err(|e| {
            tracing::error!("Compiler reported success but {} is unreadable: {}", output_name, e);
            Error::CompilationFailed
        })?;

        tracing::info!(
            "Compiled {} -> {} ({} bytes) with -{} in {:.1}s",
            filename,
            output_name,
            bytes.len(),
            option.flag(),
            start.elapsed().as_secs_f64()
        );

        Ok(CompiledArtifact {
            filename: output_name,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(TransformOption::parse("fla"), Some(TransformOption::Fla));
        assert_eq!(TransformOption::parse("bcf"), Some(TransformOption::Bcf));
        assert_eq!(TransformOption::parse("sub"), Some(TransformOption::Sub));
        assert_eq!(TransformOption::parse("sobf"), Some(TransformOption::Sobf));
        assert_eq!(TransformOption::parse("vrobf"), Some(TransformOption::Vrobf));
    }

    #[test]
    fn test_parse_option_strips_dashes() {
        assert_eq!(TransformOption::parse("-fla"), Some(TransformOption::Fla));
        assert_eq!(TransformOption::parse("--sub"), Some(TransformOption::Sub));
    }

    #[test]
    fn test_parse_option_rejects_unknown() {
        assert_eq!(TransformOption::parse("xyz"), None);
        assert_eq!(TransformOption::parse("none"), None);
        assert_eq!(TransformOption::parse(""), None);
        // No prefix or case variants: the pass names are exact.
        assert_eq!(TransformOption::parse("FLA"), None);
        assert_eq!(TransformOption::parse("flat"), None);
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(output_filename("a.c", TransformOption::Fla), "a_fla");
        assert_eq!(output_filename("prog.cpp", TransformOption::Bcf), "prog_bcf");
        assert_eq!(output_filename("lib.test.cc", TransformOption::Sub), "lib.test_sub");
        assert_eq!(output_filename("noext", TransformOption::Vrobf), "noext_vrobf");
    }
}
