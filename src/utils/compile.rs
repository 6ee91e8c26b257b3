//! External LaTeX engine invocation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use crate::utils::error::{PaperError, PaperResult};

pub const ENGINE_ENV_VAR: &str = "WHITEPAPER_LATEX_ENGINE";

const AUX_EXTENSIONS: &[&str] = &["aux", "log", "out", "fls", "fdb_latexmk", "synctex.gz"];

/// Marker pdflatex writes to its log while labels are still unresolved.
const RERUN_MARKER: &str = "Rerun to get";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    Latexmk,
    Pdflatex,
    Tectonic,
}

impl Engine {
    pub fn program(&self) -> &'static str {
        match self {
            Engine::Latexmk => "latexmk",
            Engine::Pdflatex => "pdflatex",
            Engine::Tectonic => "tectonic",
        }
    }

    /// Upper bound on engine runs per compile. latexmk and tectonic rerun
    /// internally; plain pdflatex needs another pass for `\eqref` targets.
    pub fn max_passes(&self) -> usize {
        match self {
            Engine::Pdflatex => 3,
            Engine::Latexmk | Engine::Tectonic => 1,
        }
    }

    fn args(&self, tex: &Path, out_dir: &Path) -> Vec<String> {
        let out_dir = out_dir.display().to_string();
        let tex = tex.display().to_string();
        match self {
            Engine::Latexmk => vec![
                "-pdf".to_string(),
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
                format!("-outdir={}", out_dir),
                tex,
            ],
            Engine::Pdflatex => vec![
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
                format!("-output-directory={}", out_dir),
                tex,
            ],
            Engine::Tectonic => vec![
                "-X".to_string(),
                "compile".to_string(),
                tex,
                "--outdir".to_string(),
                out_dir,
            ],
        }
    }
}

impl FromStr for Engine {
    type Err = PaperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latexmk" => Ok(Engine::Latexmk),
            "pdflatex" => Ok(Engine::Pdflatex),
            "tectonic" => Ok(Engine::Tectonic),
            _ => Err(PaperError::UnknownEngine(s.to_string())),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub engine: Engine,
    /// Remove auxiliary files after a successful compile.
    pub clean: bool,
    /// Write the `.tex` source only.
    pub tex_only: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            engine: Engine::default(),
            clean: true,
            tex_only: false,
        }
    }
}

impl RenderConfig {
    pub fn from_env() -> PaperResult<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(ENGINE_ENV_VAR) {
            config.engine = value.parse()?;
        }
        Ok(config)
    }
}

/// Turns a `.tex` file into a PDF.
pub trait LatexCompiler {
    fn name(&self) -> &str;

    /// Compile `tex` into `out_dir`, returning the produced PDF path.
    fn compile(&self, tex: &Path, out_dir: &Path) -> PaperResult<PathBuf>;
}

/// Runs a LaTeX engine as a child process.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    engine: Engine,
    clean: bool,
}

impl ProcessCompiler {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            engine: config.engine,
            clean: config.clean,
        }
    }
}

impl LatexCompiler for ProcessCompiler {
    fn name(&self) -> &str {
        self.engine.program()
    }

    fn compile(&self, tex: &Path, out_dir: &Path) -> PaperResult<PathBuf> {
        let args = self.engine.args(tex, out_dir);
        let passes = run_passes(self.engine, tex, out_dir, || {
            tracing::debug!(engine = %self.engine, ?args, "running LaTeX engine");
            let output = Command::new(self.engine.program())
                .args(&args)
                .output()?;
            if !output.status.success() {
                return Err(PaperError::Compiler {
                    engine: self.engine.program().to_string(),
                    tex: tex.to_path_buf(),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            Ok(())
        })?;
        tracing::debug!(engine = %self.engine, passes, "LaTeX engine finished");
        if self.clean {
            clean_aux_files(tex, out_dir);
        }
        Ok(pdf_path_for(tex, out_dir))
    }
}

/// Invoke `run_once` until the engine's log stops asking for a rerun or
/// `engine.max_passes()` is reached. Returns the number of passes made.
fn run_passes<F>(
    engine: Engine,
    tex: &Path,
    out_dir: &Path,
    mut run_once: F,
) -> PaperResult<usize>
where
    F: FnMut() -> PaperResult<()>,
{
    let log = aux_path_for(tex, out_dir, "log");
    let mut passes = 0;
    loop {
        run_once()?;
        passes += 1;
        if passes >= engine.max_passes() || !log_requests_rerun(&log) {
            return Ok(passes);
        }
    }
}

fn log_requests_rerun(log: &Path) -> bool {
    fs::read(log)
        .map(|bytes| String::from_utf8_lossy(&bytes).contains(RERUN_MARKER))
        .unwrap_or(false)
}

fn aux_path_for(tex: &Path, out_dir: &Path, ext: &str) -> PathBuf {
    let mut name = tex.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(ext);
    out_dir.join(name)
}

pub fn pdf_path_for(tex: &Path, out_dir: &Path) -> PathBuf {
    aux_path_for(tex, out_dir, "pdf")
}

/// Remove the engine's auxiliary files for `tex`. Missing files are ignored.
pub fn clean_aux_files(tex: &Path, out_dir: &Path) {
    let Some(stem) = tex.file_stem().and_then(|s| s.to_str()) else {
        return;
    };
    for ext in AUX_EXTENSIONS {
        let path = out_dir.join(format!("{}.{}", stem, ext));
        if path.exists() {
            if let Err(err) = fs::remove_file(&path) {
                tracing::debug!(path = %path.display(), %err, "could not remove aux file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_names_round_trip() {
        for engine in [Engine::Latexmk, Engine::Pdflatex, Engine::Tectonic] {
            assert_eq!(engine.program().parse::<Engine>().unwrap(), engine);
        }
        assert!(matches!(
            "lualatex".parse::<Engine>(),
            Err(PaperError::UnknownEngine(_))
        ));
    }

    #[test]
    fn latexmk_args_target_out_dir() {
        let args = Engine::Latexmk.args(Path::new("/tmp/p/paper.tex"), Path::new("/tmp/p"));
        assert_eq!(args[0], "-pdf");
        assert!(args.contains(&"-outdir=/tmp/p".to_string()));
        assert_eq!(args.last().unwrap(), "/tmp/p/paper.tex");
    }

    #[test]
    fn tectonic_uses_v2_interface() {
        let args = Engine::Tectonic.args(Path::new("a.tex"), Path::new("out"));
        assert_eq!(args, vec!["-X", "compile", "a.tex", "--outdir", "out"]);
    }

    #[test]
    fn pdflatex_reruns_until_references_settle() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("paper.tex");
        let log = dir.path().join("paper.log");
        let mut calls = 0;
        let passes = run_passes(Engine::Pdflatex, &tex, dir.path(), || {
            calls += 1;
            let body = if calls == 1 {
                "LaTeX Warning: Label(s) may have changed. Rerun to get cross-references right."
            } else {
                "Output written on paper.pdf (1 page)."
            };
            fs::write(&log, body)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(passes, 2);
        assert_eq!(calls, 2);
    }

    #[test]
    fn pdflatex_passes_are_capped() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("paper.tex");
        fs::write(dir.path().join("paper.log"), "Rerun to get outlines right.").unwrap();
        let passes = run_passes(Engine::Pdflatex, &tex, dir.path(), || Ok(())).unwrap();
        assert_eq!(passes, Engine::Pdflatex.max_passes());
    }

    #[test]
    fn latexmk_runs_once_and_failures_stop_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("paper.tex");
        fs::write(dir.path().join("paper.log"), "Rerun to get cross-references right.").unwrap();
        assert_eq!(run_passes(Engine::Latexmk, &tex, dir.path(), || Ok(())).unwrap(), 1);

        let mut calls = 0;
        let err = run_passes(Engine::Pdflatex, &tex, dir.path(), || {
            calls += 1;
            Err(PaperError::UnknownEngine("boom".to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, PaperError::UnknownEngine(_)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn pdf_path_swaps_extension() {
        assert_eq!(
            pdf_path_for(Path::new("/w/src/paper.tex"), Path::new("/w/out")),
            PathBuf::from("/w/out/paper.pdf")
        );
    }

    #[test]
    fn clean_removes_only_aux_files() {
        let dir = tempfile::tempdir().unwrap();
        let tex = dir.path().join("paper.tex");
        for name in ["paper.tex", "paper.pdf", "paper.aux", "paper.log", "other.aux"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        clean_aux_files(&tex, dir.path());
        assert!(dir.path().join("paper.tex").exists());
        assert!(dir.path().join("paper.pdf").exists());
        assert!(dir.path().join("other.aux").exists());
        assert!(!dir.path().join("paper.aux").exists());
        assert!(!dir.path().join("paper.log").exists());
    }
}
