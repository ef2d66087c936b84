//! Obtaining the raw dependency graph
//!
//! The graph either comes from running the Terraform CLI in a working
//! directory or from a DOT file produced earlier.

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use walkdir::WalkDir;

use crate::constants::terraform::WAIT_POLL_INTERVAL;
use crate::error::TerramaidError;

const TERRAFORM_BINARY: &str = "terraform";
const STDIN_PATH: &str = "-";

/// File suffixes marking a Terraform configuration directory
const TERRAFORM_SUFFIXES: &[&str] = &[".tf", ".tf.json", ".tftest.hcl", ".tftest.json"];
const TERRAFORM_VAR_FILES: &[&str] = &["terraform.tfvars", "terraform.tfvars.json"];

/// Something that can produce DOT text for a Terraform configuration
pub trait GraphSource {
    /// Human readable name used in diagnostics
    fn name(&self) -> String;

    /// Produce the raw DOT text
    fn raw_graph(&self) -> Result<String, TerramaidError>;
}

/// Runs `terraform init` and `terraform graph` in a working directory
///
/// With a timeout set, both commands together must finish before the
/// deadline. The running command is killed once it passes.
#[derive(Debug, Clone)]
pub struct TerraformCli {
    pub working_dir: PathBuf,
    pub binary: PathBuf,
    pub plan_file: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl TerraformCli {
    pub fn new(working_dir: impl Into<PathBuf>, binary: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            binary: binary.into(),
            plan_file: None,
            timeout: None,
        }
    }

    pub fn with_plan_file(mut self, plan_file: Option<PathBuf>) -> Self {
        self.plan_file = plan_file;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments of the `graph` invocation
    pub fn graph_args(&self) -> Vec<String> {
        let mut args = vec!["graph".to_string()];
        if let Some(plan) = &self.plan_file {
            args.push(format!("-plan={}", plan.display()));
        }
        args
    }

    /// Check the working directory before running anything
    pub fn validate(&self) -> Result<(), TerramaidError> {
        if !self.working_dir.is_dir() {
            return Err(TerramaidError::DirectoryNotFound {
                dir: self.working_dir.clone(),
            });
        }
        if !terraform_files_exist(&self.working_dir) {
            return Err(TerramaidError::NoTerraformFiles {
                dir: self.working_dir.clone(),
            });
        }
        Ok(())
    }

    fn run<I, S>(&self, args: I, deadline: Option<Instant>) -> Result<String, TerramaidError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let command = std::iter::once(self.binary.display().to_string())
            .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drained on their own threads so a chatty child never blocks on a
        // full pipe while we wait for it
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match deadline {
            Some(deadline) => match wait_until(&mut child, deadline)? {
                Some(status) => status,
                None => {
                    child.kill()?;
                    child.wait()?;
                    return Err(TerramaidError::TerraformTimeout {
                        command,
                        timeout: self.timeout.unwrap_or_default(),
                    });
                }
            },
            None => child.wait()?,
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            return Err(TerramaidError::TerraformCommandFailed {
                command,
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

fn drain<R>(pipe: Option<R>) -> JoinHandle<Vec<u8>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            // a read error only truncates what gets reported
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

/// Wait for the child to exit, `None` once the deadline passes first
fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        thread::sleep(WAIT_POLL_INTERVAL.min(deadline - now));
    }
}

impl GraphSource for TerraformCli {
    fn name(&self) -> String {
        format!("terraform graph ({})", self.working_dir.display())
    }

    fn raw_graph(&self) -> Result<String, TerramaidError> {
        self.validate()?;
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        self.run(["init", "-input=false", "-no-color", "-upgrade"], deadline)?;
        self.run(self.graph_args(), deadline)
    }
}

/// Reads previously exported DOT text, `-` meaning standard input
#[derive(Debug, Clone)]
pub struct GraphFile {
    pub path: PathBuf,
}

impl GraphFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn is_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_PATH
    }
}

impl GraphSource for GraphFile {
    fn name(&self) -> String {
        if self.is_stdin() {
            "<stdin>".to_string()
        } else {
            self.path.display().to_string()
        }
    }

    fn raw_graph(&self) -> Result<String, TerramaidError> {
        if self.is_stdin() {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            return Ok(text);
        }

        std::fs::read_to_string(&self.path).map_err(|e| TerramaidError::FileReadError {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Locate the `terraform` executable on `PATH`
pub fn find_terraform_binary() -> Result<PathBuf, TerramaidError> {
    let path = std::env::var_os("PATH").ok_or(TerramaidError::TerraformNotFound)?;
    find_binary_in(TERRAFORM_BINARY, std::env::split_paths(&path))
}

fn find_binary_in(
    name: &str,
    dirs: impl IntoIterator<Item = PathBuf>,
) -> Result<PathBuf, TerramaidError> {
    let candidates = [name.to_string(), format!("{name}.exe")];
    dirs.into_iter()
        .flat_map(|dir| candidates.iter().map(move |c| dir.join(c)))
        .find(|candidate| candidate.is_file())
        .ok_or(TerramaidError::TerraformNotFound)
}

/// Whether a directory tree holds any Terraform configuration
pub fn terraform_files_exist(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".terraform" && e.file_name() != ".git")
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .any(|e| is_terraform_file(&e.file_name().to_string_lossy()))
}

fn is_terraform_file(name: &str) -> bool {
    TERRAFORM_VAR_FILES.contains(&name)
        || TERRAFORM_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_is_terraform_file() {
        assert!(is_terraform_file("main.tf"));
        assert!(is_terraform_file("main.tf.json"));
        assert!(is_terraform_file("checks.tftest.hcl"));
        assert!(is_terraform_file("checks.tftest.json"));
        assert!(is_terraform_file("terraform.tfvars"));
        assert!(is_terraform_file("terraform.tfvars.json"));
        assert!(!is_terraform_file("prod.tfvars"));
        assert!(!is_terraform_file("README.md"));
    }

    #[test]
    fn test_terraform_files_exist_walks_subdirectories() {
        let temp = TempDir::new().unwrap();
        assert!(!terraform_files_exist(temp.path()));

        let nested = temp.path().join("modules").join("vpc");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("main.tf"), "resource \"aws_vpc\" \"main\" {}").unwrap();

        assert!(terraform_files_exist(temp.path()));
    }

    #[test]
    fn test_terraform_cache_is_ignored() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join(".terraform").join("modules");
        fs::create_dir_all(&cache).unwrap();
        fs::write(cache.join("main.tf"), "").unwrap();

        assert!(!terraform_files_exist(temp.path()));
    }

    #[test]
    fn test_validate_reports_missing_directory_and_files() {
        let temp = TempDir::new().unwrap();

        let missing = TerraformCli::new(temp.path().join("missing"), "terraform");
        assert!(matches!(
            missing.validate(),
            Err(TerramaidError::DirectoryNotFound { .. })
        ));

        let empty = TerraformCli::new(temp.path(), "terraform");
        assert!(matches!(
            empty.validate(),
            Err(TerramaidError::NoTerraformFiles { .. })
        ));

        fs::write(temp.path().join("main.tf"), "").unwrap();
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn test_graph_args_include_plan() {
        let cli = TerraformCli::new(".", "terraform");
        assert_eq!(cli.graph_args(), vec!["graph"]);

        let with_plan = cli.with_plan_file(Some(PathBuf::from("plan.out")));
        assert_eq!(with_plan.graph_args(), vec!["graph", "-plan=plan.out"]);
    }

    /// Terraform stand-in: a shell script in `dir` running `body`
    #[cfg(unix)]
    fn stub_binary(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("terraform-stub");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_slow_terraform() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.tf"), "").unwrap();
        let stub = stub_binary(temp.path(), "sleep 5");

        let cli = TerraformCli::new(temp.path(), &stub)
            .with_timeout(Some(Duration::from_millis(200)));
        let started = Instant::now();
        let result = cli.raw_graph();

        assert!(started.elapsed() < Duration::from_secs(3));
        match result {
            Err(TerramaidError::TerraformTimeout { command, timeout }) => {
                assert!(command.ends_with("init -input=false -no-color -upgrade"));
                assert_eq!(timeout, Duration::from_millis(200));
            }
            other => panic!("Expected TerraformTimeout, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_fast_terraform_finishes_within_timeout() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.tf"), "").unwrap();
        let stub = stub_binary(temp.path(), "echo 'digraph { a }'");

        let cli = TerraformCli::new(temp.path(), &stub).with_timeout(Some(Duration::from_secs(30)));

        assert_eq!(cli.raw_graph().unwrap(), "digraph { a }\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_terraform_reports_stderr() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("main.tf"), "").unwrap();
        let stub = stub_binary(temp.path(), "echo 'Error: no backend' >&2\nexit 3");

        match TerraformCli::new(temp.path(), &stub).raw_graph() {
            Err(TerramaidError::TerraformCommandFailed { stderr, .. }) => {
                assert_eq!(stderr, "Error: no backend");
            }
            other => panic!("Expected TerraformCommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_find_binary_in_directories() {
        let temp = TempDir::new().unwrap();
        let bin_dir = temp.path().join("bin");
        fs::create_dir_all(&bin_dir).unwrap();

        let result = find_binary_in("terraform", vec![temp.path().to_path_buf(), bin_dir.clone()]);
        assert!(matches!(result, Err(TerramaidError::TerraformNotFound)));

        fs::write(bin_dir.join("terraform"), "").unwrap();
        let found = find_binary_in("terraform", vec![temp.path().to_path_buf(), bin_dir.clone()]);
        assert_eq!(found.unwrap(), bin_dir.join("terraform"));
    }

    #[test]
    fn test_graph_file_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("graph.dot");
        fs::write(&path, "digraph { a }").unwrap();

        let source = GraphFile::new(&path);
        assert!(!source.is_stdin());
        assert_eq!(source.raw_graph().unwrap(), "digraph { a }");
        assert_eq!(GraphFile::new("-").name(), "<stdin>");

        let missing = GraphFile::new(temp.path().join("nope.dot"));
        assert!(matches!(
            missing.raw_graph(),
            Err(TerramaidError::FileReadError { .. })
        ));
    }
}
