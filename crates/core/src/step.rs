use std::path::{Path, PathBuf};

/// What the runner does when it reaches a step
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Launch an external program and wait for it to exit
    Exec { program: PathBuf, args: Vec<String> },
    /// Delete entries of the working directory. Targets may be glob patterns.
    Remove { targets: Vec<String> },
    /// Move into the working directory; the steps that follow already run there
    EnterDirectory,
}

/// A single planned unit of work. Arguments are rendered to text when the
/// step is built, so nothing is coerced at launch time.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub title: String,
    pub action: Action,
    pub working_dir: PathBuf,
    /// Artifacts that must exist before this step runs
    pub inputs: Vec<PathBuf>,
    /// Artifacts this step is responsible for writing
    pub outputs: Vec<PathBuf>,
}

impl Step {
    fn new(title: &str, action: Action, working_dir: &Path) -> Self {
        Self {
            title: title.to_string(),
            action,
            working_dir: working_dir.to_path_buf(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn exec(title: &str, program: PathBuf, args: Vec<String>, working_dir: &Path) -> Self {
        Self::new(title, Action::Exec { program, args }, working_dir)
    }

    pub fn remove(title: &str, targets: Vec<String>, working_dir: &Path) -> Self {
        Self::new(title, Action::Remove { targets }, working_dir)
    }

    pub fn enter_directory(title: &str, dir: &Path) -> Self {
        Self::new(title, Action::EnterDirectory, dir)
    }

    pub fn reads(mut self, artifact: impl Into<PathBuf>) -> Self {
        self.inputs.push(artifact.into());
        self
    }

    pub fn writes(mut self, artifact: impl Into<PathBuf>) -> Self {
        self.outputs.push(artifact.into());
        self
    }

    pub fn program(&self) -> Option<&Path> {
        match &self.action {
            Action::Exec { program, .. } => Some(program),
            _ => None,
        }
    }

    /// Arguments of an external invocation, empty for in-process steps
    pub fn args(&self) -> &[String] {
        match &self.action {
            Action::Exec { args, .. } => args,
            _ => &[],
        }
    }

    /// The command line shown to the user before the step runs
    pub fn command_line(&self) -> String {
        match &self.action {
            Action::Exec { program, args } => std::iter::once(program.display().to_string())
                .chain(args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" "),
            Action::Remove { targets } => format!("rm -rf {}", targets.join(" ")),
            Action::EnterDirectory => format!("cd {}", self.working_dir.display()),
        }
    }
}
