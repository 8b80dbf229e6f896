use anyhow::{Context, Result};
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};
use xshell::Shell;

/// An external program invocation: program, arguments, extra env and working dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub dir: PathBuf,
}

impl Command {
    pub fn new(program: &str) -> Self {
        Command {
            program: program.into(),
            args: vec![],
            envs: vec![],
            dir: PathBuf::from("."),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.dir = dir.to_path_buf();
        self
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{key}={value} ")?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

pub trait CommandRunner {
    /// Runs to completion; a non-zero exit is an error.
    fn run(&self, command: &Command) -> Result<()>;
}

pub struct XshellRunner;

impl CommandRunner for XshellRunner {
    fn run(&self, command: &Command) -> Result<()> {
        let sh = Shell::new()?;
        sh.change_dir(&command.dir);

        info!("[{}] {command}", command.dir.display());

        let mut cmd = sh.cmd(&command.program).args(&command.args);
        for (key, value) in &command.envs {
            cmd = cmd.env(key, value);
        }

        cmd.run()
            .with_context(|| format!("Error running `{command}` in {}", command.dir.display()))?;

        Ok(())
    }
}
