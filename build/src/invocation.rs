use std::{
    ffi::{OsStr, OsString},
    fmt,
};

use crate::project::{Project, Toggles, VendorLibrary};

/// A program and its arguments, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new<S: Into<OsString>>(program: S) -> Self {
        Invocation {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn arg<S: Into<OsString>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn has_arg<S: AsRef<OsStr>>(&self, arg: S) -> bool {
        self.args.iter().any(|a| a.as_os_str() == arg.as_ref())
    }

    /// `compiler build` with everything the toggles ask for.
    pub fn build(project: &Project, toggles: &Toggles) -> Self {
        let mut cmd = Invocation::new(&project.compiler);
        cmd.arg("build")
            .arg(&project.source)
            .arg(format!("-out:{}", project.executable.display()))
            .args(collections(project));

        if toggles.sanitize_memory {
            cmd.arg("-sanitize:memory");
        }
        if toggles.sanitize_address {
            cmd.arg("-sanitize:address");
        }
        if toggles.sanitize_thread {
            cmd.arg("-sanitize:thread");
        }

        cmd.arg(if project.verbose_timings {
            "-show-more-timings"
        } else {
            "-show-timings"
        });

        if project.warnings_as_errors {
            cmd.arg("-warnings-as-errors");
        }

        if toggles.debug {
            cmd.arg("-debug");
        } else {
            cmd.arg("-disable-assert").arg(if project.aggressive_optimization {
                "-o:aggressive"
            } else {
                "-o:speed"
            });
        }

        if toggles.benchmarks {
            cmd.arg(BENCHMARKS_DEFINE);
        }

        cmd.args(&toggles.passthrough);
        cmd
    }

    /// `compiler check` over the source root and collections. Only the pass-through tokens are
    /// added, so warnings do not fail a check and the feature toggles do not apply.
    pub fn check(project: &Project, toggles: &Toggles) -> Self {
        let mut cmd = Invocation::new(&project.compiler);
        cmd.arg("check")
            .arg(&project.source)
            .args(collections(project))
            .args(&toggles.passthrough);
        cmd
    }

    /// The binary `build` produced, without arguments.
    pub fn run(project: &Project) -> Self {
        Invocation::new(&project.executable)
    }

    pub fn make_static(lib: &VendorLibrary, debug: bool) -> Self {
        let mut flags = lib.cxxflags.clone();
        if debug {
            flags.push_str(" -g");
        }
        let mut cmd = Invocation::new("make");
        cmd.arg("static")
            .arg("-C")
            .arg(&lib.dir)
            .arg(format!("CXXFLAGS={}", flags));
        cmd
    }

    pub fn make_clean(lib: &VendorLibrary) -> Self {
        let mut cmd = Invocation::new("make");
        cmd.arg("clean").arg("-C").arg(&lib.dir);
        cmd
    }
}

const BENCHMARKS_DEFINE: &str = "-define:ENABLE_BENCHMARKS=true";

fn collections(project: &Project) -> impl Iterator<Item = String> + '_ {
    project
        .collections
        .iter()
        .map(|c| format!("-collection:{}", c))
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
