use std::{ffi::OsString, path::PathBuf};

pub const DEFAULT_VENDOR_CXXFLAGS: &str = "-O2 -fno-exceptions -fno-rtti -fno-threadsafe-statics";

/// Where things live and how the compiler is driven. None of this changes between invocations
/// unless the environment says otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub compiler: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub executable: PathBuf,
    /// `name=path` pairs, each passed as `-collection:name=path`.
    pub collections: Vec<String>,
    pub verbose_timings: bool,
    pub warnings_as_errors: bool,
    pub aggressive_optimization: bool,
    pub run_implies_build: bool,
    pub vendor: Vec<VendorLibrary>,
}

impl Default for Project {
    fn default() -> Self {
        Project {
            compiler: "odin".to_owned(),
            source: PathBuf::from("./world-machine/src"),
            destination: PathBuf::from("./bin"),
            executable: PathBuf::from("./bin/out"),
            collections: vec![
                "src=./world-machine/src".to_owned(),
                "res=./world-machine/res".to_owned(),
                "extra-vendor=./world-machine/vendor".to_owned(),
            ],
            verbose_timings: false,
            warnings_as_errors: true,
            aggressive_optimization: true,
            run_implies_build: false,
            vendor: vec![],
        }
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl Project {
    pub fn from_env() -> Self {
        Project::default().with_env(|key| std::env::var(key).ok())
    }

    /// Applies `NOB_COMPILER` and `NOB_RUN_IMPLIES_BUILD` as returned by `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(compiler) = lookup("NOB_COMPILER").filter(|c| !c.is_empty()) {
            self.compiler = compiler;
        }
        if let Some(value) = lookup("NOB_RUN_IMPLIES_BUILD") {
            self.run_implies_build = truthy(&value);
        }
        self
    }
}

/// A C/C++ library built with its own makefile, whose static archive gets copied next to the
/// sources that link against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorLibrary {
    pub name: String,
    pub dir: PathBuf,
    pub install_dir: PathBuf,
    pub cxxflags: String,
}

impl VendorLibrary {
    pub fn new<S, P, Q>(name: S, dir: P, install_dir: Q) -> Self
    where
        S: Into<String>,
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        VendorLibrary {
            name: name.into(),
            dir: dir.into(),
            install_dir: install_dir.into(),
            cxxflags: DEFAULT_VENDOR_CXXFLAGS.to_owned(),
        }
    }

    pub fn archive(&self) -> PathBuf {
        self.dir.join(format!("lib{}.a", self.name))
    }

    pub fn installed_archive(&self, debug: bool) -> PathBuf {
        let suffix = if debug { "-debug" } else { "" };
        self.install_dir.join(format!("lib{}{}.a", self.name, suffix))
    }
}

/// Switches flipped from the command line. They start off and only ever get turned on.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Toggles {
    pub debug: bool,
    pub sanitize_address: bool,
    pub sanitize_memory: bool,
    pub sanitize_thread: bool,
    pub benchmarks: bool,
    pub stats: bool,
    /// Everything after `--`, untouched.
    pub passthrough: Vec<OsString>,
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let project = Project::default().with_env(env(&[
            ("NOB_COMPILER", "/opt/odin/odin"),
            ("NOB_RUN_IMPLIES_BUILD", "yes"),
        ]));
        assert_eq!(project.compiler, "/opt/odin/odin");
        assert!(project.run_implies_build);
    }

    #[test]
    fn test_empty_env_keeps_defaults() {
        let project = Project::default().with_env(env(&[("NOB_COMPILER", "")]));
        assert_eq!(project, Project::default());
    }

    #[test]
    fn test_vendor_archives() {
        let lib = VendorLibrary::new("cimgui", "vendor/cimgui", "extra/imgui");
        assert_eq!(lib.archive(), PathBuf::from("vendor/cimgui/libcimgui.a"));
        assert_eq!(
            lib.installed_archive(false),
            PathBuf::from("extra/imgui/libcimgui.a")
        );
        assert_eq!(
            lib.installed_archive(true),
            PathBuf::from("extra/imgui/libcimgui-debug.a")
        );
    }
}
