use std::fmt;

/// One of the things `nob` knows how to do. Actions carry no data of their own, everything they
/// need comes from the project and the toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Build,
    Run,
    Check,
    Clean,
    BuildVendor,
    CleanVendor,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Build,
        Action::Run,
        Action::Check,
        Action::Clean,
        Action::BuildVendor,
        Action::CleanVendor,
    ];

    /// The command line word that requests this action.
    pub fn verb(self) -> &'static str {
        match self {
            Action::Build => "build",
            Action::Run => "run",
            Action::Check => "check",
            Action::Clean => "clean",
            Action::BuildVendor => "build-vendor",
            Action::CleanVendor => "clean-vendor",
        }
    }

    pub fn from_verb(verb: &str) -> Option<Action> {
        Action::ALL.iter().copied().find(|a| a.verb() == verb)
    }

    /// How the action is named in status lines.
    pub fn title(self) -> &'static str {
        match self {
            Action::Build => "Build",
            Action::Run => "Run",
            Action::Check => "Syntax check",
            Action::Clean => "Clean",
            Action::BuildVendor => "Vendor build",
            Action::CleanVendor => "Vendor clean",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

#[cfg(test)]
mod test {
    use super::Action;

    #[test]
    fn test_verbs_round_trip() {
        for action in Action::ALL.iter().copied() {
            assert_eq!(Action::from_verb(action.verb()), Some(action));
        }
    }

    #[test]
    fn test_unknown_verb() {
        assert_eq!(Action::from_verb("help"), None);
        assert_eq!(Action::from_verb("Build"), None);
        assert_eq!(Action::from_verb("-dbg"), None);
    }
}
