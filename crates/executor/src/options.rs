use algebra::Strictness;
use common::Config;

/// Knobs for a single `process` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    pub strictness: Strictness,
    /// Descend sibling subtrees concurrently in the bottom-up and join phases.
    pub parallel: bool,
}

impl ProcessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strictness.is_strict()
    }
}

impl From<&Config> for ProcessOptions {
    fn from(config: &Config) -> Self {
        let strictness = if config.is_strict() {
            Strictness::Strict
        } else {
            Strictness::Lenient
        };
        Self {
            strictness,
            parallel: config.is_parallel(),
        }
    }
}
