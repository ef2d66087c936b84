//! Resource filtering functionality

use glob::Pattern;

use crate::classifier::{LabelComponents, parse_label_components};

/// Include/exclude policy restricting which resources appear in a diagram
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    pub include_types: Vec<String>,
    pub exclude_types: Vec<String>,
    pub include_providers: Vec<String>,
    pub exclude_modules: Vec<String>,
}

impl FilterConfig {
    /// Create a new resource filter
    pub fn new(
        include_types: Vec<String>,
        exclude_types: Vec<String>,
        include_providers: Vec<String>,
        exclude_modules: Vec<String>,
    ) -> Self {
        Self {
            include_types,
            exclude_types,
            include_providers,
            exclude_modules,
        }
    }

    /// A filter without any rules lets every label through
    pub fn is_empty(&self) -> bool {
        self.include_types.is_empty()
            && self.exclude_types.is_empty()
            && self.include_providers.is_empty()
            && self.exclude_modules.is_empty()
    }

    /// Check if a cleaned label should appear in the diagram
    ///
    /// Exclusions are evaluated before inclusions: module exclusion, type
    /// exclusion, provider inclusion, then type inclusion. The first failing
    /// check rejects the label.
    pub fn should_include(&self, label: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        let components = parse_label_components(label);

        !self.excludes_module(&components)
            && !self.excludes_type(&components)
            && self.allows_provider(&components)
            && self.allows_type(&components)
    }

    fn excludes_module(&self, components: &LabelComponents) -> bool {
        components.has_module_path()
            && self.exclude_modules.iter().any(|pattern| {
                components.module_path.contains(pattern.as_str())
                    || glob_matches(pattern, &components.module_path)
            })
    }

    fn excludes_type(&self, components: &LabelComponents) -> bool {
        components.has_resource_type()
            && self
                .exclude_types
                .iter()
                .any(|pattern| glob_matches(pattern, &components.resource_type))
    }

    fn allows_provider(&self, components: &LabelComponents) -> bool {
        if self.include_providers.is_empty() {
            return true;
        }
        components.has_provider()
            && self
                .include_providers
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&components.provider))
    }

    fn allows_type(&self, components: &LabelComponents) -> bool {
        if self.include_types.is_empty() {
            return true;
        }
        components.has_resource_type()
            && self
                .include_types
                .iter()
                .any(|pattern| glob_matches(pattern, &components.resource_type))
    }
}

/// Check a label against a filter, see [`FilterConfig::should_include`]
pub fn should_include(label: &str, config: &FilterConfig) -> bool {
    config.should_include(label)
}

/// Shell-style match; a malformed pattern never matches
fn glob_matches(pattern: &str, text: &str) -> bool {
    Pattern::new(pattern).is_ok_and(|pattern| pattern.matches(text))
}
