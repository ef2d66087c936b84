//! Resource versus meta node classification
//!
//! A label is classified by running its type segment through an ordered list
//! of [`ClassificationStrategy`] values. The first strategy that matches
//! marks the label as a resource.

use regex::Regex;

use super::label::{is_provider_label, split_module_path};

const DATA_SEGMENT: &str = "data";

/// Type prefixes of widely used Terraform providers
pub const BUILTIN_PROVIDER_PREFIXES: &[&str] = &[
    "aws_",
    "awscc_",
    "azurerm_",
    "azuread_",
    "azapi_",
    "google_",
    "kubernetes_",
    "helm_",
    "null_",
    "random_",
    "local_",
    "tls_",
    "time_",
    "archive_",
    "http_",
    "external_",
    "template_",
    "terraform_",
    "cloudflare_",
    "datadog_",
    "digitalocean_",
    "docker_",
    "github_",
    "gitlab_",
    "vault_",
    "consul_",
    "nomad_",
    "oci_",
    "alicloud_",
    "ibm_",
    "linode_",
    "vsphere_",
    "openstack_",
    "newrelic_",
    "pagerduty_",
    "okta_",
    "auth0_",
    "snowflake_",
    "databricks_",
    "mongodbatlas_",
    "tfe_",
    "hcp_",
];

/// User supplied classification rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Regular expression matched against the type segment
    pub custom_regex: Option<String>,
    /// Additional type prefixes that denote a resource
    pub custom_prefixes: Vec<String>,
}

impl ClassifierConfig {
    pub fn new(custom_regex: Option<String>, custom_prefixes: Vec<String>) -> Self {
        Self {
            custom_regex,
            custom_prefixes,
        }
    }

    /// Parse a comma separated prefix list, skipping blank entries
    pub fn parse_prefixes(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// One rule deciding whether a type segment denotes a resource
pub trait ClassificationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, type_segment: &str) -> bool;
}

/// Matches the user's regular expression
pub struct CustomPattern {
    pattern: Regex,
}

impl CustomPattern {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl ClassificationStrategy for CustomPattern {
    fn name(&self) -> &'static str {
        "custom-regex"
    }

    fn matches(&self, type_segment: &str) -> bool {
        self.pattern.is_match(type_segment)
    }
}

/// Matches when the type starts with any of a list of prefixes
pub struct PrefixList {
    name: &'static str,
    prefixes: Vec<String>,
}

impl PrefixList {
    pub fn custom(prefixes: Vec<String>) -> Self {
        Self {
            name: "custom-prefix",
            prefixes,
        }
    }

    pub fn builtin() -> Self {
        Self {
            name: "builtin-prefix",
            prefixes: BUILTIN_PROVIDER_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
        }
    }
}

impl ClassificationStrategy for PrefixList {
    fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, type_segment: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| type_segment.starts_with(prefix.as_str()))
    }
}

/// `<provider>_<noun>` naming convention fallback
pub struct UnderscoreHeuristic;

impl ClassificationStrategy for UnderscoreHeuristic {
    fn name(&self) -> &'static str {
        "underscore"
    }

    fn matches(&self, type_segment: &str) -> bool {
        type_segment.contains('_')
    }
}

/// Decides whether a label represents an infrastructure resource
pub struct ResourceClassifier {
    strategies: Vec<Box<dyn ClassificationStrategy>>,
}

impl Default for ResourceClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl ResourceClassifier {
    /// Build the strategy chain: custom regex, custom prefixes, built-in
    /// prefixes, underscore heuristic. An invalid regex is left out.
    pub fn new(config: &ClassifierConfig) -> Self {
        let mut strategies: Vec<Box<dyn ClassificationStrategy>> = Vec::new();

        if let Some(pattern) = config.custom_regex.as_deref().filter(|p| !p.is_empty())
            && let Ok(regex) = Regex::new(pattern)
        {
            strategies.push(Box::new(CustomPattern::new(regex)));
        }

        if !config.custom_prefixes.is_empty() {
            strategies.push(Box::new(PrefixList::custom(config.custom_prefixes.clone())));
        }

        strategies.push(Box::new(PrefixList::builtin()));
        strategies.push(Box::new(UnderscoreHeuristic));

        Self { strategies }
    }

    /// Strategy names in evaluation order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn has_custom_pattern(&self) -> bool {
        self.strategy_names().contains(&"custom-regex")
    }

    /// Whether a cleaned label names a resource rather than a provider,
    /// module, variable or other meta node
    pub fn is_resource_label(&self, label: &str) -> bool {
        self.matching_strategy(label).is_some()
    }

    /// Name of the first strategy that classifies `label` as a resource
    pub fn matching_strategy(&self, label: &str) -> Option<&'static str> {
        let type_segment = type_segment(label)?;
        self.strategies
            .iter()
            .find(|strategy| strategy.matches(type_segment))
            .map(|strategy| strategy.name())
    }
}

/// Type segment of a label: `<type>` for `data.<type>.<name>`, otherwise the
/// second-to-last segment once module pairs are removed
fn type_segment(label: &str) -> Option<&str> {
    if label.is_empty() || is_provider_label(label) {
        return None;
    }

    let segments: Vec<&str> = label.split('.').collect();
    let (_, rest) = split_module_path(&segments);

    match rest {
        [DATA_SEGMENT, data_type, _, ..] => Some(*data_type),
        [.., type_segment, _] => Some(*type_segment),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_and_heuristic_resources() {
        let classifier = ResourceClassifier::default();

        assert!(classifier.is_resource_label("aws_instance.web"));
        assert!(classifier.is_resource_label("module.vpc.aws_subnet.private"));
        assert!(classifier.is_resource_label("data.aws_ami.ubuntu"));
        assert!(classifier.is_resource_label("acme_widget.main"));

        assert_eq!(
            classifier.matching_strategy("aws_instance.web"),
            Some("builtin-prefix")
        );
        assert_eq!(
            classifier.matching_strategy("acme_widget.main"),
            Some("underscore")
        );
    }

    #[test]
    fn test_meta_nodes_are_not_resources() {
        let classifier = ResourceClassifier::default();

        assert!(!classifier.is_resource_label(""));
        assert!(!classifier.is_resource_label("provider: registry.terraform.io/hashicorp/aws"));
        assert!(!classifier.is_resource_label("var.region"));
        assert!(!classifier.is_resource_label("output.vpc_id"));
        assert!(!classifier.is_resource_label("module.vpc"));
        assert!(!classifier.is_resource_label("root"));
    }

    #[test]
    fn test_custom_regex_takes_precedence() {
        let config = ClassifierConfig::new(Some("^widget$".to_string()), vec![]);
        let classifier = ResourceClassifier::new(&config);

        assert!(classifier.has_custom_pattern());
        assert!(classifier.is_resource_label("widget.main"));
        assert_eq!(
            classifier.matching_strategy("widget.main"),
            Some("custom-regex")
        );
    }

    #[test]
    fn test_custom_prefixes() {
        let config = ClassifierConfig::new(None, ClassifierConfig::parse_prefixes("acme, ,corp"));
        let classifier = ResourceClassifier::new(&config);

        assert_eq!(config.custom_prefixes, vec!["acme", "corp"]);
        assert!(classifier.is_resource_label("acmewidget.main"));
        assert_eq!(
            classifier.matching_strategy("corpthing.main"),
            Some("custom-prefix")
        );
        assert!(!classifier.is_resource_label("other.main"));
    }

    #[test]
    fn test_invalid_regex_falls_back_to_defaults() {
        let config = ClassifierConfig::new(Some("([unclosed".to_string()), vec![]);
        let classifier = ResourceClassifier::new(&config);

        assert!(!classifier.has_custom_pattern());
        assert_eq!(
            classifier.strategy_names(),
            vec!["builtin-prefix", "underscore"]
        );
        assert!(classifier.is_resource_label("aws_instance.web"));
    }

    #[test]
    fn test_type_segment_selection() {
        assert_eq!(type_segment("aws_instance.web"), Some("aws_instance"));
        assert_eq!(type_segment("module.a.module.b.aws_s3_bucket.logs"), Some("aws_s3_bucket"));
        assert_eq!(type_segment("data.aws_ami.ubuntu"), Some("aws_ami"));
        assert_eq!(type_segment("data.aws_ami"), Some("data"));
        assert_eq!(type_segment("module.vpc"), None);
    }
}
