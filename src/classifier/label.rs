//! Label cleanup and structural parsing
//!
//! Terraform labels are resource addresses such as
//! `module.network.module.vpc.aws_subnet.private` or
//! `data.aws_ami.ubuntu`. This module strips the graph decorations from them
//! and splits them into module path, resource type and provider.

use crate::utils::string::strip_annotations;

const MODULE_SEGMENT: &str = "module";
const DATA_SEGMENT: &str = "data";
const PROVIDER_PREFIX: &str = "provider[";

/// Prefix of a provider label after [`clean_label`]
pub const PROVIDER_LABEL_PREFIX: &str = "provider:";

/// Structural parts of a resource address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelComponents {
    /// Dot-joined module names, empty for root module resources
    pub module_path: String,
    /// Resource type such as `aws_instance`, empty when undetermined
    pub resource_type: String,
    /// Text before the first underscore of the resource type, if any
    pub provider: String,
}

impl LabelComponents {
    pub fn has_module_path(&self) -> bool {
        !self.module_path.is_empty()
    }

    pub fn has_resource_type(&self) -> bool {
        !self.resource_type.is_empty()
    }

    pub fn has_provider(&self) -> bool {
        !self.provider.is_empty()
    }
}

/// Produce the display form of a raw label
///
/// Provider labels become `provider: <address>` and backslashes left over
/// from DOT escaping are removed.
pub fn clean_label(raw: &str) -> String {
    let mut label = strip_annotations(raw);
    if label.starts_with(PROVIDER_PREFIX) {
        label = label.replacen('[', ": ", 1).replace(']', "");
    }
    label.replace('\\', "")
}

/// Whether a cleaned label names a provider configuration
pub fn is_provider_label(label: &str) -> bool {
    label.starts_with(PROVIDER_LABEL_PREFIX)
}

/// Drop leading `module.<name>` pairs, returning the module names and the rest
pub(crate) fn split_module_path<'s, 'a>(segments: &'s [&'a str]) -> (Vec<&'a str>, &'s [&'a str]) {
    let mut modules = Vec::new();
    let mut rest = segments;
    while let [MODULE_SEGMENT, name, tail @ ..] = rest {
        modules.push(*name);
        rest = tail;
    }
    (modules, rest)
}

/// Split a cleaned label into module path, resource type and provider
pub fn parse_label_components(label: &str) -> LabelComponents {
    let segments: Vec<&str> = label.split('.').collect();
    if segments.len() < 2 {
        return LabelComponents::default();
    }

    let (modules, rest) = split_module_path(&segments);
    let mut components = LabelComponents {
        module_path: modules.join("."),
        ..LabelComponents::default()
    };

    if rest.len() < 2 {
        return components;
    }

    let resource_type = match rest {
        [DATA_SEGMENT, data_type, _, ..] => *data_type,
        [DATA_SEGMENT, ..] => return components,
        [first, ..] => *first,
        [] => return components,
    };

    components.resource_type = resource_type.to_string();
    components.provider = provider_of(resource_type).to_string();
    components
}

fn provider_of(resource_type: &str) -> &str {
    match resource_type.find('_') {
        Some(position) if position > 0 => &resource_type[..position],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_label_strips_annotations() {
        assert_eq!(
            clean_label("[root] aws_instance.web (expand)"),
            "aws_instance.web"
        );
        assert_eq!(clean_label(r"var.path\\with\\slashes"), "var.pathwithslashes");
    }

    #[test]
    fn test_clean_label_provider_display_form() {
        assert_eq!(
            clean_label("provider[registry.terraform.io/hashicorp/aws]"),
            "provider: registry.terraform.io/hashicorp/aws"
        );
        assert_eq!(
            clean_label(r#"provider["registry.terraform.io/hashicorp/aws"].east"#),
            "provider: registry.terraform.io/hashicorp/aws.east"
        );
        assert!(is_provider_label(&clean_label(
            "[root] provider[registry.terraform.io/hashicorp/google] (close)"
        )));
    }

    #[test]
    fn test_parse_root_resource() {
        let components = parse_label_components("aws_instance.web");
        assert_eq!(
            components,
            LabelComponents {
                module_path: String::new(),
                resource_type: "aws_instance".to_string(),
                provider: "aws".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_nested_module_resource() {
        let components = parse_label_components("module.network.module.vpc.aws_subnet.private");
        assert_eq!(components.module_path, "network.vpc");
        assert_eq!(components.resource_type, "aws_subnet");
        assert_eq!(components.provider, "aws");
    }

    #[test]
    fn test_parse_data_source() {
        let components = parse_label_components("module.app.data.aws_ami.ubuntu");
        assert_eq!(components.module_path, "app");
        assert_eq!(components.resource_type, "aws_ami");
        assert_eq!(components.provider, "aws");

        // `data.<type>` without a name is not a data source address
        let short = parse_label_components("data.aws_ami");
        assert!(!short.has_resource_type());
        assert!(!short.has_provider());
    }

    #[test]
    fn test_parse_without_provider_prefix() {
        let components = parse_label_components("var.region");
        assert_eq!(components.resource_type, "var");
        assert!(!components.has_provider());

        let leading_underscore = parse_label_components("_private.thing");
        assert_eq!(leading_underscore.resource_type, "_private");
        assert!(!leading_underscore.has_provider());
    }

    #[test]
    fn test_parse_degenerate_labels() {
        assert_eq!(parse_label_components(""), LabelComponents::default());
        assert_eq!(parse_label_components("root"), LabelComponents::default());

        let only_module = parse_label_components("module.vpc");
        assert_eq!(only_module.module_path, "vpc");
        assert!(!only_module.has_resource_type());

        let module_then_one = parse_label_components("module.vpc.output");
        assert_eq!(module_then_one.module_path, "vpc");
        assert!(!module_then_one.has_resource_type());
    }
}
