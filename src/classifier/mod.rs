//! # Label Classification Module
//!
//! Turns raw Terraform labels into something the renderer and the filter
//! engine can reason about.
//!
//! ## Key Components
//!
//! - **clean_label**: strips graph decorations and produces the display form
//! - **parse_label_components**: splits an address into module path, resource
//!   type and provider
//! - **ResourceClassifier**: decides whether a label is a resource, using an
//!   ordered list of strategies configured through [`ClassifierConfig`]
//!
//! ## Example
//!
//! ```
//! use terramaid::classifier::{
//!     ClassifierConfig, ResourceClassifier, clean_label, parse_label_components,
//! };
//!
//! let label = clean_label("[root] module.vpc.aws_subnet.private (expand)");
//! assert_eq!(label, "module.vpc.aws_subnet.private");
//!
//! let components = parse_label_components(&label);
//! assert_eq!(components.module_path, "vpc");
//! assert_eq!(components.resource_type, "aws_subnet");
//! assert_eq!(components.provider, "aws");
//!
//! let classifier = ResourceClassifier::new(&ClassifierConfig::default());
//! assert!(classifier.is_resource_label(&label));
//! assert!(!classifier.is_resource_label("var.region"));
//! ```

mod label;
mod resource_classifier;

pub use label::{
    LabelComponents, PROVIDER_LABEL_PREFIX, clean_label, is_provider_label, parse_label_components,
};
pub use resource_classifier::{
    BUILTIN_PROVIDER_PREFIXES, ClassificationStrategy, ClassifierConfig, CustomPattern,
    PrefixList, ResourceClassifier, UnderscoreHeuristic,
};
