// src/extension.rs - Attribute extensions layered onto the textStyle mark
//
// Extensions are declared statically and merged once into a closed
// attribute schema. After installation the registry is never mutated.

use crate::document::MarkKind;
use log::debug;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use thiserror::Error;

static REGISTRY: OnceLock<ExtensionRegistry> = OnceLock::new();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("attribute `{attribute}` from extension `{extension}` is already declared by `{existing}`")]
    DuplicateAttribute {
        attribute: &'static str,
        extension: &'static str,
        existing: &'static str,
    },
    #[error("extension `{extension}` attaches attributes to `{mark}`, which carries none")]
    AttributesNotSupported {
        extension: &'static str,
        mark: &'static str,
    },
    #[error("extension registry is already installed")]
    AlreadyInstalled,
}

/// Parsed `style="..."` declarations of a source element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclarations(Vec<(String, String)>);

impl StyleDeclarations {
    /// Lenient parse: anything that is not a `property: value` pair is skipped.
    pub fn parse(style: &str) -> Self {
        let declarations = style
            .split(';')
            .filter_map(|decl| {
                let (property, value) = decl.split_once(':')?;
                let property = property.trim().to_ascii_lowercase();
                let value = value.trim();
                if property.is_empty() || value.is_empty() {
                    return None;
                }
                Some((property, value.to_string()))
            })
            .collect();
        Self(declarations)
    }

    /// Last declaration of `property` wins, as in CSS.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One typed attribute contributed by an extension.
#[derive(Debug, Clone, Copy)]
pub struct AttributeSpec {
    pub name: &'static str,
    /// Value meaning "inherit"; `None` is the usual null default.
    pub default: Option<&'static str>,
    /// Extract the value from source markup. Must be total.
    pub parse: fn(&StyleDeclarations) -> Option<String>,
    /// Style fragment for a non-default value, e.g. `font-size: 20px`.
    pub render: fn(&str) -> String,
}

impl AttributeSpec {
    pub fn is_default(&self, value: &str) -> bool {
        value.trim().is_empty() || self.default == Some(value)
    }

    /// Parsed value, or `None` when absent, malformed or equal to the default.
    pub fn parse_value(&self, style: &StyleDeclarations) -> Option<String> {
        (self.parse)(style).filter(|value| !self.is_default(value))
    }

    /// The value `value` reads back as once rendered and parsed again, or
    /// `None` when it reads back as unset. Stored values are kept in this
    /// form so markup round trips are exact.
    pub fn canonical(&self, value: &str) -> Option<String> {
        let rendered = self.render_value(Some(value))?;
        self.parse_value(&StyleDeclarations::parse(&rendered))
    }

    /// Style fragment for `value`; nothing for unset or default values.
    pub fn render_value(&self, value: Option<&str>) -> Option<String> {
        value
            .filter(|value| !self.is_default(value))
            .map(|value| (self.render)(value))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Extension {
    pub name: &'static str,
    pub mark: MarkKind,
    pub attributes: &'static [AttributeSpec],
}

pub const FONT_SIZE: Extension = Extension {
    name: "fontSize",
    mark: MarkKind::TextStyle,
    attributes: &[AttributeSpec {
        name: "fontSize",
        default: None,
        parse: parse_font_size,
        render: render_font_size,
    }],
};

pub const FONT_FAMILY: Extension = Extension {
    name: "fontFamily",
    mark: MarkKind::TextStyle,
    attributes: &[AttributeSpec {
        name: "fontFamily",
        default: None,
        parse: parse_font_family,
        render: render_font_family,
    }],
};

pub const BUILTIN_EXTENSIONS: &[Extension] = &[FONT_SIZE, FONT_FAMILY];

fn parse_font_size(style: &StyleDeclarations) -> Option<String> {
    style.get("font-size").map(str::to_string)
}

fn render_font_size(value: &str) -> String {
    format!("font-size: {}", value)
}

fn parse_font_family(style: &StyleDeclarations) -> Option<String> {
    style
        .get("font-family")
        .map(|value| value.replace(['\'', '"'], "").trim().to_string())
        .filter(|value| !value.is_empty())
}

fn render_font_family(value: &str) -> String {
    format!("font-family: {}", value)
}

#[derive(Debug, Clone, Copy)]
pub struct RegisteredAttribute {
    pub extension: &'static str,
    pub spec: AttributeSpec,
}

/// Attribute schema for `textStyle`, merged from every registered extension
/// in registration order.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    text_style: Vec<RegisteredAttribute>,
}

impl ExtensionRegistry {
    pub fn build(extensions: &[Extension]) -> Result<Self, ConfigurationError> {
        let mut text_style: Vec<RegisteredAttribute> = Vec::new();
        for extension in extensions {
            if !extension.mark.accepts_attributes() {
                return Err(ConfigurationError::AttributesNotSupported {
                    extension: extension.name,
                    mark: extension.mark.name(),
                });
            }
            for spec in extension.attributes {
                if let Some(existing) = text_style.iter().find(|a| a.spec.name == spec.name) {
                    return Err(ConfigurationError::DuplicateAttribute {
                        attribute: spec.name,
                        extension: extension.name,
                        existing: existing.extension,
                    });
                }
                debug!(
                    "registering attribute {} on {} from {}",
                    spec.name,
                    extension.mark.name(),
                    extension.name
                );
                text_style.push(RegisteredAttribute {
                    extension: extension.name,
                    spec: *spec,
                });
            }
        }
        Ok(Self { text_style })
    }

    /// Install a custom extension set as the process-wide registry. Must run
    /// before the first call to [`ExtensionRegistry::global`]; include
    /// [`BUILTIN_EXTENSIONS`] to keep font size and family.
    pub fn install(extensions: &[Extension]) -> Result<&'static Self, ConfigurationError> {
        let registry = Self::build(extensions)?;
        REGISTRY
            .set(registry)
            .map_err(|_| ConfigurationError::AlreadyInstalled)?;
        Ok(Self::global())
    }

    /// The process-wide registry, defaulting to [`BUILTIN_EXTENSIONS`].
    pub fn global() -> &'static Self {
        REGISTRY.get_or_init(|| {
            Self::build(BUILTIN_EXTENSIONS)
                .unwrap_or_else(|err| panic!("builtin extensions conflict: {}", err))
        })
    }

    pub fn attributes(&self, kind: MarkKind) -> &[RegisteredAttribute] {
        if kind.accepts_attributes() {
            &self.text_style
        } else {
            &[]
        }
    }

    pub fn attribute(&self, kind: MarkKind, name: &str) -> Option<&AttributeSpec> {
        self.attributes(kind)
            .iter()
            .map(|a| &a.spec)
            .find(|spec| spec.name == name)
    }

    /// Unknown attributes count as defaults so normalization drops them.
    pub fn is_default(&self, kind: MarkKind, name: &str, value: &str) -> bool {
        self.attribute(kind, name)
            .is_none_or(|spec| spec.is_default(value))
    }

    /// Canonical form of an attribute value; unknown attributes have none.
    pub fn canonical(&self, kind: MarkKind, name: &str, value: &str) -> Option<String> {
        self.attribute(kind, name)?.canonical(value)
    }

    pub fn parse_style(&self, kind: MarkKind, style: &StyleDeclarations) -> BTreeMap<String, String> {
        self.attributes(kind)
            .iter()
            .filter_map(|a| Some((a.spec.name.to_string(), a.spec.parse_value(style)?)))
            .collect()
    }

    /// Combined `style` attribute value, or `None` when every attribute is
    /// unset.
    pub fn render_style(&self, kind: MarkKind, attrs: &BTreeMap<String, String>) -> Option<String> {
        let fragments: Vec<String> = self
            .attributes(kind)
            .iter()
            .filter_map(|a| {
                a.spec
                    .render_value(attrs.get(a.spec.name).map(String::as_str))
            })
            .collect();
        if fragments.is_empty() {
            None
        } else {
            Some(fragments.join("; "))
        }
    }
}
