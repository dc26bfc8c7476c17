//! Dispatch of style input into identity, class name and CSS text.

use crate::compiler::compile;
use crate::hash::{class_name_for_id, hash};
use crate::style::StyleObject;
use crate::template::Template;

/// Input accepted by the compile entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleInput {
    /// Template-literal input: always compiles to a single flat rule.
    Template(Template),
    /// Style object input: full nested compilation.
    Object(StyleObject),
}

impl From<Template> for StyleInput {
    fn from(template: Template) -> Self {
        Self::Template(template)
    }
}

impl From<StyleObject> for StyleInput {
    fn from(object: StyleObject) -> Self {
        Self::Object(object)
    }
}

impl From<&StyleObject> for StyleInput {
    fn from(object: &StyleObject) -> Self {
        Self::Object(object.clone())
    }
}

/// Identity and CSS produced for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInput {
    /// Content-derived identity.
    pub id: String,
    /// `zc-<id>`.
    pub class_name: String,
    /// Complete CSS, ready to inject.
    pub css_text: String,
}

impl StyleInput {
    /// Serialized form that feeds the identity hash.
    pub fn identity_source(&self) -> String {
        match self {
            Self::Template(template) => template.css_text(),
            Self::Object(object) => object.to_json_string(),
        }
    }

    /// Hash, name and compile this input.
    pub fn compile(&self) -> CompiledInput {
        match self {
            Self::Template(template) => {
                let text = template.css_text();
                let id = hash(&text);
                let class_name = class_name_for_id(&id);
                let css_text = format!(".{class_name} {{ {text} }}");
                CompiledInput { id, class_name, css_text }
            }
            Self::Object(object) => {
                let id = hash(&object.to_json_string());
                let class_name = class_name_for_id(&id);
                let css_text = compile(object, &class_name);
                CompiledInput { id, class_name, css_text }
            }
        }
    }
}
