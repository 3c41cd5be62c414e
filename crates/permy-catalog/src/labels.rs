//! Default display labels for newly discovered permissions.
//!
//! Labels are generated from templates holding `:controller` and `:method`
//! placeholders, the way the host's localization files phrase them.
//! Products translate the generated catalog afterwards.

use serde::{Deserialize, Serialize};

/// Display name and description of a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Label {
    /// Human-readable name.
    pub name: String,
    /// Human-readable description.
    pub desc: String,
}

/// Produces default labels for controllers and methods.
pub trait LabelSource {
    /// Label for a controller entry.
    fn controller_label(&self, controller: &str) -> Label;

    /// Label for a method entry under `controller`.
    fn method_label(&self, controller: &str, method: &str) -> Label;
}

/// Placeholder-based label templates.
///
/// # Example
///
/// ```
/// use permy_catalog::labels::{LabelSource, TemplateLabels};
///
/// let labels = TemplateLabels::default();
/// let label = labels.controller_label("UserController");
/// assert_eq!(label.desc, "UserController permissions");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateLabels {
    /// Controller name template.
    pub controller_name: String,
    /// Controller description template.
    pub controller_desc: String,
    /// Method name template.
    pub method_name: String,
    /// Method description template.
    pub method_desc: String,
}

impl Default for TemplateLabels {
    fn default() -> Self {
        Self {
            controller_name: ":controller".to_string(),
            controller_desc: ":controller permissions".to_string(),
            method_name: ":method".to_string(),
            method_desc: "Allows :method on :controller".to_string(),
        }
    }
}

impl TemplateLabels {
    fn render(template: &str, controller: &str, method: Option<&str>) -> String {
        let rendered = template.replace(":controller", controller);
        match method {
            Some(method) => rendered.replace(":method", method),
            None => rendered,
        }
    }
}

impl LabelSource for TemplateLabels {
    fn controller_label(&self, controller: &str) -> Label {
        Label {
            name: Self::render(&self.controller_name, controller, None),
            desc: Self::render(&self.controller_desc, controller, None),
        }
    }

    fn method_label(&self, controller: &str, method: &str) -> Label {
        Label {
            name: Self::render(&self.method_name, controller, Some(method)),
            desc: Self::render(&self.method_desc, controller, Some(method)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let labels = TemplateLabels::default();

        let controller = labels.controller_label("UserController");
        assert_eq!(controller.name, "UserController");
        assert_eq!(controller.desc, "UserController permissions");

        let method = labels.method_label("UserController", "destroy");
        assert_eq!(method.name, "destroy");
        assert_eq!(method.desc, "Allows destroy on UserController");
    }

    #[test]
    fn test_custom_templates() {
        let labels = TemplateLabels {
            controller_name: "Gestion :controller".to_string(),
            controller_desc: "Droits de :controller".to_string(),
            method_name: ":controller::method".to_string(),
            method_desc: String::new(),
        };

        assert_eq!(labels.controller_label("Post").name, "Gestion Post");
        assert_eq!(labels.method_label("Post", "edit").name, "Post:edit");
        assert_eq!(labels.method_label("Post", "edit").desc, "");
    }

    #[test]
    fn test_partial_templates_deserialize_with_defaults() {
        let labels: TemplateLabels =
            serde_json::from_str(r#"{"controller_name": "Manage :controller"}"#).unwrap();
        assert_eq!(labels.controller_name, "Manage :controller");
        assert_eq!(labels.method_name, ":method");
    }
}
