//! Prompt templates.
//!
//! Templates use `{{variable}}` placeholders. Placeholders without a value
//! are removed from the output.

use rmcp::model::PromptArgument;
use std::collections::HashMap;

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The unique name of the prompt.
    pub name: String,

    /// A description of what the prompt does.
    pub description: Option<String>,

    /// The arguments that this prompt accepts.
    pub arguments: Vec<PromptArgument>,

    /// The template string with placeholders.
    pub template: String,
}

impl PromptTemplate {
    /// Names of the arguments declared as required.
    pub fn required_arguments(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .iter()
            .filter(|arg| arg.required.unwrap_or(false))
            .map(|arg| arg.name.as_str())
    }

    /// Render the template with the given arguments.
    pub fn render(&self, arguments: &HashMap<String, String>) -> String {
        let mut result = self.template.clone();

        for (key, value) in arguments {
            let placeholder = format!("{{{{{}}}}}", key);
            result = result.replace(&placeholder, value);
        }

        clean_unmatched_placeholders(&result)
    }
}

/// Remove `{{name}}` placeholders that received no value.
fn clean_unmatched_placeholders(template: &str) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        match rest[start..].find("}}") {
            Some(len) => {
                result.push_str(&rest[..start]);
                rest = &rest[start + len + 2..];
            }
            None => break,
        }
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(text: &str) -> PromptTemplate {
        PromptTemplate {
            name: "test".to_string(),
            description: None,
            arguments: vec![],
            template: text.to_string(),
        }
    }

    #[test]
    fn test_simple_substitution() {
        let mut args = HashMap::new();
        args.insert("topic".to_string(), "artilheiros".to_string());

        assert_eq!(template("Tema: {{topic}}!").render(&args), "Tema: artilheiros!");
    }

    #[test]
    fn test_unmatched_placeholder_removed() {
        assert_eq!(template("Tema: {{topic}}.").render(&HashMap::new()), "Tema: .");
    }

    #[test]
    fn test_unclosed_braces_kept() {
        assert_eq!(template("a {{b").render(&HashMap::new()), "a {{b");
    }
}
