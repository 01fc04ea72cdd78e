//! Instruction templating with `{{placeholder}}` substitution.
//!
//! Templates are plain text; every `{{ key }}` occurrence is replaced with the
//! string form of `inputs[key]`. A placeholder without a matching input is an
//! error rather than being sent verbatim to the generation service.
use serde_json::{json, Value};
use crate::error::{AppResult, AppError};
use crate::style::StyleCategory;

pub const STYLE_TEMPLATE: &str = "Create a photorealistic full-body fashion photograph of a model wearing a complete \
{{style}} outfit built around the clothing item in the attached image. Keep that item exactly as it appears: same \
colour, pattern, fabric and cut. {{guidance}} Use a clean, softly lit studio background and show the whole outfit \
from head to toe.";

pub const EDIT_TEMPLATE: &str = "Edit the attached outfit photograph: {{instruction}}. Keep the model, the pose, the \
background and every other garment unchanged unless the request says otherwise.";

#[derive(Clone, Debug)]
pub struct PromptConstructor {
    style_template: String,
    edit_template: String,
}

impl Default for PromptConstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptConstructor {
    pub fn new() -> Self {
        PromptConstructor {
            style_template: STYLE_TEMPLATE.to_string(),
            edit_template: EDIT_TEMPLATE.to_string(),
        }
    }

    /// Instruction sent alongside the uploaded item for one style.
    pub fn style_instruction(&self, style: StyleCategory) -> AppResult<String> {
        self.construct_prompt(
            &self.style_template,
            &json!({ "style": style.label(), "guidance": style.guidance() }),
        )
    }

    /// Instruction sent alongside an existing outfit image for a refinement.
    pub fn edit_instruction(&self, instruction: &str) -> AppResult<String> {
        let trimmed = instruction.trim().trim_end_matches('.');
        self.construct_prompt(&self.edit_template, &json!({ "instruction": trimmed }))
    }

    /// Construct a prompt by substituting placeholders inside `template`
    /// with corresponding values from `inputs`.
    pub fn construct_prompt(&self, template: &str, inputs: &Value) -> AppResult<String> {
        if !inputs.is_object() {
            return Err(AppError::PromptConstruction("Inputs must be a JSON object".to_string()));
        }

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| {
                AppError::PromptConstruction("Unterminated placeholder in template".to_string())
            })?;
            let key = after[..end].trim();
            let replacement = inputs
                .get(key)
                .ok_or_else(|| AppError::PromptConstruction(format!("Missing input for placeholder: {}", key)))?;
            match replacement {
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
