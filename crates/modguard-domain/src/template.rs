//! Contract naming template.
//!
//! Placeholders: `{namespace}`, `{module}`, `{module_lower}`, `{module_kebab}`.
//! At least one module placeholder is required, otherwise every microservice
//! would map to the same contract id.

use crate::model::ContractId;
use thiserror::Error;

pub const DEFAULT_CONTRACT_TEMPLATE: &str = "{namespace}.{module}.Contracts";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed placeholder at byte {position} in contract template '{template}'")]
    Unclosed { template: String, position: usize },
    #[error("unknown placeholder '{{{name}}}' in contract template '{template}'")]
    UnknownPlaceholder { template: String, name: String },
    #[error("contract template '{template}' has no module placeholder")]
    MissingModule { template: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Namespace,
    Module,
    ModuleLower,
    ModuleKebab,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl Default for ContractTemplate {
    fn default() -> Self {
        Self {
            raw: DEFAULT_CONTRACT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Namespace,
                Segment::Literal(".".to_string()),
                Segment::Module,
                Segment::Literal(".Contracts".to_string()),
            ],
        }
    }
}

impl ContractTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = raw;
        let mut offset = 0;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                return Err(TemplateError::Unclosed {
                    template: raw.to_string(),
                    position: offset + open,
                });
            };
            let segment = match &after[..close] {
                "namespace" => Segment::Namespace,
                "module" => Segment::Module,
                "module_lower" => Segment::ModuleLower,
                "module_kebab" => Segment::ModuleKebab,
                other => {
                    return Err(TemplateError::UnknownPlaceholder {
                        template: raw.to_string(),
                        name: other.to_string(),
                    });
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);

            let consumed = open + 1 + close + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let has_module = segments.iter().any(|s| {
            matches!(
                s,
                Segment::Module | Segment::ModuleLower | Segment::ModuleKebab
            )
        });
        if !has_module {
            return Err(TemplateError::MissingModule {
                template: raw.to_string(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn render(&self, namespace: &str, module: &str) -> ContractId {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Namespace => out.push_str(namespace),
                Segment::Module => out.push_str(module),
                Segment::ModuleLower => out.push_str(&module.to_ascii_lowercase()),
                Segment::ModuleKebab => out.push_str(&kebab_case(module)),
            }
        }
        ContractId::new(out)
    }
}

/// `OrderProcessing` -> `order-processing`, `HTTPApi` -> `http-api`.
fn kebab_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '_' | ' ' | '.' | '-') {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}
