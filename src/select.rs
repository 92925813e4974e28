// src/select.rs
//! Interactive tool selection.

#![deny(missing_docs)]

use crate::catalog::{InstallState, ToolDescriptor};
use crate::error::{ScaffoldError, ScaffoldResult};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, MultiSelect};

/// One row of the tool checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Rendered label.
    pub label: String,
    /// Tool name.
    pub value: String,
    /// Pre-checked.
    pub checked: bool,
}

/// The interactive surface the selection loop talks to.
pub trait Prompt {
    /// Show `choices` as a checklist; returns the picked indices.
    fn multi_select(
        &mut self,
        message: &str,
        choices: &[Choice],
        page_size: usize,
    ) -> ScaffoldResult<Vec<usize>>;

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str, default: bool) -> ScaffoldResult<bool>;
}

/// [`Prompt`] backed by the terminal.
#[derive(Default)]
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl Prompt for TerminalPrompt {
    fn multi_select(
        &mut self,
        message: &str,
        choices: &[Choice],
        page_size: usize,
    ) -> ScaffoldResult<Vec<usize>> {
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        let defaults: Vec<bool> = choices.iter().map(|c| c.checked).collect();
        MultiSelect::with_theme(&self.theme)
            .with_prompt(message)
            .items(&labels)
            .defaults(&defaults)
            .max_length(page_size.max(1))
            .interact()
            .map_err(|e| ScaffoldError::Prompt(e.to_string()))
    }

    fn confirm(&mut self, message: &str, default: bool) -> ScaffoldResult<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(|e| ScaffoldError::Prompt(e.to_string()))
    }
}

/// Build the checklist rows for `tools`.
pub fn choices(tools: &[ToolDescriptor]) -> Vec<Choice> {
    let width = tools.len().to_string().len() + 1;
    tools
        .iter()
        .enumerate()
        .map(|(index, tool)| {
            let maybe = tool.state == InstallState::Maybe;
            let mut parts = vec![format!("{:>width$}", format!("{}.", index + 1)).dimmed().to_string()];
            if maybe {
                parts.push("[installed]".red().to_string());
            }
            parts.push(tool.name.bold().to_string());
            if !tool.install_by_default {
                parts.push("* not install by default *".dimmed().to_string());
            }

            Choice {
                label: parts.join(" "),
                value: tool.name.clone(),
                checked: tool.install_by_default && !maybe,
            }
        })
        .collect()
}

/// Let the user pick tools until a selection is confirmed or left empty.
///
/// The result keeps catalog order. Rejecting the confirmation shows the
/// checklist again; nothing else happens on rejection.
pub fn select(
    prompt: &mut dyn Prompt,
    tools: &[ToolDescriptor],
    page_size: usize,
) -> ScaffoldResult<Vec<ToolDescriptor>> {
    if tools.is_empty() {
        return Ok(Vec::new());
    }
    let rows = choices(tools);
    let page_size = page_size.min(rows.len());

    loop {
        let mut picked = prompt.multi_select("select config(s) you want install:", &rows, page_size)?;
        if picked.is_empty() {
            return Ok(Vec::new());
        }
        picked.sort_unstable();
        picked.dedup();

        let names: Vec<&str> = picked
            .iter()
            .filter_map(|&i| rows.get(i))
            .map(|c| c.value.as_str())
            .collect();
        let message = format!("install {} selected config(s): {}?", names.len(), names.join(","));
        if prompt.confirm(&message, true)? {
            return Ok(picked
                .into_iter()
                .filter_map(|i| tools.get(i).cloned())
                .collect());
        }
        tracing::debug!("selection rejected, asking again");
    }
}
