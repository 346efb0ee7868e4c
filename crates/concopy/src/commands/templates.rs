//! Templates command - list the builtin catalog

use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use concopy_core::catalog::{self, TemplateDescriptor};
use serde_json::{Value, json};

pub fn run(json: bool, code: bool) -> Result<()> {
    let templates = catalog::templates();

    if json {
        let entries: Vec<Value> = templates.iter().map(|t| to_json(t, code)).collect();
        return print_json(&entries);
    }

    for template in templates {
        print_text(&format!("{:<16} {}", template.id.cyan(), template.name.bold()))?;
        print_text(&format!("{:<16} {}", "", template.description.dimmed()))?;
        if code {
            for line in template.code.lines() {
                print_text(&format!("    {}", line))?;
            }
            print_text("")?;
        }
    }
    Ok(())
}

fn to_json(template: &TemplateDescriptor, code: bool) -> Value {
    let mut entry = json!({
        "id": template.id,
        "name": template.name,
        "description": template.description,
    });
    if code {
        entry["code"] = json!(template.code);
    }
    entry
}
