//! Agent commands
//!
//! ```bash
//! coscientist agents list
//! coscientist agents info reflection-agent-v1
//! ```

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::{Cell, Color, Table};
use coscientist_agents::{get_agent_registrations, AgentRegistration};
use serde::Serialize;

use crate::context::Context;
use crate::output::{print_field, print_section};

/// Agent information commands
#[derive(Debug, Args)]
pub struct AgentsCommands {
    #[command(subcommand)]
    pub command: AgentsSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum AgentsSubcommand {
    /// List available agents
    List,

    /// Show agent registration info
    Info {
        /// Agent ID
        agent_id: String,
    },
}

/// Serializable view of a registration.
#[derive(Debug, Serialize)]
struct AgentView {
    id: String,
    version: String,
    classification: String,
    cli_command: String,
    temperature: Option<f32>,
}

impl From<&AgentRegistration> for AgentView {
    fn from(reg: &AgentRegistration) -> Self {
        Self {
            id: reg.id.clone(),
            version: reg.version.clone(),
            classification: reg.classification.to_string(),
            cli_command: reg.cli_command.clone(),
            temperature: reg.temperature,
        }
    }
}

fn temperature_label(temperature: Option<f32>) -> String {
    temperature.map_or_else(|| "-".to_string(), |t| format!("{t:.1}"))
}

/// Execute agent commands
pub fn execute(ctx: &Context, cmd: AgentsCommands) -> Result<()> {
    match cmd.command {
        AgentsSubcommand::List => list_agents(ctx),
        AgentsSubcommand::Info { agent_id } => agent_info(ctx, &agent_id),
    }
}

/// List available agents
fn list_agents(ctx: &Context) -> Result<()> {
    let views: Vec<AgentView> = get_agent_registrations().iter().map(AgentView::from).collect();

    ctx.output.emit(&views, |views| {
        let mut table = Table::new();
        table.set_header(vec![
            Cell::new("Agent ID").fg(Color::Cyan),
            Cell::new("Version").fg(Color::Cyan),
            Cell::new("Classification").fg(Color::Cyan),
            Cell::new("Command").fg(Color::Cyan),
            Cell::new("Temperature").fg(Color::Cyan),
        ]);
        for view in views {
            table.add_row(vec![
                Cell::new(&view.id),
                Cell::new(&view.version),
                Cell::new(&view.classification),
                Cell::new(&view.cli_command),
                Cell::new(temperature_label(view.temperature)),
            ]);
        }
        println!("{table}");
    })?;

    ctx.output.info(&format!("{} agent(s) available", views.len()));
    Ok(())
}

/// Show agent info
fn agent_info(ctx: &Context, agent_id: &str) -> Result<()> {
    let registrations = get_agent_registrations();

    match registrations.iter().find(|r| r.id == agent_id) {
        Some(reg) => ctx.output.emit(&AgentView::from(reg), |view| {
            print_section("Agent Information");
            print_field("Agent ID", &view.id);
            print_field("Version", &view.version);
            print_field("Classification", &view.classification);
            print_field("CLI Command", &view.cli_command);
            print_field("Model", &ctx.config.llm.model);
            print_field("Temperature", &temperature_label(view.temperature));
        }),
        None => {
            ctx.output.warn(&format!("Agent not found: {agent_id}"));
            ctx.output.info("Use 'agents list' to see available agents");
            Ok(())
        }
    }
}
