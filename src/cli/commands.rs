use std::path::Path;

use crate::domain::PeriodDimension;
use crate::grouping::{group_entries, GroupView};
use crate::statement::{collect_node_ids, option_label, NodeId};
use crate::storage::{load_entries_from_path, JsonFileSource, RecordSource, StaticSource};
use crate::utils::build_info;

use super::context::ShellContext;
use super::errors::{CommandError, CommandResult};
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use super::ui::statement_view::render_groups;
use super::ui::table_renderer::{Table, TableColumn};

pub fn register_all(registry: &mut CommandRegistry) {
    let entries = [
        CommandEntry::new("load", "Load a statement from a JSON file", "load <path>", cmd_load),
        CommandEntry::new("demo", "Load the built-in sample statement", "demo", cmd_demo),
        CommandEntry::new("show", "Print the current statement", "show", cmd_show),
        CommandEntry::new(
            "period",
            "Choose the period dimension and value",
            "period <safra|ano|mes> [value]",
            cmd_period,
        ),
        CommandEntry::new("options", "List discovered period values", "options", cmd_options),
        CommandEntry::new("ir", "Toggle the income-tax-only filter", "ir <on|off>", cmd_ir),
        CommandEntry::new(
            "cc",
            "Inspect or change the cost-center selection",
            "cc <list|all|none|select|deselect> [name]",
            cmd_cc,
        ),
        CommandEntry::new("expand", "Expand one node or the whole tree", "expand <all|id>", cmd_expand),
        CommandEntry::new(
            "collapse",
            "Collapse one node or the whole tree",
            "collapse <all|id>",
            cmd_collapse,
        ),
        CommandEntry::new("toggle", "Expand or collapse a node", "toggle <id>", cmd_toggle),
        CommandEntry::new("ids", "List node ids usable with expand/collapse", "ids", cmd_ids),
        CommandEntry::new(
            "group",
            "Group ledger entries by season/year or year/month",
            "group <safra|mes> <path>",
            cmd_group,
        ),
        CommandEntry::new(
            "config",
            "Show or change settings",
            "config [show|set <key> <value>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build information", "version", cmd_version),
        CommandEntry::new("help", "List commands or describe one", "help [command]", cmd_help),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ];
    for entry in entries {
        registry.register(entry);
    }
    registry.alias("quit", "exit");
    registry.alias("?", "help");
}

fn usage(context: &ShellContext, name: &str) -> CommandError {
    let usage = context
        .registry
        .get(name)
        .map(|entry| entry.usage)
        .unwrap_or(name);
    CommandError::usage(usage)
}

fn load_from(context: &mut ShellContext, source: &dyn RecordSource) -> CommandResult {
    let described = source.describe();
    context.source = None;
    context.controller.load(source)?;
    context.source = Some(described.clone());
    output::success(format!(
        "Loaded {} natures from {described}.",
        context.controller.forest().len()
    ));
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(usage(context, "load"));
    };
    load_from(context, &JsonFileSource::new(*path))
}

fn cmd_demo(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    load_from(context, &StaticSource::sample())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.show_statement();
    Ok(())
}

fn cmd_period(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [key] => {
            let dimension = key
                .parse::<PeriodDimension>()
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
            context.controller.set_period_dimension(dimension);
        }
        [key, value @ ..] => {
            let value = value.join(" ");
            let dimension = key.parse::<PeriodDimension>();
            match dimension {
                Ok(dimension) => context.controller.set_period(dimension, value),
                Err(_) => {
                    output::warning(format!("Unknown period dimension `{key}`; period filter disabled."));
                    context.controller.set_period_key(key, value);
                }
            }
        }
        [] => return Err(usage(context, "period")),
    }
    let view = context.controller.view();
    if let Some(dimension) = view.period_dimension {
        if !view.period_options.is_empty() && !view.period_options.contains(&view.period_value) {
            output::warning(format!(
                "`{}` is not a known {} value; totals will be zero.",
                view.period_value,
                dimension.label()
            ));
        }
    }
    Ok(())
}

fn cmd_options(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let periods = context.controller.periods();
    if periods.is_empty() {
        output::info("No period values found in the current statement.");
        return Ok(());
    }
    let current = &context.controller.view().period_value;
    for dimension in PeriodDimension::ALL {
        let options = periods.options(dimension);
        if options.is_empty() {
            continue;
        }
        output::section(format!("{} ({})", dimension.label(), dimension.key()));
        for value in options {
            let marker = if context.controller.filter().period.dimension == Some(dimension)
                && value == current
            {
                "*"
            } else {
                " "
            };
            println!("{marker} {value:<10} {}", option_label(dimension, value));
        }
    }
    Ok(())
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "sim" | "true" | "1" => Some(true),
        "off" | "nao" | "não" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn cmd_ir(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let on = match args {
        [] => !context.controller.filter().tax_relevant_only,
        [value] => parse_switch(value).ok_or_else(|| usage(context, "ir"))?,
        _ => return Err(usage(context, "ir")),
    };
    context.controller.set_tax_filter(on);
    output::info(format!(
        "Income-tax-only filter {}.",
        if on { "enabled" } else { "disabled" }
    ));
    Ok(())
}

fn cmd_cc(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["list"] => {
            let selection = context.controller.cost_centers();
            if selection.universe().is_empty() {
                output::info("No cost centers in the current statement.");
            }
            for name in selection.universe() {
                let mark = if selection.contains(name) { "[x]" } else { "[ ]" };
                println!("{mark} {name}");
            }
        }
        ["all"] => context.controller.select_all(),
        ["none"] => context.controller.select_none(),
        ["select", name @ ..] if !name.is_empty() => {
            let name = name.join(" ");
            if !context.controller.select(&name) {
                return Err(CommandError::Message(format!("Unknown cost center `{name}`.")));
            }
        }
        ["deselect", name @ ..] if !name.is_empty() => {
            let name = name.join(" ");
            if !context.controller.deselect(&name) {
                output::warning(format!("`{name}` was not selected."));
            }
        }
        _ => return Err(usage(context, "cc")),
    }
    Ok(())
}

fn cmd_expand(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["all"] => context.controller.expand_all(),
        [id] => context.controller.expand(&NodeId::from(*id))?,
        _ => return Err(usage(context, "expand")),
    }
    Ok(())
}

fn cmd_collapse(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["all"] => context.controller.collapse_all(),
        [id] => context.controller.collapse(&NodeId::from(*id))?,
        _ => return Err(usage(context, "collapse")),
    }
    Ok(())
}

fn cmd_toggle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage(context, "toggle"));
    };
    context.controller.toggle(&NodeId::from(*id))?;
    Ok(())
}

fn cmd_ids(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ids = collect_node_ids(context.controller.forest());
    if ids.is_empty() {
        output::info("The current statement has no nodes.");
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}

fn cmd_group(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (view, path) = match args {
        [path] => (GroupView::default(), *path),
        [view, path] => (GroupView::from_key(view), *path),
        _ => return Err(usage(context, "group")),
    };
    let entries = load_entries_from_path(Path::new(path))?;
    let groups = group_entries(&entries, view);
    output::section(view);
    println!("{}", render_groups(&groups, &context.controller.renderer().format));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            let mut table = Table::new(vec![TableColumn::left("Setting"), TableColumn::left("Value")]);
            for key in crate::config::Config::KEYS {
                table.push_row(vec![key.to_string(), context.config.get(key).unwrap_or_default()]);
            }
            println!("{}", table.render());
            output::hint(format!("Stored at {}", context.config_manager.path().display()));
        }
        ["set", key, value @ ..] => {
            let value = value.join(" ");
            context.config.set(key, &value)?;
            context.config_manager.save(&context.config)?;
            context.controller.renderer_mut().enabled = context.config.render_on_change;
            context.apply_config();
            output::success(format!("`{key}` updated."));
        }
        _ => return Err(usage(context, "config")),
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    println!("{}", build_info::current().summary());
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let [name] = args {
        let Some(entry) = context.registry.get(&name.to_lowercase()) else {
            context.suggest_command(name);
            return Ok(());
        };
        println!("{}: {}", entry.name, entry.description);
        println!("usage: {}", entry.usage);
        let aliases = context.registry.aliases_of(entry.name);
        if !aliases.is_empty() {
            println!("aliases: {}", aliases.join(", "));
        }
        return Ok(());
    }
    let mut table = Table::new(vec![TableColumn::left("Command"), TableColumn::left("Description")]);
    for entry in context.registry.list() {
        table.push_row(vec![entry.usage.to_string(), entry.description.to_string()]);
    }
    println!("{}", table.render());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
