//! Command execution: one function per subcommand

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::{Operation, Script, Session, Step, StepReport, TreeView};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, render};
use crate::config::{global_config_path, Settings};
use crate::domain::{array_row, layout, Highlights, RangeTree};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let colorize = !cli.no_color;
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            cmd_completion(*shell);
            Ok(())
        }
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(command) => {
            let settings = load_settings(cli)?;
            match command {
                Commands::Tree => cmd_tree(&settings, colorize),
                Commands::Leaves => cmd_leaves(&settings),
                Commands::Query { l, r } => {
                    run_single(&settings, Operation::Query { l: *l, r: *r }, colorize)
                }
                Commands::Update { index, value } => run_single(
                    &settings,
                    Operation::Update {
                        index: *index,
                        value: *value,
                    },
                    colorize,
                ),
                Commands::Range { l, r, delta } => run_single(
                    &settings,
                    Operation::UpdateRange {
                        l: *l,
                        r: *r,
                        delta: *delta,
                    },
                    colorize,
                ),
                Commands::Layout => cmd_layout(&settings),
                Commands::Demo { steps } => cmd_demo(&settings, *steps, colorize),
                Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
            }
        }
        None => Err(CliError::Usage(
            "no command given, run with --help".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(values) = &cli.values {
        settings.data = values.clone();
    }
    debug!(len = settings.data.len(), strict = settings.strict_bounds, "settings loaded");
    Ok(settings)
}

fn print_view(view: &TreeView, colorize: bool) {
    output::info(&render::to_tree(view, colorize));
    output::info(&render::array_row(&view.leaves));
}

fn print_report(report: &StepReport) {
    output::header(&format!("Operation {}: {}", report.index, report.label));
    if let Some(result) = report.result {
        output::action("Result", &result);
    }
}

#[instrument(skip(settings))]
fn cmd_tree(settings: &Settings, colorize: bool) -> CliResult<()> {
    let tree = RangeTree::build(&settings.data)?;
    output::header(&format!(
        "{} elements, {} nodes, depth {}, total {}",
        tree.len(),
        tree.node_count(),
        tree.depth(),
        tree.total()
    ));
    print_view(&TreeView::capture(&tree, &Highlights::new()), colorize);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_leaves(settings: &Settings) -> CliResult<()> {
    let tree = RangeTree::build(&settings.data)?;
    let leaves: Vec<String> = tree.leaves().iter().map(i64::to_string).collect();
    output::info(&leaves.join(" "));
    Ok(())
}

#[instrument(skip(settings))]
fn run_single(settings: &Settings, operation: Operation, colorize: bool) -> CliResult<()> {
    let script = Script::new(vec![Step::new(operation)])?;
    let mut session =
        Session::new(&settings.data, script)?.with_strict_bounds(settings.strict_bounds);
    if let Some(report) = session.step()? {
        print_report(&report);
    }
    print_view(&session.snapshot(), colorize);
    if colorize {
        output::detail(&render::legend(true));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_layout(settings: &Settings) -> CliResult<()> {
    let tree = RangeTree::build(&settings.data)?;
    let positions = layout(&tree, &settings.layout_params());
    output::header("Nodes");
    for (idx, node) in tree.iter() {
        if let Some(pos) = positions.get(&idx) {
            output::detail(&format!(
                "[{}, {}] at ({:.1}, {:.1}) r={:.1}",
                node.lo, node.hi, pos.x, pos.y, settings.layout.node_radius
            ));
        }
    }
    output::header("Array");
    let cells = array_row(
        tree.len(),
        settings.layout.root_x,
        settings.layout.array_y,
        settings.layout.cell_size,
    );
    for (i, cell) in cells.iter().enumerate() {
        output::detail(&format!("{} at ({:.1}, {:.1})", i, cell.x, cell.y));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_demo(settings: &Settings, steps: Option<usize>, colorize: bool) -> CliResult<()> {
    if steps == Some(0) {
        return Err(CliError::InvalidArgs("--steps must be at least 1".to_string()));
    }
    let script = settings.script()?;
    let limit = steps.unwrap_or(script.len());
    let mut session =
        Session::new(&settings.data, script)?.with_strict_bounds(settings.strict_bounds);

    while session.cursor() < limit {
        let Some(report) = session.step()? else {
            break;
        };
        print_report(&report);
        print_view(&session.snapshot(), colorize);
        output::info("");
    }
    if session.is_finished() {
        output::success("Script complete");
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("cannot determine config directory"),
        },
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory".to_string())
            })?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force)",
                    path.display()
                )));
            }
            let write = path
                .parent()
                .map_or(Ok(()), std::fs::create_dir_all)
                .and_then(|_| std::fs::write(&path, Settings::template()));
            write.map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
        }
    }
    Ok(())
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
