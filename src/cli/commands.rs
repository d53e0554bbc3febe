//! Command dispatch: one private handler per subcommand.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, StartArgs, TraversalArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::TraversalOptions;
use crate::infrastructure::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { file } => _tree(&container, file),
        Commands::Roots { file } => _roots(&container, file),
        Commands::Leaves { file } => _leaves(&container, file),
        Commands::Descendants {
            file,
            id,
            traversal,
        } => _descendants(&container, file, id, traversal),
        Commands::Ancestors { file, id, start } => _ancestors(&container, file, id, start),
        Commands::Normalize { file, write } => _normalize(&container, file, *write),
        Commands::Config { command } => _config(&container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Configured defaults, overridden by whatever was given on the command line.
fn traversal_options(settings: &Settings, args: &TraversalArgs) -> TraversalOptions {
    let mut options = settings.traversal;
    if let Some(order) = args.order {
        options = options.with_order(order.into());
    }
    options.exclude_self = args.start.exclude_self(options.exclude_self);
    if args.detect_cycles {
        options = options.detecting_cycles();
    }
    options
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let hierarchy = container.hierarchy_service().load(file)?;
    let trees = hierarchy.to_tree_strings()?;
    if trees.is_empty() {
        output::warning("no nodes");
    }
    for tree in trees {
        output::info(&tree);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _roots(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let hierarchy = container.hierarchy_service().load(file)?;
    for &root in hierarchy.roots() {
        output::info(&hierarchy.identify(root)?);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _leaves(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let hierarchy = container.hierarchy_service().load(file)?;
    for &root in hierarchy.roots() {
        let leaves = hierarchy
            .forest()
            .leaves(root)?
            .into_iter()
            .map(|leaf| hierarchy.identify(leaf))
            .collect::<Result<Vec<_>, _>>()?;
        output::header(&hierarchy.identify(root)?);
        for leaf in leaves {
            output::detail(&leaf);
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _descendants(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    args: &TraversalArgs,
) -> CliResult<()> {
    let options = traversal_options(&container.settings, args);
    debug!(?options, "descendants");
    let hierarchy = container.hierarchy_service().load(file)?;
    let id = id.to_string();
    for (node, depth) in hierarchy.descendants(&id, options)?.with_depth() {
        output::info(&format!("{}{}", "  ".repeat(depth), hierarchy.identify(node)?));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _ancestors(
    container: &ServiceContainer,
    file: &Path,
    id: &str,
    start: &StartArgs,
) -> CliResult<()> {
    let exclude_self = start.exclude_self(container.settings.traversal.exclude_self);
    let hierarchy = container.hierarchy_service().load(file)?;
    let chain = hierarchy.get_ancestor_ids(&id.to_string(), exclude_self)?;
    output::info(&chain.iter().join(" <- "));
    Ok(())
}

#[instrument(skip(container))]
fn _normalize(container: &ServiceContainer, file: &Path, write: bool) -> CliResult<()> {
    let service = container.hierarchy_service();
    let relations = service.read(file)?;
    // validates the relations before anything is printed or written
    service.assemble(&relations)?;
    if write {
        service.save(file, &relations)?;
        output::action("Normalized", &file.display());
    } else {
        print!("{}", relations.render());
    }
    Ok(())
}

#[instrument(skip(container))]
fn _config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", container.settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory on this platform"),
        },
    }
    Ok(())
}
