mod commands;
mod core;
mod selfcheck;
mod ui;

use crate::core::error::{print_error, BerthResult};
use clap::{Parser, Subcommand};

/// Orchestrate a local multi-plugin data stack
#[derive(Parser)]
#[command(name = "berth")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct BerthCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run docker compose for all plugins in the current stack
  Dc {
    /// Run for a single plugin only
    #[arg(short, long)]
    single: Option<String>,
    /// Docker compose parameters
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    extra: Vec<String>,
  },
  /// List and select stacks
  Stack {
    #[command(subcommand)]
    command: StackCommands,
  },
  /// Inspect and manage config files
  Cfg {
    #[command(subcommand)]
    command: CfgCommands,
  },
  /// Deploy and manage notebooks on the object store
  Nb {
    #[command(subcommand)]
    command: NbCommands,
  },
  /// Print the assembled stack environment as export lines
  Env,
  /// Run all self checks and print one line per result
  Selfcheck {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

#[derive(Subcommand)]
enum StackCommands {
  /// List configured stacks, marking the current one
  Ls,
  /// Select the current stack
  Set {
    /// Stack name from stacks.yaml
    name: String,
  },
}

#[derive(Subcommand)]
enum CfgCommands {
  /// List available config names
  Ls {
    /// Show resolved file paths
    #[arg(short, long)]
    verbose: bool,
  },
  /// Show one config
  Show {
    /// Config name
    name: String,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
  /// Delete one config file
  Rm {
    /// Config name
    name: String,
  },
}

#[derive(Subcommand)]
enum NbCommands {
  /// Stamp and deploy notebooks, all repos or one
  Deploy {
    /// Deploy a single repo
    #[arg(short, long)]
    repo: Option<String>,
  },
  /// List deployed notebooks
  Ls {
    /// Limit to one key prefix
    prefix: Option<String>,
  },
  /// Delete deployed notebooks under a prefix
  Rm {
    /// Key prefix to delete
    prefix: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
  },
  /// Show the notebook deployment configuration
  Cfg,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn run() -> BerthResult<()> {
  let cli = BerthCli::parse();

  match cli.command {
    Commands::Dc { single, extra } => commands::run_dc(single, extra),
    Commands::Stack { command } => match command {
      StackCommands::Ls => commands::run_stack_ls(),
      StackCommands::Set { name } => commands::run_stack_set(&name),
    },
    Commands::Cfg { command } => match command {
      CfgCommands::Ls { verbose } => commands::run_cfg_ls(verbose),
      CfgCommands::Show { name, json } => commands::run_cfg_show(&name, json),
      CfgCommands::Rm { name } => commands::run_cfg_rm(&name),
    },
    Commands::Nb { command } => match command {
      NbCommands::Deploy { repo } => commands::run_nb_deploy(repo),
      NbCommands::Ls { prefix } => commands::run_nb_ls(prefix),
      NbCommands::Rm { prefix, yes } => commands::run_nb_rm(&prefix, yes),
      NbCommands::Cfg => commands::run_nb_cfg(),
    },
    Commands::Env => commands::run_env(),
    Commands::Selfcheck { json } => commands::run_selfcheck(json),
  }
}

fn main() {
  if let Err(err) = run() {
    print_error(&err);
    std::process::exit(err.exit_code().as_i32());
  }
}
