//! ScoutLab CLI: run the pipeline, inspect the warehouse, write reports.
//!
//! Commands:
//! - `run`: execute the model graph (optionally `--select`ed models)
//! - `models`: list registered models and the planned waves
//! - `status`: last run manifest, materialized tables, recent history
//! - `show`: print a warehouse table
//! - `report`: Markdown targets report, or a player profile report
//! - `profile`: print one player's profile, optionally against another
//! - `seed`: write a deterministic sample dataset

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scoutlab_core::data::{Layer, Warehouse};
use scoutlab_core::domain::{PlayerStatsRow, RankedPlayer};
use scoutlab_core::profile::{build_profile, PlayerProfile};
use scoutlab_core::sample::{write_sample, SampleConfig};
use scoutlab_runner::export::{comparison_report, profile_report, targets_report, write_report};
use scoutlab_runner::{
    plan, run_pipeline, ModelId, ModelStatus, PipelineConfig, RunHistory, RunSummary,
};

#[derive(Parser)]
#[command(
    name = "scoutlab",
    about = "ScoutLab CLI — basketball scouting pipeline"
)]
struct Cli {
    /// Pipeline config file. Missing file means defaults.
    #[arg(long, global = true, env = "SCOUTLAB_CONFIG", default_value = "scoutlab.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline.
    Run {
        /// Models to build (their ancestors are included). Default: all.
        #[arg(long, num_args = 1..)]
        select: Vec<String>,

        /// Override the target season.
        #[arg(long)]
        season: Option<i32>,

        /// Stop after the first wave with a failing model.
        #[arg(long, default_value_t = false)]
        fail_fast: bool,
    },
    /// List registered models and the execution plan.
    Models {
        /// Show the plan for these models only.
        #[arg(long, num_args = 1..)]
        select: Vec<String>,
    },
    /// Show the last run, materialized tables and recent history.
    Status {
        /// Number of history entries to show.
        #[arg(long, default_value_t = 5)]
        history: usize,

        /// Print the raw run manifest as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print rows of a warehouse table.
    Show {
        /// Model name, e.g. gold_top_scorers.
        model: String,

        /// Maximum rows to print.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Write a Markdown report.
    Report {
        /// Profile this player instead of the targets report.
        #[arg(long)]
        player: Option<String>,

        /// Season for a profile report. Defaults to the configured season.
        #[arg(long)]
        season: Option<i32>,

        /// Output file. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a player profile.
    Profile {
        player: String,

        /// Season. Defaults to the configured season.
        #[arg(long)]
        season: Option<i32>,

        /// Compare with another player of the same season.
        #[arg(long, conflicts_with = "json")]
        compare: Option<String>,

        /// Print the profile as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Write a deterministic sample dataset.
    Seed {
        /// Output directory. Defaults to the configured input_dir.
        #[arg(long)]
        dir: Option<PathBuf>,

        #[arg(long, default_value_t = 150)]
        players: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    match cli.command {
        Commands::Run {
            select,
            season,
            fail_fast,
        } => run_cmd(config, &select, season, fail_fast),
        Commands::Models { select } => run_models(&config, &select),
        Commands::Status { history, json } => run_status(&config, history, json),
        Commands::Show { model, limit } => run_show(&config, &model, limit),
        Commands::Report {
            player,
            season,
            output,
        } => run_report(&config, player, season, output),
        Commands::Profile {
            player,
            season,
            compare,
            json,
        } => run_profile(&config, &player, season, compare, json),
        Commands::Seed { dir, players, seed } => run_seed(&config, dir, players, seed),
    }
}

fn parse_models(names: &[String]) -> Result<Vec<ModelId>> {
    names
        .iter()
        .map(|n| {
            ModelId::from_name(n).with_context(|| {
                let valid: Vec<&str> = ModelId::ALL.iter().map(|m| m.name()).collect();
                format!("unknown model '{n}'. Valid: {}", valid.join(", "))
            })
        })
        .collect()
}

fn run_cmd(
    mut config: PipelineConfig,
    select: &[String],
    season: Option<i32>,
    fail_fast: bool,
) -> Result<()> {
    let select = parse_models(select)?;
    if let Some(season) = season {
        config.pipeline.season = season;
    }
    if fail_fast {
        config.pipeline.fail_fast = true;
    }

    info!(season = config.pipeline.season, models = select.len(), "starting pipeline run");
    let summary = run_pipeline(&config, &select)?;
    print_run(&summary);

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_run(summary: &RunSummary) {
    println!();
    println!("=== Pipeline Run ===");
    println!("Run id:   {}", summary.run_id.short());
    println!("Dataset:  {}", summary.dataset_hash.short());
    println!("Season:   {}", summary.season);
    println!("Elapsed:  {} ms", summary.elapsed_ms);
    println!();
    println!(
        "{:<30} {:<7} {:<8} {:<6} {:>8} {:>8}",
        "Model", "Layer", "Status", "Kind", "Rows", "ms"
    );
    println!("{}", "-".repeat(72));
    for m in &summary.models {
        println!(
            "{:<30} {:<7} {:<8} {:<6} {:>8} {:>8}",
            m.model,
            m.layer,
            m.status.as_str(),
            m.materialization,
            m.rows,
            m.elapsed_ms
        );
        if let Some(err) = &m.error {
            println!("    {err}");
        }
    }
    for (source, err) in &summary.source_failures {
        println!("WARNING: source {source}: {err}");
    }
    println!();
    println!(
        "{} succeeded, {} failed, {} skipped",
        summary.count(ModelStatus::Success),
        summary.count(ModelStatus::Failed),
        summary.count(ModelStatus::Skipped)
    );
}

fn run_models(config: &PipelineConfig, select: &[String]) -> Result<()> {
    let select = parse_models(select)?;
    println!("{:<30} {:<7} {:<6} Description", "Model", "Layer", "Kind");
    println!("{}", "-".repeat(90));
    for m in ModelId::ALL {
        println!(
            "{:<30} {:<7} {:<6} {}",
            m.name(),
            m.layer(),
            config.materialization_for(m),
            m.description()
        );
        let deps: Vec<&str> = m.deps().iter().map(|d| d.name()).collect();
        match m.source() {
            Some(source) => println!("    reads source {source}"),
            None => println!("    depends on {}", deps.join(", ")),
        }
    }

    println!();
    println!("Execution plan:");
    for (i, wave) in plan(&select)?.iter().enumerate() {
        let names: Vec<&str> = wave.iter().map(|m| m.name()).collect();
        println!("  wave {}: {}", i + 1, names.join(", "));
    }
    Ok(())
}

fn run_status(config: &PipelineConfig, history: usize, json: bool) -> Result<()> {
    let root = &config.pipeline.warehouse_dir;
    let Some(summary) = RunSummary::load(root)? else {
        println!("No runs yet in {}", root.display());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let ago = chrono::Local::now().naive_local() - summary.finished_at;
    println!("Warehouse: {}", root.display());
    println!(
        "Last run:  {} ({} min ago, {} succeeded, {} failed, {} skipped)",
        summary.run_id.short(),
        ago.num_minutes(),
        summary.count(ModelStatus::Success),
        summary.count(ModelStatus::Failed),
        summary.count(ModelStatus::Skipped)
    );
    println!();

    let warehouse = Warehouse::new(root);
    println!("{:<30} {:<7} {:>8} {:<8} {:<13}", "Table", "Layer", "Rows", "Parquet", "Run");
    println!("{}", "-".repeat(70));
    for meta in warehouse.list_tables() {
        println!(
            "{:<30} {:<7} {:>8} {:<8} {:<13}",
            meta.model,
            meta.layer,
            meta.rows,
            if meta.parquet { "yes" } else { "no" },
            &meta.run_id[..meta.run_id.len().min(12)]
        );
    }

    let entries = RunHistory::in_warehouse(root).recent(history)?;
    if !entries.is_empty() {
        println!();
        println!("Recent runs:");
        for e in entries {
            println!(
                "  {}  {}  season {}  {} ok / {} failed / {} skipped  {} ms",
                e.started_at.format("%Y-%m-%d %H:%M:%S"),
                &e.run_id[..e.run_id.len().min(12)],
                e.season,
                e.succeeded,
                e.failed,
                e.skipped,
                e.elapsed_ms
            );
        }
    }
    Ok(())
}

fn run_show(config: &PipelineConfig, model: &str, limit: usize) -> Result<()> {
    let Some(id) = ModelId::from_name(model) else {
        bail!("unknown model '{model}'");
    };
    let warehouse = Warehouse::new(&config.pipeline.warehouse_dir);
    let (headers, records) = warehouse
        .read_raw(id.layer(), id.name())
        .with_context(|| format!("{model} is not materialized; run the pipeline first"))?;

    let shown: Vec<Vec<String>> = records
        .iter()
        .take(limit)
        .map(|r| r.iter().map(str::to_string).collect())
        .collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            shown
                .iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(28)
        })
        .collect();

    let render = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| {
                let c: String = c.chars().take(*w).collect();
                format!("{c:<w$}")
            })
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("{}", render(headers.iter().collect()));
    for row in &shown {
        println!("{}", render(row.iter().map(String::as_str).collect()));
    }
    println!();
    println!("{} of {} rows", shown.len(), records.len());
    Ok(())
}

fn load_stats(config: &PipelineConfig) -> Result<Vec<PlayerStatsRow>> {
    let warehouse = Warehouse::new(&config.pipeline.warehouse_dir);
    warehouse
        .read_table(Layer::Gold, ModelId::GoldPlayerStats.name())
        .context("gold_player_stats is not materialized; run the pipeline first")
}

fn find_profile(rows: &[PlayerStatsRow], player: &str, season: i32) -> Result<PlayerProfile> {
    build_profile(rows, player, season)
        .with_context(|| format!("no stats for '{player}' in season {season}"))
}

fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            write_report(path, content)?;
            println!("Report written to: {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

fn run_report(
    config: &PipelineConfig,
    player: Option<String>,
    season: Option<i32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let season = season.unwrap_or(config.pipeline.season);
    let content = match player {
        Some(player) => {
            let rows = load_stats(config)?;
            profile_report(&find_profile(&rows, &player, season)?)
        }
        None => {
            let warehouse = Warehouse::new(&config.pipeline.warehouse_dir);
            let targets: Vec<RankedPlayer> = warehouse
                .read_table(Layer::Gold, ModelId::GoldGLeagueTargets.name())
                .context("gold_g_league_targets is not materialized; run the pipeline first")?;
            targets_report(&targets, config.pipeline.season)
        }
    };
    emit(output.as_deref(), &content)
}

fn run_profile(
    config: &PipelineConfig,
    player: &str,
    season: Option<i32>,
    compare: Option<String>,
    json: bool,
) -> Result<()> {
    let season = season.unwrap_or(config.pipeline.season);
    let rows = load_stats(config)?;
    let profile = find_profile(&rows, player, season)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    match compare {
        Some(other) => {
            let other = find_profile(&rows, &other, season)?;
            print!("{}", comparison_report(&profile, &other));
        }
        None => print_profile(&profile),
    }
    Ok(())
}

fn print_profile(p: &PlayerProfile) {
    let line = &p.line;
    let stat = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
    println!();
    println!("=== {} ({}) ===", line.player, line.season);
    println!("Team:     {}", line.team.as_deref().unwrap_or("-"));
    println!("Position: {}", line.pos.as_deref().unwrap_or("-"));
    println!("Games:    {}", line.games_played);
    println!();
    println!("{:<6} {:>8} {:>8}", "", "Player", "League");
    println!("{:<6} {:>8} {:>8.1}", "PTS", stat(line.points_per_game), p.league.points_per_game);
    println!("{:<6} {:>8} {:>8.1}", "REB", stat(line.rebounds_per_game), p.league.rebounds_per_game);
    println!("{:<6} {:>8} {:>8.1}", "AST", stat(line.assists_per_game), p.league.assists_per_game);
    println!();
    for (axis, value) in p.radar.axes() {
        let bar = "#".repeat((value / 5.0).round() as usize);
        println!("{axis:<13} {value:>5.0} {bar}");
    }
    println!();
    println!("Availability:   {:.1}%", p.advanced.availability_pct);
    println!("Production/G:   {:.1}", p.advanced.production_per_game);
    println!(
        "Ranks:          PTS {:.0} / REB {:.0} / AST {:.0} of {}",
        p.ranks.points, p.ranks.rebounds, p.ranks.assists, p.ranks.out_of
    );
    println!();
}

fn run_seed(config: &PipelineConfig, dir: Option<PathBuf>, players: usize, seed: u64) -> Result<()> {
    let dir = dir.unwrap_or_else(|| config.pipeline.input_dir.clone());
    let sample = SampleConfig {
        players,
        seed,
        ..Default::default()
    };
    let files = write_sample(&dir, &sample)
        .with_context(|| format!("failed to write sample data to {}", dir.display()))?;
    info!(dir = %dir.display(), players, seed, "sample dataset written");
    for path in files.all() {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
