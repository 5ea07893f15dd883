//! Reports and exports: Markdown scouting reports and target CSV.
//!
//! - **Targets report**: headline counts, category and contract breakdowns,
//!   and the target table sorted by points per game
//! - **Profile report**: one player-season against the league, with radar
//!   values, advanced metrics, ranks and season history
//! - **Comparison**: two profiles side by side
//! - **CSV**: the filtered target list as shown in the dashboard

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use scoutlab_core::domain::{GLeagueCategory, RankedPlayer};
use scoutlab_core::profile::PlayerProfile;
use scoutlab_core::targets::{summarize, TargetFilter};

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}%", v * 100.0))
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export target rows as CSV, in the order given.
pub fn export_targets_csv(rows: &[&RankedPlayer]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "player",
        "season",
        "age",
        "pos",
        "team",
        "g",
        "pts",
        "trb",
        "ast",
        "stl",
        "blk",
        "ts_pct",
        "contract_status",
        "salary_y1",
        "pts_percentile",
        "trb_percentile",
        "ast_percentile",
        "ts_percentile",
        "g_league_category",
    ])?;

    for r in rows {
        wtr.write_record([
            r.player.as_str(),
            &r.season.to_string(),
            &r.age.map(|a| a.to_string()).unwrap_or_default(),
            r.pos.as_deref().unwrap_or(""),
            r.team.as_deref().unwrap_or(""),
            &r.g.map(|g| g.to_string()).unwrap_or_default(),
            &r.pts.map(|v| format!("{v:.1}")).unwrap_or_default(),
            &r.trb.map(|v| format!("{v:.1}")).unwrap_or_default(),
            &r.ast.map(|v| format!("{v:.1}")).unwrap_or_default(),
            &r.stl.map(|v| format!("{v:.1}")).unwrap_or_default(),
            &r.blk.map(|v| format!("{v:.1}")).unwrap_or_default(),
            &r.ts_pct.map(|v| format!("{v:.3}")).unwrap_or_default(),
            r.contract_status.label(),
            &r.salary_y1.map(|v| format!("{v:.0}")).unwrap_or_default(),
            &r.pts_percentile.to_string(),
            &r.trb_percentile.to_string(),
            &r.ast_percentile.to_string(),
            &r.ts_percentile.to_string(),
            r.g_league_category.label(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Markdown reports ───────────────────────────────────────────────

/// Markdown report over the G-League target table.
pub fn targets_report(rows: &[RankedPlayer], season: i32) -> String {
    let sorted = TargetFilter::default().apply(rows);
    let summary = summarize(&sorted);
    let mut md = String::new();

    let _ = writeln!(md, "# G-League Targets — {season}\n");
    let _ = writeln!(md, "| Metric | Value |");
    let _ = writeln!(md, "|---|---|");
    let _ = writeln!(md, "| Targets found | {} |", summary.found);
    let _ = writeln!(md, "| Average age | {} |", opt(summary.average_age, 1));
    let _ = writeln!(md, "| Available now | {} |", summary.available);
    let _ = writeln!(md, "| Development targets | {} |", summary.development);

    let _ = writeln!(md, "\n## By category\n");
    let _ = writeln!(md, "| Category | Players |");
    let _ = writeln!(md, "|---|---|");
    for category in GLeagueCategory::ALL.into_iter().filter(|c| c.is_target()) {
        let n = summary.by_category.get(&category).copied().unwrap_or(0);
        let _ = writeln!(md, "| {category} | {n} |");
    }

    let _ = writeln!(md, "\n## By contract status\n");
    let _ = writeln!(md, "| Contract status | Players |");
    let _ = writeln!(md, "|---|---|");
    for (status, n) in &summary.by_status {
        let _ = writeln!(md, "| {status} | {n} |");
    }

    let _ = writeln!(md, "\n## Targets\n");
    if sorted.is_empty() {
        let _ = writeln!(md, "_No players matched the G-League criteria._");
        return md;
    }
    let _ = writeln!(
        md,
        "| # | Player | Age | Pos | Team | PTS | TRB | AST | TS% | Contract | Category |"
    );
    let _ = writeln!(md, "|---|---|---|---|---|---|---|---|---|---|---|");
    for (i, r) in sorted.iter().enumerate() {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            i + 1,
            r.player,
            r.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
            r.pos.as_deref().unwrap_or("-"),
            r.team.as_deref().unwrap_or("-"),
            opt(r.pts, 1),
            opt(r.trb, 1),
            opt(r.ast, 1),
            pct(r.ts_pct),
            r.contract_status,
            r.g_league_category.short_label(),
        );
    }
    md
}

/// Markdown report for one player-season.
pub fn profile_report(profile: &PlayerProfile) -> String {
    let line = &profile.line;
    let league = &profile.league;
    let mut md = String::new();

    let _ = writeln!(md, "# {} — {}\n", line.player, line.season);
    let _ = writeln!(md, "- **Team:** {}", line.team.as_deref().unwrap_or("-"));
    let _ = writeln!(md, "- **Position:** {}", line.pos.as_deref().unwrap_or("-"));
    let _ = writeln!(md, "- **Games played:** {}", line.games_played);

    let _ = writeln!(md, "\n## Per game vs league average\n");
    let _ = writeln!(md, "| Stat | Player | League |");
    let _ = writeln!(md, "|---|---|---|");
    let _ = writeln!(md, "| PTS | {} | {:.1} |", opt(line.points_per_game, 1), league.points_per_game);
    let _ = writeln!(md, "| REB | {} | {:.1} |", opt(line.rebounds_per_game, 1), league.rebounds_per_game);
    let _ = writeln!(md, "| AST | {} | {:.1} |", opt(line.assists_per_game, 1), league.assists_per_game);
    let _ = writeln!(md, "| Games | {} | {:.1} |", line.games_played, league.games_played);

    let _ = writeln!(md, "\n## Radar (0–100, 50 = league average)\n");
    for (axis, value) in profile.radar.axes() {
        let _ = writeln!(md, "- {axis}: {value:.0}");
    }

    let adv = &profile.advanced;
    let _ = writeln!(md, "\n## Advanced metrics\n");
    let _ = writeln!(md, "- Availability: {:.1}%", adv.availability_pct);
    let _ = writeln!(md, "- Production per game: {:.1}", adv.production_per_game);
    let _ = writeln!(md, "- Est. points per minute: {:.2}", adv.est_points_per_minute);
    let _ = writeln!(
        md,
        "- League percentile: PTS {:.0}, REB {:.0}, AST {:.0}",
        adv.points_percentile, adv.rebounds_percentile, adv.assists_percentile
    );

    let ranks = &profile.ranks;
    let _ = writeln!(md, "\n## League ranks (of {})\n", ranks.out_of);
    let _ = writeln!(md, "- Points: {:.0}", ranks.points);
    let _ = writeln!(md, "- Rebounds: {:.0}", ranks.rebounds);
    let _ = writeln!(md, "- Assists: {:.0}", ranks.assists);

    let _ = writeln!(md, "\n## Season history\n");
    let _ = writeln!(md, "| Season | Team | G | PTS | REB | AST |");
    let _ = writeln!(md, "|---|---|---|---|---|---|");
    for h in &profile.history {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {} | {} |",
            h.season,
            h.team.as_deref().unwrap_or("-"),
            h.games_played,
            opt(h.points_per_game, 1),
            opt(h.rebounds_per_game, 1),
            opt(h.assists_per_game, 1),
        );
    }
    md
}

/// Two profiles side by side.
pub fn comparison_report(a: &PlayerProfile, b: &PlayerProfile) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {} vs {}\n", a.line.player, b.line.player);
    let _ = writeln!(md, "| Stat | {} | {} |", a.line.player, b.line.player);
    let _ = writeln!(md, "|---|---|---|");
    let rows: [(&str, String, String); 4] = [
        ("Season", a.line.season.to_string(), b.line.season.to_string()),
        ("PTS", opt(a.line.points_per_game, 1), opt(b.line.points_per_game, 1)),
        ("REB", opt(a.line.rebounds_per_game, 1), opt(b.line.rebounds_per_game, 1)),
        ("AST", opt(a.line.assists_per_game, 1), opt(b.line.assists_per_game, 1)),
    ];
    for (label, x, y) in rows {
        let _ = writeln!(md, "| {label} | {x} | {y} |");
    }
    for ((axis, x), (_, y)) in a.radar.axes().into_iter().zip(b.radar.axes()) {
        let _ = writeln!(md, "| {axis} | {x:.0} | {y:.0} |");
    }
    md
}

/// Write a report, creating parent directories.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
