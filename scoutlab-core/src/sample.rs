//! Deterministic synthetic raw dataset.
//!
//! Writes all four raw sources in the shape real exports arrive in: mixed
//! header spellings, `2023-24` style seasons, money-formatted salaries,
//! traded players with a `2TM` aggregate line, contract names spelled with
//! diacritics or different period spacing, players without contracts, and
//! a few low-minute lines with no shot attempts.
//!
//! Every stream is driven by its own `StdRng` whose seed is derived with
//! BLAKE3 from the user seed and the stream name, so adding players to one
//! stream does not reshuffle another.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::data::DataError;

pub const REGULAR_SEASON: &str = "Regular Season";
pub const PLAYOFFS: &str = "Playoffs";

const FIRST_NAMES: [&str; 20] = [
    "Jalen", "Marcus", "Tyrese", "Devin", "Aaron", "Kevin", "Jordan", "Malik", "Isaiah", "Cameron",
    "Trey", "Andre", "Darius", "Evan", "Caleb", "Miles", "Jaden", "Cole", "Nate", "Reggie",
];

const LAST_NAMES: [&str; 20] = [
    "Carter", "Brooks", "Hayes", "Porter", "Reed", "Walker", "Bennett", "Coleman", "Foster",
    "Griffin", "Hughes", "Jenkins", "Mitchell", "Perry", "Russell", "Sanders", "Watson", "Warren",
    "Fisher", "Grant",
];

/// (name in the stat feed, name in the contract feed)
const NAME_VARIANTS: [(&str, &str); 8] = [
    ("Marko Petrovic", "Marko Petrović"),
    ("Luka Simic", "Luka Šimić"),
    ("Davis Bertins", "Dāvis Bertiņš"),
    ("J.J. Redd", "J. J. Redd"),
    ("T.J. Lowell", "T.J.  Lowell"),
    ("DeShawn Price", "De'Shawn Price"),
    ("Andres Nunez", "Andrés Núñez"),
    ("Kenan Yilmaz", "Kenan Yılmaz"),
];

const TEAMS: [(&str, &str); 30] = [
    ("ATL", "Atlanta Hawks"),
    ("BOS", "Boston Celtics"),
    ("BRK", "Brooklyn Nets"),
    ("CHO", "Charlotte Hornets"),
    ("CHI", "Chicago Bulls"),
    ("CLE", "Cleveland Cavaliers"),
    ("DAL", "Dallas Mavericks"),
    ("DEN", "Denver Nuggets"),
    ("DET", "Detroit Pistons"),
    ("GSW", "Golden State Warriors"),
    ("HOU", "Houston Rockets"),
    ("IND", "Indiana Pacers"),
    ("LAC", "Los Angeles Clippers"),
    ("LAL", "Los Angeles Lakers"),
    ("MEM", "Memphis Grizzlies"),
    ("MIA", "Miami Heat"),
    ("MIL", "Milwaukee Bucks"),
    ("MIN", "Minnesota Timberwolves"),
    ("NOP", "New Orleans Pelicans"),
    ("NYK", "New York Knicks"),
    ("OKC", "Oklahoma City Thunder"),
    ("ORL", "Orlando Magic"),
    ("PHI", "Philadelphia 76ers"),
    ("PHO", "Phoenix Suns"),
    ("POR", "Portland Trail Blazers"),
    ("SAC", "Sacramento Kings"),
    ("SAS", "San Antonio Spurs"),
    ("TOR", "Toronto Raptors"),
    ("UTA", "Utah Jazz"),
    ("WAS", "Washington Wizards"),
];

const POSITIONS: [&str; 5] = ["PG", "SG", "SF", "PF", "C"];

/// Parameters of the generated dataset.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub players: usize,
    pub seasons: Vec<i32>,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            players: 150,
            seasons: vec![2022, 2023, 2024],
            seed: 42,
        }
    }
}

/// Paths of the files a sample run wrote.
#[derive(Debug, Clone)]
pub struct SampleFiles {
    pub box_scores: PathBuf,
    pub player_season: PathBuf,
    pub contracts: PathBuf,
    /// (competition type, path)
    pub team_stats: Vec<(String, PathBuf)>,
}

impl SampleFiles {
    pub fn all(&self) -> Vec<&Path> {
        let mut paths = vec![
            self.box_scores.as_path(),
            self.player_season.as_path(),
            self.contracts.as_path(),
        ];
        paths.extend(self.team_stats.iter().map(|(_, p)| p.as_path()));
        paths
    }
}

struct SamplePlayer {
    stat_name: String,
    contract_name: Option<String>,
    pos: &'static str,
    base_age: i32,
    /// Scoring level in points per game.
    skill: f64,
    team: usize,
}

struct Stint {
    team: &'static str,
    games: i64,
    pts: f64,
    trb: f64,
    ast: f64,
    stl: f64,
    blk: f64,
    fga: f64,
    fta: f64,
}

fn stream_rng(seed: u64, stream: &str) -> StdRng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(stream.as_bytes());
    StdRng::from_seed(*hasher.finalize().as_bytes())
}

fn generic_name(k: usize) -> String {
    let first = FIRST_NAMES[k % FIRST_NAMES.len()];
    let last = LAST_NAMES[(k / FIRST_NAMES.len() + k) % LAST_NAMES.len()];
    format!("{first} {last}")
}

fn roster(config: &SampleConfig) -> Vec<SamplePlayer> {
    let mut rng = stream_rng(config.seed, "roster");
    let max_players = NAME_VARIANTS.len() + FIRST_NAMES.len() * LAST_NAMES.len();
    (0..config.players.min(max_players))
        .map(|i| {
            let (stat_name, contract_name) = match NAME_VARIANTS.get(i) {
                Some((stat, contract)) => (stat.to_string(), Some(contract.to_string())),
                None => {
                    let name = generic_name(i - NAME_VARIANTS.len());
                    // roughly one in six players has no contract row at all
                    let contract = (!rng.gen_bool(0.17)).then(|| name.clone());
                    (name, contract)
                }
            };
            SamplePlayer {
                stat_name,
                contract_name,
                pos: POSITIONS[rng.gen_range(0..POSITIONS.len())],
                base_age: rng.gen_range(19..=33),
                skill: rng.gen_range(2.0..28.0),
                team: rng.gen_range(0..TEAMS.len()),
            }
        })
        .collect()
}

fn stint(rng: &mut StdRng, p: &SamplePlayer, team: &'static str, games: i64) -> Stint {
    if games <= 4 {
        // garbage-time line without a shot attempt
        return Stint {
            team,
            games,
            pts: 0.0,
            trb: rng.gen_range(0.0..2.0),
            ast: rng.gen_range(0.0..1.0),
            stl: 0.0,
            blk: 0.0,
            fga: 0.0,
            fta: 0.0,
        };
    }
    let pts = (p.skill * rng.gen_range(0.7..1.3)).max(0.5);
    let (reb_factor, ast_factor, blk_factor) = match p.pos {
        "PG" => (0.2, 0.45, 0.02),
        "SG" => (0.22, 0.25, 0.03),
        "SF" => (0.3, 0.2, 0.04),
        "PF" => (0.45, 0.15, 0.06),
        _ => (0.6, 0.12, 0.09),
    };
    let ts_target = rng.gen_range(0.48..0.64);
    let fta = pts * rng.gen_range(0.1..0.3);
    let fga = (pts / (2.0 * ts_target) - 0.44 * fta).max(0.5);
    Stint {
        team,
        games,
        pts,
        trb: pts * reb_factor * rng.gen_range(0.7..1.3),
        ast: pts * ast_factor * rng.gen_range(0.7..1.3),
        stl: rng.gen_range(0.2..1.8),
        blk: pts * blk_factor * rng.gen_range(0.5..1.5),
        fga,
        fta,
    }
}

fn season_label(season: i32, long_form: bool) -> String {
    if long_form {
        format!("{}-{:02}", season - 1, season.rem_euclid(100))
    } else {
        season.to_string()
    }
}

fn one_decimal(v: f64) -> String {
    format!("{v:.1}")
}

fn money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${out}")
}

fn create_writer(path: &Path) -> Result<csv::Writer<File>, DataError> {
    let file = File::create(path).map_err(|e| DataError::io(path, e))?;
    Ok(csv::Writer::from_writer(file))
}

/// Generate the dataset into `dir`, creating it if needed.
pub fn write_sample(dir: &Path, config: &SampleConfig) -> Result<SampleFiles, DataError> {
    std::fs::create_dir_all(dir).map_err(|e| DataError::io(dir, e))?;
    let players = roster(config);

    let files = SampleFiles {
        box_scores: dir.join("box_scores.csv"),
        player_season: dir.join("player_season.csv"),
        contracts: dir.join("contracts.csv"),
        team_stats: vec![
            (REGULAR_SEASON.to_string(), dir.join("team_stats_regular.csv")),
            (PLAYOFFS.to_string(), dir.join("team_stats_playoffs.csv")),
        ],
    };

    write_seasons_and_games(&files, &players, config)?;
    write_contracts(&files.contracts, &players, config)?;
    write_team_stats(&files, config)?;

    tracing::info!(
        dir = %dir.display(),
        players = players.len(),
        seasons = config.seasons.len(),
        "wrote sample dataset"
    );
    Ok(files)
}

fn write_seasons_and_games(
    files: &SampleFiles,
    players: &[SamplePlayer],
    config: &SampleConfig,
) -> Result<(), DataError> {
    let mut rng = stream_rng(config.seed, "seasons");
    let mut season_wtr = create_writer(&files.player_season)?;
    let mut game_wtr = create_writer(&files.box_scores)?;

    season_wtr.write_record([
        "Season", "Player", "Age", "Tm", "Pos", "G", "FGA", "FTA", "PTS", "TRB", "AST", "STL",
        "BLK",
    ])?;
    game_wtr.write_record([
        "SEASON", "GAME_DATE", "PLAYER_NAME", "TEAM", "MIN", "PTS", "REB", "AST", "STL", "BLK",
        "FGM", "FGA", "FTM", "FTA", "TOV",
    ])?;

    let first_season = config.seasons.iter().copied().min().unwrap_or(2024);

    for &season in &config.seasons {
        for p in players {
            // one in ten players sits a season out
            if rng.gen_bool(0.1) {
                continue;
            }
            let age = p.base_age + (season - first_season);
            let home = TEAMS[(p.team + (season - first_season) as usize * 7) % TEAMS.len()].0;

            let short_stint = rng.gen_bool(0.05);
            let total_games = if short_stint {
                rng.gen_range(1..=4)
            } else {
                rng.gen_range(10..=82)
            };

            let traded = !short_stint && total_games >= 20 && rng.gen_bool(0.08);
            let stints: Vec<Stint> = if traded {
                let other = TEAMS[(p.team + 11) % TEAMS.len()].0;
                let first_games = rng.gen_range(5..total_games - 4);
                vec![
                    stint(&mut rng, p, home, first_games),
                    stint(&mut rng, p, other, total_games - first_games),
                ]
            } else {
                vec![stint(&mut rng, p, home, total_games)]
            };

            let long_form = season % 2 == 0;
            let mut write_line = |team: &str, s: &Stint| {
                season_wtr.write_record([
                    season_label(season, long_form),
                    p.stat_name.clone(),
                    age.to_string(),
                    team.to_string(),
                    p.pos.to_string(),
                    s.games.to_string(),
                    one_decimal(s.fga),
                    one_decimal(s.fta),
                    one_decimal(s.pts),
                    one_decimal(s.trb),
                    one_decimal(s.ast),
                    one_decimal(s.stl),
                    one_decimal(s.blk),
                ])
            };

            for s in &stints {
                write_line(s.team, s)?;
            }
            if stints.len() > 1 {
                let games: i64 = stints.iter().map(|s| s.games).sum();
                let weighted = |f: fn(&Stint) -> f64| {
                    stints.iter().map(|s| f(s) * s.games as f64).sum::<f64>() / games as f64
                };
                let aggregate = Stint {
                    team: "2TM",
                    games,
                    pts: weighted(|s| s.pts),
                    trb: weighted(|s| s.trb),
                    ast: weighted(|s| s.ast),
                    stl: weighted(|s| s.stl),
                    blk: weighted(|s| s.blk),
                    fga: weighted(|s| s.fga),
                    fta: weighted(|s| s.fta),
                };
                write_line("2TM", &aggregate)?;
            }

            let mut game_no: i64 = 0;
            for s in &stints {
                for _ in 0..s.games {
                    let day = chrono::NaiveDate::from_ymd_opt(season - 1, 10, 20)
                        .and_then(|d| d.checked_add_days(chrono::Days::new((game_no * 2) as u64)));
                    let date = match day {
                        Some(d) if game_no % 7 == 3 => d.format("%m/%d/%Y").to_string(),
                        Some(d) => d.format("%Y-%m-%d").to_string(),
                        None => String::new(),
                    };
                    game_no += 1;

                    let swing = rng.gen_range(0.4..1.6);
                    let fta = (s.fta * swing).round();
                    let fga = (s.fga * swing).round();
                    let ftm = (fta * rng.gen_range(0.6..0.9)).round();
                    let fgm = (fga * rng.gen_range(0.35..0.55)).round();
                    let pts = (2.0 * fgm + ftm + rng.gen_range(0.0..=fgm * 0.3)).round();
                    game_wtr.write_record([
                        season.to_string(),
                        date,
                        p.stat_name.clone(),
                        s.team.to_string(),
                        one_decimal(rng.gen_range(6.0..38.0)),
                        format!("{pts}"),
                        format!("{}", (s.trb * rng.gen_range(0.4..1.6)).round()),
                        format!("{}", (s.ast * rng.gen_range(0.4..1.6)).round()),
                        format!("{}", (s.stl * rng.gen_range(0.0..2.0)).round()),
                        format!("{}", (s.blk * rng.gen_range(0.0..2.0)).round()),
                        format!("{fgm}"),
                        format!("{fga}"),
                        format!("{ftm}"),
                        format!("{fta}"),
                        format!("{}", rng.gen_range(0..5)),
                    ])?;
                }
            }
        }
    }

    season_wtr.flush().map_err(|e| DataError::io(&files.player_season, e))?;
    game_wtr.flush().map_err(|e| DataError::io(&files.box_scores, e))?;
    Ok(())
}

fn write_contracts(path: &Path, players: &[SamplePlayer], config: &SampleConfig) -> Result<(), DataError> {
    let mut rng = stream_rng(config.seed, "contracts");
    let mut wtr = create_writer(path)?;
    wtr.write_record([
        "Player",
        "Tm",
        "Salary Y1",
        "Salary Y2",
        "Salary Y3",
        "Salary Y4",
        "Salary Y5",
        "Salary Y6",
        "Guaranteed",
        "Uncontracted",
    ])?;

    for p in players {
        let Some(name) = &p.contract_name else {
            continue;
        };
        let years = rng.gen_range(0..=5usize);
        let base = rng.gen_range(1_100_000u64..45_000_000);
        let mut row = vec![name.clone(), TEAMS[p.team].0.to_string()];
        for y in 0..6 {
            if y < years {
                let amount = base + base / 20 * y as u64;
                // mix plain numbers with formatted amounts
                row.push(if y % 2 == 0 { money(amount) } else { amount.to_string() });
            } else {
                row.push(String::new());
            }
        }
        row.push(if rng.gen_bool(0.5) {
            money(base * years as u64)
        } else {
            ["yes", "no", "TRUE", "0"][rng.gen_range(0..4)].to_string()
        });
        row.push(if rng.gen_bool(0.05) { "Yes" } else { "No" }.to_string());
        wtr.write_record(&row)?;
    }

    wtr.flush().map_err(|e| DataError::io(path, e))?;
    Ok(())
}

fn write_team_stats(files: &SampleFiles, config: &SampleConfig) -> Result<(), DataError> {
    let mut rng = stream_rng(config.seed, "teams");
    let header = [
        "SEASON", "TEAM_NAME", "GP", "W", "L", "W_PCT", "PTS", "FGA", "FTA", "REB", "AST", "TOV",
        "STL", "BLK",
    ];

    let mut regular = Vec::new();
    let mut playoffs = Vec::new();
    for &season in &config.seasons {
        let mut wins: Vec<(usize, i64)> = (0..TEAMS.len())
            .map(|t| (t, rng.gen_range(17..=65)))
            .collect();
        for &(t, w) in &wins {
            regular.push(team_line(&mut rng, season, TEAMS[t].1, 82, w));
        }
        wins.sort_by(|a, b| b.1.cmp(&a.1));
        for &(t, _) in wins.iter().take(16) {
            let gp = rng.gen_range(4..=22);
            let w = rng.gen_range(0..=gp.min(16));
            playoffs.push(team_line(&mut rng, season, TEAMS[t].1, gp, w));
        }
    }

    for ((_, path), rows) in files.team_stats.iter().zip([regular, playoffs]) {
        let mut wtr = create_writer(path)?;
        wtr.write_record(header)?;
        for row in rows {
            wtr.write_record(&row)?;
        }
        wtr.flush().map_err(|e| DataError::io(path, e))?;
    }
    Ok(())
}

fn team_line(rng: &mut StdRng, season: i32, team: &str, gp: i64, w: i64) -> Vec<String> {
    vec![
        season.to_string(),
        team.to_string(),
        gp.to_string(),
        w.to_string(),
        (gp - w).to_string(),
        format!("{:.3}", w as f64 / gp as f64),
        one_decimal(rng.gen_range(104.0..122.0)),
        one_decimal(rng.gen_range(84.0..93.0)),
        one_decimal(rng.gen_range(18.0..27.0)),
        one_decimal(rng.gen_range(40.0..48.0)),
        one_decimal(rng.gen_range(22.0..31.0)),
        one_decimal(rng.gen_range(11.0..16.0)),
        one_decimal(rng.gen_range(6.0..9.5)),
        one_decimal(rng.gen_range(3.5..6.5)),
    ]
}
