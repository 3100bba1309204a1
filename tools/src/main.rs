//! sim-runner: headless driver for the ladder simulation.
//!
//! Usage:
//!   sim-runner --days 30 --strategy average --adjusted-strategy high --adoption-rate 0.001
//!   sim-runner --players 5000 --config data/sim_config.json --json
//!   sim-runner --ipc-mode

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::env;
use std::io::{self, BufRead, Write};
use zing_core::{
    comparison::{ComparisonRun, ComparisonSummary},
    state::{SimulationState, WeeklyStats},
    strategy::CashOutStrategy,
    types::{Day, RunId},
    SimConfig, SimEngine,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Tick {
        count: u64,
    },
    Command {
        cmd: String,
        payload: serde_json::Value,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    run_id: &'a str,
    started_at: DateTime<Utc>,
    day: Day,
    complete: bool,
    baseline_strategy: CashOutStrategy,
    adjusted_strategy: CashOutStrategy,
    adjusted_adoption_rate: f64,
    summary: ComparisonSummary,
    baseline: &'a SimulationState,
    adjusted: &'a SimulationState,
}

struct Session {
    run_id: RunId,
    started_at: DateTime<Utc>,
    run: ComparisonRun,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let days = opt_arg(&args, "--days")?.unwrap_or(30u64);
    let players: Option<i64> = opt_arg(&args, "--players")?;
    let adoption_rate: Option<f64> = opt_arg(&args, "--adoption-rate")?;
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");
    let strategy = str_arg(&args, "--strategy").unwrap_or("average");
    let adjusted_strategy = str_arg(&args, "--adjusted-strategy").unwrap_or(strategy);

    let config = match str_arg(&args, "--config") {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let mut run = ComparisonRun::new(SimEngine::new(config)?);
    run.set_baseline_strategy(strategy.parse()?);
    run.set_adjusted_strategy(adjusted_strategy.parse()?);
    if let Some(rate) = adoption_rate {
        run.set_adjusted_adoption_rate(rate)?;
    }
    if let Some(players) = players {
        run.update_total_players(players)?;
    }

    let mut session = Session {
        run_id: uuid::Uuid::new_v4().to_string(),
        started_at: Utc::now(),
        run,
    };
    log::info!("run {} started at {}", session.run_id, session.started_at.to_rfc3339());

    if ipc_mode {
        run_ipc_loop(&mut session)?;
        return Ok(());
    }

    if !json_out {
        println!("Ladder simulation: sim-runner");
        println!("  run_id:         {}", session.run_id);
        println!("  days:           {days} (horizon {})", session.run.engine().config().horizon_days);
        println!("  strategy:       {}", session.run.baseline_strategy());
        println!("  adjusted:       {}", session.run.adjusted_strategy());
        println!("  adoption rate:  {}", session.run.adjusted_adoption_rate());
        println!("  players:        {}", session.run.baseline().total_players);
        println!();
    }

    let advanced = session.run.run_days(days)?;
    log::info!("advanced {advanced} of {days} requested days");

    if json_out {
        println!("{}", serde_json::to_string_pretty(&build_ui_state(&session))?);
    } else {
        print_summary(&session);
    }
    Ok(())
}

fn run_ipc_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let outcome = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Tick { count } => session.run.run_days(count).map(|_| ()).map_err(Into::into),
            IpcCommand::GetState => Ok(()),
            IpcCommand::Command { cmd, payload } => handle_command(&mut session.run, &cmd, payload),
        };

        match outcome {
            Ok(()) => {
                writeln!(stdout, "{}", serde_json::to_string(&build_ui_state(session))?)?;
                stdout.flush()?;
            }
            Err(e) => write_error(&mut stdout, &e.to_string())?,
        }
    }
    Ok(())
}

fn write_error(stdout: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn handle_command(run: &mut ComparisonRun, cmd: &str, payload: serde_json::Value) -> Result<()> {
    match cmd {
        "set_strategy" => {
            let track = payload["track"].as_str().unwrap_or("adjusted");
            let strategy: CashOutStrategy = payload["strategy"].as_str().unwrap_or_default().parse()?;
            match track {
                "baseline" => run.set_baseline_strategy(strategy),
                "adjusted" => run.set_adjusted_strategy(strategy),
                other => anyhow::bail!("unknown track '{other}'"),
            }
        }
        "set_adoption_rate" => {
            let rate = payload["rate"]
                .as_f64()
                .ok_or_else(|| anyhow::anyhow!("set_adoption_rate needs a numeric 'rate'"))?;
            run.set_adjusted_adoption_rate(rate)?;
        }
        "set_total_players" => {
            let players = payload["players"]
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("set_total_players needs an integer 'players'"))?;
            run.update_total_players(players)?;
        }
        "reset" => run.reset(),
        other => {
            log::warn!("Unknown command: {other}");
            anyhow::bail!("unknown command '{other}'");
        }
    }
    Ok(())
}

fn build_ui_state(session: &Session) -> UiState<'_> {
    let run = &session.run;
    UiState {
        run_id: &session.run_id,
        started_at: session.started_at,
        day: run.baseline().day.max(run.adjusted().day),
        complete: run.is_complete(),
        baseline_strategy: run.baseline_strategy(),
        adjusted_strategy: run.adjusted_strategy(),
        adjusted_adoption_rate: run.adjusted_adoption_rate(),
        summary: run.summary(),
        baseline: run.baseline(),
        adjusted: run.adjusted(),
    }
}

fn print_summary(session: &Session) {
    let summary = session.run.summary();

    println!("=== RUN SUMMARY (day {}) ===", summary.day);
    println!("                      {:>16} {:>16} {:>16}", "baseline", "adjusted", "delta");
    println!(
        "  active players:    {:>16} {:>16} {:>16}",
        summary.baseline.active_players, summary.adjusted.active_players, summary.delta.active_players
    );
    println!(
        "  games played:      {:>16} {:>16} {:>16}",
        summary.baseline.total_games_played,
        summary.adjusted.total_games_played,
        summary.delta.total_games_played
    );
    println!(
        "  jackpot winners:   {:>16} {:>16} {:>16}",
        summary.baseline.total_jackpot_winners,
        summary.adjusted.total_jackpot_winners,
        summary.delta.total_jackpot_winners
    );
    for (label, b, a, d) in [
        ("charity", summary.baseline.total_charity, summary.adjusted.total_charity, summary.delta.total_charity),
        (
            "platform",
            summary.baseline.total_platform_earnings,
            summary.adjusted.total_platform_earnings,
            summary.delta.total_platform_earnings,
        ),
        (
            "government",
            summary.baseline.total_government_earnings,
            summary.adjusted.total_government_earnings,
            summary.delta.total_government_earnings,
        ),
        (
            "player winnings",
            summary.baseline.total_player_winnings,
            summary.adjusted.total_player_winnings,
            summary.delta.total_player_winnings,
        ),
        (
            "outreach pot",
            summary.baseline.total_outreach_pot,
            summary.adjusted.total_outreach_pot,
            summary.delta.total_outreach_pot,
        ),
    ] {
        println!("  {label:<18} ${b:>15.2} ${a:>15.2} ${d:>15.2}");
    }

    println!();
    println!("=== WEEKLY (baseline) ===");
    print_weeks(&session.run.baseline().weekly_rollups);
    println!();
    println!("=== WEEKLY (adjusted) ===");
    print_weeks(&session.run.adjusted().weekly_rollups);
}

fn print_weeks(weeks: &[WeeklyStats]) {
    if weeks.is_empty() {
        println!("  (No days simulated yet)");
        return;
    }
    for w in weeks {
        println!(
            "  W{} | Games: {} | Avg/day: {:.0} | Charity: ${:.0} | Platform: ${:.0} | Jackpots: {} | Growth: {:.1}%",
            w.week,
            w.total_games_played,
            w.average_daily_games,
            w.total_charity,
            w.total_platform_earnings,
            w.total_jackpot_winners,
            w.active_players_growth
        );
    }
}

/// Parse the value following `flag`. Absent flags are `None`; a flag
/// with a missing or unparsable value is an error.
fn opt_arg<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match str_arg(args, flag) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid value '{raw}' for {flag}: {e}")),
        None if args.iter().skip(1).any(|a| a == flag) => {
            anyhow::bail!("{flag} needs a value")
        }
        None => Ok(None),
    }
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
