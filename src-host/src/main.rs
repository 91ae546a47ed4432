//! WebShell headless host
//!
//! Drives the shell from line commands on stdin, the way an embedded
//! browser and its platform would, and prints every published snapshot and
//! notice as one JSON line on stdout. Logs go to stderr.

mod command;
mod surface;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use webshell_core::{
    HttpProbe, LoadFailure, NavigationEvent, NetworkStatus, SessionSnapshot, Shell, ShellConfig,
    ShellHandle, ShellNotice, StaticStatus,
};

use command::HostCommand;
use surface::ConsoleSurface;

#[derive(Parser, Debug)]
#[command(name = "webshell", about = "Headless host for the WebShell runtime")]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulate connectivity with the `online`/`offline` commands instead of probing
    #[arg(long)]
    offline_sim: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    webshell_core::init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };

    let simulated = StaticStatus::new(true);
    let network: Arc<dyn NetworkStatus> = if cli.offline_sim {
        Arc::new(simulated.clone())
    } else {
        let probe = HttpProbe::new(
            config.probe_target(),
            config.probe_timeout(),
            &config.user_agent,
        )?;
        tracing::info!(target_url = %probe.target(), "Probing connectivity");
        Arc::new(probe)
    };

    let shell = Shell::start(config, network, Arc::new(ConsoleSurface))?;
    let printer = tokio::spawn(print_updates(shell.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<HostCommand>() {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring input");
                continue;
            }
        };

        if command == HostCommand::Quit {
            break;
        }

        dispatch(&shell, &simulated, cli.offline_sim, command).await?;
    }

    shell.shutdown().await;
    printer.abort();

    Ok(())
}

async fn dispatch(
    shell: &ShellHandle,
    simulated: &StaticStatus,
    offline_sim: bool,
    command: HostCommand,
) -> anyhow::Result<()> {
    match command {
        HostCommand::LoadStart => shell.load_started()?,
        HostCommand::LoadEnd => shell.load_finished()?,
        HostCommand::LoadError(description) => shell.load_failed(LoadFailure::new(description))?,
        HostCommand::Navigate { url, can_go_back } => {
            if shell.should_allow_load(&url) {
                shell.navigation_changed(NavigationEvent::new(url, can_go_back))?;
            }
        }
        HostCommand::Back => {
            let handled = shell.back_pressed().await;
            println!("{}", serde_json::json!({ "back_handled": handled }));
        }
        HostCommand::Retry => shell.retry()?,
        HostCommand::Home => shell.go_home()?,
        HostCommand::Online | HostCommand::Offline if !offline_sim => {
            tracing::warn!("Connectivity is probed; start with --offline-sim to simulate it");
        }
        HostCommand::Online => {
            simulated.set_connected(true);
            shell.check_connectivity()?;
        }
        HostCommand::Offline => {
            simulated.set_connected(false);
            shell.check_connectivity()?;
        }
        HostCommand::Check => shell.check_connectivity()?,
        HostCommand::Allow(url) => {
            let allowed = shell.should_allow_load(&url);
            println!("{}", serde_json::json!({ "url": url, "allowed": allowed }));
        }
        HostCommand::Quit => {}
    }

    Ok(())
}

async fn print_updates(shell: ShellHandle) {
    let mut snapshots = shell.watch();
    let mut notices = shell.notices();
    print_snapshot(&snapshots.borrow_and_update());

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                print_snapshot(&snapshots.borrow_and_update());
            }
            notice = notices.recv() => match notice {
                Ok(notice) => print_notice(&notice),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notice output fell behind");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    println!("{}", serde_json::json!({ "snapshot": snapshot }));
}

fn print_notice(notice: &ShellNotice) {
    println!("{}", serde_json::json!({ "notice": notice }));
}
