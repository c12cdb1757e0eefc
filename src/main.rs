#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::ChatMode;
use domain::models::Event;
use domain::services::ChatClient;
use domain::services::SessionManager;
use infrastructure::api::HttpApi;
use infrastructure::storage::FileSessionStore;
use tokio::sync::mpsc;
use tokio::task;
use tracing_appender::non_blocking::WorkerGuard;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::ActionsService;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! JaviAI has failed with the following app version and error.\n\nVersion: {}\nCommit: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            env!("VERGEN_GIT_DESCRIBE"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }
}

/// Sends JSON logs to `debug.log` when `RUST_LOG` mentions the crate. The
/// returned guard flushes buffered lines when dropped.
fn init_tracing() -> Option<WorkerGuard> {
    if !env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("javiai")
    {
        return None;
    }

    let log_dir = Config::log_dir();
    let log_file = match Config::open_log_file(&log_dir) {
        Ok(log_file) => log_file,
        Err(err) => {
            eprintln!(
                "{}",
                Paint::yellow(format!(
                    "Debug logging disabled, unable to open {}: {err}",
                    log_dir.join("debug.log").display()
                ))
            );
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(log_file);
    tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(writer)
        .init();

    return Some(guard);
}

async fn run() -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mode = ChatMode::parse(Config::get(ConfigKey::ChatMode)).unwrap_or_default();
    let client = ChatClient::new(
        Box::<HttpApi>::default(),
        SessionManager::new(Box::<FileSessionStore>::default()),
        mode,
    )
    .with_events(event_tx);

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(client, &mut action_rx).await;
    });

    action_tx.send(Action::Restore())?;
    let ui_future = ui::start(action_tx, event_rx);

    let res = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(worker_res)) => worker_res,
            Some(Err(join_err)) => Err(join_err.into()),
            None => Ok(()),
        },
        res = ui_future => res,
    );

    return res;
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let log_guard = init_tracing();

    let exit_code = match cli::parse().await {
        Ok(true) => match run().await {
            Ok(()) => 0,
            Err(err) => {
                ui::destruct_terminal_for_panic();
                handle_error(err);
                1
            }
        },
        Ok(false) => 0,
        Err(err) => {
            handle_error(err);
            1
        }
    };

    drop(log_guard);
    process::exit(exit_code);
}
