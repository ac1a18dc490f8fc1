//! blog-admin binary
//!
//! 1. Event (keyboard) -> view handle_event() -> Actions
//! 2. Actions dispatched to the EffectStore
//! 3. Reducer updates state and returns effects
//! 4. Effects spawn REST calls and file reads
//! 5. If state changed, re-render
//!
//! ```sh
//! blog-admin --base-url http://localhost:8080/ --route /entity/blog-entry/new
//! ```

use std::cell::RefCell;
use std::io;

use blog_admin::action::Action;
use blog_admin::api::BlogApi;
use blog_admin::config::{default_log_path, AdminConfig, Cli};
use blog_admin::effect::handle_effect;
use blog_admin::logging;
use blog_admin::reducer::reducer;
use blog_admin::state::AppState;
use blog_admin::views::AdminUi;
use blog_admin_core::{EffectRuntime, EffectStore, LoggingMiddleware};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // Settings errors are reported before the terminal is taken over
    let config = match AdminConfig::resolve(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let api = match BlogApi::new(&config.base_url) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    let _log_guard = match logging::init(&log_path, &cli.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: cannot open log file {}: {}", log_path.display(), e);
            std::process::exit(1);
        }
    };
    // from here on errors return from main so the guard can flush the log

    info!(
        base_url = %config.base_url,
        page_size = config.page_size,
        route = %config.start_route,
        "starting blog-admin"
    );

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, config, api).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal loop failed");
    }
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: AdminConfig,
    api: BlogApi,
) -> io::Result<()> {
    let store = EffectStore::new(AppState::new(&config), reducer)
        .with_middleware(LoggingMiddleware::new());
    let mut runtime = EffectRuntime::from_store(store);

    runtime.enqueue(Action::RouteNavigate(config.start_route.clone()));

    let ui = RefCell::new(AdminUi::new(config.keybindings));

    runtime
        .run(
            terminal,
            |frame, area, state| ui.borrow_mut().render(frame, area, state),
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handle_effect(effect, ctx, &api),
        )
        .await?;

    info!("blog-admin stopped");
    Ok(())
}
