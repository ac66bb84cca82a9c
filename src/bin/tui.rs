//! Netpresence TUI (Terminal User Interface)
//!
//! Shows whether the machine is on the saved network and lists the
//! reminders delivered by the background worker.

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use netpresence::{
    connectivity::{ConnectivityMonitor, HttpIpProbe, LinkWatcher, PollLoop, PollLoopHandle, UdpRouteProbe},
    notify::{InteractivePrompt, NotificationDispatcher, PermissionBroker, PermissionState},
    storage::{IdentityStore, JsonFileStore, SettingsManager},
    tui::{ui::ui, Action, App},
    worker::{DeliveredNotification, LocalWorkerHost, RecoveryAgent, WorkerControl},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const SETTINGS_PATH: &str = "./app_data/settings.json";

/// Results of background actions reported back to the UI
enum UiEvent {
    Message(String),
    Permission(PermissionState),
}

/// Everything running on the tokio runtime
struct Services {
    monitor: Arc<ConnectivityMonitor>,
    permission: Arc<PermissionBroker>,
    prompt: Arc<InteractivePrompt>,
    host: Arc<LocalWorkerHost>,
    poll: PollLoopHandle,
    link_watcher: JoinHandle<()>,
}

impl Services {
    /// Wire up and start the monitor; must run inside the runtime
    async fn start(
        settings: SettingsManager,
    ) -> anyhow::Result<(Self, mpsc::UnboundedReceiver<DeliveredNotification>)> {
        let config = settings.monitor_config().await;

        let identity_path = settings.get_identity_path().await;
        let identity = IdentityStore::new(Arc::new(
            JsonFileStore::open(&identity_path).context("Failed to open identity store")?,
        ));

        let (host, outbox) = LocalWorkerHost::new();
        let host = Arc::new(host);
        host.register(&config.worker_script_path)
            .await
            .context("Failed to register notification worker")?;

        let permission = Arc::new(PermissionBroker::with_settings(settings).await);
        let dispatcher = NotificationDispatcher::new(permission.clone(), host.clone());
        let recovery = RecoveryAgent::new(host.clone(), config.worker_script_path.clone());
        let probe = HttpIpProbe::from_config(&config)?;

        let monitor = Arc::new(ConnectivityMonitor::new(
            Arc::new(probe),
            identity,
            Arc::new(dispatcher),
            Arc::new(recovery),
        ));

        let (signals, link_watcher) =
            LinkWatcher::new(Arc::new(UdpRouteProbe::default()), config.link_check_interval).subscribe();
        let poll = PollLoop::new(monitor.clone(), config.poll_interval).spawn(signals);

        let services = Self {
            monitor,
            permission,
            prompt: Arc::new(InteractivePrompt::new()),
            host,
            poll,
            link_watcher,
        };
        Ok((services, outbox))
    }

    /// Release the timer, signal subscription and worker
    async fn shutdown(self) {
        self.poll.shutdown().await;
        self.link_watcher.abort();
        self.host.shutdown().await;
    }
}

fn main() -> anyhow::Result<()> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let _guard = runtime.enter();

    let settings = runtime.block_on(SettingsManager::new(SETTINGS_PATH))?;
    netpresence::init_with_log_file(runtime.block_on(settings.get_log_path()))?;

    let (services, outbox) = runtime.block_on(Services::start(settings))?;
    let permission = runtime.block_on(services.permission.state());
    let mut app = App::new(services.monitor.snapshot(), permission);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let res = run_app(&mut terminal, &runtime, &services, outbox, &mut app);

    runtime.block_on(services.shutdown());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    runtime: &Runtime,
    services: &Services,
    mut outbox: mpsc::UnboundedReceiver<DeliveredNotification>,
    app: &mut App,
) -> io::Result<()> {
    let mut snapshots = services.monitor.subscribe();
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();

    loop {
        if snapshots.has_changed().unwrap_or(false) {
            app.update_snapshot(snapshots.borrow_and_update().clone());
        }

        while let Ok(notification) = outbox.try_recv() {
            app.push_notification(notification);
        }

        while let Ok(event) = ui_rx.try_recv() {
            match event {
                UiEvent::Message(message) => app.set_status_message(message),
                UiEvent::Permission(state) => app.set_permission(state),
            }
        }

        app.set_permission_prompt(services.prompt.is_waiting());

        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = app.handle_key(key.code);
                    perform(action, runtime, services, &ui_tx);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Run an action on the runtime without blocking the UI thread
fn perform(action: Action, runtime: &Runtime, services: &Services, ui_tx: &mpsc::UnboundedSender<UiEvent>) {
    let monitor = services.monitor.clone();
    let ui_tx = ui_tx.clone();

    match action {
        Action::None | Action::Quit => {}
        Action::RefreshNow => {
            runtime.spawn(async move {
                let transition = monitor.run_cycle().await;
                let _ = ui_tx.send(UiEvent::Message(format!("Network check: {}", transition.status())));
            });
        }
        Action::SaveNetwork(label) => {
            runtime.spawn(async move {
                let message = match monitor.save_current_network(&label).await {
                    Ok(identity) => format!("Saved {:?} ({})", identity.label, identity.reference_ip),
                    Err(e) => format!("Could not save network: {}", e),
                };
                let _ = ui_tx.send(UiEvent::Message(message));
            });
        }
        Action::ForgetNetwork => {
            runtime.spawn(async move {
                let message = match monitor.forget_network().await {
                    Ok(()) => "Saved network forgotten".to_string(),
                    Err(e) => format!("Could not forget network: {}", e),
                };
                let _ = ui_tx.send(UiEvent::Message(message));
            });
        }
        Action::RequestPermission => {
            let permission = services.permission.clone();
            let prompt = services.prompt.clone();
            runtime.spawn(async move {
                let state = permission.request(prompt.as_ref()).await;
                let _ = ui_tx.send(UiEvent::Permission(state));
            });
        }
        Action::AnswerPermission(granted) => {
            let prompt = services.prompt.clone();
            runtime.spawn(async move {
                prompt.answer(granted).await;
            });
        }
    }
}
