use color_eyre::Result;
use padnav::config::DispatcherConfig;
use padnav::controller::{Action, GilrsSource, PollerHandle};
use padnav::dispatch::{Consumer, Dispatcher, KeyChannel};
use padnav::focus::{FocusRouter, GridCursor, NavOutcome, Zone};
use tokio::task::LocalSet;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const LIBRARY_ITEMS: usize = 23;
const SIDEBAR_ENTRIES: [&str; 4] = ["Library", "Store", "Settings", "Power"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup()?;

    let config = DispatcherConfig::load_or_default(DispatcherConfig::default_path().as_deref())?;
    info!("Using config: {:?}", config);

    LocalSet::new().run_until(run(config)).await
}

async fn run(config: DispatcherConfig) -> Result<()> {
    let source = GilrsSource::new()?;
    let poller = PollerHandle::spawn(source, Some(config.poller_settings()));
    let dispatcher = Dispatcher::new(poller.subscribe(), KeyChannel::new(config.keys.clone()));
    let router = FocusRouter::launcher();

    let library = {
        let router = router.clone();
        let columns = GridCursor::columns_for_width(1280.0, 220.0, 16.0);
        let mut grid = GridCursor::new(LIBRARY_ITEMS, columns);
        Consumer::new(
            config.consumer_options("library"),
            router.gate(Zone::Library),
            move |action: Action| match grid.apply(action) {
                NavOutcome::Moved(index) => info!("Library: item {} selected", index),
                NavOutcome::Edge(direction) => {
                    router.hand_off(Zone::Library, direction);
                }
                NavOutcome::Pass(Action::A) => {
                    info!("Library: opening details for item {}", grid.index());
                    router.open_overlay(Zone::Dialog);
                }
                NavOutcome::Pass(other) => info!("Library: {} ignored", other),
            },
        )
    };

    let sidebar = {
        let router = router.clone();
        let mut list = GridCursor::list(SIDEBAR_ENTRIES.len());
        Consumer::new(
            config.consumer_options("sidebar"),
            router.gate(Zone::Sidebar),
            move |action: Action| match list.apply(action) {
                NavOutcome::Moved(index) => info!("Sidebar: {}", SIDEBAR_ENTRIES[index]),
                NavOutcome::Edge(direction) => {
                    router.hand_off(Zone::Sidebar, direction);
                }
                NavOutcome::Pass(Action::A) => {
                    info!("Sidebar: activated {}", SIDEBAR_ENTRIES[list.index()])
                }
                NavOutcome::Pass(other) => info!("Sidebar: {} ignored", other),
            },
        )
    };

    let dialog = {
        let router = router.clone();
        Consumer::new(
            config.consumer_options("dialog"),
            router.gate(Zone::Dialog),
            move |action: Action| match action {
                Action::A => {
                    info!("Dialog: confirmed");
                    router.close_overlay();
                }
                Action::B => {
                    info!("Dialog: cancelled");
                    router.close_overlay();
                }
                other => info!("Dialog: {}", other),
            },
        )
    };

    let _mounted = [
        dispatcher.mount(library),
        dispatcher.mount(sidebar),
        dispatcher.mount(dialog),
    ];

    // No window here, so nothing feeds UI key events; an egui front end
    // forwards them with `dispatcher.keys().feed(&event)`
    info!(
        "Key channel has {} bindings and no key source in this binary, gamepads only",
        config.keys.0.len()
    );
    info!("Focus starts on {}; press Ctrl+C to exit", router.owner());
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    poller.stop();
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
