//! Terminal cluster puzzle runner (default binary).
//!
//! Starts the game coordinator, the HTTP/WebSocket server and the terminal
//! front end. All three share one game: a hit from a browser shows up in the
//! terminal and vice versa.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;

use tui_cluster::adapter::{Adapter, ServerConfig};
use tui_cluster::config;
use tui_cluster::core::{GameSnapshot, GameState};
use tui_cluster::engine::{Command, Coordinator, CoordinatorHandle};
use tui_cluster::input::{handle_key_event, pointer_hit, should_quit};
use tui_cluster::logging;
use tui_cluster::term::{
    FrameBuffer, GameView, Palette, RenderThrottle, ServerStatusView, TerminalRenderer, Viewport,
};

/// How long to wait for input before polling the coordinator for remote changes.
const IDLE_POLL: Duration = Duration::from_millis(250);
/// Unchanged frames are still redrawn this often.
const REFRESH_MS: u64 = 1000;

#[derive(Parser, Debug)]
#[command(
    name = "tui-cluster",
    version,
    about = "Cluster-clearing puzzle for the terminal and the browser"
)]
struct Cli {
    /// Config file (created with defaults if missing)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Board seed; 0 derives one from the clock
    #[arg(long)]
    seed: Option<u64>,

    /// Server listen address, e.g. 127.0.0.1:8080
    #[arg(long)]
    listen: Option<String>,

    /// Run only the server, without the terminal front end
    #[arg(long, conflicts_with = "no_server")]
    headless: bool,

    /// Run only the terminal front end
    #[arg(long)]
    no_server: bool,

    /// Log file used while the terminal front end is active
    #[arg(long, default_value = "tui-cluster.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.headless {
        logging::init_stderr();
    } else {
        logging::init_file(&cli.log_file)?;
    }

    let (mut game_config, _origin) = config::load_or_default(&cli.config);
    if let Some(seed) = cli.seed {
        game_config.seed = seed;
    }
    if let Some(listen) = cli.listen {
        game_config.listen_addr = listen;
    }
    game_config.validate()?;

    let state = GameState::new(&game_config, Some(game_config.seed))?;
    info!(
        seed = state.seed(),
        width = game_config.width,
        height = game_config.height,
        "board generated"
    );
    let (handle, _coordinator) = Coordinator::spawn(state)?;

    let adapter = if cli.no_server {
        None
    } else {
        let server_config = ServerConfig::from_game_config(&game_config)?;
        Some(Adapter::start(server_config, handle.clone())?)
    };

    if cli.headless {
        if let Some(adapter) = &adapter {
            adapter.wait_for_shutdown()?;
        }
        return Ok(());
    }

    let palette = Palette::from_tiles(&game_config.tile_types);
    let server = adapter.as_ref().map(|a| ServerStatusView {
        addr: a.local_addr(),
    });

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &handle, &palette, server.as_ref());

    // Always try to restore terminal state.
    let _ = term.exit();
    info!("front end closed");
    result
}

/// Frame identity: the snapshot plus the viewport it is drawn into.
fn frame_fingerprint(snap: &GameSnapshot, viewport: Viewport) -> u64 {
    let size = ((viewport.width as u64) << 16) | viewport.height as u64;
    snap.fingerprint().rotate_left(32) ^ size
}

fn run(
    term: &mut TerminalRenderer,
    handle: &CoordinatorHandle,
    palette: &Palette,
    server: Option<&ServerStatusView>,
) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut throttle = RenderThrottle::new(REFRESH_MS);
    let started = Instant::now();

    let mut snap = handle.request_blocking(Command::Get)?;

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);

        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_render(now_ms, frame_fingerprint(&snap, viewport)) {
            view.render_into(&snap, palette, server, viewport, &mut fb);
            term.draw_swap(&mut fb)?;
        }

        if !event::poll(IDLE_POLL)? {
            // Idle: pick up changes made by remote clients.
            snap = handle.request_blocking(Command::Get)?;
            continue;
        }

        let command = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                handle_key_event(key)
                    .map(|action| Command::from_action(action, (snap.cursor.x, snap.cursor.y)))
            }
            Event::Mouse(mouse) => pointer_hit(mouse)
                .and_then(|(column, row)| view.board_cell_at(&snap, viewport, column, row))
                .map(|(x, y)| Command::Hit {
                    x: x as i32,
                    y: y as i32,
                }),
            Event::Resize(_, _) => {
                term.invalidate();
                throttle.invalidate();
                None
            }
            _ => None,
        };

        if let Some(command) = command {
            snap = handle.request_blocking(command)?;
        }
    }
}
