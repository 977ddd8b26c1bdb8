//! Run the scene editor headless, driven by an input script, and log every
//! backend call.

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use clap::Parser;
use tracing::{Level, error, info};
use trellis::{
    Gui,
    error::{Error, Result},
    geom::Expanse,
    resources::MonospaceLoader,
    style::Theme,
};
use trellis_demos::{
    editor::{DEMO_SCRIPT, Editor, Scene},
    script,
    trace::TraceBackend,
};

/// CLI flags for the editor demo.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Input script to play. Defaults to a built-in session.
    #[clap(short, long)]
    script: Option<PathBuf>,

    /// Theme file in JSON.
    #[clap(short, long)]
    theme: Option<PathBuf>,

    /// Window width.
    #[clap(long, default_value_t = 800.0)]
    width: f32,

    /// Window height.
    #[clap(long, default_value_t = 600.0)]
    height: f32,

    /// Log level.
    #[clap(short, long, default_value_t = Level::INFO)]
    level: Level,

    /// Print the widget tree when the script ends.
    #[clap(short, long)]
    dump: bool,
}

/// Read a file into a string.
fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Invalid(format!("{}: {e}", path.display())))
}

/// Build the editor and play the script.
fn run(args: &Args) -> Result<()> {
    let mut gui = Gui::new(TraceBackend::default(), MonospaceLoader);
    gui.resize(Expanse::new(args.width, args.height));
    if let Some(path) = &args.theme {
        gui.set_theme(Theme::from_json(&read(path)?)?);
    }
    let editor = gui.add_content(Editor::new(Scene::sample()))?;
    gui.frame(None, Duration::ZERO)?;

    let src = match &args.script {
        Some(path) => read(path)?,
        None => DEMO_SCRIPT.to_string(),
    };
    let steps = script::parse(&src)?;
    info!(steps = steps.len(), "playing script");
    script::run(&mut gui, &steps)?;

    if let Some(state) = gui.core.widget::<Editor>(editor).map(Editor::state) {
        let state = state
            .lock()
            .map_err(|_| Error::Internal("editor state lock poisoned".into()))?;
        info!(status = state.status(), objects = state.scene.len(), "script finished");
    }
    if args.dump {
        println!("{}", gui.dump()?);
    }
    Ok(())
}

/// Run the editor demo.
pub fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt().with_max_level(args.level).init();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "editor demo failed");
            ExitCode::FAILURE
        }
    }
}
