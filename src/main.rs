use anyhow::{Context, Result};
use clap::Parser;
use keymask::app::{AppControl, MaskApp};
use keymask::config::{MaskConfig, Mode, Preset};
use keymask::logging;
use keymask::terminal::{Terminal, TerminalEvent};
use std::path::PathBuf;
use std::time::Duration;

/// Type into a single masked field in the terminal.
#[derive(Debug, Parser)]
#[command(name = "keymask", version, about)]
struct Cli {
    /// Mask pattern: `9` digit, `A` letter, `U` uppercase letter, anything
    /// else is a literal.
    #[arg(short, long, conflicts_with = "preset")]
    pattern: Option<String>,

    /// Named built-in mask.
    #[arg(long)]
    preset: Option<Preset>,

    /// YAML or JSON file holding a mask configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How edits are masked.
    #[arg(long)]
    mode: Option<Mode>,

    /// Do not insert literal characters on the user's behalf.
    #[arg(long)]
    no_static: bool,

    /// Text shown before the field.
    #[arg(long, default_value = "> ")]
    label: String,

    /// Starting value of the field.
    #[arg(long, default_value = "")]
    initial: String,
}

impl Cli {
    fn mask_config(&self) -> Result<MaskConfig> {
        let mut config = match &self.config {
            Some(path) => MaskConfig::load(path)
                .with_context(|| format!("failed to load mask config {}", path.display()))?,
            None => MaskConfig::default(),
        };

        if let Some(pattern) = &self.pattern {
            config.pattern = Some(pattern.clone());
            config.preset = None;
        }
        if let Some(preset) = self.preset {
            config.preset = Some(preset);
            config.pattern = None;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if self.no_static {
            config.insert_static_characters = false;
        }

        config
            .resolve_pattern()
            .context("no mask given; pass --pattern, --preset or --config")?;
        Ok(config)
    }
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.mask_config()?;
    let mut app = MaskApp::new(cli.label.as_str(), &config, cli.initial.as_str());

    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;
    let result = event_loop(&mut terminal, &mut app);
    terminal.finish_line()?;
    terminal.exit_raw_mode()?;

    if result? == AppControl::Submit {
        println!("value: {}", app.value());
        println!("unmasked: {}", app.unmasked());
    }
    Ok(())
}

fn event_loop(terminal: &mut Terminal, app: &mut MaskApp) -> Result<AppControl> {
    let mut render_requested = true;

    loop {
        if terminal.poll(Duration::from_millis(100))? {
            match terminal.read_event()? {
                TerminalEvent::Key(key_event) => {
                    let control = app.handle_key(key_event);
                    if control != AppControl::Continue {
                        app.render(terminal)?;
                        return Ok(control);
                    }
                    render_requested = true;
                }
                TerminalEvent::Resize => {
                    render_requested = true;
                }
            }
        }

        if app.tick() {
            render_requested = true;
        }

        if render_requested {
            app.render(terminal)?;
            render_requested = false;
        }
    }
}
