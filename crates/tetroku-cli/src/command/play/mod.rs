use std::path::PathBuf;

use anyhow::Context as _;
use rand::Rng as _;
use tetroku_engine::{GameConfig, GameSession, PieceSeed, ScoringClock, ScoringRule};

use crate::{command::play::app::PlayApp, tui::Runtime, util};

mod app;
mod input;
mod presenter;

/// Options shared by every command that starts games.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameArgs {
    /// Game configuration file (JSON); the flags below override it
    #[clap(long)]
    config: Option<PathBuf>,
    /// Board edge length
    #[clap(long)]
    board_size: Option<usize>,
    /// Counter that ages placed tiles; selects the matching scoring preset
    #[clap(long, value_enum)]
    clock: Option<ClockArg>,
    /// Piece seed as 32 hex digits; random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ClockArg {
    Turn,
    Round,
}

impl From<ClockArg> for ScoringClock {
    fn from(clock: ClockArg) -> Self {
        match clock {
            ClockArg::Turn => Self::Turn,
            ClockArg::Round => Self::Round,
        }
    }
}

impl GameArgs {
    pub(crate) fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<GameConfig, _>("game config", path)?,
            None => GameConfig::default(),
        };
        if let Some(size) = self.board_size {
            config.board_size = size;
        }
        if let Some(clock) = self.clock {
            config.scoring = ScoringRule::preset(clock.into());
        }
        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }

    pub(crate) fn seed(&self) -> PieceSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    game: GameArgs,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = arg.game.game_config()?;
    let seed = arg.game.seed();
    tracing::info!(%seed, board_size = config.board_size, "starting game");

    let session = GameSession::with_seed(config, seed)?;
    let mut app = PlayApp::new(session);
    Runtime::new()
        .run(&mut app)
        .context("Terminal error while playing")?;

    let session = app.session();
    tracing::info!(
        score = session.score(),
        turns = session.stats().turn_count(),
        "left game"
    );
    Ok(())
}
