use std::process::ExitCode;

mod cli {
    use clap::Parser;
    use tracing::{debug, info};

    use playmusic::interrupt;
    use playmusic::{engine, CliArgs, Player, SystemClock, TrackList};

    pub fn run() -> playmusic::Result<()> {
        let args = CliArgs::parse();
        let (request, config) = args.into_parts()?;

        debug!("Resolving {:?}", request);
        let tracks = TrackList::resolve(&request)?;
        if tracks.is_empty() {
            return Ok(());
        }

        let interrupt = interrupt::install_handler()?;

        debug!("Initializing audio output");
        let engine = engine::open_default()?;
        info!(
            "Queued {} track(s){}",
            tracks.len(),
            config
                .wait_timeout
                .map(|t| format!(", wait timeout {:.1}s", t.as_secs_f32()))
                .unwrap_or_default()
        );

        let mut player = Player::new(engine, SystemClock, config).with_interrupt(interrupt);
        player.run(&tracks)?;

        Ok(())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playmusic=info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
