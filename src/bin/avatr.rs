use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use avatr::{AvatarRequest, CompositionWorker, DirStore, EdgeRequest, QueueDispatcher, spawn_worker};

#[derive(Parser, Debug)]
#[command(name = "avatr", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the edge handler against a local store and print the response.
    Handle(HandleArgs),
    /// Compose and rasterize one avatar to a local PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct HandleArgs {
    /// Edge request envelope JSON (body payload base64-encoded).
    #[arg(long)]
    event: PathBuf,

    /// Store root directory; must contain the `parts/` tree, rendered assets
    /// land under `p/`.
    #[arg(long = "store-dir")]
    store_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Avatar request JSON (`parts` + `palette`, the client wire shape).
    #[arg(long)]
    request: PathBuf,

    /// Directory containing the `parts/` tree.
    #[arg(long = "assets-dir")]
    assets_dir: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Handle(args) => run_handle(args).await,
        Command::Render(args) => run_render(args).await,
    }
}

async fn run_handle(args: HandleArgs) -> anyhow::Result<()> {
    let raw = tokio::fs::read(&args.event)
        .await
        .with_context(|| format!("reading {}", args.event.display()))?;
    let event: EdgeRequest = serde_json::from_slice(&raw).context("parsing edge event")?;

    let store = Arc::new(DirStore::new(&args.store_dir));
    let (dispatcher, rx) = QueueDispatcher::new(16);
    let worker = Arc::new(CompositionWorker::new(store.clone()));
    let worker_task = spawn_worker(worker, rx);

    let response = avatr::handle(&event, store.as_ref(), &dispatcher).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    // Drain the queue before exiting so the rendered asset lands on disk.
    drop(dispatcher);
    worker_task.await.context("worker task panicked")?;
    Ok(())
}

async fn run_render(args: RenderArgs) -> anyhow::Result<()> {
    let raw = tokio::fs::read(&args.request)
        .await
        .with_context(|| format!("reading {}", args.request.display()))?;
    let request = AvatarRequest::from_slice(&raw).context("validating avatar request")?;

    let store = Arc::new(DirStore::new(&args.assets_dir));
    let worker = CompositionWorker::new(store);
    let png = worker
        .compose_png(&request.parts, &request.palette)
        .await
        .context("composing avatar")?;

    tokio::fs::write(&args.out, png)
        .await
        .with_context(|| format!("writing {}", args.out.display()))?;
    Ok(())
}
