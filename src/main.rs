// antigravity-projects - keeps track of your projects and which one is active
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use anyhow::{Context, Result};
use antigravity_projects_lib::{
    core::{
        import_project, DirectoryPicker, ImportOutcome, NewProject, Project, ProjectPatch,
        ProjectType, RegistryStore, TypeDetector, UuidGenerator,
    },
    core::type_detector::marker_paths,
    persistence::{SnapshotStore, WriterHandle},
    Config, Database, RegistryError,
};
use async_trait::async_trait;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let verbose = take_flag(&mut args, "--verbose");
    init_logging(verbose);

    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    let command = args.remove(0);

    // These don't need the registry at all
    match command.as_str() {
        "detect" => return handle_detect(&args).await,
        "reset" => return handle_reset().await,
        "version" | "-v" | "--version" => {
            println!("antigravity-projects v{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "help" | "-h" | "--help" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let mut session = Session::open().await?;

    let result = match command.as_str() {
        "list" | "ls" => handle_list(&session.store),
        "add" => handle_add(&mut session.store, &args).await,
        "pick" => handle_pick(&mut session.store).await,
        "remove" | "rm" => handle_remove(&mut session.store, &args),
        "activate" => handle_activate(&mut session.store, &args),
        "deactivate" => {
            session.store.set_active(None);
            println!("No active project.");
            Ok(())
        }
        "rename" => handle_rename(&mut session.store, &args),
        "annotate" => handle_annotate(&mut session.store, &args),
        "status" => handle_status(&session).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    session.close().await?;
    result
}

/// Open registry plus the writer persisting it
struct Session {
    config: Config,
    db: Database,
    store: RegistryStore,
    writer: WriterHandle,
}

impl Session {
    async fn open() -> Result<Self> {
        let config = Config::from_env().context("could not resolve configuration")?;
        let db = Database::new(config.database_path())
            .await
            .with_context(|| format!("could not open {}", config.database_path().display()))?;

        let snapshots = SnapshotStore::new(db.clone(), config.storage_key.clone());
        let snapshot = snapshots.load().await?;
        let (sink, writer) = snapshots.spawn_writer();
        let store = RegistryStore::hydrate(snapshot, UuidGenerator, sink);

        Ok(Self {
            config,
            db,
            store,
            writer,
        })
    }

    /// Drop the registry and wait for queued writes to land
    async fn close(self) -> Result<()> {
        let Session { db, store, writer, .. } = self;
        drop(store);
        writer.shutdown().await?;
        db.close().await;
        Ok(())
    }
}

/// Reads a directory from stdin. An empty line cancels.
struct StdinPicker;

#[async_trait]
impl DirectoryPicker for StdinPicker {
    async fn pick_directory(&self) -> antigravity_projects_lib::Result<Option<PathBuf>> {
        print!("Project directory (empty to cancel): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        Ok(Some(resolve_path(trimmed)?))
    }
}

fn handle_list(store: &RegistryStore) -> Result<()> {
    if store.is_empty() {
        println!("No projects yet. Add one with: antigravity-projects add <path>");
        return Ok(());
    }

    let active = store.active_project_id();

    println!("\nProjects:");
    println!("{}", "=".repeat(60));
    for project in store.projects() {
        print_project(project, active == Some(project.id.as_str()));
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_add(store: &mut RegistryStore, args: &[String]) -> Result<()> {
    let mut path_arg: Option<String> = None;
    let mut name: Option<String> = None;
    let mut color: Option<String> = None;
    let mut ai_context: Option<String> = None;
    let mut project_type: Option<ProjectType> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                i += 1;
                name = args.get(i).cloned();
            }
            "--color" => {
                i += 1;
                color = args.get(i).cloned();
            }
            "--context" => {
                i += 1;
                ai_context = args.get(i).cloned();
            }
            "--type" => {
                i += 1;
                if let Some(raw) = args.get(i) {
                    project_type = Some(raw.parse()?);
                }
            }
            arg => path_arg = Some(arg.to_string()),
        }
        i += 1;
    }

    let Some(path_arg) = path_arg else {
        eprintln!("Error: No project path provided");
        return Ok(());
    };

    let dir = resolve_path(&path_arg)?;
    let path = dir.display().to_string();

    if let Some(existing) = store.find_by_path(&path) {
        println!("Already registered as '{}' ({})", existing.name, existing.id);
        return Ok(());
    }

    let project_type = match project_type {
        Some(project_type) => project_type,
        None => TypeDetector::new().detect(&dir).await,
    };

    let mut data = NewProject::new(
        name.unwrap_or_else(|| Project::name_from_path(&dir)),
        path,
        project_type,
    );
    if let Some(color) = color {
        data = data.with_color(color);
    }
    if let Some(ai_context) = ai_context {
        data = data.with_ai_context(ai_context);
    }

    let project = store.add(data);
    println!("✓ Added {} ({}) as {}", project.name, project.project_type, project.id);

    Ok(())
}

async fn handle_pick(store: &mut RegistryStore) -> Result<()> {
    match import_project(&StdinPicker, &TypeDetector::new(), store).await? {
        ImportOutcome::Added(project) => {
            println!("✓ Added {} ({}) as {}", project.name, project.project_type, project.id)
        }
        ImportOutcome::AlreadyRegistered(project) => {
            println!("Already registered as '{}' ({})", project.name, project.id)
        }
        ImportOutcome::Cancelled => {} // nothing picked, nothing to say
    }

    Ok(())
}

fn handle_remove(store: &mut RegistryStore, args: &[String]) -> Result<()> {
    let Some(id) = args.first() else {
        eprintln!("Error: No project id provided");
        return Ok(());
    };

    match store.get(id).map(|p| p.name.clone()) {
        Some(name) => {
            store.remove(id);
            println!("✓ Removed {}", name);
        }
        None => eprintln!("{}", RegistryError::ProjectNotFound(id.clone()).user_message()),
    }

    Ok(())
}

fn handle_activate(store: &mut RegistryStore, args: &[String]) -> Result<()> {
    let Some(id) = args.first() else {
        eprintln!("Error: No project id provided");
        return Ok(());
    };

    // The store accepts any id; the CLI only offers ids it knows about
    if store.get(id).is_none() {
        eprintln!("{}", RegistryError::ProjectNotFound(id.clone()).user_message());
        return Ok(());
    }

    store.set_active(Some(id));
    if let Some(project) = store.active_project() {
        println!("✓ {} is now active", project.name);
    }

    Ok(())
}

fn handle_rename(store: &mut RegistryStore, args: &[String]) -> Result<()> {
    if args.len() < 2 {
        eprintln!("Error: Usage: rename <id> <new name>");
        return Ok(());
    }

    let id = &args[0];
    if store.get(id).is_none() {
        eprintln!("{}", RegistryError::ProjectNotFound(id.clone()).user_message());
        return Ok(());
    }

    let name = args[1..].join(" ");
    store.update(id, ProjectPatch::name(name.clone()));
    println!("✓ Renamed to {}", name);

    Ok(())
}

fn handle_annotate(store: &mut RegistryStore, args: &[String]) -> Result<()> {
    let Some(id) = args.first() else {
        eprintln!("Error: Usage: annotate <id> [text]");
        return Ok(());
    };

    if store.get(id).is_none() {
        eprintln!("{}", RegistryError::ProjectNotFound(id.clone()).user_message());
        return Ok(());
    }

    // No text clears the context
    if args.len() < 2 {
        store.update(id, ProjectPatch::ai_context(None));
        println!("✓ Context cleared");
    } else {
        store.update(id, ProjectPatch::ai_context(Some(args[1..].join(" "))));
        println!("✓ Context saved");
    }

    Ok(())
}

async fn handle_detect(args: &[String]) -> Result<()> {
    let dir = match args.first() {
        Some(raw) => resolve_path(raw)?,
        None => env::current_dir()?,
    };

    let project_type = TypeDetector::new().detect(&dir).await;

    println!("{}: {}", dir.display(), project_type);
    println!("\nChecked, in order:");
    for marker in marker_paths(&dir) {
        let mark = if marker.exists() { "✓" } else { " " };
        println!("  {} {}", mark, marker.display());
    }

    Ok(())
}

async fn handle_reset() -> Result<()> {
    let config = Config::from_env().context("could not resolve configuration")?;
    let db = Database::new(config.database_path())
        .await
        .with_context(|| format!("could not open {}", config.database_path().display()))?;
    let snapshots = SnapshotStore::new(db.clone(), config.storage_key);

    if snapshots.clear().await? {
        println!("✓ Cleared '{}'. The default project list is used next time.", snapshots.key());
    } else {
        println!("Nothing stored under '{}'.", snapshots.key());
    }

    db.close().await;
    Ok(())
}

async fn handle_status(session: &Session) -> Result<()> {
    let stats = session.db.stats().await?;
    let store = &session.store;

    println!("\nantigravity-projects Status");
    println!("{}", "=".repeat(60));
    println!("  Data directory: {}", session.config.data_dir.display());
    println!("  Database:       {}", session.db.path().display());
    println!("  Storage key:    {}", session.config.storage_key);
    println!("  Stored slots:   {}", stats.total_slots);
    println!(
        "  Connections:    {} open, {} idle",
        stats.pool_size, stats.idle_connections
    );
    println!("  Projects:       {}", store.len());
    match (store.active_project_id(), store.active_project()) {
        (Some(_), Some(project)) => println!("  Active:         {} ({})", project.name, project.id),
        (Some(id), None) => println!("  Active:         {} (not in registry)", id),
        (None, _) => println!("  Active:         none"),
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

fn print_project(project: &Project, active: bool) {
    let marker = if active { "*" } else { " " };
    println!(
        "{} {:<24} {:<6} {}",
        marker, project.name, project.project_type, project.path
    );
    println!(
        "    id: {}  last active: {}",
        project.id,
        project.last_active.to_rfc3339()
    );
    if let Some(context) = &project.ai_context {
        println!("    context: {}", context);
    }
}

/// Make a user-supplied path absolute, resolving symlinks when it exists
fn resolve_path(raw: &str) -> std::io::Result<PathBuf> {
    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    Ok(std::fs::canonicalize(&absolute).unwrap_or(absolute))
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|arg| arg != flag);
    args.len() != before
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("antigravity_projects_lib=debug,antigravity_projects=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn print_usage() {
    println!(
        r#"antigravity-projects v{} - Keeps track of your projects

USAGE:
    antigravity-projects [--verbose] <COMMAND> [OPTIONS]

COMMANDS:
    list                      Show all projects (* marks the active one)
    add <path> [OPTIONS]      Register a directory
        --name <name>         Display name (default: directory name)
        --type <type>         tauri, web, rust or other (default: detected)
        --color <color>       Accent color
        --context <text>      Notes for AI assistants
    pick                      Type a directory to register (empty cancels)
    remove <id>               Forget a project
    activate <id>             Make a project the active one
    deactivate                Clear the active project
    rename <id> <name>        Change a project's display name
    annotate <id> [text]      Set a project's AI context (no text clears it)
    detect [path]             Show what type a directory looks like
    status                    Show storage location and stats
    reset                     Forget everything stored (defaults return)
    version                   Show version
    help                      Show this help

ENVIRONMENT:
    ANTIGRAVITY_PROJECTS_HOME   Data directory (default: ~/.antigravity-projects)
    ANTIGRAVITY_PROJECTS_KEY    Storage slot name (default: antigravity-projects)
    RUST_LOG                    Log filter, e.g. antigravity_projects_lib=debug
"#,
        env!("CARGO_PKG_VERSION")
    );
}
