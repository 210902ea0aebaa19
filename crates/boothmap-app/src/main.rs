//! Main application entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use boothmap_app::{Session, SessionError};
use boothmap_core::geometry::{Corner, NormalizedRect};
use boothmap_core::storage::{FileStorage, StorageError, events_key};
use boothmap_core::{
    BoothStatus, ConfigError, EditorConfig, Event, EventCatalog, EventChanges, EventError,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use kurbo::Vec2;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Event(#[from] EventError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "boothmap", about = "Exhibition floor plan editor")]
struct Cli {
    /// Directory holding stored layouts.
    #[arg(long, env = "BOOTHMAP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Email of the signed-in user; layouts are stored per user.
    #[arg(long, env = "BOOTHMAP_USER")]
    user: Option<String>,

    /// Editor config file (JSON).
    #[arg(long, env = "BOOTHMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Event whose floor plan to open.
    #[arg(long, default_value = "1")]
    event: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List, create or edit events.
    #[command(subcommand)]
    Events(EventsCommand),
    #[command(flatten)]
    Layout(LayoutCommand),
}

#[derive(Subcommand, Debug)]
enum LayoutCommand {
    /// Print booths and their positions.
    Show {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print occupancy figures.
    Stats,
    /// Change the status of a booth.
    Status { id: String, status: StatusArg },
    /// Move every booth back to the default layout.
    Reset,
    /// Drag a booth by a distance in percent of the map.
    Move {
        id: String,
        #[arg(allow_hyphen_values = true)]
        dx: f64,
        #[arg(allow_hyphen_values = true)]
        dy: f64,
        /// Disable snapping to neighboring booths.
        #[arg(long, default_value_t = false)]
        no_snap: bool,
    },
    /// Drag a corner of a booth by a distance in percent of the map.
    Resize {
        id: String,
        corner: CornerArg,
        #[arg(allow_hyphen_values = true)]
        dx: f64,
        #[arg(allow_hyphen_values = true)]
        dy: f64,
    },
    /// Rotate a booth clockwise by some degrees.
    Rotate {
        id: String,
        #[arg(allow_hyphen_values = true)]
        degrees: f64,
    },
    /// Generate booths from a layout grid.
    Grid {
        #[arg(long, default_value_t = 20.0)]
        x: f64,
        #[arg(long, default_value_t = 20.0)]
        y: f64,
        #[arg(long, default_value_t = 40.0)]
        width: f64,
        #[arg(long, default_value_t = 20.0)]
        height: f64,
        #[arg(long, default_value_t = 2)]
        rows: usize,
        #[arg(long, default_value_t = 4)]
        cols: usize,
        /// Cell indices (row * cols + col) to turn into booths.
        #[arg(long, value_delimiter = ',', required = true)]
        cells: Vec<usize>,
    },
}

#[derive(Subcommand, Debug)]
enum EventsCommand {
    /// Print every event.
    List,
    /// Add an event.
    Create(EventFields),
    /// Change fields of an event.
    Edit {
        id: String,
        #[command(flatten)]
        fields: EventFields,
    },
}

#[derive(Args, Debug)]
struct EventFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    map_url: Option<String>,
    #[arg(long)]
    sheet_id: Option<String>,
}

impl From<EventFields> for EventChanges {
    fn from(fields: EventFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            date: fields.date,
            location: fields.location,
            map_url: fields.map_url,
            sheet_id: fields.sheet_id,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum StatusArg {
    Available,
    Booked,
    Unavailable,
}

impl From<StatusArg> for BoothStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Available => BoothStatus::Available,
            StatusArg::Booked => BoothStatus::Booked,
            StatusArg::Unavailable => BoothStatus::Unavailable,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum CornerArg {
    Nw,
    Ne,
    Sw,
    Se,
}

impl From<CornerArg> for Corner {
    fn from(corner: CornerArg) -> Self {
        match corner {
            CornerArg::Nw => Corner::TopLeft,
            CornerArg::Ne => Corner::TopRight,
            CornerArg::Sw => Corner::BottomLeft,
            CornerArg::Se => Corner::BottomRight,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let storage = match cli.data_dir {
        Some(dir) => FileStorage::new(dir)?,
        None => FileStorage::default_location()?,
    };
    log::info!("Using layouts in {}", storage.base_path().display());

    let catalog_key = events_key(cli.user.as_deref());
    let mut catalog = EventCatalog::load_or_default(&storage, &catalog_key);
    let command = match cli.command {
        Command::Events(command) => return run_events(command, &mut catalog, &storage, &catalog_key),
        Command::Layout(command) => command,
    };
    let event = catalog
        .get(&cli.event)
        .ok_or_else(|| EventError::NotFound(cli.event.clone()))?;
    log::info!("Opening event {} ({})", event.id, event.name);

    let mut session = Session::open(storage, cli.user.as_deref(), &cli.event, config);

    match command {
        LayoutCommand::Show { json } => {
            if json {
                println!("{}", session.editor().plan().to_document().to_json()?);
            } else {
                print_plan(&session);
            }
            return Ok(());
        }
        LayoutCommand::Stats => {
            let stats = session.editor().stats();
            println!("total:       {}", stats.total);
            println!("available:   {}", stats.available);
            println!("booked:      {}", stats.booked);
            println!("unavailable: {}", stats.unavailable);
            println!("occupancy:   {}%", stats.occupancy_percent());
            return Ok(());
        }
        LayoutCommand::Status { id, status } => {
            if !session.editor().plan().contains_booth(&id) {
                return Err(SessionError::UnknownBooth(id).into());
            }
            if !session.editor_mut().set_booth_status(&id, status.into()) {
                println!("{} is already {}", id, BoothStatus::from(status).label());
                return Ok(());
            }
        }
        LayoutCommand::Reset => session.editor_mut().reset_positions(),
        LayoutCommand::Move { id, dx, dy, no_snap } => {
            if no_snap {
                session.editor_mut().set_snap_enabled(false);
            }
            session.move_booth(&id, Vec2::new(dx, dy))?;
        }
        LayoutCommand::Resize { id, corner, dx, dy } => {
            session.resize_booth(&id, corner.into(), Vec2::new(dx, dy))?;
        }
        LayoutCommand::Rotate { id, degrees } => session.rotate_booth(&id, degrees)?,
        LayoutCommand::Grid {
            x,
            y,
            width,
            height,
            rows,
            cols,
            cells,
        } => {
            let rect = NormalizedRect::new(x, y, width, height);
            let ids = session.generate_grid(rect, rows, cols, &cells)?;
            println!("added {}", ids.join(", "));
        }
    }

    session.save()?;
    println!("saved {}", session.key());
    Ok(())
}

fn run_events(
    command: EventsCommand,
    catalog: &mut EventCatalog,
    storage: &FileStorage,
    key: &str,
) -> Result<(), CliError> {
    let event = match command {
        EventsCommand::List => {
            println!("{:<4} {:<24} {:<20} {}", "id", "name", "date", "location");
            for event in catalog.events() {
                println!("{:<4} {:<24} {:<20} {}", event.id, event.name, event.date, event.location);
            }
            return Ok(());
        }
        EventsCommand::Create(fields) => catalog.create(fields.into())?.clone(),
        EventsCommand::Edit { id, fields } => catalog.edit(&id, fields.into())?.clone(),
    };
    catalog.save(storage, key)?;
    print_event(&event);
    Ok(())
}

fn print_event(event: &Event) {
    println!("id:          {}", event.id);
    println!("name:        {}", event.name);
    println!("description: {}", event.description);
    println!("date:        {}", event.date);
    println!("location:    {}", event.location);
    println!("map:         {}", event.map_url);
    println!("sheet:       {}", event.sheet_id);
}

fn print_plan<S: boothmap_core::Storage>(session: &Session<S>) {
    println!(
        "{:<6} {:<12} {:>8} {:>8} {:>8} {:>8} {:>8}  {}",
        "id", "status", "x", "y", "width", "height", "rot", "company"
    );
    for item in session.editor().render_items() {
        let p = item.position;
        println!(
            "{:<6} {:<12} {:>8.2} {:>8.2} {:>8.2} {:>8.2} {:>8.1}  {}",
            p.id,
            item.booth.status.label(),
            p.x,
            p.y,
            p.width,
            p.height,
            p.rotation,
            item.booth.company.as_deref().unwrap_or("-"),
        );
    }
}
