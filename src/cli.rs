// Cercanos - cli.rs
//
// Command-line front end: clap command definitions, dispatch onto
// `AppState`, and plain-text rendering of the list, map, detail and
// profile views. `shell` runs the same commands line by line against one
// state so roster changes stay visible for the rest of the session.

use cercanos::app::state::AppState;
use cercanos::app::storage::FileStorage;
use cercanos::core::export;
use cercanos::core::filter::{toggle_in_list, FilterState};
use cercanos::core::geo::MapViewport;
use cercanos::core::model::{Professional, ViewMode};
use cercanos::core::review::{ReviewDraft, ReviewOutcome};
use cercanos::core::roster::{self, Catalog, Roster};
use cercanos::platform::config::{AppConfig, PlatformPaths};
use cercanos::util::constants;
use cercanos::util::error::{CercanosError, ConfigError, RosterError};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Cercanos - find nearby healthcare professionals.
///
/// Search the directory by name, specialty, insurance and rating, keep a
/// list of favourite doctors, and leave reviews.
#[derive(Parser, Debug)]
#[command(name = "cercanos", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Directory holding config.toml and local storage (overrides the platform default).
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON roster replacing the built-in dataset.
    #[arg(long = "roster", global = true)]
    pub roster: Option<PathBuf>,
}

/// One line of an interactive session.
#[derive(Parser, Debug)]
#[command(name = "cercanos", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Search professionals by name, specialty, insurance and rating.
    Search(SearchArgs),

    /// Show a professional's profile and reviews.
    Show { id: String },

    /// List your favourite professionals ("my doctors").
    Favorites,

    /// Add or remove a professional from your favourites.
    Favorite { id: String },

    /// Log in as the demo patient.
    Login,

    /// Log out.
    Logout,

    /// Show the logged-in patient's profile.
    Whoami,

    /// Leave a review for a professional.
    Review {
        id: String,

        /// Stars, 1 to 5.
        #[arg(short = 'r', long = "rating", default_value_t = 0)]
        rating: u8,

        #[arg(short = 'c', long = "comment", default_value = "")]
        comment: String,
    },

    /// Show or edit the insurance plans a professional accepts.
    Insurances {
        /// Professional to edit (defaults to `[panel] professional_id`).
        #[arg(long = "id")]
        id: Option<String>,

        /// Add the plan if absent, remove it if present. Repeatable.
        #[arg(short = 't', long = "toggle")]
        toggle: Vec<String>,

        /// Replace the whole list. Repeatable.
        #[arg(short = 's', long = "set", conflicts_with = "toggle")]
        set: Vec<String>,
    },

    /// List the known specialties and insurance plans.
    Catalog,

    /// Read commands from stdin, one per line, against a single session.
    Shell,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SearchArgs {
    /// Case-insensitive substring of the professional's name or specialty.
    #[arg(default_value = "")]
    pub query: String,

    /// Restrict to a specialty. Repeatable.
    #[arg(short = 's', long = "specialty")]
    pub specialty: Vec<String>,

    /// Restrict to professionals accepting any of these plans. Repeatable.
    #[arg(short = 'i', long = "insurance")]
    pub insurance: Vec<String>,

    /// Minimum star rating (0 for no minimum).
    #[arg(short = 'r', long = "min-rating", default_value_t = 0,
          value_parser = clap::value_parser!(u8).range(0..=5))]
    pub min_rating: u8,

    /// Presentation; defaults to `[view] default_mode`.
    #[arg(long = "view", value_parser = parse_view)]
    pub view: Option<ViewMode>,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn parse_view(s: &str) -> Result<ViewMode, String> {
    ViewMode::from_name(s).ok_or_else(|| format!("unknown view '{s}' (expected list or map)"))
}

// =============================================================================
// Startup
// =============================================================================

/// Load the roster, open local storage and run the requested command.
pub fn run(cli: Cli, paths: &PlatformPaths, config: &AppConfig) -> Result<(), CercanosError> {
    let (catalog, roster) = load_roster(cli.roster.as_deref(), config)?;
    let storage = FileStorage::open(&paths.local_storage_file())?;
    tracing::debug!(path = %storage.path().display(), "Using local storage");

    let mut state = AppState::new(catalog, roster, Box::new(storage));
    state.view_mode = config.default_view;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Shell => run_shell(&mut state, config, io::stdin().lock(), &mut out),
        command => execute(&mut state, config, command, &mut out),
    }
}

/// Print each config.toml problem once to `err`.
pub fn report_config_warnings(err: &mut dyn Write, warnings: &[ConfigError]) {
    for warning in warnings {
        // stderr failures have nowhere else to go
        let _ = writeln!(err, "Warning: {warning}");
    }
}

/// Roster source priority: `--roster` > `[roster] seed_file` > built-in.
fn load_roster(
    cli_path: Option<&Path>,
    config: &AppConfig,
) -> Result<(Catalog, Roster), RosterError> {
    match cli_path.or(config.roster_seed_file.as_deref()) {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading roster from file");
            roster::load_from_path(path)
        }
        None => roster::load_builtin(),
    }
}

// =============================================================================
// Interactive session
// =============================================================================

/// Execute commands read from `input` until end of input or `exit`.
///
/// Errors in one command are reported and the session continues.
pub fn run_shell<R: BufRead>(
    state: &mut AppState,
    config: &AppConfig,
    input: R,
    out: &mut dyn Write,
) -> Result<(), CercanosError> {
    tracing::info!("Interactive session started");
    for line in input.lines() {
        let line = line.map_err(|e| CercanosError::Io {
            path: PathBuf::from("<stdin>"),
            operation: "read",
            source: e,
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let Some(words) = split_words(line) else {
            writeln!(out, "Unterminated quote: {line}").map_err(stdout_error)?;
            continue;
        };
        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(out, "{}", e.render()).map_err(stdout_error)?;
                continue;
            }
        };
        if command == Command::Shell {
            writeln!(out, "Already in a session.").map_err(stdout_error)?;
            continue;
        }

        if let Err(e) = execute(state, config, command, out) {
            tracing::warn!(error = %e, "Command failed");
            writeln!(out, "Error: {e}").map_err(stdout_error)?;
        }
    }
    tracing::info!("Interactive session ended");
    Ok(())
}

/// Split a line into words, honouring single and double quotes.
/// `None` if a quote is left open.
fn split_words(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}

// =============================================================================
// Dispatch
// =============================================================================

fn stdout_error(e: io::Error) -> CercanosError {
    CercanosError::Io {
        path: PathBuf::from("<stdout>"),
        operation: "write",
        source: e,
    }
}

/// Run one command against the session state, writing its output to `out`.
pub fn execute(
    state: &mut AppState,
    config: &AppConfig,
    command: Command,
    out: &mut dyn Write,
) -> Result<(), CercanosError> {
    tracing::debug!(command = ?command, "Executing command");
    match command {
        Command::Search(args) => search(state, args, out),
        Command::Show { id } => {
            if !state.select(&id) {
                return Err(RosterError::NotFound { id }.into());
            }
            let written = match state.selected_professional() {
                Some(prof) => render_detail(out, prof, state.is_favorite(&prof.id)),
                None => Ok(()),
            };
            written.map_err(stdout_error)
        }
        Command::Favorites => {
            let favorites = state.favorite_professionals();
            let written = if favorites.is_empty() {
                writeln!(out, "You have no favourite professionals yet.")
            } else {
                writeln!(out, "My doctors ({})", favorites.len())
                    .and_then(|_| render_list(out, &favorites, &HashSet::new()))
            };
            written.map_err(stdout_error)
        }
        Command::Favorite { id } => {
            if !state.is_logged_in() {
                return writeln!(out, "Log in to save favourites.").map_err(stdout_error);
            }
            let name = state
                .roster()
                .get(&id)
                .map(|p| p.name.clone())
                .ok_or_else(|| RosterError::NotFound { id: id.clone() })?;
            let written = if state.toggle_favorite(&id)? {
                writeln!(out, "Added {name} to your favourites.")
            } else {
                writeln!(out, "Removed {name} from your favourites.")
            };
            written.map_err(stdout_error)
        }
        Command::Login => {
            let user = state.login()?;
            writeln!(out, "Logged in as {}.", user.name).map_err(stdout_error)
        }
        Command::Logout => {
            state.logout()?;
            writeln!(out, "Logged out.").map_err(stdout_error)
        }
        Command::Whoami => match state.current_user() {
            Some(user) => writeln!(
                out,
                "{}\n  Email:     {}\n  Phone:     {}\n  Insurance: {}\n  Favourites: {}",
                user.name,
                user.email,
                user.phone,
                user.insurance,
                state.favorites().len()
            ),
            None => writeln!(out, "Not logged in."),
        }
        .map_err(stdout_error),
        Command::Review {
            id,
            rating,
            comment,
        } => review(state, config, &id, ReviewDraft::new(rating, comment), out),
        Command::Insurances { id, toggle, set } => {
            let id = id.unwrap_or_else(|| config.panel_professional_id.clone());
            insurances(state, &id, toggle, set, out)
        }
        Command::Catalog => render_catalog(out, &state.catalog).map_err(stdout_error),
        Command::Shell => Ok(()),
    }
}

fn search(
    state: &mut AppState,
    args: SearchArgs,
    out: &mut dyn Write,
) -> Result<(), CercanosError> {
    state.set_filter(FilterState {
        query: args.query,
        specialties: args.specialty.into_iter().collect(),
        insurances: args.insurance.into_iter().collect(),
        min_rating: args.min_rating,
    });
    if let Some(view) = args.view {
        state.view_mode = view;
    }

    let visible = state.visible_professionals();
    match args.format {
        OutputFormat::Json => {
            export::export_json(&visible, &mut *out, "stdout")?;
            writeln!(out).map_err(stdout_error)?;
        }
        OutputFormat::Csv => {
            export::export_csv(&visible, &mut *out, "stdout")?;
        }
        OutputFormat::Text => {
            let favorites: HashSet<&str> = state.favorites().ids().collect();
            let written = match state.view_mode {
                ViewMode::List => render_list(out, &visible, &favorites),
                ViewMode::Map => render_map(out, &visible),
            };
            written.map_err(stdout_error)?;
        }
    }
    Ok(())
}

fn review(
    state: &mut AppState,
    config: &AppConfig,
    id: &str,
    draft: ReviewDraft,
    out: &mut dyn Write,
) -> Result<(), CercanosError> {
    if state.is_logged_in() && draft.validate().is_ok() && config.review_submit_delay_ms > 0 {
        writeln!(out, "Submitting review...").map_err(stdout_error)?;
        std::thread::sleep(Duration::from_millis(config.review_submit_delay_ms));
    }

    let written = match state.submit_review(id, &draft, chrono::Utc::now()) {
        ReviewOutcome::Applied {
            review_id,
            new_rating,
            review_count,
        } => {
            tracing::info!(professional = id, review = %review_id, "Review published");
            writeln!(
                out,
                "Review published. New rating: {new_rating:.1} ({review_count} reviews)."
            )
        }
        ReviewOutcome::Rejected(reason) => writeln!(out, "Review not submitted: {reason}."),
    };
    written.map_err(stdout_error)
}

fn insurances(
    state: &mut AppState,
    id: &str,
    toggle: Vec<String>,
    set: Vec<String>,
    out: &mut dyn Write,
) -> Result<(), CercanosError> {
    let current = state
        .roster()
        .get(id)
        .map(|p| p.insurances.clone())
        .ok_or_else(|| RosterError::NotFound { id: id.to_string() })?;

    let edited = if !set.is_empty() {
        Some(set)
    } else if !toggle.is_empty() {
        let mut list = current;
        for plan in &toggle {
            toggle_in_list(&mut list, plan);
        }
        Some(list)
    } else {
        None
    };

    if let Some(list) = edited {
        state.save_insurances(id, list)?;
        writeln!(out, "Insurance plans saved.").map_err(stdout_error)?;
    }

    let written = match state.roster().get(id) {
        Some(prof) => render_insurance_panel(out, prof, &state.catalog),
        None => Ok(()),
    };
    written.map_err(stdout_error)
}

// =============================================================================
// Rendering
// =============================================================================

fn render_list(
    out: &mut dyn Write,
    professionals: &[&Professional],
    favorites: &HashSet<&str>,
) -> io::Result<()> {
    if professionals.is_empty() {
        return writeln!(out, "No professionals match your search.");
    }
    writeln!(out, "{} professionals found", professionals.len())?;
    for prof in professionals {
        let marker = if favorites.contains(prof.id.as_str()) { " ♥" } else { "" };
        writeln!(
            out,
            "[{}] {} - {}  ★ {} ({} reviews){marker}",
            prof.id,
            prof.name,
            prof.specialty,
            prof.rating_label(),
            prof.review_count
        )?;
        writeln!(out, "    {}", prof.address)?;
        if !prof.insurances.is_empty() {
            writeln!(
                out,
                "    {}",
                prof.insurances.join(constants::INSURANCE_LIST_SEPARATOR)
            )?;
        }
    }
    Ok(())
}

fn render_map(out: &mut dyn Write, professionals: &[&Professional]) -> io::Result<()> {
    match MapViewport::fit(professionals) {
        MapViewport::Fitted(bounds) => writeln!(
            out,
            "{}: {} markers, bounds ({:.6}, {:.6}) to ({:.6}, {:.6})",
            ViewMode::Map.label(),
            professionals.len(),
            bounds.south_west.lat,
            bounds.south_west.lng,
            bounds.north_east.lat,
            bounds.north_east.lng
        )?,
        MapViewport::Default { center, zoom } => {
            return writeln!(
                out,
                "{}: no markers, centred on ({:.6}, {:.6}) at zoom {zoom}",
                ViewMode::Map.label(),
                center.lat,
                center.lng
            )
        }
    }
    for prof in professionals {
        writeln!(
            out,
            "  {:>10.6} {:>11.6}  [{}] {} ({}) ★ {}",
            prof.location.lat,
            prof.location.lng,
            prof.id,
            prof.name,
            prof.specialty,
            prof.rating_label()
        )?;
    }
    Ok(())
}

fn render_detail(out: &mut dyn Write, prof: &Professional, favorite: bool) -> io::Result<()> {
    writeln!(
        out,
        "{}{}",
        prof.name,
        if favorite { " ♥" } else { "" }
    )?;
    writeln!(out, "{}", prof.specialty)?;
    writeln!(
        out,
        "★ {} ({} reviews)",
        prof.rating_label(),
        prof.review_count
    )?;
    writeln!(out, "Address:    {}", prof.address)?;
    writeln!(out, "Phone:      {}", prof.phone)?;
    writeln!(
        out,
        "Insurances: {}",
        prof.insurances.join(constants::INSURANCE_LIST_SEPARATOR)
    )?;
    if !prof.bio.is_empty() {
        writeln!(out, "\n{}", prof.bio)?;
    }

    writeln!(out, "\nReviews")?;
    if prof.reviews.is_empty() {
        return writeln!(out, "  No reviews yet.");
    }
    for review in &prof.reviews {
        writeln!(
            out,
            "  {} {} - {}",
            "★".repeat(usize::from(review.rating)),
            review.author,
            review.date
        )?;
        writeln!(out, "    {}", review.comment)?;
    }
    Ok(())
}

fn render_insurance_panel(
    out: &mut dyn Write,
    prof: &Professional,
    catalog: &Catalog,
) -> io::Result<()> {
    writeln!(out, "Insurance plans accepted by {}", prof.name)?;
    for plan in &catalog.insurance_plans {
        let mark = if prof.insurances.contains(plan) { "x" } else { " " };
        writeln!(out, "  [{mark}] {plan}")?;
    }
    for plan in prof
        .insurances
        .iter()
        .filter(|p| !catalog.insurance_plans.contains(p))
    {
        writeln!(out, "  [x] {plan} (not in catalog)")?;
    }
    Ok(())
}

fn render_catalog(out: &mut dyn Write, catalog: &Catalog) -> io::Result<()> {
    writeln!(out, "Specialties")?;
    for specialty in &catalog.specialties {
        writeln!(out, "  {specialty}")?;
    }
    writeln!(out, "Insurance plans")?;
    for plan in &catalog.insurance_plans {
        writeln!(out, "  {plan}")?;
    }
    writeln!(out, "Minimum ratings")?;
    for threshold in constants::RATING_THRESHOLDS {
        writeln!(out, "  {threshold}+")?;
    }
    Ok(())
}
