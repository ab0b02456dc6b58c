// Player catalog loading and normalization.
//
// Two named catalogs are supported (five major leagues, all players). Each is
// a file of player records in one of three shapes, picked by extension:
// `.json` (array of objects), `.js` (a `window.DATA_X = [...]` script wrapping
// the same array) or `.csv` (header row with the same field names).

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use crate::config::DataPaths;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Stable player identifier. Catalogs carry it either as a number or as a
/// string; both normalize to the same textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        PlayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId(s.to_string())
    }
}

struct PlayerIdVisitor;

impl<'de> Visitor<'de> for PlayerIdVisitor {
    type Value = PlayerId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a player id as a string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PlayerId, E> {
        Ok(PlayerId(v.trim().to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PlayerId, E> {
        Ok(PlayerId(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PlayerId, E> {
        Ok(PlayerId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PlayerIdVisitor)
    }
}

/// A draftable player. Immutable once loaded; the squad and the draft engine
/// only ever hold clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Main position code (e.g. "ST", "CDM").
    pub position: String,
    /// Overall rating (OVR).
    pub ovr: u32,
    pub nation: String,
    pub team: String,
    pub league: String,
    /// Remote card image URL.
    pub card: String,
    /// Local card image path, preferred over `card` when present.
    pub local_image: Option<String>,
}

impl Player {
    /// Image reference to display: local copy first, remote card otherwise.
    pub fn image(&self) -> &str {
        self.local_image.as_deref().unwrap_or(&self.card)
    }
}

/// The two named player catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum DataSource {
    /// Players from the five major European leagues.
    #[serde(rename = "5world")]
    FiveLeagues,
    /// Every player in the dataset.
    #[serde(rename = "all")]
    AllPlayers,
}

impl DataSource {
    /// Config/CLI key.
    pub fn key(&self) -> &'static str {
        match self {
            DataSource::FiveLeagues => "5world",
            DataSource::AllPlayers => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DataSource::FiveLeagues => "5 World Leagues",
            DataSource::AllPlayers => "All Players",
        }
    }

    /// The other catalog.
    pub fn other(&self) -> DataSource {
        match self {
            DataSource::FiveLeagues => DataSource::AllPlayers,
            DataSource::AllPlayers => DataSource::FiveLeagues,
        }
    }

    /// Catalog file path for this source.
    pub fn path<'a>(&self, paths: &'a DataPaths) -> &'a str {
        match self {
            DataSource::FiveLeagues => &paths.five_leagues,
            DataSource::AllPlayers => &paths.all_players,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataSource {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "5world" => Ok(DataSource::FiveLeagues),
            "all" => Ok(DataSource::AllPlayers),
            other => Err(DatasetError::UnknownSource(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unsupported catalog format for {path} (expected .json, .js or .csv)")]
    UnsupportedFormat { path: String },

    #[error("unknown data source `{0}` (expected `5world` or `all`)")]
    UnknownSource(String),

    #[error("catalog {catalog} produced zero players")]
    Empty { catalog: DataSource },
}

// ---------------------------------------------------------------------------
// Raw serde struct (private), catalog field names
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayer {
    ID: PlayerId,
    Name: String,
    Position: String,
    OVR: u32,
    #[serde(default)]
    Nation: String,
    #[serde(default)]
    Team: String,
    #[serde(default)]
    League: String,
    #[serde(default)]
    card: String,
    #[serde(default)]
    localimg: Option<String>,
}

/// Accumulates normalized players, skipping blanks and duplicate ids.
#[derive(Default)]
struct CatalogBuilder {
    players: Vec<Player>,
    seen: HashSet<PlayerId>,
}

impl CatalogBuilder {
    fn push(&mut self, raw: RawPlayer) {
        let name = raw.Name.trim().to_string();
        let position = raw.Position.trim().to_uppercase();
        if raw.ID.as_str().is_empty() || name.is_empty() || position.is_empty() {
            warn!("skipping player row with empty id/name/position: '{}'", name);
            return;
        }
        if !self.seen.insert(raw.ID.clone()) {
            warn!("duplicate player id {} ('{}'), keeping first entry", raw.ID, name);
            return;
        }
        let local_image = raw
            .localimg
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.players.push(Player {
            id: raw.ID,
            name,
            position,
            ovr: raw.OVR,
            nation: raw.Nation.trim().to_string(),
            team: raw.Team.trim().to_string(),
            league: raw.League.trim().to_string(),
            card: raw.card.trim().to_string(),
            local_image,
        });
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_json_from_str(text: &str) -> Result<Vec<Player>, serde_json::Error> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let mut builder = CatalogBuilder::default();
    for (idx, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<RawPlayer>(row) {
            Ok(raw) => builder.push(raw),
            Err(e) => warn!("skipping malformed player record #{}: {}", idx, e),
        }
    }
    Ok(builder.players)
}

/// Pull the array literal out of a `window.DATA_X = [...];` script.
fn json_array_slice(script: &str) -> &str {
    match (script.find('['), script.rfind(']')) {
        (Some(start), Some(end)) if start < end => &script[start..=end],
        _ => script,
    }
}

fn load_csv_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut builder = CatalogBuilder::default();
    for result in reader.deserialize::<RawPlayer>() {
        match result {
            Ok(raw) => builder.push(raw),
            Err(e) => warn!("skipping malformed player row: {}", e),
        }
    }
    Ok(builder.players)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load a catalog file, choosing the parser by extension.
pub fn load_catalog(path: &Path) -> Result<Vec<Player>, DatasetError> {
    let display = path.display().to_string();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") | Some("js") => {
            let text = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
                path: display.clone(),
                source: e,
            })?;
            let body = if ext.as_deref() == Some("js") {
                json_array_slice(&text)
            } else {
                &text
            };
            load_json_from_str(body).map_err(|e| DatasetError::Json {
                path: display,
                source: e,
            })
        }
        Some("csv") => {
            let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
                path: display.clone(),
                source: e,
            })?;
            load_csv_from_reader(file).map_err(|e| DatasetError::Csv {
                path: display,
                source: e,
            })
        }
        _ => Err(DatasetError::UnsupportedFormat { path: display }),
    }
}

/// Load the named catalog using the configured paths.
///
/// A catalog that parses but yields no players is an error: the session
/// cannot draft from it.
pub fn load_source(source: DataSource, paths: &DataPaths) -> Result<Vec<Player>, DatasetError> {
    let players = load_catalog(Path::new(source.path(paths)))?;
    if players.is_empty() {
        return Err(DatasetError::Empty { catalog: source });
    }
    info!("Loaded {}: {} players", source.label(), players.len());
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
