use crate::Command;
use anyhow::{Context, Result, bail};
use pipedeck_core::config::Config;
use pipedeck_core::error::{DeckError, Result as DeckResult};
use pipedeck_core::event::EventBus;
use pipedeck_core::item::{Stream, Tag};
use pipedeck_core::sort::{SortDirection, sort_streams};
use pipedeck_core::store::{MemoryStore, OrderStore};
use pipedeck_core::tagging::{next_tag_id, refresh_tag, tag_join};
use pipedeck_core::{ReorderController, SelectionCell, Sequence};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_PLAYLIST: &str = "default";

/// Playlists kept in a JSON file, `{ "<playlist id>": [stream, ...] }`
///
/// Every successful persist rewrites the whole file.
pub struct LibraryFile {
    path: PathBuf,
    playlists: MemoryStore<Stream>,
}

impl LibraryFile {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read items file {}", path.display()))?;
        let parsed: BTreeMap<String, Vec<Stream>> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse items file {}", path.display()))?;

        let mut playlists = MemoryStore::new();
        for (playlist, streams) in parsed {
            playlists.insert_container(playlist, streams);
        }
        Ok(Self {
            path: path.to_path_buf(),
            playlists,
        })
    }

    /// Replace the streams of `playlist`, e.g. after their tags changed
    pub fn update(&mut self, playlist: &str, streams: Vec<Stream>) -> DeckResult<()> {
        self.playlists.insert_container(playlist, streams);
        self.save()
    }

    fn save(&self) -> DeckResult<()> {
        let mut all = BTreeMap::new();
        for playlist in self.playlists.container_ids() {
            all.insert(playlist, self.playlists.fetch_all(playlist)?);
        }
        let content =
            serde_json::to_string_pretty(&all).map_err(|e| DeckError::Store(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

impl OrderStore<Stream> for LibraryFile {
    fn fetch_all(&self, container: &str) -> DeckResult<Vec<Stream>> {
        self.playlists.fetch_all(container)
    }

    fn persist_order(&mut self, container: &str, ordered_ids: &[String]) -> DeckResult<()> {
        self.playlists.persist_order(container, ordered_ids)?;
        self.save()
    }
}

/// Library file to open: the command line wins over the config
pub fn items_path(cli: Option<PathBuf>, config: &Config) -> PathBuf {
    cli.unwrap_or_else(|| config.general.library_file.clone().into_std_path_buf())
}

/// Run one command against `playlist` and return what should be printed
pub fn run(items: &Path, playlist: &str, command: Command, config: &Config) -> Result<String> {
    let mut library = LibraryFile::open(items)?;
    let events = EventBus::new();
    let mut log = events.subscribe();

    let mut controller = ReorderController::load(&library, playlist, SelectionCell::new())
        .with_context(|| format!("Failed to load playlist {playlist}"))?
        .with_event_bus(events);

    let output = match command {
        Command::Show => {
            let mut streams = controller.items().clone();
            sort_streams(
                &mut streams,
                config.library.default_order,
                config.library.direction,
            );
            render(&streams)
        }
        Command::Sort { by, descending } => {
            let order = by.unwrap_or(config.library.default_order);
            let direction = if descending {
                SortDirection::Descending
            } else {
                config.library.direction
            };
            info!("Sorting {} by {:?} ({:?})", playlist, order, direction);

            sort_streams(controller.items_mut(), order, direction);
            controller.commit(&mut library, playlist)?;
            render(controller.items())
        }
        Command::Move { select, onto } => {
            if let Some(missing) = select.iter().find(|uid| controller.position_of(uid).is_none()) {
                bail!("Stream {missing} is not in playlist {playlist}");
            }
            select_each(&mut controller, &select);
            let Some(first) = controller.selection().iter().next().cloned() else {
                bail!("Nothing selected");
            };
            controller.begin_drag(&first);

            if controller.drop_on(Some(&onto)) {
                controller.commit(&mut library, playlist)?;
            } else {
                warn!("Nothing moved: {} is not a valid drop target", onto);
            }
            render(controller.items())
        }
        Command::Tag {
            uid,
            name,
            color,
            select,
        } => {
            if controller.position_of(&uid).is_none() {
                bail!("Stream {uid} is not in playlist {playlist}");
            }
            if !select.is_empty() {
                select_each(&mut controller, &select);
                select_each(&mut controller, std::slice::from_ref(&uid));
            }

            let tag = match (name, color) {
                (Some(name), Some(color)) => Some(resolve_tag(controller.items(), &name, &color)?),
                _ => None,
            };
            if let Some(tag) = &tag {
                let recoloured = refresh_tag(controller.items_mut(), tag);
                debug!("Refreshed {} streams already tagged {}", recoloured, tag.name);
            }
            let changed = controller.apply_tag(&uid, tag.as_ref());
            info!("Updated tag of {} streams", changed.len());

            library.update(playlist, controller.items().to_vec())?;
            serde_json::to_string_pretty(&tag_join(controller.items()))? + "\n"
        }
    };

    while let Ok(event) = log.try_recv() {
        debug!(?event, "event");
    }
    Ok(output)
}

/// Add each of `uids` to the selection, selecting repeated ids once
fn select_each(controller: &mut ReorderController<Stream>, uids: &[String]) {
    for uid in uids {
        if !controller.selection().contains(uid) {
            controller.toggle_select(uid);
        }
    }
}

/// Reuse a tag already in the playlist by name, or mint a new one.
///
/// A reused tag takes the given colour; callers refresh the streams
/// already carrying it.
fn resolve_tag(streams: &Sequence<Stream>, name: &str, color: &str) -> Result<Tag> {
    let mut known: Vec<Tag> = Vec::new();
    for tag in streams.iter().filter_map(|stream| stream.tag.as_ref()) {
        if !known.iter().any(|k| k.uid == tag.uid) {
            known.push(tag.clone());
        }
    }

    if let Some(existing) = known.iter().find(|tag| tag.name == name) {
        return Ok(Tag::new(existing.uid.clone(), name, color)?);
    }
    Ok(Tag::new(next_tag_id(&known), name, color)?)
}

fn render(streams: &Sequence<Stream>) -> String {
    let mut out = String::new();
    for (index, stream) in streams.iter().enumerate() {
        let tag = stream
            .tag
            .as_ref()
            .map(|tag| format!(" [{}]", tag.name))
            .unwrap_or_default();
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{:>3}  {:<12} {:>8}  {} - {}{}",
            index + 1,
            stream.uid,
            stream.display_duration(),
            stream.display_uploader(),
            stream.title,
            tag
        );
    }
    out
}
