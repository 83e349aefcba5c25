//! Selection and drag-reorder controller
//!
//! Owns a [`Sequence`] of identifiable items together with the user's
//! selection, and implements the interactions a list UI wires to raw input
//! events:
//!
//! - ctrl-click toggles one item ([`ReorderController::toggle_select`])
//! - shift-click extends the selection over a range ([`ReorderController::range_select`])
//! - dragging moves every selected item, scattered or not, as one
//!   order-preserving block in front of the drop target
//!   ([`ReorderController::begin_drag`], [`ReorderController::drop_on`])
//!
//! Items are always addressed by identifier. Identifiers that no longer
//! resolve abort the operation instead of failing: drag and drop routinely
//! races with the UI tearing down rows.

use crate::error::Result;
use crate::event::{Event, EventBus};
use crate::item::Identify;
use crate::selection::{Selection, SelectionCell};
use crate::sequence::Sequence;
use crate::store::OrderStore;
use tracing::{debug, info, warn};

/// Side of a hovered item where a dragged block would land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEdge {
    Before,
    After,
}

pub struct ReorderController<T> {
    items: Sequence<T>,
    selection: Selection,
    cell: SelectionCell,
    events: Option<EventBus>,
    /// Lowest index of the selected block while a drag is in progress
    selection_start: Option<usize>,
    /// Index of the last ctrl/shift-clicked item, anchors shift ranges
    last_selected: Option<usize>,
}

impl<T: Identify> ReorderController<T> {
    /// Take ownership of `items` and publish an empty selection to `cell`
    pub fn new(items: Sequence<T>, cell: SelectionCell) -> Self {
        cell.publish(Selection::new());
        Self {
            items,
            selection: Selection::new(),
            cell,
            events: None,
            selection_start: None,
            last_selected: None,
        }
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Build a controller over the stored items of `container`
    pub fn load<S>(store: &S, container: &str, cell: SelectionCell) -> Result<Self>
    where
        S: OrderStore<T>,
    {
        let mut controller = Self::new(Sequence::new(), cell);
        controller.reload(store, container)?;
        Ok(controller)
    }

    /// Replace the items with the stored order of `container`.
    ///
    /// Clears the selection. Returns the number of items loaded.
    pub fn reload<S>(&mut self, store: &S, container: &str) -> Result<usize>
    where
        S: OrderStore<T>,
    {
        self.items = Sequence::from(store.fetch_all(container)?);
        self.clear_selection();

        let count = self.items.len();
        info!("Loaded {} items from {}", count, container);
        self.emit(Event::ItemsLoaded {
            container: container.to_owned(),
            count,
        });
        Ok(count)
    }

    /// Hand the current order to the store.
    ///
    /// A failed commit leaves the in-memory order as it is; the caller
    /// decides whether to retry or reload.
    pub fn commit<S>(&self, store: &mut S, container: &str) -> Result<()>
    where
        S: OrderStore<T>,
    {
        let ids = self.ordered_ids();
        match store.persist_order(container, &ids) {
            Ok(()) => {
                info!("Persisted order of {} items for {}", ids.len(), container);
                self.emit(Event::OrderPersisted {
                    container: container.to_owned(),
                });
                Ok(())
            }
            Err(e) => {
                warn!("Failed to persist order for {}: {}", container, e);
                self.emit(Event::PersistFailed {
                    container: container.to_owned(),
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub fn items(&self) -> &Sequence<T> {
        &self.items
    }

    /// Direct access to the items.
    ///
    /// Removing items here can leave stale identifiers in the selection;
    /// every operation resolving them treats them as not found.
    pub fn items_mut(&mut self) -> &mut Sequence<T> {
        &mut self.items
    }

    pub fn into_items(self) -> Sequence<T> {
        self.items
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_cell(&self) -> &SelectionCell {
        &self.cell
    }

    pub fn selection_start(&self) -> Option<usize> {
        self.selection_start
    }

    pub fn last_selected(&self) -> Option<usize> {
        self.last_selected
    }

    /// Whether a drag is in progress
    pub fn is_anchored(&self) -> bool {
        self.selection_start.is_some()
    }

    pub fn ordered_ids(&self) -> Vec<String> {
        self.items.iter().map(|item| item.uid().to_owned()).collect()
    }

    pub fn position_of(&self, uid: &str) -> Option<usize> {
        self.items.position(|item| item.uid() == uid)
    }

    /// Ctrl-click: add `uid` to the selection, or remove it if present
    pub fn toggle_select(&mut self, uid: &str) {
        let position = self.position_of(uid);
        if self.selection.remove(uid) {
            debug!("Deselected {}", uid);
        } else if position.is_some() {
            self.selection.insert(uid.to_owned());
            debug!("Selected {}", uid);
        } else {
            debug!("Ignoring click on unknown item {}", uid);
            return;
        }

        self.publish();
        self.last_selected = position;
    }

    /// Shift-click: select everything between the anchor and `uid`.
    ///
    /// The anchor is the last clicked item, or `uid` itself when nothing was
    /// clicked before.
    pub fn range_select(&mut self, uid: &str) {
        let Some(clicked) = self.position_of(uid) else {
            debug!("Ignoring range click on unknown item {}", uid);
            return;
        };

        let anchor = self.last_selected.unwrap_or(clicked);
        let (start, end) = (anchor.min(clicked), anchor.max(clicked));
        self.selection.extend(
            self.items
                .iter()
                .skip(start)
                .take(end - start + 1)
                .map(|item| item.uid().to_owned()),
        );
        debug!("Range selected {}..={}", start, end);

        self.publish();
        self.last_selected = Some(clicked);
    }

    /// Start dragging `uid`.
    ///
    /// Dragging an unselected item collapses the selection to that item.
    /// Dragging an unknown item leaves the selection alone and ends any
    /// drag in progress.
    pub fn begin_drag(&mut self, uid: &str) {
        if !self.selection.contains(uid) {
            if self.position_of(uid).is_none() {
                debug!("Ignoring drag of unknown item {}", uid);
                self.selection_start = None;
                return;
            }
            self.selection = Selection::from([uid.to_owned()]);
            self.publish();
        }

        self.selection_start = self.first_selected();
        debug!("Drag started at {:?}", self.selection_start);
    }

    /// Where the dragged block would land relative to the hovered item
    pub fn drag_over(&self, uid: &str) -> Option<DropEdge> {
        let start = self.selection_start?;
        let hovered = self.position_of(uid)?;
        if hovered > start {
            Some(DropEdge::After)
        } else {
            Some(DropEdge::Before)
        }
    }

    /// Drop the selected block onto `target`.
    ///
    /// Returns `true` when the order changed. Without a target, outside a
    /// drag, or when the target is not an unselected item, nothing changes.
    pub fn drop_on(&mut self, target: Option<&str>) -> bool {
        let Some(target) = target else {
            return false;
        };
        if self.selection_start.is_none() {
            debug!("Drop on {} without a drag in progress", target);
            return false;
        }

        // The selection may have been edited since the drag began
        let Some(block_start) = self.first_selected() else {
            debug!("Drop on {} with no selected item left", target);
            return false;
        };

        let Some(mut drop_index) = self
            .items
            .iter()
            .filter(|item| !self.selection.contains(item.uid()))
            .position(|item| item.uid() == target)
        else {
            debug!("Drop target {} is not an unselected item", target);
            return false;
        };

        // Past the block, the target shifted left when the block was lifted out
        if drop_index >= block_start {
            drop_index += 1;
        }

        let selection = &self.selection;
        let (mut selected, mut rest) = self.items.partition(|item| selection.contains(item.uid()));
        let moved = selected.len();

        self.items.clear();
        let rebuilt = self
            .items
            .splice(0, &mut rest)
            .and_then(|()| self.items.splice(drop_index, &mut selected));
        if let Err(e) = rebuilt {
            // Splice validates before draining, so nothing was lost
            warn!("Reorder onto {} failed: {}", target, e);
            self.items.extend(rest);
            self.items.extend(selected);
        }

        debug!("Moved {} items to {}", moved, drop_index);
        self.clear_selection();
        self.emit(Event::OrderChanged {
            moved,
            to: drop_index,
        });
        true
    }

    /// Empty the selection and leave any drag
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.publish();
        self.selection_start = None;
        self.last_selected = None;
    }

    pub(crate) fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    fn first_selected(&self) -> Option<usize> {
        self.items
            .position(|item| self.selection.contains(item.uid()))
    }

    fn publish(&self) {
        self.cell.publish(self.selection.clone());
        self.emit(Event::SelectionChanged {
            count: self.selection.len(),
        });
    }
}
