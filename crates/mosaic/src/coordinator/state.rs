//! The coordinator state machine.
//!
//! [`LayoutCoordinator`] never performs I/O. Loading a collection or feeding
//! it an [`Event`] returns the [`Command`]s the caller must execute: probe a
//! dimension, fetch the ordering, arm a timer or publish a layout. Every
//! command carries the [`LoadTicket`] of the load that issued it and every
//! event must carry it back. Events for any other ticket are dropped
//! unchanged, including those from an earlier load of the same fingerprint.
//!
//! ```text
//!   Idle ─load─▶ AwaitingDimensions ─threshold─▶ ProgressiveReady ─all─▶ LayoutReady
//!                       │                             │
//!                  batch timer                   hard timer
//!                       ▼                             ▼
//!                    Stalled ──────hard timer─────▶ ForcedDisplay
//! ```

use std::time::Duration;

use indexmap::IndexMap;
use log::{debug, info, warn};

use mosaic_core::{
    dimension::Dimension,
    fingerprint::Fingerprint,
    identifier::{CollectionId, ImageRef},
    item::Item,
    ordering::OrderingResult,
    snapshot::DimensionSnapshot,
};

use crate::{
    config::{AppConfig, CoordinatorConfig},
    error::MosaicError,
    layout::{ColumnSpec, ResponsiveLayout},
};

/// Lifecycle phase of the loaded collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No collection loaded.
    Idle,
    /// Probes in flight, nothing emitted yet.
    AwaitingDimensions,
    /// Enough dimensions are known for a provisional layout.
    ProgressiveReady,
    /// Every probe has settled; the layout is final.
    LayoutReady,
    /// The batch timeout fired before the progressive threshold was met.
    Stalled,
    /// The hard timeout fired; the layout is frozen.
    ForcedDisplay,
}

impl Phase {
    /// Returns `true` once the displayed layout will no longer change.
    pub fn is_final(self) -> bool {
        matches!(self, Self::LayoutReady | Self::ForcedDisplay)
    }
}

/// The two coordinator timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Emits a best-effort layout if nothing was shown yet.
    Batch,
    /// Forces and freezes the layout.
    Hard,
}

/// Identifies one effective [`LayoutCoordinator::load`].
///
/// Two loads of the same collection content share a fingerprint but never a
/// generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    fingerprint: Fingerprint,
    generation: u64,
}

impl LoadTicket {
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Input fed back into the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A probe finished; `None` if it failed.
    DimensionResolved {
        ticket: LoadTicket,
        image_ref: ImageRef,
        dimension: Option<Dimension>,
    },
    /// A renderer reported raw natural size; invalid sizes are ignored.
    DimensionReported {
        ticket: LoadTicket,
        image_ref: ImageRef,
        width: f64,
        height: f64,
    },
    /// The ordering fetch finished; `None` if it failed.
    OrderingReady {
        ticket: LoadTicket,
        ordering: Option<OrderingResult>,
    },
    /// A timer armed by [`Command::StartTimer`] elapsed.
    TimerFired { ticket: LoadTicket, timer: Timer },
}

impl Event {
    pub fn ticket(&self) -> &LoadTicket {
        match self {
            Self::DimensionResolved { ticket, .. }
            | Self::DimensionReported { ticket, .. }
            | Self::OrderingReady { ticket, .. }
            | Self::TimerFired { ticket, .. } => ticket,
        }
    }
}

/// Work requested by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Resolve the dimension of one image.
    Probe {
        ticket: LoadTicket,
        image_ref: ImageRef,
    },
    /// Fetch the backend ordering.
    FetchOrdering {
        ticket: LoadTicket,
        collection_id: CollectionId,
        items: Vec<Item>,
    },
    /// Deliver [`Event::TimerFired`] after `after`.
    StartTimer {
        ticket: LoadTicket,
        timer: Timer,
        after: Duration,
    },
    /// Publish a layout.
    Emit(LayoutEmission),
}

/// A layout published by the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEmission {
    collection_id: CollectionId,
    ticket: LoadTicket,
    phase: Phase,
    layout: ResponsiveLayout,
    resolved: usize,
    total: usize,
}

impl LayoutEmission {
    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.ticket.fingerprint
    }

    /// The load this layout belongs to.
    pub fn ticket(&self) -> &LoadTicket {
        &self.ticket
    }

    /// The phase the coordinator was in when this layout was emitted.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn layout(&self) -> &ResponsiveLayout {
        &self.layout
    }

    /// Number of images whose probe had settled.
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Number of distinct images in the collection.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_final(&self) -> bool {
        self.phase.is_final()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Pending,
    Resolved,
    Failed,
}

#[derive(Debug)]
struct Collection {
    collection_id: CollectionId,
    ticket: LoadTicket,
    items: Vec<Item>,
    probes: IndexMap<ImageRef, Probe>,
    snapshot: DimensionSnapshot,
    ordering: Option<OrderingResult>,
    last_layout: Option<ResponsiveLayout>,
}

impl Collection {
    fn settled(&self) -> usize {
        self.probes
            .values()
            .filter(|probe| **probe != Probe::Pending)
            .count()
    }

    fn total(&self) -> usize {
        self.probes.len()
    }
}

/// Progressive layout state machine for one displayed collection.
#[derive(Debug)]
pub struct LayoutCoordinator {
    config: CoordinatorConfig,
    two_column: ColumnSpec,
    four_column: ColumnSpec,
    phase: Phase,
    loads: u64,
    collection: Option<Collection>,
}

impl LayoutCoordinator {
    /// Creates an idle coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`MosaicError::Layout`] if a configured breakpoint is invalid.
    pub fn new(config: &AppConfig) -> Result<Self, MosaicError> {
        Ok(Self {
            config: config.coordinator().clone(),
            two_column: config.layout().two_column().column_spec(2)?,
            four_column: config.layout().four_column().column_spec(4)?,
            phase: Phase::Idle,
            loads: 0,
            collection: None,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fingerprint of the loaded collection, if any.
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.collection.as_ref().map(|c| &c.ticket.fingerprint)
    }

    /// Ticket of the current load; events must carry it to be applied.
    pub fn ticket(&self) -> Option<&LoadTicket> {
        self.collection.as_ref().map(|c| &c.ticket)
    }

    /// Dimensions recorded so far for the loaded collection.
    pub fn snapshot(&self) -> Option<&DimensionSnapshot> {
        self.collection.as_ref().map(|c| &c.snapshot)
    }

    /// The most recently emitted layout.
    pub fn last_layout(&self) -> Option<&ResponsiveLayout> {
        self.collection.as_ref().and_then(|c| c.last_layout.as_ref())
    }

    /// Loads a collection.
    ///
    /// Reloading the current collection with an unchanged fingerprint does
    /// nothing. Otherwise a new [`LoadTicket`] is issued and all pending work
    /// for the previous load becomes stale. Dimensions already known for
    /// images that are still present are carried over and not probed again.
    pub fn load(&mut self, collection_id: CollectionId, items: Vec<Item>) -> Vec<Command> {
        let fingerprint = Fingerprint::of(&items);

        let unchanged = self.collection.as_ref().is_some_and(|c| {
            c.collection_id == collection_id && c.ticket.fingerprint == fingerprint
        });
        if unchanged {
            debug!(collection = collection_id.get(); "Collection unchanged, ignoring load");
            return Vec::new();
        }

        let mut snapshot = match self.collection.take() {
            Some(previous) if previous.collection_id == collection_id => previous.snapshot,
            _ => DimensionSnapshot::new(),
        };
        snapshot.retain_items(&items);

        let mut probes = IndexMap::new();
        for item in &items {
            let state = if snapshot.contains(item.image_ref()) {
                Probe::Resolved
            } else {
                Probe::Pending
            };
            probes.entry(item.image_ref().clone()).or_insert(state);
        }

        self.loads += 1;
        let ticket = LoadTicket {
            fingerprint,
            generation: self.loads,
        };

        info!(
            collection = collection_id.get(),
            items = items.len(),
            fingerprint = ticket.fingerprint.as_str(),
            generation = ticket.generation;
            "Loading collection"
        );

        let collection = Collection {
            collection_id,
            ticket: ticket.clone(),
            items,
            probes,
            snapshot,
            ordering: None,
            last_layout: None,
        };

        if collection.items.is_empty() {
            self.collection = Some(collection);
            self.phase = Phase::LayoutReady;
            return self.emit().into_iter().collect();
        }

        let mut commands = vec![Command::FetchOrdering {
            ticket: ticket.clone(),
            collection_id,
            items: collection.items.clone(),
        }];
        commands.extend(
            collection
                .probes
                .iter()
                .filter(|(_, probe)| **probe == Probe::Pending)
                .map(|(image_ref, _)| Command::Probe {
                    ticket: ticket.clone(),
                    image_ref: image_ref.clone(),
                }),
        );
        commands.push(Command::StartTimer {
            ticket: ticket.clone(),
            timer: Timer::Batch,
            after: self.config.batch_timeout(),
        });
        commands.push(Command::StartTimer {
            ticket,
            timer: Timer::Hard,
            after: self.config.hard_timeout(),
        });

        self.collection = Some(collection);
        self.phase = Phase::AwaitingDimensions;
        commands.extend(self.advance());
        commands
    }

    /// Applies an event and returns the resulting commands.
    ///
    /// Events carrying a ticket other than the current one are discarded.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        let Some(collection) = self.collection.as_mut() else {
            debug!("No collection loaded, discarding event");
            return Vec::new();
        };
        if event.ticket() != &collection.ticket {
            debug!(
                stale = event.ticket().fingerprint.as_str(),
                stale_generation = event.ticket().generation,
                current = collection.ticket.fingerprint.as_str(),
                current_generation = collection.ticket.generation;
                "Discarding stale event"
            );
            return Vec::new();
        }

        match event {
            Event::DimensionResolved {
                image_ref,
                dimension,
                ..
            } => self.on_dimension(image_ref, dimension),
            Event::DimensionReported {
                image_ref,
                width,
                height,
                ..
            } => self.on_report(image_ref, width, height),
            Event::OrderingReady { ordering, .. } => self.on_ordering(ordering),
            Event::TimerFired { timer, .. } => self.on_timer(timer),
        }
    }

    fn on_dimension(&mut self, image_ref: ImageRef, dimension: Option<Dimension>) -> Vec<Command> {
        let Some(collection) = self.collection.as_mut() else {
            return Vec::new();
        };
        let Some(probe) = collection.probes.get_mut(&image_ref) else {
            debug!(image = image_ref.as_str(); "Dimension for unknown image ignored");
            return Vec::new();
        };
        if *probe != Probe::Pending {
            return Vec::new();
        }

        match dimension {
            Some(dimension) => {
                *probe = Probe::Resolved;
                collection.snapshot.insert(image_ref, dimension);
            }
            None => {
                *probe = Probe::Failed;
                debug!(
                    image = image_ref.as_str();
                    "Dimension unavailable, using square placeholder"
                );
            }
        }

        if self.phase == Phase::ForcedDisplay {
            return Vec::new();
        }
        self.advance()
    }

    fn on_report(&mut self, image_ref: ImageRef, width: f64, height: f64) -> Vec<Command> {
        let Some(collection) = self.collection.as_mut() else {
            return Vec::new();
        };
        let Some(state) = collection.probes.get_mut(&image_ref) else {
            debug!(image = image_ref.as_str(); "Report for unknown image ignored");
            return Vec::new();
        };
        if *state != Probe::Pending {
            return Vec::new();
        }
        // A rejected report leaves the image pending.
        if !collection.snapshot.record_report(&image_ref, width, height) {
            return Vec::new();
        }
        *state = Probe::Resolved;

        if self.phase == Phase::ForcedDisplay {
            return Vec::new();
        }
        self.advance()
    }

    fn on_ordering(&mut self, ordering: Option<OrderingResult>) -> Vec<Command> {
        let Some(collection) = self.collection.as_mut() else {
            return Vec::new();
        };

        collection.ordering = match ordering {
            Some(ordering) if ordering.matches_items(&collection.items) => Some(ordering),
            Some(_) => {
                warn!(
                    collection = collection.collection_id.get();
                    "Ordering not recognized for current items, using fallback order"
                );
                None
            }
            None => {
                warn!(
                    collection = collection.collection_id.get();
                    "Ordering unavailable, using fallback order"
                );
                None
            }
        };

        match self.phase {
            Phase::ProgressiveReady | Phase::LayoutReady | Phase::Stalled => {
                self.emit().into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    fn on_timer(&mut self, timer: Timer) -> Vec<Command> {
        match (timer, self.phase) {
            (Timer::Batch, Phase::AwaitingDimensions) => {
                warn!(
                    resolved = self.resolved(),
                    total = self.total();
                    "Dimension batch timed out, showing placeholders"
                );
                self.phase = Phase::Stalled;
                self.emit().into_iter().collect()
            }
            (Timer::Hard, phase) if !phase.is_final() => {
                warn!(
                    resolved = self.resolved(),
                    total = self.total();
                    "Layout deadline reached, freezing current layout"
                );
                self.phase = Phase::ForcedDisplay;
                self.freeze().into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Moves to the phase implied by the settled probe count and emits.
    fn advance(&mut self) -> Vec<Command> {
        let (settled, total) = (self.resolved(), self.total());

        if settled == total {
            self.phase = Phase::LayoutReady;
            info!(total; "All dimensions settled");
        } else if settled >= self.config.progressive_threshold(total) {
            self.phase = Phase::ProgressiveReady;
        } else {
            return Vec::new();
        }
        self.emit().into_iter().collect()
    }

    /// Emits the last layout again, or an all-default one if none was shown.
    fn freeze(&mut self) -> Option<Command> {
        let collection = self.collection.as_mut()?;
        let layout = match collection.last_layout.take() {
            Some(layout) => layout,
            None => ResponsiveLayout::compute_with_specs(
                &collection.items,
                collection.ordering.as_ref(),
                &DimensionSnapshot::new(),
                &self.two_column,
                &self.four_column,
            ),
        };
        Some(publish(collection, self.phase, layout))
    }

    /// Recomputes the layout from the current state and emits it.
    fn emit(&mut self) -> Option<Command> {
        let collection = self.collection.as_mut()?;
        let layout = ResponsiveLayout::compute_with_specs(
            &collection.items,
            collection.ordering.as_ref(),
            &collection.snapshot,
            &self.two_column,
            &self.four_column,
        );
        Some(publish(collection, self.phase, layout))
    }

    fn resolved(&self) -> usize {
        self.collection.as_ref().map_or(0, Collection::settled)
    }

    fn total(&self) -> usize {
        self.collection.as_ref().map_or(0, Collection::total)
    }
}

fn publish(collection: &mut Collection, phase: Phase, layout: ResponsiveLayout) -> Command {
    let (resolved, total) = (collection.settled(), collection.total());
    collection.last_layout = Some(layout.clone());

    debug!(
        phase:?,
        resolved,
        total,
        source:? = layout.source();
        "Emitting layout"
    );

    Command::Emit(LayoutEmission {
        collection_id: collection.collection_id,
        ticket: collection.ticket.clone(),
        phase,
        layout,
        resolved,
        total,
    })
}

#[cfg(test)]
mod tests {
    use mosaic_core::identifier::ItemId;

    use super::*;
    use crate::layout::OrderSource;

    fn coordinator() -> LayoutCoordinator {
        LayoutCoordinator::new(&AppConfig::default()).unwrap()
    }

    fn items(count: i64) -> Vec<Item> {
        (1..=count)
            .map(|id| Item::new(id, format!("img-{id}.jpg")))
            .collect()
    }

    fn emissions(commands: &[Command]) -> Vec<&LayoutEmission> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::Emit(emission) => Some(emission),
                _ => None,
            })
            .collect()
    }

    fn resolved(ticket: &LoadTicket, image_ref: &str, width: f64, height: f64) -> Event {
        Event::DimensionResolved {
            ticket: ticket.clone(),
            image_ref: image_ref.into(),
            dimension: Some(Dimension::loaded(width, height).unwrap()),
        }
    }

    fn failed(ticket: &LoadTicket, image_ref: &str) -> Event {
        Event::DimensionResolved {
            ticket: ticket.clone(),
            image_ref: image_ref.into(),
            dimension: None,
        }
    }

    fn timer(ticket: &LoadTicket, timer: Timer) -> Event {
        Event::TimerFired {
            ticket: ticket.clone(),
            timer,
        }
    }

    #[test]
    fn test_empty_collection_is_immediately_final() {
        let mut coordinator = coordinator();

        let commands = coordinator.load(CollectionId::new(1), Vec::new());

        assert_eq!(coordinator.phase(), Phase::LayoutReady);
        let emitted = emissions(&commands);
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].is_final());
        assert!(emitted[0].layout().two_column().is_empty());
        assert_eq!(emitted[0].fingerprint().as_str(), "empty");
    }

    #[test]
    fn test_load_requests_probes_ordering_and_timers() {
        let mut coordinator = coordinator();
        let mut collection = items(3);
        collection.push(Item::new(4, "img-1.jpg"));

        let commands = coordinator.load(CollectionId::new(1), collection);

        assert_eq!(coordinator.phase(), Phase::AwaitingDimensions);
        let probes = commands
            .iter()
            .filter(|c| matches!(c, Command::Probe { .. }))
            .count();
        assert_eq!(probes, 3);
        assert!(commands.iter().any(|c| matches!(c, Command::FetchOrdering { .. })));
        let hard = Duration::from_millis(8000);
        assert!(commands.iter().any(|c| matches!(
            c,
            Command::StartTimer { timer: Timer::Hard, after, .. } if *after == hard
        )));
        assert!(emissions(&commands).is_empty());
    }

    #[test]
    fn test_reloading_same_fingerprint_is_noop() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(3));

        assert!(coordinator.load(CollectionId::new(1), items(3)).is_empty());
        assert_eq!(coordinator.phase(), Phase::AwaitingDimensions);
    }

    #[test]
    fn test_progressive_layouts_converge_to_full_layout() {
        let mut coordinator = coordinator();
        let collection = items(10);
        coordinator.load(CollectionId::new(1), collection.clone());
        let ticket = coordinator.ticket().unwrap().clone();

        // Threshold for 10 items is min(6, ceil(3.0)) = 3.
        assert!(coordinator.handle(resolved(&ticket, "img-1.jpg", 400.0, 300.0)).is_empty());
        assert!(coordinator.handle(resolved(&ticket, "img-2.jpg", 1920.0, 1080.0)).is_empty());

        let third = coordinator.handle(resolved(&ticket, "img-3.jpg", 300.0, 600.0));
        assert_eq!(coordinator.phase(), Phase::ProgressiveReady);
        assert_eq!(emissions(&third)[0].resolved(), 3);

        let mut last = None;
        for id in 4..=10 {
            let image_ref = format!("img-{id}.jpg");
            let width = 100.0 * id as f64;
            let commands = coordinator.handle(resolved(&ticket, &image_ref, width, 500.0));
            let emitted = emissions(&commands);
            assert_eq!(emitted.len(), 1, "every resolution re-emits");
            last = Some(emitted[0].clone());
        }

        let last = last.unwrap();
        assert_eq!(coordinator.phase(), Phase::LayoutReady);
        assert!(last.is_final());

        let expected = ResponsiveLayout::compute_with_specs(
            &collection,
            None,
            coordinator.snapshot().unwrap(),
            &coordinator.two_column,
            &coordinator.four_column,
        );
        assert_eq!(last.layout(), &expected);
        assert!(last.layout().two_column().find_overlap().is_none());
    }

    #[test]
    fn test_stale_events_are_discarded() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(2));
        let old = coordinator.ticket().unwrap().clone();

        let mut voted = items(2);
        voted[1] = Item::new(2, "img-2.jpg").with_votes(5);
        coordinator.load(CollectionId::new(1), voted);

        assert_ne!(coordinator.fingerprint().unwrap(), old.fingerprint());
        assert!(coordinator.handle(resolved(&old, "img-1.jpg", 100.0, 100.0)).is_empty());
        assert!(coordinator.handle(timer(&old, Timer::Hard)).is_empty());
        assert!(coordinator.snapshot().unwrap().is_empty());
        assert_eq!(coordinator.phase(), Phase::AwaitingDimensions);
    }

    #[test]
    fn test_reload_of_earlier_content_ignores_its_old_timers() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(4));
        let first = coordinator.ticket().unwrap().clone();

        let mut voted = items(4);
        voted[0] = Item::new(1, "img-1.jpg").with_votes(1);
        coordinator.load(CollectionId::new(1), voted);
        coordinator.load(CollectionId::new(1), items(4));
        let current = coordinator.ticket().unwrap().clone();

        assert_eq!(current.fingerprint(), first.fingerprint());
        assert_ne!(current.generation(), first.generation());
        assert!(coordinator.handle(timer(&first, Timer::Hard)).is_empty());
        assert!(coordinator.handle(timer(&first, Timer::Batch)).is_empty());
        assert_eq!(coordinator.phase(), Phase::AwaitingDimensions);

        coordinator.handle(timer(&current, Timer::Hard));
        assert_eq!(coordinator.phase(), Phase::ForcedDisplay);
    }

    #[test]
    fn test_reported_dimensions_are_validated() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(2));
        let ticket = coordinator.ticket().unwrap().clone();
        let report = |image_ref: &str, width: f64, height: f64| Event::DimensionReported {
            ticket: ticket.clone(),
            image_ref: image_ref.into(),
            width,
            height,
        };

        // Malformed sizes leave the image unresolved.
        assert!(coordinator.handle(report("img-1.jpg", 0.0, 100.0)).is_empty());
        assert!(coordinator.handle(report("img-1.jpg", f64::NAN, 100.0)).is_empty());
        assert!(coordinator.snapshot().unwrap().is_empty());
        assert_eq!(coordinator.phase(), Phase::AwaitingDimensions);

        let commands = coordinator.handle(report("img-1.jpg", 1920.0, 1080.0));
        assert_eq!(coordinator.phase(), Phase::ProgressiveReady);
        assert_eq!(emissions(&commands)[0].resolved(), 1);
        assert!(coordinator.snapshot().unwrap().contains(&"img-1.jpg".into()));
    }

    #[test]
    fn test_known_dimensions_survive_fingerprint_change() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(2));
        let first = coordinator.ticket().unwrap().clone();
        coordinator.handle(resolved(&first, "img-1.jpg", 200.0, 100.0));

        let mut voted = items(2);
        voted[0] = Item::new(1, "img-1.jpg").with_votes(3);
        let commands = coordinator.load(CollectionId::new(1), voted);

        let probes: Vec<&ImageRef> = commands
            .iter()
            .filter_map(|c| match c {
                Command::Probe { image_ref, .. } => Some(image_ref),
                _ => None,
            })
            .collect();
        assert_eq!(probes, vec![&ImageRef::from("img-2.jpg")]);
        // One of two settled meets the threshold of one.
        assert_eq!(coordinator.phase(), Phase::ProgressiveReady);
    }

    #[test]
    fn test_batch_timeout_emits_placeholders() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(20));
        let ticket = coordinator.ticket().unwrap().clone();

        let commands = coordinator.handle(timer(&ticket, Timer::Batch));

        assert_eq!(coordinator.phase(), Phase::Stalled);
        let emitted = emissions(&commands);
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].layout().two_column().len(), 20);
        assert!(emitted[0].layout().two_column().items().iter().all(|i| !i.is_loaded()));

        // Resolutions keep progressing out of the stall.
        for id in 1..=6 {
            coordinator.handle(resolved(&ticket, &format!("img-{id}.jpg"), 100.0, 100.0));
        }
        assert_eq!(coordinator.phase(), Phase::ProgressiveReady);
    }

    #[test]
    fn test_hard_timeout_freezes_layout() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(4));
        let ticket = coordinator.ticket().unwrap().clone();
        // Threshold for 4 items is 2.
        coordinator.handle(resolved(&ticket, "img-1.jpg", 100.0, 100.0));
        coordinator.handle(resolved(&ticket, "img-2.jpg", 100.0, 100.0));
        let shown = coordinator.last_layout().unwrap().clone();

        let commands = coordinator.handle(timer(&ticket, Timer::Hard));

        assert_eq!(coordinator.phase(), Phase::ForcedDisplay);
        let emitted = emissions(&commands);
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].is_final());
        assert_eq!(emitted[0].layout(), &shown);

        // Later results are recorded without re-layout.
        assert!(coordinator.handle(resolved(&ticket, "img-3.jpg", 300.0, 100.0)).is_empty());
        assert!(coordinator.snapshot().unwrap().contains(&"img-3.jpg".into()));
        assert_eq!(coordinator.last_layout(), Some(&shown));
    }

    #[test]
    fn test_hard_timeout_without_layout_uses_defaults() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(20));
        let ticket = coordinator.ticket().unwrap().clone();

        let commands = coordinator.handle(timer(&ticket, Timer::Hard));

        let emitted = emissions(&commands);
        assert_eq!(emitted[0].phase(), Phase::ForcedDisplay);
        assert_eq!(emitted[0].layout().four_column().len(), 20);
        assert!(emitted[0].layout().source().is_degraded());
    }

    #[test]
    fn test_ordering_arrival_relayouts_with_backend_order() {
        let mut coordinator = coordinator();
        let collection = items(2);
        coordinator.load(CollectionId::new(1), collection);
        let ticket = coordinator.ticket().unwrap().clone();
        coordinator.handle(failed(&ticket, "img-1.jpg"));
        coordinator.handle(failed(&ticket, "img-2.jpg"));
        assert_eq!(coordinator.phase(), Phase::LayoutReady);

        let ordering = OrderingResult::new(
            vec![ItemId::new(2), ItemId::new(1)],
            vec![ItemId::new(2), ItemId::new(1)],
            1.0,
            0,
        );
        let commands = coordinator.handle(Event::OrderingReady {
            ticket: ticket.clone(),
            ordering: Some(ordering),
        });

        let emitted = emissions(&commands);
        assert_eq!(emitted[0].layout().source(), OrderSource::Backend);
        assert_eq!(emitted[0].layout().two_column().items()[0].id(), ItemId::new(2));
    }

    #[test]
    fn test_unrecognized_ordering_falls_back() {
        let mut coordinator = coordinator();
        coordinator.load(CollectionId::new(1), items(1));
        let ticket = coordinator.ticket().unwrap().clone();
        coordinator.handle(failed(&ticket, "img-1.jpg"));

        let foreign = OrderingResult::new(vec![ItemId::new(9)], vec![ItemId::new(9)], 1.0, 0);
        let commands = coordinator.handle(Event::OrderingReady {
            ticket,
            ordering: Some(foreign),
        });

        let emitted = emissions(&commands);
        assert_eq!(emitted[0].layout().source(), OrderSource::Fallback);
        assert_eq!(emitted[0].layout().two_column().len(), 1);
    }
}
