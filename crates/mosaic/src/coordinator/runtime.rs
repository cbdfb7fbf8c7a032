//! Tokio driver for the [`LayoutCoordinator`].
//!
//! All state transitions happen on the runtime task. Probes, ordering
//! fetches and timers run as spawned tasks that report back through the
//! runtime's input channel, so results may arrive in any order; the
//! coordinator discards whatever is stale.

use std::{collections::VecDeque, sync::Arc};

use log::{debug, warn};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender},
    task::JoinHandle,
};

use mosaic_core::{
    identifier::{CollectionId, ImageRef},
    item::Item,
};

use super::{
    resolver::{DimensionResolver, OrderingSource, Resolution},
    state::{Command, Event, LayoutCoordinator, LayoutEmission, LoadTicket},
};

#[derive(Debug)]
enum Input {
    Load {
        collection_id: CollectionId,
        items: Vec<Item>,
    },
    Event(Event),
}

/// Sends work to a running [`CoordinatorRuntime`].
///
/// The runtime stops once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    inputs: UnboundedSender<Input>,
}

impl CoordinatorHandle {
    /// Loads (or reloads) a collection. Returns `false` if the runtime has stopped.
    pub fn load(&self, collection_id: CollectionId, items: Vec<Item>) -> bool {
        self.inputs
            .send(Input::Load {
                collection_id,
                items,
            })
            .is_ok()
    }

    /// Feeds an external event, such as a dimension reported by a renderer.
    pub fn send(&self, event: Event) -> bool {
        self.inputs.send(Input::Event(event)).is_ok()
    }

    /// Reports the natural size a renderer observed for an image.
    ///
    /// `ticket` is the one carried by the emission that displayed the image.
    /// Sizes that are not positive and finite are ignored by the coordinator.
    pub fn report_dimension(
        &self,
        ticket: LoadTicket,
        image_ref: ImageRef,
        width: f64,
        height: f64,
    ) -> bool {
        self.send(Event::DimensionReported {
            ticket,
            image_ref,
            width,
            height,
        })
    }
}

/// Executes coordinator commands against the collaborators.
pub struct CoordinatorRuntime {
    coordinator: LayoutCoordinator,
    resolver: Arc<dyn DimensionResolver>,
    source: Arc<dyn OrderingSource>,
    inputs: UnboundedReceiver<Input>,
    events: WeakUnboundedSender<Input>,
    emissions: UnboundedSender<LayoutEmission>,
}

impl CoordinatorRuntime {
    /// Spawns the runtime on the current tokio runtime.
    ///
    /// Returns the handle for feeding it, the stream of emitted layouts and
    /// the task, which resolves to the coordinator once the runtime stops.
    pub fn spawn(
        coordinator: LayoutCoordinator,
        resolver: Arc<dyn DimensionResolver>,
        source: Arc<dyn OrderingSource>,
    ) -> (
        CoordinatorHandle,
        UnboundedReceiver<LayoutEmission>,
        JoinHandle<LayoutCoordinator>,
    ) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (emission_tx, emission_rx) = mpsc::unbounded_channel();

        let runtime = Self {
            coordinator,
            resolver,
            source,
            inputs: input_rx,
            events: input_tx.downgrade(),
            emissions: emission_tx,
        };
        let task = tokio::spawn(runtime.run());

        (CoordinatorHandle { inputs: input_tx }, emission_rx, task)
    }

    async fn run(mut self) -> LayoutCoordinator {
        while let Some(input) = self.inputs.recv().await {
            let commands = match input {
                Input::Load {
                    collection_id,
                    items,
                } => self.coordinator.load(collection_id, items),
                Input::Event(event) => self.coordinator.handle(event),
            };
            self.execute(commands);
        }

        debug!("Coordinator runtime stopped");
        self.coordinator
    }

    /// Runs commands until none remain; synchronous results loop straight back in.
    fn execute(&mut self, commands: Vec<Command>) {
        let mut queue = VecDeque::from(commands);
        while let Some(command) = queue.pop_front() {
            if let Some(event) = self.dispatch(command) {
                queue.extend(self.coordinator.handle(event));
            }
        }
    }

    fn dispatch(&self, command: Command) -> Option<Event> {
        match command {
            Command::Probe { ticket, image_ref } => match self.resolver.resolve(&image_ref) {
                Resolution::Ready(dimension) => Some(Event::DimensionResolved {
                    ticket,
                    image_ref,
                    dimension: Some(dimension),
                }),
                Resolution::Unavailable => Some(Event::DimensionResolved {
                    ticket,
                    image_ref,
                    dimension: None,
                }),
                Resolution::Pending(probe) => {
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let dimension = probe.await;
                        deliver(
                            &events,
                            Event::DimensionResolved {
                                ticket,
                                image_ref,
                                dimension,
                            },
                        );
                    });
                    None
                }
            },
            Command::FetchOrdering {
                ticket,
                collection_id,
                items,
            } => {
                let fetch = self.source.fetch(collection_id, items);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let ordering = match fetch.await {
                        Ok(ordering) => Some(ordering),
                        Err(err) => {
                            warn!(
                                collection = collection_id.get(),
                                err:%;
                                "Ordering fetch failed"
                            );
                            None
                        }
                    };
                    deliver(
                        &events,
                        Event::OrderingReady { ticket, ordering },
                    );
                });
                None
            }
            Command::StartTimer {
                ticket,
                timer,
                after,
            } => {
                let events = self.events.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    deliver(&events, Event::TimerFired { ticket, timer });
                });
                None
            }
            Command::Emit(emission) => {
                if self.emissions.send(emission).is_err() {
                    debug!("Layout receiver dropped, emission discarded");
                }
                None
            }
        }
    }
}

fn deliver(events: &WeakUnboundedSender<Input>, event: Event) {
    match events.upgrade() {
        Some(sender) => {
            if sender.send(Input::Event(event)).is_err() {
                debug!("Coordinator runtime closed, result dropped");
            }
        }
        None => debug!("Coordinator runtime gone, result dropped"),
    }
}
